use crate::models::{plan_request::TripRequest, travel_plan::TravelMode};

pub const SYSTEM_PROMPT: &str = "You are a professional travel planner. Recommend only \
attractions that really exist at the destination, follow the traveller's stated interests \
strictly, and answer with valid JSON only.";

/// Share of returned stops that must match the requested categories.
pub const PREFERENCE_MATCH_PERCENT: u8 = 80;

const PREFERENCE_LABELS: &[(&str, &str)] = &[
    ("nature", "natural scenery and outdoor sights"),
    ("history", "historic sites and cultural heritage"),
    ("modern", "modern architecture and cityscapes"),
    ("museum", "museums and art exhibitions"),
    ("food", "local cuisine and notable restaurants"),
    ("shopping", "shopping centres and commercial streets"),
    ("nightlife", "nightlife and entertainment venues"),
    ("temple", "temples and religious buildings"),
    ("park", "parks and leisure grounds"),
    ("local", "local traditions and folk experiences"),
];

pub fn mode_instruction(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::HighIntensity => {
            "Create a high-intensity itinerary with 6-8 attractions per day, minimal rest time, and efficient routing."
        }
        TravelMode::Balanced => {
            "Create a balanced itinerary with 4-5 attractions per day, including breaks and meal times."
        }
        TravelMode::Relaxed => {
            "Create a relaxed itinerary with 2-3 main attractions per day, plenty of free time, and focus on experiences."
        }
    }
}

/// Descriptive phrase for a category tag. Unknown tags pass through as given.
pub fn preference_phrase(tag: &str) -> &str {
    PREFERENCE_LABELS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(tag))
        .map(|(_, label)| *label)
        .unwrap_or(tag)
}

fn preference_directive(preferences: &[String]) -> Option<String> {
    if preferences.is_empty() {
        return None;
    }

    let phrases: Vec<&str> = preferences.iter().map(|tag| preference_phrase(tag)).collect();
    Some(format!(
        "IMPORTANT - traveller preferences (must be followed strictly):\n\
         The traveller is explicitly interested in: {}.\n\
         - At least {}% of the recommended attractions must match these categories.\n\
         - Do not recommend attractions unrelated to these interests.",
        phrases.join(", "),
        PREFERENCE_MATCH_PERCENT,
    ))
}

fn language_directive(destination: &str, language: Option<&str>) -> String {
    match language {
        Some(language) => format!(
            "Write every name, description, visitTime and duration value in {}.",
            language
        ),
        None => format!(
            "Write every name, description, visitTime and duration value in the language \
             travellers to {} would expect to read locally.",
            destination
        ),
    }
}

/// Composes the user prompt for one trip. The response contract is a JSON
/// object with an `attractions` array; the parser also copes with the
/// variants models return in practice.
pub fn build_prompt(trip: &TripRequest, language: Option<&str>) -> String {
    let days = trip.trip_days();
    let mut prompt = format!(
        "Plan a detailed {days}-day trip to {destination}, from {start} to {end}.\n\n\
         Travel style: {label} - {instruction}",
        days = days,
        destination = trip.destination,
        start = trip.start_date,
        end = trip.end_date,
        label = trip.mode.label(),
        instruction = mode_instruction(trip.mode),
    );

    if let Some(directive) = preference_directive(&trip.preferences) {
        prompt.push_str("\n\n");
        prompt.push_str(&directive);
    }

    prompt.push_str("\n\n");
    prompt.push_str(&language_directive(&trip.destination, language));

    prompt.push_str(
        "\n\nReturn only valid JSON in exactly this shape, with no other text:\n\n\
         {\n  \"attractions\": [\n    {\n      \"name\": \"Attraction name\",\n      \
         \"description\": \"A detailed, useful description\",\n      \"latitude\": 39.9163,\n      \
         \"longitude\": 116.3972,\n      \"visitTime\": \"Day 1, 09:00\",\n      \
         \"duration\": \"2 hours\"\n    }\n  ]\n}\n\n",
    );

    prompt.push_str(&format!(
        "Requirements:\n\
         - Use the real geographic coordinates of each attraction in {destination}\n\
         - Order attractions by day, then by a sensible route within each day\n\
         - Give realistic visit times and durations, allowing for travel between stops\n\
         - Include between 3 and 8 attractions per day across all {days} days\n\
         - visitTime must read \"Day N, HH:MM\"",
        destination = trip.destination,
        days = days,
    ));

    prompt
}
