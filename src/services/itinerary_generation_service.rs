use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{error, info};
use thiserror::Error;
use uuid::Uuid;

use crate::config::GenerationConfig;
use crate::db::store::{Store, StoreError};
use crate::models::{
    plan_request::TripRequest,
    travel_plan::{Attraction, PlanStatus, TravelPlan},
};
use crate::services::openai_service::{CompletionRequest, GenerationError, TextGenerator};
use crate::services::prompt_builder::{build_prompt, SYSTEM_PROMPT};
use crate::services::response_parser::{parse_attractions, GeneratedAttraction, ParseError};

const DEFAULT_TEMPERATURE: f64 = 0.3;

#[derive(Debug, Error)]
pub enum PlanGenerationError {
    #[error("text generation failed: {0}")]
    Upstream(#[from] GenerationError),
    #[error("invalid model response: {0}")]
    InvalidModelResponse(#[from] ParseError),
    #[error("failed to persist travel plan: {0}")]
    Persistence(#[from] StoreError),
}

#[derive(Clone)]
pub struct ItineraryGenerationConfig {
    pub temperature: f64,
    pub language: Option<String>,
}

impl Default for ItineraryGenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            language: None,
        }
    }
}

impl From<&GenerationConfig> for ItineraryGenerationConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            language: config.language.clone(),
        }
    }
}

/// Turns a validated trip into a stored plan: prompt, one completion call,
/// response normalization, single insert.
pub struct ItineraryGenerator {
    text_generator: Arc<dyn TextGenerator>,
    store: Arc<dyn Store>,
    config: ItineraryGenerationConfig,
}

impl ItineraryGenerator {
    pub fn new(text_generator: Arc<dyn TextGenerator>, store: Arc<dyn Store>) -> Self {
        Self::with_config(text_generator, store, ItineraryGenerationConfig::default())
    }

    pub fn with_config(
        text_generator: Arc<dyn TextGenerator>,
        store: Arc<dyn Store>,
        config: ItineraryGenerationConfig,
    ) -> Self {
        Self {
            text_generator,
            store,
            config,
        }
    }

    pub fn text_generator(&self) -> &dyn TextGenerator {
        self.text_generator.as_ref()
    }

    /// Generate and persist a plan for `owner_id`. Nothing is stored unless
    /// the model returned at least one usable attraction.
    pub async fn generate_plan(
        &self,
        owner_id: &str,
        trip: TripRequest,
    ) -> Result<TravelPlan, PlanGenerationError> {
        let prompt = build_prompt(&trip, self.config.language.as_deref());
        info!(
            "Generating {}-day {} itinerary for {} (preferences: {:?})",
            trip.trip_days(),
            trip.mode,
            trip.destination,
            trip.preferences
        );

        let raw = self
            .text_generator
            .complete(CompletionRequest {
                system: SYSTEM_PROMPT.to_string(),
                prompt,
                temperature: self.config.temperature,
            })
            .await?;

        let generated = parse_attractions(&raw).map_err(|err| {
            error!("Failed to parse model response ({}): {}", err, raw);
            err
        })?;

        let plan = assemble_plan(owner_id, trip, generated, Utc::now());
        self.store.insert_plan(&plan).await?;
        info!(
            "Stored plan {} with {} attractions",
            plan.id,
            plan.attractions.len()
        );
        Ok(plan)
    }
}

/// Builds the plan record. Positions follow the generated order, starting at 1.
pub fn assemble_plan(
    owner_id: &str,
    trip: TripRequest,
    generated: Vec<GeneratedAttraction>,
    created_at: DateTime<Utc>,
) -> TravelPlan {
    let attractions = generated
        .into_iter()
        .zip(1u32..)
        .map(|(attraction, position)| Attraction {
            id: Uuid::new_v4().to_string(),
            name: attraction.name,
            description: attraction.description,
            latitude: attraction.latitude,
            longitude: attraction.longitude,
            position,
            visit_time: attraction.visit_time,
            duration: attraction.duration,
        })
        .collect();

    TravelPlan {
        id: Uuid::new_v4().to_string(),
        owner_id: owner_id.to_string(),
        destination: trip.destination,
        start_date: trip.start_date,
        end_date: trip.end_date,
        mode: trip.mode,
        status: PlanStatus::Private,
        preferences: trip.preferences,
        created_at,
        attractions,
    }
}
