use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    Json(String),
    #[error("response has no recognizable attractions list")]
    UnrecognizedShape,
    #[error("attraction #{index} is malformed: {reason}")]
    MalformedAttraction { index: usize, reason: String },
    #[error("response contains no attractions")]
    Empty,
}

/// One stop as returned by the model, before positions and ids are assigned.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAttraction {
    pub name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub latitude: f64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub longitude: f64,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "visit_time")]
    pub visit_time: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub duration: String,
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$").expect("fence pattern compiles")
    })
}

fn strip_code_fence(raw: &str) -> &str {
    match code_fence().captures(raw).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str(),
        None => raw.trim(),
    }
}

/// Sort key for `dayN` object keys: numbered days first in numeric order,
/// then any other `day*` keys by name. Returns `None` for non-day keys.
fn day_sort_key(key: &str) -> Option<(bool, u32, String)> {
    let prefix = key.get(..3)?;
    if !prefix.eq_ignore_ascii_case("day") {
        return None;
    }
    let suffix = key[3..].trim_start_matches(|c: char| c == '_' || c == '-' || c == ' ');
    match suffix.parse::<u32>() {
        Ok(day) => Some((false, day, key.to_string())),
        Err(_) => Some((true, 0, key.to_string())),
    }
}

/// Pulls the raw attraction values out of the three shapes models produce:
/// `{"attractions": [...]}`, `{"day1": {"attractions": [...]}, ...}` and a
/// bare array.
fn extract_items(value: Value) -> Result<Vec<Value>, ParseError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("attractions") {
                return Ok(items);
            }

            let mut days: Vec<((bool, u32, String), Vec<Value>)> = map
                .into_iter()
                .filter_map(|(key, day)| {
                    let sort_key = day_sort_key(&key)?;
                    match day {
                        Value::Object(mut day) => match day.remove("attractions") {
                            Some(Value::Array(items)) => Some((sort_key, items)),
                            _ => None,
                        },
                        _ => None,
                    }
                })
                .collect();

            if days.is_empty() {
                return Err(ParseError::UnrecognizedShape);
            }
            days.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(days.into_iter().flat_map(|(_, items)| items).collect())
        }
        _ => Err(ParseError::UnrecognizedShape),
    }
}

fn parse_item(index: usize, item: Value) -> Result<GeneratedAttraction, ParseError> {
    let malformed = |reason: String| ParseError::MalformedAttraction { index, reason };

    let attraction: GeneratedAttraction =
        serde_json::from_value(item).map_err(|e| malformed(e.to_string()))?;

    if attraction.name.trim().is_empty() {
        return Err(malformed("name is empty".to_string()));
    }
    if !attraction.latitude.is_finite() || !attraction.longitude.is_finite() {
        return Err(malformed("coordinates are not finite numbers".to_string()));
    }

    Ok(GeneratedAttraction {
        name: attraction.name.trim().to_string(),
        ..attraction
    })
}

/// Parses model output into an ordered, non-empty attraction list.
pub fn parse_attractions(raw: &str) -> Result<Vec<GeneratedAttraction>, ParseError> {
    let body = strip_code_fence(raw);
    let value: Value = serde_json::from_str(body).map_err(|e| ParseError::Json(e.to_string()))?;

    let items = extract_items(value)?;
    if items.is_empty() {
        return Err(ParseError::Empty);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| parse_item(i + 1, item))
        .collect()
}
