use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use super::travel_plan::TravelMode;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("{0}")]
    InvalidMode(String),
    #[error("startDate must not be after endDate")]
    DateOrder,
}

/// Body of `POST /plans`, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub mode: Option<String>,
    pub preferences: Option<Vec<String>>,
}

/// A validated trip description, ready for prompt construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mode: TravelMode,
    pub preferences: Vec<String>,
}

impl CreatePlanRequest {
    pub fn validate(self) -> Result<TripRequest, RequestError> {
        let present = |field: Option<String>| {
            field
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let (destination, start, end, mode) = match (
            present(self.destination),
            present(self.start_date),
            present(self.end_date),
            present(self.mode),
        ) {
            (Some(destination), Some(start), Some(end), Some(mode)) => {
                (destination, start, end, mode)
            }
            _ => return Err(RequestError::MissingFields),
        };

        let start_date = parse_date("startDate", &start)?;
        let end_date = parse_date("endDate", &end)?;
        if start_date > end_date {
            return Err(RequestError::DateOrder);
        }
        let mode = mode.parse::<TravelMode>().map_err(RequestError::InvalidMode)?;

        let mut preferences: Vec<String> = Vec::new();
        for tag in self.preferences.unwrap_or_default() {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !preferences.iter().any(|p| p.eq_ignore_ascii_case(&tag)) {
                preferences.push(tag);
            }
        }

        Ok(TripRequest {
            destination,
            start_date,
            end_date,
            mode,
            preferences,
        })
    }
}

impl TripRequest {
    /// Whole days spanned by the trip; a same-day trip counts as one day.
    pub fn trip_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(1)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RequestError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| RequestError::InvalidDate {
            field,
            value: value.to_string(),
        })
}
