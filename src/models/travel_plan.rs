use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Travel-intensity preset. Controls how many stops per day the generated
/// itinerary should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelMode {
    #[serde(rename = "COMMANDO", alias = "high-intensity")]
    HighIntensity,
    #[serde(rename = "NORMAL", alias = "balanced")]
    Balanced,
    #[serde(rename = "LEISURE", alias = "relaxed")]
    Relaxed,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::HighIntensity => "COMMANDO",
            TravelMode::Balanced => "NORMAL",
            TravelMode::Relaxed => "LEISURE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::HighIntensity => "high-intensity",
            TravelMode::Balanced => "balanced",
            TravelMode::Relaxed => "relaxed",
        }
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commando" | "high-intensity" | "high_intensity" => Ok(TravelMode::HighIntensity),
            "normal" | "balanced" => Ok(TravelMode::Balanced),
            "leisure" | "relaxed" => Ok(TravelMode::Relaxed),
            _ => Err(format!("Unknown travel mode: {}", s)),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Visibility of a plan. Only ever moves from `Private` to `Shared`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    #[serde(rename = "PRIVATE", alias = "COMPLETED")]
    Private,
    #[serde(rename = "SHARED")]
    Shared,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Private => "PRIVATE",
            PlanStatus::Shared => "SHARED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub id: String,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    /// 1-based visit order within the plan.
    #[serde(rename = "order")]
    pub position: u32,
    pub visit_time: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPlan {
    pub id: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mode: TravelMode,
    pub status: PlanStatus,
    #[serde(default)]
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub attractions: Vec<Attraction>,
}

impl TravelPlan {
    pub fn is_shared(&self) -> bool {
        self.status == PlanStatus::Shared
    }

    /// Restores visit order after a read from storage.
    pub fn sort_attractions(&mut self) {
        self.attractions.sort_by_key(|attraction| attraction.position);
    }
}
