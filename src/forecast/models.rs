use serde::{Deserialize, Serialize};

use crate::weather::Condition;

// ============================================================================
// 5 day / 3 hour forecast API response (internal)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ForecastApiResponse {
    pub list: Vec<ForecastApiItem>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastApiItem {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<ForecastCondition>,
    /// UTC wall time, "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCondition {
    pub main: String,
    pub icon: String,
}

// ============================================================================
// Engine-facing models
// ============================================================================

/// One point of the fine-grained upstream time series
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: i64,
    /// UTC wall time label used for midday matching
    pub time_label: String,
    pub temperature: f64,
    pub condition: Condition,
    pub icon: String,
}

/// One future day in the condensed forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub timestamp: i64,
    pub temperature: f64,
    pub icon: String,
    pub condition: Condition,
}

impl From<&ForecastSample> for ForecastEntry {
    fn from(sample: &ForecastSample) -> Self {
        Self {
            timestamp: sample.timestamp,
            temperature: sample.temperature,
            icon: sample.icon.clone(),
            condition: sample.condition.clone(),
        }
    }
}
