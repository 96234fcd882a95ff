use async_trait::async_trait;
use thiserror::Error;

use crate::forecast::ForecastSample;
use crate::prayer::PrayerTimes;
use crate::weather::{Coordinates, WeatherSnapshot};

/// Failure of a single upstream query
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to reach upstream: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Upstream did not answer within {0} seconds")]
    Timeout(u64),
}

impl SourceError {
    /// Whether the failure came from the network or decoding rather than from an upstream answer
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::InvalidResponse(_) | Self::Timeout(_)
        )
    }
}

/// Current-conditions lookup by city name
#[async_trait]
pub trait CurrentConditionsSource: Send + Sync {
    async fn current_conditions(&self, city: &str) -> Result<WeatherSnapshot, SourceError>;
}

/// Air quality category (1 best, 5 worst) by coordinates
#[async_trait]
pub trait AirQualitySource: Send + Sync {
    async fn air_quality_index(&self, coordinates: Coordinates) -> Result<u8, SourceError>;
}

/// Multi-day forecast at fixed sub-day granularity, by city name
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn forecast_series(&self, city: &str) -> Result<Vec<ForecastSample>, SourceError>;
}

/// Daily prayer times by city name and country
#[async_trait]
pub trait PrayerTimesSource: Send + Sync {
    async fn prayer_times(&self, city: &str, country: &str) -> Result<PrayerTimes, SourceError>;
}
