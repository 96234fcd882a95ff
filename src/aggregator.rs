use axum::http::StatusCode;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::air_quality::{AirQuality, AqiTable};
use crate::error::HttpError;
use crate::forecast::{select_midday, ForecastEntry};
use crate::impl_into_response;
use crate::prayer::PrayerTimes;
use crate::sources::{
    AirQualitySource, CurrentConditionsSource, ForecastSource, PrayerTimesSource, SourceError,
};
use crate::weather::{Coordinates, WeatherSnapshot};

/// Failure of the primary lookup. Secondary failures never surface here.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather service unavailable: {0}")]
    Transport(String),
}

impl HttpError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CityNotFound(_) => StatusCode::NOT_FOUND,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::CityNotFound(_) => Some("CITY_NOT_FOUND"),
            Self::Transport(_) => Some("TRANSPORT_ERROR"),
        }
    }
}

impl_into_response!(SearchError);

/// Result of one search. Only the snapshot is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedWeather {
    pub snapshot: WeatherSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<AirQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prayer_times: Option<PrayerTimes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<Vec<ForecastEntry>>,
}

/// The four upstream collaborators
#[derive(Clone)]
pub struct Sources {
    pub current: Arc<dyn CurrentConditionsSource>,
    pub air_quality: Arc<dyn AirQualitySource>,
    pub forecast: Arc<dyn ForecastSource>,
    pub prayer_times: Arc<dyn PrayerTimesSource>,
}

#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    pub midday_marker: String,
    pub max_days: usize,
    pub secondary_timeout: Duration,
    pub aqi_table: AqiTable,
}

/// Staged retrieval: the primary lookup first, then the three optional
/// lookups concurrently, each allowed to fail on its own.
pub struct WeatherAggregator {
    sources: Sources,
    settings: AggregatorSettings,
}

impl WeatherAggregator {
    pub fn new(sources: Sources, settings: AggregatorSettings) -> Self {
        Self { sources, settings }
    }

    pub async fn search(&self, city: &str) -> Result<AggregatedWeather, SearchError> {
        let city = city.trim();
        tracing::debug!(city = %city, "Starting search");

        let snapshot = self
            .sources
            .current
            .current_conditions(city)
            .await
            .map_err(|e| Self::classify_primary(city, e))?;

        // The canonical name and coordinates unblock the secondaries
        let (air_quality, prayer_times, forecast) = tokio::join!(
            self.fetch_air_quality(snapshot.coordinates),
            self.fetch_prayer_times(&snapshot.city, &snapshot.country),
            self.fetch_forecast(city),
        );

        tracing::info!(
            city = %snapshot.city,
            air_quality = air_quality.is_some(),
            prayer_times = prayer_times.is_some(),
            forecast = forecast.is_some(),
            "Search completed"
        );

        Ok(AggregatedWeather {
            snapshot,
            air_quality,
            prayer_times,
            forecast,
        })
    }

    fn classify_primary(city: &str, error: SourceError) -> SearchError {
        if error.is_transport() {
            tracing::error!(city = %city, error = %error, "Current conditions lookup failed in transport");
            SearchError::Transport(error.to_string())
        } else {
            tracing::error!(city = %city, error = %error, "Current conditions lookup found no city");
            SearchError::CityNotFound(city.to_string())
        }
    }

    async fn fetch_air_quality(&self, coordinates: Coordinates) -> Option<AirQuality> {
        let index = self
            .secondary(
                "air_quality",
                self.sources.air_quality.air_quality_index(coordinates),
            )
            .await?;

        let described = self.settings.aqi_table.describe(index);
        if described.is_none() {
            Self::record_unavailable("air_quality", &format!("unknown AQI category {index}"));
        }
        described
    }

    async fn fetch_prayer_times(&self, city: &str, country: &str) -> Option<PrayerTimes> {
        self.secondary(
            "prayer_times",
            self.sources.prayer_times.prayer_times(city, country),
        )
        .await
    }

    async fn fetch_forecast(&self, city: &str) -> Option<Vec<ForecastEntry>> {
        let series = self
            .secondary("forecast", self.sources.forecast.forecast_series(city))
            .await?;

        let entries = select_midday(
            &series,
            &self.settings.midday_marker,
            self.settings.max_days,
        );
        if entries.is_empty() {
            Self::record_unavailable(
                "forecast",
                &format!("no samples at {}", self.settings.midday_marker),
            );
            return None;
        }
        Some(entries)
    }

    async fn secondary<T>(
        &self,
        source: &'static str,
        lookup: impl Future<Output = Result<T, SourceError>>,
    ) -> Option<T> {
        let timeout = self.settings.secondary_timeout;
        match tokio::time::timeout(timeout, lookup).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                Self::record_unavailable(source, &e.to_string());
                None
            }
            Err(_) => {
                let e = SourceError::Timeout(timeout.as_secs());
                Self::record_unavailable(source, &e.to_string());
                None
            }
        }
    }

    fn record_unavailable(source: &'static str, reason: &str) {
        metrics::counter!("weathermood_secondary_unavailable_total", "source" => source)
            .increment(1);
        tracing::warn!(source, reason = %reason, "Secondary lookup unavailable");
    }
}
