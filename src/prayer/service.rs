use async_trait::async_trait;
use reqwest::Client;

use super::models::{PrayerTimes, TimingsResponse};
use crate::sources::{PrayerTimesSource, SourceError};

const TIMINGS_BY_CITY_PATH: &str = "/v1/timingsByCity";

/// Aladhan prayer times client
pub struct PrayerTimesService {
    client: Client,
    base_url: String,
}

impl PrayerTimesService {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_timings(&self, city: &str, country: &str) -> Result<PrayerTimes, SourceError> {
        tracing::debug!(city = %city, country = %country, "Fetching prayer times");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, TIMINGS_BY_CITY_PATH))
            .query(&[("city", city), ("country", country)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: TimingsResponse = response.json().await?;
        Self::extract_timings(body)
    }

    /// The HTTP status alone is not enough: Aladhan also reports failures in the body
    fn extract_timings(body: TimingsResponse) -> Result<PrayerTimes, SourceError> {
        if body.code != 200 {
            return Err(SourceError::Status {
                status: body.code,
                message: body.status,
            });
        }

        let data = body
            .data
            .ok_or_else(|| SourceError::InvalidResponse("Missing timings data".to_string()))?;

        // Values may carry a timezone suffix, e.g. "04:12 (BST)"
        Ok(data
            .timings
            .into_iter()
            .map(|(name, value)| {
                let time = value.split_whitespace().next().unwrap_or_default().to_string();
                (name, time)
            })
            .collect())
    }
}

#[async_trait]
impl PrayerTimesSource for PrayerTimesService {
    async fn prayer_times(&self, city: &str, country: &str) -> Result<PrayerTimes, SourceError> {
        self.get_timings(city, country).await
    }
}
