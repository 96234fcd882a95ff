use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use super::models::AirPollutionResponse;
use crate::api_budget::ApiCallBudget;
use crate::sources::{AirQualitySource, SourceError};
use crate::weather::Coordinates;

const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

/// OpenWeatherMap air pollution client
pub struct AirQualityService {
    client: Client,
    base_url: String,
    api_key: String,
    budget: Arc<ApiCallBudget>,
}

impl AirQualityService {
    pub fn new(client: Client, base_url: &str, api_key: &str, budget: Arc<ApiCallBudget>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            budget,
        }
    }

    pub async fn get_index(&self, coordinates: Coordinates) -> Result<u8, SourceError> {
        tracing::debug!(lat = %coordinates.lat, lon = %coordinates.lon, "Fetching air quality");
        self.budget.record_call("air_quality");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, AIR_POLLUTION_PATH))
            .query(&[
                ("lat", coordinates.lat.to_string()),
                ("lon", coordinates.lon.to_string()),
                ("appid", self.api_key.clone()),
            ])
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

        let data: AirPollutionResponse = response.json().await?;
        Self::first_index(data)
    }

    fn first_index(data: AirPollutionResponse) -> Result<u8, SourceError> {
        data.list
            .first()
            .map(|item| item.main.aqi)
            .ok_or_else(|| SourceError::InvalidResponse("Empty air pollution list".to_string()))
    }
}

#[async_trait]
impl AirQualitySource for AirQualityService {
    async fn air_quality_index(&self, coordinates: Coordinates) -> Result<u8, SourceError> {
        self.get_index(coordinates).await
    }
}
