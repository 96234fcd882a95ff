use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

use super::models::{Condition, Coordinates, WeatherSnapshot};
use crate::api_budget::ApiCallBudget;
use crate::sources::{CurrentConditionsSource, SourceError};

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Deserialize)]
struct OpenWeatherMapResponse {
    name: String,
    coord: CoordInfo,
    sys: SysInfo,
    main: MainInfo,
    weather: Vec<WeatherInfo>,
    wind: WindInfo,
    /// Shift in seconds from UTC
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct CoordInfo {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct SysInfo {
    #[serde(default)]
    country: String,
    #[serde(default)]
    sunrise: i64,
    #[serde(default)]
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct MainInfo {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct WeatherInfo {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WindInfo {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMapError {
    message: String,
}

/// OpenWeatherMap current-conditions client
pub struct WeatherService {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
    budget: Arc<ApiCallBudget>,
}

impl WeatherService {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: &str,
        units: &str,
        budget: Arc<ApiCallBudget>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            units: units.to_string(),
            budget,
        }
    }

    pub async fn get_weather(&self, city: &str) -> Result<WeatherSnapshot, SourceError> {
        tracing::debug!(city = %city, units = %self.units, "Fetching current conditions");
        self.budget.record_call("weather");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, CURRENT_WEATHER_PATH))
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "Received current conditions response");

        // Any non-success answer means the city could not be resolved
        if !status.is_success() {
            let error: OpenWeatherMapError =
                response.json().await.unwrap_or(OpenWeatherMapError {
                    message: format!("HTTP {}", status),
                });
            tracing::debug!(city = %city, message = %error.message, "Current conditions lookup failed");
            return Err(SourceError::NotFound(city.to_string()));
        }

        let data: OpenWeatherMapResponse = response.json().await?;
        let snapshot = Self::into_snapshot(data)?;

        tracing::info!(
            city = %snapshot.city,
            temp = %snapshot.temperature,
            condition = %snapshot.condition.as_str(),
            "Current conditions fetched"
        );

        Ok(snapshot)
    }

    fn into_snapshot(data: OpenWeatherMapResponse) -> Result<WeatherSnapshot, SourceError> {
        let weather_info = data.weather.into_iter().next().ok_or_else(|| {
            SourceError::InvalidResponse("No weather information available".to_string())
        })?;

        Ok(WeatherSnapshot {
            city: data.name,
            country: data.sys.country,
            coordinates: Coordinates {
                lat: data.coord.lat,
                lon: data.coord.lon,
            },
            condition: Condition::from_main(&weather_info.main),
            temperature: data.main.temp,
            humidity: data.main.humidity.min(100) as u8,
            wind_speed: data.wind.speed,
            utc_offset_seconds: data.timezone,
            sunrise: data.sys.sunrise,
            sunset: data.sys.sunset,
            description: weather_info.description,
            icon: weather_info.icon,
        })
    }
}

#[async_trait]
impl CurrentConditionsSource for WeatherService {
    async fn current_conditions(&self, city: &str) -> Result<WeatherSnapshot, SourceError> {
        self.get_weather(city).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON_RESPONSE: &str = r#"{
        "coord": {"lon": -0.1257, "lat": 51.5085},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "main": {"temp": 14.2, "feels_like": 13.6, "pressure": 1012, "humidity": 72},
        "visibility": 10000,
        "wind": {"speed": 4.6, "deg": 240},
        "dt": 1718035200,
        "sys": {"country": "GB", "sunrise": 1717991000, "sunset": 1718050900},
        "timezone": 3600,
        "name": "London",
        "cod": 200
    }"#;

    #[test]
    fn test_into_snapshot_maps_all_fields() {
        let data: OpenWeatherMapResponse = serde_json::from_str(LONDON_RESPONSE).unwrap();
        let snapshot = WeatherService::into_snapshot(data).unwrap();

        assert_eq!(snapshot.city, "London");
        assert_eq!(snapshot.country, "GB");
        assert_eq!(snapshot.condition, Condition::Clouds);
        assert_eq!(snapshot.temperature, 14.2);
        assert_eq!(snapshot.humidity, 72);
        assert_eq!(snapshot.wind_speed, 4.6);
        assert_eq!(snapshot.utc_offset_seconds, 3600);
        assert_eq!(snapshot.sunrise, 1717991000);
        assert_eq!(snapshot.sunset, 1718050900);
        assert_eq!(snapshot.description, "broken clouds");
        assert_eq!(snapshot.icon, "04d");
        assert_eq!(snapshot.coordinates.lat, 51.5085);
    }

    #[test]
    fn test_into_snapshot_without_weather_is_invalid() {
        let mut value: serde_json::Value = serde_json::from_str(LONDON_RESPONSE).unwrap();
        value["weather"] = serde_json::json!([]);
        let data: OpenWeatherMapResponse = serde_json::from_value(value).unwrap();

        let err = WeatherService::into_snapshot(data).unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
        assert!(err.is_transport());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = WeatherService::new(
            Client::new(),
            "https://api.openweathermap.org/",
            "key",
            "metric",
            Arc::new(ApiCallBudget::new(10)),
        );
        assert_eq!(service.base_url, "https://api.openweathermap.org");
    }
}
