use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use std::sync::Arc;

use super::models::*;
use crate::api_budget::ApiCallBudget;
use crate::sources::{ForecastSource, SourceError};
use crate::weather::Condition;

const FORECAST_PATH: &str = "/data/2.5/forecast";
const SECONDS_PER_DAY: i64 = 86_400;

/// OpenWeatherMap 5 day / 3 hour forecast client
pub struct ForecastService {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
    budget: Arc<ApiCallBudget>,
}

impl ForecastService {
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

    pub async fn get_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, SourceError> {
        tracing::debug!(city = %city, "Fetching forecast series");
        self.budget.record_call("forecast");

        let response = self
            .client
            .get(format!("{}{}", self.base_url, FORECAST_PATH))
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
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

        let data: ForecastApiResponse = response.json().await?;
        let samples = Self::transform_response(data);

        tracing::debug!(city = %city, samples = samples.len(), "Forecast series fetched");
        Ok(samples)
    }

    fn transform_response(data: ForecastApiResponse) -> Vec<ForecastSample> {
        data.list
            .into_iter()
            .map(|item| {
                let weather = item.weather.first();
                let time_label = item.dt_txt.unwrap_or_else(|| {
                    DateTime::from_timestamp(item.dt, 0)
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_default()
                });

                ForecastSample {
                    timestamp: item.dt,
                    time_label,
                    temperature: item.main.temp,
                    condition: weather
                        .map(|w| Condition::from_main(&w.main))
                        .unwrap_or_else(|| Condition::Other(String::new())),
                    icon: weather.map(|w| w.icon.clone()).unwrap_or_default(),
                }
            })
            .collect()
    }
}

#[async_trait]
impl ForecastSource for ForecastService {
    async fn forecast_series(&self, city: &str) -> Result<Vec<ForecastSample>, SourceError> {
        self.get_forecast(city).await
    }
}

/// Condense a sub-day series to one sample per day taken at `midday_marker`.
///
/// Upstream order is kept; a sample is skipped unless it falls on a later
/// day than the previously kept one, so the result is strictly
/// date-ascending and never longer than `max_days`.
pub fn select_midday(
    samples: &[ForecastSample],
    midday_marker: &str,
    max_days: usize,
) -> Vec<ForecastEntry> {
    let mut entries: Vec<ForecastEntry> = Vec::with_capacity(max_days);

    for sample in samples {
        if entries.len() >= max_days {
            break;
        }
        if !sample.time_label.ends_with(midday_marker) {
            continue;
        }
        let day = sample.timestamp.div_euclid(SECONDS_PER_DAY);
        if let Some(last) = entries.last() {
            if day <= last.timestamp.div_euclid(SECONDS_PER_DAY) {
                continue;
            }
        }
        entries.push(ForecastEntry::from(sample));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_717_200_000; // 2024-06-01 00:00:00 UTC

    fn sample(timestamp: i64) -> ForecastSample {
        let label = DateTime::from_timestamp(timestamp, 0)
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        ForecastSample {
            timestamp,
            time_label: label,
            temperature: 20.0,
            condition: Condition::Clear,
            icon: "01d".to_string(),
        }
    }

    fn three_hourly(days: i64) -> Vec<ForecastSample> {
        (0..days * 8).map(|i| sample(START + i * 3 * 3600)).collect()
    }

    #[test]
    fn test_forty_samples_condense_to_five_middays() {
        let series = three_hourly(5);
        assert_eq!(series.len(), 40);

        let entries = select_midday(&series, "12:00:00", 5);

        assert_eq!(entries.len(), 5);
        for (day, entry) in entries.iter().enumerate() {
            assert_eq!(entry.timestamp, START + day as i64 * SECONDS_PER_DAY + 12 * 3600);
        }
        assert!(entries.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_caps_at_max_days() {
        let entries = select_midday(&three_hourly(7), "12:00:00", 5);
        assert_eq!(entries.len(), 5);
    }

    #[test]
    fn test_partial_first_day_is_skipped_when_midday_passed() {
        // Series starting at 15:00 has no midday sample for the first day
        let series: Vec<_> = three_hourly(5).into_iter().skip(5).collect();
        let entries = select_midday(&series, "12:00:00", 5);

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].timestamp, START + SECONDS_PER_DAY + 12 * 3600);
    }

    #[test]
    fn test_out_of_order_or_duplicate_days_are_dropped() {
        let noon = |day: i64| sample(START + day * SECONDS_PER_DAY + 12 * 3600);
        let series = vec![noon(0), noon(2), noon(1), noon(2), noon(3)];

        let entries = select_midday(&series, "12:00:00", 5);
        let days: Vec<i64> = entries
            .iter()
            .map(|e| (e.timestamp - START) / SECONDS_PER_DAY)
            .collect();
        assert_eq!(days, vec![0, 2, 3]);
    }

    #[test]
    fn test_custom_marker() {
        let entries = select_midday(&three_hourly(3), "15:00:00", 5);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].timestamp, START + 15 * 3600);
    }

    #[test]
    fn test_empty_series() {
        assert!(select_midday(&[], "12:00:00", 5).is_empty());
    }

    #[test]
    fn test_transform_response_falls_back_to_timestamp_label() {
        let data: ForecastApiResponse = serde_json::from_str(
            r#"{"list": [
                {"dt": 1717243200, "main": {"temp": 18.5}, "weather": [{"main": "Rain", "icon": "10d"}], "dt_txt": "2024-06-01 12:00:00"},
                {"dt": 1717329600, "main": {"temp": 21.0}, "weather": [{"main": "Clear", "icon": "01d"}]}
            ]}"#,
        )
        .unwrap();

        let samples = ForecastService::transform_response(data);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].condition, Condition::Rain);
        assert_eq!(samples[1].time_label, "2024-06-02 12:00:00");
        assert_eq!(samples[1].icon, "01d");
    }
}
