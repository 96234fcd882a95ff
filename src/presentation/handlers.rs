use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::view::PresentationView;
use crate::aggregator::SearchError;
use crate::calendar::{CalendarConverter, CalendarDate, Locale};
use crate::error::HttpError;
use crate::extractors::CityParam;
use crate::impl_into_response;
use crate::AppState;

/// Gregorian years the calendar conversion is documented for
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1800..=2400;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// OpenWeatherMap calls made since the last UTC midnight
    pub upstream_calls_today: u32,
    pub upstream_calls_remaining: u32,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// Unix timestamp in seconds; defaults to now
    pub timestamp: Option<i64>,
    /// Name table: en or fa
    pub locale: Option<String>,
}

#[derive(Error, Debug)]
pub enum CalendarQueryError {
    #[error("Timestamp {0} is outside the supported range (years 1800 to 2400)")]
    OutOfRange(i64),
}

impl HttpError for CalendarQueryError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_code(&self) -> Option<&'static str> {
        Some("TIMESTAMP_OUT_OF_RANGE")
    }
}

impl_into_response!(CalendarQueryError);

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        upstream_calls_today: state.budget.used_today(),
        upstream_calls_remaining: state.budget.remaining(),
    })
}

/// Current derived view
///
/// GET /api/v1/view
pub async fn get_view(State(state): State<AppState>) -> Json<PresentationView> {
    Json(state.presentation.view().await)
}

/// Search for a city and make it current on success
///
/// GET /api/v1/search?city=London
/// POST /api/v1/search/{city}
pub async fn search(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<PresentationView>, SearchError> {
    let view = state.presentation.search(&city.into_inner()).await?;
    Ok(Json(view))
}

/// Drop the current city and resume the slideshow
///
/// DELETE /api/v1/current
pub async fn clear_current(State(state): State<AppState>) -> Json<PresentationView> {
    Json(state.presentation.clear().await)
}

/// Convert an instant to all three calendars
///
/// GET /api/v1/calendar?timestamp=1710892800&locale=fa
pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarDate>, CalendarQueryError> {
    let date = convert_query(state.presentation.calendar(), &query, Utc::now())?;
    Ok(Json(date))
}

fn convert_query(
    converter: &CalendarConverter,
    query: &CalendarQuery,
    now: DateTime<Utc>,
) -> Result<CalendarDate, CalendarQueryError> {
    let instant = match query.timestamp {
        Some(ts) => DateTime::<Utc>::from_timestamp(ts, 0)
            .filter(|dt| SUPPORTED_YEARS.contains(&dt.year()))
            .ok_or(CalendarQueryError::OutOfRange(ts))?,
        None => now,
    };

    let locale = query
        .locale
        .as_deref()
        .map(Locale::from_tag)
        .unwrap_or_else(|| converter.default_locale());

    Ok(converter.convert_all(instant, locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use chrono::TimeZone;

    fn timestamp(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap().timestamp()
    }

    fn query(timestamp: Option<i64>, locale: Option<&str>) -> CalendarQuery {
        CalendarQuery {
            timestamp,
            locale: locale.map(String::from),
        }
    }

    #[test]
    fn test_supported_range_edges() {
        let converter = CalendarConverter::new(Locale::En);
        let now = Utc::now();

        for (y, m, d) in [(1800, 1, 1), (2400, 12, 31)] {
            let date = convert_query(&converter, &query(Some(timestamp(y, m, d)), None), now).unwrap();
            assert_eq!(date.gregorian.year, i64::from(y));
        }

        for (y, m, d) in [(1799, 12, 31), (2401, 1, 1)] {
            let ts = timestamp(y, m, d);
            let err = convert_query(&converter, &query(Some(ts), None), now).unwrap_err();
            assert!(matches!(err, CalendarQueryError::OutOfRange(t) if t == ts));
        }
    }

    #[test]
    fn test_unrepresentable_timestamp_is_out_of_range() {
        let converter = CalendarConverter::default();
        let err = convert_query(&converter, &query(Some(i64::MAX), None), Utc::now()).unwrap_err();
        assert_eq!(err.error_code(), Some("TIMESTAMP_OUT_OF_RANGE"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_configured_locale_applies_without_query_locale() {
        let converter = CalendarConverter::new(Locale::Fa);
        let nowruz = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();

        let default = convert_query(&converter, &query(None, None), nowruz).unwrap();
        assert_eq!(default, converter.convert_all(nowruz, Locale::Fa));
        assert_eq!(default.solar_hijri.year, 1403);

        let english = convert_query(&converter, &query(None, Some("en")), nowruz).unwrap();
        assert_eq!(english, converter.convert_all(nowruz, Locale::En));
        assert_ne!(english.weekday, default.weekday);
    }
}
