use axum::{
    extract::{FromRequestParts, Path, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::ErrorResponse;

/// Query parameters for search requests
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// City name from query string
    pub city: Option<String>,
}

/// Extracts a non-blank city from either the path or the query string
///
/// Checks path first, then falls back to the `city` query parameter.
/// The value is trimmed; a missing or blank city is rejected with 400.
#[derive(Debug)]
pub struct CityParam(pub String);

impl CityParam {
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn non_blank(city: String) -> Option<String> {
    let trimmed = city.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl<S> FromRequestParts<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = CityParamRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Try to extract city from path first
        if let Ok(Path(city)) = Path::<String>::from_request_parts(parts, state).await {
            if let Some(city) = non_blank(city) {
                return Ok(CityParam(city));
            }
        }

        // Fall back to query parameter
        if let Ok(Query(query)) = Query::<SearchQuery>::from_request_parts(parts, state).await {
            if let Some(city) = query.city.and_then(non_blank) {
                return Ok(CityParam(city));
            }
        }

        Err(CityParamRejection(
            "A non-empty city name is required".to_string(),
        ))
    }
}

/// Rejection type for city parameter extraction failures
#[derive(Debug)]
pub struct CityParamRejection(pub String);

impl IntoResponse for CityParamRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::with_code(self.0, "CITY_REQUIRED")),
        )
            .into_response()
    }
}
