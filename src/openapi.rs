use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::calendar::{CalendarDate, CalendarDay};
use crate::error::ErrorResponse;
use crate::presentation::handlers::HealthResponse;

/// OpenAPI documentation for the Weathermood API
///
/// Schema documentation only; path annotations are not generated.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Weathermood API",
        version = "0.1.0",
        description = "Presentation state engine for city weather: current conditions, forecast, air quality, prayer times, mood theme and multi-calendar dates.",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "presentation", description = "Current view, search and clear"),
        (name = "calendar", description = "Gregorian, solar Hijri and lunar Hijri conversion")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            CalendarDate,
            CalendarDay,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schemas_are_registered() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.unwrap().schemas;
        assert!(schemas.contains_key("ErrorResponse"));
        assert!(schemas.contains_key("CalendarDate"));
    }
}
