use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::openapi::swagger_ui;
use crate::presentation::handlers;
use crate::AppState;

/// Build the presentation API routes
fn presentation_routes() -> Router<AppState> {
    Router::new()
        .route("/view", get(handlers::get_view))
        .route("/search", get(handlers::search))
        .route("/search/{city}", post(handlers::search))
        .route("/current", delete(handlers::clear_current))
}

/// Build the calendar API routes
fn calendar_routes() -> Router<AppState> {
    Router::new().route("/calendar", get(handlers::get_calendar))
}

/// Build all API v1 routes
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(presentation_routes())
        .merge(calendar_routes())
}

/// Prometheus text exposition
async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.render()
}

/// Build the complete application router
pub fn build_router() -> Router<AppState> {
    Router::new()
        // Health check at root level
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/metrics", get(metrics))
        // API v1 routes
        .nest("/api/v1", api_v1_routes())
        // Swagger UI for API documentation
        .merge(swagger_ui())
        // The rendering layer polls from a browser
        .layer(CorsLayer::permissive())
}
