mod aggregator;
mod air_quality;
mod api_budget;
mod audio;
mod calendar;
mod clock;
mod config;
mod error;
mod extractors;
mod forecast;
mod openapi;
mod prayer;
mod presentation;
mod routes;
mod slideshow;
mod sources;
mod theme;
mod weather;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::aggregator::{AggregatorSettings, Sources, WeatherAggregator};
use crate::air_quality::{AirQualityService, AqiTable};
use crate::api_budget::ApiCallBudget;
use crate::audio::{AudioCueManager, AudioEvent, BroadcastAudioBackend};
use crate::calendar::CalendarConverter;
use crate::clock::LocalClock;
use crate::config::AppConfig;
use crate::forecast::ForecastService;
use crate::prayer::PrayerTimesService;
use crate::presentation::PresentationStateMachine;
use crate::routes::build_router;
use crate::slideshow::SlideshowScheduler;
use crate::theme::ThemeResolver;
use crate::weather::WeatherService;

/// Shared HTTP client configuration
const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const AUDIO_CHANNEL_CAPACITY: usize = 32;

#[derive(Clone)]
pub struct AppState {
    pub presentation: Arc<PresentationStateMachine>,
    pub budget: Arc<ApiCallBudget>,
    pub metrics: PrometheusHandle,
}

/// Create shared HTTP client with connection pooling
fn create_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Wire the four upstream services into the aggregator
fn create_aggregator(
    config: &AppConfig,
    http_client: &Client,
    budget: &Arc<ApiCallBudget>,
) -> WeatherAggregator {
    let sources = Sources {
        current: Arc::new(WeatherService::new(
            http_client.clone(),
            &config.openweathermap_base_url,
            &config.openweathermap_api_key,
            &config.units,
            Arc::clone(budget),
        )),
        air_quality: Arc::new(AirQualityService::new(
            http_client.clone(),
            &config.openweathermap_base_url,
            &config.openweathermap_api_key,
            Arc::clone(budget),
        )),
        forecast: Arc::new(ForecastService::new(
            http_client.clone(),
            &config.openweathermap_base_url,
            &config.openweathermap_api_key,
            &config.units,
            Arc::clone(budget),
        )),
        prayer_times: Arc::new(PrayerTimesService::new(
            http_client.clone(),
            &config.prayer_times_base_url,
        )),
    };

    WeatherAggregator::new(
        sources,
        AggregatorSettings {
            midday_marker: config.forecast.midday_marker.clone(),
            max_days: config.forecast.max_days,
            secondary_timeout: Duration::from_secs(config.secondary_timeout_secs),
            aqi_table: AqiTable::new(config.air_quality.levels.clone()),
        },
    )
}

/// Log audio commands; stands in for a rendering layer attached to the channel
fn spawn_audio_logger(backend: &BroadcastAudioBackend) {
    let mut rx = backend.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(AudioEvent::Started(handle)) => {
                    tracing::info!(cue = %handle.cue, volume = handle.volume, id = %handle.id, "Audio started")
                }
                Ok(AudioEvent::Stopped(handle)) => {
                    tracing::info!(cue = %handle.cue, id = %handle.id, "Audio stopped")
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Audio logger lagged behind")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weathermood=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    let metrics = PrometheusBuilder::new().install_recorder()?;

    // Create shared HTTP client with connection pooling
    let http_client = create_http_client()?;
    tracing::debug!("Shared HTTP client created");

    let budget = Arc::new(ApiCallBudget::new(config.daily_call_budget));
    let aggregator = create_aggregator(&config, &http_client, &budget);

    let audio_backend = Arc::new(BroadcastAudioBackend::new(AUDIO_CHANNEL_CAPACITY));
    spawn_audio_logger(&audio_backend);

    let presentation = Arc::new(PresentationStateMachine::new(
        aggregator,
        AudioCueManager::new(audio_backend, config.audio.volume),
        SlideshowScheduler::new(&config.slideshow),
        ThemeResolver::new(&config.theme),
        LocalClock::new(&config.clock),
        CalendarConverter::new(config.calendar.locale),
    ));
    presentation.start();

    // Create shared application state
    let state = AppState {
        presentation: Arc::clone(&presentation),
        budget,
        metrics,
    };

    let app = build_router()
        .layer(
            ServiceBuilder::new()
                // Handle timeout errors
                .layer(HandleErrorLayer::new(handle_timeout_error))
                // Covers the primary lookup plus the bounded secondaries
                .timeout(Duration::from_secs(60)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    presentation.shutdown().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}
