mod models;
mod service;

pub use models::{default_levels, AirQuality, AqiLevel, AqiTable, Severity};
pub use service::AirQualityService;
