mod models;
mod service;

pub use models::{Condition, Coordinates, WeatherSnapshot};
pub use service::WeatherService;
