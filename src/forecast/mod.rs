mod models;
mod service;

pub use models::{ForecastEntry, ForecastSample};
pub use service::{select_midday, ForecastService};
