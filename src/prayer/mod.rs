mod models;
mod service;

pub use models::PrayerTimes;
pub use service::PrayerTimesService;
