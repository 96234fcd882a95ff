use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Aladhan `timingsByCity` envelope (internal)
#[derive(Debug, Deserialize)]
pub struct TimingsResponse {
    pub code: u16,
    #[serde(default)]
    pub status: String,
    pub data: Option<TimingsData>,
}

#[derive(Debug, Deserialize)]
pub struct TimingsData {
    pub timings: IndexMap<String, String>,
}

/// Named daily markers (Fajr, Sunrise, Dhuhr, ...) to local "HH:MM" strings,
/// in the order upstream lists them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PrayerTimes(pub IndexMap<String, String>);

impl PrayerTimes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for PrayerTimes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
