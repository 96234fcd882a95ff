use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use serde::Serialize;

use crate::config::ClockConfig;

/// Wall-clock reading at a remote city
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    /// Local time formatted as HH:MM
    pub time: String,
    pub local_hour: u32,
    pub is_night: bool,
    pub utc_offset_seconds: i32,
}

/// Derives the local time of a city from its UTC offset alone.
///
/// The host's own timezone is never consulted.
#[derive(Debug, Clone)]
pub struct LocalClock {
    day_start_hour: u32,
    night_start_hour: u32,
}

impl LocalClock {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            day_start_hour: config.day_start_hour,
            night_start_hour: config.night_start_hour,
        }
    }

    pub fn resolve(&self, utc_offset_seconds: i32, now: DateTime<Utc>) -> ClockReading {
        let offset = FixedOffset::east_opt(utc_offset_seconds).unwrap_or_else(|| {
            tracing::warn!(
                utc_offset_seconds,
                "UTC offset out of range, falling back to UTC"
            );
            Utc.fix()
        });

        let local = now.with_timezone(&offset);
        let local_hour = local.hour();

        ClockReading {
            time: local.format("%H:%M").to_string(),
            local_hour,
            is_night: self.is_night_hour(local_hour),
            utc_offset_seconds: offset.local_minus_utc(),
        }
    }

    pub fn is_night_hour(&self, hour: u32) -> bool {
        hour < self.day_start_hour || hour >= self.night_start_hour
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}
