use serde::Serialize;

use crate::air_quality::AirQuality;
use crate::audio::AudioHandle;
use crate::calendar::CalendarDate;
use crate::clock::ClockReading;
use crate::forecast::ForecastEntry;
use crate::prayer::PrayerTimes;
use crate::slideshow::SlideshowState;
use crate::theme::ThemeDescriptor;
use crate::weather::WeatherSnapshot;

/// Everything the rendering layer needs to draw one frame.
///
/// Weather-derived fields are absent together while no city is shown; the
/// optional panels are also absent individually when their lookup failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationView {
    pub snapshot: Option<WeatherSnapshot>,
    pub air_quality: Option<AirQuality>,
    pub prayer_times: Option<PrayerTimes>,
    pub forecast: Option<Vec<ForecastEntry>>,
    pub theme: Option<ThemeDescriptor>,
    pub clock: Option<ClockReading>,
    pub calendar: CalendarDate,
    pub slideshow: SlideshowState,
    pub audio: Option<AudioHandle>,
}

