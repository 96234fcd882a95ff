use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::view::PresentationView;
use crate::aggregator::{AggregatedWeather, SearchError, WeatherAggregator};
use crate::audio::AudioCueManager;
use crate::calendar::CalendarConverter;
use crate::clock::LocalClock;
use crate::slideshow::SlideshowScheduler;
use crate::theme::{ThemeDescriptor, ThemeResolver};

#[derive(Debug, Default)]
struct Current {
    weather: Option<AggregatedWeather>,
    theme: Option<ThemeDescriptor>,
    /// Sequence number of the search or clear that produced this state
    applied_seq: u64,
}

/// Top-level coordinator and the only component the rendering layer touches.
///
/// The slideshow runs exactly while no snapshot is present. Searches are
/// numbered when they start and a result only lands if nothing newer has
/// landed first, so a slow superseded search cannot overwrite a fresher one.
pub struct PresentationStateMachine {
    aggregator: WeatherAggregator,
    audio: AudioCueManager,
    slideshow: SlideshowScheduler,
    themes: ThemeResolver,
    clock: LocalClock,
    calendar: CalendarConverter,
    state: RwLock<Current>,
    next_seq: AtomicU64,
}

impl PresentationStateMachine {
    pub fn new(
        aggregator: WeatherAggregator,
        audio: AudioCueManager,
        slideshow: SlideshowScheduler,
        themes: ThemeResolver,
        clock: LocalClock,
        calendar: CalendarConverter,
    ) -> Self {
        Self {
            aggregator,
            audio,
            slideshow,
            themes,
            clock,
            calendar,
            state: RwLock::new(Current::default()),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Enter the initial no-snapshot state
    pub fn start(&self) {
        self.slideshow.start();
    }

    fn take_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub async fn search(&self, city: &str) -> Result<PresentationView, SearchError> {
        let seq = self.take_seq();

        let weather = match self.aggregator.search(city).await {
            Ok(weather) => weather,
            Err(e) => {
                metrics::counter!("weathermood_searches_total", "outcome" => "failed")
                    .increment(1);
                return Err(e);
            }
        };

        let now = Utc::now();
        let mut state = self.state.write().await;

        if seq <= state.applied_seq {
            metrics::counter!("weathermood_searches_total", "outcome" => "superseded")
                .increment(1);
            tracing::info!(
                city = %weather.snapshot.city,
                seq,
                applied_seq = state.applied_seq,
                "Discarding superseded search result"
            );
            drop(state);
            return Ok(self.view_at(now).await);
        }

        let reading = self.clock.resolve(weather.snapshot.utc_offset_seconds, now);
        let theme = self
            .themes
            .resolve(&weather.snapshot.condition, reading.is_night);

        // Still under the write lock, so cues follow the applied order
        if theme.sound.is_empty() {
            self.audio.stop().await;
        } else {
            self.audio.play_cue(&theme.sound).await;
        }

        tracing::info!(
            city = %weather.snapshot.city,
            condition = %weather.snapshot.condition.as_str(),
            is_night = reading.is_night,
            background = %theme.background,
            seq,
            "Applied search result"
        );

        state.weather = Some(weather);
        state.theme = Some(theme);
        state.applied_seq = seq;
        self.slideshow.stop();
        drop(state);

        metrics::counter!("weathermood_searches_total", "outcome" => "applied").increment(1);
        Ok(self.view_at(now).await)
    }

    /// Drop the current snapshot and return to the slideshow
    pub async fn clear(&self) -> PresentationView {
        let seq = self.take_seq();
        let mut state = self.state.write().await;

        if let Some(previous) = state.weather.take() {
            tracing::info!(city = %previous.snapshot.city, "Cleared current snapshot");
        }
        state.theme = None;
        state.applied_seq = seq;
        self.audio.stop().await;
        self.slideshow.start();
        drop(state);

        self.view().await
    }

    pub async fn view(&self) -> PresentationView {
        self.view_at(Utc::now()).await
    }

    pub async fn view_at(&self, now: DateTime<Utc>) -> PresentationView {
        let state = self.state.read().await;
        let audio = self.audio.current().await;

        let weather = state.weather.clone();
        let clock = weather
            .as_ref()
            .map(|w| self.clock.resolve(w.snapshot.utc_offset_seconds, now));

        // The city's wall date, not the UTC date
        let calendar_instant = clock
            .as_ref()
            .map(|c| now + ChronoDuration::seconds(i64::from(c.utc_offset_seconds)))
            .unwrap_or(now);

        let (snapshot, air_quality, prayer_times, forecast) = match weather {
            Some(w) => (Some(w.snapshot), w.air_quality, w.prayer_times, w.forecast),
            None => (None, None, None, None),
        };

        PresentationView {
            snapshot,
            air_quality,
            prayer_times,
            forecast,
            theme: state.theme.clone(),
            clock,
            calendar: self.calendar.convert(calendar_instant),
            slideshow: self.slideshow.state(),
            audio,
        }
    }

    pub fn calendar(&self) -> &CalendarConverter {
        &self.calendar
    }

    /// Cancel the slideshow timer and silence audio
    pub async fn shutdown(&self) {
        self.slideshow.stop();
        self.audio.stop().await;
        tracing::info!("Presentation state torn down");
    }
}
