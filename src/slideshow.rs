use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::SlideshowConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlideshowState {
    pub slides: Vec<String>,
    pub current_index: usize,
    pub current: Option<String>,
    pub active: bool,
}

/// Idle-state background rotation.
///
/// Idle holds no timer. Running owns exactly one timer task that advances
/// the index every interval; the task is aborted on `stop` and on drop.
pub struct SlideshowScheduler {
    slides: Arc<Vec<String>>,
    interval: Duration,
    index: Arc<AtomicUsize>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SlideshowScheduler {
    pub fn new(config: &SlideshowConfig) -> Self {
        Self {
            slides: Arc::new(config.slides.clone()),
            interval: Duration::from_millis(config.interval_ms),
            index: Arc::new(AtomicUsize::new(0)),
            task: Mutex::new(None),
        }
    }

    fn task(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Idle -> Running. Does nothing if already running or there is nothing to show.
    pub fn start(&self) {
        let mut task = self.task();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        if self.slides.is_empty() {
            tracing::debug!("Slideshow has no slides, staying idle");
            return;
        }

        let index = Arc::clone(&self.index);
        let len = self.slides.len();
        let period = self.interval;

        *task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                advance(&index, len);
            }
        }));

        tracing::info!(
            slides = len,
            interval_ms = self.interval.as_millis() as u64,
            "Slideshow started"
        );
    }

    /// Running -> Idle. Cancels the timer; the index is kept for the next run.
    pub fn stop(&self) {
        if let Some(handle) = self.task().take() {
            handle.abort();
            tracing::info!("Slideshow stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.task()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Advance by one slide, wrapping to the first. Returns the new index.
    pub fn tick(&self) -> usize {
        advance(&self.index, self.slides.len())
    }

    pub fn current_index(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SlideshowState {
        let current_index = self.current_index();
        SlideshowState {
            slides: self.slides.as_ref().clone(),
            current_index,
            current: self.slides.get(current_index).cloned(),
            active: self.is_active(),
        }
    }
}

impl Drop for SlideshowScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.task().take() {
            handle.abort();
        }
    }
}

fn advance(index: &AtomicUsize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let previous = index
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
        .unwrap_or_default();
    (previous + 1) % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scheduler(slides: usize) -> SlideshowScheduler {
        SlideshowScheduler::new(&SlideshowConfig {
            interval_ms: 3000,
            slides: (0..slides).map(|i| format!("slide-{i}")).collect(),
        })
    }

    #[test]
    fn test_tick_wraps_to_zero() {
        let slideshow = scheduler(3);
        assert_eq!(slideshow.tick(), 1);
        assert_eq!(slideshow.tick(), 2);
        assert_eq!(slideshow.tick(), 0);
        assert_eq!(slideshow.state().current.as_deref(), Some("slide-0"));
    }

    #[test]
    fn test_empty_slideshow_never_runs() {
        let slideshow = scheduler(0);
        assert_eq!(slideshow.tick(), 0);
        let state = slideshow.state();
        assert!(state.current.is_none());
        assert!(!state.active);
    }

    #[tokio::test]
    async fn test_empty_slideshow_start_stays_idle() {
        let slideshow = scheduler(0);
        slideshow.start();
        assert!(!slideshow.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_advances_every_interval() {
        let slideshow = scheduler(4);
        slideshow.start();
        assert!(slideshow.is_active());

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(slideshow.current_index(), 0);

        tokio::time::sleep(Duration::from_millis(6_200)).await;
        assert_eq!(slideshow.current_index(), 3);

        tokio::time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(slideshow.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        let slideshow = scheduler(4);
        slideshow.start();
        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(slideshow.current_index(), 1);

        slideshow.stop();
        assert!(!slideshow.is_active());

        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert_eq!(slideshow.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let slideshow = scheduler(5);
        slideshow.start();
        slideshow.start();

        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(slideshow.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resumes_from_current_index() {
        let slideshow = scheduler(5);
        slideshow.start();
        tokio::time::sleep(Duration::from_millis(6_100)).await;
        slideshow.stop();

        slideshow.start();
        tokio::time::sleep(Duration::from_millis(3_100)).await;
        assert_eq!(slideshow.current_index(), 3);
    }

    proptest! {
        #[test]
        fn test_index_after_n_ticks(slides in 1usize..12, ticks in 0usize..500) {
            let slideshow = scheduler(slides);
            for _ in 0..ticks {
                let index = slideshow.tick();
                prop_assert!(index < slides);
            }
            prop_assert_eq!(slideshow.current_index(), ticks % slides);
        }
    }
}
