use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};

/// Daily OpenWeatherMap call budget, reset at UTC day boundaries.
///
/// Advisory only: going over budget is logged and counted, never refused.
pub struct ApiCallBudget {
    daily_limit: u32,
    calls_today: AtomicU32,
    current_day: AtomicI64,
}

impl ApiCallBudget {
    pub fn new(daily_limit: u32) -> Self {
        Self {
            daily_limit,
            calls_today: AtomicU32::new(0),
            current_day: AtomicI64::new(Self::utc_day_now()),
        }
    }

    /// Record an upstream call made by `source`. Returns `true` if the call was within budget.
    pub fn record_call(&self, source: &'static str) -> bool {
        self.maybe_reset();
        let prev = self.calls_today.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("weathermood_upstream_calls_total", "source" => source).increment(1);

        let within = prev < self.daily_limit;
        if !within {
            metrics::counter!("weathermood_budget_exceeded_total", "source" => source)
                .increment(1);
            tracing::warn!(
                source,
                used = prev + 1,
                limit = self.daily_limit,
                "Daily upstream call budget exceeded"
            );
        }
        within
    }

    pub fn remaining(&self) -> u32 {
        self.maybe_reset();
        let used = self.calls_today.load(Ordering::Relaxed);
        self.daily_limit.saturating_sub(used)
    }

    pub fn used_today(&self) -> u32 {
        self.maybe_reset();
        self.calls_today.load(Ordering::Relaxed)
    }

    /// Reset counter if the UTC day has changed (compare-and-swap).
    fn maybe_reset(&self) {
        let today = Self::utc_day_now();
        let stored = self.current_day.load(Ordering::Relaxed);
        if today != stored
            && self
                .current_day
                .compare_exchange(stored, today, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
        {
            self.calls_today.store(0, Ordering::Relaxed);
        }
    }

    fn utc_day_now() -> i64 {
        chrono::Utc::now().timestamp().div_euclid(86_400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_over_limit_are_reported_but_counted() {
        let budget = ApiCallBudget::new(2);
        assert!(budget.record_call("weather"));
        assert!(budget.record_call("forecast"));
        assert!(!budget.record_call("air_quality"));
        assert_eq!(budget.used_today(), 3);
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_remaining_counts_down() {
        let budget = ApiCallBudget::new(1000);
        assert_eq!(budget.remaining(), 1000);
        budget.record_call("weather");
        assert_eq!(budget.remaining(), 999);
    }
}
