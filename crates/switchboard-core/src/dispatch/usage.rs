//! Daily per-provider usage counters.
//!
//! Counters are keyed by provider name across all capabilities and cleared
//! lazily: callers pass today's date and the tracker resets when it changes.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use switchboard_types::provider::{DailyLimit, ProviderDescriptor};
use switchboard_types::usage::UsageSnapshot;

#[derive(Debug, Clone)]
pub struct UsageTracker {
    counts: HashMap<String, u32>,
    last_reset_date: NaiveDate,
}

impl UsageTracker {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            counts: HashMap::new(),
            last_reset_date: today,
        }
    }

    /// Whether `provider` has budget left today. Always true when unbounded.
    pub fn remaining(&self, provider: &ProviderDescriptor) -> bool {
        provider.daily_limit.allows(self.count(&provider.name))
    }

    /// Count one successful call.
    pub fn record_use(&mut self, name: &str) {
        let count = self.counts.entry(name.to_string()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Clear every counter when `today` differs from the stored date.
    ///
    /// Returns `true` if a reset happened.
    pub fn reset_if_new_day(&mut self, today: NaiveDate) -> bool {
        if today == self.last_reset_date {
            return false;
        }
        self.counts.clear();
        self.last_reset_date = today;
        true
    }

    pub fn count(&self, name: &str) -> u32 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn last_reset_date(&self) -> NaiveDate {
        self.last_reset_date
    }

    pub fn snapshot(&self, limits: BTreeMap<String, DailyLimit>) -> UsageSnapshot {
        UsageSnapshot {
            date: self.last_reset_date,
            usage: self
                .counts
                .iter()
                .map(|(name, count)| (name.clone(), *count))
                .collect(),
            limits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_types::provider::ProviderRoute;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn provider(name: &str, limit: DailyLimit) -> ProviderDescriptor {
        ProviderDescriptor {
            name: name.to_string(),
            route: ProviderRoute::HostedInference {
                url: "https://hf.example/model".into(),
                token_env: None,
            },
            daily_limit: limit,
            quality: Default::default(),
            speed: Default::default(),
        }
    }

    #[test]
    fn test_unbounded_always_remaining() {
        let mut tracker = UsageTracker::new(day(1));
        let flux = provider("Pollinations FLUX", DailyLimit::Unbounded);
        for _ in 0..10_000 {
            tracker.record_use(&flux.name);
        }
        assert!(tracker.remaining(&flux));
        assert_eq!(tracker.count(&flux.name), 10_000);
    }

    #[test]
    fn test_bounded_exhausts_at_limit() {
        let mut tracker = UsageTracker::new(day(1));
        let sdxl = provider("SDXL", DailyLimit::Bounded(3));
        for _ in 0..3 {
            assert!(tracker.remaining(&sdxl));
            tracker.record_use(&sdxl.name);
        }
        assert!(!tracker.remaining(&sdxl));
    }

    #[test]
    fn test_reset_on_new_day() {
        let mut tracker = UsageTracker::new(day(1));
        let sdxl = provider("SDXL", DailyLimit::Bounded(1));
        tracker.record_use(&sdxl.name);
        assert!(!tracker.remaining(&sdxl));

        assert!(!tracker.reset_if_new_day(day(1)));
        assert!(!tracker.remaining(&sdxl));

        assert!(tracker.reset_if_new_day(day(2)));
        assert!(tracker.remaining(&sdxl));
        assert_eq!(tracker.count("SDXL"), 0);
        assert_eq!(tracker.last_reset_date(), day(2));
    }

    #[test]
    fn test_snapshot() {
        let mut tracker = UsageTracker::new(day(5));
        tracker.record_use("SDXL");
        tracker.record_use("SDXL");
        let mut limits = BTreeMap::new();
        limits.insert("SDXL".to_string(), DailyLimit::Bounded(50));

        let snapshot = tracker.snapshot(limits);
        assert_eq!(snapshot.date, day(5));
        assert_eq!(snapshot.usage.get("SDXL"), Some(&2));
        assert_eq!(snapshot.remaining("SDXL"), Some(48));
    }
}
