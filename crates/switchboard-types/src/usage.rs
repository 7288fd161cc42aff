//! Usage statistics reported by the tracker.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::provider::DailyLimit;

/// Point-in-time copy of the daily usage counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Calendar date the counters belong to.
    pub date: NaiveDate,
    /// Successful calls per provider today.
    pub usage: BTreeMap<String, u32>,
    /// Configured daily limit per provider.
    pub limits: BTreeMap<String, DailyLimit>,
}

impl UsageSnapshot {
    /// Remaining calls for a provider, `None` when unbounded or unknown.
    pub fn remaining(&self, provider: &str) -> Option<u32> {
        match self.limits.get(provider)? {
            DailyLimit::Bounded(limit) => {
                let used = self.usage.get(provider).copied().unwrap_or(0);
                Some(limit.saturating_sub(used))
            }
            DailyLimit::Unbounded => None,
        }
    }
}
