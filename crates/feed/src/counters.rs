use chrono::{DateTime, Datelike, Utc};
use foundation::time::{DAY_MS, Timestamp, WEEK_MS, YEAR_MS};

use crate::set::RecordSet;

/// Aggregate feed counters shown in the HUD.
///
/// The windows overlap on purpose: a record posted an hour ago counts in
/// all four. `month` is calendar month-and-year equality (UTC), not a
/// rolling 30 days; the rest are rolling windows. Unacknowledged records
/// count nowhere.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StatCounts {
    pub day: u64,
    pub week: u64,
    pub month: u64,
    pub year: u64,
}

/// Recompute all counters from the full set.
///
/// Runs on every record-set change; the set stays small enough that a full
/// scan beats maintaining incremental buckets.
pub fn stat_counts(set: &RecordSet, now: Timestamp) -> StatCounts {
    let mut counts = StatCounts::default();
    let now_dt = DateTime::<Utc>::from_timestamp_millis(now.millis());

    for record in set.records() {
        let Some(at) = record.created_at else {
            continue;
        };
        if at.within(now, DAY_MS) {
            counts.day += 1;
        }
        if at.within(now, WEEK_MS) {
            counts.week += 1;
        }
        if at.within(now, YEAR_MS) {
            counts.year += 1;
        }
        if let (Some(now_dt), Some(at_dt)) =
            (now_dt, DateTime::<Utc>::from_timestamp_millis(at.millis()))
        {
            if at_dt.month() == now_dt.month() && at_dt.year() == now_dt.year() {
                counts.month += 1;
            }
        }
    }

    counts
}
