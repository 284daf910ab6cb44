//! Period-over-period comparison.
//!
//! Each window covers whole Monday-based weeks ending with the week of `now`
//! and is compared against the window of equal length right before it. Changes
//! use per-record averages, so a week still in progress compares fairly
//! without weekday projection.

use crate::stats::{finite_or_zero, mean, percent_change};
use crate::types::{AnalysisContext, ComparisonPeriod, Entry, PeriodComparison};
use crate::weekday::{week_start, weeks_between};
use tracing::debug;

/// Records needed in each window before a change is reported
const MIN_WINDOW_RECORDS: usize = 2;

/// Days from the first to the last record, rounded up
fn history_days(entries: &[Entry<'_>]) -> i64 {
    match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => {
            let seconds = (last.performed_at() - first.performed_at()).num_seconds();
            (seconds + 86_399) / 86_400
        }
        _ => 0,
    }
}

fn average_volume(window: &[Entry<'_>]) -> f64 {
    let volumes: Vec<f64> = window.iter().map(Entry::volume).collect();
    mean(&volumes)
}

fn average_one_rep_max(window: &[Entry<'_>]) -> f64 {
    let estimates: Vec<f64> = window.iter().map(Entry::estimated_one_rep_max).collect();
    mean(&estimates)
}

fn compare(
    period: ComparisonPeriod,
    entries: &[Entry<'_>],
    history_days: i64,
    ctx: &AnalysisContext<'_>,
) -> PeriodComparison {
    let current_week = week_start(ctx.now.date_naive());
    let weeks = period.weeks();

    let mut current = Vec::new();
    let mut previous = Vec::new();
    for entry in entries {
        // Weeks back from the current one; negative for records after this week
        let age = weeks_between(entry.day(), current_week);
        if (0..weeks).contains(&age) {
            current.push(*entry);
        } else if (weeks..2 * weeks).contains(&age) {
            previous.push(*entry);
        }
    }

    let total_volume: f64 = current.iter().map(Entry::volume).sum();
    let avg_one_rep_max = average_one_rep_max(&current);

    let comparable = history_days >= period.min_history_days()
        && current.len() >= MIN_WINDOW_RECORDS
        && previous.len() >= MIN_WINDOW_RECORDS;

    let (volume_change, strength_change) = if comparable {
        (
            percent_change(average_volume(&previous), average_volume(&current)),
            percent_change(average_one_rep_max(&previous), avg_one_rep_max),
        )
    } else {
        (0.0, 0.0)
    };

    PeriodComparison {
        period,
        workouts: current.len(),
        total_volume,
        avg_one_rep_max,
        volume_change: finite_or_zero(volume_change),
        strength_change: finite_or_zero(strength_change),
        improvement: finite_or_zero((volume_change + strength_change) / 2.0),
        comparable,
    }
}

/// Compare the current week, two weeks, month and three months with the
/// preceding window of each length
///
/// `entries` must be validated and chronologically sorted. An empty history
/// yields an empty list.
pub fn compare_periods(entries: &[Entry<'_>], ctx: &AnalysisContext<'_>) -> Vec<PeriodComparison> {
    if entries.is_empty() {
        return Vec::new();
    }

    let days = history_days(entries);
    let comparisons: Vec<PeriodComparison> = ComparisonPeriod::ALL
        .iter()
        .map(|period| compare(*period, entries, days, ctx))
        .collect();

    debug!(
        "Compared {} periods over {} days of history ({} comparable)",
        comparisons.len(),
        days,
        comparisons.iter().filter(|c| c.comparable).count()
    );
    comparisons
}
