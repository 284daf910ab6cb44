//! Weekday normalization for partial-week comparisons.
//!
//! Weeks start on Monday. A week in progress is projected to a full-week
//! equivalent before it is compared against a completed week.

use crate::types::WeeklyAssignment;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Share of a typical week elapsed by the end of each weekday, Monday first
const FALLBACK_CURVE: [f64; 7] = [0.2, 0.4, 0.6, 0.8, 1.0, 1.0, 1.0];

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Whole weeks between the weeks containing `from` and `to`
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (week_start(to) - week_start(from)).num_days() / 7
}

/// Fraction f in (0, 1] of a typical week that has elapsed at `now`
///
/// With a schedule, f is the share of weekly assignments falling on or before
/// today's weekday; otherwise a fixed Monday-to-Friday curve is used. A zero
/// share (nothing scheduled yet) counts as a complete week.
pub fn week_completion_fraction(now: DateTime<Utc>, schedule: &[WeeklyAssignment]) -> f64 {
    let today = now.weekday().num_days_from_monday();

    let fraction = if schedule.is_empty() {
        FALLBACK_CURVE[today as usize]
    } else {
        let elapsed = schedule
            .iter()
            .filter(|a| a.day.num_days_from_monday() <= today)
            .count();
        elapsed as f64 / schedule.len() as f64
    };

    if fraction > 0.0 && fraction.is_finite() {
        fraction.min(1.0)
    } else {
        1.0
    }
}

/// A current-week value projected to a full week, next to its comparison week
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NormalizedWeek {
    pub normalized_current: f64,
    pub normalized_comparison: f64,
    pub weekday_factor: f64,
}

/// Project `current` (this week so far) to a full week; `comparison` is a completed week
pub fn normalize_by_weekday(
    current: f64,
    comparison: f64,
    now: DateTime<Utc>,
    schedule: &[WeeklyAssignment],
) -> NormalizedWeek {
    let factor = week_completion_fraction(now, schedule);
    project(current, comparison, factor)
}

pub(crate) fn project(current: f64, comparison: f64, factor: f64) -> NormalizedWeek {
    let normalized_current = if factor > 0.0 {
        current / factor
    } else {
        current
    };
    NormalizedWeek {
        normalized_current,
        normalized_comparison: comparison,
        weekday_factor: factor,
    }
}

#[cfg(test)]
pub(crate) fn assignment(exercise_id: impl Into<String>, day: Weekday) -> WeeklyAssignment {
    WeeklyAssignment {
        exercise_id: exercise_id.into(),
        day,
    }
}
