//! Fatigue and recovery assessment.
//!
//! Compares the last completed week against the week before it. When either
//! week is empty the rolling last-7 and previous-7 days stand in. The fatigue
//! index (0-100) adds up three rule-based factors:
//!
//! | Factor    | Condition                                  | Points |
//! |-----------|--------------------------------------------|--------|
//! | Frequency | more than 5 / more than 3 training days    | 30 / 15 |
//! | Volume    | per-record volume fell more than 15%       | 25     |
//! | Recovery  | trained today / more than 3 days off       | 20 / -10 |
//!
//! Everything else (risk, level, stress factors, recovery time) derives from
//! the index, the volume change and the days since the last record.

use crate::stats::{finite_or_zero, percent_change};
use crate::types::{
    Entry, FatigueAnalysis, FatigueLevel, RiskLevel, StressFactors, Trend, WorkloadTrend,
};
use crate::weekday::week_start;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;
use tracing::debug;

/// Fewer records than this produce a neutral result
pub const MIN_FATIGUE_RECORDS: usize = 7;

const VOLUME_DROP_THRESHOLD: f64 = -15.0;
const WORKLOAD_CHANGE_THRESHOLD: f64 = 10.0;
const STEEP_INCREASE: f64 = 25.0;
const MODERATE_INCREASE: f64 = 15.0;

const MIN_RECOVERY_HOURS: f64 = 8.0;
const MAX_RECOVERY_HOURS: f64 = 72.0;

fn insufficient_data() -> FatigueAnalysis {
    FatigueAnalysis {
        fatigue_index: 0.0,
        fatigue_level: FatigueLevel::VeryLow,
        overreaching_risk: RiskLevel::Low,
        recovery_days: 0,
        volume_drop: false,
        volume_change: 0.0,
        workload_trend: WorkloadTrend::Stable,
        recovery_rate: 0.0,
        recovery_score: 0.0,
        stress_factors: StressFactors::default(),
        predicted_recovery_hours: 0.0,
        fatigue_trend: Trend::Stable,
        load_consistency: 0.0,
        rest_recommendation: "Not enough data for a fatigue analysis".to_string(),
        recommendations: Vec::new(),
    }
}

/// Records whose week starts on `week`
fn in_week<'a>(entries: &[Entry<'a>], week: NaiveDate) -> Vec<Entry<'a>> {
    entries
        .iter()
        .filter(|e| week_start(e.day()) == week)
        .copied()
        .collect()
}

/// Records logged between `from_days` and `to_days` days before `now`
fn in_days_back<'a>(entries: &[Entry<'a>], now: DateTime<Utc>, from_days: i64, to_days: i64) -> Vec<Entry<'a>> {
    let newest = now - Duration::days(from_days);
    let oldest = now - Duration::days(to_days);
    entries
        .iter()
        .filter(|e| e.performed_at() <= newest && e.performed_at() > oldest)
        .copied()
        .collect()
}

fn volume(window: &[Entry<'_>]) -> f64 {
    window.iter().map(Entry::volume).sum()
}

fn per_record(window: &[Entry<'_>]) -> f64 {
    if window.is_empty() {
        0.0
    } else {
        volume(window) / window.len() as f64
    }
}

fn fatigue_index(training_days: usize, volume_drop: bool, recovery_days: i64) -> f64 {
    let frequency = match training_days {
        d if d > 5 => 30.0,
        d if d > 3 => 15.0,
        _ => 0.0,
    };
    let volume = if volume_drop { 25.0 } else { 0.0 };
    let recovery = match recovery_days {
        0 => 20.0,
        d if d > 3 => -10.0,
        _ => 0.0,
    };
    f64::clamp(frequency + volume + recovery, 0.0, 100.0)
}

fn overreaching_risk(index: f64) -> RiskLevel {
    if index > 70.0 {
        RiskLevel::High
    } else if index > 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn fatigue_level(index: f64) -> FatigueLevel {
    match index {
        i if i < 20.0 => FatigueLevel::VeryLow,
        i if i < 40.0 => FatigueLevel::Low,
        i if i < 60.0 => FatigueLevel::Moderate,
        i if i < 80.0 => FatigueLevel::High,
        _ => FatigueLevel::VeryHigh,
    }
}

fn workload_trend(volume_change: f64) -> WorkloadTrend {
    if volume_change > WORKLOAD_CHANGE_THRESHOLD {
        WorkloadTrend::Increasing
    } else if volume_change < -WORKLOAD_CHANGE_THRESHOLD {
        WorkloadTrend::Decreasing
    } else {
        WorkloadTrend::Stable
    }
}

fn stress_factors(weekly_volume: f64, volume_change: f64, training_days: usize, index: f64, recovery_days: i64) -> StressFactors {
    let surge = if volume_change > MODERATE_INCREASE {
        (volume_change - MODERATE_INCREASE) * 2.0
    } else {
        0.0
    };
    let frequency = match training_days {
        0..=2 => 10.0,
        3 => 30.0,
        4 => 50.0,
        5 => 70.0,
        6 => 85.0,
        _ => 100.0,
    };
    let recovery = match recovery_days {
        d if d <= 0 => 80.0,
        1 => 40.0,
        2 => 20.0,
        _ => 10.0,
    };

    StressFactors {
        volume: ((weekly_volume / 1000.0 * 10.0).min(60.0) + surge).clamp(0.0, 100.0),
        frequency,
        intensity: index,
        recovery,
    }
}

/// Rising load reads as progress while fatigue is low and rest is recent
fn fatigue_trend(volume_change: f64, index: f64, recovery_days: i64) -> Trend {
    if volume_change > STEEP_INCREASE {
        Trend::Declining
    } else if volume_change > MODERATE_INCREASE {
        if index < 50.0 && recovery_days <= 2 {
            Trend::Improving
        } else {
            Trend::Declining
        }
    } else if volume_change < -MODERATE_INCREASE {
        Trend::Improving
    } else {
        Trend::Stable
    }
}

fn rest_recommendation(index: f64, recovery_days: i64) -> String {
    let text = if index > 70.0 {
        "Take 2-3 days of active rest"
    } else if index > 40.0 {
        "Lower the intensity of your next session"
    } else if recovery_days > 4 {
        "Ease back into training gradually"
    } else {
        "Continue your normal routine"
    };
    text.to_string()
}

fn recommendations(index: f64, recovery_days: i64, volume_drop: bool) -> Vec<String> {
    let mut out: Vec<&str> = Vec::new();
    if index > 70.0 {
        out.push("Rest completely for 2-3 days");
        out.push("Focus on hydration and nutrition");
    } else if index > 50.0 {
        out.push("Cut next session's intensity by 20-30%");
        out.push("Add 10-15 minutes of stretching after training");
    } else if index > 30.0 {
        out.push("Keep the intensity but watch for signs of fatigue");
        out.push("Prioritize 7-9 hours of sleep");
    } else {
        out.push("Recovery looks good: hold or increase the load");
    }

    if recovery_days > 5 {
        out.push("Restart at 60-70% of your usual intensity");
    } else if recovery_days == 0 {
        out.push("Plan at least one rest day per week");
    }
    if volume_drop {
        out.push("Volume dropped: check sleep, stress and nutrition");
    }
    out.into_iter().map(String::from).collect()
}

/// Fatigue and recovery from the two most recent weeks of training
///
/// `entries` must be validated and chronologically sorted.
pub fn analyze_fatigue(entries: &[Entry<'_>], now: DateTime<Utc>) -> FatigueAnalysis {
    let Some(last) = entries.last() else {
        return insufficient_data();
    };
    if entries.len() < MIN_FATIGUE_RECORDS {
        debug!("Fatigue analysis skipped: {} records", entries.len());
        return insufficient_data();
    }

    let last_week = week_start(now.date_naive()) - Duration::days(7);
    let mut recent = in_week(entries, last_week);
    let mut older = in_week(entries, last_week - Duration::days(7));
    if recent.is_empty() {
        recent = in_days_back(entries, now, 0, 7);
    }
    if older.is_empty() {
        older = in_days_back(entries, now, 7, 14);
    }

    let volume_change = finite_or_zero(percent_change(per_record(&older), per_record(&recent)));
    let volume_drop = volume_change < VOLUME_DROP_THRESHOLD;
    let recovery_days = (now - last.performed_at()).num_days().max(0);
    let training_days = recent.iter().map(Entry::day).collect::<BTreeSet<_>>().len();

    let index = fatigue_index(training_days, volume_drop, recovery_days);
    let rest_penalty = if recovery_days > 2 {
        (recovery_days - 2) as f64 * 5.0
    } else {
        0.0
    };
    let same_day_hours = if recovery_days == 0 { 12.0 } else { 0.0 };

    let analysis = FatigueAnalysis {
        fatigue_index: index,
        fatigue_level: fatigue_level(index),
        overreaching_risk: overreaching_risk(index),
        recovery_days,
        volume_drop,
        volume_change,
        workload_trend: workload_trend(volume_change),
        recovery_rate: (100.0 - index * 0.8).clamp(0.0, 100.0),
        recovery_score: (100.0 - index * 0.6 - rest_penalty).clamp(0.0, 100.0),
        stress_factors: stress_factors(volume(&recent), volume_change, training_days, index, recovery_days),
        predicted_recovery_hours: (index / 100.0 * 48.0 + same_day_hours)
            .clamp(MIN_RECOVERY_HOURS, MAX_RECOVERY_HOURS)
            .round(),
        fatigue_trend: fatigue_trend(volume_change, index, recovery_days),
        load_consistency: (100.0 - volume_change.abs()).clamp(0.0, 100.0),
        rest_recommendation: rest_recommendation(index, recovery_days),
        recommendations: recommendations(index, recovery_days, volume_drop),
    };

    debug!(
        "Fatigue index {:.0} from {} training days, {:+.1}% volume, {} rest days",
        index, training_days, volume_change, recovery_days
    );
    analysis
}
