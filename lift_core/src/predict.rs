//! Short-horizon progress prediction.
//!
//! Records from the most recent weeks are bucketed by calendar week, and an
//! ordinary-least-squares slope is fitted over weekly volume and weekly average
//! estimated 1RM. Everything is extrapolated linearly and clamped to ranges a
//! lifter can plausibly reach.

use crate::stats::{finite_or_zero, mean, ols_slope, percent_change};
use crate::types::{
    AnalysisContext, Entry, ExperienceLevel, PredictedPr, PredictionTrend, ProgressPrediction,
};
use crate::weekday::{project, week_completion_fraction, week_start, weeks_between};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Series with a mean below this are treated as weights rather than volumes
const WEIGHT_LIKE_MEAN: f64 = 500.0;
const MAX_WEIGHT_SLOPE: f64 = 2.5;
const MAX_VOLUME_SLOPE_SHARE: f64 = 0.2;

const WEEKS_PER_MONTH: f64 = 52.0 / 12.0;
const PR_HORIZON_WEEKS: f64 = 4.0;
const MAX_PR_GAIN: f64 = 1.3;
const PR_CONFIDENCE_SHARE: f64 = 0.8;

const MIN_WEEKS_TO_PR: f64 = 2.0;
const MAX_WEEKS_TO_PR: f64 = 12.0;

#[derive(Clone, Copy, Debug, Default)]
struct WeekBucket {
    volume: f64,
    one_rep_max_sum: f64,
    max_one_rep_max: f64,
    count: usize,
}

impl WeekBucket {
    fn average_one_rep_max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.one_rep_max_sum / self.count as f64
        }
    }
}

fn insufficient_data() -> ProgressPrediction {
    ProgressPrediction {
        next_week_volume: 0.0,
        next_week_weight: 0.0,
        monthly_growth_rate: 0.0,
        predicted_pr: PredictedPr::default(),
        plateau_risk: 0.0,
        trend: PredictionTrend::InsufficientData,
        weeks_to_next_pr: 0.0,
        confidence: 0.0,
        volume_trend: 0.0,
        strength_trend: 0.0,
        experience_level: None,
        recommendations: vec![
            "Log more sessions for an accurate forecast".to_string(),
            "Keep training consistently".to_string(),
        ],
    }
}

fn span_days(entries: &[Entry<'_>]) -> f64 {
    match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => {
            (last.performed_at() - first.performed_at()).num_seconds() as f64 / 86_400.0
        }
        _ => 0.0,
    }
}

/// Experience from average volume per record and records per week
pub fn experience_level(entries: &[Entry<'_>]) -> ExperienceLevel {
    let volumes: Vec<f64> = entries.iter().map(Entry::volume).collect();
    let average_volume = mean(&volumes);
    let per_week = entries.len() as f64 / (span_days(entries) / 7.0).max(1.0);

    if average_volume > 2000.0 && per_week > 3.0 {
        ExperienceLevel::Advanced
    } else if average_volume > 1000.0 && per_week > 2.0 {
        ExperienceLevel::Intermediate
    } else {
        ExperienceLevel::Beginner
    }
}

fn clamp_slope(slope: f64, series: &[f64]) -> f64 {
    let series_mean = mean(series);
    let limit = if series_mean < WEIGHT_LIKE_MEAN {
        MAX_WEIGHT_SLOPE
    } else {
        series_mean.abs() * MAX_VOLUME_SLOPE_SHARE
    };
    finite_or_zero(slope).clamp(-limit, limit)
}

fn classify(strength: f64, volume: f64, strength_threshold: f64, volume_threshold: f64) -> PredictionTrend {
    let strength_up = strength > strength_threshold;
    let volume_up = volume > volume_threshold;
    let strength_down = strength < -strength_threshold;
    let volume_down = volume < -volume_threshold;

    if strength_up && volume_up {
        PredictionTrend::Improving
    } else if strength_down && volume_down {
        PredictionTrend::Declining
    } else if strength.abs() < strength_threshold && volume.abs() < volume_threshold {
        PredictionTrend::Stable
    } else if strength_up || volume_up {
        PredictionTrend::Improving
    } else if strength_down || volume_down {
        PredictionTrend::Declining
    } else {
        PredictionTrend::Stable
    }
}

fn confidence(level: ExperienceLevel, weeks: usize, records: usize) -> f64 {
    let experience = match level {
        ExperienceLevel::Beginner => 60.0,
        ExperienceLevel::Intermediate => 70.0,
        ExperienceLevel::Advanced => 80.0,
    };
    let weekly = (weeks as f64 / 12.0).min(1.0) * 100.0;
    let volume = (records as f64 / 50.0).min(1.0) * 100.0;
    (0.5 * experience + 0.3 * weekly + 0.2 * volume).clamp(0.0, 100.0)
}

/// Weight change (%) between the count-split halves of the record list
fn overall_progress(entries: &[Entry<'_>]) -> f64 {
    let (first, second) = entries.split_at(entries.len() / 2);
    let weights = |half: &[Entry<'_>]| -> Vec<f64> { half.iter().map(Entry::weight).collect() };
    percent_change(mean(&weights(first)), mean(&weights(second)))
}

fn plateau_risk(level: ExperienceLevel, overall_progress: f64, strength_slope: f64, history_weeks: f64) -> f64 {
    let mut risk: f64 = match level {
        ExperienceLevel::Beginner => 10.0,
        ExperienceLevel::Intermediate => 30.0,
        ExperienceLevel::Advanced => 50.0,
    };

    if overall_progress < 5.0 {
        risk += 20.0;
    } else if overall_progress < 10.0 {
        risk += 10.0;
    }

    if strength_slope < 0.0 {
        risk += 15.0;
    } else if strength_slope < 0.5 {
        risk += 5.0;
    }

    if history_weeks > 52.0 {
        risk += 10.0;
    } else if history_weeks > 26.0 {
        risk += 5.0;
    }

    risk.clamp(0.0, 100.0)
}

fn recommendations(trend: PredictionTrend, weeks: usize, risk: f64) -> Vec<String> {
    let mut out = Vec::new();
    match trend {
        PredictionTrend::Improving => {
            out.push("Great progress, keep your training consistent".to_string());
            out.push("Consider raising the intensity gradually".to_string());
        }
        PredictionTrend::Stable => {
            out.push("Progress is steady; check whether you need a new challenge".to_string());
            if risk > 50.0 {
                out.push("Plateau risk detected: vary your routine".to_string());
            }
        }
        PredictionTrend::Declining => {
            out.push("Review your routine and recovery".to_string());
            out.push("Consider reducing volume for a while".to_string());
        }
        PredictionTrend::InsufficientData => {}
    }

    if weeks < 4 {
        out.push("More weeks of data will improve the predictions".to_string());
    }
    if risk > 70.0 {
        out.push("High plateau risk: change your routine".to_string());
    }
    out
}

/// Best estimated 1RM, preferring the latest fully completed week
fn current_best(buckets: &BTreeMap<NaiveDate, WeekBucket>, entries: &[Entry<'_>], current_week: NaiveDate) -> f64 {
    let last_complete = current_week - Duration::days(7);
    if let Some(bucket) = buckets.get(&last_complete) {
        if bucket.max_one_rep_max > 0.0 {
            return bucket.max_one_rep_max;
        }
    }
    entries
        .iter()
        .map(Entry::estimated_one_rep_max)
        .fold(0.0, f64::max)
}

/// Forecast next week's volume and strength, the next PR and plateau risk
///
/// `entries` must be validated and chronologically sorted. Histories shorter
/// than the configured minimum produce a neutral insufficient-data result.
pub fn predict_progress(entries: &[Entry<'_>], ctx: &AnalysisContext<'_>) -> ProgressPrediction {
    let settings = &ctx.config.prediction;
    let days = span_days(entries);
    if entries.len() < settings.min_records || days < settings.min_days as f64 {
        debug!(
            "Prediction skipped: {} records over {:.1} days",
            entries.len(),
            days
        );
        return insufficient_data();
    }

    let current_week = week_start(ctx.now.date_naive());
    let window_start = current_week - Duration::days(7 * (settings.window_weeks - 1).max(0));

    let mut buckets: BTreeMap<NaiveDate, WeekBucket> = BTreeMap::new();
    for entry in entries {
        let week = week_start(entry.day());
        if week < window_start || week > current_week {
            continue;
        }
        let one_rep_max = entry.estimated_one_rep_max();
        let bucket = buckets.entry(week).or_default();
        bucket.volume += entry.volume();
        bucket.one_rep_max_sum += one_rep_max;
        bucket.max_one_rep_max = bucket.max_one_rep_max.max(one_rep_max);
        bucket.count += 1;
    }

    // The week in progress is projected to a full week before fitting
    let fraction = week_completion_fraction(ctx.now, ctx.schedule);
    let Some(&first_week) = buckets.keys().next() else {
        return insufficient_data();
    };
    let xs: Vec<f64> = buckets
        .keys()
        .map(|week| weeks_between(first_week, *week) as f64)
        .collect();
    let volumes: Vec<f64> = buckets
        .iter()
        .map(|(week, bucket)| {
            if *week == current_week {
                project(bucket.volume, 0.0, fraction).normalized_current
            } else {
                bucket.volume
            }
        })
        .collect();
    let strengths: Vec<f64> = buckets.values().map(WeekBucket::average_one_rep_max).collect();

    let volume_slope = clamp_slope(ols_slope(&xs, &volumes), &volumes);
    let strength_slope = clamp_slope(ols_slope(&xs, &strengths), &strengths);

    let level = experience_level(entries);
    let trend = classify(
        strength_slope,
        volume_slope,
        settings.strength_trend_threshold,
        settings.volume_trend_threshold,
    );
    let confidence = confidence(level, buckets.len(), entries.len());

    let best = current_best(&buckets, entries, current_week);
    let predicted_pr = PredictedPr {
        weight: (best + strength_slope * PR_HORIZON_WEEKS).clamp(0.0, best * MAX_PR_GAIN),
        confidence: (PR_CONFIDENCE_SHARE * confidence / 100.0).clamp(0.0, 1.0),
    };
    let weeks_to_next_pr = if strength_slope > 0.0 {
        (8.0 - 2.0 * strength_slope).clamp(MIN_WEEKS_TO_PR, MAX_WEEKS_TO_PR)
    } else {
        MAX_WEEKS_TO_PR
    };

    let history_weeks = days / 7.0;
    let plateau_risk = plateau_risk(level, overall_progress(entries), strength_slope, history_weeks);

    let prediction = ProgressPrediction {
        next_week_volume: (volumes.last().copied().unwrap_or(0.0) + volume_slope).max(0.0),
        next_week_weight: (strengths.last().copied().unwrap_or(0.0) + strength_slope).max(0.0),
        monthly_growth_rate: strength_slope * WEEKS_PER_MONTH,
        predicted_pr,
        plateau_risk,
        trend,
        weeks_to_next_pr,
        confidence,
        volume_trend: volume_slope,
        strength_trend: strength_slope,
        experience_level: Some(level),
        recommendations: recommendations(trend, buckets.len(), plateau_risk),
    };

    debug!(
        "Prediction over {} weeks: trend {:?}, strength slope {:.2}, volume slope {:.1}",
        buckets.len(),
        prediction.trend,
        strength_slope,
        volume_slope
    );
    prediction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::config::AnalysisConfig;
    use crate::types::{TrainingHistory, WeeklyAssignment, WorkoutRecord};
    use crate::validate::validate_records;
    use crate::weekday::assignment;
    use chrono::{DateTime, TimeZone, Utc, Weekday};
    use uuid::Uuid;

    // 2024-01-01 is a Monday
    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn record(exercise_id: &str, weight: f64, reps: u32, sets: u32, when: DateTime<Utc>) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            weight,
            reps,
            sets,
            performed_at: when,
            set_overrides: vec![],
        }
    }

    /// Two bench sessions a week (Monday, Thursday) for `weeks` weeks
    fn bench_weeks(weeks: i64, weight_for_week: impl Fn(i64) -> f64) -> Vec<WorkoutRecord> {
        (0..weeks)
            .flat_map(|week| {
                let weight = weight_for_week(week);
                [0, 3].map(|day| record("bench_press", weight, 5, 3, start() + Duration::days(week * 7 + day)))
            })
            .collect()
    }

    fn predict(records: &[WorkoutRecord], now: DateTime<Utc>) -> ProgressPrediction {
        predict_with_schedule(records, now, &[])
    }

    fn predict_with_schedule(
        records: &[WorkoutRecord],
        now: DateTime<Utc>,
        schedule: &[WeeklyAssignment],
    ) -> ProgressPrediction {
        let config = AnalysisConfig::default();
        let catalog = build_default_catalog();
        let history = TrainingHistory::new(records, &catalog, now).with_schedule(schedule);
        let entries = validate_records(&history);
        let ctx = AnalysisContext {
            config: &config,
            now,
            schedule,
        };
        predict_progress(&entries, &ctx)
    }

    fn assert_all_finite(p: &ProgressPrediction) {
        for value in [
            p.next_week_volume,
            p.next_week_weight,
            p.monthly_growth_rate,
            p.predicted_pr.weight,
            p.predicted_pr.confidence,
            p.plateau_risk,
            p.weeks_to_next_pr,
            p.confidence,
            p.volume_trend,
            p.strength_trend,
        ] {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn test_empty_is_insufficient_data() {
        let p = predict(&[], start());
        assert_eq!(p.trend, PredictionTrend::InsufficientData);
        assert_eq!(p.next_week_volume, 0.0);
        assert_eq!(p.predicted_pr, PredictedPr::default());
        assert_eq!(p.confidence, 0.0);
        assert_eq!(p.experience_level, None);
        assert_all_finite(&p);
    }

    #[test]
    fn test_too_few_records_or_days() {
        // Five records over four weeks
        let records: Vec<_> = (0..5)
            .map(|i| record("bench_press", 60.0, 5, 3, start() + Duration::days(i * 7)))
            .collect();
        assert_eq!(predict(&records, start() + Duration::days(35)).trend, PredictionTrend::InsufficientData);

        // Ten records within one week
        let records: Vec<_> = (0..10)
            .map(|i| record("bench_press", 60.0, 5, 3, start() + Duration::hours(i * 12)))
            .collect();
        assert_eq!(predict(&records, start() + Duration::days(7)).trend, PredictionTrend::InsufficientData);
    }

    #[test]
    fn test_steady_progress_is_improving() {
        let records = bench_weeks(8, |week| 60.0 + 2.5 * week as f64);
        let p = predict(&records, start() + Duration::days(56));

        assert_eq!(p.trend, PredictionTrend::Improving);
        // 1RM slope 2.81 kg/week is capped for weight-like series
        assert_eq!(p.strength_trend, MAX_WEIGHT_SLOPE);
        assert!((p.volume_trend - 75.0).abs() < 1e-6, "{}", p.volume_trend);
        assert!((p.monthly_growth_rate - 2.5 * 52.0 / 12.0).abs() < 1e-9);
        assert_eq!(p.weeks_to_next_pr, 3.0);
        // 1031 kg average volume at a little over two records a week
        assert_eq!(p.experience_level, Some(ExperienceLevel::Intermediate));

        let best = estimate(77.5);
        assert!((p.predicted_pr.weight - (best + 10.0)).abs() < 1e-6);
        assert!(p.predicted_pr.weight <= best * MAX_PR_GAIN);
        assert!(p.predicted_pr.confidence > 0.0 && p.predicted_pr.confidence <= 1.0);
        assert_all_finite(&p);
    }

    fn estimate(weight: f64) -> f64 {
        crate::strength::estimate_one_rep_max(weight, 5)
    }

    #[test]
    fn test_flat_history_is_stable() {
        let records = bench_weeks(8, |_| 60.0);
        let p = predict(&records, start() + Duration::days(56));

        assert_eq!(p.trend, PredictionTrend::Stable);
        assert_eq!(p.strength_trend, 0.0);
        assert_eq!(p.weeks_to_next_pr, MAX_WEEKS_TO_PR);
        // beginner 10, no overall progress 20, flat slope 5
        assert_eq!(p.plateau_risk, 35.0);
        // 0.5*60 + 0.3*(8/12)*100 + 0.2*(16/50)*100
        assert!((p.confidence - 56.4).abs() < 1e-9, "{}", p.confidence);
        assert!((p.next_week_volume - 1800.0).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_sets_current_week_projection() {
        // Eight flat weeks, then this Monday's session logged by the evening
        let mut records = bench_weeks(8, |_| 60.0);
        records.push(record("bench_press", 60.0, 5, 3, start() + Duration::days(56)));
        let now = start() + Duration::days(56) + Duration::hours(8);

        // Mondays and Thursdays: half the week is done, 900 projects to 1800
        let schedule = [
            assignment("bench_press", Weekday::Mon),
            assignment("bench_press", Weekday::Thu),
        ];
        let scheduled = predict_with_schedule(&records, now, &schedule);
        assert_eq!(scheduled.volume_trend, 0.0);
        assert!((scheduled.next_week_volume - 1800.0).abs() < 1e-9);

        // The Monday fallback share of 0.2 inflates the same session to 4500
        let fallback = predict(&records, now);
        assert!(fallback.volume_trend > 0.0);
        assert!(fallback.next_week_volume > 4500.0);
    }

    #[test]
    fn test_declining_history() {
        let records = bench_weeks(8, |week| 100.0 - 5.0 * week as f64);
        let p = predict(&records, start() + Duration::days(56));

        assert_eq!(p.trend, PredictionTrend::Declining);
        assert!(p.strength_trend < 0.0);
        assert_eq!(p.weeks_to_next_pr, MAX_WEEKS_TO_PR);
        assert!(p.plateau_risk >= 45.0);
        assert!(p.recommendations.iter().any(|r| r.contains("recovery")));
    }

    #[test]
    fn test_old_weeks_fall_outside_window() {
        // Sessions 30 weeks back are still counted for eligibility but not fitted
        let mut records = bench_weeks(2, |_| 40.0);
        records.extend(
            bench_weeks(4, |_| 80.0)
                .into_iter()
                .map(|mut r| {
                    r.performed_at = r.performed_at + Duration::weeks(30);
                    r
                }),
        );
        let p = predict(&records, start() + Duration::weeks(34));
        assert_eq!(p.strength_trend, 0.0);
        assert!(!p.recommendations.iter().any(|r| r.contains("More weeks")));
    }

    #[test]
    fn test_classify_follows_single_crossing_slope() {
        assert_eq!(classify(1.0, 0.0, 0.5, 50.0), PredictionTrend::Improving);
        assert_eq!(classify(0.0, -60.0, 0.5, 50.0), PredictionTrend::Declining);
        assert_eq!(classify(0.1, 10.0, 0.5, 50.0), PredictionTrend::Stable);
        assert_eq!(classify(1.0, -60.0, 0.5, 50.0), PredictionTrend::Improving);
    }
}
