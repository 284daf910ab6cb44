//! Category metrics aggregation.
//!
//! One `CategoryMetrics` per category present in the validated records.
//! Multi-category records split their volume by effort fraction, while the
//! workout count is split evenly across the record's categories.

use crate::effort::resolve_category_effort;
use crate::progression::{volume_progression, weight_progression};
use crate::stats::{coefficient_of_variation, mean, percent_change, safe_div};
use crate::strength::strength_level;
use crate::types::{
    AnalysisContext, BestSession, CategoryMetrics, Entry, PeriodVolume, SessionPerformance,
    StrengthLevel, Trend,
};
use crate::weekday::{project, week_completion_fraction, week_start, weeks_between};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Frequency and consistency weighting
const FREQUENCY_WEIGHT: f64 = 0.6;
const REGULARITY_WEIGHT: f64 = 0.4;

/// Volume and workout share one entry contributes to one category
#[derive(Clone, Copy, Debug)]
struct Attribution<'a> {
    entry: Entry<'a>,
    volume: f64,
    workouts: f64,
}

/// Split every entry across its categories
fn attribute<'a>(entries: &[Entry<'a>]) -> BTreeMap<String, Vec<Attribution<'a>>> {
    let mut by_category: BTreeMap<String, Vec<Attribution<'a>>> = BTreeMap::new();

    for entry in entries {
        let effort = resolve_category_effort(entry.categories(), Some(entry.name()));
        if effort.is_empty() {
            continue;
        }
        let workouts = 1.0 / effort.len() as f64;
        let volume = entry.volume();

        for (category, fraction) in effort {
            by_category.entry(category).or_default().push(Attribution {
                entry: *entry,
                volume: volume * fraction,
                workouts,
            });
        }
    }

    by_category
}

/// Attributed volume per category, for every category present in `entries`
pub fn attributed_volumes(entries: &[Entry<'_>]) -> BTreeMap<String, f64> {
    attribute(entries)
        .into_iter()
        .map(|(category, items)| {
            let total = items.iter().map(|a| a.volume).sum();
            (category, total)
        })
        .collect()
}

/// Distinct training days of each week, weeks in chronological order
fn days_by_week(entries: &[Entry<'_>]) -> BTreeMap<NaiveDate, BTreeSet<NaiveDate>> {
    let mut weeks: BTreeMap<NaiveDate, BTreeSet<NaiveDate>> = BTreeMap::new();
    for entry in entries {
        weeks.entry(week_start(entry.day())).or_default().insert(entry.day());
    }
    weeks
}

/// Calendar weeks from the first active week to the last, inclusive
fn spanned_weeks(weeks: &BTreeMap<NaiveDate, BTreeSet<NaiveDate>>) -> usize {
    match (weeks.keys().next(), weeks.keys().next_back()) {
        (Some(first), Some(last)) => usize::try_from(weeks_between(*first, *last)).unwrap_or(0) + 1,
        _ => 0,
    }
}

/// Unique active days ÷ unique active weeks
fn weekly_frequency(weeks: &BTreeMap<NaiveDate, BTreeSet<NaiveDate>>) -> f64 {
    let days: usize = weeks.values().map(BTreeSet::len).sum();
    safe_div(days as f64, weeks.len() as f64)
}

/// Whether recent weeks show a clear frequency increase over older weeks
///
/// With 4+ weeks the last two weeks must average 40% above the older ones; with
/// 2-3 weeks the last week must be 50% above the rest and have 2+ sessions.
fn recent_improvement(weeks: &BTreeMap<NaiveDate, BTreeSet<NaiveDate>>) -> bool {
    let counts: Vec<f64> = weeks.values().map(|d| d.len() as f64).collect();
    match counts.len() {
        0 | 1 => false,
        2 | 3 => {
            let (last, previous) = (counts[counts.len() - 1], &counts[..counts.len() - 1]);
            last > mean(previous) * 1.5 && last >= 2.0
        }
        n => {
            let (older, recent) = counts.split_at(n - 2);
            mean(recent) > mean(older) * 1.4
        }
    }
}

fn is_early_week(now: DateTime<Utc>) -> bool {
    matches!(now.weekday(), Weekday::Mon | Weekday::Tue)
}

/// Regularity (0-100) of the gaps between training days
///
/// A regular pattern scores 90-100 regardless of its interval. Early in the
/// week the tolerance widens so a fresh week does not look irregular.
pub fn regularity_score(days: &[NaiveDate], now: DateTime<Utc>) -> f64 {
    let Some(&last) = days.last() else {
        return 50.0;
    };
    if days.len() < 3 {
        return 50.0;
    }

    let gaps: Vec<f64> = days
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .collect();
    let avg_gap = mean(&gaps);
    let cv = if avg_gap > 0.0 {
        coefficient_of_variation(&gaps)
    } else {
        1.0
    };

    let early = is_early_week(now);
    let days_since_last = (now.date_naive() - last).num_days();
    let tolerance = match (early, days_since_last <= 2) {
        (true, true) => 0.5,
        (true, false) => 0.4,
        _ => 0.3,
    };

    if cv < tolerance {
        return (90.0 + 10.0 * (tolerance - cv) / tolerance).min(100.0);
    }

    let score = (90.0 - cv * 100.0).max(20.0);
    if early && days_since_last <= 1 {
        (score * 1.1).min(100.0)
    } else {
        score
    }
}

/// 60% frequency against the category's optimum, 40% regularity
pub fn consistency_score(frequency: f64, optimal: f64, regularity: f64) -> f64 {
    let frequency_score = (safe_div(frequency, optimal) * 100.0).min(100.0);
    (FREQUENCY_WEIGHT * frequency_score + REGULARITY_WEIGHT * regularity).clamp(0.0, 100.0)
}

pub fn classify_trend(weight_progression: f64, volume_progression: f64, thresholds: (f64, f64)) -> Trend {
    let (weight_threshold, volume_threshold) = thresholds;
    if weight_progression > weight_threshold || volume_progression > volume_threshold {
        Trend::Improving
    } else if weight_progression < -weight_threshold || volume_progression < -volume_threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Records that set a new heaviest weight, in chronological order
fn personal_records(items: &[Attribution<'_>]) -> usize {
    let mut best = 0.0;
    let mut count = 0;
    for item in items {
        if item.entry.weight() > best {
            best = item.entry.weight();
            count += 1;
        }
    }
    count
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn period_volume(items: &[Attribution<'_>], ctx: &AnalysisContext<'_>) -> PeriodVolume {
    let today = ctx.now.date_naive();
    let this_week = week_start(today);
    let last_week = this_week - Duration::days(7);
    let this_month = first_of_month(today);
    let last_month = first_of_month(this_month - Duration::days(1));

    let mut periods = PeriodVolume::default();
    for item in items {
        let day = item.entry.day();
        let week = week_start(day);
        if week == this_week {
            periods.this_week += item.volume;
        } else if week == last_week {
            periods.last_week += item.volume;
        }
        let month = first_of_month(day);
        if month == this_month {
            periods.this_month += item.volume;
        } else if month == last_month {
            periods.last_month += item.volume;
        }
    }

    let factor = week_completion_fraction(ctx.now, ctx.schedule);
    let projected = project(periods.this_week, periods.last_week, factor);
    periods.this_week_projected = projected.normalized_current;
    periods.weekday_factor = projected.weekday_factor;
    periods.week_over_week = percent_change(projected.normalized_comparison, projected.normalized_current);
    periods
}

fn session_performance(items: &[Attribution<'_>], total_volume: f64, workouts: f64) -> SessionPerformance {
    let mut sessions: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for item in items {
        let session = sessions.entry(item.entry.day()).or_insert((0.0, 0.0));
        session.0 += item.volume;
        session.1 = session.1.max(item.entry.weight());
    }

    let volumes: Vec<f64> = sessions.values().map(|(v, _)| *v).collect();
    let average = mean(&volumes);

    let mut best: Option<BestSession> = None;
    for (date, (volume, max_weight)) in &sessions {
        if best.as_ref().map_or(true, |b| *volume > b.volume) {
            best = Some(BestSession {
                date: *date,
                volume: *volume,
                max_weight: *max_weight,
            });
        }
    }

    SessionPerformance {
        best_session: best,
        average_session_volume: average,
        volume_per_workout: safe_div(total_volume, workouts),
        sessions_above_average: volumes.iter().filter(|v| **v > average).count(),
    }
}

fn recommendations(category: &str, m: &CategoryMetrics) -> Vec<String> {
    let name = category.to_lowercase();
    let mut out = Vec::new();

    if m.days_since_last_workout > 7 {
        out.push(format!(
            "Resume {} training - {} days without activity",
            name, m.days_since_last_workout
        ));
    }
    if m.avg_workouts_per_week < 2.0 {
        out.push(format!("Increase {} frequency to 2-3 sessions per week", name));
    }
    if m.weight_progression < 0.0 {
        out.push(format!("Review weight progression for {} - trend is negative", name));
    }
    if m.consistency_score < 60.0 {
        out.push(format!("Train {} more consistently", name));
    }
    if m.strength_level == StrengthLevel::Beginner && m.workouts > 20.0 {
        out.push(format!("Consider raising the intensity of {} work", name));
    }
    out
}

fn warnings(category: &str, m: &CategoryMetrics) -> Vec<String> {
    let name = category.to_lowercase();
    let mut out = Vec::new();

    if m.days_since_last_workout > 14 {
        out.push(format!(
            "{} untrained for {} days",
            category, m.days_since_last_workout
        ));
    }
    if m.trend == Trend::Declining {
        out.push(format!("Declining trend in {}", name));
    }
    if m.weight_progression < -10.0 {
        out.push(format!("Significant strength loss in {}", name));
    }
    if m.avg_workouts_per_week < 1.0 {
        out.push(format!("Very low {} frequency", name));
    }
    out
}

fn category_metrics(
    category: &str,
    items: &[Attribution<'_>],
    entries: &[Entry<'_>],
    grand_total: f64,
    ctx: &AnalysisContext<'_>,
) -> Option<CategoryMetrics> {
    let last_workout = items.iter().map(|a| a.entry.performed_at()).max()?;
    let n = items.len() as f64;

    let total_volume: f64 = items.iter().map(|a| a.volume).sum();
    let workouts: f64 = items.iter().map(|a| a.workouts).sum();
    let weights: Vec<f64> = items.iter().map(|a| a.entry.weight()).collect();
    let total_sets: u64 = items.iter().map(|a| u64::from(a.entry.sets())).sum();
    let total_reps: u64 = items.iter().map(|a| u64::from(a.entry.reps())).sum();
    let raw_volume: f64 = items.iter().map(|a| a.entry.volume()).sum();

    let one_rep_maxes: Vec<f64> = items.iter().map(|a| a.entry.estimated_one_rep_max()).collect();
    let max_one_rep_max = one_rep_maxes.iter().copied().fold(0.0, f64::max);

    let category_entries: Vec<Entry<'_>> = items.iter().map(|a| a.entry).collect();
    let weeks = days_by_week(&category_entries);
    let frequency = weekly_frequency(&weeks);
    let days: Vec<NaiveDate> = weeks.values().flatten().copied().collect();

    let weight_prog = weight_progression(entries, category, ctx);
    let volume_prog = volume_progression(entries, category, ctx);
    let regularity = regularity_score(&days, ctx.now);
    let config = ctx.config;

    let mut metrics = CategoryMetrics {
        category: category.to_string(),
        workouts,
        total_volume,
        avg_weight: mean(&weights),
        max_weight: weights.iter().copied().fold(0.0, f64::max),
        min_weight: weights.iter().copied().fold(f64::INFINITY, f64::min),
        avg_sets: total_sets as f64 / n,
        avg_reps: total_reps as f64 / n,
        total_sets,
        total_reps,
        avg_workouts_per_week: frequency,
        recent_improvement: recent_improvement(&weeks),
        last_workout,
        percentage: safe_div(total_volume, grand_total) * 100.0,
        estimated_one_rep_max: max_one_rep_max,
        weight_progression: weight_prog,
        volume_progression: volume_prog,
        intensity_score: (safe_div(mean(&one_rep_maxes), max_one_rep_max) * 100.0).clamp(0.0, 100.0),
        efficiency_score: (safe_div(raw_volume, total_sets as f64) / 10.0).min(100.0),
        consistency_score: consistency_score(frequency, config.optimal_frequency(category), regularity),
        trend: classify_trend(weight_prog, volume_prog, config.trend.for_weeks(spanned_weeks(&weeks))),
        strength_level: strength_level(max_one_rep_max, config.level_thresholds(category)),
        days_since_last_workout: (ctx.now.date_naive() - last_workout.date_naive())
            .num_days()
            .max(0),
        personal_records: personal_records(items),
        volume_distribution: period_volume(items, ctx),
        performance: session_performance(items, total_volume, workouts),
        recommendations: Vec::new(),
        warnings: Vec::new(),
    };

    metrics.recommendations = recommendations(category, &metrics);
    metrics.warnings = warnings(category, &metrics);
    Some(metrics)
}

/// One metrics record per category present, sorted by volume (descending) then name
pub fn compute_category_metrics(entries: &[Entry<'_>], ctx: &AnalysisContext<'_>) -> Vec<CategoryMetrics> {
    let by_category = attribute(entries);
    let grand_total: f64 = by_category
        .values()
        .flat_map(|items| items.iter().map(|a| a.volume))
        .sum();

    let mut metrics: Vec<CategoryMetrics> = by_category
        .iter()
        .filter_map(|(category, items)| category_metrics(category, items, entries, grand_total, ctx))
        .collect();

    metrics.sort_by(|a, b| {
        b.total_volume
            .total_cmp(&a.total_volume)
            .then_with(|| a.category.cmp(&b.category))
    });

    debug!(
        "Computed metrics for {} categories over {} records",
        metrics.len(),
        entries.len()
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_default_catalog, ExerciseCatalog};
    use crate::config::AnalysisConfig;
    use crate::types::{Exercise, SetOverride, TrainingHistory, WorkoutRecord};
    use crate::validate::validate_records;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap()
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

    fn run(records: &[WorkoutRecord], catalog: &ExerciseCatalog, now: DateTime<Utc>) -> Vec<CategoryMetrics> {
        let config = AnalysisConfig::default();
        let history = TrainingHistory::new(records, catalog, now);
        let entries = validate_records(&history);
        let ctx = AnalysisContext {
            config: &config,
            now,
            schedule: &[],
        };
        compute_category_metrics(&entries, &ctx)
    }

    fn find<'m>(metrics: &'m [CategoryMetrics], category: &str) -> &'m CategoryMetrics {
        metrics.iter().find(|m| m.category == category).unwrap()
    }

    fn chest_only_catalog() -> ExerciseCatalog {
        ExerciseCatalog::from_exercises([Exercise {
            id: "chest_press".into(),
            name: "Chest Press".into(),
            categories: vec!["Chest".into()],
            aliases: vec![],
            description: None,
        }])
    }

    #[test]
    fn test_empty_records() {
        let catalog = build_default_catalog();
        assert!(run(&[], &catalog, at(3, 10)).is_empty());
    }

    #[test]
    fn test_chest_scenario_volume_and_progression() {
        let catalog = chest_only_catalog();
        let records = vec![
            record("chest_press", 60.0, 8, 3, at(3, 4)),
            record("chest_press", 65.0, 8, 3, at(3, 11)),
        ];
        let metrics = run(&records, &catalog, at(3, 25));

        assert_eq!(metrics.len(), 1);
        let chest = &metrics[0];
        assert!((chest.total_volume - 3000.0).abs() < 1e-9);
        assert!(chest.weight_progression > 0.0);
        assert_eq!(chest.workouts, 2.0);
        assert!((chest.percentage - 100.0).abs() < 1e-9);
        assert_eq!(chest.personal_records, 2);
        assert_eq!(chest.max_weight, 65.0);
        assert_eq!(chest.min_weight, 60.0);
    }

    #[test]
    fn test_multi_category_volume_sums_to_record_volume() {
        let catalog = build_default_catalog();
        let records = vec![record("overhead_press", 50.0, 5, 5, at(3, 4))];
        let metrics = run(&records, &catalog, at(3, 10));

        let attributed: f64 = metrics.iter().map(|m| m.total_volume).sum();
        assert!((attributed - 1250.0).abs() < 1e-9);
        assert!((find(&metrics, "Shoulders").total_volume - 875.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_overrides_flow_through_effort_split() {
        let catalog = build_default_catalog();
        let mut press = record("overhead_press", 50.0, 5, 5, at(3, 4));
        press.set_overrides = vec![
            SetOverride { weight: 60.0, reps: 5 },
            SetOverride { weight: 55.0, reps: 5 },
            SetOverride { weight: 50.0, reps: 6 },
        ];
        let metrics = run(&[press], &catalog, at(3, 10));

        // 300 + 275 + 300 replaces 50 x 5 x 5
        let attributed: f64 = metrics.iter().map(|m| m.total_volume).sum();
        assert!((attributed - 875.0).abs() < 1e-9, "{}", attributed);
        assert!((find(&metrics, "Shoulders").total_volume - 875.0 * 0.7).abs() < 1e-9);
        assert!((find(&metrics, "Arms").total_volume - 875.0 * 0.2).abs() < 1e-9);
        assert!((find(&metrics, "Core").total_volume - 875.0 * 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_set_and_rep_totals_do_not_overflow() {
        let catalog = chest_only_catalog();
        let records = vec![
            record("chest_press", 20.0, u32::MAX, u32::MAX, at(3, 4)),
            record("chest_press", 20.0, u32::MAX, u32::MAX, at(3, 5)),
        ];
        let metrics = run(&records, &catalog, at(3, 10));
        assert_eq!(metrics[0].total_sets, 2 * u64::from(u32::MAX));
        assert_eq!(metrics[0].total_reps, 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_workout_count_split_evenly_regardless_of_effort() {
        let catalog = build_default_catalog();
        let records = vec![record("overhead_press", 50.0, 5, 5, at(3, 4))];
        let metrics = run(&records, &catalog, at(3, 10));

        for category in ["Shoulders", "Arms", "Core"] {
            let m = find(&metrics, category);
            assert!((m.workouts - 1.0 / 3.0).abs() < 1e-9, "{}: {}", category, m.workouts);
        }
    }

    #[test]
    fn test_percentages_sum_to_hundred_and_sorted() {
        let catalog = build_default_catalog();
        let records = vec![
            record("bench_press", 80.0, 5, 5, at(3, 4)),
            record("back_squat", 120.0, 5, 5, at(3, 5)),
            record("barbell_row", 70.0, 8, 4, at(3, 6)),
            record("plank", 10.0, 1, 3, at(3, 6)),
        ];
        let metrics = run(&records, &catalog, at(3, 10));

        let total: f64 = metrics.iter().map(|m| m.percentage).sum();
        assert!((total - 100.0).abs() < 0.1, "{}", total);
        for pair in metrics.windows(2) {
            assert!(pair[0].total_volume >= pair[1].total_volume);
        }
    }

    #[test]
    fn test_inactive_category_gets_recommendation_and_warning() {
        let catalog = chest_only_catalog();
        let records = vec![record("chest_press", 60.0, 8, 3, at(3, 1))];
        let metrics = run(&records, &catalog, at(3, 20));
        let chest = &metrics[0];

        assert_eq!(chest.days_since_last_workout, 19);
        assert!(chest.recommendations.iter().any(|r| r.starts_with("Resume chest")));
        assert!(chest.warnings.iter().any(|w| w.contains("untrained for 19 days")));
    }

    #[test]
    fn test_frequency_is_days_per_active_week() {
        let catalog = chest_only_catalog();
        // Two days in the first week, one in the next, two records on one day
        let records = vec![
            record("chest_press", 60.0, 8, 3, at(3, 4)),
            record("chest_press", 60.0, 8, 3, at(3, 4)),
            record("chest_press", 60.0, 8, 3, at(3, 6)),
            record("chest_press", 60.0, 8, 3, at(3, 12)),
        ];
        let metrics = run(&records, &catalog, at(3, 20));
        assert!((metrics[0].avg_workouts_per_week - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_trend_threshold_follows_history_span() {
        let catalog = chest_only_catalog();
        // Two sessions five weeks apart, +6% weight: six weeks of history
        let records = vec![
            record("chest_press", 60.0, 8, 3, at(3, 4)),
            record("chest_press", 63.6, 8, 3, at(4, 8)),
        ];
        let metrics = run(&records, &catalog, at(4, 20));
        let chest = &metrics[0];

        assert!((chest.weight_progression - 6.0).abs() < 1e-6, "{}", chest.weight_progression);
        assert_eq!(chest.trend, Trend::Improving);

        // The same gain inside two adjacent weeks stays under the short-history threshold
        let records = vec![
            record("chest_press", 60.0, 8, 3, at(3, 4)),
            record("chest_press", 63.6, 8, 3, at(3, 11)),
        ];
        let metrics = run(&records, &catalog, at(4, 20));
        assert_eq!(metrics[0].trend, Trend::Stable);
    }

    #[test]
    fn test_spanned_weeks_counts_gaps() {
        let day = |m: u32, d: u32| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        let mut weeks: BTreeMap<NaiveDate, BTreeSet<NaiveDate>> = BTreeMap::new();
        assert_eq!(spanned_weeks(&weeks), 0);
        weeks.insert(day(3, 4), [day(3, 5)].into());
        assert_eq!(spanned_weeks(&weeks), 1);
        weeks.insert(day(4, 8), [day(4, 9)].into());
        assert_eq!(spanned_weeks(&weeks), 6);
    }

    #[test]
    fn test_period_volume_relative_to_now() {
        let catalog = chest_only_catalog();
        // 2024-03-13 is a Wednesday; fallback factor 0.6
        let records = vec![
            record("chest_press", 50.0, 10, 3, at(2, 20)),
            record("chest_press", 50.0, 10, 2, at(3, 5)),
            record("chest_press", 50.0, 10, 1, at(3, 11)),
        ];
        let metrics = run(&records, &catalog, Utc.with_ymd_and_hms(2024, 3, 13, 20, 0, 0).unwrap());
        let periods = &metrics[0].volume_distribution;

        assert_eq!(periods.this_week, 500.0);
        assert_eq!(periods.last_week, 1000.0);
        assert_eq!(periods.this_month, 1500.0);
        assert_eq!(periods.last_month, 1500.0);
        assert!((periods.this_week_projected - 500.0 / 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_regularity_score() {
        let now = at(3, 20); // Wednesday
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();

        assert_eq!(regularity_score(&[day(1), day(3)], now), 50.0);
        assert_eq!(regularity_score(&[day(1), day(4), day(7), day(10)], now), 100.0);

        let irregular = regularity_score(&[day(1), day(2), day(12), day(13)], now);
        assert!(irregular < 90.0 && irregular >= 20.0, "{}", irregular);
    }

    #[test]
    fn test_consistency_score_weights() {
        assert!((consistency_score(2.0, 2.0, 100.0) - 100.0).abs() < 1e-9);
        assert!((consistency_score(1.0, 2.0, 50.0) - 50.0).abs() < 1e-9);
        assert_eq!(consistency_score(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_classify_trend() {
        assert_eq!(classify_trend(6.0, 0.0, (5.0, 10.0)), Trend::Improving);
        assert_eq!(classify_trend(0.0, -11.0, (5.0, 10.0)), Trend::Declining);
        assert_eq!(classify_trend(6.0, 0.0, (10.0, 20.0)), Trend::Stable);
    }

    #[test]
    fn test_recent_improvement() {
        let day = |m: u32, d: u32| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        let mut weeks: BTreeMap<NaiveDate, BTreeSet<NaiveDate>> = BTreeMap::new();
        weeks.insert(day(3, 4), [day(3, 4)].into());
        weeks.insert(day(3, 11), [day(3, 11), day(3, 13), day(3, 15)].into());
        assert!(recent_improvement(&weeks));

        weeks.insert(day(3, 18), [day(3, 18)].into());
        // Three weeks: last week (1) is not above the earlier average (2)
        assert!(!recent_improvement(&weeks));
    }
}
