//! Muscle balance analysis.
//!
//! Compares each category's share of attributed volume against the ideal
//! distribution, checks antagonist pairs, and rates strength, development
//! stage and balance history. Categories from the ideal table that were never
//! trained are reported too, with neglected defaults.
//!
//! Short histories are damped by a temporal-adjustment factor in [0.3, 1.0]:
//! the balanced tolerance widens and scores move toward neutral.

use crate::effort::attributed_volume;
use crate::stats::{coefficient_of_variation, mean, percent_change, safe_div, std_dev};
use crate::strength::strength_index;
use crate::types::{
    AnalysisContext, AntagonistBalance, BalanceHistory, CategoryMetrics, DevelopmentStage, Entry,
    ImbalanceDirection, ImbalanceSeverity, MuscleBalance, Priority, Trend,
};
use crate::weekday::week_start;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

const MIN_TEMPORAL_FACTOR: f64 = 0.3;
/// Records and days of history at which the temporal factor saturates
const FULL_HISTORY_RECORDS: f64 = 30.0;
const FULL_HISTORY_DAYS: f64 = 56.0;
/// Below this factor priorities are capped at medium
const LOW_CONFIDENCE_FACTOR: f64 = 0.5;

const MIN_HISTORY_WEEKS: usize = 4;
const VOLUME_EPSILON: f64 = 1e-9;

/// Temporal-adjustment factor from record count and time span
pub fn temporal_factor(entries: &[Entry<'_>]) -> f64 {
    let (Some(first), Some(last)) = (
        entries.iter().map(Entry::performed_at).min(),
        entries.iter().map(Entry::performed_at).max(),
    ) else {
        return MIN_TEMPORAL_FACTOR;
    };

    let span_days = (last - first).num_seconds() as f64 / 86_400.0;
    let records = (entries.len() as f64 / FULL_HISTORY_RECORDS).min(1.0);
    let span = (span_days / FULL_HISTORY_DAYS).min(1.0);

    (MIN_TEMPORAL_FACTOR + (1.0 - MIN_TEMPORAL_FACTOR) * (0.5 * records + 0.5 * span))
        .clamp(MIN_TEMPORAL_FACTOR, 1.0)
}

/// Consistency of weights and reps, damped toward 50 for short histories
fn symmetry_score(entries: &[Entry<'_>], factor: f64) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let weights: Vec<f64> = entries.iter().map(Entry::weight).collect();
    let reps: Vec<f64> = entries.iter().map(|e| f64::from(e.reps())).collect();
    let raw = (100.0 - 50.0 * (coefficient_of_variation(&weights) + coefficient_of_variation(&reps)))
        .max(0.0);
    (50.0 + (raw - 50.0) * factor).clamp(0.0, 100.0)
}

fn severity_for(deviation: f64) -> ImbalanceSeverity {
    match deviation.abs() {
        d if d <= 20.0 => ImbalanceSeverity::Balanced,
        d if d <= 30.0 => ImbalanceSeverity::Mild,
        d if d <= 45.0 => ImbalanceSeverity::Moderate,
        _ => ImbalanceSeverity::Severe,
    }
}

fn antagonist_balance(
    category: &str,
    volumes: &BTreeMap<&str, f64>,
    ctx: &AnalysisContext<'_>,
) -> Option<AntagonistBalance> {
    let config = ctx.config;
    let antagonist = config.antagonist(category)?;
    let own = volumes.get(category).copied().unwrap_or(0.0);
    let other = volumes.get(antagonist).copied().unwrap_or(0.0);
    let ideal_ratio = safe_div(
        config.ideal_percentage(category),
        config.ideal_percentage(antagonist),
    );

    let (ratio, deviation) = if own <= VOLUME_EPSILON && other <= VOLUME_EPSILON {
        (0.0, 0.0)
    } else if other <= VOLUME_EPSILON {
        // Nothing opposes this category at all
        (0.0, 100.0)
    } else {
        let ratio = own / other;
        (ratio, safe_div(ratio - ideal_ratio, ideal_ratio) * 100.0)
    };

    let severity = if other <= VOLUME_EPSILON && own > VOLUME_EPSILON {
        ImbalanceSeverity::Severe
    } else {
        severity_for(deviation)
    };
    let direction = match severity {
        ImbalanceSeverity::Balanced => ImbalanceDirection::Balanced,
        _ if deviation > 0.0 => ImbalanceDirection::TooMuch,
        _ => ImbalanceDirection::TooLittle,
    };

    Some(AntagonistBalance {
        antagonist: antagonist.to_string(),
        ratio,
        ideal_ratio,
        deviation,
        severity,
        direction,
    })
}

fn priority_for(
    deviation: f64,
    tolerance: f64,
    metrics: Option<&CategoryMetrics>,
    factor: f64,
) -> Priority {
    let mut priority = if deviation.abs() > tolerance {
        if deviation.abs() > 1.5 * tolerance {
            Priority::Critical
        } else {
            Priority::High
        }
    } else {
        let weak = metrics.map_or(true, |m| {
            m.avg_workouts_per_week < 1.0 || m.trend == Trend::Declining
        });
        if weak {
            Priority::Medium
        } else {
            Priority::Low
        }
    };

    let untrained = metrics.map_or(true, |m| m.total_volume <= VOLUME_EPSILON);
    if untrained {
        priority = priority.max(Priority::High);
    }
    if factor < LOW_CONFIDENCE_FACTOR {
        priority = priority.min(Priority::Medium);
    }
    priority
}

fn development_stage(volume: f64, frequency: f64, index: f64) -> DevelopmentStage {
    if volume <= VOLUME_EPSILON || frequency < 0.5 {
        DevelopmentStage::Neglected
    } else if index >= 70.0 {
        DevelopmentStage::Advanced
    } else if index >= 50.0 {
        DevelopmentStage::Intermediate
    } else {
        DevelopmentStage::Beginner
    }
}

/// Weekly share (%) of total volume attributed to `category`, oldest week first
fn weekly_shares(entries: &[Entry<'_>], category: &str) -> Vec<f64> {
    let mut weeks: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for entry in entries {
        let week = weeks.entry(week_start(entry.day())).or_insert((0.0, 0.0));
        week.0 += entry.volume();
        if entry.has_category(category) {
            week.1 += attributed_volume(entry, category);
        }
    }
    weeks
        .values()
        .filter(|(total, _)| *total > 0.0)
        .map(|(total, own)| own / total * 100.0)
        .collect()
}

/// Relative reduction of the distance to the ideal share between the two halves
///
/// Positive when the share moved toward the ideal.
fn trend_toward_ideal(shares: &[f64], ideal: f64) -> f64 {
    let (first, second) = shares.split_at(shares.len() / 2);
    let before = (mean(first) - ideal).abs();
    let after = (mean(second) - ideal).abs();
    safe_div(before - after, before)
}

fn balance_history(
    all: &[Entry<'_>],
    own: &[Entry<'_>],
    category: &str,
    ideal: f64,
    metrics: Option<&CategoryMetrics>,
) -> BalanceHistory {
    let neutral = BalanceHistory {
        trend: Trend::Stable,
        consistency: 0.0,
        volatility: 0.0,
    };
    if own.is_empty() {
        return neutral;
    }

    let shares = weekly_shares(all, category);
    if shares.len() >= MIN_HISTORY_WEEKS {
        let (weight_prog, volume_prog) =
            metrics.map_or((0.0, 0.0), |m| (m.weight_progression, m.volume_progression));
        let toward = trend_toward_ideal(&shares, ideal);

        let trend = if weight_prog > 5.0 || volume_prog > 10.0 || toward > 0.10 {
            Trend::Improving
        } else if toward < -0.25 && volume_prog <= 0.0 {
            Trend::Declining
        } else {
            Trend::Stable
        };

        return BalanceHistory {
            trend,
            consistency: (100.0 - std_dev(&shares) / 20.0 * 100.0).clamp(0.0, 100.0),
            volatility: (coefficient_of_variation(&shares) * 100.0).min(100.0),
        };
    }

    // Not enough weeks for a share series; fall back on estimated 1RM movement
    let (first, second) = own.split_at(own.len() / 2);
    if first.is_empty() || second.is_empty() {
        return neutral;
    }
    let one_rep_maxes = |half: &[Entry<'_>]| -> Vec<f64> {
        half.iter().map(Entry::estimated_one_rep_max).collect()
    };
    let change = percent_change(mean(&one_rep_maxes(first)), mean(&one_rep_maxes(second)));
    let trend = if change > 2.0 {
        Trend::Improving
    } else if change < -5.0 {
        Trend::Declining
    } else {
        Trend::Stable
    };

    let cv = coefficient_of_variation(&one_rep_maxes(own)) * 100.0;
    let damping = match own.len() {
        n if n < 10 => 0.5,
        n if n < 20 => 0.7,
        _ => 1.0,
    };

    BalanceHistory {
        trend,
        consistency: (100.0 - cv).max(0.0),
        volatility: (cv * damping).min(100.0),
    }
}

fn recommendation_for(category: &str, volume: f64, deviation: f64, is_balanced: bool) -> String {
    let name = category.to_lowercase();
    if volume <= VOLUME_EPSILON {
        format!("Start training {}", name)
    } else if is_balanced {
        format!("{} is well balanced", category)
    } else if deviation > 0.0 {
        format!("Reduce {} volume", name)
    } else {
        format!("Increase {} volume", name)
    }
}

fn specific_recommendations(
    category: &str,
    balance: &MuscleBalance,
    tolerance: f64,
) -> Vec<String> {
    let name = category.to_lowercase();
    let mut out = Vec::new();

    if balance.deviation < -tolerance {
        out.push(format!(
            "Shift about {:.0}% of total volume toward {}",
            -balance.deviation, name
        ));
    } else if balance.deviation > tolerance {
        out.push(format!(
            "Move about {:.0}% of total volume away from {}",
            balance.deviation, name
        ));
    }
    if balance.volume > VOLUME_EPSILON && balance.weekly_frequency < 1.0 {
        out.push(format!("Train {} at least once a week", name));
    }
    if balance.progress_trend == Trend::Declining {
        out.push(format!("Review {} programming: performance is declining", name));
    }
    if balance.development_stage == DevelopmentStage::Beginner {
        out.push(format!("Focus on progressive overload for {}", name));
    }
    out
}

fn base_warnings(balance: &MuscleBalance) -> Vec<String> {
    let mut out = Vec::new();
    if balance.volume <= VOLUME_EPSILON {
        out.push(format!("{} has not been trained", balance.category));
    } else if balance.priority == Priority::Critical {
        out.push(format!(
            "{} is {:.1} points away from its ideal share",
            balance.category,
            balance.deviation.abs()
        ));
    }
    out
}

/// Attach antagonist warnings to only the more-deviated side of each pair
///
/// Ties go to the alphabetically first category.
fn attribute_antagonist_warnings(balances: &mut [MuscleBalance]) {
    let deviations: BTreeMap<String, f64> = balances
        .iter()
        .map(|b| (b.category.clone(), b.deviation.abs()))
        .collect();

    for balance in balances.iter_mut() {
        let Some(antagonist) = balance.antagonist.as_ref() else {
            continue;
        };
        if antagonist.severity == ImbalanceSeverity::Balanced {
            continue;
        }

        let own = deviations.get(&balance.category).copied().unwrap_or(0.0);
        let other = deviations.get(&antagonist.antagonist).copied().unwrap_or(0.0);
        let owns_warning = own > other || (own == other && balance.category < antagonist.antagonist);
        if !owns_warning {
            continue;
        }

        let direction = match antagonist.direction {
            ImbalanceDirection::TooMuch => "too much",
            ImbalanceDirection::TooLittle => "too little",
            ImbalanceDirection::Balanced => "balanced",
        };
        let warning = format!(
            "{:?} {}/{} imbalance: ratio {:.2} vs ideal {:.2} ({} {})",
            antagonist.severity,
            balance.category,
            antagonist.antagonist,
            antagonist.ratio,
            antagonist.ideal_ratio,
            direction,
            balance.category.to_lowercase()
        );
        balance.warnings.push(warning);
    }
}

/// Balance assessment for every category in the ideal table or the records
///
/// Returns nothing for an empty record set.
pub fn analyze_muscle_balance(
    metrics: &[CategoryMetrics],
    entries: &[Entry<'_>],
    ctx: &AnalysisContext<'_>,
) -> (Vec<MuscleBalance>, f64) {
    let factor = temporal_factor(entries);
    if entries.is_empty() {
        return (Vec::new(), factor);
    }

    let config = ctx.config;
    let tolerance = config.balance_tolerance / factor;
    let by_category: BTreeMap<&str, &CategoryMetrics> =
        metrics.iter().map(|m| (m.category.as_str(), m)).collect();
    let volumes: BTreeMap<&str, f64> = metrics
        .iter()
        .map(|m| (m.category.as_str(), m.total_volume))
        .collect();

    let categories: BTreeSet<&str> = config
        .ideal_distribution
        .keys()
        .map(String::as_str)
        .chain(by_category.keys().copied())
        .collect();

    let mut balances: Vec<MuscleBalance> = categories
        .into_iter()
        .map(|category| {
            let m = by_category.get(category).copied();
            let own: Vec<Entry<'_>> = entries
                .iter()
                .filter(|e| e.has_category(category))
                .copied()
                .collect();

            let volume = m.map_or(0.0, |m| m.total_volume);
            let percentage = m.map_or(0.0, |m| m.percentage);
            let ideal = config.ideal_percentage(category);
            let deviation = percentage - ideal;
            let is_balanced = deviation.abs() <= tolerance;
            let frequency = m.map_or(0.0, |m| m.avg_workouts_per_week);

            let one_rep_maxes: Vec<f64> = own.iter().map(Entry::estimated_one_rep_max).collect();
            let index = strength_index(mean(&one_rep_maxes), config.strength_standards(category));

            let mut balance = MuscleBalance {
                category: category.to_string(),
                volume,
                percentage,
                ideal_percentage: ideal,
                deviation,
                is_balanced,
                symmetry_score: symmetry_score(&own, factor),
                antagonist: antagonist_balance(category, &volumes, ctx),
                strength_index: index,
                progress_trend: m.map_or(Trend::Stable, |m| m.trend),
                priority: priority_for(deviation, tolerance, m, factor),
                development_stage: development_stage(volume, frequency, index),
                weekly_frequency: frequency,
                intensity_score: m.map_or(0.0, |m| m.intensity_score),
                balance_history: balance_history(entries, &own, category, ideal, m),
                recommendation: recommendation_for(category, volume, deviation, is_balanced),
                specific_recommendations: Vec::new(),
                warnings: Vec::new(),
            };
            balance.specific_recommendations = specific_recommendations(category, &balance, tolerance);
            balance.warnings = base_warnings(&balance);
            balance
        })
        .collect();

    attribute_antagonist_warnings(&mut balances);

    debug!(
        "Balance analysis over {} categories (temporal factor {:.2}, tolerance {:.1})",
        balances.len(),
        factor,
        tolerance
    );
    (balances, factor)
}

/// 100 at perfect distribution, 0 when the mean absolute deviation reaches 50 points
pub fn balance_score(balances: &[MuscleBalance]) -> f64 {
    if balances.is_empty() {
        return 0.0;
    }
    let deviations: Vec<f64> = balances.iter().map(|b| b.deviation.abs()).collect();
    (100.0 - mean(&deviations) / 50.0 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_default_catalog, ExerciseCatalog};
    use crate::config::AnalysisConfig;
    use crate::metrics::compute_category_metrics;
    use crate::types::{Exercise, TrainingHistory, WorkoutRecord};
    use crate::validate::validate_records;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

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

    fn single(id: &str, category: &str) -> Exercise {
        Exercise {
            id: id.into(),
            name: id.into(),
            categories: vec![category.into()],
            aliases: vec![],
            description: None,
        }
    }

    /// One single-category exercise per ideal category
    fn split_catalog() -> ExerciseCatalog {
        ExerciseCatalog::from_exercises([
            single("chest_work", "Chest"),
            single("back_work", "Back"),
            single("leg_work", "Legs"),
            single("shoulder_work", "Shoulders"),
            single("arm_work", "Arms"),
            single("core_work", "Core"),
        ])
    }

    fn analyze(
        records: &[WorkoutRecord],
        catalog: &ExerciseCatalog,
        now: DateTime<Utc>,
    ) -> (Vec<MuscleBalance>, f64) {
        let config = AnalysisConfig::default();
        let history = TrainingHistory::new(records, catalog, now);
        let entries = validate_records(&history);
        let ctx = AnalysisContext {
            config: &config,
            now,
            schedule: &[],
        };
        let metrics = compute_category_metrics(&entries, &ctx);
        analyze_muscle_balance(&metrics, &entries, &ctx)
    }

    fn find<'b>(balances: &'b [MuscleBalance], category: &str) -> &'b MuscleBalance {
        balances.iter().find(|b| b.category == category).unwrap()
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    /// Ten weeks, three sessions a week, volume split exactly by the ideal table
    /// (Core left out when `with_core` is false)
    fn ideal_history(with_core: bool) -> Vec<WorkoutRecord> {
        let mut records = Vec::new();
        for week in 0..10 {
            for session in 0..3 {
                let when = start() + Duration::days(week * 7 + session * 2);
                // 100 kg x 1 rep x sets = sets * 100 volume per record
                records.push(record("chest_work", 100.0, 1, 20, when));
                records.push(record("back_work", 100.0, 1, 25, when));
                records.push(record("leg_work", 100.0, 1, 30, when));
                records.push(record("shoulder_work", 100.0, 1, 10, when));
                records.push(record("arm_work", 100.0, 1, 10, when));
                if with_core {
                    records.push(record("core_work", 100.0, 1, 5, when));
                }
            }
        }
        records
    }

    #[test]
    fn test_empty_records_yield_nothing() {
        let catalog = build_default_catalog();
        let (balances, factor) = analyze(&[], &catalog, start());
        assert!(balances.is_empty());
        assert_eq!(factor, MIN_TEMPORAL_FACTOR);
        assert_eq!(balance_score(&balances), 0.0);
    }

    #[test]
    fn test_temporal_factor_range() {
        let catalog = split_catalog();
        let short = vec![record("chest_work", 60.0, 8, 3, start())];
        let (_, factor) = analyze(&short, &catalog, start());
        assert!(factor >= MIN_TEMPORAL_FACTOR && factor < LOW_CONFIDENCE_FACTOR);

        let long = ideal_history(true);
        let now = start() + Duration::days(70);
        let (_, factor) = analyze(&long, &catalog, now);
        assert!((factor - 1.0).abs() < 1e-9, "{}", factor);
    }

    #[test]
    fn test_ideal_distribution_is_balanced_without_antagonist_warnings() {
        let catalog = split_catalog();
        let records = ideal_history(true);
        let (balances, _) = analyze(&records, &catalog, start() + Duration::days(70));

        assert_eq!(balances.len(), 6);
        for balance in &balances {
            assert!(balance.deviation.abs() < 1e-6, "{}: {}", balance.category, balance.deviation);
            assert!(balance.is_balanced);
            let antagonist = balance.antagonist.as_ref().unwrap();
            assert_eq!(antagonist.severity, ImbalanceSeverity::Balanced);
            assert!(
                !balance.warnings.iter().any(|w| w.contains("imbalance")),
                "{:?}",
                balance.warnings
            );
        }
        assert!(balance_score(&balances) > 99.0);
    }

    #[test]
    fn test_untrained_category_is_neglected_with_elevated_priority() {
        let catalog = split_catalog();
        let records = ideal_history(false);
        let (balances, factor) = analyze(&records, &catalog, start() + Duration::days(70));
        assert!(factor >= LOW_CONFIDENCE_FACTOR);

        let core = find(&balances, "Core");
        assert_eq!(core.volume, 0.0);
        assert_eq!(core.development_stage, DevelopmentStage::Neglected);
        assert!(core.priority >= Priority::High);
        assert!(core.warnings.iter().any(|w| w == "Core has not been trained"));
        assert_eq!(core.recommendation, "Start training core");
    }

    #[test]
    fn test_short_history_caps_priority() {
        let catalog = split_catalog();
        let records = vec![
            record("chest_work", 60.0, 8, 3, start()),
            record("chest_work", 62.5, 8, 3, start() + Duration::days(2)),
        ];
        let (balances, factor) = analyze(&records, &catalog, start() + Duration::days(3));
        assert!(factor < LOW_CONFIDENCE_FACTOR);

        for balance in &balances {
            assert!(balance.priority <= Priority::Medium, "{}", balance.category);
        }
        assert_eq!(find(&balances, "Back").development_stage, DevelopmentStage::Neglected);
    }

    #[test]
    fn test_antagonist_warning_on_more_deviated_side_only() {
        let catalog = split_catalog();
        let mut records = Vec::new();
        for week in 0..10 {
            let when = start() + Duration::days(week * 7);
            // Chest far above its ideal share, Back slightly below
            records.push(record("chest_work", 100.0, 1, 60, when));
            records.push(record("back_work", 100.0, 1, 20, when));
            records.push(record("leg_work", 100.0, 1, 20, when));
        }
        let (balances, _) = analyze(&records, &catalog, start() + Duration::days(70));

        let chest = find(&balances, "Chest");
        let back = find(&balances, "Back");
        let chest_antagonist = chest.antagonist.as_ref().unwrap();
        assert_eq!(chest_antagonist.direction, ImbalanceDirection::TooMuch);
        assert_eq!(chest_antagonist.severity, ImbalanceSeverity::Severe);
        assert!(chest.warnings.iter().any(|w| w.contains("Chest/Back imbalance")));
        assert!(!back.warnings.iter().any(|w| w.contains("imbalance")));
    }

    #[test]
    fn test_missing_antagonist_volume_is_severe() {
        let catalog = split_catalog();
        let records = vec![record("arm_work", 20.0, 10, 3, start())];
        let (balances, _) = analyze(&records, &catalog, start() + Duration::days(1));

        let arms = find(&balances, "Arms").antagonist.as_ref().unwrap().clone();
        assert_eq!(arms.antagonist, "Legs");
        assert_eq!(arms.ratio, 0.0);
        assert_eq!(arms.severity, ImbalanceSeverity::Severe);
        assert_eq!(arms.direction, ImbalanceDirection::TooMuch);

        let legs = find(&balances, "Legs").antagonist.as_ref().unwrap().clone();
        assert_eq!(legs.direction, ImbalanceDirection::TooLittle);
    }

    #[test]
    fn test_severity_thresholds() {
        assert_eq!(severity_for(20.0), ImbalanceSeverity::Balanced);
        assert_eq!(severity_for(-25.0), ImbalanceSeverity::Mild);
        assert_eq!(severity_for(45.0), ImbalanceSeverity::Moderate);
        assert_eq!(severity_for(46.0), ImbalanceSeverity::Severe);
    }

    #[test]
    fn test_development_stage() {
        assert_eq!(development_stage(0.0, 3.0, 90.0), DevelopmentStage::Neglected);
        assert_eq!(development_stage(100.0, 0.4, 90.0), DevelopmentStage::Neglected);
        assert_eq!(development_stage(100.0, 2.0, 75.0), DevelopmentStage::Advanced);
        assert_eq!(development_stage(100.0, 2.0, 55.0), DevelopmentStage::Intermediate);
        assert_eq!(development_stage(100.0, 2.0, 10.0), DevelopmentStage::Beginner);
    }

    #[test]
    fn test_balance_history_uses_weekly_shares() {
        let catalog = split_catalog();
        let records = ideal_history(true);
        let (balances, _) = analyze(&records, &catalog, start() + Duration::days(70));

        let chest = find(&balances, "Chest");
        // Constant weekly share: fully consistent, no volatility
        assert!((chest.balance_history.consistency - 100.0).abs() < 1e-6);
        assert!(chest.balance_history.volatility.abs() < 1e-6);
        assert_eq!(chest.balance_history.trend, Trend::Stable);
    }

    #[test]
    fn test_balance_history_fallback_on_short_history() {
        let catalog = split_catalog();
        let records = vec![
            record("chest_work", 60.0, 8, 3, start()),
            record("chest_work", 60.0, 8, 3, start() + Duration::days(2)),
            record("chest_work", 70.0, 8, 3, start() + Duration::days(4)),
            record("chest_work", 72.0, 8, 3, start() + Duration::days(6)),
        ];
        let (balances, _) = analyze(&records, &catalog, start() + Duration::days(7));
        let chest = find(&balances, "Chest");
        assert_eq!(chest.balance_history.trend, Trend::Improving);
        assert!(chest.balance_history.consistency > 0.0);
    }
}
