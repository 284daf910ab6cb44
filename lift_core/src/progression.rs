//! Weight and volume progression for a category.
//!
//! A category's records are split at the midpoint of their time span and the
//! halves are compared two ways:
//! - Density: per-half average (average weight, or average weekly attributed volume)
//! - Individual: per-exercise change, averaged over exercises present in both halves
//!
//! The two are blended with a per-category density weight, damped when the
//! exercise mix changed between halves, and hard-clamped to ±200%.

use crate::effort::attributed_volume;
use crate::stats::{finite_or_zero, mean, percent_change};
use crate::types::{AnalysisContext, Entry};
use crate::weekday::{project, week_completion_fraction, week_start};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Hard limit on any progression percentage
pub const MAX_PROGRESSION: f64 = 200.0;

/// Progressions above this are damped when the exercise mix changed
const EXERCISE_CHANGE_LIMIT: f64 = 100.0;
const EXERCISE_CHANGE_DAMPED: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Measure {
    Weight,
    Volume,
}

/// Split chronologically sorted entries at the midpoint of their time span
///
/// Falls back to a count split when the time split would leave a half empty.
fn split_halves<'e, 'a>(entries: &'e [Entry<'a>]) -> Option<(&'e [Entry<'a>], &'e [Entry<'a>])> {
    if entries.len() < 2 {
        return None;
    }
    let first = entries.first()?.performed_at();
    let last = entries.last()?.performed_at();
    let midpoint = first + (last - first) / 2;

    let idx = entries.partition_point(|e| e.performed_at() <= midpoint);
    if idx > 0 && idx < entries.len() {
        return Some(entries.split_at(idx));
    }

    let idx = (entries.len() / 2).max(1);
    Some(entries.split_at(idx))
}

fn exercise_ids<'a>(half: &[Entry<'a>]) -> BTreeSet<&'a str> {
    half.iter().map(|e| e.exercise.id.as_str()).collect()
}

/// Average weekly attributed volume; the week containing `now` is projected to a full week
fn weekly_volume_average(half: &[Entry<'_>], category: Option<&str>, ctx: &AnalysisContext<'_>) -> f64 {
    let mut weeks: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in half {
        let volume = match category {
            Some(category) => attributed_volume(entry, category),
            None => entry.volume(),
        };
        *weeks.entry(week_start(entry.day())).or_default() += volume;
    }

    let current_week = week_start(ctx.now.date_naive());
    let factor = week_completion_fraction(ctx.now, ctx.schedule);
    let totals: Vec<f64> = weeks
        .into_iter()
        .map(|(week, total)| {
            if week == current_week {
                project(total, 0.0, factor).normalized_current
            } else {
                total
            }
        })
        .collect();
    mean(&totals)
}

fn density_value(half: &[Entry<'_>], measure: Measure, category: Option<&str>, ctx: &AnalysisContext<'_>) -> f64 {
    match measure {
        Measure::Weight => {
            let weights: Vec<f64> = half.iter().map(Entry::weight).collect();
            mean(&weights)
        }
        Measure::Volume => weekly_volume_average(half, category, ctx),
    }
}

fn individual_value(entry: &Entry<'_>, measure: Measure) -> f64 {
    match measure {
        Measure::Weight => entry.estimated_one_rep_max(),
        Measure::Volume => entry.volume(),
    }
}

/// Average per-exercise progression over exercises present in both halves
fn individual_progression(first: &[Entry<'_>], second: &[Entry<'_>], measure: Measure) -> f64 {
    let common: BTreeSet<&str> = exercise_ids(first)
        .intersection(&exercise_ids(second))
        .copied()
        .collect();

    let progressions: Vec<f64> = common
        .iter()
        .filter_map(|id| {
            let before: Vec<f64> = first
                .iter()
                .filter(|e| e.exercise.id == *id)
                .map(|e| individual_value(e, measure))
                .collect();
            let after: Vec<f64> = second
                .iter()
                .filter(|e| e.exercise.id == *id)
                .map(|e| individual_value(e, measure))
                .collect();
            let before = mean(&before);
            (before > 0.0).then(|| percent_change(before, mean(&after)))
        })
        .collect();

    mean(&progressions)
}

fn progression(entries: &[Entry<'_>], category: Option<&str>, measure: Measure, ctx: &AnalysisContext<'_>) -> f64 {
    let mut sorted: Vec<Entry<'_>> = entries
        .iter()
        .filter(|e| category.map_or(true, |c| e.has_category(c)))
        .copied()
        .collect();
    sorted.sort_by_key(|e| e.performed_at());

    let Some((first, second)) = split_halves(&sorted) else {
        return 0.0;
    };

    let first_avg = density_value(first, measure, category, ctx);
    if first_avg <= 0.0 {
        return 0.0;
    }
    let second_avg = density_value(second, measure, category, ctx);
    let density = percent_change(first_avg, second_avg);
    let individual = individual_progression(first, second, measure);

    let w = category.map_or(ctx.config.default_density_weight, |c| ctx.config.density_weight(c));
    let mut result = finite_or_zero(w * density + (1.0 - w) * individual);

    let first_ids = exercise_ids(first);
    let second_ids = exercise_ids(second);
    let common = first_ids.intersection(&second_ids).count();
    let changed_mix = (common as f64) < (first_ids.len().min(second_ids.len()) as f64) * 0.5;
    if changed_mix && result.abs() > EXERCISE_CHANGE_LIMIT {
        result = result.signum() * EXERCISE_CHANGE_DAMPED;
    }

    tracing::debug!(
        "{:?} progression for {}: density {:.1}%, individual {:.1}%, result {:.1}%",
        measure,
        category.unwrap_or("all categories"),
        density,
        individual,
        result
    );

    result.clamp(-MAX_PROGRESSION, MAX_PROGRESSION)
}

/// Weight progression (%) of `category` between the two halves of its history
///
/// Returns 0 for fewer than two records or a non-positive first-half average.
pub fn weight_progression(entries: &[Entry<'_>], category: &str, ctx: &AnalysisContext<'_>) -> f64 {
    progression(entries, Some(category), Measure::Weight, ctx)
}

/// Attributed-volume progression (%) of `category` between the two halves of its history
pub fn volume_progression(entries: &[Entry<'_>], category: &str, ctx: &AnalysisContext<'_>) -> f64 {
    progression(entries, Some(category), Measure::Volume, ctx)
}

/// Weight progression (%) over every record regardless of category
pub fn overall_weight_progression(entries: &[Entry<'_>], ctx: &AnalysisContext<'_>) -> f64 {
    progression(entries, None, Measure::Weight, ctx)
}

/// Full-volume progression (%) over every record regardless of category
pub fn overall_volume_progression(entries: &[Entry<'_>], ctx: &AnalysisContext<'_>) -> f64 {
    progression(entries, None, Measure::Volume, ctx)
}
