//! Effort distribution resolver.
//!
//! Attributes the training effect of a multi-category exercise to its
//! categories. Resolution order:
//!
//! 1. Known-exercise table (exact name, then the longest contained name)
//! 2. Name patterns
//! 3. Conservative fallback: 70% to the first category, 30% split over the rest
//!
//! A single-category exercise always resolves to 100%.

use crate::types::{EffortDistribution, Entry};
use once_cell::sync::Lazy;
use regex::Regex;

type Split = &'static [(&'static str, f64)];

/// Share of effort the first-listed category receives in the fallback split
const PRIMARY_SHARE: f64 = 0.7;

static KNOWN_EXERCISES: &[(&str, Split)] = &[
    // Legs
    ("leg press", &[("Legs", 1.0)]),
    ("bulgarian split squat", &[("Legs", 0.85), ("Core", 0.15)]),
    ("leg extension", &[("Legs", 1.0)]),
    ("leg curl", &[("Legs", 1.0)]),
    ("calf raise", &[("Legs", 1.0)]),
    ("hip thrust", &[("Legs", 0.9), ("Core", 0.1)]),
    ("walking lunge", &[("Legs", 0.9), ("Core", 0.1)]),
    ("romanian deadlift", &[("Legs", 0.7), ("Back", 0.3)]),
    ("deadlift", &[("Back", 0.5), ("Legs", 0.4), ("Core", 0.1)]),
    // Chest
    ("incline dumbbell press", &[("Chest", 0.7), ("Shoulders", 0.2), ("Arms", 0.1)]),
    ("dumbbell bench press", &[("Chest", 0.7), ("Shoulders", 0.2), ("Arms", 0.1)]),
    ("parallel bar dips", &[("Chest", 0.6), ("Arms", 0.3), ("Shoulders", 0.1)]),
    ("cable crossover", &[("Chest", 0.9), ("Shoulders", 0.1)]),
    ("machine pullover", &[("Chest", 0.6), ("Back", 0.4)]),
    // Back
    ("pull-up", &[("Back", 0.7), ("Arms", 0.3)]),
    ("chest-supported row", &[("Back", 0.8), ("Arms", 0.2)]),
    ("single-arm dumbbell row", &[("Back", 0.8), ("Arms", 0.2)]),
    // Shoulders
    ("overhead press", &[("Shoulders", 0.7), ("Arms", 0.2), ("Core", 0.1)]),
    ("lateral raise", &[("Shoulders", 1.0)]),
    ("reverse pec deck", &[("Shoulders", 0.8), ("Back", 0.2)]),
    // Arms
    ("tricep pushdown", &[("Arms", 1.0)]),
    ("incline dumbbell curl", &[("Arms", 1.0)]),
    // Core
    ("plank", &[("Core", 1.0)]),
    ("hanging leg raise", &[("Core", 0.8), ("Arms", 0.2)]),
    ("ab wheel rollout", &[("Core", 0.9), ("Arms", 0.1)]),
];

/// Name patterns, first match wins
static PATTERN_SOURCES: &[(&str, Split)] = &[
    (r"leg.*press|squat", &[("Legs", 0.9), ("Core", 0.1)]),
    (r"quad.*extension|leg extension", &[("Legs", 1.0)]),
    (r"hamstring.*curl|leg curl", &[("Legs", 1.0)]),
    (r"calf.*raise", &[("Legs", 1.0)]),
    (r"rear.*delt|reverse.*(fly|pec)", &[("Shoulders", 0.8), ("Back", 0.2)]),
    (r"bench.*press", &[("Chest", 0.7), ("Shoulders", 0.2), ("Arms", 0.1)]),
    (r"\bdips?\b", &[("Chest", 0.6), ("Arms", 0.3), ("Shoulders", 0.1)]),
    (r"\bfl(y|ies)\b|crossover", &[("Chest", 0.9), ("Shoulders", 0.1)]),
    (r"pull.*up|chin.*up", &[("Back", 0.7), ("Arms", 0.3)]),
    (r"\brow", &[("Back", 0.8), ("Arms", 0.2)]),
    (r"pullover", &[("Chest", 0.6), ("Back", 0.4)]),
    (
        r"overhead.*press|military.*press|shoulder.*press",
        &[("Shoulders", 0.7), ("Arms", 0.2), ("Core", 0.1)],
    ),
    (r"lateral.*raise|front.*raise", &[("Shoulders", 1.0)]),
    (r"curl", &[("Arms", 1.0)]),
    (r"tricep", &[("Arms", 1.0)]),
    (r"plank", &[("Core", 1.0)]),
    (r"crunch|sit.*up", &[("Core", 1.0)]),
    (r"ab.*wheel", &[("Core", 0.9), ("Arms", 0.1)]),
];

static PATTERNS: Lazy<Vec<(Regex, Split)>> = Lazy::new(|| {
    PATTERN_SOURCES
        .iter()
        .filter_map(|(source, split)| match Regex::new(&format!("(?i){}", source)) {
            Ok(re) => Some((re, *split)),
            Err(e) => {
                tracing::warn!("Skipping effort pattern {:?}: {}", source, e);
                None
            }
        })
        .collect()
});

fn share(split: Split, category: &str) -> f64 {
    split
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, v)| *v)
        .unwrap_or(0.0)
}

/// Exact (case-insensitive) known-exercise match, else the longest known name contained in `name`
fn known_split(name: &str) -> Option<Split> {
    let lowered = name.to_lowercase();
    if let Some(&(_, split)) = KNOWN_EXERCISES.iter().find(|(known, _)| *known == lowered) {
        return Some(split);
    }

    let mut best: Option<(&str, Split)> = None;
    for &(known, split) in KNOWN_EXERCISES {
        if lowered.contains(known) && best.map_or(true, |(b, _)| known.len() > b.len()) {
            best = Some((known, split));
        }
    }
    best.map(|(_, split)| split)
}

fn pattern_split(name: &str) -> Option<Split> {
    PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(name))
        .map(|(_, split)| *split)
}

/// Renormalize the table over the categories it covers; categories it misses get 0
fn from_known(categories: &[&str], split: Split) -> Option<EffortDistribution> {
    let total: f64 = categories.iter().map(|c| share(split, c)).sum();
    if total <= 0.0 {
        return None;
    }
    Some(
        categories
            .iter()
            .map(|c| (c.to_string(), share(split, c) / total))
            .collect(),
    )
}

/// Covered categories keep the pattern's share; the remainder is split evenly
/// over uncovered categories
fn from_pattern(categories: &[&str], split: Split) -> Option<EffortDistribution> {
    let total: f64 = categories.iter().map(|c| share(split, c)).sum();
    if total <= 0.0 {
        return None;
    }

    let uncovered = categories.iter().filter(|c| share(split, c) <= 0.0).count();
    if uncovered == 0 || total >= 1.0 {
        return from_known(categories, split);
    }

    let per_uncovered = (1.0 - total) / uncovered as f64;
    Some(
        categories
            .iter()
            .map(|c| {
                let covered = share(split, c);
                let value = if covered > 0.0 { covered } else { per_uncovered };
                (c.to_string(), value)
            })
            .collect(),
    )
}

fn conservative(categories: &[&str]) -> EffortDistribution {
    let mut distribution = EffortDistribution::new();
    let Some((primary, rest)) = categories.split_first() else {
        return distribution;
    };
    if rest.is_empty() {
        distribution.insert(primary.to_string(), 1.0);
        return distribution;
    }

    distribution.insert(primary.to_string(), PRIMARY_SHARE);
    let per_secondary = (1.0 - PRIMARY_SHARE) / rest.len() as f64;
    for category in rest {
        distribution.insert(category.to_string(), per_secondary);
    }
    distribution
}

/// Fractional effort per category for an exercise
///
/// Returns an empty map for no categories; otherwise the values sum to 1.
/// Repeated categories are counted once.
pub fn resolve_category_effort<S: AsRef<str>>(
    categories: &[S],
    exercise_name: Option<&str>,
) -> EffortDistribution {
    let mut unique: Vec<&str> = Vec::with_capacity(categories.len());
    for category in categories.iter().map(|c| c.as_ref()) {
        if !category.is_empty() && !unique.contains(&category) {
            unique.push(category);
        }
    }

    if unique.len() <= 1 {
        return conservative(&unique);
    }

    let Some(name) = exercise_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return conservative(&unique);
    };

    if let Some(distribution) = known_split(name).and_then(|split| from_known(&unique, split)) {
        return distribution;
    }
    if let Some(distribution) = pattern_split(name).and_then(|split| from_pattern(&unique, split)) {
        return distribution;
    }
    conservative(&unique)
}

/// Share of an entry's volume attributed to `category`
pub fn attributed_volume(entry: &Entry<'_>, category: &str) -> f64 {
    let effort = resolve_category_effort(entry.categories(), Some(entry.name()));
    entry.volume() * effort.get(category).copied().unwrap_or(0.0)
}
