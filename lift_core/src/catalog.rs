//! Exercise catalog and the built-in default set of common lifts.
//!
//! Records reference exercises by id; an exercise's categories come from here.

use crate::types::Exercise;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Exercise lookup keyed by id
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ExerciseCatalog {
    #[serde(default)]
    pub exercises: BTreeMap<String, Exercise>,
}

impl ExerciseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of exercises; a later duplicate id replaces an earlier one
    pub fn from_exercises(exercises: impl IntoIterator<Item = Exercise>) -> Self {
        let mut catalog = Self::new();
        for exercise in exercises {
            catalog.insert(exercise);
        }
        catalog
    }

    pub fn insert(&mut self, exercise: Exercise) {
        self.exercises.insert(exercise.id.clone(), exercise);
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.values()
    }

    /// Case-insensitive lookup by display name or alias
    pub fn find_by_name(&self, name: &str) -> Option<&Exercise> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.exercises.values().find(|e| {
            e.name.to_lowercase() == needle
                || e.aliases.iter().any(|a| a.to_lowercase() == needle)
        })
    }

    /// Every distinct category referenced by the catalog, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .exercises
            .values()
            .flat_map(|e| e.categories.iter().cloned())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Validate catalog integrity
    ///
    /// Returns a list of problems; empty means the catalog is usable as-is.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, exercise) in &self.exercises {
            if id.trim().is_empty() {
                errors.push("Exercise with empty id".to_string());
            }
            if id != &exercise.id {
                errors.push(format!(
                    "Exercise key '{}' does not match its id '{}'",
                    id, exercise.id
                ));
            }
            if exercise.name.trim().is_empty() {
                errors.push(format!("Exercise '{}' has an empty name", id));
            }
            if exercise.categories.is_empty() {
                errors.push(format!("Exercise '{}' has no categories", id));
            }
            if exercise.categories.iter().any(|c| c.trim().is_empty()) {
                errors.push(format!("Exercise '{}' has a blank category", id));
            }
        }

        errors
    }
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

fn exercise(id: &str, name: &str, categories: &[&str], aliases: &[&str]) -> Exercise {
    Exercise {
        id: id.into(),
        name: name.into(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
        description: None,
    }
}

/// Builds the default catalog of common barbell, dumbbell and machine lifts
pub fn build_default_catalog() -> ExerciseCatalog {
    ExerciseCatalog::from_exercises([
        // ====================================================================
        // Chest
        // ====================================================================
        exercise("bench_press", "Bench Press", &["Chest", "Shoulders", "Arms"], &["Barbell Bench Press"]),
        exercise("incline_db_press", "Incline Dumbbell Press", &["Chest", "Shoulders"], &["Incline DB Press"]),
        exercise("db_bench_press", "Dumbbell Bench Press", &["Chest", "Shoulders", "Arms"], &["DB Bench Press"]),
        exercise("dips", "Parallel Bar Dips", &["Chest", "Arms", "Shoulders"], &["Dips"]),
        exercise("cable_crossover", "Cable Crossover", &["Chest"], &["Cable Fly"]),
        exercise("push_up", "Push-up", &["Chest", "Arms"], &["Pushup"]),
        // ====================================================================
        // Back
        // ====================================================================
        exercise("pull_up", "Pull-up", &["Back", "Arms"], &["Pullup", "Chin-up"]),
        exercise("barbell_row", "Barbell Row", &["Back", "Arms"], &["Bent-over Row"]),
        exercise("chest_supported_row", "Chest-Supported Row", &["Back", "Arms"], &[]),
        exercise("single_arm_db_row", "Single-Arm Dumbbell Row", &["Back", "Arms"], &["One-Arm Row"]),
        exercise("lat_pulldown", "Lat Pulldown", &["Back", "Arms"], &[]),
        exercise("machine_pullover", "Machine Pullover", &["Back", "Chest"], &[]),
        exercise("deadlift", "Deadlift", &["Back", "Legs", "Core"], &["Conventional Deadlift"]),
        // ====================================================================
        // Legs
        // ====================================================================
        exercise("back_squat", "Back Squat", &["Legs", "Core"], &["Squat"]),
        exercise("leg_press", "Leg Press", &["Legs"], &[]),
        exercise("bulgarian_split_squat", "Bulgarian Split Squat", &["Legs", "Core"], &[]),
        exercise("romanian_deadlift", "Romanian Deadlift", &["Legs", "Back"], &["RDL"]),
        exercise("hip_thrust", "Hip Thrust", &["Legs", "Core"], &[]),
        exercise("walking_lunge", "Walking Lunge", &["Legs", "Core"], &["Lunge"]),
        // ====================================================================
        // Shoulders
        // ====================================================================
        exercise("overhead_press", "Overhead Press", &["Shoulders", "Arms", "Core"], &["OHP", "Military Press"]),
        exercise("lateral_raise", "Lateral Raise", &["Shoulders"], &[]),
        exercise("reverse_pec_deck", "Reverse Pec Deck", &["Shoulders", "Back"], &["Rear Delt Fly"]),
        // ====================================================================
        // Arms
        // ====================================================================
        exercise("barbell_curl", "Barbell Curl", &["Arms"], &["Biceps Curl"]),
        exercise("tricep_pushdown", "Tricep Pushdown", &["Arms"], &[]),
        // ====================================================================
        // Core
        // ====================================================================
        exercise("hanging_leg_raise", "Hanging Leg Raise", &["Core", "Arms"], &[]),
        exercise("ab_wheel", "Ab Wheel Rollout", &["Core", "Arms"], &["Ab Wheel"]),
        exercise("plank", "Plank", &["Core"], &[]),
    ])
}
