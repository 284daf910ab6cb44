//! Record validation.
//!
//! Records are re-checked before every analysis. A bad record is dropped with a
//! warning and never aborts the run.

use crate::types::{Entry, TrainingHistory, WorkoutRecord};
use chrono::Duration;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Why a record was dropped
fn rejection_reason(record: &WorkoutRecord, history: &TrainingHistory<'_>) -> Option<String> {
    if !record.weight.is_finite() || record.weight <= 0.0 {
        return Some(format!("invalid weight {}", record.weight));
    }
    if record.reps == 0 {
        return Some("zero reps".to_string());
    }
    if record.sets == 0 {
        return Some("zero sets".to_string());
    }
    if let Some(bad) = record
        .set_overrides
        .iter()
        .find(|s| !s.weight.is_finite() || s.weight <= 0.0 || s.reps == 0)
    {
        return Some(format!(
            "invalid set override ({} kg x {})",
            bad.weight, bad.reps
        ));
    }
    if record.performed_at > history.now + Duration::days(1) {
        return Some(format!("future timestamp {}", record.performed_at));
    }
    match history.catalog.get(&record.exercise_id) {
        None => Some(format!("unknown exercise '{}'", record.exercise_id)),
        Some(exercise) if exercise.categories.is_empty() => {
            Some(format!("exercise '{}' has no categories", exercise.id))
        }
        Some(_) => None,
    }
}

/// Keep the usable records, joined with their exercises, in chronological order
///
/// Duplicate record ids keep the first occurrence.
pub fn validate_records<'a>(history: &TrainingHistory<'a>) -> Vec<Entry<'a>> {
    let mut seen = BTreeSet::new();
    let mut entries = Vec::with_capacity(history.records.len());

    for record in history.records {
        if let Some(reason) = rejection_reason(record, history) {
            warn!("Dropping record {}: {}", record.id, reason);
            continue;
        }
        if !seen.insert(record.id) {
            warn!("Dropping record {}: duplicate id", record.id);
            continue;
        }
        // Checked above; the lookup cannot miss
        if let Some(exercise) = history.catalog.get(&record.exercise_id) {
            entries.push(Entry { record, exercise });
        }
    }

    entries.sort_by(|a, b| {
        a.performed_at()
            .cmp(&b.performed_at())
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    debug!(
        "Validated {} of {} records",
        entries.len(),
        history.records.len()
    );
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::types::SetOverride;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(exercise_id: &str, weight: f64, reps: u32, sets: u32, day: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            weight,
            reps,
            sets,
            performed_at: Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap(),
            set_overrides: vec![],
        }
    }

    #[test]
    fn test_drops_invalid_records() {
        crate::logging::init_test();
        let catalog = build_default_catalog();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        let mut bad_override = record("bench_press", 60.0, 8, 3, 2);
        bad_override.set_overrides = vec![SetOverride {
            weight: 60.0,
            reps: 0,
        }];

        let records = vec![
            record("bench_press", 60.0, 8, 3, 1),
            record("bench_press", 0.0, 8, 3, 1),
            record("bench_press", f64::INFINITY, 8, 3, 1),
            record("bench_press", 60.0, 0, 3, 1),
            record("bench_press", 60.0, 8, 0, 1),
            record("bench_press", 60.0, 8, 3, 20),
            record("no_such_lift", 60.0, 8, 3, 1),
            bad_override,
        ];
        let history = TrainingHistory::new(&records, &catalog, now);

        let entries = validate_records(&history);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record.id, records[0].id);
    }

    #[test]
    fn test_allows_up_to_one_day_ahead() {
        let catalog = build_default_catalog();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let records = vec![record("bench_press", 60.0, 8, 3, 11)];
        let history = TrainingHistory::new(&records, &catalog, now);

        assert_eq!(validate_records(&history).len(), 1);
    }

    #[test]
    fn test_dedups_and_sorts() {
        let catalog = build_default_catalog();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let later = record("back_squat", 100.0, 5, 5, 5);
        let earlier = record("bench_press", 60.0, 8, 3, 1);
        let mut duplicate = later.clone();
        duplicate.weight = 999.0;

        let records = vec![later.clone(), earlier.clone(), duplicate];
        let history = TrainingHistory::new(&records, &catalog, now);
        let entries = validate_records(&history);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].record.id, earlier.id);
        assert_eq!(entries[1].record.id, later.id);
        assert_eq!(entries[1].weight(), 100.0);
    }
}
