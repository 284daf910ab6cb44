//! Training habits: streaks of consecutive days and when sessions happen.

use crate::stats::{mean, safe_div};
use crate::types::{Entry, TimeOfDay, WorkoutHabits, WorkoutStreaks};
use crate::weekday::week_start;
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};
use std::collections::{BTreeMap, BTreeSet};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn time_of_day(at: DateTime<Utc>) -> TimeOfDay {
    match at.hour() {
        6..=11 => TimeOfDay::Morning,
        12..=17 => TimeOfDay::Afternoon,
        18..=21 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}

/// Streaks over sorted, distinct training days
///
/// The current streak counts only while the last training day is today or
/// yesterday.
pub fn workout_streaks(days: &[NaiveDate], today: NaiveDate) -> WorkoutStreaks {
    let Some(&last) = days.last() else {
        return WorkoutStreaks::default();
    };

    let mut runs = Vec::new();
    let mut run = 1u32;
    for pair in days.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
        } else {
            runs.push(run);
            run = 1;
        }
    }
    runs.push(run);

    let current = if (today - last).num_days() <= 1 { run } else { 0 };
    let lengths: Vec<f64> = runs.iter().map(|r| f64::from(*r)).collect();

    WorkoutStreaks {
        current,
        longest: runs.iter().copied().max().unwrap_or(0),
        average: mean(&lengths),
    }
}

/// Most frequent key; ties go to the smallest key
fn most_common<K: Ord + Copy>(counts: &BTreeMap<K, usize>) -> Option<K> {
    counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(key, _)| *key)
}

/// Streaks, preferred weekday and time of day, and weekly session rate
///
/// Weekdays count distinct training days; times of day count records.
pub fn workout_habits(entries: &[Entry<'_>], now: DateTime<Utc>) -> WorkoutHabits {
    if entries.is_empty() {
        return WorkoutHabits::default();
    }

    let days: BTreeSet<NaiveDate> = entries.iter().map(Entry::day).collect();
    let weeks: BTreeSet<NaiveDate> = days.iter().map(|d| week_start(*d)).collect();
    let days: Vec<NaiveDate> = days.into_iter().collect();

    let mut by_weekday: BTreeMap<u32, usize> = BTreeMap::new();
    for day in &days {
        *by_weekday.entry(day.weekday().num_days_from_monday()).or_default() += 1;
    }
    let mut by_time: BTreeMap<TimeOfDay, usize> = BTreeMap::new();
    for entry in entries {
        *by_time.entry(time_of_day(entry.performed_at())).or_default() += 1;
    }

    let today = now.date_naive();
    let days_since_last_workout = days.last().map(|last| (today - *last).num_days().max(0));

    WorkoutHabits {
        training_days: days.len(),
        sessions_per_week: safe_div(days.len() as f64, weeks.len() as f64),
        preferred_day: most_common(&by_weekday).and_then(|d| WEEKDAYS.get(d as usize).copied()),
        preferred_time: most_common(&by_time),
        days_since_last_workout,
        streaks: workout_streaks(&days, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_default_catalog;
    use crate::types::{TrainingHistory, WorkoutRecord};
    use crate::validate::validate_records;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn record(d: u32, hour: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            exercise_id: "back_squat".into(),
            weight: 100.0,
            reps: 5,
            sets: 5,
            performed_at: Utc.with_ymd_and_hms(2024, 3, d, hour, 0, 0).unwrap(),
            set_overrides: vec![],
        }
    }

    #[test]
    fn test_streaks_empty() {
        assert_eq!(workout_streaks(&[], day(10)), WorkoutStreaks::default());
    }

    #[test]
    fn test_streak_runs() {
        // Runs of 3, 1 and 2 days
        let days = [day(1), day(2), day(3), day(6), day(9), day(10)];

        let streaks = workout_streaks(&days, day(10));
        assert_eq!(streaks.longest, 3);
        assert_eq!(streaks.current, 2);
        assert!((streaks.average - 2.0).abs() < 1e-9);

        assert_eq!(workout_streaks(&days, day(11)).current, 2);
        assert_eq!(workout_streaks(&days, day(12)).current, 0);
    }

    #[test]
    fn test_single_day() {
        let streaks = workout_streaks(&[day(4)], day(4));
        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.longest, 1);
        assert_eq!(streaks.average, 1.0);
    }

    #[test]
    fn test_time_of_day_buckets() {
        let at = |hour: u32| Utc.with_ymd_and_hms(2024, 3, 4, hour, 30, 0).unwrap();
        assert_eq!(time_of_day(at(5)), TimeOfDay::Night);
        assert_eq!(time_of_day(at(6)), TimeOfDay::Morning);
        assert_eq!(time_of_day(at(12)), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(at(21)), TimeOfDay::Evening);
        assert_eq!(time_of_day(at(22)), TimeOfDay::Night);
    }

    #[test]
    fn test_habits() {
        let catalog = build_default_catalog();
        // Mondays 4, 11 and 18 in the evening, plus Wednesday 6 in the morning twice
        let records = vec![
            record(4, 19),
            record(6, 7),
            record(6, 8),
            record(11, 19),
            record(18, 20),
        ];
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let history = TrainingHistory::new(&records, &catalog, now);
        let entries = validate_records(&history);

        let habits = workout_habits(&entries, now);
        assert_eq!(habits.training_days, 4);
        assert!((habits.sessions_per_week - 4.0 / 3.0).abs() < 1e-9);
        assert_eq!(habits.preferred_day, Some(Weekday::Mon));
        assert_eq!(habits.preferred_time, Some(TimeOfDay::Evening));
        assert_eq!(habits.days_since_last_workout, Some(2));
        assert_eq!(habits.streaks.longest, 1);
        assert_eq!(habits.streaks.current, 0);
    }

    #[test]
    fn test_ties_go_to_earlier_key() {
        let mut counts = BTreeMap::new();
        counts.insert(TimeOfDay::Evening, 2);
        counts.insert(TimeOfDay::Morning, 2);
        assert_eq!(most_common(&counts), Some(TimeOfDay::Morning));
    }

    #[test]
    fn test_no_records() {
        let habits = workout_habits(&[], Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap());
        assert_eq!(habits, WorkoutHabits::default());
        assert_eq!(habits.preferred_day, None);
    }
}
