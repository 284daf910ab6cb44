//! Core domain types for the training analytics engine.
//!
//! This module defines:
//! - Input records, exercises and the weekly assignment schedule
//! - The validated `Entry` view the engine computes over
//! - Derived outputs (category metrics, muscle balance, progress prediction)

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::catalog::ExerciseCatalog;
use crate::config::AnalysisConfig;
use crate::strength::estimate_one_rep_max;

// ============================================================================
// Input Types
// ============================================================================

/// A single set that supersedes the record's aggregate weight/reps for volume math
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetOverride {
    pub weight: f64,
    pub reps: u32,
}

/// One logged set-group for one exercise on one date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub exercise_id: String,
    pub weight: f64,
    pub reps: u32,
    pub sets: u32,
    pub performed_at: DateTime<Utc>,
    #[serde(default)]
    pub set_overrides: Vec<SetOverride>,
}

impl WorkoutRecord {
    /// Total lifted volume: sum of per-set overrides when present, else weight × reps × sets
    pub fn volume(&self) -> f64 {
        if self.set_overrides.is_empty() {
            self.weight * f64::from(self.reps) * f64::from(self.sets)
        } else {
            self.set_overrides
                .iter()
                .map(|s| s.weight * f64::from(s.reps))
                .sum()
        }
    }
}

/// An exercise catalog entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// Ordered category list; the first entry is the primary category
    pub categories: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An exercise scheduled on a given weekday
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyAssignment {
    pub exercise_id: String,
    pub day: Weekday,
}

/// Everything one engine call reads
///
/// `now` is supplied by the caller so that results depend only on this value.
#[derive(Clone, Copy, Debug)]
pub struct TrainingHistory<'a> {
    pub records: &'a [WorkoutRecord],
    pub catalog: &'a ExerciseCatalog,
    pub schedule: &'a [WeeklyAssignment],
    pub now: DateTime<Utc>,
}

impl<'a> TrainingHistory<'a> {
    pub fn new(
        records: &'a [WorkoutRecord],
        catalog: &'a ExerciseCatalog,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            records,
            catalog,
            schedule: &[],
            now,
        }
    }

    pub fn with_schedule(mut self, schedule: &'a [WeeklyAssignment]) -> Self {
        self.schedule = schedule;
        self
    }
}

/// A validated record joined with its exercise
#[derive(Clone, Copy, Debug)]
pub struct Entry<'a> {
    pub record: &'a WorkoutRecord,
    pub exercise: &'a Exercise,
}

impl<'a> Entry<'a> {
    pub fn name(&self) -> &'a str {
        &self.exercise.name
    }

    pub fn categories(&self) -> &'a [String] {
        &self.exercise.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.exercise.categories.iter().any(|c| c == category)
    }

    pub fn weight(&self) -> f64 {
        self.record.weight
    }

    pub fn reps(&self) -> u32 {
        self.record.reps
    }

    pub fn sets(&self) -> u32 {
        self.record.sets
    }

    pub fn performed_at(&self) -> DateTime<Utc> {
        self.record.performed_at
    }

    pub fn day(&self) -> NaiveDate {
        self.record.performed_at.date_naive()
    }

    pub fn volume(&self) -> f64 {
        self.record.volume()
    }

    pub fn estimated_one_rep_max(&self) -> f64 {
        estimate_one_rep_max(self.record.weight, self.record.reps)
    }
}

// ============================================================================
// Classification Enums
// ============================================================================

/// Direction of a category's recent performance
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
    Declining,
}

/// Strength level from the estimated 1RM against a per-category threshold table
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Urgency of addressing a category's balance
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DevelopmentStage {
    Neglected,
    Beginner,
    Intermediate,
    Advanced,
}

/// How far a category/antagonist volume ratio sits from its ideal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ImbalanceSeverity {
    Balanced,
    Mild,
    Moderate,
    Severe,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ImbalanceDirection {
    Balanced,
    TooMuch,
    TooLittle,
}

/// Overall trend label of a progress prediction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionTrend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

// ============================================================================
// Category Metrics
// ============================================================================

/// Attributed volume per calendar period, relative to the analysis date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PeriodVolume {
    pub this_week: f64,
    pub last_week: f64,
    pub this_month: f64,
    pub last_month: f64,
    /// `this_week` projected to a full week
    pub this_week_projected: f64,
    pub weekday_factor: f64,
    /// Percent change from last week to the projected current week
    pub week_over_week: f64,
}

/// Best single training day for a category
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BestSession {
    pub date: NaiveDate,
    pub volume: f64,
    pub max_weight: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SessionPerformance {
    pub best_session: Option<BestSession>,
    pub average_session_volume: f64,
    pub volume_per_workout: f64,
    pub sessions_above_average: usize,
}

/// Derived metrics for one category present in the records
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryMetrics {
    pub category: String,
    /// Evenly split across an exercise's categories, so fractional
    pub workouts: f64,
    /// Effort-weighted volume attributed to this category
    pub total_volume: f64,
    pub avg_weight: f64,
    pub max_weight: f64,
    pub min_weight: f64,
    pub avg_sets: f64,
    pub avg_reps: f64,
    pub total_sets: u64,
    pub total_reps: u64,
    pub avg_workouts_per_week: f64,
    pub recent_improvement: bool,
    pub last_workout: DateTime<Utc>,
    pub percentage: f64,
    pub estimated_one_rep_max: f64,
    pub weight_progression: f64,
    pub volume_progression: f64,
    pub intensity_score: f64,
    pub efficiency_score: f64,
    pub consistency_score: f64,
    pub trend: Trend,
    pub strength_level: StrengthLevel,
    pub days_since_last_workout: i64,
    pub personal_records: usize,
    pub volume_distribution: PeriodVolume,
    pub performance: SessionPerformance,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

// ============================================================================
// Muscle Balance
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BalanceHistory {
    pub trend: Trend,
    pub consistency: f64,
    pub volatility: f64,
}

/// Volume of a category relative to its antagonist
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AntagonistBalance {
    pub antagonist: String,
    pub ratio: f64,
    pub ideal_ratio: f64,
    /// Percent deviation of `ratio` from `ideal_ratio`
    pub deviation: f64,
    pub severity: ImbalanceSeverity,
    pub direction: ImbalanceDirection,
}

/// Balance assessment for one category, including categories with no volume
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MuscleBalance {
    pub category: String,
    pub volume: f64,
    pub percentage: f64,
    pub ideal_percentage: f64,
    pub deviation: f64,
    pub is_balanced: bool,
    pub symmetry_score: f64,
    pub antagonist: Option<AntagonistBalance>,
    pub strength_index: f64,
    pub progress_trend: Trend,
    pub priority: Priority,
    pub development_stage: DevelopmentStage,
    pub weekly_frequency: f64,
    pub intensity_score: f64,
    pub balance_history: BalanceHistory,
    pub recommendation: String,
    pub specific_recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Result of a full category analysis
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CategoryAnalysis {
    pub category_metrics: Vec<CategoryMetrics>,
    pub muscle_balance: Vec<MuscleBalance>,
    pub dominant_category: Option<String>,
    pub least_trained_category: Option<String>,
    pub balance_score: f64,
    /// Damping factor applied to balance scores, 0.3 for short histories up to 1.0
    pub temporal_factor: f64,
}

// ============================================================================
// Progress Prediction
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PredictedPr {
    pub weight: f64,
    /// 0.0 - 1.0
    pub confidence: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressPrediction {
    pub next_week_volume: f64,
    pub next_week_weight: f64,
    pub monthly_growth_rate: f64,
    pub predicted_pr: PredictedPr,
    pub plateau_risk: f64,
    pub trend: PredictionTrend,
    pub weeks_to_next_pr: f64,
    pub confidence: f64,
    pub volume_trend: f64,
    pub strength_trend: f64,
    pub experience_level: Option<ExperienceLevel>,
    pub recommendations: Vec<String>,
}

// ============================================================================
// Period Comparison
// ============================================================================

/// A window of whole calendar weeks ending with the current week
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonPeriod {
    ThisWeek,
    LastTwoWeeks,
    LastMonth,
    LastThreeMonths,
}

impl ComparisonPeriod {
    pub const ALL: [ComparisonPeriod; 4] = [
        ComparisonPeriod::ThisWeek,
        ComparisonPeriod::LastTwoWeeks,
        ComparisonPeriod::LastMonth,
        ComparisonPeriod::LastThreeMonths,
    ];

    /// Length of the window, and of the window it is compared against
    pub fn weeks(self) -> i64 {
        match self {
            ComparisonPeriod::ThisWeek => 1,
            ComparisonPeriod::LastTwoWeeks => 2,
            ComparisonPeriod::LastMonth => 4,
            ComparisonPeriod::LastThreeMonths => 12,
        }
    }

    /// History span needed before changes are reported: two full windows
    pub fn min_history_days(self) -> i64 {
        self.weeks() * 14
    }
}

/// One window's totals and its change against the preceding window of equal length
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PeriodComparison {
    pub period: ComparisonPeriod,
    pub workouts: usize,
    pub total_volume: f64,
    pub avg_one_rep_max: f64,
    /// Percent change in average volume per record
    pub volume_change: f64,
    /// Percent change in average estimated 1RM
    pub strength_change: f64,
    /// Mean of `volume_change` and `strength_change`
    pub improvement: f64,
    /// False when the history is too short or either window has fewer than two records
    pub comparable: bool,
}

// ============================================================================
// Workout Habits
// ============================================================================

/// Runs of consecutive training days
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkoutStreaks {
    /// Run ending today or yesterday; 0 once a full day is missed
    pub current: u32,
    pub longest: u32,
    pub average: f64,
}

/// Part of the day a record was logged in (UTC)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 06:00 - 11:59
    Morning,
    /// 12:00 - 17:59
    Afternoon,
    /// 18:00 - 21:59
    Evening,
    Night,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkoutHabits {
    pub training_days: usize,
    /// Distinct training days per week with at least one session
    pub sessions_per_week: f64,
    pub preferred_day: Option<Weekday>,
    pub preferred_time: Option<TimeOfDay>,
    pub days_since_last_workout: Option<i64>,
    pub streaks: WorkoutStreaks,
}

// ============================================================================
// Fatigue
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FatigueLevel {
    #[default]
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// Direction of per-session volume between the two most recent weeks
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadTrend {
    Increasing,
    #[default]
    Stable,
    Decreasing,
}

/// Component stresses, each 0-100
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct StressFactors {
    pub volume: f64,
    pub frequency: f64,
    pub intensity: f64,
    pub recovery: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FatigueAnalysis {
    /// 0-100; higher means more accumulated fatigue
    pub fatigue_index: f64,
    pub fatigue_level: FatigueLevel,
    pub overreaching_risk: RiskLevel,
    /// Whole days since the last logged record
    pub recovery_days: i64,
    /// Per-session volume fell more than 15% week over week
    pub volume_drop: bool,
    /// Percent change in volume per record, last week against the week before
    pub volume_change: f64,
    pub workload_trend: WorkloadTrend,
    pub recovery_rate: f64,
    pub recovery_score: f64,
    pub stress_factors: StressFactors,
    pub predicted_recovery_hours: f64,
    /// Whether recent load changes point toward better or worse recovery
    pub fatigue_trend: Trend,
    /// 100 minus the absolute volume change, 0-100
    pub load_consistency: f64,
    pub rest_recommendation: String,
    pub recommendations: Vec<String>,
}

/// Effort fraction per category; values sum to 1 for a non-empty map
pub type EffortDistribution = BTreeMap<String, f64>;

/// Per-call settings shared by the analyzers
#[derive(Clone, Copy, Debug)]
pub struct AnalysisContext<'a> {
    pub config: &'a AnalysisConfig,
    pub now: DateTime<Utc>,
    pub schedule: &'a [WeeklyAssignment],
}
