//! Analytics engine entry points.
//!
//! One call runs the whole pipeline serially on the caller's thread:
//! 1. Validate records against the catalog (bad records are dropped, never fatal)
//! 2. Aggregate per-category metrics
//! 3. Analyze muscle balance against the ideal distribution
//! 4. Predict short-term progress
//!
//! Period comparison, habits and fatigue are separate calls over the same
//! validated records.
//!
//! The engine holds only its reference tables, so it can be shared freely and
//! repeated calls on the same history produce identical output.

use crate::balance::{analyze_muscle_balance, balance_score};
use crate::config::AnalysisConfig;
use crate::effort;
use crate::fatigue;
use crate::habits;
use crate::metrics::compute_category_metrics;
use crate::periods;
use crate::predict;
use crate::progression;
use crate::types::{
    AnalysisContext, CategoryAnalysis, EffortDistribution, Entry, FatigueAnalysis, MuscleBalance,
    PeriodComparison, ProgressPrediction, TrainingHistory, WorkoutHabits,
};
use crate::validate::validate_records;

/// Training analytics over a record history
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: AnalysisConfig,
}

impl Engine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn context<'a>(&'a self, history: &TrainingHistory<'a>) -> AnalysisContext<'a> {
        AnalysisContext {
            config: &self.config,
            now: history.now,
            schedule: history.schedule,
        }
    }

    /// Records that survive validation, chronologically sorted
    pub fn validate<'a>(&self, history: &TrainingHistory<'a>) -> Vec<Entry<'a>> {
        validate_records(history)
    }

    /// Per-category metrics, muscle balance and the overall balance score
    pub fn analyze_category_statistics(&self, history: &TrainingHistory<'_>) -> CategoryAnalysis {
        let ctx = self.context(history);
        let entries = self.validate(history);

        let category_metrics = compute_category_metrics(&entries, &ctx);
        let (muscle_balance, temporal_factor) =
            analyze_muscle_balance(&category_metrics, &entries, &ctx);

        let dominant_category = category_metrics
            .iter()
            .find(|m| m.total_volume > 0.0)
            .map(|m| m.category.clone());
        let least_trained_category = least_trained(&muscle_balance);
        let balance_score = balance_score(&muscle_balance);

        tracing::info!(
            "Analyzed {} records across {} categories (balance score {:.1})",
            entries.len(),
            category_metrics.len(),
            balance_score
        );

        CategoryAnalysis {
            category_metrics,
            muscle_balance,
            dominant_category,
            least_trained_category,
            balance_score,
            temporal_factor,
        }
    }

    pub fn predict_progress(&self, history: &TrainingHistory<'_>) -> ProgressPrediction {
        let ctx = self.context(history);
        let entries = self.validate(history);
        let prediction = predict::predict_progress(&entries, &ctx);

        tracing::info!(
            "Predicted progress from {} records: {:?}",
            entries.len(),
            prediction.trend
        );
        prediction
    }

    /// Weight progression (%) of one category, or of the whole history when `category` is `None`
    pub fn weight_progression(&self, history: &TrainingHistory<'_>, category: Option<&str>) -> f64 {
        let ctx = self.context(history);
        let entries = self.validate(history);
        match category {
            Some(category) => progression::weight_progression(&entries, category, &ctx),
            None => progression::overall_weight_progression(&entries, &ctx),
        }
    }

    /// Volume progression (%) of one category, or of the whole history when `category` is `None`
    pub fn volume_progression(&self, history: &TrainingHistory<'_>, category: Option<&str>) -> f64 {
        let ctx = self.context(history);
        let entries = self.validate(history);
        match category {
            Some(category) => progression::volume_progression(&entries, category, &ctx),
            None => progression::overall_volume_progression(&entries, &ctx),
        }
    }

    /// This week, two weeks, month and three months against the window before each
    pub fn compare_periods(&self, history: &TrainingHistory<'_>) -> Vec<PeriodComparison> {
        let ctx = self.context(history);
        let entries = self.validate(history);
        let comparisons = periods::compare_periods(&entries, &ctx);

        tracing::info!(
            "Compared {} periods from {} records",
            comparisons.len(),
            entries.len()
        );
        comparisons
    }

    pub fn workout_habits(&self, history: &TrainingHistory<'_>) -> WorkoutHabits {
        let entries = self.validate(history);
        let habits = habits::workout_habits(&entries, history.now);

        tracing::info!(
            "{} training days, current streak {} (longest {})",
            habits.training_days,
            habits.streaks.current,
            habits.streaks.longest
        );
        habits
    }

    pub fn analyze_fatigue(&self, history: &TrainingHistory<'_>) -> FatigueAnalysis {
        let entries = self.validate(history);
        let analysis = fatigue::analyze_fatigue(&entries, history.now);

        tracing::info!(
            "Fatigue index {:.0} ({:?}) from {} records",
            analysis.fatigue_index,
            analysis.fatigue_level,
            entries.len()
        );
        analysis
    }

    pub fn resolve_category_effort<S: AsRef<str>>(
        &self,
        categories: &[S],
        exercise_name: Option<&str>,
    ) -> EffortDistribution {
        effort::resolve_category_effort(categories, exercise_name)
    }
}

/// Category with the smallest share; ties go to the first by name
fn least_trained(balances: &[MuscleBalance]) -> Option<String> {
    balances
        .iter()
        .min_by(|a, b| {
            a.percentage
                .total_cmp(&b.percentage)
                .then_with(|| a.category.cmp(&b.category))
        })
        .map(|b| b.category.clone())
}
