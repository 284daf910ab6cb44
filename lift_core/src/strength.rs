//! Estimated one-rep max and strength classification.

use crate::config::{LevelThresholds, StrengthStandards};
use crate::stats::finite_or_zero;
use crate::types::StrengthLevel;

/// Reps beyond this are treated as this many for 1RM estimation
const MAX_ESTIMATION_REPS: u32 = 20;

fn brzycki(weight: f64, reps: f64) -> f64 {
    weight / (1.0278 - 0.0278 * reps)
}

fn epley(weight: f64, reps: f64) -> f64 {
    weight * (1.0 + reps / 30.0)
}

/// Estimate a one-rep max from a working set
///
/// Brzycki up to 6 reps, Epley from 10 reps, and the higher of the two in
/// between. Non-positive weight or zero reps estimate to 0.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> f64 {
    if !weight.is_finite() || weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    let reps = reps.min(MAX_ESTIMATION_REPS);
    if reps == 1 {
        return weight;
    }

    let r = f64::from(reps);
    let estimate = match reps {
        2..=6 => brzycki(weight, r),
        7..=9 => brzycki(weight, r).max(epley(weight, r)),
        _ => epley(weight, r),
    };
    finite_or_zero(estimate)
}

/// Classify an estimated 1RM against a category's level thresholds
pub fn strength_level(one_rep_max: f64, thresholds: LevelThresholds) -> StrengthLevel {
    if one_rep_max > thresholds.advanced {
        StrengthLevel::Advanced
    } else if one_rep_max > thresholds.intermediate {
        StrengthLevel::Intermediate
    } else {
        StrengthLevel::Beginner
    }
}

/// Linear interpolation of `value` from `[lo, hi]` into `[out_lo, out_hi]`
fn interpolate(value: f64, lo: f64, hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    if hi <= lo {
        return out_lo;
    }
    out_lo + (value - lo) / (hi - lo) * (out_hi - out_lo)
}

/// Strength index (0-100) of an average estimated 1RM
///
/// With standards the index is interpolated within the tier the value falls in:
/// below beginner 0-24, beginner..intermediate 25-49, intermediate..advanced 50-69,
/// advanced..elite 70-89, above elite 90-100 (saturating at twice elite).
/// Without standards it is `avg / 50 × 100`.
pub fn strength_index(avg_one_rep_max: f64, standards: Option<&StrengthStandards>) -> f64 {
    if !avg_one_rep_max.is_finite() || avg_one_rep_max <= 0.0 {
        return 0.0;
    }

    let index = match standards {
        None => avg_one_rep_max / 50.0 * 100.0,
        Some(s) => {
            let v = avg_one_rep_max;
            if v < s.beginner {
                interpolate(v, 0.0, s.beginner, 0.0, 24.0)
            } else if v < s.intermediate {
                interpolate(v, s.beginner, s.intermediate, 25.0, 49.0)
            } else if v < s.advanced {
                interpolate(v, s.intermediate, s.advanced, 50.0, 69.0)
            } else if v < s.elite {
                interpolate(v, s.advanced, s.elite, 70.0, 89.0)
            } else {
                interpolate(v, s.elite, s.elite * 2.0, 90.0, 100.0)
            }
        }
    };

    finite_or_zero(index).clamp(0.0, 100.0)
}
