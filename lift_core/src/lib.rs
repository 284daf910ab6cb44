#![forbid(unsafe_code)]

//! Core domain model and analytics engine for liftstat.
//!
//! This crate provides:
//! - Domain types (workout records, exercises, derived metrics)
//! - Catalog management and the default exercise catalog
//! - Effort attribution, progression, muscle balance and progress prediction
//! - Period comparison, training habits and fatigue assessment
//! - Loading records, catalogs and schedules from disk
//! - Configuration and logging setup

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod stats;
pub mod strength;
pub mod validate;
pub mod effort;
pub mod weekday;
pub mod progression;
pub mod metrics;
pub mod balance;
pub mod predict;
pub mod periods;
pub mod habits;
pub mod fatigue;
pub mod engine;
pub mod history;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, ExerciseCatalog};
pub use config::{AnalysisConfig, Config};
pub use effort::resolve_category_effort;
pub use engine::Engine;
pub use history::{load_catalog, load_records, load_schedule};
pub use strength::estimate_one_rep_max;
pub use weekday::{normalize_by_weekday, week_completion_fraction, NormalizedWeek};
