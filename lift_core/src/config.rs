//! Configuration file support for liftstat.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftstat/config.toml`.
//! The `[analysis]` section carries every reference table the engine reads,
//! so a partial file only overrides what it names.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Data location configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Four-tier 1RM standards (kg) used for the strength index
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct StrengthStandards {
    pub beginner: f64,
    pub intermediate: f64,
    pub advanced: f64,
    pub elite: f64,
}

/// 1RM thresholds (kg) above which a category counts as intermediate/advanced
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LevelThresholds {
    pub intermediate: f64,
    pub advanced: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            intermediate: 50.0,
            advanced: 100.0,
        }
    }
}

/// Progression thresholds (percent) for the improving/declining trend label
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendThresholds {
    /// Categories with at most this many weeks of data use the short-history thresholds
    #[serde(default = "default_short_history_weeks")]
    pub short_history_weeks: usize,
    #[serde(default = "default_short_weight_threshold")]
    pub short_history_weight: f64,
    #[serde(default = "default_short_volume_threshold")]
    pub short_history_volume: f64,
    #[serde(default = "default_weight_threshold")]
    pub weight: f64,
    #[serde(default = "default_volume_threshold")]
    pub volume: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            short_history_weeks: default_short_history_weeks(),
            short_history_weight: default_short_weight_threshold(),
            short_history_volume: default_short_volume_threshold(),
            weight: default_weight_threshold(),
            volume: default_volume_threshold(),
        }
    }
}

impl TrendThresholds {
    /// (weight, volume) thresholds for a category with `weeks` weeks of data
    pub fn for_weeks(&self, weeks: usize) -> (f64, f64) {
        if weeks <= self.short_history_weeks {
            (self.short_history_weight, self.short_history_volume)
        } else {
            (self.weight, self.volume)
        }
    }
}

/// Progress predictor parameters
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionConfig {
    #[serde(default = "default_min_days")]
    pub min_days: i64,
    #[serde(default = "default_min_records")]
    pub min_records: usize,
    #[serde(default = "default_window_weeks")]
    pub window_weeks: i64,
    /// kg/week of 1RM slope that counts as a real trend
    #[serde(default = "default_strength_trend_threshold")]
    pub strength_trend_threshold: f64,
    /// kg/week of volume slope that counts as a real trend
    #[serde(default = "default_volume_trend_threshold")]
    pub volume_trend_threshold: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            min_days: default_min_days(),
            min_records: default_min_records(),
            window_weeks: default_window_weeks(),
            strength_trend_threshold: default_strength_trend_threshold(),
            volume_trend_threshold: default_volume_trend_threshold(),
        }
    }
}

/// Reference tables and tuning constants for the analytics engine
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Ideal share (percent) for categories missing from `ideal_distribution`
    #[serde(default = "default_ideal_percentage")]
    pub default_ideal_percentage: f64,

    /// Percentage points an actual share may differ from ideal and still count as balanced
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: f64,

    /// Weight of the session-density progression in the blend (individual gets the rest)
    #[serde(default = "default_density_weight")]
    pub default_density_weight: f64,

    #[serde(default = "default_optimal_frequency")]
    pub default_optimal_frequency: f64,

    #[serde(default = "default_ideal_distribution")]
    pub ideal_distribution: BTreeMap<String, f64>,

    /// Category -> antagonist category; pairs are listed in both directions
    #[serde(default = "default_antagonist_pairs")]
    pub antagonist_pairs: BTreeMap<String, String>,

    #[serde(default = "default_density_weights")]
    pub density_weights: BTreeMap<String, f64>,

    /// Sessions per week considered optimal
    #[serde(default = "default_optimal_frequencies")]
    pub optimal_frequency: BTreeMap<String, f64>,

    #[serde(default = "default_strength_standards")]
    pub strength_standards: BTreeMap<String, StrengthStandards>,

    #[serde(default = "default_strength_levels")]
    pub strength_levels: BTreeMap<String, LevelThresholds>,

    #[serde(default)]
    pub trend: TrendThresholds,

    #[serde(default)]
    pub prediction: PredictionConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_ideal_percentage: default_ideal_percentage(),
            balance_tolerance: default_balance_tolerance(),
            default_density_weight: default_density_weight(),
            default_optimal_frequency: default_optimal_frequency(),
            ideal_distribution: default_ideal_distribution(),
            antagonist_pairs: default_antagonist_pairs(),
            density_weights: default_density_weights(),
            optimal_frequency: default_optimal_frequencies(),
            strength_standards: default_strength_standards(),
            strength_levels: default_strength_levels(),
            trend: TrendThresholds::default(),
            prediction: PredictionConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn ideal_percentage(&self, category: &str) -> f64 {
        self.ideal_distribution
            .get(category)
            .copied()
            .unwrap_or(self.default_ideal_percentage)
    }

    pub fn antagonist(&self, category: &str) -> Option<&str> {
        self.antagonist_pairs.get(category).map(String::as_str)
    }

    pub fn density_weight(&self, category: &str) -> f64 {
        self.density_weights
            .get(category)
            .copied()
            .unwrap_or(self.default_density_weight)
    }

    pub fn optimal_frequency(&self, category: &str) -> f64 {
        self.optimal_frequency
            .get(category)
            .copied()
            .unwrap_or(self.default_optimal_frequency)
    }

    pub fn strength_standards(&self, category: &str) -> Option<&StrengthStandards> {
        self.strength_standards.get(category)
    }

    pub fn level_thresholds(&self, category: &str) -> LevelThresholds {
        self.strength_levels
            .get(category)
            .copied()
            .unwrap_or_default()
    }

    /// Check the tables for values the engine cannot use
    ///
    /// Returns a list of problems; empty means the configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.default_ideal_percentage < 0.0 {
            errors.push("default_ideal_percentage must not be negative".to_string());
        }
        if self.balance_tolerance <= 0.0 {
            errors.push("balance_tolerance must be positive".to_string());
        }

        for (category, pct) in &self.ideal_distribution {
            if !pct.is_finite() || *pct < 0.0 {
                errors.push(format!(
                    "Ideal percentage for '{}' is invalid: {}",
                    category, pct
                ));
            }
        }
        let ideal_total: f64 = self.ideal_distribution.values().sum();
        if !self.ideal_distribution.is_empty() && (ideal_total - 100.0).abs() > 0.5 {
            errors.push(format!(
                "Ideal distribution sums to {:.1}, expected 100",
                ideal_total
            ));
        }

        if !(0.0..=1.0).contains(&self.default_density_weight) {
            errors.push(format!(
                "default_density_weight {} is outside [0, 1]",
                self.default_density_weight
            ));
        }
        for (category, weight) in &self.density_weights {
            if !(0.0..=1.0).contains(weight) {
                errors.push(format!(
                    "Density weight for '{}' is outside [0, 1]: {}",
                    category, weight
                ));
            }
        }

        if self.default_optimal_frequency <= 0.0 {
            errors.push("default_optimal_frequency must be positive".to_string());
        }
        for (category, freq) in &self.optimal_frequency {
            if *freq <= 0.0 {
                errors.push(format!(
                    "Optimal frequency for '{}' must be positive",
                    category
                ));
            }
        }

        for (category, standards) in &self.strength_standards {
            let ascending = standards.beginner > 0.0
                && standards.beginner < standards.intermediate
                && standards.intermediate < standards.advanced
                && standards.advanced < standards.elite;
            if !ascending {
                errors.push(format!(
                    "Strength standards for '{}' must be positive and strictly ascending",
                    category
                ));
            }
        }

        for (category, levels) in &self.strength_levels {
            if levels.intermediate <= 0.0 || levels.intermediate >= levels.advanced {
                errors.push(format!(
                    "Strength level thresholds for '{}' must satisfy 0 < intermediate < advanced",
                    category
                ));
            }
        }

        for (category, antagonist) in &self.antagonist_pairs {
            if category == antagonist {
                errors.push(format!("Category '{}' cannot be its own antagonist", category));
            }
        }

        if self.prediction.min_records < 2 {
            errors.push("prediction.min_records must be at least 2".to_string());
        }
        if self.prediction.window_weeks < 2 {
            errors.push("prediction.window_weeks must be at least 2".to_string());
        }

        errors
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liftstat")
}

fn default_ideal_percentage() -> f64 {
    15.0
}

fn default_balance_tolerance() -> f64 {
    10.0
}

fn default_density_weight() -> f64 {
    0.6
}

fn default_optimal_frequency() -> f64 {
    2.0
}

fn default_short_history_weeks() -> usize {
    3
}

fn default_short_weight_threshold() -> f64 {
    10.0
}

fn default_short_volume_threshold() -> f64 {
    20.0
}

fn default_weight_threshold() -> f64 {
    5.0
}

fn default_volume_threshold() -> f64 {
    10.0
}

fn default_min_days() -> i64 {
    14
}

fn default_min_records() -> usize {
    6
}

fn default_window_weeks() -> i64 {
    12
}

fn default_strength_trend_threshold() -> f64 {
    0.5
}

fn default_volume_trend_threshold() -> f64 {
    50.0
}

fn table<V: Copy>(entries: &[(&str, V)]) -> BTreeMap<String, V> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn default_ideal_distribution() -> BTreeMap<String, f64> {
    table(&[
        ("Chest", 20.0),
        ("Back", 25.0),
        ("Legs", 30.0),
        ("Shoulders", 10.0),
        ("Arms", 10.0),
        ("Core", 5.0),
    ])
}

fn default_antagonist_pairs() -> BTreeMap<String, String> {
    let pairs = [("Chest", "Back"), ("Arms", "Legs"), ("Shoulders", "Core")];
    pairs
        .iter()
        .flat_map(|(a, b)| {
            [
                (a.to_string(), b.to_string()),
                (b.to_string(), a.to_string()),
            ]
        })
        .collect()
}

// Chest progress shows up more in per-exercise gains than in session density
fn default_density_weights() -> BTreeMap<String, f64> {
    table(&[("Chest", 0.4)])
}

fn default_optimal_frequencies() -> BTreeMap<String, f64> {
    table(&[("Core", 3.0)])
}

fn standards(beginner: f64, intermediate: f64, advanced: f64, elite: f64) -> StrengthStandards {
    StrengthStandards {
        beginner,
        intermediate,
        advanced,
        elite,
    }
}

fn default_strength_standards() -> BTreeMap<String, StrengthStandards> {
    table(&[
        ("Chest", standards(40.0, 60.0, 90.0, 120.0)),
        ("Back", standards(40.0, 65.0, 95.0, 125.0)),
        ("Legs", standards(60.0, 100.0, 140.0, 180.0)),
        ("Shoulders", standards(25.0, 40.0, 60.0, 80.0)),
        ("Arms", standards(15.0, 25.0, 40.0, 55.0)),
        ("Core", standards(10.0, 20.0, 35.0, 50.0)),
    ])
}

fn levels(intermediate: f64, advanced: f64) -> LevelThresholds {
    LevelThresholds {
        intermediate,
        advanced,
    }
}

fn default_strength_levels() -> BTreeMap<String, LevelThresholds> {
    table(&[
        ("Chest", levels(60.0, 100.0)),
        ("Back", levels(60.0, 110.0)),
        ("Legs", levels(80.0, 140.0)),
        ("Shoulders", levels(40.0, 70.0)),
        ("Arms", levels(25.0, 45.0)),
        ("Core", levels(20.0, 40.0)),
    ])
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    ///
    /// Fails if the file cannot be parsed or if the analysis tables do not validate.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        let errors = config.analysis.validate();
        if !errors.is_empty() {
            return Err(Error::Config(errors.join("; ")));
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("liftstat")
            .join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
