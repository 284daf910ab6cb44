//! Loading training history from disk.
//!
//! Records load from JSON Lines, a JSON array or CSV. Catalogs and weekly
//! schedules load from JSON or TOML. Rows that fail to parse are skipped with a
//! warning so one bad line never hides the rest of a history.

use crate::catalog::ExerciseCatalog;
use crate::types::{Exercise, WeeklyAssignment, WorkoutRecord};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use uuid::Uuid;

/// CSV row format for spreadsheet exports
///
/// Set overrides are not representable in CSV. A blank id gets a fresh one.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    exercise_id: String,
    weight: f64,
    reps: u32,
    sets: u32,
    performed_at: String,
}

impl TryFrom<CsvRow> for WorkoutRecord {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = match row.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Uuid::parse_str(id)
                .map_err(|e| Error::InvalidRecord(format!("id '{}': {}", id, e)))?,
            _ => Uuid::new_v4(),
        };

        Ok(WorkoutRecord {
            id,
            exercise_id: row.exercise_id,
            weight: row.weight,
            reps: row.reps,
            sets: row.sets,
            performed_at: parse_timestamp(&row.performed_at)?,
            set_overrides: vec![],
        })
    }
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidRecord(format!("bad date '{}'", value)))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

/// Load workout records, dropping duplicate ids and sorting by time
pub fn load_records(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let loaded = match extension(path).as_str() {
        "jsonl" | "ndjson" => load_records_from_jsonl(path)?,
        "json" => load_records_from_json(path)?,
        "csv" => load_records_from_csv(path)?,
        other => {
            return Err(Error::UnsupportedInput(format!(
                "record file '{}' has unsupported extension '{}'",
                path.display(),
                other
            )))
        }
    };

    let mut seen_ids = HashSet::new();
    let mut records: Vec<WorkoutRecord> = loaded
        .into_iter()
        .filter(|r| {
            let fresh = seen_ids.insert(r.id);
            if !fresh {
                tracing::warn!("Skipping duplicate record {}", r.id);
            }
            fresh
        })
        .collect();
    records.sort_by(|a, b| a.performed_at.cmp(&b.performed_at).then(a.id.cmp(&b.id)));

    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn load_records_from_jsonl(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<WorkoutRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    tracing::debug!("Read {} records from JSONL", records.len());
    Ok(records)
}

fn load_records_from_json(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;

    let records: Vec<WorkoutRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at index {}: {}", idx, e);
                None
            }
        })
        .collect();

    tracing::debug!("Read {} records from JSON", records.len());
    Ok(records)
}

fn load_records_from_csv(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match WorkoutRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Failed to parse CSV row: {}", e),
            },
            Err(e) => tracing::warn!("Failed to deserialize CSV row: {}", e),
        }
    }

    tracing::debug!("Read {} records from CSV", records.len());
    Ok(records)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Exercise>),
    Table { exercises: Vec<Exercise> },
}

impl CatalogFile {
    fn into_exercises(self) -> Vec<Exercise> {
        match self {
            CatalogFile::List(exercises) | CatalogFile::Table { exercises } => exercises,
        }
    }
}

/// Load and validate an exercise catalog
///
/// JSON files hold an array of exercises (or `{"exercises": [...]}`); TOML
/// files use `[[exercises]]` tables.
pub fn load_catalog(path: &Path) -> Result<ExerciseCatalog> {
    let content = std::fs::read_to_string(path)?;
    let file: CatalogFile = match extension(path).as_str() {
        "json" => serde_json::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        other => {
            return Err(Error::UnsupportedInput(format!(
                "catalog file '{}' has unsupported extension '{}'",
                path.display(),
                other
            )))
        }
    };

    let catalog = ExerciseCatalog::from_exercises(file.into_exercises());
    let errors = catalog.validate();
    if !errors.is_empty() {
        return Err(Error::CatalogValidation(errors.join("; ")));
    }

    tracing::info!("Loaded {} exercises from {}", catalog.len(), path.display());
    Ok(catalog)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScheduleFile {
    List(Vec<WeeklyAssignment>),
    Table { assignments: Vec<WeeklyAssignment> },
}

/// Load a weekly assignment schedule from JSON or TOML (`[[assignments]]`)
pub fn load_schedule(path: &Path) -> Result<Vec<WeeklyAssignment>> {
    let content = std::fs::read_to_string(path)?;
    let file: ScheduleFile = match extension(path).as_str() {
        "json" => serde_json::from_str(&content)?,
        "toml" => toml::from_str(&content)?,
        other => {
            return Err(Error::UnsupportedInput(format!(
                "schedule file '{}' has unsupported extension '{}'",
                path.display(),
                other
            )))
        }
    };

    let schedule = match file {
        ScheduleFile::List(assignments) | ScheduleFile::Table { assignments } => assignments,
    };
    tracing::debug!("Loaded {} weekly assignments", schedule.len());
    Ok(schedule)
}
