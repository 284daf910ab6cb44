use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use lift_core::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftstat")]
#[command(about = "Training analytics for logged resistance workouts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Workout records (.jsonl, .json or .csv); defaults to records.jsonl in the data directory
    #[arg(long, global = true)]
    records: Option<PathBuf>,

    /// Exercise catalog (.json or .toml); defaults to the built-in catalog
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Weekly assignment schedule (.json or .toml)
    #[arg(long, global = true)]
    schedule: Option<PathBuf>,

    /// Analysis date (RFC 3339 or YYYY-MM-DD); defaults to the current time
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-category statistics and muscle balance
    Analyze,

    /// Forecast next week's volume and strength
    Predict,

    /// Weight and volume progression between the halves of the history
    Progression {
        /// Restrict to one category (all records when omitted)
        #[arg(long)]
        category: Option<String>,
    },

    /// Compare recent weeks and months with the window before each
    Compare,

    /// Training days, streaks and preferred training times
    Habits,

    /// Fatigue and recovery from the two most recent weeks
    Fatigue,

    /// Show how an exercise's effort is split across its categories
    Effort {
        /// Exercise name used for table and pattern lookup
        #[arg(long)]
        name: Option<String>,

        /// Categories in order, primary first
        categories: Vec<String>,
    },

    /// List the exercise catalog after validation
    Catalog,

    /// Print the effective configuration
    Config {
        /// Also write it to the configuration file
        #[arg(long)]
        write: bool,
    },
}

fn parse_now(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date '{}': expected RFC 3339 or YYYY-MM-DD", value))
}

/// Everything a command needs, loaded once from the global options
struct Inputs {
    config: Config,
    records: Vec<WorkoutRecord>,
    catalog: ExerciseCatalog,
    schedule: Vec<WeeklyAssignment>,
    now: DateTime<Utc>,
}

impl Inputs {
    fn history(&self) -> TrainingHistory<'_> {
        TrainingHistory::new(&self.records, &self.catalog, self.now).with_schedule(&self.schedule)
    }
}

fn main() -> Result<()> {
    lift_core::logging::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &cli.command {
        Commands::Effort { name, categories } => cmd_effort(&cli, name.as_deref(), categories),
        Commands::Catalog => cmd_catalog(&cli),
        Commands::Config { write } => cmd_config(&cli, &config, *write),
        Commands::Analyze => {
            let inputs = load_inputs(&cli, config)?;
            cmd_analyze(&cli, &inputs)
        }
        Commands::Predict => {
            let inputs = load_inputs(&cli, config)?;
            cmd_predict(&cli, &inputs)
        }
        Commands::Progression { category } => {
            let inputs = load_inputs(&cli, config)?;
            cmd_progression(&cli, &inputs, category.as_deref())
        }
        Commands::Compare => {
            let inputs = load_inputs(&cli, config)?;
            cmd_compare(&cli, &inputs)
        }
        Commands::Habits => {
            let inputs = load_inputs(&cli, config)?;
            cmd_habits(&cli, &inputs)
        }
        Commands::Fatigue => {
            let inputs = load_inputs(&cli, config)?;
            cmd_fatigue(&cli, &inputs)
        }
    }
}

fn load_catalog_or_default(path: Option<&Path>) -> Result<ExerciseCatalog> {
    match path {
        Some(path) => load_catalog(path),
        None => Ok(get_default_catalog().clone()),
    }
}

fn load_inputs(cli: &Cli, config: Config) -> Result<Inputs> {
    let records_path = cli
        .records
        .clone()
        .unwrap_or_else(|| config.data.data_dir.join("records.jsonl"));
    if !records_path.exists() {
        return Err(Error::MissingRecords(records_path));
    }

    tracing::debug!("Reading records from {}", records_path.display());
    let records = load_records(&records_path)?;
    let catalog = load_catalog_or_default(cli.catalog.as_deref())?;
    let schedule = match &cli.schedule {
        Some(path) => load_schedule(path)?,
        None => Vec::new(),
    };

    Ok(Inputs {
        config,
        records,
        catalog,
        schedule,
        now: cli.now.unwrap_or_else(Utc::now),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_analyze(cli: &Cli, inputs: &Inputs) -> Result<()> {
    let engine = Engine::new(inputs.config.analysis.clone());
    let analysis = engine.analyze_category_statistics(&inputs.history());

    if cli.json {
        return print_json(&analysis);
    }

    if analysis.category_metrics.is_empty() {
        println!("No valid records to analyze.");
        return Ok(());
    }

    println!("Category statistics");
    for m in &analysis.category_metrics {
        println!(
            "  {:<10} {:>10.1} kg  {:>5.1}%  {:>4.1}/wk  1RM {:>6.1}  {:?}",
            m.category,
            m.total_volume,
            m.percentage,
            m.avg_workouts_per_week,
            m.estimated_one_rep_max,
            m.trend
        );
        for rec in &m.recommendations {
            println!("      → {}", rec);
        }
        for warning in &m.warnings {
            println!("      ! {}", warning);
        }
    }

    println!();
    println!("Muscle balance");
    for b in &analysis.muscle_balance {
        println!(
            "  {:<10} {:>5.1}% of {:>4.1}% ideal  {:?} priority  {:?}  {}",
            b.category,
            b.percentage,
            b.ideal_percentage,
            b.priority,
            b.development_stage,
            b.recommendation
        );
        for warning in &b.warnings {
            println!("      ! {}", warning);
        }
    }

    println!();
    println!(
        "Balance score: {:.1} (temporal factor {:.2})",
        analysis.balance_score, analysis.temporal_factor
    );
    if let Some(dominant) = &analysis.dominant_category {
        println!("Dominant category: {}", dominant);
    }
    if let Some(least) = &analysis.least_trained_category {
        println!("Least trained category: {}", least);
    }
    Ok(())
}

fn cmd_predict(cli: &Cli, inputs: &Inputs) -> Result<()> {
    let engine = Engine::new(inputs.config.analysis.clone());
    let prediction = engine.predict_progress(&inputs.history());

    if cli.json {
        return print_json(&prediction);
    }

    println!("Trend: {:?}", prediction.trend);
    println!("Confidence: {:.0}%", prediction.confidence);
    println!("Next week volume: {:.1} kg", prediction.next_week_volume);
    println!("Next week estimated 1RM: {:.1} kg", prediction.next_week_weight);
    println!(
        "Predicted PR: {:.1} kg ({:.0}% confidence) in ~{:.0} weeks",
        prediction.predicted_pr.weight,
        prediction.predicted_pr.confidence * 100.0,
        prediction.weeks_to_next_pr
    );
    println!("Plateau risk: {:.0}/100", prediction.plateau_risk);
    for rec in &prediction.recommendations {
        println!("  → {}", rec);
    }
    Ok(())
}

#[derive(Serialize)]
struct ProgressionReport<'a> {
    category: Option<&'a str>,
    weight_progression: f64,
    volume_progression: f64,
}

fn cmd_progression(cli: &Cli, inputs: &Inputs, category: Option<&str>) -> Result<()> {
    let engine = Engine::new(inputs.config.analysis.clone());
    let history = inputs.history();
    let report = ProgressionReport {
        category,
        weight_progression: engine.weight_progression(&history, category),
        volume_progression: engine.volume_progression(&history, category),
    };

    if cli.json {
        return print_json(&report);
    }

    println!("{}", category.unwrap_or("All categories"));
    println!("  Weight progression: {:+.1}%", report.weight_progression);
    println!("  Volume progression: {:+.1}%", report.volume_progression);
    Ok(())
}

fn cmd_compare(cli: &Cli, inputs: &Inputs) -> Result<()> {
    let engine = Engine::new(inputs.config.analysis.clone());
    let comparisons = engine.compare_periods(&inputs.history());

    if cli.json {
        return print_json(&comparisons);
    }

    if comparisons.is_empty() {
        println!("No valid records to compare.");
        return Ok(());
    }
    for c in &comparisons {
        let label = match c.period {
            ComparisonPeriod::ThisWeek => "This week",
            ComparisonPeriod::LastTwoWeeks => "Last 2 weeks",
            ComparisonPeriod::LastMonth => "Last month",
            ComparisonPeriod::LastThreeMonths => "Last 3 months",
        };
        if c.comparable {
            println!(
                "  {:<14} {:>3} records  volume {:+6.1}%  strength {:+6.1}%",
                label, c.workouts, c.volume_change, c.strength_change
            );
        } else {
            println!("  {:<14} {:>3} records  not enough history", label, c.workouts);
        }
    }
    Ok(())
}

fn cmd_habits(cli: &Cli, inputs: &Inputs) -> Result<()> {
    let engine = Engine::new(inputs.config.analysis.clone());
    let habits = engine.workout_habits(&inputs.history());

    if cli.json {
        return print_json(&habits);
    }

    println!("Training days: {}", habits.training_days);
    println!("Sessions per week: {:.1}", habits.sessions_per_week);
    println!(
        "Streaks: current {}, longest {}, average {:.1}",
        habits.streaks.current, habits.streaks.longest, habits.streaks.average
    );
    if let Some(day) = habits.preferred_day {
        println!("Preferred day: {}", day);
    }
    if let Some(time) = habits.preferred_time {
        println!("Preferred time: {:?}", time);
    }
    if let Some(days) = habits.days_since_last_workout {
        println!("Days since last workout: {}", days);
    }
    Ok(())
}

fn cmd_fatigue(cli: &Cli, inputs: &Inputs) -> Result<()> {
    let engine = Engine::new(inputs.config.analysis.clone());
    let analysis = engine.analyze_fatigue(&inputs.history());

    if cli.json {
        return print_json(&analysis);
    }

    println!(
        "Fatigue index: {:.0}/100 ({:?}, {:?} overreaching risk)",
        analysis.fatigue_index, analysis.fatigue_level, analysis.overreaching_risk
    );
    println!(
        "Volume change: {:+.1}% ({:?})",
        analysis.volume_change, analysis.workload_trend
    );
    println!(
        "Days since last workout: {}, recovery score {:.0}",
        analysis.recovery_days, analysis.recovery_score
    );
    println!("Estimated recovery: {:.0} h", analysis.predicted_recovery_hours);
    println!("{}", analysis.rest_recommendation);
    for rec in &analysis.recommendations {
        println!("  → {}", rec);
    }
    Ok(())
}

fn cmd_effort(cli: &Cli, name: Option<&str>, categories: &[String]) -> Result<()> {
    // A named exercise from the catalog supplies its own categories
    let catalog = load_catalog_or_default(cli.catalog.as_deref())?;
    let categories: Vec<String> = match (categories.is_empty(), name) {
        (true, Some(name)) => catalog
            .find_by_name(name)
            .map(|e| e.categories.clone())
            .unwrap_or_default(),
        _ => categories.to_vec(),
    };

    let distribution = resolve_category_effort(&categories, name);

    if cli.json {
        return print_json(&distribution);
    }

    if distribution.is_empty() {
        println!("No categories to distribute.");
        return Ok(());
    }
    for (category, share) in &distribution {
        println!("  {:<10} {:>5.1}%", category, share * 100.0);
    }
    Ok(())
}

fn cmd_catalog(cli: &Cli) -> Result<()> {
    let catalog = load_catalog_or_default(cli.catalog.as_deref())?;
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in &errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    if cli.json {
        let exercises: Vec<&Exercise> = catalog.iter().collect();
        return print_json(&exercises);
    }

    for exercise in catalog.iter() {
        println!(
            "  {:<24} {:<28} {}",
            exercise.id,
            exercise.name,
            exercise.categories.join(", ")
        );
    }
    println!("{} exercises", catalog.len());
    Ok(())
}

fn cmd_config(cli: &Cli, config: &Config, write: bool) -> Result<()> {
    if cli.json {
        print_json(config)?;
    } else {
        let contents = toml::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        print!("{}", contents);
    }

    if write {
        match &cli.config {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
    }
    Ok(())
}
