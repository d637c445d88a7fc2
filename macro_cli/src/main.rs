use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use macro_core::upload::read_import_file;
use macro_core::*;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "mtrack")]
#[command(about = "Personal nutrition and fitness tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's totals, logs and notes (default)
    Status,

    /// Log or remove meals
    Food {
        #[command(subcommand)]
        action: FoodAction,
    },

    /// Log or remove workouts
    Workout {
        #[command(subcommand)]
        action: WorkoutAction,
    },

    /// Adjust body weight
    Weight {
        #[command(subcommand)]
        action: WeightAction,
    },

    /// Set the journal notes for the current day
    Notes {
        /// Notes text
        text: String,
    },

    /// Change the selected date
    Date {
        #[command(subcommand)]
        action: DateAction,
    },

    /// Save the current day's totals to history
    Save,

    /// Browse or delete saved days
    Days {
        #[command(subcommand)]
        action: DaysAction,
    },

    /// Import saved days from JSON or CSV text
    Import {
        /// Read from a .csv, .txt or .json file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Import this text directly (stdin is read when neither is given)
        #[arg(long)]
        text: Option<String>,
    },

    /// Export saved days
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replace saved days with demo history
    Demo,

    /// Show weight progress across saved days
    Trend,
}

#[derive(Subcommand)]
enum FoodAction {
    /// Log a meal for the current date
    Add {
        /// What was eaten
        #[arg(long)]
        description: String,
        #[arg(long, allow_negative_numbers = true)]
        calories: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        protein: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        carbs: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        fat: f64,
    },
    /// Remove a meal by id
    Rm { id: Uuid },
}

#[derive(Subcommand)]
enum WorkoutAction {
    /// Log a workout for the current date
    Add {
        /// Kind of workout (run, lift, ...)
        #[arg(long = "type")]
        workout_type: String,
        #[arg(long, allow_negative_numbers = true)]
        minutes: f64,
        /// Estimated calories burned
        #[arg(long, allow_negative_numbers = true)]
        burn: f64,
    },
    /// Remove a workout by id
    Rm { id: Uuid },
}

#[derive(Subcommand)]
enum WeightAction {
    /// Add one weight step
    Up,
    /// Subtract one weight step (never below zero)
    Down,
    /// Set weight in pounds (negative values are floored at zero)
    Set {
        #[arg(allow_negative_numbers = true)]
        pounds: f64,
    },
}

#[derive(Subcommand)]
enum DateAction {
    /// Select a specific date (YYYY-MM-DD)
    Set { date: NaiveDate },
    /// Previous day
    Prev,
    /// Next day
    Next,
    /// Back to today
    Today,
}

#[derive(Subcommand)]
enum DaysAction {
    /// List saved days, newest first as stored
    List,
    /// Delete the saved day for a date
    Rm { date: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() -> ExitCode {
    // Initialize logging
    macro_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    // Load persisted state or start fresh from the configured profile
    let storage = JsonStateFile::in_dir(&data_dir);
    let state = match storage.load()? {
        Some(state) => state,
        None => AppState::new(config.profile.to_user(), Local::now().date_naive()),
    };
    let mut tracker = Tracker::new(state, TotalsPolicy::from(&config), storage);

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => cmd_status(&mut tracker),
        Commands::Food { action } => cmd_food(&mut tracker, action),
        Commands::Workout { action } => cmd_workout(&mut tracker, action),
        Commands::Weight { action } => cmd_weight(&mut tracker, action),
        Commands::Notes { text } => cmd_notes(&mut tracker, &text),
        Commands::Date { action } => cmd_date(&mut tracker, action),
        Commands::Save => cmd_save(&mut tracker),
        Commands::Days { action } => cmd_days(&mut tracker, action),
        Commands::Import { file, text } => cmd_import(&mut tracker, file, text),
        Commands::Export { format, output } => cmd_export(&tracker, format, output),
        Commands::Demo => cmd_demo(&mut tracker),
        Commands::Trend => cmd_trend(&tracker),
    }
}

type CliTracker = Tracker<JsonStateFile>;

fn cmd_status(tracker: &mut CliTracker) -> Result<()> {
    tracker.calculate_totals()?;
    display_status(tracker);
    Ok(())
}

fn cmd_food(tracker: &mut CliTracker, action: FoodAction) -> Result<()> {
    match action {
        FoodAction::Add {
            description,
            calories,
            protein,
            carbs,
            fat,
        } => {
            let log = tracker.add_food_log(NewFoodLog {
                description,
                calories_kcal: calories,
                protein_g: protein,
                carbs_g: carbs,
                fat_g: fat,
            })?;
            println!("✓ Meal logged: {}", log.id);
        }
        FoodAction::Rm { id } => {
            if tracker.delete_food_log(id)? {
                println!("✓ Meal removed");
            } else {
                println!("No meal with id {}", id);
            }
        }
    }
    print_totals_line(tracker);
    Ok(())
}

fn cmd_workout(tracker: &mut CliTracker, action: WorkoutAction) -> Result<()> {
    match action {
        WorkoutAction::Add {
            workout_type,
            minutes,
            burn,
        } => {
            let log = tracker.add_workout_log(NewWorkoutLog {
                workout_type,
                duration_minutes: minutes,
                estimated_burn_kcal: burn,
            })?;
            println!("✓ Workout logged: {}", log.id);
        }
        WorkoutAction::Rm { id } => {
            if tracker.delete_workout_log(id)? {
                println!("✓ Workout removed");
            } else {
                println!("No workout with id {}", id);
            }
        }
    }
    print_totals_line(tracker);
    Ok(())
}

fn cmd_weight(tracker: &mut CliTracker, action: WeightAction) -> Result<()> {
    let weight = match action {
        WeightAction::Up => tracker.adjust_weight(WeightAdjustment::Increase)?,
        WeightAction::Down => tracker.adjust_weight(WeightAdjustment::Decrease)?,
        WeightAction::Set { pounds } => {
            tracker.update_weight(pounds)?;
            tracker.state().user.weight_lb
        }
    };
    println!("Weight: {:.1} lb", weight);
    Ok(())
}

fn cmd_notes(tracker: &mut CliTracker, text: &str) -> Result<()> {
    if tracker.state().daily_entry.is_none() {
        tracker.calculate_totals()?;
    }
    tracker.update_notes(text)?;
    println!("✓ Notes saved");
    Ok(())
}

fn cmd_date(tracker: &mut CliTracker, action: DateAction) -> Result<()> {
    let date = match action {
        DateAction::Set { date } => {
            tracker.set_current_date(date)?;
            date
        }
        DateAction::Prev => tracker.shift_date(-1)?,
        DateAction::Next => tracker.shift_date(1)?,
        DateAction::Today => {
            let today = Local::now().date_naive();
            tracker.set_current_date(today)?;
            today
        }
    };
    println!("Date: {}", date);
    print_totals_line(tracker);
    Ok(())
}

fn cmd_save(tracker: &mut CliTracker) -> Result<()> {
    if tracker.state().daily_entry.is_none() {
        tracker.calculate_totals()?;
    }
    match tracker.save_current_day()? {
        Some(day) => println!(
            "✓ Saved {}: {} kcal, {} g protein, deficit {} kcal",
            day.date, day.total_calories, day.total_protein, day.deficit
        ),
        None => println!("Nothing to save yet"),
    }
    Ok(())
}

fn cmd_days(tracker: &mut CliTracker, action: DaysAction) -> Result<()> {
    match action {
        DaysAction::List => {
            let days = &tracker.state().saved_days;
            if days.is_empty() {
                println!("No saved days yet.");
                return Ok(());
            }
            println!(
                "{:<12} {:>8} {:>8} {:>7} {:>6} {:>8} {:>7} {:>6} {:>9}",
                "date", "kcal", "protein", "carbs", "fat", "deficit", "weight", "meals", "workouts"
            );
            for day in days {
                println!(
                    "{:<12} {:>8} {:>8} {:>7} {:>6} {:>8} {:>7} {:>6} {:>9}",
                    day.date,
                    day.total_calories,
                    day.total_protein,
                    day.total_carbs,
                    day.total_fat,
                    format_signed(day.deficit),
                    day.weight,
                    day.meals_count,
                    day.workouts_count
                );
            }
        }
        DaysAction::Rm { date } => {
            if tracker.delete_saved_day(&date)? {
                println!("✓ Deleted saved day {}", date);
            } else {
                println!("No saved day for {}", date);
            }
        }
    }
    Ok(())
}

fn cmd_import(
    tracker: &mut CliTracker,
    file: Option<PathBuf>,
    text: Option<String>,
) -> Result<()> {
    let text = match (file, text) {
        (Some(path), _) => read_import_file(&path)?,
        (None, Some(text)) => text,
        (None, None) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let summary = tracker.import_text(&text)?;
    println!(
        "✓ Imported {} days from {} ({} saved days total)",
        summary.imported, summary.format, summary.total
    );
    Ok(())
}

fn cmd_export(tracker: &CliTracker, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let days = &tracker.state().saved_days;
    match (format, output) {
        (ExportFormat::Csv, Some(path)) => {
            let count = macro_core::export::write_csv_file(&path, days)?;
            println!("✓ Exported {} days to {}", count, path.display());
        }
        (ExportFormat::Json, Some(path)) => {
            std::fs::write(&path, saved_days_to_json(days)?)?;
            println!("✓ Exported {} days to {}", days.len(), path.display());
        }
        (ExportFormat::Csv, None) => print!("{}", saved_days_to_csv(days)?),
        (ExportFormat::Json, None) => println!("{}", saved_days_to_json(days)?),
    }
    Ok(())
}

fn cmd_demo(tracker: &mut CliTracker) -> Result<()> {
    tracker.load_demo_data()?;
    println!(
        "✓ Loaded {} demo days",
        tracker.state().saved_days.len()
    );
    Ok(())
}

fn cmd_trend(tracker: &CliTracker) -> Result<()> {
    match weight_trend(&tracker.state().saved_days) {
        Some(trend) => {
            println!("Weight range: {:.1} - {:.1} lb", trend.min_lb, trend.max_lb);
            println!("Change: {:+.1} lb", trend.change_lb);
            for point in &trend.points {
                println!("  {:<12} {:>6.1} lb", point.date, point.weight_lb);
            }
        }
        None => println!("Need at least two saved days to show a trend."),
    }
    Ok(())
}

fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

fn print_totals_line(tracker: &CliTracker) {
    if let Some(entry) = &tracker.state().daily_entry {
        let balance = EnergyBalance::from_deficit(entry.deficit_kcal);
        println!(
            "  {} kcal in, {} kcal out, {} {} kcal",
            entry.total_intake_kcal,
            entry.total_burn_kcal,
            balance.label(),
            balance.magnitude()
        );
    }
}

fn display_status(tracker: &CliTracker) {
    let state = tracker.state();
    let progress = tracker.progress();

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", state.current_date.format("%A, %B %-d, %Y"));
    println!("╰─────────────────────────────────────────╯");
    println!();

    if let Some(entry) = &state.daily_entry {
        println!(
            "  Weight:   {:.1} lb ({:.1} kg)",
            state.user.weight_lb, entry.weight_kg
        );
        println!(
            "  Calories: {} / {} kcal ({:.0}%)",
            progress.calories_kcal, progress.calorie_target_kcal, progress.calorie_percent
        );
        println!(
            "  Protein:  {} / {} g ({:.0}%)",
            progress.protein_g, progress.protein_target_g, progress.protein_percent
        );
        println!(
            "  Carbs:    {} g   Fat: {} g",
            entry.total_carbs_g, entry.total_fat_g
        );
        println!(
            "  Burn:     {} kcal (BMR {})",
            entry.total_burn_kcal, entry.bmr_kcal
        );
        println!(
            "  {}:  {} kcal",
            progress.balance.label(),
            progress.balance.magnitude()
        );
    }

    let meals = tracker.visible_food_logs();
    println!();
    println!("  Meals ({}):", meals.len());
    for log in meals {
        println!(
            "    {}  {}  {} kcal  P{} C{} F{}",
            log.id, log.description, log.calories_kcal, log.protein_g, log.carbs_g, log.fat_g
        );
    }

    let workouts = tracker.visible_workout_logs();
    println!("  Workouts ({}):", workouts.len());
    for log in workouts {
        println!(
            "    {}  {}  {} min  {} kcal",
            log.id, log.workout_type, log.duration_minutes, log.estimated_burn_kcal
        );
    }

    if let Some(notes) = state
        .daily_entry
        .as_ref()
        .and_then(|e| e.journal_text.as_deref())
    {
        println!();
        println!("  Notes: {}", notes);
    }
    println!();
}
