use clap::{Parser, Subcommand};
use fitlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Single-user fitness logging service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout session
    Log {
        /// Session category (free-form; unknown names create a new bucket)
        #[arg(long, default_value = "Workout")]
        category: String,

        /// Exercise name
        exercise: String,

        /// Duration in whole minutes
        #[arg(allow_hyphen_values = true)]
        duration: String,
    },

    /// Show all logged sessions with totals
    Summary,

    /// Manage the user profile
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Export the workout report as a PDF
    Export {
        /// Output file path
        #[arg(long, default_value = "report.pdf")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Save the profile (overwrites any existing one)
    Set {
        #[arg(long)]
        name: String,
        #[arg(long)]
        regn_id: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        gender: String,
        /// Height in cm
        #[arg(long)]
        height: String,
        /// Weight in kg
        #[arg(long)]
        weight: String,
    },

    /// Show the stored profile
    Show,
}

fn main() -> Result<()> {
    fitlog_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let store = match cli.data_dir {
        Some(data_dir) => LedgerStore::new(data_dir)
            .with_fallback_weight(config.metrics.fallback_weight_kg)
            .with_weekly_cal_goal(config.metrics.weekly_cal_goal),
        None => LedgerStore::from_config(&config),
    };

    match cli.command {
        Commands::Log {
            category,
            exercise,
            duration,
        } => cmd_log(&store, &category, &exercise, &duration),
        Commands::Summary => cmd_summary(&store),
        Commands::User { command } => match command {
            UserCommands::Set {
                name,
                regn_id,
                age,
                gender,
                height,
                weight,
            } => cmd_user_set(
                &store,
                UserForm {
                    name,
                    regn_id,
                    age,
                    gender,
                    height,
                    weight,
                },
            ),
            UserCommands::Show => cmd_user_show(&store),
        },
        Commands::Export { output } => cmd_export(&store, &output),
    }
}

fn cmd_log(store: &LedgerStore, category: &str, exercise: &str, duration: &str) -> Result<()> {
    match store.append_entry(category, exercise, duration) {
        Ok(entry) => {
            println!(
                "Added {} ({} min) to {}! Estimated {:.1} kcal.",
                entry.exercise, entry.duration_minutes, category, entry.calories
            );
            Ok(())
        }
        Err(Error::Validation(messages)) => {
            for message in &messages {
                eprintln!("Error: {}", message);
            }
            Err(Error::Validation(messages))
        }
        Err(e) => {
            eprintln!("Failed to persist session: {}", e);
            Err(e)
        }
    }
}

fn cmd_summary(store: &LedgerStore) -> Result<()> {
    let ledger = store.load_workouts();

    println!("Session Summary");
    println!("===============");
    for (category, entries) in ledger.iter() {
        println!("\n{}:", category);
        if entries.is_empty() {
            println!("  No sessions recorded.");
            continue;
        }
        for (i, entry) in entries.iter().enumerate() {
            println!(
                "  {}. {} - {} min / {:.1} kcal ({})",
                i + 1,
                entry.exercise,
                entry.duration_minutes,
                entry.calories,
                entry.timestamp.format(TIMESTAMP_FORMAT)
            );
        }
    }
    println!("\nTotal Time Spent: {} minutes", ledger.total_minutes());

    Ok(())
}

fn cmd_user_set(store: &LedgerStore, form: UserForm) -> Result<()> {
    match store.save_user_form(&form) {
        Ok(profile) => {
            println!(
                "User info saved! BMI={} BMR={} kcal/day",
                profile.bmi, profile.bmr
            );
            Ok(())
        }
        Err(Error::Validation(messages)) => {
            for message in &messages {
                eprintln!("Error: {}", message);
            }
            Err(Error::Validation(messages))
        }
        Err(e) => {
            eprintln!("Failed to persist profile: {}", e);
            Err(e)
        }
    }
}

fn cmd_user_show(store: &LedgerStore) -> Result<()> {
    match store.load_user() {
        Some(profile) => {
            println!("User Information");
            println!("  Name:    {} (ID: {})", profile.name, profile.regn_id);
            println!("  Age:     {}", profile.age);
            println!("  Gender:  {}", profile.gender);
            println!("  Height:  {} cm", profile.height_cm);
            println!("  Weight:  {} kg", profile.weight_kg);
            println!("  BMI:     {}", profile.bmi);
            println!("  BMR:     {} kcal/day", profile.bmr);
            println!("  Weekly goal: {} kcal", profile.weekly_cal_goal);
        }
        None => println!("No user profile saved yet."),
    }
    Ok(())
}

fn cmd_export(store: &LedgerStore, output: &Path) -> Result<()> {
    let ledger = store.load_workouts();
    let user = store.load_user();

    let bytes = render_report(&ledger, user.as_ref());
    std::fs::write(output, &bytes)?;

    println!(
        "Exported {} sessions to {}",
        ledger.entry_count(),
        output.display()
    );
    Ok(())
}
