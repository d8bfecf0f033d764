use clap::{Parser, Subcommand, ValueEnum};
use ironlog_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ironlog")]
#[command(about = "Strength training session tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Act as this user (defaults to the configured user)
    #[arg(long, global = true)]
    user: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the exercise catalog
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },

    /// Manage workout plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Track the active workout session
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// List past sessions
    History {
        /// Maximum number of sessions to show
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Also write the history to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Add an exercise to the catalog
    Add {
        name: String,

        /// How the exercise counts toward tonnage
        #[arg(long, value_enum, default_value = "standard")]
        kind: KindArg,
    },

    /// List the catalog, name ascending
    List,

    /// Remove an exercise (fails while plans or history reference it)
    Rm { name: String },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Create an empty plan
    Create { name: String },

    /// List plans
    List,

    /// Show a plan's exercises in order
    Show { name: String },

    /// Append an exercise to a plan
    Add {
        plan: String,
        exercise: String,

        #[arg(long, default_value_t = 3)]
        sets: i32,

        #[arg(long, default_value_t = 8)]
        reps: i32,
    },

    /// Delete a plan (sessions keep their snapshotted plan name)
    Rm { name: String },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Start a session from a plan
    Start {
        plan: String,

        /// Body weight in lbs, used for bodyweight/assisted tonnage
        #[arg(long)]
        body_weight: Option<f64>,
    },

    /// Log a set against the active session
    Log {
        exercise: String,

        #[arg(long)]
        reps: i32,

        #[arg(long)]
        weight: f64,
    },

    /// Update the active session's body weight
    BodyWeight { weight: f64 },

    /// Show the active session
    Status,

    /// Complete the active session
    Complete,

    /// Cancel the active session, discarding its sets
    Cancel,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Standard,
    Bodyweight,
    Assisted,
}

impl From<KindArg> for ExerciseKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Standard => ExerciseKind::Standard,
            KindArg::Bodyweight => ExerciseKind::Bodyweight,
            KindArg::Assisted => ExerciseKind::Assisted,
        }
    }
}

fn main() {
    ironlog_core::logging::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let user = cli.user.unwrap_or_else(|| config.user.name.clone());
    let store = Store::open(data_dir);

    match cli.command {
        Commands::Exercise { command } => cmd_exercise(&store, &user, command),
        Commands::Plan { command } => cmd_plan(&store, &user, command),
        Commands::Session { command } => cmd_session(&store, &user, command),
        Commands::History { limit, csv } => cmd_history(&store, &user, limit, csv),
    }
}

fn cmd_exercise(store: &Store, user: &str, command: ExerciseCommands) -> Result<()> {
    match command {
        ExerciseCommands::Add { name, kind } => {
            let exercise = exercises::create(store, user, &name, kind.into())?;
            println!("✓ Added exercise '{}' ({})", exercise.name, exercise.kind);
        }

        ExerciseCommands::List => {
            let all = exercises::list(store, user)?;
            if all.is_empty() {
                println!("No exercises yet.");
            }
            for exercise in all {
                println!("{}  [{}]", exercise.name, exercise.kind);
            }
        }

        ExerciseCommands::Rm { name } => {
            let exercise = find_exercise(store, user, &name)?;
            exercises::delete(store, exercise.id, user)?;
            println!("✓ Removed exercise '{}'", exercise.name);
        }
    }
    Ok(())
}

fn cmd_plan(store: &Store, user: &str, command: PlanCommands) -> Result<()> {
    match command {
        PlanCommands::Create { name } => {
            let plan = plans::create(store, user, &name)?;
            println!("✓ Created plan '{}'", plan.name);
        }

        PlanCommands::List => {
            let all = plans::list(store, user)?;
            if all.is_empty() {
                println!("No plans yet.");
            }
            for detail in all {
                println!("{}  ({} exercises)", detail.plan.name, detail.exercises.len());
            }
        }

        PlanCommands::Show { name } => {
            let plan = find_plan(store, user, &name)?;
            let detail = plans::get(store, plan.id, user)?;
            println!("{}", detail.plan.name);
            for entry in &detail.exercises {
                println!(
                    "  {}. {}  {}x{}",
                    entry.entry.order_index + 1,
                    entry.exercise.name,
                    entry.entry.sets,
                    entry.entry.target_reps
                );
            }
        }

        PlanCommands::Add {
            plan,
            exercise,
            sets,
            reps,
        } => {
            let plan = find_plan(store, user, &plan)?;
            let exercise = find_exercise(store, user, &exercise)?;
            let entry = plans::add_exercise(store, plan.id, user, exercise.id, sets, reps)?;
            println!(
                "✓ Added {} to '{}' ({}x{})",
                exercise.name, plan.name, entry.sets, entry.target_reps
            );
        }

        PlanCommands::Rm { name } => {
            let plan = find_plan(store, user, &name)?;
            plans::delete(store, plan.id, user)?;
            println!("✓ Deleted plan '{}'", plan.name);
        }
    }
    Ok(())
}

fn cmd_session(store: &Store, user: &str, command: SessionCommands) -> Result<()> {
    match command {
        SessionCommands::Start { plan, body_weight } => {
            let plan = find_plan(store, user, &plan)?;
            let session = sessions::start(store, user, plan.id, body_weight)?;
            println!("✓ Started session from '{}'", session.plan_name);
            if let Some(weight) = session.body_weight {
                println!("  Body weight: {:.1} lbs", weight);
            }
        }

        SessionCommands::Log {
            exercise,
            reps,
            weight,
        } => {
            let detail = require_active(store, user)?;
            let exercise = find_exercise(store, user, &exercise)?;
            let set =
                sessions::log_set(store, detail.session.id, user, exercise.id, reps, weight)?;
            let updated = sessions::get(store, detail.session.id, user)?;
            println!("✓ Logged {}", set);
            println!("  Session tonnage: {:.1} lbs", updated.session.tonnage);
        }

        SessionCommands::BodyWeight { weight } => {
            let detail = require_active(store, user)?;
            let session =
                sessions::update_body_weight(store, detail.session.id, user, Some(weight))?;
            println!("✓ Body weight set to {:.1} lbs", weight);
            println!("  Session tonnage: {:.1} lbs", session.tonnage);
        }

        SessionCommands::Status => match sessions::get_active(store, user)? {
            None => println!("No active workout session."),
            Some(detail) => {
                println!(
                    "Active: '{}' (started {})",
                    detail.session.plan_name,
                    detail.session.started_at.format("%Y-%m-%d %H:%M")
                );
                if let Some(weight) = detail.session.body_weight {
                    println!("Body weight: {:.1} lbs", weight);
                }
                for set in &detail.sets {
                    println!("  {}", set);
                }
                println!("Tonnage: {:.1} lbs", detail.session.tonnage);
            }
        },

        SessionCommands::Complete => {
            let detail = require_active(store, user)?;
            let session = sessions::complete(store, detail.session.id, user)?;
            println!(
                "✓ Completed '{}' at {:.1} lbs tonnage",
                session.plan_name, session.tonnage
            );
        }

        SessionCommands::Cancel => {
            let detail = require_active(store, user)?;
            sessions::cancel(store, detail.session.id, user)?;
            println!("✓ Session cancelled; its sets were discarded.");
        }
    }
    Ok(())
}

fn cmd_history(store: &Store, user: &str, limit: usize, csv: Option<PathBuf>) -> Result<()> {
    let history = sessions::list_recent(store, user, limit)?;

    if history.is_empty() {
        println!("No sessions yet.");
    }
    for session in &history {
        let status = if session.is_active() { "active" } else { "completed" };
        println!(
            "{}  '{}'  {:.1} lbs  [{}]",
            session.started_at.format("%Y-%m-%d %H:%M"),
            session.plan_name,
            session.tonnage,
            status
        );
    }

    if let Some(path) = csv {
        let file = std::fs::File::create(&path)?;
        let count = write_history_csv(file, &history)?;
        println!("✓ Wrote {} sessions to {}", count, path.display());
    }

    Ok(())
}

/// Resolve an exercise by exact (trimmed) name
fn find_exercise(store: &Store, user: &str, name: &str) -> Result<Exercise> {
    let trimmed = name.trim();
    exercises::list(store, user)?
        .into_iter()
        .find(|e| e.name == trimmed)
        .ok_or_else(|| Error::NotFound(format!("No exercise named '{}'.", trimmed)))
}

/// Resolve a plan by exact (trimmed) name
fn find_plan(store: &Store, user: &str, name: &str) -> Result<WorkoutPlan> {
    let trimmed = name.trim();
    plans::list(store, user)?
        .into_iter()
        .map(|detail| detail.plan)
        .find(|p| p.name == trimmed)
        .ok_or_else(|| Error::NotFound(format!("No plan named '{}'.", trimmed)))
}

fn require_active(store: &Store, user: &str) -> Result<SessionDetail> {
    sessions::get_active(store, user)?
        .ok_or_else(|| Error::NotFound("No active workout session.".into()))
}
