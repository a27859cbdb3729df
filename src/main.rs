use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use todostore::{
    Backend, BackendKind, Config, FilterMode, NewTask, Outcome, StoreError, Task, TaskUpdate, TodoStore, counts,
    filter,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - Manage a persisted task list")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage backend (overrides config)
    #[arg(short, long, value_enum)]
    backend: Option<BackendKind>,

    /// Data directory (overrides config)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Storage key holding the task list (overrides config)
    #[arg(short, long)]
    key: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        text: String,

        /// Create the task already completed
        #[arg(long)]
        completed: bool,
    },

    /// List tasks
    List {
        /// all, active, or completed
        #[arg(short, long, default_value = "all")]
        filter: FilterMode,
    },

    /// Change a task's text or completion state
    Update {
        id: String,

        #[arg(short, long)]
        text: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Flip a task between active and completed
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// Show per-filter counts
    Counts,

    /// Remove every task
    Clear,

    /// Check whether storage is usable
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(path) = &cli.path {
        config.path = Some(path.clone());
    }
    if let Some(key) = &cli.key {
        config.key = key.clone();
    }

    // Setup tracing
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?config, "Resolved config");

    let mut store = TodoStore::new(config.open_backend()?).with_key(config.key.clone());

    let ok = run(&mut store, cli.command, cli.json)?;
    if !ok {
        process::exit(1);
    }

    Ok(())
}

/// Execute one command; returns false when the store reported a failure
fn run(store: &mut TodoStore<Box<dyn Backend>>, command: Commands, json: bool) -> Result<bool> {
    match command {
        Commands::Add { text, completed } => {
            let result = store.add_with(NewTask::new(text).completed(completed));
            report(store, result, json, "Added")
        }
        Commands::Update { id, text, completed } => {
            let update = TaskUpdate { text, completed };
            if update.is_empty() {
                eprintln!("{}", "Nothing to update: pass --text and/or --completed".yellow());
                return Ok(false);
            }
            let result = store.update(&id, update);
            report(store, result, json, "Updated")
        }
        Commands::Toggle { id } => {
            let result = store.toggle(&id);
            report(store, result, json, "Toggled")
        }
        Commands::Delete { id } => {
            let result = store.delete(&id);
            report(store, result, json, "Deleted")
        }
        Commands::List { filter: mode } => {
            let tasks = filter(&store.get_all(), mode);
            if json {
                print_json(&Outcome::ok(&tasks))?;
            } else if tasks.is_empty() {
                println!("{}", format!("No {} tasks", mode).dimmed());
            } else {
                for task in &tasks {
                    print_task(task);
                }
            }
            Ok(true)
        }
        Commands::Counts => {
            let c = counts(&store.get_all());
            if json {
                print_json(&Outcome::ok(c))?;
            } else {
                println!(
                    "{} all, {} active, {} completed",
                    c.all.to_string().bold(),
                    c.active.to_string().yellow(),
                    c.completed.to_string().green()
                );
            }
            Ok(true)
        }
        Commands::Clear => {
            let result = store.clear();
            let ok = result.is_ok();
            if json {
                print_json(&Outcome::from(result))?;
            } else {
                match result {
                    Ok(()) => println!("Cleared all tasks"),
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                }
            }
            Ok(ok)
        }
        Commands::Check => {
            let available = store.is_available();
            if json {
                print_json(&Outcome::ok(available))?;
            } else if available {
                println!("{}", "Storage is available".green());
            } else {
                println!("{}", "Storage is unavailable; changes will not be saved".red());
            }
            Ok(available)
        }
    }
}

/// Print a mutation result, then re-read the list for the summary line
fn report(
    store: &TodoStore<Box<dyn Backend>>,
    result: Result<Task, StoreError>,
    json: bool,
    verb: &str,
) -> Result<bool> {
    let ok = result.is_ok();

    if json {
        print_json(&Outcome::from(result))?;
        return Ok(ok);
    }

    match result {
        Ok(task) => {
            print!("{} ", verb.green());
            print_task(&task);
            let c = counts(&store.get_all());
            println!("{}", format!("{} active, {} completed", c.active, c.completed).dimmed());
        }
        Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
    }

    Ok(ok)
}

fn print_task(task: &Task) {
    let created = task.created_at.format("%Y-%m-%d %H:%M");
    if task.completed {
        println!("[x] {} {} {}", task.id.dimmed(), task.text.strikethrough(), created.to_string().dimmed());
    } else {
        println!("[ ] {} {} {}", task.id.dimmed(), task.text, created.to_string().dimmed());
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
