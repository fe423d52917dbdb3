mod app;
mod board;
mod config;
mod input;
mod physics;
mod ui;

use std::env;
use std::path::Path;

use clap::{Parser, Subcommand};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;

use board::storage::{self, find_store_dir, init_store, KvStore};
use board::{Registry, TaskColor, TaskDraft};

#[derive(Parser)]
#[command(name = "tablero", about = "A mouse-first task board TUI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .tablero/ store in the current directory
    Init {
        /// Start with a few example tasks
        #[arg(long)]
        seed: bool,
    },
    /// Add a new task to the first column
    Add {
        /// Short subject shown on the ball's card
        subject: String,
        /// Task title
        #[arg(short, long, default_value = "")]
        title: String,
        /// Task description (markdown)
        #[arg(short, long, default_value = "")]
        description: String,
        /// Ball color (rojo, amarillo, verde)
        #[arg(short, long)]
        color: TaskColor,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
    /// List live tasks by column
    List,
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let cwd = match env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: cannot determine current directory: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Command::Init { seed }) => cmd_init(&cwd, seed),
        Some(Command::Add { subject, title, description, color, date }) => {
            cmd_add(&cwd, subject, title, description, color, date)
        }
        Some(Command::List) => cmd_list(&cwd),
        None => cmd_tui(&cwd),
    };

    if let Err(e) = result {
        print_user_error(&e);
        std::process::exit(1);
    }
}

/// Print a user-friendly error message, with actionable hints for known
/// error types.
fn print_user_error(error: &color_eyre::Report) {
    if let Some(storage_err) = error.downcast_ref::<storage::StorageError>() {
        match storage_err {
            storage::StorageError::NotFound(_) => {
                eprintln!("error: no tablero store found in this directory.");
                eprintln!("  Run `tablero init` to create one.");
            }
            storage::StorageError::TomlDe(e) => {
                eprintln!("error: config.toml has invalid TOML syntax.");
                eprintln!("  {e}");
            }
            storage::StorageError::Json(e) => {
                eprintln!("error: could not serialize board records.");
                eprintln!("  {e}");
            }
            storage::StorageError::Io(e) => {
                eprintln!("error: could not read or write board files.");
                eprintln!("  {e}");
            }
        }
        return;
    }

    eprintln!("error: {e:#}", e = error);
}

fn cmd_init(cwd: &Path, seed: bool) -> color_eyre::Result<()> {
    let already = cwd.join(storage::STORE_DIR).is_dir();
    let store_dir = init_store(cwd, seed)?;
    if already {
        println!("Store already exists in {}", store_dir.display());
    } else {
        println!("Initialized tablero store in {}", store_dir.display());
        println!("Run `tablero` to open the board, or `tablero add \"ASUNTO\" --color rojo` to add tasks.");
    }
    Ok(())
}

fn cmd_add(
    cwd: &Path,
    subject: String,
    title: String,
    description: String,
    color: TaskColor,
    date: Option<chrono::NaiveDate>,
) -> color_eyre::Result<()> {
    let store_dir = find_store_dir(cwd)?;
    let config = storage::load_config(&store_dir)?;
    let store = KvStore::open(store_dir);

    let mut registry = Registry::new();
    registry.load_all(&store, &config)?;
    let id = registry.create(
        &store,
        &config,
        TaskDraft { subject: subject.clone(), title, description, color, date, time: None },
    )?;
    println!("Created {id}: {subject}");
    Ok(())
}

fn cmd_list(cwd: &Path) -> color_eyre::Result<()> {
    let store_dir = find_store_dir(cwd)?;
    let config = storage::load_config(&store_dir)?;
    let store = KvStore::open(store_dir);

    let mut registry = Registry::new();
    registry.load_all(&store, &config)?;

    for column in board::ColumnId::ALL {
        let balls: Vec<_> = registry
            .balls()
            .iter()
            .filter(|b| b.column == column)
            .collect();
        if balls.is_empty() {
            continue;
        }
        println!("\n{} ({})", column.title(), balls.len());
        println!("{}", "─".repeat(40));
        for ball in balls {
            if let Some(task) = registry.task(&ball.id) {
                println!("  {:<20} {:<24} {}", ball.id, task.subject, task.due_date);
            }
        }
    }
    println!();
    Ok(())
}

fn cmd_tui(cwd: &Path) -> color_eyre::Result<()> {
    let store_dir = find_store_dir(cwd)?;
    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;
    let result = app::run(&mut terminal, &store_dir);
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::storage::load_tasks;

    #[test]
    fn cmd_init_then_add_persists_the_task() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path(), false).unwrap();
        cmd_add(
            dir.path(),
            "COMPRA".into(),
            "Comprar café".into(),
            String::new(),
            TaskColor::Green,
            None,
        )
        .unwrap();

        let store = KvStore::open(dir.path().join(storage::STORE_DIR));
        let tasks = load_tasks(&store);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].subject, "COMPRA");
        assert!(tasks[0].id.as_deref().unwrap().starts_with("ball-custom-"));
    }

    #[test]
    fn cmd_add_without_store_returns_err() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_add(
            dir.path(),
            "X".into(),
            String::new(),
            String::new(),
            TaskColor::Red,
            None,
        )
        .unwrap_err();
        assert!(err.downcast_ref::<storage::StorageError>().is_some());
    }

    #[test]
    fn cmd_init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path(), true).unwrap();
        cmd_init(dir.path(), false).unwrap();

        let store = KvStore::open(dir.path().join(storage::STORE_DIR));
        assert_eq!(load_tasks(&store).len(), 3);
    }

    #[test]
    fn cmd_list_works_on_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path(), true).unwrap();
        assert!(cmd_list(dir.path()).is_ok());
    }
}
