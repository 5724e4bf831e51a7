mod app;
mod domain;
mod repo;
mod ui;
mod usecase;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use app::App;
use domain::todo::Todo;
use repo::KeyValueStore;
use repo::memory::InMemoryKvStore;
use repo::sqlite::SqliteKvStore;
use usecase::theme::{THEME_KEY, ThemePreference};
use usecase::todo_store::{IdGenerator, TODOS_KEY, TodoStore};

#[derive(Parser, Debug)]
#[command(author, version, about = "tasklist: persisted todo list TUI", long_about = None)]
struct Args {
    /// Tick interval of render loop in milliseconds
    #[arg(long, default_value_t = 120)]
    tick_ms: u64,

    /// Start with demo tasks (implies in-memory store)
    #[arg(long, default_value_t = false)]
    demo: bool,

    /// Use in-memory store instead of SQLite
    #[arg(long, default_value_t = false)]
    memory: bool,

    /// Path to SQLite DB file (default: OS data dir)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Clear stored tasks and theme before starting
    #[arg(long, default_value_t = false)]
    reset: bool,

    /// Write logs to this file (the terminal is owned by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }

    let kv: Rc<dyn KeyValueStore> = if args.demo {
        Rc::new(seed_store()?)
    } else if args.memory {
        Rc::new(InMemoryKvStore::default())
    } else if let Some(path) = args.db_path.as_ref() {
        Rc::new(SqliteKvStore::open(path)?)
    } else {
        Rc::new(SqliteKvStore::open_default()?)
    };
    tracing::info!(demo = args.demo, memory = args.memory, "starting tasklist");
    if args.reset {
        kv.remove(TODOS_KEY)?;
        kv.remove(THEME_KEY)?;
        tracing::info!("cleared stored tasks and theme");
    }

    let mut store = TodoStore::new(Rc::clone(&kv));
    store.subscribe(|change, todos| {
        tracing::info!(?change, count = todos.len(), "todos changed");
    });
    let theme = ThemePreference::new(kv);
    let mut app = App::new(store, theme);
    if app.todos().is_empty() {
        app.set_status("Press 'a' to add your first task");
    }
    ui::run(app, Duration::from_millis(args.tick_ms))
}

fn seed_store() -> Result<InMemoryKvStore> {
    let mut ids = IdGenerator::system();
    let mut seed: Vec<Todo> = ["Draft release notes", "Check open reviews", "Write documentation"]
        .into_iter()
        .filter_map(|text| Todo::new(ids.next_id(), text))
        .collect();
    seed.reverse();
    let json = serde_json::to_string(&seed).context("failed to encode demo todos")?;
    Ok(InMemoryKvStore::with_seed([(TODOS_KEY, json)]))
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
