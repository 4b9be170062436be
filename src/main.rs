//! Makaton Board - terminal picture choice board
//!
//! This application shows a grid of Makaton-style categories and signs. Each
//! choice notifies the teaching assistant through the relay, quick choices
//! are predicted from recent history, and every third choice earns a reward
//! picture.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use choiceboard::board::{Board, BoardServices, BoardSettings};
use choiceboard::config::Config;
use choiceboard::constants::{APP_BINARY_NAME, APP_NAME};
use choiceboard::models::{Catalog, StudentProfile};
use choiceboard::services::{HttpBackend, HttpImageProbe};
use choiceboard::tui::{self, AppState};

/// Makaton Board - terminal picture choice board
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the student using the board (saved for next time)
    #[arg(long, value_name = "NAME")]
    student: Option<String>,

    /// Turn on high-contrast rendering (saved for next time)
    #[arg(long)]
    high_contrast: bool,

    /// Relay functions base URL for this session
    #[arg(long, value_name = "URL")]
    relay_url: Option<String>,

    /// TOML catalog replacing the built-in categories for this session
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Write a config file with the given options and exit
    #[arg(short, long)]
    init: bool,

    /// Forget the saved student before starting
    #[arg(long)]
    forget_student: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;

    // Persistent preferences
    let mut changed = false;
    if cli.forget_student {
        config.clear_student();
        changed = true;
    }
    if let Some(name) = &cli.student {
        config.set_student(name);
        changed = true;
    }
    if cli.high_contrast && !config.ui.high_contrast {
        config.ui.high_contrast = true;
        changed = true;
    }
    if changed || cli.init {
        config.save()?;
    }

    if cli.init {
        println!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
        println!("Configuration written to {}", Config::config_file_path()?.display());
        println!();
        println!("Start the board with:");
        println!("  {APP_BINARY_NAME}");
        return Ok(());
    }

    // Session-only overrides
    if let Some(url) = cli.relay_url {
        config.services.relay_url = url;
    }
    if let Some(path) = cli.catalog {
        if !path.exists() {
            eprintln!("Error: Catalog file not found: {}", path.display());
            eprintln!();
            eprintln!("Run without --catalog to use the built-in categories:");
            eprintln!("  {APP_BINARY_NAME}");
            std::process::exit(1);
        }
        config.catalog.path = Some(path);
    }
    config.validate()?;

    init_logging(cli.verbose)?;
    info!(version = env!("CARGO_PKG_VERSION"), relay = %config.services.relay_url, "Starting board");

    let catalog = Catalog::load_or_builtin(config.catalog.path.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let services = BoardServices {
        backend: Arc::new(HttpBackend::from_config(&config.services)),
        probe: Arc::new(HttpImageProbe::new(config.services.probe_timeout())),
    };
    let board = Board::new(
        runtime.handle().clone(),
        catalog,
        StudentProfile::new(&config.student.name),
        services,
        BoardSettings::from_config(&config.services),
    );

    let mut state = AppState::new(board, config, true);
    let mut terminal = tui::setup_terminal()?;
    let result = tui::run_tui(&mut state, &mut terminal);
    tui::restore_terminal(terminal)?;

    info!(selections = state.board.selection_count(), "Board closed");
    result
}

/// Logs go to `board.log` in the config directory; stdout belongs to the board.
fn init_logging(verbose: bool) -> Result<()> {
    let dir = Config::config_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let path = dir.join("board.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
