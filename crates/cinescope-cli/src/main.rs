//! `cinescope` — movie catalog search with query statistics.
//!
//! # Usage
//!
//! ```
//! cinescope                         # interactive menu
//! cinescope --config ~/.config/cinescope/cinescope.toml
//! cinescope stats top --category actor --limit 3
//! cinescope stats keywords --json
//! cinescope history --limit 20
//! ```

mod app;
mod config;
mod input;
mod report;
mod ui;

#[cfg(test)]
mod tests;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context as _, Result};
use app::App;
use cinescope_catalog_sqlite::SqliteCatalog;
use cinescope_core::{catalog::Catalog, category::Category, store::EventStore};
use cinescope_stats::Reporting;
use cinescope_store_sqlite::SqliteEventStore;
use clap::{Parser, Subcommand};
use crate::config::AppConfig;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cinescope", version, about = "Movie catalog search with query statistics")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "cinescope.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
  /// Interactive menu (the default).
  Tui,

  /// Print search statistics and exit.
  #[command(subcommand)]
  Stats(StatsCommand),

  /// Print the most recent searches and exit.
  History {
    #[arg(short, long, default_value_t = 20)]
    limit: usize,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
  },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum StatsCommand {
  /// Most frequent searches, overall or for one category.
  Top {
    /// Number of rows (default: `top_queries_limit`).
    #[arg(short, long)]
    limit: Option<usize>,

    /// One of genre, year, genre_year, keyword, actor.
    #[arg(short, long, value_parser = Category::parse)]
    category: Option<Category>,

    #[arg(long)]
    json: bool,
  },

  /// Number of searches per category.
  Distribution {
    #[arg(long)]
    json: bool,
  },

  /// Most frequent keywords.
  Keywords {
    /// Number of rows (default: `keyword_bubble_limit`).
    #[arg(short, long)]
    limit: Option<usize>,

    #[arg(long)]
    json: bool,
  },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  match cli.command.unwrap_or(Command::Tui) {
    Command::Tui => {
      // The terminal belongs to the UI, so logs go to a file.
      init_tracing(Some(&cfg.log_file))?;
      run_tui(&cfg).await
    }
    command => {
      init_tracing(None)?;
      let reporting = open_reporting(&cfg).await;
      let result = run_once(&reporting, command).await;
      reporting.close().await;
      result
    }
  }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  let builder = tracing_subscriber::fmt().with_env_filter(filter);

  match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
      builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    None => builder.with_writer(io::stderr).init(),
  }
  Ok(())
}

/// Open the query log, or carry on without one.
async fn open_reporting(cfg: &AppConfig) -> Reporting<SqliteEventStore> {
  match SqliteEventStore::open(&cfg.store_path).await {
    Ok(store) => Reporting::new(store, cfg.report_limits()),
    Err(e) => {
      warn!(error = %e, "query log unavailable; searches will not be recorded");
      Reporting::disabled(cfg.report_limits())
    }
  }
}

// ─── One-shot commands ───────────────────────────────────────────────────────

async fn run_once<S: EventStore + Clone>(reporting: &Reporting<S>, command: Command) -> Result<()> {
  let output = match command {
    Command::Tui => return Ok(()),
    Command::Stats(StatsCommand::Top { limit, category, json }) => {
      let rows = match category {
        Some(c) => reporting.top_queries_by_category(c, limit).await,
        None => reporting.top_queries(limit).await,
      };
      if json { report::json(&rows)? } else { report::top_queries(&rows) }
    }
    Command::Stats(StatsCommand::Distribution { json }) => {
      let counts = reporting.category_distribution().await;
      if json { report::json(&counts)? } else { report::distribution(&counts) }
    }
    Command::Stats(StatsCommand::Keywords { limit, json }) => {
      let counts = reporting.top_keywords(limit).await;
      if json { report::json(&counts)? } else { report::keywords(&counts) }
    }
    Command::History { limit, json } => {
      let events = reporting.recent_events(limit).await;
      if json { report::json(&events)? } else { report::history(&events) }
    }
  };
  println!("{}", output.trim_end());
  Ok(())
}

// ─── Interactive mode ────────────────────────────────────────────────────────

async fn run_tui(cfg: &AppConfig) -> Result<()> {
  let catalog = SqliteCatalog::open(&cfg.catalog_path)
    .await
    .with_context(|| format!("failed to open catalog at {}", cfg.catalog_path.display()))?;
  let reporting = open_reporting(cfg).await;

  let mut app = App::new(catalog, reporting, cfg);
  app.load().await;

  let result = run_terminal(&mut app).await;

  // Release the query log on every exit path.
  app.reporting().close().await;
  info!("bye");
  result
}

/// Set up the terminal, run the event loop, and restore the terminal even
/// on error.
async fn run_terminal<C, S>(app: &mut App<C, S>) -> Result<()>
where
  C: Catalog,
  S: EventStore + Clone,
{
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();

  let result = match execute!(stdout, EnterAlternateScreen) {
    Ok(()) => match Terminal::new(CrosstermBackend::new(stdout)) {
      Ok(mut terminal) => {
        let result = run_event_loop(&mut terminal, app).await;
        terminal.show_cursor().ok();
        result
      }
      Err(e) => Err(e).context("creating terminal"),
    },
    Err(e) => Err(e).context("entering alternate screen"),
  };

  disable_raw_mode().ok();
  execute!(io::stdout(), LeaveAlternateScreen).ok();

  result
}

// ─── Event loop ──────────────────────────────────────────────────────────────

async fn run_event_loop<C, S>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<C, S>,
) -> Result<()>
where
  C: Catalog,
  S: EventStore + Clone,
{
  loop {
    terminal
      .draw(|f| ui::draw(f, &app.view))
      .context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    // Resize needs nothing: the next iteration redraws.
    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}
