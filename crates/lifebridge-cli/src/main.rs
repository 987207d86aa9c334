//! `lifebridge`: terminal front end for the LifeBridge hospital API.
//!
//! # Usage
//!
//! ```
//! lifebridge --url http://localhost:8080/hospital
//! lifebridge --config ~/.config/lifebridge/config.toml
//! lifebridge --path /LifeBridgeHospital/doctor/appointments
//! ```

mod app;
mod fields;
mod route;
mod ui;

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::{App, Services};
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lifebridge_client::{ApiClient, ClientConfig, SessionStore, config::default_config_file};
use ratatui::{Terminal, backend::CrosstermBackend};
use route::Route;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lifebridge", version, about = "Terminal front end for the LifeBridge hospital")]
struct Args {
  /// Path to a TOML config file (base_url, timeout_secs, token_path,
  /// log_path).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the hospital API (default: http://localhost:8080/hospital).
  #[arg(long, env = "LIFEBRIDGE_URL")]
  url: Option<String>,

  /// Open this path instead of the landing page, e.g. `/admin/doctors`.
  #[arg(long, value_name = "PATH")]
  path: Option<String>,

  /// Keep the session in memory only; nothing is written to disk.
  #[arg(long)]
  ephemeral: bool,
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// File, then `LIFEBRIDGE_*` environment, then command-line flags.
fn load_config(args: &Args) -> Result<ClientConfig> {
  let file = args.config.clone().or_else(default_config_file);

  let mut builder = config::Config::builder();
  if let Some(path) = file {
    builder = builder.add_source(config::File::from(path).required(args.config.is_some()));
  }
  let settings = builder
    .add_source(config::Environment::with_prefix("LIFEBRIDGE"))
    .set_override_option("base_url", args.url.clone())
    .context("applying --url")?
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ClientConfig")
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: &std::path::Path) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating log directory {}", parent.display()))?;
  }
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let cfg = load_config(&args)?;
  init_logging(&cfg.log_path())?;

  let session = if args.ephemeral {
    SessionStore::in_memory()
  } else {
    SessionStore::file(cfg.token_path())
  };
  let api = ApiClient::with_session(&cfg, session.clone()).context("building API client")?;
  tracing::info!(base_url = %api.base_url(), "starting");

  let mut app = App::new(Services::new(api, session));
  app.start();
  if let Some(path) = &args.path {
    app.navigate(Route::parse(path));
  }

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app);

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  tracing::info!("exiting");
  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.drain();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Resize and everything else redraw on the next iteration.
      _ => {}
    }
  }

  Ok(())
}
