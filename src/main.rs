//! Portfolio TUI - terminal dashboard for portfolio analytics.
//!
//! Main entry point and event loop for the application.

mod api;
mod app;
mod boundary;
mod config;
mod format;
mod logging;
mod pages;
mod query;
mod routes;
mod table;
mod ui;
mod widgets;

use anyhow::Context;
use api::UniverseClient;
use app::App;
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use query::Fetcher;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};

/// Upper bound on how long the loop waits for input before ticking.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main application entry point.
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Loads configuration, starts logging, opens the dashboard and runs the
/// event loop until the user quits.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration, writing the defaults on first run
    let config_path = Config::default_config_path()?;
    let mut config = Config::load(Some(&config_path))?;
    if !config_path.exists() {
        config.save(Some(&config_path))?;
    }
    config.apply_env_overrides(|name| std::env::var(name).ok());

    logging::init(&config.log_file_path()?)?;
    logging::install_panic_hook();

    let client = UniverseClient::new(&config).context("Failed to create API client")?;
    tracing::info!(api = client.base_url(), config = %config_path.display(), "starting");
    let fetcher = Fetcher::new(client, config.stale_after());
    let today = chrono::Local::now().date_naive();
    let mut app = App::new(config, fetcher, today, Instant::now());

    // Optional start route, e.g. `portfolio-tui /universe/prices`
    if let Some(path) = std::env::args().nth(1)
        && !app.navigate_path(&path, Instant::now())
    {
        anyhow::bail!("Unknown route: {path}");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => tracing::info!("exiting"),
        Err(e) => tracing::error!(error = %e, "exiting with error"),
    }
    result
}

/// Main event loop.
///
/// # Arguments
/// * `terminal` - Terminal instance
/// * `app` - Application state
///
/// # Returns
/// * `Result<()>` - Success or error
///
/// # Details
/// Each iteration draws, waits up to [`POLL_INTERVAL`] for a key, advances
/// timers and hands finished fetches to the pages.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| ui::render_app(app, f))?;

        // Non-blocking poll keeps debounce and fetch results flowing
        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key, Instant::now());
        }

        let now = Instant::now();
        app.tick(now);
        app.pump_fetches(now).await;

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
