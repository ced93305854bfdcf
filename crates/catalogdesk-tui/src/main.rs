//! Catalog Desk - a terminal admin for a REST product catalog.
//!
//! This application provides a keyboard-driven interface for logging in,
//! browsing, creating, editing, and deleting products through the catalog
//! API.

mod app;
mod ui;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use catalogdesk_core::auth::open_token_store;
use catalogdesk_core::{ApiClient, AuthState, Config};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use catalogdesk_core::Route;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "catalogdesk.log";

const USAGE: &str = "\
Usage: catalogdesk [OPTION]

Options:
  --login     Log in from the command line and store the token
  --logout    Remove the stored token
  --status    Show the API origin and whether a token is stored
  --help      Show this message

Without options the terminal UI starts.";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr for the one-shot commands
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// Log to a daily file while the terminal is in raw mode.
/// The returned guard flushes on drop.
fn init_file_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.data_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if let Some(command) = args.get(1) {
        init_stderr_tracing();
        return match command.as_str() {
            "--login" => cli_login().await,
            "--logout" => cli_logout(),
            "--status" => cli_status(),
            "--help" | "-h" => {
                println!("{}", USAGE);
                Ok(())
            }
            other => Err(anyhow::anyhow!("Unknown option '{}'\n\n{}", other, USAGE)),
        };
    }

    let config = Config::load();
    let _log_guard = init_file_tracing(&config)?;
    info!("Catalog Desk starting");

    // Create app before touching the terminal so setup errors print normally
    let mut app = App::new(config)?;
    let start = if app.is_authenticated() {
        Route::Dashboard
    } else {
        Route::Login
    };
    app.navigate(start);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Catalog Desk shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Never draw a protected page without a session
        app.enforce_guard();

        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Queued network action: the frame above shows its in-flight label
        if app.pending.is_some() {
            app.run_pending().await;
            continue;
        }

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// One-shot commands
// ============================================================================

fn open_auth(config: &Config) -> Result<(AuthState, ApiClient)> {
    let tokens = open_token_store(config.token_backend, &config.data_dir()?);
    let api = ApiClient::new(&config.base_url(), tokens.clone())?;
    Ok((AuthState::load(tokens), api))
}

/// Prompt for credentials on the terminal and store the resulting token
async fn cli_login() -> Result<()> {
    let mut config = Config::load();
    let (mut auth, api) = open_auth(&config)?;

    let default_username = std::env::var("CATALOGDESK_USERNAME")
        .ok()
        .or_else(|| config.last_username.clone())
        .unwrap_or_default();

    if default_username.is_empty() {
        eprint!("Username: ");
    } else {
        eprint!("Username [{}]: ", default_username);
    }
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let username = match line.trim() {
        "" => default_username,
        entered => entered.to_string(),
    };
    if username.is_empty() {
        anyhow::bail!("Username required");
    }

    let password = match std::env::var("CATALOGDESK_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Password: ")?,
    };

    let response = api
        .login(&username, &password)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    auth.login_success(response.token().unwrap_or_default());

    config.last_username = Some(username.clone());
    config.save()?;

    println!("Logged in as {}", username);
    Ok(())
}

fn cli_logout() -> Result<()> {
    let config = Config::load();
    let (mut auth, _) = open_auth(&config)?;
    if auth.is_authenticated() {
        auth.logout();
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

fn cli_status() -> Result<()> {
    let config = Config::load();
    let (auth, api) = open_auth(&config)?;

    println!("API:      {}", api.base_url());
    println!("Storage:  {:?}", config.token_backend);
    if let Some(ref username) = config.last_username {
        println!("User:     {}", username);
    }
    println!(
        "Session:  {}",
        if auth.is_authenticated() {
            "logged in"
        } else {
            "not logged in"
        }
    );
    Ok(())
}
