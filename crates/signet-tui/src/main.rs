//! signet - a terminal client for the signet account service.
//!
//! Sign in, manage your profile, and walk the whole account lifecycle
//! (registration, email verification, password resets) without leaving
//! the terminal.

mod app;
mod ui;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use signet_core::{ApiClient, Config, SessionStore, TokenStore};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file under the data directory because stderr belongs to
/// the alternate screen while the TUI runs. Use the RUST_LOG env var to
/// control the level (e.g. RUST_LOG=debug).
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match Config::data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), "signet.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--login" {
        return cli_login().await;
    }
    if args.len() > 1 && args[1] == "--whoami" {
        return cli_whoami().await;
    }
    if args.len() > 1 && args[1] == "--logout" {
        return cli_logout().await;
    }

    // Initialize logging
    let _guard = init_tracing();
    info!("signet starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and restore any saved session before the first frame
    let mut app = App::new().await?;
    app.initialize().await;

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

    info!("signet shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout so status changes still repaint
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

// ============================================================================
// CLI commands
// ============================================================================

fn build_session(config: &Config) -> Result<SessionStore> {
    let tokens = TokenStore::new(Config::data_dir()?);
    let api = ApiClient::new(&config.server_url(), tokens)?;
    Ok(SessionStore::new(api))
}

/// Prompt for credentials and sign in without starting the TUI
async fn cli_login() -> Result<()> {
    let mut config = Config::load()?;
    let mut session = build_session(&config)?;

    println!("\n=== signet login ===\n");

    let email = {
        match config.last_email {
            Some(ref last) => print!("Email [{}]: ", last),
            None => print!("Email: "),
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            config.last_email.clone().unwrap_or_default()
        } else {
            input.to_string()
        }
    };

    let password = rpassword::prompt_password("Password: ")?;

    println!("\nAuthenticating...");
    session
        .login(&email, &password)
        .await
        .context("Login failed")?;

    config.last_email = Some(email);
    config.save()?;

    let name = session
        .user()
        .map(|u| u.display_name())
        .unwrap_or_default();
    println!("Signed in as {}.\n", name);
    Ok(())
}

/// Print the signed-in account, if any
async fn cli_whoami() -> Result<()> {
    let config = Config::load()?;
    let mut session = build_session(&config)?;
    session.initialize().await;

    match session.user() {
        Some(user) => {
            println!("{}", user.display_name());
            println!(
                "  email:        {} ({})",
                user.email,
                if user.is_email_verified {
                    "verified"
                } else {
                    "unverified"
                }
            );
            if let Some(username) = user.username.as_deref() {
                println!("  username:     {}", username);
            }
            if let Some(since) = user.member_since() {
                println!("  member since: {}", since);
            }
        }
        None => {
            println!("Not signed in. Run `signet --login` first.");
        }
    }
    Ok(())
}

/// Drop the stored session, telling the server when possible
async fn cli_logout() -> Result<()> {
    let config = Config::load()?;
    let mut session = build_session(&config)?;
    session.logout().await;
    println!("Signed out.");
    Ok(())
}
