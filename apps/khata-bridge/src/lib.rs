//! # Khata Bridge Library
//!
//! Host process for the Khata UI shell. The shell spawns the bridge and
//! talks to it over stdio; the bridge owns the draft, the local cache and
//! the connection to the invoicing API.
//!
//! ## Module Organization
//! ```text
//! khata_bridge/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── bridge.rs       ◄─── JSON-lines protocol and request routing
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports, AppState
//! │   ├── config.rs   ◄─── Defaults → TOML → environment
//! │   ├── db.rs       ◄─── Database state wrapper, best-effort cache
//! │   ├── draft.rs    ◄─── Invoice draft behind a mutex
//! │   └── session.rs  ◄─── Session id, last created credit
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── invoice.rs  ◄─── Draft editing and submission
//! │   ├── customer.rs ◄─── Customers and the cached customer form
//! │   ├── product.rs  ◄─── Products
//! │   ├── credit.rs   ◄─── Credits and credit documents
//! │   └── config.rs   ◄─── Configuration retrieval
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod bridge;
pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use error::StartupError;
use khata_db::{Database, DbConfig};
use state::{AppState, BridgeConfig, DbState};

const DATABASE_FILE_NAME: &str = "khata.db";

/// Runs the bridge until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Bridge Startup                                    │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,khata=debug,sqlx=warn; override with RUST_LOG       │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • defaults → khata.toml → KHATA_* environment                       │
/// │                                                                         │
/// │  3. Determine Database Path ──────────────────────────────────────────► │
/// │     • config / KHATA_DB_PATH, else the platform data dir               │
/// │     • Linux: ~/.local/share/khata/khata.db                              │
/// │                                                                         │
/// │  4. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, run pending migrations                      │
/// │                                                                         │
/// │  5. Restore Draft ────────────────────────────────────────────────────► │
/// │     • cached draft if it decodes and its totals compute, else fresh    │
/// │                                                                         │
/// │  6. Serve stdin → stdout ─────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), StartupError> {
    init_tracing();

    info!("Starting Khata bridge");

    let config = BridgeConfig::load(None)?;
    info!(api_url = %config.api.url, "Configuration loaded");

    let db_path = get_database_path(&config)?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let draft = commands::invoice::restore_draft(&DbState::new(db.clone()), &config.pricing).await;

    let state = AppState::new(config, db.clone(), draft)?;
    info!(session = %state.session.id(), "State initialized");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let served = bridge::serve(&state, stdin, stdout).await;

    db.close().await;
    served?;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries responses only.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=khata=trace` - Show trace for khata crates only
/// - Default: INFO, DEBUG for khata crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,khata=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.khata.khata/khata.db`
/// - **Windows**: `%APPDATA%\khata\khata\data\khata.db`
/// - **Linux**: `~/.local/share/khata/khata.db`
///
/// `database.path` in the config (or `KHATA_DB_PATH`) takes precedence.
fn get_database_path(config: &BridgeConfig) -> Result<PathBuf, StartupError> {
    if let Some(path) = &config.database.path {
        return Ok(path.clone());
    }

    let proj_dirs = state::project_dirs().ok_or(StartupError::NoDataDir)?;
    Ok(proj_dirs.data_dir().join(DATABASE_FILE_NAME))
}
