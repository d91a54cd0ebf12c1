//! # State Module
//!
//! Manages bridge state.
//!
//! ## Why Multiple State Types?
//! Instead of one `AppState` struct that every command borrows whole, each
//! concern gets its own type and commands declare exactly what they need.
//! [`AppState`] only bundles them for the request router.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                       AppState                                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┴────────┬──────────────┬────────────┐    │
//! │     ▼              ▼                  ▼              ▼            ▼    │
//! │  ┌────────┐  ┌────────────┐  ┌──────────────┐  ┌──────────┐ ┌───────┐ │
//! │  │DbState │  │ DraftState │  │ BridgeConfig │  │ Session  │ │Client │ │
//! │  │(SQLite │  │ Arc<Mutex< │  │ (read-only)  │  │ (credit  │ │(HTTP  │ │
//! │  │ pool)  │  │  Draft>>   │  │              │  │  id)     │ │ pool) │ │
//! │  └────────┘  └────────────┘  └──────────────┘  └──────────┘ └───────┘ │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • DraftState: Protected by Arc<Mutex<T>> for exclusive access         │
//! │  • BridgeConfig: Read-only after initialization                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod draft;
mod session;

pub use config::{env, ApiSettings, BridgeConfig, DatabaseSettings, DisplaySettings};
pub use db::DbState;
pub use draft::DraftState;
pub use session::SessionState;

use directories::ProjectDirs;
use khata_client::{ClientResult, KhataClient};
use khata_core::InvoiceDraft;
use khata_db::Database;

/// Platform directories for config and data.
pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "khata", "khata")
}

/// Everything a command can ask for.
#[derive(Debug)]
pub struct AppState {
    pub config: BridgeConfig,
    pub db: DbState,
    pub draft: DraftState,
    pub session: SessionState,
    pub client: KhataClient,
}

impl AppState {
    /// Assembles the state; the API client is built from `config`.
    pub fn new(config: BridgeConfig, db: Database, draft: InvoiceDraft) -> ClientResult<Self> {
        let client = KhataClient::new(config.api_config()?)?;
        Ok(AppState {
            config,
            db: DbState::new(db),
            draft: DraftState::new(draft),
            session: SessionState::new(),
            client,
        })
    }
}
