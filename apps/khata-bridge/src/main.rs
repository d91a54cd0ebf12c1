//! # Khata Bridge Entry Point
//!
//! Started by the UI shell as a child process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI shell ──stdin (JSON lines)──► khata-bridge ──HTTPS──► invoicing API │
//! │           ◄─stdout (JSON lines)──       │                               │
//! │                                         ▼                               │
//! │                                  khata.db (form cache)                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The setup lives in lib.rs so tests can drive it
    match khata_bridge::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Bridge stopped");
            eprintln!("khata-bridge: {e}");
            ExitCode::FAILURE
        }
    }
}
