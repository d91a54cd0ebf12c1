//! # khata-db: Local Cache for Khata
//!
//! SQLite storage for in-progress forms, so a half-filled customer form or
//! invoice draft survives a restart of the bridge.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Khata Data Flow                                  │
//! │                                                                         │
//! │  Bridge command (dispatch, save_customer_form)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     khata-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐  ┌──────────────┐  │   │
//! │  │   │   Database    │    │   Repository     │  │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ FormCacheRepo    │  │  (embedded)  │  │   │
//! │  │   └───────────────┘    └──────────────────┘  └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │     SQLite file in the platform data dir (khata.db)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use khata_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("khata.db")).await?;
//! db.form_cache().save_customer_form(&form).await?;
//! let restored = db.form_cache().load_customer_form().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::form_cache::{FormCacheRepository, CUSTOMER_FORM_KEY, INVOICE_DRAFT_KEY};
