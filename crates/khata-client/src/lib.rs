//! # khata-client: Remote API Client for Khata
//!
//! Typed access to the invoicing REST API that owns customers, products,
//! invoices and credits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Bridge command (save_invoice)                                         │
//! │       │  validate (khata-core) → payload (khata-core)                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 khata-client (THIS CRATE)                       │   │
//! │  │     KhataClient::submit_invoice(&payload)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTPS, JSON, one request per action   │
//! │                                ▼                                        │
//! │                      Remote invoicing API                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use khata_client::{ApiConfig, KhataClient};
//!
//! let client = KhataClient::new(ApiConfig::new("https://api.example.com")?)?;
//! let customers = client.list_customers().await?;
//! ```

pub mod client;
pub mod config;
pub mod error;

pub use client::KhataClient;
pub use config::{ApiConfig, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
