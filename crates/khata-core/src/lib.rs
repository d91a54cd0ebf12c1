//! # khata-core: Pure Business Logic for Khata
//!
//! This crate is the **heart** of Khata. It holds the invoice draft, the
//! pricing pipeline and the form rules as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Khata Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI shell (external)                          │   │
//! │  │   Customer form ──► Invoice screen ──► Totals card ──► Credit   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON lines over stdio                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    khata-bridge commands                        │   │
//! │  │      dispatch, save_invoice, create_customer, create_credit     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ khata-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  draft  │ │ pricing │ │ summary │ │ payload │  │   │
//! │  │   │ Amount  │ │ reducer │ │ totals  │ │ display │ │  wire   │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌──────────────────────────┐  │  ┌──────────────────────────────┐     │
//! │  │ khata-db (form cache)    │◄─┴─►│ khata-client (REST API)      │     │
//! │  └──────────────────────────┘     └──────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Draft, rows, forms and remote records
//! - [`money`] - `Amount` and lenient text parsing
//! - [`draft`] - `DraftCommand` and the `apply` reducer
//! - [`pricing`] - Line totals, discount, taxes, surcharges, balance
//! - [`summary`] - Display strings for the totals card
//! - [`payload`] - JSON bodies for the remote API
//! - [`validation`] - Form rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same draft in, same totals out
//! 2. **No I/O**: the bridge reads the clock, the cache and the network
//! 3. **Decimal Money**: full precision until display, 2 places on screen
//! 4. **Lenient Pipeline, Strict Forms**: unreadable numbers count as zero
//!    on the invoice screen but are rejected by the "add" forms
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use khata_core::draft::{apply_all, DraftCommand, LineItemEdit};
//! use khata_core::pricing::{compute_totals, PricingPolicy};
//! use khata_core::summary::PaymentSummary;
//! use khata_core::InvoiceDraft;
//!
//! let draft = apply_all(&InvoiceDraft::fresh(&Utc::now()), [
//!     DraftCommand::EditLineItem { index: 0, edit: LineItemEdit::Price("100".into()) },
//!     DraftCommand::EditLineItem { index: 0, edit: LineItemEdit::Quantity("2".into()) },
//!     DraftCommand::SetAmountPaid { text: "150".into() },
//! ]).unwrap();
//!
//! let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();
//! let summary = PaymentSummary::render(&totals, "₹");
//! assert_eq!(summary.balance_label, "Balance Due");
//! assert_eq!(summary.balance_amount, "₹50.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod payload;
pub mod pricing;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{apply, DraftCommand};
pub use error::{AmountParseError, CoreError, CoreResult, ValidationError};
pub use money::{lenient_amount, parse_amount, Amount};
pub use pricing::{compute_totals, InvoiceTotals, PricingPolicy};
pub use summary::PaymentSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Digits in a customer phone number.
pub const PHONE_DIGITS: usize = 10;

/// Currency symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Prefix of generated invoice numbers.
pub const INVOICE_ID_PREFIX: &str = "INV-";
