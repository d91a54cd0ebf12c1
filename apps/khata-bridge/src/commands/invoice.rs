//! # Invoice Commands
//!
//! Commands for editing the invoice draft and submitting it.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  startup ──► cached draft computes? ──yes──► restore                   │
//! │                   │                                                     │
//! │                   no ──► InvoiceDraft::fresh(now)                       │
//! │                                                                         │
//! │  dispatch(command) ──► apply ──► totals ──► commit ──► cache ──► view  │
//! │                                                                         │
//! │  save_invoice ──► customer selected? ──► totals ──► POST /invoices     │
//! │                                                                         │
//! │  discard_draft ──► fresh draft (new invoice number) ──► clear cache    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command that touches the draft answers with a [`DraftView`]: the
//! draft plus freshly computed totals, so the UI shell never does math.
//! A draft whose totals overflow is never stored or cached.

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, warn};

use khata_client::KhataClient;
use khata_core::payload::InvoicePayload;
use khata_core::{
    apply, compute_totals, CoreResult, DraftCommand, InvoiceDraft, InvoiceTotals, PaymentSummary,
    PricingPolicy,
};

use crate::error::ApiError;
use crate::state::{BridgeConfig, DbState, DraftState};

// =============================================================================
// Response DTOs
// =============================================================================

/// The draft as the invoice screen renders it.
///
/// Keys are snake_case throughout, matching the embedded draft and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftView {
    pub draft: InvoiceDraft,
    pub totals: InvoiceTotals,
    pub summary: PaymentSummary,
}

impl DraftView {
    /// Computes totals and the summary card for `draft`.
    ///
    /// Fails with `AmountOverflow` when a total leaves the decimal range.
    pub fn build(draft: InvoiceDraft, config: &BridgeConfig) -> CoreResult<Self> {
        let totals = compute_totals(&draft, &config.pricing)?;
        let summary = PaymentSummary::render(&totals, config.currency_symbol());
        Ok(DraftView {
            draft,
            totals,
            summary,
        })
    }
}

/// Answer to a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveInvoiceResponse {
    pub invoice_id: String,
    pub message: String,
}

// =============================================================================
// Commands
// =============================================================================

/// Picks the draft to start with: the cached one if its totals still
/// compute under `policy`, else a fresh invoice.
///
/// A cached draft that fails is removed from the cache.
pub async fn restore_draft(db: &DbState, policy: &PricingPolicy) -> InvoiceDraft {
    if let Some(draft) = db.cached_draft().await {
        match compute_totals(&draft, policy) {
            Ok(_) => {
                info!(invoice_id = %draft.header.invoice_id, "Restored cached draft");
                return draft;
            }
            Err(e) => {
                warn!(error = %e, invoice_id = %draft.header.invoice_id, "Discarding cached draft");
                db.forget_draft().await;
            }
        }
    }
    InvoiceDraft::fresh(&Local::now())
}

/// Gets the current draft with its totals.
pub fn get_draft(draft: &DraftState, config: &BridgeConfig) -> Result<DraftView, ApiError> {
    debug!("get_draft command");
    Ok(DraftView::build(draft.snapshot(), config)?)
}

/// Applies one edit to the draft.
///
/// ## Errors
/// - `DRAFT_ERROR` when the command addresses a missing row or edits a
///   locked customer field
/// - `VALIDATION_ERROR` when the edited draft's totals overflow
///
/// The draft and the cache are unchanged on error.
pub async fn dispatch(
    draft: &DraftState,
    db: &DbState,
    config: &BridgeConfig,
    command: DraftCommand,
) -> Result<DraftView, ApiError> {
    debug!(?command, "dispatch command");

    let next = draft.update(|current| {
        let next = apply(current, command)?;
        compute_totals(&next, &config.pricing)?;
        Ok(next)
    })?;
    db.cache_draft(&next).await;

    Ok(DraftView::build(next, config)?)
}

/// Throws the draft away and starts a new invoice.
pub async fn discard_draft(
    draft: &DraftState,
    db: &DbState,
    config: &BridgeConfig,
) -> Result<DraftView, ApiError> {
    debug!("discard_draft command");

    let fresh = InvoiceDraft::fresh(&Local::now());
    draft.replace(fresh.clone());
    db.forget_draft().await;

    info!(invoice_id = %fresh.header.invoice_id, "Started new invoice");
    Ok(DraftView::build(fresh, config)?)
}

/// Submits the draft as an invoice.
///
/// The draft is kept after a successful save; the shell starts the next
/// invoice with [`discard_draft`].
///
/// ## Errors
/// - `VALIDATION_ERROR` "No customer selected." before any network call
/// - `NETWORK_ERROR` "Failed to save invoice." for any non-`201` answer
pub async fn save_invoice(
    draft: &DraftState,
    client: &KhataClient,
    config: &BridgeConfig,
) -> Result<SaveInvoiceResponse, ApiError> {
    debug!("save_invoice command");

    let snapshot = draft.snapshot();
    let totals = compute_totals(&snapshot, &config.pricing)?;
    let payload = InvoicePayload::from_draft(&snapshot, &totals)?;

    client
        .submit_invoice(&payload)
        .await
        .map_err(|e| ApiError::remote(e, "Failed to save invoice."))?;

    Ok(SaveInvoiceResponse {
        invoice_id: snapshot.header.invoice_id,
        message: "Invoice saved successfully.".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
