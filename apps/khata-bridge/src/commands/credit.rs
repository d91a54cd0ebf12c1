//! # Credit Commands
//!
//! A credit records a payment a customer made outside of an invoice. The
//! server renders a printable credit document for each one.

use tracing::{debug, info};

use khata_client::KhataClient;
use khata_core::payload::CreditPayload;
use khata_core::validation::validate_credit_request;
use khata_core::{CreditReceipt, CreditRequest};

use crate::error::ApiError;
use crate::state::SessionState;

/// Validates and records a credit, remembering its id for
/// [`fetch_credit_html`].
///
/// ## Errors
/// - `VALIDATION_ERROR` when no customer is selected or the amount is not
///   a number
/// - `NETWORK_ERROR` with the server's message when it answers without
///   the new credit
pub async fn create_credit(
    client: &KhataClient,
    session: &SessionState,
    request: CreditRequest,
) -> Result<CreditReceipt, ApiError> {
    debug!(customer_id = ?request.customer_id, "create_credit command");

    let (customer_id, amount) = validate_credit_request(&request)?;
    let receipt = client
        .create_credit(customer_id, &CreditPayload::new(amount))
        .await
        .map_err(|e| ApiError::remote(e, "Failed to create credit."))?;

    session.remember_credit(receipt.credit_id);
    info!(credit_id = receipt.credit_id, "Credit ready for download");
    Ok(receipt)
}

/// Downloads the document for the last credit created this session.
pub async fn fetch_credit_html(
    client: &KhataClient,
    session: &SessionState,
) -> Result<String, ApiError> {
    debug!("fetch_credit_html command");

    let credit_id = session
        .last_credit_id()
        .ok_or_else(|| ApiError::validation("Please create credit first."))?;

    client
        .fetch_credit_html(credit_id)
        .await
        .map_err(|e| ApiError::remote(e, "Failed to load credit HTML."))
}
