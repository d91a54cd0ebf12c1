//! # Product Commands
//!
//! The product catalogue lives on the remote API; nothing is cached.

use tracing::debug;

use khata_client::KhataClient;
use khata_core::payload::ProductPayload;
use khata_core::validation::validate_product_form;
use khata_core::{ProductForm, ProductRecord};

use crate::error::ApiError;

/// Lists products, sorted by name.
pub async fn list_products(client: &KhataClient) -> Result<Vec<ProductRecord>, ApiError> {
    debug!("list_products command");
    Ok(client.list_products().await?)
}

/// Validates the "add product" form and creates the product.
///
/// ## Errors
/// - `VALIDATION_ERROR` for a blank name or a missing, non-numeric or
///   negative price; nothing is sent
/// - `NETWORK_ERROR` when the server does not answer `201`
pub async fn create_product(client: &KhataClient, form: ProductForm) -> Result<(), ApiError> {
    debug!(name = %form.name, "create_product command");

    let price = validate_product_form(&form)?;
    let payload = ProductPayload::new(&form.name, price);

    client
        .create_product(&payload)
        .await
        .map_err(|e| ApiError::remote(e, "Failed to save product."))
}
