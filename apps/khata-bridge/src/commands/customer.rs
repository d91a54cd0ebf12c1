//! # Customer Commands
//!
//! ## Form Cache
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  every keystroke ──► save_customer_form ──► form_cache (best effort)   │
//! │                                                                         │
//! │  screen opens ─────► load_customer_form ◄── form_cache                 │
//! │                                                                         │
//! │  create_customer ──► validate ──► POST /customers ──► 201?             │
//! │                                                    │                    │
//! │                                                    └─► clear cache     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use khata_client::KhataClient;
use khata_core::payload::CustomerPayload;
use khata_core::validation::validate_customer_form;
use khata_core::{CustomerForm, CustomerRecord};

use crate::error::ApiError;
use crate::state::DbState;

/// Lists customers, sorted by name.
pub async fn list_customers(client: &KhataClient) -> Result<Vec<CustomerRecord>, ApiError> {
    debug!("list_customers command");
    Ok(client.list_customers().await?)
}

/// Validates the "add customer" form and creates the customer.
///
/// The cached form is cleared only after the server accepted it.
pub async fn create_customer(
    client: &KhataClient,
    db: &DbState,
    form: CustomerForm,
) -> Result<(), ApiError> {
    debug!(name = %form.name, "create_customer command");

    validate_customer_form(&form)?;
    let payload = CustomerPayload::from_form(&form);

    client
        .create_customer(&payload)
        .await
        .map_err(|e| ApiError::remote(e, "Failed to save customer."))?;

    db.forget_customer_form().await;
    Ok(())
}

/// Returns the cached "add customer" form, or a blank one.
pub async fn load_customer_form(db: &DbState) -> Result<CustomerForm, ApiError> {
    debug!("load_customer_form command");
    let form = db.inner().form_cache().load_customer_form().await?;
    if form.is_some() {
        info!("Restored cached customer form");
    }
    Ok(form.unwrap_or_default())
}

/// Caches the "add customer" form as typed. Never fails.
pub async fn save_customer_form(db: &DbState, form: CustomerForm) {
    debug!("save_customer_form command");
    db.cache_customer_form(&form).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use khata_client::ApiConfig;
    use khata_db::{Database, DbConfig};

    async fn db() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_form_cache_commands() {
        let db = db().await;
        assert_eq!(load_customer_form(&db).await.unwrap(), CustomerForm::default());

        let form = CustomerForm {
            name: "Asha".to_string(),
            phone: "98765".to_string(),
            ..Default::default()
        };
        save_customer_form(&db, form.clone()).await;
        assert_eq!(load_customer_form(&db).await.unwrap(), form);
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_network() {
        // Port 9 has no listener; validation must fail first.
        let client = KhataClient::new(ApiConfig::new("http://127.0.0.1:9").unwrap()).unwrap();
        let form = CustomerForm {
            name: "Asha".to_string(),
            phone: "12345".to_string(),
            firm: "Asha & Co".to_string(),
            balance: String::new(),
        };

        let err = create_customer(&client, &db().await, form).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
        assert!(err.message.starts_with("Phone number"));
    }
}
