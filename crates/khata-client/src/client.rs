//! # REST Client
//!
//! One method per remote endpoint. Each method sends exactly one request:
//! no retries, no deduplication, no caching.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────────────────────┬──────────┬──────────────────────┐
//! │ Endpoint                             │ Success  │ Returns              │
//! ├──────────────────────────────────────┼──────────┼──────────────────────┤
//! │ POST /customers                      │ 201      │ ()                   │
//! │ POST /products                       │ 201      │ ()                   │
//! │ GET  /customers                      │ 200      │ Vec<CustomerRecord>  │
//! │ GET  /products                       │ 200      │ Vec<ProductRecord>   │
//! │ POST /invoices                       │ 201      │ ()                   │
//! │ POST /credits/customer/{id}          │ 201+data │ CreditReceipt        │
//! │ GET  /credits/credit/generate/{id}   │ 2xx      │ HTML String          │
//! └──────────────────────────────────────┴──────────┴──────────────────────┘
//! ```
//!
//! List responses are `{ "data": [...] }`, sorted here by name
//! (case-insensitive). A list response without `data` is an empty list.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use khata_core::payload::{CreditPayload, CustomerPayload, InvoicePayload, ProductPayload};
use khata_core::{CreditReceipt, CustomerRecord, ProductRecord};

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Response Envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
struct CreditEnvelope {
    data: Option<CreditData>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreditData {
    id: i64,
}

// =============================================================================
// Client
// =============================================================================

/// Client for the remote invoicing API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct KhataClient {
    http: Client,
    config: ApiConfig,
}

impl KhataClient {
    /// Builds the HTTP client with the configured timeout.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(KhataClient { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // =========================================================================
    // Customers & Products
    // =========================================================================

    /// `POST /customers`. Only `201 Created` counts as success.
    pub async fn create_customer(&self, payload: &CustomerPayload) -> ClientResult<()> {
        self.post_created("customers", payload).await?;
        info!(name = %payload.name, "Customer created");
        Ok(())
    }

    /// `POST /products`. Only `201 Created` counts as success.
    pub async fn create_product(&self, payload: &ProductPayload) -> ClientResult<()> {
        self.post_created("products", payload).await?;
        info!(name = %payload.name, "Product created");
        Ok(())
    }

    /// `GET /customers`, sorted by name.
    pub async fn list_customers(&self) -> ClientResult<Vec<CustomerRecord>> {
        let mut customers: Vec<CustomerRecord> = self.get_list("customers").await?;
        customers.sort_by_cached_key(|c| c.name.to_lowercase());
        Ok(customers)
    }

    /// `GET /products`, sorted by name.
    pub async fn list_products(&self) -> ClientResult<Vec<ProductRecord>> {
        let mut products: Vec<ProductRecord> = self.get_list("products").await?;
        products.sort_by_cached_key(|p| p.name.to_lowercase());
        Ok(products)
    }

    // =========================================================================
    // Invoices & Credits
    // =========================================================================

    /// `POST /invoices`. Only `201 Created` counts as success.
    pub async fn submit_invoice(&self, payload: &InvoicePayload) -> ClientResult<()> {
        self.post_created("invoices", payload).await?;
        info!(customer_id = payload.customer_id, "Invoice saved");
        Ok(())
    }

    /// `POST /credits/customer/{id}`.
    ///
    /// Success needs both `201` and a `data` object carrying the new
    /// credit's id.
    pub async fn create_credit(
        &self,
        customer_id: i64,
        payload: &CreditPayload,
    ) -> ClientResult<CreditReceipt> {
        let path = format!("credits/customer/{customer_id}");
        let body = self.post_created(&path, payload).await?;

        let envelope: CreditEnvelope = decode(&body)?;
        match envelope.data {
            Some(data) => {
                info!(customer_id, credit_id = data.id, "Credit created");
                Ok(CreditReceipt {
                    credit_id: data.id,
                    message: envelope.message,
                })
            }
            None => {
                error!(customer_id, "Credit response without data");
                Err(ClientError::MissingData {
                    message: envelope.message,
                })
            }
        }
    }

    /// `GET /credits/credit/generate/{id}`: the printable credit document.
    pub async fn fetch_credit_html(&self, credit_id: i64) -> ClientResult<String> {
        let url = self.config.endpoint(&format!("credits/credit/generate/{credit_id}"))?;
        debug!(%url, "GET");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            error!(%url, error = %e, "Request failed");
            ClientError::from(e)
        })?;
        let status = response.status();
        let body = read_body(response).await?;

        if !status.is_success() {
            return Err(unexpected(status, body));
        }

        let html = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(serde_json::Value::String(inner)) => inner,
            Ok(_) => return Err(ClientError::InvalidHtml),
            Err(_) => body,
        };

        if html.trim().is_empty() {
            return Err(ClientError::InvalidHtml);
        }
        Ok(html)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Sends `payload` as JSON and returns the body of a `201` response.
    async fn post_created<T: Serialize>(&self, path: &str, payload: &T) -> ClientResult<String> {
        let url = self.config.endpoint(path)?;
        debug!(%url, "POST");

        let response = self
            .http
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                error!(%url, error = %e, "Request failed");
                ClientError::from(e)
            })?;
        let status = response.status();
        let body = read_body(response).await?;

        if status != StatusCode::CREATED {
            error!(%url, status = status.as_u16(), body = %body, "Creation rejected");
            return Err(unexpected(status, body));
        }

        Ok(body)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let url = self.config.endpoint(path)?;
        debug!(%url, "GET");

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            error!(%url, error = %e, "Request failed");
            ClientError::from(e)
        })?;
        let status = response.status();
        let body = read_body(response).await?;

        if status != StatusCode::OK {
            error!(%url, status = status.as_u16(), "List request rejected");
            return Err(unexpected(status, body));
        }

        let envelope: ListEnvelope<T> = decode(&body)?;
        let items = envelope.data.unwrap_or_default();
        debug!(%url, count = items.len(), "List fetched");
        Ok(items)
    }
}

async fn read_body(response: Response) -> ClientResult<String> {
    Ok(response.text().await?)
}

fn decode<T: DeserializeOwned>(body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}

fn unexpected(status: StatusCode, body: String) -> ClientError {
    ClientError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_without_data() {
        let envelope: ListEnvelope<ProductRecord> = decode("{}").unwrap();
        assert!(envelope.data.is_none());

        let envelope: ListEnvelope<ProductRecord> = decode(r#"{"data": null}"#).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_credit_envelope() {
        let envelope: CreditEnvelope =
            decode(r#"{"data": {"id": 12}, "message": "Credit created"}"#).unwrap();
        assert_eq!(envelope.data.unwrap().id, 12);
        assert_eq!(envelope.message.as_deref(), Some("Credit created"));
    }

    #[test]
    fn test_decode_error_is_typed() {
        let err = decode::<CreditEnvelope>("<html>").unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
