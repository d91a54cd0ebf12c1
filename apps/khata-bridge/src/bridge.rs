//! # JSON-Lines Bridge
//!
//! The UI shell talks to the bridge over stdio, one JSON document per line.
//!
//! ## Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stdin  ─► {"id":1,"command":"get_draft"}                               │
//! │  stdout ◄─ {"id":1,"ok":{"draft":{...},"totals":{...},"summary":{...}}} │
//! │                                                                         │
//! │  stdin  ─► {"id":2,"command":"create_product",                          │
//! │             "args":{"name":"Tea","price":"-4"}}                         │
//! │  stdout ◄─ {"id":2,"error":{"code":"VALIDATION_ERROR",                  │
//! │                             "message":"Product price must not be ..."}} │
//! │                                                                         │
//! │  stderr ◄─ logs (never mixed into stdout)                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests are served one at a time, in order. Blank lines are skipped.
//! A line that is not a request gets an `INVALID_REQUEST` error with a
//! `null` id. End of input stops the bridge.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────┬──────────────────────┬────────────────────────────┐
//! │ command             │ args                 │ ok                         │
//! ├─────────────────────┼──────────────────────┼────────────────────────────┤
//! │ get_config          │ -                    │ BridgeConfig               │
//! │ get_draft           │ -                    │ DraftView                  │
//! │ dispatch            │ DraftCommand         │ DraftView                  │
//! │ discard_draft       │ -                    │ DraftView                  │
//! │ save_invoice        │ -                    │ SaveInvoiceResponse        │
//! │ list_customers      │ -                    │ CustomerRecord[]           │
//! │ create_customer     │ CustomerForm         │ null                       │
//! │ load_customer_form  │ -                    │ CustomerForm               │
//! │ save_customer_form  │ CustomerForm         │ null                       │
//! │ list_products       │ -                    │ ProductRecord[]            │
//! │ create_product      │ ProductForm          │ null                       │
//! │ create_credit       │ CreditRequest        │ CreditReceipt              │
//! │ fetch_credit_html   │ -                    │ string                     │
//! └─────────────────────┴──────────────────────┴────────────────────────────┘
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn, Instrument};

use crate::commands::{config, credit, customer, invoice, product};
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Wire Types
// =============================================================================

/// One request line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BridgeRequest {
    /// Echoed back unchanged.
    #[serde(default)]
    pub id: Value,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// One response line: exactly one of `ok` and `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BridgeResponse {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl BridgeResponse {
    pub fn ok(id: Value, value: Value) -> Self {
        BridgeResponse {
            id,
            ok: Some(value),
            error: None,
        }
    }

    pub fn error(id: Value, error: ApiError) -> Self {
        BridgeResponse {
            id,
            ok: None,
            error: Some(error),
        }
    }

    fn from_result<T: Serialize>(id: Value, result: Result<T, ApiError>) -> Self {
        match result.and_then(|value| {
            serde_json::to_value(value)
                .map_err(|e| ApiError::internal(format!("Response not serializable: {e}")))
        }) {
            Ok(value) => BridgeResponse::ok(id, value),
            Err(err) => BridgeResponse::error(id, err),
        }
    }
}

// =============================================================================
// Routing
// =============================================================================

fn args<T: DeserializeOwned>(command: &str, args: Value) -> Result<T, ApiError> {
    serde_json::from_value(args)
        .map_err(|e| ApiError::invalid_request(format!("Invalid arguments for {command}: {e}")))
}

/// Runs one request against the state.
pub async fn handle_request(state: &AppState, request: BridgeRequest) -> BridgeResponse {
    let span = tracing::debug_span!(
        "request",
        session = %state.session.id(),
        id = %request.id,
        command = %request.command,
    );

    async move {
        let BridgeRequest { id, command, args: raw } = request;
        let name = command.as_str();

        match name {
            "get_config" => BridgeResponse::from_result(id, Ok(config::get_config(&state.config))),
            "get_draft" => {
                BridgeResponse::from_result(id, invoice::get_draft(&state.draft, &state.config))
            }
            "dispatch" => {
                let result = match args(name, raw) {
                    Ok(command) => {
                        invoice::dispatch(&state.draft, &state.db, &state.config, command).await
                    }
                    Err(e) => Err(e),
                };
                BridgeResponse::from_result(id, result)
            }
            "discard_draft" => {
                let result = invoice::discard_draft(&state.draft, &state.db, &state.config).await;
                BridgeResponse::from_result(id, result)
            }
            "save_invoice" => {
                let result = invoice::save_invoice(&state.draft, &state.client, &state.config).await;
                BridgeResponse::from_result(id, result)
            }
            "list_customers" => {
                BridgeResponse::from_result(id, customer::list_customers(&state.client).await)
            }
            "create_customer" => {
                let result = match args(name, raw) {
                    Ok(form) => customer::create_customer(&state.client, &state.db, form).await,
                    Err(e) => Err(e),
                };
                BridgeResponse::from_result(id, result)
            }
            "load_customer_form" => {
                BridgeResponse::from_result(id, customer::load_customer_form(&state.db).await)
            }
            "save_customer_form" => {
                let result = match args(name, raw) {
                    Ok(form) => {
                        customer::save_customer_form(&state.db, form).await;
                        Ok(())
                    }
                    Err(e) => Err(e),
                };
                BridgeResponse::from_result(id, result)
            }
            "list_products" => {
                BridgeResponse::from_result(id, product::list_products(&state.client).await)
            }
            "create_product" => {
                let result = match args(name, raw) {
                    Ok(form) => product::create_product(&state.client, form).await,
                    Err(e) => Err(e),
                };
                BridgeResponse::from_result(id, result)
            }
            "create_credit" => {
                let result = match args(name, raw) {
                    Ok(request) => credit::create_credit(&state.client, &state.session, request).await,
                    Err(e) => Err(e),
                };
                BridgeResponse::from_result(id, result)
            }
            "fetch_credit_html" => BridgeResponse::from_result(
                id,
                credit::fetch_credit_html(&state.client, &state.session).await,
            ),
            other => {
                warn!(command = %other, "Unknown command");
                BridgeResponse::error(
                    id,
                    ApiError::invalid_request(format!("Unknown command: {other}")),
                )
            }
        }
    }
    .instrument(span)
    .await
}

/// Parses and runs one input line.
///
/// Returns `None` for a blank line.
pub async fn handle_line(state: &AppState, line: &str) -> Option<BridgeResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let response = match serde_json::from_str::<BridgeRequest>(line) {
        Ok(request) => handle_request(state, request).await,
        Err(e) => {
            warn!(error = %e, "Malformed request line");
            BridgeResponse::error(
                Value::Null,
                ApiError::invalid_request(format!("Malformed request: {e}")),
            )
        }
    };

    if let Some(err) = &response.error {
        debug!(code = ?err.code, message = %err.message, "Command failed");
    }
    Some(response)
}

// =============================================================================
// Serve Loop
// =============================================================================

/// Serves requests from `reader` until end of input, writing one response
/// line per request to `writer`.
pub async fn serve<R, W>(state: &AppState, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(session = %state.session.id(), "Bridge ready");
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let Some(response) = handle_line(state, &line).await else {
            continue;
        };

        let encoded = match serde_json::to_string(&response) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!(error = %e, "Failed to encode response");
                serde_json::json!({
                    "id": response.id,
                    "error": ApiError::internal("Failed to encode response"),
                })
                .to_string()
            }
        };

        writer.write_all(encoded.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
