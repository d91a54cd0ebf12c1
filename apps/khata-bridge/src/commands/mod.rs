//! # Bridge Commands Module
//!
//! All commands exposed to the UI shell.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── invoice.rs   ◄─── Draft editing, totals, invoice submission
//! ├── customer.rs  ◄─── Customer list, creation, cached form
//! ├── product.rs   ◄─── Product list, creation
//! ├── credit.rs    ◄─── Credit creation and document download
//! └── config.rs    ◄─── Configuration retrieval
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bridge Command Flow                                  │
//! │                                                                         │
//! │  UI shell                                                               │
//! │  ────────                                                               │
//! │  stdin:  {"id":7,"command":"dispatch",                                  │
//! │           "args":{"type":"set_amount_paid","args":{"text":"200"}}}      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  bridge::handle_request ── picks state, decodes args                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  invoice::dispatch(&state.draft, &state.db, &state.config, command)    │
//! │      -> Result<DraftView, ApiError>                                     │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: {"id":7,"ok":{"draft":{...},"totals":{...},"summary":{...}}}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the client
//! async fn list_products(client: &KhataClient)
//!
//! // Needs draft, cache and config
//! async fn dispatch(draft: &DraftState, db: &DbState, config: &BridgeConfig, ...)
//! ```

pub mod config;
pub mod credit;
pub mod customer;
pub mod invoice;
pub mod product;
