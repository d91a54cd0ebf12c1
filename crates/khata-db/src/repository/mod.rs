//! # Repository Module
//!
//! Database repositories for Khata.
//!
//! ## Available Repositories
//!
//! - [`FormCacheRepository`](form_cache::FormCacheRepository) - best-effort
//!   cache of the customer form and the invoice draft
//!
//! Customers, products and invoices are owned by the remote service and
//! have no local table.

pub mod form_cache;
