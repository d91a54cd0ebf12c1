//! # Form Cache Repository
//!
//! Key-value store for in-progress forms.
//!
//! ## Write Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UI edit ──► bridge command ──► new value ──► put_json(key, value)      │
//! │                                                   │                     │
//! │                                                   ├── ok   → done       │
//! │                                                   └── err  → warn! log  │
//! │                                                                         │
//! │  Bridge start / screen open ──► get_json(key) ──► Some(value) | None    │
//! │                                                                         │
//! │  Form submitted or reset ──► remove(key)                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each write replaces the whole value for its key (upsert). There is no
//! history and no transaction spanning more than one key.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use khata_core::{CustomerForm, InvoiceDraft};

/// Key of the "add customer" form.
pub const CUSTOMER_FORM_KEY: &str = "customer_form_data";

/// Key of the invoice draft being edited.
pub const INVOICE_DRAFT_KEY: &str = "invoice_draft";

/// One stored value.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct CacheEntry {
    pub key: String,
    pub payload: String,
    pub updated_at: DateTime<Utc>,
}

/// Repository over the `form_cache` table.
#[derive(Debug, Clone)]
pub struct FormCacheRepository {
    pool: SqlitePool,
}

impl FormCacheRepository {
    pub fn new(pool: SqlitePool) -> Self {
        FormCacheRepository { pool }
    }

    // =========================================================================
    // Raw Access
    // =========================================================================

    /// Stores `payload` under `key`, replacing any previous value.
    pub async fn put(&self, key: &str, payload: &str) -> DbResult<()> {
        debug!(key = %key, bytes = payload.len(), "Writing form cache entry");

        sqlx::query(
            r#"
            INSERT INTO form_cache (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the entry under `key`, if any.
    pub async fn get(&self, key: &str) -> DbResult<Option<CacheEntry>> {
        let entry = sqlx::query_as::<_, CacheEntry>(
            "SELECT key, payload, updated_at FROM form_cache WHERE key = ?1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Deletes the entry under `key`.
    ///
    /// Returns whether an entry existed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        debug!(key = %key, "Removing form cache entry");

        let result = sqlx::query("DELETE FROM form_cache WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Typed Access
    // =========================================================================

    /// Serializes `value` as JSON and stores it under `key`.
    pub async fn put_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let payload = serde_json::to_string(value)?;
        self.put(key, &payload).await
    }

    /// Reads and deserializes the value under `key`.
    ///
    /// ## Errors
    /// `Serialization` when the stored JSON does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(entry) => Ok(Some(serde_json::from_str(&entry.payload)?)),
            None => Ok(None),
        }
    }

    /// Like [`get_json`](Self::get_json), but a missing key is an error.
    pub async fn require_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<T> {
        self.get_json(key)
            .await?
            .ok_or_else(|| DbError::not_found(key))
    }

    // =========================================================================
    // Forms
    // =========================================================================

    pub async fn save_customer_form(&self, form: &CustomerForm) -> DbResult<()> {
        self.put_json(CUSTOMER_FORM_KEY, form).await
    }

    pub async fn load_customer_form(&self) -> DbResult<Option<CustomerForm>> {
        self.get_json(CUSTOMER_FORM_KEY).await
    }

    pub async fn clear_customer_form(&self) -> DbResult<bool> {
        self.remove(CUSTOMER_FORM_KEY).await
    }

    pub async fn save_draft(&self, draft: &InvoiceDraft) -> DbResult<()> {
        self.put_json(INVOICE_DRAFT_KEY, draft).await
    }

    pub async fn load_draft(&self) -> DbResult<Option<InvoiceDraft>> {
        self.get_json(INVOICE_DRAFT_KEY).await
    }

    pub async fn clear_draft(&self) -> DbResult<bool> {
        self.remove(INVOICE_DRAFT_KEY).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
