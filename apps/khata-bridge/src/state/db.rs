//! # Database State
//!
//! Wraps the `Database` connection for use in bridge commands.
//!
//! ## Thread Safety
//! The `Database` struct from `khata-db` contains a `SqlitePool` which
//! is inherently thread-safe. No explicit locking is needed here.
//!
//! ## Usage in Commands
//! ```rust,ignore
//! pub async fn load_customer_form(db: &DbState) -> Result<CustomerForm, ApiError> {
//!     Ok(db.inner().form_cache().load_customer_form().await?.unwrap_or_default())
//! }
//! ```

use khata_core::{CustomerForm, InvoiceDraft};
use khata_db::Database;
use tracing::warn;

/// Wrapper around `Database` for bridge state management.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Best-Effort Cache Writes
    // =========================================================================
    //
    // The form cache only saves the user retyping after a restart. A failed
    // write is logged and the command still succeeds.

    pub async fn cache_draft(&self, draft: &InvoiceDraft) {
        if let Err(e) = self.db.form_cache().save_draft(draft).await {
            warn!(error = %e, "Failed to cache invoice draft");
        }
    }

    pub async fn forget_draft(&self) {
        if let Err(e) = self.db.form_cache().clear_draft().await {
            warn!(error = %e, "Failed to clear cached invoice draft");
        }
    }

    pub async fn cache_customer_form(&self, form: &CustomerForm) {
        if let Err(e) = self.db.form_cache().save_customer_form(form).await {
            warn!(error = %e, "Failed to cache customer form");
        }
    }

    pub async fn forget_customer_form(&self) {
        if let Err(e) = self.db.form_cache().clear_customer_form().await {
            warn!(error = %e, "Failed to clear cached customer form");
        }
    }

    /// The cached draft, if one exists and still decodes.
    pub async fn cached_draft(&self) -> Option<InvoiceDraft> {
        match self.db.form_cache().load_draft().await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cached draft");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use khata_db::DbConfig;

    async fn state() -> DbState {
        DbState::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_draft_cache_roundtrip() {
        let db = state().await;
        assert!(db.cached_draft().await.is_none());

        let draft = InvoiceDraft::fresh(&Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
        db.cache_draft(&draft).await;
        assert_eq!(db.cached_draft().await, Some(draft));

        db.forget_draft().await;
        assert!(db.cached_draft().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_draft_is_ignored() {
        let db = state().await;
        db.inner()
            .form_cache()
            .put(khata_db::INVOICE_DRAFT_KEY, "{not json")
            .await
            .unwrap();
        assert!(db.cached_draft().await.is_none());
    }

    #[tokio::test]
    async fn test_cache_failure_is_swallowed() {
        let db = state().await;
        db.inner().close().await;

        // Must not panic or error.
        db.cache_customer_form(&CustomerForm::default()).await;
        assert!(db.cached_draft().await.is_none());
    }
}
