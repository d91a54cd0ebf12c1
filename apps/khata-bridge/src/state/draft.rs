//! # Draft State
//!
//! The invoice being edited, shared between command calls.
//!
//! The draft is wrapped in `Arc<Mutex<T>>` so command functions running on
//! the async runtime can reach it. There is one user and one draft; the lock
//! is never held across an `.await`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Draft Update Flow                                  │
//! │                                                                         │
//! │  dispatch(command)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ──► apply(&draft, command) ──► Ok(next)  ──► store next, unlock  │
//! │                                  └─► Err(e)    ──► keep draft, unlock  │
//! │                                                                         │
//! │  A failed command never leaves a half-edited draft behind.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use khata_core::{CoreResult, InvoiceDraft};

/// Shared handle to the current invoice draft.
#[derive(Debug, Clone)]
pub struct DraftState {
    draft: Arc<Mutex<InvoiceDraft>>,
}

impl DraftState {
    pub fn new(draft: InvoiceDraft) -> Self {
        DraftState {
            draft: Arc::new(Mutex::new(draft)),
        }
    }

    /// Executes a function with read access to the draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = draft_state.with_draft(|draft| compute_totals(draft, &policy));
    /// ```
    pub fn with_draft<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&InvoiceDraft) -> R,
    {
        // A panic elsewhere cannot leave the draft half-written: updates
        // only ever swap in a complete value.
        let draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        f(&draft)
    }

    /// Returns a copy of the current draft.
    pub fn snapshot(&self) -> InvoiceDraft {
        self.with_draft(InvoiceDraft::clone)
    }

    /// Computes the next draft from the current one and stores it.
    ///
    /// On error the current draft is left untouched.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let next = draft_state.update(|draft| apply(draft, command))?;
    /// ```
    pub fn update<F>(&self, f: F) -> CoreResult<InvoiceDraft>
    where
        F: FnOnce(&InvoiceDraft) -> CoreResult<InvoiceDraft>,
    {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        let next = f(&draft)?;
        *draft = next.clone();
        Ok(next)
    }

    /// Replaces the draft outright.
    pub fn replace(&self, next: InvoiceDraft) {
        let mut draft = self.draft.lock().unwrap_or_else(PoisonError::into_inner);
        *draft = next;
    }
}
