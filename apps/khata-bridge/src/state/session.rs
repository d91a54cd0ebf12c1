//! # Session State
//!
//! Per-process values that are not part of the draft.

use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

/// Identity of this bridge run and the last credit it created.
///
/// The credit document can only be fetched for a credit created in the
/// same session.
#[derive(Debug)]
pub struct SessionState {
    id: Uuid,
    last_credit_id: Mutex<Option<i64>>,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            id: Uuid::new_v4(),
            last_credit_id: Mutex::new(None),
        }
    }

    /// Session id, attached to log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn last_credit_id(&self) -> Option<i64> {
        *self.last_credit_id.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn remember_credit(&self, credit_id: i64) {
        *self.last_credit_id.lock().unwrap_or_else(PoisonError::into_inner) = Some(credit_id);
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_credit() {
        let session = SessionState::new();
        assert_eq!(session.last_credit_id(), None);

        session.remember_credit(4);
        session.remember_credit(5);
        assert_eq!(session.last_credit_id(), Some(5));
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(SessionState::new().id(), SessionState::new().id());
    }
}
