//! # Error Types
//!
//! Domain-specific error types for khata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  khata-core errors (this file)                                         │
//! │  ├── CoreError         - Draft edits and invoice assembly              │
//! │  ├── ValidationError   - Form validation failures                      │
//! │  └── AmountParseError  - Text that is not a number                     │
//! │                                                                         │
//! │  khata-db errors      └── DbError     - Cache failures                 │
//! │  khata-client errors  └── ClientError - Remote API failures            │
//! │  bridge errors        └── ApiError    - What the UI shell sees         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → UI shell               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Draft Sections
// =============================================================================

/// The repeatable sections of an invoice draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Product,
    Tax,
    Packing,
    Transport,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Product => "product",
            Section::Tax => "tax",
            Section::Packing => "packing",
            Section::Transport => "transport",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while editing a draft or assembling an invoice.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A command addressed a row that does not exist.
    ///
    /// ## When This Occurs
    /// - The UI shell holds a stale index after a row was removed
    /// - A replayed command targets a draft with fewer rows
    #[error("{section} row {index} does not exist (draft has {len})")]
    RowOutOfRange {
        section: Section,
        index: usize,
        len: usize,
    },

    /// Customer fields were edited while bound to a remote customer.
    #[error("Customer fields are locked; clear the selected customer first")]
    CustomerLocked,

    /// A total does not fit in a decimal amount.
    ///
    /// ## When This Occurs
    /// - Price, quantity and a percentage are each near the input limit
    /// - Many very large rows are summed
    #[error("Amount is too large to calculate")]
    AmountOverflow,

    /// The invoice cannot be submitted without a customer.
    #[error("No customer selected.")]
    NoCustomerSelected,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub fn row_out_of_range(section: Section, index: usize, len: usize) -> Self {
        CoreError::RowOutOfRange {
            section,
            index,
            len,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur before any network call and are reported to the user
/// synchronously, one at a time, in form order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value has the wrong shape (e.g. phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Field value is not a number.
    #[error("{field} must be a number")]
    NotANumber { field: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Amount Parse Error
// =============================================================================

/// Text could not be read as a decimal amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{input}' is not a valid amount")]
pub struct AmountParseError {
    pub input: String,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_out_of_range_message() {
        let err = CoreError::row_out_of_range(Section::Tax, 3, 1);
        assert_eq!(err.to_string(), "tax row 3 does not exist (draft has 1)");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");

        let err = ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be exactly 10 digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "phone has invalid format: must be exactly 10 digits"
        );
    }

    #[test]
    fn test_overflow_message() {
        assert_eq!(CoreError::AmountOverflow.to_string(), "Amount is too large to calculate");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("firm").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
