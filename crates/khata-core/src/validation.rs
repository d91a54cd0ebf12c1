//! # Validation Module
//!
//! Form validation for Khata.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell                                                     │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Bridge command (Rust)                                        │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: form rules, checked before any network call          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                   │
//! │  └── Whatever the server enforces (non-201 = failure)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are checked in form order and the first failure is returned, so
//! the user sees one message at a time.
//!
//! Validation is strict where the pipeline is lenient: a price of `"12abc"`
//! is zero on the invoice screen but rejected on the "add product" form.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{parse_amount, Amount};
use crate::types::{CreditRequest, CustomerBinding, CustomerForm, ProductForm};
use crate::PHONE_DIGITS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Customer
// =============================================================================

/// Validates a phone number: exactly ten ASCII digits, nothing else.
///
/// ## Example
/// ```rust
/// use khata_core::validation::validate_phone;
///
/// assert!(validate_phone("9876543210").is_ok());
/// assert!(validate_phone("98765 43210").is_err());
/// assert!(validate_phone("+919876543210").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::required("Phone number"));
    }

    if phone.len() != PHONE_DIGITS || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "Phone number".to_string(),
            reason: format!("must be exactly {PHONE_DIGITS} digits"),
        });
    }

    Ok(())
}

/// Validates the "add customer" form.
///
/// ## Rules (in order)
/// 1. Name is required
/// 2. Phone is required and must be ten digits
/// 3. Firm is required
///
/// Balance is optional and read leniently when the payload is built.
pub fn validate_customer_form(form: &CustomerForm) -> ValidationResult<()> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::required("Customer name"));
    }

    validate_phone(&form.phone)?;

    if form.firm.trim().is_empty() {
        return Err(ValidationError::required("Firm name"));
    }

    Ok(())
}

// =============================================================================
// Product
// =============================================================================

/// Validates the "add product" form and returns the parsed price.
///
/// ## Example
/// ```rust
/// use khata_core::types::ProductForm;
/// use khata_core::validation::validate_product_form;
///
/// let form = ProductForm { name: "Tea".into(), price: "12.50".into() };
/// assert_eq!(validate_product_form(&form).unwrap().to_fixed(), "12.50");
///
/// let form = ProductForm { name: "Tea".into(), price: "-1".into() };
/// assert!(validate_product_form(&form).is_err());
/// ```
pub fn validate_product_form(form: &ProductForm) -> ValidationResult<Amount> {
    if form.name.trim().is_empty() {
        return Err(ValidationError::required("Product name"));
    }

    let price = validate_number("Product price", &form.price)?;
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "Product price".to_string(),
        });
    }

    Ok(price)
}

// =============================================================================
// Credit & Invoice
// =============================================================================

/// Validates a credit request, returning `(customer_id, amount)`.
pub fn validate_credit_request(request: &CreditRequest) -> CoreResult<(i64, Amount)> {
    let customer_id = request.customer_id.ok_or(CoreError::NoCustomerSelected)?;
    let amount = validate_number("Amount", &request.amount)?;
    Ok((customer_id, amount))
}

/// Returns the id of the bound remote customer.
pub fn validate_customer_selected(customer: &CustomerBinding) -> CoreResult<i64> {
    customer.id.ok_or(CoreError::NoCustomerSelected)
}

// =============================================================================
// Helpers
// =============================================================================

/// A required field that must parse as a number.
fn validate_number(field: &str, text: &str) -> ValidationResult<Amount> {
    if text.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    parse_amount(text)
        .map(Amount::new)
        .map_err(|_| ValidationError::NotANumber {
            field: field.to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_form(name: &str, phone: &str, firm: &str) -> CustomerForm {
        CustomerForm {
            name: name.to_string(),
            phone: phone.to_string(),
            firm: firm.to_string(),
            balance: String::new(),
        }
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0123456789").is_ok());
        assert!(validate_phone(" 0123456789 ").is_ok());
        assert_eq!(
            validate_phone(""),
            Err(ValidationError::required("Phone number"))
        );
        assert!(matches!(
            validate_phone("12345"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(validate_phone("012345678a").is_err());
        assert!(validate_phone("٠١٢٣٤٥٦٧٨٩").is_err());
    }

    #[test]
    fn test_customer_form_reports_first_failure() {
        let err = validate_customer_form(&customer_form("  ", "", "")).unwrap_err();
        assert_eq!(err, ValidationError::required("Customer name"));

        let err = validate_customer_form(&customer_form("Asha", "", "")).unwrap_err();
        assert_eq!(err, ValidationError::required("Phone number"));

        let err = validate_customer_form(&customer_form("Asha", "9876543210", " ")).unwrap_err();
        assert_eq!(err, ValidationError::required("Firm name"));

        assert!(validate_customer_form(&customer_form("Asha", "9876543210", "Asha & Co")).is_ok());
    }

    #[test]
    fn test_product_form_rules() {
        let form = |name: &str, price: &str| ProductForm {
            name: name.to_string(),
            price: price.to_string(),
        };

        assert_eq!(
            validate_product_form(&form("", "10")),
            Err(ValidationError::required("Product name"))
        );
        assert_eq!(
            validate_product_form(&form("Tea", "")),
            Err(ValidationError::required("Product price"))
        );
        assert!(matches!(
            validate_product_form(&form("Tea", "ten")),
            Err(ValidationError::NotANumber { .. })
        ));
        assert!(matches!(
            validate_product_form(&form("Tea", "-3")),
            Err(ValidationError::Negative { .. })
        ));
        assert!(validate_product_form(&form("Tea", "0")).unwrap().is_zero());
    }

    #[test]
    fn test_credit_request_rules() {
        let missing_customer = CreditRequest {
            customer_id: None,
            amount: "100".to_string(),
        };
        assert!(matches!(
            validate_credit_request(&missing_customer),
            Err(CoreError::NoCustomerSelected)
        ));

        let bad_amount = CreditRequest {
            customer_id: Some(4),
            amount: "lots".to_string(),
        };
        assert!(matches!(
            validate_credit_request(&bad_amount),
            Err(CoreError::Validation(ValidationError::NotANumber { .. }))
        ));

        let ok = CreditRequest {
            customer_id: Some(4),
            amount: "250".to_string(),
        };
        let (id, amount) = validate_credit_request(&ok).unwrap();
        assert_eq!(id, 4);
        assert_eq!(amount, Amount::from_major(250));
    }

    #[test]
    fn test_customer_selected() {
        let mut binding = CustomerBinding::default();
        assert!(matches!(
            validate_customer_selected(&binding),
            Err(CoreError::NoCustomerSelected)
        ));
        binding.id = Some(9);
        assert_eq!(validate_customer_selected(&binding).unwrap(), 9);
    }
}
