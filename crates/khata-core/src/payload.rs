//! # Wire Payloads
//!
//! Request bodies sent to the remote invoicing API.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rust                          JSON (camelCase, numbers as numbers)    │
//! │  ────────────────────────────  ──────────────────────────────────────   │
//! │  CustomerPayload               { name, phone, firm, balance }           │
//! │  ProductPayload                { name, price }                          │
//! │  CreditPayload                 { amountPaidByCustomer }                 │
//! │  InvoicePayload                { customerId, totalAmount, ...,          │
//! │                                  invoiceLineItems: [...],               │
//! │                                  taxLineItems: [...], ... }             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Amounts are exact decimals inside the core and become JSON numbers only
//! here, through `rust_decimal::serde::float`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::{lenient_amount, Amount};
use crate::pricing::InvoiceTotals;
use crate::types::{AdjustmentKind, CustomerForm, InvoiceDraft, SurchargeLine};
use crate::validation::validate_customer_selected;

// =============================================================================
// Customer / Product / Credit
// =============================================================================

/// Body of `POST /customers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub phone: String,
    pub firm: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl CustomerPayload {
    /// Trims the text fields; an unreadable balance becomes zero.
    ///
    /// Call after [`crate::validation::validate_customer_form`].
    pub fn from_form(form: &CustomerForm) -> Self {
        CustomerPayload {
            name: form.name.trim().to_string(),
            phone: form.phone.trim().to_string(),
            firm: form.firm.trim().to_string(),
            balance: lenient_amount(&form.balance).value(),
        }
    }
}

/// Body of `POST /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl ProductPayload {
    pub fn new(name: &str, price: Amount) -> Self {
        ProductPayload {
            name: name.trim().to_string(),
            price: price.value(),
        }
    }
}

/// Body of `POST /credits/customer/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid_by_customer: Decimal,
}

impl CreditPayload {
    pub fn new(amount: Amount) -> Self {
        CreditPayload {
            amount_paid_by_customer: amount.value(),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLinePayload {
    pub product_id: Option<i64>,
    #[serde(with = "rust_decimal::serde::float")]
    pub product_quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub product_amount_discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub product_percent_discount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLinePayload {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargePayload {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl From<&SurchargeLine> for SurchargePayload {
    fn from(line: &SurchargeLine) -> Self {
        SurchargePayload {
            name: line.name.clone(),
            amount: line.amount_value().value(),
        }
    }
}

/// Body of `POST /invoices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub customer_id: i64,
    /// Sum of line totals, before the order discount.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub percent_discount: Decimal,
    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub final_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_by_customer: Decimal,
    pub invoice_line_items: Vec<InvoiceLinePayload>,
    pub tax_line_items: Vec<TaxLinePayload>,
    pub packaging_line_items: Vec<SurchargePayload>,
    pub transportation_line_items: Vec<SurchargePayload>,
}

/// `(percent, absolute)` for a value typed under `kind`.
fn split_by_kind(kind: AdjustmentKind, value: Amount) -> (Decimal, Decimal) {
    match kind {
        AdjustmentKind::Percentage => (value.value(), Decimal::ZERO),
        AdjustmentKind::Absolute => (Decimal::ZERO, value.value()),
    }
}

impl InvoicePayload {
    /// Builds the invoice body from a draft and its computed totals.
    ///
    /// ## Errors
    /// `NoCustomerSelected` when the draft is not bound to a remote customer.
    pub fn from_draft(draft: &InvoiceDraft, totals: &InvoiceTotals) -> CoreResult<Self> {
        let customer_id = validate_customer_selected(&draft.customer)?;
        let (percent_discount, amount_discount) = totals.discount.split();

        let invoice_line_items = draft
            .line_items
            .iter()
            .map(|item| {
                let (percent, absolute) =
                    split_by_kind(item.discount_kind, lenient_amount(&item.discount));
                InvoiceLinePayload {
                    product_id: item.product_id,
                    product_quantity: item.quantity_amount().value(),
                    product_amount_discount: absolute,
                    product_percent_discount: percent,
                }
            })
            .collect();

        let tax_line_items = draft
            .taxes
            .iter()
            .map(|tax| {
                let (percent, amount) = split_by_kind(tax.kind, tax.value_amount());
                TaxLinePayload {
                    name: tax.name.clone(),
                    percent,
                    amount,
                }
            })
            .collect();

        Ok(InvoicePayload {
            customer_id,
            total_amount: totals.products_total.value(),
            amount_discount: amount_discount.value(),
            percent_discount: percent_discount.value(),
            final_amount: totals.grand_total.value(),
            paid_by_customer: totals.amount_paid.value(),
            invoice_line_items,
            tax_line_items,
            packaging_line_items: draft.packing.iter().map(SurchargePayload::from).collect(),
            transportation_line_items: draft.transport.iter().map(SurchargePayload::from).collect(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::pricing::{compute_totals, PricingPolicy};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample_draft() -> InvoiceDraft {
        let now = Utc.with_ymd_and_hms(2024, 2, 2, 12, 0, 0).unwrap();
        let mut draft = InvoiceDraft::fresh(&now);
        draft.customer.id = Some(11);
        draft.line_items[0].product_id = Some(5);
        draft.line_items[0].price = "100".to_string();
        draft.line_items[0].quantity = "2".to_string();
        draft.line_items[0].discount = "15".to_string();
        draft.line_items[0].discount_kind = AdjustmentKind::Absolute;
        draft.discount.value = "10".to_string();
        draft.taxes[0].name = "GST".to_string();
        draft.taxes[0].value = "18".to_string();
        draft.packing[0].name = "Box".to_string();
        draft.packing[0].amount = "20".to_string();
        draft.transport[0].name = "Truck".to_string();
        draft.transport[0].amount = "30".to_string();
        draft.amount_paid = "100".to_string();
        draft
    }

    #[test]
    fn test_invoice_payload_json() {
        let draft = sample_draft();
        let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();
        let payload = InvoicePayload::from_draft(&draft, &totals).unwrap();
        let value = serde_json::to_value(&payload).unwrap();

        // 185 → 10% off → 166.5 → 18% tax 29.97 → 196.47 → +20 +30
        assert_eq!(value["customerId"], json!(11));
        assert_eq!(value["totalAmount"], json!(185.0));
        assert_eq!(value["percentDiscount"], json!(10.0));
        assert_eq!(value["amountDiscount"], json!(0.0));
        let final_amount = value["finalAmount"].as_f64().unwrap();
        assert!((final_amount - 246.47).abs() < 1e-9);
        assert_eq!(value["paidByCustomer"], json!(100.0));
        assert_eq!(
            value["invoiceLineItems"][0],
            json!({
                "productId": 5,
                "productQuantity": 2.0,
                "productAmountDiscount": 15.0,
                "productPercentDiscount": 0.0
            })
        );
        assert_eq!(
            value["taxLineItems"][0],
            json!({ "name": "GST", "percent": 18.0, "amount": 0.0 })
        );
        assert_eq!(value["packagingLineItems"][0], json!({ "name": "Box", "amount": 20.0 }));
        assert_eq!(
            value["transportationLineItems"][0],
            json!({ "name": "Truck", "amount": 30.0 })
        );
    }

    #[test]
    fn test_invoice_payload_requires_customer() {
        let mut draft = sample_draft();
        draft.customer.id = None;
        let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();
        assert!(matches!(
            InvoicePayload::from_draft(&draft, &totals),
            Err(CoreError::NoCustomerSelected)
        ));
    }

    #[test]
    fn test_customer_payload_trims_and_defaults_balance() {
        let form = CustomerForm {
            name: "  Asha ".to_string(),
            phone: "9876543210 ".to_string(),
            firm: " Asha & Co".to_string(),
            balance: "n/a".to_string(),
        };
        let value = serde_json::to_value(CustomerPayload::from_form(&form)).unwrap();
        assert_eq!(
            value,
            json!({ "name": "Asha", "phone": "9876543210", "firm": "Asha & Co", "balance": 0.0 })
        );
    }

    #[test]
    fn test_credit_payload_field_name() {
        let value = serde_json::to_value(CreditPayload::new(Amount::from_major(75))).unwrap();
        assert_eq!(value, json!({ "amountPaidByCustomer": 75.0 }));
    }
}
