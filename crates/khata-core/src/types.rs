//! # Domain Types
//!
//! Core domain types used throughout Khata.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         InvoiceDraft                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InvoiceHeader   │   │ CustomerBinding │   │   LineItem[]    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  invoice_id     │   │  id (remote)    │   │  product_id     │       │
//! │  │  date           │   │  name / phone   │   │  price / qty    │       │
//! │  └─────────────────┘   │  locked         │   │  discount       │       │
//! │                        └─────────────────┘   │  total          │       │
//! │                                              └─────────────────┘       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ DiscountEntry   │   │   TaxLine[]     │   │ SurchargeLine[] │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  value          │   │  name           │   │  packing        │       │
//! │  │  kind (% / ₹)   │   │  value / kind   │   │  transport      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Text In, Amounts Out
//! Every numeric field of the draft is stored as the text the user typed.
//! Reading the field as a number is the pricing pipeline's job, through
//! [`crate::money::lenient_amount`]. This keeps half-typed input such as
//! `"12."` intact between edits.
//!
//! ## Reference Data
//! `CustomerRecord` and `ProductRecord` are owned by the remote service; the
//! core only reads them.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{lenient_amount, Amount};
use crate::INVOICE_ID_PREFIX;

// =============================================================================
// Adjustment Kind
// =============================================================================

/// How a discount or tax value is interpreted.
///
/// The UI shell labels these `%` and `₹`; both spellings deserialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    /// Value is a percentage of the base.
    #[default]
    #[serde(alias = "%")]
    Percentage,
    /// Value is a flat amount.
    #[serde(alias = "₹")]
    Absolute,
}

impl AdjustmentKind {
    pub fn is_percentage(&self) -> bool {
        matches!(self, AdjustmentKind::Percentage)
    }

    /// Applies the value to a base amount.
    ///
    /// Percentage: `base * value / 100`. Absolute: `value`.
    pub fn amount_on(&self, base: Amount, value: Amount) -> CoreResult<Amount> {
        match self {
            AdjustmentKind::Percentage => base
                .checked_percent(value)
                .ok_or(CoreError::AmountOverflow),
            AdjustmentKind::Absolute => Ok(value),
        }
    }
}

// =============================================================================
// Discount
// =============================================================================

/// An order-level or line-level discount.
///
/// ## Precedence
/// When both a percentage and an absolute value are entered,
/// [`Discount::from_split`] keeps the non-zero percentage and ignores the
/// absolute value entirely. [`DiscountEntry::from_fields`] applies it to the
/// two discount inputs of the invoice form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Discount {
    Percentage(Amount),
    Absolute(Amount),
}

impl Default for Discount {
    fn default() -> Self {
        Discount::Percentage(Amount::ZERO)
    }
}

impl Discount {
    pub fn new(kind: AdjustmentKind, value: Amount) -> Self {
        match kind {
            AdjustmentKind::Percentage => Discount::Percentage(value),
            AdjustmentKind::Absolute => Discount::Absolute(value),
        }
    }

    /// Builds a discount from separate percentage and absolute values.
    ///
    /// ```rust
    /// use khata_core::money::Amount;
    /// use khata_core::types::Discount;
    ///
    /// let d = Discount::from_split(Amount::from_major(10), Amount::from_major(50));
    /// assert_eq!(d, Discount::Percentage(Amount::from_major(10)));
    ///
    /// let d = Discount::from_split(Amount::ZERO, Amount::from_major(50));
    /// assert_eq!(d, Discount::Absolute(Amount::from_major(50)));
    /// ```
    pub fn from_split(percent: Amount, absolute: Amount) -> Self {
        if percent.is_zero() {
            Discount::Absolute(absolute)
        } else {
            Discount::Percentage(percent)
        }
    }

    pub fn kind(&self) -> AdjustmentKind {
        match self {
            Discount::Percentage(_) => AdjustmentKind::Percentage,
            Discount::Absolute(_) => AdjustmentKind::Absolute,
        }
    }

    pub fn value(&self) -> Amount {
        match self {
            Discount::Percentage(v) | Discount::Absolute(v) => *v,
        }
    }

    /// The amount this discount removes from `base`.
    pub fn amount_on(&self, base: Amount) -> CoreResult<Amount> {
        self.kind().amount_on(base, self.value())
    }

    /// Splits into `(percent, absolute)`, the unused side being zero.
    pub fn split(&self) -> (Amount, Amount) {
        match self {
            Discount::Percentage(v) => (*v, Amount::ZERO),
            Discount::Absolute(v) => (Amount::ZERO, *v),
        }
    }
}

/// The order discount as typed into the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountEntry {
    pub value: String,
    pub kind: AdjustmentKind,
}

impl DiscountEntry {
    /// Builds the entry from the percentage and absolute inputs.
    ///
    /// ```rust
    /// use khata_core::types::{AdjustmentKind, DiscountEntry};
    ///
    /// let entry = DiscountEntry::from_fields("10".into(), "50".into());
    /// assert_eq!(entry.kind, AdjustmentKind::Percentage);
    /// assert_eq!(entry.value, "10");
    /// ```
    pub fn from_fields(percent: String, absolute: String) -> Self {
        let discount = Discount::from_split(lenient_amount(&percent), lenient_amount(&absolute));
        let value = match discount.kind() {
            AdjustmentKind::Percentage => percent,
            AdjustmentKind::Absolute => absolute,
        };
        DiscountEntry {
            value,
            kind: discount.kind(),
        }
    }

    pub fn to_discount(&self) -> Discount {
        Discount::new(self.kind, lenient_amount(&self.value))
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// One product row of the invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Remote product id; `None` for rows typed by hand.
    pub product_id: Option<i64>,

    pub name: String,

    /// Unit price text.
    pub price: String,

    /// Quantity text.
    pub quantity: String,

    /// Discount value text.
    pub discount: String,

    pub discount_kind: AdjustmentKind,

    /// Derived line total, refreshed by the draft reducer.
    pub total: Amount,
}

impl LineItem {
    pub fn blank() -> Self {
        LineItem::default()
    }

    pub fn price_amount(&self) -> Amount {
        lenient_amount(&self.price)
    }

    pub fn quantity_amount(&self) -> Amount {
        lenient_amount(&self.quantity)
    }

    pub fn discount_value(&self) -> Discount {
        Discount::new(self.discount_kind, lenient_amount(&self.discount))
    }
}

/// One named tax row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxLine {
    pub name: String,
    pub value: String,
    pub kind: AdjustmentKind,
}

impl TaxLine {
    pub fn blank() -> Self {
        TaxLine::default()
    }

    pub fn value_amount(&self) -> Amount {
        lenient_amount(&self.value)
    }
}

/// One flat packing or transport charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurchargeLine {
    pub name: String,
    pub amount: String,
}

impl SurchargeLine {
    pub fn blank() -> Self {
        SurchargeLine::default()
    }

    pub fn amount_value(&self) -> Amount {
        lenient_amount(&self.amount)
    }
}

// =============================================================================
// Header & Customer
// =============================================================================

/// Invoice number and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceHeader {
    /// Human-facing invoice number (`INV-<unix millis>` by default).
    pub invoice_id: String,

    #[ts(as = "String")]
    pub date: NaiveDate,
}

impl InvoiceHeader {
    /// Header for an invoice started at `now`.
    ///
    /// The clock is read by the caller; the core stays pure.
    pub fn for_time<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        InvoiceHeader {
            invoice_id: format!("{INVOICE_ID_PREFIX}{}", now.timestamp_millis()),
            date: now.date_naive(),
        }
    }
}

/// The customer the draft is billed to.
///
/// Selecting a remote customer copies its fields and sets `locked`; the
/// fields then stay read-only until the binding is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerBinding {
    pub id: Option<i64>,
    pub name: String,
    pub phone: String,
    pub firm: String,
    pub balance: String,
    pub locked: bool,
}

impl CustomerBinding {
    pub fn from_record(record: &CustomerRecord) -> Self {
        CustomerBinding {
            id: Some(record.id),
            name: record.name.clone(),
            phone: record.phone.clone(),
            firm: record.firm.clone(),
            balance: record.balance.map(|b| b.value().to_string()).unwrap_or_default(),
            locked: true,
        }
    }
}

// =============================================================================
// Remote Records
// =============================================================================

/// A customer as returned by `GET /customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub firm: String,
    #[serde(default)]
    pub balance: Option<Amount>,
}

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    pub price: Amount,
}

/// Result of `POST /credits/customer/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreditReceipt {
    pub credit_id: i64,
    pub message: Option<String>,
}

// =============================================================================
// Forms
// =============================================================================

/// The "add customer" form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerForm {
    pub name: String,
    pub phone: String,
    pub firm: String,
    pub balance: String,
}

/// The "add product" form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
}

/// A payment recorded against a customer outside of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreditRequest {
    pub customer_id: Option<i64>,
    pub amount: String,
}

// =============================================================================
// Invoice Draft
// =============================================================================

/// Everything the user has entered for one invoice.
///
/// Drafts are values: edits go through [`crate::draft::apply`], which
/// returns a new draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDraft {
    pub header: InvoiceHeader,
    pub customer: CustomerBinding,
    pub line_items: Vec<LineItem>,
    pub discount: DiscountEntry,
    pub taxes: Vec<TaxLine>,
    pub packing: Vec<SurchargeLine>,
    pub transport: Vec<SurchargeLine>,
    pub amount_paid: String,
}

impl InvoiceDraft {
    /// A new draft as shown when the invoice screen opens.
    ///
    /// One blank row in each section, percentage discount, nothing paid.
    pub fn fresh<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        InvoiceDraft {
            header: InvoiceHeader::for_time(now),
            customer: CustomerBinding::default(),
            line_items: vec![LineItem::blank()],
            discount: DiscountEntry::default(),
            taxes: vec![TaxLine::blank()],
            packing: vec![SurchargeLine::blank()],
            transport: vec![SurchargeLine::blank()],
            amount_paid: String::new(),
        }
    }

    pub fn amount_paid_value(&self) -> Amount {
        lenient_amount(&self.amount_paid)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_adjustment_kind_accepts_symbols() {
        let pct: AdjustmentKind = serde_json::from_str("\"%\"").unwrap();
        let abs: AdjustmentKind = serde_json::from_str("\"₹\"").unwrap();
        assert_eq!(pct, AdjustmentKind::Percentage);
        assert_eq!(abs, AdjustmentKind::Absolute);
        assert_eq!(serde_json::to_string(&abs).unwrap(), "\"absolute\"");
    }

    #[test]
    fn test_discount_serializes_tagged() {
        let d = Discount::Absolute(Amount::from_major(50));
        let json = serde_json::to_value(d).unwrap();
        assert_eq!(json["kind"], "absolute");
        assert_eq!(json["value"], "50");
    }

    #[test]
    fn test_discount_split() {
        let d = Discount::Percentage(Amount::from_major(5));
        assert_eq!(d.split(), (Amount::from_major(5), Amount::ZERO));
        assert_eq!(d.amount_on(Amount::from_major(200)).unwrap(), Amount::from_major(10));
    }

    #[test]
    fn test_fresh_draft_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let draft = InvoiceDraft::fresh(&now);

        assert_eq!(draft.header.invoice_id, format!("INV-{}", now.timestamp_millis()));
        assert_eq!(draft.header.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(draft.line_items.len(), 1);
        assert_eq!(draft.taxes.len(), 1);
        assert_eq!(draft.packing.len(), 1);
        assert_eq!(draft.transport.len(), 1);
        assert_eq!(draft.discount.kind, AdjustmentKind::Percentage);
        assert!(draft.amount_paid.is_empty());
        assert!(!draft.customer.locked);
    }

    #[test]
    fn test_customer_record_tolerates_missing_fields() {
        let record: CustomerRecord =
            serde_json::from_str(r#"{"id": 7, "name": "Asha", "balance": 120.5}"#).unwrap();
        assert_eq!(record.phone, "");
        assert_eq!(record.balance.unwrap().to_fixed(), "120.50");

        let binding = CustomerBinding::from_record(&record);
        assert_eq!(binding.id, Some(7));
        assert_eq!(binding.balance, "120.5");
        assert!(binding.locked);
    }

    #[test]
    fn test_line_item_reads_text_leniently() {
        let item = LineItem {
            price: "12.5".to_string(),
            quantity: "abc".to_string(),
            ..LineItem::blank()
        };
        assert_eq!(item.price_amount().to_fixed(), "12.50");
        assert!(item.quantity_amount().is_zero());
    }
}
