//! # Pricing Pipeline
//!
//! Turns an [`InvoiceDraft`] into [`InvoiceTotals`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineItem[] ──► line_item_total ──► Σ = products_total                  │
//! │                                          │                              │
//! │                         apply_discount ◄─┘  (percentage wins)           │
//! │                                │                                        │
//! │                     after_discount_total                                │
//! │                                │                                        │
//! │             apply_taxes ◄──────┘  (every tax on the same base)          │
//! │                  │                                                      │
//! │            after_tax_total                                              │
//! │                  │                                                      │
//! │   aggregate_surcharges ──► + packing ──► + transport                    │
//! │                                              │                          │
//! │                                         grand_total                     │
//! │                                              │                          │
//! │                           balance = grand_total − amount_paid           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stage is a plain function over values. Computing the totals of an
//! unchanged draft twice gives identical results.
//!
//! ## Overflow
//! Each text field is capped at 1e12, but a product of capped fields can
//! leave the decimal range. Every stage uses checked arithmetic and returns
//! [`CoreError::AmountOverflow`] instead of panicking.
//!
//! ## Negative Values
//! Discounts larger than the amount they apply to drive totals negative.
//! That is allowed by default; [`PricingPolicy`] can clamp line totals, the
//! discounted subtotal and the balance at zero independently.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Amount;
use crate::types::{AdjustmentKind, Discount, InvoiceDraft, LineItem, SurchargeLine, TaxLine};

// =============================================================================
// Policy
// =============================================================================

/// What to do when a stage produces a negative amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum NegativePolicy {
    /// Keep the negative value.
    #[default]
    Allow,
    /// Replace it with zero.
    ClampToZero,
}

impl NegativePolicy {
    #[inline]
    pub fn apply(&self, amount: Amount) -> Amount {
        match self {
            NegativePolicy::Allow => amount,
            NegativePolicy::ClampToZero => amount.clamp_non_negative(),
        }
    }
}

/// Clamping rules for the pipeline stages that can go negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PricingPolicy {
    pub line_totals: NegativePolicy,
    pub discounted_subtotal: NegativePolicy,
    pub balance: NegativePolicy,
}

impl PricingPolicy {
    /// Clamp every stage at zero.
    pub fn clamp_all() -> Self {
        PricingPolicy {
            line_totals: NegativePolicy::ClampToZero,
            discounted_subtotal: NegativePolicy::ClampToZero,
            balance: NegativePolicy::ClampToZero,
        }
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// Total of one product line.
///
/// `price × quantity`, then the line discount: a percentage removes
/// `total × d / 100`, an absolute discount removes `d`.
///
/// ## Example
/// ```rust
/// use khata_core::money::Amount;
/// use khata_core::pricing::line_item_total;
/// use khata_core::types::Discount;
///
/// let total = line_item_total(
///     Amount::from_major(100),
///     Amount::from_major(2),
///     Discount::Percentage(Amount::from_major(10)),
/// )
/// .unwrap();
/// assert_eq!(total, Amount::from_major(180));
/// ```
pub fn line_item_total(price: Amount, quantity: Amount, discount: Discount) -> CoreResult<Amount> {
    let gross = price.checked_mul(quantity).ok_or(CoreError::AmountOverflow)?;
    gross
        .checked_sub(discount.amount_on(gross)?)
        .ok_or(CoreError::AmountOverflow)
}

/// Total of a draft row, read leniently and clamped per policy.
pub fn line_total(item: &LineItem, policy: &PricingPolicy) -> CoreResult<Amount> {
    let total = line_item_total(
        item.price_amount(),
        item.quantity_amount(),
        item.discount_value(),
    )?;
    Ok(policy.line_totals.apply(total))
}

// =============================================================================
// Discount
// =============================================================================

/// Result of applying the order discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountOutcome {
    pub discount_amount: Amount,
    pub after_discount_total: Amount,
}

/// Applies the order-level discount to the summed line totals.
pub fn apply_discount(
    products_total: Amount,
    discount: Discount,
    policy: &PricingPolicy,
) -> CoreResult<DiscountOutcome> {
    let discount_amount = discount.amount_on(products_total)?;
    let after_discount_total = products_total
        .checked_sub(discount_amount)
        .ok_or(CoreError::AmountOverflow)?;

    Ok(DiscountOutcome {
        discount_amount,
        after_discount_total: policy.discounted_subtotal.apply(after_discount_total),
    })
}

// =============================================================================
// Taxes
// =============================================================================

/// One tax row with its computed amount ("Calculated:" in the UI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxAmount {
    pub name: String,
    pub kind: AdjustmentKind,
    pub value: Amount,
    pub amount: Amount,
}

/// Result of applying every tax row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxOutcome {
    pub lines: Vec<TaxAmount>,
    pub total_tax: Amount,
    pub after_tax_total: Amount,
}

/// Applies each tax to the same `base`. Taxes do not compound.
pub fn apply_taxes(base: Amount, taxes: &[TaxLine]) -> CoreResult<TaxOutcome> {
    let lines = taxes
        .iter()
        .map(|tax| {
            let value = tax.value_amount();
            Ok(TaxAmount {
                name: tax.name.clone(),
                kind: tax.kind,
                value,
                amount: tax.kind.amount_on(base, value)?,
            })
        })
        .collect::<CoreResult<Vec<TaxAmount>>>()?;

    let total_tax = sum(lines.iter().map(|line| line.amount))?;

    Ok(TaxOutcome {
        lines,
        total_tax,
        after_tax_total: add(base, total_tax)?,
    })
}

// =============================================================================
// Surcharges
// =============================================================================

/// Packing and transport, chained onto the taxed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SurchargeOutcome {
    pub packing_total: Amount,
    pub after_packing_total: Amount,
    pub transport_total: Amount,
    pub after_transport_total: Amount,
}

pub fn aggregate_surcharges(
    after_tax_total: Amount,
    packing: &[SurchargeLine],
    transport: &[SurchargeLine],
) -> CoreResult<SurchargeOutcome> {
    let packing_total = sum(packing.iter().map(SurchargeLine::amount_value))?;
    let transport_total = sum(transport.iter().map(SurchargeLine::amount_value))?;
    let after_packing_total = add(after_tax_total, packing_total)?;

    Ok(SurchargeOutcome {
        packing_total,
        after_packing_total,
        transport_total,
        after_transport_total: add(after_packing_total, transport_total)?,
    })
}

fn add(a: Amount, b: Amount) -> CoreResult<Amount> {
    a.checked_add(b).ok_or(CoreError::AmountOverflow)
}

fn sum(amounts: impl IntoIterator<Item = Amount>) -> CoreResult<Amount> {
    Amount::checked_sum(amounts).ok_or(CoreError::AmountOverflow)
}

// =============================================================================
// Totals
// =============================================================================

/// Whether money is still owed on the invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// `balance > 0`.
    Due,
    /// `balance <= 0`; a negative balance is an overpayment.
    Settled,
}

impl BalanceStatus {
    pub fn of(balance: Amount) -> Self {
        if balance.is_positive() {
            BalanceStatus::Due
        } else {
            BalanceStatus::Settled
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BalanceStatus::Due => "Balance Due",
            BalanceStatus::Settled => "Payment Complete",
        }
    }
}

/// Every figure shown in the totals card, at full precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    /// One entry per draft row, in row order.
    pub line_totals: Vec<Amount>,
    pub products_total: Amount,
    pub discount: Discount,
    pub discount_amount: Amount,
    pub after_discount_total: Amount,
    pub taxes: Vec<TaxAmount>,
    pub total_tax: Amount,
    pub after_tax_total: Amount,
    pub packing_total: Amount,
    pub transport_total: Amount,
    pub grand_total: Amount,
    pub amount_paid: Amount,
    /// `grand_total - amount_paid`; negative means overpaid.
    pub balance: Amount,
    pub status: BalanceStatus,
}

impl InvoiceTotals {
    /// The balance as displayed: always non-negative, labelled by `status`.
    pub fn balance_display(&self) -> Amount {
        self.balance.abs()
    }
}

/// Runs the whole pipeline over a draft.
///
/// ## Errors
/// `AmountOverflow` when any stage leaves the decimal range.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use khata_core::draft::{apply, DraftCommand, LineItemEdit};
/// use khata_core::pricing::{compute_totals, PricingPolicy};
/// use khata_core::types::InvoiceDraft;
///
/// let draft = InvoiceDraft::fresh(&Utc::now());
/// let draft = apply(&draft, DraftCommand::EditLineItem {
///     index: 0,
///     edit: LineItemEdit::Price("100".into()),
/// }).unwrap();
/// let draft = apply(&draft, DraftCommand::EditLineItem {
///     index: 0,
///     edit: LineItemEdit::Quantity("2".into()),
/// }).unwrap();
///
/// let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();
/// assert_eq!(totals.grand_total.to_fixed(), "200.00");
/// ```
pub fn compute_totals(draft: &InvoiceDraft, policy: &PricingPolicy) -> CoreResult<InvoiceTotals> {
    let line_totals = draft
        .line_items
        .iter()
        .map(|item| line_total(item, policy))
        .collect::<CoreResult<Vec<Amount>>>()?;
    let products_total = sum(line_totals.iter().copied())?;

    let discount = draft.discount.to_discount();
    let discounted = apply_discount(products_total, discount, policy)?;
    let taxed = apply_taxes(discounted.after_discount_total, &draft.taxes)?;
    let surcharges = aggregate_surcharges(taxed.after_tax_total, &draft.packing, &draft.transport)?;

    let grand_total = surcharges.after_transport_total;
    let amount_paid = draft.amount_paid_value();
    let balance = grand_total
        .checked_sub(amount_paid)
        .ok_or(CoreError::AmountOverflow)?;
    let balance = policy.balance.apply(balance);

    Ok(InvoiceTotals {
        line_totals,
        products_total,
        discount,
        discount_amount: discounted.discount_amount,
        after_discount_total: discounted.after_discount_total,
        taxes: taxed.lines,
        total_tax: taxed.total_tax,
        after_tax_total: taxed.after_tax_total,
        packing_total: surcharges.packing_total,
        transport_total: surcharges.transport_total,
        grand_total,
        amount_paid,
        balance,
        status: BalanceStatus::of(balance),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
