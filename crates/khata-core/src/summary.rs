//! Display strings for the payment summary card.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::{BalanceStatus, InvoiceTotals};

/// Totals formatted for display: two decimals with a currency symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentSummary {
    pub subtotal: String,
    pub discount: String,
    pub tax: String,
    pub packing: String,
    pub transport: String,
    pub total_amount: String,
    pub amount_paid: String,
    pub balance_label: String,
    /// Absolute value; see `status` for the direction.
    pub balance_amount: String,
    pub status: BalanceStatus,
}

impl PaymentSummary {
    pub fn render(totals: &InvoiceTotals, symbol: &str) -> Self {
        let fmt = |amount: crate::money::Amount| amount.format_currency(symbol);

        PaymentSummary {
            subtotal: fmt(totals.products_total),
            discount: fmt(totals.discount_amount),
            tax: fmt(totals.total_tax),
            packing: fmt(totals.packing_total),
            transport: fmt(totals.transport_total),
            total_amount: fmt(totals.grand_total),
            amount_paid: fmt(totals.amount_paid),
            balance_label: totals.status.label().to_string(),
            balance_amount: fmt(totals.balance_display()),
            status: totals.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{compute_totals, PricingPolicy};
    use crate::types::InvoiceDraft;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_overpaid_draft() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut draft = InvoiceDraft::fresh(&now);
        draft.line_items[0].price = "50".to_string();
        draft.line_items[0].quantity = "1".to_string();
        draft.amount_paid = "80".to_string();

        let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();
        let summary = PaymentSummary::render(&totals, "₹");

        assert_eq!(summary.subtotal, "₹50.00");
        assert_eq!(summary.total_amount, "₹50.00");
        assert_eq!(summary.balance_label, "Payment Complete");
        assert_eq!(summary.balance_amount, "₹30.00");
        assert_eq!(summary.status, BalanceStatus::Settled);
    }
}
