// Pricing pipeline properties and worked examples.
//
// Runs the whole pipeline through the public API: drafts are built with
// DraftCommand values and totals come from compute_totals.

use chrono::{TimeZone, Utc};
use khata_core::draft::{apply_all, DraftCommand, LineItemEdit, SurchargeEdit, TaxEdit};
use khata_core::money::Amount;
use khata_core::pricing::{apply_taxes, compute_totals, line_item_total, BalanceStatus, PricingPolicy};
use khata_core::summary::PaymentSummary;
use khata_core::types::{AdjustmentKind, Discount, InvoiceDraft, TaxLine};
use khata_core::CoreError;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn fresh() -> InvoiceDraft {
    let now = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
    InvoiceDraft::fresh(&now)
}

fn line(index: usize, edit: LineItemEdit) -> DraftCommand {
    DraftCommand::EditLineItem { index, edit }
}

/// The worked example: 100 × 2, 10% off, 18% tax, packing 20, transport 30, paid 200.
fn worked_example() -> InvoiceDraft {
    apply_all(
        &fresh(),
        [
            line(0, LineItemEdit::Price("100".into())),
            line(0, LineItemEdit::Quantity("2".into())),
            DraftCommand::SetDiscountValue { text: "10".into() },
            DraftCommand::EditTax {
                index: 0,
                edit: TaxEdit::Value("18".into()),
            },
            DraftCommand::EditPacking {
                index: 0,
                edit: SurchargeEdit::Amount("20".into()),
            },
            DraftCommand::EditTransport {
                index: 0,
                edit: SurchargeEdit::Amount("30".into()),
            },
            DraftCommand::SetAmountPaid { text: "200".into() },
        ],
    )
    .unwrap()
}

fn cents(value: u64) -> Amount {
    Amount::new(Decimal::new(value as i64, 2))
}

// =============================================================================
// Worked Examples
// =============================================================================

#[test]
fn test_worked_example_totals() {
    let totals = compute_totals(&worked_example(), &PricingPolicy::default()).unwrap();

    assert_eq!(totals.products_total, Amount::new(dec!(200)));
    assert_eq!(totals.after_discount_total, Amount::new(dec!(180)));
    assert_eq!(totals.total_tax, Amount::new(dec!(32.4)));
    assert_eq!(totals.after_tax_total, Amount::new(dec!(212.4)));
    assert_eq!(totals.packing_total, Amount::new(dec!(20)));
    assert_eq!(totals.transport_total, Amount::new(dec!(30)));
    assert_eq!(totals.grand_total, Amount::new(dec!(262.4)));
    assert_eq!(totals.balance, Amount::new(dec!(62.4)));
    assert_eq!(totals.status, BalanceStatus::Due);

    let summary = PaymentSummary::render(&totals, "₹");
    assert_eq!(summary.total_amount, "₹262.40");
    assert_eq!(summary.balance_label, "Balance Due");
    assert_eq!(summary.balance_amount, "₹62.40");
}

#[test]
fn test_empty_line_list_zeroes_everything_downstream() {
    let draft = apply_all(&fresh(), [DraftCommand::RemoveLineItem { index: 0 }]).unwrap();
    let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();

    assert!(totals.line_totals.is_empty());
    assert!(totals.products_total.is_zero());
    assert!(totals.after_discount_total.is_zero());
    assert!(totals.total_tax.is_zero());
    assert!(totals.grand_total.is_zero());
    assert!(totals.balance.is_zero());
    assert_eq!(totals.status, BalanceStatus::Settled);
}

#[test]
fn test_percentage_wins_over_absolute() {
    let draft = apply_all(
        &worked_example(),
        [DraftCommand::SetDiscountFields {
            percent: "10".into(),
            absolute: "50".into(),
        }],
    )
    .unwrap();
    let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();

    assert_eq!(totals.discount, Discount::Percentage(Amount::new(dec!(10))));
    assert_eq!(totals.discount_amount, Amount::new(dec!(20)));
    assert_eq!(totals.grand_total, Amount::new(dec!(262.4)));
}

#[test]
fn test_largest_accepted_inputs_report_overflow() {
    let draft = apply_all(
        &fresh(),
        [
            line(0, LineItemEdit::Price("1000000000000".into())),
            line(0, LineItemEdit::Quantity("1000000000000".into())),
            DraftCommand::EditTax {
                index: 0,
                edit: TaxEdit::Value("1000000000000".into()),
            },
        ],
    )
    .unwrap();

    let err = compute_totals(&draft, &PricingPolicy::default()).unwrap_err();
    assert!(matches!(err, CoreError::AmountOverflow));
    assert!(compute_totals(&draft, &PricingPolicy::clamp_all()).is_err());
}

#[test]
fn test_overpayment_is_payment_complete() {
    let draft = apply_all(
        &worked_example(),
        [DraftCommand::SetAmountPaid { text: "300".into() }],
    )
    .unwrap();
    let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();

    assert_eq!(totals.balance, Amount::new(dec!(-37.6)));
    assert_eq!(totals.status, BalanceStatus::Settled);

    let summary = PaymentSummary::render(&totals, "₹");
    assert_eq!(summary.balance_label, "Payment Complete");
    assert_eq!(summary.balance_amount, "₹37.60");
}

#[test]
fn test_unparsable_fields_count_as_zero() {
    let draft = apply_all(
        &worked_example(),
        [
            DraftCommand::EditTax {
                index: 0,
                edit: TaxEdit::Value("eighteen".into()),
            },
            DraftCommand::SetAmountPaid { text: "2oo".into() },
        ],
    )
    .unwrap();
    let totals = compute_totals(&draft, &PricingPolicy::default()).unwrap();

    assert!(totals.total_tax.is_zero());
    assert!(totals.amount_paid.is_zero());
    assert_eq!(totals.grand_total, Amount::new(dec!(230)));
}

#[test]
fn test_clamping_policy_holds_balance_at_zero() {
    let draft = apply_all(
        &worked_example(),
        [DraftCommand::SetAmountPaid { text: "1000".into() }],
    )
    .unwrap();
    let policy = PricingPolicy {
        balance: khata_core::pricing::NegativePolicy::ClampToZero,
        ..PricingPolicy::default()
    };
    let totals = compute_totals(&draft, &policy).unwrap();
    assert!(totals.balance.is_zero());
    assert_eq!(totals.status, BalanceStatus::Settled);
}

// =============================================================================
// Properties
// =============================================================================

fn tax_line() -> impl Strategy<Value = TaxLine> {
    (0u64..10_000u64, any::<bool>()).prop_map(|(value, percentage)| TaxLine {
        name: "tax".to_string(),
        value: Decimal::new(value as i64, 2).to_string(),
        kind: if percentage {
            AdjustmentKind::Percentage
        } else {
            AdjustmentKind::Absolute
        },
    })
}

proptest! {
    #[test]
    fn prop_no_discount_is_price_times_quantity(
        price in 0u64..100_000_000u64,
        quantity in 0u64..10_000u64,
        percentage in any::<bool>(),
    ) {
        let price = cents(price);
        let quantity = Amount::new(Decimal::from(quantity));
        let discount = if percentage {
            Discount::Percentage(Amount::ZERO)
        } else {
            Discount::Absolute(Amount::ZERO)
        };

        prop_assert_eq!(
            line_item_total(price, quantity, discount).unwrap(),
            price.checked_mul(quantity).unwrap()
        );
    }

    #[test]
    fn prop_full_percentage_discount_zeroes_line(
        price in 0u64..100_000_000u64,
        quantity in 0u64..10_000u64,
    ) {
        let total = line_item_total(
            cents(price),
            Amount::new(Decimal::from(quantity)),
            Discount::Percentage(Amount::new(dec!(100))),
        )
        .unwrap();
        prop_assert!(total.is_zero());
    }

    #[test]
    fn prop_total_tax_is_order_independent(
        base in 0u64..100_000_000u64,
        (taxes, shuffled) in prop::collection::vec(tax_line(), 0..6)
            .prop_flat_map(|taxes| (Just(taxes.clone()), Just(taxes).prop_shuffle())),
    ) {
        let base = cents(base);

        prop_assert_eq!(
            apply_taxes(base, &taxes).unwrap().total_tax,
            apply_taxes(base, &shuffled).unwrap().total_tax
        );
    }

    #[test]
    fn prop_recomputing_is_idempotent(
        price in 0u64..1_000_000u64,
        quantity in 0u64..1_000u64,
        discount in 0u64..10_000u64,
        paid in 0u64..100_000_000u64,
    ) {
        let draft = apply_all(&fresh(), [
            line(0, LineItemEdit::Price(cents(price).value().to_string())),
            line(0, LineItemEdit::Quantity(quantity.to_string())),
            line(0, LineItemEdit::Discount(cents(discount).value().to_string())),
            DraftCommand::SetAmountPaid { text: cents(paid).value().to_string() },
        ]).unwrap();

        let policy = PricingPolicy::default();
        prop_assert_eq!(
            compute_totals(&draft, &policy).unwrap(),
            compute_totals(&draft, &policy).unwrap()
        );
    }
}
