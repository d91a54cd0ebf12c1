//! # Draft Reducer
//!
//! Every edit to an invoice draft is a [`DraftCommand`] value.
//! [`apply`] takes the current draft and a command and returns the next
//! draft; the input is never modified.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   UI shell ──► DraftCommand ──► apply(&draft, cmd) ──► new draft        │
//! │                                        │                                │
//! │                                        └── Err(CoreError) on bad index, │
//! │                                            a locked customer or a line  │
//! │                                            total that overflows         │
//! │                                                                         │
//! │   new draft ──► compute_totals ──► PaymentSummary ──► UI shell          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Rules
//! - Product rows can all be removed
//! - Tax, packing and transport keep at least one row; removing the last
//!   one blanks it instead
//! - Editing a product row refreshes its stored `total`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, Section};
use crate::pricing::line_item_total;
use crate::types::{
    AdjustmentKind, CustomerBinding, CustomerRecord, DiscountEntry, InvoiceDraft, LineItem,
    ProductRecord, SurchargeLine, TaxLine,
};

// =============================================================================
// Commands
// =============================================================================

/// A single edit to an invoice draft.
///
/// ## Wire Shape
/// ```json
/// { "type": "edit_line_item", "args": { "index": 0, "edit": { "field": "price", "value": "12" } } }
/// { "type": "add_tax" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "args", rename_all = "snake_case")]
pub enum DraftCommand {
    SetInvoiceId {
        invoice_id: String,
    },
    SetInvoiceDate {
        #[ts(as = "String")]
        date: NaiveDate,
    },

    /// Binds a remote customer and locks the customer fields.
    SelectCustomer {
        customer: CustomerRecord,
    },
    EditCustomer {
        field: CustomerField,
        text: String,
    },
    /// Unbinds the customer and unlocks the fields.
    ClearCustomer,

    AddLineItem,
    RemoveLineItem {
        index: usize,
    },
    EditLineItem {
        index: usize,
        edit: LineItemEdit,
    },
    /// Fills a row from the product catalogue.
    SelectProduct {
        index: usize,
        product: ProductRecord,
    },

    SetDiscountValue {
        text: String,
    },
    SetDiscountKind {
        kind: AdjustmentKind,
    },
    /// Both discount inputs at once; a non-zero percentage wins.
    SetDiscountFields {
        percent: String,
        absolute: String,
    },

    AddTax,
    RemoveTax {
        index: usize,
    },
    EditTax {
        index: usize,
        edit: TaxEdit,
    },

    AddPacking,
    RemovePacking {
        index: usize,
    },
    EditPacking {
        index: usize,
        edit: SurchargeEdit,
    },

    AddTransport,
    RemoveTransport {
        index: usize,
    },
    EditTransport {
        index: usize,
        edit: SurchargeEdit,
    },

    SetAmountPaid {
        text: String,
    },

    /// Blanks every section. The invoice number and date are kept.
    Reset,
}

/// Editable customer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerField {
    Name,
    Phone,
    Firm,
    Balance,
}

/// An edit to one product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum LineItemEdit {
    /// Typing a name detaches the row from any catalogue product.
    Name(String),
    Price(String),
    Quantity(String),
    Discount(String),
    DiscountKind(AdjustmentKind),
}

/// An edit to one tax row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TaxEdit {
    Name(String),
    Value(String),
    Kind(AdjustmentKind),
}

/// An edit to one packing or transport row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum SurchargeEdit {
    Name(String),
    Amount(String),
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies one command, returning the next draft.
///
/// ## Errors
/// - `RowOutOfRange` when an index does not address an existing row
/// - `CustomerLocked` when editing fields of a selected remote customer
/// - `AmountOverflow` when an edited product row's total does not fit
pub fn apply(draft: &InvoiceDraft, command: DraftCommand) -> CoreResult<InvoiceDraft> {
    debug!(?command, "applying draft command");
    let mut next = draft.clone();

    match command {
        DraftCommand::SetInvoiceId { invoice_id } => next.header.invoice_id = invoice_id,
        DraftCommand::SetInvoiceDate { date } => next.header.date = date,

        DraftCommand::SelectCustomer { customer } => {
            next.customer = CustomerBinding::from_record(&customer);
        }
        DraftCommand::EditCustomer { field, text } => {
            if next.customer.locked {
                return Err(CoreError::CustomerLocked);
            }
            let slot = match field {
                CustomerField::Name => &mut next.customer.name,
                CustomerField::Phone => &mut next.customer.phone,
                CustomerField::Firm => &mut next.customer.firm,
                CustomerField::Balance => &mut next.customer.balance,
            };
            *slot = text;
        }
        DraftCommand::ClearCustomer => next.customer = CustomerBinding::default(),

        DraftCommand::AddLineItem => next.line_items.push(LineItem::blank()),
        DraftCommand::RemoveLineItem { index } => {
            row(&next.line_items, Section::Product, index)?;
            next.line_items.remove(index);
        }
        DraftCommand::EditLineItem { index, edit } => {
            let item = row_mut(&mut next.line_items, Section::Product, index)?;
            match edit {
                LineItemEdit::Name(name) => {
                    item.name = name;
                    item.product_id = None;
                }
                LineItemEdit::Price(text) => item.price = text,
                LineItemEdit::Quantity(text) => item.quantity = text,
                LineItemEdit::Discount(text) => item.discount = text,
                LineItemEdit::DiscountKind(kind) => item.discount_kind = kind,
            }
            refresh_total(item)?;
        }
        DraftCommand::SelectProduct { index, product } => {
            let item = row_mut(&mut next.line_items, Section::Product, index)?;
            item.product_id = Some(product.id);
            item.name = product.name;
            item.price = product.price.value().to_string();
            if item.quantity.trim().is_empty() {
                item.quantity = "1".to_string();
            }
            refresh_total(item)?;
        }

        DraftCommand::SetDiscountValue { text } => next.discount.value = text,
        DraftCommand::SetDiscountKind { kind } => next.discount.kind = kind,
        DraftCommand::SetDiscountFields { percent, absolute } => {
            next.discount = DiscountEntry::from_fields(percent, absolute);
        }

        DraftCommand::AddTax => next.taxes.push(TaxLine::blank()),
        DraftCommand::RemoveTax { index } => remove_keeping_one(&mut next.taxes, Section::Tax, index)?,
        DraftCommand::EditTax { index, edit } => {
            let tax = row_mut(&mut next.taxes, Section::Tax, index)?;
            match edit {
                TaxEdit::Name(name) => tax.name = name,
                TaxEdit::Value(text) => tax.value = text,
                TaxEdit::Kind(kind) => tax.kind = kind,
            }
        }

        DraftCommand::AddPacking => next.packing.push(SurchargeLine::blank()),
        DraftCommand::RemovePacking { index } => {
            remove_keeping_one(&mut next.packing, Section::Packing, index)?
        }
        DraftCommand::EditPacking { index, edit } => {
            edit_surcharge(row_mut(&mut next.packing, Section::Packing, index)?, edit)
        }

        DraftCommand::AddTransport => next.transport.push(SurchargeLine::blank()),
        DraftCommand::RemoveTransport { index } => {
            remove_keeping_one(&mut next.transport, Section::Transport, index)?
        }
        DraftCommand::EditTransport { index, edit } => {
            edit_surcharge(row_mut(&mut next.transport, Section::Transport, index)?, edit)
        }

        DraftCommand::SetAmountPaid { text } => next.amount_paid = text,

        DraftCommand::Reset => {
            next = InvoiceDraft {
                header: draft.header.clone(),
                customer: CustomerBinding::default(),
                line_items: vec![LineItem::blank()],
                discount: DiscountEntry::default(),
                taxes: vec![TaxLine::blank()],
                packing: vec![SurchargeLine::blank()],
                transport: vec![SurchargeLine::blank()],
                amount_paid: String::new(),
            };
        }
    }

    Ok(next)
}

/// Applies commands in order, stopping at the first error.
pub fn apply_all(
    draft: &InvoiceDraft,
    commands: impl IntoIterator<Item = DraftCommand>,
) -> CoreResult<InvoiceDraft> {
    commands
        .into_iter()
        .try_fold(draft.clone(), |current, command| apply(&current, command))
}

// =============================================================================
// Helpers
// =============================================================================

fn row<T>(rows: &[T], section: Section, index: usize) -> CoreResult<&T> {
    rows.get(index)
        .ok_or_else(|| CoreError::row_out_of_range(section, index, rows.len()))
}

fn row_mut<T>(rows: &mut [T], section: Section, index: usize) -> CoreResult<&mut T> {
    let len = rows.len();
    rows.get_mut(index)
        .ok_or_else(|| CoreError::row_out_of_range(section, index, len))
}

fn remove_keeping_one<T: Default>(rows: &mut Vec<T>, section: Section, index: usize) -> CoreResult<()> {
    row(rows, section, index)?;
    if rows.len() > 1 {
        rows.remove(index);
    } else {
        rows[index] = T::default();
    }
    Ok(())
}

fn edit_surcharge(line: &mut SurchargeLine, edit: SurchargeEdit) {
    match edit {
        SurchargeEdit::Name(name) => line.name = name,
        SurchargeEdit::Amount(text) => line.amount = text,
    }
}

fn refresh_total(item: &mut LineItem) -> CoreResult<()> {
    item.total = line_item_total(
        item.price_amount(),
        item.quantity_amount(),
        item.discount_value(),
    )?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Amount;
    use chrono::{TimeZone, Utc};

    fn fresh() -> InvoiceDraft {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        InvoiceDraft::fresh(&now)
    }

    fn edit_line(index: usize, edit: LineItemEdit) -> DraftCommand {
        DraftCommand::EditLineItem { index, edit }
    }

    #[test]
    fn test_apply_leaves_input_untouched() {
        let draft = fresh();
        let next = apply(&draft, edit_line(0, LineItemEdit::Price("10".into()))).unwrap();
        assert_eq!(draft.line_items[0].price, "");
        assert_eq!(next.line_items[0].price, "10");
    }

    #[test]
    fn test_edit_refreshes_line_total() {
        let draft = apply_all(
            &fresh(),
            [
                edit_line(0, LineItemEdit::Price("100".into())),
                edit_line(0, LineItemEdit::Quantity("2".into())),
                edit_line(0, LineItemEdit::Discount("10".into())),
            ],
        )
        .unwrap();
        assert_eq!(draft.line_items[0].total, Amount::from_major(180));

        let draft = apply(&draft, edit_line(0, LineItemEdit::DiscountKind(AdjustmentKind::Absolute)))
            .unwrap();
        assert_eq!(draft.line_items[0].total, Amount::from_major(190));
    }

    #[test]
    fn test_select_product_fills_row() {
        let product = ProductRecord {
            id: 42,
            name: "Cement".to_string(),
            price: Amount::from_major(350),
        };
        let draft = apply(&fresh(), DraftCommand::SelectProduct { index: 0, product }).unwrap();
        let item = &draft.line_items[0];
        assert_eq!(item.product_id, Some(42));
        assert_eq!(item.name, "Cement");
        assert_eq!(item.quantity, "1");
        assert_eq!(item.total, Amount::from_major(350));

        let renamed = apply(&draft, edit_line(0, LineItemEdit::Name("Sand".into()))).unwrap();
        assert_eq!(renamed.line_items[0].product_id, None);
    }

    #[test]
    fn test_out_of_range_index() {
        let err = apply(&fresh(), DraftCommand::RemoveTax { index: 3 }).unwrap_err();
        assert!(matches!(
            err,
            CoreError::RowOutOfRange {
                section: Section::Tax,
                index: 3,
                len: 1
            }
        ));
    }

    #[test]
    fn test_product_rows_can_all_be_removed() {
        let draft = apply(&fresh(), DraftCommand::RemoveLineItem { index: 0 }).unwrap();
        assert!(draft.line_items.is_empty());
    }

    #[test]
    fn test_last_tax_row_is_blanked_not_removed() {
        let draft = apply(
            &fresh(),
            DraftCommand::EditTax {
                index: 0,
                edit: TaxEdit::Value("18".into()),
            },
        )
        .unwrap();
        let draft = apply(&draft, DraftCommand::RemoveTax { index: 0 }).unwrap();
        assert_eq!(draft.taxes, vec![TaxLine::blank()]);

        let draft = apply_all(
            &draft,
            [DraftCommand::AddPacking, DraftCommand::RemovePacking { index: 0 }],
        )
        .unwrap();
        assert_eq!(draft.packing.len(), 1);
    }

    #[test]
    fn test_locked_customer_rejects_edits() {
        let customer = CustomerRecord {
            id: 3,
            name: "Ravi".to_string(),
            phone: "9876543210".to_string(),
            firm: "Ravi Traders".to_string(),
            balance: None,
        };
        let draft = apply(&fresh(), DraftCommand::SelectCustomer { customer }).unwrap();
        assert!(draft.customer.locked);

        let edit = DraftCommand::EditCustomer {
            field: CustomerField::Name,
            text: "Someone".into(),
        };
        assert!(matches!(apply(&draft, edit.clone()), Err(CoreError::CustomerLocked)));

        let cleared = apply(&draft, DraftCommand::ClearCustomer).unwrap();
        let edited = apply(&cleared, edit).unwrap();
        assert_eq!(edited.customer.name, "Someone");
        assert_eq!(edited.customer.id, None);
    }

    #[test]
    fn test_reset_keeps_header() {
        let draft = apply_all(
            &fresh(),
            [
                DraftCommand::SetInvoiceId {
                    invoice_id: "INV-7".into(),
                },
                DraftCommand::AddLineItem,
                DraftCommand::SetAmountPaid { text: "10".into() },
                DraftCommand::Reset,
            ],
        )
        .unwrap();
        assert_eq!(draft.header.invoice_id, "INV-7");
        assert_eq!(draft.line_items.len(), 1);
        assert!(draft.amount_paid.is_empty());
    }

    #[test]
    fn test_overflowing_line_total_is_rejected() {
        let draft = apply_all(
            &fresh(),
            [
                edit_line(0, LineItemEdit::Price("1000000000000".into())),
                edit_line(0, LineItemEdit::Quantity("1000000000000".into())),
            ],
        )
        .unwrap();

        let err = apply(&draft, edit_line(0, LineItemEdit::Discount("1000000000000".into())))
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));
        assert_eq!(draft.line_items[0].discount, "");
    }

    #[test]
    fn test_discount_fields_prefer_percentage() {
        let both = DraftCommand::SetDiscountFields {
            percent: "10".into(),
            absolute: "50".into(),
        };
        let draft = apply(&fresh(), both).unwrap();
        assert_eq!(draft.discount.kind, AdjustmentKind::Percentage);
        assert_eq!(draft.discount.value, "10");

        let absolute_only = DraftCommand::SetDiscountFields {
            percent: "".into(),
            absolute: "50".into(),
        };
        let draft = apply(&draft, absolute_only).unwrap();
        assert_eq!(draft.discount.kind, AdjustmentKind::Absolute);
        assert_eq!(draft.discount.value, "50");
    }

    #[test]
    fn test_command_wire_shape() {
        let json = r#"{"type":"edit_line_item","args":{"index":0,"edit":{"field":"discount_kind","value":"₹"}}}"#;
        let command: DraftCommand = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            edit_line(0, LineItemEdit::DiscountKind(AdjustmentKind::Absolute))
        );

        let command: DraftCommand = serde_json::from_str(r#"{"type":"add_tax"}"#).unwrap();
        assert_eq!(command, DraftCommand::AddTax);
    }
}
