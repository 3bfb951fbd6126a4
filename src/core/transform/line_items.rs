//! Invoice to line-item row mapping
//!
//! Each item of an invoice becomes one [`LineItemRow`] for the requested
//! direction. Items that cannot produce a meaningful row are rejected and
//! reported alongside the rows that were produced.

use crate::domain::{Direction, Invoice, InvoiceItem, LineItemRow};
use std::fmt;

/// Why an item did not produce a row
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Quantity is missing or not a number
    MissingQuantity,
    /// Quantity is zero, so the unit total is undefined
    ZeroQuantity,
    /// Total is missing or not a number
    MissingTotal,
    /// Division produced an infinite or NaN unit total
    NonFiniteUnitTotal { total: f64, quantity: f64 },
    /// The item has no accounting block for the direction
    MissingClassification(Direction),
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::MissingQuantity => write!(f, "quantity is missing or not numeric"),
            RejectionReason::ZeroQuantity => write!(f, "quantity is zero"),
            RejectionReason::MissingTotal => write!(f, "total is missing or not numeric"),
            RejectionReason::NonFiniteUnitTotal { total, quantity } => {
                write!(f, "unit total {total}/{quantity} is not finite")
            }
            RejectionReason::MissingClassification(direction) => {
                write!(f, "no '{direction}' accounting specification")
            }
        }
    }
}

/// A rejected item, by position within the invoice
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    pub item_index: usize,
    pub reason: RejectionReason,
}

/// Rows produced for one invoice, plus the items that were rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutput {
    pub rows: Vec<LineItemRow>,
    pub rejected: Vec<RowRejection>,
}

/// Map every item of `invoice` to a row for `direction`
///
/// Rows keep item order. Rejected items leave no gap marker in `rows`; their
/// index is recorded in `rejected` instead.
///
/// # Examples
///
/// ```
/// use ledgerline::core::transform::transform_invoice;
/// use ledgerline::domain::{Direction, Directional, Invoice, InvoiceItem, ItemAccounting};
///
/// let invoice = Invoice {
///     receptor_id: Some("22-2".to_string()),
///     items: vec![InvoiceItem {
///         quantity: Some(4.0),
///         total: Some(100.0),
///         accounting_specifications: Directional::only(Direction::In, ItemAccounting::default()),
///         ..Default::default()
///     }],
///     ..Default::default()
/// };
///
/// let output = transform_invoice(&invoice, Direction::In);
/// assert_eq!(output.rows[0].unit_total, 25.0);
/// assert_eq!(output.rows[0].company_tid.as_deref(), Some("22-2"));
/// ```
pub fn transform_invoice(invoice: &Invoice, direction: Direction) -> TransformOutput {
    let mut output = TransformOutput::default();

    for (item_index, item) in invoice.items.iter().enumerate() {
        match transform_item(invoice, item, direction) {
            Ok(row) => output.rows.push(row),
            Err(reason) => output.rejected.push(RowRejection { item_index, reason }),
        }
    }

    output
}

fn transform_item(
    invoice: &Invoice,
    item: &InvoiceItem,
    direction: Direction,
) -> Result<LineItemRow, RejectionReason> {
    let accounting = item
        .accounting_specifications
        .get(direction)
        .ok_or(RejectionReason::MissingClassification(direction))?;

    let quantity = item.quantity.ok_or(RejectionReason::MissingQuantity)?;
    if quantity == 0.0 {
        return Err(RejectionReason::ZeroQuantity);
    }
    let total = item.total.ok_or(RejectionReason::MissingTotal)?;

    let unit_total = total / quantity;
    if !unit_total.is_finite() {
        return Err(RejectionReason::NonFiniteUnitTotal { total, quantity });
    }

    // The counterparty's tax id: for purchases the receptor, for sales the sender.
    // A missing id stays null in the row.
    let company_tid = match direction {
        Direction::In => invoice.receptor_id.clone(),
        Direction::Out => invoice.sender_id.clone(),
    };

    Ok(LineItemRow {
        initial_description: item.initial_description.clone(),
        final_description: accounting.final_description.clone(),
        unit_total,
        company_tid,
        invoice_type: invoice.invoice_type.clone(),
        accounting_classification: accounting.accounting_classification.clone(),
        analytic_classification: accounting.analytic_classification.clone(),
        establishment_id: invoice.establishment_id.clone(),
        establishment_name: invoice.establishment_name.clone(),
    })
}
