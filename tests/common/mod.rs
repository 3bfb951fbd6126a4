//! Fixtures shared by the integration tests

#![allow(dead_code)]

use ledgerline::domain::{
    Company, CompanyId, Direction, Directional, Invoice, InvoiceAccounting, InvoiceItem,
    ItemAccounting, TaxId,
};
use serde_json::json;

pub const ACME_TID: &str = "76.000.000-1";

pub fn company(id: &str, tid: &str) -> Company {
    Company {
        id: CompanyId::new(id).unwrap(),
        tid: TaxId::new(tid).unwrap(),
        data_path: None,
    }
}

pub fn acme() -> Company {
    company("ACME", ACME_TID)
}

/// One classified item: quantity 2, total 10
pub fn item(direction: Direction, description: &str) -> InvoiceItem {
    InvoiceItem {
        initial_description: Some(json!(description)),
        quantity: Some(2.0),
        total: Some(10.0),
        accounting_specifications: Directional::only(
            direction,
            ItemAccounting {
                final_description: Some(json!(format!("{description} (classified)"))),
                accounting_classification: Some(json!(4100)),
                analytic_classification: None,
            },
        ),
    }
}

/// Invoice whose `direction` view is in `state`, with one classified item
///
/// The company tax id sits on the side the `direction` filter matches:
/// `sender_id` for `in`, `receptor_id` for `out`.
pub fn invoice(id: &str, tid: &str, direction: Direction, state: &str) -> Invoice {
    let (sender_id, receptor_id) = match direction {
        Direction::In => (Some(tid.to_string()), Some("99.999.999-9".to_string())),
        Direction::Out => (Some("99.999.999-9".to_string()), Some(tid.to_string())),
    };
    Invoice {
        id: id.to_string(),
        sender_id,
        receptor_id,
        invoice_type: Some(json!("33")),
        accounting_specifications: Directional::only(
            direction,
            InvoiceAccounting {
                state: Some(state.to_string()),
            },
        ),
        items: vec![item(direction, "widget")],
        ..Default::default()
    }
}

/// `count` verified invoices for `tid`, ids zero-padded so id order is numeric order
pub fn verified_invoices(tid: &str, direction: Direction, count: usize) -> Vec<Invoice> {
    (0..count)
        .map(|i| invoice(&format!("inv-{i:04}"), tid, direction, "verified"))
        .collect()
}
