//! Integration tests for batch processing

mod common;

use common::{invoice, item, ACME_TID};
use ledgerline::adapters::memory::MemoryInvoiceStore;
use ledgerline::adapters::storage::DatasetStore;
use ledgerline::core::process::{BatchProcessor, ProcessorConfig};
use ledgerline::domain::{BatchMessage, CompanyId, Direction, Invoice, InvoiceId, LineItemRow};
use serde_json::json;
use std::sync::Arc;

fn message(ids: &[&str], position: Direction, batch_id: u64) -> BatchMessage {
    BatchMessage {
        company_id: CompanyId::new("ACME").unwrap(),
        position,
        invoice_ids: ids.iter().map(|id| InvoiceId::new(*id).unwrap()).collect(),
        batch_id,
        path: "datasets".to_string(),
    }
}

fn processor(store: MemoryInvoiceStore, datasets: DatasetStore) -> BatchProcessor {
    BatchProcessor::new(Arc::new(store), datasets, ProcessorConfig::default())
}

async fn read_rows(datasets: &DatasetStore, key: &str) -> Vec<LineItemRow> {
    let body = datasets.get_dataset(key).await.unwrap().expect("dataset written");
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_writes_one_row_per_item() {
    let mut two_items = invoice("a", ACME_TID, Direction::In, "verified");
    two_items.items.push(item(Direction::In, "gadget"));
    let store = MemoryInvoiceStore::from_invoices(vec![
        two_items,
        invoice("b", ACME_TID, Direction::In, "verified"),
    ])
    .unwrap();
    let datasets = DatasetStore::in_memory();

    let report = processor(store, datasets.clone())
        .process(&message(&["a", "b"], Direction::In, 4))
        .await
        .unwrap();

    assert!(report.written);
    assert_eq!(report.rows, 3);
    assert_eq!(report.dataset_key, "datasets/ACME/in/dataset/4.json");
    assert!(report.checksum.is_some());

    let rows = read_rows(&datasets, "datasets/ACME/in/dataset/4.json").await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].unit_total, 5.0);
    assert_eq!(rows[1].initial_description, Some(json!("gadget")));
    // For purchases the row carries the receptor's tax id
    assert_eq!(rows[0].company_tid.as_deref(), Some("99.999.999-9"));
}

#[tokio::test]
async fn test_missing_invoices_are_skipped() {
    let store =
        MemoryInvoiceStore::from_invoices(vec![invoice("a", ACME_TID, Direction::Out, "verified")])
            .unwrap();
    let datasets = DatasetStore::in_memory();

    let report = processor(store, datasets.clone())
        .process(&message(&["a", "ghost"], Direction::Out, 0))
        .await
        .unwrap();

    assert_eq!(report.requested, 2);
    assert_eq!(report.found, 1);
    assert_eq!(report.missing, 1);
    let rows = read_rows(&datasets, "datasets/ACME/out/dataset/0.json").await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company_tid.as_deref(), Some("99.999.999-9"));
}

#[tokio::test]
async fn test_empty_batch_writes_nothing() {
    let datasets = DatasetStore::in_memory();

    let report = processor(MemoryInvoiceStore::new(), datasets.clone())
        .process(&message(&[], Direction::In, 0))
        .await
        .unwrap();

    assert!(!report.written);
    assert_eq!(report.rows, 0);
    assert!(datasets
        .get_dataset("datasets/ACME/in/dataset/0.json")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_invoices_without_items_write_nothing() {
    let mut empty = invoice("a", ACME_TID, Direction::In, "verified");
    empty.items.clear();
    let store = MemoryInvoiceStore::from_invoices(vec![empty]).unwrap();
    let datasets = DatasetStore::in_memory();

    let report = processor(store, datasets.clone())
        .process(&message(&["a"], Direction::In, 0))
        .await
        .unwrap();

    assert_eq!(report.found, 1);
    assert_eq!(report.rows, 0);
    assert!(!report.written);
    assert!(datasets.list_keys("datasets/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_without_rows_writes_nothing() {
    let mut unclassified = invoice("a", ACME_TID, Direction::In, "verified");
    // Classified for the other direction only
    unclassified.items = vec![item(Direction::Out, "widget")];
    let store = MemoryInvoiceStore::from_invoices(vec![unclassified]).unwrap();
    let datasets = DatasetStore::in_memory();

    let report = processor(store, datasets.clone())
        .process(&message(&["a"], Direction::In, 0))
        .await
        .unwrap();

    assert_eq!(report.found, 1);
    assert_eq!(report.rejected_items, 1);
    assert!(!report.written);
    assert!(datasets.list_keys("datasets/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dry_run_does_not_write() {
    let store =
        MemoryInvoiceStore::from_invoices(vec![invoice("a", ACME_TID, Direction::In, "verified")])
            .unwrap();
    let datasets = DatasetStore::in_memory();
    let processor = BatchProcessor::new(
        Arc::new(store),
        datasets.clone(),
        ProcessorConfig { dry_run: true },
    );

    let report = processor
        .process(&message(&["a"], Direction::In, 0))
        .await
        .unwrap();

    assert_eq!(report.rows, 1);
    assert!(!report.written);
    assert!(report.checksum.is_some());
    assert!(datasets.list_keys("datasets/").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_redelivery_overwrites_same_key() {
    let store =
        MemoryInvoiceStore::from_invoices(vec![invoice("a", ACME_TID, Direction::In, "verified")])
            .unwrap();
    let datasets = DatasetStore::in_memory();
    let processor = processor(store, datasets.clone());
    let batch = message(&["a"], Direction::In, 0);

    let first = processor.process(&batch).await.unwrap();
    let second = processor.process(&batch).await.unwrap();

    assert_eq!(first.checksum, second.checksum);
    assert_eq!(datasets.list_keys("datasets/ACME/in/").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_loosely_typed_document_still_yields_rows() {
    let document: Invoice = serde_json::from_value(json!({
        "id": "a",
        "sender_id": ACME_TID,
        "receptor_id": null,
        "type": 33,
        "accounting_specifications": {"in": {"state": "verified"}},
        "items": [{
            "initial_description": "widget",
            "quantity": 2,
            "total": 10,
            "accounting_specifications": {"in": {"accounting_classification": 4100}}
        }]
    }))
    .unwrap();
    let store = MemoryInvoiceStore::from_invoices(vec![
        document,
        invoice("b", ACME_TID, Direction::In, "verified"),
    ])
    .unwrap();
    let datasets = DatasetStore::in_memory();

    let report = processor(store, datasets.clone())
        .process(&message(&["a", "b"], Direction::In, 0))
        .await
        .unwrap();

    assert_eq!(report.rows, 2);
    let rows = read_rows(&datasets, "datasets/ACME/in/dataset/0.json").await;
    assert_eq!(rows[0].invoice_type, Some(json!(33)));
    assert_eq!(rows[0].company_tid, None);
    assert_eq!(rows[1].invoice_type, Some(json!("33")));
}
