//! HTTP endpoint tests, driven through the router without binding a socket

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{acme, invoice, verified_invoices, ACME_TID};
use ledgerline::adapters::bus::{encode_message_data, MemoryBus};
use ledgerline::adapters::memory::{MemoryCompanyDirectory, MemoryInvoiceStore};
use ledgerline::adapters::storage::DatasetStore;
use ledgerline::core::distribute::{BatchDistributor, DistributorConfig};
use ledgerline::core::process::{BatchProcessor, ProcessorConfig};
use ledgerline::domain::{BatchMessage, CompanyId, Direction, InvoiceId};
use ledgerline::server::{router, AppState};
use serde_json::json;
use std::sync::Arc;
use test_case::test_case;
use tower::ServiceExt;

struct Harness {
    app: Router,
    bus: MemoryBus,
    datasets: DatasetStore,
}

fn harness(bus: MemoryBus, nack_on_failure: bool) -> Harness {
    let mut invoices = verified_invoices(ACME_TID, Direction::In, 3);
    invoices.push(invoice("out-1", ACME_TID, Direction::Out, "verified"));
    let store = Arc::new(MemoryInvoiceStore::from_invoices(invoices).unwrap());
    let datasets = DatasetStore::in_memory();

    let state = AppState {
        companies: Arc::new(MemoryCompanyDirectory::from_companies(vec![acme()])),
        distributor: BatchDistributor::new(
            store.clone(),
            Arc::new(bus.clone()),
            DistributorConfig::default(),
        ),
        processor: BatchProcessor::new(store, datasets.clone(), ProcessorConfig::default()),
        default_path: "datasets".to_string(),
        nack_on_failure,
    };

    Harness {
        app: router(state),
        bus,
        datasets,
    }
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn push_body(message: &BatchMessage) -> String {
    json!({
        "message": {
            "data": encode_message_data(message).unwrap(),
            "messageId": "123",
            "attributes": {}
        },
        "subscription": "projects/p/subscriptions/invoice-batches-push"
    })
    .to_string()
}

fn batch(ids: &[&str], path: &str) -> BatchMessage {
    BatchMessage {
        company_id: CompanyId::new("ACME").unwrap(),
        position: Direction::In,
        invoice_ids: ids.iter().map(|id| InvoiceId::new(*id).unwrap()).collect(),
        batch_id: 0,
        path: path.to_string(),
    }
}

#[tokio::test]
async fn test_distribute_publishes_and_answers_started() {
    let h = harness(MemoryBus::new(), false);

    let response = h
        .app
        .oneshot(post(
            "/distribute",
            json!({"company_id": "ACME", "position": "in"}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Invoice datasets creation started.");
    let published = h.bus.published().await;
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].invoice_ids.len(), 3);
    assert_eq!(published[0].path, "datasets");
}

#[test_case(json!({"position": "in"}), "\"company_id\" is required" ; "missing company")]
#[test_case(json!({"company_id": "ACME"}), "\"position\" is required" ; "missing position")]
#[test_case(json!({"company_id": "ACME", "position": "up"}), "\"position\" must be one of [in, out]" ; "bad position")]
#[test_case(json!({"company_id": 7, "position": "in"}), "\"company_id\" must be a string" ; "numeric company")]
#[test_case(json!({"company_id": "ACME", "position": "in", "x": 1}), "\"x\" is not allowed" ; "unknown key")]
#[tokio::test]
async fn test_distribute_rejects_invalid_body(body: serde_json::Value, expected: &str) {
    let h = harness(MemoryBus::new(), false);

    let response = h
        .app
        .oneshot(post("/distribute", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, expected);
    assert!(h.bus.published().await.is_empty());
}

#[tokio::test]
async fn test_distribute_rejects_malformed_json() {
    let h = harness(MemoryBus::new(), false);

    let response = h.app.oneshot(post("/distribute", "{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_distribute_unknown_company() {
    let h = harness(MemoryBus::new(), false);

    let response = h
        .app
        .oneshot(post(
            "/distribute",
            json!({"company_id": "GLOBEX", "position": "out"}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Company not found: GLOBEX");
}

#[tokio::test]
async fn test_distribute_publish_failure_is_500() {
    let h = harness(MemoryBus::new().failing_after(0), false);

    let response = h
        .app
        .oneshot(post(
            "/distribute",
            json!({"company_id": "ACME", "position": "in"}).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Error starting Invoice datasets creation."
    );
}

#[tokio::test]
async fn test_process_push_writes_dataset() {
    let h = harness(MemoryBus::new(), false);
    let message = batch(&["inv-0000", "inv-0001"], "datasets");

    let response = h
        .app
        .oneshot(post("/process", push_body(&message)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let body = h
        .datasets
        .get_dataset("datasets/ACME/in/dataset/0.json")
        .await
        .unwrap()
        .expect("dataset written");
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_process_acks_malformed_envelope() {
    let h = harness(MemoryBus::new(), true);

    let response = h
        .app
        .oneshot(post("/process", json!({"message": {"data": "%%%"}}).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[test_case(false, StatusCode::NO_CONTENT ; "acked by default")]
#[test_case(true, StatusCode::INTERNAL_SERVER_ERROR ; "nacked when configured")]
#[tokio::test]
async fn test_process_failure_status(nack_on_failure: bool, expected: StatusCode) {
    let h = harness(MemoryBus::new(), nack_on_failure);
    // ".." is not a valid object key segment, so the write fails
    let message = batch(&["inv-0000"], "..");

    let response = h
        .app
        .oneshot(post("/process", push_body(&message)))
        .await
        .unwrap();

    assert_eq!(response.status(), expected);
}
