//! HTTP handlers

use super::push::PushEnvelope;
use super::validation::validate_distribute_request;
use super::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const DISTRIBUTION_STARTED: &str = "Invoice datasets creation started.";
pub const DISTRIBUTION_FAILED: &str = "Error starting Invoice datasets creation.";

/// `POST /distribute`
///
/// 400 with the first validation message, 404 for an unknown company, 200
/// once every page is published, 500 otherwise.
pub async fn distribute(State(state): State<AppState>, body: Bytes) -> Response {
    let value: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            return (StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}")).into_response()
        }
    };

    let request = match validate_distribute_request(&value) {
        Ok(request) => request,
        Err(message) => {
            tracing::debug!(error = %message, "Rejected distribution request");
            return (StatusCode::BAD_REQUEST, message).into_response();
        }
    };

    let company = match state.companies.find_company(&request.company_id).await {
        Ok(Some(company)) => company,
        Ok(None) => {
            tracing::warn!(company_id = %request.company_id, "Unknown company");
            return (
                StatusCode::NOT_FOUND,
                format!("Company not found: {}", request.company_id),
            )
                .into_response();
        }
        Err(e) => {
            crate::log_error_with_context!(&e, "resolving company");
            return (StatusCode::INTERNAL_SERVER_ERROR, DISTRIBUTION_FAILED).into_response();
        }
    };

    let path = company.destination_path(&state.default_path).to_string();

    match state
        .distributor
        .distribute(&company, request.position, &path)
        .await
    {
        Ok(summary) => {
            tracing::info!(
                company_id = %summary.company_id,
                position = %summary.position,
                batches = summary.batches_published,
                invoices = summary.invoices_published,
                "Distribution request completed"
            );
            (StatusCode::OK, DISTRIBUTION_STARTED).into_response()
        }
        Err(e) => {
            crate::log_error_with_context!(&e, "distributing invoices");
            (StatusCode::INTERNAL_SERVER_ERROR, DISTRIBUTION_FAILED).into_response()
        }
    }
}

/// `POST /process`
///
/// Malformed envelopes are acknowledged so the bus stops redelivering them.
/// Processing failures are acknowledged too unless `nack_on_failure` is set.
pub async fn process(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let message = match PushEnvelope::from_slice(&body).and_then(|envelope| {
        tracing::debug!(
            message_id = ?envelope.message.message_id,
            subscription = ?envelope.subscription,
            "Push delivery received"
        );
        envelope.decode()
    }) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed push delivery");
            return StatusCode::NO_CONTENT;
        }
    };

    match state.processor.process(&message).await {
        Ok(report) => {
            tracing::info!("{}", report.to_log_line());
            StatusCode::NO_CONTENT
        }
        Err(e) => {
            tracing::error!(
                company_id = %message.company_id,
                position = %message.position,
                batch_id = message.batch_id,
                error = %e,
                "Batch processing failed"
            );
            if state.nack_on_failure {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::NO_CONTENT
            }
        }
    }
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
