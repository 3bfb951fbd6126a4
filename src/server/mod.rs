//! HTTP surface
//!
//! - `POST /distribute` - trigger a distribution for one company and position
//! - `POST /process` - Pub/Sub push endpoint, one batch message per request
//! - `GET /health` - liveness
//!
//! With the in-memory bus there is no push subscription, so
//! [`spawn_local_consumer`] feeds published messages straight to the
//! processor instead.

pub mod handlers;
pub mod push;
pub mod validation;

use crate::adapters::database::traits::CompanyDirectory;
use crate::core::distribute::BatchDistributor;
use crate::core::process::BatchProcessor;
use crate::domain::{BatchMessage, LedgerlineError, Result};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub companies: Arc<dyn CompanyDirectory + Send + Sync>,
    pub distributor: BatchDistributor,
    pub processor: BatchProcessor,

    /// Destination path for companies without their own
    pub default_path: String,

    /// Answer failed push deliveries with 500 instead of 204
    pub nack_on_failure: bool,
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/distribute", post(handlers::distribute))
        .route("/process", post(handlers::process))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `bind_address` and serve until `shutdown` resolves
///
/// In-flight requests finish before this returns.
pub async fn serve<F>(bind_address: &str, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .map_err(|e| {
            LedgerlineError::Configuration(format!("Failed to bind {bind_address}: {e}"))
        })?;

    tracing::info!(address = %bind_address, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Process every message arriving on `receiver` until the channel closes
///
/// Failures are logged and the consumer moves on; there is no redelivery.
pub fn spawn_local_consumer(
    mut receiver: mpsc::UnboundedReceiver<BatchMessage>,
    processor: BatchProcessor,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Local batch consumer started");
        while let Some(message) = receiver.recv().await {
            match processor.process(&message).await {
                Ok(report) => tracing::info!("{}", report.to_log_line()),
                Err(e) => tracing::error!(
                    company_id = %message.company_id,
                    position = %message.position,
                    batch_id = message.batch_id,
                    error = %e,
                    "Local batch processing failed"
                ),
            }
        }
        tracing::info!("Local batch consumer stopped");
    })
}
