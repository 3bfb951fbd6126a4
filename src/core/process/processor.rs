//! Batch processing
//!
//! Turns one [`BatchMessage`] into one dataset object: fetch the invoices in a
//! single bulk read, flatten each into line-item rows, and write the rows as a
//! JSON array. A batch that yields no rows writes nothing.

use super::report::ProcessReport;
use crate::adapters::database::traits::InvoiceStore;
use crate::adapters::storage::DatasetStore;
use crate::core::checksum::calculate_checksum_bytes;
use crate::core::transform::transform_invoice;
use crate::domain::{BatchMessage, LineItemRow, Result};
use std::sync::Arc;
use std::time::Instant;

/// Configuration for batch processing
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
    /// Fetch and transform, but do not write
    pub dry_run: bool,
}

/// Batch processor for invoice batches
#[derive(Clone)]
pub struct BatchProcessor {
    store: Arc<dyn InvoiceStore + Send + Sync>,
    datasets: DatasetStore,
    config: ProcessorConfig,
}

impl BatchProcessor {
    /// Create a new batch processor
    pub fn new(
        store: Arc<dyn InvoiceStore + Send + Sync>,
        datasets: DatasetStore,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            store,
            datasets,
            config,
        }
    }

    /// Process one batch message
    ///
    /// Ids with no stored invoice are skipped. Items the transform rejects are
    /// logged and left out. Any fetch or write error fails the whole batch and
    /// nothing partial is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the bulk fetch, serialization, or object write fails.
    pub async fn process(&self, message: &BatchMessage) -> Result<ProcessReport> {
        let start = Instant::now();
        let dataset_key = message.dataset_key();

        tracing::info!(
            company_id = %message.company_id,
            position = %message.position,
            batch_id = message.batch_id,
            invoices = message.invoice_ids.len(),
            "Processing batch"
        );

        let mut report = ProcessReport {
            company_id: message.company_id.clone(),
            position: message.position,
            batch_id: message.batch_id,
            requested: message.invoice_ids.len(),
            found: 0,
            missing: 0,
            rows: 0,
            rejected_items: 0,
            dataset_key,
            checksum: None,
            written: false,
            dry_run: self.config.dry_run,
            duration: Default::default(),
        };

        let rows = if message.invoice_ids.is_empty() {
            Vec::new()
        } else {
            self.collect_rows(message, &mut report).await?
        };
        report.rows = rows.len();

        if rows.is_empty() {
            tracing::info!(
                batch_id = message.batch_id,
                dataset_key = %report.dataset_key,
                "Batch produced no rows, skipping dataset write"
            );
            report.duration = start.elapsed();
            return Ok(report);
        }

        let body = serde_json::to_vec(&rows)?;
        let checksum = calculate_checksum_bytes(&body);

        if self.config.dry_run {
            tracing::info!(
                dataset_key = %report.dataset_key,
                rows = rows.len(),
                "Dry run: skipping dataset write"
            );
        } else {
            self.datasets.put_dataset(&report.dataset_key, body).await?;
            report.written = true;
            crate::log_dataset_written!(&report.dataset_key, rows.len(), &checksum);
        }

        report.checksum = Some(checksum);
        report.duration = start.elapsed();
        Ok(report)
    }

    async fn collect_rows(
        &self,
        message: &BatchMessage,
        report: &mut ProcessReport,
    ) -> Result<Vec<LineItemRow>> {
        let fetched = self.store.get_all(&message.invoice_ids).await?;
        let mut rows = Vec::new();

        for (id, invoice) in message.invoice_ids.iter().zip(fetched) {
            let Some(invoice) = invoice else {
                report.missing += 1;
                tracing::debug!(invoice_id = %id, "Invoice not found, skipping");
                continue;
            };
            report.found += 1;

            let output = transform_invoice(&invoice, message.position);
            for rejection in &output.rejected {
                tracing::warn!(
                    invoice_id = %id,
                    item_index = rejection.item_index,
                    reason = %rejection.reason,
                    "Rejected invoice item"
                );
            }
            report.rejected_items += output.rejected.len();
            rows.extend(output.rows);
        }

        Ok(rows)
    }
}
