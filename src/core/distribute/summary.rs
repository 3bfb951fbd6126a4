//! Distribution summary and reporting

use crate::domain::{CompanyId, Direction};
use std::time::Duration;

/// Summary of one distribution run
#[derive(Debug, Clone)]
pub struct DistributionSummary {
    pub company_id: CompanyId,
    pub position: Direction,
    pub path: String,

    /// Batch id of the first page this run published
    pub first_batch_id: u64,

    /// Pages published by this run
    pub batches_published: u64,

    /// Invoice ids published by this run
    pub invoices_published: u64,

    /// Set when the run continued from a stored checkpoint
    pub resumed: bool,

    /// Bus message ids, in publish order (empty on dry run)
    pub message_ids: Vec<String>,

    pub dry_run: bool,

    pub duration: Duration,
}

impl DistributionSummary {
    /// Create a new empty summary
    pub fn new(company_id: CompanyId, position: Direction, path: impl Into<String>) -> Self {
        Self {
            company_id,
            position,
            path: path.into(),
            first_batch_id: 0,
            batches_published: 0,
            invoices_published: 0,
            resumed: false,
            message_ids: Vec::new(),
            dry_run: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Record one published page
    pub fn record_batch(&mut self, invoice_count: usize) {
        self.batches_published += 1;
        self.invoices_published += invoice_count as u64;
    }

    /// Batch id the next page would have carried
    pub fn next_batch_id(&self) -> u64 {
        self.first_batch_id + self.batches_published
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Generate a human-readable report
    pub fn to_report(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Distribution Summary ===\n");
        report.push_str(&format!("Company:          {}\n", self.company_id));
        report.push_str(&format!("Position:         {}\n", self.position));
        report.push_str(&format!("Path:             {}\n", self.path));
        report.push_str(&format!("Batches:          {}\n", self.batches_published));
        report.push_str(&format!("Invoices:         {}\n", self.invoices_published));
        if self.batches_published > 0 {
            report.push_str(&format!(
                "Batch ids:        {}..={}\n",
                self.first_batch_id,
                self.next_batch_id() - 1
            ));
        }
        if self.resumed {
            report.push_str("Resumed:          yes\n");
        }
        if self.dry_run {
            report.push_str("Dry run:          nothing was published\n");
        }
        report.push_str(&format!(
            "Duration:         {:.2}s\n",
            self.duration.as_secs_f64()
        ));
        report
    }
}
