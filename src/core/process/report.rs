//! Batch processing report

use crate::domain::{CompanyId, Direction};
use std::time::Duration;

/// What one batch message turned into
#[derive(Debug, Clone)]
pub struct ProcessReport {
    pub company_id: CompanyId,
    pub position: Direction,
    pub batch_id: u64,

    /// Invoice ids carried by the message
    pub requested: usize,

    /// Ids the store returned a document for
    pub found: usize,

    /// Ids with no stored document, skipped
    pub missing: usize,

    /// Rows in the dataset
    pub rows: usize,

    /// Items rejected by the transform
    pub rejected_items: usize,

    /// Object key the dataset went to, or would go to
    pub dataset_key: String,

    /// SHA-256 of the dataset body, when one was produced
    pub checksum: Option<String>,

    /// True if an object was written
    pub written: bool,

    pub dry_run: bool,

    pub duration: Duration,
}

impl ProcessReport {
    /// Human-readable one-line summary
    pub fn to_log_line(&self) -> String {
        let outcome = if self.written {
            format!("wrote {}", self.dataset_key)
        } else if self.dry_run && self.rows > 0 {
            format!("dry run, would write {}", self.dataset_key)
        } else {
            "nothing to write".to_string()
        };

        format!(
            "Batch {} for {}/{}: {} requested, {} found, {} missing, {} rows, {} rejected items; {} ({:.2}s)",
            self.batch_id,
            self.company_id,
            self.position,
            self.requested,
            self.found,
            self.missing,
            self.rows,
            self.rejected_items,
            outcome,
            self.duration.as_secs_f64()
        )
    }
}
