//! Distribution checkpoint model
//!
//! A checkpoint records how far a distribution run for one
//! {company_id, position} pair got: the last invoice id published and the next
//! batch id to use. With checkpointing enabled, a failed run resumes from here
//! instead of re-publishing every batch from the start.

use crate::domain::ids::{CompanyId, InvoiceId};
use crate::domain::Direction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Distribution status enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    /// Distribution is in progress
    InProgress,
    /// Distribution reached an empty page
    Completed,
    /// Distribution stopped on an error
    Failed,
    /// Distribution was never started
    #[default]
    NotStarted,
}

impl std::fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DistributionStatus::InProgress => "in_progress",
            DistributionStatus::Completed => "completed",
            DistributionStatus::Failed => "failed",
            DistributionStatus::NotStarted => "not_started",
        };
        f.write_str(label)
    }
}

/// Checkpoint for one {company_id, position} distribution
///
/// # Examples
///
/// ```
/// use ledgerline::core::state::checkpoint::{CheckpointBuilder, DistributionStatus};
/// use ledgerline::domain::{CompanyId, Direction};
///
/// let checkpoint = CheckpointBuilder::new(CompanyId::new("ACME").unwrap(), Direction::In)
///     .destination_path("datasets")
///     .build();
///
/// assert_eq!(checkpoint.id, "ACME_in");
/// assert_eq!(checkpoint.next_batch_id, 0);
/// assert_eq!(checkpoint.status, DistributionStatus::NotStarted);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionCheckpoint {
    /// Format: "{company_id}_{position}"
    pub id: String,

    pub company_id: CompanyId,

    pub position: Direction,

    /// Path the published batches point at; a run for another path starts fresh
    pub destination_path: String,

    /// Cursor: last invoice id of the last published page
    pub last_invoice_id: Option<InvoiceId>,

    /// Batch id the next published page will carry
    pub next_batch_id: u64,

    pub batches_published: u64,

    pub invoices_published: u64,

    pub started_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub completed_at: Option<DateTime<Utc>>,

    pub status: DistributionStatus,

    /// Error message of the last failed run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl DistributionCheckpoint {
    /// Generate the document ID for a checkpoint
    pub fn generate_id(company_id: &CompanyId, position: Direction) -> String {
        format!("{}_{}", company_id.as_str(), position)
    }

    /// True when a run against `destination_path` should continue from here
    pub fn is_resumable(&self, destination_path: &str) -> bool {
        matches!(
            self.status,
            DistributionStatus::InProgress | DistributionStatus::Failed
        ) && self.destination_path == destination_path
    }

    /// Mark the distribution as started
    pub fn mark_started(&mut self) {
        let now = Utc::now();
        self.started_at = now;
        self.updated_at = now;
        self.completed_at = None;
        self.status = DistributionStatus::InProgress;
        self.last_error = None;
    }

    /// Record a successfully published page
    pub fn record_batch(&mut self, last_invoice_id: InvoiceId, invoice_count: usize) {
        self.last_invoice_id = Some(last_invoice_id);
        self.next_batch_id += 1;
        self.batches_published += 1;
        self.invoices_published += invoice_count as u64;
        self.updated_at = Utc::now();
    }

    /// Mark the distribution as completed
    pub fn mark_completed(&mut self) {
        let now = Utc::now();
        self.completed_at = Some(now);
        self.updated_at = now;
        self.status = DistributionStatus::Completed;
    }

    /// Mark the distribution as failed
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.updated_at = Utc::now();
        self.status = DistributionStatus::Failed;
        self.last_error = Some(error.into());
    }
}

/// Builder for creating DistributionCheckpoint instances
pub struct CheckpointBuilder {
    company_id: CompanyId,
    position: Direction,
    destination_path: String,
    last_invoice_id: Option<InvoiceId>,
    next_batch_id: u64,
    batches_published: u64,
    invoices_published: u64,
    status: DistributionStatus,
}

impl CheckpointBuilder {
    /// Create a new CheckpointBuilder
    pub fn new(company_id: CompanyId, position: Direction) -> Self {
        Self {
            company_id,
            position,
            destination_path: String::new(),
            last_invoice_id: None,
            next_batch_id: 0,
            batches_published: 0,
            invoices_published: 0,
            status: DistributionStatus::NotStarted,
        }
    }

    /// Set the destination path
    pub fn destination_path(mut self, path: impl Into<String>) -> Self {
        self.destination_path = path.into();
        self
    }

    /// Set the cursor
    pub fn last_invoice_id(mut self, id: InvoiceId) -> Self {
        self.last_invoice_id = Some(id);
        self
    }

    /// Set the next batch id
    pub fn next_batch_id(mut self, batch_id: u64) -> Self {
        self.next_batch_id = batch_id;
        self
    }

    /// Set the published counters
    pub fn published(mut self, batches: u64, invoices: u64) -> Self {
        self.batches_published = batches;
        self.invoices_published = invoices;
        self
    }

    /// Set the status
    pub fn status(mut self, status: DistributionStatus) -> Self {
        self.status = status;
        self
    }

    /// Build the DistributionCheckpoint
    pub fn build(self) -> DistributionCheckpoint {
        let now = Utc::now();
        DistributionCheckpoint {
            id: DistributionCheckpoint::generate_id(&self.company_id, self.position),
            company_id: self.company_id,
            position: self.position,
            destination_path: self.destination_path,
            last_invoice_id: self.last_invoice_id,
            next_batch_id: self.next_batch_id,
            batches_published: self.batches_published,
            invoices_published: self.invoices_published,
            started_at: now,
            updated_at: now,
            completed_at: None,
            status: self.status,
            last_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint() -> DistributionCheckpoint {
        CheckpointBuilder::new(CompanyId::new("ACME").unwrap(), Direction::Out)
            .destination_path("datasets")
            .build()
    }

    #[test]
    fn test_generate_id() {
        let id = DistributionCheckpoint::generate_id(&CompanyId::new("ACME").unwrap(), Direction::Out);
        assert_eq!(id, "ACME_out");
    }

    #[test]
    fn test_record_batch_advances_cursor() {
        let mut cp = checkpoint();
        cp.mark_started();
        cp.record_batch(InvoiceId::new("inv-250").unwrap(), 250);
        cp.record_batch(InvoiceId::new("inv-260").unwrap(), 10);

        assert_eq!(cp.next_batch_id, 2);
        assert_eq!(cp.batches_published, 2);
        assert_eq!(cp.invoices_published, 260);
        assert_eq!(cp.last_invoice_id.as_ref().unwrap().as_str(), "inv-260");
        assert_eq!(cp.status, DistributionStatus::InProgress);
    }

    #[test]
    fn test_status_transitions() {
        let mut cp = checkpoint();
        assert!(!cp.is_resumable("datasets"));

        cp.mark_started();
        assert!(cp.is_resumable("datasets"));

        cp.mark_failed("bus unavailable");
        assert!(cp.is_resumable("datasets"));
        assert_eq!(cp.last_error.as_deref(), Some("bus unavailable"));

        cp.mark_completed();
        assert!(!cp.is_resumable("datasets"));
        assert!(cp.completed_at.is_some());
    }

    #[test]
    fn test_not_resumable_for_other_path() {
        let mut cp = checkpoint();
        cp.mark_failed("boom");
        assert!(!cp.is_resumable("elsewhere"));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut cp = checkpoint();
        cp.record_batch(InvoiceId::new("x").unwrap(), 1);

        let json = serde_json::to_value(&cp).unwrap();
        assert_eq!(json["position"], "out");
        assert_eq!(json["status"], "not_started");

        let back: DistributionCheckpoint = serde_json::from_value(json).unwrap();
        assert_eq!(back, cp);
    }
}
