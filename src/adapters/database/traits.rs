//! Document store abstraction traits
//!
//! This module defines the traits that document store adapters must implement
//! to work with Ledgerline.

use crate::core::state::checkpoint::DistributionCheckpoint;
use crate::domain::ids::{CompanyId, InvoiceId, TaxId};
use crate::domain::{Company, Direction, Invoice, Result};
use async_trait::async_trait;

/// One page request of the distribution scan
///
/// Matches invoices whose counterparty field for `direction` equals `tax_id`
/// and whose `direction` accounting state equals `verified_state`, ordered by
/// invoice id, strictly after `after`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub tax_id: TaxId,
    pub direction: Direction,
    pub verified_state: String,
    pub after: Option<InvoiceId>,
    pub limit: usize,
}

impl PageQuery {
    /// Invoice field holding the tax id this query filters on
    ///
    /// Purchases are filtered by sender, sales by receptor.
    pub fn tax_id_field(&self) -> &'static str {
        match self.direction {
            Direction::In => "sender_id",
            Direction::Out => "receptor_id",
        }
    }

    /// True if `invoice` belongs to this query's result set, ignoring cursor
    /// and limit
    pub fn matches(&self, invoice: &Invoice) -> bool {
        let party = match self.direction {
            Direction::In => invoice.sender_id.as_deref(),
            Direction::Out => invoice.receptor_id.as_deref(),
        };
        let state = invoice
            .accounting_specifications
            .get(self.direction)
            .and_then(|a| a.state.as_deref());

        party == Some(self.tax_id.as_str()) && state == Some(self.verified_state.as_str())
    }
}

/// Invoice document store
///
/// Read-only from this system's point of view.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Test the store connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Return the ids of the next page of matching invoices, in id order
    ///
    /// An empty vector means the scan is exhausted.
    async fn query_page(&self, query: &PageQuery) -> Result<Vec<InvoiceId>>;

    /// Fetch invoices by id in one bulk read
    ///
    /// The result has one entry per requested id, in request order; `None`
    /// marks an id with no stored document.
    async fn get_all(&self, ids: &[InvoiceId]) -> Result<Vec<Option<Invoice>>>;
}

/// Company lookup
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    /// Resolve a company by id
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if no such company exists.
    async fn find_company(&self, company_id: &CompanyId) -> Result<Option<Company>>;
}

/// State storage trait for distribution checkpoints
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Load a checkpoint from storage
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(DistributionCheckpoint))` if found, `Ok(None)` if not found.
    async fn load_checkpoint(
        &self,
        company_id: &CompanyId,
        position: Direction,
    ) -> Result<Option<DistributionCheckpoint>>;

    /// Save (upsert) a checkpoint
    async fn save_checkpoint(&self, checkpoint: &DistributionCheckpoint) -> Result<()>;

    /// Get all checkpoints from storage
    async fn get_all_checkpoints(&self) -> Result<Vec<DistributionCheckpoint>>;
}
