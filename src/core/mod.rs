//! Core business logic for Ledgerline.
//!
//! # Modules
//!
//! - [`distribute`] - Paging verified invoices into batch messages
//! - [`process`] - Turning a batch message into a dataset object
//! - [`transform`] - Invoice to line-item row mapping
//! - [`state`] - Distribution checkpoints for resumable runs
//! - [`checksum`] - Dataset checksums
//!
//! # Workflow
//!
//! 1. **Trigger**: a request names a company and a direction
//! 2. **Distribute**: page through the company's verified invoices, publishing
//!    one message per page with a running batch id
//! 3. **Process**: each message independently fetches its invoices, flattens
//!    them into rows, and writes `{path}/{company}/{position}/dataset/{batch}.json`
//!
//! # Example
//!
//! ```rust,no_run
//! use ledgerline::adapters::bus::MemoryBus;
//! use ledgerline::adapters::memory::MemoryInvoiceStore;
//! use ledgerline::core::distribute::{BatchDistributor, DistributorConfig};
//! use ledgerline::domain::{Company, CompanyId, Direction, TaxId};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let distributor = BatchDistributor::new(
//!     Arc::new(MemoryInvoiceStore::new()),
//!     Arc::new(MemoryBus::new()),
//!     DistributorConfig::default(),
//! );
//!
//! let company = Company {
//!     id: CompanyId::new("ACME")?,
//!     tid: TaxId::new("76.000.000-1")?,
//!     data_path: None,
//! };
//! let summary = distributor.distribute(&company, Direction::In, "datasets").await?;
//! println!("Published {} batches", summary.batches_published);
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod distribute;
pub mod process;
pub mod state;
pub mod transform;
