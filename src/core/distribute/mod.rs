//! Batch distribution: verified invoices in, one bus message per page out

pub mod distributor;
pub mod summary;

pub use distributor::{
    BatchDistributor, DistributorConfig, DEFAULT_PAGE_SIZE, DEFAULT_VERIFIED_STATE,
};
pub use summary::DistributionSummary;
