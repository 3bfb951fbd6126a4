//! Store abstraction layer
//!
//! Traits for the invoice store, company lookup and checkpoint storage, and a
//! factory that builds them for the configured backend (PostgreSQL or memory).

pub mod factory;
pub mod traits;

pub use factory::{create_stores, StoreHandles};
pub use traits::{CompanyDirectory, InvoiceStore, PageQuery, StateStorage};
