//! In-memory adapters
//!
//! Process-local implementations of the store traits, used for local
//! development (`store_target = "memory"`) and throughout the test suite.

pub mod state;
pub mod store;

pub use state::MemoryStateStorage;
pub use store::{MemoryCompanyDirectory, MemoryInvoiceStore, SeedData};
