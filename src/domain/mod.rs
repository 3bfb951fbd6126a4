//! Domain models and types for Ledgerline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CompanyId`], [`InvoiceId`], [`TaxId`])
//! - **Direction-keyed data** ([`Direction`], [`Directional`])
//! - **Documents and rows** ([`Invoice`], [`InvoiceItem`], [`LineItemRow`], [`Company`])
//! - **Bus payload** ([`BatchMessage`])
//! - **Error types** ([`LedgerlineError`], [`StoreError`], [`BusError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers are newtypes so a tax id cannot be passed where a company id is
//! expected:
//!
//! ```rust
//! use ledgerline::domain::{CompanyId, TaxId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let company_id = CompanyId::new("ACME")?;
//! let tax_id = TaxId::new("76.000.000-1")?;
//!
//! // let wrong: CompanyId = tax_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Direction-keyed access
//!
//! ```rust
//! use ledgerline::domain::{Direction, Directional};
//!
//! let states: Directional<&str> = Directional::only(Direction::In, "verified");
//! assert_eq!(states.get(Direction::In), Some(&"verified"));
//! assert_eq!(states.get(Direction::Out), None);
//! ```

pub mod company;
pub mod direction;
pub mod errors;
pub mod ids;
pub mod invoice;
pub mod message;
pub mod result;

// Re-export commonly used types for convenience
pub use company::Company;
pub use direction::{Direction, Directional};
pub use errors::{BusError, LedgerlineError, StoreError};
pub use ids::{CompanyId, InvoiceId, TaxId};
pub use invoice::{Invoice, InvoiceAccounting, InvoiceItem, ItemAccounting, LineItemRow};
pub use message::BatchMessage;
pub use result::Result;
