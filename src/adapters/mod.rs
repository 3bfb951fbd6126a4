//! External system integrations for Ledgerline.
//!
//! - [`database`] - Store traits (`InvoiceStore`, `CompanyDirectory`, `StateStorage`) and their factory
//! - [`postgresql`] - PostgreSQL implementation of the store traits
//! - [`memory`] - In-memory store implementations
//! - [`bus`] - Message bus trait, Pub/Sub REST publisher and in-memory bus
//! - [`storage`] - Dataset object storage (GCS, local filesystem, memory)
//!
//! Every handle is created once at startup and passed to the components that
//! need it as an `Arc<dyn Trait>`.
//!
//! ```rust,no_run
//! use ledgerline::adapters::bus::create_message_bus;
//! use ledgerline::adapters::database::create_stores;
//! use ledgerline::adapters::storage::DatasetStore;
//! use ledgerline::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerline.toml")?;
//! let stores = create_stores(&config).await?;
//! let bus = create_message_bus(&config).await?;
//! let datasets = DatasetStore::from_config(&config)?;
//! println!("Publishing via {}, writing to {}", bus.bus.name(), datasets.description());
//! # Ok(())
//! # }
//! ```

pub mod bus;
pub mod database;
pub mod memory;
pub mod postgresql;
pub mod storage;
