//! Configuration management for Ledgerline.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `LEDGERLINE_*`
//! environment overrides, defaults for every optional setting, and validation
//! on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ledgerline::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerline.toml")?;
//!
//! println!("Store: {:?}", config.store_target);
//! println!("Page size: {}", config.distribution.page_size);
//! if let Some(pubsub) = &config.pubsub {
//!     println!("Topic: {}", pubsub.topic);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`ServerConfig`] - HTTP listener
//! - [`DistributionConfig`] - Page size, verified state, default path
//! - [`ProcessingConfig`] - Push acknowledgement behaviour
//! - [`PostgreSQLConfig`] / [`MemoryStoreConfig`] - Invoice store
//! - [`PubSubConfig`] - Message bus
//! - [`GcsConfig`] / [`LocalStorageConfig`] - Dataset storage
//! - [`StateConfig`] - Distribution checkpoints
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! store_target = "postgresql"
//! bus_target = "pubsub"
//! blob_target = "gcs"
//!
//! [distribution]
//! page_size = 250
//! default_path = "datasets"
//!
//! [postgresql]
//! connection_string = "${LEDGERLINE_PG_URL}"
//!
//! [pubsub]
//! project_id = "ledger-prod"
//! topic = "invoice-batches"
//! access_token = "${LEDGERLINE_PUBSUB_TOKEN}"
//!
//! [gcs]
//! bucket = "ledger-datasets"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_from_str, CONFIG_PATH_ENV};
pub use schema::{
    ApplicationConfig, BlobTarget, BusTarget, DistributionConfig, Environment, GcsConfig,
    LedgerlineConfig, LocalStorageConfig, LoggingConfig, MemoryStoreConfig, PostgreSQLConfig,
    ProcessingConfig, PubSubConfig, ServerConfig, StateConfig, StoreTarget,
};
pub use secret::{secret_string, SecretString, SecretValue};
