// Ledgerline - Verified invoice batching and line-item datasets
// Copyright (c) 2025 Ledgerline Contributors
// Licensed under the MIT License

//! # Ledgerline
//!
//! Ledgerline turns a company's verified invoices into line-item datasets in
//! two decoupled stages:
//!
//! 1. **Distribution** pages through the invoices whose accounting state for
//!    one direction (`in` or `out`) is verified, and publishes each page of
//!    invoice ids as a [`domain::BatchMessage`] on the message bus.
//! 2. **Processing** consumes one batch message, fetches its invoices in a
//!    single bulk read, flattens their line items into dataset rows and writes
//!    `{path}/{company_id}/{position}/dataset/{batch_id}.json`.
//!
//! Redelivered batches overwrite the same object, so processing is idempotent.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - HTTP trigger and push endpoints
//! - [`app`] - Wiring of stores, bus, storage and the two stages
//! - [`core`] - Distribution, processing, line-item transform, checkpoints
//! - [`adapters`] - PostgreSQL, Pub/Sub, object storage and in-memory backends
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ledgerline::app::Pipeline;
//! use ledgerline::config::load_config;
//! use ledgerline::domain::{CompanyId, Direction};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerline.toml")?;
//! let pipeline = Pipeline::from_config(config).await?;
//!
//! let company_id = CompanyId::new("ACME")?;
//! if let Some(company) = pipeline.stores.companies.find_company(&company_id).await? {
//!     let summary = pipeline
//!         .distributor
//!         .distribute(&company, Direction::In, "datasets")
//!         .await?;
//!     println!("Published {} batches", summary.batches_published);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], built on
//! [`domain::LedgerlineError`]. The CLI maps errors onto process exit codes with
//! [`app::exit_code_for`].

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
