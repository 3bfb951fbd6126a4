//! PostgreSQL integration
//!
//! Invoices and checkpoints are stored as JSONB documents; companies as plain
//! rows. The schema lives in `migrations/001_initial_schema.sql`.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::{PostgreSQLCheckpoint, PostgreSQLCompany, PostgreSQLInvoice};
