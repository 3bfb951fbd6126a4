//! Data transformation logic
//!
//! Converts invoice documents into flattened line-item rows, one row per
//! invoice item, viewed from a single [`Direction`](crate::domain::Direction).
//! The mapping is pure; callers decide what to do with rejected items.

pub mod line_items;

pub use line_items::{transform_invoice, RejectionReason, RowRejection, TransformOutput};
