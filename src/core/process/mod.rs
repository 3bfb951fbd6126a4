//! Batch processing: batch message in, dataset object out

pub mod processor;
pub mod report;

pub use processor::{BatchProcessor, ProcessorConfig};
pub use report::ProcessReport;
