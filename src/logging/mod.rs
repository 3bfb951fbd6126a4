//! Logging and observability
//!
//! Structured logging through `tracing`, plus event macros for the
//! distribution and processing milestones so every run logs the same fields.
//!
//! # Example
//!
//! ```no_run
//! use ledgerline::logging::init_logging;
//! use ledgerline::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(company_id = "ACME", "Distribution requested");
//! ```

pub mod structured;

pub use structured::{effective_settings, init_logging, parse_log_level, LoggingGuard};

/// Log the start of a distribution run
///
/// # Example
///
/// ```no_run
/// use ledgerline::log_distribution_start;
/// use ledgerline::domain::{CompanyId, Direction};
///
/// let company_id = CompanyId::new("ACME").unwrap();
/// log_distribution_start!(&company_id, Direction::In, "datasets");
/// ```
#[macro_export]
macro_rules! log_distribution_start {
    ($company_id:expr, $position:expr, $path:expr) => {
        tracing::info!(
            company_id = %$company_id,
            position = %$position,
            path = %$path,
            "Starting distribution"
        );
    };
}

/// Log the completion of a distribution run
#[macro_export]
macro_rules! log_distribution_complete {
    ($company_id:expr, $position:expr, $batches:expr, $invoices:expr, $duration:expr) => {
        tracing::info!(
            company_id = %$company_id,
            position = %$position,
            batches = $batches,
            invoices = $invoices,
            duration_ms = $duration.as_millis() as u64,
            "Distribution completed"
        );
    };
}

/// Log one published batch message
///
/// # Example
///
/// ```no_run
/// use ledgerline::log_batch_published;
///
/// log_batch_published!(0u64, 250usize, "msg-1");
/// ```
#[macro_export]
macro_rules! log_batch_published {
    ($batch_id:expr, $count:expr, $message_id:expr) => {
        tracing::debug!(
            batch_id = $batch_id,
            invoices = $count,
            message_id = %$message_id,
            "Batch published"
        );
    };
}

/// Log one written dataset object
#[macro_export]
macro_rules! log_dataset_written {
    ($key:expr, $rows:expr, $checksum:expr) => {
        tracing::info!(
            key = %$key,
            rows = $rows,
            checksum = %$checksum,
            "Dataset written"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ledgerline::log_error_with_context;
/// use ledgerline::domain::LedgerlineError;
///
/// let error = LedgerlineError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
