//! CLI command implementations

pub mod distribute;
pub mod init;
pub mod process;
pub mod serve;
pub mod status;
pub mod validate;

use crate::config::{load_config, LedgerlineConfig};

/// Load configuration, printing the error and returning exit code 2 on failure
pub(crate) fn load_or_report(config_path: &str) -> Result<LedgerlineConfig, i32> {
    load_config(config_path).map_err(|e| {
        tracing::error!(config_path = %config_path, error = %e, "Failed to load configuration");
        eprintln!("❌ Failed to load configuration file: {config_path}");
        eprintln!("   Error: {e}");
        2
    })
}
