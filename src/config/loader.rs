//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{LedgerlineConfig, MemoryStoreConfig, PostgreSQLConfig};
use super::secret::secret_string;
use crate::domain::errors::LedgerlineError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "LEDGERLINE_CONFIG";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into LedgerlineConfig
/// 4. Applies environment variable overrides (LEDGERLINE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`LedgerlineError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, the TOML doesn't parse, an
/// override has an invalid value, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ledgerline::config::loader::load_config;
///
/// let config = load_config("ledgerline.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LedgerlineConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LedgerlineError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LedgerlineError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn load_config_from_str(contents: &str) -> Result<LedgerlineConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: LedgerlineConfig = toml::from_str(&contents)
        .map_err(|e| LedgerlineError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        LedgerlineError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported at
/// once.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LedgerlineError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LedgerlineError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        LedgerlineError::Configuration(format!("Invalid value for {name} ('{value}'): {e}"))
    })
}

/// Applies environment variable overrides using the LEDGERLINE_* prefix
///
/// Variables follow the pattern LEDGERLINE_<SECTION>_<KEY>, for example
/// LEDGERLINE_DISTRIBUTION_PAGE_SIZE or LEDGERLINE_PUBSUB_TOPIC.
fn apply_env_overrides(config: &mut LedgerlineConfig) -> Result<()> {
    if let Some(val) = env_var("LEDGERLINE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env_var("LEDGERLINE_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("LEDGERLINE_APPLICATION_DRY_RUN", &val)?;
    }
    if let Some(val) = env_var("LEDGERLINE_ENVIRONMENT") {
        config.environment = toml::Value::String(val.to_lowercase())
            .try_into()
            .map_err(|e| {
                LedgerlineError::Configuration(format!(
                    "Invalid value for LEDGERLINE_ENVIRONMENT ('{val}'): {e}"
                ))
            })?;
    }

    // Targets
    if let Some(val) = env_var("LEDGERLINE_STORE_TARGET") {
        config.store_target = parse_env("LEDGERLINE_STORE_TARGET", &val)?;
    }
    if let Some(val) = env_var("LEDGERLINE_BUS_TARGET") {
        config.bus_target = parse_env("LEDGERLINE_BUS_TARGET", &val)?;
    }
    if let Some(val) = env_var("LEDGERLINE_BLOB_TARGET") {
        config.blob_target = parse_env("LEDGERLINE_BLOB_TARGET", &val)?;
    }

    if let Some(val) = env_var("LEDGERLINE_SERVER_BIND_ADDRESS") {
        config.server.bind_address = val;
    }

    // Distribution overrides
    if let Some(val) = env_var("LEDGERLINE_DISTRIBUTION_PAGE_SIZE") {
        config.distribution.page_size = parse_env("LEDGERLINE_DISTRIBUTION_PAGE_SIZE", &val)?;
    }
    if let Some(val) = env_var("LEDGERLINE_DISTRIBUTION_VERIFIED_STATE") {
        config.distribution.verified_state = val;
    }
    if let Some(val) = env_var("LEDGERLINE_DISTRIBUTION_DEFAULT_PATH") {
        config.distribution.default_path = val;
    }

    if let Some(val) = env_var("LEDGERLINE_PROCESSING_NACK_ON_FAILURE") {
        config.processing.nack_on_failure =
            parse_env("LEDGERLINE_PROCESSING_NACK_ON_FAILURE", &val)?;
    }

    // PostgreSQL: a connection string alone is enough to create the section
    if let Some(val) = env_var("LEDGERLINE_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                let section = format!("connection_string = {}", toml::Value::String(val));
                let pg: PostgreSQLConfig = toml::from_str(&section).map_err(|e| {
                    LedgerlineError::Configuration(format!(
                        "Invalid LEDGERLINE_POSTGRESQL_CONNECTION_STRING: {e}"
                    ))
                })?;
                config.postgresql = Some(pg);
            }
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Some(val) = env_var("LEDGERLINE_POSTGRESQL_MAX_CONNECTIONS") {
            pg.max_connections = parse_env("LEDGERLINE_POSTGRESQL_MAX_CONNECTIONS", &val)?;
        }
        if let Some(val) = env_var("LEDGERLINE_POSTGRESQL_SSL_MODE") {
            pg.ssl_mode = val;
        }
    }

    if let Some(val) = env_var("LEDGERLINE_MEMORY_SEED_FILE") {
        config
            .memory
            .get_or_insert_with(MemoryStoreConfig::default)
            .seed_file = Some(val);
    }

    // Pub/Sub overrides
    let pubsub_vars = [
        "LEDGERLINE_PUBSUB_ENDPOINT",
        "LEDGERLINE_PUBSUB_PROJECT_ID",
        "LEDGERLINE_PUBSUB_TOPIC",
        "LEDGERLINE_PUBSUB_ACCESS_TOKEN",
        "LEDGERLINE_PUBSUB_USE_DEFAULT_CREDENTIALS",
    ];
    if pubsub_vars.iter().any(|name| env_var(name).is_some()) {
        let pubsub = config.pubsub.get_or_insert_with(Default::default);
        if let Some(val) = env_var("LEDGERLINE_PUBSUB_ENDPOINT") {
            pubsub.endpoint = val;
        }
        if let Some(val) = env_var("LEDGERLINE_PUBSUB_PROJECT_ID") {
            pubsub.project_id = val;
        }
        if let Some(val) = env_var("LEDGERLINE_PUBSUB_TOPIC") {
            pubsub.topic = val;
        }
        if let Some(val) = env_var("LEDGERLINE_PUBSUB_ACCESS_TOKEN") {
            pubsub.access_token = Some(secret_string(val));
        }
        if let Some(val) = env_var("LEDGERLINE_PUBSUB_USE_DEFAULT_CREDENTIALS") {
            pubsub.use_default_credentials =
                parse_env("LEDGERLINE_PUBSUB_USE_DEFAULT_CREDENTIALS", &val)?;
        }
    }

    // Storage overrides
    if let Some(val) = env_var("LEDGERLINE_GCS_BUCKET") {
        match config.gcs {
            Some(ref mut gcs) => gcs.bucket = val,
            None => {
                config.gcs = Some(super::schema::GcsConfig {
                    bucket: val,
                    service_account_path: None,
                })
            }
        }
    }
    if let Some(val) = env_var("LEDGERLINE_GCS_SERVICE_ACCOUNT_PATH") {
        if let Some(ref mut gcs) = config.gcs {
            gcs.service_account_path = Some(val);
        }
    }
    if let Some(val) = env_var("LEDGERLINE_LOCAL_STORAGE_ROOT") {
        config.local_storage.get_or_insert_with(Default::default).root = val;
    }

    if let Some(val) = env_var("LEDGERLINE_STATE_ENABLE_CHECKPOINTING") {
        config.state.enable_checkpointing =
            parse_env("LEDGERLINE_STATE_ENABLE_CHECKPOINTING", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_var("LEDGERLINE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("LEDGERLINE_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_var("LEDGERLINE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_var("LEDGERLINE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
