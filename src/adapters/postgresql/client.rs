//! PostgreSQL client implementation
//!
//! Connection pooling, schema migration, and timed query helpers shared by the
//! invoice store, the company directory and checkpoint storage.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{LedgerlineError, Result, StoreError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::{NoTls, Row};

/// Initial schema, applied idempotently by [`PostgreSQLClient::run_migrations`]
pub const INITIAL_SCHEMA: &str = include_str!("../../../migrations/001_initial_schema.sql");

/// PostgreSQL client for Ledgerline
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool connects lazily; use [`test_connection`](Self::test_connection)
    /// to check reachability.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string doesn't parse, the TLS
    /// connector can't be built, or the pool can't be created.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let pool = build_pool(&config)?;
        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| StoreError::ConnectionFailed(format!("Connection test failed: {e}")))?;

        tracing::info!(
            database = %self.connection_string_safe(),
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Create tables and indexes if they don't exist
    pub async fn run_migrations(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .batch_execute(INITIAL_SCHEMA)
            .await
            .map_err(|e| StoreError::MigrationFailed(e.to_string()))?;

        tracing::info!("PostgreSQL schema initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            StoreError::ConnectionFailed(format!("Failed to get connection from pool: {e}")).into()
        })
    }

    /// Execute a query with the configured statement timeout and return rows
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;
        self.set_statement_timeout(&client).await?;

        client
            .query(query, params)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()).into())
    }

    /// Execute a statement with the configured statement timeout
    ///
    /// Returns the number of affected rows.
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        let client = self.get_connection().await?;
        self.set_statement_timeout(&client).await?;

        client
            .execute(statement, params)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()).into())
    }

    async fn set_statement_timeout(&self, client: &deadpool_postgres::Object) -> Result<()> {
        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.execute(&timeout_query, &[]).await.map_err(|e| {
            StoreError::QueryFailed(format!("Failed to set statement timeout: {e}"))
        })?;
        Ok(())
    }

    /// Connection target with credentials removed, for logs
    pub fn connection_string_safe(&self) -> String {
        redact_connection_string(self.config.connection_string.expose_secret().as_ref())
    }
}

fn redact_connection_string(conn_str: &str) -> String {
    conn_str
        .rsplit_once('@')
        .map(|(_, host)| format!("postgresql://***@{host}"))
        .unwrap_or_else(|| "postgresql://***".to_string())
}

fn build_pool(config: &PostgreSQLConfig) -> Result<Pool> {
    let mut pg_config: tokio_postgres::Config = config
        .connection_string
        .expose_secret()
        .as_ref()
        .parse()
        .map_err(|e| {
            LedgerlineError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
        })?;

    pg_config.ssl_mode(match config.ssl_mode.as_str() {
        "disable" => SslMode::Disable,
        "require" | "verify-ca" | "verify-full" => SslMode::Require,
        _ => SslMode::Prefer,
    });
    pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };

    let manager = if config.ssl_mode == "disable" {
        Manager::from_config(pg_config, NoTls, manager_config)
    } else {
        let verify_certs = matches!(config.ssl_mode.as_str(), "verify-ca" | "verify-full");
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(!verify_certs)
            .danger_accept_invalid_hostnames(config.ssl_mode != "verify-full")
            .build()
            .map_err(|e| {
                LedgerlineError::Configuration(format!("Failed to build TLS connector: {e}"))
            })?;
        Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
    };

    let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
    Pool::builder(manager)
        .max_size(config.max_connections)
        .runtime(Runtime::Tokio1)
        .wait_timeout(timeout)
        .create_timeout(timeout)
        .recycle_timeout(timeout)
        .build()
        .map_err(|e| {
            StoreError::ConnectionFailed(format!("Failed to create connection pool: {e}")).into()
        })
}
