//! PostgreSQL row models
//!
//! Row shapes for the `invoices`, `companies` and `distribution_checkpoints`
//! tables, with conversions to the domain types.

use crate::core::state::checkpoint::DistributionCheckpoint;
use crate::domain::ids::{CompanyId, TaxId};
use crate::domain::{Company, Invoice, LedgerlineError, Result, StoreError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio_postgres::Row;

/// Row of the `invoices` table
#[derive(Debug, Clone)]
pub struct PostgreSQLInvoice {
    pub id: String,
    pub document: Value,
}

impl PostgreSQLInvoice {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            document: row.get("document"),
        }
    }

    /// Decode the JSONB document; the row id wins over any `id` in the body
    pub fn to_domain(self) -> Result<Invoice> {
        let mut invoice: Invoice =
            serde_json::from_value(self.document).map_err(|e| StoreError::InvalidDocument {
                id: self.id.clone(),
                message: e.to_string(),
            })?;
        invoice.id = self.id;
        Ok(invoice)
    }
}

/// Row of the `companies` table
#[derive(Debug, Clone)]
pub struct PostgreSQLCompany {
    pub id: String,
    pub tid: String,
    pub data_path: Option<String>,
}

impl PostgreSQLCompany {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            tid: row.get("tid"),
            data_path: row.get("data_path"),
        }
    }

    pub fn to_domain(self) -> Result<Company> {
        let invalid = |message: String| StoreError::InvalidDocument {
            id: self.id.clone(),
            message,
        };
        Ok(Company {
            id: CompanyId::new(self.id.clone()).map_err(invalid)?,
            tid: TaxId::new(self.tid.clone()).map_err(invalid)?,
            data_path: self.data_path,
        })
    }
}

/// Row of the `distribution_checkpoints` table
///
/// The full checkpoint lives in `document`; the other columns duplicate the
/// fields that are filtered or sorted on.
#[derive(Debug, Clone)]
pub struct PostgreSQLCheckpoint {
    pub id: String,
    pub company_id: String,
    pub position: String,
    pub status: String,
    pub document: Value,
    pub updated_at: DateTime<Utc>,
}

impl PostgreSQLCheckpoint {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            company_id: row.get("company_id"),
            position: row.get("position"),
            status: row.get("status"),
            document: row.get("document"),
            updated_at: row.get("updated_at"),
        }
    }

    pub fn from_domain(checkpoint: &DistributionCheckpoint) -> Result<Self> {
        Ok(Self {
            id: checkpoint.id.clone(),
            company_id: checkpoint.company_id.to_string(),
            position: checkpoint.position.to_string(),
            status: checkpoint.status.to_string(),
            document: serde_json::to_value(checkpoint)?,
            updated_at: checkpoint.updated_at,
        })
    }

    pub fn to_domain(self) -> Result<DistributionCheckpoint> {
        serde_json::from_value(self.document).map_err(|e| {
            LedgerlineError::State(format!("Invalid checkpoint document {}: {}", self.id, e))
        })
    }
}
