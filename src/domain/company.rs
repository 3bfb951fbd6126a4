//! Company model

use super::ids::{CompanyId, TaxId};
use serde::{Deserialize, Serialize};

/// A company whose invoices are distributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Document id; carried on batch messages and used in dataset keys
    pub id: CompanyId,

    /// Tax id; matched against invoice sender/receptor ids
    pub tid: TaxId,

    /// Per-company destination path, overriding the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
}

impl Company {
    /// Destination path for this company's datasets
    pub fn destination_path<'a>(&'a self, default_path: &'a str) -> &'a str {
        self.data_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(default_path)
    }
}
