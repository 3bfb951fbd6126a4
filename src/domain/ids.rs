//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers Ledgerline passes between the document
//! store, the message bus and object storage. Each type rejects empty values so
//! that a blank id never reaches a query or an object key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Company identifier newtype wrapper
///
/// The document id of a company. This is the identity carried on batch
/// messages and used as a path segment in dataset object keys.
///
/// # Examples
///
/// ```
/// use ledgerline::domain::ids::CompanyId;
/// use std::str::FromStr;
///
/// let company_id = CompanyId::from_str("ACME").unwrap();
/// assert_eq!(company_id.as_str(), "ACME");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanyId(String);

impl CompanyId {
    /// Creates a new CompanyId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(CompanyId)` if the ID is valid, `Err` otherwise. Ids that
    /// contain `/` are rejected because they would change the shape of the
    /// dataset object key.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Company ID cannot be empty".to_string());
        }
        if id.contains('/') {
            return Err(format!("Company ID cannot contain '/': {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the company ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CompanyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CompanyId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CompanyId> for String {
    fn from(id: CompanyId) -> Self {
        id.0
    }
}

/// Invoice identifier newtype wrapper
///
/// Invoice ids are the ordering key of the distribution scan, so the type is
/// `Ord` and compares byte-wise like the backing store does.
///
/// # Examples
///
/// ```
/// use ledgerline::domain::ids::InvoiceId;
///
/// let a = InvoiceId::new("inv-0001").unwrap();
/// let b = InvoiceId::new("inv-0002").unwrap();
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceId(String);

impl InvoiceId {
    /// Creates a new InvoiceId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Invoice ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the invoice ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InvoiceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for InvoiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InvoiceId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InvoiceId> for String {
    fn from(id: InvoiceId) -> Self {
        id.0
    }
}

/// Tax identifier newtype wrapper
///
/// The tax id of a company. Invoices reference their sender and receptor by
/// tax id, so this is the value the distribution filter matches against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    /// Creates a new TaxId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Tax ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the tax ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaxId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TaxId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaxId> for String {
    fn from(id: TaxId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_id_valid() {
        let id = CompanyId::new("ACME").unwrap();
        assert_eq!(id.as_str(), "ACME");
        assert_eq!(id.to_string(), "ACME");
    }

    #[test]
    fn test_company_id_empty() {
        assert!(CompanyId::new("").is_err());
        assert!(CompanyId::new("   ").is_err());
    }

    #[test]
    fn test_company_id_rejects_slash() {
        let result = CompanyId::new("acme/evil");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("'/'"));
    }

    #[test]
    fn test_invoice_id_ordering_is_bytewise() {
        let mut ids = vec![
            InvoiceId::new("b").unwrap(),
            InvoiceId::new("B").unwrap(),
            InvoiceId::new("a10").unwrap(),
            InvoiceId::new("a2").unwrap(),
        ];
        ids.sort();
        let sorted: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        assert_eq!(sorted, vec!["B", "a10", "a2", "b"]);
    }

    #[test]
    fn test_invoice_id_serde_is_transparent() {
        let id = InvoiceId::new("inv-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"inv-1\"");

        let back: InvoiceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_empty_id_rejected_on_deserialize() {
        assert!(serde_json::from_str::<InvoiceId>("\"\"").is_err());
        assert!(serde_json::from_str::<CompanyId>("\" \"").is_err());
    }

    #[test]
    fn test_tax_id_from_str() {
        let tid = TaxId::from_str("76.123.456-7").unwrap();
        assert_eq!(tid.as_str(), "76.123.456-7");
        assert!(TaxId::from_str("").is_err());
    }
}
