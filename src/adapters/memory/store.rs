//! In-memory invoice store and company directory
//!
//! Backed by ordered maps so the distribution scan sees invoices in the same
//! byte order a real store would return them in.

use crate::adapters::database::traits::{CompanyDirectory, InvoiceStore, PageQuery};
use crate::domain::ids::{CompanyId, InvoiceId};
use crate::domain::{Company, Invoice, LedgerlineError, Result, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Contents of a seed fixture file
///
/// ```json
/// {
///   "companies": [{"id": "ACME", "tid": "76.000.000-1"}],
///   "invoices": [{"id": "inv-1", "sender_id": "76.000.000-1", "items": []}]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub companies: Vec<Company>,

    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

impl SeedData {
    /// Read a seed fixture from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerlineError::Configuration(format!(
                "Failed to read seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        let seed: SeedData = serde_json::from_str(&content)?;
        Ok(seed)
    }
}

/// In-memory invoice store
#[derive(Debug, Default, Clone)]
pub struct MemoryInvoiceStore {
    invoices: Arc<RwLock<BTreeMap<InvoiceId, Invoice>>>,
    queries: Arc<AtomicUsize>,
}

impl MemoryInvoiceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `invoices`, keyed by their `id` field
    pub fn from_invoices(invoices: impl IntoIterator<Item = Invoice>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for invoice in invoices {
            let id = InvoiceId::new(invoice.id.clone()).map_err(LedgerlineError::Validation)?;
            map.insert(id, invoice);
        }
        Ok(Self {
            invoices: Arc::new(RwLock::new(map)),
            queries: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Insert or replace an invoice
    pub async fn insert(&self, invoice: Invoice) -> Result<()> {
        let id = InvoiceId::new(invoice.id.clone()).map_err(LedgerlineError::Validation)?;
        self.invoices.write().await.insert(id, invoice);
        Ok(())
    }

    /// Number of stored invoices
    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    /// True if no invoices are stored
    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }

    /// Number of page queries served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn query_page(&self, query: &PageQuery) -> Result<Vec<InvoiceId>> {
        if query.limit == 0 {
            return Err(StoreError::QueryFailed("page limit must be positive".to_string()).into());
        }
        self.queries.fetch_add(1, Ordering::SeqCst);

        let lower = match &query.after {
            Some(after) => Bound::Excluded(after.clone()),
            None => Bound::Unbounded,
        };

        let invoices = self.invoices.read().await;
        Ok(invoices
            .range((lower, Bound::Unbounded))
            .filter(|(_, invoice)| query.matches(invoice))
            .take(query.limit)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn get_all(&self, ids: &[InvoiceId]) -> Result<Vec<Option<Invoice>>> {
        let invoices = self.invoices.read().await;
        Ok(ids.iter().map(|id| invoices.get(id).cloned()).collect())
    }
}

/// In-memory company directory
#[derive(Debug, Default, Clone)]
pub struct MemoryCompanyDirectory {
    companies: Arc<RwLock<HashMap<CompanyId, Company>>>,
}

impl MemoryCompanyDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding `companies`
    pub fn from_companies(companies: impl IntoIterator<Item = Company>) -> Self {
        let map = companies
            .into_iter()
            .map(|company| (company.id.clone(), company))
            .collect();
        Self {
            companies: Arc::new(RwLock::new(map)),
        }
    }

    /// Insert or replace a company
    pub async fn insert(&self, company: Company) {
        self.companies
            .write()
            .await
            .insert(company.id.clone(), company);
    }
}

#[async_trait]
impl CompanyDirectory for MemoryCompanyDirectory {
    async fn find_company(&self, company_id: &CompanyId) -> Result<Option<Company>> {
        Ok(self.companies.read().await.get(company_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::TaxId;
    use crate::domain::{Direction, Directional, InvoiceAccounting};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn verified(id: &str, sender: &str) -> Invoice {
        Invoice {
            id: id.to_string(),
            sender_id: Some(sender.to_string()),
            receptor_id: Some("other".to_string()),
            accounting_specifications: Directional::only(
                Direction::In,
                InvoiceAccounting {
                    state: Some("verified".to_string()),
                },
            ),
            ..Default::default()
        }
    }

    fn query(after: Option<&str>, limit: usize) -> PageQuery {
        PageQuery {
            tax_id: TaxId::new("11-1").unwrap(),
            direction: Direction::In,
            verified_state: "verified".to_string(),
            after: after.map(|a| InvoiceId::new(a).unwrap()),
            limit,
        }
    }

    #[tokio::test]
    async fn test_query_page_orders_filters_and_limits() {
        let store = MemoryInvoiceStore::from_invoices(vec![
            verified("c", "11-1"),
            verified("a", "11-1"),
            verified("b", "99-9"),
            verified("d", "11-1"),
        ])
        .unwrap();

        let first = store.query_page(&query(None, 2)).await.unwrap();
        assert_eq!(
            first.iter().map(|i| i.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );

        let second = store.query_page(&query(Some("c"), 2)).await.unwrap();
        assert_eq!(
            second.iter().map(|i| i.as_str()).collect::<Vec<_>>(),
            vec!["d"]
        );

        let third = store.query_page(&query(Some("d"), 2)).await.unwrap();
        assert!(third.is_empty());
        assert_eq!(store.query_count(), 3);
    }

    #[tokio::test]
    async fn test_query_page_rejects_zero_limit() {
        let store = MemoryInvoiceStore::new();
        assert!(store.query_page(&query(None, 0)).await.is_err());
    }

    #[tokio::test]
    async fn test_get_all_keeps_request_order_and_marks_missing() {
        let store =
            MemoryInvoiceStore::from_invoices(vec![verified("a", "x"), verified("b", "x")]).unwrap();

        let ids: Vec<InvoiceId> = ["b", "missing", "a"]
            .iter()
            .map(|id| InvoiceId::new(*id).unwrap())
            .collect();
        let fetched = store.get_all(&ids).await.unwrap();

        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].as_ref().unwrap().id, "b");
        assert!(fetched[1].is_none());
        assert_eq!(fetched[2].as_ref().unwrap().id, "a");
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_id() {
        let store = MemoryInvoiceStore::new();
        assert!(store.insert(Invoice::default()).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_company_directory() {
        let directory = MemoryCompanyDirectory::new();
        directory
            .insert(Company {
                id: CompanyId::new("ACME").unwrap(),
                tid: TaxId::new("11-1").unwrap(),
                data_path: None,
            })
            .await;

        let found = directory
            .find_company(&CompanyId::new("ACME").unwrap())
            .await
            .unwrap();
        assert_eq!(found.unwrap().tid.as_str(), "11-1");

        let missing = directory
            .find_company(&CompanyId::new("NOPE").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_seed_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "companies": [{{"id": "ACME", "tid": "11-1", "data_path": "acme"}}],
                "invoices": [{{"id": "inv-1", "sender_id": "11-1", "receptor_id": "22-2"}}]
            }}"#
        )
        .unwrap();

        let seed = SeedData::from_file(file.path()).unwrap();
        assert_eq!(seed.companies.len(), 1);
        assert_eq!(seed.companies[0].data_path.as_deref(), Some("acme"));
        assert_eq!(seed.invoices[0].id, "inv-1");
    }

    #[test]
    fn test_seed_missing_file() {
        let result = SeedData::from_file("/nonexistent/seed.json");
        assert!(matches!(result, Err(LedgerlineError::Configuration(_))));
    }
}
