//! PostgreSQL adapter implementing the store traits
//!
//! One adapter serves the invoice store, the company directory and checkpoint
//! storage over a shared connection pool.

use crate::adapters::database::traits::{CompanyDirectory, InvoiceStore, PageQuery, StateStorage};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::models::{
    PostgreSQLCheckpoint, PostgreSQLCompany, PostgreSQLInvoice,
};
use crate::core::state::checkpoint::DistributionCheckpoint;
use crate::domain::ids::{CompanyId, InvoiceId};
use crate::domain::{Company, Direction, Invoice, LedgerlineError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Build the page query for one direction
///
/// Ids compare with `COLLATE "C"` so the cursor follows byte order no matter
/// the database collation. Field names come from [`PageQuery::tax_id_field`]
/// and [`Direction::as_str`], never from input.
pub(crate) fn page_sql(query: &PageQuery) -> String {
    format!(
        r#"
        SELECT id FROM invoices
        WHERE document->>'{field}' = $1
          AND document->'accounting_specifications'->'{position}'->>'state' = $2
          AND ($3::text IS NULL OR id COLLATE "C" > $3::text)
        ORDER BY id COLLATE "C"
        LIMIT $4
        "#,
        field = query.tax_id_field(),
        position = query.direction.as_str(),
    )
}

/// PostgreSQL implementation of the store traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    pub fn new_with_arc(client: Arc<PostgreSQLClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InvoiceStore for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn query_page(&self, query: &PageQuery) -> Result<Vec<InvoiceId>> {
        if query.limit == 0 {
            return Err(LedgerlineError::Validation(
                "page limit must be greater than 0".to_string(),
            ));
        }

        let after = query.after.as_ref().map(|id| id.as_str());
        let limit = query.limit as i64;

        tracing::debug!(
            position = %query.direction,
            after = ?after,
            limit,
            "Querying invoice page from PostgreSQL"
        );

        let rows = self
            .client
            .query(
                &page_sql(query),
                &[&query.tax_id.as_str(), &query.verified_state, &after, &limit],
            )
            .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                InvoiceId::new(id).map_err(LedgerlineError::Validation)
            })
            .collect()
    }

    async fn get_all(&self, ids: &[InvoiceId]) -> Result<Vec<Option<Invoice>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        let rows = self
            .client
            .query(
                "SELECT id, document FROM invoices WHERE id = ANY($1)",
                &[&keys],
            )
            .await?;

        let mut found = HashMap::with_capacity(rows.len());
        for row in &rows {
            let invoice = PostgreSQLInvoice::from_row(row).to_domain()?;
            found.insert(invoice.id.clone(), invoice);
        }

        tracing::debug!(
            requested = ids.len(),
            found = found.len(),
            "Fetched invoices from PostgreSQL"
        );

        // Request order, one slot per requested id (duplicates included)
        Ok(ids
            .iter()
            .map(|id| found.get(id.as_str()).cloned())
            .collect())
    }
}

#[async_trait]
impl CompanyDirectory for PostgreSQLAdapter {
    async fn find_company(&self, company_id: &CompanyId) -> Result<Option<Company>> {
        let rows = self
            .client
            .query(
                "SELECT id, tid, data_path FROM companies WHERE id = $1",
                &[&company_id.as_str()],
            )
            .await?;

        rows.first()
            .map(|row| PostgreSQLCompany::from_row(row).to_domain())
            .transpose()
    }
}

#[async_trait]
impl StateStorage for PostgreSQLAdapter {
    async fn load_checkpoint(
        &self,
        company_id: &CompanyId,
        position: Direction,
    ) -> Result<Option<DistributionCheckpoint>> {
        let checkpoint_id = DistributionCheckpoint::generate_id(company_id, position);

        tracing::debug!(
            company_id = %company_id,
            position = %position,
            checkpoint_id = %checkpoint_id,
            "Loading checkpoint from PostgreSQL"
        );

        let rows = self
            .client
            .query(
                "SELECT * FROM distribution_checkpoints WHERE id = $1",
                &[&checkpoint_id],
            )
            .await?;

        rows.first()
            .map(|row| PostgreSQLCheckpoint::from_row(row).to_domain())
            .transpose()
    }

    async fn save_checkpoint(&self, checkpoint: &DistributionCheckpoint) -> Result<()> {
        let row = PostgreSQLCheckpoint::from_domain(checkpoint)?;

        self.client
            .execute(
                r#"
                INSERT INTO distribution_checkpoints (
                    id, company_id, position, status, document, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE SET
                    status = EXCLUDED.status,
                    document = EXCLUDED.document,
                    updated_at = EXCLUDED.updated_at
                "#,
                &[
                    &row.id,
                    &row.company_id,
                    &row.position,
                    &row.status,
                    &row.document,
                    &row.updated_at,
                ],
            )
            .await?;

        tracing::debug!(
            checkpoint_id = %row.id,
            status = %row.status,
            "Checkpoint saved to PostgreSQL"
        );

        Ok(())
    }

    async fn get_all_checkpoints(&self) -> Result<Vec<DistributionCheckpoint>> {
        let rows = self
            .client
            .query(
                "SELECT * FROM distribution_checkpoints ORDER BY company_id, position",
                &[],
            )
            .await?;

        rows.iter()
            .map(|row| PostgreSQLCheckpoint::from_row(row).to_domain())
            .collect()
    }
}
