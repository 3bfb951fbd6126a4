//! Batch message exchanged between distribution and processing
//!
//! The serialized field names are fixed by the consumers already subscribed to
//! the topic, so they are not snake_case throughout.

use super::direction::Direction;
use super::ids::{CompanyId, InvoiceId};
use serde::{Deserialize, Serialize};

/// One page of invoice ids, published once per non-empty page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMessage {
    pub company_id: CompanyId,

    pub position: Direction,

    #[serde(rename = "invoiceIds")]
    pub invoice_ids: Vec<InvoiceId>,

    /// Sequence number of the page within one distribution run, starting at 0
    #[serde(rename = "batchId")]
    pub batch_id: u64,

    /// Destination path prefix for the dataset object
    pub path: String,
}

impl BatchMessage {
    /// Object key of the dataset this batch materializes into
    ///
    /// `{path}/{company_id}/{position}/dataset/{batch_id}.json`. A trailing `/`
    /// on the path is dropped so the key never contains an empty segment.
    pub fn dataset_key(&self) -> String {
        format!(
            "{}/{}/{}/dataset/{}.json",
            self.path.trim_end_matches('/'),
            self.company_id,
            self.position,
            self.batch_id
        )
    }
}
