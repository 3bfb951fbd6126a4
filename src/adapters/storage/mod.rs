//! Dataset object storage
//!
//! Wraps an [`ObjectStore`] (Google Cloud Storage, local filesystem or
//! in-memory) behind the few operations the pipeline needs: write a dataset,
//! read it back, and list what exists under a prefix.

use crate::config::{BlobTarget, LedgerlineConfig};
use crate::domain::{LedgerlineError, Result};
use futures::TryStreamExt;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::sync::Arc;

/// Content type of every dataset object
pub const DATASET_CONTENT_TYPE: &str = "application/json";

/// Handle to the dataset bucket
#[derive(Clone)]
pub struct DatasetStore {
    store: Arc<dyn ObjectStore>,
    /// Local filesystem storage rejects object attributes
    supports_attributes: bool,
    description: String,
}

impl std::fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetStore")
            .field("description", &self.description)
            .finish()
    }
}

impl DatasetStore {
    /// Wrap an arbitrary object store
    pub fn new(store: Arc<dyn ObjectStore>, description: impl Into<String>) -> Self {
        Self {
            store,
            supports_attributes: true,
            description: description.into(),
        }
    }

    /// In-memory store, for tests and dry local runs
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory")
    }

    /// Store rooted at a local directory, created if missing
    pub fn local(root: &str) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let fs = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self {
            store: Arc::new(fs),
            supports_attributes: false,
            description: format!("local:{root}"),
        })
    }

    /// Build the store selected by `blob_target`
    pub fn from_config(config: &LedgerlineConfig) -> Result<Self> {
        match config.blob_target {
            BlobTarget::Gcs => {
                let gcs = config.gcs.as_ref().ok_or_else(|| {
                    LedgerlineError::Configuration(
                        "blob_target is 'gcs' but [gcs] section is missing".to_string(),
                    )
                })?;

                let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(&gcs.bucket);
                if let Some(path) = &gcs.service_account_path {
                    builder = builder.with_service_account_path(path);
                }
                let store = builder.build()?;

                tracing::info!(bucket = %gcs.bucket, "Using Google Cloud Storage for datasets");
                Ok(Self::new(Arc::new(store), format!("gs://{}", gcs.bucket)))
            }
            BlobTarget::Local => {
                let root = config
                    .local_storage
                    .as_ref()
                    .map(|l| l.root.clone())
                    .unwrap_or_else(crate::config::schema::default_local_root);

                tracing::info!(root = %root, "Using local filesystem for datasets");
                Self::local(&root)
            }
            BlobTarget::Memory => {
                tracing::info!("Using in-memory dataset storage");
                Ok(Self::in_memory())
            }
        }
    }

    /// Human-readable location, for logs
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Write a dataset object, replacing any existing object at `key`
    pub async fn put_dataset(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let location = parse_key(key)?;
        let payload = PutPayload::from(body);

        if self.supports_attributes {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, DATASET_CONTENT_TYPE.into());
            let options = PutOptions {
                attributes,
                ..Default::default()
            };
            self.store.put_opts(&location, payload, options).await?;
        } else {
            self.store.put(&location, payload).await?;
        }

        Ok(())
    }

    /// Read a dataset object
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if nothing is stored at `key`.
    pub async fn get_dataset(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let location = parse_key(key)?;
        match self.store.get(&location).await {
            Ok(result) => Ok(Some(result.bytes().await?.to_vec())),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Keys of every object under `prefix`, sorted
    pub async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = parse_key(prefix)?;
        let objects: Vec<_> = self.store.list(Some(&prefix)).try_collect().await?;
        let mut keys: Vec<String> = objects
            .into_iter()
            .map(|meta| meta.location.to_string())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

fn parse_key(key: &str) -> Result<ObjectPath> {
    ObjectPath::parse(key)
        .map_err(|e| LedgerlineError::Storage(format!("Invalid object key '{key}': {e}")))
}
