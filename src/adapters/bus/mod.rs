//! Message bus abstraction
//!
//! Distribution publishes one [`BatchMessage`] per page through a
//! [`MessageBus`]. Delivery is at-least-once: a message may reach the
//! processor more than once, and redelivery overwrites the same dataset key.

pub mod memory;
pub mod pubsub;

pub use memory::MemoryBus;
pub use pubsub::{encode_message_data, AccessTokenSource, PubSubBus};

use crate::config::schema::{BusTarget, LedgerlineConfig};
use crate::domain::{BatchMessage, LedgerlineError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Publisher for batch messages
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publish one message
    ///
    /// # Returns
    ///
    /// Returns the bus-assigned message id.
    async fn publish(&self, message: &BatchMessage) -> Result<String>;

    /// Short name of the bus implementation, for logs
    fn name(&self) -> &str;
}

/// Bus handle built from configuration
pub struct BusHandle {
    pub bus: Arc<dyn MessageBus + Send + Sync>,

    /// Receiving end of the memory bus; `serve` drains it with a local consumer
    pub local_consumer: Option<mpsc::UnboundedReceiver<BatchMessage>>,
}

/// Create the message bus for `config.bus_target`
///
/// # Errors
///
/// Returns a configuration error when the active bus section is missing or
/// Google credentials cannot be discovered.
pub async fn create_message_bus(config: &LedgerlineConfig) -> Result<BusHandle> {
    match config.bus_target {
        BusTarget::PubSub => {
            let pubsub = config.pubsub.clone().ok_or_else(|| {
                LedgerlineError::Configuration(
                    "pubsub configuration is required when bus_target = 'pubsub'".to_string(),
                )
            })?;
            let bus = PubSubBus::from_config(pubsub).await?;
            tracing::info!(url = %bus.publish_url(), "Creating Pub/Sub publisher");
            Ok(BusHandle {
                bus: Arc::new(bus),
                local_consumer: None,
            })
        }
        BusTarget::Memory => {
            tracing::info!("Creating in-memory message bus");
            let (bus, receiver) = MemoryBus::with_consumer();
            Ok(BusHandle {
                bus: Arc::new(bus),
                local_consumer: Some(receiver),
            })
        }
    }
}
