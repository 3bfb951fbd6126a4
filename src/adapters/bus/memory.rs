//! In-process message bus
//!
//! Either records published messages for later inspection or forwards each
//! one to a channel, which `serve` drains with a local consumer when no real
//! bus is configured. A forwarding bus keeps nothing, so a long-running
//! server does not accumulate delivered messages.

use super::MessageBus;
use crate::domain::{BatchMessage, BusError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// In-process message bus
#[derive(Debug, Clone, Default)]
pub struct MemoryBus {
    published: Arc<Mutex<Vec<BatchMessage>>>,
    sender: Option<mpsc::UnboundedSender<BatchMessage>>,
    counter: Arc<AtomicU64>,
    fail_after: Option<u64>,
}

impl MemoryBus {
    /// Create a bus that records messages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus that forwards every message to the returned receiver
    ///
    /// Forwarded messages are not recorded.
    pub fn with_consumer() -> (Self, mpsc::UnboundedReceiver<BatchMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let bus = Self {
            sender: Some(sender),
            ..Self::default()
        };
        (bus, receiver)
    }

    /// Accept `count` publishes, then fail every later one
    ///
    /// The counter is shared between clones, so a bus reused across runs keeps
    /// failing until replaced.
    pub fn failing_after(mut self, count: u64) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Messages recorded so far, in publish order
    pub async fn published(&self) -> Vec<BatchMessage> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl MessageBus for MemoryBus {
    async fn publish(&self, message: &BatchMessage) -> Result<String> {
        let attempt = self.counter.fetch_add(1, Ordering::SeqCst);
        if let Some(limit) = self.fail_after {
            if attempt >= limit {
                return Err(BusError::PublishFailed(format!(
                    "memory bus configured to fail after {limit} messages"
                ))
                .into());
            }
        }

        match &self.sender {
            Some(sender) => sender
                .send(message.clone())
                .map_err(|e| BusError::ChannelClosed(e.to_string()))?,
            None => self.published.lock().await.push(message.clone()),
        }

        Ok(format!("memory-{attempt}"))
    }

    fn name(&self) -> &str {
        "memory"
    }
}
