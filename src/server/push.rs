//! Pub/Sub push envelope decoding

use crate::domain::{BatchMessage, LedgerlineError, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::collections::HashMap;

/// Body of a Pub/Sub push delivery
#[derive(Debug, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,

    #[serde(default)]
    pub subscription: Option<String>,
}

/// The delivered message inside a [`PushEnvelope`]
#[derive(Debug, Deserialize)]
pub struct PushMessage {
    /// Base64 of the batch message JSON
    pub data: String,

    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,

    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl PushEnvelope {
    /// Parse a push request body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body)
            .map_err(|e| LedgerlineError::Validation(format!("Invalid push envelope: {e}")))
    }

    /// Decode the carried [`BatchMessage`]
    pub fn decode(&self) -> Result<BatchMessage> {
        let bytes = general_purpose::STANDARD
            .decode(self.message.data.trim())
            .map_err(|e| LedgerlineError::Validation(format!("Invalid base64 message data: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| LedgerlineError::Validation(format!("Invalid batch message: {e}")))
    }
}
