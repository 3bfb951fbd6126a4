//! Google Cloud Pub/Sub publisher
//!
//! Publishes through the Pub/Sub REST API
//! (`POST {endpoint}/v1/projects/{project}/topics/{topic}:publish`). The batch
//! message JSON travels base64-encoded in `messages[].data`, which is what push
//! subscriptions hand back to `POST /process`.
//!
//! Each publish asks an [`AccessTokenSource`] for its bearer token. With
//! `use_default_credentials` the source is a `gcp_auth` provider, which
//! discovers application default credentials and refreshes tokens before they
//! expire. A configured `access_token` is sent as is, and with neither the
//! request carries no `Authorization` header (the emulator).

use super::MessageBus;
use crate::config::{PubSubConfig, SecretString};
use crate::domain::{BatchMessage, BusError, LedgerlineError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use gcp_auth::TokenProvider;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// OAuth2 scope for publishing
pub const PUBSUB_SCOPES: &[&str] = &["https://www.googleapis.com/auth/pubsub"];

/// Supplies the bearer token for each publish request
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// A currently valid access token
    async fn access_token(&self) -> Result<String>;
}

/// Fixed token from configuration
struct StaticToken(SecretString);

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.expose_secret().as_ref().to_string())
    }
}

/// Application default credentials; the provider caches and refreshes tokens
struct GoogleCredentials(Arc<dyn TokenProvider>);

#[async_trait]
impl AccessTokenSource for GoogleCredentials {
    async fn access_token(&self) -> Result<String> {
        let token = self.0.token(PUBSUB_SCOPES).await.map_err(|e| {
            BusError::Authentication(format!("Failed to get GCP access token: {e}"))
        })?;
        Ok(token.as_str().to_string())
    }
}

#[derive(Debug, Serialize)]
struct PublishRequest {
    messages: Vec<OutgoingMessage>,
}

#[derive(Debug, Serialize)]
struct OutgoingMessage {
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    message_ids: Vec<String>,
}

/// Pub/Sub REST publisher
///
/// # Example
///
/// ```no_run
/// use ledgerline::adapters::bus::{MessageBus, PubSubBus};
/// use ledgerline::config::PubSubConfig;
///
/// # fn example() -> ledgerline::domain::Result<()> {
/// let config = PubSubConfig {
///     project_id: "my-project".to_string(),
///     topic: "invoice-batches".to_string(),
///     ..Default::default()
/// };
/// let bus = PubSubBus::new(config)?;
/// # Ok(())
/// # }
/// ```
pub struct PubSubBus {
    client: Client,
    publish_url: String,
    config: PubSubConfig,
    credentials: Option<Arc<dyn AccessTokenSource>>,
}

impl PubSubBus {
    /// Create a publisher that sends the configured `access_token`, if any
    ///
    /// Never looks up Google credentials; see [`from_config`](Self::from_config).
    pub fn new(config: PubSubConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                LedgerlineError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let publish_url = format!(
            "{}/v1/projects/{}/topics/{}:publish",
            config.endpoint.trim_end_matches('/'),
            config.project_id,
            config.topic
        );

        let credentials = config
            .access_token
            .clone()
            .map(|token| Arc::new(StaticToken(token)) as Arc<dyn AccessTokenSource>);

        Ok(Self {
            client,
            publish_url,
            config,
            credentials,
        })
    }

    /// Create a publisher, discovering Google credentials when enabled
    ///
    /// A configured `access_token` takes precedence over
    /// `use_default_credentials`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no credentials can be discovered.
    pub async fn from_config(config: PubSubConfig) -> Result<Self> {
        let use_default = config.access_token.is_none() && config.use_default_credentials;
        let bus = Self::new(config)?;
        if !use_default {
            return Ok(bus);
        }

        let provider = gcp_auth::provider().await.map_err(|e| {
            LedgerlineError::Configuration(format!("Failed to initialize GCP credentials: {e}"))
        })?;
        tracing::info!("Using application default credentials for Pub/Sub");
        Ok(bus.with_token_source(Arc::new(GoogleCredentials(provider))))
    }

    /// Replace the token source used for every publish
    pub fn with_token_source(mut self, source: Arc<dyn AccessTokenSource>) -> Self {
        self.credentials = Some(source);
        self
    }

    /// Full URL publish requests are sent to
    pub fn publish_url(&self) -> &str {
        &self.publish_url
    }

    async fn auth_header_value(&self) -> Result<Option<String>> {
        match &self.credentials {
            Some(source) => Ok(Some(format!("Bearer {}", source.access_token().await?))),
            None => Ok(None),
        }
    }
}

/// Encode a batch message as Pub/Sub message data
pub fn encode_message_data(message: &BatchMessage) -> Result<String> {
    let json = serde_json::to_vec(message)?;
    Ok(general_purpose::STANDARD.encode(json))
}

#[async_trait]
impl MessageBus for PubSubBus {
    async fn publish(&self, message: &BatchMessage) -> Result<String> {
        let body = PublishRequest {
            messages: vec![OutgoingMessage {
                data: encode_message_data(message)?,
            }],
        };

        let mut request = self.client.post(&self.publish_url).json(&body);
        if let Some(auth) = self.auth_header_value().await? {
            request = request.header("Authorization", auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BusError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BusError::PublishRejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let parsed: PublishResponse = response
            .json()
            .await
            .map_err(|e| BusError::InvalidResponse(e.to_string()))?;

        let message_id = parsed.message_ids.into_iter().next().ok_or_else(|| {
            BusError::InvalidResponse("publish response carried no messageIds".to_string())
        })?;

        tracing::debug!(
            topic = %self.config.topic,
            message_id = %message_id,
            batch_id = message.batch_id,
            "Published batch message"
        );

        Ok(message_id)
    }

    fn name(&self) -> &str {
        "pubsub"
    }
}
