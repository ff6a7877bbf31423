//! Webhook Delivery
//!
//! Posts the assembled record as a JSON body to a caller-supplied endpoint.
//! One bounded POST, no retries and no authentication handling; non-2xx
//! responses surface as errors instead of being folded into success.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from webhook delivery
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook endpoint returned status {code}")]
    Status { code: u16 },
}

/// Result type for webhook operations
pub type Result<T> = std::result::Result<T, WebhookError>;

/// Blocking JSON webhook client
pub struct WebhookClient {
    url: String,
    client: Client,
}

impl WebhookClient {
    /// Build a client for the given endpoint URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("registrar/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The configured endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `body` to the endpoint
    ///
    /// Errors on transport failure or a non-2xx response status.
    pub fn send(&self, body: &Value) -> Result<()> {
        let response = self.client.post(self.url.as_str()).json(body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status {
                code: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
