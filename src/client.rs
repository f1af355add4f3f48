//! Push dispatcher: build the request, submit it, classify the outcome.
//!
//! The HTTP exchange itself is delegated to a shared [`reqwest::Client`]
//! (TLS with ALPN negotiates HTTP/2 against the push service). No retry
//! logic lives here; every [`crate::message::Message`] carries a fresh id,
//! so callers can retry a whole dispatch safely.

use crate::constants::HTTP_REQUEST_TIMEOUT;
use crate::error::RequestError;
use crate::message::Message;
use crate::response::{self, PushResult};

/// Client for submitting push messages.
///
/// Cheap to clone; reuse one instance across dispatches so the
/// underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApnsClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl ApnsClient {
    /// Create a client with the default request timeout.
    pub fn new() -> Result<Self, RequestError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RequestError::Build(e.to_string()))?;
        Ok(Self {
            http,
            base_url: None,
        })
    }

    /// Create a client with a pre-configured HTTP client.
    ///
    /// Useful when custom timeouts or pool settings are needed.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: None,
        }
    }

    /// Redirect all requests to `base_url` instead of the environment
    /// host, e.g. a local mock push service or a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Send a message and classify the service's answer.
    ///
    /// Transport-level failures are part of the returned result, not an
    /// error; `Err` is reserved for requests that could not be built
    /// (token generation, target URL).
    pub async fn send(&self, message: &Message) -> Result<PushResult, RequestError> {
        let request = message.to_request(&self.http, self.base_url.as_deref())?;

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Push transport failure for {}: {e}", message.message_id);
                return Ok(PushResult::Transport(e));
            }
        };
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Push response read failure for {}: {e}", message.message_id);
                return Ok(PushResult::Transport(e));
            }
        };

        let result = response::classify(&body, &message.message_id, &message.device_token);
        match &result {
            PushResult::Success { apns_id, .. } => {
                log::debug!("Push accepted, apns-id {apns_id}");
            }
            PushResult::Rejected {
                apns_id, reason, ..
            } => {
                log::warn!("Push rejected, apns-id {apns_id}: {reason}");
            }
            PushResult::Transport(_) => {}
        }
        Ok(result)
    }

    /// Send a message and return the raw, unclassified response.
    ///
    /// For callers that need full control over response handling; here
    /// transport failures surface as [`RequestError::Transport`].
    pub async fn send_raw(&self, message: &Message) -> Result<reqwest::Response, RequestError> {
        let request = message.to_request(&self.http, self.base_url.as_deref())?;
        self.http.execute(request).await.map_err(RequestError::Transport)
    }
}
