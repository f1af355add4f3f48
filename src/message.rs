//! Push request construction: target URL, headers, and JSON body.
//!
//! A [`Message`] pairs notification content with a device token, the
//! developer [`Profile`], and per-request delivery options. Each message
//! gets a fresh UUID at construction; the id is sent as the `apns-id`
//! header and echoed in the delivery result, so a whole dispatch can be
//! retried safely by building a new message.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::Url;
use uuid::Uuid;

use crate::constants::{DEVELOPMENT_HOST, PRODUCTION_HOST};
use crate::error::RequestError;
use crate::payload::{Envelope, Payload};
use crate::profile::{Port, Profile};

/// Delivery priority for a push message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Deliver at a time that takes device power into account; messages
    /// may be grouped, throttled, or in some cases dropped.
    EnergyEfficient = 5,
    /// Deliver immediately. Must not be used for content-available-only
    /// pushes.
    Immediate = 10,
}

impl Priority {
    /// Wire value for the `apns-priority` header.
    pub fn code(self) -> &'static str {
        match self {
            Self::EnergyEfficient => "5",
            Self::Immediate => "10",
        }
    }
}

/// Target push service environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live service.
    #[default]
    Production,
    /// Sandbox service for development builds.
    Development,
}

impl Environment {
    /// Push service host for this environment.
    pub fn host(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_HOST,
            Self::Development => DEVELOPMENT_HOST,
        }
    }
}

/// A single push request: content, destination, and delivery options.
#[derive(Debug)]
pub struct Message {
    /// Credentials used to authenticate the request.
    pub profile: Arc<Profile>,
    /// Fresh unique id; sent as `apns-id` and used to correlate results.
    pub message_id: String,
    /// Notification content.
    pub payload: Payload,
    /// Destination device token, placed verbatim in the request path.
    pub device_token: String,
    /// Delivery priority.
    pub priority: Priority,
    /// Production or development service.
    pub environment: Environment,
    /// Coalescing key: notifications sharing it display as one.
    pub collapse_id: Option<String>,
    /// Value for the `thread-id` header.
    pub thread_id: Option<String>,
    /// When the service should stop attempting delivery. Omitted means
    /// "discard if not immediately deliverable".
    pub expiration: Option<DateTime<Utc>>,
}

impl Message {
    /// Create a message with immediate priority targeting production.
    pub fn new(
        profile: Arc<Profile>,
        device_token: impl Into<String>,
        payload: Payload,
    ) -> Self {
        Self {
            profile,
            message_id: Uuid::new_v4().to_string(),
            payload,
            device_token: device_token.into(),
            priority: Priority::Immediate,
            environment: Environment::Production,
            collapse_id: None,
            thread_id: None,
            expiration: None,
        }
    }

    /// Set the delivery priority.
    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Select the target environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the collapse identifier (must not exceed 64 bytes).
    pub fn collapse_id(mut self, collapse_id: impl Into<String>) -> Self {
        self.collapse_id = Some(collapse_id.into());
        self
    }

    /// Set the `thread-id` header value.
    pub fn thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Store-and-forward: keep retrying delivery until this moment.
    pub fn expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Target URL for this message's environment, port, and device token.
    pub fn url(&self) -> Result<Url, RequestError> {
        let host = self.environment.host();
        let base = match self.profile.port {
            Port::Default => format!("https://{host}"),
            Port::Alternative => format!("https://{host}:{}", Port::Alternative.number()),
        };
        self.device_url(&base)
    }

    fn device_url(&self, base: &str) -> Result<Url, RequestError> {
        let raw = format!(
            "{}/3/device/{}",
            base.trim_end_matches('/'),
            self.device_token
        );
        let url =
            Url::parse(&raw).map_err(|e| RequestError::InvalidTargetUrl(format!("{raw}: {e}")))?;
        // The device token must appear verbatim in the path; a token the
        // parser had to escape or split would not address the intended device.
        if url.path() != format!("/3/device/{}", self.device_token) {
            return Err(RequestError::InvalidTargetUrl(raw));
        }
        Ok(url)
    }

    /// Assemble the full HTTP request. May trigger a bearer-token
    /// refresh via the profile.
    pub(crate) fn to_request(
        &self,
        http: &reqwest::Client,
        base_override: Option<&str>,
    ) -> Result<reqwest::Request, RequestError> {
        let url = match base_override {
            Some(base) => self.device_url(base)?,
            None => self.url()?,
        };
        let token = self.profile.current_token()?;

        let mut request = http
            .post(url)
            .header("connection", "Keep-Alive")
            .header("authorization", format!("bearer {token}"))
            .header("apns-id", &self.message_id)
            .header("apns-priority", self.priority.code())
            .header("apns-topic", &self.profile.topic);

        if let Some(expiration) = self.expiration {
            request = request.header("apns-expiration", expiration.timestamp().to_string());
        }
        if let Some(collapse_id) = &self.collapse_id {
            request = request.header("apns-collapse-id", collapse_id);
        }
        if let Some(thread_id) = &self.thread_id {
            request = request.header("thread-id", thread_id);
        }

        request
            .json(&Envelope::new(&self.payload))
            .build()
            .map_err(|e| RequestError::Build(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use p256::elliptic_curve::rand_core::OsRng;
    use p256::pkcs8::{EncodePrivateKey, LineEnding};
    use tempfile::NamedTempFile;

    fn test_profile_on(port: Port) -> Arc<Profile> {
        let secret = p256::SecretKey::random(&mut OsRng);
        let pem = secret.to_pkcs8_pem(LineEnding::LF).expect("encode pkcs8");
        let mut file = NamedTempFile::new().expect("create temp key file");
        file.write_all(pem.as_bytes()).expect("write key file");
        Arc::new(
            Profile::new("com.example.app", "TEAMID9876", "KEYID43210", file.path())
                .expect("profile from temp key")
                .with_port(port),
        )
    }

    fn test_profile() -> Arc<Profile> {
        test_profile_on(Port::Default)
    }

    #[test]
    fn test_development_url() {
        let message = Message::new(test_profile(), "abc123", Payload::new())
            .environment(Environment::Development);
        assert_eq!(
            message.url().expect("url").as_str(),
            "https://api.development.push.apple.com/3/device/abc123"
        );
    }

    #[test]
    fn test_production_url_with_alternative_port() {
        let message = Message::new(test_profile_on(Port::Alternative), "abc123", Payload::new());
        assert_eq!(
            message.url().expect("url").as_str(),
            "https://api.push.apple.com:2197/3/device/abc123"
        );
    }

    #[test]
    fn test_invalid_device_token_is_rejected() {
        let message = Message::new(test_profile(), "abc def", Payload::new());
        let err = message.url().expect_err("space cannot form a valid URL");
        assert!(matches!(err, RequestError::InvalidTargetUrl(_)));
    }

    #[tokio::test]
    async fn test_request_headers_and_body() {
        let http = reqwest::Client::new();
        let expiration = Utc::now() + chrono::Duration::hours(1);
        let message = Message::new(test_profile(), "abc123", Payload::alert("Hi", "There"))
            .priority(Priority::EnergyEfficient)
            .collapse_id("game-update")
            .thread_id("thread-7")
            .expiration(expiration);

        let request = message.to_request(&http, None).expect("build request");
        assert_eq!(request.method().as_str(), "POST");

        let headers = request.headers();
        assert_eq!(headers["apns-topic"], "com.example.app");
        assert_eq!(headers["apns-priority"], "5");
        assert_eq!(headers["apns-id"], message.message_id.as_str());
        assert_eq!(headers["apns-collapse-id"], "game-update");
        assert_eq!(headers["thread-id"], "thread-7");
        assert_eq!(
            headers["apns-expiration"],
            expiration.timestamp().to_string().as_str()
        );
        assert_eq!(headers["connection"], "Keep-Alive");

        let authorization = headers["authorization"].to_str().expect("header text");
        assert!(authorization.starts_with("bearer "));
        assert_eq!(authorization.split('.').count(), 3, "bearer value is a JWT");

        let body = request.body().expect("body").as_bytes().expect("buffered");
        let value: serde_json::Value = serde_json::from_slice(body).expect("body json");
        assert_eq!(value["aps"]["alert"]["title"], "Hi");
        assert_eq!(value["aps"]["alert"]["body"], "There");
    }

    #[tokio::test]
    async fn test_conditional_headers_are_omitted() {
        let http = reqwest::Client::new();
        let message = Message::new(test_profile(), "abc123", Payload::new());

        let request = message.to_request(&http, None).expect("build request");
        let headers = request.headers();
        assert!(headers.get("apns-expiration").is_none());
        assert!(headers.get("apns-collapse-id").is_none());
        assert!(headers.get("thread-id").is_none());
    }

    #[test]
    fn test_each_message_gets_a_fresh_id() {
        let profile = test_profile();
        let first = Message::new(Arc::clone(&profile), "abc123", Payload::new());
        let second = Message::new(profile, "abc123", Payload::new());
        assert_ne!(first.message_id, second.message_id);
    }
}
