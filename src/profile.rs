//! Developer credentials and the bearer-token lifecycle.
//!
//! A [`Profile`] owns the developer identity (team id, key id, topic),
//! the raw key material loaded from disk, and a cached bearer token. The
//! token is an ES256-signed JWT in compact serialization, regenerated
//! transparently once its expiry passes.
//!
//! # Concurrency
//!
//! A profile is shared read-mostly across all in-flight deliveries. The
//! `(token, expiry)` pair is immutable once built and published with a
//! single `Arc` swap under a write lock, so concurrent readers never
//! observe a half-written token. Overlapping regenerations are harmless:
//! any live token is interchangeable with any other.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::constants::TOKEN_LIFETIME_SECS;
use crate::error::{KeyError, TokenError};
use crate::key_material::SigningKeyMaterial;
use crate::signer;

/// The two port options offered by the push service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// Standard HTTPS port 443.
    Default = 443,
    /// Alternative port 2197, e.g. to let push traffic through a
    /// firewall that blocks other HTTPS traffic.
    Alternative = 2197,
}

impl Port {
    /// Numeric port value.
    pub fn number(self) -> u16 {
        self as u16
    }
}

/// JWT header: algorithm tag and key identifier.
#[derive(Serialize)]
struct Header<'a> {
    alg: &'static str,
    kid: &'a str,
}

/// JWT claims: issuer, issued-at, expiration. The push service rejects
/// any other claim.
#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    iat: i64,
    exp: i64,
}

/// An issued bearer token with its expiry. Immutable once built.
struct BearerToken {
    value: String,
    expires_at: DateTime<Utc>,
}

// Token value stays out of debug output.
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Developer credentials for token-based push authentication.
#[derive(Debug)]
pub struct Profile {
    /// Remote notification topic, typically the app bundle id.
    pub topic: String,
    /// 10-character team id from the developer account (`iss` claim).
    pub team_id: String,
    /// 10-character key id from the developer account (`kid` header).
    pub key_id: String,
    /// Path the key material was loaded from.
    pub key_path: PathBuf,
    /// Port used when building target URLs.
    pub port: Port,
    keys: SigningKeyMaterial,
    token: RwLock<Option<Arc<BearerToken>>>,
}

impl Profile {
    /// Create a profile, loading key material from `key_path`.
    ///
    /// Fails immediately if the file is absent or not an EC private key;
    /// the first bearer token is generated lazily on first use.
    pub fn new(
        topic: impl Into<String>,
        team_id: impl Into<String>,
        key_id: impl Into<String>,
        key_path: impl AsRef<Path>,
    ) -> Result<Self, KeyError> {
        let key_path = key_path.as_ref().to_path_buf();
        let keys = SigningKeyMaterial::load(&key_path)?;
        Ok(Self {
            topic: topic.into(),
            team_id: team_id.into(),
            key_id: key_id.into(),
            key_path,
            port: Port::Default,
            keys,
            token: RwLock::new(None),
        })
    }

    /// Select the push service port.
    pub fn with_port(mut self, port: Port) -> Self {
        self.port = port;
        self
    }

    /// Return a currently valid bearer token, regenerating if the cached
    /// one has expired.
    ///
    /// While the cached token is valid this is idempotent and
    /// side-effect-free; two calls inside the lifetime window return
    /// byte-identical tokens.
    pub fn current_token(&self) -> Result<String, TokenError> {
        let now = Utc::now();
        if let Some(token) = self.cached(now) {
            return Ok(token);
        }
        self.regenerate(now)
    }

    fn cached(&self, now: DateTime<Utc>) -> Option<String> {
        let guard = self.token.read().expect("token cell poisoned");
        guard
            .as_ref()
            .filter(|token| token.expires_at > now)
            .map(|token| token.value.clone())
    }

    /// Build, sign, and publish a fresh token expiring `now + 3500s`.
    fn regenerate(&self, now: DateTime<Utc>) -> Result<String, TokenError> {
        let expires_at = now + Duration::seconds(TOKEN_LIFETIME_SECS);

        let header = serde_json::to_vec(&Header {
            alg: "ES256",
            kid: &self.key_id,
        })
        .map_err(|e| TokenError::Encoding(e.to_string()))?;
        let claims = serde_json::to_vec(&Claims {
            iss: &self.team_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            BASE64URL.encode(header),
            BASE64URL.encode(claims)
        );
        let signature = signer::sign(self.keys.private_key(), signing_input.as_bytes())?;
        let value = format!("{signing_input}.{}", BASE64URL.encode(signature));

        let fresh = Arc::new(BearerToken {
            value: value.clone(),
            expires_at,
        });
        *self.token.write().expect("token cell poisoned") = Some(fresh);

        log::debug!(
            "Regenerated bearer token for team {} (expires {expires_at})",
            self.team_id
        );
        Ok(value)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Topic {} / Port {} / Key path {} / Key ID {}",
            self.topic,
            self.port.number(),
            self.key_path.display(),
            self.key_id
        )
    }
}
