//! Classification of push service responses.
//!
//! The service signals success with an empty body; rejections carry a
//! JSON body with a single `reason` field naming one of a fixed error
//! vocabulary. Classification never fails: anything unrecognized maps to
//! [`ErrorReason::Unknown`].

use serde::{Deserialize, Serialize};

/// Rejection reasons reported by the push service, plus the local
/// [`ErrorReason::Unknown`] sentinel for unparseable bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorReason {
    /// The collapse identifier exceeds the maximum allowed size.
    BadCollapseId,
    /// The device token is invalid or not for the requested environment.
    BadDeviceToken,
    /// The `apns-expiration` value is bad.
    BadExpirationDate,
    /// The `apns-id` value is not a valid UUID.
    BadMessageId,
    /// The `apns-priority` value is not 5 or 10.
    BadPriority,
    /// The `apns-topic` value is disallowed.
    BadTopic,
    /// The request path is malformed.
    BadPath,
    /// The certificate is invalid.
    BadCertificate,
    /// The certificate does not match the requested environment.
    BadCertificateEnvironment,
    /// The device token does not match the specified topic.
    DeviceTokenNotForTopic,
    /// A header appeared more than once.
    DuplicateHeaders,
    /// Idle timeout.
    IdleTimeout,
    /// No device token was provided.
    MissingDeviceToken,
    /// No `apns-topic` header was provided when required.
    MissingTopic,
    /// The message payload was empty.
    PayloadEmpty,
    /// The payload exceeds the maximum size.
    PayloadTooLarge,
    /// Pushing to this topic is not allowed.
    TopicDisallowed,
    /// The provider token is expired.
    ExpiredProviderToken,
    /// The action is forbidden.
    Forbidden,
    /// The provider token is invalid.
    InvalidProviderToken,
    /// No provider token was supplied.
    MissingProviderToken,
    /// Only POST is supported.
    MethodNotAllowed,
    /// The device token is no longer active for the topic.
    Unregistered,
    /// Provider token updates are being issued too often.
    TooManyProviderTokenUpdates,
    /// Too many requests for the same device token.
    TooManyRequests,
    /// Internal server error.
    InternalServerError,
    /// The service is unavailable.
    ServiceUnavailable,
    /// The server is shutting down.
    Shutdown,
    /// Local sentinel: the response body did not decode to a known
    /// reason. Never sent by the service.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Error body shape returned by the service on rejection.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    reason: ErrorReason,
}

/// Outcome of a single dispatch, correlated by message id.
#[derive(Debug)]
pub enum PushResult {
    /// The service accepted the notification for delivery.
    Success {
        /// Message id echoed from the request (`apns-id`).
        apns_id: String,
        /// Destination device token.
        device_token: String,
    },
    /// The service rejected the notification with a structured reason.
    Rejected {
        /// Message id echoed from the request (`apns-id`).
        apns_id: String,
        /// Destination device token.
        device_token: String,
        /// Structured rejection reason.
        reason: ErrorReason,
    },
    /// The exchange failed below the protocol (connection, DNS, TLS,
    /// timeout); no service response was available to classify.
    Transport(reqwest::Error),
}

impl PushResult {
    /// Whether the notification was accepted for delivery.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Classify a service response body.
///
/// An empty body means the notification was accepted. Anything else is a
/// rejection; bodies that do not decode to a known reason classify as
/// [`ErrorReason::Unknown`] rather than surfacing a decode error.
pub fn classify(body: &[u8], apns_id: &str, device_token: &str) -> PushResult {
    if body.is_empty() {
        return PushResult::Success {
            apns_id: apns_id.to_string(),
            device_token: device_token.to_string(),
        };
    }

    let reason = match serde_json::from_slice::<ErrorBody>(body) {
        Ok(error) => error.reason,
        Err(_) => ErrorReason::Unknown,
    };
    PushResult::Rejected {
        apns_id: apns_id.to_string(),
        device_token: device_token.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_success() {
        let result = classify(b"", "id-1", "token-1");
        assert!(result.is_success());
        match result {
            PushResult::Success {
                apns_id,
                device_token,
            } => {
                assert_eq!(apns_id, "id-1");
                assert_eq!(device_token, "token-1");
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_known_reason_is_decoded() {
        let result = classify(br#"{"reason":"BadDeviceToken"}"#, "id-1", "token-1");
        match result {
            PushResult::Rejected { reason, .. } => {
                assert_eq!(reason, ErrorReason::BadDeviceToken);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_unrecognized_reason_maps_to_unknown() {
        let result = classify(br#"{"reason":"TotallyUnknownCode"}"#, "id-1", "token-1");
        match result {
            PushResult::Rejected { reason, .. } => assert_eq!(reason, ErrorReason::Unknown),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_body_maps_to_unknown() {
        for body in [&b"not json"[..], br#"{"unexpected":"shape"}"#, b"{"] {
            let result = classify(body, "id-1", "token-1");
            match result {
                PushResult::Rejected { reason, .. } => {
                    assert_eq!(reason, ErrorReason::Unknown);
                }
                other => panic!("expected rejection, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_full_vocabulary_decodes() {
        for name in [
            "BadCollapseId",
            "BadDeviceToken",
            "BadExpirationDate",
            "BadMessageId",
            "BadPriority",
            "BadTopic",
            "BadPath",
            "BadCertificate",
            "BadCertificateEnvironment",
            "DeviceTokenNotForTopic",
            "DuplicateHeaders",
            "IdleTimeout",
            "MissingDeviceToken",
            "MissingTopic",
            "PayloadEmpty",
            "PayloadTooLarge",
            "TopicDisallowed",
            "ExpiredProviderToken",
            "Forbidden",
            "InvalidProviderToken",
            "MissingProviderToken",
            "MethodNotAllowed",
            "Unregistered",
            "TooManyProviderTokenUpdates",
            "TooManyRequests",
            "InternalServerError",
            "ServiceUnavailable",
            "Shutdown",
        ] {
            let body = format!(r#"{{"reason":"{name}"}}"#);
            match classify(body.as_bytes(), "id", "token") {
                PushResult::Rejected { reason, .. } => {
                    assert_ne!(reason, ErrorReason::Unknown, "{name} must be recognized");
                    assert_eq!(reason.to_string(), name);
                }
                other => panic!("expected rejection for {name}, got {other:?}"),
            }
        }
    }
}
