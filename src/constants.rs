//! Application-wide constants for apns-push.
//!
//! Centralizes the protocol and timing constants shared across modules.

use std::time::Duration;

/// HTTP client request timeout for push deliveries.
///
/// Applies to each individual exchange with the push service. 10 seconds
/// is generous for a single notification while preventing indefinite
/// hangs on network issues.
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Lifetime of a provider authentication token, in seconds.
///
/// Apple caps provider token age at one hour; 3500 seconds keeps every
/// issued token comfortably inside that ceiling.
pub const TOKEN_LIFETIME_SECS: i64 = 3_500;

/// Production push service host.
pub const PRODUCTION_HOST: &str = "api.push.apple.com";

/// Development (sandbox) push service host.
pub const DEVELOPMENT_HOST: &str = "api.development.push.apple.com";
