//! Error types for key loading, signing, token generation, and request
//! construction.
//!
//! Remote rejections from the push service are not errors; they are
//! classified into [`crate::response::PushResult`] values. The enums here
//! cover local failures only.

use std::path::PathBuf;

/// Errors raised while loading key material from disk.
#[derive(Debug)]
pub enum KeyError {
    /// The key file path does not resolve to a readable file.
    FileNotFound(PathBuf),
    /// The file contents are not a PEM-encoded EC private key.
    InvalidPem(String),
}

impl std::fmt::Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => {
                write!(f, "Key file not found or unreadable: {}", path.display())
            }
            Self::InvalidPem(msg) => write!(f, "Key file is not a valid EC private key: {msg}"),
        }
    }
}

impl std::error::Error for KeyError {}

/// Errors raised by the ES256 signing primitive.
#[derive(Debug)]
pub enum SignerError {
    /// The raw key bytes could not be reconstructed into a curve key.
    KeyReconstruction(String),
    /// The ECDSA signing operation itself failed.
    Signing(String),
    /// A signature passed to verification is not a well-formed
    /// fixed-length P-256 signature.
    MalformedSignature(String),
}

impl std::fmt::Display for SignerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyReconstruction(msg) => write!(f, "Key reconstruction failed: {msg}"),
            Self::Signing(msg) => write!(f, "Signing failed: {msg}"),
            Self::MalformedSignature(msg) => write!(f, "Malformed signature: {msg}"),
        }
    }
}

impl std::error::Error for SignerError {}

/// Errors raised while generating a bearer token.
#[derive(Debug)]
pub enum TokenError {
    /// ES256 signing of the token failed.
    Signing(SignerError),
    /// The token header or claims could not be encoded.
    Encoding(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Signing(err) => write!(f, "Token signing failed: {err}"),
            Self::Encoding(msg) => write!(f, "Token encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<SignerError> for TokenError {
    fn from(err: SignerError) -> Self {
        Self::Signing(err)
    }
}

/// Errors raised while building or submitting a push request.
#[derive(Debug)]
pub enum RequestError {
    /// The device token and host cannot form a valid target URL.
    InvalidTargetUrl(String),
    /// A valid bearer token could not be produced.
    Token(TokenError),
    /// The request could not be assembled (header or body encoding).
    Build(String),
    /// The underlying HTTP exchange failed before a response was read.
    ///
    /// Only surfaced by [`crate::client::ApnsClient::send_raw`]; the
    /// classifying send folds transport failures into
    /// [`crate::response::PushResult::Transport`].
    Transport(reqwest::Error),
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTargetUrl(msg) => write!(f, "Invalid target URL: {msg}"),
            Self::Token(err) => write!(f, "Token generation failed: {err}"),
            Self::Build(msg) => write!(f, "Request could not be built: {msg}"),
            Self::Transport(err) => write!(f, "Transport failure: {err}"),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<TokenError> for RequestError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}
