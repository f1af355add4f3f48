//! ES256 signing primitive: ECDSA over P-256 on a SHA-256 digest.
//!
//! Signatures use the fixed-length 64-byte `R || S` encoding required by
//! JWS (each integer big-endian, left-padded to the 32-byte coordinate
//! width). DER/ASN.1 signatures are rejected by the push service's token
//! verifier and are never produced here.

use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::error::SignerError;

/// Fixed signature length for P-256: 32-byte R concatenated with 32-byte S.
pub const SIGNATURE_LENGTH: usize = 64;

/// Sign `message` with a raw 32-byte private scalar.
///
/// Computes the SHA-256 digest of `message`, reconstructs the signing key
/// from the scalar, and signs the digest. The reconstructed key object is
/// discarded after the call.
pub fn sign(private_key: &[u8], message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SignerError> {
    let signing_key = SigningKey::from_slice(private_key)
        .map_err(|e| SignerError::KeyReconstruction(e.to_string()))?;

    let digest = Sha256::digest(message);
    let signature: Signature = signing_key
        .sign_prehash(&digest)
        .map_err(|e| SignerError::Signing(e.to_string()))?;

    let mut out = [0u8; SIGNATURE_LENGTH];
    out.copy_from_slice(&signature.to_bytes());
    Ok(out)
}

/// Verify a fixed-length `R || S` signature over `message`.
///
/// Returns `Ok(false)` for a well-formed signature that does not match;
/// errors only on a malformed public key or signature encoding.
pub fn verify(public_key: &[u8], signature: &[u8], message: &[u8]) -> Result<bool, SignerError> {
    let verifying_key = VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| SignerError::KeyReconstruction(e.to_string()))?;

    if signature.len() != SIGNATURE_LENGTH {
        return Err(SignerError::MalformedSignature(format!(
            "expected {SIGNATURE_LENGTH} bytes, got {}",
            signature.len()
        )));
    }
    let signature = Signature::from_slice(signature)
        .map_err(|e| SignerError::MalformedSignature(e.to_string()))?;

    let digest = Sha256::digest(message);
    Ok(verifying_key.verify_prehash(&digest, &signature).is_ok())
}
