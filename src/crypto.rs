//! Hashing and signatures
//!
//! - CHIP: 12-hex SHA-256 fingerprint of salt + normalized profile JSON
//! - QSIG: HMAC-SHA3-256 over the canonical bytes with a salt-derived key
//! - B3: BLAKE3 over the derived key followed by the canonical bytes

use crate::canonical::CanonicalBytes;
use crate::error::HcsError;
use crate::types::NormalizedProfile;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use sha3::Sha3_256;

type HmacSha3 = Hmac<Sha3_256>;

/// Hex length of a CHIP fingerprint (48 bits)
pub const CHIP_LEN: usize = 12;

/// Full-length signatures over a canonical profile, hex encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signatures {
    /// HMAC-SHA3-256, 64 hex chars
    pub qsig: String,
    /// BLAKE3, 64 hex chars
    pub b3: String,
}

/// CHIP of a normalized profile under a salt
pub fn generate_chip(salt: &[u8], normalized: &NormalizedProfile) -> Result<String, HcsError> {
    let json = serde_json::to_vec(normalized)?;
    Ok(salted_chip(salt, &json))
}

/// First 12 hex chars of SHA-256(salt ‖ data)
pub fn salted_chip(salt: &[u8], data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(data);

    let mut chip = hex::encode(hasher.finalize());
    chip.truncate(CHIP_LEN);
    chip
}

/// Compute QSIG and B3 for canonical bytes.
///
/// Fails with [`HcsError::Configuration`] when the secret is empty.
pub fn compute_signatures(
    canonical: &CanonicalBytes,
    secret: &[u8],
    salt: &[u8],
) -> Result<Signatures, HcsError> {
    if secret.is_empty() {
        return Err(HcsError::Configuration("secret key must not be empty".into()));
    }

    let derived = hmac_sha3(secret, salt)?;
    let qsig = hmac_sha3(&derived, canonical.as_bytes())?;

    let mut b3 = blake3::Hasher::new();
    b3.update(&derived);
    b3.update(canonical.as_bytes());

    Ok(Signatures {
        qsig: hex::encode(qsig),
        b3: b3.finalize().to_hex().to_string(),
    })
}

fn hmac_sha3(key: &[u8], message: &[u8]) -> Result<Vec<u8>, HcsError> {
    let mut mac = HmacSha3::new_from_slice(key)
        .map_err(|e| HcsError::Configuration(format!("HMAC error: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
