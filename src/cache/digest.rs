//! Request Digest Module
//!
//! Stable fingerprints derived from the logical parameters of an upstream request.
//!
//! Parameters are serialized to canonical JSON (object keys sorted) and hashed with
//! SHA3-256, so field order and formatting never change the resulting key.

use serde::Serialize;
use sha3::{Digest, Sha3_256};

use crate::error::{CacheError, Result};

/// Domain prefix mixed into every fingerprint hash.
const FINGERPRINT_DOMAIN: &[u8] = b"geo_gate/fingerprint/v1";

// == Fingerprint ==
/// Computes the fingerprint of any serializable request parameters.
///
/// # Example
/// ```
/// use geo_gate::cache::fingerprint;
/// use serde_json::json;
///
/// let a = fingerprint(&json!({"from": "a", "to": "b"})).unwrap();
/// let b = fingerprint(&json!({"to": "b", "from": "a"})).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn fingerprint<T: Serialize + ?Sized>(params: &T) -> Result<String> {
    // Round-tripping through Value sorts object keys
    let value =
        serde_json::to_value(params).map_err(|e| CacheError::Serialization(e.to_string()))?;
    let canonical =
        serde_json::to_vec(&value).map_err(|e| CacheError::Serialization(e.to_string()))?;

    let mut hasher = Sha3_256::new();
    hasher.update((FINGERPRINT_DOMAIN.len() as u32).to_le_bytes());
    hasher.update(FINGERPRINT_DOMAIN);
    hasher.update(&canonical);

    Ok(hex::encode(hasher.finalize()))
}

// == Normalize Text ==
/// Lowercases free text and collapses runs of whitespace.
///
/// Used on addresses and place names so "10  Downing St" and "10 downing st" share a key.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
