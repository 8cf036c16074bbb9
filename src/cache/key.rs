//! Cache Key Module
//!
//! Composite keys made of a namespace and a request fingerprint.

use std::fmt;

use crate::cache::MAX_NAMESPACE_LENGTH;
use crate::error::{CacheError, Result};

// == Cache Key ==
/// A namespaced cache key.
///
/// Namespace and fingerprint are stored as separate fields, so identical fingerprints
/// in different namespaces are always distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    namespace: String,
    fingerprint: String,
}

impl CacheKey {
    // == Constructor ==
    /// Builds a key, failing fast on an empty or oversized namespace.
    pub fn new(namespace: impl Into<String>, fingerprint: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(CacheError::InvalidKey(
                "namespace must not be empty".to_string(),
            ));
        }
        if namespace.len() > MAX_NAMESPACE_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "namespace exceeds maximum length of {} bytes",
                MAX_NAMESPACE_LENGTH
            )));
        }

        Ok(Self {
            namespace,
            fingerprint: fingerprint.into(),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Short form for log lines.
    pub fn short(&self) -> String {
        let fp: String = self.fingerprint.chars().take(16).collect();
        format!("{}:{}", self.namespace, fp)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.fingerprint)
    }
}
