//! Record paths: the routing keys name records are published under.
//!
//! A record path has the shape `/iprs/<hex>` where `<hex>` is the 64-char
//! lowercase hex content hash of the owner's identity material (public key
//! or certificate). Paths are validated at construction so malformed keys
//! never reach the routing layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::crypto::Blake3Hash;
use crate::error::CoreError;

/// Namespace prefix for name records in the routing keyspace.
pub const RECORD_PREFIX: &str = "/iprs/";

/// A validated routing key for a name record.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordPath(String);

impl RecordPath {
    /// Derive the path for an owner identified by a content hash.
    pub fn from_hash(hash: &Blake3Hash) -> Self {
        Self(format!("{}{}", RECORD_PREFIX, hash.to_hex()))
    }

    /// Parse and validate a path string.
    ///
    /// The hash segment must be exactly 64 lowercase hex characters.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let hash = s
            .strip_prefix(RECORD_PREFIX)
            .ok_or_else(|| CoreError::InvalidPath(format!("missing {} prefix: {}", RECORD_PREFIX, s)))?;

        if hash.len() != 64 {
            return Err(CoreError::InvalidPath(format!(
                "hash segment must be 64 hex chars, got {}",
                hash.len()
            )));
        }
        if !hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CoreError::InvalidPath(format!(
                "hash segment is not lowercase hex: {}",
                hash
            )));
        }

        Ok(Self(s.to_string()))
    }

    /// The path as a routing key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RecordPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordPath({})", self.0)
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RecordPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
