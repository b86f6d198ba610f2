//! Certificate: an owned trust-anchor document.
//!
//! Created off-system, published once, fetched many times, never deleted
//! by this layer. Canonical CBOR encoding gives every certificate a
//! stable content hash, which doubles as its routing key and as the
//! verification payload of certificate-backed records.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

use waymark_core::canonical::encode_canonical;
use waymark_core::{Blake3Hash, Ed25519PublicKey};

use crate::error::TrustError;

/// Namespace prefix for certificates in the routing keyspace.
pub const CERT_PREFIX: &str = "/cert/";

/// Certificate field keys (integer keys for compact encoding).
mod keys {
    pub const SUBJECT: u64 = 0;
    pub const PUBLIC_KEY: u64 = 1;
    pub const NOT_BEFORE: u64 = 2;
    pub const NOT_AFTER: u64 = 3;
}

/// A trust-anchor certificate.
///
/// The window bounds are required: a certificate always has a lifetime,
/// unlike a record's validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Human-readable subject label.
    pub subject: String,

    /// The key records signed under this certificate must verify against.
    pub public_key: Ed25519PublicKey,

    /// Start of the certificate's own validity window (Unix ms, inclusive).
    pub not_before: i64,

    /// End of the certificate's own validity window (Unix ms, inclusive).
    pub not_after: i64,
}

impl Certificate {
    /// Canonically encode the certificate.
    pub fn encode(&self) -> Vec<u8> {
        let entries = vec![
            (
                Value::Integer(keys::SUBJECT.into()),
                Value::Text(self.subject.clone()),
            ),
            (
                Value::Integer(keys::PUBLIC_KEY.into()),
                Value::Bytes(self.public_key.as_bytes().to_vec()),
            ),
            (
                Value::Integer(keys::NOT_BEFORE.into()),
                Value::Integer(self.not_before.into()),
            ),
            (
                Value::Integer(keys::NOT_AFTER.into()),
                Value::Integer(self.not_after.into()),
            ),
        ];
        encode_canonical(&Value::Map(entries))
    }

    /// Decode a certificate from its canonical bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, TrustError> {
        let cursor = std::io::Cursor::new(bytes);
        let value: Value =
            ciborium::from_reader(cursor).map_err(|e| TrustError::Decode(e.to_string()))?;

        let map = match &value {
            Value::Map(m) => m,
            _ => return Err(TrustError::Decode("expected map".into())),
        };

        let get = |key: u64| -> Option<&Value> {
            map.iter()
                .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
                .map(|(_, v)| v)
        };

        let subject = match get(keys::SUBJECT) {
            Some(Value::Text(s)) => s.clone(),
            _ => return Err(TrustError::Decode("missing subject".into())),
        };

        let public_key = match get(keys::PUBLIC_KEY) {
            Some(Value::Bytes(b)) if b.len() == 32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(b);
                Ed25519PublicKey(arr)
            }
            _ => return Err(TrustError::Decode("invalid public key".into())),
        };

        let instant = |key: u64, name: &str| -> Result<i64, TrustError> {
            match get(key) {
                Some(Value::Integer(i)) => i64::try_from(i128::from(*i))
                    .map_err(|_| TrustError::Decode(format!("{} out of range", name))),
                _ => Err(TrustError::Decode(format!("missing {}", name))),
            }
        };

        Ok(Self {
            subject,
            public_key,
            not_before: instant(keys::NOT_BEFORE, "not_before")?,
            not_after: instant(keys::NOT_AFTER, "not_after")?,
        })
    }

    /// Content hash of the canonical encoding.
    pub fn content_hash(&self) -> CertHash {
        CertHash(Blake3Hash::hash(&self.encode()))
    }

    /// Check the certificate's own validity window at `now`.
    ///
    /// This is a property of the certificate, independent of and in
    /// addition to any record-level window: a record can be time-valid
    /// while its signing certificate has separately lapsed.
    pub fn check_window(&self, now: i64) -> Result<(), TrustError> {
        if now < self.not_before {
            return Err(TrustError::CertificateNotYetValid);
        }
        if now > self.not_after {
            return Err(TrustError::CertificateExpired);
        }
        Ok(())
    }
}

/// The content address of a certificate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertHash(pub Blake3Hash);

impl CertHash {
    /// Parse and validate a hash string.
    ///
    /// Fails with [`TrustError::BadHash`] on anything that is not 64
    /// lowercase hex characters; this is the fail-fast syntax check that
    /// runs before any network call.
    pub fn parse(s: &str) -> Result<Self, TrustError> {
        if s.len() != 64 || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(TrustError::BadHash(s.to_string()));
        }
        let hash = Blake3Hash::from_hex(s).map_err(|_| TrustError::BadHash(s.to_string()))?;
        Ok(Self(hash))
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// The routing key this hash maps to.
    pub fn routing_key(&self) -> String {
        format!("{}{}", CERT_PREFIX, self.to_hex())
    }
}

impl fmt::Debug for CertHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CertHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for CertHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark_core::Keypair;

    fn make_cert() -> Certificate {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        Certificate {
            subject: "records.example".into(),
            public_key: keypair.public_key(),
            not_before: 1_000_000_000,
            not_after: 2_000_000_000,
        }
    }

    #[test]
    fn test_encode_roundtrip() {
        let cert = make_cert();
        let bytes = cert.encode();
        let decoded = Certificate::decode(&bytes).unwrap();
        assert_eq!(cert, decoded);

        // Canonical: re-encoding reproduces the bytes exactly
        assert_eq!(bytes, decoded.encode());
    }

    #[test]
    fn test_content_hash_stable() {
        let cert = make_cert();
        assert_eq!(cert.content_hash(), cert.content_hash());

        let mut other = make_cert();
        other.subject = "other.example".into();
        assert_ne!(cert.content_hash(), other.content_hash());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Certificate::decode(b"not a certificate").is_err());
        assert!(Certificate::decode(&[]).is_err());
    }

    #[test]
    fn test_check_window() {
        let cert = make_cert();

        assert!(cert.check_window(1_500_000_000).is_ok());
        // Bounds are inclusive
        assert!(cert.check_window(cert.not_before).is_ok());
        assert!(cert.check_window(cert.not_after).is_ok());

        assert!(matches!(
            cert.check_window(cert.not_before - 1),
            Err(TrustError::CertificateNotYetValid)
        ));
        assert!(matches!(
            cert.check_window(cert.not_after + 1),
            Err(TrustError::CertificateExpired)
        ));
    }

    #[test]
    fn test_cert_hash_parse() {
        let cert = make_cert();
        let hex = cert.content_hash().to_hex();
        let parsed = CertHash::parse(&hex).unwrap();
        assert_eq!(parsed, cert.content_hash());

        assert!(matches!(
            CertHash::parse("short"),
            Err(TrustError::BadHash(_))
        ));
        assert!(CertHash::parse(&"z".repeat(64)).is_err());
        assert!(CertHash::parse(&hex.to_uppercase()).is_err());
    }

    #[test]
    fn test_routing_key() {
        let cert = make_cert();
        let key = cert.content_hash().routing_key();
        assert!(key.starts_with("/cert/"));
        assert_eq!(key.len(), CERT_PREFIX.len() + 64);
    }
}
