//! SignedRecord: the signed, versioned name→value binding.
//!
//! A record is immutable once signed. A new version of a name is a new
//! record with a higher sequence number, never an edit.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::crypto::Ed25519Signature;

/// The validity policy family a record's `validity` payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ValidityType {
    /// Single end-of-life instant.
    Eol = 0,
    /// Bounded or half-open time window.
    TimeRange = 1,
}

impl ValidityType {
    /// Convert to u16 for serialization.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Try to parse from u16.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Eol),
            1 => Some(Self::TimeRange),
            _ => None,
        }
    }
}

/// The verification policy family a record's `verification` payload
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum VerificationType {
    /// Raw public key embedded in the record.
    Key = 0,
    /// Content hash of a certificate published separately.
    Cert = 1,
}

impl VerificationType {
    /// Convert to u16 for serialization.
    pub fn to_u16(self) -> u16 {
        self as u16
    }

    /// Try to parse from u16.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Key),
            1 => Some(Self::Cert),
            _ => None,
        }
    }
}

/// A signed, versioned binding from a name to a target value.
///
/// The producer assigns `sequence` monotonically; consumers reduce
/// multiple candidates for the same name to one winner via the validity
/// family's selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRecord {
    /// Monotonic version counter, producer-assigned.
    pub sequence: u64,

    /// Raw bytes of the target path this name points to.
    pub value: Bytes,

    /// The validity policy family of `validity`.
    pub validity_type: ValidityType,

    /// Policy-specific validity payload.
    pub validity: Bytes,

    /// The verification policy family of `verification`.
    pub verification_type: VerificationType,

    /// Policy-specific "who signed this" payload.
    pub verification: Bytes,

    /// Ed25519 signature over [`signing_bytes`].
    pub signature: Ed25519Signature,
}

impl SignedRecord {
    /// The canonical byte sequence this record's signature covers.
    pub fn signing_bytes(&self) -> Vec<u8> {
        signing_bytes(
            &self.value,
            self.validity_type,
            &self.validity,
            self.verification_type,
            &self.verification,
        )
    }
}

/// Construct the canonical signing bytes for a record.
///
/// The concatenation is exactly
/// `value ∥ str(validity_type) ∥ validity ∥ str(verification_type) ∥ verification`
/// where `str(tag)` is the decimal ASCII rendering of the numeric tag and
/// there are no separators. Signer and verifier must reproduce this byte
/// sequence exactly; the field order is part of the wire contract.
pub fn signing_bytes(
    value: &[u8],
    validity_type: ValidityType,
    validity: &[u8],
    verification_type: VerificationType,
    verification: &[u8],
) -> Vec<u8> {
    let vt = validity_type.to_u16().to_string();
    let st = verification_type.to_u16().to_string();

    let mut buf =
        Vec::with_capacity(value.len() + vt.len() + validity.len() + st.len() + verification.len());
    buf.extend_from_slice(value);
    buf.extend_from_slice(vt.as_bytes());
    buf.extend_from_slice(validity);
    buf.extend_from_slice(st.as_bytes());
    buf.extend_from_slice(verification);
    buf
}
