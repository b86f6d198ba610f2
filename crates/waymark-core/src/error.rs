//! Error types for Waymark Core.

use thiserror::Error;

/// Core errors that can occur while assembling or decoding records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid record path: {0}")]
    InvalidPath(String),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("unknown validity type: {0}")]
    UnknownValidityType(u16),

    #[error("unknown verification type: {0}")]
    UnknownVerificationType(u16),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),
}

/// Errors raised by validity policies: window construction, currency
/// checks, and candidate selection.
#[derive(Debug, Error)]
pub enum ValidityError {
    /// A bounded window whose end precedes its start. Rejected at
    /// construction, before anything is signed.
    #[error("invalid window: end {end} precedes start {start}")]
    InvalidWindow { start: i64, end: i64 },

    #[error("record is not yet valid")]
    NotYetValid,

    #[error("record has expired")]
    Expired,

    #[error("malformed validity payload: {0}")]
    Malformed(String),

    /// Selection over an empty candidate list.
    #[error("no candidate records to select from")]
    EmptySelection,
}
