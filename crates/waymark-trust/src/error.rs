//! Error types for the trust module.

use thiserror::Error;

use waymark_routing::RoutingError;

/// Errors that can occur during certificate operations.
#[derive(Debug, Error)]
pub enum TrustError {
    /// Malformed content-hash input. Checked before any I/O is issued.
    #[error("bad certificate hash: [{0}]")]
    BadHash(String),

    /// Stored bytes did not parse as a certificate.
    #[error("certificate decode error: {0}")]
    Decode(String),

    /// The certificate's own validity window has lapsed. Distinct from
    /// any record-level expiry.
    #[error("certificate has expired")]
    CertificateExpired,

    /// The certificate's own validity window has not opened yet.
    #[error("certificate is not yet valid")]
    CertificateNotYetValid,

    /// Routing failure.
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),
}

/// Result type for trust operations.
pub type Result<T> = std::result::Result<T, TrustError>;
