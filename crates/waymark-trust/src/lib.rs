//! # Waymark Trust
//!
//! Trust-anchor certificates and their content-addressed store.
//!
//! A certificate binds a subject label to an Ed25519 public key within
//! its own validity window. Certificates are keyed by the content hash
//! of their canonical encoding and published under the `/cert/`
//! namespace of the routing keyspace; the same bytes always land at the
//! same key, so publication is idempotent.

pub mod certificate;
pub mod error;
pub mod store;

pub use certificate::{CertHash, Certificate, CERT_PREFIX};
pub use error::{Result, TrustError};
pub use store::CertificateStore;
