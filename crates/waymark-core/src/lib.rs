//! # Waymark Core
//!
//! Pure primitives for Waymark: signed naming records, validity policies,
//! and canonicalization.
//!
//! This crate contains no I/O, no routing, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`SignedRecord`] - A signed, versioned name→value binding
//! - [`RecordPath`] - The typed routing key a record is published under
//! - [`RangeValidity`] - Time-window currency policy and its selection order
//! - [`EolValidity`] - End-of-life currency policy
//!
//! ## Canonicalization
//!
//! Records are encoded using deterministic CBOR. See [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod path;
pub mod record;
pub mod validity;

pub use canonical::{decode_record, encode_record};
pub use crypto::{Blake3Hash, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CoreError, ValidityError};
pub use path::RecordPath;
pub use record::{signing_bytes, SignedRecord, ValidityType, VerificationType};
pub use validity::{EolValidity, RangeValidity};
