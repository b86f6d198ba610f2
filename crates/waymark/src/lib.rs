//! # Waymark
//!
//! Signed mutable-pointer naming records over a routing value store.
//!
//! ## Overview
//!
//! A name is a stable owner identity; its current target is a signed,
//! versioned [`SignedRecord`] published into an external key/value
//! routing substrate. Records prove their own authenticity (verification
//! policy) and currency (validity policy), and independently-produced
//! candidates for one name reduce deterministically to a single winner.
//!
//! ## Key Concepts
//!
//! - **Record**: a value plus a validity policy and a signer. Versions
//!   are new signed entries, never edits.
//! - **Publish**: trust data and the entry are stored concurrently; a
//!   failed leg surfaces as a partial failure, with no rollback.
//! - **Checker**: per validity family, validates currency and selects
//!   one winner among candidates.
//! - **Verifier**: checks who signed an entry, via an embedded key or a
//!   separately published certificate.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use waymark::{KeySigner, Record};
//! use waymark::core::{Keypair, RangeValidity};
//! use waymark::routing::MemoryRouter;
//!
//! async fn example() {
//!     let keypair = Keypair::generate();
//!     let window = RangeValidity::unbounded();
//!
//!     let record = Record::new(
//!         MemoryRouter::new(),
//!         window,
//!         KeySigner::new(keypair),
//!         b"/data/some/target".to_vec(),
//!     );
//!
//!     let path = record.base_path();
//!     record.publish(&path, 1).await.unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `waymark::core` - Record model, validity policies, canonical encoding
//! - `waymark::routing` - The value-store capability and memory router
//! - `waymark::trust` - Certificates and the certificate store

pub mod checker;
pub mod error;
pub mod reader;
pub mod record;
pub mod signer;
pub mod verifier;

// Re-export component crates
pub use waymark_core as core;
pub use waymark_routing as routing;
pub use waymark_trust as trust;

// Re-export main types for convenience
pub use checker::{checker_for, EolRecordChecker, RangeRecordChecker, RecordChecker};
pub use error::{PublishLeg, RecordError, Result};
pub use reader::fetch_record;
pub use record::{Record, RecordValidity};
pub use signer::{CertSigner, KeySigner, RecordSigner};
pub use verifier::{CertVerifier, KeyVerifier, RecordVerifier};

// Re-export commonly used core types
pub use waymark_core::{
    Ed25519PublicKey, Ed25519Signature, EolValidity, Keypair, RangeValidity, RecordPath,
    SignedRecord, ValidityType, VerificationType,
};
