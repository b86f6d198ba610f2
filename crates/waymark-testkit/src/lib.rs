//! # Waymark Testkit
//!
//! Testing utilities for Waymark.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: helper structs for setting up publish/verify scenarios
//! - **Generators**: proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use waymark_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([7; 32]);
//! let entry = fixture.make_range_record(1, None, None);
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use waymark_testkit::generators;
//!
//! proptest! {
//!     #[test]
//!     fn record_roundtrips(record in generators::range_record()) {
//!         let bytes = waymark_core::encode_record(&record);
//!         prop_assert_eq!(waymark_core::decode_record(&bytes).unwrap(), record);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::TestFixture;
