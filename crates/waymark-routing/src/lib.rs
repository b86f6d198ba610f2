//! # Waymark Routing
//!
//! The routing value-store capability: the only I/O boundary in the
//! system. An arbitrary distributed key/value substrate with bounded
//! `put`/`get` semantics, consumed through the [`ValueStore`] trait.
//!
//! This crate owns no network transport, peer discovery, or durability;
//! those belong to whichever substrate implements the trait. The
//! in-memory [`MemoryRouter`] exists for tests.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, RoutingError};
pub use memory::MemoryRouter;
pub use traits::{with_deadline, ValueStore, STORE_OP_TIMEOUT};
