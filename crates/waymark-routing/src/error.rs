//! Error types for the routing capability.

use thiserror::Error;

/// Errors surfaced by a routing value store.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// A store operation's fixed deadline elapsed.
    #[error("store operation timed out")]
    Timeout,

    /// No value stored at the requested key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// Substrate-specific failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Result type for routing operations.
pub type Result<T> = std::result::Result<T, RoutingError>;
