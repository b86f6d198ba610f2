//! Error types for record assembly, publication, and verification.

use std::fmt;

use thiserror::Error;

use waymark_core::{CoreError, ValidityError};
use waymark_routing::RoutingError;
use waymark_trust::TrustError;

/// Which of the two concurrent publish legs failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishLeg {
    /// The verification policy's trust-data publication (e.g. the
    /// certificate upload).
    TrustData,
    /// The record entry store into routing.
    EntryStore,
}

impl fmt::Display for PublishLeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishLeg::TrustData => write!(f, "trust data"),
            PublishLeg::EntryStore => write!(f, "entry store"),
        }
    }
}

/// Errors that can occur during record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Record model error.
    #[error("record error: {0}")]
    Core(#[from] CoreError),

    /// Validity policy error.
    #[error("validity error: {0}")]
    Validity(#[from] ValidityError),

    /// Certificate error.
    #[error("trust error: {0}")]
    Trust(#[from] TrustError),

    /// Routing error.
    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    /// One of the two concurrent publish legs failed. There is no
    /// rollback: the other leg's outcome is discarded, and the caller
    /// owns repair by retrying the whole publish.
    #[error("publish failed in {leg} leg: {source}")]
    PublishPartialFailure {
        leg: PublishLeg,
        #[source]
        source: Box<RecordError>,
    },
}

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;
