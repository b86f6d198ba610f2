//! ValueStore trait: the abstract routing key/value capability.
//!
//! The substrate is opaque. The only guarantee assumed is that a
//! successful `get` after a successful `put`, absent concurrent writers,
//! returns the put value. Retry policy belongs to the substrate or the
//! caller, never to this layer.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, RoutingError};

/// Fixed deadline for each individual store `put` or `get`.
pub const STORE_OP_TIMEOUT: Duration = Duration::from_secs(10);

/// The routing value-store capability.
///
/// Implementations must be thread-safe (Send + Sync). Callers bound each
/// operation with [`with_deadline`]; implementations are not expected to
/// enforce deadlines themselves.
#[async_trait]
pub trait ValueStore: Send + Sync {
    /// Store `value` at `key`.
    async fn put_value(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Fetch the value stored at `key`.
    async fn get_value(&self, key: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: ValueStore + ?Sized> ValueStore for std::sync::Arc<T> {
    async fn put_value(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).put_value(key, value).await
    }

    async fn get_value(&self, key: &str) -> Result<Vec<u8>> {
        (**self).get_value(key).await
    }
}

/// Run a store operation under the fixed per-operation deadline.
///
/// A deadline that elapses surfaces as [`RoutingError::Timeout`], never a
/// silent hang. The deadline applies per operation, independently of any
/// deadline the caller itself is running under.
pub async fn with_deadline<T, F>(op: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(STORE_OP_TIMEOUT, op).await {
        Ok(result) => result,
        Err(_) => Err(RoutingError::Timeout),
    }
}
