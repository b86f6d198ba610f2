//! In-memory implementation of the ValueStore trait.
//!
//! This is primarily for testing. It has the same contract as a real
//! routing substrate but keeps everything in a process-local map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, RoutingError};
use crate::traits::ValueStore;

/// In-memory router.
///
/// All data is lost when the router is dropped. Thread-safe via RwLock.
///
/// Two test affordances:
/// - a fail prefix: operations on keys under the prefix fail with a
///   transport error, simulating a broken substrate leg;
/// - a fetch counter, so tests can assert that an operation issued no
///   network call at all.
pub struct MemoryRouter {
    values: RwLock<HashMap<String, Vec<u8>>>,
    fail_prefix: RwLock<Option<String>>,
    fetch_count: AtomicU64,
}

impl MemoryRouter {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            fail_prefix: RwLock::new(None),
            fetch_count: AtomicU64::new(0),
        }
    }

    /// Fail every operation on keys under `prefix` from now on.
    pub fn fail_keys_under(&self, prefix: &str) {
        *self.fail_prefix.write().unwrap() = Some(prefix.to_string());
    }

    /// Number of `get_value` calls issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    fn check_fail(&self, key: &str) -> Result<()> {
        if let Some(prefix) = self.fail_prefix.read().unwrap().as_deref() {
            if key.starts_with(prefix) {
                return Err(RoutingError::Transport(format!(
                    "simulated failure for {}",
                    key
                )));
            }
        }
        Ok(())
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ValueStore for MemoryRouter {
    async fn put_value(&self, key: &str, value: &[u8]) -> Result<()> {
        self.check_fail(key)?;
        let mut values = self.values.write().unwrap();
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get_value(&self, key: &str) -> Result<Vec<u8>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        self.check_fail(key)?;
        let values = self.values.read().unwrap();
        values
            .get(key)
            .cloned()
            .ok_or_else(|| RoutingError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let router = MemoryRouter::new();
        router.put_value("/cert/abc", b"payload").await.unwrap();

        let value = router.get_value("/cert/abc").await.unwrap();
        assert_eq!(value, b"payload");
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let router = MemoryRouter::new();
        assert!(matches!(
            router.get_value("/iprs/missing").await,
            Err(RoutingError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let router = MemoryRouter::new();
        router.put_value("/iprs/k", b"one").await.unwrap();
        router.put_value("/iprs/k", b"two").await.unwrap();
        assert_eq!(router.get_value("/iprs/k").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_fail_prefix() {
        let router = MemoryRouter::new();
        router.put_value("/cert/x", b"ok").await.unwrap();

        router.fail_keys_under("/cert/");
        assert!(router.put_value("/cert/y", b"nope").await.is_err());
        assert!(router.get_value("/cert/x").await.is_err());

        // Other namespaces are unaffected
        router.put_value("/iprs/z", b"fine").await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_count() {
        let router = MemoryRouter::new();
        assert_eq!(router.fetch_count(), 0);

        let _ = router.get_value("/iprs/a").await;
        let _ = router.get_value("/iprs/b").await;
        assert_eq!(router.fetch_count(), 2);
    }
}
