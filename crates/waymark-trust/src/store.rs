//! Content-addressed certificate persistence over the routing capability.
//!
//! No caching: every get is a fresh fetch. Freshness and consistency are
//! delegated entirely to the routing layer, and nothing is retried here.

use tracing::{debug, warn};

use waymark_routing::{with_deadline, ValueStore};

use crate::certificate::{CertHash, Certificate};
use crate::error::Result;

/// Publishes and fetches certificates by content hash.
pub struct CertificateStore<R: ValueStore> {
    routing: R,
}

impl<R: ValueStore> CertificateStore<R> {
    /// Create a store over the given routing capability.
    pub fn new(routing: R) -> Self {
        Self { routing }
    }

    /// Publish a certificate, returning its content hash.
    ///
    /// Idempotent: the same bytes always land at the same key.
    pub async fn put(&self, cert: &Certificate) -> Result<CertHash> {
        let bytes = cert.encode();
        let hash = cert.content_hash();
        let key = hash.routing_key();
        debug!(key = %key, "storing certificate");

        if let Err(e) = with_deadline(self.routing.put_value(&key, &bytes)).await {
            warn!(key = %key, error = %e, "failed to store certificate");
            return Err(e.into());
        }
        Ok(hash)
    }

    /// Fetch a certificate by its content hash.
    ///
    /// The hash's syntax is validated before any network call is issued;
    /// a malformed hash fails fast without a wasted round trip.
    pub async fn get(&self, cert_hash: &str) -> Result<Certificate> {
        let hash = CertHash::parse(cert_hash)?;

        let key = hash.routing_key();
        debug!(key = %key, "fetching certificate");

        let bytes = match with_deadline(self.routing.get_value(&key)).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to fetch certificate");
                return Err(e.into());
            }
        };

        Certificate::decode(&bytes)
    }
}
