//! Record verifiers: the consumer half of a verification policy.

use async_trait::async_trait;

use waymark_core::{CoreError, Ed25519PublicKey, SignedRecord, VerificationType};
use waymark_routing::ValueStore;
use waymark_trust::{CertificateStore, TrustError};

use crate::checker::now_millis;
use crate::error::Result;

/// Verifies who produced a record and that the signature holds.
#[async_trait]
pub trait RecordVerifier: Send + Sync {
    /// Check the record's signature against the identity material its
    /// verification payload names.
    async fn verify_record(&self, entry: &SignedRecord) -> Result<()>;
}

/// Verifies records whose verification payload is an embedded public key.
pub struct KeyVerifier;

#[async_trait]
impl RecordVerifier for KeyVerifier {
    async fn verify_record(&self, entry: &SignedRecord) -> Result<()> {
        if entry.verification_type != VerificationType::Key {
            return Err(CoreError::MalformedRecord(format!(
                "expected key verification, got {:?}",
                entry.verification_type
            ))
            .into());
        }

        let public_key = Ed25519PublicKey::try_from(entry.verification.as_ref())?;
        public_key.verify(&entry.signing_bytes(), &entry.signature)?;
        Ok(())
    }
}

/// Verifies records whose verification payload names a certificate by
/// content hash.
///
/// The certificate's own validity window is checked in addition to the
/// signature: a record can be time-valid while its signing certificate
/// has separately lapsed, and the two failures are reported distinctly.
pub struct CertVerifier<R: ValueStore> {
    certs: CertificateStore<R>,
}

impl<R: ValueStore> CertVerifier<R> {
    /// Create a verifier fetching certificates over `routing`.
    pub fn new(routing: R) -> Self {
        Self {
            certs: CertificateStore::new(routing),
        }
    }
}

#[async_trait]
impl<R: ValueStore> RecordVerifier for CertVerifier<R> {
    async fn verify_record(&self, entry: &SignedRecord) -> Result<()> {
        if entry.verification_type != VerificationType::Cert {
            return Err(CoreError::MalformedRecord(format!(
                "expected cert verification, got {:?}",
                entry.verification_type
            ))
            .into());
        }

        let cert_hash = std::str::from_utf8(entry.verification.as_ref())
            .map_err(|_| TrustError::BadHash("non-utf8 verification payload".into()))?;

        let certificate = self.certs.get(cert_hash).await?;
        certificate.check_window(now_millis())?;

        certificate
            .public_key
            .verify(&entry.signing_bytes(), &entry.signature)?;
        Ok(())
    }
}
