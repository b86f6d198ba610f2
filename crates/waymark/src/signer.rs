//! Record signers: the producer half of a verification policy.
//!
//! A signer knows which name it is allowed to produce records under
//! (the base path), what "who signed this" payload to embed, what trust
//! data must be published alongside the record, and how to sign.

use async_trait::async_trait;
use bytes::Bytes;

use waymark_core::{
    Blake3Hash, Ed25519Signature, Keypair, RecordPath, SignedRecord, VerificationType,
};
use waymark_routing::ValueStore;
use waymark_trust::{Certificate, CertificateStore};

use crate::error::Result;

/// The producer half of a verification policy.
#[async_trait]
pub trait RecordSigner: Send + Sync {
    /// The canonical base path records of this identity live under,
    /// eg `/iprs/<certificate hash>`.
    fn base_path(&self) -> RecordPath;

    /// The verification policy family tag.
    fn verification_type(&self) -> VerificationType;

    /// The "who signed this" payload embedded in each record.
    fn verification_payload(&self) -> Result<Bytes>;

    /// Publish any data required for verification to the network,
    /// eg a certificate. Must complete for third parties with no other
    /// channel to the trust data to verify the record.
    async fn publish_verification(&self, entry: &SignedRecord) -> Result<()>;

    /// Sign the canonical signing bytes.
    fn sign(&self, message: &[u8]) -> Ed25519Signature;
}

/// Public-key verification: the key itself travels in the record.
pub struct KeySigner {
    keypair: Keypair,
}

impl KeySigner {
    /// Create a signer from a keypair.
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl RecordSigner for KeySigner {
    fn base_path(&self) -> RecordPath {
        RecordPath::from_hash(&Blake3Hash::hash(self.keypair.public_key().as_bytes()))
    }

    fn verification_type(&self) -> VerificationType {
        VerificationType::Key
    }

    fn verification_payload(&self) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(
            self.keypair.public_key().as_bytes(),
        ))
    }

    /// No-op: the key is embedded in the record itself.
    async fn publish_verification(&self, _entry: &SignedRecord) -> Result<()> {
        Ok(())
    }

    fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.keypair.sign(message)
    }
}

/// Certificate verification: the record carries only the content hash of
/// a certificate published separately.
pub struct CertSigner<R: ValueStore> {
    keypair: Keypair,
    certificate: Certificate,
    certs: CertificateStore<R>,
}

impl<R: ValueStore> CertSigner<R> {
    /// Create a signer for records verifiable against `certificate`.
    pub fn new(keypair: Keypair, certificate: Certificate, routing: R) -> Self {
        Self {
            keypair,
            certificate,
            certs: CertificateStore::new(routing),
        }
    }
}

#[async_trait]
impl<R: ValueStore> RecordSigner for CertSigner<R> {
    fn base_path(&self) -> RecordPath {
        RecordPath::from_hash(&self.certificate.content_hash().0)
    }

    fn verification_type(&self) -> VerificationType {
        VerificationType::Cert
    }

    fn verification_payload(&self) -> Result<Bytes> {
        Ok(Bytes::from(self.certificate.content_hash().to_hex()))
    }

    /// Push the certificate to the certificate store. A record published
    /// without this leg cannot be verified by a third party.
    async fn publish_verification(&self, _entry: &SignedRecord) -> Result<()> {
        self.certs.put(&self.certificate).await?;
        Ok(())
    }

    fn sign(&self, message: &[u8]) -> Ed25519Signature {
        self.keypair.sign(message)
    }
}
