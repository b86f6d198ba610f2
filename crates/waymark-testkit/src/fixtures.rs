//! Test fixtures and helpers.
//!
//! Common setup code for publish/verify scenarios.

use std::sync::Arc;

use waymark::{CertSigner, KeySigner, Record};
use waymark_core::{
    signing_bytes, EolValidity, Keypair, RangeValidity, SignedRecord, ValidityType,
    VerificationType,
};
use waymark_routing::MemoryRouter;
use waymark_trust::Certificate;

/// A test fixture with a keypair and a shared in-memory router.
pub struct TestFixture {
    pub keypair: Keypair,
    pub router: Arc<MemoryRouter>,
}

impl TestFixture {
    /// Create a new fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            router: Arc::new(MemoryRouter::new()),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            router: Arc::new(MemoryRouter::new()),
        }
    }

    /// A certificate for this fixture's keypair with the given window.
    pub fn make_certificate(&self, not_before: i64, not_after: i64) -> Certificate {
        Certificate {
            subject: "fixture.example".into(),
            public_key: self.keypair.public_key(),
            not_before,
            not_after,
        }
    }

    /// A key-verified record ready to publish.
    pub fn key_record(
        &self,
        window: RangeValidity,
        value: &[u8],
    ) -> Record<Arc<MemoryRouter>, RangeValidity, KeySigner> {
        Record::new(
            Arc::clone(&self.router),
            window,
            KeySigner::new(self.keypair.clone()),
            value.to_vec(),
        )
    }

    /// A certificate-verified record ready to publish.
    pub fn cert_record(
        &self,
        window: RangeValidity,
        certificate: Certificate,
        value: &[u8],
    ) -> Record<Arc<MemoryRouter>, RangeValidity, CertSigner<Arc<MemoryRouter>>> {
        Record::new(
            Arc::clone(&self.router),
            window,
            CertSigner::new(
                self.keypair.clone(),
                certificate,
                Arc::clone(&self.router),
            ),
            value.to_vec(),
        )
    }

    /// A signed range-validity entry, bypassing the publish pipeline.
    pub fn make_range_record(
        &self,
        sequence: u64,
        start: Option<i64>,
        end: Option<i64>,
    ) -> SignedRecord {
        let validity = RangeValidity::new(start, end)
            .expect("fixture window must be well-formed")
            .encode();
        self.sign_entry(sequence, ValidityType::TimeRange, validity)
    }

    /// A signed EOL-validity entry, bypassing the publish pipeline.
    pub fn make_eol_record(&self, sequence: u64, eol: i64) -> SignedRecord {
        let validity = EolValidity::new(eol).encode();
        self.sign_entry(sequence, ValidityType::Eol, validity)
    }

    fn sign_entry(
        &self,
        sequence: u64,
        validity_type: ValidityType,
        validity: Vec<u8>,
    ) -> SignedRecord {
        let value = b"/data/fixture-target".to_vec();
        let verification = self.keypair.public_key().as_bytes().to_vec();

        let message = signing_bytes(
            &value,
            validity_type,
            &validity,
            VerificationType::Key,
            &verification,
        );
        let signature = self.keypair.sign(&message);

        SignedRecord {
            sequence,
            value: value.into(),
            validity_type,
            validity: validity.into(),
            verification_type: VerificationType::Key,
            verification: verification.into(),
            signature,
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waymark::{fetch_record, KeyVerifier, RecordVerifier};

    #[tokio::test]
    async fn test_fixture_publishes_verifiable_record() {
        let fixture = TestFixture::with_seed([7; 32]);
        let record = fixture.key_record(RangeValidity::unbounded(), b"/data/target");

        let path = record.base_path();
        record.publish(&path, 1).await.unwrap();

        let entry = fetch_record(fixture.router.as_ref(), &path).await.unwrap();
        KeyVerifier.verify_record(&entry).await.unwrap();
    }

    #[test]
    fn test_fixture_entries_verify() {
        let fixture = TestFixture::with_seed([7; 32]);
        let entry = fixture.make_range_record(1, None, None);

        fixture
            .keypair
            .public_key()
            .verify(&entry.signing_bytes(), &entry.signature)
            .unwrap();
    }
}
