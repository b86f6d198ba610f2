//! Record assembly and the publish pipeline.
//!
//! A `Record` binds a target value to a validity policy and a signer.
//! `entry` produces one signed version; `publish` pushes the trust data
//! and the entry to routing concurrently.

use bytes::Bytes;
use tracing::debug;

use waymark_core::{encode_record, signing_bytes, RecordPath, SignedRecord, ValidityType};
use waymark_routing::{with_deadline, ValueStore};

use crate::error::{PublishLeg, RecordError, Result};
use crate::signer::RecordSigner;

/// The producer half of a validity policy: which family a record belongs
/// to and the encoded payload to embed.
pub trait RecordValidity: Send + Sync {
    /// The validity policy family tag.
    fn validity_type(&self) -> ValidityType;

    /// The encoded validity payload for the record.
    fn validity_payload(&self) -> Result<Bytes>;
}

impl RecordValidity for waymark_core::RangeValidity {
    fn validity_type(&self) -> ValidityType {
        ValidityType::TimeRange
    }

    fn validity_payload(&self) -> Result<Bytes> {
        Ok(self.encode().into())
    }
}

impl RecordValidity for waymark_core::EolValidity {
    fn validity_type(&self) -> ValidityType {
        ValidityType::Eol
    }

    fn validity_payload(&self) -> Result<Bytes> {
        Ok(self.encode().into())
    }
}

/// A name→value binding ready to be versioned and published.
pub struct Record<R, V, S>
where
    R: ValueStore,
    V: RecordValidity,
    S: RecordSigner,
{
    routing: R,
    validity: V,
    signer: S,
    value: Bytes,
}

impl<R, V, S> Record<R, V, S>
where
    R: ValueStore,
    V: RecordValidity,
    S: RecordSigner,
{
    /// Create a record for `value` under the given policy pair.
    pub fn new(routing: R, validity: V, signer: S, value: impl Into<Bytes>) -> Self {
        Self {
            routing,
            validity,
            signer,
            value: value.into(),
        }
    }

    /// The canonical base path this record's signer publishes under.
    pub fn base_path(&self) -> RecordPath {
        self.signer.base_path()
    }

    /// Assemble and sign one version of the record.
    ///
    /// Failure of either policy call or of signing propagates unchanged;
    /// no partial entry is ever returned.
    pub fn entry(&self, sequence: u64) -> Result<SignedRecord> {
        let validity = self.validity.validity_payload()?;
        let verification = self.signer.verification_payload()?;

        let validity_type = self.validity.validity_type();
        let verification_type = self.signer.verification_type();

        let message = signing_bytes(
            &self.value,
            validity_type,
            &validity,
            verification_type,
            &verification,
        );
        let signature = self.signer.sign(&message);

        Ok(SignedRecord {
            sequence,
            value: self.value.clone(),
            validity_type,
            validity,
            verification_type,
            verification,
            signature,
        })
    }

    /// Publish version `sequence` of this record at `path`.
    ///
    /// Two legs run concurrently under the caller's cancellation scope:
    /// the signer's trust-data publication and the entry store into
    /// routing. The first error observed is returned and the other leg's
    /// outcome is discarded. There is no rollback on partial failure; a
    /// half-published name stays half-published until the caller retries
    /// the whole publish.
    pub async fn publish(&self, path: &RecordPath, sequence: u64) -> Result<()> {
        let entry = self.entry(sequence)?;

        let (trust, store) = tokio::join!(
            self.signer.publish_verification(&entry),
            self.put_entry(path, &entry),
        );

        if let Err(e) = trust {
            return Err(RecordError::PublishPartialFailure {
                leg: PublishLeg::TrustData,
                source: Box::new(e),
            });
        }
        if let Err(e) = store {
            return Err(RecordError::PublishPartialFailure {
                leg: PublishLeg::EntryStore,
                source: Box::new(e),
            });
        }
        Ok(())
    }

    async fn put_entry(&self, path: &RecordPath, entry: &SignedRecord) -> Result<()> {
        let data = encode_record(entry);

        debug!(key = %path, sequence = entry.sequence, "storing record entry");
        with_deadline(self.routing.put_value(path.as_str(), &data)).await?;
        Ok(())
    }
}
