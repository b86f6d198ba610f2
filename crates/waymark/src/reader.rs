//! Validated read path: fetch one candidate entry for a name.
//!
//! Fetch the bytes at a record path, decode the wire envelope, and run
//! the matching checker's currency validation. Exactly one network call;
//! selection over multiple candidates happens on already-fetched records.

use tracing::debug;

use waymark_core::{decode_record, RecordPath, SignedRecord};
use waymark_routing::{with_deadline, ValueStore};

use crate::checker::checker_for;
use crate::error::Result;

/// Fetch and validate the record entry stored at `path`.
///
/// Surfaces each failure distinctly: a routing error for the fetch, a
/// decode error for malformed bytes, and the family's currency error for
/// a stale or not-yet-current record. Does not verify who signed the
/// entry; pair with a [`crate::verifier::RecordVerifier`] for that.
pub async fn fetch_record<R: ValueStore>(routing: &R, path: &RecordPath) -> Result<SignedRecord> {
    debug!(key = %path, "fetching record entry");
    let bytes = with_deadline(routing.get_value(path.as_str())).await?;

    let entry = decode_record(&bytes)?;
    checker_for(entry.validity_type).validate_record(&entry)?;
    Ok(entry)
}
