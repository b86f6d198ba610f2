//! EOL validity: a record is current until a single end-of-life instant.
//!
//! The simpler of the two validity families: no lower bound, one expiry.

use std::cmp::Ordering;

use ciborium::value::Value;

use crate::canonical::encode_canonical;
use crate::error::ValidityError;
use crate::record::SignedRecord;
use crate::validity::signature_breaks_tie;

/// An end-of-life instant in Unix milliseconds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EolValidity {
    eol: i64,
}

impl EolValidity {
    /// Construct an end-of-life policy.
    pub fn new(eol: i64) -> Self {
        Self { eol }
    }

    /// The inclusive expiry instant.
    pub fn eol(&self) -> i64 {
        self.eol
    }

    /// Encode as a canonical CBOR integer.
    pub fn encode(&self) -> Vec<u8> {
        encode_canonical(&Value::Integer(self.eol.into()))
    }

    /// Decode from payload bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ValidityError> {
        let cursor = std::io::Cursor::new(bytes);
        let value: Value = ciborium::from_reader(cursor)
            .map_err(|e| ValidityError::Malformed(e.to_string()))?;

        match value {
            Value::Integer(i) => i64::try_from(i128::from(i))
                .map(Self::new)
                .map_err(|_| ValidityError::Malformed("eol out of range".into())),
            _ => Err(ValidityError::Malformed("expected integer eol".into())),
        }
    }

    /// Check whether the record is current at `now`.
    pub fn validate(&self, now: i64) -> Result<(), ValidityError> {
        if now > self.eol {
            return Err(ValidityError::Expired);
        }
        Ok(())
    }
}

/// Select the single authoritative record among EOL candidates.
///
/// Higher sequence wins; among equal sequences the later end-of-life
/// wins; byte-identical payloads fall through to the greater-signature
/// tiebreak shared with the range family.
pub fn select(candidates: &[SignedRecord]) -> Result<usize, ValidityError> {
    if candidates.is_empty() {
        return Err(ValidityError::EmptySelection);
    }

    let mut best = 0;
    let mut best_eol = EolValidity::decode(&candidates[0].validity)?;
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        let eol = EolValidity::decode(&candidate.validity)?;
        if beats(candidate, eol, &candidates[best], best_eol) {
            best = i;
            best_eol = eol;
        }
    }
    Ok(best)
}

fn beats(a: &SignedRecord, ae: EolValidity, b: &SignedRecord, be: EolValidity) -> bool {
    match a.sequence.cmp(&b.sequence) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match ae.eol.cmp(&be.eol) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => signature_breaks_tie(a, b),
        },
    }
}
