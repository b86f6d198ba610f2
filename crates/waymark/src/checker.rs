//! Record checkers: the read-side surface of each validity family.
//!
//! A checker validates a fetched entry's currency and selects the single
//! authoritative entry among candidates. Verification of who signed an
//! entry is a separate concern (see [`crate::verifier`]).

use waymark_core::validity::{eol, range};
use waymark_core::{CoreError, EolValidity, RangeValidity, SignedRecord, ValidityType};

use crate::error::Result;

/// Checker for range-validity records.
pub struct RangeRecordChecker;

impl RangeRecordChecker {
    /// Check that the entry's window is current.
    pub fn validate_record(&self, entry: &SignedRecord) -> Result<()> {
        if entry.validity_type != ValidityType::TimeRange {
            return Err(CoreError::MalformedRecord(format!(
                "expected range validity, got {:?}",
                entry.validity_type
            ))
            .into());
        }
        let window = RangeValidity::decode(&entry.validity)?;
        window.validate(now_millis())?;
        Ok(())
    }

    /// Select the best record among candidates. Operates on
    /// already-fetched records; performs no network calls.
    pub fn select_record(&self, candidates: &[SignedRecord]) -> Result<usize> {
        Ok(range::select(candidates)?)
    }
}

/// Checker for EOL-validity records.
pub struct EolRecordChecker;

impl EolRecordChecker {
    /// Check that the entry has not passed its end-of-life.
    pub fn validate_record(&self, entry: &SignedRecord) -> Result<()> {
        if entry.validity_type != ValidityType::Eol {
            return Err(CoreError::MalformedRecord(format!(
                "expected eol validity, got {:?}",
                entry.validity_type
            ))
            .into());
        }
        let eol = EolValidity::decode(&entry.validity)?;
        eol.validate(now_millis())?;
        Ok(())
    }

    /// Select the best record among candidates.
    pub fn select_record(&self, candidates: &[SignedRecord]) -> Result<usize> {
        Ok(eol::select(candidates)?)
    }
}

/// A checker for one of the closed set of validity families.
pub enum RecordChecker {
    Range(RangeRecordChecker),
    Eol(EolRecordChecker),
}

impl RecordChecker {
    /// Validate an entry's currency with the family's rules.
    pub fn validate_record(&self, entry: &SignedRecord) -> Result<()> {
        match self {
            RecordChecker::Range(c) => c.validate_record(entry),
            RecordChecker::Eol(c) => c.validate_record(entry),
        }
    }

    /// Select the best record among candidates.
    pub fn select_record(&self, candidates: &[SignedRecord]) -> Result<usize> {
        match self {
            RecordChecker::Range(c) => c.select_record(candidates),
            RecordChecker::Eol(c) => c.select_record(candidates),
        }
    }
}

/// The checker for a validity family.
pub fn checker_for(validity_type: ValidityType) -> RecordChecker {
    match validity_type {
        ValidityType::TimeRange => RecordChecker::Range(RangeRecordChecker),
        ValidityType::Eol => RecordChecker::Eol(EolRecordChecker),
    }
}

/// Current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
