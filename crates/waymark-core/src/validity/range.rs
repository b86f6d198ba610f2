//! Range validity: a record is current within a time window.
//!
//! Either bound may be absent, meaning unbounded in that direction. The
//! selection order over candidates is the most intricate logic in the
//! repository; its precedence chain is part of the wire contract and
//! must not be reordered.

use std::cmp::Ordering;

use ciborium::value::Value;

use crate::canonical::encode_canonical;
use crate::error::ValidityError;
use crate::record::SignedRecord;
use crate::validity::signature_breaks_tie;

/// A time window in Unix milliseconds. Both bounds inclusive; an absent
/// bound is unbounded in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeValidity {
    start: Option<i64>,
    end: Option<i64>,
}

impl RangeValidity {
    /// Construct a window.
    ///
    /// Fails with [`ValidityError::InvalidWindow`] iff both bounds are
    /// present and `end < start`. Equal instants are permitted (an
    /// instantaneous window).
    pub fn new(start: Option<i64>, end: Option<i64>) -> Result<Self, ValidityError> {
        if let (Some(s), Some(e)) = (start, end) {
            if e < s {
                return Err(ValidityError::InvalidWindow { start: s, end: e });
            }
        }
        Ok(Self { start, end })
    }

    /// A window with no bounds: always current.
    pub fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// The inclusive lower bound, if any.
    pub fn start(&self) -> Option<i64> {
        self.start
    }

    /// The inclusive upper bound, if any.
    pub fn end(&self) -> Option<i64> {
        self.end
    }

    /// Encode the window as a canonical CBOR pair `[start, end]`.
    ///
    /// An unbounded bound encodes as CBOR null, a sentinel distinguishable
    /// from any real timestamp.
    pub fn encode(&self) -> Vec<u8> {
        let bound = |b: Option<i64>| match b {
            Some(t) => Value::Integer(t.into()),
            None => Value::Null,
        };
        encode_canonical(&Value::Array(vec![bound(self.start), bound(self.end)]))
    }

    /// Decode a window from its payload bytes.
    ///
    /// The window invariant is re-checked: a wire payload whose end
    /// precedes its start is rejected, not silently accepted.
    pub fn decode(bytes: &[u8]) -> Result<Self, ValidityError> {
        let cursor = std::io::Cursor::new(bytes);
        let value: Value = ciborium::from_reader(cursor)
            .map_err(|e| ValidityError::Malformed(e.to_string()))?;

        let pair = match &value {
            Value::Array(items) if items.len() == 2 => items,
            _ => return Err(ValidityError::Malformed("expected [start, end] pair".into())),
        };

        let bound = |v: &Value| -> Result<Option<i64>, ValidityError> {
            match v {
                Value::Null => Ok(None),
                Value::Integer(i) => i64::try_from(i128::from(*i))
                    .map(Some)
                    .map_err(|_| ValidityError::Malformed("bound out of range".into())),
                _ => Err(ValidityError::Malformed("bound must be integer or null".into())),
            }
        };

        Self::new(bound(&pair[0])?, bound(&pair[1])?)
    }

    /// Check whether the window is current at `now`.
    pub fn validate(&self, now: i64) -> Result<(), ValidityError> {
        if let Some(start) = self.start {
            if now < start {
                return Err(ValidityError::NotYetValid);
            }
        }
        if let Some(end) = self.end {
            if now > end {
                return Err(ValidityError::Expired);
            }
        }
        Ok(())
    }
}

/// Select the single authoritative record among candidates for one name.
///
/// Strict precedence chain, each step breaking ties only on exact
/// equality at the previous step:
/// 1. higher sequence;
/// 2. unbounded or later window end;
/// 3. unbounded or earlier window start (the wider window);
/// 4. lexicographically greater raw signature bytes.
///
/// The relation is transitive and total over the compared fields, so
/// folding pairwise comparisons in any order yields the same winner.
/// Performs zero network calls: candidates are already-fetched records.
pub fn select(candidates: &[SignedRecord]) -> Result<usize, ValidityError> {
    if candidates.is_empty() {
        return Err(ValidityError::EmptySelection);
    }

    let mut best = 0;
    let mut best_window = RangeValidity::decode(&candidates[0].validity)?;
    for (i, candidate) in candidates.iter().enumerate().skip(1) {
        let window = RangeValidity::decode(&candidate.validity)?;
        if beats(candidate, &window, &candidates[best], &best_window) {
            best = i;
            best_window = window;
        }
    }
    Ok(best)
}

/// Whether candidate `a` wins over candidate `b`.
fn beats(a: &SignedRecord, aw: &RangeValidity, b: &SignedRecord, bw: &RangeValidity) -> bool {
    match a.sequence.cmp(&b.sequence) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match cmp_end(aw.end, bw.end) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match cmp_start(aw.start, bw.start) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => signature_breaks_tie(a, b),
            },
        },
    }
}

/// Order on window ends: unbounded end beats any bounded end, later
/// bounded end beats earlier.
fn cmp_end(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => x.cmp(&y),
    }
}

/// Order on window starts: unbounded start beats any bounded start,
/// earlier bounded start beats later.
fn cmp_start(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => y.cmp(&x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::record::{signing_bytes, ValidityType, VerificationType};

    const HOUR: i64 = 3_600_000;

    fn make_record(keypair: &Keypair, seq: u64, start: Option<i64>, end: Option<i64>) -> SignedRecord {
        let window = RangeValidity::new(start, end).unwrap();
        let validity = window.encode();
        let verification = keypair.public_key().as_bytes().to_vec();
        let value = b"/data/target".to_vec();

        let msg = signing_bytes(
            &value,
            ValidityType::TimeRange,
            &validity,
            VerificationType::Key,
            &verification,
        );
        let signature = keypair.sign(&msg);

        SignedRecord {
            sequence: seq,
            value: value.into(),
            validity_type: ValidityType::TimeRange,
            validity: validity.into(),
            verification_type: VerificationType::Key,
            verification: verification.into(),
            signature,
        }
    }

    #[test]
    fn test_new_window() {
        let ts = 1_000_000_000i64;

        // Start before end OK
        assert!(RangeValidity::new(Some(ts), Some(ts + HOUR)).is_ok());
        assert!(RangeValidity::new(None, Some(ts)).is_ok());
        assert!(RangeValidity::new(Some(ts), None).is_ok());
        assert!(RangeValidity::new(None, None).is_ok());

        // Start equals end OK (instantaneous window)
        assert!(RangeValidity::new(Some(ts), Some(ts)).is_ok());

        // End before start FAIL
        assert!(matches!(
            RangeValidity::new(Some(ts + HOUR), Some(ts - HOUR)),
            Err(ValidityError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_encode_roundtrip() {
        let ts = 1_000_000_000i64;
        for window in [
            RangeValidity::new(Some(ts), Some(ts + HOUR)).unwrap(),
            RangeValidity::new(None, Some(ts)).unwrap(),
            RangeValidity::new(Some(ts), None).unwrap(),
            RangeValidity::unbounded(),
        ] {
            let decoded = RangeValidity::decode(&window.encode()).unwrap();
            assert_eq!(window, decoded);
        }
    }

    #[test]
    fn test_decode_rejects_inverted_window() {
        // Hand-built payload with end < start, bypassing new()
        let payload = encode_canonical(&Value::Array(vec![
            Value::Integer(100.into()),
            Value::Integer(50.into()),
        ]));
        assert!(matches!(
            RangeValidity::decode(&payload),
            Err(ValidityError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(RangeValidity::decode(b"junk").is_err());
        // Wrong arity
        let payload = encode_canonical(&Value::Array(vec![Value::Null]));
        assert!(RangeValidity::decode(&payload).is_err());
        // Wrong element type
        let payload = encode_canonical(&Value::Array(vec![
            Value::Text("soon".into()),
            Value::Null,
        ]));
        assert!(RangeValidity::decode(&payload).is_err());
    }

    #[test]
    fn test_validation() {
        let now = 1_000_000_000i64;

        let stale_a = RangeValidity::new(Some(now - 2 * HOUR), Some(now - HOUR)).unwrap();
        let stale_b = RangeValidity::new(None, Some(now - HOUR)).unwrap();
        assert!(matches!(stale_a.validate(now), Err(ValidityError::Expired)));
        assert!(matches!(stale_b.validate(now), Err(ValidityError::Expired)));

        let ok_a = RangeValidity::new(Some(now - HOUR), Some(now + HOUR)).unwrap();
        let ok_b = RangeValidity::new(None, Some(now + HOUR)).unwrap();
        let ok_c = RangeValidity::new(Some(now - HOUR), None).unwrap();
        let ok_d = RangeValidity::unbounded();
        assert!(ok_a.validate(now).is_ok());
        assert!(ok_b.validate(now).is_ok());
        assert!(ok_c.validate(now).is_ok());
        assert!(ok_d.validate(now).is_ok());

        let early_a = RangeValidity::new(Some(now + HOUR), Some(now + 2 * HOUR)).unwrap();
        let early_b = RangeValidity::new(Some(now + HOUR), None).unwrap();
        assert!(matches!(early_a.validate(now), Err(ValidityError::NotYetValid)));
        assert!(matches!(early_b.validate(now), Err(ValidityError::NotYetValid)));
    }

    #[test]
    fn test_validation_bounds_inclusive() {
        let now = 1_000_000_000i64;
        let window = RangeValidity::new(Some(now), Some(now)).unwrap();
        assert!(window.validate(now).is_ok());
        assert!(window.validate(now - 1).is_err());
        assert!(window.validate(now + 1).is_err());
    }

    fn assert_selected(expected: &SignedRecord, from: &[SignedRecord]) {
        let winner = select(from).unwrap();
        assert_eq!(
            &from[winner], expected,
            "expected record seq {} to win",
            expected.sequence
        );
    }

    #[test]
    fn test_selection_ordering() {
        let keypair = Keypair::from_seed(&[15; 32]);
        // Fixed timestamp so selection is deterministic
        let ts = 1_000_000_000i64;

        let e1 = make_record(&keypair, 1, Some(ts), Some(ts + HOUR));
        let e2 = make_record(&keypair, 2, Some(ts), Some(ts + HOUR));
        let e3 = make_record(&keypair, 3, Some(ts), Some(ts + HOUR));
        let e4 = make_record(&keypair, 3, Some(ts), Some(ts + 2 * HOUR));
        let e5 = make_record(&keypair, 4, Some(ts), Some(ts + 3 * HOUR));
        let e6 = make_record(&keypair, 4, Some(ts - HOUR), Some(ts + 3 * HOUR));
        let e7 = make_record(&keypair, 4, Some(ts - HOUR), None);
        let e8 = make_record(&keypair, 4, None, None);
        let e9 = make_record(&keypair, 4, None, None);

        let all = [
            e1.clone(),
            e2.clone(),
            e3.clone(),
            e4.clone(),
            e5.clone(),
            e6.clone(),
            e7.clone(),
            e8.clone(),
            e9.clone(),
        ];

        // e1 is the only record
        assert_selected(&e1, &all[..1]);
        // e2 has the highest sequence number
        assert_selected(&e2, &all[..2]);
        // e3 has the highest sequence number
        assert_selected(&e3, &all[..3]);
        // e4 has a later end than e3 at the same sequence
        assert_selected(&e4, &all[..4]);
        // e5 has the highest sequence number
        assert_selected(&e5, &all[..5]);
        // e6 has the same end but an earlier start
        assert_selected(&e6, &all[..6]);
        // e7 has an unbounded end
        assert_selected(&e7, &all[..7]);
        // e8 has an unbounded start as well
        assert_selected(&e8, &all[..8]);
        // e9 wins on the signature comparison
        assert_selected(&e9, &all);
    }

    #[test]
    fn test_selection_signature_tiebreak() {
        // Two producers, identical sequence and window: only the raw
        // signature bytes separate them.
        let ka = Keypair::from_seed(&[1; 32]);
        let kb = Keypair::from_seed(&[2; 32]);
        let ts = 1_000_000_000i64;

        let a = make_record(&ka, 5, Some(ts), Some(ts + HOUR));
        let b = make_record(&kb, 5, Some(ts), Some(ts + HOUR));

        let expected = if a.signature.as_bytes()[..] > b.signature.as_bytes()[..] {
            &a
        } else {
            &b
        };

        let winner = select(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(&[a.clone(), b.clone()][winner], expected);

        // Same winner regardless of candidate order
        let winner = select(&[b.clone(), a.clone()]).unwrap();
        assert_eq!(&[b.clone(), a.clone()][winner], expected);
    }

    #[test]
    fn test_selection_empty() {
        assert!(matches!(select(&[]), Err(ValidityError::EmptySelection)));
    }

    #[test]
    fn test_selection_rejects_undecodable_candidate() {
        let keypair = Keypair::from_seed(&[15; 32]);
        let good = make_record(&keypair, 1, None, None);
        let mut bad = good.clone();
        bad.validity = b"junk".to_vec().into();

        assert!(select(&[good, bad]).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn window_strategy() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
            (
                prop::option::of(0i64..1000),
                prop::option::of(0i64..1000),
            )
                .prop_map(|(a, b)| match (a, b) {
                    (Some(x), Some(y)) if y < x => (Some(y), Some(x)),
                    other => other,
                })
        }

        fn record_strategy() -> impl Strategy<Value = SignedRecord> {
            (0u64..4, window_strategy(), any::<[u8; 32]>()).prop_map(|(seq, (start, end), seed)| {
                let keypair = Keypair::from_seed(&seed);
                make_record(&keypair, seq, start, end)
            })
        }

        proptest! {
            // The winner must beat or equal every other candidate: no
            // candidate may in turn beat the winner.
            #[test]
            fn winner_is_maximal(records in prop::collection::vec(record_strategy(), 1..8)) {
                let winner = select(&records).unwrap();
                let ww = RangeValidity::decode(&records[winner].validity).unwrap();
                for (i, r) in records.iter().enumerate() {
                    if i == winner {
                        continue;
                    }
                    let rw = RangeValidity::decode(&r.validity).unwrap();
                    prop_assert!(!beats(r, &rw, &records[winner], &ww));
                }
            }

            // Candidate order must not affect which record wins.
            #[test]
            fn winner_is_order_independent(records in prop::collection::vec(record_strategy(), 1..8)) {
                let forward = select(&records).unwrap();
                let mut reversed: Vec<SignedRecord> = records.clone();
                reversed.reverse();
                let backward = select(&reversed).unwrap();
                prop_assert_eq!(&records[forward], &reversed[backward]);
            }
        }
    }
}
