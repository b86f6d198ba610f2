//! Proptest generators for property-based testing.

use proptest::prelude::*;

use waymark_core::{
    signing_bytes, EolValidity, Keypair, RangeValidity, SignedRecord, ValidityType,
    VerificationType,
};

/// Generate a deterministic keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a sequence number.
pub fn sequence() -> impl Strategy<Value = u64> {
    0u64..=1000
}

/// Generate a well-formed window: when both bounds are present,
/// end >= start.
pub fn window() -> impl Strategy<Value = RangeValidity> {
    (
        prop::option::of(0i64..=1_000_000),
        prop::option::of(0i64..=1_000_000),
    )
        .prop_map(|(a, b)| match (a, b) {
            (Some(x), Some(y)) if y < x => RangeValidity::new(Some(y), Some(x)),
            (start, end) => RangeValidity::new(start, end),
        })
        .prop_map(|w| w.expect("generated window is well-formed"))
}

/// Generate an EOL policy.
pub fn eol() -> impl Strategy<Value = EolValidity> {
    (0i64..=1_000_000).prop_map(EolValidity::new)
}

/// Generate target value bytes.
pub fn value(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a signed range-validity record.
pub fn range_record() -> impl Strategy<Value = SignedRecord> {
    (keypair(), sequence(), window(), value(64)).prop_map(|(kp, seq, window, value)| {
        sign_record(&kp, seq, ValidityType::TimeRange, window.encode(), value)
    })
}

/// Generate a signed EOL-validity record.
pub fn eol_record() -> impl Strategy<Value = SignedRecord> {
    (keypair(), sequence(), eol(), value(64)).prop_map(|(kp, seq, eol, value)| {
        sign_record(&kp, seq, ValidityType::Eol, eol.encode(), value)
    })
}

fn sign_record(
    keypair: &Keypair,
    sequence: u64,
    validity_type: ValidityType,
    validity: Vec<u8>,
    value: Vec<u8>,
) -> SignedRecord {
    let verification = keypair.public_key().as_bytes().to_vec();
    let message = signing_bytes(
        &value,
        validity_type,
        &validity,
        VerificationType::Key,
        &verification,
    );
    let signature = keypair.sign(&message);

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
