//! Canonical CBOR encoding for deterministic serialization.
//!
//! This module implements RFC 8949 Core Deterministic Encoding:
//! - Map keys sorted by encoded byte comparison
//! - Integers use smallest valid encoding
//! - Definite lengths only
//! - No floats (instants are i64 milliseconds)
//!
//! The canonical encoding is critical: the same record must produce
//! identical bytes (and thus identical content hashes) across all
//! platforms, and the wire envelope must round-trip byte-for-byte.

use ciborium::value::Value;

use crate::crypto::Ed25519Signature;
use crate::error::CoreError;
use crate::record::{SignedRecord, ValidityType, VerificationType};

/// Record field keys (integer keys for compact encoding).
///
/// Keys 0-23 encode as single bytes in CBOR.
mod keys {
    pub const SEQUENCE: u64 = 0;
    pub const VALUE: u64 = 1;
    pub const VALIDITY_TYPE: u64 = 2;
    pub const VALIDITY: u64 = 3;
    pub const VERIFICATION_TYPE: u64 = 4;
    pub const VERIFICATION: u64 = 5;
    pub const SIGNATURE: u64 = 6;
}

/// Encode a signed record to its canonical wire bytes.
///
/// The signing-byte concatenation is computed over decoded field values
/// (see [`crate::record::signing_bytes`]), never over this envelope.
pub fn encode_record(record: &SignedRecord) -> Vec<u8> {
    let entries = vec![
        (
            Value::Integer(keys::SEQUENCE.into()),
            Value::Integer(record.sequence.into()),
        ),
        (
            Value::Integer(keys::VALUE.into()),
            Value::Bytes(record.value.to_vec()),
        ),
        (
            Value::Integer(keys::VALIDITY_TYPE.into()),
            Value::Integer(record.validity_type.to_u16().into()),
        ),
        (
            Value::Integer(keys::VALIDITY.into()),
            Value::Bytes(record.validity.to_vec()),
        ),
        (
            Value::Integer(keys::VERIFICATION_TYPE.into()),
            Value::Integer(record.verification_type.to_u16().into()),
        ),
        (
            Value::Integer(keys::VERIFICATION.into()),
            Value::Bytes(record.verification.to_vec()),
        ),
        (
            Value::Integer(keys::SIGNATURE.into()),
            Value::Bytes(record.signature.0.to_vec()),
        ),
    ];

    encode_canonical(&Value::Map(entries))
}

/// Decode a signed record from wire bytes.
pub fn decode_record(bytes: &[u8]) -> Result<SignedRecord, CoreError> {
    let cursor = std::io::Cursor::new(bytes);
    let value: Value =
        ciborium::from_reader(cursor).map_err(|e| CoreError::Decoding(e.to_string()))?;

    let map = match &value {
        Value::Map(m) => m,
        _ => return Err(CoreError::MalformedRecord("expected map".into())),
    };

    let get = |key: u64| -> Option<&Value> {
        map.iter()
            .find(|(k, _)| matches!(k, Value::Integer(i) if i128::from(*i) == key as i128))
            .map(|(_, v)| v)
    };

    let sequence = match get(keys::SEQUENCE) {
        Some(Value::Integer(i)) => u64::try_from(i128::from(*i))
            .map_err(|_| CoreError::MalformedRecord("sequence out of range".into()))?,
        _ => return Err(CoreError::MalformedRecord("missing sequence".into())),
    };

    let value_bytes = match get(keys::VALUE) {
        Some(Value::Bytes(b)) => b.clone(),
        _ => return Err(CoreError::MalformedRecord("missing value".into())),
    };

    let validity_type = match get(keys::VALIDITY_TYPE) {
        Some(Value::Integer(i)) => {
            let n = u16::try_from(i128::from(*i))
                .map_err(|_| CoreError::MalformedRecord("validity type out of range".into()))?;
            ValidityType::from_u16(n).ok_or(CoreError::UnknownValidityType(n))?
        }
        _ => return Err(CoreError::MalformedRecord("missing validity type".into())),
    };

    let validity = match get(keys::VALIDITY) {
        Some(Value::Bytes(b)) => b.clone(),
        _ => return Err(CoreError::MalformedRecord("missing validity".into())),
    };

    let verification_type = match get(keys::VERIFICATION_TYPE) {
        Some(Value::Integer(i)) => {
            let n = u16::try_from(i128::from(*i)).map_err(|_| {
                CoreError::MalformedRecord("verification type out of range".into())
            })?;
            VerificationType::from_u16(n).ok_or(CoreError::UnknownVerificationType(n))?
        }
        _ => {
            return Err(CoreError::MalformedRecord(
                "missing verification type".into(),
            ))
        }
    };

    let verification = match get(keys::VERIFICATION) {
        Some(Value::Bytes(b)) => b.clone(),
        _ => return Err(CoreError::MalformedRecord("missing verification".into())),
    };

    let signature = match get(keys::SIGNATURE) {
        Some(Value::Bytes(b)) if b.len() == 64 => {
            let mut arr = [0u8; 64];
            arr.copy_from_slice(b);
            Ed25519Signature(arr)
        }
        _ => return Err(CoreError::MalformedRecord("invalid signature".into())),
    };

    Ok(SignedRecord {
        sequence,
        value: value_bytes.into(),
        validity_type,
        validity: validity.into(),
        verification_type,
        verification: verification.into(),
        signature,
    })
}

/// Encode a CBOR Value to canonical bytes.
///
/// This function ensures:
/// - Map keys are sorted by encoded byte comparison
/// - Integers use smallest encoding
/// - Definite lengths only
pub fn encode_canonical(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_value_to(&mut buf, value);
    buf
}

/// Recursively encode a CBOR value.
fn encode_value_to(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Integer(i) => {
            encode_integer(buf, *i);
        }
        Value::Bytes(b) => {
            encode_bytes(buf, b);
        }
        Value::Text(s) => {
            encode_text(buf, s);
        }
        Value::Array(arr) => {
            encode_array(buf, arr);
        }
        Value::Map(entries) => {
            encode_map_canonical(buf, entries);
        }
        Value::Bool(b) => {
            buf.push(if *b { 0xf5 } else { 0xf4 });
        }
        Value::Null => {
            buf.push(0xf6);
        }
        Value::Float(_) => {
            panic!("floats not supported in canonical encoding");
        }
        _ => {
            panic!("unsupported CBOR value type");
        }
    }
}

/// Encode a CBOR integer (major types 0 and 1).
fn encode_integer(buf: &mut Vec<u8>, i: ciborium::value::Integer) {
    let n: i128 = i.into();

    if n >= 0 {
        // Major type 0: unsigned integer
        encode_uint(buf, 0, n as u64);
    } else {
        // Major type 1: negative integer
        // CBOR encodes -1 as 0, -2 as 1, etc.
        let abs = (-1 - n) as u64;
        encode_uint(buf, 1, abs);
    }
}

/// Encode an unsigned integer with the given major type.
fn encode_uint(buf: &mut Vec<u8>, major: u8, n: u64) {
    let mt = major << 5;
    if n < 24 {
        buf.push(mt | (n as u8));
    } else if n <= 0xff {
        buf.push(mt | 24);
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(mt | 25);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= 0xffffffff {
        buf.push(mt | 26);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(mt | 27);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

/// Encode a byte string (major type 2).
fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    encode_uint(buf, 2, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Encode a text string (major type 3).
fn encode_text(buf: &mut Vec<u8>, s: &str) {
    encode_uint(buf, 3, s.len() as u64);
    buf.extend_from_slice(s.as_bytes());
}

/// Encode an array (major type 4).
fn encode_array(buf: &mut Vec<u8>, arr: &[Value]) {
    encode_uint(buf, 4, arr.len() as u64);
    for item in arr {
        encode_value_to(buf, item);
    }
}

/// Encode a map canonically (major type 5).
///
/// Keys are sorted by their encoded byte comparison.
fn encode_map_canonical(buf: &mut Vec<u8>, entries: &[(Value, Value)]) {
    // Encode all keys first to sort by encoded bytes
    let mut key_value_pairs: Vec<(Vec<u8>, &Value)> = entries
        .iter()
        .map(|(k, v)| {
            let mut key_buf = Vec::new();
            encode_value_to(&mut key_buf, k);
            (key_buf, v)
        })
        .collect();

    // Sort by encoded key bytes (lexicographic)
    key_value_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    // Write map header
    encode_uint(buf, 5, key_value_pairs.len() as u64);

    // Write sorted key-value pairs
    for (key_bytes, value) in key_value_pairs {
        buf.extend_from_slice(&key_bytes);
        encode_value_to(buf, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::record::signing_bytes;

    fn make_record(seq: u64) -> SignedRecord {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let value = b"/data/target".to_vec();
        let validity = b"\x82\x00\x01".to_vec();
        let verification = keypair.public_key().as_bytes().to_vec();

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
    fn test_encoding_deterministic() {
        let record = make_record(1);
        assert_eq!(encode_record(&record), encode_record(&record));
    }

    #[test]
    fn test_record_roundtrip() {
        let record = make_record(7);
        let bytes = encode_record(&record);
        let decoded = decode_record(&bytes).unwrap();

        assert_eq!(record, decoded);

        // Re-encoding must reproduce the wire bytes exactly
        assert_eq!(bytes, encode_record(&decoded));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_record(b"not cbor at all").is_err());
        assert!(decode_record(&[]).is_err());
    }

    #[test]
    fn test_decode_rejects_non_map() {
        // A bare CBOR integer
        assert!(matches!(
            decode_record(&[0x07]),
            Err(CoreError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_validity_type() {
        let record = make_record(1);
        let mut bytes = encode_record(&record);

        // Map keys 0..6 encode in order; key 2's value is the validity
        // type. Locate and bump it to an unassigned tag.
        // Layout: a7 00 <seq> 01 <value..> 02 <vt> ...
        let pos = bytes
            .windows(2)
            .position(|w| w == [0x02, 0x01])
            .expect("validity type field");
        bytes[pos + 1] = 0x09;

        assert!(matches!(
            decode_record(&bytes),
            Err(CoreError::UnknownValidityType(9))
        ));
    }

    #[test]
    fn test_integer_encoding() {
        // Smallest encoding for various integer sizes
        let mut buf = Vec::new();

        encode_uint(&mut buf, 0, 0);
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_uint(&mut buf, 0, 23);
        assert_eq!(buf, vec![0x17]);

        buf.clear();
        encode_uint(&mut buf, 0, 24);
        assert_eq!(buf, vec![0x18, 24]);

        buf.clear();
        encode_uint(&mut buf, 0, 256);
        assert_eq!(buf, vec![0x19, 0x01, 0x00]);
    }

    #[test]
    fn test_negative_integer_encoding() {
        // -1 encodes as major type 1, value 0
        let bytes = encode_canonical(&Value::Integer((-1).into()));
        assert_eq!(bytes, vec![0x20]);

        let bytes = encode_canonical(&Value::Integer((-25).into()));
        assert_eq!(bytes, vec![0x38, 24]);
    }

    #[test]
    fn test_map_key_ordering() {
        let mut buf = Vec::new();
        let entries = vec![
            (Value::Integer(6.into()), Value::Integer(60.into())),
            (Value::Integer(0.into()), Value::Integer(0.into())),
            (Value::Integer(3.into()), Value::Integer(30.into())),
        ];
        encode_map_canonical(&mut buf, &entries);

        // Map header (3 entries), then keys in order 0, 3, 6
        assert_eq!(buf[0], 0xa3);
        assert_eq!(buf[1], 0x00); // key 0
        assert_eq!(buf[2], 0x00); // value 0
        assert_eq!(buf[3], 0x03); // key 3
        assert_eq!(buf[4], 0x18); // value 30 (>23)
        assert_eq!(buf[5], 30);
        assert_eq!(buf[6], 0x06); // key 6
        assert_eq!(buf[7], 0x18); // value 60 (>23)
        assert_eq!(buf[8], 60);
    }
}
