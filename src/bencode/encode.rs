use serde_json::{json, Value};

use super::bvalue::BValue;

/// Encodes a `BValue` into its canonical bencoded form.
///
/// This is a total function: every well-formed tree encodes. The output is
/// canonical — dictionary entries are emitted in ascending raw-byte key
/// order (the `BTreeMap` iteration order), integers carry no leading zeros,
/// negatives a single `-`. Info-hash computation depends on this form being
/// byte-identical regardless of how the tree was built.
pub fn encode_bvalue(value: &BValue) -> Vec<u8> {
    let mut out = Vec::new();
    encode_into(value, &mut out);
    out
}

fn encode_into(value: &BValue, out: &mut Vec<u8>) {
    match value {
        BValue::ByteString(bytes) => {
            out.extend_from_slice(bytes.len().to_string().as_bytes());
            out.push(b':');
            out.extend_from_slice(bytes);
        }
        BValue::Integer(i) => {
            out.push(b'i');
            out.extend_from_slice(i.to_string().as_bytes());
            out.push(b'e');
        }
        BValue::List(items) => {
            out.push(b'l');
            for item in items {
                encode_into(item, out);
            }
            out.push(b'e');
        }
        BValue::Dict(dict) => {
            out.push(b'd');
            for (key, val) in dict {
                out.extend_from_slice(key.len().to_string().as_bytes());
                out.push(b':');
                out.extend_from_slice(key);
                encode_into(val, out);
            }
            out.push(b'e');
        }
    }
}

/// Renders a `BValue` as JSON for diagnostic output.
///
/// Byte strings that are not valid UTF-8 are rendered as
/// `{ "_bytes_hex": "<hex>" }` rather than lossily replaced.
pub fn bvalue_to_json(value: &BValue) -> Value {
    match value {
        BValue::Integer(i) => json!(i),
        BValue::ByteString(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => Value::String(s.to_string()),
            Err(_) => json!({ "_bytes_hex": hex::encode(bytes) }),
        },
        BValue::List(items) => Value::Array(items.iter().map(bvalue_to_json).collect()),
        BValue::Dict(dict) => {
            let mut map = serde_json::Map::new();
            for (key, val) in dict {
                map.insert(
                    String::from_utf8_lossy(key).into_owned(),
                    bvalue_to_json(val),
                );
            }
            Value::Object(map)
        }
    }
}
