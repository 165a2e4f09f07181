use std::collections::BTreeMap;

/// A decoded bencode value.
///
/// Dictionary keys are raw bytes, not `String`: the format only requires keys
/// to be byte strings, and a `BTreeMap` keyed on `Vec<u8>` iterates in
/// ascending raw-byte order, which is exactly the canonical key order the
/// encoder must emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BValue {
    ByteString(Vec<u8>), // raw bytes, not required to be UTF-8
    Integer(i64),
    List(Vec<BValue>),
    Dict(BTreeMap<Vec<u8>, BValue>),
}

impl BValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            BValue::ByteString(b) => Some(b),
            _ => None,
        }
    }

    /// The byte string as UTF-8, if it is one and decodes cleanly.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BValue::ByteString(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            BValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[BValue]> {
        match self {
            BValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<Vec<u8>, BValue>> {
        match self {
            BValue::Dict(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for BValue {
    fn from(s: &str) -> Self {
        BValue::ByteString(s.as_bytes().to_vec())
    }
}

impl From<i64> for BValue {
    fn from(i: i64) -> Self {
        BValue::Integer(i)
    }
}
