use sha1::{Digest, Sha1};

use crate::bencode::{encode_bvalue, BValue};

/// SHA-1 over the canonical re-encoding of the decoded `info` dictionary.
///
/// The hash is computed from the encoder's canonical bytes, never from a
/// substring of the original file: source key order is not guaranteed to
/// already be canonical. The decoded dictionary is hashed as-is, extra keys
/// included, so the result matches what other clients compute for the same
/// torrent.
pub fn info_hash(info: &BValue) -> [u8; 20] {
    let encoded = encode_bvalue(info);

    let mut hasher = Sha1::new();
    hasher.update(&encoded);
    let result = hasher.finalize();

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&result);
    hash
}
