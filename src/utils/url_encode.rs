/// Percent-encodes arbitrary bytes, keeping only RFC 3986 "unreserved"
/// characters literal. The tracker's `info_hash` and `peer_id` parameters
/// are raw bytes that must be encoded byte-for-byte, never assumed to be
/// UTF-8.
///
/// Produces uppercase hex (e.g. "%3A", not "%3a").
pub fn url_encode_bytes(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 3);
    for &b in bytes {
        if is_unreserved(b) {
            encoded.push(b as char);
        } else {
            encoded.push_str(&format!("%{:02X}", b));
        }
    }
    encoded
}

/// Unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"
/// https://datatracker.ietf.org/doc/html/rfc3986
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || byte == b'.'
        || byte == b'-'
        || byte == b'_'
        || byte == b'~'
}
