use std::collections::BTreeMap;

use super::bvalue::BValue;
use super::error::BencodeError;

/// Decodes exactly one bencoded value from `input`.
///
/// Trailing bytes after the value are an error; a torrent file or tracker
/// response holds a single top-level dictionary. Use [`decode_bencode_all`]
/// for streams of concatenated values.
pub fn decode_bencode(input: &[u8]) -> Result<BValue, BencodeError> {
    let mut cur = Cursor::new(input);
    let value = decode_value(&mut cur)?;
    if !cur.is_empty() {
        return Err(BencodeError::TrailingData(cur.pos));
    }
    Ok(value)
}

/// Decodes a stream of concatenated top-level values, consuming the whole
/// buffer. At least one value must be present.
pub fn decode_bencode_all(input: &[u8]) -> Result<Vec<BValue>, BencodeError> {
    let mut cur = Cursor::new(input);
    let mut values = Vec::new();
    loop {
        values.push(decode_value(&mut cur)?);
        if cur.is_empty() {
            return Ok(values);
        }
    }
}

/// Read position into a borrowed buffer. Each decode call owns its own
/// cursor, so independent decodes never interfere.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    fn peek(&self) -> Result<u8, BencodeError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(BencodeError::UnexpectedEof)
    }

    fn bump(&mut self) -> Result<u8, BencodeError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], BencodeError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(BencodeError::UnexpectedEof)?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

fn decode_value(cur: &mut Cursor) -> Result<BValue, BencodeError> {
    match cur.peek()? {
        b'i' => decode_integer(cur),
        b'l' => decode_list(cur),
        b'd' => decode_dict(cur),
        c if c.is_ascii_digit() => decode_string(cur),
        c => Err(BencodeError::InvalidFormat(format!(
            "unexpected byte {:?}",
            c as char
        ))),
    }
}

/// Format: `i<digits>e`, optionally with one leading `-`.
fn decode_integer(cur: &mut Cursor) -> Result<BValue, BencodeError> {
    cur.bump()?; // 'i'

    let mut digits = Vec::new();
    loop {
        let b = cur.bump()?;
        if b == b'e' {
            break;
        }
        digits.push(b);
    }

    let text = std::str::from_utf8(&digits)
        .map_err(|_| BencodeError::InvalidInteger(String::from_utf8_lossy(&digits).into_owned()))?;

    let magnitude = text.strip_prefix('-').unwrap_or(text);
    // Empty digit run, bare '-', leading zeros ("03"), and "-0" are all
    // invalid per the format.
    let valid = !magnitude.is_empty()
        && magnitude.bytes().all(|b| b.is_ascii_digit())
        && (magnitude.len() == 1 || !magnitude.starts_with('0'))
        && text != "-0";
    if !valid {
        return Err(BencodeError::InvalidInteger(text.to_string()));
    }

    // i64 overflow surfaces here rather than wrapping.
    let parsed = text
        .parse::<i64>()
        .map_err(|_| BencodeError::InvalidInteger(text.to_string()))?;

    Ok(BValue::Integer(parsed))
}

/// Format: `<length>:<bytes>`.
fn decode_string(cur: &mut Cursor) -> Result<BValue, BencodeError> {
    let mut digits = Vec::new();
    loop {
        let b = cur.bump()?;
        if b == b':' {
            break;
        }
        if !b.is_ascii_digit() {
            digits.push(b);
            return Err(BencodeError::InvalidStringLength(
                String::from_utf8_lossy(&digits).into_owned(),
            ));
        }
        digits.push(b);
    }

    if digits.is_empty() {
        return Err(BencodeError::InvalidStringLength(String::new()));
    }

    let length = std::str::from_utf8(&digits)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            BencodeError::InvalidStringLength(String::from_utf8_lossy(&digits).into_owned())
        })?;

    let data = cur.take(length)?;
    Ok(BValue::ByteString(data.to_vec()))
}

/// Format: `l<values>e`. An empty list (`le`) is valid.
fn decode_list(cur: &mut Cursor) -> Result<BValue, BencodeError> {
    cur.bump()?; // 'l'

    let mut items = Vec::new();
    while cur.peek()? != b'e' {
        items.push(decode_value(cur)?);
    }
    cur.bump()?; // 'e'

    Ok(BValue::List(items))
}

/// Format: `d<bencoded string><bencoded value>...e`.
///
/// Permissive on duplicates: a later key overwrites an earlier one, matching
/// map-insert behavior in other clients. Keys that are not byte strings are
/// rejected.
fn decode_dict(cur: &mut Cursor) -> Result<BValue, BencodeError> {
    cur.bump()?; // 'd'

    let mut map = BTreeMap::new();
    while cur.peek()? != b'e' {
        let key = match decode_value(cur)? {
            BValue::ByteString(bytes) => bytes,
            _ => return Err(BencodeError::NonStringKey),
        };
        let value = decode_value(cur)?;
        map.insert(key, value);
    }
    cur.bump()?; // 'e'

    Ok(BValue::Dict(map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_string() {
        let value = decode_bencode(b"4:spam").unwrap();
        assert_eq!(value, BValue::ByteString(b"spam".to_vec()));
    }

    #[test]
    fn test_decode_empty_string() {
        let value = decode_bencode(b"0:").unwrap();
        assert_eq!(value, BValue::ByteString(Vec::new()));
    }

    #[test]
    fn test_decode_integer() {
        assert_eq!(decode_bencode(b"i3e").unwrap(), BValue::Integer(3));
        assert_eq!(decode_bencode(b"i-3e").unwrap(), BValue::Integer(-3));
        assert_eq!(decode_bencode(b"i0e").unwrap(), BValue::Integer(0));
    }

    #[test]
    fn test_decode_invalid_integers() {
        assert!(matches!(
            decode_bencode(b"ie"),
            Err(BencodeError::InvalidInteger(_))
        ));
        assert!(matches!(
            decode_bencode(b"i-e"),
            Err(BencodeError::InvalidInteger(_))
        ));
        assert!(matches!(
            decode_bencode(b"i03e"),
            Err(BencodeError::InvalidInteger(_))
        ));
        assert!(matches!(
            decode_bencode(b"i-0e"),
            Err(BencodeError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_decode_integer_overflow() {
        // One past i64::MAX.
        assert!(matches!(
            decode_bencode(b"i9223372036854775808e"),
            Err(BencodeError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_decode_list() {
        let value = decode_bencode(b"l4:spam4:eggse").unwrap();
        assert_eq!(
            value,
            BValue::List(vec![
                BValue::ByteString(b"spam".to_vec()),
                BValue::ByteString(b"eggs".to_vec()),
            ])
        );
    }

    #[test]
    fn test_decode_empty_list() {
        assert_eq!(decode_bencode(b"le").unwrap(), BValue::List(Vec::new()));
    }

    #[test]
    fn test_decode_nested_list() {
        let value = decode_bencode(b"l4:spaml3:eggi3eee").unwrap();
        assert_eq!(
            value,
            BValue::List(vec![
                BValue::ByteString(b"spam".to_vec()),
                BValue::List(vec![
                    BValue::ByteString(b"egg".to_vec()),
                    BValue::Integer(3)
                ]),
            ])
        );
    }

    #[test]
    fn test_decode_dict() {
        let value = decode_bencode(b"d3:cow3:moo4:spam4:eggse").unwrap();
        let mut expected = BTreeMap::new();
        expected.insert(b"cow".to_vec(), BValue::ByteString(b"moo".to_vec()));
        expected.insert(b"spam".to_vec(), BValue::ByteString(b"eggs".to_vec()));
        assert_eq!(value, BValue::Dict(expected));
    }

    #[test]
    fn test_decode_empty_dict() {
        assert_eq!(decode_bencode(b"de").unwrap(), BValue::Dict(BTreeMap::new()));
    }

    #[test]
    fn test_decode_dict_duplicate_key_last_wins() {
        let value = decode_bencode(b"d3:fooi1e3:fooi2ee").unwrap();
        let dict = value.as_dict().unwrap();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict[b"foo".as_slice()], BValue::Integer(2));
    }

    #[test]
    fn test_decode_dict_key_not_string() {
        assert_eq!(
            decode_bencode(b"di42e4:spame"),
            Err(BencodeError::NonStringKey)
        );
    }

    #[test]
    fn test_decode_string_truncated() {
        assert_eq!(decode_bencode(b"4:ab"), Err(BencodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_string_bad_length_run() {
        assert!(matches!(
            decode_bencode(b"4x:spam"),
            Err(BencodeError::InvalidStringLength(_))
        ));
    }

    #[test]
    fn test_decode_unclosed_containers() {
        assert_eq!(decode_bencode(b"l4:spam"), Err(BencodeError::UnexpectedEof));
        assert_eq!(
            decode_bencode(b"d3:foo4:spam"),
            Err(BencodeError::UnexpectedEof)
        );
        assert_eq!(decode_bencode(b"i42"), Err(BencodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_empty_input() {
        assert_eq!(decode_bencode(b""), Err(BencodeError::UnexpectedEof));
    }

    #[test]
    fn test_decode_unknown_tag_byte() {
        assert!(matches!(
            decode_bencode(b"x"),
            Err(BencodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        assert_eq!(
            decode_bencode(b"i3etrailing"),
            Err(BencodeError::TrailingData(3))
        );
    }

    #[test]
    fn test_decode_all_concatenated_values() {
        let values = decode_bencode_all(b"i1e4:spamle").unwrap();
        assert_eq!(
            values,
            vec![
                BValue::Integer(1),
                BValue::ByteString(b"spam".to_vec()),
                BValue::List(Vec::new()),
            ]
        );
    }

    #[test]
    fn test_decode_all_empty_input() {
        assert_eq!(decode_bencode_all(b""), Err(BencodeError::UnexpectedEof));
    }
}
