use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;

use crate::bencode::{decode_bencode, BValue};
use crate::torrent::error::TorrentError;
use crate::torrent::infohash::info_hash;

/// A resolved .torrent file: the tracker URL plus the validated info
/// dictionary. Built once per torrent file, immutable afterwards.
#[derive(Debug, Clone)]
pub struct TorrentMeta {
    pub announce: String, // the tracker URL
    pub info: Info,       // torrent metadata
}

/// Validated contents of the `info` dictionary.
#[derive(Debug, Clone)]
pub struct Info {
    pub name: String,                // file name, empty if the torrent omits it
    pub length: u64,                 // total size in bytes
    pub piece_length: u64,           // size of each piece in bytes
    pub info_hash: [u8; 20],         // SHA-1 of the canonical info encoding
    pub piece_hashes: Vec<[u8; 20]>, // one SHA-1 per piece, in piece order
}

impl TorrentMeta {
    /// Reads and resolves a .torrent file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TorrentError> {
        let buf = fs::read(path)?;
        let value = decode_bencode(&buf)?;
        Self::from_bvalue(&value)
    }

    /// Resolves decoded torrent metadata into a `TorrentMeta`.
    ///
    /// Pure transformation: validates the required fields and computes the
    /// info hash from the canonical re-encoding of the `info` dictionary.
    pub fn from_bvalue(value: &BValue) -> Result<Self, TorrentError> {
        let root = value.as_dict().ok_or(TorrentError::RootNotDictionary)?;

        let announce = root
            .get(b"announce".as_slice())
            .and_then(BValue::as_str)
            .ok_or(TorrentError::MissingAnnounce)?
            .to_string();

        let info_value = root
            .get(b"info".as_slice())
            .ok_or(TorrentError::MissingInfoDict)?;
        let info_dict = info_value.as_dict().ok_or(TorrentError::MissingInfoDict)?;

        // Hash before field extraction: the hash covers the whole decoded
        // dictionary, extra keys included, not just the fields kept below.
        let info_hash = info_hash(info_value);

        let info = Info::from_dict(info_dict, info_hash)?;

        debug!(
            "resolved torrent '{}': {} bytes, {} pieces, info hash {}",
            info.name,
            info.length,
            info.piece_hashes.len(),
            hex::encode(info.info_hash)
        );

        Ok(TorrentMeta { announce, info })
    }
}

impl Info {
    fn from_dict(
        dict: &BTreeMap<Vec<u8>, BValue>,
        info_hash: [u8; 20],
    ) -> Result<Self, TorrentError> {
        // `name` is advisory; torrents without one resolve with an empty name.
        let name = dict
            .get(b"name".as_slice())
            .and_then(BValue::as_str)
            .unwrap_or_default()
            .to_string();

        let length = get_u64(dict, "length")?;
        let piece_length = get_u64(dict, "piece length")?;
        let pieces_blob = lookup_bytes(dict, "pieces")?;

        if pieces_blob.len() % 20 != 0 {
            return Err(TorrentError::MalformedPieces(pieces_blob.len()));
        }

        let piece_hashes: Vec<[u8; 20]> = pieces_blob
            .chunks_exact(20)
            .map(|chunk| {
                let mut hash = [0u8; 20];
                hash.copy_from_slice(chunk);
                hash
            })
            .collect();

        // The piece hashes must cover the full length of the content.
        let covered = (piece_hashes.len() as u64)
            .checked_mul(piece_length)
            .unwrap_or(u64::MAX);
        if covered < length {
            return Err(TorrentError::PiecesTooShort { covered, length });
        }

        Ok(Info {
            name,
            length,
            piece_length,
            info_hash,
            piece_hashes,
        })
    }
}

/// Looks up a required byte-string field.
fn lookup_bytes<'a>(
    dict: &'a BTreeMap<Vec<u8>, BValue>,
    key: &'static str,
) -> Result<&'a [u8], TorrentError> {
    let val = dict
        .get(key.as_bytes())
        .ok_or(TorrentError::MissingField(key))?;
    val.as_bytes().ok_or(TorrentError::InvalidField(key))
}

/// Looks up a required non-negative integer field. Negative values are a
/// validation error rather than a wraparound.
fn get_u64(dict: &BTreeMap<Vec<u8>, BValue>, key: &'static str) -> Result<u64, TorrentError> {
    let val = dict
        .get(key.as_bytes())
        .ok_or(TorrentError::MissingField(key))?;
    let int = val.as_integer().ok_or(TorrentError::InvalidField(key))?;
    u64::try_from(int).map_err(|_| TorrentError::InvalidField(key))
}
