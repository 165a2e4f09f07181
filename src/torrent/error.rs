use thiserror::Error;

use crate::bencode::BencodeError;

#[derive(Debug, Error)]
pub enum TorrentError {
    #[error("Root of torrent metadata must be a dictionary")]
    RootNotDictionary,

    #[error("Missing or invalid 'announce' field")]
    MissingAnnounce,

    #[error("Missing or invalid 'info' dictionary")]
    MissingInfoDict,

    #[error("Missing '{0}' in info dictionary")]
    MissingField(&'static str),

    #[error("Invalid '{0}' in info dictionary")]
    InvalidField(&'static str),

    #[error("Malformed pieces blob: length {0} is not a multiple of 20")]
    MalformedPieces(usize),

    #[error("Pieces cover {covered} bytes but torrent length is {length}")]
    PiecesTooShort { covered: u64, length: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bencode error: {0}")]
    Bencode(#[from] BencodeError),
}
