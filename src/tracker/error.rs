use thiserror::Error;

use crate::bencode::BencodeError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid announce URL: {0}")]
    Url(String),

    #[error("Tracker request failed: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Tracker returned status {0}")]
    BadStatus(reqwest::StatusCode),

    #[error("Tracker response bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Tracker response is not a dictionary")]
    NotADictionary,

    #[error("Missing or unrecognized 'peers' field in tracker response")]
    InvalidPeersField,

    #[error("Tracker failure: {0}")]
    Failure(String),
}
