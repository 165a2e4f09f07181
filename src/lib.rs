// lib.rs - Library interface for the bencode/metadata/tracker core

pub mod bencode;
pub mod config;
pub mod engine;
pub mod torrent;
pub mod tracker;
pub mod utils;

pub use bencode::{decode_bencode, decode_bencode_all, encode_bvalue, BValue, BencodeError};
pub use torrent::{Info, TorrentError, TorrentMeta};
pub use tracker::{Peer, TrackerError, TrackerResponse};
