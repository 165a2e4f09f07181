pub mod error;
pub mod infohash;
pub mod metadata;

pub use error::TorrentError;
pub use infohash::info_hash;
pub use metadata::{Info, TorrentMeta};
