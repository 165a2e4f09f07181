pub mod error;

pub use error::TrackerError;

use std::net::{IpAddr, Ipv4Addr};

use bytes::Bytes;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::Url;

use crate::bencode::{decode_bencode, BValue};
use crate::torrent::TorrentMeta;
use crate::utils::url_encode_bytes;

/// A peer returned by the tracker. Peers are plain values; a fresh list is
/// produced per announce and no identity persists across announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    pub ip: IpAddr,
    pub port: u16,
    pub id: Option<Vec<u8>>, // absent in compact responses
}

/// A decoded tracker announce response.
#[derive(Debug, Clone)]
pub struct TrackerResponse {
    pub interval: u64, // seconds until the next announce
    pub complete: Option<u64>,
    pub incomplete: Option<u64>,
    pub peers: Vec<Peer>,
}

/// Builds the announce URL for a torrent.
///
/// `info_hash` and `peer_id` are raw bytes percent-encoded byte-for-byte,
/// never treated as UTF-8 text. The compact peer encoding is always
/// requested.
pub fn build_announce_url(
    meta: &TorrentMeta,
    peer_id: &[u8; 20],
    port: u16,
) -> Result<Url, TrackerError> {
    let mut url = Url::parse(&meta.announce).map_err(|e| TrackerError::Url(e.to_string()))?;

    let query = format!(
        "info_hash={info_hash}&peer_id={peer_id}&port={port}&uploaded=0&downloaded=0&left={left}&compact=1",
        info_hash = url_encode_bytes(&meta.info.info_hash),
        peer_id = url_encode_bytes(peer_id),
        port = port,
        left = meta.info.length,
    );

    // Some announce URLs already carry query parameters (e.g. a passkey).
    match url.query() {
        Some(existing) if !existing.is_empty() => {
            let merged = format!("{existing}&{query}");
            url.set_query(Some(&merged));
        }
        _ => url.set_query(Some(&query)),
    }

    Ok(url)
}

/// Performs a single blocking announce and returns the raw response body.
///
/// A non-success HTTP status is `BadStatus`; transport failures surface as
/// `Connection`. No retry happens at this layer — retry policy belongs to
/// the caller.
pub fn announce(
    client: &Client,
    meta: &TorrentMeta,
    peer_id: &[u8; 20],
    port: u16,
) -> Result<Bytes, TrackerError> {
    let url = build_announce_url(meta, peer_id, port)?;
    debug!("announcing to {url}");

    let response = client.get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(TrackerError::BadStatus(status));
    }

    Ok(response.bytes()?)
}

/// Decodes a raw tracker response body into a `TrackerResponse`.
///
/// A tracker-reported `failure reason` surfaces as `Failure` before any
/// peer parsing is attempted.
pub fn parse_response(body: &[u8]) -> Result<TrackerResponse, TrackerError> {
    let value = decode_bencode(body)?;
    let dict = value.as_dict().ok_or(TrackerError::NotADictionary)?;

    if let Some(reason) = dict.get(b"failure reason".as_slice()) {
        let reason = match reason {
            BValue::ByteString(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            other => format!("{:?}", other),
        };
        return Err(TrackerError::Failure(reason));
    }

    let interval = get_count(dict, b"interval").unwrap_or(0);
    let complete = get_count(dict, b"complete");
    let incomplete = get_count(dict, b"incomplete");
    let peers = parse_peers(&value)?;

    Ok(TrackerResponse {
        interval,
        complete,
        incomplete,
        peers,
    })
}

/// Extracts the peer list from a decoded tracker response.
///
/// The `peers` key may be either a byte string in the compact 6-byte-per-peer
/// encoding or a list of per-peer dictionaries. In the list form, entries
/// with an unparseable IP or a zero port are silently dropped rather than
/// failing the whole response.
pub fn parse_peers(value: &BValue) -> Result<Vec<Peer>, TrackerError> {
    let dict = value.as_dict().ok_or(TrackerError::NotADictionary)?;

    let peers_val = dict
        .get(b"peers".as_slice())
        .ok_or(TrackerError::InvalidPeersField)?;

    match peers_val {
        // Compact: each peer is 6 bytes, 4 of big-endian IPv4 + 2 of
        // big-endian port.
        BValue::ByteString(bytes) => {
            if bytes.len() % 6 != 0 {
                return Err(TrackerError::InvalidPeersField);
            }
            let peers = bytes
                .chunks_exact(6)
                .map(|chunk| Peer {
                    ip: IpAddr::V4(Ipv4Addr::new(chunk[0], chunk[1], chunk[2], chunk[3])),
                    port: u16::from_be_bytes([chunk[4], chunk[5]]),
                    id: None,
                })
                .collect();
            Ok(peers)
        }
        // Non-compact: dictionaries with "ip", "port" and an optional
        // "peer id".
        BValue::List(list) => {
            let mut peers = Vec::new();
            for item in list {
                let peer_dict = match item.as_dict() {
                    Some(d) => d,
                    None => continue,
                };
                let ip = match peer_dict
                    .get(b"ip".as_slice())
                    .and_then(BValue::as_str)
                    .and_then(|s| s.parse::<IpAddr>().ok())
                {
                    Some(ip) => ip,
                    None => {
                        warn!("dropping peer entry with unparseable ip");
                        continue;
                    }
                };
                let port = match peer_dict
                    .get(b"port".as_slice())
                    .and_then(BValue::as_integer)
                    .and_then(|p| u16::try_from(p).ok())
                {
                    Some(p) if p != 0 => p,
                    _ => {
                        warn!("dropping peer entry with missing or zero port");
                        continue;
                    }
                };
                let id = peer_dict
                    .get(b"peer id".as_slice())
                    .and_then(BValue::as_bytes)
                    .map(|b| b.to_vec());
                peers.push(Peer { ip, port, id });
            }
            Ok(peers)
        }
        _ => Err(TrackerError::InvalidPeersField),
    }
}

/// Announces to the tracker and decodes the response, the full exchange in
/// one call.
pub fn fetch_peers(
    client: &Client,
    meta: &TorrentMeta,
    peer_id: &[u8; 20],
    port: u16,
) -> Result<TrackerResponse, TrackerError> {
    let body = announce(client, meta, peer_id, port)?;
    parse_response(&body)
}

fn get_count(dict: &std::collections::BTreeMap<Vec<u8>, BValue>, key: &[u8]) -> Option<u64> {
    dict.get(key)
        .and_then(BValue::as_integer)
        .and_then(|i| u64::try_from(i).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::Info;

    fn test_meta() -> TorrentMeta {
        TorrentMeta {
            announce: "http://tracker.example.com/announce".to_string(),
            info: Info {
                name: "a.bin".to_string(),
                length: 1234,
                piece_length: 16384,
                info_hash: [0x12; 20],
                piece_hashes: vec![[0u8; 20]],
            },
        }
    }

    #[test]
    fn test_build_announce_url_query() {
        let meta = test_meta();
        let peer_id = *b"-BK0001-abcdefghijkl";
        let url = build_announce_url(&meta, &peer_id, 6881).unwrap();
        assert_eq!(
            url.as_str(),
            "http://tracker.example.com/announce\
             ?info_hash=%12%12%12%12%12%12%12%12%12%12%12%12%12%12%12%12%12%12%12%12\
             &peer_id=-BK0001-abcdefghijkl\
             &port=6881&uploaded=0&downloaded=0&left=1234&compact=1"
        );
    }

    #[test]
    fn test_build_announce_url_keeps_existing_query() {
        let mut meta = test_meta();
        meta.announce = "http://tracker.example.com/announce?passkey=abc".to_string();
        let url = build_announce_url(&meta, b"-BK0001-abcdefghijkl", 6881).unwrap();
        let query = url.query().unwrap();
        assert!(query.starts_with("passkey=abc&info_hash="));
    }

    #[test]
    fn test_build_announce_url_rejects_malformed_announce() {
        let mut meta = test_meta();
        meta.announce = "not a url".to_string();
        assert!(matches!(
            build_announce_url(&meta, b"-BK0001-abcdefghijkl", 6881),
            Err(TrackerError::Url(_))
        ));
    }

    #[test]
    fn test_parse_compact_peers() {
        // One 6-byte entry: 10.0.0.1:6881.
        let mut body = b"d8:completei0e10:incompletei1e8:intervali1800e5:peers6:".to_vec();
        body.extend_from_slice(&[10, 0, 0, 1, 0x1a, 0xe1]);
        body.push(b'e');

        let response = parse_response(&body).unwrap();
        assert_eq!(response.interval, 1800);
        assert_eq!(response.complete, Some(0));
        assert_eq!(response.incomplete, Some(1));
        assert_eq!(
            response.peers,
            vec![Peer {
                ip: "10.0.0.1".parse().unwrap(),
                port: 6881,
                id: None,
            }]
        );
    }

    #[test]
    fn test_parse_compact_peers_bad_length() {
        let mut body = b"d8:intervali1800e5:peers5:".to_vec();
        body.extend_from_slice(&[10, 0, 0, 1, 0x1a]);
        body.push(b'e');

        assert!(matches!(
            parse_response(&body),
            Err(TrackerError::InvalidPeersField)
        ));
    }

    #[test]
    fn test_parse_peer_dictionaries() {
        let body = b"d8:intervali900e5:peersl\
            d2:ip8:10.0.0.24:porti6881e7:peer id20:-XX0001-000000000000e\
            d2:ip8:10.0.0.34:porti0ee\
            d2:ip9:not-an-ip4:porti6881ee\
            ee"
        .to_vec();

        let response = parse_response(&body).unwrap();
        assert_eq!(response.interval, 900);
        // The zero-port and unparseable-ip entries are dropped.
        assert_eq!(
            response.peers,
            vec![Peer {
                ip: "10.0.0.2".parse().unwrap(),
                port: 6881,
                id: Some(b"-XX0001-000000000000".to_vec()),
            }]
        );
    }

    #[test]
    fn test_parse_response_missing_peers() {
        assert!(matches!(
            parse_response(b"d8:intervali1800ee"),
            Err(TrackerError::InvalidPeersField)
        ));
    }

    #[test]
    fn test_parse_response_peers_wrong_shape() {
        assert!(matches!(
            parse_response(b"d8:intervali1800e5:peersi42ee"),
            Err(TrackerError::InvalidPeersField)
        ));
    }

    #[test]
    fn test_parse_response_not_a_dictionary() {
        assert!(matches!(
            parse_response(b"le"),
            Err(TrackerError::NotADictionary)
        ));
    }

    #[test]
    fn test_parse_response_failure_reason() {
        let body = b"d14:failure reason12:unregisterede";
        match parse_response(body) {
            Err(TrackerError::Failure(reason)) => assert_eq!(reason, "unregistered"),
            other => panic!("expected failure, got {:?}", other.map(|r| r.peers)),
        }
    }
}
