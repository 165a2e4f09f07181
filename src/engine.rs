// src/engine.rs
use anyhow::{anyhow, bail, Context};
use log::info;
use reqwest::blocking::Client;

use crate::bencode::{bvalue_to_json, decode_bencode};
use crate::config::Config;
use crate::torrent::TorrentMeta;
use crate::tracker;
use crate::utils;

/// Dispatches a CLI command. The commands mirror the pipeline: `decode` for
/// raw bencode, `info` for metadata resolution, `peers` for a full tracker
/// round trip.
pub fn use_command(args: Vec<String>) -> anyhow::Result<()> {
    if args.len() < 2 {
        bail!("no command provided");
    }

    match args[1].as_str() {
        "decode" => {
            if args.len() < 3 {
                bail!("usage: decode <bencoded_string>");
            }
            let value = decode_bencode(args[2].as_bytes())?;
            println!("{}", serde_json::to_string(&bvalue_to_json(&value))?);
        }
        "info" => {
            if args.len() < 3 {
                bail!("usage: info <torrent_file>");
            }
            let meta = TorrentMeta::from_file(&args[2]).context("reading torrent file")?;

            println!("Info Hash: {}", hex::encode(meta.info.info_hash));
            println!("Tracker URL: {}", meta.announce);
            println!("File Name: {}", meta.info.name);
            println!("Length: {}", meta.info.length);
            println!("Piece Length: {}", meta.info.piece_length);
            println!("Number of Pieces: {}", meta.info.piece_hashes.len());
            for piece_hash in &meta.info.piece_hashes {
                println!("{}", hex::encode(piece_hash));
            }
        }
        "peers" => {
            if args.len() < 3 {
                bail!("usage: peers <torrent_file>");
            }
            let config = Config::load().map_err(|e| anyhow!("loading config: {e}"))?;
            let meta = TorrentMeta::from_file(&args[2]).context("reading torrent file")?;

            let client = Client::new();
            let peer_id = utils::generate_peer_id(&config.peer_id_prefix);
            let response =
                tracker::fetch_peers(&client, &meta, &peer_id, config.listen_port)?;

            info!(
                "tracker returned {} peers, next announce in {}s",
                response.peers.len(),
                response.interval
            );
            for peer in &response.peers {
                println!("{}:{}", peer.ip, peer.port);
            }
        }
        other => bail!("unknown command '{other}'"),
    }

    Ok(())
}
