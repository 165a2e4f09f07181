mod url_encode;

pub use url_encode::url_encode_bytes;

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Generates a 20-byte peer id: the client prefix (truncated to 20 bytes if
/// oversized) followed by random alphanumeric filler.
pub fn generate_peer_id(prefix: &str) -> [u8; 20] {
    let mut peer_id = [0u8; 20];
    let prefix = prefix.as_bytes();
    let split = prefix.len().min(20);
    peer_id[..split].copy_from_slice(&prefix[..split]);

    let mut rng = rand::thread_rng();
    for slot in peer_id[split..].iter_mut() {
        *slot = rng.sample(Alphanumeric);
    }
    peer_id
}
