use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub peer_id_prefix: String,
    pub listen_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            peer_id_prefix: "-BK0001-".to_string(),
            listen_port: 6881,
        }
    }
}

impl Config {
    /// Loads `bitkit.toml` from the working directory, writing the defaults
    /// there on first run.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = "bitkit.toml";
        if Path::new(config_path).exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let config = Self::default();
            let toml = toml::to_string(&config)?;
            fs::write(config_path, toml)?;
            Ok(config)
        }
    }
}
