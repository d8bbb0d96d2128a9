//! Configuration management for tallychain

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub miner: MinerConfig,
}

#[derive(Debug, Deserialize)]
pub struct NodeConfig {
    /// Path to chain storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Chain identifier used when initializing a new ledger.
    #[serde(default)]
    pub chain: u64,
    /// Starting complexity for the genesis block.
    #[serde(default = "default_complexity")]
    pub complexity: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MinerConfig {
    /// Worker threads for the variance search; 0 means one per CPU.
    #[serde(default)]
    pub threads: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            data_dir: default_data_dir(),
            chain: 0,
            complexity: default_complexity(),
        }
    }
}

impl Default for MinerConfig {
    fn default() -> Self {
        MinerConfig { threads: 0 }
    }
}

/// Load `config.toml` from the working directory, falling back to defaults
/// when it is absent.
pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config::default()
    } else {
        toml::from_str(&config_str)?
    };

    if config.node.data_dir.is_empty() {
        return Err("node.data_dir must be set in config.toml".into());
    }

    Ok(config)
}

fn default_data_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tallychain")
        .to_string_lossy()
        .into_owned()
}

fn default_complexity() -> u64 {
    16
}
