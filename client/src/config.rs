//! Client configuration

use crate::address::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "STAKING_CONFIG";

/// Config file used when `STAKING_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "staking-config.toml";

/// SFT token on mainnet
const SFT_TOKEN: Address = Address::new([
    0x19, 0x6d, 0x3b, 0x04, 0xbe, 0x42, 0x37, 0x1a, 0x5e, 0x92, 0x4c, 0x39, 0xa1, 0x4a, 0xe0, 0xdb,
    0x88, 0x82, 0xfd, 0x46,
]);

/// SFT staking contract on mainnet
const SFT_STAKING: Address = Address::new([
    0x31, 0xed, 0x44, 0x01, 0x53, 0x0c, 0xd2, 0x13, 0x7a, 0x66, 0xfa, 0x19, 0xd8, 0xcb, 0x98, 0x6e,
    0xab, 0x41, 0xb7, 0xbf,
]);

/// Contract addresses and network settings
///
/// The client itself only reads the two addresses. `rpc_url` and `chain_id`
/// are carried for whoever builds the [`ChainSession`](crate::ChainSession):
/// the session connects to that endpoint and rejects a wallet on another
/// chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint for the session implementation
    pub rpc_url: String,

    /// EVM chain id the session must be connected to
    pub chain_id: u64,

    /// ERC20 token being staked
    pub token_address: Address,

    /// Staking contract, also the allowance spender
    pub staking_address: Address,
}

impl Config {
    /// Load configuration from TOML file
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path (`~` is expanded)
    pub fn load_from(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let config_str = std::fs::read_to_string(expanded.as_ref())
            .context(format!("Failed to read config file: {}", path))?;

        let config: Config =
            toml::from_str(&config_str).context("Failed to parse config TOML")?;

        Ok(config)
    }

    /// Load configuration, falling back to mainnet defaults
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({:#}), using default mainnet config", e);
            Self::default_mainnet()
        })
    }

    /// Create default configuration
    pub fn default_mainnet() -> Self {
        Self {
            rpc_url: "https://cloudflare-eth.com".to_string(),
            chain_id: 1,
            token_address: SFT_TOKEN,
            staking_address: SFT_STAKING,
        }
    }

    /// Write default config to file
    pub fn write_default(path: &str) -> Result<()> {
        let config = Self::default_mainnet();
        let toml_str = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        let expanded = shellexpand::tilde(path);
        std::fs::write(expanded.as_ref(), toml_str)
            .context(format!("Failed to write config to {}", path))?;

        log::info!("Created default config at {}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_mainnet();
        assert_eq!(config.chain_id, 1);
        assert_eq!(
            config.token_address.to_string(),
            "0x196D3B04be42371a5E924C39A14ae0dB8882FD46".to_lowercase()
        );
        assert_eq!(
            config.staking_address.to_string(),
            "0x31ed4401530Cd2137A66fA19D8cB986eaB41b7Bf".to_lowercase()
        );
    }

    #[test]
    fn test_config_toml_round_trip() {
        let path = std::env::temp_dir().join(format!("staking-config-{}.toml", std::process::id()));
        let path = path.to_string_lossy().to_string();

        Config::write_default(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, Config::default_mainnet());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_parse_rejects_bad_address() {
        let toml_str = r#"
            rpc_url = "http://localhost:8545"
            chain_id = 31337
            token_address = "0x1234"
            staking_address = "0x31ed4401530Cd2137A66fA19D8cB986eaB41b7Bf"
        "#;
        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(Config::load_from("/nonexistent/staking-config.toml").is_err());
    }
}
