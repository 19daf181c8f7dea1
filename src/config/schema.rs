//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the explorer clients.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Bitcoin explorer settings.
    pub bitcoin: BitcoinConfig,

    /// Ethereum explorer settings.
    pub ethereum: EthereumConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Bitcoin explorer (Blockstream-compatible REST API).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BitcoinConfig {
    /// Base URL, e.g. "https://blockstream.info/api".
    pub base_url: String,

    /// Connect and request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BitcoinConfig {
    fn default() -> Self {
        Self {
            base_url: "https://blockstream.info/api".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Ethereum explorer (Etherscan-compatible API).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EthereumConfig {
    /// Base URL, e.g. "https://api.etherscan.io/api".
    pub base_url: String,

    /// API key. `ETHERSCAN_API_KEY` overrides this value.
    pub api_key: Option<String>,

    /// Sent as `chainid` when set (multichain endpoints).
    pub chain_id: Option<u64>,

    /// Connect and request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io/api".to_string(),
            api_key: None,
            chain_id: None,
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bitcoin.base_url, "https://blockstream.info/api");
        assert_eq!(config.bitcoin.timeout_secs, 10);
        assert_eq!(config.ethereum.base_url, "https://api.etherscan.io/api");
        assert_eq!(config.ethereum.timeout_secs, 10);
        assert!(config.ethereum.api_key.is_none());
        assert!(config.ethereum.chain_id.is_none());
        assert_eq!(config.observability.log_level, "warn");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [ethereum]
            api_key = "ABC123"
            chain_id = 1

            [bitcoin]
            timeout_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.ethereum.api_key.as_deref(), Some("ABC123"));
        assert_eq!(config.ethereum.chain_id, Some(1));
        assert_eq!(config.ethereum.base_url, "https://api.etherscan.io/api");
        assert_eq!(config.bitcoin.timeout_secs, 3);
        assert_eq!(config.bitcoin.base_url, "https://blockstream.info/api");
    }
}
