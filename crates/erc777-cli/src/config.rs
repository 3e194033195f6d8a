//! CLI configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use erc777_conformance::SuiteSettings;
use erc777_sdk::contract::DEFAULT_MINT_SIGNATURE;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Gas limit of scenario transactions
    #[serde(default = "default_gas")]
    pub gas: u64,
    /// Gas limit of the setup mints
    #[serde(default = "default_mint_gas")]
    pub mint_gas: u64,
    /// Balance minted to every account before each scenario
    #[serde(default = "default_initial_amount")]
    pub initial_amount: String,
    /// Token decimals
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Receipt polling interval in milliseconds
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    /// Mint function signature of the token under test
    #[serde(default = "default_mint_signature")]
    pub mint_signature: String,
    /// File holding the token's hex creation bytecode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytecode_path: Option<PathBuf>,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_gas() -> u64 {
    300_000
}

fn default_mint_gas() -> u64 {
    100_000
}

fn default_initial_amount() -> String {
    "10".to_string()
}

fn default_decimals() -> u32 {
    18
}

fn default_receipt_poll_ms() -> u64 {
    100
}

fn default_mint_signature() -> String {
    DEFAULT_MINT_SIGNATURE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            gas: default_gas(),
            mint_gas: default_mint_gas(),
            initial_amount: default_initial_amount(),
            decimals: default_decimals(),
            receipt_poll_ms: default_receipt_poll_ms(),
            mint_signature: default_mint_signature(),
            bytecode_path: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".operator-tck"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default location, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    /// Load config from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = Self::config_path()
            .ok_or_else(|| CliError::Config("cannot determine config path".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Suite settings derived from this config
    pub fn suite_settings(&self) -> SuiteSettings {
        SuiteSettings {
            gas: self.gas,
            mint_gas: self.mint_gas,
            initial_amount: self.initial_amount.clone(),
            decimals: self.decimals,
        }
    }

    /// Receipt polling interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.gas, 300_000);
        assert_eq!(config.mint_gas, 100_000);
        assert_eq!(config.initial_amount, "10");
        assert_eq!(config.mint_signature, "mint(address,uint256,bytes)");
        assert!(config.bytecode_path.is_none());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            rpc_url = "http://example.com:8545"
            gas = 500000
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.rpc_url, "http://example.com:8545");
        assert_eq!(config.gas, 500_000);
        assert_eq!(config.decimals, 18);
        assert_eq!(config.receipt_poll_ms, 100);
    }

    #[test]
    fn test_suite_settings() {
        let config = Config {
            initial_amount: "25".to_string(),
            ..Default::default()
        };
        let settings = config.suite_settings();
        assert_eq!(settings.initial_amount, "25");
        assert_eq!(settings.gas, 300_000);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            rpc_url: "http://10.0.0.2:8545".to_string(),
            bytecode_path: Some(PathBuf::from("/tmp/token.hex")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "gas = \"lots\"").unwrap();
        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }
}
