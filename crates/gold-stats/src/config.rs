//! Configuration management for gold-stats
//!
//! A TOML file provides the base values; the deployment environment then
//! overrides the handful of settings it has always controlled (RPC endpoint,
//! tracked mint, tracked wallet, bind address).

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

use crate::chain::constants::{MAX_PARSED_TRANSACTIONS, MAX_SIGNATURES};

/// Public mainnet endpoint used when nothing else is configured
pub const DEFAULT_RPC_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StatsConfig {
    pub rpc: RpcConfig,
    pub tracking: TrackingConfig,
    pub scan: ScanConfig,
    pub cache: CacheConfig,
    pub api: ApiConfig,
    pub monitoring: MonitoringConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RpcConfig {
    #[validate(url)]
    pub endpoint: String,
    pub commitment: String,
    #[validate(range(min = 1, max = 60))]
    pub connect_timeout_secs: u64,
    #[validate(range(min = 1, max = 300))]
    pub read_timeout_secs: u64,
}

/// What is being tracked. Both are optional: an absent value turns the
/// corresponding figure into a constant zero.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrackingConfig {
    /// Token mint (or bonding curve address) whose creator fees are read
    pub token_mint: Option<String>,
    /// Wallet whose GOLD inflow and fee claims are scanned
    pub dev_wallet: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScanConfig {
    #[validate(range(min = 1, max = 1000))]
    pub max_signatures: usize,
    #[validate(range(min = 1, max = 1000))]
    pub max_parsed_transactions: usize,
    #[validate(range(min = 1, max = 16))]
    pub fetch_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheConfig {
    #[validate(range(min = 1, max = 3600))]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: String,
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON file of distribution records; no store when absent
    pub seed_path: Option<PathBuf>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
            commitment: "confirmed".to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_signatures: MAX_SIGNATURES,
            max_parsed_transactions: MAX_PARSED_TRANSACTIONS,
            fetch_concurrency: 1,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 60 }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
            enable_cors: true,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl StatsConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; blank values count as unset
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter().find_map(|key| {
                lookup(*key)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            })
        };

        if let Some(endpoint) = get(&["HELIUS_RPC_URL", "SOLANA_RPC"]) {
            self.rpc.endpoint = endpoint;
        }
        if let Some(mint) = get(&["CA", "TOKEN_CA", "CONTRACT_ADDRESS"]) {
            self.tracking.token_mint = Some(mint);
        }
        if let Some(wallet) = get(&["DEV_WALLET_ADDRESS"]) {
            self.tracking.dev_wallet = Some(wallet);
        }

        let host = get(&["HOST"]);
        let port = get(&["PORT"]);
        if host.is_some() || port.is_some() {
            let (current_host, current_port) = self
                .api
                .bind_address
                .rsplit_once(':')
                .map(|(h, p)| (h.to_string(), p.to_string()))
                .unwrap_or_else(|| (self.api.bind_address.clone(), "5000".to_string()));
            self.api.bind_address = format!(
                "{}:{}",
                host.unwrap_or(current_host),
                port.unwrap_or(current_port)
            );
        }
    }

    /// Tracked mint, trimmed, if any
    pub fn token_mint(&self) -> Option<&str> {
        non_blank(self.tracking.token_mint.as_deref())
    }

    /// Tracked wallet, trimmed, if any
    pub fn dev_wallet(&self) -> Option<&str> {
        non_blank(self.tracking.dev_wallet.as_deref())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.rpc.validate()?;
        self.scan.validate()?;
        self.cache.validate()?;

        if self.rpc.commitment.is_empty() {
            return Err(anyhow!("RPC commitment cannot be empty"));
        }
        if self.scan.max_parsed_transactions > self.scan.max_signatures {
            return Err(anyhow!(
                "max_parsed_transactions ({}) cannot exceed max_signatures ({})",
                self.scan.max_parsed_transactions,
                self.scan.max_signatures
            ));
        }
        if self.api.bind_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(anyhow!("Invalid bind address: {}", self.api.bind_address));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = StatsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rpc.endpoint, DEFAULT_RPC_ENDPOINT);
        assert_eq!(config.scan.max_signatures, 80);
        assert_eq!(config.scan.max_parsed_transactions, 20);
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.token_mint(), None);
    }

    #[test]
    fn test_env_precedence() {
        let mut config = StatsConfig::default();
        config.apply_env(env(&[
            ("SOLANA_RPC", "https://fallback.example"),
            ("HELIUS_RPC_URL", "https://helius.example"),
            ("TOKEN_CA", "SecondChoice"),
            ("CONTRACT_ADDRESS", "ThirdChoice"),
            ("DEV_WALLET_ADDRESS", "  Wallet111  "),
        ]));
        assert_eq!(config.rpc.endpoint, "https://helius.example");
        assert_eq!(config.token_mint(), Some("SecondChoice"));
        assert_eq!(config.dev_wallet(), Some("Wallet111"));
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = StatsConfig::default();
        config.apply_env(env(&[("CA", "   "), ("HELIUS_RPC_URL", ""), ("SOLANA_RPC", "https://b.example")]));
        assert_eq!(config.token_mint(), None);
        assert_eq!(config.rpc.endpoint, "https://b.example");
    }

    #[test]
    fn test_host_and_port_override() {
        let mut config = StatsConfig::default();
        config.apply_env(env(&[("PORT", "8080")]));
        assert_eq!(config.api.bind_address, "127.0.0.1:8080");
        config.apply_env(env(&[("HOST", "0.0.0.0")]));
        assert_eq!(config.api.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_validation_rejects_inverted_caps() {
        let mut config = StatsConfig::default();
        config.scan.max_signatures = 10;
        config.scan.max_parsed_transactions = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_endpoint() {
        let mut config = StatsConfig::default();
        config.rpc.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
