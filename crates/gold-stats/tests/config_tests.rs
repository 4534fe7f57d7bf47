//! Configuration loading tests

use anyhow::Result;
use gold_stats::config::StatsConfig;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn create_test_config_content() -> String {
    r#"
[rpc]
endpoint = "https://rpc.example.com"
commitment = "finalized"
read_timeout_secs = 15

[tracking]
token_mint = "6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P"

[scan]
max_signatures = 40
max_parsed_transactions = 10
fetch_concurrency = 2

[cache]
ttl_secs = 30

[api]
bind_address = "0.0.0.0:8080"
enable_cors = false

[monitoring]
log_level = "debug"
structured_logging = true
"#
    .to_string()
}

#[test]
fn test_config_loading_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("gold-stats.toml");
    fs::write(&config_path, create_test_config_content())?;

    let config = StatsConfig::from_file(config_path.to_str().unwrap())?;
    config.validate()?;

    assert_eq!(config.rpc.endpoint, "https://rpc.example.com");
    assert_eq!(config.rpc.commitment, "finalized");
    assert_eq!(config.rpc.read_timeout_secs, 15);
    // Unset keys keep their defaults
    assert_eq!(config.rpc.connect_timeout_secs, 10);
    assert_eq!(config.token_mint(), Some("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P"));
    assert_eq!(config.dev_wallet(), None);
    assert_eq!(config.scan.max_signatures, 40);
    assert_eq!(config.scan.fetch_concurrency, 2);
    assert_eq!(config.cache.ttl(), Duration::from_secs(30));
    assert!(!config.api.enable_cors);
    assert!(config.monitoring.structured_logging);
    assert!(config.store.seed_path.is_none());
    Ok(())
}

#[test]
fn test_empty_file_gives_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("empty.toml");
    fs::write(&config_path, "")?;

    let config = StatsConfig::from_file(config_path.to_str().unwrap())?;
    assert!(config.validate().is_ok());
    assert_eq!(config.api.bind_address, "127.0.0.1:5000");
    assert_eq!(config.scan.max_parsed_transactions, 20);
    Ok(())
}

#[test]
fn test_environment_overrides_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("gold-stats.toml");
    fs::write(&config_path, create_test_config_content())?;

    let mut config = StatsConfig::from_file(config_path.to_str().unwrap())?;
    config.apply_env(|key| match key {
        "CA" => Some("OverrideMint".to_string()),
        "SOLANA_RPC" => Some("https://solana.example.com".to_string()),
        "PORT" => Some("9000".to_string()),
        _ => None,
    });

    assert_eq!(config.token_mint(), Some("OverrideMint"));
    assert_eq!(config.rpc.endpoint, "https://solana.example.com");
    assert_eq!(config.api.bind_address, "0.0.0.0:9000");
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("bad.toml");

    fs::write(&config_path, "[cache]\nttl_secs = 0\n")?;
    let config = StatsConfig::from_file(config_path.to_str().unwrap())?;
    assert!(config.validate().is_err());

    fs::write(&config_path, "[scan]\nmax_signatures = \"many\"\n")?;
    assert!(StatsConfig::from_file(config_path.to_str().unwrap()).is_err());
    Ok(())
}
