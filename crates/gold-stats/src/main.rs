//! Gold Stats server
//!
//! Serves launchpad fee and GOLD distribution stats read from Solana RPC.

use anyhow::Result;
use clap::Parser;
use gold_stats::api::ApiState;
use gold_stats::core::{DistributionStore, SystemClock};
use gold_stats::{api, LightRpcClient, MemoryStore, StatsConfig, StatsService};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gold-stats")]
#[command(about = "Launchpad fee and GOLD distribution stats")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "gold-stats.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,

    /// Compute the stats once, print them as JSON and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_found = std::path::Path::new(&cli.config).exists();
    let mut config = if config_found {
        StatsConfig::from_file(&cli.config)?
    } else {
        StatsConfig::default()
    };
    config.apply_process_env();

    // Override log level if provided
    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    // Initialize logging
    init_logging(&config)?;
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting Gold Stats");
    info!("RPC endpoint: {}", config.rpc.endpoint);
    info!("Token mint: {}", config.token_mint().unwrap_or("<none>"));
    info!("Dev wallet: {}", config.dev_wallet().unwrap_or("<none>"));

    config.validate()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let chain = Arc::new(LightRpcClient::from_config(&config.rpc));
    let seeded = match &config.store.seed_path {
        Some(path) => Some(Arc::new(MemoryStore::from_json_file(path)?)),
        None => {
            info!("No distribution store configured, stored totals and logs are empty");
            None
        }
    };
    let store = seeded.clone().map(|s| s as Arc<dyn DistributionStore>);
    let stats = Arc::new(StatsService::new(
        chain,
        store,
        Arc::new(SystemClock),
        &config,
    ));

    if cli.once {
        let snapshot = stats.compute().await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    // Start API server
    let mut state = ApiState::new(stats);
    if let Some(seeded) = seeded {
        state = state.with_logs(seeded);
    }
    let api_server = api::start_server(state, &config.api).await?;

    info!("Gold Stats started successfully. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = api_server => {
            if let Err(e) = result {
                error!("API server task error: {}", e);
            }
        }
    }

    info!("Shutting down Gold Stats");
    Ok(())
}

fn init_logging(config: &StatsConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("gold_stats={},tower_http=info", log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
