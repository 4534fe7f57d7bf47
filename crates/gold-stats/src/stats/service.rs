//! Stats facade: store totals plus on-chain figures behind a single-flight cache

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::cache::SingleFlight;
use super::snapshot::{ChainFigures, DistributionTotals, StatsSnapshot, StoredFigures};
use crate::chain::constants::GOLD_MINT;
use crate::chain::PdaBuilder;
use crate::config::StatsConfig;
use crate::core::{ChainReader, Clock, DistributionStore, StatsResult};
use crate::fees::{FeeReader, FeeSnapshot};
use crate::history::{TransferAggregator, WindowTotals};

/// How many stored distributions the totals are reduced over
pub const STATS_DISTRIBUTION_WINDOW: usize = 100;

pub struct StatsService {
    fees: FeeReader,
    history: TransferAggregator,
    store: Option<Arc<dyn DistributionStore>>,
    token_mint: Option<String>,
    dev_wallet: Option<String>,
    cache: SingleFlight<StatsSnapshot>,
}

impl StatsService {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        store: Option<Arc<dyn DistributionStore>>,
        clock: Arc<dyn Clock>,
        config: &StatsConfig,
    ) -> Self {
        Self {
            fees: FeeReader::new(chain.clone(), PdaBuilder::default()),
            history: TransferAggregator::new(chain, config.scan.clone()),
            store,
            token_mint: config.token_mint().map(str::to_string),
            dev_wallet: config.dev_wallet().map(str::to_string),
            cache: SingleFlight::new(config.cache.ttl(), clock),
        }
    }

    /// Configured mint, exactly as given
    pub fn token_mint(&self) -> Option<&str> {
        self.token_mint.as_deref()
    }

    pub fn store(&self) -> Option<&Arc<dyn DistributionStore>> {
        self.store.as_ref()
    }

    /// Current stats, computed at most once per TTL across concurrent callers
    pub async fn get_stats(&self) -> StatsResult<Arc<StatsSnapshot>> {
        self.cache.get_or_compute(|| self.compute()).await
    }

    /// Compute a fresh snapshot, bypassing the cache
    ///
    /// Chain failures have already collapsed to zero by the time they get
    /// here. Only a failing store makes the whole snapshot fail.
    pub async fn compute(&self) -> StatsResult<StatsSnapshot> {
        let started = Instant::now();

        let stored = self.stored_figures().await?;
        let token_mint = self.token_mint.clone().or_else(|| {
            stored
                .as_ref()
                .and_then(|s| s.settings.as_ref())
                .and_then(|s| s.token_mint.clone())
                .filter(|m| !m.trim().is_empty())
        });

        let (fees, window) = tokio::join!(
            self.read_fees(token_mint.as_deref()),
            self.scan_wallet()
        );

        let snapshot = StatsSnapshot::compose(
            stored.as_ref(),
            &ChainFigures { fees, window },
            token_mint,
        );
        info!(
            "Stats computed in {:?}: {} SOL unclaimed fees, {} GOLD received",
            started.elapsed(),
            snapshot.total_protocol_fees,
            snapshot.fees_converted_to_gold
        );
        Ok(snapshot)
    }

    async fn stored_figures(&self) -> StatsResult<Option<StoredFigures>> {
        let Some(store) = &self.store else {
            return Ok(None);
        };

        let (records, settings) = tokio::join!(
            store.recent_distributions(STATS_DISTRIBUTION_WINDOW),
            store.protocol_settings()
        );
        Ok(Some(StoredFigures {
            totals: DistributionTotals::from_records(&records?),
            settings: settings?,
        }))
    }

    async fn read_fees(&self, token_mint: Option<&str>) -> FeeSnapshot {
        let Some(mint) = token_mint else {
            debug!("No token mint configured, protocol fees are zero");
            return FeeSnapshot::zero();
        };
        match Pubkey::from_str(mint.trim()) {
            Ok(mint) => self.fees.read(&mint).await,
            Err(e) => {
                warn!("Configured token mint {:?} is not a public key: {}", mint, e);
                FeeSnapshot::zero()
            }
        }
    }

    async fn scan_wallet(&self) -> WindowTotals {
        let Some(wallet) = self.dev_wallet.as_deref() else {
            debug!("No dev wallet configured, skipping history scan");
            return WindowTotals::default();
        };
        match Pubkey::from_str(wallet) {
            Ok(wallet) => self.history.scan_or_zero(&wallet, &GOLD_MINT).await,
            Err(e) => {
                warn!("Configured dev wallet {:?} is not a public key: {}", wallet, e);
                WindowTotals::default()
            }
        }
    }
}
