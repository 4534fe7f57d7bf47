//! Distribution history models and the in-memory store
//!
//! Distributions are written by a separate process; this service only reads
//! them. `MemoryStore` can be seeded from a JSON export of that history.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::core::{DistributionLogSource, DistributionStore, StatsError, StatsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// One fee distribution run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub total_fees_collected: Decimal,
    pub fees_for_gold: Decimal,
    #[serde(default)]
    pub fees_for_medium_holders: Option<Decimal>,
    #[serde(default)]
    pub fees_for_buyback: Option<Decimal>,
    pub fees_for_burn: Decimal,
    pub gold_purchased: Decimal,
    #[serde(default)]
    pub gold_for_medium_holders: Option<Decimal>,
    #[serde(default)]
    pub token_buyback: Option<Decimal>,
    #[serde(default)]
    pub gold_price_at_purchase: Option<Decimal>,
    pub holders_count: u32,
    #[serde(default)]
    pub medium_holders_count: Option<u32>,
    #[serde(default)]
    pub status: DistributionStatus,
    #[serde(default)]
    pub tx_signature: Option<String>,
}

impl DistributionRecord {
    /// Records the public listing shows
    pub fn is_public(&self) -> bool {
        matches!(
            self.status,
            DistributionStatus::Completed | DistributionStatus::Pending
        )
    }
}

/// A holder's share within one distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderSnapshot {
    pub id: Uuid,
    pub distribution_id: Uuid,
    pub wallet_address: String,
    pub token_balance: Decimal,
    pub percentage_of_supply: Decimal,
    #[serde(default)]
    pub gold_received: Option<Decimal>,
    #[serde(default)]
    pub tx_signature: Option<String>,
    #[serde(default)]
    pub status: DistributionStatus,
}

/// Stored protocol parameters; unset fields fall back to published defaults
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolSettings {
    pub token_mint: Option<String>,
    pub gold_mint: Option<String>,
    pub creator_wallet: Option<String>,
    pub minimum_holder_percentage: Option<Decimal>,
    pub medium_holder_min_percentage: Option<Decimal>,
    pub major_holders_percentage: Option<Decimal>,
    pub medium_holders_percentage: Option<Decimal>,
    pub buyback_percentage: Option<Decimal>,
    pub gold_distribution_percentage: Option<Decimal>,
    pub burn_percentage: Option<Decimal>,
    pub last_distribution_at: Option<DateTime<Utc>>,
}

/// One line of the public distribution log
///
/// `date` is an ISO-8601 string; entries sort on it lexically.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributionLogEntry {
    pub id: String,
    pub transaction: String,
    pub gold_distributed: f64,
    pub date: String,
}

/// Layout of a seed file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SeedFile {
    distributions: Vec<DistributionRecord>,
    holders: Vec<HolderSnapshot>,
    settings: Option<ProtocolSettings>,
    logs: Vec<DistributionLogEntry>,
}

/// Process-local `DistributionStore` and `DistributionLogSource`
#[derive(Debug, Default)]
pub struct MemoryStore {
    distributions: RwLock<Vec<DistributionRecord>>,
    holders: RwLock<HashMap<Uuid, Vec<HolderSnapshot>>>,
    settings: RwLock<Option<ProtocolSettings>>,
    logs: RwLock<Vec<DistributionLogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON seed file
    pub fn from_json_file(path: impl AsRef<Path>) -> StatsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StatsError::Store(format!("{}: {}", path.display(), e)))?;
        let store = Self::from_json(&content)?;
        info!("Loaded distribution store seed from {}", path.display());
        Ok(store)
    }

    pub fn from_json(content: &str) -> StatsResult<Self> {
        let seed: SeedFile = serde_json::from_str(content)
            .map_err(|e| StatsError::Store(format!("invalid seed: {}", e)))?;

        let mut holders: HashMap<Uuid, Vec<HolderSnapshot>> = HashMap::new();
        for holder in seed.holders {
            holders.entry(holder.distribution_id).or_default().push(holder);
        }

        Ok(Self {
            distributions: RwLock::new(seed.distributions),
            holders: RwLock::new(holders),
            settings: RwLock::new(seed.settings),
            logs: RwLock::new(seed.logs),
        })
    }

    pub async fn insert_distribution(&self, record: DistributionRecord) {
        self.distributions.write().await.push(record);
    }

    pub async fn insert_holder_snapshot(&self, snapshot: HolderSnapshot) {
        self.holders
            .write()
            .await
            .entry(snapshot.distribution_id)
            .or_default()
            .push(snapshot);
    }

    pub async fn set_protocol_settings(&self, settings: ProtocolSettings) {
        *self.settings.write().await = Some(settings);
    }

    pub async fn insert_log(&self, entry: DistributionLogEntry) {
        self.logs.write().await.push(entry);
    }
}

#[async_trait]
impl DistributionLogSource for MemoryStore {
    async fn recent_logs(&self, limit: usize) -> StatsResult<Vec<DistributionLogEntry>> {
        let mut logs = self.logs.read().await.clone();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs.truncate(limit);
        Ok(logs)
    }
}

#[async_trait]
impl DistributionStore for MemoryStore {
    async fn recent_distributions(&self, limit: usize) -> StatsResult<Vec<DistributionRecord>> {
        let mut records = self.distributions.read().await.clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(records)
    }

    async fn distribution(&self, id: &Uuid) -> StatsResult<Option<DistributionRecord>> {
        Ok(self
            .distributions
            .read()
            .await
            .iter()
            .find(|d| d.id == *id)
            .cloned())
    }

    async fn holder_snapshots(&self, distribution_id: &Uuid) -> StatsResult<Vec<HolderSnapshot>> {
        Ok(self
            .holders
            .read()
            .await
            .get(distribution_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn protocol_settings(&self) -> StatsResult<Option<ProtocolSettings>> {
        Ok(self.settings.read().await.clone())
    }
}
