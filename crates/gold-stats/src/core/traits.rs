//! Core trait abstractions (ports)

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use std::time::Instant;
use uuid::Uuid;

use super::error::StatsResult;
use super::types::*;
use crate::store::{DistributionLogEntry, DistributionRecord, HolderSnapshot, ProtocolSettings};

/// Read-only chain access
///
/// The only remote dependency of the accounting core. Implemented over
/// JSON-RPC by `LightRpcClient` and by in-memory fakes in tests.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Fetch an account, `None` when it does not exist
    async fn get_account(&self, address: &Pubkey) -> StatsResult<Option<AccountSnapshot>>;

    /// Most recent signatures touching `address`, newest first
    async fn get_signatures_for_address(
        &self,
        address: &Pubkey,
        limit: usize,
    ) -> StatsResult<Vec<SignatureInfo>>;

    /// Fetch a confirmed transaction with its status meta
    async fn get_transaction(&self, signature: &str) -> StatsResult<Option<FetchedTransaction>>;

    /// Rent-exempt minimum for an account holding `data_len` bytes
    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> StatsResult<u64>;
}

/// Persisted distribution history (external collaborator)
#[async_trait]
pub trait DistributionStore: Send + Sync {
    /// Most recent distributions, newest first
    async fn recent_distributions(&self, limit: usize) -> StatsResult<Vec<DistributionRecord>>;

    async fn distribution(&self, id: &Uuid) -> StatsResult<Option<DistributionRecord>>;

    async fn holder_snapshots(&self, distribution_id: &Uuid) -> StatsResult<Vec<HolderSnapshot>>;

    async fn protocol_settings(&self) -> StatsResult<Option<ProtocolSettings>>;
}

/// Hand-curated distribution log (external collaborator)
#[async_trait]
pub trait DistributionLogSource: Send + Sync {
    /// Most recent entries by date, newest first
    async fn recent_logs(&self, limit: usize) -> StatsResult<Vec<DistributionLogEntry>>;
}

/// Monotonic time source for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
