//! Gold Stats Library
//!
//! Read-only accounting for a launchpad token: unclaimed creator fees read
//! from the creator vault, GOLD received by the dev wallet over a bounded
//! window of recent transactions, and stored distribution totals, served
//! as one cached JSON snapshot.

pub mod api;
pub mod chain;
pub mod config;
pub mod core;
pub mod fees;
pub mod history;
pub mod rpc_client;
pub mod stats;
pub mod store;
pub mod testing;

// Re-export commonly used types
pub use config::StatsConfig;
pub use crate::core::{
    ChainReader, DistributionLogSource, DistributionStore, StatsError, StatsResult,
};
pub use fees::{FeeReader, FeeSnapshot};
pub use history::{AggregateTotal, TransferAggregator, WindowTotals};
pub use rpc_client::LightRpcClient;
pub use stats::{StatsService, StatsSnapshot};
pub use store::MemoryStore;
