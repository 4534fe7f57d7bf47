//! Stats aggregation facade

pub mod cache;
pub mod service;
pub mod snapshot;

pub use cache::SingleFlight;
pub use service::{StatsService, STATS_DISTRIBUTION_WINDOW};
pub use snapshot::{
    finite_or_zero, ChainFigures, DistributionTotals, StatsSnapshot, StoredFigures,
};
