//! Core abstractions and types
//!
//! Errors, RPC-boundary types and the ports the rest of the crate is
//! written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{DecodeError, NetworkError, StatsError, StatsResult};
pub use traits::{ChainReader, Clock, DistributionLogSource, DistributionStore, SystemClock};
pub use types::{
    AccountSnapshot, FetchedTransaction, LoadedAddresses, SignatureInfo, TokenAmount,
    TokenBalance, TransactionMeta,
};
