//! Centralized error types for gold-stats

use std::time::Duration;
use thiserror::Error;

/// Main error type
///
/// Clone so a single in-flight failure can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("No program address found for seeds under {program_id}")]
    NoViableBump { program_id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Computation aborted: {0}")]
    Aborted(String),
}

/// Transport and JSON-RPC failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Rate limited by upstream")]
    RateLimited,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("No result in RPC response for {0}")]
    EmptyResult(String),
}

/// Binary and field-level decode failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Account data too short: {len} bytes, need {min}")]
    TooShort { len: usize, min: usize },

    #[error("Discriminator mismatch: {found:02x?}")]
    DiscriminatorMismatch { found: [u8; 8] },

    #[error("Invalid base64: {0}")]
    Base64(String),

    #[error("Invalid transaction bytes: {0}")]
    Transaction(String),

    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("Invalid public key: {0}")]
    Pubkey(String),

    #[error("Account index {index} out of range for {len} keys")]
    AccountIndex { index: usize, len: usize },
}

/// Result type alias for gold-stats operations
pub type StatsResult<T> = Result<T, StatsError>;

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Deserialization(err.to_string())
    }
}

impl From<base64::DecodeError> for StatsError {
    fn from(err: base64::DecodeError) -> Self {
        StatsError::Decode(DecodeError::Base64(err.to_string()))
    }
}

impl From<bincode::Error> for StatsError {
    fn from(err: bincode::Error) -> Self {
        StatsError::Decode(DecodeError::Transaction(err.to_string()))
    }
}

impl From<solana_sdk::pubkey::ParsePubkeyError> for StatsError {
    fn from(err: solana_sdk::pubkey::ParsePubkeyError) -> Self {
        StatsError::Decode(DecodeError::Pubkey(err.to_string()))
    }
}

impl From<ureq::Error> for StatsError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(429, _) => NetworkError::RateLimited.into(),
            ureq::Error::Status(code, _) => NetworkError::Status(code).into(),
            ureq::Error::Transport(transport) => {
                NetworkError::ConnectionFailed(transport.to_string()).into()
            }
        }
    }
}

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            return NetworkError::Timeout(Duration::ZERO).into();
        }
        NetworkError::ConnectionFailed(err.to_string()).into()
    }
}

impl From<tokio::task::JoinError> for StatsError {
    fn from(err: tokio::task::JoinError) -> Self {
        StatsError::Aborted(err.to_string())
    }
}
