//! Typed views of the RPC data the accounting core consumes
//!
//! Everything here is already narrowed: public keys are parsed, amounts are
//! integers where the chain reports integers. Untyped JSON never gets past
//! `rpc_client`.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Account fetched with `getAccountInfo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub lamports: u64,
    pub data: Vec<u8>,
}

/// One entry of `getSignaturesForAddress`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureInfo {
    pub signature: String,
    pub slot: u64,
}

/// Token amount as reported in `uiTokenAmount`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TokenAmount {
    /// Integer amount in base units, when the node reported one
    pub raw: Option<u64>,
    pub decimals: u8,
    pub ui_amount: Option<f64>,
}

impl TokenAmount {
    /// Base units, falling back to the scaled UI amount when the raw string is absent
    pub fn base_units(&self) -> u64 {
        if let Some(raw) = self.raw {
            return raw;
        }
        match self.ui_amount {
            Some(ui) if ui.is_finite() && ui > 0.0 => {
                (ui * 10f64.powi(self.decimals as i32)).round() as u64
            }
            _ => 0,
        }
    }
}

/// A pre or post token balance entry from transaction meta
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub account_index: u8,
    pub mint: Pubkey,
    pub owner: Option<Pubkey>,
    pub amount: TokenAmount,
}

/// Keys loaded from address lookup tables at execution time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedAddresses {
    pub writable: Vec<Pubkey>,
    pub readonly: Vec<Pubkey>,
}

/// Subset of transaction status meta used for delta attribution
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionMeta {
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
    pub pre_token_balances: Vec<TokenBalance>,
    pub post_token_balances: Vec<TokenBalance>,
    pub loaded_addresses: LoadedAddresses,
}

/// Transaction fetched with `getTransaction` in base64 encoding
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTransaction {
    pub signature: String,
    pub slot: u64,
    /// Wire bytes of the (legacy or versioned) transaction
    pub raw: Vec<u8>,
    pub meta: Option<TransactionMeta>,
}
