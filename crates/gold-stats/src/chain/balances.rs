//! Balance delta extraction from transaction meta
//!
//! Only inbound movement is measured: negative or zero deltas contribute
//! nothing.

use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;

use crate::core::TransactionMeta;

/// Inbound token movement for one (mint, owner) pair in one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferDelta {
    /// Sum of positive deltas in base units
    pub base_units: u64,
    /// Decimals reported by the matching post balance entries
    pub decimals: Option<u8>,
}

/// Positive `post - pre` for token balances of `mint` owned by `owner`
///
/// Pre amounts are keyed by (mint, owner); a post entry with no pre entry
/// counts from zero.
pub fn inbound_token_delta(meta: &TransactionMeta, mint: &Pubkey, owner: &Pubkey) -> TransferDelta {
    let pre_by_key: HashMap<(Pubkey, Option<Pubkey>), u64> = meta
        .pre_token_balances
        .iter()
        .map(|b| ((b.mint, b.owner), b.amount.base_units()))
        .collect();

    let mut delta = TransferDelta::default();
    for post in &meta.post_token_balances {
        if post.mint != *mint || post.owner != Some(*owner) {
            continue;
        }
        delta.decimals = Some(post.amount.decimals);

        let pre = pre_by_key.get(&(post.mint, post.owner)).copied().unwrap_or(0);
        let change = post.amount.base_units() as i128 - pre as i128;
        if change > 0 {
            delta.base_units = delta.base_units.saturating_add(change as u64);
        }
    }
    delta
}

/// Positive lamport change of `owner`, resolved through the effective key list
pub fn inbound_native_delta(meta: &TransactionMeta, keys: &[Pubkey], owner: &Pubkey) -> u64 {
    let Some(index) = keys.iter().position(|key| key == owner) else {
        return 0;
    };

    match (meta.pre_balances.get(index), meta.post_balances.get(index)) {
        (Some(pre), Some(post)) => post.saturating_sub(*pre),
        _ => 0,
    }
}
