//! Historical transfer aggregation over a bounded recent window
//!
//! One pass over the owner's most recent transactions produces both figures
//! the stats need: GOLD received (token balance deltas from meta) and creator
//! fees claimed (lamport deltas of transactions carrying the fee-claim
//! instruction). Totals are best effort: a transaction that cannot be fetched
//! or decoded contributes nothing and the scan carries on.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::chain::constants::{COLLECT_CREATOR_FEE_IX, LAUNCHPAD_PROGRAM_ID};
use crate::chain::{inbound_native_delta, inbound_token_delta, InstructionMatcher, TransactionMessage, TransferDelta};
use crate::config::ScanConfig;
use crate::core::{ChainReader, FetchedTransaction, StatsResult};

/// Sum of inbound deltas for one (mint, owner) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateTotal {
    pub base_units: u128,
    /// Mint decimals as reported by the balances seen, if any
    pub decimals: Option<u8>,
}

impl AggregateTotal {
    pub fn add(&mut self, delta: TransferDelta) {
        self.base_units = self.base_units.saturating_add(delta.base_units as u128);
        if self.decimals.is_none() {
            self.decimals = delta.decimals;
        }
    }

    /// Human-scaled amount
    pub fn ui_amount(&self) -> f64 {
        match self.decimals {
            Some(decimals) => self.base_units as f64 / 10f64.powi(decimals as i32),
            None => 0.0,
        }
    }
}

/// Everything one scan observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTotals {
    pub inbound: AggregateTotal,
    /// Lamports credited to the owner by fee-claim transactions
    pub fee_claim_lamports: u64,
    pub signatures_listed: usize,
    pub scanned: usize,
    pub skipped: usize,
}

impl WindowTotals {
    pub fn fee_claims_sol(&self) -> f64 {
        self.fee_claim_lamports as f64 / LAMPORTS_PER_SOL as f64
    }
}

/// What a single transaction adds to the window
#[derive(Debug, Default)]
struct Contribution {
    inbound: TransferDelta,
    fee_claim_lamports: u64,
}

pub struct TransferAggregator {
    chain: Arc<dyn ChainReader>,
    scan: ScanConfig,
    fee_claims: InstructionMatcher,
}

impl TransferAggregator {
    pub fn new(chain: Arc<dyn ChainReader>, scan: ScanConfig) -> Self {
        Self {
            chain,
            scan,
            fee_claims: InstructionMatcher::for_instruction(LAUNCHPAD_PROGRAM_ID, COLLECT_CREATOR_FEE_IX),
        }
    }

    /// Inbound `mint` received by `owner` over the window; failures read as zero
    pub async fn sum_inbound(&self, owner: &Pubkey, mint: &Pubkey) -> AggregateTotal {
        self.scan_or_zero(owner, mint).await.inbound
    }

    /// Full scan with every failure collapsed to an empty window
    pub async fn scan_or_zero(&self, owner: &Pubkey, mint: &Pubkey) -> WindowTotals {
        self.scan(owner, mint).await.unwrap_or_else(|e| {
            warn!("History scan for {} failed, reporting zero: {}", owner, e);
            WindowTotals::default()
        })
    }

    /// Scan the most recent transactions of `owner`
    ///
    /// Only listing the signatures can fail; per-transaction failures are
    /// counted in `skipped`.
    pub async fn scan(&self, owner: &Pubkey, mint: &Pubkey) -> StatsResult<WindowTotals> {
        let signatures = self
            .chain
            .get_signatures_for_address(owner, self.scan.max_signatures)
            .await?;

        let mut totals = WindowTotals {
            signatures_listed: signatures.len(),
            ..Default::default()
        };

        let window: Vec<String> = signatures
            .into_iter()
            .take(self.scan.max_parsed_transactions)
            .map(|s| s.signature)
            .collect();

        let results: Vec<Option<Contribution>> = stream::iter(window)
            .map(|signature| async move { self.inspect(&signature, owner, mint).await })
            .buffer_unordered(self.scan.fetch_concurrency.max(1))
            .collect()
            .await;

        for result in results {
            match result {
                Some(contribution) => {
                    totals.scanned += 1;
                    totals.inbound.add(contribution.inbound);
                    totals.fee_claim_lamports = totals
                        .fee_claim_lamports
                        .saturating_add(contribution.fee_claim_lamports);
                }
                None => totals.skipped += 1,
            }
        }

        info!(
            "Scanned {} of {} transactions for {} ({} skipped): {} base units inbound, {} lamports claimed",
            totals.scanned,
            totals.signatures_listed,
            owner,
            totals.skipped,
            totals.inbound.base_units,
            totals.fee_claim_lamports
        );
        Ok(totals)
    }

    async fn inspect(&self, signature: &str, owner: &Pubkey, mint: &Pubkey) -> Option<Contribution> {
        let tx = match self.chain.get_transaction(signature).await {
            Ok(Some(tx)) => tx,
            Ok(None) => {
                debug!("Transaction {} not available", signature);
                return None;
            }
            Err(e) => {
                debug!("Skipping transaction {}: {}", signature, e);
                return None;
            }
        };
        let Some(meta) = tx.meta.as_ref() else {
            debug!("Transaction {} has no status meta", signature);
            return None;
        };

        Some(Contribution {
            inbound: inbound_token_delta(meta, mint, owner),
            fee_claim_lamports: self.claimed_lamports(&tx, owner),
        })
    }

    /// Lamports `owner` gained in a fee-claim transaction that lists it
    fn claimed_lamports(&self, tx: &FetchedTransaction, owner: &Pubkey) -> u64 {
        let Some(meta) = tx.meta.as_ref() else {
            return 0;
        };
        let message = match TransactionMessage::decode(&tx.raw) {
            Ok(message) => message,
            Err(e) => {
                debug!("Cannot decode transaction {}: {}", tx.signature, e);
                return 0;
            }
        };
        let Some(matched) = self.fee_claims.find(&message, &meta.loaded_addresses) else {
            return 0;
        };

        let keys = message.account_keys(&meta.loaded_addresses);
        match matched.resolve_accounts(&keys) {
            Ok(accounts) if accounts.contains(owner) => inbound_native_delta(meta, &keys, owner),
            Ok(_) => 0,
            Err(e) => {
                debug!("Fee claim in {} has unresolvable accounts: {}", tx.signature, e);
                0
            }
        }
    }
}
