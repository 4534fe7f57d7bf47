//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use gold_stats::core::{
    AccountSnapshot, ChainReader, FetchedTransaction, NetworkError, SignatureInfo, StatsResult,
    TokenAmount, TokenBalance, TransactionMeta,
};
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Rent-exempt minimum of a zero-data account on mainnet
pub const RENT_EXEMPT_ZERO_DATA: u64 = 890_880;

/// Per-method call counters
#[derive(Debug, Default)]
pub struct CallCounts {
    pub account: AtomicUsize,
    pub signatures: AtomicUsize,
    pub transaction: AtomicUsize,
    pub rent: AtomicUsize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.account.load(Ordering::SeqCst)
            + self.signatures.load(Ordering::SeqCst)
            + self.transaction.load(Ordering::SeqCst)
            + self.rent.load(Ordering::SeqCst)
    }
}

/// In-memory chain with configurable failures and latency
pub struct MockChain {
    pub accounts: HashMap<Pubkey, AccountSnapshot>,
    pub failing_accounts: HashSet<Pubkey>,
    pub signatures: Vec<SignatureInfo>,
    pub fail_signatures: bool,
    pub transactions: HashMap<String, FetchedTransaction>,
    pub failing_transactions: HashSet<String>,
    pub rent_exempt: u64,
    pub latency: Option<Duration>,
    pub calls: CallCounts,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            failing_accounts: HashSet::new(),
            signatures: Vec::new(),
            fail_signatures: false,
            transactions: HashMap::new(),
            failing_transactions: HashSet::new(),
            rent_exempt: RENT_EXEMPT_ZERO_DATA,
            latency: None,
            calls: CallCounts::default(),
        }
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, address: Pubkey, lamports: u64, data: Vec<u8>) -> Self {
        self.accounts.insert(
            address,
            AccountSnapshot { lamports, data },
        );
        self
    }

    pub fn with_transaction(mut self, tx: FetchedTransaction) -> Self {
        self.signatures.push(SignatureInfo {
            signature: tx.signature.clone(),
            slot: tx.slot,
        });
        self.transactions.insert(tx.signature.clone(), tx);
        self
    }

    /// Listed signature whose fetch fails
    pub fn with_failing_transaction(mut self, signature: &str) -> Self {
        self.signatures.push(SignatureInfo {
            signature: signature.to_string(),
            slot: 0,
        });
        self.failing_transactions.insert(signature.to_string());
        self
    }

    /// Listed signature the node no longer has
    pub fn with_missing_transaction(mut self, signature: &str) -> Self {
        self.signatures.push(SignatureInfo {
            signature: signature.to_string(),
            slot: 0,
        });
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn get_account(&self, address: &Pubkey) -> StatsResult<Option<AccountSnapshot>> {
        self.calls.account.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        if self.failing_accounts.contains(address) {
            return Err(NetworkError::ConnectionFailed("account fetch failed".into()).into());
        }
        Ok(self.accounts.get(address).cloned())
    }

    async fn get_signatures_for_address(
        &self,
        _address: &Pubkey,
        limit: usize,
    ) -> StatsResult<Vec<SignatureInfo>> {
        self.calls.signatures.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        if self.fail_signatures {
            return Err(NetworkError::RateLimited.into());
        }
        Ok(self.signatures.iter().take(limit).cloned().collect())
    }

    async fn get_transaction(&self, signature: &str) -> StatsResult<Option<FetchedTransaction>> {
        self.calls.transaction.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        if self.failing_transactions.contains(signature) {
            return Err(NetworkError::Timeout(Duration::from_secs(30)).into());
        }
        Ok(self.transactions.get(signature).cloned())
    }

    async fn get_minimum_balance_for_rent_exemption(&self, _data_len: usize) -> StatsResult<u64> {
        self.calls.rent.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        Ok(self.rent_exempt)
    }
}

pub fn token_balance(index: u8, mint: Pubkey, owner: Pubkey, raw: u64, decimals: u8) -> TokenBalance {
    TokenBalance {
        account_index: index,
        mint,
        owner: Some(owner),
        amount: TokenAmount {
            raw: Some(raw),
            decimals,
            ui_amount: Some(raw as f64 / 10f64.powi(decimals as i32)),
        },
    }
}

/// Transaction moving `mint` held by `owner` from `pre` to `post`
pub fn token_transfer(signature: &str, mint: Pubkey, owner: Pubkey, pre: u64, post: u64) -> FetchedTransaction {
    FetchedTransaction {
        signature: signature.to_string(),
        slot: 1,
        raw: Vec::new(),
        meta: Some(TransactionMeta {
            pre_token_balances: vec![token_balance(1, mint, owner, pre, 0)],
            post_token_balances: vec![token_balance(1, mint, owner, post, 0)],
            ..Default::default()
        }),
    }
}

pub fn load(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}
