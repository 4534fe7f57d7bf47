//! Testing utilities
//!
//! Controlled clock and wire-format fixtures built from real `solana-sdk`
//! message types, shared by unit and integration tests.

use solana_sdk::{
    hash::Hash,
    instruction::CompiledInstruction,
    message::{
        v0::{self, MessageAddressTableLookup},
        Message, MessageHeader, VersionedMessage,
    },
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::chain::constants::BONDING_CURVE_DISCRIMINATOR;
use crate::chain::curve::{CREATOR_END, CREATOR_OFFSET};
use crate::core::{Clock, StatsResult};

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

/// One address lookup table reference of a v0 message
#[derive(Debug, Clone)]
pub struct LookupFixture {
    pub table: Pubkey,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

impl LookupFixture {
    pub fn new(writable_indexes: Vec<u8>, readonly_indexes: Vec<u8>) -> Self {
        Self {
            table: Pubkey::new_unique(),
            writable_indexes,
            readonly_indexes,
        }
    }
}

/// Wire bytes of a single-signer legacy transaction
pub fn legacy_transaction_bytes(
    account_keys: Vec<Pubkey>,
    instructions: Vec<CompiledInstruction>,
) -> StatsResult<Vec<u8>> {
    let message =
        Message::new_with_compiled_instructions(1, 0, 0, account_keys, Hash::default(), instructions);
    encode(VersionedMessage::Legacy(message))
}

/// Wire bytes of a single-signer v0 transaction
pub fn versioned_transaction_bytes(
    static_keys: Vec<Pubkey>,
    instructions: Vec<CompiledInstruction>,
    lookups: Vec<LookupFixture>,
) -> StatsResult<Vec<u8>> {
    let message = v0::Message {
        header: MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed_accounts: 0,
            num_readonly_unsigned_accounts: 0,
        },
        account_keys: static_keys,
        recent_blockhash: Hash::default(),
        instructions,
        address_table_lookups: lookups
            .into_iter()
            .map(|l| MessageAddressTableLookup {
                account_key: l.table,
                writable_indexes: l.writable_indexes,
                readonly_indexes: l.readonly_indexes,
            })
            .collect(),
    };
    encode(VersionedMessage::V0(message))
}

fn encode(message: VersionedMessage) -> StatsResult<Vec<u8>> {
    let tx = VersionedTransaction {
        signatures: vec![Signature::default()],
        message,
    };
    Ok(bincode::serialize(&tx)?)
}

/// Minimal valid bonding curve account naming `creator`
pub fn curve_account_data(creator: &Pubkey) -> Vec<u8> {
    let mut data = vec![0u8; CREATOR_END + 8];
    data[..8].copy_from_slice(&BONDING_CURVE_DISCRIMINATOR);
    data[CREATOR_OFFSET..CREATOR_END].copy_from_slice(creator.as_ref());
    data
}
