//! Instruction matching across legacy and versioned transactions
//!
//! Instructions on the launchpad are identified by an Anchor sighash:
//! `sha256("global:<instruction_name>")[..8]`. An instruction matches when
//! its program index resolves to the target program and its data starts
//! with that discriminator.

use solana_sdk::{
    hash::hashv,
    instruction::CompiledInstruction,
    message::VersionedMessage,
    pubkey::Pubkey,
    transaction::VersionedTransaction,
};

use crate::core::{DecodeError, LoadedAddresses, TransactionMeta};

/// 8-byte instruction or account discriminator
pub type Discriminator = [u8; 8];

/// Anchor instruction discriminator for `name`
pub fn instruction_discriminator(name: &str) -> Discriminator {
    let preimage = format!("global:{}", name);
    let h = hashv(&[preimage.as_bytes()]);
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&h.to_bytes()[..8]);
    disc
}

/// Decoded message of either transaction encoding
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionMessage {
    /// Flat key list, every index resolves against it
    Legacy {
        account_keys: Vec<Pubkey>,
        instructions: Vec<CompiledInstruction>,
    },
    /// Static keys plus keys loaded from lookup tables at execution time
    Versioned {
        static_keys: Vec<Pubkey>,
        instructions: Vec<CompiledInstruction>,
        lookup_tables: usize,
    },
}

impl TransactionMessage {
    /// Decode wire bytes of a legacy or v0 transaction
    pub fn decode(raw: &[u8]) -> Result<Self, DecodeError> {
        let tx: VersionedTransaction =
            bincode::deserialize(raw).map_err(|e| DecodeError::Transaction(e.to_string()))?;

        Ok(match tx.message {
            VersionedMessage::Legacy(message) => Self::Legacy {
                account_keys: message.account_keys,
                instructions: message.instructions,
            },
            VersionedMessage::V0(message) => Self::Versioned {
                static_keys: message.account_keys,
                instructions: message.instructions,
                lookup_tables: message.address_table_lookups.len(),
            },
        })
    }

    pub fn instructions(&self) -> &[CompiledInstruction] {
        match self {
            Self::Legacy { instructions, .. } | Self::Versioned { instructions, .. } => {
                instructions
            }
        }
    }

    /// Effective key list that instruction indices resolve against
    ///
    /// Versioned order is fixed by the runtime: static, loaded writable,
    /// loaded readonly.
    pub fn account_keys(&self, loaded: &LoadedAddresses) -> Vec<Pubkey> {
        match self {
            Self::Legacy { account_keys, .. } => account_keys.clone(),
            Self::Versioned { static_keys, .. } => {
                let mut keys =
                    Vec::with_capacity(static_keys.len() + loaded.writable.len() + loaded.readonly.len());
                keys.extend_from_slice(static_keys);
                keys.extend_from_slice(&loaded.writable);
                keys.extend_from_slice(&loaded.readonly);
                keys
            }
        }
    }
}

/// First instruction that matched, with its account index list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedInstruction {
    /// Position within the top-level instruction list
    pub position: usize,
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
}

impl MatchedInstruction {
    /// Resolve account indices against the effective key list
    pub fn resolve_accounts(&self, keys: &[Pubkey]) -> Result<Vec<Pubkey>, DecodeError> {
        self.accounts
            .iter()
            .map(|&index| {
                keys.get(index as usize)
                    .copied()
                    .ok_or(DecodeError::AccountIndex {
                        index: index as usize,
                        len: keys.len(),
                    })
            })
            .collect()
    }
}

/// Matches one instruction kind of one program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionMatcher {
    pub program_id: Pubkey,
    pub discriminator: Discriminator,
}

impl InstructionMatcher {
    pub fn new(program_id: Pubkey, discriminator: Discriminator) -> Self {
        Self {
            program_id,
            discriminator,
        }
    }

    /// Matcher for the Anchor instruction `name`
    pub fn for_instruction(program_id: Pubkey, name: &str) -> Self {
        Self::new(program_id, instruction_discriminator(name))
    }

    /// First matching top-level instruction, if any
    pub fn find(
        &self,
        message: &TransactionMessage,
        loaded: &LoadedAddresses,
    ) -> Option<MatchedInstruction> {
        let keys = message.account_keys(loaded);

        message
            .instructions()
            .iter()
            .enumerate()
            .find(|(_, ix)| self.is_match(ix, &keys))
            .map(|(position, ix)| MatchedInstruction {
                position,
                program_id_index: ix.program_id_index,
                accounts: ix.accounts.clone(),
            })
    }

    /// Presence check straight from transaction bytes
    ///
    /// Undecodable bytes count as "no match".
    pub fn matches(&self, meta: &TransactionMeta, raw: &[u8]) -> bool {
        match TransactionMessage::decode(raw) {
            Ok(message) => self.find(&message, &meta.loaded_addresses).is_some(),
            Err(e) => {
                tracing::debug!("Skipping undecodable transaction: {}", e);
                false
            }
        }
    }

    fn is_match(&self, ix: &CompiledInstruction, keys: &[Pubkey]) -> bool {
        let targets_program = keys
            .get(ix.program_id_index as usize)
            .is_some_and(|key| *key == self.program_id);

        targets_program && ix.data.len() >= 8 && ix.data[..8] == self.discriminator
    }
}

/// Whether `raw` contains a `discriminator` instruction of `program_id`
pub fn matches(
    meta: &TransactionMeta,
    raw: &[u8],
    program_id: &Pubkey,
    discriminator: Discriminator,
) -> bool {
    InstructionMatcher::new(*program_id, discriminator).matches(meta, raw)
}
