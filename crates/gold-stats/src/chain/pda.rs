//! Program-derived address helpers

use solana_sdk::pubkey::Pubkey;

use super::constants::{seeds, LAUNCHPAD_PROGRAM_ID};
use crate::core::{StatsError, StatsResult};

/// A derived address together with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramAddress {
    pub address: Pubkey,
    pub bump: u8,
    pub seeds: Vec<Vec<u8>>,
    pub program_id: Pubkey,
}

/// Derive a PDA for `seeds` under `program_id`
pub fn derive(program_id: &Pubkey, seeds: &[&[u8]]) -> StatsResult<ProgramAddress> {
    let (address, bump) = Pubkey::try_find_program_address(seeds, program_id).ok_or_else(|| {
        StatsError::NoViableBump {
            program_id: program_id.to_string(),
        }
    })?;

    Ok(ProgramAddress {
        address,
        bump,
        seeds: seeds.iter().map(|s| s.to_vec()).collect(),
        program_id: *program_id,
    })
}

/// Launchpad PDA builder
#[derive(Debug, Clone, Copy)]
pub struct PdaBuilder {
    pub program_id: Pubkey,
}

impl PdaBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Bonding curve account of `mint`
    pub fn bonding_curve(&self, mint: &Pubkey) -> StatsResult<ProgramAddress> {
        derive(&self.program_id, &[seeds::BONDING_CURVE, mint.as_ref()])
    }

    /// Fee vault of `creator`
    pub fn creator_vault(&self, creator: &Pubkey) -> StatsResult<ProgramAddress> {
        derive(&self.program_id, &[seeds::CREATOR_VAULT, creator.as_ref()])
    }
}

impl Default for PdaBuilder {
    fn default() -> Self {
        Self::new(LAUNCHPAD_PROGRAM_ID)
    }
}
