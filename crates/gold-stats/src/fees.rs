//! Creator fee reader
//!
//! Unclaimed creator fees of a launchpad token are the lamports sitting in
//! the creator's vault PDA above its rent-exempt reserve:
//!
//! mint -> bonding curve PDA -> creator key (offset 49) -> creator vault PDA

use serde::Serialize;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chain::constants::CREATOR_VAULT_DATA_LEN;
use crate::chain::{decode_curve, PdaBuilder};
use crate::core::{ChainReader, StatsResult};

/// Unclaimed creator fees at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSnapshot {
    pub lamports: u64,
    pub sol: f64,
}

impl FeeSnapshot {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_lamports(lamports: u64) -> Self {
        Self {
            lamports,
            sol: lamports as f64 / LAMPORTS_PER_SOL as f64,
        }
    }
}

/// Reads creator vault balances through a `ChainReader`
pub struct FeeReader {
    chain: Arc<dyn ChainReader>,
    pdas: PdaBuilder,
}

impl FeeReader {
    pub fn new(chain: Arc<dyn ChainReader>, pdas: PdaBuilder) -> Self {
        Self { chain, pdas }
    }

    /// Fees for a mint or bonding curve address; every failure reads as zero
    pub async fn read(&self, mint_or_curve: &Pubkey) -> FeeSnapshot {
        self.try_read(mint_or_curve).await.unwrap_or_else(|e| {
            warn!("Creator fee read failed for {}, reporting zero: {}", mint_or_curve, e);
            FeeSnapshot::zero()
        })
    }

    /// Fees for a mint or bonding curve address
    ///
    /// Missing accounts and non-curve data are a valid zero state (e.g.
    /// before launch) and return `Ok(zero)`. Only remote failures are `Err`.
    pub async fn try_read(&self, mint_or_curve: &Pubkey) -> StatsResult<FeeSnapshot> {
        let curve_address = self.pdas.bonding_curve(mint_or_curve)?.address;

        let curve = match self.chain.get_account(&curve_address).await? {
            Some(account) => Some(account),
            // Input may already be the curve itself
            None => self.chain.get_account(mint_or_curve).await?,
        };
        let Some(curve) = curve else {
            debug!("No bonding curve for {}", mint_or_curve);
            return Ok(FeeSnapshot::zero());
        };

        let creator = match decode_curve(&curve.data) {
            Ok(decoded) => decoded.creator,
            Err(e) => {
                debug!("Not a bonding curve account ({}): {}", mint_or_curve, e);
                return Ok(FeeSnapshot::zero());
            }
        };

        let vault = self.pdas.creator_vault(&creator)?.address;
        let Some(vault_account) = self.chain.get_account(&vault).await? else {
            debug!("Creator vault {} does not exist yet", vault);
            return Ok(FeeSnapshot::zero());
        };

        let reserve = self
            .chain
            .get_minimum_balance_for_rent_exemption(CREATOR_VAULT_DATA_LEN)
            .await?;

        Ok(FeeSnapshot::from_lamports(
            vault_account.lamports.saturating_sub(reserve),
        ))
    }
}
