//! Bonding curve account layout
//!
//! The launchpad program does not publish a self-describing layout. The
//! creator key offset below is a fixed external contract:
//!
//! ```text
//! [0..8)    discriminator
//! [8..49)   reserves, supply, complete flag
//! [49..81)  creator pubkey
//! ```

use solana_sdk::pubkey::Pubkey;

use super::constants::BONDING_CURVE_DISCRIMINATOR;
use crate::core::DecodeError;

/// Start of the creator pubkey field
pub const CREATOR_OFFSET: usize = 49;

/// End (exclusive) of the creator pubkey field; also the minimum account length
pub const CREATOR_END: usize = CREATOR_OFFSET + 32;

/// The part of a bonding curve account this crate reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveAccount {
    pub creator: Pubkey,
}

/// Decode a bonding curve account buffer
///
/// Short buffers and foreign discriminators are rejected, never read as zero.
pub fn decode_curve(data: &[u8]) -> Result<CurveAccount, DecodeError> {
    if data.len() < CREATOR_END {
        return Err(DecodeError::TooShort {
            len: data.len(),
            min: CREATOR_END,
        });
    }

    let mut found = [0u8; 8];
    found.copy_from_slice(&data[..8]);
    if found != BONDING_CURVE_DISCRIMINATOR {
        return Err(DecodeError::DiscriminatorMismatch { found });
    }

    let mut creator = [0u8; 32];
    creator.copy_from_slice(&data[CREATOR_OFFSET..CREATOR_END]);
    Ok(CurveAccount {
        creator: Pubkey::new_from_array(creator),
    })
}
