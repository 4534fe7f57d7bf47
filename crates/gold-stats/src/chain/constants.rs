//! Fixed protocol constants for the launchpad program

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Launchpad (pump) program
pub const LAUNCHPAD_PROGRAM_ID: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");

/// Reward asset (GOLD) mint
pub const GOLD_MINT: Pubkey = pubkey!("GoLDppdjB1vDTPSGxyMJFqdnj134yH6Prg9eqsGDiw6A");

/// Seeds for launchpad PDAs
pub mod seeds {
    pub const BONDING_CURVE: &[u8] = b"bonding-curve";
    pub const CREATOR_VAULT: &[u8] = b"creator-vault";
}

/// Account discriminator of a bonding curve: sha256("account:BondingCurve")[..8]
pub const BONDING_CURVE_DISCRIMINATOR: [u8; 8] = [0x17, 0xb7, 0xf8, 0x37, 0x60, 0xd8, 0xac, 0x60];

/// Instruction whose presence marks a creator fee claim
pub const COLLECT_CREATOR_FEE_IX: &str = "collect_creator_fee";

/// Most recent signatures requested per scan
pub const MAX_SIGNATURES: usize = 80;

/// Of those, how many are fetched and inspected
pub const MAX_PARSED_TRANSACTIONS: usize = 20;

/// Data length used for the rent-exempt reserve of a creator vault
pub const CREATOR_VAULT_DATA_LEN: usize = 0;
