//! Pure launchpad protocol knowledge: addresses, layouts, instructions, deltas

pub mod balances;
pub mod constants;
pub mod curve;
pub mod instruction;
pub mod pda;

pub use balances::{inbound_native_delta, inbound_token_delta, TransferDelta};
pub use curve::{decode_curve, CurveAccount};
pub use instruction::{
    instruction_discriminator, matches, Discriminator, InstructionMatcher, MatchedInstruction,
    TransactionMessage,
};
pub use pda::{derive, PdaBuilder, ProgramAddress};
