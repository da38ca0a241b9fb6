//! Proof-of-work blockchain primitives: Merkle commitments with inclusion
//! proofs, hash-linked headers sealed by a nonce search, chain validation,
//! and a fork-choice graph that picks the best tip by cumulative work.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod fork;
pub mod hash;
pub mod merkle;
pub mod transaction;

pub use blockchain::{
    Block, BlockHeader, MineOutcome, MiningContext, mine_block, validate_block, validate_chain,
};
pub use error::{AbortReason, ChainError, Result, ValidationError};
pub use fork::{ForkGraph, ForkNode};
pub use hash::Digest;
pub use merkle::{ProofStep, Side, merkle_proof, merkle_root, verify_proof};
pub use transaction::{FieldValue, TransactionRecord};
