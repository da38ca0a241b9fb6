//! Error types for validation, proofs and the fork graph.

use thiserror::Error;

use crate::hash::Digest;

/// Why a candidate block does not extend its parent.
///
/// These are recoverable: the caller decides whether to drop the block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("prev_hash {found} does not match parent hash {expected}")]
    LinkageMismatch { expected: Digest, found: Digest },

    #[error("hash {hash} has fewer than {difficulty} leading zero hex digits")]
    ProofOfWorkUnmet { hash: Digest, difficulty: u32 },

    #[error("declared merkle root {declared} does not match computed root {computed}")]
    CommitmentMismatch { declared: Digest, computed: Digest },
}

/// Why a nonce search stopped without finding a block.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    #[error("cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("attempt limit reached")]
    AttemptLimit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// Child insertion against a digest the graph does not hold.
    #[error("unknown parent {0}")]
    UnknownParent(Digest),

    /// Lookup of a digest the graph does not hold.
    #[error("unknown block {0}")]
    UnknownBlock(Digest),

    /// Proof requested for a leaf outside the transaction list.
    #[error("leaf index {index} out of range for {len} transactions")]
    IndexOutOfRange { index: usize, len: usize },

    /// A parent pointer leads to a digest that is not in the graph.
    #[error("broken chain: missing node {0}")]
    BrokenChain(Digest),

    /// Block at `position` does not extend the block before it.
    #[error("invalid block at position {position}: {source}")]
    InvalidBlock {
        position: usize,
        #[source]
        source: ValidationError,
    },

    /// A freshly mined block failed re-validation. This is a bug in the
    /// miner, never an expected runtime condition.
    #[error("invariant violated: mined block failed validation: {0}")]
    InvariantViolation(#[source] ValidationError),

    #[error("mining aborted after {attempts} attempts: {reason}")]
    MiningAborted { reason: AbortReason, attempts: u64 },
}

pub type Result<T> = std::result::Result<T, ChainError>;
