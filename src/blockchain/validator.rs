use log::warn;

use super::block::Block;
use crate::error::{ChainError, Result, ValidationError};
use crate::merkle::merkle_root;

/// Check that `candidate` extends `previous`.
///
/// Rules are checked in order: linkage, proof of work against the block's
/// own declared difficulty, then the Merkle commitment. The first failure
/// is returned.
pub fn check_block(previous: &Block, candidate: &Block) -> std::result::Result<(), ValidationError> {
    let expected = previous.hash();
    if candidate.header.prev_hash != expected {
        return Err(ValidationError::LinkageMismatch {
            expected,
            found: candidate.header.prev_hash,
        });
    }

    let hash = candidate.hash();
    if !hash.meets_difficulty(candidate.header.difficulty) {
        return Err(ValidationError::ProofOfWorkUnmet {
            hash,
            difficulty: candidate.header.difficulty,
        });
    }

    let computed = merkle_root(&candidate.transactions);
    if candidate.header.merkle_root != computed {
        return Err(ValidationError::CommitmentMismatch {
            declared: candidate.header.merkle_root,
            computed,
        });
    }

    Ok(())
}

pub fn validate_block(previous: &Block, candidate: &Block) -> bool {
    match check_block(previous, candidate) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "VALIDATOR - block #{} rejected: {}",
                candidate.header.index, e
            );
            false
        }
    }
}

/// Check every adjacent pair. Chains of length 0 or 1 are trivially valid.
pub fn check_chain(blocks: &[Block]) -> Result<()> {
    for (i, pair) in blocks.windows(2).enumerate() {
        check_block(&pair[0], &pair[1]).map_err(|source| ChainError::InvalidBlock {
            position: i + 1,
            source,
        })?;
    }
    Ok(())
}

pub fn validate_chain(blocks: &[Block]) -> bool {
    match check_chain(blocks) {
        Ok(()) => true,
        Err(e) => {
            warn!("VALIDATOR - chain rejected: {e}");
            false
        }
    }
}
