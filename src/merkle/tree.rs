use crate::hash::{Digest, hash_pair};
use crate::transaction::TransactionRecord;

/// Root of the tree built over `txs`, or `Digest::ZERO` when empty.
pub fn merkle_root(txs: &[TransactionRecord]) -> Digest {
    let mut level = leaf_level(txs);
    if level.is_empty() {
        return Digest::ZERO;
    }
    while level.len() > 1 {
        level = next_level(&level);
    }
    level[0]
}

/// Every level of the tree, leaves first and the single root last.
/// Empty when `txs` is empty.
pub(crate) fn levels(txs: &[TransactionRecord]) -> Vec<Vec<Digest>> {
    let leaves = leaf_level(txs);
    if leaves.is_empty() {
        return Vec::new();
    }

    let mut levels = vec![leaves];
    while let Some(current) = levels.last() {
        if current.len() <= 1 {
            break;
        }
        let next = next_level(current);
        levels.push(next);
    }
    levels
}

pub(crate) fn leaf_level(txs: &[TransactionRecord]) -> Vec<Digest> {
    txs.iter().map(TransactionRecord::digest).collect()
}

/// Fold one level pairwise. An odd trailing digest is paired with itself.
pub(crate) fn next_level(current: &[Digest]) -> Vec<Digest> {
    current
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            hash_pair(left, right)
        })
        .collect()
}
