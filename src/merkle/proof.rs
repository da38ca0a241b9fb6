use serde::{Deserialize, Serialize};

use super::tree::levels;
use crate::error::{ChainError, Result};
use crate::hash::{Digest, hash_pair};
use crate::transaction::TransactionRecord;

/// Where a proof sibling sits relative to the digest being folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion proof, leaf level first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Digest,
    pub side: Side,
}

/// Inclusion proof for `txs[index]`.
///
/// At every level the sibling is found by index parity. When the level was
/// padded and the held digest is the last one, it is its own sibling.
pub fn merkle_proof(txs: &[TransactionRecord], index: usize) -> Result<Vec<ProofStep>> {
    if index >= txs.len() {
        return Err(ChainError::IndexOutOfRange {
            index,
            len: txs.len(),
        });
    }

    let levels = levels(txs);
    let mut steps = Vec::with_capacity(levels.len().saturating_sub(1));
    let mut current = index;

    // The root level has no sibling.
    for level in levels.iter().take(levels.len().saturating_sub(1)) {
        let step = if current % 2 == 0 {
            let sibling = level.get(current + 1).unwrap_or(&level[current]);
            ProofStep {
                sibling: *sibling,
                side: Side::Right,
            }
        } else {
            ProofStep {
                sibling: level[current - 1],
                side: Side::Left,
            }
        };
        steps.push(step);
        current /= 2;
    }

    Ok(steps)
}

/// Recompute the root from `leaf` and `proof` and compare it to `root`.
///
/// Never fails: any mismatch simply yields `false`.
pub fn verify_proof(leaf: &TransactionRecord, proof: &[ProofStep], root: &Digest) -> bool {
    let computed = proof
        .iter()
        .fold(leaf.digest(), |current, step| match step.side {
            Side::Left => hash_pair(&step.sibling, &current),
            Side::Right => hash_pair(&current, &step.sibling),
        });
    computed == *root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::merkle_root;
    use crate::transaction::{FieldValue, sample_transactions, tagged_sample_transactions};

    #[test]
    fn every_index_verifies_against_root() {
        for n in 1..=9 {
            let txs: Vec<TransactionRecord> = (0..n)
                .map(|i| TransactionRecord::new().with("seq", i as i64))
                .collect();
            let root = merkle_root(&txs);
            for (i, tx) in txs.iter().enumerate() {
                let proof = merkle_proof(&txs, i).unwrap();
                assert!(verify_proof(tx, &proof, &root), "n={n} i={i}");
            }
        }
    }

    #[test]
    fn proof_for_third_transaction_matches_hand_computed_path() {
        let txs = sample_transactions();
        let h: Vec<Digest> = txs.iter().map(TransactionRecord::digest).collect();
        let proof = merkle_proof(&txs, 2).unwrap();

        assert_eq!(
            proof,
            vec![
                ProofStep {
                    sibling: h[3],
                    side: Side::Right
                },
                ProofStep {
                    sibling: hash_pair(&h[0], &h[1]),
                    side: Side::Left
                },
            ]
        );
        assert!(verify_proof(&txs[2], &proof, &merkle_root(&txs)));
    }

    #[test]
    fn padded_leaf_is_its_own_sibling() {
        let txs = &sample_transactions()[..3];
        let proof = merkle_proof(txs, 2).unwrap();
        assert_eq!(proof[0].sibling, txs[2].digest());
        assert_eq!(proof[0].side, Side::Right);
        assert!(verify_proof(&txs[2], &proof, &merkle_root(txs)));
    }

    #[test]
    fn single_transaction_has_empty_proof() {
        let txs = &sample_transactions()[..1];
        let proof = merkle_proof(txs, 0).unwrap();
        assert!(proof.is_empty());
        assert!(verify_proof(&txs[0], &proof, &merkle_root(txs)));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let txs = sample_transactions();
        assert_eq!(
            merkle_proof(&txs, 4),
            Err(ChainError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(
            merkle_proof(&[], 0),
            Err(ChainError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn mutated_leaf_fails_verification() {
        let txs = sample_transactions();
        let root = merkle_root(&txs);
        let proof = merkle_proof(&txs, 1).unwrap();

        let mut changed_amount = txs[1].clone();
        changed_amount.insert("amt", 6);
        assert!(!verify_proof(&changed_amount, &proof, &root));

        let mut changed_sender = txs[1].clone();
        changed_sender.insert("from", "Mallory");
        assert!(!verify_proof(&changed_sender, &proof, &root));

        let extra_field = txs[1].clone().with("memo", "x");
        assert!(!verify_proof(&extra_field, &proof, &root));

        let mut as_float = txs[1].clone();
        as_float.insert("amt", FieldValue::Float(5.0));
        assert!(!verify_proof(&as_float, &proof, &root));
    }

    #[test]
    fn tampered_proof_or_root_fails_verification() {
        let txs = tagged_sample_transactions("T");
        let root = merkle_root(&txs);
        let proof = merkle_proof(&txs, 0).unwrap();

        let mut flipped = proof.clone();
        flipped[0].side = Side::Left;
        assert!(!verify_proof(&txs[0], &flipped, &root));

        let truncated = &proof[..1];
        assert!(!verify_proof(&txs[0], truncated, &root));

        assert!(!verify_proof(&txs[0], &proof, &Digest::ZERO));
    }

    #[test]
    fn proof_serializes_with_lowercase_sides() {
        let txs = sample_transactions();
        let proof = merkle_proof(&txs, 0).unwrap();
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json[0]["side"], "right");
        assert_eq!(json[0]["sibling"], txs[1].digest().to_hex());
    }
}
