use serde::{Deserialize, Serialize};

use crate::hash::{Digest, sha256};
use crate::merkle::merkle_root;
use crate::transaction::TransactionRecord;

/// The six hashed fields of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub index: u64,
    pub timestamp: f64, // seconds since the Unix epoch
    pub prev_hash: Digest,
    pub merkle_root: Digest,
    pub nonce: u64,
    pub difficulty: u32, // required leading zero hex digits
}

impl BlockHeader {
    /// Delimiter-joined preimage. The timestamp always carries exactly six
    /// fractional digits so that equal fields give equal bytes.
    pub fn preimage(&self) -> String {
        format!(
            "{}|{:.6}|{}|{}|{}|{}",
            self.index,
            self.timestamp,
            self.prev_hash,
            self.merkle_root,
            self.nonce,
            self.difficulty
        )
    }

    /// SHA-256 of the preimage.
    pub fn hash(&self) -> Digest {
        sha256(self.preimage().as_bytes())
    }
}

/// A header plus the ordered transactions it commits to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<TransactionRecord>,
}

impl Block {
    /// Create the genesis block: index 0, zero link and zero root, no
    /// transactions, nonce 0.
    pub fn genesis(difficulty: u32, timestamp: f64) -> Self {
        Self {
            header: BlockHeader {
                index: 0,
                timestamp,
                prev_hash: Digest::ZERO,
                merkle_root: Digest::ZERO,
                nonce: 0,
                difficulty,
            },
            transactions: Vec::new(),
        }
    }

    pub fn hash(&self) -> Digest {
        self.header.hash()
    }

    /// True if the header commits to exactly these transactions.
    pub fn has_valid_commitment(&self) -> bool {
        self.header.merkle_root == merkle_root(&self.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::sample_transactions;

    const GENESIS_HASH: &str = "e03f92b9128d2ad5549d1fe295da306d4053696afeaaa5138230b00376e83ded";
    const ROOT_4: &str = "8a2c3f0894c50aa4875ee9fc8bb5d20155caf42e698a4d6f91e2fe1eb25a2eae";

    #[test]
    fn genesis_matches_reference_hash() {
        let g = Block::genesis(3, 1_700_000_000.0);
        assert_eq!(
            g.header.preimage(),
            format!("0|1700000000.000000|{}|{}|0|3", "0".repeat(64), "0".repeat(64))
        );
        assert_eq!(g.hash().to_hex(), GENESIS_HASH);
        assert!(g.has_valid_commitment());
    }

    #[test]
    fn header_hash_is_pure() {
        let header = BlockHeader {
            index: 1,
            timestamp: 1_700_000_000.123456,
            prev_hash: Digest::ZERO,
            merkle_root: ROOT_4.parse().unwrap(),
            nonce: 42,
            difficulty: 3,
        };
        assert_eq!(header.hash(), header.clone().hash());
        assert_eq!(
            header.hash().to_hex(),
            "967d12db19692b2f87be8829e1665af2058e0e469a606d1cd3dd11fd8518f095"
        );
    }

    #[test]
    fn timestamp_is_rounded_to_six_decimals() {
        let mut header = Block::genesis(0, 12.5).header;
        assert!(header.preimage().starts_with("0|12.500000|"));

        header.timestamp = 1.0000004;
        let a = header.hash();
        header.timestamp = 1.0000001;
        assert_eq!(a, header.hash());
    }

    #[test]
    fn every_field_feeds_the_hash() {
        let base = BlockHeader {
            index: 1,
            timestamp: 10.0,
            prev_hash: Digest::ZERO,
            merkle_root: Digest::ZERO,
            nonce: 0,
            difficulty: 1,
        };
        let h = base.hash();

        let mut m = base.clone();
        m.index = 2;
        assert_ne!(m.hash(), h);
        let mut m = base.clone();
        m.timestamp = 10.000001;
        assert_ne!(m.hash(), h);
        let mut m = base.clone();
        m.prev_hash = crate::hash::sha256(b"p");
        assert_ne!(m.hash(), h);
        let mut m = base.clone();
        m.merkle_root = crate::hash::sha256(b"r");
        assert_ne!(m.hash(), h);
        let mut m = base.clone();
        m.nonce = 1;
        assert_ne!(m.hash(), h);
        let mut m = base.clone();
        m.difficulty = 2;
        assert_ne!(m.hash(), h);
    }

    #[test]
    fn commitment_detects_tampered_transactions() {
        let txs = sample_transactions();
        let mut block = Block::genesis(0, 1.0);
        block.header.merkle_root = merkle_root(&txs);
        block.transactions = txs;
        assert!(block.has_valid_commitment());

        block.transactions.pop();
        assert!(!block.has_valid_commitment());
    }
}
