//! Merkle commitment over an ordered list of transactions.
//!
//! Leaves are the SHA-256 digests of each record's canonical encoding.
//! Internal nodes hash the raw bytes of their two children. A level with
//! an odd count duplicates its last digest before pairing.

pub mod proof;
pub mod tree;

pub use proof::{ProofStep, Side, merkle_proof, verify_proof};
pub use tree::merkle_root;
