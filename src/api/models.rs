use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::blockchain::Block;
use crate::config::Settings;
use crate::fork::{ForkGraph, ForkNode};
use crate::hash::Digest;
use crate::merkle::ProofStep;
use crate::transaction::TransactionRecord;

/// Shared application state: one fork graph behind one lock.
///
/// Every read and every insertion goes through `graph`, so the
/// compare-and-update of the best tip never interleaves between miners.
pub struct AppState {
    pub graph: Mutex<ForkGraph>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let graph = ForkGraph::new(settings.difficulty);
        Self::with_graph(graph, settings)
    }

    pub fn with_graph(graph: ForkGraph, settings: Settings) -> Self {
        Self {
            graph: Mutex::new(graph),
            settings,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty: u32,
    pub best_tip: Digest,
    pub cumulative_work: u128,
    pub chain: Vec<Digest>,
    pub blocks: Vec<Block>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct PathResponse {
    pub tip: Digest,
    pub path: Vec<Digest>,
}

#[derive(Serialize)]
pub struct TipInfo {
    pub hash: Digest,
    pub index: u64,
    pub cumulative_work: u128,
    pub best: bool,
}

#[derive(Serialize)]
pub struct TipsResponse {
    pub tips: Vec<TipInfo>,
}

/* ---------- Block API Models ---------- */

#[derive(Deserialize)]
pub struct AddBlockRequest {
    /// Defaults to the current best tip.
    #[serde(default)]
    pub parent: Option<Digest>,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Serialize)]
pub struct AddBlockResponse {
    pub hash: Digest,
    pub parent: Digest,
    pub index: u64,
    pub nonce: u64,
    pub work: u128,
    pub cumulative_work: u128,
    pub best_tip: Digest,
}

#[derive(Serialize)]
pub struct NodeResponse {
    pub hash: Digest,
    pub parent: Option<Digest>,
    pub work: u128,
    pub cumulative_work: u128,
    pub block: Block,
}

impl NodeResponse {
    pub fn new(hash: Digest, node: &ForkNode) -> Self {
        Self {
            hash,
            parent: node.parent,
            work: node.work,
            cumulative_work: node.cumulative_work,
            block: node.block.clone(),
        }
    }
}

/* ---------- Merkle API Models ---------- */

#[derive(Deserialize)]
pub struct MerkleRootRequest {
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Serialize)]
pub struct MerkleRootResponse {
    pub root: Digest,
    pub leaves: usize,
}

#[derive(Deserialize)]
pub struct MerkleProofRequest {
    pub transactions: Vec<TransactionRecord>,
    pub index: usize,
}

#[derive(Serialize)]
pub struct MerkleProofResponse {
    pub root: Digest,
    pub index: usize,
    pub proof: Vec<ProofStep>,
}

#[derive(Deserialize)]
pub struct VerifyProofRequest {
    pub transaction: TransactionRecord,
    pub proof: Vec<ProofStep>,
    pub root: Digest,
}

#[derive(Serialize)]
pub struct VerifyProofResponse {
    pub valid: bool,
}

/* ---------- Stats ---------- */

#[derive(Serialize)]
pub struct StatsResponse {
    pub nodes: usize,
    pub tips: usize,
    pub difficulty: u32,
    pub best_tip: Digest,
    pub best_height: u64,
    pub best_cumulative_work: u128,
    pub mine_timeout_secs: Option<u64>,
}
