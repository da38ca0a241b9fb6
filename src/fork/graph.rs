use log::{debug, error, info};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::blockchain::{
    Block, Clock, MineOutcome, MiningContext, SystemClock, check_block, mine_block_with,
};
use crate::error::{ChainError, Result};
use crate::hash::Digest;
use crate::transaction::TransactionRecord;

/// Work credited to a block: 16 to the power of its leading zero hex
/// digits, saturating at `u128::MAX`.
pub fn block_work(hash: &Digest) -> u128 {
    16u128
        .checked_pow(hash.leading_zero_nibbles())
        .unwrap_or(u128::MAX)
}

/// A mined block plus its place in the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForkNode {
    pub block: Block,
    pub parent: Option<Digest>,
    pub work: u128,
    pub cumulative_work: u128,
}

/// Append-only forest of mined blocks keyed by digest.
///
/// `best_tip` always names the node with the greatest cumulative work,
/// ties going to the smaller digest. Nodes are never removed.
pub struct ForkGraph {
    nodes: HashMap<Digest, ForkNode>,
    genesis: Digest,
    best_tip: Digest,
    difficulty: u32,
    clock: Box<dyn Clock + Send + Sync>,
}

impl fmt::Debug for ForkGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForkGraph")
            .field("nodes", &self.nodes.len())
            .field("genesis", &self.genesis)
            .field("best_tip", &self.best_tip)
            .field("difficulty", &self.difficulty)
            .finish()
    }
}

impl ForkGraph {
    /// New graph whose genesis and children are stamped with live time.
    pub fn new(difficulty: u32) -> Self {
        Self::with_clock(difficulty, SystemClock)
    }

    pub fn with_clock(difficulty: u32, clock: impl Clock + Send + Sync + 'static) -> Self {
        let genesis = Block::genesis(difficulty, clock.now());
        let digest = genesis.hash();
        let work = block_work(&digest);

        let mut nodes = HashMap::new();
        nodes.insert(
            digest,
            ForkNode {
                block: genesis,
                parent: None,
                work,
                cumulative_work: work,
            },
        );
        info!("FORK - genesis {} (difficulty={})", digest.short(12), difficulty);

        Self {
            nodes,
            genesis: digest,
            best_tip: digest,
            difficulty,
            clock: Box::new(clock),
        }
    }

    pub fn genesis(&self) -> Digest {
        self.genesis
    }

    pub fn best_tip(&self) -> Digest {
        self.best_tip
    }

    pub fn best_node(&self) -> Option<&ForkNode> {
        self.nodes.get(&self.best_tip)
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn node(&self, digest: &Digest) -> Option<&ForkNode> {
        self.nodes.get(digest)
    }

    pub fn contains(&self, digest: &Digest) -> bool {
        self.nodes.contains_key(digest)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A graph is never empty; it is created with its genesis.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &ForkNode)> {
        self.nodes.iter()
    }

    /// Nodes nobody builds on yet, ascending by digest.
    pub fn tips(&self) -> Vec<Digest> {
        let parents: HashSet<Digest> = self.nodes.values().filter_map(|n| n.parent).collect();
        let mut tips: Vec<Digest> = self
            .nodes
            .keys()
            .filter(|d| !parents.contains(*d))
            .copied()
            .collect();
        tips.sort();
        tips
    }

    /// Mine a child of `parent` with no deadline and insert it.
    pub fn add_child(
        &mut self,
        parent: &Digest,
        transactions: Vec<TransactionRecord>,
    ) -> Result<Digest> {
        self.add_child_with(parent, transactions, &MiningContext::unbounded())
    }

    /// Mine a child of `parent` under `ctx`, re-validate it, link it and
    /// update the best tip.
    ///
    /// Re-adding a block that is already present returns its digest and
    /// leaves the graph untouched.
    pub fn add_child_with(
        &mut self,
        parent: &Digest,
        transactions: Vec<TransactionRecord>,
        ctx: &MiningContext,
    ) -> Result<Digest> {
        let parent_node = self
            .nodes
            .get(parent)
            .ok_or(ChainError::UnknownParent(*parent))?;

        let child = match mine_block_with(
            &parent_node.block,
            transactions,
            self.difficulty,
            self.clock.as_ref(),
            ctx,
        ) {
            MineOutcome::Mined(block) => block,
            MineOutcome::Aborted { reason, attempts } => {
                return Err(ChainError::MiningAborted { reason, attempts });
            }
        };

        if let Err(e) = check_block(&parent_node.block, &child) {
            error!("FORK - mined block failed re-validation: {e}");
            return Err(ChainError::InvariantViolation(e));
        }

        let digest = child.hash();
        if self.nodes.contains_key(&digest) {
            debug!("FORK - block {} already present", digest.short(12));
            return Ok(digest);
        }

        let work = block_work(&digest);
        let cumulative_work = parent_node.cumulative_work.saturating_add(work);
        self.nodes.insert(
            digest,
            ForkNode {
                block: child,
                parent: Some(*parent),
                work,
                cumulative_work,
            },
        );
        debug!(
            "FORK - added {} on {} (work={}, cumulative={})",
            digest.short(12),
            parent.short(12),
            work,
            cumulative_work
        );

        self.update_best_tip(digest, cumulative_work);
        Ok(digest)
    }

    fn update_best_tip(&mut self, candidate: Digest, cumulative_work: u128) {
        let current = self.best_tip;
        let current_work = self
            .nodes
            .get(&current)
            .map(|n| n.cumulative_work)
            .unwrap_or(0);

        let switch = cumulative_work > current_work
            || (cumulative_work == current_work && candidate < current);
        if !switch {
            return;
        }

        self.best_tip = candidate;
        if self.is_ancestor(&current, &candidate) {
            debug!("FORK - best tip advanced to {}", candidate.short(12));
        } else {
            info!(
                "FORK - REORG best tip {} -> {} (cumulative work {} -> {})",
                current.short(12),
                candidate.short(12),
                current_work,
                cumulative_work
            );
        }
    }

    fn is_ancestor(&self, ancestor: &Digest, descendant: &Digest) -> bool {
        let mut cursor = Some(*descendant);
        while let Some(d) = cursor {
            if d == *ancestor {
                return true;
            }
            cursor = self.nodes.get(&d).and_then(|n| n.parent);
        }
        false
    }

    /// Digests from the genesis down to `tip`, inclusive.
    pub fn path_to_genesis(&self, tip: &Digest) -> Result<Vec<Digest>> {
        if !self.nodes.contains_key(tip) {
            return Err(ChainError::UnknownBlock(*tip));
        }

        let mut path = Vec::new();
        let mut current = *tip;
        loop {
            path.push(current);
            let node = self
                .nodes
                .get(&current)
                .ok_or(ChainError::BrokenChain(current))?;
            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        Ok(path)
    }

    pub fn best_chain(&self) -> Result<Vec<Digest>> {
        self.path_to_genesis(&self.best_tip)
    }

    /// Blocks along the best chain, genesis first.
    pub fn best_blocks(&self) -> Result<Vec<Block>> {
        self.best_chain()?
            .iter()
            .map(|d| {
                self.nodes
                    .get(d)
                    .map(|n| n.block.clone())
                    .ok_or(ChainError::BrokenChain(*d))
            })
            .collect()
    }
}
