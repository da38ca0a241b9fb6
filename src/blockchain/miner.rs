use log::{debug, info};
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::block::{Block, BlockHeader};
use super::clock::{Clock, SystemClock};
use crate::error::AbortReason;
use crate::merkle::merkle_root;
use crate::transaction::TransactionRecord;

/// Nonce attempts between two cancellation/deadline checks.
pub const DEFAULT_CHECK_INTERVAL: u64 = 1024;

/// Shared flag a caller flips to stop a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Once set the flag stays set.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounds for one nonce search.
#[derive(Debug, Clone)]
pub struct MiningContext {
    deadline: Option<Instant>,
    max_attempts: Option<u64>,
    cancel: CancelHandle,
    check_interval: u64,
}

impl Default for MiningContext {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl MiningContext {
    /// No deadline, no attempt cap, never cancelled unless the handle is used.
    pub fn unbounded() -> Self {
        Self {
            deadline: None,
            max_attempts: None,
            cancel: CancelHandle::new(),
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Share an existing flag, e.g. one owned by a supervising thread.
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_check_interval(mut self, check_interval: u64) -> Self {
        self.check_interval = check_interval.max(1);
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn should_abort(&self, attempts: u64) -> Option<AbortReason> {
        if self.max_attempts.is_some_and(|max| attempts >= max) {
            return Some(AbortReason::AttemptLimit);
        }
        if attempts % self.check_interval != 0 {
            return None;
        }
        if self.cancel.is_cancelled() {
            return Some(AbortReason::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(AbortReason::DeadlineExceeded);
        }
        None
    }
}

/// Result of a bounded nonce search.
#[derive(Debug, Clone, PartialEq)]
pub enum MineOutcome {
    Mined(Block),
    Aborted { reason: AbortReason, attempts: u64 },
}

impl MineOutcome {
    pub fn into_block(self) -> Option<Block> {
        match self {
            MineOutcome::Mined(block) => Some(block),
            MineOutcome::Aborted { .. } => None,
        }
    }
}

/// Mine a block extending `previous`, sampling live time at every attempt.
///
/// The search has no bound and returns only once a nonce is found.
pub fn mine_block(previous: &Block, transactions: Vec<TransactionRecord>, difficulty: u32) -> Block {
    match search(previous, transactions, difficulty, &SystemClock, |_| {
        Ok::<(), Infallible>(())
    }) {
        Ok(block) => block,
        Err((never, _)) => match never {},
    }
}

/// Bounded nonce search with an injected clock.
///
/// The Merkle root and parent hash are computed once; the timestamp is
/// resampled from `clock` on every attempt, so with a live clock two runs
/// over identical inputs produce different blocks.
pub fn mine_block_with(
    previous: &Block,
    transactions: Vec<TransactionRecord>,
    difficulty: u32,
    clock: &dyn Clock,
    ctx: &MiningContext,
) -> MineOutcome {
    let check = |attempts| match ctx.should_abort(attempts) {
        Some(reason) => Err(reason),
        None => Ok(()),
    };
    match search(previous, transactions, difficulty, clock, check) {
        Ok(block) => MineOutcome::Mined(block),
        Err((reason, attempts)) => {
            debug!("MINER - aborted after {attempts} attempts: {reason}");
            MineOutcome::Aborted { reason, attempts }
        }
    }
}

fn search<E>(
    previous: &Block,
    transactions: Vec<TransactionRecord>,
    difficulty: u32,
    clock: &dyn Clock,
    mut check: impl FnMut(u64) -> Result<(), E>,
) -> Result<Block, (E, u64)> {
    let root = merkle_root(&transactions);
    let prev_hash = previous.hash();
    let index = previous.header.index + 1;
    debug!(
        "MINER - searching block #{} (difficulty={}, txs={}, parent={})",
        index,
        difficulty,
        transactions.len(),
        prev_hash.short(12)
    );

    let mut nonce: u64 = 0;
    let mut attempts: u64 = 0;
    loop {
        check(attempts).map_err(|e| (e, attempts))?;

        let header = BlockHeader {
            index,
            timestamp: clock.now(),
            prev_hash,
            merkle_root: root,
            nonce,
            difficulty,
        };
        attempts += 1;

        let hash = header.hash();
        if hash.meets_difficulty(difficulty) {
            info!(
                "MINER - sealed block #{} (hash={}, nonce={}, attempts={})",
                index, hash, nonce, attempts
            );
            return Ok(Block {
                header,
                transactions,
            });
        }
        nonce = nonce.wrapping_add(1);
    }
}
