pub mod block;
pub mod clock;
pub mod miner;
pub mod validator;

pub use block::{Block, BlockHeader};
pub use clock::{Clock, FixedClock, SystemClock};
pub use miner::{CancelHandle, MineOutcome, MiningContext, mine_block, mine_block_with};
pub use validator::{check_block, check_chain, validate_block, validate_chain};

/// Default Proof-of-Work difficulty (number of leading zero hex digits).
pub const DEFAULT_DIFFICULTY: u32 = 3;

/// Highest difficulty the HTTP sandbox accepts (keeps searches short).
pub const MAX_DIFFICULTY: u32 = 6;
