//! Fork-choice sandbox: competing branches and best-tip selection by
//! cumulative work.

pub mod graph;

pub use graph::{ForkGraph, ForkNode, block_work};
