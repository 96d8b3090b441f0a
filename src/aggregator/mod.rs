//! Aggregation of call stacks into the flamegraph call tree.
//!
//! This module provides:
//! - The weighted call stack input model
//! - Symbol name shortening
//! - Call tree construction
//! - Folded stack rendering

pub mod call_tree;
pub mod folded;
pub mod stack;
pub mod symbols;

// Re-export main types and functions
pub use call_tree::{build_call_tree, CallTreeBuilder, CallTreeNode};
pub use folded::{fold_stacks, render_folded, FoldedStack};
pub use stack::{Frame, WeightedCallStack};
pub use symbols::{display_key, shorten_symbol};
