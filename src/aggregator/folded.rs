//! Folded (collapsed) stack rendering.
//!
//! One line per merged stack, function names root first and joined by `;`,
//! followed by the stack weight:
//!
//! `main.main;main.(*Server).handle;runtime.memmove 60`
//!
//! Names are kept unshortened so the output can be fed to other flamegraph
//! tools as-is.

use super::stack::WeightedCallStack;

/// A single folded stack entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedStack {
    /// Function names, semicolon separated, root first
    pub stack: String,

    /// First value dimension of the stack
    pub weight: i64,
}

impl FoldedStack {
    pub fn new(stack: String, weight: i64) -> Self {
        Self { stack, weight }
    }

    /// Fold a stack, or `None` when it has no functions
    pub fn from_stack(stack: &WeightedCallStack) -> Option<Self> {
        let names: Vec<&str> = stack.root_to_leaf().collect();
        if names.is_empty() {
            return None;
        }
        Some(Self::new(names.join(";"), stack.weight()))
    }

    /// `stack weight`
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Fold every non-empty stack, keeping input order
pub fn fold_stacks(stacks: &[WeightedCallStack]) -> Vec<FoldedStack> {
    stacks.iter().filter_map(FoldedStack::from_stack).collect()
}

/// Folded text for `stacks`, newline terminated
pub fn render_folded(stacks: &[WeightedCallStack]) -> String {
    fold_stacks(stacks)
        .iter()
        .map(|folded| folded.to_line() + "\n")
        .collect()
}
