//! Build the flamegraph call tree from weighted call stacks.
//!
//! Every stack is walked root to leaf. Each function name is shortened and
//! keyed by its display label, so frames with the same label under the same
//! parent collapse into one node. Every node on a stack's path receives the
//! stack's full weight, which makes a node's value its cumulative weight.
//!
//! Example: stacks `main;a;b 10` and `main;a 5` give
//! `root(15) -> main(15) -> a(15) -> b(10)`.

use super::stack::WeightedCallStack;
use super::symbols::{display_key, shorten_symbol};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the synthetic root node
pub const ROOT_NAME: &str = "root";

/// A finished call tree node, as serialized for the flamegraph UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallTreeNode {
    /// Display label (shortened name after its last `.`)
    #[serde(rename = "n")]
    pub short_name: String,

    /// Shortened but otherwise complete name, for drill-down
    #[serde(rename = "f")]
    pub full_name: String,

    /// Sum of the weights of every stack passing through this node
    #[serde(rename = "v")]
    pub cumulative_weight: i64,

    /// Children in order of first discovery
    #[serde(rename = "c")]
    pub children: Vec<CallTreeNode>,
}

impl CallTreeNode {
    /// Child with the given label
    pub fn child(&self, short_name: &str) -> Option<&CallTreeNode> {
        self.children.iter().find(|c| c.short_name == short_name)
    }

    /// Follow a path of labels from this node
    pub fn find_path(&self, path: &[&str]) -> Option<&CallTreeNode> {
        path.iter()
            .try_fold(self, |node, label| node.child(label))
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(CallTreeNode::node_count).sum::<usize>()
    }

    /// Length of the longest root-to-leaf path, counted in edges
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Node under construction: children keep insertion order and are looked up
/// through a label index.
struct Node {
    short_name: String,
    full_name: String,
    weight: i64,
    children: Vec<Node>,
    index: HashMap<String, usize>,
}

impl Node {
    fn new(short_name: String, full_name: String) -> Self {
        Self {
            short_name,
            full_name,
            weight: 0,
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Child keyed by `short_name`, created on first use
    fn child_mut(&mut self, short_name: &str, full_name: &str) -> &mut Node {
        let idx = match self.index.get(short_name) {
            Some(&idx) => idx,
            None => {
                let idx = self.children.len();
                self.children
                    .push(Node::new(short_name.to_string(), full_name.to_string()));
                self.index.insert(short_name.to_string(), idx);
                idx
            }
        };
        &mut self.children[idx]
    }

    fn into_tree_node(self) -> CallTreeNode {
        CallTreeNode {
            short_name: self.short_name,
            full_name: self.full_name,
            cumulative_weight: self.weight,
            children: self
                .children
                .into_iter()
                .map(Node::into_tree_node)
                .collect(),
        }
    }
}

/// Incremental call tree builder
pub struct CallTreeBuilder {
    root: Node,
    stacks: usize,
}

impl Default for CallTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CallTreeBuilder {
    pub fn new() -> Self {
        Self {
            root: Node::new(ROOT_NAME.to_string(), ROOT_NAME.to_string()),
            stacks: 0,
        }
    }

    /// Merge one stack into the tree.
    ///
    /// A stack without frames only adds to the root. Weights saturate at
    /// the `i64` bounds.
    pub fn add_stack(&mut self, stack: &WeightedCallStack) {
        let weight = stack.weight();
        self.stacks += 1;

        let mut current = &mut self.root;
        current.weight = current.weight.saturating_add(weight);

        for function in stack.root_to_leaf() {
            let full_name = shorten_symbol(function);
            let key = display_key(&full_name);
            current = current.child_mut(key, &full_name);
            current.weight = current.weight.saturating_add(weight);
        }
    }

    /// Number of stacks merged so far
    pub fn stack_count(&self) -> usize {
        self.stacks
    }

    /// Finish construction and return the root node
    pub fn finish(self) -> CallTreeNode {
        self.root.into_tree_node()
    }
}

/// Build a call tree from stacks in the given order
///
/// **Public** - main entry point for tree construction
pub fn build_call_tree(stacks: &[WeightedCallStack]) -> CallTreeNode {
    let mut builder = CallTreeBuilder::new();
    for stack in stacks {
        builder.add_stack(stack);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_paths_merge() {
        let stacks = vec![
            WeightedCallStack::from_root_path(&["main.main", "main.funcA"], 100),
            WeightedCallStack::from_root_path(&["main.main", "main.funcA"], 50),
        ];

        let root = build_call_tree(&stacks);
        assert_eq!(root.cumulative_weight, 150);
        assert_eq!(root.children.len(), 1);

        let func_a = root.find_path(&["main", "funcA"]).unwrap();
        assert_eq!(func_a.cumulative_weight, 150);
        assert_eq!(func_a.full_name, "main.funcA");
    }

    #[test]
    fn test_empty_builder() {
        let root = CallTreeBuilder::new().finish();
        assert_eq!(root.short_name, "root");
        assert_eq!(root.cumulative_weight, 0);
        assert!(root.children.is_empty());
        assert_eq!(root.depth(), 0);
    }

    #[test]
    fn test_node_count_and_depth() {
        let stacks = vec![
            WeightedCallStack::from_root_path(&["a", "b", "c"], 1),
            WeightedCallStack::from_root_path(&["a", "d"], 1),
        ];
        let root = build_call_tree(&stacks);
        assert_eq!(root.node_count(), 5);
        assert_eq!(root.depth(), 3);
    }

    #[test]
    fn test_weights_saturate_instead_of_overflowing() {
        let stacks = vec![
            WeightedCallStack::from_root_path(&["main.a"], i64::MAX),
            WeightedCallStack::from_root_path(&["main.b"], 1),
        ];

        let root = build_call_tree(&stacks);
        assert_eq!(root.cumulative_weight, i64::MAX);
        assert_eq!(root.find_path(&["a"]).unwrap().cumulative_weight, i64::MAX);
        assert_eq!(root.find_path(&["b"]).unwrap().cumulative_weight, 1);
    }
}
