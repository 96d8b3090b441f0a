//! Weighted call stacks handed to the call-tree builder.
//!
//! Stacks arrive already merged and sorted by the profile adapter
//! (see [`crate::parser::pprof`]). Frames are stored leaf-first and the
//! inlined functions of a frame innermost-first, matching pprof's layout.

/// One stack position. A location with inlined calls expands into several
/// functions that share it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Function names, innermost (most deeply inlined) first
    pub functions: Vec<String>,
}

impl Frame {
    pub fn new(functions: Vec<String>) -> Self {
        Self { functions }
    }

    /// A frame without inlining
    pub fn single(function: impl Into<String>) -> Self {
        Self {
            functions: vec![function.into()],
        }
    }

    /// Function names from the outermost caller to the innermost callee
    pub fn outer_to_inner(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().rev().map(String::as_str)
    }
}

/// A sampled call stack with its measurements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedCallStack {
    /// Frames, leaf first
    pub frames: Vec<Frame>,

    /// One value per sample type; only the first one is used as the weight
    pub values: Vec<i64>,
}

impl WeightedCallStack {
    pub fn new(frames: Vec<Frame>, values: Vec<i64>) -> Self {
        Self { frames, values }
    }

    /// Build a stack of non-inlined frames given root-first, e.g.
    /// `["main.main", "main.work"]`.
    pub fn from_root_path<S: AsRef<str>>(path: &[S], weight: i64) -> Self {
        let frames = path
            .iter()
            .rev()
            .map(|name| Frame::single(name.as_ref()))
            .collect();
        Self::new(frames, vec![weight])
    }

    /// The first value dimension (0 for a stack without values)
    pub fn weight(&self) -> i64 {
        self.values.first().copied().unwrap_or(0)
    }

    /// Every function name on the stack, root first and outer-to-inner
    /// within each frame.
    pub fn root_to_leaf(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().rev().flat_map(|frame| frame.outer_to_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_to_leaf_reverses_frames_and_inlining() {
        let stack = WeightedCallStack::new(
            vec![
                Frame::single("leaf"),
                Frame::new(vec!["inlined".into(), "caller".into()]),
                Frame::single("main"),
            ],
            vec![10, 20],
        );

        let names: Vec<&str> = stack.root_to_leaf().collect();
        assert_eq!(names, vec!["main", "caller", "inlined", "leaf"]);
        assert_eq!(stack.weight(), 10);
    }

    #[test]
    fn test_weight_without_values() {
        let stack = WeightedCallStack::new(vec![], vec![]);
        assert_eq!(stack.weight(), 0);
    }
}
