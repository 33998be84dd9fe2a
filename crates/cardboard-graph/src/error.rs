//! Error types for graph construction and ordering.

use std::fmt;

use thiserror::Error;

/// Errors returned by graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError<N: fmt::Debug> {
    /// An edge referenced a node that was never added.
    #[error("node {node:?} is not present in the graph")]
    UnknownNode {
        /// The node that could not be addressed.
        node: N,
    },

    /// The graph contains at least one cycle.
    #[error("dependency cycle detected: {}", render_cycle(.cycle))]
    Cycle {
        /// Nodes on one cycle, in edge order. The last node has an edge back
        /// to the first.
        cycle: Vec<N>,
    },
}

impl<N: fmt::Debug> GraphError<N> {
    /// Creates a new `UnknownNode` error.
    #[must_use]
    pub const fn unknown_node(node: N) -> Self {
        Self::UnknownNode { node }
    }

    /// Creates a new `Cycle` error.
    #[must_use]
    pub const fn cycle(cycle: Vec<N>) -> Self {
        Self::Cycle { cycle }
    }

    /// Returns the nodes on the detected cycle, or an empty slice for other
    /// error kinds.
    #[must_use]
    pub fn cycle_members(&self) -> &[N] {
        match self {
            Self::Cycle { cycle } => cycle.as_slice(),
            Self::UnknownNode { .. } => &[],
        }
    }

    /// Converts the node payload, keeping the error kind.
    #[must_use]
    pub fn map_nodes<M: fmt::Debug>(self, mut convert: impl FnMut(N) -> M) -> GraphError<M> {
        match self {
            Self::UnknownNode { node } => GraphError::UnknownNode {
                node: convert(node),
            },
            Self::Cycle { cycle } => GraphError::Cycle {
                cycle: cycle.into_iter().map(convert).collect(),
            },
        }
    }
}

fn render_cycle<N: fmt::Debug>(cycle: &[N]) -> String {
    let mut rendered: Vec<String> = cycle.iter().map(|node| format!("{node:?}")).collect();
    if let Some(first) = rendered.first().cloned() {
        rendered.push(first);
    }
    rendered.join(" -> ")
}
