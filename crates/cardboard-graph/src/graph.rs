//! Directed graph with insertion-ordered nodes and bidirectional adjacency.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

use crate::error::GraphError;

/// A directed graph over opaque node identities.
///
/// Nodes are stored in insertion order and addressed internally by their
/// insertion index, which is what makes ordering deterministic. Edges point
/// from a dependent to its dependency; both directions are indexed so
/// reverse queries such as [`DirectedGraph::transitive_dependents`] do not
/// need a full scan.
#[derive(Debug, Clone)]
pub struct DirectedGraph<N> {
    /// All nodes, in insertion order.
    nodes: Vec<N>,
    /// Position of each node in `nodes`.
    index: HashMap<N, usize>,
    /// Outgoing edges per node position, in insertion order.
    successors: Vec<Vec<usize>>,
    /// Incoming edges per node position, in insertion order.
    predecessors: Vec<Vec<usize>>,
    edge_count: usize,
}

impl<N> Default for DirectedGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<N> DirectedGraph<N>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the graph.
    ///
    /// Returns `false` when the node was already present, in which case the
    /// graph is left unchanged.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.index.contains_key(&node) {
            return false;
        }
        let position = self.nodes.len();
        self.index.insert(node.clone(), position);
        self.nodes.push(node);
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        true
    }

    /// Adds an edge from `from` to `to`.
    ///
    /// Returns `Ok(false)` when the edge already exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if either endpoint has not been
    /// added with [`DirectedGraph::add_node`].
    pub fn add_edge(&mut self, from: &N, to: &N) -> Result<bool, GraphError<N>> {
        let source = self.position(from)?;
        let target = self.position(to)?;

        let Some(outgoing) = self.successors.get_mut(source) else {
            return Err(GraphError::unknown_node(from.clone()));
        };
        if outgoing.contains(&target) {
            return Ok(false);
        }
        outgoing.push(target);
        if let Some(incoming) = self.predecessors.get_mut(target) {
            incoming.push(source);
        }
        self.edge_count += 1;
        Ok(true)
    }

    /// Returns whether the graph contains the given node.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Returns an iterator over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Returns the number of nodes in the graph.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of distinct edges in the graph.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns whether the graph is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the nodes the given node has edges to, in edge insertion order.
    pub fn successors(&self, node: &N) -> impl Iterator<Item = &N> {
        self.index
            .get(node)
            .and_then(|&position| self.successors.get(position))
            .into_iter()
            .flatten()
            .filter_map(|&position| self.nodes.get(position))
    }

    /// Returns the nodes with edges to the given node, in edge insertion order.
    pub fn predecessors(&self, node: &N) -> impl Iterator<Item = &N> {
        self.index
            .get(node)
            .and_then(|&position| self.predecessors.get(position))
            .into_iter()
            .flatten()
            .filter_map(|&position| self.nodes.get(position))
    }

    /// Returns every node that has a path to `node`, in insertion order.
    ///
    /// With dependent → dependency edges this is the set of nodes that
    /// directly or indirectly depend on `node`. The node itself is only
    /// included when it sits on a cycle.
    #[must_use]
    pub fn transitive_dependents(&self, node: &N) -> Vec<N> {
        let Some(&start) = self.index.get(node) else {
            return Vec::new();
        };

        let mut reached = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for &previous in self.predecessor_positions(current) {
                if let Some(seen) = reached.get_mut(previous) {
                    if !*seen {
                        *seen = true;
                        queue.push_back(previous);
                    }
                }
            }
        }

        self.nodes
            .iter()
            .zip(reached)
            .filter_map(|(candidate, hit)| hit.then(|| candidate.clone()))
            .collect()
    }

    fn position(&self, node: &N) -> Result<usize, GraphError<N>> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| GraphError::unknown_node(node.clone()))
    }
}

impl<N> DirectedGraph<N> {
    pub(crate) fn node_at(&self, position: usize) -> Option<&N> {
        self.nodes.get(position)
    }

    pub(crate) fn successor_positions(&self, position: usize) -> &[usize] {
        self.successors.get(position).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) fn predecessor_positions(&self, position: usize) -> &[usize] {
        self.predecessors.get(position).map(Vec::as_slice).unwrap_or_default()
    }

    pub(crate) const fn position_count(&self) -> usize {
        self.nodes.len()
    }
}
