//! Dependency graphs and deterministic topological ordering for Cardboard.
//!
//! The component container sequences singleton construction from a graph of
//! "depends on" relationships. This crate provides the two pieces it needs:
//!
//! - [`DirectedGraph`] - an insertion-ordered directed graph over opaque node
//!   identities, with forward and reverse adjacency
//! - [`topological_sort`] / [`dependency_order`] - Kahn's algorithm with ties
//!   broken by insertion order, so identical inputs always produce identical
//!   orders
//!
//! Cycles are reported as [`GraphError::Cycle`] together with the nodes that
//! form one offending cycle; the sort never returns a partial order.
//!
//! # Example
//!
//! ```
//! use cardboard_graph::{DirectedGraph, dependency_order};
//!
//! let mut graph = DirectedGraph::new();
//! graph.add_node("shop");
//! graph.add_node("economy");
//! graph.add_node("database");
//! graph.add_edge(&"shop", &"economy").expect("both nodes exist");
//! graph.add_edge(&"economy", &"database").expect("both nodes exist");
//!
//! let order = dependency_order(&graph).expect("graph is acyclic");
//! assert_eq!(order, vec!["database", "economy", "shop"]);
//! ```

mod error;
mod graph;
mod sort;

pub use error::GraphError;
pub use graph::DirectedGraph;
pub use sort::{dependency_order, topological_sort};

#[cfg(test)]
mod tests;
