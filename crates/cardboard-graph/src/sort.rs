//! Deterministic topological ordering with cycle detection.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::hash::Hash;

use crate::error::GraphError;
use crate::graph::DirectedGraph;

/// Sorts the graph so that for every edge `u -> v`, `u` precedes `v`.
///
/// With dependent → dependency edges this places each node before the nodes
/// it depends on; use [`dependency_order`] for construction order. Among
/// nodes that are ready at the same time, the one inserted first wins, so the
/// result is a pure function of the insertion sequence.
///
/// # Errors
///
/// Returns [`GraphError::Cycle`] naming the nodes of one cycle when the graph
/// is not acyclic.
pub fn topological_sort<N>(graph: &DirectedGraph<N>) -> Result<Vec<N>, GraphError<N>>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    let count = graph.position_count();
    let mut in_degree: Vec<usize> = (0..count)
        .map(|position| graph.predecessor_positions(position).len())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(position, _)| Reverse(position))
        .collect();

    let mut order = Vec::with_capacity(count);
    while let Some(Reverse(position)) = ready.pop() {
        order.push(position);
        for &next in graph.successor_positions(position) {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    ready.push(Reverse(next));
                }
            }
        }
    }

    if order.len() < count {
        return Err(GraphError::cycle(find_cycle(graph, &in_degree)));
    }

    Ok(order
        .into_iter()
        .filter_map(|position| graph.node_at(position).cloned())
        .collect())
}

/// Returns the nodes in construction order: every node after all the nodes
/// it depends on.
///
/// This is the reverse of [`topological_sort`].
///
/// # Errors
///
/// Returns [`GraphError::Cycle`] when the graph is not acyclic.
pub fn dependency_order<N>(graph: &DirectedGraph<N>) -> Result<Vec<N>, GraphError<N>>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    let mut order = topological_sort(graph)?;
    order.reverse();
    Ok(order)
}

/// Walks predecessor links among the nodes Kahn's algorithm could not emit.
///
/// Every such node keeps a non-zero in-degree, so it has at least one
/// unemitted predecessor; following those links must revisit a node.
fn find_cycle<N: Clone>(graph: &DirectedGraph<N>, in_degree: &[usize]) -> Vec<N> {
    let Some(start) = in_degree.iter().position(|&degree| degree > 0) else {
        return Vec::new();
    };

    let mut path: Vec<usize> = Vec::new();
    let mut seen: HashMap<usize, usize> = HashMap::new();
    let mut current = start;
    loop {
        if let Some(&first) = seen.get(&current) {
            let mut cycle = path.get(first..).map(<[usize]>::to_vec).unwrap_or_default();
            // The walk followed edges backwards.
            cycle.reverse();
            return cycle
                .into_iter()
                .filter_map(|position| graph.node_at(position).cloned())
                .collect();
        }
        seen.insert(current, path.len());
        path.push(current);

        let next = graph
            .predecessor_positions(current)
            .iter()
            .copied()
            .find(|&previous| in_degree.get(previous).is_some_and(|&degree| degree > 0));
        match next {
            Some(previous) => current = previous,
            None => {
                return path
                    .into_iter()
                    .filter_map(|position| graph.node_at(position).cloned())
                    .collect();
            }
        }
    }
}
