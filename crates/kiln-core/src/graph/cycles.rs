//! Cycle detection for artifact dependency graphs.
//!
//! # Overview
//!
//! A cycle in the dependency graph means an artifact transitively depends on
//! itself and can never be scheduled. [`find_cycle`] reports one such cycle
//! as a path; the build pipeline decides what to do with it (see
//! [`crate::plan::validate`]).
//!
//! # Design
//!
//! - **Every start node.** A depth-first search is started from each key in
//!   key order, so a cycle that is unreachable from earlier keys is still
//!   found when its own nodes are tried.
//! - **Explicit stack.** The traversal keeps a stack of successor iterators
//!   instead of recursing, so deep dependency chains cannot overflow the call
//!   stack.
//! - **Path membership.** A node counts as "visited" while it is on the
//!   current path. Reaching such a node closes a cycle. Nodes reached through
//!   two different branches (diamonds) are not cycles.
//! - **Settled nodes.** A node whose whole reachable subgraph was explored
//!   without closing a cycle cannot lead to one later, so it is skipped by
//!   subsequent searches. Skipping it never changes which cycle is reported.
//! - **First cycle wins.** Start nodes and successors are visited in their
//!   natural order and the search stops at the first cycle, so the result is
//!   deterministic for a given graph.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
)]

use std::collections::BTreeSet;
use std::fmt;
use std::iter::Flatten;

use serde::Serialize;
use tracing::{debug, trace};

use super::store::Graph;

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// A dependency cycle as an ordered path.
///
/// For a path `[n1, n2, …, nk]` there is an edge `n_i → n_{i+1}` for every
/// consecutive pair and a closing edge `nk → n1`. The first node is the point
/// where the search re-entered the path. The closing node is not repeated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cycle<N> {
    path: Vec<N>,
}

impl<N> Cycle<N> {
    /// The nodes of the cycle in traversal order.
    pub const fn nodes(&self) -> &[N] {
        self.path.as_slice()
    }

    /// Number of distinct nodes in the cycle.
    pub const fn len(&self) -> usize {
        self.path.len()
    }

    /// Always `false`: a cycle has at least one node.
    pub const fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Returns `true` if this is a node depending on itself.
    pub const fn is_self_loop(&self) -> bool {
        self.path.len() == 1
    }

    /// Returns `true` if this is a two-node cycle (`a → b → a`).
    pub const fn is_mutual(&self) -> bool {
        self.path.len() == 2
    }

    /// The edges of the cycle, including the closing edge back to the first
    /// node.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.path
            .iter()
            .zip(self.path.iter().cycle().skip(1))
            .take(self.path.len())
    }

    /// Consume the cycle, returning the path.
    pub fn into_vec(self) -> Vec<N> {
        self.path
    }
}

impl<N: fmt::Display> fmt::Display for Cycle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path.as_slice() {
            [] => write!(f, "empty cycle"),
            [only] => write!(f, "cycle detected: self-loop on '{only}' (artifact depends on itself)"),
            [a, b] => write!(f, "cycle detected: mutual dependency between '{a}' and '{b}'"),
            [first, ..] => {
                write!(f, "cycle detected ({} artifacts): ", self.path.len())?;
                for node in &self.path {
                    write!(f, "{node} → ")?;
                }
                write!(f, "{first}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Core detection
// ---------------------------------------------------------------------------

/// Find one cycle in `graph`, or `None` if the graph is acyclic.
///
/// The search starts from every key in order and returns the first cycle
/// found. See the module documentation for the traversal rules.
///
/// # Complexity
///
/// O(V+E): settled nodes are never expanded twice.
pub fn find_cycle<N: Ord + Clone>(graph: &Graph<N>) -> Option<Cycle<N>> {
    let mut settled: BTreeSet<N> = BTreeSet::new();

    for start in graph.keys() {
        if settled.contains(start) {
            continue;
        }
        trace!(settled = settled.len(), "cycle search from new start node");

        if let Some(path) = search_from(graph, start, &mut settled) {
            debug!(len = path.len(), "dependency cycle found");
            return Some(Cycle { path });
        }
    }

    debug!(nodes = graph.len(), "no dependency cycles");
    None
}

/// Returns `true` if `graph` has no cycles.
pub fn is_acyclic<N: Ord + Clone>(graph: &Graph<N>) -> bool {
    find_cycle(graph).is_none()
}

// ---------------------------------------------------------------------------
// DFS internals
// ---------------------------------------------------------------------------

/// Successor iterator of one stack frame. Missing records iterate nothing.
type Successors<'g, N> = Flatten<std::option::IntoIter<&'g BTreeSet<N>>>;

fn successors<'g, N: Ord + Clone>(graph: &'g Graph<N>, node: &N) -> Successors<'g, N> {
    graph.neighbours_ref(node).into_iter().flatten()
}

/// Depth-first search from `start` with an explicit stack.
///
/// `path` mirrors the frames on `stack`; `on_path` is the same set for O(log n)
/// membership checks. Returns the cycle path on the first back edge.
fn search_from<N: Ord + Clone>(
    graph: &Graph<N>,
    start: &N,
    settled: &mut BTreeSet<N>,
) -> Option<Vec<N>> {
    let mut path: Vec<N> = vec![start.clone()];
    let mut on_path: BTreeSet<N> = BTreeSet::from([start.clone()]);
    let mut stack: Vec<Successors<'_, N>> = vec![successors(graph, start)];

    loop {
        let step = stack.last_mut().map(Iterator::next);
        match step {
            // Stack exhausted: nothing reachable from `start` closes a cycle.
            None => return None,
            Some(Some(next)) => {
                if on_path.contains(next) {
                    let entry = path.iter().position(|node| node == next)?;
                    return Some(path.split_off(entry));
                }
                if settled.contains(next) {
                    continue;
                }
                path.push(next.clone());
                on_path.insert(next.clone());
                stack.push(successors(graph, next));
            }
            Some(None) => {
                stack.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(&done);
                    settled.insert(done);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&'static str]) -> BTreeSet<&'static str> {
        items.iter().copied().collect()
    }

    fn graph(pairs: &[(&'static str, &[&'static str])]) -> Graph<&'static str> {
        pairs.iter().map(|(n, succ)| (*n, set(succ))).collect()
    }

    fn assert_sound(g: &Graph<&'static str>, cycle: &Cycle<&'static str>) {
        for (from, to) in cycle.edges() {
            assert!(
                g.neighbours(from).contains(to),
                "missing edge {from} -> {to} in cycle {cycle}"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Cycle display and properties
    // -----------------------------------------------------------------------

    #[test]
    fn cycle_self_loop_display() {
        let c = Cycle { path: vec!["A"] };
        assert!(c.is_self_loop());
        assert!(!c.is_mutual());
        assert_eq!(c.len(), 1);
        let display = c.to_string();
        assert!(display.contains("self-loop"), "display: {display}");
        assert!(display.contains('A'), "display: {display}");
    }

    #[test]
    fn cycle_mutual_display() {
        let c = Cycle { path: vec!["A", "B"] };
        assert!(!c.is_self_loop());
        assert!(c.is_mutual());
        let display = c.to_string();
        assert!(display.contains("mutual dependency"), "display: {display}");
    }

    #[test]
    fn cycle_large_display() {
        let c = Cycle {
            path: vec!["A", "B", "C", "D"],
        };
        assert_eq!(c.len(), 4);
        let display = c.to_string();
        assert!(display.contains("4 artifacts"), "display: {display}");
        assert!(display.contains("A → B → C → D → A"), "display: {display}");
    }

    #[test]
    fn cycle_edges_include_closing_edge() {
        let c = Cycle {
            path: vec!["A", "B", "C"],
        };
        let edges: Vec<_> = c.edges().map(|(f, t)| (*f, *t)).collect();
        assert_eq!(edges, vec![("A", "B"), ("B", "C"), ("C", "A")]);

        let single = Cycle { path: vec!["A"] };
        let edges: Vec<_> = single.edges().map(|(f, t)| (*f, *t)).collect();
        assert_eq!(edges, vec![("A", "A")]);
    }

    // -----------------------------------------------------------------------
    // find_cycle
    // -----------------------------------------------------------------------

    #[test]
    fn empty_graph_is_acyclic() {
        let g: Graph<&str> = Graph::new();
        assert!(find_cycle(&g).is_none());
        assert!(is_acyclic(&g));
    }

    #[test]
    fn chain_is_acyclic() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert!(find_cycle(&g).is_none());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let g = graph(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        assert!(find_cycle(&g).is_none());
    }

    #[test]
    fn two_node_cycle_found_in_adjacent_order() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        let cycle = find_cycle(&g).expect("cycle");
        assert_eq!(cycle.nodes(), &["a", "b"]);
        assert_sound(&g, &cycle);
    }

    #[test]
    fn self_loop_found() {
        let g = graph(&[("a", &["a"])]);
        let cycle = find_cycle(&g).expect("cycle");
        assert_eq!(cycle.into_vec(), vec!["a"]);
    }

    #[test]
    fn cycle_path_starts_at_reentry_point() {
        // a → b → c → d → b: the cycle is b, c, d; a is only the lead-in.
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &["d"]), ("d", &["b"])]);
        let cycle = find_cycle(&g).expect("cycle");
        assert_eq!(cycle.nodes(), &["b", "c", "d"]);
        assert_sound(&g, &cycle);
    }

    #[test]
    fn cycle_unreachable_from_first_key_is_found() {
        // "a" reaches nothing cyclic; the x ↔ y cycle is only reachable from x/y.
        let g = graph(&[("a", &["b"]), ("b", &[]), ("x", &["y"]), ("y", &["x"])]);
        let cycle = find_cycle(&g).expect("cycle");
        assert_eq!(cycle.nodes(), &["x", "y"]);
    }

    #[test]
    fn cycle_behind_settled_subgraph_is_found() {
        // The search from "a" settles "c"; the cycle d ↔ e hangs off "b".
        let g = graph(&[
            ("a", &["c"]),
            ("b", &["c", "d"]),
            ("c", &[]),
            ("d", &["e"]),
            ("e", &["d"]),
        ]);
        let cycle = find_cycle(&g).expect("cycle");
        assert_eq!(cycle.nodes(), &["d", "e"]);
        assert_sound(&g, &cycle);
    }

    #[test]
    fn first_cycle_in_neighbour_order_wins() {
        // a → {b, c}; both b and c close a cycle back to a. b comes first.
        let g = graph(&[("a", &["b", "c"]), ("b", &["a"]), ("c", &["a"])]);
        let cycle = find_cycle(&g).expect("cycle");
        assert_eq!(cycle.nodes(), &["a", "b"]);
    }

    #[test]
    fn dangling_targets_do_not_create_cycles() {
        let g = graph(&[("a", &["ghost"]), ("b", &["a", "ghost"])]);
        assert!(find_cycle(&g).is_none());
    }

    #[test]
    fn long_chain_does_not_overflow_the_stack() {
        let n = 200_000_u32;
        let g: Graph<u32> = (0..n)
            .map(|i| (i, BTreeSet::from([i + 1])))
            .collect();
        assert!(find_cycle(&g).is_none());

        let closed: Graph<u32> = (0..n)
            .map(|i| (i, BTreeSet::from([(i + 1) % n])))
            .collect();
        let cycle = find_cycle(&closed).expect("cycle");
        assert_eq!(cycle.len(), n as usize);
    }
}
