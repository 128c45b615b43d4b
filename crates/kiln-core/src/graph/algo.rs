//! Reversal and reachability over a [`Graph`].
//!
//! # Reachability and seeds
//!
//! [`reachable_nodes`] returns the nodes reachable from the seed set by
//! following **one or more** edges. A seed is part of the result only when
//! some edge leads back to it (it sits on a cycle, or another seed or
//! reachable node points to it). Callers that want "seeds plus everything
//! downstream" add the seeds themselves, as [`crate::plan::RebuildPlan`] does.

use std::collections::BTreeSet;

use tracing::trace;

use super::store::Graph;

/// Flip the direction of every edge.
///
/// Built as the union of one single-edge graph `v → {u}` per original edge
/// `u → v`, so successor sets of a shared target are merged rather than
/// overwritten.
///
/// Only nodes with at least one incoming edge in `graph` become keys of the
/// result. Nodes without incoming edges (including isolated keys) are
/// dropped: the edge set is preserved, the node set is not.
#[must_use]
pub fn reverse<N: Ord + Clone>(graph: &Graph<N>) -> Graph<N> {
    Graph::unions(
        graph
            .edges()
            .map(|(from, to)| Graph::from_pairs([(to.clone(), BTreeSet::from([from.clone()]))])),
    )
}

/// All nodes reachable from `seeds` through at least one edge.
///
/// Breadth-first fixed point:
///
/// 1. `frontier` starts as the union of the seeds' successors.
/// 2. Each round adds `frontier` to `visited`, then replaces `frontier` with
///    the successors of the current frontier that are not yet visited.
/// 3. Stops when the frontier is empty.
///
/// Terminates because every round adds at least one new node to `visited`
/// and the node universe (keys plus edge targets) is finite.
#[must_use]
pub fn reachable_nodes<N: Ord + Clone>(seeds: &BTreeSet<N>, graph: &Graph<N>) -> BTreeSet<N> {
    let mut visited: BTreeSet<N> = BTreeSet::new();
    let mut frontier = successors_of(seeds, graph);
    let mut round = 0_usize;

    while !frontier.is_empty() {
        round += 1;
        trace!(round, frontier = frontier.len(), visited = visited.len(), "reachability round");

        visited.extend(frontier.iter().cloned());
        frontier = successors_of(&frontier, graph)
            .into_iter()
            .filter(|node| !visited.contains(node))
            .collect();
    }

    visited
}

/// Union of the direct successors of every node in `nodes`.
fn successors_of<N: Ord + Clone>(nodes: &BTreeSet<N>, graph: &Graph<N>) -> BTreeSet<N> {
    nodes
        .iter()
        .filter_map(|node| graph.neighbours_ref(node))
        .flatten()
        .cloned()
        .collect()
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

    // -----------------------------------------------------------------------
    // reverse
    // -----------------------------------------------------------------------

    #[test]
    fn reverse_single_edge_drops_source_key() {
        let g = graph(&[("a", &["b"])]);
        let r = reverse(&g);
        assert_eq!(r.to_pairs(), vec![("b", set(&["a"]))]);
        assert!(!r.contains(&"a"));
    }

    #[test]
    fn reverse_merges_edges_into_shared_target() {
        // a → c, b → c  ⇒  c → {a, b}
        let g = graph(&[("a", &["c"]), ("b", &["c"])]);
        let r = reverse(&g);
        assert_eq!(r.to_pairs(), vec![("c", set(&["a", "b"]))]);
    }

    #[test]
    fn reverse_drops_isolated_nodes() {
        let g = graph(&[("lonely", &[]), ("a", &["b"])]);
        let r = reverse(&g);
        assert!(!r.contains(&"lonely"));
        assert_eq!(r.edge_count(), 1);
    }

    #[test]
    fn reverse_keeps_self_loops() {
        let g = graph(&[("a", &["a"])]);
        assert_eq!(reverse(&g).to_pairs(), vec![("a", set(&["a"]))]);
    }

    #[test]
    fn reverse_of_empty_graph_is_empty() {
        let g: Graph<u8> = Graph::new();
        assert!(reverse(&g).is_empty());
    }

    // -----------------------------------------------------------------------
    // reachable_nodes
    // -----------------------------------------------------------------------

    #[test]
    fn reachable_chain_excludes_seed() {
        let g = graph(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
        assert_eq!(reachable_nodes(&set(&["a"]), &g), set(&["b", "c"]));
    }

    #[test]
    fn reachable_includes_seed_on_cycle() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        assert_eq!(reachable_nodes(&set(&["a"]), &g), set(&["a", "b"]));
    }

    #[test]
    fn reachable_includes_seed_pointed_to_by_other_seed() {
        let g = graph(&[("a", &["b"]), ("b", &[])]);
        assert_eq!(reachable_nodes(&set(&["a", "b"]), &g), set(&["b"]));
    }

    #[test]
    fn reachable_self_loop_seed_is_included() {
        let g = graph(&[("a", &["a"])]);
        assert_eq!(reachable_nodes(&set(&["a"]), &g), set(&["a"]));
    }

    #[test]
    fn reachable_follows_dangling_targets() {
        // "c" is never a key; it is still reachable.
        let g = graph(&[("a", &["b"]), ("b", &["c"])]);
        assert_eq!(reachable_nodes(&set(&["a"]), &g), set(&["b", "c"]));
    }

    #[test]
    fn reachable_from_unknown_seed_is_empty() {
        let g = graph(&[("a", &["b"])]);
        assert!(reachable_nodes(&set(&["nope"]), &g).is_empty());
    }

    #[test]
    fn reachable_from_empty_seed_set_is_empty() {
        let g = graph(&[("a", &["b"])]);
        assert!(reachable_nodes(&BTreeSet::new(), &g).is_empty());
    }

    #[test]
    fn reachable_diamond_visits_each_node_once() {
        //   a
        //  / \
        // b   c
        //  \ /
        //   d
        let g = graph(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        assert_eq!(reachable_nodes(&set(&["a"]), &g), set(&["b", "c", "d"]));
    }
}
