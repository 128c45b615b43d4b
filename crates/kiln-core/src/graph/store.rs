//! Immutable, set-based directed graph store.
//!
//! # Overview
//!
//! A [`Graph`] maps every recorded node to a [`Node`] record holding the
//! node's identity and the set of nodes it points to directly. For build
//! artifacts an edge `A → B` means "A depends on B".
//!
//! # Semantics
//!
//! - **Dangling edges are valid.** A successor does not have to be a key.
//!   [`Graph::neighbours`] on an unrecorded node is the empty set, so every
//!   node behaves as if it were present with no outgoing edges.
//! - **Cycles are allowed.** The store never validates acyclicity; use
//!   [`crate::graph::find_cycle`].
//! - **Value semantics.** There is no mutation API. Every operation takes
//!   `&self` and derived graphs are fresh values, so a caller holding an
//!   earlier snapshot never observes a change.
//! - **Deterministic order.** Keys and successor sets are ordered
//!   (`BTreeMap`/`BTreeSet`), so iteration and every algorithm built on top
//!   of the store are deterministic for a given node type.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A node record: its own identity plus its direct successors.
///
/// `tag` duplicates the map key the record is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node<N> {
    /// The node's identity.
    pub tag: N,
    /// Nodes this node points to directly.
    pub neighbours: BTreeSet<N>,
}

impl<N: Ord> Node<N> {
    /// Create a node record with the given successors.
    pub const fn new(tag: N, neighbours: BTreeSet<N>) -> Self {
        Self { tag, neighbours }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A directed graph keyed by node identity.
///
/// Constructed once from `(node, successors)` pairs, then queried. Derived
/// graphs ([`Graph::union`], [`crate::graph::reverse`]) are new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Graph<N> {
    nodes: BTreeMap<N, Node<N>>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }
}

impl<N: Ord + Clone> Graph<N> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(node, successors)` pairs.
    ///
    /// No acyclicity check is performed. When a node appears more than once
    /// the last occurrence wins; earlier successor sets for that key are
    /// discarded, not merged.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, BTreeSet<N>)>,
    {
        let nodes = pairs
            .into_iter()
            .map(|(tag, neighbours)| (tag.clone(), Node::new(tag, neighbours)))
            .collect();
        Self { nodes }
    }

    /// Deconstruct into `(node, successors)` pairs in key order.
    pub fn to_pairs(&self) -> Vec<(N, BTreeSet<N>)> {
        self.nodes
            .values()
            .map(|node| (node.tag.clone(), node.neighbours.clone()))
            .collect()
    }

    /// Returns `true` if `node` is recorded as a key.
    ///
    /// Nodes that only appear as the target of an edge are not keys.
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains_key(node)
    }

    /// All recorded keys.
    pub fn nodes(&self) -> BTreeSet<N> {
        self.nodes.keys().cloned().collect()
    }

    /// Iterate the recorded keys in order without cloning.
    pub fn keys(&self) -> impl Iterator<Item = &N> {
        self.nodes.keys()
    }

    /// Look up the record for `node`.
    pub fn get(&self, node: &N) -> Option<&Node<N>> {
        self.nodes.get(node)
    }

    /// Direct successors of `node`; the empty set when `node` is absent.
    pub fn neighbours(&self, node: &N) -> BTreeSet<N> {
        self.neighbours_ref(node).cloned().unwrap_or_default()
    }

    /// Borrowing variant of [`Graph::neighbours`]. `None` means "no record",
    /// which callers treat exactly like an empty successor set.
    pub fn neighbours_ref(&self, node: &N) -> Option<&BTreeSet<N>> {
        self.nodes.get(node).map(|record| &record.neighbours)
    }

    /// Merge two graphs. Successor sets of keys present in both are unioned,
    /// never overwritten.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.absorb(other.clone());
        merged
    }

    /// Merge any number of graphs with the same per-key union as
    /// [`Graph::union`].
    pub fn unions<I>(graphs: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        graphs.into_iter().fold(Self::new(), |mut acc, graph| {
            acc.absorb(graph);
            acc
        })
    }

    /// In-place union used by the public merge operations. Never exposed:
    /// graphs stay immutable from a caller's point of view.
    fn absorb(&mut self, other: Self) {
        for (tag, record) in other.nodes {
            match self.nodes.get_mut(&tag) {
                Some(existing) => existing.neighbours.extend(record.neighbours),
                None => {
                    self.nodes.insert(tag, record);
                }
            }
        }
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node is recorded.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges (sum of successor set sizes).
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.neighbours.len()).sum()
    }

    /// Iterate every edge `(from, to)` in key, then successor, order.
    pub fn edges(&self) -> impl Iterator<Item = (&N, &N)> {
        self.nodes
            .values()
            .flat_map(|node| node.neighbours.iter().map(move |to| (&node.tag, to)))
    }
}

impl<N: Ord + Clone + fmt::Display> Graph<N> {
    /// BLAKE3 content hash of the graph, formatted as `blake3:<hex>`.
    ///
    /// Covers every key and its successor set, so it changes when an edge is
    /// added or removed and when a node without edges is recorded or dropped.
    /// Build pipelines compare it against a stored value to decide whether
    /// the dependency graph must be re-validated.
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for node in self.nodes.values() {
            hasher.update(node.tag.to_string().as_bytes());
            hasher.update(b"\x00");
            for to in &node.neighbours {
                hasher.update(b"\x01");
                hasher.update(to.to_string().as_bytes());
            }
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }
}

impl<N: Ord + Clone> FromIterator<(N, BTreeSet<N>)> for Graph<N> {
    fn from_iter<I: IntoIterator<Item = (N, BTreeSet<N>)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
