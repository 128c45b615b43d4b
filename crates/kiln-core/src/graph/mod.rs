//! Directed dependency graph and the algorithms a build pipeline runs on it.
//!
//! ## Submodules
//!
//! - [`store`]: the immutable [`Graph`] value (construction, membership,
//!   neighbour lookup, union).
//! - [`algo`]: [`reverse`] and [`reachable_nodes`].
//! - [`cycles`]: [`find_cycle`] and the [`Cycle`] path type.
//! - [`dot`]: Graphviz rendering for inspection.
//!
//! ## Edge direction
//!
//! The graph itself is direction-agnostic. For build artifacts, kiln records
//! `artifact → dependency`: reachability over the graph yields transitive
//! dependencies, reachability over [`reverse`] yields everything that must be
//! rebuilt when an artifact changes.
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use kiln_core::graph::{Graph, find_cycle, reachable_nodes};
//!
//! let g: Graph<&str> = [
//!     ("a", BTreeSet::from(["b"])),
//!     ("b", BTreeSet::from(["c"])),
//!     ("c", BTreeSet::new()),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert!(find_cycle(&g).is_none());
//! assert_eq!(reachable_nodes(&BTreeSet::from(["a"]), &g), BTreeSet::from(["b", "c"]));
//! ```

pub mod algo;
pub mod cycles;
pub mod dot;
pub mod store;

// Re-export primary types at module level for convenience.
pub use algo::{reachable_nodes, reverse};
pub use cycles::{Cycle, find_cycle, is_acyclic};
pub use dot::{to_dot, write_dot};
pub use store::{Graph, Node};
