//! Validation and rebuild planning on top of the dependency graph.
//!
//! This is where graph results become pipeline decisions: a found cycle is
//! escalated to [`KilnError::CycleDetected`], and reachability over the
//! reversed graph becomes the set of artifacts to rebuild.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::error::KilnError;
use crate::graph::{Graph, find_cycle, reachable_nodes, reverse};

/// Fail if the dependency graph contains a cycle.
///
/// # Errors
///
/// Returns [`KilnError::CycleDetected`] with the first cycle found.
#[instrument(skip(graph), fields(nodes = graph.len(), edges = graph.edge_count()))]
pub fn validate(graph: &Graph<String>) -> Result<(), KilnError> {
    find_cycle(graph).map_or(Ok(()), |cycle| {
        warn!(len = cycle.len(), "dependency graph is cyclic");
        Err(KilnError::CycleDetected { cycle })
    })
}

/// Every artifact that transitively depends on one of `changed`.
///
/// A changed artifact is only listed if something it depends on was also
/// changed, or it sits on a cycle.
#[must_use]
pub fn dependents(graph: &Graph<String>, changed: &BTreeSet<String>) -> BTreeSet<String> {
    reachable_nodes(changed, &reverse(graph))
}

/// Transitive dependencies of `artifacts`.
#[must_use]
pub fn dependencies(graph: &Graph<String>, artifacts: &BTreeSet<String>) -> BTreeSet<String> {
    reachable_nodes(artifacts, graph)
}

/// What to rebuild after a set of artifacts changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildPlan {
    /// The artifacts reported as changed.
    pub changed: BTreeSet<String>,
    /// Artifacts that depend on a changed artifact, directly or not.
    pub dependents: BTreeSet<String>,
    /// `changed ∪ dependents`.
    pub rebuild: BTreeSet<String>,
}

impl RebuildPlan {
    /// Compute the plan. Reachability does not include the seeds, so the
    /// changed artifacts are added back explicitly.
    #[instrument(skip(graph, changed), fields(changed = changed.len()))]
    pub fn compute(graph: &Graph<String>, changed: &BTreeSet<String>) -> Self {
        let dependents = dependents(graph, changed);
        let rebuild: BTreeSet<String> = changed.union(&dependents).cloned().collect();
        info!(
            dependents = dependents.len(),
            rebuild = rebuild.len(),
            "rebuild plan computed"
        );

        Self {
            changed: changed.clone(),
            dependents,
            rebuild,
        }
    }

    /// Returns `true` if nothing needs rebuilding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rebuild.is_empty()
    }
}
