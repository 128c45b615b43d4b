//! `kiln check`: fail if the dependency graph contains a cycle.


use clap::Args;
use kiln_core::KilnError;
use kiln_core::graph::Cycle;
use kiln_core::plan::validate;
use serde::Serialize;

use super::Session;
use crate::output::render;

/// Arguments for `kiln check`.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {}

#[derive(Debug, Serialize)]
struct CheckOutput {
    acyclic: bool,
    artifacts: usize,
    edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cycle: Option<Cycle<String>>,
}

/// Execute `kiln check`.
///
/// A cycle is an error unless `cycles.fail_on_cycle` is disabled, in which
/// case it is reported and the command succeeds.
pub fn run_check(_args: &CheckArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let graph = &project.graph;

    let cycle = match validate(graph) {
        Ok(()) => None,
        Err(KilnError::CycleDetected { cycle }) => {
            if session.config.project.cycles.fail_on_cycle {
                return session.fail(KilnError::CycleDetected { cycle });
            }
            Some(cycle)
        }
        Err(other) => return session.fail(other),
    };

    let payload = CheckOutput {
        acyclic: cycle.is_none(),
        artifacts: graph.len(),
        edges: graph.edge_count(),
        cycle,
    };

    if session.quiet && payload.acyclic && !session.output.is_json() {
        return Ok(());
    }

    render(session.output, &payload, |report, w| match &report.cycle {
        Some(cycle) => writeln!(w, "warning: {cycle}"),
        None => writeln!(
            w,
            "no dependency cycles ({} artifacts, {} edges)",
            report.artifacts, report.edges
        ),
    })
}
