//! `kiln plan`: what to rebuild after some artifacts changed.


use clap::Args;
use kiln_core::plan::RebuildPlan;

use super::{Session, write_name_section, write_names};
use crate::output::{pretty_kv, render_mode};

/// Arguments for `kiln plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Artifacts or sources that changed.
    #[arg(required = true)]
    pub changed: Vec<String>,
}

/// Execute `kiln plan`.
pub fn run_plan(args: &PlanArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let changed = session.known(&project, &args.changed)?;

    let plan = RebuildPlan::compute(&project.graph, &changed);

    render_mode(
        session.output,
        &plan,
        |p, w| write_names(w, &p.rebuild),
        |p, w| {
            pretty_kv(w, "changed", join(&p.changed))?;
            pretty_kv(w, "dependents", p.dependents.len().to_string())?;
            writeln!(w)?;
            write_name_section(w, "Rebuild", &p.rebuild)
        },
    )
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
