//! `kiln dependents`: everything that transitively depends on an artifact.

use std::collections::BTreeSet;

use clap::Args;
use kiln_core::plan::dependents;
use serde::Serialize;

use super::{Session, write_name_section, write_names};
use crate::output::render_mode;

/// Arguments for `kiln dependents`.
#[derive(Args, Debug)]
pub struct DependentsArgs {
    /// Artifacts whose dependents to list.
    #[arg(required = true)]
    pub artifacts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DependentsOutput {
    artifacts: BTreeSet<String>,
    dependents: BTreeSet<String>,
}

/// Execute `kiln dependents`.
pub fn run_dependents(args: &DependentsArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let artifacts = session.known(&project, &args.artifacts)?;

    let payload = DependentsOutput {
        dependents: dependents(&project.graph, &artifacts),
        artifacts,
    };

    render_mode(
        session.output,
        &payload,
        |p, w| write_names(w, &p.dependents),
        |p, w| write_name_section(w, "Dependents", &p.dependents),
    )
}
