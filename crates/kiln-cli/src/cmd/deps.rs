//! `kiln deps`: transitive dependencies of one or more artifacts.

use std::collections::BTreeSet;

use clap::Args;
use kiln_core::plan::dependencies;
use serde::Serialize;

use super::{Session, write_name_section, write_names};
use crate::output::render_mode;

/// Arguments for `kiln deps`.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Artifacts whose dependencies to list.
    #[arg(required = true)]
    pub artifacts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DepsOutput {
    artifacts: BTreeSet<String>,
    dependencies: BTreeSet<String>,
}

/// Execute `kiln deps`.
///
/// The listed artifacts themselves are only included when one of them is
/// reached again through an edge.
pub fn run_deps(args: &DepsArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let artifacts = session.known(&project, &args.artifacts)?;

    let payload = DepsOutput {
        dependencies: dependencies(&project.graph, &artifacts),
        artifacts,
    };

    render_mode(
        session.output,
        &payload,
        |p, w| write_names(w, &p.dependencies),
        |p, w| write_name_section(w, "Dependencies", &p.dependencies),
    )
}
