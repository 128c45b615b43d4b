//! `kiln show`: one artifact's direct edges and metadata.

use std::collections::BTreeSet;

use clap::Args;
use kiln_core::graph::reverse;
use kiln_core::{KilnError, Metadata};
use serde::Serialize;

use super::Session;
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `kiln show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Artifact to show.
    pub artifact: String,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    artifact: String,
    /// `false` for sources that are only referenced as a dependency.
    declared: bool,
    depends_on: BTreeSet<String>,
    dependents: BTreeSet<String>,
    metadata: Metadata,
}

/// Execute `kiln show`.
pub fn run_show(args: &ShowArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let name = &args.artifact;
    if !project.manifest.knows(name) {
        return session.fail(KilnError::UnknownArtifact(name.clone()));
    }

    let resource = project.manifest.resource(name);
    let payload = ShowOutput {
        artifact: name.clone(),
        declared: resource.is_some(),
        depends_on: project.graph.neighbours(name),
        dependents: reverse(&project.graph).neighbours(name),
        metadata: resource.map(|r| r.metadata().clone()).unwrap_or_default(),
    };

    let pretty = session.output == OutputMode::Pretty;
    render(session.output, &payload, |p, w| {
        if pretty {
            pretty_section(w, &p.artifact)?;
        } else {
            pretty_kv(w, "artifact", &p.artifact)?;
        }
        pretty_kv(w, "declared", if p.declared { "yes" } else { "no" })?;
        pretty_kv(w, "depends on", list(&p.depends_on))?;
        pretty_kv(w, "dependents", list(&p.dependents))?;
        for (key, value) in &p.metadata {
            writeln!(w, "  {key} = {value}")?;
        }
        Ok(())
    })
}

fn list(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        return "-".to_string();
    }
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
