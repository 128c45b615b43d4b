//! `kiln hash`: fingerprint of the dependency graph.


use clap::Args;
use serde::Serialize;

use super::Session;
use crate::output::{OutputMode, pretty_kv, render};

/// Arguments for `kiln hash`.
#[derive(Args, Debug, Default)]
pub struct HashArgs {}

#[derive(Debug, Serialize)]
struct HashOutput {
    hash: String,
    artifacts: usize,
    edges: usize,
}

/// Execute `kiln hash`.
///
/// The hash covers artifact names and edges only; metadata changes do not
/// alter it.
pub fn run_hash(_args: &HashArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let payload = HashOutput {
        hash: project.graph.content_hash(),
        artifacts: project.graph.len(),
        edges: project.graph.edge_count(),
    };

    let pretty = session.output == OutputMode::Pretty;
    render(session.output, &payload, |p, w| {
        if pretty {
            pretty_kv(w, "hash", &p.hash)?;
            pretty_kv(w, "artifacts", p.artifacts.to_string())?;
            pretty_kv(w, "edges", p.edges.to_string())
        } else {
            writeln!(w, "{}", p.hash)
        }
    })
}
