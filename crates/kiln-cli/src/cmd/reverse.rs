//! `kiln reverse`: the graph with every edge flipped.

use std::collections::{BTreeMap, BTreeSet};

use clap::Args;
use kiln_core::graph::reverse;

use super::Session;
use crate::output::render;

/// Arguments for `kiln reverse`.
#[derive(Args, Debug, Default)]
pub struct ReverseArgs {}

/// Execute `kiln reverse`.
///
/// Prints `dependency: dependent…` per line. Artifacts nothing depends on do
/// not appear.
pub fn run_reverse(_args: &ReverseArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let reversed: BTreeMap<String, BTreeSet<String>> =
        reverse(&project.graph).to_pairs().into_iter().collect();

    render(session.output, &reversed, |pairs, w| {
        for (dependency, dependents) in pairs {
            let list: Vec<&str> = dependents.iter().map(String::as_str).collect();
            writeln!(w, "{dependency}: {}", list.join(" "))?;
        }
        Ok(())
    })
}
