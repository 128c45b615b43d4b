//! `kiln dot`: Graphviz export of the dependency graph.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use kiln_core::KilnError;
use kiln_core::graph::{Graph, write_dot};
use serde::Serialize;

use super::Session;
use crate::output::render;

/// Arguments for `kiln dot`.
#[derive(Args, Debug, Default)]
pub struct DotArgs {
    /// Write the DOT document to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DotOutput {
    path: PathBuf,
    nodes: usize,
    edges: usize,
}

/// Execute `kiln dot`.
///
/// Without `--output` the DOT text goes to stdout in every output mode.
pub fn run_dot(args: &DotArgs, session: &Session) -> anyhow::Result<()> {
    let project = session.project()?;
    let graph = &project.graph;

    let Some(path) = &args.output else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_dot(&mut out, graph, String::clone)?;
        return Ok(());
    };

    if let Err(err) = write_file(path, graph) {
        return session.fail(KilnError::Io(err));
    }
    if session.quiet {
        return Ok(());
    }

    let payload = DotOutput {
        path: path.clone(),
        nodes: graph.len(),
        edges: graph.edge_count(),
    };
    render(session.output, &payload, |p, w| {
        writeln!(
            w,
            "wrote {} artifacts and {} edges to {}",
            p.nodes,
            p.edges,
            p.path.display()
        )
    })
}

fn write_file(path: &Path, graph: &Graph<String>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_dot(&mut out, graph, String::clone)?;
    out.flush()
}
