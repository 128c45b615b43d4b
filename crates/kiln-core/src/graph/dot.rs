//! Graphviz DOT rendering of a dependency graph.
//!
//! Every recorded key becomes a node statement and every edge an edge
//! statement, both in key/successor order so the output is stable across
//! runs. Dangling targets appear only through their edges.

use std::io::{self, Write};

use super::store::Graph;

/// Render `graph` as a DOT document, labelling nodes with `label`.
#[must_use]
pub fn to_dot<N, F>(graph: &Graph<N>, label: F) -> String
where
    N: Ord + Clone,
    F: Fn(&N) -> String,
{
    dot_lines(graph, &label).fold(String::new(), |mut out, line| {
        out.push_str(&line);
        out.push('\n');
        out
    })
}

/// Stream the DOT rendering of `graph` to `w`.
///
/// # Errors
///
/// Returns any I/O error raised by `w`.
pub fn write_dot<N, F, W>(w: &mut W, graph: &Graph<N>, label: F) -> io::Result<()>
where
    N: Ord + Clone,
    F: Fn(&N) -> String,
    W: Write + ?Sized,
{
    for line in dot_lines(graph, &label) {
        writeln!(w, "{line}")?;
    }
    Ok(())
}

/// The document one line at a time, without line terminators.
fn dot_lines<'g, N, F>(graph: &'g Graph<N>, label: &'g F) -> impl Iterator<Item = String> + 'g
where
    N: Ord + Clone,
    F: Fn(&N) -> String,
{
    let nodes = graph
        .keys()
        .map(move |node| format!("    \"{}\";", escape(&label(node))));
    let edges = graph.edges().map(move |(from, to)| {
        format!(
            "    \"{}\" -> \"{}\";",
            escape(&label(from)),
            escape(&label(to))
        )
    });

    std::iter::once("digraph dependencies {".to_string())
        .chain(nodes)
        .chain(edges)
        .chain(std::iter::once("}".to_string()))
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
