//! Subcommand handlers and the state they share.

pub mod check;
pub mod completions;
pub mod dependents;
pub mod deps;
pub mod dot;
pub mod hash;
pub mod plan;
pub mod reverse;
pub mod show;

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;

use kiln_core::KilnError;
use kiln_core::config::EffectiveConfig;
use kiln_core::graph::Graph;
use kiln_core::manifest::Manifest;
use tracing::instrument;

use crate::output::{CliError, OutputMode, pretty_section, render_error};

/// Per-invocation settings resolved from flags and config files.
#[derive(Debug)]
pub struct Session {
    pub project_root: PathBuf,
    pub manifest_override: Option<PathBuf>,
    pub config: EffectiveConfig,
    pub output: OutputMode,
    pub quiet: bool,
}

impl Session {
    /// The manifest to load: `--manifest` if given, else the configured path.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_override.as_ref().map_or_else(
            || self.config.project.manifest_path(&self.project_root),
            |path| self.project_root.join(path),
        )
    }

    /// Load the manifest and build its graph, reporting failures.
    pub fn project(&self) -> anyhow::Result<Project> {
        match Manifest::load(&self.manifest_path()) {
            Ok(manifest) => Ok(Project::from_manifest(manifest)),
            Err(err) => self.fail(err),
        }
    }

    /// The named artifacts as a set, failing on the first unknown name.
    pub fn known(&self, project: &Project, names: &[String]) -> anyhow::Result<BTreeSet<String>> {
        match project.first_unknown(names) {
            Some(name) => self.fail(KilnError::UnknownArtifact(name.to_string())),
            None => Ok(names.iter().cloned().collect()),
        }
    }

    /// Render `err` in the session's output mode and return it.
    pub fn fail<T>(&self, err: KilnError) -> anyhow::Result<T> {
        render_error(self.output, &CliError::from(&err))?;
        Err(err.into())
    }
}

/// A loaded manifest together with its dependency graph.
#[derive(Debug)]
pub struct Project {
    pub manifest: Manifest,
    pub graph: Graph<String>,
}

impl Project {
    #[instrument(skip(manifest), fields(artifacts = manifest.artifacts.len()))]
    fn from_manifest(manifest: Manifest) -> Self {
        let graph = manifest.graph();
        Self { manifest, graph }
    }

    /// The first name the manifest neither declares nor references as a
    /// dependency.
    pub fn first_unknown<'a>(&self, names: &'a [String]) -> Option<&'a str> {
        names
            .iter()
            .map(String::as_str)
            .find(|name| !self.manifest.knows(name))
    }
}

/// One name per line.
pub fn write_names<'a>(
    w: &mut dyn Write,
    names: impl IntoIterator<Item = &'a String>,
) -> io::Result<()> {
    for name in names {
        writeln!(w, "{name}")?;
    }
    Ok(())
}

/// Headed bullet list, or a placeholder line when empty.
pub fn write_name_section(
    w: &mut dyn Write,
    heading: &str,
    names: &BTreeSet<String>,
) -> io::Result<()> {
    pretty_section(w, &format!("{heading} ({})", names.len()))?;
    if names.is_empty() {
        writeln!(w, "  (none)")?;
    }
    for name in names {
        writeln!(w, "  - {name}")?;
    }
    Ok(())
}
