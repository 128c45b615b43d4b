//! Build manifest: the declared artifacts, their dependencies, and metadata.
//!
//! # Format
//!
//! ```toml
//! [artifacts."site/index.html"]
//! depends_on = ["templates/page.html", "content/index.md"]
//!
//! [artifacts."site/index.html".metadata]
//! title = "Home"
//! ```
//!
//! # Edge Direction
//!
//! [`Manifest::graph`] records `artifact → dependency`. A dependency that is
//! not itself declared under `[artifacts]` (a source file, say) is a dangling
//! target: it has no record in the graph and no outgoing edges.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::KilnError;
use crate::graph::Graph;
use crate::metadata::{Metadata, Resource};

/// One declared artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactSpec {
    /// Artifacts or sources this artifact is built from.
    #[serde(default)]
    pub depends_on: BTreeSet<String>,
    /// Free-form annotations.
    #[serde(default)]
    pub metadata: Metadata,
}

/// A parsed build manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub artifacts: BTreeMap<String, ArtifactSpec>,
}

impl Manifest {
    /// Parse manifest text. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`KilnError::ManifestParse`] on invalid TOML or unknown fields.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, KilnError> {
        toml::from_str(content).map_err(|source| KilnError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KilnError::ManifestRead`] if the file cannot be read and
    /// [`KilnError::ManifestParse`] if it is malformed.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, KilnError> {
        let content = std::fs::read_to_string(path).map_err(|source| KilnError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_toml_str(&content, path)?;
        debug!(artifacts = manifest.artifacts.len(), "manifest loaded");
        Ok(manifest)
    }

    /// The dependency graph: one record per declared artifact.
    #[must_use]
    pub fn graph(&self) -> Graph<String> {
        self.artifacts
            .iter()
            .map(|(name, spec)| (name.clone(), spec.depends_on.clone()))
            .collect()
    }

    /// The named artifact as a resource: its name as payload, its declared
    /// metadata attached.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<Resource<String>> {
        self.artifacts
            .get(name)
            .map(|spec| Resource::new(spec.metadata.clone(), name.to_string()))
    }

    /// Declared artifact names in order.
    pub fn artifact_names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Returns `true` if `name` is declared or referenced as a dependency.
    #[must_use]
    pub fn knows(&self, name: &str) -> bool {
        self.artifacts.contains_key(name)
            || self
                .artifacts
                .values()
                .any(|spec| spec.depends_on.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = r#"
[artifacts."site/index.html"]
depends_on = ["templates/page.html", "content/index.md"]

[artifacts."site/index.html".metadata]
title = "Home"

[artifacts."templates/page.html"]
depends_on = ["templates/base.html"]

[artifacts."templates/base.html"]
"#;

    fn site() -> Manifest {
        Manifest::from_toml_str(SITE, Path::new("kiln.toml")).expect("valid manifest")
    }

    #[test]
    fn parses_artifacts_and_metadata() {
        let m = site();
        assert_eq!(m.artifacts.len(), 3);
        let index = &m.artifacts["site/index.html"];
        assert_eq!(index.depends_on.len(), 2);
        assert_eq!(index.metadata.get("title"), Some("Home"));
        assert!(m.artifacts["templates/base.html"].depends_on.is_empty());
    }

    #[test]
    fn graph_points_from_artifact_to_dependency() {
        let g = site().graph();
        assert_eq!(g.len(), 3);
        assert!(g.neighbours(&"site/index.html".to_string()).contains("content/index.md"));
        // Sources are dangling targets, not keys.
        assert!(!g.contains(&"content/index.md".to_string()));
    }

    #[test]
    fn resource_carries_metadata() {
        let m = site();
        let r = m.resource("site/index.html").expect("declared");
        assert_eq!(r.payload(), "site/index.html");
        assert_eq!(r.metadata_field("title"), Some("Home"));
        assert!(m.resource("content/index.md").is_none());
    }

    #[test]
    fn knows_declared_and_referenced_names() {
        let m = site();
        assert!(m.knows("templates/page.html"));
        assert!(m.knows("content/index.md"));
        assert!(!m.knows("nowhere.txt"));
    }

    #[test]
    fn empty_manifest_is_valid() {
        let m = Manifest::from_toml_str("", Path::new("kiln.toml")).expect("empty is fine");
        assert!(m.graph().is_empty());
        assert_eq!(m.artifact_names().count(), 0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Manifest::from_toml_str(
            "[artifacts.a]\ndepends = [\"b\"]\n",
            Path::new("kiln.toml"),
        )
        .expect_err("typo must be rejected");
        assert!(matches!(err, KilnError::ManifestParse { .. }));
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = Manifest::load(&dir.path().join("kiln.toml")).expect_err("missing");
        assert!(matches!(err, KilnError::ManifestRead { .. }));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("kiln.toml");
        std::fs::write(&path, SITE).expect("write manifest");
        assert_eq!(Manifest::load(&path).expect("load"), site());
    }
}
