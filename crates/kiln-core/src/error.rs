use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::graph::Cycle;

/// Machine-readable error codes for scripts and CI integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ManifestNotFound,
    ManifestParseError,
    ConfigParseError,
    UnknownArtifact,
    CycleDetected,
    IoFailure,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ManifestNotFound => "E1001",
            Self::ManifestParseError => "E1002",
            Self::ConfigParseError => "E1003",
            Self::UnknownArtifact => "E2001",
            Self::CycleDetected => "E2002",
            Self::IoFailure => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ManifestNotFound => "Build manifest not found",
            Self::ManifestParseError => "Build manifest parse error",
            Self::ConfigParseError => "Config file parse error",
            Self::UnknownArtifact => "Unknown artifact",
            Self::CycleDetected => "Dependency cycle detected",
            Self::IoFailure => "I/O failure",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ManifestNotFound => {
                Some("Create kiln.toml or point --manifest at an existing manifest.")
            }
            Self::ManifestParseError => Some("Fix syntax in the build manifest and retry."),
            Self::ConfigParseError => Some("Fix syntax in .kiln/config.toml and retry."),
            Self::UnknownArtifact => {
                Some("Check the artifact name against the manifest's [artifacts] table.")
            }
            Self::CycleDetected => {
                Some("Remove or adjust depends_on entries to keep the graph acyclic.")
            }
            Self::IoFailure => Some("Check file permissions and available disk space."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised at the boundary between the dependency graph and the build
/// pipeline. The graph algorithms themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum KilnError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {}: {source}", .path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The manifest is not valid TOML or does not match the schema.
    #[error("failed to parse manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A config file is not valid TOML or does not match the schema.
    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An artifact named by the caller is not part of the graph.
    #[error("unknown artifact: {0}")]
    UnknownArtifact(String),

    /// The dependency graph contains a cycle and cannot be scheduled.
    #[error("{cycle}")]
    CycleDetected { cycle: Cycle<String> },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl KilnError {
    /// The machine-readable code for this error.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ManifestRead { source, .. } if matches!(source.kind(), io::ErrorKind::NotFound) => {
                ErrorCode::ManifestNotFound
            }
            Self::ManifestRead { .. } | Self::Io(_) => ErrorCode::IoFailure,
            Self::ManifestParse { .. } => ErrorCode::ManifestParseError,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::UnknownArtifact(_) => ErrorCode::UnknownArtifact,
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
        }
    }

    /// Remediation text for this error, falling back to the code's summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or_else(|| code.message()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeSet, HashSet};

    use crate::graph::{Graph, find_cycle};

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ManifestNotFound,
            ErrorCode::ManifestParseError,
            ErrorCode::ConfigParseError,
            ErrorCode::UnknownArtifact,
            ErrorCode::CycleDetected,
            ErrorCode::IoFailure,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::CycleDetected.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn missing_manifest_maps_to_not_found() {
        let err = KilnError::ManifestRead {
            path: PathBuf::from("kiln.toml"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.error_code(), ErrorCode::ManifestNotFound);
        assert!(err.to_string().contains("kiln.toml"));

        let denied = KilnError::ManifestRead {
            path: PathBuf::from("kiln.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        };
        assert_eq!(denied.error_code(), ErrorCode::IoFailure);
    }

    #[test]
    fn cycle_error_displays_cycle() {
        let g: Graph<String> = [
            ("a".to_string(), BTreeSet::from(["b".to_string()])),
            ("b".to_string(), BTreeSet::from(["a".to_string()])),
        ]
        .into_iter()
        .collect();
        let cycle = find_cycle(&g).expect("cycle");
        let err = KilnError::CycleDetected { cycle };

        assert_eq!(err.error_code(), ErrorCode::CycleDetected);
        assert!(err.to_string().contains("mutual dependency"));
        assert!(err.suggestion().contains("acyclic"));
    }
}
