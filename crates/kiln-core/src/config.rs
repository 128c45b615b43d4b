use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::error::KilnError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub cycles: CycleConfig,
}

impl ProjectConfig {
    /// Absolute location of the build manifest for a project rooted at
    /// `project_root`.
    #[must_use]
    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.manifest.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Manifest location, relative to the project root.
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: default_manifest_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Treat a dependency cycle as a fatal error (non-zero exit).
    #[serde(default = "default_true")]
    pub fail_on_cycle: bool,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            fail_on_cycle: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Load `<project_root>/.kiln/config.toml`, or defaults when it is absent.
///
/// # Errors
///
/// Returns [`KilnError::Io`] if the file exists but cannot be read and
/// [`KilnError::ConfigParse`] if it is not a valid config.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig, KilnError> {
    let path = project_root.join(".kiln/config.toml");
    load_toml_or_default(&path)
}

/// Load `<config_dir>/kiln/config.toml`, or defaults when it is absent.
///
/// # Errors
///
/// Same as [`load_project_config`].
pub fn load_user_config() -> Result<UserConfig, KilnError> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    load_toml_or_default(&config_dir.join("kiln/config.toml"))
}

fn load_toml_or_default<T>(path: &Path) -> Result<T, KilnError>
where
    T: Default + for<'de> Deserialize<'de>,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)?;
    toml::from_str::<T>(&content).map_err(|source| KilnError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Combine project config, user config, and environment into the settings a
/// command runs with.
///
/// # Errors
///
/// Returns an error if either config file is unreadable or malformed.
pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root).context("loading project config")?;
    let user = load_user_config().context("loading user config")?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_json,
        user.output.as_deref(),
        env_format.as_deref(),
        std::io::stdout().is_terminal(),
    );

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

/// Output mode precedence: `--json` > `FORMAT` > user config > TTY default.
fn resolve_output(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
    is_tty: bool,
) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            // canonical values, then legacy compatibility names
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if is_tty {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_true() -> bool {
    true
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("kiln.toml")
}
