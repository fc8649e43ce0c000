//! Configuration file loading and discovery.

use super::types::{AppConfig, ConfigOverrides};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Config file names searched in each candidate directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-compliance.yaml",
    ".sbom-compliance.yml",
    "sbom-compliance.yaml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/sbom-compliance/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("Config file {} does not exist, searching defaults", path.display());
    }

    let cwd = std::env::current_dir().ok();
    if let Some(path) = cwd.as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = find_git_root().as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = dirs::config_dir()
        .map(|dir| dir.join("sbom-compliance"))
        .as_deref()
        .and_then(find_config_in_dir)
    {
        return Some(path);
    }

    dirs::home_dir().as_deref().and_then(find_config_in_dir)
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Layer explicit CLI values over this config.
    pub fn merge(&mut self, overrides: &ConfigOverrides) {
        if let Some(standard) = overrides.standard {
            self.compliance.standard = standard.cli_name().to_string();
        }
        if overrides.min_score.is_some() {
            self.compliance.min_score = overrides.min_score;
        }

        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if overrides.file.is_some() {
            self.output.file.clone_from(&overrides.file);
        }
        if overrides.no_color {
            self.output.no_color = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# sbom-compliance configuration
# Place this file at .sbom-compliance.yaml in your project root or ~/.config/sbom-compliance/
#
# compliance.standard: ntia | bsi | bsi-v2 | oct | fsct
# compliance.min_score: fail the run below this total score (0-10)
# output.format: basic | table | json

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}
