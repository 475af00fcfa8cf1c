use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::graph::{SearchBudget, SearchOptions};
use crate::matcher::{Containment, Matcher};

/// File name looked up in the working directory when `--config` is absent.
pub const PROJECT_CONFIG_FILE: &str = "synthloop.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Catalog files, relative to the config file's directory.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub containment: Containment,
}

impl MatchingConfig {
    #[must_use]
    pub const fn matcher(&self) -> Matcher {
        Matcher::new(self.containment)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub max_steps: Option<u64>,
    #[serde(default)]
    pub max_millis: Option<u64>,
    #[serde(default)]
    pub unique_rotations: bool,
}

impl SearchConfig {
    #[must_use]
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            budget: SearchBudget {
                max_steps: self.max_steps,
                max_duration: self.max_millis.map(Duration::from_millis),
            },
            unique_rotations: self.unique_rotations,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// Load a project config from an explicit file path.
///
/// Relative catalog paths are resolved against the file's directory.
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid TOML for
/// [`ProjectConfig`].
pub fn load_project_config_file(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut config = toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for catalog_path in &mut config.catalog.paths {
        if catalog_path.is_relative() {
            *catalog_path = base.join(&*catalog_path);
        }
    }
    Ok(config)
}

/// Load `synthloop.toml` from `dir`, or defaults when it does not exist.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub fn load_project_config(dir: &Path) -> Result<ProjectConfig> {
    let path = dir.join(PROJECT_CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    load_project_config_file(&path)
}

/// Load `<config dir>/synthloop/config.toml`, or defaults.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("synthloop/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Canonicalize an output mode name; `None` for unknown values.
#[must_use]
pub fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "plain" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}
