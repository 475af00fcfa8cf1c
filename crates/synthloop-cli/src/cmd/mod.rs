//! Subcommand handlers.
//!
//! Each handler takes its parsed `XArgs`, the resolved [`OutputMode`] and a
//! [`Session`] holding the loaded catalog plus the matching and search
//! settings from `synthloop.toml`.
//!
//! [`OutputMode`]: crate::output::OutputMode

pub mod completions;
pub mod explain;
pub mod loops;
pub mod search;
pub mod show;
pub mod stats;
pub mod uses;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use synthloop_core::config::{ProjectConfig, load_project_config, load_project_config_file};
use synthloop_core::loader::{LoadError, load_catalog};
use synthloop_core::{Catalog, CraftQuery, Item, Matcher, SearchOptions};
use tracing::debug;

/// `-c/--catalog`, flattened into the top-level CLI and into every command
/// that loads a catalog.
///
/// Not a clap `global` arg: a global `Vec` keeps only the innermost
/// occurrence, so values given before and after the subcommand are merged
/// by hand (see `Cli::catalog_paths`).
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Catalog file to load (repeatable); replaces paths from synthloop.toml.
    #[arg(short = 'c', long = "catalog", value_name = "FILE")]
    pub catalogs: Vec<PathBuf>,
}

/// Everything a command needs to answer queries.
#[derive(Debug)]
pub struct Session {
    pub catalog: Catalog,
    pub matcher: Matcher,
    pub options: SearchOptions,
}

impl Session {
    pub fn query(&self) -> CraftQuery<'_> {
        CraftQuery::new(&self.catalog)
            .with_matcher(self.matcher)
            .with_options(self.options)
    }
}

/// Load the project config and the catalog it (or `--catalog`) names.
///
/// `--catalog` paths replace the configured ones; they are taken relative to
/// the working directory.
///
/// # Errors
///
/// Fails if the config file is malformed, no catalog is configured, or a
/// catalog file cannot be loaded.
pub fn open_session(
    catalog_flags: &[PathBuf],
    config_path: Option<&Path>,
    project_root: &Path,
) -> Result<Session> {
    let config: ProjectConfig = match config_path {
        Some(path) => load_project_config_file(path)?,
        None => load_project_config(project_root)?,
    };

    let paths: Vec<PathBuf> = if catalog_flags.is_empty() {
        config.catalog.paths.clone()
    } else {
        catalog_flags.iter().map(|p| project_root.join(p)).collect()
    };
    if paths.is_empty() {
        return Err(LoadError::NoSources.into());
    }
    debug!(files = paths.len(), "loading catalog");

    let catalog = load_catalog(&paths).context("failed to load catalog")?;
    Ok(Session {
        catalog,
        matcher: config.matching.matcher(),
        options: config.search.options(),
    })
}

/// Item fields as they appear in JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub name: String,
    pub categories: Vec<String>,
    pub recipe: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<String>,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            categories: item.categories.clone(),
            recipe: item.recipe_requirements.clone(),
            effects: item.effects.clone(),
        }
    }
}

pub fn names(items: &[&Item]) -> Vec<String> {
    items.iter().map(|item| item.name.clone()).collect()
}
