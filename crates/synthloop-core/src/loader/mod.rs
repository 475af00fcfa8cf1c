//! Catalog loading from disk.
//!
//! # Formats
//!
//! | Extension        | Reader                    |
//! |------------------|---------------------------|
//! | `.csv`           | [`tabular`] (header row)  |
//! | `.yaml` / `.yml` | [`structured`]            |
//! | `.json`          | [`structured`]            |
//! | `.toml`          | [`structured`]            |
//!
//! Every reader produces [`Item`]s with flattened, de-duplicated category,
//! requirement and effect lists. Several files are concatenated in the order
//! given, so a materials sheet and a recipes sheet can be loaded together.

pub mod structured;
pub mod tabular;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::catalog::Catalog;
use crate::error::ErrorCode;
use crate::model::Item;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no catalog files given")]
    NoSources,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported catalog format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("invalid record in {} at {location}: {reason}", path.display())]
    InvalidConfiguration {
        path: PathBuf,
        location: String,
        reason: String,
    },
}

impl LoadError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NoSources => ErrorCode::CatalogMissing,
            Self::Io { .. } => ErrorCode::CatalogReadFailed,
            Self::UnsupportedFormat { .. } => ErrorCode::UnsupportedCatalogFormat,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::InvalidConfiguration { .. } => ErrorCode::InvalidRecord,
        }
    }

    pub(crate) fn invalid(
        path: &Path,
        location: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            path: path.to_path_buf(),
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(path: &Path, reason: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Csv,
    Yaml,
    Json,
    Toml,
}

impl CatalogFormat {
    /// Detect the format from the file extension (case-insensitive).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse catalog text already in memory. `path` is used for error messages.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] for malformed documents and
/// [`LoadError::InvalidConfiguration`] for records without a name.
pub fn parse_items(text: &str, format: CatalogFormat, path: &Path) -> Result<Vec<Item>, LoadError> {
    match format {
        CatalogFormat::Csv => tabular::parse(text, path),
        CatalogFormat::Yaml | CatalogFormat::Json | CatalogFormat::Toml => {
            structured::parse(text, format, path)
        }
    }
}

/// Load the items of a single catalog file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, has an unknown
/// extension, or contains malformed records.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_items(path: &Path) -> Result<Vec<Item>, LoadError> {
    let format = CatalogFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items = parse_items(&text, format, path)?;
    debug!(%format, items = items.len(), "catalog file loaded");
    Ok(items)
}

/// Load and concatenate several catalog files into one [`Catalog`].
///
/// # Errors
///
/// Returns [`LoadError::NoSources`] when `paths` is empty, otherwise the
/// first error from [`load_items`].
#[instrument(skip_all, fields(files = paths.len()))]
pub fn load_catalog<P: AsRef<Path>>(paths: &[P]) -> Result<Catalog, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoSources);
    }
    let mut items = Vec::new();
    for path in paths {
        items.extend(load_items(path.as_ref())?);
    }
    info!(items = items.len(), "catalog loaded");
    Ok(Catalog::new(items))
}

// ---------------------------------------------------------------------------
// Shared list helpers
// ---------------------------------------------------------------------------

/// Split a list cell on `;` or `,`, trimming entries and dropping blanks.
pub(crate) fn split_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split([';', ','])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}

/// Append `value` (trimmed) unless it is blank or already present.
pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

/// Inclusion-flag values that exclude a record.
pub(crate) fn is_falsy(flag: &str) -> bool {
    matches!(
        flag.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "n" | "off"
    )
}
