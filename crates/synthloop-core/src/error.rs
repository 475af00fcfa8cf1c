use std::fmt;

/// Machine-readable error codes for scripts and agents driving the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    CatalogMissing,
    UnsupportedCatalogFormat,
    InvalidRecord,
    CatalogReadFailed,
    ItemNotFound,
    CategoryNotFound,
    SearchBudgetExceeded,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::CatalogMissing => "E1002",
            Self::UnsupportedCatalogFormat => "E1003",
            Self::InvalidRecord => "E1004",
            Self::CatalogReadFailed => "E1005",
            Self::ItemNotFound => "E2001",
            Self::CategoryNotFound => "E2002",
            Self::SearchBudgetExceeded => "E3001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::CatalogMissing => "No catalog configured",
            Self::UnsupportedCatalogFormat => "Unsupported catalog format",
            Self::InvalidRecord => "Invalid catalog record",
            Self::CatalogReadFailed => "Catalog file could not be read",
            Self::ItemNotFound => "Item not found",
            Self::CategoryNotFound => "Category not found",
            Self::SearchBudgetExceeded => "Search budget exceeded",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to users and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in synthloop.toml and retry."),
            Self::CatalogMissing => {
                Some("Pass --catalog <FILE> or set `paths` under [catalog] in synthloop.toml.")
            }
            Self::UnsupportedCatalogFormat => {
                Some("Use a .csv, .yaml, .yml, .json or .toml catalog file.")
            }
            Self::InvalidRecord => Some("Every record needs a non-empty name."),
            Self::CatalogReadFailed => Some("Check the catalog path and read permissions."),
            Self::ItemNotFound => Some("Use `synthloop search <TERM>` to find the exact name."),
            Self::CategoryNotFound => {
                Some("Use `synthloop search \"(<TAG>\"` to list known categories.")
            }
            Self::SearchBudgetExceeded => {
                Some("Raise --max-steps/--max-millis or narrow the search with a start item.")
            }
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A name or category lookup that matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFound {
    #[error("item not found: {0}")]
    Item(String),
    #[error("no items in category: {0}")]
    Category(String),
}

impl NotFound {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Item(_) => ErrorCode::ItemNotFound,
            Self::Category(_) => ErrorCode::CategoryNotFound,
        }
    }
}
