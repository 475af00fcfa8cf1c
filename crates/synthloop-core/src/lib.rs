#![forbid(unsafe_code)]
//! synthloop-core library.
//!
//! Crafting catalogs, the ingredient-use rule, and exact-length crafting
//! loop discovery.
//!
//! # Layout
//!
//! - [`model`]: [`Item`] records and [`Loop`] results.
//! - [`catalog`]: read-only lookup over loaded items.
//! - [`loader`]: CSV / YAML / JSON / TOML catalog readers.
//! - [`matcher`]: decides whether one item can be crafted using another.
//! - [`relation`]: consumers, ingredients and mutual relations in a pool.
//! - [`graph`]: materialized craft graph, loop search, statistics.
//! - [`query`]: name-based facade used by the CLI.
//! - [`config`]: `synthloop.toml` and user preferences.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in the library, `anyhow::Result` for
//!   config loading.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod loader;
pub mod matcher;
pub mod model;
pub mod query;
pub mod relation;

pub use catalog::Catalog;
pub use error::{ErrorCode, NotFound};
pub use graph::{SearchBudget, SearchBudgetExceeded, SearchOptions, SearchOutcome};
pub use matcher::{Containment, Matcher};
pub use model::{Item, Loop};
pub use query::{CraftQuery, PairScope, Start};
pub use relation::Relation;
