//! Craft graph and loop search.
//!
//! # Overview
//!
//! ```text
//! &[&Item] pool
//!        ↓  build::CraftGraph::build(matcher, pool)
//! CraftGraph (successor/predecessor lists in pool order + petgraph DiGraph)
//!        ├─ cycles::CycleSearch::run()     → SearchOutcome (loops, truncation)
//!        └─ stats::GraphStats::from_graph() → GraphStats
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use synthloop_core::graph::find_cycles;
//! use synthloop_core::matcher::Matcher;
//! use synthloop_core::model::Item;
//!
//! let items = vec![
//!     Item::new("Bomb").with_categories(["(Bombs)"]).with_recipe(["(Gunpowder)"]),
//!     Item::new("Gunpowder").with_categories(["(Gunpowder)"]).with_recipe(["(Bombs)"]),
//! ];
//! let pool: Vec<&Item> = items.iter().collect();
//! let outcome = find_cycles(&Matcher::default(), 2, &pool, None, &BTreeSet::new());
//! assert_eq!(outcome.loops.len(), 2);
//! ```

pub mod build;
pub mod cycles;
pub mod stats;

use std::collections::BTreeSet;

pub use build::CraftGraph;
pub use cycles::{
    BudgetLimit, CycleSearch, SearchBudget, SearchBudgetExceeded, SearchOptions, SearchOutcome,
};
pub use stats::GraphStats;

use crate::matcher::Matcher;
use crate::model::Item;

/// Find every loop of exactly `length` items in `pool`, unbounded.
///
/// With `fixed_start`, only loops beginning at that item are produced; the
/// item is searched even when it is not a member of `pool`. Loops missing
/// any name in `required` are dropped.
#[must_use]
pub fn find_cycles<'a>(
    matcher: &Matcher,
    length: usize,
    pool: &[&'a Item],
    fixed_start: Option<&'a Item>,
    required: &BTreeSet<String>,
) -> SearchOutcome<'a> {
    find_cycles_with(
        matcher,
        length,
        pool,
        fixed_start,
        required,
        SearchOptions::default(),
    )
}

/// [`find_cycles`] with explicit budget and rotation options.
#[must_use]
pub fn find_cycles_with<'a>(
    matcher: &Matcher,
    length: usize,
    pool: &[&'a Item],
    fixed_start: Option<&'a Item>,
    required: &BTreeSet<String>,
    options: SearchOptions,
) -> SearchOutcome<'a> {
    let mut nodes: Vec<&'a Item> = pool.to_vec();
    let start = fixed_start.map(|item| {
        nodes
            .iter()
            .position(|candidate| std::ptr::eq(*candidate, item))
            .unwrap_or_else(|| {
                nodes.push(item);
                nodes.len() - 1
            })
    });
    let graph = CraftGraph::build(matcher, &nodes);
    CycleSearch::new(&graph, options).run(length, start, required)
}
