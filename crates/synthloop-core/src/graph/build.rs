//! Craft graph construction from an item pool.
//!
//! # Overview
//!
//! The relation queries in [`crate::relation`] rescan the pool on every call.
//! A cycle search asks "what can this item craft" thousands of times for the
//! same pool, so [`CraftGraph::build`] evaluates the matcher once per ordered
//! pair and keeps the answers.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A is an ingredient of B": `B` can be crafted using
//! `A`. Self-edges are never stored; an item cannot close a loop with itself.
//!
//! ## Ordering
//!
//! Successor and predecessor lists are kept in pool order, so walking them
//! visits candidates in exactly the order the lazy relation queries return
//! them. petgraph's own neighbor iteration is newest-first and is only used
//! for structural statistics.

#![allow(clippy::module_name_repetitions)]

use fixedbitset::FixedBitSet;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::matcher::Matcher;
use crate::model::Item;

// ---------------------------------------------------------------------------
// CraftGraph
// ---------------------------------------------------------------------------

/// Materialized ingredient graph over a fixed pool.
///
/// Node `i` is `items()[i]`; petgraph node indices coincide with pool indices.
#[derive(Debug)]
pub struct CraftGraph<'a> {
    items: Vec<&'a Item>,
    /// Directed graph: node weight = pool index, edge = "is ingredient of".
    pub graph: DiGraph<usize, ()>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl<'a> CraftGraph<'a> {
    /// Evaluate `matcher` for every ordered pair of distinct pool items.
    #[instrument(skip_all, fields(items = pool.len()))]
    pub fn build(matcher: &Matcher, pool: &[&'a Item]) -> Self {
        let n = pool.len();
        let mut graph = DiGraph::<usize, ()>::with_capacity(n, n);
        for idx in 0..n {
            graph.add_node(idx);
        }

        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];

        // Outer loop over ingredients keeps both adjacency lists in pool order.
        for (from, ingredient) in pool.iter().enumerate() {
            for (to, item) in pool.iter().enumerate() {
                if from == to || !matcher.can_use(item, ingredient) {
                    continue;
                }
                successors[from].push(to);
                predecessors[to].push(from);
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
        }

        debug!(edges = graph.edge_count(), "craft graph built");

        Self {
            items: pool.to_vec(),
            graph,
            successors,
            predecessors,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[&'a Item] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, idx: usize) -> &'a Item {
        self.items[idx]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Pool index of `item`, by reference identity.
    #[must_use]
    pub fn index_of(&self, item: &Item) -> Option<usize> {
        self.items.iter().position(|candidate| std::ptr::eq(*candidate, item))
    }

    /// Items that can be crafted using `idx`, in pool order.
    #[must_use]
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.successors[idx]
    }

    /// Items that `idx` can be crafted from (excluding itself), in pool order.
    #[must_use]
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.predecessors[idx]
    }

    /// Returns `true` if `to` can be crafted using `from`.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.successors[from].contains(&to)
    }

    /// Predecessors of `idx` as a bitset, for constant-time membership.
    #[must_use]
    pub fn predecessor_set(&self, idx: usize) -> FixedBitSet {
        let mut set = FixedBitSet::with_capacity(self.items.len());
        for &pred in &self.predecessors[idx] {
            set.insert(pred);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
