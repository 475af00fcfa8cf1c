//! Summary statistics for a craft graph.
//!
//! # Statistics Provided
//!
//! - **item_count** / **edge_count**: nodes and "is ingredient of" edges.
//! - **craftable_count**: items with a non-empty recipe.
//! - **density**: `edge_count / (item_count * (item_count - 1))`; zero for
//!   graphs with 0 or 1 item.
//! - **mutual_pair_count**: unordered pairs that can each craft the other.
//! - **scc_count**: strongly connected components.
//! - **cyclic_scc_count**: SCCs with more than one member. Every loop of any
//!   length lies entirely inside one of these.
//! - **largest_scc**: size of the biggest SCC; an upper bound on loop length.
//! - **items_on_cycles**: items belonging to a cyclic SCC.
//! - **max_in_degree** / **max_out_degree**: most ingredients any item
//!   accepts from the pool / most items any ingredient feeds.

use petgraph::algo::tarjan_scc;
use serde::Serialize;

use super::build::CraftGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub item_count: usize,
    pub edge_count: usize,
    pub craftable_count: usize,
    pub density: f64,
    pub mutual_pair_count: usize,
    pub scc_count: usize,
    pub cyclic_scc_count: usize,
    pub largest_scc: usize,
    pub items_on_cycles: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(graph: &CraftGraph<'_>) -> Self {
        let item_count = graph.len();
        let edge_count = graph.edge_count();

        let craftable_count = graph
            .items()
            .iter()
            .filter(|item| item.is_craftable())
            .count();

        let mutual_pair_count = (0..item_count)
            .map(|from| {
                graph
                    .successors(from)
                    .iter()
                    .filter(|&&to| from < to && graph.has_edge(to, from))
                    .count()
            })
            .sum();

        let sccs = tarjan_scc(&graph.graph);
        let cyclic: Vec<usize> = sccs
            .iter()
            .map(Vec::len)
            .filter(|&size| size > 1)
            .collect();

        let max_in_degree = (0..item_count)
            .map(|idx| graph.predecessors(idx).len())
            .max()
            .unwrap_or(0);
        let max_out_degree = (0..item_count)
            .map(|idx| graph.successors(idx).len())
            .max()
            .unwrap_or(0);

        Self {
            item_count,
            edge_count,
            craftable_count,
            density: compute_density(item_count, edge_count),
            mutual_pair_count,
            scc_count: sccs.len(),
            cyclic_scc_count: cyclic.len(),
            largest_scc: sccs.iter().map(Vec::len).max().unwrap_or(0),
            items_on_cycles: cyclic.iter().sum(),
            max_in_degree,
            max_out_degree,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(nodes: usize, edges: usize) -> f64 {
    if nodes < 2 {
        return 0.0;
    }
    edges as f64 / (nodes as f64 * (nodes - 1) as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;
    use crate::model::Item;

    #[test]
    fn empty_graph() {
        let graph = CraftGraph::build(&Matcher::default(), &[]);
        let stats = GraphStats::from_graph(&graph);
        assert_eq!(stats.item_count, 0);
        assert_eq!(stats.scc_count, 0);
        assert_eq!(stats.largest_scc, 0);
        assert!(stats.density.abs() < f64::EPSILON);
    }

    #[test]
    fn counts_cycles_and_pairs() {
        // A <-> B mutual, C -> D -> E -> C cycle, F isolated raw material.
        let items = vec![
            Item::new("A").with_recipe(["B"]),
            Item::new("B").with_recipe(["A"]),
            Item::new("C").with_recipe(["E"]),
            Item::new("D").with_recipe(["C"]),
            Item::new("E").with_recipe(["D"]),
            Item::new("F"),
        ];
        let pool: Vec<&Item> = items.iter().collect();
        let graph = CraftGraph::build(&Matcher::default(), &pool);
        let stats = GraphStats::from_graph(&graph);

        assert_eq!(stats.item_count, 6);
        assert_eq!(stats.edge_count, 5);
        assert_eq!(stats.craftable_count, 5);
        assert_eq!(stats.mutual_pair_count, 1);
        assert_eq!(stats.scc_count, 3);
        assert_eq!(stats.cyclic_scc_count, 2);
        assert_eq!(stats.largest_scc, 3);
        assert_eq!(stats.items_on_cycles, 5);
        assert_eq!(stats.max_in_degree, 1);
        assert_eq!(stats.max_out_degree, 1);
        assert!((stats.density - 5.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn density_bounds() {
        assert!(compute_density(1, 0).abs() < f64::EPSILON);
        assert!((compute_density(2, 2) - 1.0).abs() < f64::EPSILON);
    }
}
