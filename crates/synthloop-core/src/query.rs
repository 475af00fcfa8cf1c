//! Name-based queries over a loaded catalog.
//!
//! [`CraftQuery`] is the entry point the CLI uses: it resolves item names
//! and category tags against a [`Catalog`], reports unknown ones as
//! [`NotFound`], and forwards to the matcher, relation filters and cycle
//! search.

use std::collections::BTreeSet;
use std::fmt;

use tracing::instrument;

use crate::catalog::Catalog;
use crate::error::NotFound;
use crate::graph::{CraftGraph, CycleSearch, GraphStats, SearchOptions, SearchOutcome};
use crate::matcher::Matcher;
use crate::model::{Item, Loop};
use crate::relation::Relation;

/// Where a loop search begins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Start {
    /// Try every catalog item as the start.
    #[default]
    Any,
    /// Only loops beginning at this item.
    Item(String),
    /// Loops beginning at any craftable item in this category.
    Category(String),
}

impl Start {
    /// Interpret a user-supplied start: a value beginning with `(` names a
    /// category tag, anything else an item.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Any,
            Some(tag) if tag.starts_with('(') => Self::Category(tag.to_string()),
            Some(name) => Self::Item(name.to_string()),
        }
    }
}

impl fmt::Display for Start {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any item"),
            Self::Item(name) => write!(f, "item {name}"),
            Self::Category(tag) => write!(f, "category {tag}"),
        }
    }
}

/// Which mutual pairs to list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PairScope {
    #[default]
    All,
    Item(String),
}

/// Query facade over one catalog.
#[derive(Debug, Clone, Copy)]
pub struct CraftQuery<'c> {
    catalog: &'c Catalog,
    matcher: Matcher,
    options: SearchOptions,
}

impl<'c> CraftQuery<'c> {
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            matcher: Matcher::default(),
            options: SearchOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    #[must_use]
    pub const fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub const fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    #[must_use]
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    #[must_use]
    pub const fn options(&self) -> SearchOptions {
        self.options
    }

    /// # Errors
    ///
    /// Returns [`NotFound::Item`] for an unknown name.
    pub fn lookup(&self, name: &str) -> Result<&'c Item, NotFound> {
        self.catalog.find_by_name(name)
    }

    /// Items that can be crafted using `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Item`] for an unknown name.
    pub fn consumers_of(&self, name: &str) -> Result<Vec<&'c Item>, NotFound> {
        let item = self.lookup(name)?;
        Ok(self.matcher.consumers_of(item, &self.catalog.pool()))
    }

    /// Items that `name` can be crafted from.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Item`] for an unknown name.
    pub fn ingredients_of(&self, name: &str) -> Result<Vec<&'c Item>, NotFound> {
        let item = self.lookup(name)?;
        Ok(self.matcher.ingredients_of(item, &self.catalog.pool()))
    }

    /// Members of a category, optionally only the craftable ones.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Category`] when no item carries the tag at all.
    pub fn category(&self, tag: &str, craftable_only: bool) -> Result<Vec<&'c Item>, NotFound> {
        let members = self.catalog.find_by_category(tag);
        if members.is_empty() {
            return Err(NotFound::Category(tag.to_string()));
        }
        Ok(members
            .into_iter()
            .filter(|item| !craftable_only || item.is_craftable())
            .collect())
    }

    /// Free-text search: a term starting with `(` matches category tags,
    /// anything else matches names case-insensitively.
    #[must_use]
    pub fn search(&self, term: &str, craftable_only: bool) -> Vec<&'c Item> {
        let term = term.trim();
        let hits = if term.starts_with('(') {
            self.catalog.find_by_category(term)
        } else {
            self.catalog.search_names(term)
        };
        hits.into_iter()
            .filter(|item| !craftable_only || item.is_craftable())
            .collect()
    }

    /// How `a` and `b` relate through the ingredient rule.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Item`] if either name is unknown.
    pub fn explain(&self, a: &str, b: &str) -> Result<Relation<'c>, NotFound> {
        let a = self.lookup(a)?;
        let b = self.lookup(b)?;
        Ok(self.matcher.explain(a, b))
    }

    /// Materialize the craft graph over the whole catalog.
    #[must_use]
    pub fn graph(&self) -> CraftGraph<'c> {
        CraftGraph::build(&self.matcher, &self.catalog.pool())
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats::from_graph(&self.graph())
    }

    /// Find loops of exactly `length` items.
    ///
    /// A [`Start::Category`] runs one fixed-start search per craftable
    /// member of the category and concatenates the results. Every name in
    /// `having` must appear in a returned loop.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] when the start item or category is unknown.
    #[instrument(skip(self, start, having), fields(start = %start))]
    pub fn find_cycles(
        &self,
        length: usize,
        start: &Start,
        having: &[String],
    ) -> Result<SearchOutcome<'c>, NotFound> {
        let required: BTreeSet<String> = having.iter().cloned().collect();
        let graph = self.graph();
        let search = CycleSearch::new(&graph, self.options);

        match start {
            Start::Any => Ok(search.run(length, None, &required)),
            Start::Item(name) => {
                let item = self.lookup(name)?;
                let idx = graph
                    .index_of(item)
                    .ok_or_else(|| NotFound::Item(name.clone()))?;
                Ok(search.run(length, Some(idx), &required))
            }
            Start::Category(tag) => {
                let starts: Vec<usize> = self
                    .category(tag, true)?
                    .into_iter()
                    .filter_map(|item| graph.index_of(item))
                    .collect();
                Ok(search.run_from(length, &starts, &required))
            }
        }
    }

    /// Mutual pairs (2-loops), each as a loop starting at the first item.
    ///
    /// With [`PairScope::All`] every pair appears in both orders.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Item`] for an unknown item in the scope.
    pub fn mutual_pairs(&self, scope: &PairScope) -> Result<Vec<Loop<'c>>, NotFound> {
        match scope {
            PairScope::All => {
                let graph = self.graph();
                let mut pairs = Vec::new();
                for idx in 0..graph.len() {
                    for &other in graph.successors(idx) {
                        if graph.has_edge(other, idx) {
                            pairs.push(Loop::new(vec![graph.item(idx), graph.item(other)]));
                        }
                    }
                }
                Ok(pairs)
            }
            PairScope::Item(name) => {
                let item = self.lookup(name)?;
                Ok(self
                    .matcher
                    .mutually_related(item, &self.catalog.pool())
                    .into_iter()
                    .map(|other| Loop::new(vec![item, other]))
                    .collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workshop() -> Catalog {
        Catalog::new(vec![
            Item::new("Uni").with_categories(["(Plants)", "(Gunpowder)"]),
            Item::new("Craft")
                .with_categories(["(Gunpowder)", "(Bombs)"])
                .with_recipe(["(Gunpowder)", "(Fuel)"]),
            Item::new("Kindling Coal")
                .with_categories(["(Fuel)"])
                .with_recipe(["(Bombs)"]),
            Item::new("Water").with_categories(["(Water)"]),
        ])
    }

    fn rendered(loops: &[Loop<'_>]) -> Vec<String> {
        loops.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn start_parse_recognises_categories() {
        assert_eq!(Start::parse(None), Start::Any);
        assert_eq!(Start::parse(Some("  ")), Start::Any);
        assert_eq!(Start::parse(Some("(Fuel)")), Start::Category("(Fuel)".into()));
        assert_eq!(Start::parse(Some("Craft")), Start::Item("Craft".into()));
    }

    #[test]
    fn unknown_names_are_not_found() {
        let catalog = workshop();
        let query = CraftQuery::new(&catalog);
        assert_eq!(
            query.consumers_of("Nope").expect_err("unknown"),
            NotFound::Item("Nope".into())
        );
        assert!(query.explain("Craft", "Nope").is_err());
        assert_eq!(
            query
                .find_cycles(2, &Start::Category("(Metal)".into()), &[])
                .expect_err("unknown category"),
            NotFound::Category("(Metal)".into())
        );
    }

    #[test]
    fn consumers_and_ingredients() {
        let catalog = workshop();
        let query = CraftQuery::new(&catalog);
        let consumers: Vec<&str> = query
            .consumers_of("Uni")
            .expect("known")
            .into_iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(consumers, vec!["Craft"]);

        let ingredients: Vec<&str> = query
            .ingredients_of("Craft")
            .expect("known")
            .into_iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(ingredients, vec!["Uni", "Craft", "Kindling Coal"]);
    }

    #[test]
    fn search_by_name_or_category() {
        let catalog = workshop();
        let query = CraftQuery::new(&catalog);
        assert_eq!(query.search("coal", false).len(), 1);
        assert_eq!(query.search("(Gunpowder)", false).len(), 2);
        assert_eq!(query.search("(Gunpowder)", true).len(), 1);
        assert!(query.search("zzz", false).is_empty());
    }

    #[test]
    fn category_seeded_search_skips_raw_materials() {
        let catalog = workshop();
        let query = CraftQuery::new(&catalog);

        let outcome = query
            .find_cycles(2, &Start::Category("(Gunpowder)".into()), &[])
            .expect("known category");

        // Uni is raw, so only Craft seeds a search.
        assert_eq!(rendered(&outcome.loops), vec!["Craft -> Kindling Coal -> Craft"]);
    }

    #[test]
    fn raw_only_category_is_empty_not_missing() {
        let catalog = workshop();
        let query = CraftQuery::new(&catalog);

        let outcome = query
            .find_cycles(2, &Start::Category("(Plants)".into()), &[])
            .expect("tag is carried by Uni");
        assert!(outcome.loops.is_empty());
        assert!(outcome.truncated.is_none());

        assert!(query.category("(Plants)", true).expect("known").is_empty());
        assert_eq!(
            query.category("(Metal)", true).expect_err("no item carries it"),
            NotFound::Category("(Metal)".into())
        );
    }

    #[test]
    fn mutual_pairs_match_length_two_loops() {
        let catalog = workshop();
        let query = CraftQuery::new(&catalog);

        let pairs = query.mutual_pairs(&PairScope::All).expect("pairs");
        let loops = query.find_cycles(2, &Start::Any, &[]).expect("search").loops;
        assert_eq!(rendered(&pairs), rendered(&loops));
        assert_eq!(pairs.len(), 2);

        let scoped = query
            .mutual_pairs(&PairScope::Item("Kindling Coal".into()))
            .expect("scoped");
        assert_eq!(rendered(&scoped), vec!["Kindling Coal -> Craft -> Kindling Coal"]);
    }

    #[test]
    fn having_filters_loops() {
        let catalog = workshop();
        let query = CraftQuery::new(&catalog);
        let with_coal = query
            .find_cycles(2, &Start::Any, &["Kindling Coal".to_string()])
            .expect("search");
        assert_eq!(with_coal.loops.len(), 2);
        let with_water = query
            .find_cycles(2, &Start::Any, &["Water".to_string()])
            .expect("search");
        assert!(with_water.loops.is_empty());
    }

    #[test]
    fn stats_reflect_catalog() {
        let catalog = workshop();
        let stats = CraftQuery::new(&catalog).stats();
        assert_eq!(stats.item_count, 4);
        assert_eq!(stats.craftable_count, 2);
        assert_eq!(stats.mutual_pair_count, 1);
    }
}
