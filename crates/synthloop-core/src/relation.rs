//! Craft relation queries.
//!
//! Thin filters over an item pool, driven by [`Matcher`]. Nothing is cached:
//! every call rescans the pool, which is cheap for catalogs of a few hundred
//! items. Identity inside a pool is reference identity, so two distinct
//! entries that happen to share a name are still different nodes.

use crate::matcher::{Matcher, UsesRelation};
use crate::model::Item;

/// How two items relate through the ingredient rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation<'a> {
    /// Each can be crafted using the other.
    Mutual {
        forward: UsesRelation<'a>,
        backward: UsesRelation<'a>,
    },
    /// The first item is an ingredient of the second.
    Forward(UsesRelation<'a>),
    /// The second item is an ingredient of the first.
    Backward(UsesRelation<'a>),
    Unrelated,
}

impl Matcher {
    /// Items in `pool` (other than `item`) that can be crafted using `item`.
    ///
    /// These are the outgoing edges of `item` in the craft graph.
    #[must_use]
    pub fn consumers_of<'a>(&self, item: &Item, pool: &[&'a Item]) -> Vec<&'a Item> {
        pool.iter()
            .copied()
            .filter(|candidate| !std::ptr::eq(*candidate, item))
            .filter(|candidate| self.can_use(candidate, item))
            .collect()
    }

    /// Items in `pool` that `item` can be crafted from.
    ///
    /// These are the incoming edges of `item` in the craft graph.
    #[must_use]
    pub fn ingredients_of<'a>(&self, item: &Item, pool: &[&'a Item]) -> Vec<&'a Item> {
        pool.iter()
            .copied()
            .filter(|candidate| self.can_use(item, candidate))
            .collect()
    }

    /// Consumers of `item` that can in turn be used to craft `item`.
    #[must_use]
    pub fn mutually_related<'a>(&self, item: &Item, pool: &[&'a Item]) -> Vec<&'a Item> {
        self.consumers_of(item, pool)
            .into_iter()
            .filter(|candidate| self.can_use(item, candidate))
            .collect()
    }

    /// Classify the relation between `a` and `b`.
    #[must_use]
    pub fn explain<'a>(&self, a: &'a Item, b: &'a Item) -> Relation<'a> {
        let forward = self.uses_as_ingredient(b, a).ok();
        let backward = self.uses_as_ingredient(a, b).ok();
        match (forward, backward) {
            (Some(forward), Some(backward)) => Relation::Mutual { forward, backward },
            (Some(forward), None) => Relation::Forward(forward),
            (None, Some(backward)) => Relation::Backward(backward),
            (None, None) => Relation::Unrelated,
        }
    }
}
