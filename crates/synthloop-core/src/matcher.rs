//! Ingredient-use matching.
//!
//! # Rule
//!
//! Item `X` can be crafted using item `Y` when, checked in this order:
//!
//! 1. `Y.name` appears verbatim in `X.recipe_requirements`, or
//! 2. walking `Y.categories` in stored order, and for each tag walking
//!    `X.recipe_requirements` in stored order, some requirement is a
//!    substring of the tag.
//!
//! The first hit wins and decides which requirement/tag pair is reported.
//! Rule 2 is textual containment, not tag equality: a requirement `Metal`
//! matches the tag `(Metal Ore)`. Catalog data relies on this, so it is kept
//! as-is. [`Containment::Either`] additionally accepts tags that are
//! substrings of the requirement.
//!
//! A failed match is an ordinary "no edge" answer ([`NoMatch`]), never an
//! error that should abort a larger query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Item;

/// Direction of the textual containment check in the category rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Containment {
    /// The requirement must be a substring of the category tag.
    #[default]
    RequirementInCategory,
    /// Either string may contain the other.
    Either,
}

impl Containment {
    fn accepts(self, requirement: &str, category: &str) -> bool {
        match self {
            Self::RequirementInCategory => category.contains(requirement),
            Self::Either => category.contains(requirement) || requirement.contains(category),
        }
    }
}

/// Why an ingredient was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBasis<'a> {
    /// The recipe names the ingredient directly.
    Name,
    /// The ingredient carries this category tag.
    Category(&'a str),
}

/// Evidence that `item` can be crafted using `ingredient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsesRelation<'a> {
    pub item: &'a Item,
    pub ingredient: &'a Item,
    /// The requirement of `item` that matched.
    pub requirement: &'a str,
    pub basis: MatchBasis<'a>,
}

impl<'a> UsesRelation<'a> {
    /// The ingredient-side label that satisfied the requirement: its name
    /// for a direct match, otherwise the matching category tag.
    #[must_use]
    pub fn matched_type(&self) -> &'a str {
        match self.basis {
            MatchBasis::Name => self.ingredient.name.as_str(),
            MatchBasis::Category(tag) => tag,
        }
    }
}

impl fmt::Display for UsesRelation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] -> [{}]{}",
            self.ingredient.name,
            self.matched_type(),
            self.requirement,
            self.item.name
        )
    }
}

/// `item` cannot be crafted using `ingredient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{item} does not use {ingredient} as an ingredient")]
pub struct NoMatch<'a> {
    pub item: &'a str,
    pub ingredient: &'a str,
}

/// Applies the ingredient rule with a fixed containment policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Matcher {
    containment: Containment,
}

impl Matcher {
    #[must_use]
    pub const fn new(containment: Containment) -> Self {
        Self { containment }
    }

    #[must_use]
    pub const fn containment(&self) -> Containment {
        self.containment
    }

    /// Decide whether `item` can be crafted using `ingredient`.
    ///
    /// # Errors
    ///
    /// Returns [`NoMatch`] when neither the name rule nor the category rule
    /// applies. Callers treat this as a missing edge.
    pub fn uses_as_ingredient<'a>(
        &self,
        item: &'a Item,
        ingredient: &'a Item,
    ) -> Result<UsesRelation<'a>, NoMatch<'a>> {
        if let Some(requirement) = item
            .recipe_requirements
            .iter()
            .find(|requirement| **requirement == ingredient.name)
        {
            return Ok(UsesRelation {
                item,
                ingredient,
                requirement,
                basis: MatchBasis::Name,
            });
        }

        for category in &ingredient.categories {
            for requirement in &item.recipe_requirements {
                if self.containment.accepts(requirement, category) {
                    return Ok(UsesRelation {
                        item,
                        ingredient,
                        requirement,
                        basis: MatchBasis::Category(category),
                    });
                }
            }
        }

        Err(NoMatch {
            item: &item.name,
            ingredient: &ingredient.name,
        })
    }

    /// Boolean form of [`Matcher::uses_as_ingredient`].
    #[must_use]
    pub fn can_use(&self, item: &Item, ingredient: &Item) -> bool {
        self.uses_as_ingredient(item, ingredient).is_ok()
    }
}

/// [`Matcher::uses_as_ingredient`] with the default containment policy.
///
/// # Errors
///
/// Returns [`NoMatch`] when `item` cannot use `ingredient`.
pub fn uses_as_ingredient<'a>(
    item: &'a Item,
    ingredient: &'a Item,
) -> Result<UsesRelation<'a>, NoMatch<'a>> {
    Matcher::default().uses_as_ingredient(item, ingredient)
}
