use serde::{Deserialize, Serialize};
use std::fmt;

/// One catalog entry: a raw material or a craftable item.
///
/// Items are built once by a loader (or directly in tests) and never mutated
/// afterwards. Field order in `categories` and `recipe_requirements` is
/// significant: the ingredient matcher walks both lists in stored order and
/// the first hit wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique display name. Recipes may reference it verbatim.
    pub name: String,
    /// Category tags, e.g. `(Gunpowder)` or `(Fuel)`.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Recipe requirements: exact item names or (parts of) category tags.
    #[serde(default, rename = "recipe")]
    pub recipe_requirements: Vec<String>,
    /// Effect labels attached when crafted. Informational only.
    #[serde(default)]
    pub effects: Vec<String>,
}

impl Item {
    /// Create a raw material with no categories, recipe or effects.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: Vec::new(),
            recipe_requirements: Vec::new(),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_recipe<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipe_requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_effects<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.effects = effects.into_iter().map(Into::into).collect();
        self
    }

    /// An item is craftable when it has at least one recipe requirement.
    #[must_use]
    pub fn is_craftable(&self) -> bool {
        !self.recipe_requirements.is_empty()
    }

    /// Returns `true` if any category tag equals or contains `tag`.
    #[must_use]
    pub fn has_category(&self, tag: &str) -> bool {
        self.categories.iter().any(|category| category.contains(tag))
    }

    /// Returns `true` if `requirement` appears verbatim in the recipe.
    #[must_use]
    pub fn requires(&self, requirement: &str) -> bool {
        self.recipe_requirements.iter().any(|r| r == requirement)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
