//! Read-only item catalog.
//!
//! The catalog is built once at startup from loader output and passed by
//! reference to every query. There is no mutation API.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::warn;

use crate::error::NotFound;
use crate::model::Item;

/// An immutable snapshot of all known items, in load order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from loaded items.
    ///
    /// Names are expected to be unique. When a name repeats, every copy stays
    /// in [`Catalog::all`] but [`Catalog::find_by_name`] resolves to the first
    /// occurrence, and a warning is logged.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        let mut by_name = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match by_name.entry(item.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
                Entry::Occupied(_) => {
                    warn!(name = %item.name, index = idx, "duplicate item name in catalog");
                }
            }
        }
        Self { items, by_name }
    }

    #[must_use]
    pub fn all(&self) -> &[Item] {
        &self.items
    }

    /// Every item as a borrowed search pool.
    #[must_use]
    pub fn pool(&self) -> Vec<&Item> {
        self.items.iter().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact-name lookup.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound::Item`] if no item has this name.
    pub fn find_by_name(&self, name: &str) -> Result<&Item, NotFound> {
        self.by_name
            .get(name)
            .map(|&idx| &self.items[idx])
            .ok_or_else(|| NotFound::Item(name.to_string()))
    }

    /// Items having a category tag that equals or contains `tag`.
    #[must_use]
    pub fn find_by_category(&self, tag: &str) -> Vec<&Item> {
        self.items.iter().filter(|item| item.has_category(tag)).collect()
    }

    /// Items with a non-empty recipe.
    #[must_use]
    pub fn craftable(&self) -> Vec<&Item> {
        self.items.iter().filter(|item| item.is_craftable()).collect()
    }

    /// Case-insensitive substring search over item names.
    #[must_use]
    pub fn search_names(&self, term: &str) -> Vec<&Item> {
        let needle = term.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Names that occur more than once, in first-seen order.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut dupes: Vec<&str> = Vec::new();
        for (idx, item) in self.items.iter().enumerate() {
            let first = self.by_name.get(&item.name).copied();
            if first != Some(idx) && !dupes.contains(&item.name.as_str()) {
                dupes.push(item.name.as_str());
            }
        }
        dupes
    }
}

impl FromIterator<Item> for Catalog {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
