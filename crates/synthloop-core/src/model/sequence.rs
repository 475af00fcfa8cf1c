//! Crafting loops: closed sequences of distinct items.

use std::fmt;

use super::item::Item;

/// A simple directed crafting cycle.
///
/// Each member can be crafted using the previous member as an ingredient,
/// and the first member can be crafted using the last one. Members are
/// pairwise distinct. A `Loop` borrows its items from the catalog it was
/// found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop<'a> {
    members: Vec<&'a Item>,
}

impl<'a> Loop<'a> {
    #[must_use]
    pub const fn new(members: Vec<&'a Item>) -> Self {
        Self { members }
    }

    #[must_use]
    pub fn members(&self) -> &[&'a Item] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&'a Item> {
        self.members.first().copied()
    }

    /// Member names in loop order.
    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        self.members.iter().map(|item| item.name.as_str()).collect()
    }

    /// Returns `true` if some member has exactly this name.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.members.iter().any(|item| item.name == name)
    }

    /// Crafting steps as `(ingredient, crafted)` pairs, closing edge last.
    pub fn links(&self) -> impl Iterator<Item = (&'a Item, &'a Item)> + '_ {
        let n = self.members.len();
        (0..n).map(move |i| (self.members[i], self.members[(i + 1) % n]))
    }

    /// Returns `true` if `other` visits the same members in the same cyclic
    /// order, possibly starting elsewhere.
    #[must_use]
    pub fn is_rotation_of(&self, other: &Loop<'_>) -> bool {
        if self.members.len() != other.members.len() {
            return false;
        }
        if self.members.is_empty() {
            return true;
        }
        let n = self.members.len();
        (0..n).any(|offset| {
            (0..n).all(|i| std::ptr::eq(self.members[i], other.members[(i + offset) % n]))
        })
    }
}

impl fmt::Display for Loop<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names();
        if let Some(first) = names.first().copied() {
            names.push(first);
        }
        f.write_str(&names.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_include_closing_edge() {
        let a = Item::new("A");
        let b = Item::new("B");
        let c = Item::new("C");
        let cycle = Loop::new(vec![&a, &b, &c]);

        let links: Vec<(&str, &str)> = cycle
            .links()
            .map(|(from, to)| (from.name.as_str(), to.name.as_str()))
            .collect();

        assert_eq!(links, vec![("A", "B"), ("B", "C"), ("C", "A")]);
    }

    #[test]
    fn rotation_detection() {
        let a = Item::new("A");
        let b = Item::new("B");
        let c = Item::new("C");
        let abc = Loop::new(vec![&a, &b, &c]);
        let bca = Loop::new(vec![&b, &c, &a]);
        let acb = Loop::new(vec![&a, &c, &b]);

        assert!(abc.is_rotation_of(&bca));
        assert!(!abc.is_rotation_of(&acb));
    }

    #[test]
    fn display_closes_the_loop() {
        let a = Item::new("Bomb");
        let b = Item::new("Gunpowder");
        let cycle = Loop::new(vec![&a, &b]);
        assert_eq!(cycle.to_string(), "Bomb -> Gunpowder -> Bomb");
    }
}
