//! Inventories attached to composite objects (chests, dressers, ...).
//!
//! Before a cell is overwritten its container, if any, must be emptied so
//! items are not silently destroyed along with the object.

use std::collections::HashMap;

use crate::geom::{Point, Range};

/// A stack of identical items.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemStack {
    pub item: u16,
    pub count: u16,
}

impl ItemStack {
    pub const fn new(item: u16, count: u16) -> Self {
        Self { item, count }
    }
}

/// Host-side container bookkeeping consumed by the placer.
pub trait Containers {
    /// Empty and remove any container occupying `p`, returning its items.
    fn evacuate(&mut self, p: Point) -> Vec<ItemStack>;

    /// Register a new, empty container covering `footprint`.
    fn attach(&mut self, footprint: Range);
}

/// A world without containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContainers;

impl Containers for NoContainers {
    fn evacuate(&mut self, _p: Point) -> Vec<ItemStack> {
        Vec::new()
    }

    fn attach(&mut self, _footprint: Range) {}
}

#[derive(Debug, Clone, Default)]
struct Container {
    footprint: Range,
    items: Vec<ItemStack>,
}

/// Containers keyed by the top-left cell of their footprint.
#[derive(Debug, Clone, Default)]
pub struct ContainerStore {
    containers: HashMap<Point, Container>,
}

impl ContainerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered containers.
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// The anchor of the container covering `p`, if any.
    pub fn find(&self, p: Point) -> Option<Point> {
        self.containers
            .iter()
            .find(|(_, c)| c.footprint.contains(p))
            .map(|(&anchor, _)| anchor)
    }

    /// Items of the container anchored at `anchor`.
    pub fn items(&self, anchor: Point) -> Option<&[ItemStack]> {
        self.containers.get(&anchor).map(|c| c.items.as_slice())
    }

    /// Add items to the container anchored at `anchor`. Returns `false` if
    /// there is no such container.
    pub fn deposit(&mut self, anchor: Point, stack: ItemStack) -> bool {
        match self.containers.get_mut(&anchor) {
            Some(c) => {
                c.items.push(stack);
                true
            }
            None => false,
        }
    }
}

impl Containers for ContainerStore {
    fn evacuate(&mut self, p: Point) -> Vec<ItemStack> {
        let Some(anchor) = self.find(p) else {
            return Vec::new();
        };
        let items = self
            .containers
            .remove(&anchor)
            .map(|c| c.items)
            .unwrap_or_default();
        log::debug!("evacuated container at {anchor}: {} stacks", items.len());
        items
    }

    fn attach(&mut self, footprint: Range) {
        self.containers.insert(
            footprint.min,
            Container {
                footprint,
                items: Vec::new(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evacuate_by_any_footprint_cell() {
        let mut store = ContainerStore::new();
        store.attach(Range::new(4, 4, 6, 6));
        assert!(store.deposit(Point::new(4, 4), ItemStack::new(12, 99)));

        assert_eq!(store.find(Point::new(5, 5)), Some(Point::new(4, 4)));
        let items = store.evacuate(Point::new(5, 5));
        assert_eq!(items, vec![ItemStack::new(12, 99)]);
        assert!(store.is_empty());
        assert!(store.evacuate(Point::new(4, 4)).is_empty());
    }

    #[test]
    fn deposit_requires_container() {
        let mut store = ContainerStore::new();
        assert!(!store.deposit(Point::ZERO, ItemStack::new(1, 1)));
        store.attach(Range::new(0, 0, 1, 1));
        assert!(store.deposit(Point::ZERO, ItemStack::new(1, 1)));
        assert_eq!(store.items(Point::ZERO).map(<[_]>::len), Some(1));
    }

    #[test]
    fn no_containers_is_inert() {
        let mut none = NoContainers;
        none.attach(Range::new(0, 0, 2, 2));
        assert!(none.evacuate(Point::ZERO).is_empty());
    }
}
