//! Level: a sparse collection of subworlds keyed by small integers.
//!
//! New ids come from a counter. [`Level::create_subworld`] takes the lowest
//! free id at or above it and moves the counter past the result.
//! [`Level::create_subworld_at`] honours a free hint. Deleting a subworld
//! lowers the counter to the freed id so the next plain creation reuses it.

use std::collections::BTreeMap;

use log::debug;

use crate::resources::subworld::Subworld;

pub struct Level {
    subworlds: BTreeMap<u32, Subworld>,
    counter: u32,
    /// Subworld gameplay currently runs in.
    pub current: u32,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    /// A level holding only subworld 0.
    pub fn new() -> Self {
        let mut level = Self {
            subworlds: BTreeMap::new(),
            counter: 0,
            current: 0,
        };
        level.create_subworld();
        level
    }

    fn next_free(&self) -> u32 {
        let mut id = self.counter;
        while self.subworlds.contains_key(&id) {
            id += 1;
        }
        id
    }

    /// Allocate the lowest free id at or above the counter.
    pub fn create_subworld(&mut self) -> u32 {
        let id = self.next_free();
        self.counter = id + 1;
        self.subworlds.insert(id, Subworld::default());
        debug!("created subworld {}", id);
        id
    }

    /// Allocate `hint` if it is free, otherwise fall back to
    /// [`Level::create_subworld`].
    pub fn create_subworld_at(&mut self, hint: u32) -> u32 {
        if self.subworlds.contains_key(&hint) {
            return self.create_subworld();
        }
        if hint == self.counter {
            self.counter += 1;
        }
        self.subworlds.insert(hint, Subworld::default());
        debug!("created subworld {} (hinted)", hint);
        hint
    }

    pub fn delete_subworld(&mut self, id: u32) -> bool {
        if self.subworlds.remove(&id).is_none() {
            return false;
        }
        self.counter = self.counter.min(id);
        debug!("deleted subworld {}", id);
        true
    }

    pub fn subworld_exists(&self, id: u32) -> bool {
        self.subworlds.contains_key(&id)
    }

    pub fn subworld(&self, id: u32) -> Option<&Subworld> {
        self.subworlds.get(&id)
    }

    pub fn subworld_mut(&mut self, id: u32) -> Option<&mut Subworld> {
        self.subworlds.get_mut(&id)
    }

    pub fn current(&self) -> Option<&Subworld> {
        self.subworld(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Subworld> {
        self.subworld_mut(self.current)
    }

    /// Subworld ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.subworlds.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.subworlds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subworlds.is_empty()
    }
}
