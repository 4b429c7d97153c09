use std::{collections::HashSet, hash::Hash};

/// Per-tick record of spawned, moved and removed entities, for consumers
/// that mirror world state (renderers, replays).
#[derive(Debug)]
pub struct ChangedSet<T: Eq + Hash> {
    spawned: HashSet<T>,
    changed: HashSet<T>,
    removed: HashSet<T>,
}

impl<T: Eq + Hash> Default for ChangedSet<T> {
    fn default() -> Self {
        Self {
            spawned: HashSet::new(),
            changed: HashSet::new(),
            removed: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash> ChangedSet<T> {
    pub fn clear(&mut self) {
        self.spawned.clear();
        self.changed.clear();
        self.removed.clear();
    }

    pub fn spawn(&mut self, entity: T) {
        self.spawned.insert(entity);
    }

    pub fn spawned(&self) -> &HashSet<T> {
        &self.spawned
    }

    pub fn change(&mut self, entity: T) {
        self.changed.insert(entity);
    }

    pub fn changed(&self) -> &HashSet<T> {
        &self.changed
    }

    /// Removal wins over earlier spawn/change records in the same tick.
    pub fn remove(&mut self, entity: T) {
        self.spawned.remove(&entity);
        self.changed.remove(&entity);
        self.removed.insert(entity);
    }

    pub fn removed(&self) -> &HashSet<T> {
        &self.removed
    }
}
