use hecs::Entity;

use crate::level::LineId;

use super::EntityClass;

/// Dense array with a live count. Removal swaps the last live item into the
/// hole, so it is O(1) and the backing storage never shrinks.
#[derive(Debug, Clone)]
pub struct DenseList<T> {
    items: Vec<T>,
    count: usize,
}

impl<T> Default for DenseList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
        }
    }
}

impl<T: Copy + PartialEq> DenseList<T> {
    pub fn push(&mut self, item: T) {
        if self.count == self.items.len() {
            self.items.push(item);
        } else {
            self.items[self.count] = item;
        }
        self.count += 1;
    }

    /// Returns false when the item was not present.
    pub fn remove(&mut self, item: T) -> bool {
        let Some(index) = self.as_slice().iter().position(|&other| other == item) else {
            return false;
        };

        self.count -= 1;
        self.items.swap(index, self.count);
        true
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.count]
    }

    pub fn contains(&self, item: T) -> bool {
        self.as_slice().contains(&item)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Allocated slots, live or not.
    pub fn capacity(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub lines: Vec<LineId>,
    pub things: DenseList<Entity>,
    pub missiles: DenseList<Entity>,
    pub particles: DenseList<Entity>,
}

impl Cell {
    pub fn entities(&self, class: EntityClass) -> &DenseList<Entity> {
        match class {
            EntityClass::Thing => &self.things,
            EntityClass::Missile => &self.missiles,
            EntityClass::Particle => &self.particles,
        }
    }

    pub fn entities_mut(&mut self, class: EntityClass) -> &mut DenseList<Entity> {
        match class {
            EntityClass::Thing => &mut self.things,
            EntityClass::Missile => &mut self.missiles,
            EntityClass::Particle => &mut self.particles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_remove_keeps_storage() {
        let mut list = DenseList::default();
        for i in 0..4 {
            list.push(i);
        }

        assert!(list.remove(1));
        assert_eq!(list.as_slice(), &[0, 3, 2]);
        assert!(!list.remove(1));

        assert!(list.remove(2));
        assert_eq!(list.as_slice(), &[0, 3]);
        assert_eq!(list.capacity(), 4);

        // Freed slots are reused before the array grows.
        list.push(7);
        assert_eq!(list.as_slice(), &[0, 3, 7]);
        assert_eq!(list.capacity(), 4);
        assert!(list.contains(7));
        assert!(!list.contains(1));
    }
}
