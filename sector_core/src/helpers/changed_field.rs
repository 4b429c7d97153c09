use std::ops::Deref;

/// Wraps render-facing data (e.g. a sector's triangle list) and remembers
/// whether it was replaced or edited since the consumer last synced it.
#[derive(Debug, Clone)]
pub struct ChangedField<T> {
    value: T,
    changed: bool,
}

impl<T> ChangedField<T> {
    /// New fields start out changed, so a consumer uploads them once.
    pub fn new(value: T) -> Self {
        Self {
            value,
            changed: true,
        }
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn clear_changed(&mut self) {
        self.changed = false;
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.changed = true;
    }

    /// Mutable access marks the field changed.
    pub fn edit(&mut self) -> &mut T {
        self.changed = true;
        &mut self.value
    }
}

impl<T: Default> Default for ChangedField<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Deref for ChangedField<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_marks_changed() {
        let mut field = ChangedField::new(vec![1, 2]);
        assert!(field.changed());

        field.clear_changed();
        assert_eq!(field.len(), 2);
        assert!(!field.changed());

        field.edit().push(3);
        assert!(field.changed());
        assert_eq!(*field, vec![1, 2, 3]);
    }

    #[test]
    fn default_starts_changed() {
        let field: ChangedField<Vec<u8>> = ChangedField::default();
        assert!(field.changed());
        assert!(field.is_empty());
    }
}
