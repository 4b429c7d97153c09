use indexmap::IndexSet;

/// Dense handle for a texture name. Asset loading is the renderer's concern;
/// the geometry only carries ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Interns texture names in first-seen order, so ids are stable for a given map.
#[derive(Debug, Clone, Default)]
pub struct TextureRegistry {
    names: IndexSet<String>,
}

impl TextureRegistry {
    pub fn intern(&mut self, name: &str) -> TextureId {
        if let Some(index) = self.names.get_index_of(name) {
            return TextureId(index as u32);
        }
        let (index, _) = self.names.insert_full(name.to_string());
        TextureId(index as u32)
    }

    /// `None` and the "-" placeholder both mean "no texture".
    pub fn intern_opt(&mut self, name: Option<&str>) -> Option<TextureId> {
        match name {
            None | Some("") | Some("-") => None,
            Some(name) => Some(self.intern(name)),
        }
    }

    pub fn get(&self, name: &str) -> Option<TextureId> {
        self.names
            .get_index_of(name)
            .map(|index| TextureId(index as u32))
    }

    pub fn name(&self, id: TextureId) -> Option<&str> {
        self.names.get_index(id.0 as usize).map(|name| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
