//! The kind catalog: label and relationship-type names mapped to the small
//! integer ids the storage schema uses.
//!
//! The catalog is populated once before translation begins and is read-only
//! afterwards, so implementations only need `&self` access and a shared
//! catalog can serve concurrent translations.

use std::collections::HashMap;

pub trait KindMapper {
    /// Resolve kind names to storage ids. Unresolved names are returned
    /// alongside the ids so errors can report every missing kind at once.
    fn map_kinds(&self, kinds: &[String]) -> (Vec<i16>, Vec<String>);
}

/// HashMap-backed catalog for embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKindCatalog {
    kinds: HashMap<String, i16>,
}

impl InMemoryKindCatalog {
    pub fn new() -> Self {
        InMemoryKindCatalog::default()
    }

    pub fn with_kind(mut self, name: impl Into<String>, id: i16) -> Self {
        self.kinds.insert(name.into(), id);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, id: i16) {
        self.kinds.insert(name.into(), id);
    }
}

impl KindMapper for InMemoryKindCatalog {
    fn map_kinds(&self, kinds: &[String]) -> (Vec<i16>, Vec<String>) {
        let mut ids = Vec::with_capacity(kinds.len());
        let mut missing = Vec::new();

        for kind in kinds {
            match self.kinds.get(kind) {
                Some(id) => ids.push(*id),
                None => missing.push(kind.clone()),
            }
        }

        (ids, missing)
    }
}
