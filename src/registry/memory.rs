//! In-memory registry backed by hand-built or loaded definitions

use crate::choices::ChoiceSet;
use crate::registry::{TraitRegistry, TraitTypeDef};

/// Registry assembled in memory, either by a builder chain in tests and
/// embedding consumers or by the TOML loader.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    types: Vec<(TraitTypeDef, ChoiceSet)>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, def: TraitTypeDef, choices: ChoiceSet) -> Self {
        self.insert(def, choices);
        self
    }

    /// Register or replace a trait type and its option tree
    pub fn insert(&mut self, def: TraitTypeDef, choices: ChoiceSet) {
        match self.types.iter_mut().find(|(d, _)| d.id == def.id) {
            Some(slot) => *slot = (def, choices),
            None => self.types.push((def, choices)),
        }
    }

    pub fn trait_types(&self) -> impl Iterator<Item = &TraitTypeDef> {
        self.types.iter().map(|(def, _)| def)
    }
}

impl TraitRegistry for MemoryRegistry {
    fn trait_type(&self, id: &str) -> Option<&TraitTypeDef> {
        self.types.iter().find(|(def, _)| def.id == id).map(|(def, _)| def)
    }

    fn choices(&self, id: &str) -> ChoiceSet {
        self.types
            .iter()
            .find(|(def, _)| def.id == id)
            .map(|(_, choices)| choices.clone())
            .unwrap_or_default()
    }
}
