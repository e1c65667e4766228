//! Per-character selection state for one advancement instance

use crate::core::types::TraitKey;
use serde::{Deserialize, Serialize};

/// Keys chosen through one advancement instance, in selection order.
///
/// Created empty on first application at a level, merged into by apply,
/// trimmed by reverse, cleared when the level is retracted. Always a
/// subset of the keys reachable from the owning configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitValue {
    #[serde(default)]
    pub selected: Vec<TraitKey>,
}

impl TraitValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn contains(&self, key: &TraitKey) -> bool {
        self.selected.contains(key)
    }

    /// Append a key unless already present; true when it was added
    pub fn insert(&mut self, key: TraitKey) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.selected.push(key);
        true
    }

    /// Drop a key; true when it was present
    pub fn remove(&mut self, key: &TraitKey) -> bool {
        let before = self.selected.len();
        self.selected.retain(|selected| selected != key);
        self.selected.len() != before
    }
}
