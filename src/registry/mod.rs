//! Read-only registry of trait types and their selectable options
//!
//! The engine never reaches for a global lookup table; consumers inject a
//! `TraitRegistry` at construction. Unknown trait types yield empty
//! option trees: "nothing offerable" is a result, not a failure.

pub mod loader;
pub mod memory;

pub use loader::{load_registry, parse_registry};
pub use memory::MemoryRegistry;

use crate::choices::ChoiceSet;
use crate::core::types::TraitKey;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// How a trait type stores its per-character state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Scalar proficiency multiplier per key
    Multiplier,
    /// Membership set of held keys
    Set,
}

/// Metadata for one trait type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitTypeDef {
    pub id: String,
    pub label: String,
    /// Dotted property prefix on the character document
    pub storage_path: String,
    pub storage: StorageKind,
    #[serde(default)]
    pub expertise_capable: bool,
    /// Present options sorted by label; false pins authored order
    #[serde(default = "default_true")]
    pub sortable: bool,
}

impl TraitTypeDef {
    /// Property path holding the scalar multiplier for `key`
    pub fn scalar_path(&self, key: &TraitKey) -> String {
        let mut path = self.storage_path.clone();
        for segment in key.segments() {
            path.push('.');
            path.push_str(segment);
        }
        path.push_str(".value");
        path
    }

    /// Property path of the membership set for this type
    pub fn set_path(&self) -> String {
        format!("{}.value", self.storage_path)
    }

    /// Member recorded in the set property for `key`
    pub fn set_member(&self, key: &TraitKey) -> String {
        key.segments().join(":")
    }
}

/// Read-only lookup seam injected into the engine
pub trait TraitRegistry {
    fn trait_type(&self, id: &str) -> Option<&TraitTypeDef>;

    /// Full option tree for a trait type; empty when the type is unknown
    fn choices(&self, id: &str) -> ChoiceSet;

    /// Human-readable label for a key
    fn label(&self, key: &TraitKey) -> Option<String> {
        let def = self.trait_type(key.trait_type())?;
        if key.is_wildcard() {
            if key.segments().is_empty() {
                return Some(format!("Any {}", def.label));
            }
            let tree = self.choices(key.trait_type());
            return tree
                .get(&key.as_leaf())
                .map(|node| format!("Any {}", node.label));
        }
        self.choices(key.trait_type())
            .get(&key.as_leaf())
            .map(|node| node.label.clone())
    }
}

impl<T: TraitRegistry + ?Sized> TraitRegistry for &T {
    fn trait_type(&self, id: &str) -> Option<&TraitTypeDef> {
        (**self).trait_type(id)
    }

    fn choices(&self, id: &str) -> ChoiceSet {
        (**self).choices(id)
    }

    fn label(&self, key: &TraitKey) -> Option<String> {
        (**self).label(key)
    }
}

impl<T: TraitRegistry + ?Sized> TraitRegistry for std::sync::Arc<T> {
    fn trait_type(&self, id: &str) -> Option<&TraitTypeDef> {
        (**self).trait_type(id)
    }

    fn choices(&self, id: &str) -> ChoiceSet {
        (**self).choices(id)
    }

    fn label(&self, key: &TraitKey) -> Option<String> {
        (**self).label(key)
    }
}
