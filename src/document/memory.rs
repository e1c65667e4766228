//! In-memory reference implementation of the character document

use crate::advancement::value::TraitValue;
use crate::core::error::{AscendError, Result};
use crate::core::types::{AdvancementId, Proficiency, TraitKey};
use crate::document::{CharacterDocument, PropertyChange, StateDiff};
use crate::registry::{StorageKind, TraitRegistry};
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Character state held in plain maps, resolving storage paths through an
/// owned registry. Backs tests and embedding consumers that have no real
/// persistence layer.
#[derive(Debug, Clone)]
pub struct MemoryCharacter<R: TraitRegistry> {
    registry: R,
    scalars: AHashMap<String, Proficiency>,
    sets: AHashMap<String, BTreeSet<String>>,
    values: AHashMap<AdvancementId, TraitValue>,
    fail_commits: bool,
}

impl<R: TraitRegistry> MemoryCharacter<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            scalars: AHashMap::new(),
            sets: AHashMap::new(),
            values: AHashMap::new(),
            fail_commits: false,
        }
    }

    /// Seed state held from some other source: a species feature, another
    /// class, a feat
    pub fn grant(&mut self, key: &TraitKey, proficiency: Proficiency) {
        let Some(def) = self.registry.trait_type(key.trait_type()) else {
            return;
        };
        match def.storage {
            StorageKind::Multiplier => {
                self.scalars.insert(def.scalar_path(key), proficiency);
            }
            StorageKind::Set => {
                if proficiency > Proficiency::Untrained {
                    self.sets
                        .entry(def.set_path())
                        .or_default()
                        .insert(def.set_member(key));
                }
            }
        }
    }

    /// Raw scalar at a property path
    pub fn scalar(&self, path: &str) -> Proficiency {
        self.scalars.get(path).copied().unwrap_or_default()
    }

    /// Members of a set-typed property
    pub fn members(&self, path: &str) -> BTreeSet<String> {
        self.sets.get(path).cloned().unwrap_or_default()
    }

    /// Make every following commit fail without touching state
    pub fn poison(&mut self) {
        self.fail_commits = true;
    }
}

impl<R: TraitRegistry> CharacterDocument for MemoryCharacter<R> {
    fn proficiency(&self, key: &TraitKey) -> Proficiency {
        let Some(def) = self.registry.trait_type(key.trait_type()) else {
            return Proficiency::Untrained;
        };
        match def.storage {
            StorageKind::Multiplier => self.scalar(&def.scalar_path(key)),
            StorageKind::Set => {
                let held = self
                    .sets
                    .get(&def.set_path())
                    .is_some_and(|members| members.contains(&def.set_member(key)));
                if held {
                    Proficiency::Trained
                } else {
                    Proficiency::Untrained
                }
            }
        }
    }

    fn value(&self, advancement: AdvancementId) -> Option<&TraitValue> {
        self.values.get(&advancement)
    }

    async fn commit(&mut self, diff: StateDiff) -> Result<()> {
        if self.fail_commits {
            return Err(AscendError::Persistence("commit rejected".to_string()));
        }
        for change in &diff.changes {
            match change {
                PropertyChange::Add { path, member } => {
                    self.sets.entry(path.clone()).or_default().insert(member.clone());
                }
                PropertyChange::Remove { path, member } => {
                    if let Some(members) = self.sets.get_mut(path) {
                        members.remove(member);
                    }
                }
                PropertyChange::Upgrade { path, value } => {
                    if *value == Proficiency::Untrained {
                        self.scalars.remove(path);
                    } else {
                        self.scalars.insert(path.clone(), *value);
                    }
                }
            }
        }
        if diff.selected.is_empty() {
            self.values.remove(&diff.advancement);
        } else {
            self.values.insert(
                diff.advancement,
                TraitValue {
                    selected: diff.selected,
                },
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::{ChoiceNode, ChoiceSet};
    use crate::core::types::Levels;
    use crate::registry::{MemoryRegistry, TraitTypeDef};

    fn registry() -> MemoryRegistry {
        let def = TraitTypeDef {
            id: "skills".to_string(),
            label: "Skills".to_string(),
            storage_path: "system.skills".to_string(),
            storage: StorageKind::Multiplier,
            expertise_capable: true,
            sortable: true,
        };
        let tree = ChoiceSet::from_entries(vec![(
            TraitKey::leaf("skills", &["acr"]),
            ChoiceNode::leaf("Acrobatics"),
        )]);
        MemoryRegistry::new().with_type(def, tree)
    }

    #[test]
    fn test_grant_and_read_back() {
        let mut character = MemoryCharacter::new(registry());
        let key = TraitKey::leaf("skills", &["acr"]);
        assert_eq!(character.proficiency(&key), Proficiency::Untrained);

        character.grant(&key, Proficiency::Trained);
        assert_eq!(character.proficiency(&key), Proficiency::Trained);

        // Unknown trait types read as untrained
        let stranger = TraitKey::leaf("saves", &["str"]);
        character.grant(&stranger, Proficiency::Trained);
        assert_eq!(character.proficiency(&stranger), Proficiency::Untrained);
    }

    #[tokio::test]
    async fn test_commit_applies_whole_diff() {
        let mut character = MemoryCharacter::new(registry());
        let id = AdvancementId::new();
        let key = TraitKey::leaf("skills", &["acr"]);
        let diff = StateDiff {
            advancement: id,
            levels: Levels::new(1, 1),
            selected: vec![key.clone()],
            changes: vec![PropertyChange::Upgrade {
                path: "system.skills.acr.value".to_string(),
                value: Proficiency::Trained,
            }],
        };

        character.commit(diff).await.unwrap();
        assert_eq!(character.proficiency(&key), Proficiency::Trained);
        assert!(character.value(id).unwrap().contains(&key));
    }

    #[tokio::test]
    async fn test_poisoned_commit_leaves_state_untouched() {
        let mut character = MemoryCharacter::new(registry());
        character.poison();
        let id = AdvancementId::new();
        let diff = StateDiff {
            advancement: id,
            levels: Levels::new(1, 1),
            selected: vec![TraitKey::leaf("skills", &["acr"])],
            changes: Vec::new(),
        };

        assert!(character.commit(diff).await.is_err());
        assert!(character.value(id).is_none());
    }

    #[tokio::test]
    async fn test_empty_selection_clears_value() {
        let mut character = MemoryCharacter::new(registry());
        let id = AdvancementId::new();
        let key = TraitKey::leaf("skills", &["acr"]);
        let apply = StateDiff {
            advancement: id,
            levels: Levels::new(1, 1),
            selected: vec![key],
            changes: Vec::new(),
        };
        character.commit(apply).await.unwrap();
        assert!(character.value(id).is_some());

        let clear = StateDiff {
            advancement: id,
            levels: Levels::new(1, 1),
            selected: Vec::new(),
            changes: Vec::new(),
        };
        character.commit(clear).await.unwrap();
        assert!(character.value(id).is_none());
    }
}
