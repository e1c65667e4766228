//! Trait grant/choice resolution
//!
//! The densest part of the engine. Computes which grants and choice
//! slots remain unresolved for a character, deduplicated against every
//! source of held traits, and turns selections into atomic state diffs.

use crate::advancement::config::{ChoiceMode, GrantMode, TraitChoiceConfig};
use crate::advancement::value::TraitValue;
use crate::advancement::{Advancement, ApplyOptions, ReverseOptions, Warning, WarningCategory};
use crate::choices::{ChoiceNode, ChoiceSet};
use crate::core::error::{AscendError, Result};
use crate::core::types::{AdvancementId, Levels, Proficiency, TraitKey};
use crate::document::{CharacterDocument, PropertyChange, StateDiff};
use crate::registry::{StorageKind, TraitRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Cross-source classification of every eligible key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorSelected {
    /// Keys the character already holds at the mode's threshold
    pub selected: BTreeSet<TraitKey>,
    /// Keys the character could still acquire
    pub available: BTreeSet<TraitKey>,
}

/// One unfulfilled grant or choice slot
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualPool {
    /// Legal options for this slot, as a displayable subtree
    pub options: ChoiceSet,
    /// Flattened option keys
    pub keys: BTreeSet<TraitKey>,
    /// Index of the originating choice spec; None for grants
    pub origin: Option<usize>,
}

/// Result of residual-pool computation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Unfulfilled {
    pub available: Vec<ResidualPool>,
    /// Merged tree of every remaining option
    pub choices: ChoiceSet,
    /// Slots dropped because no legal option remained for them
    pub exhausted: usize,
}

/// What the consumer should present for the current state
#[derive(Debug, Clone, PartialEq)]
pub enum ChoicePrompt {
    /// Nothing remains to pick
    Configured,
    /// Slots remain but every legal option is spoken for
    NothingLeft { label: String },
    Choose {
        choices: ChoiceSet,
        /// Remaining pick count
        remaining: usize,
        label: String,
        /// More than one exclusive block survives, so the raw pick count
        /// no longer equals the number of independent decisions
        simplified: bool,
    },
}

impl ChoicePrompt {
    /// Human-readable remaining-choice description, if one applies
    pub fn description(&self) -> Option<String> {
        match self {
            ChoicePrompt::Configured => None,
            ChoicePrompt::NothingLeft { label } => {
                Some(format!("No {} left to grant", label))
            }
            ChoicePrompt::Choose {
                remaining,
                label,
                simplified: false,
                ..
            } => Some(format!("Choose {} more {}", remaining, label)),
            ChoicePrompt::Choose {
                label,
                simplified: true,
                ..
            } => Some(format!("Choose remaining {}", label)),
        }
    }
}

/// Selection payload for `apply`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitSelection {
    pub selected: Vec<TraitKey>,
}

impl TraitSelection {
    pub fn new(selected: Vec<TraitKey>) -> Self {
        Self { selected }
    }

    pub fn one(key: TraitKey) -> Self {
        Self {
            selected: vec![key],
        }
    }
}

/// Candidate slot during elimination
#[derive(Debug, Clone)]
struct CandidatePool {
    keys: BTreeSet<TraitKey>,
    origin: Option<usize>,
}

impl CandidatePool {
    fn matches(&self, key: &TraitKey) -> bool {
        self.keys.iter().any(|candidate| candidate.covers(key))
    }
}

/// Advancement granting or offering trait proficiencies at a level
#[derive(Debug, Clone)]
pub struct TraitChoiceAdvancement<R: TraitRegistry> {
    id: AdvancementId,
    level: u8,
    config: TraitChoiceConfig,
    registry: R,
}

impl<R: TraitRegistry> TraitChoiceAdvancement<R> {
    pub fn new(level: u8, config: TraitChoiceConfig, registry: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: AdvancementId::new(),
            level,
            config,
            registry,
        })
    }

    /// Pin the instance identity, e.g. when rehydrating persisted data
    pub fn with_id(mut self, id: AdvancementId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> AdvancementId {
        self.id
    }

    /// Level this advancement activates at
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn config(&self) -> &TraitChoiceConfig {
        &self.config
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn selection(&self, document: &impl CharacterDocument) -> TraitValue {
        document.value(self.id).cloned().unwrap_or_default()
    }

    /// Trait types this advancement may touch. Outside default mode only
    /// expertise-capable types are eligible.
    fn eligible_types(&self) -> BTreeSet<String> {
        self.config
            .referenced_types()
            .into_iter()
            .filter(|id| {
                self.config.mode == GrantMode::Default
                    || self
                        .registry
                        .trait_type(id)
                        .is_some_and(|def| def.expertise_capable)
            })
            .collect()
    }

    fn threshold(&self) -> Proficiency {
        if self.config.mode == GrantMode::Expertise {
            Proficiency::Expert
        } else {
            Proficiency::Trained
        }
    }

    /// Classify the full key space of every eligible trait type by what
    /// the character already holds, from any source. Independent of this
    /// instance's own selections.
    pub fn actor_selected(&self, document: &impl CharacterDocument) -> ActorSelected {
        let threshold = self.threshold();
        let mut out = ActorSelected::default();
        for id in self.eligible_types() {
            for key in self.registry.choices(&id).to_set() {
                if document.proficiency(&key) >= threshold {
                    out.selected.insert(key);
                } else {
                    out.available.insert(key);
                }
            }
        }
        out
    }

    /// Compute the residual pools still waiting on player input and the
    /// merged tree of every remaining option.
    pub fn unfulfilled_choices(&self, document: &impl CharacterDocument) -> Unfulfilled {
        let value = self.selection(document);
        let actor = self.actor_selected(document);

        // One singleton pool per grant plus one pool per duplicated
        // choice slot, tagged with the index of its originating spec
        let mut pools: Vec<CandidatePool> = Vec::new();
        for grant in &self.config.grants {
            pools.push(CandidatePool {
                keys: BTreeSet::from([grant.clone()]),
                origin: None,
            });
        }
        for (index, choice) in self.config.choices.iter().enumerate() {
            for _ in 0..choice.count {
                pools.push(CandidatePool {
                    keys: choice.pool.clone(),
                    origin: Some(index),
                });
            }
        }

        // Most constrained pools first, so a key that could satisfy
        // several is matched against the smallest
        pools.sort_by_key(|pool| pool.keys.len());

        match self.config.choice_mode {
            ChoiceMode::Inclusive => {
                for key in &value.selected {
                    if let Some(index) = pools.iter().position(|pool| pool.matches(key)) {
                        pools.remove(index);
                    }
                }
            }
            ChoiceMode::Exclusive => {
                for key in &value.selected {
                    let Some(index) = pools.iter().position(|pool| pool.matches(key)) else {
                        continue;
                    };
                    let origin = pools.remove(index).origin;
                    // The pick is consumed everywhere; only a wildcard
                    // can keep offering it afterwards
                    for pool in &mut pools {
                        pool.keys.remove(key);
                    }
                    // A sibling block that no longer offers the pick is
                    // invalidated wholesale
                    let doomed: BTreeSet<usize> = pools
                        .iter()
                        .filter_map(|pool| pool.origin)
                        .filter(|&other| Some(other) != origin)
                        .filter(|&other| {
                            !pools
                                .iter()
                                .any(|pool| pool.origin == Some(other) && pool.matches(key))
                        })
                        .collect();
                    pools.retain(|pool| {
                        pool.origin.map_or(true, |other| !doomed.contains(&other))
                    });
                }
            }
        }

        if pools.is_empty() {
            return Unfulfilled::default();
        }

        // Universe of every option still referenced, minus everything the
        // character holds and this instance's own picks
        let referenced: BTreeSet<String> = pools
            .iter()
            .flat_map(|pool| pool.keys.iter())
            .map(|key| key.trait_type().to_string())
            .collect();
        let mut universe = ChoiceSet::new();
        for id in &referenced {
            let tree = self.registry.choices(id);
            if tree.is_empty() {
                continue;
            }
            let label = self
                .registry
                .trait_type(id)
                .map(|def| def.label.clone())
                .unwrap_or_else(|| id.clone());
            universe.insert(TraitKey::leaf(id, &[]), ChoiceNode::category(&label, tree));
        }
        let mut held: BTreeSet<TraitKey> = actor.selected;
        held.extend(value.selected.iter().cloned());
        universe.exclude(&held);

        let mut available = Vec::new();
        let mut exhausted = 0;
        let mut remaining: BTreeSet<TraitKey> = BTreeSet::new();
        for pool in pools {
            let options = universe.clone().filtered(&pool.keys);
            let keys = options.to_set();
            if keys.is_empty() {
                exhausted += 1;
                continue;
            }
            remaining.extend(keys.iter().cloned());
            available.push(ResidualPool {
                options,
                keys,
                origin: pool.origin,
            });
        }

        let choices = universe.filtered(&remaining).sorted();
        Unfulfilled {
            available,
            choices,
            exhausted,
        }
    }

    /// Presentation summary of what remains to pick
    pub fn available_choices(&self, document: &impl CharacterDocument) -> ChoicePrompt {
        let unfulfilled = self.unfulfilled_choices(document);
        let label = self.type_label();
        if unfulfilled.choices.is_empty() {
            if unfulfilled.exhausted > 0 {
                return ChoicePrompt::NothingLeft { label };
            }
            return ChoicePrompt::Configured;
        }
        let origins: BTreeSet<usize> = unfulfilled
            .available
            .iter()
            .filter_map(|pool| pool.origin)
            .collect();
        let simplified =
            self.config.choice_mode == ChoiceMode::Exclusive && origins.len() > 1;
        ChoicePrompt::Choose {
            remaining: unfulfilled.available.len(),
            choices: unfulfilled.choices,
            label,
            simplified,
        }
    }

    /// Concrete character-state mutations for newly selected keys
    pub fn changes(
        &self,
        document: &impl CharacterDocument,
        keys: &[TraitKey],
    ) -> Vec<PropertyChange> {
        let mut changes = Vec::new();
        for key in keys {
            let Some(def) = self.registry.trait_type(key.trait_type()) else {
                continue;
            };
            match def.storage {
                StorageKind::Set => changes.push(PropertyChange::Add {
                    path: def.set_path(),
                    member: def.set_member(key),
                }),
                StorageKind::Multiplier => {
                    let current = document.proficiency(key);
                    let target = match self.config.mode {
                        GrantMode::Default => Proficiency::Trained,
                        GrantMode::Upgrade => {
                            if current == Proficiency::Untrained {
                                Proficiency::Trained
                            } else {
                                Proficiency::Expert
                            }
                        }
                        GrantMode::Expertise => Proficiency::Expert,
                    };
                    // Held from another source: default mode leaves it be
                    if self.config.mode == GrantMode::Default
                        && current != Proficiency::Untrained
                    {
                        continue;
                    }
                    if current >= target {
                        continue;
                    }
                    changes.push(PropertyChange::Upgrade {
                        path: def.scalar_path(key),
                        value: target,
                    });
                }
            }
        }
        changes
    }

    /// Mutations stepping reversed keys back down
    fn reverse_changes(
        &self,
        document: &impl CharacterDocument,
        keys: &[TraitKey],
    ) -> Vec<PropertyChange> {
        let mut changes = Vec::new();
        for key in keys {
            let Some(def) = self.registry.trait_type(key.trait_type()) else {
                continue;
            };
            match def.storage {
                StorageKind::Set => changes.push(PropertyChange::Remove {
                    path: def.set_path(),
                    member: def.set_member(key),
                }),
                StorageKind::Multiplier => {
                    let current = document.proficiency(key);
                    let restored = match self.config.mode {
                        GrantMode::Default => Proficiency::Untrained,
                        GrantMode::Expertise => Proficiency::Trained,
                        GrantMode::Upgrade => {
                            if current >= Proficiency::Expert {
                                Proficiency::Trained
                            } else {
                                Proficiency::Untrained
                            }
                        }
                    };
                    changes.push(PropertyChange::Upgrade {
                        path: def.scalar_path(key),
                        value: restored,
                    });
                }
            }
        }
        changes
    }

    /// Label of the trait type(s) this advancement offers
    fn type_label(&self) -> String {
        let labels: Vec<String> = self
            .eligible_types()
            .iter()
            .filter_map(|id| self.registry.trait_type(id).map(|def| def.label.clone()))
            .collect();
        match labels.len() {
            0 => "Traits".to_string(),
            1 => labels.into_iter().next().unwrap_or_default(),
            _ => labels.join(" and "),
        }
    }

    pub fn title_for_level(&self, _levels: Levels) -> String {
        match &self.config.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => self.type_label(),
        }
    }

    /// Stable ordering key for presentation lists
    pub fn sorting_value_for_level(&self, levels: Levels) -> String {
        format!("{:03} {}", levels.class, self.title_for_level(levels))
    }

    /// Identity under which warnings for `levels` are registered
    pub fn warning_key(&self, levels: Levels) -> String {
        format!("advancement.{}.{}", self.id, levels.class)
    }
}

impl<D: CharacterDocument, R: TraitRegistry> Advancement<D> for TraitChoiceAdvancement<R> {
    type ApplyData = TraitSelection;
    type ReverseData = TraitKey;

    fn id(&self) -> AdvancementId {
        self.id
    }

    fn level(&self) -> u8 {
        self.level
    }

    fn configured_for_level(&self, document: &D, _levels: Levels) -> bool {
        self.unfulfilled_choices(document).available.is_empty()
    }

    async fn apply(
        &self,
        document: &mut D,
        levels: Levels,
        data: Option<&TraitSelection>,
        options: ApplyOptions,
    ) -> Result<()> {
        let mut requested: Vec<TraitKey> =
            data.map(|selection| selection.selected.clone()).unwrap_or_default();

        if options.initial {
            for pool in self.unfulfilled_choices(&*document).available {
                let mut keys = pool.keys.into_iter();
                if let (Some(only), None) = (keys.next(), keys.next()) {
                    requested.push(only);
                }
            }
        }

        for key in &requested {
            if !self.config.reaches(key) {
                return Err(AscendError::SelectionOutsideConfiguration(key.to_string()));
            }
        }

        let mut value = self.selection(&*document);
        let fresh: Vec<TraitKey> = requested
            .into_iter()
            .filter(|key| value.insert(key.clone()))
            .collect();
        if fresh.is_empty() {
            return Ok(());
        }

        let changes = self.changes(&*document, &fresh);
        tracing::debug!(
            advancement = %self.id,
            level = levels.class,
            added = fresh.len(),
            "applying trait selection"
        );
        document
            .commit(StateDiff {
                advancement: self.id,
                levels,
                selected: value.selected,
                changes,
            })
            .await
    }

    async fn reverse(
        &self,
        document: &mut D,
        levels: Levels,
        data: Option<&TraitKey>,
        _options: ReverseOptions,
    ) -> Result<()> {
        let mut value = self.selection(&*document);
        if value.is_empty() {
            return Ok(());
        }

        let removed: Vec<TraitKey> = match data {
            Some(key) => {
                if !value.remove(key) {
                    return Ok(());
                }
                vec![key.clone()]
            }
            None => std::mem::take(&mut value.selected),
        };

        let changes = self.reverse_changes(&*document, &removed);
        tracing::debug!(
            advancement = %self.id,
            level = levels.class,
            removed = removed.len(),
            "reversing trait selection"
        );
        document
            .commit(StateDiff {
                advancement: self.id,
                levels,
                selected: value.selected,
                changes,
            })
            .await
    }

    fn sorting_value_for_level(&self, levels: Levels) -> String {
        TraitChoiceAdvancement::sorting_value_for_level(self, levels)
    }

    fn title_for_level(&self, levels: Levels) -> String {
        TraitChoiceAdvancement::title_for_level(self, levels)
    }

    fn summary_for_level(&self, document: &D, _levels: Levels) -> String {
        if let Some(hint) = &self.config.hint {
            if !hint.is_empty() {
                return hint.clone();
            }
        }
        let value = self.selection(document);
        let labels: Vec<String> = value
            .selected
            .iter()
            .map(|key| {
                self.registry
                    .label(key)
                    .unwrap_or_else(|| key.to_string())
            })
            .collect();
        labels.join(", ")
    }

    fn warning_key(&self, levels: Levels) -> String {
        TraitChoiceAdvancement::warning_key(self, levels)
    }

    fn prepare_warnings(&self, document: &D, levels: Levels, warnings: &mut Vec<Warning>) {
        let prompt = self.available_choices(document);
        if let ChoicePrompt::Choose { .. } = prompt {
            if let Some(description) = prompt.description() {
                warnings.push(Warning {
                    key: self.warning_key(levels),
                    category: WarningCategory::Warning,
                    message: description,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advancement::config::ChoiceSpec;
    use crate::document::MemoryCharacter;
    use crate::registry::{MemoryRegistry, TraitTypeDef};

    fn key(raw: &str) -> TraitKey {
        raw.parse().unwrap()
    }

    fn keys(raw: &[&str]) -> BTreeSet<TraitKey> {
        raw.iter().map(|r| key(r)).collect()
    }

    fn registry() -> MemoryRegistry {
        let skills = ChoiceSet::from_entries(
            [
                ("acr", "Acrobatics"),
                ("ath", "Athletics"),
                ("per", "Perception"),
                ("ste", "Stealth"),
            ]
            .into_iter()
            .map(|(id, label)| (TraitKey::leaf("skills", &[id]), ChoiceNode::leaf(label)))
            .collect(),
        );
        let artisan = ChoiceSet::from_entries(vec![
            (key("tools:artisan:smith"), ChoiceNode::leaf("Smith's Tools")),
            (key("tools:artisan:brewer"), ChoiceNode::leaf("Brewer's Supplies")),
        ]);
        let tools = ChoiceSet::from_entries(vec![
            (
                key("tools:artisan"),
                ChoiceNode::selectable_category("Artisan's Tools", artisan),
            ),
            (key("tools:thieves"), ChoiceNode::leaf("Thieves' Tools")),
        ]);
        let languages = ChoiceSet::from_entries(vec![
            (key("languages:common"), ChoiceNode::leaf("Common")),
            (key("languages:elvish"), ChoiceNode::leaf("Elvish")),
        ]);

        MemoryRegistry::new()
            .with_type(
                TraitTypeDef {
                    id: "skills".to_string(),
                    label: "Skills".to_string(),
                    storage_path: "system.skills".to_string(),
                    storage: StorageKind::Multiplier,
                    expertise_capable: true,
                    sortable: true,
                },
                skills,
            )
            .with_type(
                TraitTypeDef {
                    id: "tools".to_string(),
                    label: "Tools".to_string(),
                    storage_path: "system.tools".to_string(),
                    storage: StorageKind::Multiplier,
                    expertise_capable: false,
                    sortable: true,
                },
                tools,
            )
            .with_type(
                TraitTypeDef {
                    id: "languages".to_string(),
                    label: "Languages".to_string(),
                    storage_path: "system.traits.languages".to_string(),
                    storage: StorageKind::Set,
                    expertise_capable: false,
                    sortable: true,
                },
                languages,
            )
    }

    fn advancement(config: TraitChoiceConfig) -> TraitChoiceAdvancement<MemoryRegistry> {
        TraitChoiceAdvancement::new(1, config, registry()).unwrap()
    }

    fn choice_config(pools: &[&[&str]], choice_mode: ChoiceMode) -> TraitChoiceConfig {
        TraitChoiceConfig {
            choices: pools
                .iter()
                .map(|pool| ChoiceSpec::new(keys(pool), 1))
                .collect(),
            choice_mode,
            ..TraitChoiceConfig::default()
        }
    }

    #[test]
    fn test_actor_selected_classifies_by_threshold() {
        let adv = advancement(choice_config(&[&["skills:acr", "skills:ath"]], ChoiceMode::Inclusive));
        let mut character = MemoryCharacter::new(registry());
        character.grant(&key("skills:acr"), Proficiency::Trained);
        character.grant(&key("skills:per"), Proficiency::Half);

        let actor = adv.actor_selected(&character);
        assert!(actor.selected.contains(&key("skills:acr")));
        assert!(actor.available.contains(&key("skills:ath")));
        // Half proficiency does not meet the default threshold
        assert!(actor.available.contains(&key("skills:per")));
    }

    #[test]
    fn test_expertise_threshold_requires_expert() {
        let config = TraitChoiceConfig {
            choices: vec![ChoiceSpec::new(keys(&["skills:acr", "skills:ath"]), 1)],
            mode: GrantMode::Expertise,
            ..TraitChoiceConfig::default()
        };
        let adv = advancement(config);
        let mut character = MemoryCharacter::new(registry());
        character.grant(&key("skills:acr"), Proficiency::Trained);
        character.grant(&key("skills:ath"), Proficiency::Expert);

        let actor = adv.actor_selected(&character);
        assert!(actor.available.contains(&key("skills:acr")));
        assert!(actor.selected.contains(&key("skills:ath")));
    }

    #[test]
    fn test_eligible_types_limited_outside_default_mode() {
        let config = TraitChoiceConfig {
            choices: vec![ChoiceSpec::new(keys(&["skills:acr", "tools:thieves"]), 1)],
            mode: GrantMode::Upgrade,
            ..TraitChoiceConfig::default()
        };
        let adv = advancement(config);
        let eligible = adv.eligible_types();
        assert!(eligible.contains("skills"));
        assert!(!eligible.contains("tools"), "tools are not expertise capable");
    }

    #[tokio::test]
    async fn test_smallest_pool_is_matched_first() {
        let config = choice_config(
            &[&["skills:acr", "skills:ath", "skills:per"], &["skills:acr"]],
            ChoiceMode::Inclusive,
        );
        let adv = advancement(config);
        let mut character = MemoryCharacter::new(registry());
        let diff = StateDiff {
            advancement: adv.id,
            levels: Levels::new(1, 1),
            selected: vec![key("skills:acr")],
            changes: Vec::new(),
        };
        character.commit(diff).await.unwrap();

        let unfulfilled = adv.unfulfilled_choices(&character);
        assert_eq!(unfulfilled.available.len(), 1);
        assert_eq!(
            unfulfilled.available[0].keys,
            keys(&["skills:ath", "skills:per"]),
            "the singleton pool absorbed the pick"
        );
    }

    #[test]
    fn test_wildcard_pool_expands_to_unheld_keys() {
        let adv = advancement(choice_config(&[&["skills:*"]], ChoiceMode::Inclusive));
        let mut character = MemoryCharacter::new(registry());
        character.grant(&key("skills:acr"), Proficiency::Trained);

        let unfulfilled = adv.unfulfilled_choices(&character);
        assert_eq!(unfulfilled.available.len(), 1);
        assert_eq!(
            unfulfilled.available[0].keys,
            keys(&["skills:ath", "skills:per", "skills:ste"])
        );
    }

    #[test]
    fn test_forced_category_remains_offerable() {
        let adv = advancement(choice_config(&[&["tools:artisan!"]], ChoiceMode::Inclusive));
        let character = MemoryCharacter::new(registry());

        let unfulfilled = adv.unfulfilled_choices(&character);
        assert_eq!(unfulfilled.available.len(), 1);
        let pool = &unfulfilled.available[0];
        assert!(pool.keys.contains(&key("tools:artisan!")));
        assert!(pool.keys.contains(&key("tools:artisan:smith")));
    }

    #[test]
    fn test_unknown_trait_type_exhausts_the_slot() {
        let adv = advancement(choice_config(&[&["saves:str"]], ChoiceMode::Inclusive));
        let character = MemoryCharacter::new(registry());

        let unfulfilled = adv.unfulfilled_choices(&character);
        assert!(unfulfilled.available.is_empty());
        assert_eq!(unfulfilled.exhausted, 1);
        assert!(matches!(
            adv.available_choices(&character),
            ChoicePrompt::NothingLeft { .. }
        ));
    }

    #[test]
    fn test_prompt_simplifies_multi_block_exclusive() {
        let config = choice_config(
            &[&["skills:acr", "skills:ath"], &["skills:per", "skills:ste"]],
            ChoiceMode::Exclusive,
        );
        let adv = advancement(config);
        let character = MemoryCharacter::new(registry());

        match adv.available_choices(&character) {
            ChoicePrompt::Choose {
                remaining,
                simplified,
                label,
                ..
            } => {
                assert_eq!(remaining, 2);
                assert!(simplified);
                assert_eq!(label, "Skills");
            }
            other => panic!("expected a prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_changes_per_mode() {
        let mut character = MemoryCharacter::new(registry());
        character.grant(&key("skills:ath"), Proficiency::Trained);

        let fresh = [key("skills:acr"), key("skills:ath"), key("languages:common")];

        let default_adv = advancement(TraitChoiceConfig::default());
        let changes = default_adv.changes(&character, &fresh);
        // Athletics is held from another source and untouched
        assert_eq!(
            changes,
            vec![
                PropertyChange::Upgrade {
                    path: "system.skills.acr.value".to_string(),
                    value: Proficiency::Trained,
                },
                PropertyChange::Add {
                    path: "system.traits.languages.value".to_string(),
                    member: "common".to_string(),
                },
            ]
        );

        let upgrade_adv = advancement(TraitChoiceConfig {
            mode: GrantMode::Upgrade,
            ..TraitChoiceConfig::default()
        });
        let changes = upgrade_adv.changes(&character, &fresh[..2]);
        assert_eq!(
            changes,
            vec![
                PropertyChange::Upgrade {
                    path: "system.skills.acr.value".to_string(),
                    value: Proficiency::Trained,
                },
                PropertyChange::Upgrade {
                    path: "system.skills.ath.value".to_string(),
                    value: Proficiency::Expert,
                },
            ]
        );

        let expertise_adv = advancement(TraitChoiceConfig {
            mode: GrantMode::Expertise,
            ..TraitChoiceConfig::default()
        });
        let changes = expertise_adv.changes(&character, &fresh[1..2]);
        assert_eq!(
            changes,
            vec![PropertyChange::Upgrade {
                path: "system.skills.ath.value".to_string(),
                value: Proficiency::Expert,
            }]
        );
    }
}
