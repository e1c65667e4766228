//! Author-time configuration for trait advancements

use crate::core::error::{AscendError, Result};
use crate::core::types::TraitKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn default_count() -> u32 {
    1
}

/// How a selection in one choice block affects overlapping siblings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceMode {
    /// A selection consumes only the first pool that offers it
    #[default]
    Inclusive,
    /// Choice blocks are substitutable alternatives; picking from one
    /// invalidates the sibling blocks
    Exclusive,
}

/// What level of proficiency a selection confers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantMode {
    #[default]
    Default,
    /// Grant proficiency, or step held proficiency up to expertise
    Upgrade,
    /// Grant expertise outright
    Expertise,
}

/// One player-facing choice: `count` independent picks from a shared pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceSpec {
    pub pool: BTreeSet<TraitKey>,
    #[serde(default = "default_count")]
    pub count: u32,
}

impl ChoiceSpec {
    pub fn new(pool: BTreeSet<TraitKey>, count: u32) -> Self {
        Self { pool, count }
    }
}

/// Immutable author data for one trait advancement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraitChoiceConfig {
    /// Custom name shown instead of the composed trait-type label
    pub title: Option<String>,
    /// Descriptive text shown in place of the automatic summary
    pub hint: Option<String>,
    /// Keys contributed unconditionally
    pub grants: BTreeSet<TraitKey>,
    pub choices: Vec<ChoiceSpec>,
    pub choice_mode: ChoiceMode,
    pub mode: GrantMode,
}

impl TraitChoiceConfig {
    /// Reject author data the resolution algorithm cannot honor
    pub fn validate(&self) -> Result<()> {
        for (index, choice) in self.choices.iter().enumerate() {
            if choice.count == 0 {
                return Err(AscendError::InvalidConfiguration(format!(
                    "choice {} has a zero count",
                    index
                )));
            }
            if choice.pool.is_empty() {
                return Err(AscendError::InvalidConfiguration(format!(
                    "choice {} has an empty pool",
                    index
                )));
            }
        }
        Ok(())
    }

    /// Trait types referenced by the grants or any pool
    pub fn referenced_types(&self) -> BTreeSet<String> {
        self.all_keys().map(|key| key.trait_type().to_string()).collect()
    }

    /// True when `key` can be reached from the grants or any pool,
    /// wildcard expansion included
    pub fn reaches(&self, key: &TraitKey) -> bool {
        self.all_keys().any(|configured| configured.covers(key))
    }

    /// Total number of grant and choice slots
    pub fn slot_count(&self) -> usize {
        self.grants.len()
            + self
                .choices
                .iter()
                .map(|choice| choice.count as usize)
                .sum::<usize>()
    }

    fn all_keys(&self) -> impl Iterator<Item = &TraitKey> {
        self.grants
            .iter()
            .chain(self.choices.iter().flat_map(|choice| choice.pool.iter()))
    }
}
