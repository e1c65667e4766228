//! Per-level advancement lifecycle shared by every variant
//!
//! An advancement starts Configured with author data, becomes Applied at
//! a level through `apply`, and returns to Unapplied through `reverse`;
//! there is no skip-state. Both operations compute one coalesced diff
//! and hand it to the character document, the only suspension point.

pub mod config;
pub mod trait_choice;
pub mod value;

pub use config::{ChoiceMode, ChoiceSpec, GrantMode, TraitChoiceConfig};
pub use trait_choice::{
    ActorSelected, ChoicePrompt, ResidualPool, TraitChoiceAdvancement, TraitSelection,
    Unfulfilled,
};
pub use value::TraitValue;

use crate::core::error::Result;
use crate::core::types::{AdvancementId, Levels};
use crate::document::CharacterDocument;

/// Options for `apply`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// First application at a level: unambiguous single-option choices
    /// resolve themselves instead of prompting
    pub initial: bool,
    /// Presentation hint passed through to the consumer; the engine does
    /// not act on it
    pub render: bool,
}

/// Options for `reverse`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseOptions {
    pub render: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCategory {
    Warning,
    Error,
}

/// Unresolved-configuration notice surfaced to the consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub key: String,
    pub category: WarningCategory,
    pub message: String,
}

/// Lifecycle contract every advancement variant implements, keyed by the
/// character/class level pair.
#[allow(async_fn_in_trait)]
pub trait Advancement<D: CharacterDocument> {
    /// Selection payload accepted by `apply`
    type ApplyData;
    /// Selection payload accepted by `reverse`
    type ReverseData;

    fn id(&self) -> AdvancementId;

    /// Level this advancement activates at
    fn level(&self) -> u8;

    /// True when no further player input is needed at `levels`
    fn configured_for_level(&self, document: &D, levels: Levels) -> bool;

    /// Commit a selection. Must merge with, never replace, a prior
    /// partial selection at the same level, and replaying identical data
    /// must change nothing.
    async fn apply(
        &self,
        document: &mut D,
        levels: Levels,
        data: Option<&Self::ApplyData>,
        options: ApplyOptions,
    ) -> Result<()>;

    /// Inverse of `apply`: with data, un-select one key; without, clear
    /// the level's whole contribution. Reversing nothing is a no-op.
    async fn reverse(
        &self,
        document: &mut D,
        levels: Levels,
        data: Option<&Self::ReverseData>,
        options: ReverseOptions,
    ) -> Result<()>;

    /// Stable ordering key for presentation lists
    fn sorting_value_for_level(&self, levels: Levels) -> String;

    fn title_for_level(&self, levels: Levels) -> String;

    /// One-line recap of what this advancement contributed at `levels`
    fn summary_for_level(&self, document: &D, levels: Levels) -> String;

    /// Identity under which warnings for `levels` are registered
    fn warning_key(&self, levels: Levels) -> String;

    /// Register a warning exactly when choices remain at `levels` and a
    /// human-readable description of them exists
    fn prepare_warnings(&self, document: &D, levels: Levels, warnings: &mut Vec<Warning>);
}
