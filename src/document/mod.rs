//! Character document seam: snapshot reads and diff commits
//!
//! The engine reads the character's cross-source proficiency snapshot
//! through this interface and writes only by proposing a coalesced diff.
//! Committing that diff is the single suspension point in the engine.

pub mod memory;

pub use memory::MemoryCharacter;

use crate::advancement::value::TraitValue;
use crate::core::error::Result;
use crate::core::types::{AdvancementId, Levels, Proficiency, TraitKey};
use serde::{Deserialize, Serialize};

/// One concrete mutation of character state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PropertyChange {
    /// Add a member to a set-typed property
    Add { path: String, member: String },
    /// Remove a member from a set-typed property
    Remove { path: String, member: String },
    /// Assign a scalar proficiency multiplier
    Upgrade { path: String, value: Proficiency },
}

/// Coalesced outcome of one apply or reverse call. Either the whole diff
/// lands or none of it does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDiff {
    pub advancement: AdvancementId,
    pub levels: Levels,
    /// Replacement selection for the advancement's value; empty clears it
    pub selected: Vec<TraitKey>,
    pub changes: Vec<PropertyChange>,
}

/// Read/commit interface to the owning character document.
///
/// Reads are synchronous and safe to repeat from re-render loops. The
/// engine performs no retries; a failed commit surfaces unmodified and
/// must leave the document untouched.
#[allow(async_fn_in_trait)]
pub trait CharacterDocument {
    /// Current multiplier held for a key, from any source. Forced
    /// category markers address the category's own entry.
    fn proficiency(&self, key: &TraitKey) -> Proficiency;

    /// Selection recorded for an advancement instance, if any
    fn value(&self, advancement: AdvancementId) -> Option<&TraitValue>;

    /// Atomically apply a diff
    async fn commit(&mut self, diff: StateDiff) -> Result<()>;
}
