//! Hierarchical containers of selectable trait keys
//!
//! A `ChoiceSet` is the universe a chooser picks from: an ordered tree of
//! keyed entries that can be flattened, merged, sorted, filtered down to a
//! pool, or punched full of holes by exclusion. Instances are value
//! objects; every operation comes in a mutating and a consuming variant.

pub mod select;

pub use select::{ChoiceNode, ChoiceSet};
