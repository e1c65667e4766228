//! Filterable, sortable tree of selectable keys

use crate::core::types::TraitKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn default_sorting() -> bool {
    true
}

/// One entry in a choice tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceNode {
    pub label: String,
    /// `None` marks a pure grouping node that cannot itself be picked.
    /// `Some(bool)` marks a selectable entry and whether it is currently
    /// chosen.
    #[serde(default)]
    pub chosen: Option<bool>,
    /// Entries flagged `false` are pinned ahead of sorted siblings
    #[serde(default = "default_sorting")]
    pub sorting: bool,
    #[serde(default)]
    pub children: Option<ChoiceSet>,
}

impl ChoiceNode {
    pub fn leaf(label: &str) -> Self {
        Self {
            label: label.to_string(),
            chosen: Some(false),
            sorting: true,
            children: None,
        }
    }

    /// Grouping node whose children are selectable but which cannot be
    /// picked itself
    pub fn category(label: &str, children: ChoiceSet) -> Self {
        Self {
            label: label.to_string(),
            chosen: None,
            sorting: true,
            children: Some(children),
        }
    }

    /// Category that may be picked in its own right in addition to its
    /// children
    pub fn selectable_category(label: &str, children: ChoiceSet) -> Self {
        Self {
            label: label.to_string(),
            chosen: Some(false),
            sorting: true,
            children: Some(children),
        }
    }

    pub fn pinned(mut self) -> Self {
        self.sorting = false;
        self
    }

    pub fn is_category(&self) -> bool {
        self.children.is_some()
    }
}

/// Ordered tree of selectable keys.
///
/// Entry order is insertion order until `sort` is called; `sorting:false`
/// entries keep their original position ahead of everything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceSet {
    entries: Vec<(TraitKey, ChoiceNode)>,
}

impl ChoiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(TraitKey, ChoiceNode)>) -> Self {
        let mut set = Self::new();
        for (key, node) in entries {
            set.insert(key, node);
        }
        set
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TraitKey, &ChoiceNode)> {
        self.entries.iter().map(|(k, n)| (k, n))
    }

    /// Insert or overwrite a top-level entry, preserving its position
    pub fn insert(&mut self, key: TraitKey, node: ChoiceNode) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = node,
            None => self.entries.push((key, node)),
        }
    }

    /// Flatten to the set of selectable keys. Categories contribute their
    /// children's keys and, when independently selectable, a forced
    /// marker for themselves.
    pub fn to_set(&self) -> BTreeSet<TraitKey> {
        let mut out = BTreeSet::new();
        for (key, node) in &self.entries {
            match &node.children {
                Some(children) => {
                    if node.chosen.is_some() {
                        out.insert(key.as_forced());
                    }
                    out.extend(children.to_set());
                }
                None => {
                    out.insert(key.clone());
                }
            }
        }
        out
    }

    /// Depth-first exact lookup
    pub fn get(&self, key: &TraitKey) -> Option<&ChoiceNode> {
        for (k, node) in &self.entries {
            if k == key {
                return Some(node);
            }
            if let Some(found) = node.children.as_ref().and_then(|c| c.get(key)) {
                return Some(found);
            }
        }
        None
    }

    pub fn get_mut(&mut self, key: &TraitKey) -> Option<&mut ChoiceNode> {
        for (k, node) in &mut self.entries {
            if k == key {
                return Some(node);
            }
            if let Some(children) = node.children.as_mut() {
                if let Some(found) = children.get_mut(key) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Depth-first lookup by trailing key segment
    pub fn find(&self, suffix: &str) -> Option<(&TraitKey, &ChoiceNode)> {
        for (k, node) in &self.entries {
            if k.last_segment() == suffix {
                return Some((k, node));
            }
            if let Some(found) = node.children.as_ref().and_then(|c| c.find(suffix)) {
                return Some(found);
            }
        }
        None
    }

    /// Shallow per-key overwrite with `other`'s top-level entries
    pub fn merge(&mut self, other: ChoiceSet) -> &mut Self {
        for (key, node) in other.entries {
            self.insert(key, node);
        }
        self
    }

    pub fn merged(mut self, other: ChoiceSet) -> Self {
        self.merge(other);
        self
    }

    /// Stable sort by label. Entries flagged `sorting:false` stay first in
    /// their original order; recurses into children.
    pub fn sort(&mut self) {
        let entries = std::mem::take(&mut self.entries);
        let (pinned, mut sortable): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|(_, node)| !node.sorting);
        sortable.sort_by(|a, b| a.1.label.cmp(&b.1.label));
        self.entries = pinned;
        self.entries.extend(sortable);
        for (_, node) in &mut self.entries {
            if let Some(children) = node.children.as_mut() {
                children.sort();
            }
        }
    }

    pub fn sorted(mut self) -> Self {
        self.sort();
        self
    }

    /// Keep only entries named by `keys`.
    ///
    /// An entry survives through its plain key, through the wildcard one
    /// level up, or through its forced-category marker. A category kept by
    /// plain key alone loses its children (the category itself was asked
    /// for, not its contents); a category named by neither survives only
    /// while recursive filtering leaves it children. An empty `keys` set
    /// therefore removes everything.
    pub fn filter(&mut self, keys: &BTreeSet<TraitKey>) -> &mut Self {
        self.entries.retain_mut(|(key, node)| {
            let wildcard = key
                .level_wildcard()
                .is_some_and(|w| keys.contains(&w));
            if keys.contains(key) && !wildcard {
                node.children = None;
                true
            } else if wildcard || keys.contains(&key.as_forced()) {
                true
            } else {
                if let Some(children) = node.children.as_mut() {
                    children.filter(keys);
                }
                let keep = node.children.as_ref().is_some_and(|c| !c.is_empty());
                if keep {
                    // Survives only as a path to its children; the
                    // category itself was not asked for
                    node.chosen = None;
                }
                keep
            }
        });
        self
    }

    pub fn filtered(mut self, keys: &BTreeSet<TraitKey>) -> Self {
        self.filter(keys);
        self
    }

    /// Recursively remove entries whose exact key is in `keys`. Wildcards
    /// in `keys` match nothing; a selectable category is addressed by its
    /// plain key or its forced marker.
    pub fn exclude(&mut self, keys: &BTreeSet<TraitKey>) -> &mut Self {
        self.entries.retain_mut(|(key, node)| {
            if keys.contains(key) {
                return false;
            }
            if node.chosen.is_some() && node.is_category() && keys.contains(&key.as_forced()) {
                return false;
            }
            if let Some(children) = node.children.as_mut() {
                children.exclude(keys);
            }
            true
        });
        self
    }

    pub fn excluded(mut self, keys: &BTreeSet<TraitKey>) -> Self {
        self.exclude(keys);
        self
    }
}

impl FromIterator<(TraitKey, ChoiceNode)> for ChoiceSet {
    fn from_iter<I: IntoIterator<Item = (TraitKey, ChoiceNode)>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}
