//! Load trait-type definitions and option trees from TOML content files

use crate::choices::{ChoiceNode, ChoiceSet};
use crate::core::error::{AscendError, Result};
use crate::core::types::TraitKey;
use crate::registry::{MemoryRegistry, StorageKind, TraitTypeDef};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(rename = "trait_type", default)]
    trait_types: Vec<TraitTypeSection>,
}

#[derive(Debug, Deserialize)]
struct TraitTypeSection {
    id: String,
    label: String,
    storage: StorageKind,
    storage_path: String,
    #[serde(default)]
    expertise_capable: bool,
    #[serde(default = "default_true")]
    sortable: bool,
    #[serde(default)]
    entries: BTreeMap<String, EntrySection>,
}

#[derive(Debug, Deserialize)]
struct EntrySection {
    label: String,
    /// Category that may be picked in its own right
    #[serde(default)]
    selectable: bool,
    #[serde(default)]
    sorting: Option<bool>,
    #[serde(default)]
    children: BTreeMap<String, EntrySection>,
}

/// Load a registry from a single TOML file
pub fn load_registry(path: &Path) -> Result<MemoryRegistry> {
    let content = fs::read_to_string(path)?;
    parse_registry(&content)
}

/// Parse registry content already read from disk
pub fn parse_registry(content: &str) -> Result<MemoryRegistry> {
    let file: RegistryFile = toml::from_str(content)?;
    let mut registry = MemoryRegistry::new();

    for section in file.trait_types {
        if section.id.is_empty() || !valid_segment(&section.id) {
            return Err(AscendError::InvalidConfiguration(format!(
                "invalid trait type id '{}'",
                section.id
            )));
        }
        if registry.trait_types().any(|def| def.id == section.id) {
            return Err(AscendError::InvalidConfiguration(format!(
                "duplicate trait type '{}'",
                section.id
            )));
        }

        let tree = build_tree(&section.id, &[], &section.entries, section.sortable)?;
        registry.insert(
            TraitTypeDef {
                id: section.id,
                label: section.label,
                storage_path: section.storage_path,
                storage: section.storage,
                expertise_capable: section.expertise_capable,
                sortable: section.sortable,
            },
            tree,
        );
    }

    tracing::debug!(types = registry.trait_types().count(), "parsed trait registry");
    Ok(registry)
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains([':', '*', '!'])
}

fn build_tree(
    trait_type: &str,
    prefix: &[&str],
    entries: &BTreeMap<String, EntrySection>,
    sortable: bool,
) -> Result<ChoiceSet> {
    let mut tree = ChoiceSet::new();
    for (segment, entry) in entries {
        if !valid_segment(segment) {
            return Err(AscendError::InvalidConfiguration(format!(
                "invalid entry segment '{}' under '{}'",
                segment, trait_type
            )));
        }
        let mut path = prefix.to_vec();
        path.push(segment.as_str());
        let key = TraitKey::leaf(trait_type, &path);

        let mut node = if entry.children.is_empty() {
            ChoiceNode::leaf(&entry.label)
        } else {
            let children = build_tree(trait_type, &path, &entry.children, sortable)?;
            if entry.selectable {
                ChoiceNode::selectable_category(&entry.label, children)
            } else {
                ChoiceNode::category(&entry.label, children)
            }
        };
        node.sorting = entry.sorting.unwrap_or(sortable);
        tree.insert(key, node);
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TraitRegistry;

    const SAMPLE: &str = r#"
[[trait_type]]
id = "skills"
label = "Skills"
storage = "multiplier"
storage_path = "system.skills"
expertise_capable = true

[trait_type.entries.acr]
label = "Acrobatics"

[trait_type.entries.ath]
label = "Athletics"

[[trait_type]]
id = "tools"
label = "Tools"
storage = "multiplier"
storage_path = "system.tools"
sortable = false

[trait_type.entries.artisan]
label = "Artisan's Tools"
selectable = true

[trait_type.entries.artisan.children.smith]
label = "Smith's Tools"

[trait_type.entries.artisan.children.brewer]
label = "Brewer's Supplies"

[[trait_type]]
id = "languages"
label = "Languages"
storage = "set"
storage_path = "system.traits.languages"
"#;

    #[test]
    fn test_parse_sample_registry() {
        let registry = parse_registry(SAMPLE).unwrap();

        let skills = registry.trait_type("skills").unwrap();
        assert!(skills.expertise_capable);
        assert_eq!(skills.storage, StorageKind::Multiplier);

        let languages = registry.trait_type("languages").unwrap();
        assert_eq!(languages.storage, StorageKind::Set);
        assert!(!languages.expertise_capable);

        let tree = registry.choices("tools");
        let artisan = tree.get(&TraitKey::leaf("tools", &["artisan"])).unwrap();
        assert!(artisan.chosen.is_some(), "selectable category");
        assert!(!artisan.sorting, "inherits the type's sort preference");
        assert!(tree.get(&TraitKey::leaf("tools", &["artisan", "smith"])).is_some());

        let flattened = registry.choices("tools").to_set();
        assert!(flattened.contains(&TraitKey::forced("tools", &["artisan"])));
    }

    #[test]
    fn test_parse_rejects_duplicate_type() {
        let content = r#"
[[trait_type]]
id = "skills"
label = "Skills"
storage = "multiplier"
storage_path = "system.skills"

[[trait_type]]
id = "skills"
label = "Skills Again"
storage = "multiplier"
storage_path = "system.skills"
"#;
        assert!(parse_registry(content).is_err());
    }

    #[test]
    fn test_parse_rejects_reserved_characters() {
        let content = r#"
[[trait_type]]
id = "skills"
label = "Skills"
storage = "multiplier"
storage_path = "system.skills"

[trait_type.entries."a:b"]
label = "Broken"
"#;
        assert!(parse_registry(content).is_err());
    }

    #[test]
    fn test_unknown_storage_kind_fails() {
        let content = r#"
[[trait_type]]
id = "skills"
label = "Skills"
storage = "counter"
storage_path = "system.skills"
"#;
        assert!(matches!(
            parse_registry(content),
            Err(AscendError::ContentError(_))
        ));
    }
}
