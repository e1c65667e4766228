//! Core type definitions used throughout the codebase

use crate::core::error::{AscendError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for an advancement instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvancementId(pub Uuid);

impl AdvancementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AdvancementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AdvancementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Character/class level pair that keys every lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Levels {
    pub character: u8,
    pub class: u8,
}

impl Levels {
    pub fn new(character: u8, class: u8) -> Self {
        Self { character, class }
    }
}

/// Proficiency multiplier held for a single trait key.
///
/// The numeric wire values are 0, 0.5, 1 and 2, and the type serializes
/// as that number. Writes never go through this type directly; they
/// travel in the diff an advancement proposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Proficiency {
    #[default]
    Untrained,
    Half,
    Trained,
    Expert,
}

impl Proficiency {
    pub fn multiplier(&self) -> f32 {
        match self {
            Proficiency::Untrained => 0.0,
            Proficiency::Half => 0.5,
            Proficiency::Trained => 1.0,
            Proficiency::Expert => 2.0,
        }
    }

    pub fn from_multiplier(value: f32) -> Option<Self> {
        if value == 0.0 {
            Some(Proficiency::Untrained)
        } else if value == 0.5 {
            Some(Proficiency::Half)
        } else if value == 1.0 {
            Some(Proficiency::Trained)
        } else if value == 2.0 {
            Some(Proficiency::Expert)
        } else {
            None
        }
    }
}

impl Serialize for Proficiency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.multiplier())
    }
}

impl<'de> Deserialize<'de> for Proficiency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = f32::deserialize(deserializer)?;
        Proficiency::from_multiplier(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid proficiency multiplier {value}")))
    }
}

/// Wire shape of a trait key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyForm {
    /// Concrete entry or category addressed by its plain path
    Leaf,
    /// Everything beneath a path: `skills:*`, `tools:artisan:*`
    Wildcard,
    /// A category selectable in its own right: `tools:artisan!`
    Forced,
}

/// A selectable trait key.
///
/// Wire format is a colon-joined string whose first segment names the
/// trait type: `skills:acr`, `tools:artisan:smith`, `languages:*`,
/// `tools:artisan!`. Internally the wildcard and forced-category forms
/// are tagged explicitly so no caller has to sniff string suffixes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TraitKey {
    trait_type: String,
    segments: Vec<String>,
    form: KeyForm,
}

impl TraitKey {
    /// Plain key: a leaf entry, a category, or a bare trait type
    pub fn leaf(trait_type: &str, segments: &[&str]) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            segments: segments.iter().map(|s| s.to_string()).collect(),
            form: KeyForm::Leaf,
        }
    }

    /// Wildcard covering everything beneath `segments`
    pub fn wildcard(trait_type: &str, segments: &[&str]) -> Self {
        Self {
            trait_type: trait_type.to_string(),
            segments: segments.iter().map(|s| s.to_string()).collect(),
            form: KeyForm::Wildcard,
        }
    }

    /// Forced-category marker for an independently selectable category
    pub fn forced(trait_type: &str, segments: &[&str]) -> Self {
        debug_assert!(!segments.is_empty());
        Self {
            trait_type: trait_type.to_string(),
            segments: segments.iter().map(|s| s.to_string()).collect(),
            form: KeyForm::Forced,
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        raw.parse()
    }

    pub fn trait_type(&self) -> &str {
        &self.trait_type
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn form(&self) -> KeyForm {
        self.form
    }

    pub fn is_leaf(&self) -> bool {
        self.form == KeyForm::Leaf
    }

    pub fn is_wildcard(&self) -> bool {
        self.form == KeyForm::Wildcard
    }

    pub fn is_forced(&self) -> bool {
        self.form == KeyForm::Forced
    }

    /// Final path segment, or the trait type for bare type keys
    pub fn last_segment(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or(&self.trait_type)
    }

    /// True when this key matches `other`: exact equality, or wildcard
    /// containment of a plain/forced key beneath this key's path.
    pub fn covers(&self, other: &TraitKey) -> bool {
        if self == other {
            return true;
        }
        if self.form != KeyForm::Wildcard || other.form == KeyForm::Wildcard {
            return false;
        }
        self.trait_type == other.trait_type
            && other.segments.len() > self.segments.len()
            && other.segments.starts_with(&self.segments)
    }

    /// The wildcard one level up from this key (`tools:artisan:smith`
    /// yields `tools:artisan:*`). Bare type keys have no enclosing level.
    pub fn level_wildcard(&self) -> Option<TraitKey> {
        if self.segments.is_empty() {
            return None;
        }
        Some(TraitKey {
            trait_type: self.trait_type.clone(),
            segments: self.segments[..self.segments.len() - 1].to_vec(),
            form: KeyForm::Wildcard,
        })
    }

    /// Forced-marker form of this key
    pub fn as_forced(&self) -> TraitKey {
        TraitKey {
            trait_type: self.trait_type.clone(),
            segments: self.segments.clone(),
            form: KeyForm::Forced,
        }
    }

    /// Plain form of this key, dropping any wildcard or forced marker
    pub fn as_leaf(&self) -> TraitKey {
        TraitKey {
            trait_type: self.trait_type.clone(),
            segments: self.segments.clone(),
            form: KeyForm::Leaf,
        }
    }
}

impl FromStr for TraitKey {
    type Err = AscendError;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || AscendError::InvalidKey(raw.to_string());
        let mut parts: Vec<&str> = raw.split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(invalid());
        }

        let mut form = KeyForm::Leaf;
        if parts.last() == Some(&"*") {
            parts.pop();
            form = KeyForm::Wildcard;
            if parts.is_empty() {
                return Err(invalid());
            }
        } else if let Some(last) = parts.last().copied() {
            if let Some(stripped) = last.strip_suffix('!') {
                if stripped.is_empty() || parts.len() < 2 {
                    return Err(invalid());
                }
                *parts.last_mut().unwrap() = stripped;
                form = KeyForm::Forced;
            }
        }

        if parts.is_empty() || parts.iter().any(|p| p.contains('*') || p.contains('!')) {
            return Err(invalid());
        }

        Ok(TraitKey {
            trait_type: parts[0].to_string(),
            segments: parts[1..].iter().map(|s| s.to_string()).collect(),
            form,
        })
    }
}

impl fmt::Display for TraitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trait_type)?;
        for segment in &self.segments {
            write!(f, ":{}", segment)?;
        }
        match self.form {
            KeyForm::Leaf => Ok(()),
            KeyForm::Wildcard => write!(f, ":*"),
            KeyForm::Forced => write!(f, "!"),
        }
    }
}

impl Serialize for TraitKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TraitKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leaf_key() {
        let key: TraitKey = "skills:acr".parse().unwrap();
        assert_eq!(key.trait_type(), "skills");
        assert_eq!(key.segments(), ["acr"]);
        assert!(key.is_leaf());
        assert_eq!(key.to_string(), "skills:acr");
    }

    #[test]
    fn test_parse_wildcard_forms() {
        let type_wide: TraitKey = "languages:*".parse().unwrap();
        assert!(type_wide.is_wildcard());
        assert!(type_wide.segments().is_empty());

        let category: TraitKey = "tools:artisan:*".parse().unwrap();
        assert!(category.is_wildcard());
        assert_eq!(category.segments(), ["artisan"]);
        assert_eq!(category.to_string(), "tools:artisan:*");
    }

    #[test]
    fn test_parse_forced_category() {
        let key: TraitKey = "tools:artisan!".parse().unwrap();
        assert!(key.is_forced());
        assert_eq!(key.to_string(), "tools:artisan!");
        assert_eq!(key.as_leaf().to_string(), "tools:artisan");
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        for raw in ["", ":", "skills:", ":acr", "skills!", "sk*lls:acr", "skills:a!b"] {
            assert!(raw.parse::<TraitKey>().is_err(), "accepted '{}'", raw);
        }
    }

    #[test]
    fn test_wildcard_coverage() {
        let type_wide = TraitKey::wildcard("skills", &[]);
        let category = TraitKey::wildcard("tools", &["artisan"]);
        let leaf = TraitKey::leaf("skills", &["acr"]);
        let nested = TraitKey::leaf("tools", &["artisan", "smith"]);

        assert!(type_wide.covers(&leaf));
        assert!(!type_wide.covers(&nested));
        assert!(category.covers(&nested));
        assert!(!category.covers(&TraitKey::leaf("tools", &["artisan"])));
        assert!(!leaf.covers(&TraitKey::leaf("skills", &["ath"])));
        assert!(leaf.covers(&leaf.clone()));
    }

    #[test]
    fn test_level_wildcard() {
        let nested = TraitKey::leaf("tools", &["artisan", "smith"]);
        assert_eq!(nested.level_wildcard().unwrap().to_string(), "tools:artisan:*");

        let top = TraitKey::leaf("skills", &["acr"]);
        assert_eq!(top.level_wildcard().unwrap().to_string(), "skills:*");

        assert!(TraitKey::leaf("skills", &[]).level_wildcard().is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let key = TraitKey::wildcard("tools", &["artisan"]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"tools:artisan:*\"");
        let back: TraitKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_proficiency_serde_uses_multiplier() {
        assert_eq!(serde_json::to_string(&Proficiency::Half).unwrap(), "0.5");
        let back: Proficiency = serde_json::from_str("2.0").unwrap();
        assert_eq!(back, Proficiency::Expert);
        assert!(serde_json::from_str::<Proficiency>("1.5").is_err());
    }

    #[test]
    fn test_proficiency_ordering() {
        assert!(Proficiency::Expert > Proficiency::Trained);
        assert!(Proficiency::Trained > Proficiency::Half);
        assert!(Proficiency::Half > Proficiency::Untrained);
        assert_eq!(Proficiency::from_multiplier(0.5), Some(Proficiency::Half));
        assert_eq!(Proficiency::from_multiplier(1.5), None);
    }
}
