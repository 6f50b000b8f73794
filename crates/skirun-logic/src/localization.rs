//! Localized UI text.
//!
//! A `LocalizationDatabase` holds one `Language` per supported locale, each a
//! list of key/value entries. The `Localizer` tracks the active language and
//! answers lookups with a caller-supplied fallback. Widgets poll
//! [`Localizer::revision`] to know when to refresh.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationEntry {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<LocalizationEntry>,
}

impl Language {
    /// Key → text. Empty keys are skipped; a repeated key keeps its last value.
    pub fn build_map(&self) -> HashMap<String, String> {
        self.entries
            .iter()
            .filter(|e| !e.key.is_empty())
            .map(|e| (e.key.clone(), e.value.clone()))
            .collect()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationDatabase {
    pub languages: Vec<Language>,
    #[serde(default)]
    pub default_language: usize,
}

impl LocalizationDatabase {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sorted union of every non-empty key across languages.
    pub fn all_keys(&self) -> Vec<String> {
        let keys: BTreeSet<&str> = self
            .languages
            .iter()
            .flat_map(|l| l.entries.iter())
            .map(|e| e.key.as_str())
            .filter(|k| !k.is_empty())
            .collect();
        keys.into_iter().map(str::to_string).collect()
    }

    /// Keys some language lacks, as `(language name, key)` pairs.
    pub fn missing_keys(&self) -> Vec<(String, String)> {
        let all = self.all_keys();
        let mut missing = Vec::new();
        for lang in &self.languages {
            for key in &all {
                if !lang.has_key(key) {
                    missing.push((lang.name.clone(), key.clone()));
                }
            }
        }
        missing
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.languages.iter().position(|l| l.name == name)
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.languages.len().saturating_sub(1))
    }
}

/// Active-language lookup service.
#[derive(Debug, Clone)]
pub struct Localizer {
    database: LocalizationDatabase,
    current: usize,
    map: HashMap<String, String>,
    revision: u64,
}

impl Localizer {
    pub fn new(database: LocalizationDatabase) -> Self {
        let current = database.clamp_index(database.default_language);
        let mut localizer = Self {
            database,
            current,
            map: HashMap::new(),
            revision: 0,
        };
        localizer.rebuild();
        localizer
    }

    /// A localizer with no languages; every lookup returns its fallback.
    pub fn empty() -> Self {
        Self::new(LocalizationDatabase::default())
    }

    pub fn database(&self) -> &LocalizationDatabase {
        &self.database
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Language> {
        self.database.languages.get(self.current)
    }

    /// Switch language (index is clamped). Returns whether it changed.
    pub fn set_language(&mut self, index: usize) -> bool {
        if self.database.languages.is_empty() {
            return false;
        }
        let index = self.database.clamp_index(index);
        if index == self.current {
            return false;
        }
        self.current = index;
        self.rebuild();
        log::info!(
            "Language changed to '{}'",
            self.current().map_or("", |l| l.name.as_str())
        );
        true
    }

    pub fn get(&self, key: &str, fallback: &str) -> String {
        self.map
            .get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Bumped on every language change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn rebuild(&mut self) {
        self.map = self
            .current()
            .map(Language::build_map)
            .unwrap_or_default();
        self.revision += 1;
    }
}

/// A text widget bound to a localization key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub key: String,
    pub fallback: String,
}

impl LocalizedText {
    pub fn new(key: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fallback: fallback.into(),
        }
    }

    pub fn resolve(&self, localizer: &Localizer) -> String {
        if self.key.is_empty() {
            return self.fallback.clone();
        }
        localizer.get(&self.key, &self.fallback)
    }
}
