//! Field dictionary: QC metric name → vocabulary term, datatype, and unit.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Datatype;
use crate::errors::CoreError;
use crate::normalize::normalize_key;

/// One row of the field-mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DictionaryEntry {
    /// Metric name exactly as the QC tool produces it.
    pub source_key: String,
    /// Vocabulary term (CURIE or absolute IRI) the metric maps to.
    pub target_term: String,
    pub datatype: Datatype,
    /// Physical unit annotation, if any.
    pub unit: Option<String>,
    pub description: Option<String>,
}

/// Lookup table keyed by normalized `source_key`.
///
/// Built once at startup and shared read-only across every subject.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: BTreeMap<String, DictionaryEntry>,
}

impl Dictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, rejecting a key that is already present after
    /// normalization. The existing entry is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateKey`] naming both source keys.
    pub fn try_insert(&mut self, entry: DictionaryEntry) -> Result<(), CoreError> {
        let key = normalize_key(&entry.source_key);
        if let Some(existing) = self.entries.get(&key) {
            return Err(CoreError::DuplicateKey {
                key: entry.source_key,
                existing: existing.source_key.clone(),
            });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Build a dictionary from entries, failing on the first duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateKey`] on a normalized-key collision.
    pub fn from_entries(
        entries: impl IntoIterator<Item = DictionaryEntry>,
    ) -> Result<Self, CoreError> {
        let mut dictionary = Self::new();
        for entry in entries {
            dictionary.try_insert(entry)?;
        }
        Ok(dictionary)
    }

    /// Look up a raw metric name (normalized before matching).
    #[must_use]
    pub fn lookup(&self, raw_key: &str) -> Option<&DictionaryEntry> {
        self.entries.get(&normalize_key(raw_key))
    }

    /// Look up an already-normalized key.
    #[must_use]
    pub fn get_normalized(&self, key: &str) -> Option<&DictionaryEntry> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in normalized-key order.
    pub fn entries(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.values()
    }
}
