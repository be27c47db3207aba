//! Shapes of the locally persisted state files.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::Item;

/// Identifiers already announced in additions mode. Persisted as a JSON array.
pub type SeenSet = BTreeSet<u64>;

/// Per-item snapshot used by updates mode. Persisted as an object keyed by id.
pub type TrackedItemCache = BTreeMap<u64, CacheEntry>;

/// Category names per domain. Persisted as `{domain: {category id: name}}`.
pub type CategoryTable = BTreeMap<String, CategoryNames>;

/// Category id to display name for one domain.
pub type CategoryNames = BTreeMap<u32, String>;

/// What updates mode remembers about a tracked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub version: Option<String>,

    #[serde(default)]
    pub is_adult: bool,

    pub latest_file_update: Option<i64>,
}

impl CacheEntry {
    pub fn from_item(item: &Item, latest_file_update: Option<i64>) -> Self {
        Self {
            version: item.version.clone(),
            is_adult: item.contains_adult_content,
            latest_file_update,
        }
    }
}
