//! Typed records returned by the content API.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A mod as returned by the latest-added and item-detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub mod_id: u64,

    /// Missing or null while the upload is still being processed
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Opaque version string, compared for equality only
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub category_id: Option<u32>,

    pub domain_name: String,

    /// False until the files can be downloaded
    #[serde(default)]
    pub available: bool,

    #[serde(default)]
    pub contains_adult_content: bool,
}

impl Item {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("N/A")
    }

    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or("N/A")
    }

    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("N/A")
    }
}

/// An entry of the authenticated account's tracked-mods list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub mod_id: u64,
    pub domain_name: String,

    /// Only present on some API revisions
    #[serde(default, alias = "contains_adult_content")]
    pub is_adult: Option<bool>,
}

/// An entry of the recently-updated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentUpdate {
    pub mod_id: u64,

    /// Unix timestamp of the newest file upload
    pub latest_file_update: i64,
}

/// A game (domain) from the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub domain_name: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: u32,
    pub name: String,
}

/// Change lines recorded for one version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub version: String,
    pub lines: Vec<String>,
}

/// Per-version change descriptions in the order the service returned them.
///
/// The wire format is a JSON object keyed by version; key order carries
/// meaning, so it is decoded into a list instead of a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changelog {
    pub entries: Vec<ChangelogEntry>,
}

impl Changelog {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn position(&self, version: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.version == version)
    }
}

impl FromIterator<(String, Vec<String>)> for Changelog {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(version, lines)| ChangelogEntry { version, lines })
                .collect(),
        }
    }
}

impl Serialize for Changelog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.version, &entry.lines)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Changelog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ChangelogVisitor;

        impl<'de> Visitor<'de> for ChangelogVisitor {
            type Value = Changelog;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping versions to lists of change lines")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Changelog, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((version, lines)) = access.next_entry::<String, Vec<String>>()? {
                    entries.push(ChangelogEntry { version, lines });
                }
                Ok(Changelog { entries })
            }

            // The API answers `[]` for mods without any changelog.
            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Changelog, A::Error> {
                if access.next_element::<serde::de::IgnoredAny>()?.is_some() {
                    return Err(serde::de::Error::custom(
                        "changelog list must be empty",
                    ));
                }
                Ok(Changelog::default())
            }
        }

        deserializer.deserialize_any(ChangelogVisitor)
    }
}
