//! In-memory stand-ins for the content and chat APIs.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use nexus_notifier::error::{AppError, Result};
use nexus_notifier::models::{
    Category, Changelog, Game, Item, RecentUpdate, TrackedItem, UpdatePeriod,
};
use nexus_notifier::pipeline::WatchOptions;
use nexus_notifier::services::{CatalogClient, Destination, Notifier};

pub const SITE: &str = "https://nexusmods.com";

#[derive(Default)]
pub struct CatalogState {
    pub games: Vec<Game>,
    pub latest: Vec<Item>,
    pub tracked: Vec<TrackedItem>,
    pub items: HashMap<u64, Item>,
    pub updated: Vec<RecentUpdate>,
    pub changelogs: HashMap<u64, Changelog>,
    /// Ids whose detail request fails
    pub failing: HashSet<u64>,
    pub category_fetches: usize,
    pub detail_fetches: Vec<u64>,
}

#[derive(Default)]
pub struct FakeCatalog {
    state: Mutex<CatalogState>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        let catalog = Self::default();
        catalog.with(|s| s.games = games());
        catalog
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut CatalogState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn category_fetches(&self) -> usize {
        self.with(|s| s.category_fetches)
    }

    pub fn detail_fetches(&self) -> Vec<u64> {
        self.with(|s| s.detail_fetches.clone())
    }

    /// Register an item both as detail and (if `tracked`) in the tracked list.
    pub fn put_item(&self, item: Item, tracked: bool) {
        self.with(|s| {
            if tracked {
                s.tracked.push(TrackedItem {
                    mod_id: item.mod_id,
                    domain_name: item.domain_name.clone(),
                    is_adult: None,
                });
            }
            s.items.insert(item.mod_id, item);
        });
    }

    pub fn set_updated(&self, id: u64, timestamp: i64) {
        self.with(|s| {
            s.updated.retain(|u| u.mod_id != id);
            s.updated.push(RecentUpdate {
                mod_id: id,
                latest_file_update: timestamp,
            });
        });
    }

    pub fn set_version(&self, id: u64, version: &str) {
        self.with(|s| {
            if let Some(item) = s.items.get_mut(&id) {
                item.version = Some(version.to_string());
            }
        });
    }

    pub fn set_changelog(&self, id: u64, entries: &[(&str, &[&str])]) {
        let changelog = entries
            .iter()
            .map(|(version, lines)| {
                (
                    version.to_string(),
                    lines.iter().map(|l| l.to_string()).collect(),
                )
            })
            .collect();
        self.with(|s| {
            s.changelogs.insert(id, changelog);
        });
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn list_categories(&self) -> Result<Vec<Game>> {
        Ok(self.with(|s| {
            s.category_fetches += 1;
            s.games.clone()
        }))
    }

    async fn list_latest_items(&self, domain: &str) -> Result<Vec<Item>> {
        Ok(self.with(|s| {
            s.latest
                .iter()
                .filter(|i| i.domain_name == domain)
                .cloned()
                .collect()
        }))
    }

    async fn list_tracked_items(&self, domain: Option<&str>) -> Result<Vec<TrackedItem>> {
        Ok(self.with(|s| {
            s.tracked
                .iter()
                .filter(|t| domain.is_none_or(|d| t.domain_name == d))
                .cloned()
                .collect()
        }))
    }

    async fn get_item(&self, _domain: &str, id: u64) -> Result<Item> {
        self.with(|s| {
            s.detail_fetches.push(id);
            if s.failing.contains(&id) {
                return Err(AppError::api(format!("mods/{id}.json"), 500, "boom"));
            }
            s.items
                .get(&id)
                .cloned()
                .ok_or_else(|| AppError::api(format!("mods/{id}.json"), 404, "not found"))
        })
    }

    async fn list_recently_updated(
        &self,
        _domain: &str,
        _period: UpdatePeriod,
    ) -> Result<Vec<RecentUpdate>> {
        Ok(self.with(|s| s.updated.clone()))
    }

    async fn get_changelog(&self, _domain: &str, id: u64) -> Result<Changelog> {
        Ok(self.with(|s| s.changelogs.get(&id).cloned().unwrap_or_default()))
    }
}

/// Records every message; optionally refuses them all.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(Destination, String, bool)>>,
    refuse: AtomicBool,
}

impl RecordingNotifier {
    pub fn refusing() -> Self {
        Self {
            refuse: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn set_refusing(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text, _)| text.clone())
            .collect()
    }

    pub fn sent(&self) -> Vec<(Destination, String, bool)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(
        &self,
        destination: &Destination,
        text: &str,
        disable_preview: bool,
    ) -> Result<()> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(AppError::Notify("Bad Request: chat not found".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.clone(), text.to_string(), disable_preview));
        Ok(())
    }
}

pub fn item(id: u64, domain: &str) -> Item {
    Item {
        mod_id: id,
        name: Some(format!("Mod {id}")),
        author: Some("author".into()),
        version: Some("1.0".into()),
        category_id: Some(1),
        domain_name: domain.into(),
        available: true,
        contains_adult_content: false,
    }
}

pub fn games() -> Vec<Game> {
    vec![
        Game {
            domain_name: "starfield".into(),
            name: "Starfield".into(),
            categories: vec![
                Category {
                    category_id: 1,
                    name: "Gameplay".into(),
                },
                Category {
                    category_id: 2,
                    name: "User Interface".into(),
                },
            ],
        },
        Game {
            domain_name: "skyrim".into(),
            name: "Skyrim".into(),
            categories: vec![Category {
                category_id: 1,
                name: "Armour, Shields".into(),
            }],
        },
    ]
}

pub fn destination() -> Destination {
    Destination::new("-100123", Some("7".into()))
}

pub fn options(hide_adult: bool) -> WatchOptions {
    WatchOptions::new("starfield", hide_adult, SITE)
}
