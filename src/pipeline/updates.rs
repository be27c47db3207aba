// src/pipeline/updates.rs

//! Updates detector: announce version bumps of tracked items.
//!
//! The recently-updated listing is the cheap change signal; item detail and
//! changelog are only fetched for ids whose file timestamp moved.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CacheEntry, Item, TrackedItem, TrackedItemCache, UpdatePeriod};
use crate::pipeline::report::{TrackedRow, UpdateRow, print_summary};
use crate::pipeline::schedule::{self, Detector, RetryPolicy, RunMode};
use crate::pipeline::{WatchOptions, changelog, message};
use crate::services::{CatalogClient, CategoryCache, Destination, Notifier};
use crate::storage::StateFile;
use crate::utils::mod_link;

/// Outcome of one updates cycle.
#[derive(Debug, Default)]
pub struct UpdatesReport {
    /// One row per newly published version
    pub updates: Vec<UpdateRow>,
    /// Items that started being tracked
    pub tracked: Vec<TrackedRow>,
}

pub struct UpdatesDetector {
    catalog: Arc<dyn CatalogClient>,
    notifier: Arc<dyn Notifier>,
    destination: Destination,
    categories: CategoryCache,
    cache_file: StateFile<TrackedItemCache>,
    cache: TrackedItemCache,
    options: WatchOptions,
    period: UpdatePeriod,
    digest_preview: bool,
}

impl UpdatesDetector {
    /// Create the detector, reading the persisted cache.
    pub async fn load(
        catalog: Arc<dyn CatalogClient>,
        notifier: Arc<dyn Notifier>,
        destination: Destination,
        categories: CategoryCache,
        cache_file: StateFile<TrackedItemCache>,
        options: WatchOptions,
    ) -> Result<Self> {
        let cache = cache_file.load_or_default().await?;
        log::debug!(
            "Loaded {} cached mods from {}",
            cache.len(),
            cache_file.path().display()
        );

        Ok(Self {
            catalog,
            notifier,
            destination,
            categories,
            cache_file,
            cache,
            options,
            period: UpdatePeriod::default(),
            digest_preview: false,
        })
    }

    /// Window queried for recently updated items.
    pub fn with_period(mut self, period: UpdatePeriod) -> Self {
        self.period = period;
        self
    }

    /// Show link previews on the "now tracking" digest.
    pub fn with_digest_preview(mut self, enabled: bool) -> Self {
        self.digest_preview = enabled;
        self
    }

    pub fn cache(&self) -> &TrackedItemCache {
        &self.cache
    }

    /// Seed the cache from the tracked list when it is empty.
    ///
    /// Sends nothing; returns how many items were recorded.
    pub async fn bootstrap(&mut self) -> Result<usize> {
        if !self.cache.is_empty() {
            return Ok(0);
        }

        log::info!("Fetching initial list of tracked mods...");
        let updated = self.recent_updates().await?;
        let tracked = self
            .catalog
            .list_tracked_items(Some(&self.options.domain))
            .await?;
        let ids: BTreeSet<u64> = tracked.iter().map(|t| t.mod_id).collect();

        for id in ids {
            let item = self.catalog.get_item(&self.options.domain, id).await?;
            self.cache
                .insert(id, CacheEntry::from_item(&item, updated.get(&id).copied()));
        }

        self.cache_file.save(&self.cache).await?;
        log::info!(
            "Initial population of tracked mods complete ({} mods).",
            self.cache.len()
        );
        Ok(self.cache.len())
    }

    /// Run one cycle. The cache is written even when the scan fails part way.
    ///
    /// Newly tracked mods found before a failure are still announced. If the
    /// digest cannot be sent they are left out of the cache, so the next
    /// cycle picks them up again.
    pub async fn run_cycle(&mut self) -> Result<UpdatesReport> {
        log::info!("Starting update check for '{}'...", self.options.domain);

        let mut report = UpdatesReport::default();
        let scanned = self.scan(&mut report).await;

        let digest = self.send_tracked_digest(&report.tracked).await;
        if let Err(e) = &digest {
            log::warn!("Tracked digest not sent, will retry next cycle: {}", e);
            for row in &report.tracked {
                self.cache.remove(&row.id);
            }
        }
        self.cache_file.save(&self.cache).await?;

        if !report.tracked.is_empty() {
            print_summary("Now tracking:", "", &report.tracked);
        }
        print_summary("Updated mods:", "No updated mods found.", &report.updates);

        scanned.and(digest).map(|()| report)
    }

    async fn scan(&mut self, report: &mut UpdatesReport) -> Result<()> {
        let updated = self.recent_updates().await?;
        let tracked = self
            .catalog
            .list_tracked_items(Some(&self.options.domain))
            .await?;

        let ids: BTreeSet<u64> = tracked
            .iter()
            .filter(|t| !(self.options.hide_adult && self.is_adult(t)))
            .map(|t| t.mod_id)
            .collect();

        for id in ids {
            let latest = updated.get(&id).copied();

            let Some(entry) = self.cache.get(&id) else {
                self.track_new(id, latest, report).await?;
                continue;
            };

            if latest.is_none() || latest == entry.latest_file_update {
                continue;
            }

            let old_version = entry.version.clone();
            let item = self.catalog.get_item(&self.options.domain, id).await?;

            if let (Some(old), Some(new)) = (old_version.as_deref(), item.version.as_deref()) {
                if old != new {
                    self.announce_bump(&item, old, new, report).await?;
                }
            }

            self.cache.insert(id, CacheEntry::from_item(&item, latest));
        }

        Ok(())
    }

    async fn track_new(
        &mut self,
        id: u64,
        latest: Option<i64>,
        report: &mut UpdatesReport,
    ) -> Result<()> {
        log::info!("Tracking new mod [id={}], fetching...", id);
        let item = self.catalog.get_item(&self.options.domain, id).await?;
        self.cache.insert(id, CacheEntry::from_item(&item, latest));

        if self.options.hide_adult && item.contains_adult_content {
            log::info!("Mod [id={}] contains adult content, not announcing", id);
            return Ok(());
        }

        report.tracked.push(TrackedRow {
            id,
            author: item.author_name().to_string(),
            name: item.display_name().to_string(),
            link: mod_link(&self.options.site_url, &self.options.domain, id),
        });
        Ok(())
    }

    async fn announce_bump(
        &mut self,
        item: &Item,
        old_version: &str,
        new_version: &str,
        report: &mut UpdatesReport,
    ) -> Result<()> {
        log::info!(
            "Mod [id={}] has been updated from {} to {}",
            item.mod_id,
            old_version,
            new_version
        );

        let changelog = self
            .catalog
            .get_changelog(&self.options.domain, item.mod_id)
            .await?;
        let changes = changelog::versions_after(&changelog, old_version);

        let category = self
            .categories
            .name_for(self.catalog.as_ref(), &item.domain_name, item.category_id)
            .await?;
        let link = mod_link(&self.options.site_url, &item.domain_name, item.mod_id);

        let text = message::version_bump(item, &category, &link, old_version, new_version, changes);
        self.notifier
            .send_message(&self.destination, &text, false)
            .await?;

        report.updates.extend(changes.iter().map(|entry| UpdateRow {
            id: item.mod_id,
            author: item.author_name().to_string(),
            name: item.display_name().to_string(),
            category: category.clone(),
            link: link.clone(),
            old_version: old_version.to_string(),
            new_version: entry.version.clone(),
        }));
        Ok(())
    }

    async fn send_tracked_digest(&self, rows: &[TrackedRow]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let text = message::tracked_digest(
            rows.iter()
                .map(|r| (r.name.as_str(), r.author.as_str(), r.link.as_str())),
        );
        self.notifier
            .send_message(&self.destination, &text, !self.digest_preview)
            .await
    }

    async fn recent_updates(&self) -> Result<HashMap<u64, i64>> {
        let updated = self
            .catalog
            .list_recently_updated(&self.options.domain, self.period)
            .await?;
        Ok(updated
            .into_iter()
            .map(|u| (u.mod_id, u.latest_file_update))
            .collect())
    }

    /// Adult flag from the tracked listing, else from the cache.
    fn is_adult(&self, tracked: &TrackedItem) -> bool {
        tracked
            .is_adult
            .or_else(|| self.cache.get(&tracked.mod_id).map(|e| e.is_adult))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Detector for UpdatesDetector {
    fn label(&self) -> &'static str {
        "Updates"
    }

    async fn poll(&mut self) -> Result<()> {
        self.run_cycle().await.map(|_| ())
    }
}

/// Bootstrap the cache if needed, then run the updates detector until stopped
/// (or once). Failed cycles are logged and retried on the next interval.
pub async fn run_updates(
    detector: &mut UpdatesDetector,
    mode: RunMode,
    max_consecutive_failures: u32,
) -> Result<()> {
    detector.bootstrap().await?;
    schedule::run(
        detector,
        mode,
        RetryPolicy::continue_up_to(max_consecutive_failures),
    )
    .await
}
