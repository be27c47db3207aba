// src/pipeline/additions.rs

//! Additions detector: announce items not seen before.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::Result;
use crate::models::{Item, SeenSet};
use crate::pipeline::report::{NewItemRow, print_summary};
use crate::pipeline::schedule::{self, Detector, RetryPolicy, RunMode};
use crate::pipeline::{WatchOptions, message};
use crate::services::{CatalogClient, CategoryCache, Destination, Notifier};
use crate::storage::StateFile;
use crate::utils::mod_link;

/// Outcome of one additions cycle.
#[derive(Debug, Default)]
pub struct AdditionsReport {
    /// Items announced this cycle
    pub new_items: Vec<NewItemRow>,
    /// Unseen items skipped because they are not downloadable yet
    pub unavailable: Vec<u64>,
    /// Adult items marked seen without an announcement
    pub hidden: Vec<u64>,
}

pub struct AdditionsDetector {
    catalog: Arc<dyn CatalogClient>,
    notifier: Arc<dyn Notifier>,
    destination: Destination,
    categories: CategoryCache,
    seen_file: StateFile<SeenSet>,
    options: WatchOptions,
}

impl AdditionsDetector {
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        notifier: Arc<dyn Notifier>,
        destination: Destination,
        categories: CategoryCache,
        seen_file: StateFile<SeenSet>,
        options: WatchOptions,
    ) -> Self {
        Self {
            catalog,
            notifier,
            destination,
            categories,
            seen_file,
            options,
        }
    }

    /// Run one cycle: fetch, announce unseen items, persist the seen set.
    ///
    /// Any failure is returned before the seen set is written, so the items
    /// of a failed cycle are offered again next time.
    pub async fn run_cycle(&mut self) -> Result<AdditionsReport> {
        let started = Utc::now();
        log::info!("Starting new mod check for '{}'...", self.options.domain);

        let mut seen = self.seen_file.load_or_default().await?;
        let mut items = self.catalog.list_latest_items(&self.options.domain).await?;
        items.sort_by_key(|item| item.mod_id);

        let mut report = AdditionsReport::default();
        for item in items {
            if seen.contains(&item.mod_id) {
                continue;
            }

            if !item.available {
                log::info!("Mod [id={}] not available yet, skipping...", item.mod_id);
                report.unavailable.push(item.mod_id);
                continue;
            }

            seen.insert(item.mod_id);

            if self.options.hide_adult && item.contains_adult_content {
                log::info!("Mod [id={}] contains adult content, skipping...", item.mod_id);
                report.hidden.push(item.mod_id);
                continue;
            }

            let row = self.announce(&item).await?;
            report.new_items.push(row);
        }

        print_summary("New mods found:", "No new mods found.", &report.new_items);

        self.seen_file.save(&seen).await?;
        log::debug!(
            "Additions check finished in {} ms ({} seen)",
            (Utc::now() - started).num_milliseconds(),
            seen.len()
        );

        Ok(report)
    }

    async fn announce(&mut self, item: &Item) -> Result<NewItemRow> {
        let category = self
            .categories
            .name_for(self.catalog.as_ref(), &item.domain_name, item.category_id)
            .await?;
        let link = mod_link(&self.options.site_url, &item.domain_name, item.mod_id);

        let text = message::addition(item, &category, &link);
        self.notifier
            .send_message(&self.destination, &text, false)
            .await?;

        Ok(NewItemRow {
            id: item.mod_id,
            author: item.author_name().to_string(),
            name: item.display_name().to_string(),
            category,
            link,
        })
    }
}

#[async_trait]
impl Detector for AdditionsDetector {
    fn label(&self) -> &'static str {
        "Additions"
    }

    async fn poll(&mut self) -> Result<()> {
        self.run_cycle().await.map(|_| ())
    }
}

/// Run the additions detector until stopped (or once). The first error ends the run.
pub async fn run_additions(detector: &mut AdditionsDetector, mode: RunMode) -> Result<()> {
    schedule::run(detector, mode, RetryPolicy::Propagate).await
}
