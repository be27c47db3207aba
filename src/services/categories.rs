// src/services/categories.rs

//! Category name lookup, memoized in memory and on disk.
//!
//! The catalog endpoint returns every game at once, so a miss rebuilds the
//! table for all domains and persists it; later runs read the file instead.

use crate::error::{AppError, Result};
use crate::models::{CategoryNames, CategoryTable, Game};
use crate::services::CatalogClient;
use crate::storage::StateFile;

/// Display name used when an item references a category we don't know.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub struct CategoryCache {
    file: StateFile<CategoryTable>,
    table: Option<CategoryTable>,
    fetched: bool,
}

impl CategoryCache {
    pub fn new(file: StateFile<CategoryTable>) -> Self {
        Self {
            file,
            table: None,
            fetched: false,
        }
    }

    /// Category names for `domain`, fetching the full catalog on a miss.
    pub async fn categories_for(
        &mut self,
        catalog: &dyn CatalogClient,
        domain: &str,
    ) -> Result<&CategoryNames> {
        if self.table.is_none() {
            self.table = self.file.load().await?;
        }

        let cached = self
            .table
            .as_ref()
            .is_some_and(|table| table.contains_key(domain));

        if !cached && !self.fetched {
            log::info!("Fetching category catalog for '{}'...", domain);
            let games = catalog.list_categories().await?;
            let table = build_table(games);
            self.file.save(&table).await?;
            self.table = Some(table);
            self.fetched = true;
        }

        self.table
            .as_ref()
            .and_then(|table| table.get(domain))
            .ok_or_else(|| AppError::validation(format!("unknown game domain '{domain}'")))
    }

    /// Display name of one category, `Unknown` if it is not in the table.
    pub async fn name_for(
        &mut self,
        catalog: &dyn CatalogClient,
        domain: &str,
        category_id: Option<u32>,
    ) -> Result<String> {
        let names = self.categories_for(catalog, domain).await?;
        Ok(category_id
            .and_then(|id| names.get(&id))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()))
    }
}

fn build_table(games: Vec<Game>) -> CategoryTable {
    games
        .into_iter()
        .map(|game| {
            let names = game
                .categories
                .into_iter()
                .map(|c| (c.category_id, c.name))
                .collect();
            (game.domain_name, names)
        })
        .collect()
}
