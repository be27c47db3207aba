// src/services/catalog.rs

//! Content API client.
//!
//! Read-only wrappers around the NexusMods REST endpoints. Failures are
//! returned unchanged; retry policy belongs to the detectors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, Changelog, Game, Item, RecentUpdate, TrackedItem, UpdatePeriod};

/// Operations the detectors need from the content API.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Every game with its category table. Expensive.
    async fn list_categories(&self) -> Result<Vec<Game>>;

    /// Most recently added items of a domain.
    async fn list_latest_items(&self, domain: &str) -> Result<Vec<Item>>;

    /// Items the account follows, optionally restricted to one domain.
    async fn list_tracked_items(&self, domain: Option<&str>) -> Result<Vec<TrackedItem>>;

    /// Full detail for one item.
    async fn get_item(&self, domain: &str, id: u64) -> Result<Item>;

    /// Items whose files changed within `period`.
    async fn list_recently_updated(
        &self,
        domain: &str,
        period: UpdatePeriod,
    ) -> Result<Vec<RecentUpdate>>;

    /// Changelog of one item, in the service's order.
    async fn get_changelog(&self, domain: &str, id: u64) -> Result<Changelog>;
}

/// `CatalogClient` backed by the public NexusMods API.
pub struct NexusClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl NexusClient {
    /// Create a client authenticating with `api_key`.
    pub fn new(config: &ApiConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: api_root(&config.base_url)?,
            api_key: api_key.into(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.base_url.join(endpoint)?;
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(AppError::api(
                endpoint,
                status.as_u16(),
                error_message(&body),
            ));
        }

        serde_json::from_slice(&body).map_err(AppError::from)
    }
}

/// Parse the API root so relative endpoints join under its last segment.
fn api_root(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Pull `message` out of an API error body, falling back to the raw text.
fn error_message(body: &[u8]) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string())
}

#[async_trait]
impl CatalogClient for NexusClient {
    async fn list_categories(&self) -> Result<Vec<Game>> {
        self.get("games.json", &[("include_unapproved", "false")])
            .await
    }

    async fn list_latest_items(&self, domain: &str) -> Result<Vec<Item>> {
        self.get(&format!("games/{domain}/mods/latest_added.json"), &[])
            .await
    }

    async fn list_tracked_items(&self, domain: Option<&str>) -> Result<Vec<TrackedItem>> {
        let tracked: Vec<TrackedItem> = self.get("user/tracked_mods.json", &[]).await?;
        Ok(match domain {
            Some(domain) => tracked
                .into_iter()
                .filter(|t| t.domain_name == domain)
                .collect(),
            None => tracked,
        })
    }

    async fn get_item(&self, domain: &str, id: u64) -> Result<Item> {
        self.get(&format!("games/{domain}/mods/{id}.json"), &[])
            .await
    }

    async fn list_recently_updated(
        &self,
        domain: &str,
        period: UpdatePeriod,
    ) -> Result<Vec<RecentUpdate>> {
        self.get(
            &format!("games/{domain}/mods/updated.json"),
            &[("period", period.as_str())],
        )
        .await
    }

    async fn get_changelog(&self, domain: &str, id: u64) -> Result<Changelog> {
        self.get(&format!("games/{domain}/mods/{id}/changelogs.json"), &[])
            .await
    }
}
