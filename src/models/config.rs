//! Application configuration structures.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Content API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Chat-bot API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Locations of the persisted state files
    #[serde(default)]
    pub paths: PathsConfig,

    /// Poll intervals and failure tolerance
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        Url::parse(&self.api.base_url)?;
        Url::parse(&self.api.site_url)?;
        Url::parse(&self.telegram.base_url)?;
        if self.schedule.additions_interval_secs == 0 {
            return Err(AppError::validation(
                "schedule.additions_interval_secs must be > 0",
            ));
        }
        if self.schedule.updates_interval_secs == 0 {
            return Err(AppError::validation(
                "schedule.updates_interval_secs must be > 0",
            ));
        }
        Ok(())
    }

    /// Default poll interval for a detector mode.
    pub fn interval_for(&self, mode: Mode) -> Duration {
        let secs = match mode {
            Mode::Additions => self.schedule.additions_interval_secs,
            Mode::Updates => self.schedule.updates_interval_secs,
        };
        Duration::from_secs(secs)
    }
}

/// Content API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the versioned REST API; a trailing slash is added if missing
    #[serde(default = "defaults::api_base_url")]
    pub base_url: String,

    /// Public website used to build item links
    #[serde(default = "defaults::site_url")]
    pub site_url: String,

    /// User-Agent header for API requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Window queried for recently updated items
    #[serde(default)]
    pub updated_period: UpdatePeriod,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::api_base_url(),
            site_url: defaults::site_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            updated_period: UpdatePeriod::default(),
        }
    }
}

/// Chat-bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "defaults::telegram_base_url")]
    pub base_url: String,

    /// Suppress link previews on the "now tracking" digest
    #[serde(default = "defaults::enabled")]
    pub disable_preview_for_new_tracked: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::telegram_base_url(),
            disable_preview_for_new_tracked: true,
        }
    }
}

/// Locations of the persisted state files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Identifiers already announced in additions mode
    #[serde(default = "defaults::seen_items")]
    pub seen_items: PathBuf,

    /// Per-item version cache for updates mode
    #[serde(default = "defaults::update_cache")]
    pub update_cache: PathBuf,

    /// Category names per game domain
    #[serde(default = "defaults::categories")]
    pub categories: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            seen_items: defaults::seen_items(),
            update_cache: defaults::update_cache(),
            categories: defaults::categories(),
        }
    }
}

/// Poll intervals and failure tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "defaults::additions_interval")]
    pub additions_interval_secs: u64,

    #[serde(default = "defaults::updates_interval")]
    pub updates_interval_secs: u64,

    /// Consecutive failed update cycles tolerated before giving up (0 = never)
    #[serde(default)]
    pub max_consecutive_failures: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            additions_interval_secs: defaults::additions_interval(),
            updates_interval_secs: defaults::updates_interval(),
            max_consecutive_failures: 0,
        }
    }
}

/// Which detector to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Additions,
    Updates,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Additions => "additions",
            Mode::Updates => "updates",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trailing window accepted by the recently-updated endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdatePeriod {
    #[serde(rename = "1d")]
    Day,
    #[default]
    #[serde(rename = "1w")]
    Week,
    #[serde(rename = "1m")]
    Month,
}

impl UpdatePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatePeriod::Day => "1d",
            UpdatePeriod::Week => "1w",
            UpdatePeriod::Month => "1m",
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // API defaults
    pub fn api_base_url() -> String {
        "https://api.nexusmods.com/v1/".into()
    }
    pub fn site_url() -> String {
        "https://nexusmods.com".into()
    }
    pub fn user_agent() -> String {
        "NexusMods Notifier/0.2.0 (+https://github.com/Nachtalb/nexusmods-notifier)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Telegram defaults
    pub fn telegram_base_url() -> String {
        "https://api.telegram.org".into()
    }
    pub fn enabled() -> bool {
        true
    }

    // State file defaults
    pub fn seen_items() -> PathBuf {
        "seen_mods.json".into()
    }
    pub fn update_cache() -> PathBuf {
        "update_cache.json".into()
    }
    pub fn categories() -> PathBuf {
        "game_categories.json".into()
    }

    // Schedule defaults
    pub fn additions_interval() -> u64 {
        300
    }
    pub fn updates_interval() -> u64 {
        3600
    }
}
