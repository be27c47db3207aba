// src/models/mod.rs

//! Domain models for the notifier.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod item;
mod state;

// Re-export all public types
pub use config::{
    ApiConfig, Config, Mode, PathsConfig, ScheduleConfig, TelegramConfig, UpdatePeriod,
};
pub use item::{Category, Changelog, ChangelogEntry, Game, Item, RecentUpdate, TrackedItem};
pub use state::{CacheEntry, CategoryNames, CategoryTable, SeenSet, TrackedItemCache};
