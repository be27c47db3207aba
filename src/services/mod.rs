//! Service layer for the notifier.
//!
//! This module contains the collaborators the detectors talk to:
//! - Content API access (`CatalogClient`, `NexusClient`)
//! - Message delivery (`Notifier`, `TelegramNotifier`, `NullNotifier`)
//! - Category name lookup (`CategoryCache`)

mod catalog;
mod categories;
mod notifier;

pub use catalog::{CatalogClient, NexusClient};
pub use categories::{CategoryCache, UNKNOWN_CATEGORY};
pub use notifier::{Destination, Notifier, NullNotifier, TelegramNotifier};
