//! Selection of the changelog entries a version bump introduced.

use crate::models::{Changelog, ChangelogEntry};

/// Entries published after `old_version`, in the changelog's own order.
///
/// When `old_version` is not listed only the last entry is returned. An empty
/// changelog yields nothing.
pub fn versions_after<'a>(changelog: &'a Changelog, old_version: &str) -> &'a [ChangelogEntry] {
    let start = match changelog.position(old_version) {
        Some(index) => index + 1,
        None => changelog.len().saturating_sub(1),
    };
    &changelog.entries[start..]
}
