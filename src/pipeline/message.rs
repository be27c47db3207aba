//! Telegram HTML bodies for each kind of notification.

use crate::models::{ChangelogEntry, Item};
use crate::utils::{escape_html, tagify};

/// Announcement of a newly added item.
pub fn addition(item: &Item, category: &str, link: &str) -> String {
    format!(
        "<b><a href=\"{link}\">{name}</a></b>\n{author} - Version {version}\n{tag}",
        name = escape_html(item.display_name()),
        author = escape_html(item.author_name()),
        version = escape_html(item.version_label()),
        tag = tagify(category),
    )
}

/// Announcement of a version bump with every skipped version's changes.
pub fn version_bump(
    item: &Item,
    category: &str,
    link: &str,
    old_version: &str,
    new_version: &str,
    changes: &[ChangelogEntry],
) -> String {
    format!(
        "<b><a href=\"{link}\">{name}</a></b>\n{author} - Version {old} -> {new}\n{tag}\n\nChangelog:\n{changes}",
        name = escape_html(item.display_name()),
        author = escape_html(item.author_name()),
        old = escape_html(old_version),
        new = escape_html(new_version),
        tag = tagify(category),
        changes = changelog_blocks(changes),
    )
}

/// Digest of items that started being tracked this cycle.
pub fn tracked_digest<'a>(items: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> String {
    let mut text = String::from("New mods found:\n");
    for (name, author, link) in items {
        text.push_str(&format!(
            "<a href=\"{link}\">{}</a> - {}\n",
            escape_html(name),
            escape_html(author)
        ));
    }
    text
}

fn changelog_blocks(changes: &[ChangelogEntry]) -> String {
    changes
        .iter()
        .map(|entry| {
            let lines: Vec<String> = entry.lines.iter().map(|l| escape_html(l)).collect();
            format!(
                "<b>{}</b>\n- {}",
                escape_html(&entry.version),
                lines.join("\n- ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
