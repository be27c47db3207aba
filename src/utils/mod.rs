//! Utility functions and helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Characters between space and `/` in ASCII order.
static TAG_SEPARATORS: LazyLock<Regex> =
    // constant pattern
    LazyLock::new(|| Regex::new(r"[ -/]").expect("tag separator pattern is valid"));

/// Public page of an item.
pub fn mod_link(site_url: &str, domain: &str, mod_id: u64) -> String {
    format!(
        "{}/{}/mods/{}",
        site_url.trim_end_matches('/'),
        domain,
        mod_id
    )
}

/// Turn a category name into a chat hashtag: `Models and Textures` -> `#models_and_textures`.
pub fn tagify(text: &str) -> String {
    let without_commas = text.replace(',', "");
    format!(
        "#{}",
        TAG_SEPARATORS
            .replace_all(&without_commas, "_")
            .to_lowercase()
    )
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
