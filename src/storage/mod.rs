//! Persistence for detector state.
//!
//! Each detector owns its own JSON file. Nothing else writes to it, so
//! there is no locking, only atomic replacement.
//!
//! ```text
//! {working dir}/
//! ├── seen_mods.json          # additions: [mod_id, ...]
//! ├── update_cache.json       # updates: {mod_id: {version, is_adult, latest_file_update}}
//! └── game_categories.json    # {domain: {category_id: name}}
//! ```

pub mod local;

pub use local::{StateFile, load_json, save_json, write_atomic};
