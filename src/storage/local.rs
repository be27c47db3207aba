//! Local filesystem storage implementation.
//!
//! Every write goes to a sibling temp file which is flushed, synced and then
//! renamed over the target, so a reader only ever sees the previous complete
//! document or the new one.

use std::ffi::OsString;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// A JSON document on disk holding one value of type `T`.
#[derive(Debug, Clone)]
pub struct StateFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the value, `None` if the file does not exist.
    pub async fn load(&self) -> Result<Option<T>> {
        load_json(&self.path).await
    }

    /// Load the value, falling back to `T::default()` if the file does not exist.
    pub async fn load_or_default(&self) -> Result<T> {
        Ok(self.load().await?.unwrap_or_default())
    }

    /// Replace the file contents with `value`.
    pub async fn save(&self, value: &T) -> Result<()> {
        save_json(&self.path, value).await
    }
}

/// Read and decode a JSON file, returning None if it doesn't exist.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AppError::Io(e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| AppError::decode(path, e))
}

/// Encode a value as JSON and write it atomically.
pub async fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    write_atomic(path, &bytes).await
}

/// Write bytes atomically (write to temp, then rename).
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = temp_path(path);
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// `seen_mods.json` -> `seen_mods.json.tmp`, next to the target.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("state"));
    name.push(".tmp");
    path.with_file_name(name)
}
