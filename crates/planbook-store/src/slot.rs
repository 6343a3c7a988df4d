//! Named durable slots backed by JSON files.
//!
//! Each slot is one file in the data directory. Writes go to a temporary
//! sibling file which is fsynced and then renamed over the slot, so a slot
//! is always either the previous value or the new one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::config::StoreConfig;

/// Handle to the directory of durable slots. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SlotStore {
    config: StoreConfig,
}

impl SlotStore {
    /// Open the store, creating the data directory if it does not exist.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| {
                format!(
                    "failed to create data directory {}",
                    config.data_dir.display()
                )
            })?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        self.config.data_dir()
    }

    fn path_for(&self, slot: &str) -> PathBuf {
        self.config.slot_path(slot)
    }

    /// Read and decode a slot. Returns `None` when the slot has never been
    /// written (or was erased).
    pub async fn read<T: DeserializeOwned>(&self, slot: &str) -> Result<Option<T>> {
        let path = self.path_for(slot);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read slot file {}", path.display()));
            }
        };

        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("slot {slot:?} at {} is corrupt", path.display()))?;
        Ok(Some(value))
    }

    /// Replace the whole content of a slot atomically.
    pub async fn write<T: Serialize + ?Sized>(&self, slot: &str, value: &T) -> Result<()> {
        let path = self.path_for(slot);
        let bytes = serde_json::to_vec_pretty(value)
            .with_context(|| format!("failed to serialize slot {slot:?}"))?;

        let tmp = self
            .data_dir()
            .join(format!(".{slot}.json.{}.tmp", Uuid::new_v4().simple()));

        let result = write_and_sync(&tmp, &bytes).await;
        if let Err(e) = result {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e).with_context(|| {
                format!("failed to move new slot content into {}", path.display())
            });
        }

        debug!(slot, bytes = bytes.len(), "slot written");
        Ok(())
    }

    /// Remove a slot. Erasing a slot that does not exist is not an error.
    pub async fn erase(&self, slot: &str) -> Result<()> {
        let path = self.path_for(slot);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(slot, "slot erased");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to erase slot file {}", path.display()))
            }
        }
    }
}

async fn write_and_sync(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    file.sync_all()
        .await
        .with_context(|| format!("failed to sync {}", path.display()))?;
    Ok(())
}
