// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Extension storage for the user config
//!
//! The storage area is a JSON object. The config lives under the `"config"`
//! key; an empty object means nothing has been saved yet, which is not the
//! same thing as a config that no longer parses. Other keys in the area are
//! left as they are.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::config::{Config, ConfigBuilder};

/// Storage failures
#[derive(Error, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigError {
    #[error("StorageError: The user has not allowed storage")]
    WontAllowStorage,
    #[error("StorageError: The storage is empty")]
    EmptyStorage,
    #[error("StorageError: The window context/storage context was not found")]
    StorageNotFound,
    #[error("StorageError: The config is corrupted")]
    CorruptedConfig,
}

/// Shape of the storage area on disk
#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<Config>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl StorageArea {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|_| ConfigError::CorruptedConfig)
    }

    fn into_config(self) -> Result<Config, ConfigError> {
        self.config.ok_or(ConfigError::EmptyStorage)
    }
}

/// Where the config is kept
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored config
    async fn get_config(&self) -> Result<Config, ConfigError>;

    /// Replace the stored config
    async fn set_config(&self, config: &Config) -> Result<(), ConfigError>;

    /// Forget the stored config; removing nothing is not an error
    async fn remove_config(&self) -> Result<(), ConfigError>;

    /// Merge `update` onto the stored config (or the default one) and save it
    async fn update_config(&self, update: ConfigBuilder) -> Result<Config, ConfigError> {
        let current = match self.get_config().await {
            Ok(config) => config,
            Err(ConfigError::EmptyStorage) => Config::default(),
            Err(e) => return Err(e),
        };
        let updated = update.apply(current);
        self.set_config(&updated).await?;
        Ok(updated)
    }
}

/// Save `update`, discarding a corrupted stored config first
///
/// Returns the saved config and whether a corrupted one was thrown away.
pub async fn save_or_start_over(
    store: &dyn ConfigStore,
    update: ConfigBuilder,
) -> Result<(Config, bool), ConfigError> {
    match store.update_config(update.clone()).await {
        Err(ConfigError::CorruptedConfig) => {
            tracing::warn!("stored config is corrupted, starting from scratch");
            store.remove_config().await?;
            let config = store.update_config(update).await?;
            Ok((config, true))
        }
        result => result.map(|config| (config, false)),
    }
}

/// JSON file backed storage area
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_area(&self) -> Result<Option<StorageArea>, ConfigError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => StorageArea::parse(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io_error(&e)),
        }
    }

    async fn write_area(&self, area: &StorageArea) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(area).map_err(|_| ConfigError::CorruptedConfig)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| map_io_error(&e))
    }
}

fn map_io_error(e: &std::io::Error) -> ConfigError {
    tracing::debug!(error = %e, "storage I/O failed");
    match e.kind() {
        ErrorKind::PermissionDenied => ConfigError::WontAllowStorage,
        _ => ConfigError::StorageNotFound,
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn get_config(&self) -> Result<Config, ConfigError> {
        self.read_area()
            .await?
            .ok_or(ConfigError::EmptyStorage)?
            .into_config()
    }

    async fn set_config(&self, config: &Config) -> Result<(), ConfigError> {
        // A corrupted config is overwritten
        let mut area = match self.read_area().await {
            Ok(area) => area.unwrap_or_default(),
            Err(ConfigError::CorruptedConfig) => StorageArea::default(),
            Err(e) => return Err(e),
        };
        area.config = Some(config.clone());
        self.write_area(&area).await?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    async fn remove_config(&self) -> Result<(), ConfigError> {
        // A corrupted area is still removable
        match self.read_area().await {
            Ok(None) => Ok(()),
            Ok(Some(mut area)) => {
                area.config = None;
                self.write_area(&area).await
            }
            Err(ConfigError::CorruptedConfig) => self.write_area(&StorageArea::default()).await,
            Err(e) => Err(e),
        }
    }
}

/// In-process storage area
#[derive(Debug, Default)]
pub struct MemoryStore {
    config: RwLock<Option<Config>>,
    failure: Option<ConfigError>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `config`
    pub fn with_config(config: Config) -> Self {
        Self {
            config: RwLock::new(Some(config)),
            failure: None,
        }
    }

    /// Store whose every operation fails with `error`
    pub fn failing(error: ConfigError) -> Self {
        Self {
            config: RwLock::new(None),
            failure: Some(error),
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get_config(&self) -> Result<Config, ConfigError> {
        self.check()?;
        self.config.read().clone().ok_or(ConfigError::EmptyStorage)
    }

    async fn set_config(&self, config: &Config) -> Result<(), ConfigError> {
        self.check()?;
        *self.config.write() = Some(config.clone());
        Ok(())
    }

    async fn remove_config(&self) -> Result<(), ConfigError> {
        self.check()?;
        *self.config.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileStore {
        FileStore::new(dir.path().join("storage.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.get_config().await, Err(ConfigError::EmptyStorage));
        assert_eq!(store.remove_config().await, Ok(()));
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let config = Config::new(22 * 60, 6 * 60);

        store.set_config(&config).await.unwrap();
        assert_eq!(store.get_config().await.unwrap(), config);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["config"]["block_time_start"], 1320);

        store.remove_config().await.unwrap();
        assert_eq!(store.get_config().await, Err(ConfigError::EmptyStorage));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap().trim(), "{}");
    }

    #[tokio::test]
    async fn test_empty_object_vs_corrupted() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        std::fs::write(store.path(), "{}").unwrap();
        assert_eq!(store.get_config().await, Err(ConfigError::EmptyStorage));

        std::fs::write(store.path(), r#"{"config": {"block_time_start": "nine"}}"#).unwrap();
        assert_eq!(store.get_config().await, Err(ConfigError::CorruptedConfig));

        store.remove_config().await.unwrap();
        assert_eq!(store.get_config().await, Err(ConfigError::EmptyStorage));
    }

    #[tokio::test]
    async fn test_other_keys_survive() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"theme": "dark", "visits": 3}"#).unwrap();

        store.set_config(&Config::new(60, 120)).await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert_eq!(raw["visits"], 3);
        assert_eq!(raw["config"]["block_time_end"], 120);

        store.remove_config().await.unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");
        assert!(raw.get("config").is_none());
        assert_eq!(store.get_config().await, Err(ConfigError::EmptyStorage));
    }

    #[tokio::test]
    async fn test_save_or_start_over() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"config": {"block_time_start": "nine"}}"#).unwrap();

        let update = ConfigBuilder::new().block_time_start(600).block_time_end(660);
        let (config, discarded) = save_or_start_over(&store, update.clone()).await.unwrap();
        assert!(discarded);
        assert_eq!(config, Config::new(600, 660));
        assert_eq!(store.get_config().await.unwrap(), config);

        let (_, discarded) = save_or_start_over(&store, update).await.unwrap();
        assert!(!discarded);
    }

    #[test]
    fn test_storage_not_found_message() {
        assert_eq!(
            ConfigError::StorageNotFound.to_string(),
            "StorageError: The window context/storage context was not found"
        );
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nope").join("storage.json"));
        assert_eq!(
            store.set_config(&Config::default()).await,
            Err(ConfigError::StorageNotFound)
        );
    }

    #[tokio::test]
    async fn test_update_config() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let created = store
            .update_config(ConfigBuilder::new().total_usage(1))
            .await
            .unwrap();
        assert_eq!(created, Config { total_usage: 1, ..Config::default() });

        let updated = store
            .update_config(ConfigBuilder::new().block_time_start(60).block_time_end(90))
            .await
            .unwrap();
        assert_eq!(updated.total_usage, 1);
        assert_eq!(store.get_config().await.unwrap(), updated);
    }

    #[test]
    fn test_memory_store() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            assert_eq!(store.get_config().await, Err(ConfigError::EmptyStorage));
            store.set_config(&Config::new(1, 2)).await.unwrap();
            assert_eq!(store.get_config().await.unwrap().block_time_end, 2);

            let denied = MemoryStore::failing(ConfigError::WontAllowStorage);
            assert_eq!(
                denied.update_config(ConfigBuilder::new()).await,
                Err(ConfigError::WontAllowStorage)
            );
        });
    }
}
