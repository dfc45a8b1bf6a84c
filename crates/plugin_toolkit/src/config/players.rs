//! Per-player config files.

use dashmap::DashMap;
use serde_yaml::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use super::document::YamlDocument;
use crate::error::{ConfigError, ConfigResult};
use crate::logging::log_error_chain;
use crate::types::PlayerId;

/// Hands out one shared config handle per player.
///
/// Files live at `<data_dir>/data/<uuid>.yml`. The registry is concurrent;
/// two tasks asking for the same player get the same handle, so their edits
/// never race through separate in-memory copies.
pub struct PlayerConfigs {
    dir: PathBuf,
    handles: DashMap<PlayerId, PlayerConfig>,
}

impl PlayerConfigs {
    /// Creates the registry and its `data/` directory under the plugin's
    /// data folder.
    pub fn new(data_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let dir = data_dir.into().join("data");
        fs::create_dir_all(&dir).map_err(|source| ConfigError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            dir,
            handles: DashMap::new(),
        })
    }

    fn file_of(&self, player: PlayerId) -> PathBuf {
        self.dir.join(format!("{player}.yml"))
    }

    /// The player's config, opened (or created on disk) on first ask.
    pub fn get(&self, player: PlayerId) -> ConfigResult<PlayerConfig> {
        if let Some(handle) = self.handles.get(&player) {
            return Ok(handle.clone());
        }

        let path = self.file_of(player);
        let doc = YamlDocument::open(&path)?;
        if !path.exists() {
            doc.save()?;
            debug!("created player config {}", path.display());
        }

        let handle = PlayerConfig(Arc::new(Mutex::new(doc)));
        // Another task may have opened it in the meantime; the map wins.
        Ok(self
            .handles
            .entry(player)
            .or_insert(handle)
            .value()
            .clone())
    }

    /// Whether a config exists for the player, without creating one.
    pub fn exists(&self, player: PlayerId) -> bool {
        self.handles.contains_key(&player) || self.file_of(player).exists()
    }

    /// Deletes the player's file and drops the shared handle. Answers
    /// whether a file was actually removed.
    pub fn delete(&self, player: PlayerId) -> ConfigResult<bool> {
        self.handles.remove(&player);
        let path = self.file_of(player);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .map(|_| true)
            .map_err(|source| ConfigError::Write { path, source })
    }

    /// Deletes and immediately recreates an empty config.
    pub fn reset(&self, player: PlayerId) -> ConfigResult<PlayerConfig> {
        self.delete(player)?;
        self.get(player)
    }

    /// Saves every open handle, logging failures instead of aborting the
    /// batch. Answers how many saved cleanly.
    pub fn save_all(&self) -> usize {
        let mut saved = 0;
        for entry in self.handles.iter() {
            match entry.value().save() {
                Ok(()) => saved += 1,
                Err(err) => {
                    warn!("player config for {} failed to save", entry.key());
                    log_error_chain("player config save", &err);
                }
            }
        }
        saved
    }

    /// Open handles, e.g. to iterate at shutdown.
    pub fn open_count(&self) -> usize {
        self.handles.len()
    }
}

/// Shared handle to one player's document. Cloning is cheap; all clones
/// edit the same in-memory state.
#[derive(Clone)]
pub struct PlayerConfig(Arc<Mutex<YamlDocument>>);

impl PlayerConfig {
    fn lock(&self) -> MutexGuard<'_, YamlDocument> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.lock().get(path).cloned()
    }

    pub fn get_string(&self, path: &str) -> ConfigResult<Option<String>> {
        self.lock().get_string(path)
    }

    pub fn get_bool(&self, path: &str) -> ConfigResult<Option<bool>> {
        self.lock().get_bool(path)
    }

    pub fn get_i64(&self, path: &str) -> ConfigResult<Option<i64>> {
        self.lock().get_i64(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains(path)
    }

    pub fn set(&self, path: &str, value: impl Into<Value>) {
        self.lock().set(path, value);
    }

    pub fn remove(&self, path: &str) -> Option<Value> {
        self.lock().remove(path)
    }

    pub fn save(&self) -> ConfigResult<()> {
        self.lock().save()
    }

    pub fn reload(&self) -> ConfigResult<()> {
        self.lock().reload()
    }

    /// Runs a closure against the underlying document for anything the
    /// forwarding methods do not cover.
    pub fn with<T>(&self, f: impl FnOnce(&mut YamlDocument) -> T) -> T {
        f(&mut self.lock())
    }
}
