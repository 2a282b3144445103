use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use crate::settings::types::BridgeConfig;

/// Config file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistent bridge configuration backed by a JSON file.
pub struct ConfigStore {
    path: PathBuf,
    data: Mutex<BridgeConfig>,
}

impl ConfigStore {
    /// Create a store, loading from disk if the file exists.
    ///
    /// An unreadable or invalid file is logged and replaced by defaults in
    /// memory; the file itself is left alone until the next `save`.
    pub fn new(path: PathBuf) -> Self {
        let data = Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config from {}: {e}", path.display());
            BridgeConfig::default()
        });
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    /// Load config from a JSON file, returning defaults on missing file.
    pub fn load(path: &Path) -> Result<BridgeConfig, ConfigError> {
        if !path.exists() {
            return Ok(BridgeConfig::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save current config to disk atomically (write .tmp then rename).
    pub fn save(&self) -> Result<(), ConfigError> {
        let data = self.data.lock().clone();
        let json = serde_json::to_string_pretty(&data)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory config.
    pub fn get(&self) -> BridgeConfig {
        self.data.lock().clone()
    }

    /// Mutate the in-memory config. Call [`save`](Self::save) to persist.
    pub fn update(&self, f: impl FnOnce(&mut BridgeConfig)) {
        f(&mut self.data.lock());
    }

    /// Restore defaults in memory.
    pub fn reset(&self) {
        *self.data.lock() = BridgeConfig::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ProcessingMode;
    use tempfile::TempDir;

    /// Helper: create a store backed by a temp directory.
    fn temp_store() -> (ConfigStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edge-viewer.json");
        let store = ConfigStore::new(path);
        (store, dir)
    }

    #[test]
    fn load_returns_default_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nonexistent.json");
        let result = ConfigStore::load(&path).unwrap();
        assert_eq!(result, BridgeConfig::default());
    }

    #[test]
    fn load_parses_valid_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edge-viewer.json");
        let json = r#"{"defaultMode":"grayscale","logLevel":"warn","snapshotQuality":60}"#;
        std::fs::write(&path, json).unwrap();

        let result = ConfigStore::load(&path).unwrap();
        assert_eq!(result.default_mode, ProcessingMode::Grayscale);
        assert_eq!(result.log_level, "warn");
        assert_eq!(result.snapshot_quality, 60);
        assert_eq!(result.thumbnail_width, 160);
    }

    #[test]
    fn load_returns_parse_error_for_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edge-viewer.json");
        std::fs::write(&path, "not valid json!!!").unwrap();

        let result = ConfigStore::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn new_falls_back_to_defaults_for_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edge-viewer.json");
        std::fs::write(&path, "{").unwrap();

        let store = ConfigStore::new(path);
        assert_eq!(store.get(), BridgeConfig::default());
    }

    #[test]
    fn save_round_trips_through_load() {
        let (store, dir) = temp_store();
        store.update(|c| {
            c.default_mode = ProcessingMode::GradientMagnitude;
            c.thumbnail_width = 320;
        });
        store.save().unwrap();

        let loaded = ConfigStore::load(&dir.path().join("edge-viewer.json")).unwrap();
        assert_eq!(loaded.default_mode, ProcessingMode::GradientMagnitude);
        assert_eq!(loaded.thumbnail_width, 320);
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("edge-viewer.json");
        let store = ConfigStore::new(path.clone());
        store.save().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn save_is_atomic() {
        let (store, dir) = temp_store();
        store.save().unwrap();

        // After a successful save, no .tmp file should remain
        let tmp_path = dir.path().join("edge-viewer.json.tmp");
        assert!(
            !tmp_path.exists(),
            ".tmp file should be cleaned up after rename"
        );
    }

    #[test]
    fn new_loads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("edge-viewer.json");
        let file = BridgeConfig {
            log_level: "trace".to_string(),
            ..BridgeConfig::default()
        };
        std::fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let store = ConfigStore::new(path);
        assert_eq!(store.get().log_level, "trace");
    }

    #[test]
    fn reset_restores_defaults() {
        let (store, _dir) = temp_store();
        store.update(|c| c.snapshot_quality = 10);
        store.reset();
        assert_eq!(store.get(), BridgeConfig::default());
    }
}
