use serde::{Deserialize, Serialize};

use crate::frame::ProcessingMode;

/// Bridge configuration. Missing fields take their defaults, so a partial
/// file such as `{"defaultMode":"grayscale"}` is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Mode selected when a bridge is created.
    pub default_mode: ProcessingMode,
    /// `log` level name: off, error, warn, info, debug or trace.
    pub log_level: String,
    /// JPEG quality for snapshot export (1-100).
    pub snapshot_quality: u8,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_mode: ProcessingMode::default(),
            log_level: "info".to_string(),
            snapshot_quality: 85,
            thumbnail_width: 160,
            thumbnail_height: 120,
        }
    }
}

impl BridgeConfig {
    /// Parsed log level; unrecognised names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Snapshot quality clamped into the encoder's accepted range.
    pub fn jpeg_quality(&self) -> u8 {
        self.snapshot_quality.clamp(1, 100)
    }
}
