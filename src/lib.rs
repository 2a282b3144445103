//! Real-time edge viewer frame pipeline.
//!
//! A host hands RGBA camera frames to a [`Bridge`], which converts them to
//! RGB, runs the selected filter (edge detection, gradient magnitude or
//! grayscale) and returns a fresh RGBA buffer of the same size, tracking
//! the achieved frame rate along the way. [`ffi`] exposes the same
//! contract over the C ABI for native hosts.

pub mod bridge;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod ffi;
pub mod filter;
pub mod frame;
pub mod logging;
pub mod preview;
pub mod processor;
pub mod settings;

use std::path::Path;

pub use bridge::Bridge;
pub use error::{PipelineError, Result};
pub use frame::{Frame, ProcessingMode};

use settings::{ConfigError, ConfigStore};

/// Open a session configured from the JSON file at `config_path`.
///
/// A missing file yields defaults. The returned bridge is already
/// initialised.
pub fn open(config_path: &Path) -> Bridge {
    let store = ConfigStore::new(config_path.to_path_buf());
    let config = store.get();
    tracing::info!(
        "Opening edge viewer session in {} mode from {}",
        config.default_mode,
        store.path().display()
    );
    let mut bridge = Bridge::with_config(config);
    bridge.initialize();
    bridge
}

/// Persist `mode` as the starting mode for future sessions opened from
/// `config_path`. Other settings in the file are kept.
pub fn remember_mode(
    config_path: &Path,
    mode: ProcessingMode,
) -> std::result::Result<(), ConfigError> {
    let store = ConfigStore::new(config_path.to_path_buf());
    store.update(|config| config.default_mode = mode);
    store.save()?;
    tracing::debug!("Saved {mode} as default mode");
    Ok(())
}

/// Overwrite the config file at `config_path` with defaults.
pub fn reset_config(config_path: &Path) -> std::result::Result<(), ConfigError> {
    let store = ConfigStore::new(config_path.to_path_buf());
    store.reset();
    store.save()
}
