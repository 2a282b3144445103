// Settings domain: bridge configuration and its JSON store.

pub mod store;
pub mod types;

pub use store::{ConfigError, ConfigStore};
pub use types::BridgeConfig;
