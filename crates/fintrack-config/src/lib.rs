//! fintrack-config
//!
//! User preferences for the tracker: display settings, alert thresholds and
//! notification switches, plus their persistence on disk.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, NotificationConfig};
