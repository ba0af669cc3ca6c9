//! Configuration management

mod settings;

pub use settings::{AppConfig, ConfigError, CONFIG_VERSION};
