//! evalbee-store: record storage and configuration.
//!
//! Implements the `RecordStore` trait from `evalbee-core` on top of JSON
//! files, and loads the `evalbee.toml` configuration.

pub mod config;
pub mod json;

pub use config::{load_config, load_config_from, EvalbeeConfig};
pub use json::JsonFileStore;
