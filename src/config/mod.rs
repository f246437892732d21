//! Configuration module for netdrift.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.netdrift.yaml` file in your project root or `~/.config/netdrift/`:
//!
//! ```yaml
//! scan:
//!   region: eu-west-1
//! watch:
//!   interval: 1m
//!   exit_on_change: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{resolve_region, DEFAULT_REGION, DEFAULT_WATCH_INTERVAL, REGION_ENV_VAR};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DiffSettings, ScanConfig, WatchSettings,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    config_search_dirs, discover_config_file, generate_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.netdrift.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
