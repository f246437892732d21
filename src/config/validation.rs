//! Configuration validation for netdrift.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::*;
use crate::error::{NetDriftError, Result};
use crate::watch::parse_duration;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Fail with every validation error joined into one config error.
    fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(());
        }
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Err(NetDriftError::config(joined.join("; ")))
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.scan.validate());
        errors.extend(self.watch.validate());
        errors.extend(self.diff.validate());
        errors
    }
}

impl Validatable for ScanConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref region) = self.region {
            if region.trim().is_empty() {
                errors.push(ConfigError {
                    field: "scan.region".to_string(),
                    message: "Region must not be empty when set".to_string(),
                });
            }
        }

        if let Some(ref vpc_id) = self.vpc_id {
            if vpc_id.trim().is_empty() {
                errors.push(ConfigError {
                    field: "scan.vpc_id".to_string(),
                    message: "VPC id must not be empty when set".to_string(),
                });
            }
        }

        errors
    }
}

impl Validatable for WatchSettings {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        match parse_duration(&self.interval) {
            Ok(interval) if interval.is_zero() => errors.push(ConfigError {
                field: "watch.interval".to_string(),
                message: "Interval must be greater than zero".to_string(),
            }),
            Ok(_) => {}
            Err(e) => errors.push(ConfigError {
                field: "watch.interval".to_string(),
                message: e.to_string(),
            }),
        }

        if self.baseline.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "watch.baseline".to_string(),
                message: "Baseline path must not be empty".to_string(),
            });
        }

        if let Some(ref file_path) = self.alert_file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError {
                        field: "watch.alert_file".to_string(),
                        message: format!("Parent directory does not exist: {}", parent.display()),
                    });
                }
            }
        }

        errors
    }
}

impl Validatable for DiffSettings {
    fn validate(&self) -> Vec<ConfigError> {
        self.ignore_fields
            .iter()
            .filter(|f| f.trim().is_empty())
            .map(|_| ConfigError {
                field: "diff.ignore_fields".to_string(),
                message: "Field names must not be empty".to_string(),
            })
            .collect()
    }
}
