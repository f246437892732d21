//! Unified error types for netdrift.
//!
//! Inventory acquisition and snapshot storage report through [`NetDriftError`],
//! carrying a context chain so a failure can be traced back through the
//! layers that handled it. Subsystems with their own failure surface
//! (watch, reports, config files) keep local error enums.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for netdrift operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum NetDriftError {
    /// Errors raised while asking an inventory provider for resources
    #[error("Inventory acquisition failed: {context}")]
    Inventory {
        context: String,
        #[source]
        source: InventoryErrorKind,
    },

    /// Errors while reading or writing a persisted snapshot
    #[error("Snapshot storage failed: {context}")]
    Storage {
        context: String,
        #[source]
        source: StorageErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific inventory error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InventoryErrorKind {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Request throttled: {0}")]
    Throttled(String),

    #[error("Invalid inventory document: {0}")]
    InvalidDocument(String),
}

/// Specific storage error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageErrorKind {
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("malformed snapshot document: {0}")]
    Malformed(String),

    #[error("snapshot serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for netdrift operations
pub type Result<T> = std::result::Result<T, NetDriftError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl NetDriftError {
    /// Create an inventory error with context
    pub fn inventory(context: impl Into<String>, source: InventoryErrorKind) -> Self {
        Self::Inventory {
            context: context.into(),
            source,
        }
    }

    /// Create a storage error with context
    pub fn storage(context: impl Into<String>, source: StorageErrorKind) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// Create a storage error for a missing snapshot document
    pub fn snapshot_not_found(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::storage(
            format!("loading {}", path.display()),
            StorageErrorKind::NotFound(path),
        )
    }

    /// Create a storage error for a document that is not a snapshot
    pub fn malformed_snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self::storage(
            format!("loading {}", path.display()),
            StorageErrorKind::Malformed(message.into()),
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error means the snapshot document does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Storage {
                source: StorageErrorKind::NotFound(_),
                ..
            }
        )
    }

    /// Whether this error means the snapshot document could not be parsed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Storage {
                source: StorageErrorKind::Malformed(_),
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for NetDriftError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// failure deep inside acquisition reads like
/// `cycle 4: listing subnets: Provider unavailable: ...`.
///
/// # Example
///
/// ```ignore
/// use netdrift::error::ErrorContext;
///
/// let subnets = provider
///     .list_subnets(scope, &vpc_ids)
///     .await
///     .context("listing subnets")?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on the error path.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<NetDriftError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: NetDriftError, new_ctx: &str) -> NetDriftError {
    match err {
        NetDriftError::Inventory {
            context: existing,
            source,
        } => NetDriftError::Inventory {
            context: chain_context(new_ctx, &existing),
            source,
        },
        NetDriftError::Storage {
            context: existing,
            source,
        } => NetDriftError::Storage {
            context: chain_context(new_ctx, &existing),
            source,
        },
        NetDriftError::Io {
            path,
            message,
            source,
        } => NetDriftError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        NetDriftError::Config(msg) => NetDriftError::Config(chain_context(new_ctx, &msg)),
        NetDriftError::Validation(msg) => NetDriftError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together as "`new`: `existing`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| NetDriftError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| NetDriftError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NetDriftError::inventory(
            "listing subnets",
            InventoryErrorKind::Throttled("rate exceeded".to_string()),
        );
        let display = err.to_string();
        assert!(display.contains("listing subnets"), "{display}");

        let err = NetDriftError::snapshot_not_found("/tmp/missing.json");
        assert!(err.to_string().contains("/tmp/missing.json"));
        assert!(err.is_not_found());
        assert!(!err.is_malformed());
    }

    #[test]
    fn test_malformed_predicate() {
        let err = NetDriftError::malformed_snapshot("state.json", "expected object");
        assert!(err.is_malformed());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = NetDriftError::io("/path/to/state.json", io_err);

        assert!(err.to_string().contains("/path/to/state.json"));
    }

    #[test]
    fn test_context_chaining() {
        let initial_err: Result<()> = Err(NetDriftError::inventory(
            "initial context",
            InventoryErrorKind::Unavailable("down".to_string()),
        ));

        match initial_err.context("outer context") {
            Err(NetDriftError::Inventory { context, .. }) => {
                assert_eq!(context, "outer context: initial context");
            }
            _ => panic!("Expected Inventory error"),
        }
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(NetDriftError::storage(
                "base",
                StorageErrorKind::Malformed("eof".to_string()),
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(NetDriftError::Storage { context, source }) => {
                assert_eq!(context, "outer layer: middle layer: base");
                assert!(matches!(source, StorageErrorKind::Malformed(_)));
            }
            _ => panic!("Expected Storage error"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(NetDriftError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let some_value: Option<i32> = Some(42);
        assert_eq!(some_value.context_none("missing value").unwrap(), 42);

        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(NetDriftError::Validation(msg)) => assert_eq!(msg, "missing value"),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
        assert_eq!(
            chain_context("outer", "middle: inner"),
            "outer: middle: inner"
        );
    }
}
