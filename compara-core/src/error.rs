//! Error types for the Compara core.
//!
//! Uses `thiserror` for public API error types with structured error variants
//! covering saved comparisons, the key-value storage surface, the catalog and
//! configuration.

use std::path::PathBuf;

/// Top-level error type for the Compara core library.
#[derive(Debug, thiserror::Error)]
pub enum ComparaError {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Comparison error: {0}")]
    Comparison(#[from] ComparisonError),
}

/// Errors from saving a named comparison.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The comparison name was empty after trimming.
    #[error("name required")]
    NameRequired,

    /// The storage surface rejected the write.
    #[error("Failed to persist comparison: {message}")]
    Persistence { message: String },
}

/// Errors from the key-value storage surface.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    #[error("Failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    #[error("Malformed data stored under '{key}': {message}")]
    Malformed { key: String, message: String },
}

/// Errors from the product catalog read API.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {message}")]
    Request { message: String },

    #[error("Catalog response parse error: {message}")]
    ResponseParse { message: String },

    #[error("Catalog returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to load catalog from {path}: {message}")]
    Load { path: PathBuf, message: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

/// Errors from mutating the set of compared items.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
    #[error("At most {max} items can be compared at once")]
    LimitReached { max: usize },
}

/// A type alias for results using the top-level `ComparaError`.
pub type Result<T> = std::result::Result<T, ComparaError>;
