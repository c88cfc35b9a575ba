//! Unified error types for the Rambutan library.
//!
//! This module provides a unified error type covering the metadata value
//! store, the consumed field-tree interface, and the format extractors,
//! presenting a consistent API to users.
use thiserror::Error;

/// Main error type for Rambutan operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Write to a metadata key that is not part of the document schema.
    ///
    /// This is a programming error in an extractor, never contained by
    /// per-step fault isolation.
    #[error("metadata document has no key '{0}'")]
    UnknownKey(String),

    /// Read of a metadata key/index that holds no value.
    #[error("metadata has no value '{key}' (index {index})")]
    MissingValue { key: String, index: usize },

    /// A field lookup in the parsed field tree failed.
    #[error("no field '{name}' in {path}")]
    MissingField { path: String, name: String },

    /// A field held a value of an unexpected type or shape.
    #[error("invalid value for field '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// A lazy item sequence was constructed with zero items.
    #[error("unable to create empty vector \"{name}\" in {path}")]
    EmptyVector { name: String, path: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for Rambutan operations.
pub type Result<T> = std::result::Result<T, Error>;
