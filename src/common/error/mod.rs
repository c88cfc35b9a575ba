//! Unified error types for the Rambutan library.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
