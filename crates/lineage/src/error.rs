//! Error types for Lineage operations.
//!
//! [`LineageError`] is the single error surfaced to collaborators. Nothing in
//! the engine recovers locally: a failed diagram produces no output at all,
//! and the caller decides whether to skip it and continue with others.

use std::io;

use thiserror::Error;

/// The main error type for Lineage operations.
#[derive(Debug, Error)]
pub enum LineageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A type referenced by the hierarchy could not be resolved by the source.
    #[error("Unknown type: {qualified_name}")]
    UnknownType { qualified_name: String },

    #[error("Layout error: {0}")]
    Layout(#[from] crate::layout::Error),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LineageError {
    /// Create a new `UnknownType` error for the given qualified name.
    pub fn unknown_type(qualified_name: impl Into<String>) -> Self {
        Self::UnknownType {
            qualified_name: qualified_name.into(),
        }
    }
}
