//! SVG export of laid-out class diagrams.
//!
//! The [`Document`] collects everything a diagram consists of: one reusable
//! definition per symbol, connectors, placements and clip regions. Once the
//! layout engine has placed every symbol, [`Document::serialize`] produces a
//! self-contained SVG byte stream with the [`Stylesheet`] embedded.
//!
//! # Pipeline Position
//!
//! ```text
//! TypeRepository
//!     ↓ symbol
//! Symbols
//!     ↓ layout
//! Rows, placements, connector endpoints
//!     ↓ export (this module)
//! SVG bytes
//! ```

mod document;
mod stylesheet;

pub use document::Document;
pub use stylesheet::Stylesheet;

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur while assembling or writing a document.
///
/// Converted into [`LineageError::Export`](crate::LineageError::Export) at
/// the crate boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured stylesheet file cannot be read.
    #[error("Stylesheet not found: {}", path.display())]
    MissingStylesheet {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A symbol definition reached serialization without a placement.
    #[error("Symbol {qualified_name} is defined but was never placed")]
    UnplacedDefinition { qualified_name: String },
}
