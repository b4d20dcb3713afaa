//! CLI errors and their diagnostics.

use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use lineage::LineageError;

/// Errors reported by the CLI.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Failed to access {}", path.display())]
    #[diagnostic(code(lineage::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML file that does not describe what it should.
    #[error("Invalid {kind} file: {message}")]
    #[diagnostic(code(lineage::toml))]
    Toml {
        kind: &'static str,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        #[help]
        help: Option<String>,
    },

    #[error("Missing configuration file: {}", path.display())]
    #[diagnostic(
        code(lineage::config),
        help("pass an existing file with --config, or omit it to use the defaults")
    )]
    MissingConfig { path: PathBuf },

    #[error("Unknown focus type: {0}")]
    #[diagnostic(
        code(lineage::focus),
        help("focus types are qualified names listed in the catalog")
    )]
    UnknownFocus(String),

    #[error("Failed to render the diagram of {focus}")]
    #[diagnostic(code(lineage::render))]
    Render {
        focus: String,
        #[source]
        source: LineageError,
    },

    #[error(transparent)]
    #[diagnostic(code(lineage::engine))]
    Lineage(#[from] LineageError),

    #[error("{failed} of {total} diagrams failed")]
    #[diagnostic(code(lineage::diagrams))]
    Diagrams {
        failed: usize,
        total: usize,
        #[related]
        errors: Vec<CliError>,
    },

    #[error("A render worker panicked")]
    #[diagnostic(code(lineage::worker))]
    WorkerPanicked,
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a TOML error with the offending source so the span can be shown.
    pub fn toml(
        kind: &'static str,
        path: &Path,
        content: String,
        err: &toml::de::Error,
        help: Option<String>,
    ) -> Self {
        Self::Toml {
            kind,
            message: err.message().to_string(),
            src: NamedSource::new(path.display().to_string(), content),
            span: err.span().map(SourceSpan::from),
            help,
        }
    }
}
