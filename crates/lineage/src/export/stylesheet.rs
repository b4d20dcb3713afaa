//! The stylesheet embedded in every produced document.

use std::{
    fs,
    path::Path,
    sync::{Arc, OnceLock},
};

use log::debug;

use super::Error;
use crate::config::StyleConfig;

const BUILTIN_SOURCE: &str = include_str!("../../assets/lineage.css");

/// Comment-stripped built-in stylesheet, prepared once per process.
static BUILTIN: OnceLock<Arc<str>> = OnceLock::new();

/// A comment-free CSS stylesheet, cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    css: Arc<str>,
}

impl Stylesheet {
    /// The stylesheet compiled into the library.
    pub fn builtin() -> Self {
        let css = BUILTIN.get_or_init(|| {
            debug!("Preparing built-in stylesheet");
            Arc::from(strip_comments(BUILTIN_SOURCE))
        });
        Self {
            css: Arc::clone(css),
        }
    }

    /// Reads and strips the stylesheet at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingStylesheet`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let source = fs::read_to_string(path).map_err(|source| Error::MissingStylesheet {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = path.display().to_string(); "Loaded stylesheet override");
        Ok(Self {
            css: Arc::from(strip_comments(&source)),
        })
    }

    /// The configured override, or the built-in stylesheet.
    pub fn from_config(style: &StyleConfig) -> Result<Self, Error> {
        match style.stylesheet() {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn css(&self) -> &str {
        &self.css
    }
}

/// Removes `/* ... */` comments and blank lines.
///
/// An unterminated comment swallows the rest of the input.
fn strip_comments(css: &str) -> String {
    let mut without_comments = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        without_comments.push_str(&rest[..start]);
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    without_comments.push_str(rest);

    without_comments
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
