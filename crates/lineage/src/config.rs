//! Configuration types for Lineage diagram rendering.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a configuration file only needs to mention what it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Text metrics and spacing used to size and place symbols.
//! - [`StyleConfig`] - Stylesheet override and member filtering.
//! - [`HierarchyConfig`] - Names of the well-known types of the documented language.
//!
//! # Example
//!
//! ```
//! # use lineage::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().element_spacing(), 40.0);
//! assert_eq!(config.hierarchy().universal_root(), "java.lang.Object");
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::LineageError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    hierarchy: HierarchyConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig, hierarchy: HierarchyConfig) -> Self {
        Self {
            layout,
            style,
            hierarchy,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the hierarchy configuration.
    pub fn hierarchy(&self) -> &HierarchyConfig {
        &self.hierarchy
    }
}

/// Text metrics and spacing, in pixels.
///
/// Symbol sizes are derived from character counts, so the metrics describe a
/// monospace rendering of member signatures.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between neighbouring symbols and between rows.
    element_spacing: f32,
    /// Advance of one character.
    char_width: f32,
    /// Height of one text line.
    line_height: f32,
    /// Vertical padding unit inside a symbol.
    line_spacing: f32,
    /// Horizontal padding between a symbol edge and its text.
    text_spacing: f32,
    /// Pitch between connector endpoints sharing a symbol edge.
    connector_spacing: f32,
    /// Length of the straight lead-in that ends a curved connector.
    connector_lead: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            element_spacing: 40.0,
            char_width: 7.0,
            line_height: 14.0,
            line_spacing: 3.0,
            text_spacing: 8.0,
            connector_spacing: 8.0,
            connector_lead: 10.0,
        }
    }
}

impl LayoutConfig {
    pub fn element_spacing(&self) -> f32 {
        self.element_spacing
    }

    pub fn char_width(&self) -> f32 {
        self.char_width
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    pub fn text_spacing(&self) -> f32 {
        self.text_spacing
    }

    pub fn connector_spacing(&self) -> f32 {
        self.connector_spacing
    }

    pub fn connector_lead(&self) -> f32 {
        self.connector_lead
    }

    /// Checks that every metric is a finite, non-negative number and that the
    /// metrics a symbol's size is made of are positive.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Config`] naming the first offending metric.
    pub fn validate(&self) -> Result<(), LineageError> {
        let metrics = [
            ("element_spacing", self.element_spacing, true),
            ("char_width", self.char_width, true),
            ("line_height", self.line_height, true),
            ("line_spacing", self.line_spacing, false),
            ("text_spacing", self.text_spacing, false),
            ("connector_spacing", self.connector_spacing, false),
            ("connector_lead", self.connector_lead, false),
        ];

        for (name, value, positive) in metrics {
            let valid = value.is_finite() && if positive { value > 0.0 } else { value >= 0.0 };
            if !valid {
                return Err(LineageError::Config(format!(
                    "layout.{name} must be {}, got {value}",
                    if positive { "positive" } else { "non-negative" }
                )));
            }
        }
        Ok(())
    }

    /// Sets the gap between symbols and rows.
    pub fn with_element_spacing(mut self, spacing: f32) -> Self {
        self.element_spacing = spacing;
        self
    }

    /// Sets the advance of one character.
    pub fn with_char_width(mut self, width: f32) -> Self {
        self.char_width = width;
        self
    }
}

/// Visual options of the produced documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    /// Stylesheet file replacing the built-in one.
    #[serde(default)]
    stylesheet: Option<PathBuf>,

    /// Show only public and protected members.
    #[serde(default)]
    api_only: bool,
}

impl StyleConfig {
    pub fn new(stylesheet: Option<PathBuf>, api_only: bool) -> Self {
        Self {
            stylesheet,
            api_only,
        }
    }

    /// Returns the stylesheet override, if configured.
    pub fn stylesheet(&self) -> Option<&Path> {
        self.stylesheet.as_deref()
    }

    pub fn api_only(&self) -> bool {
        self.api_only
    }
}

/// Qualified names of the types that anchor stereotype derivation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// The implicit supertype of every class.
    universal_root: String,
    /// Classes reaching this type through their superclass chain are exceptions.
    exception_root: String,
    /// Classes reaching this type through their superclass chain are errors.
    error_root: String,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            universal_root: "java.lang.Object".to_string(),
            exception_root: "java.lang.Exception".to_string(),
            error_root: "java.lang.Error".to_string(),
        }
    }
}

impl HierarchyConfig {
    pub fn universal_root(&self) -> &str {
        &self.universal_root
    }

    pub fn exception_root(&self) -> &str {
        &self.exception_root
    }

    pub fn error_root(&self) -> &str {
        &self.error_root
    }
}
