//! Lineage - UML class-hierarchy diagrams as SVG.
//!
//! Given a focus type and a source of type nodes, Lineage sizes a symbol for
//! every type around the focus, arranges the symbols into rows of
//! generations, routes inheritance connectors between them and writes the
//! result as a self-contained SVG document.

pub mod config;
pub mod export;
pub mod layout;
pub mod symbol;

mod catalog;
mod error;
mod repository;

pub use lineage_core::{draw, geometry, identifier, semantic};

pub use catalog::TypeCatalog;
pub use error::LineageError;
pub use repository::{Registry, TypeRepository, TypeSource};

use std::io;

use log::{debug, info};

use config::AppConfig;
use export::{Document, Stylesheet};
use identifier::TypeId;
use layout::LayoutEngine;

/// Renders class diagrams.
///
/// A builder holds the configuration and the stylesheet and can be shared by
/// threads rendering different focus types against one [`TypeRepository`].
///
/// # Examples
///
/// ```
/// use lineage::{
///     DiagramBuilder, TypeCatalog, TypeRepository,
///     identifier::TypeId,
///     semantic::{TypeKind, TypeNode},
/// };
///
/// let catalog = TypeCatalog::from_nodes([
///     TypeNode::new("java.lang.Object", TypeKind::Class),
///     TypeNode::new("geo.Shape", TypeKind::Class).with_superclass("java.lang.Object"),
/// ]);
/// let repository = TypeRepository::new();
///
/// let builder = DiagramBuilder::default();
/// let svg = builder
///     .render_svg(TypeId::new("geo.Shape"), &repository, &catalog)
///     .expect("Failed to render");
/// assert!(svg.contains("href=\"#geo.Shape\""));
/// ```
#[derive(Debug, Clone)]
pub struct DiagramBuilder {
    config: AppConfig,
    stylesheet: Stylesheet,
}

impl Default for DiagramBuilder {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            stylesheet: Stylesheet::builtin(),
        }
    }
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// A stylesheet override named by the configuration is read here, once.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::Config`] for unusable layout metrics and
    /// [`LineageError::Export`] if the stylesheet override cannot be read.
    pub fn new(config: AppConfig) -> Result<Self, LineageError> {
        config.layout().validate()?;
        let stylesheet = Stylesheet::from_config(config.style())?;
        Ok(Self { config, stylesheet })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Render the diagram of `focus` to SVG bytes.
    ///
    /// The ancestors of `focus` are discovered through `source` and cached in
    /// `repository`. Children are taken from what `repository` already knows,
    /// so register every documented type first (see
    /// [`TypeRepository::register_all`]) to show them.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::UnknownType`] if a supertype cannot be
    /// resolved, and a layout or export error if an internal invariant is
    /// violated. No partial document is produced.
    pub fn render(
        &self,
        focus: TypeId,
        repository: &TypeRepository,
        source: &dyn TypeSource,
    ) -> Result<Vec<u8>, LineageError> {
        info!(focus = focus.to_string(); "Rendering class diagram");

        repository.discover(focus, source)?;

        let mut engine = LayoutEngine::new(
            self.config.layout(),
            self.config.hierarchy(),
            repository,
            self.config.style().api_only(),
            Document::new(self.stylesheet.clone()),
        );
        let rows = engine.build_rows(focus)?.len();
        let dimension = engine.distribute()?;
        debug!(rows, dimension = dimension.to_string(); "Layout complete");

        let bytes = engine.into_document().serialize()?;

        info!(focus = focus.to_string(), bytes = bytes.len(); "Class diagram rendered");
        Ok(bytes)
    }

    /// Render the diagram of `focus` to an SVG string.
    ///
    /// # Errors
    ///
    /// See [`DiagramBuilder::render`].
    pub fn render_svg(
        &self,
        focus: TypeId,
        repository: &TypeRepository,
        source: &dyn TypeSource,
    ) -> Result<String, LineageError> {
        let bytes = self.render(focus, repository, source)?;
        String::from_utf8(bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
    }
}
