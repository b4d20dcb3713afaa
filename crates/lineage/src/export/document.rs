//! The diagram document and its SVG serialization.

use indexmap::IndexMap;
use log::{debug, trace};
use svg::node::element as svg_element;

use lineage_core::{
    geometry::{Bounds, Point, Size},
    identifier::TypeId,
};

use super::{Error, Stylesheet};
use crate::{
    LineageError,
    layout::{self, Connector, ConnectorId, ConnectorKind},
    symbol::Symbol,
};

/// A symbol definition with the clip region guarding its text.
#[derive(Debug)]
struct Definition {
    symbol: Symbol,
    clip_id: String,
}

/// Everything one diagram consists of.
///
/// Symbols are stored once, as reusable definitions keyed by qualified name,
/// and referenced by placements. A placement is written exactly once.
#[derive(Debug)]
pub struct Document {
    stylesheet: Stylesheet,
    definitions: IndexMap<TypeId, Definition>,
    connectors: Vec<Connector>,
    placements: IndexMap<TypeId, Point>,
    clip_regions: Vec<(String, Bounds)>,
    dimension: Size,
}

impl Document {
    pub fn new(stylesheet: Stylesheet) -> Self {
        Self {
            stylesheet,
            definitions: IndexMap::new(),
            connectors: Vec::new(),
            placements: IndexMap::new(),
            clip_regions: Vec::new(),
            dimension: Size::default(),
        }
    }

    /// Adds the definition of `symbol` with its own clip region.
    ///
    /// Returns `false` and drops `symbol` if a definition for the same
    /// qualified name exists; callers then reuse [`Document::symbol`].
    pub fn add_symbol_definition(&mut self, symbol: Symbol) -> bool {
        let id = symbol.id();
        if self.definitions.contains_key(&id) {
            return false;
        }

        let clip_id = self.add_clip_region(Point::default().to_bounds(symbol.size()));
        trace!(qualified_name = id.to_string(), clip_id = clip_id.as_str(); "Symbol defined");
        self.definitions.insert(id, Definition { symbol, clip_id });
        true
    }

    pub fn symbol(&self, id: TypeId) -> Option<&Symbol> {
        self.definitions.get(&id).map(|definition| &definition.symbol)
    }

    /// All defined symbols in definition order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.definitions.values().map(|definition| &definition.symbol)
    }

    pub fn add_connector(&mut self, connector: Connector) -> ConnectorId {
        self.connectors.push(connector);
        ConnectorId::new(self.connectors.len() - 1)
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(id.index())
    }

    pub fn connector_mut(&mut self, id: ConnectorId) -> Option<&mut Connector> {
        self.connectors.get_mut(id.index())
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Places the definition of `id` with its top-left corner at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`layout::Error::MissingSymbol`] for an undefined symbol and
    /// [`layout::Error::AlreadyPlaced`] if the symbol was placed before.
    pub fn add_placement(&mut self, id: TypeId, position: Point) -> Result<(), layout::Error> {
        if !self.definitions.contains_key(&id) {
            return Err(layout::Error::MissingSymbol {
                qualified_name: id.to_string(),
            });
        }
        if self.placements.contains_key(&id) {
            return Err(layout::Error::AlreadyPlaced {
                qualified_name: id.to_string(),
            });
        }

        trace!(qualified_name = id.to_string(), position = position.to_string(); "Symbol placed");
        self.placements.insert(id, position);
        Ok(())
    }

    pub fn placement(&self, id: TypeId) -> Option<Point> {
        self.placements.get(&id).copied()
    }

    /// Registers a clip rectangle in symbol-local coordinates and returns its id.
    ///
    /// Ids are `clip-0`, `clip-1`, ... counted per document.
    pub fn add_clip_region(&mut self, bounds: Bounds) -> String {
        let id = format!("clip-{}", self.clip_regions.len());
        self.clip_regions.push((id.clone(), bounds));
        id
    }

    pub fn set_dimension(&mut self, dimension: Size) {
        self.dimension = dimension;
    }

    pub fn dimension(&self) -> Size {
        self.dimension
    }

    /// Serializes the document to SVG bytes.
    ///
    /// # Errors
    ///
    /// Fails if a definition has no placement or a connector has no endpoints;
    /// no partial output is produced.
    pub fn serialize(&self) -> Result<Vec<u8>, LineageError> {
        let width = self.dimension.width();
        let height = self.dimension.height();

        let mut defs = svg_element::Definitions::new()
            .add(arrow_marker(ConnectorKind::Inheritance))
            .add(arrow_marker(ConnectorKind::Implementation));
        for (clip_id, bounds) in &self.clip_regions {
            defs = defs.add(clip_path(clip_id, *bounds));
        }
        for definition in self.definitions.values() {
            defs = defs.add(definition.symbol.definition(&definition.clip_id));
        }

        let mut connectors = svg_element::Group::new().set("class", "connectors");
        for connector in &self.connectors {
            let kind = connector.kind();
            connectors = connectors.add(
                svg_element::Path::new()
                    .set("class", format!("connector {kind}"))
                    .set("d", connector.path_data()?)
                    .set("marker-end", format!("url(#{})", kind.marker_id())),
            );
        }

        let mut symbols = svg_element::Group::new().set("class", "symbols");
        for id in self.definitions.keys() {
            let position = self
                .placement(*id)
                .ok_or_else(|| Error::UnplacedDefinition {
                    qualified_name: id.to_string(),
                })?;
            symbols = symbols.add(
                svg_element::Use::new()
                    .set("href", format!("#{id}"))
                    .set("x", position.x())
                    .set("y", position.y()),
            );
        }

        let document = svg::Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", format!("0 0 {width} {height}"))
            .add(svg_element::Style::new(self.stylesheet.css()))
            .add(defs)
            .add(connectors)
            .add(symbols);

        let mut bytes = Vec::new();
        svg::write(&mut bytes, &document).map_err(Error::from)?;

        debug!(
            symbols = self.definitions.len(),
            connectors = self.connectors.len(),
            bytes = bytes.len();
            "Document serialized"
        );
        Ok(bytes)
    }
}

fn clip_path(clip_id: &str, bounds: Bounds) -> svg_element::ClipPath {
    let rect = svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height());

    svg_element::ClipPath::new().set("id", clip_id).add(rect)
}

fn arrow_marker(kind: ConnectorKind) -> svg_element::Marker {
    svg_element::Marker::new()
        .set("id", kind.marker_id())
        .set("viewBox", "0 0 10 10")
        .set("refX", 10)
        .set("refY", 5)
        .set("markerWidth", 10)
        .set("markerHeight", 10)
        .set("orient", "auto")
        .add(
            svg_element::Path::new()
                .set("class", "arrowhead")
                .set("d", "M 0 0 L 10 5 L 0 10 z"),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lineage_core::semantic::{TypeKind, TypeNode};

    use super::*;
    use crate::{
        config::{HierarchyConfig, LayoutConfig},
        repository::TypeRepository,
        symbol::SymbolRenderer,
    };

    fn symbol(name: &str, kind: TypeKind) -> Symbol {
        let layout = LayoutConfig::default();
        let hierarchy = HierarchyConfig::default();
        let repository = TypeRepository::new();
        SymbolRenderer::new(&layout, &hierarchy, &repository).render(
            Arc::new(TypeNode::new(name, kind)),
            false,
            false,
        )
    }

    fn document() -> Document {
        Document::new(Stylesheet::builtin())
    }

    #[test]
    fn test_definitions_are_deduplicated() {
        let mut document = document();
        assert!(document.add_symbol_definition(symbol("geo.Shape", TypeKind::Class)));
        assert!(!document.add_symbol_definition(symbol("geo.Shape", TypeKind::Class)));
        assert_eq!(document.symbols().count(), 1);
        assert_eq!(document.clip_regions.len(), 1);
    }

    #[test]
    fn test_placement_is_write_once() {
        let mut document = document();
        document.add_symbol_definition(symbol("geo.Shape", TypeKind::Class));
        let id = TypeId::new("geo.Shape");

        document.add_placement(id, Point::new(1.0, 2.0)).unwrap();
        let err = document.add_placement(id, Point::new(3.0, 4.0)).unwrap_err();
        assert!(matches!(err, layout::Error::AlreadyPlaced { .. }));
        assert_eq!(document.placement(id), Some(Point::new(1.0, 2.0)));

        let err = document
            .add_placement(TypeId::new("geo.Unknown"), Point::default())
            .unwrap_err();
        assert!(matches!(err, layout::Error::MissingSymbol { .. }));
    }

    #[test]
    fn test_clip_ids_count_per_document() {
        let mut first = document();
        let mut second = document();
        assert_eq!(first.add_clip_region(Bounds::default()), "clip-0");
        assert_eq!(first.add_clip_region(Bounds::default()), "clip-1");
        assert_eq!(second.add_clip_region(Bounds::default()), "clip-0");
    }

    #[test]
    fn test_serialize_rejects_unplaced_definition() {
        let mut document = document();
        document.add_symbol_definition(symbol("geo.Shape", TypeKind::Class));

        let err = document.serialize().unwrap_err();
        assert!(matches!(
            err,
            LineageError::Export(Error::UnplacedDefinition { ref qualified_name })
                if qualified_name == "geo.Shape"
        ));
    }

    #[test]
    fn test_serialize_rejects_incomplete_connector() {
        let mut document = document();
        document.add_symbol_definition(symbol("geo.Shape", TypeKind::Class));
        document.add_symbol_definition(symbol("geo.Circle", TypeKind::Class));
        document.add_placement(TypeId::new("geo.Shape"), Point::default()).unwrap();
        document.add_placement(TypeId::new("geo.Circle"), Point::default()).unwrap();
        document.add_connector(Connector::new(
            TypeId::new("geo.Circle"),
            TypeId::new("geo.Shape"),
            ConnectorKind::Inheritance,
            10.0,
        ));

        let err = document.serialize().unwrap_err();
        assert!(matches!(
            err,
            LineageError::Layout(layout::Error::IncompleteConnector { .. })
        ));
    }

    #[test]
    fn test_serialize_structure() {
        let mut document = document();
        document.add_symbol_definition(symbol("geo.Drawable", TypeKind::Interface));
        document.add_symbol_definition(symbol("geo.Circle", TypeKind::Class));
        document
            .add_placement(TypeId::new("geo.Drawable"), Point::new(20.0, 20.0))
            .unwrap();
        document
            .add_placement(TypeId::new("geo.Circle"), Point::new(20.0, 120.0))
            .unwrap();

        let id = document.add_connector(Connector::new(
            TypeId::new("geo.Circle"),
            TypeId::new("geo.Drawable"),
            ConnectorKind::Implementation,
            10.0,
        ));
        let connector = document.connector_mut(id).unwrap();
        connector.set_start_point(Point::new(60.0, 120.0));
        connector.set_end_point(Point::new(60.0, 80.0));
        document.set_dimension(Size::new(200.0, 180.0));

        let svg = String::from_utf8(document.serialize().unwrap()).unwrap();
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("height=\"180\""));
        assert!(svg.contains("viewBox=\"0 0 200 180\""));
        assert!(svg.contains("<style"));
        assert!(svg.contains("id=\"arrow-inheritance\""));
        assert!(svg.contains("id=\"clip-1\""));
        assert!(svg.contains("id=\"geo.Circle\""));
        assert!(svg.contains("class=\"connector implementation\""));
        assert!(svg.contains("marker-end=\"url(#arrow-implementation)\""));
        assert!(svg.contains("href=\"#geo.Drawable\""));
        assert_eq!(svg.matches("<use").count(), 2);
    }
}
