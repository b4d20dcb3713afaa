//! Layer-based rendering for SVG output.
//!
//! Drawables emit SVG nodes tagged with a [`RenderLayer`]; [`LayeredOutput`]
//! collects them and renders one `<g>` per non-empty layer, bottom to top.
//!
//! # Example
//!
//! ```
//! # use lineage_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::Rectangle;
//!
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Text, Box::new(svg::node::element::Text::new("Shape")));
//! output.add_to_layer(RenderLayer::Box, Box::new(Rectangle::new()));
//!
//! // The box group renders first even though it was added last
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use std::collections::BTreeMap;

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers of a symbol, in painting order.
///
/// The `Ord` derive follows declaration order: the first variant is painted
/// first (bottom), the last variant last (top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// The main box of a symbol
    Box,
    /// Compartment separator lines
    Separator,
    /// The generics template tab, drawn over the box corner
    Tab,
    /// Names, stereotypes and member lines
    Text,
}

impl RenderLayer {
    /// Returns the name used in the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Separator => "separator",
            Self::Tab => "tab",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
    clips: BTreeMap<RenderLayer, String>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Clips every node of `layer` with the clip path identified by `clip_id`.
    pub fn clip_layer(&mut self, layer: RenderLayer, clip_id: &str) {
        self.clips.insert(layer, format!("url(#{clip_id})"));
    }

    /// Merges all layers from another `LayeredOutput` into this one.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
        self.clips.extend(other.clips);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes a `<g data-layer="...">` element. Nodes keep
    /// their insertion order inside a layer.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order within a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = self.layer_group(current_layer);

        let items = std::mem::take(&mut self.items);
        for (layer, node) in items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = self.layer_group(layer);
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }

    fn layer_group(&self, layer: RenderLayer) -> svg_element::Group {
        let group = svg_element::Group::new().set("data-layer", layer.name());
        match self.clips.get(&layer) {
            Some(clip) => group.set("clip-path", clip.as_str()),
            None => group,
        }
    }
}
