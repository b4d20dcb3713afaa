//! Primitive shape elements.

use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Bounds, Point, Size},
};

/// Horizontal anchoring of a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
}

impl TextAlign {
    fn anchor(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
        }
    }
}

/// One primitive of a symbol's shape tree.
///
/// Coordinates are local to the owning symbol; styling is left entirely to
/// the document stylesheet through the `class` attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A rectangle on the given layer
    Rect {
        bounds: Bounds,
        layer: RenderLayer,
        class: String,
    },
    /// A horizontal or vertical separator line
    Line { from: Point, to: Point, class: String },
    /// A single line of text, vertically centred on `anchor`
    Text {
        anchor: Point,
        align: TextAlign,
        content: String,
        class: String,
    },
}

impl Element {
    pub fn rect(bounds: Bounds, layer: RenderLayer, class: impl Into<String>) -> Self {
        Self::Rect {
            bounds,
            layer,
            class: class.into(),
        }
    }

    pub fn line(from: Point, to: Point, class: impl Into<String>) -> Self {
        Self::Line {
            from,
            to,
            class: class.into(),
        }
    }

    pub fn text(
        anchor: Point,
        align: TextAlign,
        content: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self::Text {
            anchor,
            align,
            content: content.into(),
            class: class.into(),
        }
    }

    /// Returns the layer this element paints on.
    pub fn layer(&self) -> RenderLayer {
        match self {
            Self::Rect { layer, .. } => *layer,
            Self::Line { .. } => RenderLayer::Separator,
            Self::Text { .. } => RenderLayer::Text,
        }
    }
}

impl Drawable for Element {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        match self {
            Self::Rect { bounds, class, .. } => {
                let min = bounds.min_point().add_point(position);
                let rect = svg_element::Rectangle::new()
                    .set("x", min.x())
                    .set("y", min.y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("class", class.as_str());
                output.add_to_layer(self.layer(), Box::new(rect));
            }
            Self::Line { from, to, class } => {
                let from = from.add_point(position);
                let to = to.add_point(position);
                let line = svg_element::Line::new()
                    .set("x1", from.x())
                    .set("y1", from.y())
                    .set("x2", to.x())
                    .set("y2", to.y())
                    .set("class", class.as_str());
                output.add_to_layer(self.layer(), Box::new(line));
            }
            Self::Text {
                anchor,
                align,
                content,
                class,
            } => {
                let anchor = anchor.add_point(position);
                let text = svg_element::Text::new("")
                    .set("x", anchor.x())
                    .set("y", anchor.y())
                    .set("text-anchor", align.anchor())
                    .set("dominant-baseline", "central")
                    .set("class", class.as_str())
                    .add(SvgText::new(content.as_str()));
                output.add_to_layer(self.layer(), Box::new(text));
            }
        }
        output
    }

    fn size(&self) -> Size {
        match self {
            Self::Rect { bounds, .. } => bounds.to_size(),
            Self::Line { from, to, .. } => {
                let delta = to.sub_point(*from);
                Size::new(delta.x().abs(), delta.y().abs())
            }
            // Text extent depends on font metrics owned by the symbol renderer
            Self::Text { .. } => Size::default(),
        }
    }
}
