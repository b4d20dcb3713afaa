//! Drawing primitives for class-diagram symbols.
//!
//! A symbol is described as a flat list of [`Element`]s (boxes, separator
//! lines and text runs) in the symbol's local coordinate space. Elements are
//! turned into SVG nodes through the [`Drawable`] trait, which sorts them into
//! [`RenderLayer`]s so boxes are always painted below their text.

mod element;
mod layer;

pub use element::{Element, TextAlign};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};

use crate::geometry::{Point, Size};

/// Anything that can render itself to layered SVG output at a position.
pub trait Drawable {
    /// Renders the drawable with its local origin moved to `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// The space the drawable occupies.
    fn size(&self) -> Size;
}
