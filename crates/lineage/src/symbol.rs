//! Symbol rendering: sizing and drawing one type box.
//!
//! A [`Symbol`] is the visual box of one type. It is made of three stacked
//! compartments (name with stereotypes, attributes, constructors and
//! methods) and, for generic types, a template tab overlapping the top-right
//! corner:
//!
//! ```text
//!                 ┌╌╌╌╌╌╌╌╌╌┐
//!   ┌─────────────┆  K, V   ┆      ← tab, shifted up and right by half its size
//!   │  «abstract» └╌╌╌╌╌╌╌╌╌┘
//!   │     Map          │
//!   ├──────────────────┤
//!   │ -size: int       │
//!   ├──────────────────┤
//!   │ +get(K): V       │
//!   └──────────────────┘
//! ```
//!
//! Sizes come from character counts: the width of the base box is
//! `2 × text_spacing + longest_line × char_width` and its height is
//! `9 × line_spacing + line_count × line_height`.

mod stereotype;

pub use stereotype::Stereotype;

use std::{
    hash::{Hash, Hasher},
    sync::Arc,
};

use log::trace;
use svg::node::element as svg_element;

use lineage_core::{
    draw::{Drawable, Element, LayeredOutput, RenderLayer, TextAlign},
    geometry::{Bounds, Point, Size},
    identifier::TypeId,
    semantic::{Member, TypeNode},
};

use crate::{
    config::{HierarchyConfig, LayoutConfig},
    repository::TypeRepository,
};

/// Placeholder line of a compartment whose members were all filtered out.
const ELLIPSIS: &str = "...";

/// One line of a compartment.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    text: String,
    class: &'static str,
}

impl Line {
    fn member(member: &Member) -> Self {
        Self {
            text: member.display_line(),
            class: if member.is_static() {
                "member static"
            } else {
                "member"
            },
        }
    }

    fn placeholder(hidden: bool) -> Self {
        Self {
            text: if hidden { ELLIPSIS.to_string() } else { String::new() },
            class: "member elided",
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Builds the lines of a member compartment.
///
/// An empty compartment still reserves one line.
fn compartment<'a>(members: impl Iterator<Item = &'a Member>, api_only: bool) -> Vec<Line> {
    let mut hidden = false;
    let lines: Vec<Line> = members
        .filter(|member| {
            let visible = !api_only || member.visibility().is_api();
            hidden |= !visible;
            visible
        })
        .map(Line::member)
        .collect();

    if lines.is_empty() {
        vec![Line::placeholder(hidden)]
    } else {
        lines
    }
}

/// The generics tab of a parameterised type.
#[derive(Debug, Clone, PartialEq)]
struct TemplateTab {
    text: String,
    size: Size,
}

/// The rendered box of one type.
///
/// Equality and hashing only consider the qualified name of the underlying
/// type: two symbols wrapping the same type are interchangeable.
#[derive(Debug, Clone)]
pub struct Symbol {
    node: Arc<TypeNode>,
    is_focus: bool,
    stereotypes: Vec<Stereotype>,
    base_size: Size,
    size: Size,
    elements: Vec<Element>,
}

impl Symbol {
    /// The identity of the wrapped type.
    pub fn id(&self) -> TypeId {
        self.node.id()
    }

    pub fn node(&self) -> &Arc<TypeNode> {
        &self.node
    }

    pub fn is_focus(&self) -> bool {
        self.is_focus
    }

    pub fn is_interface(&self) -> bool {
        self.node.is_interface()
    }

    pub fn stereotypes(&self) -> &[Stereotype] {
        &self.stereotypes
    }

    /// The full extent of the symbol, template tab included.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The extent of the main box alone.
    pub fn base_size(&self) -> Size {
        self.base_size
    }

    /// Offset of the main box's top-left corner from the symbol's top-left corner.
    pub fn base_offset(&self) -> Point {
        Point::new(0.0, self.size.height() - self.base_size.height())
    }

    /// The main box when the symbol is placed at `position`.
    pub fn base_bounds(&self, position: Point) -> Bounds {
        position
            .add_point(self.base_offset())
            .to_bounds(self.base_size)
    }

    /// The shape tree in symbol-local coordinates.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Renders the reusable definition of this symbol.
    ///
    /// The definition is a group whose element id is the qualified name; its
    /// text is clipped by the clip path `clip_id`.
    pub fn definition(&self, clip_id: &str) -> svg_element::Group {
        let mut output = self.render_to_layers(Point::default());
        output.clip_layer(RenderLayer::Text, clip_id);

        output.render().into_iter().fold(
            svg_element::Group::new()
                .set("id", self.id().to_string())
                .set("class", "symbol"),
            |group, node| group.add(node),
        )
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl Drawable for Symbol {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        for element in &self.elements {
            output.merge(element.render_to_layers(position));
        }
        output
    }

    fn size(&self) -> Size {
        self.size
    }
}

/// Creates [`Symbol`]s from type nodes.
#[derive(Debug)]
pub struct SymbolRenderer<'a> {
    layout: &'a LayoutConfig,
    hierarchy: &'a HierarchyConfig,
    repository: &'a TypeRepository,
}

impl<'a> SymbolRenderer<'a> {
    /// Creates a renderer; `repository` is used to walk superclass chains.
    pub fn new(
        layout: &'a LayoutConfig,
        hierarchy: &'a HierarchyConfig,
        repository: &'a TypeRepository,
    ) -> Self {
        Self {
            layout,
            hierarchy,
            repository,
        }
    }

    /// Sizes and draws the symbol of `node`.
    ///
    /// With `api_only` set, only public and protected members are listed.
    /// Whether the type belongs to the documentation output is read from the
    /// node and only affects styling.
    pub fn render(&self, node: Arc<TypeNode>, is_focus: bool, api_only: bool) -> Symbol {
        let stereotypes =
            stereotype::derive(&node, self.hierarchy, |id| self.repository.node(id));

        let header: Vec<Line> = stereotypes
            .iter()
            .map(|stereotype| Line {
                text: stereotype.to_string(),
                class: "stereotype",
            })
            .chain(std::iter::once(Line {
                text: node.simple_name(),
                class: if node.is_abstract() {
                    "type-name abstract"
                } else {
                    "type-name"
                },
            }))
            .collect();
        let attributes = compartment(node.attributes().iter(), api_only);
        let operations = compartment(
            node.constructors().iter().chain(node.methods()),
            api_only,
        );

        let longest = header
            .iter()
            .chain(&attributes)
            .chain(&operations)
            .map(Line::char_count)
            .max()
            .unwrap_or_default();
        let line_count = header.len() + attributes.len() + operations.len();

        let base_size = Size::new(
            2.0 * self.layout.text_spacing() + longest as f32 * self.layout.char_width(),
            9.0 * self.layout.line_spacing() + line_count as f32 * self.layout.line_height(),
        );

        let template = self.template_tab(&node);
        let size = match &template {
            Some(tab) => base_size.expand(tab.size.width() / 2.0, tab.size.height() / 2.0),
            None => base_size,
        };

        let box_class = match (is_focus, node.is_included()) {
            (true, _) => "symbol-box focus",
            (false, true) => "symbol-box",
            (false, false) => "symbol-box external",
        };

        let mut elements = Vec::new();
        let top = size.height() - base_size.height();
        elements.push(Element::rect(
            Point::new(0.0, top).to_bounds(base_size),
            RenderLayer::Box,
            box_class,
        ));

        let mut y = top;
        for (index, lines) in [&header, &attributes, &operations].into_iter().enumerate() {
            if index > 0 {
                elements.push(Element::line(
                    Point::new(0.0, y),
                    Point::new(base_size.width(), y),
                    "separator",
                ));
            }
            y = self.push_compartment(&mut elements, lines, y, base_size.width(), index == 0);
        }

        if let Some(tab) = template {
            let tab_min = Point::new(base_size.width() - tab.size.width() / 2.0, 0.0);
            let tab_bounds = tab_min.to_bounds(tab.size);
            elements.push(Element::rect(tab_bounds, RenderLayer::Tab, "template-tab"));
            elements.push(Element::text(
                tab_bounds.center(),
                TextAlign::Middle,
                tab.text,
                "template",
            ));
        }

        trace!(
            qualified_name = node.id().to_string(),
            width = size.width(),
            height = size.height();
            "Symbol rendered"
        );

        Symbol {
            node,
            is_focus,
            stereotypes,
            base_size,
            size,
            elements,
        }
    }

    /// Appends the text of one compartment starting at `top`; returns its bottom.
    fn push_compartment(
        &self,
        elements: &mut Vec<Element>,
        lines: &[Line],
        top: f32,
        width: f32,
        centered: bool,
    ) -> f32 {
        let line_height = self.layout.line_height();
        let first_line_top = top + 1.5 * self.layout.line_spacing();

        for (index, line) in lines.iter().enumerate() {
            if line.text.is_empty() {
                continue;
            }
            let center_y = first_line_top + (index as f32 + 0.5) * line_height;
            let (x, align) = if centered {
                (width / 2.0, TextAlign::Middle)
            } else {
                (self.layout.text_spacing(), TextAlign::Start)
            };
            elements.push(Element::text(
                Point::new(x, center_y),
                align,
                line.text.as_str(),
                line.class,
            ));
        }

        top + 3.0 * self.layout.line_spacing() + lines.len() as f32 * line_height
    }

    fn template_tab(&self, node: &TypeNode) -> Option<TemplateTab> {
        if node.type_parameters().is_empty() {
            return None;
        }

        let text = node.type_parameters().join(", ");
        let size = Size::new(
            2.0 * self.layout.text_spacing()
                + text.chars().count() as f32 * self.layout.char_width(),
            self.layout.line_height() + 2.0 * self.layout.line_spacing(),
        );
        Some(TemplateTab { text, size })
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use lineage_core::semantic::{TypeKind, Visibility};
    use proptest::prelude::*;

    use super::*;

    struct Fixture {
        layout: LayoutConfig,
        hierarchy: HierarchyConfig,
        repository: TypeRepository,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                layout: LayoutConfig::default(),
                hierarchy: HierarchyConfig::default(),
                repository: TypeRepository::new(),
            }
        }

        fn render(&self, node: TypeNode, api_only: bool) -> Symbol {
            SymbolRenderer::new(&self.layout, &self.hierarchy, &self.repository).render(
                Arc::new(node),
                false,
                api_only,
            )
        }
    }

    fn texts(symbol: &Symbol) -> Vec<String> {
        symbol
            .elements()
            .iter()
            .filter_map(|element| match element {
                Element::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_size_formula() {
        let fixture = Fixture::new();
        let node = TypeNode::new("geo.Shape", TypeKind::Class)
            .with_abstract(true)
            .with_method(Member::new(Visibility::Public, "area(): double"));

        let symbol = fixture.render(node, false);
        let layout = &fixture.layout;

        // Longest line is "+area(): double" (15 chars)
        assert_approx_eq!(
            f32,
            symbol.size().width(),
            2.0 * layout.text_spacing() + 15.0 * layout.char_width()
        );
        // name + «abstract» + empty attributes + one method
        assert_approx_eq!(
            f32,
            symbol.size().height(),
            9.0 * layout.line_spacing() + 4.0 * layout.line_height()
        );
        assert_eq!(symbol.size(), symbol.base_size());
        assert_eq!(symbol.stereotypes(), &[Stereotype::Abstract]);
    }

    #[test]
    fn test_empty_compartments_reserve_a_line() {
        let fixture = Fixture::new();
        let symbol = fixture.render(TypeNode::new("geo.Circle", TypeKind::Class), false);

        assert_approx_eq!(
            f32,
            symbol.size().height(),
            9.0 * fixture.layout.line_spacing() + 3.0 * fixture.layout.line_height()
        );
        assert_eq!(texts(&symbol), vec!["Circle".to_string()]);
    }

    #[test]
    fn test_api_only_hides_members_behind_ellipsis() {
        let fixture = Fixture::new();
        let node = TypeNode::new("geo.Circle", TypeKind::Class)
            .with_attribute(Member::new(Visibility::Private, "radius: double"))
            .with_method(Member::new(Visibility::Public, "area(): double"));

        let full = fixture.render(node.clone(), false);
        assert!(texts(&full).contains(&"-radius: double".to_string()));

        let api = fixture.render(node, true);
        let api_texts = texts(&api);
        assert!(!api_texts.contains(&"-radius: double".to_string()));
        assert!(api_texts.contains(&ELLIPSIS.to_string()));
        assert!(api_texts.contains(&"+area(): double".to_string()));
    }

    #[test]
    fn test_constructors_share_the_operations_compartment() {
        let fixture = Fixture::new();
        let node = TypeNode::new("geo.Circle", TypeKind::Class)
            .with_constructor(Member::new(Visibility::Public, "Circle(double)"))
            .with_method(Member::new(Visibility::Public, "area(): double"));

        let symbol = fixture.render(node, false);
        // name + empty attributes + two operations
        assert_approx_eq!(
            f32,
            symbol.size().height(),
            9.0 * fixture.layout.line_spacing() + 4.0 * fixture.layout.line_height()
        );
        let separators = symbol
            .elements()
            .iter()
            .filter(|element| matches!(element, Element::Line { .. }))
            .count();
        assert_eq!(separators, 2);
    }

    #[test]
    fn test_template_tab_grows_symbol() {
        let fixture = Fixture::new();
        let layout = &fixture.layout;
        let node = TypeNode::new("util.Map", TypeKind::Interface)
            .with_type_parameter("K")
            .with_type_parameter("V");

        let symbol = fixture.render(node, false);
        let tab_width = 2.0 * layout.text_spacing() + 4.0 * layout.char_width();
        let tab_height = layout.line_height() + 2.0 * layout.line_spacing();

        assert_approx_eq!(
            f32,
            symbol.size().width(),
            symbol.base_size().width() + tab_width / 2.0
        );
        assert_approx_eq!(
            f32,
            symbol.size().height(),
            symbol.base_size().height() + tab_height / 2.0
        );
        assert_approx_eq!(f32, symbol.base_offset().y(), tab_height / 2.0);
        assert!(texts(&symbol).contains(&"K, V".to_string()));
    }

    #[test]
    fn test_equality_by_qualified_name() {
        let fixture = Fixture::new();
        let a = fixture.render(TypeNode::new("geo.Circle", TypeKind::Class), false);
        let b = fixture.render(
            TypeNode::new("geo.Circle", TypeKind::Class)
                .with_method(Member::new(Visibility::Public, "area(): double")),
            true,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_definition_is_clipped_and_identified() {
        let fixture = Fixture::new();
        let symbol = fixture.render(TypeNode::new("geo.Circle", TypeKind::Class), false);
        let svg = symbol.definition("clip-0").to_string();

        assert!(svg.contains("id=\"geo.Circle\""));
        assert!(svg.contains("clip-path=\"url(#clip-0)\""));
        assert!(svg.contains("symbol-box"));
    }

    proptest! {
        #[test]
        fn width_grows_with_longest_member(base in 1usize..40, extra in 0usize..40) {
            let fixture = Fixture::new();
            let render = |len: usize| {
                let method = format!("m{}()", "x".repeat(len));
                fixture.render(
                    TypeNode::new("p.T", TypeKind::Class)
                        .with_method(Member::new(Visibility::Public, method)),
                    false,
                )
            };

            let narrow = render(base);
            let wide = render(base + extra);

            prop_assert!(wide.size().width() >= narrow.size().width());
            prop_assert!(float_cmp::approx_eq!(
                f32,
                wide.size().width() - narrow.size().width(),
                extra as f32 * fixture.layout.char_width(),
                epsilon = 0.01
            ));
        }
    }
}
