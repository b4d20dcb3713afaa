//! The type-hierarchy input model.
//!
//! A [`TypeNode`] is what a collaborator (a documentation tool, a catalog
//! file) knows about one type: its identity, kind, members and direct
//! supertypes. Nodes are immutable once built; child back-references are
//! accumulated elsewhere by the repository that caches them.
//!
//! All types implement [`serde::Deserialize`] so a hierarchy can be loaded
//! from any serde format.

use serde::Deserialize;

use crate::identifier::TypeId;

/// The kind of a type declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    pub fn is_interface(self) -> bool {
        matches!(self, Self::Interface | Self::Annotation)
    }
}

/// Member visibility as shown in the symbol compartments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    /// The UML marker character for this visibility.
    pub fn marker(self) -> char {
        match self {
            Self::Public => '+',
            Self::Protected => '#',
            Self::Package => '~',
            Self::Private => '-',
        }
    }

    /// Returns true if members with this visibility belong to the public API.
    pub fn is_api(self) -> bool {
        matches!(self, Self::Public | Self::Protected)
    }
}

/// One attribute, constructor or method of a type.
///
/// `text` is the already rendered signature, e.g. `area(): double`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    #[serde(default)]
    visibility: Visibility,
    text: String,
    #[serde(default, rename = "static")]
    is_static: bool,
}

impl Member {
    pub fn new(visibility: Visibility, text: impl Into<String>) -> Self {
        Self {
            visibility,
            text: text.into(),
            is_static: false,
        }
    }

    /// Marks the member as static (class-level).
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The line shown in a symbol compartment: marker followed by signature.
    pub fn display_line(&self) -> String {
        format!("{}{}", self.visibility.marker(), self.text)
    }
}

/// A type declaration with its members and direct supertypes.
///
/// # Examples
///
/// ```
/// use lineage_core::{
///     identifier::TypeId,
///     semantic::{Member, TypeKind, TypeNode, Visibility},
/// };
///
/// let shape = TypeNode::new("geo.Shape", TypeKind::Class)
///     .with_abstract(true)
///     .with_superclass("java.lang.Object")
///     .with_interface("geo.Drawable")
///     .with_method(Member::new(Visibility::Public, "area(): double"));
///
/// assert_eq!(shape.simple_name(), "Shape");
/// let supertypes: Vec<TypeId> = shape.supertypes().collect();
/// assert_eq!(supertypes, vec![TypeId::new("java.lang.Object"), TypeId::new("geo.Drawable")]);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeNode {
    #[serde(rename = "name")]
    qualified_name: TypeId,
    #[serde(default)]
    simple_name: Option<String>,
    #[serde(default)]
    kind: TypeKind,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default)]
    type_parameters: Vec<String>,
    #[serde(default)]
    superclass: Option<TypeId>,
    #[serde(default)]
    interfaces: Vec<TypeId>,
    #[serde(default)]
    attributes: Vec<Member>,
    #[serde(default)]
    constructors: Vec<Member>,
    #[serde(default)]
    methods: Vec<Member>,
    #[serde(default = "default_included")]
    included: bool,
}

fn default_included() -> bool {
    true
}

impl TypeNode {
    /// Creates a node with no members and no supertypes.
    pub fn new(qualified_name: impl Into<TypeId>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            simple_name: None,
            kind,
            is_abstract: false,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            included: true,
        }
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_simple_name(mut self, name: impl Into<String>) -> Self {
        self.simple_name = Some(name.into());
        self
    }

    pub fn with_type_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.type_parameters.push(parameter.into());
        self
    }

    pub fn with_superclass(mut self, superclass: impl Into<TypeId>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<TypeId>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn with_attribute(mut self, member: Member) -> Self {
        self.attributes.push(member);
        self
    }

    pub fn with_constructor(mut self, member: Member) -> Self {
        self.constructors.push(member);
        self
    }

    pub fn with_method(mut self, member: Member) -> Self {
        self.methods.push(member);
        self
    }

    /// Sets whether the type is part of the current documentation output.
    pub fn with_included(mut self, included: bool) -> Self {
        self.included = included;
        self
    }

    pub fn id(&self) -> TypeId {
        self.qualified_name
    }

    /// The explicit simple name, or the last segment of the qualified name.
    pub fn simple_name(&self) -> String {
        self.simple_name
            .clone()
            .unwrap_or_else(|| self.qualified_name.simple_name())
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_interface(&self) -> bool {
        self.kind.is_interface()
    }

    pub fn type_parameters(&self) -> &[String] {
        &self.type_parameters
    }

    pub fn superclass(&self) -> Option<TypeId> {
        self.superclass
    }

    pub fn interfaces(&self) -> &[TypeId] {
        &self.interfaces
    }

    /// Direct supertypes in declaration order: superclass first, then interfaces.
    pub fn supertypes(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.superclass
            .into_iter()
            .chain(self.interfaces.iter().copied())
    }

    pub fn attributes(&self) -> &[Member] {
        &self.attributes
    }

    pub fn constructors(&self) -> &[Member] {
        &self.constructors
    }

    pub fn methods(&self) -> &[Member] {
        &self.methods
    }

    /// Returns true if the type is part of the current documentation output.
    pub fn is_included(&self) -> bool {
        self.included
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_markers() {
        assert_eq!(Visibility::Public.marker(), '+');
        assert_eq!(Visibility::Protected.marker(), '#');
        assert_eq!(Visibility::Package.marker(), '~');
        assert_eq!(Visibility::Private.marker(), '-');
    }

    #[test]
    fn test_visibility_api() {
        assert!(Visibility::Public.is_api());
        assert!(Visibility::Protected.is_api());
        assert!(!Visibility::Package.is_api());
        assert!(!Visibility::Private.is_api());
    }

    #[test]
    fn test_member_display_line() {
        let member = Member::new(Visibility::Private, "radius: double").with_static(true);
        assert_eq!(member.display_line(), "-radius: double");
        assert!(member.is_static());
    }

    #[test]
    fn test_annotation_counts_as_interface() {
        assert!(TypeKind::Interface.is_interface());
        assert!(TypeKind::Annotation.is_interface());
        assert!(!TypeKind::Class.is_interface());
        assert!(!TypeKind::Enum.is_interface());
    }

    #[test]
    fn test_node_defaults() {
        let node = TypeNode::new("geo.Circle", TypeKind::Class);
        assert_eq!(node.id(), TypeId::new("geo.Circle"));
        assert_eq!(node.simple_name(), "Circle");
        assert!(node.is_included());
        assert!(!node.is_abstract());
        assert_eq!(node.supertypes().count(), 0);
    }

    #[test]
    fn test_node_explicit_simple_name() {
        let node = TypeNode::new("geo.Outer$Inner", TypeKind::Class).with_simple_name("Outer.Inner");
        assert_eq!(node.simple_name(), "Outer.Inner");
    }

    #[test]
    fn test_supertypes_order() {
        let node = TypeNode::new("geo.Circle", TypeKind::Class)
            .with_interface("geo.Drawable")
            .with_superclass("geo.Shape")
            .with_interface("java.io.Serializable");
        let supertypes: Vec<TypeId> = node.supertypes().collect();
        assert_eq!(
            supertypes,
            vec![
                TypeId::new("geo.Shape"),
                TypeId::new("geo.Drawable"),
                TypeId::new("java.io.Serializable"),
            ]
        );
    }
}
