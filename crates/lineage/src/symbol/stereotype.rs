//! Stereotype labels shown above a type name.

use std::{collections::HashSet, fmt, sync::Arc};

use lineage_core::{
    identifier::TypeId,
    semantic::{TypeKind, TypeNode},
};

use crate::config::HierarchyConfig;

/// A UML stereotype of a class-diagram symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stereotype {
    Interface,
    Enumeration,
    Annotation,
    Abstract,
    Exception,
    Error,
    /// A class without instance members. Never derived automatically.
    Utility,
}

impl Stereotype {
    pub fn label(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Enumeration => "enumeration",
            Self::Annotation => "annotation",
            Self::Abstract => "abstract",
            Self::Exception => "exception",
            Self::Error => "error",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "«{}»", self.label())
    }
}

/// Derives the stereotype labels of `node`.
///
/// The kind label comes first. Classes then walk their superclass chain,
/// starting with the class itself, until the chain ends, reaches the universal
/// root, or reaches the exception or error root.
pub(crate) fn derive(
    node: &TypeNode,
    hierarchy: &HierarchyConfig,
    lookup: impl Fn(TypeId) -> Option<Arc<TypeNode>>,
) -> Vec<Stereotype> {
    let mut stereotypes = Vec::new();

    match node.kind() {
        TypeKind::Interface => stereotypes.push(Stereotype::Interface),
        TypeKind::Enum => stereotypes.push(Stereotype::Enumeration),
        TypeKind::Annotation => stereotypes.push(Stereotype::Annotation),
        TypeKind::Class => {
            if node.is_abstract() {
                stereotypes.push(Stereotype::Abstract);
            }
            if let Some(marker) = walk_superclasses(node, hierarchy, lookup) {
                stereotypes.push(marker);
            }
        }
    }

    stereotypes
}

fn walk_superclasses(
    node: &TypeNode,
    hierarchy: &HierarchyConfig,
    lookup: impl Fn(TypeId) -> Option<Arc<TypeNode>>,
) -> Option<Stereotype> {
    let universal_root = TypeId::new(hierarchy.universal_root());
    let exception_root = TypeId::new(hierarchy.exception_root());
    let error_root = TypeId::new(hierarchy.error_root());

    let mut seen = HashSet::new();
    let mut current = Some(node.id());

    while let Some(id) = current {
        if id == universal_root || !seen.insert(id) {
            return None;
        }
        if id == exception_root {
            return Some(Stereotype::Exception);
        }
        if id == error_root {
            return Some(Stereotype::Error);
        }
        current = if id == node.id() {
            node.superclass()
        } else {
            lookup(id).and_then(|ancestor| ancestor.superclass())
        };
    }

    None
}
