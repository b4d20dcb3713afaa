//! An in-memory [`TypeSource`] built from a list of type nodes.

use indexmap::IndexMap;
use serde::Deserialize;

use lineage_core::{identifier::TypeId, semantic::TypeNode};

use crate::repository::TypeSource;

/// A set of type nodes keyed by qualified name.
///
/// Catalogs deserialize from a document with a `types` list, e.g. in TOML:
///
/// ```toml
/// [[types]]
/// name = "geo.Shape"
/// abstract = true
/// superclass = "java.lang.Object"
/// ```
///
/// Later entries with the same qualified name replace earlier ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "CatalogDocument")]
pub struct TypeCatalog {
    nodes: IndexMap<TypeId, TypeNode>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    types: Vec<TypeNode>,
}

impl From<CatalogDocument> for TypeCatalog {
    fn from(document: CatalogDocument) -> Self {
        Self::from_nodes(document.types)
    }
}

impl TypeCatalog {
    pub fn from_nodes(nodes: impl IntoIterator<Item = TypeNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|node| (node.id(), node)).collect(),
        }
    }

    /// Adds or replaces a node.
    pub fn insert(&mut self, node: TypeNode) {
        self.nodes.insert(node.id(), node);
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All type identities in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Identities of the types that are part of the documentation output.
    pub fn included(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.nodes
            .values()
            .filter(|node| node.is_included())
            .map(TypeNode::id)
    }
}

impl TypeSource for TypeCatalog {
    fn lookup(&self, id: TypeId) -> Option<TypeNode> {
        self.nodes.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use lineage_core::semantic::TypeKind;

    use super::*;

    #[test]
    fn test_included_filters_external_types() {
        let catalog = TypeCatalog::from_nodes([
            TypeNode::new("java.lang.Object", TypeKind::Class).with_included(false),
            TypeNode::new("geo.Shape", TypeKind::Class),
        ]);

        let included: Vec<TypeId> = catalog.included().collect();
        assert_eq!(included, vec![TypeId::new("geo.Shape")]);
        assert_eq!(catalog.ids().count(), 2);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut catalog = TypeCatalog::default();
        catalog.insert(TypeNode::new("geo.Shape", TypeKind::Class));
        catalog.insert(TypeNode::new("geo.Shape", TypeKind::Interface));

        assert_eq!(catalog.len(), 1);
        let node = catalog.lookup(TypeId::new("geo.Shape")).expect("node present");
        assert_eq!(node.kind(), TypeKind::Interface);
    }
}
