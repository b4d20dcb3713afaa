//! The shared cache of discovered type nodes.
//!
//! Diagrams for different focus types share most of their ancestors, so the
//! nodes a [`TypeSource`] hands out are cached in a [`TypeRepository`] that
//! lives as long as the documentation run. Several diagrams may be rendered
//! concurrently against one repository: every mutation goes through
//! [`TypeRepository::with_write_lock`], which admits one writer at a time,
//! while lookups of already resolved nodes only take the read side.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, PoisonError, RwLock},
};

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use lineage_core::{identifier::TypeId, semantic::TypeNode};

use crate::LineageError;

/// Accessor for type nodes supplied by the collaborator.
///
/// The repository calls it repeatedly during discovery and tolerates it
/// returning nodes that were already seen.
pub trait TypeSource {
    /// Returns the node for `id`, or `None` if the type is unknown.
    fn lookup(&self, id: TypeId) -> Option<TypeNode>;
}

/// The mutable state guarded by a [`TypeRepository`].
#[derive(Debug, Default)]
pub struct Registry {
    nodes: IndexMap<TypeId, Arc<TypeNode>>,
    children: HashMap<TypeId, IndexSet<TypeId>>,
    resolved: HashSet<TypeId>,
}

impl Registry {
    /// Returns the cached node for `id`.
    pub fn get(&self, id: TypeId) -> Option<&Arc<TypeNode>> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Caches `node`, returning the shared handle.
    ///
    /// A node that is already cached is kept; the new one is dropped.
    pub fn insert(&mut self, node: TypeNode) -> Arc<TypeNode> {
        Arc::clone(
            self.nodes
                .entry(node.id())
                .or_insert_with(|| Arc::new(node)),
        )
    }

    /// Records `child` as a direct subtype of `parent`.
    ///
    /// Returns `false` if the back-reference was already known.
    pub fn add_child(&mut self, parent: TypeId, child: TypeId) -> bool {
        self.children.entry(parent).or_default().insert(child)
    }

    /// Direct subtypes of `id` in discovery order.
    pub fn children(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.children
            .get(&id)
            .into_iter()
            .flat_map(|children| children.iter().copied())
    }

    /// Number of cached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registers `id` and its whole ancestor closure, wiring child back-references.
    fn resolve(&mut self, id: TypeId, source: &dyn TypeSource) -> Result<Arc<TypeNode>, LineageError> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([id]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) || self.resolved.contains(&current) {
                continue;
            }

            let cached = self.nodes.get(&current).cloned();
            let node = match cached {
                Some(node) => node,
                None => {
                    let node = source
                        .lookup(current)
                        .ok_or_else(|| LineageError::unknown_type(current.to_string()))?;
                    trace!(qualified_name = current.to_string(); "Registered type");
                    self.insert(node)
                }
            };

            for supertype in node.supertypes() {
                self.add_child(supertype, current);
                queue.push_back(supertype);
            }
        }

        self.resolved.extend(visited);

        self.nodes
            .get(&id)
            .map(Arc::clone)
            .ok_or_else(|| LineageError::unknown_type(id.to_string()))
    }
}

/// A lock-guarded, shareable [`Registry`].
///
/// # Examples
///
/// ```
/// use lineage::{TypeCatalog, TypeRepository};
/// use lineage_core::{identifier::TypeId, semantic::{TypeKind, TypeNode}};
///
/// let catalog = TypeCatalog::from_nodes([
///     TypeNode::new("java.lang.Object", TypeKind::Class),
///     TypeNode::new("geo.Shape", TypeKind::Class).with_superclass("java.lang.Object"),
/// ]);
///
/// let repository = TypeRepository::new();
/// repository.discover(TypeId::new("geo.Shape"), &catalog).unwrap();
///
/// assert_eq!(repository.children(TypeId::new("java.lang.Object")), vec![TypeId::new("geo.Shape")]);
/// ```
#[derive(Debug, Default)]
pub struct TypeRepository {
    registry: RwLock<Registry>,
}

impl TypeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the registry.
    ///
    /// At most one thread extends the cache at a time.
    pub fn with_write_lock<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut registry)
    }

    /// Runs `f` with shared read access to the registry.
    pub fn with_read_lock<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        f(&registry)
    }

    /// Resolves and caches the ancestor closure of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LineageError::UnknownType`] if `id` or one of its ancestors
    /// cannot be resolved by `source`.
    pub fn discover(
        &self,
        id: TypeId,
        source: &dyn TypeSource,
    ) -> Result<Arc<TypeNode>, LineageError> {
        let node = self.with_write_lock(|registry| registry.resolve(id, source))?;
        debug!(qualified_name = id.to_string(); "Type hierarchy discovered");
        Ok(node)
    }

    /// Resolves every type in `ids`, so that children of any of them are known.
    ///
    /// Returns the number of cached nodes afterwards.
    pub fn register_all(
        &self,
        ids: impl IntoIterator<Item = TypeId>,
        source: &dyn TypeSource,
    ) -> Result<usize, LineageError> {
        self.with_write_lock(|registry| {
            for id in ids {
                registry.resolve(id, source)?;
            }
            Ok(registry.len())
        })
    }

    /// Returns the cached node for `id` without touching the write lock.
    pub fn node(&self, id: TypeId) -> Option<Arc<TypeNode>> {
        self.with_read_lock(|registry| registry.get(id).map(Arc::clone))
    }

    /// Direct subtypes of `id` known so far, in discovery order.
    pub fn children(&self, id: TypeId) -> Vec<TypeId> {
        self.with_read_lock(|registry| registry.children(id).collect())
    }
}
