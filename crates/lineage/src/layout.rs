//! Row-based layout of class hierarchies.
//!
//! The engine arranges the symbols of one diagram into horizontal rows
//! (generations): hierarchy roots on top, then ancestors of the focus type,
//! the focus type itself and finally its direct children.
//!
//! # Pipeline
//!
//! ```text
//! focus type
//!     ↓ build_rows      (breadth-first over supertypes, connectors created)
//! rows
//!     ↓ separate_rows   (split rows until no row holds a type and its child)
//! converged rows
//!     ↓ distribute      (x per row, y per row, connector endpoints)
//! placed Document
//! ```
//!
//! # Submodules
//!
//! - [`Row`] - A band of symbols and its horizontal distribution
//! - [`Connector`] - An inheritance edge and its path geometry

mod connector;
mod row;

pub use connector::{Connector, ConnectorId, ConnectorKind, PathSegment};
pub use row::Row;

use std::collections::{HashMap, HashSet};

use log::{debug, info, trace, warn};
use thiserror::Error;

use lineage_core::{
    geometry::{Bounds, Point, Size},
    identifier::TypeId,
};

use crate::{
    config::{HierarchyConfig, LayoutConfig},
    export::Document,
    repository::TypeRepository,
    symbol::SymbolRenderer,
};

/// Layout failures.
///
/// These are contract or internal-consistency violations; none of them is
/// recovered from.
#[derive(Debug, Error)]
pub enum Error {
    /// Row distribution requested within a band of zero width.
    #[error("Cannot distribute rows within zero total width")]
    ZeroWidth,

    #[error("Symbol {qualified_name} is already placed")]
    AlreadyPlaced { qualified_name: String },

    /// A symbol is still unplaced after distribution.
    #[error("Symbol {qualified_name} was not placed by the layout")]
    Unplaced { qualified_name: String },

    /// Path geometry requested before both endpoints were set.
    #[error("Connector from {from} to {to} has no geometry yet")]
    IncompleteConnector { from: String, to: String },

    #[error("No symbol for type {qualified_name}")]
    MissingSymbol { qualified_name: String },
}

/// Arranges the symbols of one diagram.
///
/// Symbols and connectors are created into the engine's [`Document`], which
/// also holds the write-once placement table filled by
/// [`LayoutEngine::distribute`].
#[derive(Debug)]
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    universal_root: TypeId,
    repository: &'a TypeRepository,
    renderer: SymbolRenderer<'a>,
    api_only: bool,
    document: Document,
    rows: Vec<Row>,
    edges: HashSet<(TypeId, TypeId)>,
    /// Connectors by child (start) symbol.
    by_start: HashMap<TypeId, Vec<ConnectorId>>,
    /// Connectors by parent (end) symbol.
    by_end: HashMap<TypeId, Vec<ConnectorId>>,
}

impl<'a> LayoutEngine<'a> {
    /// Creates an engine filling `document`.
    ///
    /// Every type reachable from the focus must already be resolved in
    /// `repository`.
    pub fn new(
        config: &'a LayoutConfig,
        hierarchy: &'a HierarchyConfig,
        repository: &'a TypeRepository,
        api_only: bool,
        document: Document,
    ) -> Self {
        Self {
            config,
            universal_root: TypeId::new(hierarchy.universal_root()),
            repository,
            renderer: SymbolRenderer::new(config, hierarchy, repository),
            api_only,
            document,
            rows: Vec::new(),
            edges: HashSet::new(),
            by_start: HashMap::new(),
            by_end: HashMap::new(),
        }
    }

    /// The rows in top-to-bottom order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Connectors whose child end is `id`.
    pub fn connectors_from(&self, id: TypeId) -> &[ConnectorId] {
        self.by_start.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Connectors whose parent end is `id`.
    pub fn connectors_to(&self, id: TypeId) -> &[ConnectorId] {
        self.by_end.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Builds the rows of the diagram of `focus` and separates them.
    ///
    /// Rows are, from top to bottom: the no-parent row, ancestor rows from the
    /// farthest to the nearest, the focus row (unless the focus has no
    /// parent) and the row of the focus's direct children. Empty rows are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSymbol`] if a reachable type is not resolved in
    /// the repository.
    pub fn build_rows(&mut self, focus: TypeId) -> Result<&[Row], Error> {
        info!(focus = focus.to_string(); "Building rows");

        let mut no_parent = Row::new();
        let focus_size = self.ensure_symbol(focus, true)?;
        let focus_row = if self.effective_supertypes(focus)?.is_empty() {
            no_parent.insert(focus, focus_size);
            None
        } else {
            let mut row = Row::new();
            row.insert(focus, focus_size);
            Some(row)
        };

        let mut seen = HashSet::from([focus]);

        let mut children = Row::new();
        for child in self.repository.children(focus) {
            if !self.effective_supertypes(child)?.contains(&focus) {
                continue;
            }
            let size = self.ensure_symbol(child, false)?;
            self.add_connector(child, focus)?;
            if seen.insert(child) {
                children.insert(child, size);
            }
        }

        let mut ancestor_rows = Vec::new();
        let mut frontier = vec![focus];
        loop {
            let mut next: Option<Row> = None;
            for member in frontier {
                for supertype in self.effective_supertypes(member)? {
                    let size = self.ensure_symbol(supertype, false)?;
                    self.add_connector(member, supertype)?;
                    if !seen.insert(supertype) {
                        continue;
                    }
                    // Each supertype decides on its own whether it is a root
                    if self.effective_supertypes(supertype)?.is_empty() {
                        no_parent.insert(supertype, size);
                    } else {
                        next.get_or_insert_with(Row::new).insert(supertype, size);
                    }
                }
            }

            match next {
                Some(row) => {
                    frontier = row.ids().collect();
                    ancestor_rows.push(row);
                }
                None => break,
            }
        }

        let mut rows = vec![no_parent];
        rows.extend(ancestor_rows.into_iter().rev());
        rows.extend(focus_row);
        rows.push(children);
        let built = rows.len();
        rows.retain(|row| !row.is_empty());
        let dropped = built - rows.len();
        self.rows = rows;

        let extracted = self.separate_rows();
        debug!(
            rows = self.rows.len(),
            dropped,
            extracted,
            connectors = self.document.connectors().len();
            "Rows built"
        );

        Ok(&self.rows)
    }

    /// Splits rows until no row contains a type together with one of its
    /// direct children. Returns the number of extracted members.
    ///
    /// Within a row, every member with a child in the same row moves to a new
    /// row inserted directly above. Passes repeat until one makes no change.
    pub fn separate_rows(&mut self) -> usize {
        let mut extracted = 0;

        loop {
            let mut changed = false;
            let mut index = 0;

            while index < self.rows.len() {
                let row = &self.rows[index];
                let conflicting: Vec<TypeId> = row
                    .ids()
                    .filter(|id| {
                        self.children_of(*id)
                            .into_iter()
                            .any(|child| row.contains(child))
                    })
                    .collect();

                if conflicting.is_empty() {
                    index += 1;
                    continue;
                }
                if conflicting.len() == row.len() {
                    warn!(
                        members = conflicting.len();
                        "Cyclic inheritance within a row, leaving it unseparated"
                    );
                    index += 1;
                    continue;
                }

                let mut parents = Row::new();
                for id in &conflicting {
                    if let Some(size) = self.rows[index].remove(*id) {
                        parents.insert(*id, size);
                    }
                }
                trace!(row = index, moved = conflicting.len(); "Row split");

                extracted += conflicting.len();
                self.rows.insert(index, parents);
                changed = true;
                index += 2;
            }

            if !changed {
                return extracted;
            }
        }
    }

    /// Assigns positions to every symbol and endpoints to every connector,
    /// and sets the document dimension. Returns that dimension.
    ///
    /// Rows start half a gap from the top and are separated by one gap; the
    /// document ends half a gap below the last row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroWidth`] if the widest row has no width and
    /// [`Error::Unplaced`] if a defined symbol received no position.
    pub fn distribute(&mut self) -> Result<Size, Error> {
        let spacing = self.config.element_spacing();
        let max_width = self
            .rows
            .iter()
            .map(|row| row.width(spacing))
            .fold(0.0, f32::max);
        if max_width <= 0.0 {
            return Err(Error::ZeroWidth);
        }

        let mut y = spacing / 2.0;
        let mut bottom = y;
        for row in &self.rows {
            for (id, x) in row.distribute_contents(max_width, spacing)? {
                self.document.add_placement(id, Point::new(x, y))?;
            }
            bottom = y + row.height();
            y = bottom + spacing;
        }

        if let Some(unplaced) = self
            .document
            .symbols()
            .find(|symbol| self.document.placement(symbol.id()).is_none())
        {
            return Err(Error::Unplaced {
                qualified_name: unplaced.id().to_string(),
            });
        }

        self.place_connectors()?;

        let dimension = Size::new(max_width, bottom + spacing / 2.0);
        self.document.set_dimension(dimension);
        info!(width = dimension.width(), height = dimension.height(); "Layout distributed");
        Ok(dimension)
    }

    /// Spreads connector endpoints along the symbol edges.
    ///
    /// Child ends sit on the top edge of the child's main box, parent ends on
    /// the bottom edge of the parent. Each set is ordered by the x of the
    /// opposite symbol so neighbouring connectors do not cross at the edge.
    fn place_connectors(&mut self) -> Result<(), Error> {
        let pitch = self.config.connector_spacing();
        let ids: Vec<TypeId> = self.rows.iter().flat_map(Row::ids).collect();

        for id in ids {
            let bounds = self.base_bounds(id)?;

            let starting = self.sorted_by_opposite(self.connectors_from(id), Connector::parent)?;
            for (connector_id, x) in spread(&starting, bounds.center().x(), pitch) {
                if let Some(connector) = self.document.connector_mut(connector_id) {
                    connector.set_start_point(Point::new(x, bounds.min_y()));
                }
            }

            let ending = self.sorted_by_opposite(self.connectors_to(id), Connector::child)?;
            for (connector_id, x) in spread(&ending, bounds.center().x(), pitch) {
                if let Some(connector) = self.document.connector_mut(connector_id) {
                    connector.set_end_point(Point::new(x, bounds.max_y()));
                }
            }
        }

        Ok(())
    }

    fn sorted_by_opposite(
        &self,
        connectors: &[ConnectorId],
        opposite: fn(&Connector) -> TypeId,
    ) -> Result<Vec<ConnectorId>, Error> {
        let mut keyed = Vec::with_capacity(connectors.len());
        for connector_id in connectors {
            if let Some(connector) = self.document.connector(*connector_id) {
                let x = self.base_bounds(opposite(connector))?.center().x();
                keyed.push((*connector_id, x));
            }
        }
        keyed.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(keyed.into_iter().map(|(connector_id, _)| connector_id).collect())
    }

    /// The placed main box of `id`.
    fn base_bounds(&self, id: TypeId) -> Result<Bounds, Error> {
        let symbol = self.document.symbol(id).ok_or_else(|| Error::MissingSymbol {
            qualified_name: id.to_string(),
        })?;
        let position = self
            .document
            .placement(id)
            .ok_or_else(|| Error::Unplaced {
                qualified_name: id.to_string(),
            })?;
        Ok(symbol.base_bounds(position))
    }

    /// Renders the symbol of `id` once and returns its size.
    fn ensure_symbol(&mut self, id: TypeId, is_focus: bool) -> Result<Size, Error> {
        if let Some(symbol) = self.document.symbol(id) {
            return Ok(symbol.size());
        }

        let node = self.repository.node(id).ok_or_else(|| Error::MissingSymbol {
            qualified_name: id.to_string(),
        })?;
        let symbol = self.renderer.render(node, is_focus, self.api_only);
        let size = symbol.size();
        self.document.add_symbol_definition(symbol);
        Ok(size)
    }

    /// Direct supertypes drawn in the diagram.
    ///
    /// Interfaces do not show the universal root as a parent.
    fn effective_supertypes(&self, id: TypeId) -> Result<Vec<TypeId>, Error> {
        let node = self.repository.node(id).ok_or_else(|| Error::MissingSymbol {
            qualified_name: id.to_string(),
        })?;
        Ok(node
            .supertypes()
            .filter(|supertype| !(node.is_interface() && *supertype == self.universal_root))
            .collect())
    }

    fn add_connector(&mut self, child: TypeId, parent: TypeId) -> Result<(), Error> {
        if !self.edges.insert((child, parent)) {
            return Ok(());
        }

        let is_interface = |id: TypeId| {
            self.document
                .symbol(id)
                .map(|symbol| symbol.is_interface())
                .ok_or_else(|| Error::MissingSymbol {
                    qualified_name: id.to_string(),
                })
        };
        let kind = ConnectorKind::between(is_interface(child)?, is_interface(parent)?);

        let connector_id = self.document.add_connector(Connector::new(
            child,
            parent,
            kind,
            self.config.connector_lead(),
        ));
        self.by_start.entry(child).or_default().push(connector_id);
        self.by_end.entry(parent).or_default().push(connector_id);

        trace!(
            child = child.to_string(),
            parent = parent.to_string(),
            kind = kind.name();
            "Connector added"
        );
        Ok(())
    }

    /// Direct children of `id` drawn in the diagram.
    ///
    /// Taken from the repository: connectors only link the focus's children
    /// to the focus, not to each other.
    fn children_of(&self, id: TypeId) -> Vec<TypeId> {
        self.repository
            .children(id)
            .into_iter()
            .filter(|child| self.document.symbol(*child).is_some())
            .filter(|child| {
                self.effective_supertypes(*child)
                    .is_ok_and(|supertypes| supertypes.contains(&id))
            })
            .collect()
    }
}

/// Pairs each connector with an x spread around `center` at `pitch` intervals.
fn spread(connectors: &[ConnectorId], center: f32, pitch: f32) -> Vec<(ConnectorId, f32)> {
    let offset = (connectors.len() as f32 - 1.0) / 2.0;
    connectors
        .iter()
        .enumerate()
        .map(|(index, connector_id)| (*connector_id, center + (index as f32 - offset) * pitch))
        .collect()
}
