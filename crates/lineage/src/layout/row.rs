//! Horizontal bands of symbols.

use indexmap::IndexMap;

use lineage_core::{geometry::Size, identifier::TypeId};

use super::Error;

/// An insertion-ordered, duplicate-free band of symbols.
///
/// A row only needs the sizes of its members, which never change once a
/// symbol has been rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    members: IndexMap<TypeId, Size>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a member. Returns `false` if it was already present.
    pub fn insert(&mut self, id: TypeId, size: Size) -> bool {
        if self.members.contains_key(&id) {
            return false;
        }
        self.members.insert(id, size);
        true
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.members.contains_key(&id)
    }

    /// Removes a member, keeping the order of the others.
    pub fn remove(&mut self, id: TypeId) -> Option<Size> {
        self.members.shift_remove(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member identities in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.members.keys().copied()
    }

    /// Sum of member widths plus one `spacing` per member.
    ///
    /// Each member owns half a gap on either side.
    pub fn width(&self, spacing: f32) -> f32 {
        self.members
            .values()
            .map(|size| size.width() + spacing)
            .sum()
    }

    /// Height of the tallest member.
    pub fn height(&self) -> f32 {
        self.members
            .values()
            .map(|size| size.height())
            .fold(0.0, f32::max)
    }

    /// Computes the x coordinate of every member within a band `max_width` wide.
    ///
    /// A single member is centred. Members that all fit into equal columns are
    /// centred within their column. Otherwise members are packed left to right
    /// with `spacing` between them, starting half a gap from the left edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroWidth`] if `max_width` is not positive.
    pub fn distribute_contents(
        &self,
        max_width: f32,
        spacing: f32,
    ) -> Result<Vec<(TypeId, f32)>, Error> {
        if max_width <= 0.0 {
            return Err(Error::ZeroWidth);
        }

        let count = self.members.len();
        if count == 1 {
            return Ok(self
                .members
                .iter()
                .map(|(id, size)| (*id, (max_width - size.width()) / 2.0))
                .collect());
        }

        let column = max_width / count as f32;
        if self.members.values().all(|size| size.width() < column) {
            return Ok(self
                .members
                .iter()
                .enumerate()
                .map(|(index, (id, size))| {
                    (*id, index as f32 * column + (column - size.width()) / 2.0)
                })
                .collect());
        }

        let mut x = spacing / 2.0;
        Ok(self
            .members
            .iter()
            .map(|(id, size)| {
                let position = (*id, x);
                x += size.width() + spacing;
                position
            })
            .collect())
    }
}
