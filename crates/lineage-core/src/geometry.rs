//! Geometric primitives for diagram layout.
//!
//! Every measurement in a class diagram is expressed with these types:
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height of a symbol, row or document
//! - [`Bounds`] - An axis-aligned rectangle
//!
//! # Coordinate System
//!
//! Lineage uses the SVG coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Rows of supertypes are stacked above their subtypes, so a connector that
//! points at a supertype travels towards smaller `y` values.

use std::fmt;

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use lineage_core::geometry::Point;
/// let start = Point::new(10.0, 80.0);
/// let end = Point::new(30.0, 20.0);
///
/// let delta = end.sub_point(start);
/// assert_eq!(delta.x(), 20.0);
/// assert_eq!(delta.y(), -60.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Converts a top-left point and a size into bounds
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_top_left(self, size)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a diagram element.
///
/// # Examples
///
/// ```
/// # use lineage_core::geometry::Size;
/// let symbol = Size::new(120.0, 64.0);
/// let tab = Size::new(40.0, 20.0);
///
/// let grown = symbol.expand(tab.width() / 2.0, tab.height() / 2.0);
/// assert_eq!(grown, Size::new(140.0, 74.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size grown by the given amounts
    pub fn expand(self, width: f32, height: f32) -> Self {
        Self {
            width: self.width + width,
            height: self.height + height,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An axis-aligned rectangle defined by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Returns the centre of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.25);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.25);
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_display() {
        assert_eq!(Point::new(1.5, -2.0).to_string(), "(1.5, -2)");
    }

    #[test]
    fn test_size_expand() {
        assert_eq!(Size::new(1.0, 2.0).expand(3.0, 4.0), Size::new(4.0, 6.0));
    }

    #[test]
    fn test_bounds_from_top_left() {
        let bounds = Point::new(10.0, 20.0).to_bounds(Size::new(30.0, 40.0));
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.to_size(), Size::new(30.0, 40.0));
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn check_add_sub_inverse(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let result = p1.add_point(p2).sub_point(p2);

        prop_assert!(approx_eq!(f32, result.x(), p1.x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, result.y(), p1.y(), epsilon = 0.001));
        Ok(())
    }

    fn check_bounds_keep_size(p: Point, w: f32, h: f32) -> Result<(), TestCaseError> {
        let bounds = p.to_bounds(Size::new(w, h));

        prop_assert!(approx_eq!(f32, bounds.width(), w, epsilon = 0.001));
        prop_assert!(approx_eq!(f32, bounds.height(), h, epsilon = 0.001));
        prop_assert!(bounds.min_x() <= bounds.center().x());
        prop_assert!(bounds.center().y() <= bounds.max_y());
        Ok(())
    }

    proptest! {
        #[test]
        fn add_sub_inverse(p1 in point_strategy(), p2 in point_strategy()) {
            check_add_sub_inverse(p1, p2)?;
        }

        #[test]
        fn bounds_keep_size(p in point_strategy(), w in 0.0f32..500.0, h in 0.0f32..500.0) {
            check_bounds_keep_size(p, w, h)?;
        }
    }
}
