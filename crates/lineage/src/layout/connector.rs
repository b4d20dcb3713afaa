//! Inheritance connectors and their path geometry.

use std::fmt;

use log::trace;

use lineage_core::{geometry::Point, identifier::TypeId};

use super::Error;

/// Index of a connector within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectorId(usize);

impl ConnectorId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// The relationship a connector draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    /// A class extending a class, or an interface extending an interface
    Inheritance,
    /// A class implementing an interface
    Implementation,
}

impl ConnectorKind {
    /// Picks the kind from whether each end is an interface.
    pub fn between(child_is_interface: bool, parent_is_interface: bool) -> Self {
        if !child_is_interface && parent_is_interface {
            Self::Implementation
        } else {
            Self::Inheritance
        }
    }

    /// The style class and marker suffix of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Inheritance => "inheritance",
            Self::Implementation => "implementation",
        }
    }

    /// The id of the arrowhead marker definition.
    pub fn marker_id(self) -> String {
        format!("arrow-{}", self.name())
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One piece of a connector path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line {
        from: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
}

impl PathSegment {
    pub fn start(&self) -> Point {
        match self {
            Self::Line { from, .. } | Self::Cubic { from, .. } => *from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            Self::Line { to, .. } | Self::Cubic { to, .. } => *to,
        }
    }
}

/// A directed edge from a child symbol (start) to its supertype (end).
///
/// Endpoints are assigned by the layout engine once both symbols are
/// placed; the path is derived from them on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    child: TypeId,
    parent: TypeId,
    kind: ConnectorKind,
    lead: f32,
    start: Option<Point>,
    end: Option<Point>,
}

impl Connector {
    /// Creates a connector without endpoints.
    ///
    /// `lead` is the length of the straight piece entering the parent box.
    pub fn new(child: TypeId, parent: TypeId, kind: ConnectorKind, lead: f32) -> Self {
        Self {
            child,
            parent,
            kind,
            lead,
            start: None,
            end: None,
        }
    }

    /// The subtype end.
    pub fn child(&self) -> TypeId {
        self.child
    }

    /// The supertype end, where the arrowhead is drawn.
    pub fn parent(&self) -> TypeId {
        self.parent
    }

    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start
    }

    pub fn end_point(&self) -> Option<Point> {
        self.end
    }

    pub fn set_start_point(&mut self, point: Point) {
        self.start = Some(point);
    }

    pub fn set_end_point(&mut self, point: Point) {
        self.end = Some(point);
    }

    /// Computes the path from the child to the parent.
    ///
    /// Vertically aligned endpoints are joined by one straight line. Otherwise
    /// a cubic curve bends from the start towards a point `lead` below the
    /// end, and a straight line finishes the path into the parent box.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteConnector`] if an endpoint is missing.
    pub fn path(&self) -> Result<Vec<PathSegment>, Error> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Err(Error::IncompleteConnector {
                from: self.child.to_string(),
                to: self.parent.to_string(),
            });
        };

        if start.x() == end.x() {
            return Ok(vec![PathSegment::Line {
                from: start,
                to: end,
            }]);
        }

        let mid = Point::new(end.x(), end.y() + self.lead);
        let dy = start.y() - mid.y();
        let dx = (end.x() - start.x()).abs();
        // Pull the handles no further than the vertical distance so the curve
        // stays monotonic in y.
        let pull = (0.4 * dy.abs() + 0.1 * dx).min(dy.abs()) * dy.signum();

        trace!(
            child = self.child.to_string(),
            parent = self.parent.to_string(),
            pull;
            "Connector path computed"
        );

        Ok(vec![
            PathSegment::Cubic {
                from: start,
                ctrl1: Point::new(start.x(), start.y() - pull),
                ctrl2: Point::new(mid.x(), mid.y() + pull),
                to: mid,
            },
            PathSegment::Line { from: mid, to: end },
        ])
    }

    /// Renders the path as SVG path data.
    pub fn path_data(&self) -> Result<String, Error> {
        let segments = self.path()?;
        let mut data = match segments.first() {
            Some(segment) => format!("M {} {}", segment.start().x(), segment.start().y()),
            None => String::new(),
        };

        for segment in segments {
            match segment {
                PathSegment::Line { to, .. } => {
                    data.push_str(&format!(" L {} {}", to.x(), to.y()));
                }
                PathSegment::Cubic {
                    ctrl1, ctrl2, to, ..
                } => {
                    data.push_str(&format!(
                        " C {} {}, {} {}, {} {}",
                        ctrl1.x(),
                        ctrl1.y(),
                        ctrl2.x(),
                        ctrl2.y(),
                        to.x(),
                        to.y()
                    ));
                }
            }
        }

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn connector() -> Connector {
        Connector::new(
            TypeId::new("geo.Circle"),
            TypeId::new("geo.Shape"),
            ConnectorKind::Inheritance,
            10.0,
        )
    }

    #[test]
    fn test_kind_selection() {
        assert_eq!(
            ConnectorKind::between(false, true),
            ConnectorKind::Implementation
        );
        assert_eq!(ConnectorKind::between(false, false), ConnectorKind::Inheritance);
        assert_eq!(ConnectorKind::between(true, true), ConnectorKind::Inheritance);
        assert_eq!(ConnectorKind::between(true, false), ConnectorKind::Inheritance);
        assert_eq!(ConnectorKind::Implementation.marker_id(), "arrow-implementation");
    }

    #[test]
    fn test_path_requires_both_endpoints() {
        let mut connector = connector();
        assert!(matches!(
            connector.path(),
            Err(Error::IncompleteConnector { .. })
        ));

        connector.set_start_point(Point::new(10.0, 100.0));
        let err = connector.path().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Connector from geo.Circle to geo.Shape has no geometry yet"
        );
    }

    #[test]
    fn test_aligned_endpoints_give_straight_line() {
        let mut connector = connector();
        connector.set_start_point(Point::new(50.0, 120.0));
        connector.set_end_point(Point::new(50.0, 60.0));

        let path = connector.path().unwrap();
        assert_eq!(
            path,
            vec![PathSegment::Line {
                from: Point::new(50.0, 120.0),
                to: Point::new(50.0, 60.0),
            }]
        );
        assert_eq!(connector.path_data().unwrap(), "M 50 120 L 50 60");
    }

    #[test]
    fn test_offset_endpoints_give_curve_then_lead() {
        let mut connector = connector();
        connector.set_start_point(Point::new(20.0, 120.0));
        connector.set_end_point(Point::new(80.0, 60.0));

        let path = connector.path().unwrap();
        assert_eq!(path.len(), 2);
        assert!(matches!(path[0], PathSegment::Cubic { .. }));
        assert_eq!(path[0].end(), Point::new(80.0, 70.0));
        assert_eq!(
            path[1],
            PathSegment::Line {
                from: Point::new(80.0, 70.0),
                to: Point::new(80.0, 60.0),
            }
        );
        assert!(connector.path_data().unwrap().contains(" C "));
    }

    #[test]
    fn test_path_follows_latest_endpoints() {
        let mut connector = connector();
        connector.set_start_point(Point::new(20.0, 120.0));
        connector.set_end_point(Point::new(80.0, 60.0));
        assert_eq!(connector.path().unwrap().len(), 2);

        connector.set_start_point(Point::new(80.0, 120.0));
        assert_eq!(connector.path().unwrap().len(), 1);
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        #[test]
        fn path_reconstructs_endpoints(start in point_strategy(), end in point_strategy()) {
            let mut connector = connector();
            connector.set_start_point(start);
            connector.set_end_point(end);

            let path = connector.path().unwrap();
            prop_assert_eq!(path.len() == 1, start.x() == end.x());
            prop_assert_eq!(path.first().map(PathSegment::start), Some(start));
            prop_assert_eq!(path.last().map(PathSegment::end), Some(end));
            for pair in path.windows(2) {
                prop_assert_eq!(pair[0].end(), pair[1].start());
            }
        }
    }
}
