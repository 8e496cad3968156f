use std::fmt;

use geo::prelude::ClosestPoint;
use serde::{Deserialize, Serialize};

use crate::{Distance, Pt2D};

/// A line segment between two points. Zero-length segments are allowed; callers that can't handle
/// them should check `is_degenerate`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line(Pt2D, Pt2D);

impl Line {
    pub fn new(pt1: Pt2D, pt2: Pt2D) -> Line {
        Line(pt1, pt2)
    }

    pub fn pt1(&self) -> Pt2D {
        self.0
    }

    pub fn pt2(&self) -> Pt2D {
        self.1
    }

    pub fn points(&self) -> [Pt2D; 2] {
        [self.0, self.1]
    }

    pub fn length(&self) -> Distance {
        self.pt1().dist_to(self.pt2())
    }

    /// True if both endpoints are within `EPSILON_DIST` of each other.
    pub fn is_degenerate(&self) -> bool {
        self.pt1().approx_same(self.pt2())
    }

    pub fn middle(&self) -> Pt2D {
        Pt2D::new(
            (self.pt1().x() + self.pt2().x()) / 2.0,
            (self.pt1().y() + self.pt2().y()) / 2.0,
        )
    }

    pub fn reversed(&self) -> Line {
        Line(self.pt2(), self.pt1())
    }

    /// Is the point (approximately) one of the two endpoints?
    pub fn has_endpoint(&self, pt: Pt2D) -> bool {
        self.pt1().approx_same(pt) || self.pt2().approx_same(pt)
    }

    /// Finds the point on this segment closest to the query point. Returns `None` for a
    /// zero-length segment, where there's no well-defined answer.
    pub fn closest_pt(&self, query: Pt2D) -> Option<Pt2D> {
        if self.pt1() == self.pt2() {
            return None;
        }
        match self.to_geo().closest_point(&query.to_geo()) {
            geo::Closest::Intersection(pt) | geo::Closest::SinglePoint(pt) => Some(pt.into()),
            geo::Closest::Indeterminate => None,
        }
    }

    /// The shortest distance from the query point to anywhere on this segment. A zero-length
    /// segment behaves like a single point.
    pub fn dist_to_pt(&self, query: Pt2D) -> Distance {
        match self.closest_pt(query) {
            Some(pt) => pt.dist_to(query),
            None => self.pt1().dist_to(query),
        }
    }

    /// Splits this segment in two pieces meeting at `pt`. The point doesn't need to lie on the
    /// segment.
    pub fn split_at(&self, pt: Pt2D) -> (Line, Line) {
        (Line(self.pt1(), pt), Line(pt, self.pt2()))
    }

    pub fn to_geo(&self) -> geo::Line<f64> {
        geo::Line::new(
            (self.pt1().x(), self.pt1().y()),
            (self.pt2().x(), self.pt2().y()),
        )
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Line::new(")?;
        writeln!(f, "  Pt2D::new({}, {}),", self.0.x(), self.0.y())?;
        writeln!(f, "  Pt2D::new({}, {}),", self.1.x(), self.1.y())?;
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_pt_interior_and_clamped() {
        let line = Line::new(Pt2D::new(0.0, 20.0), Pt2D::new(100.0, 20.0));
        assert_eq!(line.closest_pt(Pt2D::new(50.0, 0.0)), Some(Pt2D::new(50.0, 20.0)));
        // Past the end, the projection clamps to the endpoint
        assert_eq!(
            line.closest_pt(Pt2D::new(130.0, 60.0)),
            Some(Pt2D::new(100.0, 20.0))
        );
        assert_eq!(line.dist_to_pt(Pt2D::new(50.0, 0.0)), Distance::meters(20.0));
        assert_eq!(line.dist_to_pt(Pt2D::new(130.0, 60.0)), Distance::meters(50.0));
    }

    #[test]
    fn point_on_segment() {
        let line = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(10.0, 0.0));
        assert_eq!(line.closest_pt(Pt2D::new(4.0, 0.0)), Some(Pt2D::new(4.0, 0.0)));
        assert_eq!(line.dist_to_pt(Pt2D::new(4.0, 0.0)), Distance::ZERO);
    }

    #[test]
    fn degenerate() {
        let line = Line::new(Pt2D::new(3.0, 4.0), Pt2D::new(3.0, 4.0));
        assert!(line.is_degenerate());
        assert_eq!(line.closest_pt(Pt2D::new(0.0, 0.0)), None);
        assert_eq!(line.dist_to_pt(Pt2D::new(0.0, 0.0)), Distance::meters(5.0));
    }

    #[test]
    fn split() {
        let line = Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(100.0, 0.0));
        let (a, b) = line.split_at(Pt2D::new(50.0, 20.0));
        assert_eq!(a.pt2(), b.pt1());
        assert!(line.has_endpoint(a.pt1()));
        assert!(line.has_endpoint(b.pt2()));
        assert_eq!(line.middle(), Pt2D::new(50.0, 0.0));
    }
}
