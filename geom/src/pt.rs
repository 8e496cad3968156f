use std::fmt;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::{round_for_key, Distance, EPSILON_DIST};

/// This represents world-space in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        if !x.is_finite() || !y.is_finite() {
            panic!("Bad Pt2D {}, {}", x, y);
        }

        Pt2D { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn dist_to(self, to: Pt2D) -> Distance {
        Distance::meters((self.x - to.x).hypot(self.y - to.y))
    }

    /// Is this point within `threshold` of another point?
    pub fn approx_eq(self, other: Pt2D, threshold: Distance) -> bool {
        self.dist_to(other) <= threshold
    }

    /// Rounds to the same precision as `EPSILON_DIST`, loosely.
    pub fn approx_same(self, other: Pt2D) -> bool {
        self.approx_eq(other, EPSILON_DIST)
    }

    /// The exact coordinates, usable as a key.
    pub fn to_hashable(self) -> HashablePt2D {
        HashablePt2D::new(self.x, self.y)
    }

    /// Coordinates rounded to a fixed precision, so points that differ only by floating point
    /// noise produce the same key.
    pub fn to_rounded_hashable(self) -> HashablePt2D {
        HashablePt2D::new(round_for_key(self.x), round_for_key(self.y))
    }

    /// The centroid of some points. Panics if the list is empty.
    pub fn center(pts: &[Pt2D]) -> Pt2D {
        if pts.is_empty() {
            panic!("Can't find the center of zero points");
        }
        let mut x = 0.0;
        let mut y = 0.0;
        for pt in pts {
            x += pt.x;
            y += pt.y;
        }
        let len = pts.len() as f64;
        Pt2D::new(x / len, y / len)
    }

    pub fn to_geo(self) -> geo::Point<f64> {
        geo::Point::new(self.x, self.y)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({0}, {1})", self.x, self.y)
    }
}

impl From<geo::Point<f64>> for Pt2D {
    fn from(pt: geo::Point<f64>) -> Self {
        Pt2D::new(pt.x(), pt.y())
    }
}

// This isn't opinionated about what the (x, y) represents, or whether it's been rounded.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HashablePt2D {
    x_nan: NotNan<f64>,
    y_nan: NotNan<f64>,
}

impl HashablePt2D {
    fn new(x: f64, y: f64) -> HashablePt2D {
        // Pt2D already guarantees finite coordinates
        HashablePt2D {
            x_nan: NotNan::new(x).unwrap(),
            y_nan: NotNan::new(y).unwrap(),
        }
    }

    pub fn x(self) -> f64 {
        self.x_nan.into_inner()
    }

    pub fn y(self) -> f64 {
        self.y_nan.into_inner()
    }
}
