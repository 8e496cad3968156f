//! `geom` is a small library for 2D geometry in a projected, planar coordinate system measured in
//! meters. It provides the points, segments and polylines that the heat network layout is built
//! from, plus a spatial index for finding the closest segment to a point.

#[macro_use]
extern crate anyhow;

pub use crate::distance::Distance;
pub use crate::find_closest::FindClosest;
pub use crate::line::Line;
pub use crate::polyline::PolyLine;
pub use crate::pt::{HashablePt2D, Pt2D};

mod distance;
mod find_closest;
mod line;
mod polyline;
mod pt;

/// About 0.4 inches... which is quite tiny on the scale of things. :)
pub const EPSILON_DIST: Distance = Distance::const_meters(0.01);

/// Coordinates are rounded to this many digits after the decimal point before being used as a
/// key. 1e-6 meters is far below anything a surveyed coordinate can distinguish.
pub const KEY_PRECISION: i32 = 6;

/// Reduce the precision of an f64. This helps ensure serialization is idempotent (everything is
/// exactly the same before and after saving/loading). Ideally we'd use some kind of proper
/// fixed-precision type instead of f64.
pub fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Round an f64 to `KEY_PRECISION` decimal places.
pub fn round_for_key(x: f64) -> f64 {
    let scale = 10_f64.powi(KEY_PRECISION);
    let rounded = (x * scale).round() / scale;
    // Avoid distinguishing -0.0 from 0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_for_keys() {
        assert_eq!(round_for_key(1.000_000_4), 1.0);
        assert_eq!(round_for_key(-0.000_000_1), 0.0);
        assert_eq!(round_for_key(0.000_000_1).to_bits(), 0.0_f64.to_bits());
        assert_eq!(round_for_key(12.345_678_9), 12.345_679);
    }
}
