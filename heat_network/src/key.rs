use std::fmt;

use serde::{Deserialize, Serialize};

use geom::{HashablePt2D, Line};

/// A content-based identity for a segment. Both endpoints are rounded to a fixed precision and
/// stored in sorted order, so the same piece of pipe produces the same key no matter which
/// direction it points or how many times it's been re-created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey(HashablePt2D, HashablePt2D);

impl SegmentKey {
    pub fn new(line: &Line) -> SegmentKey {
        let pt1 = line.pt1().to_rounded_hashable();
        let pt2 = line.pt2().to_rounded_hashable();
        if pt1 <= pt2 {
            SegmentKey(pt1, pt2)
        } else {
            SegmentKey(pt2, pt1)
        }
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Segment({}, {} -> {}, {})",
            self.0.x(),
            self.0.y(),
            self.1.x(),
            self.1.y()
        )
    }
}

#[cfg(test)]
mod tests {
    use geom::Pt2D;

    use super::*;

    #[test]
    fn direction_and_noise_independent() {
        let line = Line::new(Pt2D::new(1.0, 2.0), Pt2D::new(30.0, -4.0));
        let noisy = Line::new(Pt2D::new(30.000_000_01, -4.0), Pt2D::new(1.0, 2.000_000_02));
        assert_eq!(SegmentKey::new(&line), SegmentKey::new(&line.reversed()));
        assert_eq!(SegmentKey::new(&line), SegmentKey::new(&noisy));

        let other = Line::new(Pt2D::new(1.0, 2.0), Pt2D::new(30.0, -4.1));
        assert_ne!(SegmentKey::new(&line), SegmentKey::new(&other));
    }
}
