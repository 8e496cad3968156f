use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::{Distance, Line, Pt2D};

/// Index of line segments for repeatedly asking "which segment is closest to this point, and
/// where on it?" Backed by an R*-tree, so each query is exact but doesn't scan everything.
pub struct FindClosest<K> {
    tree: RTree<Entry<K>>,
}

struct Entry<K> {
    key: K,
    line: Line,
}

impl<K> FindClosest<K>
where
    K: Clone + std::fmt::Debug,
{
    pub fn new() -> FindClosest<K> {
        FindClosest { tree: RTree::new() }
    }

    pub fn add(&mut self, key: K, line: Line) {
        self.tree.insert(Entry { key, line });
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Finds the closest point on any of the segments to the query point. Returns the segment's
    /// key, the point on it, and the distance from the query point. There's no maximum distance.
    pub fn closest_pt(&self, query: Pt2D) -> Option<(K, Pt2D, Distance)> {
        let entry = self.tree.nearest_neighbor(&[query.x(), query.y()])?;
        let pt = entry
            .line
            .closest_pt(query)
            .unwrap_or_else(|| entry.line.pt1());
        Some((entry.key.clone(), pt, pt.dist_to(query)))
    }
}

impl<K> Default for FindClosest<K>
where
    K: Clone + std::fmt::Debug,
{
    fn default() -> Self {
        FindClosest::new()
    }
}

impl<K> RTreeObject for Entry<K> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.line.pt1().x(), self.line.pt1().y()],
            [self.line.pt2().x(), self.line.pt2().y()],
        )
    }
}

impl<K> PointDistance for Entry<K> {
    // Untrimmed, so it agrees with the envelope distances the tree prunes by
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let query = Pt2D::new(point[0], point[1]);
        let pt = self
            .line
            .closest_pt(query)
            .unwrap_or_else(|| self.line.pt1());
        (pt.x() - query.x()).powi(2) + (pt.y() - query.y()).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use super::*;

    #[test]
    fn empty() {
        let closest: FindClosest<usize> = FindClosest::new();
        assert!(closest.is_empty());
        assert!(closest.closest_pt(Pt2D::new(1.0, 2.0)).is_none());
    }

    #[test]
    fn picks_nearest_segment() {
        let mut closest = FindClosest::new();
        closest.add("north", Line::new(Pt2D::new(0.0, 20.0), Pt2D::new(100.0, 20.0)));
        closest.add("south", Line::new(Pt2D::new(0.0, -50.0), Pt2D::new(100.0, -50.0)));
        let (key, pt, dist) = closest.closest_pt(Pt2D::new(50.0, 0.0)).unwrap();
        assert_eq!(key, "north");
        assert_eq!(pt, Pt2D::new(50.0, 20.0));
        assert_eq!(dist, Distance::meters(20.0));
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = XorShiftRng::seed_from_u64(42);
        let mut lines = Vec::new();
        let mut closest = FindClosest::new();
        for idx in 0..50 {
            let line = Line::new(
                Pt2D::new(rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0)),
                Pt2D::new(rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0)),
            );
            closest.add(idx, line);
            lines.push(line);
        }

        for _ in 0..100 {
            let query = Pt2D::new(rng.gen_range(-100.0..600.0), rng.gen_range(-100.0..600.0));
            let expected = lines.iter().map(|l| l.dist_to_pt(query)).min().unwrap();
            let (_, _, dist) = closest.closest_pt(query).unwrap();
            assert_eq!(dist, expected);
        }
    }
}
