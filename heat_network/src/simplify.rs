use std::collections::{HashMap, HashSet};

use geom::{Distance, HashablePt2D, Line, Pt2D};

use crate::SegmentKey;

/// Collapses clusters of nearly coincident endpoints, which repeated splitting tends to leave
/// behind, into their centroid. Segments that shrink to a single point are dropped, as are
/// duplicates that merging creates.
pub fn simplify(segments: &[Line], merge_threshold: Distance) -> Vec<Line> {
    let mut endpoints = Vec::new();
    let mut seen = HashSet::new();
    for pt in segments.iter().flat_map(|l| l.points()) {
        if seen.insert(pt.to_hashable()) {
            endpoints.push(pt);
        }
    }
    let replacements = merge_close_points(&endpoints, merge_threshold);

    let mut result = Vec::new();
    let mut keys = HashSet::new();
    for line in segments {
        let pt1 = replacements[&line.pt1().to_hashable()];
        let pt2 = replacements[&line.pt2().to_hashable()];
        if pt1.to_rounded_hashable() == pt2.to_rounded_hashable() {
            continue;
        }
        let line = Line::new(pt1, pt2);
        if keys.insert(SegmentKey::new(&line)) {
            result.push(line);
        }
    }
    result
}

/// Greedily groups points within `threshold` of each other. In input order, each point not yet
/// grouped gathers every other ungrouped point within the threshold, and the whole group is
/// replaced by its centroid. Returns the replacement for every input point, keyed by its exact
/// coordinates.
pub fn merge_close_points(pts: &[Pt2D], threshold: Distance) -> HashMap<HashablePt2D, Pt2D> {
    let mut replacements = HashMap::new();
    let mut processed = vec![false; pts.len()];
    for i in 0..pts.len() {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let mut cluster = vec![pts[i]];
        for j in (i + 1)..pts.len() {
            if processed[j] || pts[i].dist_to(pts[j]) > threshold {
                continue;
            }
            processed[j] = true;
            cluster.push(pts[j]);
        }

        let centroid = Pt2D::center(&cluster);
        for pt in cluster {
            replacements.insert(pt.to_hashable(), centroid);
        }
    }
    replacements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_close_points_collapse_to_centroid() {
        let a = Pt2D::new(0.0, 0.0);
        let b = Pt2D::new(0.001, 0.001);
        let replacements = merge_close_points(&[a, b], Distance::meters(10.0));
        for pt in [a, b] {
            let merged = replacements[&pt.to_hashable()];
            assert!((merged.x() - 0.0005).abs() < 1e-9);
            assert!((merged.y() - 0.0005).abs() < 1e-9);
        }

        // Through simplify, the tiny segment disappears and its neighbor is re-attached
        let far = Pt2D::new(100.0, 0.0);
        let result = simplify(&[Line::new(a, b), Line::new(b, far)], Distance::meters(10.0));
        assert_eq!(result.len(), 1);
        let merged = result[0].pt1();
        assert!((merged.x() - 0.0005).abs() < 1e-9);
        assert!((merged.y() - 0.0005).abs() < 1e-9);
        assert_eq!(result[0].pt2(), far);
    }

    #[test]
    fn far_points_untouched() {
        let lines = vec![
            Line::new(Pt2D::new(0.0, 0.0), Pt2D::new(50.0, 0.0)),
            Line::new(Pt2D::new(50.0, 0.0), Pt2D::new(50.0, 50.0)),
        ];
        assert_eq!(simplify(&lines, Distance::meters(10.0)), lines);
    }

    #[test]
    fn merging_removes_parallel_duplicates() {
        let hub = Pt2D::new(100.0, 100.0);
        let lines = vec![
            Line::new(Pt2D::new(0.0, 0.0), hub),
            Line::new(Pt2D::new(1.0, 0.0), hub),
        ];
        let result = simplify(&lines, Distance::meters(10.0));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].pt1(), Pt2D::new(0.5, 0.0));
    }

    #[test]
    fn idempotent() {
        // Noisy clusters around the corners of a 100m square, like repeated splitting leaves
        let corners = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
        let jitter = [(0.0, 0.0), (2.0, 1.0), (-1.5, 3.0)];
        let mut lines = Vec::new();
        for (idx, (x1, y1)) in corners.iter().enumerate() {
            let (x2, y2) = corners[(idx + 1) % corners.len()];
            for (dx, dy) in jitter {
                lines.push(Line::new(
                    Pt2D::new(x1 + dx, y1 + dy),
                    Pt2D::new(x2 - dy, y2 + dx),
                ));
            }
        }

        let threshold = Distance::meters(10.0);
        let once = simplify(&lines, threshold);
        assert_eq!(once.len(), 4);
        let twice = simplify(&once, threshold);
        assert_eq!(once, twice);
    }
}
