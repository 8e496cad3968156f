use std::collections::HashSet;

use anyhow::Result;
use petgraph::graphmap::UnGraphMap;

use geom::{Distance, HashablePt2D, Line, Pt2D};

use crate::build_mst;

/// Restores the tree invariant after arbitrary edits. Splitting and merging can leave cycles,
/// disconnected pieces, or duplicate segments; this throws the topology away and keeps only the
/// points, reconnecting every terminal and every point introduced by alignment.
pub fn rebuild(segments: &[Line], terminals: &[Pt2D]) -> Result<Vec<Line>> {
    build_mst(&unique_points(segments, terminals))
}

/// All distinct locations, compared with rounded coordinates. The `extra` points (usually
/// terminals) come first, so when an endpoint and a terminal are the same up to rounding, the
/// terminal's exact coordinates are the ones kept.
pub fn unique_points(segments: &[Line], extra: &[Pt2D]) -> Vec<Pt2D> {
    let mut seen = HashSet::new();
    let mut pts = Vec::new();
    for pt in extra
        .iter()
        .cloned()
        .chain(segments.iter().flat_map(|l| l.points()))
    {
        if seen.insert(pt.to_rounded_hashable()) {
            pts.push(pt);
        }
    }
    pts
}

pub fn total_length(segments: &[Line]) -> Distance {
    segments.iter().map(|l| l.length()).sum()
}

/// Checks that the segments form a single tree: one fewer segment than distinct points, every
/// point reachable, and every terminal part of it.
pub fn validate_tree(segments: &[Line], terminals: &[Pt2D]) -> Result<()> {
    let mut graph: UnGraphMap<HashablePt2D, ()> = UnGraphMap::new();
    for line in segments {
        graph.add_edge(
            line.pt1().to_rounded_hashable(),
            line.pt2().to_rounded_hashable(),
            (),
        );
    }

    let num_pts = graph.node_count();
    if segments.len() + 1 != num_pts {
        bail!(
            "Not a tree: {} segments connect {} distinct points",
            segments.len(),
            num_pts
        );
    }
    let components = petgraph::algo::connected_components(&graph);
    if components != 1 {
        bail!("Not a tree: the network has {} disconnected pieces", components);
    }
    for pt in terminals {
        if !graph.contains_node(pt.to_rounded_hashable()) {
            bail!("Terminal {} isn't connected to the network", pt);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_fixes_cycles_and_gaps() {
        let a = Pt2D::new(0.0, 0.0);
        let b = Pt2D::new(10.0, 0.0);
        let c = Pt2D::new(10.0, 10.0);
        let d = Pt2D::new(50.0, 50.0);
        // A triangle with a duplicate edge, and d isn't connected at all
        let messy = vec![
            Line::new(a, b),
            Line::new(b, c),
            Line::new(c, a),
            Line::new(b, a),
        ];
        assert!(validate_tree(&messy, &[a, d]).is_err());

        let tree = rebuild(&messy, &[a, d]).unwrap();
        assert_eq!(tree.len(), 3);
        validate_tree(&tree, &[a, b, c, d]).unwrap();
    }

    #[test]
    fn unique_points_prefer_terminals() {
        let terminal = Pt2D::new(5.0, 5.0);
        let noisy = Pt2D::new(5.000_000_01, 5.0);
        let pts = unique_points(
            &[Line::new(noisy, Pt2D::new(9.0, 9.0))],
            &[terminal],
        );
        assert_eq!(pts, vec![terminal, Pt2D::new(9.0, 9.0)]);
    }

    #[test]
    fn validate_detects_problems() {
        let a = Pt2D::new(0.0, 0.0);
        let b = Pt2D::new(10.0, 0.0);
        let c = Pt2D::new(20.0, 0.0);
        let d = Pt2D::new(30.0, 0.0);
        validate_tree(&[Line::new(a, b), Line::new(b, c)], &[a, c]).unwrap();
        // Missing terminal
        assert!(validate_tree(&[Line::new(a, b), Line::new(b, c)], &[d]).is_err());
        // Two pieces
        assert!(validate_tree(&[Line::new(a, b), Line::new(c, d)], &[]).is_err());
        assert_eq!(
            total_length(&[Line::new(a, b), Line::new(b, d)]),
            Distance::meters(30.0)
        );
    }
}
