use std::collections::BTreeSet;

use anyhow::Result;
use petgraph::data::Element;
use petgraph::graph::{NodeIndex, UnGraph};

use geom::{Distance, Line, Pt2D, KEY_PRECISION};

use crate::SegmentKey;

/// The weight of a candidate edge. Ordering by length first and then by the canonical endpoints
/// makes the spanning tree independent of input order, even when many edges tie (like on a grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct EdgeCost {
    length: Distance,
    key: SegmentKey,
}

/// Connects every point with the minimum total length of straight segments. Builds the complete
/// graph over all points, so this is quadratic; fine for the tens to hundreds of buildings a
/// district network has.
///
/// The result always has exactly `points.len() - 1` segments. Duplicate points are allowed and
/// produce zero-length segments.
pub fn build_mst(points: &[Pt2D]) -> Result<Vec<Line>> {
    if points.len() < 2 {
        bail!(
            "Need at least 2 points to build a network, but only got {}",
            points.len()
        );
    }
    let distinct: BTreeSet<_> = points.iter().map(|pt| pt.to_rounded_hashable()).collect();
    if distinct.len() < 2 {
        bail!(
            "All {} points coincide at {} after rounding to {} decimal places; there's nothing to connect",
            points.len(),
            points[0],
            KEY_PRECISION
        );
    }

    let num_pts = points.len();
    let mut graph: UnGraph<Pt2D, EdgeCost> =
        UnGraph::with_capacity(num_pts, num_pts * (num_pts - 1) / 2);
    let nodes: Vec<NodeIndex> = points.iter().map(|pt| graph.add_node(*pt)).collect();
    for i in 0..num_pts {
        for j in (i + 1)..num_pts {
            let line = Line::new(points[i], points[j]);
            graph.add_edge(
                nodes[i],
                nodes[j],
                EdgeCost {
                    length: line.length(),
                    key: SegmentKey::new(&line),
                },
            );
        }
    }

    let mut tree = Vec::with_capacity(num_pts - 1);
    for element in petgraph::algo::min_spanning_tree(&graph) {
        if let Element::Edge { source, target, .. } = element {
            tree.push(Line::new(
                graph[NodeIndex::new(source)],
                graph[NodeIndex::new(target)],
            ));
        }
    }
    // The graph is complete, so it's always connected
    assert_eq!(tree.len(), num_pts - 1);
    Ok(tree)
}
