use anyhow::Result;

use geom::{Distance, FindClosest, Line, PolyLine, Pt2D};

/// Identifies one straight piece of one road.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoadSegmentID {
    pub road: usize,
    pub segment: usize,
}

/// Where a point lands when it's moved onto the closest road.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadProjection {
    pub id: RoadSegmentID,
    pub pt: Pt2D,
    pub dist: Distance,
}

/// The existing streets, read-only, indexed for nearest-segment queries.
pub struct RoadNetwork {
    closest: FindClosest<RoadSegmentID>,
    num_roads: usize,
}

impl RoadNetwork {
    /// Zero-length pieces of a road are skipped. Fails if nothing usable is left.
    pub fn new(roads: &[PolyLine]) -> Result<RoadNetwork> {
        let mut closest = FindClosest::new();
        let mut num_roads = 0;
        for (road, pl) in roads.iter().enumerate() {
            let mut any = false;
            for (segment, line) in pl.lines().enumerate() {
                if line.is_degenerate() {
                    debug!("Skipping zero-length piece {} of road {}", segment, road);
                    continue;
                }
                closest.add(RoadSegmentID { road, segment }, line);
                any = true;
            }
            if any {
                num_roads += 1;
            } else {
                warn!("Road {} has no usable geometry; skipping it", road);
            }
        }

        if closest.is_empty() {
            bail!(
                "The road network is empty ({} roads given, none usable); can't align to it",
                roads.len()
            );
        }
        Ok(RoadNetwork { closest, num_roads })
    }

    /// Each line is treated as its own road.
    pub fn from_lines(lines: &[Line]) -> Result<RoadNetwork> {
        let roads: Vec<PolyLine> = lines.iter().map(|l| PolyLine::from(*l)).collect();
        RoadNetwork::new(&roads)
    }

    /// The closest point on any road to the query point.
    pub fn project(&self, pt: Pt2D) -> Option<RoadProjection> {
        self.closest
            .closest_pt(pt)
            .map(|(id, pt, dist)| RoadProjection { id, pt, dist })
    }

    pub fn dist_to_nearest(&self, pt: Pt2D) -> Option<Distance> {
        self.project(pt).map(|proj| proj.dist)
    }

    pub fn num_roads(&self) -> usize {
        self.num_roads
    }

    pub fn num_segments(&self) -> usize {
        self.closest.len()
    }
}

/// How far the network is from following the roads: the sum, over every segment, of the distance
/// from its midpoint to the closest road.
pub fn road_distance_sum(segments: &[Line], roads: &RoadNetwork) -> Distance {
    segments
        .iter()
        .filter_map(|l| roads.dist_to_nearest(l.middle()))
        .sum()
}
