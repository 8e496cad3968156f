//! Derives the layout of a district heating network: a tree of straight pipe segments connecting
//! a heat source and building connection points, following the existing streets where that's
//! cheap.
//!
//! The pieces, leaves first:
//!
//! - `build_mst` connects points with a minimum spanning tree.
//! - `simplify` merges endpoints that repeated splitting left close together.
//! - `rebuild` restores a valid tree after arbitrary edits.
//! - `align_to_roads` iteratively bends the tree toward the nearest roads.
//!
//! Everything here is synchronous and does no I/O. Points are in a projected coordinate system,
//! in meters.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

use anyhow::Result;

use abstutil::Timer;
use geom::Pt2D;

pub use crate::align::{align_to_roads, AlignedNetwork, AlignmentState, RoadAligner};
pub use crate::key::SegmentKey;
pub use crate::mst::build_mst;
pub use crate::options::AlignmentOptions;
pub use crate::rebuild::{rebuild, total_length, unique_points, validate_tree};
pub use crate::roads::{road_distance_sum, RoadNetwork, RoadProjection, RoadSegmentID};
pub use crate::simplify::{merge_close_points, simplify};

mod align;
mod key;
mod mst;
mod options;
mod rebuild;
mod roads;
mod simplify;

/// The whole pipeline: connect the terminals with a spanning tree, then align it to the roads.
pub fn plan_network(
    terminals: &[Pt2D],
    roads: &RoadNetwork,
    opts: &AlignmentOptions,
    timer: &mut Timer,
) -> Result<AlignedNetwork> {
    timer.start("plan heat network");
    let result = build_mst(terminals).and_then(|initial_tree| {
        info!(
            "Initial spanning tree over {} terminals is {} long",
            terminals.len(),
            total_length(&initial_tree)
        );
        align_to_roads(&initial_tree, roads, terminals, opts, timer)
    });
    timer.stop("plan heat network");

    let network = result?;
    info!(
        "Aligned network has {} segments, {} long, after {} passes ({:?})",
        network.segments.len(),
        network.total_length(),
        network.iterations,
        network.state
    );
    Ok(network)
}
