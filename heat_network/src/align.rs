use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use abstutil::{prettyprint_usize, Counter, Timer};
use geom::{Distance, Line, Pt2D};

use crate::{rebuild, simplify, total_length, unique_points};
use crate::{AlignmentOptions, RoadNetwork, SegmentKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentState {
    Running,
    /// A full pass didn't change anything.
    Converged,
    /// Segments were still being adjusted when `max_iterations` ran out.
    IterationLimitReached,
}

/// The result of aligning a network to roads. The segments always form a tree connecting every
/// terminal.
pub struct AlignedNetwork {
    pub segments: Vec<Line>,
    pub state: AlignmentState,
    /// How many passes ran
    pub iterations: usize,
    /// Segments that won't be adjusted again, because splitting them didn't help enough
    pub blacklisted: BTreeSet<SegmentKey>,
    /// How many times each segment was split
    pub changes: Counter<SegmentKey>,
}

impl AlignedNetwork {
    pub fn total_length(&self) -> Distance {
        total_length(&self.segments)
    }

    /// The number of distinct segments that were split at some point
    pub fn num_adjusted(&self) -> usize {
        self.changes.len()
    }

    pub fn converged(&self) -> bool {
        self.state == AlignmentState::Converged
    }
}

/// Iteratively nudges a tree toward the road network. Each pass splits segments that stray too
/// far from the nearest road through the point on that road, then merges nearby endpoints and
/// rebuilds a spanning tree. A blacklist of splits that didn't help prevents oscillation.
///
/// Use `run` to go until convergence, or `step` to control each pass; stopping between passes is
/// always safe, since the network is a valid tree after every one.
pub struct RoadAligner<'a> {
    roads: &'a RoadNetwork,
    terminals: &'a [Pt2D],
    opts: AlignmentOptions,

    network: Vec<Line>,
    blacklist: BTreeSet<SegmentKey>,
    changes: Counter<SegmentKey>,
    iterations: usize,
    state: AlignmentState,
}

impl<'a> RoadAligner<'a> {
    pub fn new(
        initial_tree: &[Line],
        roads: &'a RoadNetwork,
        terminals: &'a [Pt2D],
        opts: AlignmentOptions,
    ) -> Result<RoadAligner<'a>> {
        opts.validate()?;
        let num_terminals = unique_points(&[], terminals).len();
        if num_terminals < 2 {
            bail!(
                "Need at least 2 distinct terminal points to align a network, but got {}",
                num_terminals
            );
        }
        // Whatever the caller passed in, start from a real tree that includes every terminal
        let network = rebuild(initial_tree, terminals).context("preparing the initial tree")?;

        Ok(RoadAligner {
            roads,
            terminals,
            opts,
            network,
            blacklist: BTreeSet::new(),
            changes: Counter::new(),
            iterations: 0,
            state: AlignmentState::Running,
        })
    }

    pub fn state(&self) -> AlignmentState {
        self.state
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The current network. Always a tree.
    pub fn network(&self) -> &[Line] {
        &self.network
    }

    /// Runs one pass over every segment, then returns the new state. Does nothing once the
    /// aligner has stopped.
    pub fn step(&mut self) -> Result<AlignmentState> {
        if self.state != AlignmentState::Running {
            return Ok(self.state);
        }
        self.iterations += 1;

        let current = std::mem::take(&mut self.network);
        let mut next = Vec::with_capacity(current.len());
        let mut num_split = 0;
        for line in current {
            if let Some((piece1, piece2)) = self.try_split(line) {
                next.push(piece1);
                next.push(piece2);
                num_split += 1;
            } else {
                next.push(line);
            }
        }

        if num_split == 0 {
            info!(
                "Converged after {} passes; {} segments are blacklisted",
                self.iterations,
                self.blacklist.len()
            );
            self.network = next;
            self.state = AlignmentState::Converged;
            return Ok(self.state);
        }

        // Merging can move terminals, but rebuilding puts them back
        let simplified = simplify(&next, self.opts.merge_threshold);
        self.network = rebuild(&simplified, self.terminals)?;
        info!(
            "Pass {}: split {} segments, merged down to {} segments. {} blacklisted so far",
            self.iterations,
            prettyprint_usize(num_split),
            prettyprint_usize(self.network.len()),
            prettyprint_usize(self.blacklist.len())
        );

        if self.iterations >= self.opts.max_iterations {
            warn!(
                "Road alignment didn't converge after {} passes; using the network so far",
                self.iterations
            );
            self.state = AlignmentState::IterationLimitReached;
        }
        Ok(self.state)
    }

    /// Steps until the aligner stops.
    pub fn run(mut self, timer: &mut Timer) -> Result<AlignedNetwork> {
        timer.start("align network to roads");
        while self.state == AlignmentState::Running {
            let name = format!("alignment pass {}", self.iterations + 1);
            timer.start(&name);
            let result = self.step();
            timer.stop(&name);
            if let Err(err) = result {
                timer.stop("align network to roads");
                return Err(err);
            }
        }
        timer.stop("align network to roads");

        if self.state == AlignmentState::IterationLimitReached {
            timer.warn(format!(
                "Road alignment stopped at the limit of {} passes",
                self.opts.max_iterations
            ));
        }
        Ok(self.finish())
    }

    /// Stops wherever the aligner is and returns the network so far.
    pub fn finish(self) -> AlignedNetwork {
        AlignedNetwork {
            segments: self.network,
            state: self.state,
            iterations: self.iterations,
            blacklisted: self.blacklist,
            changes: self.changes,
        }
    }

    /// If the segment strays too far from the nearest road, split it in two through the closest
    /// point on that road. Pieces that barely improve on the original are blacklisted, but still
    /// returned.
    fn try_split(&mut self, line: Line) -> Option<(Line, Line)> {
        let key = SegmentKey::new(&line);
        if self.blacklist.contains(&key) {
            return None;
        }
        if line.is_degenerate() {
            debug!("Skipping degenerate segment {}", key);
            return None;
        }

        let midpoint = line.middle();
        let proj = match self.roads.project(midpoint) {
            Some(proj) => proj,
            None => {
                warn!("No road found near {}; leaving {} alone", midpoint, key);
                return None;
            }
        };
        if proj.dist <= self.opts.distance_threshold {
            return None;
        }
        // The closest road point is one of our own endpoints. Splitting there would make a
        // zero-length piece.
        if line.has_endpoint(proj.pt) {
            return None;
        }

        let (piece1, piece2) = line.split_at(proj.pt);
        for piece in [piece1, piece2] {
            let dist = self
                .roads
                .dist_to_nearest(piece.middle())
                .unwrap_or(proj.dist);
            if proj.dist - dist < self.opts.min_improvement {
                let piece_key = SegmentKey::new(&piece);
                debug!(
                    "Splitting {} only brought {} from {} to {} from a road; blacklisting it",
                    key, piece_key, proj.dist, dist
                );
                self.blacklist.insert(piece_key);
            }
        }
        self.changes.inc(key);
        Some((piece1, piece2))
    }
}

/// Iteratively adjusts `initial_tree` to follow the road network more closely, while keeping it
/// a tree connecting every terminal. Stops when a pass changes nothing, or after
/// `opts.max_iterations` passes with a warning.
pub fn align_to_roads(
    initial_tree: &[Line],
    roads: &RoadNetwork,
    terminals: &[Pt2D],
    opts: &AlignmentOptions,
    timer: &mut Timer,
) -> Result<AlignedNetwork> {
    RoadAligner::new(initial_tree, roads, terminals, opts.clone())?.run(timer)
}
