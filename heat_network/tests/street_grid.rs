use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use abstutil::Timer;
use geom::{Distance, Line, PolyLine, Pt2D};
use heat_network::{
    align_to_roads, build_mst, plan_network, validate_tree, AlignmentOptions, AlignmentState,
    RoadAligner, RoadNetwork,
};

/// A square grid of streets, `blocks` by `blocks`, each block `size` meters wide.
fn street_grid(blocks: usize, size: f64) -> RoadNetwork {
    let extent = blocks as f64 * size;
    let mut roads = Vec::new();
    for i in 0..=blocks {
        let offset = i as f64 * size;
        roads.push(PolyLine::must_new(vec![
            Pt2D::new(0.0, offset),
            Pt2D::new(extent, offset),
        ]));
        roads.push(PolyLine::must_new(vec![
            Pt2D::new(offset, 0.0),
            Pt2D::new(offset, extent),
        ]));
    }
    RoadNetwork::new(&roads).unwrap()
}

fn random_terminals(rng: &mut XorShiftRng, num: usize, extent: f64) -> Vec<Pt2D> {
    (0..num)
        .map(|_| Pt2D::new(rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)))
        .collect()
}

#[test]
fn always_terminates_with_a_tree() {
    let roads = street_grid(4, 100.0);
    let mut rng = XorShiftRng::seed_from_u64(42);
    for (num_terminals, max_iterations) in [(2, 50), (5, 3), (12, 10), (20, 50)] {
        let terminals = random_terminals(&mut rng, num_terminals, 400.0);
        let opts = AlignmentOptions {
            max_iterations,
            ..Default::default()
        };
        let result = plan_network(&terminals, &roads, &opts, &mut Timer::throwaway()).unwrap();
        assert!(result.iterations <= max_iterations);
        assert_ne!(result.state, AlignmentState::Running);
        validate_tree(&result.segments, &terminals).unwrap();
    }
}

#[test]
fn straight_segment_splits_onto_road() {
    // One segment with its midpoint 20m from the only road
    let terminals = vec![Pt2D::new(0.0, 0.0), Pt2D::new(100.0, 0.0)];
    let roads = RoadNetwork::from_lines(&[Line::new(
        Pt2D::new(-50.0, 20.0),
        Pt2D::new(150.0, 20.0),
    )])
    .unwrap();
    let tree = build_mst(&terminals).unwrap();
    let mut aligner =
        RoadAligner::new(&tree, &roads, &terminals, AlignmentOptions::default()).unwrap();
    aligner.step().unwrap();

    let network = aligner.network();
    assert_eq!(network.len(), 2);
    for line in network {
        assert!(line.has_endpoint(Pt2D::new(50.0, 20.0)));
        assert!(roads.dist_to_nearest(line.middle()).unwrap() < Distance::meters(19.5));
    }
}

#[test]
fn buildings_off_street_get_adjusted() {
    let roads = street_grid(3, 100.0);
    // Buildings set back from the streets, so the straight tree cuts through blocks
    let terminals = vec![
        Pt2D::new(30.0, 50.0),
        Pt2D::new(150.0, 70.0),
        Pt2D::new(250.0, 130.0),
        Pt2D::new(70.0, 250.0),
        Pt2D::new(260.0, 270.0),
    ];
    let tree = build_mst(&terminals).unwrap();
    let result = align_to_roads(
        &tree,
        &roads,
        &terminals,
        &AlignmentOptions::default(),
        &mut Timer::throwaway(),
    )
    .unwrap();
    validate_tree(&result.segments, &terminals).unwrap();
    // The segment from (30, 50) to (150, 70) has its midpoint 10m from the street at x=100
    assert!(result.num_adjusted() > 0);
    assert!(result.iterations >= 2);
    assert!(result.changes.sum() >= result.num_adjusted());
}

#[test]
fn empty_road_network_is_rejected() {
    assert!(RoadNetwork::new(&[]).is_err());
    assert!(RoadNetwork::from_lines(&[]).is_err());
}
