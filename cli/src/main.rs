//! Lays out district heating networks from GeoJSON input. The network planning itself lives in
//! the `heat_network` crate; this tool only handles files and flags.

#[macro_use]
extern crate log;

mod io;

use anyhow::Result;
use structopt::StructOpt;

use abstutil::Timer;
use heat_network::{AlignmentOptions, RoadNetwork};

#[derive(StructOpt)]
#[structopt(
    name = "heatnet",
    about = "Lays out district heating networks along streets"
)]
enum Command {
    /// Connects the terminals with the shortest tree of straight pipes, ignoring roads.
    Mst {
        /// A GeoJSON file with Point or MultiPoint features: the heat source and every building
        /// connection. Coordinates must already be projected, in meters.
        #[structopt(long)]
        terminals: String,
        /// The GeoJSON file to write
        #[structopt(long)]
        output: String,
    },
    /// Connects the terminals, then bends the network to follow the roads.
    Align {
        /// A GeoJSON file with Point or MultiPoint features: the heat source and every building
        /// connection. Coordinates must already be projected, in meters.
        #[structopt(long)]
        terminals: String,
        /// A GeoJSON file with LineString or MultiLineString features, in the same coordinate
        /// system as the terminals
        #[structopt(long)]
        roads: String,
        /// The GeoJSON file to write
        #[structopt(long)]
        output: String,
        /// A JSON file with alignment options. If present, the individual flags below are
        /// ignored, and fields missing from the file use the defaults.
        #[structopt(long)]
        config: Option<String>,
        #[structopt(flatten)]
        opts: AlignmentOptions,
    },
}

fn main() -> Result<()> {
    abstutil::logger::setup();

    match Command::from_args() {
        Command::Mst { terminals, output } => mst(terminals, output),
        Command::Align {
            terminals,
            roads,
            output,
            config,
            opts,
        } => align(terminals, roads, output, config, opts),
    }
}

fn mst(terminals_path: String, output: String) -> Result<()> {
    let terminals = io::read_terminals(&terminals_path)?;
    let tree = heat_network::build_mst(&terminals)?;
    heat_network::validate_tree(&tree, &terminals)?;
    info!(
        "Spanning tree over {} terminals is {} long",
        terminals.len(),
        heat_network::total_length(&tree)
    );
    io::write_network(&output, &tree)
}

fn align(
    terminals_path: String,
    roads_path: String,
    output: String,
    config: Option<String>,
    flag_opts: AlignmentOptions,
) -> Result<()> {
    let opts = if let Some(path) = config {
        AlignmentOptions::from_json(&fs_err::read_to_string(path)?)?
    } else {
        flag_opts.validate()?;
        flag_opts
    };

    let mut timer = Timer::new("heatnet align");
    timer.start("read input");
    let input = io::read_terminals(&terminals_path).and_then(|terminals| {
        let roads = RoadNetwork::new(&io::read_roads(&roads_path)?)?;
        Ok((terminals, roads))
    });
    timer.stop("read input");
    let (terminals, roads) = input?;
    info!(
        "{} terminals, {} roads with {} segments",
        terminals.len(),
        roads.num_roads(),
        roads.num_segments()
    );

    let network = heat_network::plan_network(&terminals, &roads, &opts, &mut timer)?;
    heat_network::validate_tree(&network.segments, &terminals)?;
    if !network.converged() {
        timer.warn(format!(
            "Wrote a best-effort network to {}; try raising --max-iterations",
            output
        ));
    }
    for (key, count) in network.changes.highest_n(3) {
        debug!("{} was split {} times", key, count);
    }
    io::write_network(&output, &network.segments)
}
