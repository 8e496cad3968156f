use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use geom::Distance;

/// Tuning for `align_to_roads`. All distances are in meters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, StructOpt)]
#[serde(default)]
pub struct AlignmentOptions {
    /// Segments whose midpoint is at most this far from a road are left alone.
    #[structopt(long, parse(try_from_str = parse_meters), default_value = "5")]
    pub distance_threshold: Distance,
    /// When splitting a segment, a new piece that gets less than this much closer to the road
    /// than the original is never adjusted again.
    #[structopt(long, parse(try_from_str = parse_meters), default_value = "0.5")]
    pub min_improvement: Distance,
    /// Endpoints closer than this are merged after every pass.
    #[structopt(long, parse(try_from_str = parse_meters), default_value = "10")]
    pub merge_threshold: Distance,
    /// Give up after this many passes, even if segments are still moving.
    #[structopt(long, default_value = "50")]
    pub max_iterations: usize,
}

impl Default for AlignmentOptions {
    fn default() -> Self {
        AlignmentOptions {
            distance_threshold: Distance::meters(5.0),
            min_improvement: Distance::meters(0.5),
            merge_threshold: Distance::meters(10.0),
            max_iterations: 50,
        }
    }
}

impl AlignmentOptions {
    /// Reads options from a JSON file's contents. Missing fields use the defaults.
    pub fn from_json(raw: &str) -> Result<AlignmentOptions> {
        let opts: AlignmentOptions =
            serde_json::from_str(raw).context("parsing alignment options")?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("distance_threshold", self.distance_threshold),
            ("min_improvement", self.min_improvement),
            ("merge_threshold", self.merge_threshold),
        ] {
            if value < Distance::ZERO {
                bail!("{} can't be negative, but it's {}", name, value);
            }
        }
        if self.max_iterations == 0 {
            bail!("max_iterations must be at least 1");
        }
        Ok(())
    }
}

fn parse_meters(raw: &str) -> Result<Distance> {
    let value: f64 = raw
        .parse()
        .with_context(|| format!("{} isn't a distance in meters", raw))?;
    if !value.is_finite() {
        bail!("{} isn't a distance in meters", raw);
    }
    Ok(Distance::meters(value))
}
