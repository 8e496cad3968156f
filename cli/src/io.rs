use std::io::Write;

use anyhow::{bail, Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

use geom::{Line, PolyLine, Pt2D};

pub fn read_terminals(path: &str) -> Result<Vec<Pt2D>> {
    let raw = fs_err::read_to_string(path)?;
    parse_terminals(&raw).with_context(|| format!("reading terminals from {}", path))
}

pub fn read_roads(path: &str) -> Result<Vec<PolyLine>> {
    let raw = fs_err::read_to_string(path)?;
    parse_roads(&raw).with_context(|| format!("reading roads from {}", path))
}

pub fn write_network(path: &str, segments: &[Line]) -> Result<()> {
    let mut f = fs_err::File::create(path)?;
    write!(f, "{}", serde_json::to_string_pretty(&network_to_geojson(segments))?)?;
    info!("Wrote {} segments to {}", segments.len(), path);
    Ok(())
}

fn parse_terminals(raw: &str) -> Result<Vec<Pt2D>> {
    let mut terminals = Vec::new();
    for geom in geometries(raw.parse::<GeoJson>()?) {
        match geom.value {
            Value::Point(pt) => terminals.push(to_pt(&pt)?),
            Value::MultiPoint(pts) => {
                for pt in pts {
                    terminals.push(to_pt(&pt)?);
                }
            }
            other => {
                warn!("Skipping {} geometry among the terminals", type_name(&other));
            }
        }
    }
    Ok(terminals)
}

fn parse_roads(raw: &str) -> Result<Vec<PolyLine>> {
    let mut roads = Vec::new();
    for geom in geometries(raw.parse::<GeoJson>()?) {
        let lines = match geom.value {
            Value::LineString(line) => vec![line],
            Value::MultiLineString(lines) => lines,
            other => {
                warn!("Skipping {} geometry among the roads", type_name(&other));
                continue;
            }
        };
        for line in lines {
            let pts = line.iter().map(|pt| to_pt(pt)).collect::<Result<Vec<_>>>()?;
            match PolyLine::new(pts) {
                Ok(pl) => roads.push(pl),
                Err(err) => warn!("Skipping a road: {}", err),
            }
        }
    }
    Ok(roads)
}

fn geometries(geojson: GeoJson) -> Vec<Geometry> {
    match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|f| f.geometry)
            .collect(),
        GeoJson::Feature(f) => f.geometry.into_iter().collect(),
        GeoJson::Geometry(geom) => vec![geom],
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn to_pt(position: &[f64]) -> Result<Pt2D> {
    if position.len() < 2 {
        bail!("Position {:?} needs at least x and y", position);
    }
    if !position[0].is_finite() || !position[1].is_finite() {
        bail!("Position {:?} isn't finite", position);
    }
    Ok(Pt2D::new(position[0], position[1]))
}

fn network_to_geojson(segments: &[Line]) -> GeoJson {
    let features = segments
        .iter()
        .map(|line| {
            let mut properties = serde_json::Map::new();
            properties.insert(
                "length_m".to_string(),
                line.length().inner_meters().into(),
            );
            Feature {
                bbox: None,
                geometry: Some(PolyLine::from(*line).to_geojson()),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    GeoJson::FeatureCollection(FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    })
}
