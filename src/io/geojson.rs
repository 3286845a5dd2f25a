//! GeoJSON boundary reading.

use std::{fs::File, io::BufReader, path::Path};

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;

use crate::map::{RegionId, RegionShape};
use crate::{Error, Result};

/// Read region shapes from a GeoJSON FeatureCollection file.
///
/// `name_property` is the feature property holding the region name.
pub(crate) fn read_geojson(path: &Path, name_property: &str) -> Result<Vec<RegionShape>> {
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|e| Error::load("geometry", origin.clone(), e))?;
    let json: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::load("geometry", origin.clone(), e))?;
    parse_feature_collection(&json, name_property, &origin)
}

/// Extract region shapes from a parsed FeatureCollection.
///
/// Features without the name property or with unsupported geometry are
/// skipped with a warning; a malformed collection is a load error.
pub(crate) fn parse_feature_collection(
    json: &Value,
    name_property: &str,
    origin: &str,
) -> Result<Vec<RegionShape>> {
    let features = json
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::load("geometry", origin, "not a GeoJSON FeatureCollection"))?;

    let mut shapes = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let name = feature
            .get("properties")
            .and_then(|properties| properties.get(name_property))
            .and_then(Value::as_str);
        let Some(name) = name else {
            tracing::warn!(feature = idx, property = name_property, "skipping feature without name property");
            continue;
        };

        let Some(boundary) = feature.get("geometry").and_then(parse_geometry) else {
            tracing::warn!(feature = idx, region = name, "skipping feature with unsupported geometry");
            continue;
        };

        shapes.push(RegionShape {
            id: RegionId::new(name),
            name: name.to_string(),
            boundary,
        });
    }

    Ok(shapes)
}

/// Polygon and MultiPolygon geometries only; anything else is unsupported.
fn parse_geometry(geometry: &Value) -> Option<MultiPolygon<f64>> {
    let coordinates = geometry.get("coordinates")?;
    match geometry.get("type")?.as_str()? {
        "Polygon" => Some(MultiPolygon(vec![parse_polygon(coordinates)?])),
        "MultiPolygon" => coordinates
            .as_array()?
            .iter()
            .map(parse_polygon)
            .collect::<Option<Vec<_>>>()
            .map(MultiPolygon),
        _ => None,
    }
}

/// First ring is the exterior, the rest are holes.
fn parse_polygon(value: &Value) -> Option<Polygon<f64>> {
    let mut rings = value.as_array()?.iter().map(parse_ring);
    let exterior = rings.next()??;
    let interiors = rings.collect::<Option<Vec<_>>>()?;
    Some(Polygon::new(exterior, interiors))
}

fn parse_ring(value: &Value) -> Option<LineString<f64>> {
    value
        .as_array()?
        .iter()
        .map(|position| {
            let position = position.as_array()?;
            Some(Coord { x: position.first()?.as_f64()?, y: position.get(1)?.as_f64()? })
        })
        .collect::<Option<Vec<_>>>()
        .map(LineString::from)
}
