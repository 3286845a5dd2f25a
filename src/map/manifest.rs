use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Description of one choropleth map: where its two sources live and how
/// region names are keyed in each.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapManifest {
    /// Tabular source (CSV): region name column plus one column per metric.
    pub data: PathBuf,
    /// Geometry source (GeoJSON FeatureCollection).
    pub geometry: PathBuf,
    /// Column holding region names in the tabular source.
    pub region_column: String,
    /// Feature property holding region names in the geometry source.
    pub name_property: String,
    /// View box for rendering.
    pub width: u32,
    pub height: u32,
}

impl Default for MapManifest {
    fn default() -> Self {
        Self {
            data: PathBuf::new(),
            geometry: PathBuf::new(),
            region_column: "State".to_string(),
            name_property: "st_nm".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl MapManifest {
    /// Read a manifest from a JSON file; absent fields keep their defaults.
    pub fn read(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| Error::load("manifest", origin.clone(), e))?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::load("manifest", origin, e))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_manifest_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data": "pop.csv", "geometry": "states.geojson"}}"#).unwrap();

        let manifest = MapManifest::read(file.path()).unwrap();
        assert_eq!(manifest.data, PathBuf::from("pop.csv"));
        assert_eq!(manifest.region_column, "State");
        assert_eq!(manifest.name_property, "st_nm");
        assert_eq!((manifest.width, manifest.height), (800, 600));
    }

    #[test]
    fn missing_manifest_is_a_load_error() {
        assert!(matches!(
            MapManifest::read(Path::new("/nonexistent/map.json")),
            Err(Error::Load { what: "manifest", .. })
        ));
    }
}
