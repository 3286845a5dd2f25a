use crate::Result;
use crate::io::{csv, geojson};

use super::{MapManifest, MetricStore, RegionId, RegionSet};

/// Joined result of the two startup loads.
///
/// Both sources must load successfully before a `Dataset` exists, so a
/// renderer never observes a half-loaded state. Either failure aborts the
/// whole load; there are no retries.
#[derive(Debug)]
pub struct Dataset {
    pub store: MetricStore,
    pub regions: RegionSet,
}

impl Dataset {
    /// Load and join both sources described by `manifest`.
    pub fn load(manifest: &MapManifest) -> Result<Self> {
        let frame = csv::read_csv(&manifest.data)?;
        let store = MetricStore::from_frame(&frame, &manifest.region_column)?;
        tracing::info!(rows = store.len(), source = %manifest.data.display(), "loaded metric store");

        let shapes = geojson::read_geojson(&manifest.geometry, &manifest.name_property)?;
        let regions = RegionSet::new(shapes)?;
        tracing::info!(regions = regions.len(), source = %manifest.geometry.display(), "loaded region geometry");

        let dataset = Self::from_parts(store, regions);
        for id in dataset.missing_regions() {
            // Not an error: lookups for these regions resolve to 0.
            tracing::warn!(region = %id, "region has geometry but no data row");
        }
        Ok(dataset)
    }

    pub fn from_parts(store: MetricStore, regions: RegionSet) -> Self {
        Self { store, regions }
    }

    /// Regions present in geometry but absent from the metric store.
    pub fn missing_regions(&self) -> Vec<&RegionId> {
        self.regions
            .shapes()
            .iter()
            .map(|shape| &shape.id)
            .filter(|id| !self.store.contains(id))
            .collect()
    }
}
