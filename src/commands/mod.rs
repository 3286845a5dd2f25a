pub mod info;
pub mod render;

#[cfg(feature = "download")]
pub mod fetch;

use anyhow::{Result, bail};

use crate::cli::SourceArgs;
use crate::map::MapManifest;

/// Resolve the dataset description: start from the manifest file if given,
/// then apply flag overrides. Both source paths must end up set.
pub(crate) fn resolve_sources(args: &SourceArgs) -> Result<MapManifest> {
    let mut manifest = match &args.manifest {
        Some(path) => MapManifest::read(path)?,
        None => MapManifest::default(),
    };

    if let Some(data) = &args.data {
        manifest.data = data.clone();
    }
    if let Some(geometry) = &args.geometry {
        manifest.geometry = geometry.clone();
    }
    if let Some(region_column) = &args.region_column {
        manifest.region_column = region_column.clone();
    }
    if let Some(name_property) = &args.name_property {
        manifest.name_property = name_property.clone();
    }

    if manifest.data.as_os_str().is_empty() {
        bail!("no tabular data source (set --data or a manifest)");
    }
    if manifest.geometry.as_os_str().is_empty() {
        bail!("no geometry source (set --geometry or a manifest)");
    }

    Ok(manifest)
}
