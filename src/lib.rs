#![doc = "Chorograph public API"]
pub mod cli;
pub mod commands;
mod color;
mod error;
mod io;
mod map;
mod render;

#[cfg(feature = "download")]
pub mod download;

#[doc(inline)]
pub use map::{Dataset, MapManifest, Metric, MetricStore, RegionId, RegionRecord, RegionSet, RegionShape};

#[doc(inline)]
pub use color::{BUCKETS, ColorMapper, QuantileScale, Rgb, palette};

#[doc(inline)]
pub use render::{HoverEvent, HoverHandlers, RenderState, Renderer, STATUS_TTL, StatusLine, Tooltip, Viewport};

#[doc(inline)]
pub use error::{Error, Result};
