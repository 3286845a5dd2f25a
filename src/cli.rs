use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

use crate::map::Metric;

/// Choropleth map CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "chorograph", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a choropleth map to an SVG file
    Render(RenderArgs),

    /// Summarize a dataset: metric distributions and coverage gaps
    Info(InfoArgs),

    /// Download a data file to a local path
    #[cfg(feature = "download")]
    Fetch(FetchArgs),
}

/// Which population series to color by.
#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
pub enum MetricArg { Total, Male, Female }

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Total => Metric::Total,
            MetricArg::Male => Metric::Male,
            MetricArg::Female => Metric::Female,
        }
    }
}

/// Where the two data sources live; flags override manifest fields.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Map manifest (JSON)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Tabular data file (region name column + metric columns)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Region boundary file (GeoJSON FeatureCollection)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub geometry: Option<PathBuf>,

    /// Column holding region names in the tabular source
    #[arg(long)]
    pub region_column: Option<String>,

    /// Feature property holding region names in the geometry source
    #[arg(long)]
    pub name_property: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Metric to color by
    #[arg(long, value_enum, default_value_t = MetricArg::Total)]
    pub metric: MetricArg,

    /// Zoom steps to apply before writing (positive in, negative out)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub zoom: i32,

    /// Output SVG file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(feature = "download")]
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Source URL
    pub url: String,

    /// Output location (file path)
    #[arg(value_hint = ValueHint::FilePath)]
    pub out: PathBuf,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}
