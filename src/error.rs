use std::io;

/// Errors produced while loading data or driving a choropleth display.
///
/// A region present in geometry but absent from the metric store is not an
/// error: lookups resolve to 0 instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required numeric field did not parse as a number.
    #[error("non-numeric value in column {column:?} for region {region:?}")]
    Parse { region: String, column: String },

    #[error("missing required column {0:?}")]
    MissingColumn(String),

    /// A data source could not be fetched or decoded.
    #[error("failed to load {what} from {origin}")]
    Load {
        what: &'static str,
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("geometry source contains no usable regions")]
    EmptyGeometry,

    #[error("no scene bound; initialize the renderer first")]
    NotInitialized,

    #[error("unknown metric {0:?}")]
    UnknownMetric(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn load(
        what: &'static str,
        origin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Load { what, origin: origin.into(), source: source.into() }
    }
}
