use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = ConversionError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("unable to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("band {band} is out of index (raster has {band_count} band(s))")]
    InvalidBand { band: usize, band_count: usize },

    #[error("failed to read raster: {0}")]
    Read(String),

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: las::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<gdal::errors::GdalError> for ConversionError {
    fn from(err: gdal::errors::GdalError) -> Self {
        ConversionError::Read(err.to_string())
    }
}
