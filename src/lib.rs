pub mod chunk;
pub mod config;
pub mod error;
pub mod geotransform;
pub mod model;
pub mod pipeline;
pub mod raster;
pub mod scanline;
pub mod writer;

pub use chunk::{ChunkWriter, OutputDescriptor, PointBuffer};
pub use config::ConversionConfig;
pub use error::{ConversionError, Result};
pub use geotransform::Geotransform;
pub use model::{Bounds, Point, Vector3};
pub use pipeline::{ConversionSummary, Pipeline, PipelineStage, Progress};
pub use raster::{GdalRaster, InMemoryRaster, RasterSource};
pub use scanline::ScanlineFilter;
pub use writer::{LasWriter, MemoryWriter, PointCloudWriter};

use std::path::{Path, PathBuf};

/// Converts the raster at `input` into LAS files named `{output_base}.{n}.las`.
pub fn convert(
    input: &Path,
    output_base: impl Into<PathBuf>,
    config: ConversionConfig,
) -> Result<ConversionSummary> {
    Pipeline::new(config)?.run_path(input, output_base, LasWriter::new())
}
