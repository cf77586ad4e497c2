use gdal::Dataset;
use std::path::Path;

use super::{check_band, check_row, RasterSource};
use crate::error::{ConversionError, Result};
use crate::geotransform::Geotransform;

/// What GDAL assumes for a raster that carries no georeferencing.
const DEFAULT_GEO_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// A raster file opened through GDAL.
pub struct GdalRaster {
    dataset: Dataset,
}

impl GdalRaster {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dataset = Dataset::open(path).map_err(|source| ConversionError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            "Opened raster {:?} with driver {}",
            path,
            dataset.driver().short_name()
        );
        Ok(Self { dataset })
    }
}

impl RasterSource for GdalRaster {
    fn band_count(&self) -> usize {
        self.dataset.raster_count()
    }

    fn raster_size(&self) -> (usize, usize) {
        self.dataset.raster_size()
    }

    fn geo_transform(&self) -> Result<Geotransform> {
        match self.dataset.geo_transform() {
            Ok(gt) => Ok(Geotransform::from(gt)),
            Err(e) => {
                tracing::warn!(
                    "Raster has no geotransform ({}), using {:?}",
                    e,
                    DEFAULT_GEO_TRANSFORM
                );
                Ok(Geotransform::from(DEFAULT_GEO_TRANSFORM))
            }
        }
    }

    fn read_scanline(&self, band: usize, row: usize) -> Result<Vec<f32>> {
        let (width, height) = self.raster_size();
        check_band(band, self.band_count())?;
        check_row(row, height)?;

        let band = self.dataset.rasterband(band)?;
        let buffer = band.read_as::<f32>((0, row as isize), (width, 1), (width, 1), None)?;
        let (_, values) = buffer.into_shape_and_vec();
        Ok(values)
    }
}
