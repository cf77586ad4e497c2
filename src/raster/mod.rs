//! Raster sources the pipeline can stream scanlines from.

mod gdal_source;

pub use gdal_source::GdalRaster;

use crate::error::{ConversionError, Result};
use crate::geotransform::Geotransform;

/// Read access to a single-band elevation raster, one row at a time.
pub trait RasterSource {
    fn band_count(&self) -> usize;

    /// `(width, height)` in cells.
    fn raster_size(&self) -> (usize, usize);

    fn geo_transform(&self) -> Result<Geotransform>;

    /// Reads row `row` of the 1-based `band`. The result has `width` samples.
    fn read_scanline(&self, band: usize, row: usize) -> Result<Vec<f32>>;
}

/// Rejects band indices outside `1..=band_count`.
pub(crate) fn check_band(band: usize, band_count: usize) -> Result<()> {
    if band == 0 || band > band_count {
        return Err(ConversionError::InvalidBand { band, band_count });
    }
    Ok(())
}

pub(crate) fn check_row(row: usize, height: usize) -> Result<()> {
    if row >= height {
        return Err(ConversionError::Read(format!(
            "row {} is outside a raster of height {}",
            row, height
        )));
    }
    Ok(())
}

/// A single-band raster held entirely in memory, stored row-major.
#[derive(Debug, Clone)]
pub struct InMemoryRaster {
    width: usize,
    height: usize,
    transform: Geotransform,
    values: Vec<f32>,
}

impl InMemoryRaster {
    pub fn new(
        width: usize,
        height: usize,
        transform: Geotransform,
        values: Vec<f32>,
    ) -> Result<Self> {
        if values.len() != width * height {
            return Err(ConversionError::Read(format!(
                "expected {} values for a {}x{} raster, got {}",
                width * height,
                width,
                height,
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            transform,
            values,
        })
    }

    /// Builds a raster from nested rows, which must all have the same length.
    pub fn from_rows(transform: Geotransform, rows: &[Vec<f32>]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != width) {
            return Err(ConversionError::Read(
                "rows of an in-memory raster must have equal length".to_string(),
            ));
        }
        Self::new(width, rows.len(), transform, rows.concat())
    }
}

impl RasterSource for InMemoryRaster {
    fn band_count(&self) -> usize {
        1
    }

    fn raster_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn geo_transform(&self) -> Result<Geotransform> {
        Ok(self.transform)
    }

    fn read_scanline(&self, band: usize, row: usize) -> Result<Vec<f32>> {
        check_band(band, self.band_count())?;
        check_row(row, self.height)?;
        let start = row * self.width;
        Ok(self.values[start..start + self.width].to_vec())
    }
}
