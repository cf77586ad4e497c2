use std::path::{Path, PathBuf};

use crate::chunk::{ChunkWriter, OutputDescriptor};
use crate::config::ConversionConfig;
use crate::error::Result;
use crate::raster::{check_band, GdalRaster, RasterSource};
use crate::scanline::ScanlineFilter;
use crate::writer::PointCloudWriter;

/// Where a [`Pipeline`] is in its run. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Opening,
    Validating,
    Streaming,
    Flushing,
    Done,
}

/// Rows processed so far, reported after each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub row: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.row as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub files: Vec<OutputDescriptor>,
    pub total_points: usize,
    pub rows: usize,
}

/// Streams a raster row by row into chunked point-cloud files.
pub struct Pipeline<'a> {
    config: ConversionConfig,
    stage: PipelineStage,
    progress: Option<Box<dyn FnMut(Progress) + 'a>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: ConversionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stage: PipelineStage::Opening,
            progress: None,
        })
    }

    /// Registers an observer called once per finished row.
    pub fn with_progress(mut self, observer: impl FnMut(Progress) + 'a) -> Self {
        self.progress = Some(Box::new(observer));
        self
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Opens `input` with GDAL and converts it.
    pub fn run_path<W: PointCloudWriter>(
        &mut self,
        input: &Path,
        output_base: impl Into<PathBuf>,
        writer: W,
    ) -> Result<ConversionSummary> {
        self.enter(PipelineStage::Opening);
        let source = GdalRaster::open(input)?;
        self.run(&source, output_base, writer)
    }

    /// Converts an already opened raster.
    pub fn run<R, W>(
        &mut self,
        source: &R,
        output_base: impl Into<PathBuf>,
        writer: W,
    ) -> Result<ConversionSummary>
    where
        R: RasterSource + ?Sized,
        W: PointCloudWriter,
    {
        self.enter(PipelineStage::Validating);
        let band = self.config.band;
        check_band(band, source.band_count())?;

        let (width, height) = source.raster_size();
        tracing::info!("Band size is {} x {}", width, height);

        let transform = source.geo_transform()?;
        let filter = ScanlineFilter::new(transform, self.config.no_data_value);
        let mut chunks = ChunkWriter::new(
            writer,
            output_base,
            self.config.extension.clone(),
            self.config.point_limit,
            self.config.scale,
        );

        self.enter(PipelineStage::Streaming);
        let mut total_points = 0;
        for row in 0..height {
            let values = source.read_scanline(band, row)?;
            let points = filter.filter(row, &values);
            total_points += points.len();
            tracing::debug!(
                "Row {}: {} of {} cells kept, {} buffered",
                row,
                points.len(),
                values.len(),
                chunks.buffered() + points.len()
            );
            chunks.ingest(points)?;

            if let Some(observer) = self.progress.as_mut() {
                observer(Progress {
                    row: row + 1,
                    total: height,
                });
            }
        }

        self.enter(PipelineStage::Flushing);
        let (_, files) = chunks.flush_final()?;

        self.enter(PipelineStage::Done);
        tracing::info!(
            "Converted {} points from {} rows into {} files",
            total_points,
            height,
            files.len()
        );

        Ok(ConversionSummary {
            files,
            total_points,
            rows: height,
        })
    }

    fn enter(&mut self, stage: PipelineStage) {
        tracing::debug!("Pipeline stage: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;
    use crate::geotransform::Geotransform;
    use crate::model::Point;
    use crate::raster::InMemoryRaster;
    use crate::writer::MemoryWriter;

    fn sample_raster() -> InMemoryRaster {
        InMemoryRaster::from_rows(
            Geotransform::from([0.0, 1.0, 0.0, 0.0, 0.0, -1.0]),
            &[vec![1.0, 0.0, 3.0, 4.0], vec![0.0, 0.0, 7.0, 8.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_single_chunk() {
        let config = ConversionConfig::new().with_point_limit(100);
        let mut pipeline = Pipeline::new(config).unwrap();
        let mut writer = MemoryWriter::new();

        let summary = pipeline.run(&sample_raster(), "dem", &mut writer).unwrap();

        assert_eq!(pipeline.stage(), PipelineStage::Done);
        assert_eq!(summary.total_points, 5);
        assert_eq!(summary.rows, 2);
        assert_eq!(writer.chunks.len(), 1);
        assert_eq!(writer.chunks[0].path, PathBuf::from("dem.0.las"));
        assert_eq!(
            writer.chunks[0].points,
            vec![
                Point::new(0.0, 0.0, 1.0),
                Point::new(2.0, 0.0, 3.0),
                Point::new(3.0, 0.0, 4.0),
                Point::new(2.0, -1.0, 7.0),
                Point::new(3.0, -1.0, 8.0),
            ]
        );
    }

    #[test]
    fn test_invalid_band() {
        let config = ConversionConfig::new().with_band(2);
        let mut pipeline = Pipeline::new(config).unwrap();
        let mut writer = MemoryWriter::new();

        let err = pipeline
            .run(&sample_raster(), "dem", &mut writer)
            .unwrap_err();

        assert!(matches!(
            err,
            ConversionError::InvalidBand {
                band: 2,
                band_count: 1
            }
        ));
        assert_eq!(pipeline.stage(), PipelineStage::Validating);
        assert!(writer.chunks.is_empty());
    }

    #[test]
    fn test_progress_reaches_total_on_last_row() {
        let mut seen = Vec::new();
        {
            let mut pipeline = Pipeline::new(ConversionConfig::default())
                .unwrap()
                .with_progress(|p| seen.push(p));
            pipeline
                .run(&sample_raster(), "dem", MemoryWriter::new())
                .unwrap();
        }

        assert_eq!(
            seen,
            vec![Progress { row: 1, total: 2 }, Progress { row: 2, total: 2 }]
        );
        assert_eq!(seen.last().unwrap().percent(), 100.0);
    }

    #[test]
    fn test_open_error_for_missing_input() {
        let mut pipeline = Pipeline::new(ConversionConfig::default()).unwrap();
        let err = pipeline
            .run_path(Path::new("no/such/raster.tif"), "dem", MemoryWriter::new())
            .unwrap_err();
        assert!(matches!(err, ConversionError::Open { .. }));
        assert_eq!(pipeline.stage(), PipelineStage::Opening);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Pipeline::new(ConversionConfig::new().with_point_limit(0)).is_err());
    }
}
