use las::{Builder, Transform, Vector, Writer};
use std::path::{Path, PathBuf};

use crate::error::{ConversionError, Result};
use crate::model::{Point, Vector3};

/// Destination for finished chunks.
pub trait PointCloudWriter {
    fn write(
        &mut self,
        path: &Path,
        points: &[Point],
        offset: Vector3,
        scale: Vector3,
    ) -> Result<()>;
}

/// Writes chunks as LAS 1.2 files with point format 0.
#[derive(Debug, Default)]
pub struct LasWriter {}

impl LasWriter {
    pub fn new() -> Self {
        Self {}
    }

    fn write_las(
        &self,
        path: &Path,
        points: &[Point],
        offset: Vector3,
        scale: Vector3,
    ) -> las::Result<()> {
        let mut builder = Builder::from((1, 2));
        builder.transforms = Vector {
            x: Transform {
                scale: scale.x,
                offset: offset.x,
            },
            y: Transform {
                scale: scale.y,
                offset: offset.y,
            },
            z: Transform {
                scale: scale.z,
                offset: offset.z,
            },
        };
        let header = builder.into_header()?;

        let mut writer = Writer::from_path(path, header)?;
        for p in points {
            writer.write_point(las::Point {
                x: p.x,
                y: p.y,
                z: p.z,
                ..Default::default()
            })?;
        }
        writer.close()?;
        Ok(())
    }
}

impl PointCloudWriter for LasWriter {
    fn write(
        &mut self,
        path: &Path,
        points: &[Point],
        offset: Vector3,
        scale: Vector3,
    ) -> Result<()> {
        tracing::debug!("Writing {} points on file {:?}", points.len(), path);

        self.write_las(path, points, offset, scale)
            .map_err(|source| ConversionError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!("File saved: {:?}", path);
        Ok(())
    }
}

/// A chunk captured by [`MemoryWriter`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenChunk {
    pub path: PathBuf,
    pub points: Vec<Point>,
    pub offset: Vector3,
    pub scale: Vector3,
}

/// Keeps every chunk in memory instead of touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub chunks: Vec<WrittenChunk>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PointCloudWriter for MemoryWriter {
    fn write(
        &mut self,
        path: &Path,
        points: &[Point],
        offset: Vector3,
        scale: Vector3,
    ) -> Result<()> {
        self.chunks.push(WrittenChunk {
            path: path.to_path_buf(),
            points: points.to_vec(),
            offset,
            scale,
        });
        Ok(())
    }
}

impl<W: PointCloudWriter + ?Sized> PointCloudWriter for &mut W {
    fn write(
        &mut self,
        path: &Path,
        points: &[Point],
        offset: Vector3,
        scale: Vector3,
    ) -> Result<()> {
        (**self).write(path, points, offset, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use las::Reader;
    use tempfile::TempDir;

    #[test]
    fn test_write_las() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("test.0.las");

        let points = vec![
            Point::new(135.5, 35.25, 100.125),
            Point::new(136.0, 34.75, 99.5),
        ];
        let offset = Vector3::new(135.0, 34.0, 99.0);
        let scale = Vector3::splat(0.001);

        let mut writer = LasWriter::new();
        writer.write(&output_path, &points, offset, scale).unwrap();

        assert!(output_path.exists());

        let mut reader = Reader::from_path(&output_path).unwrap();
        let header = reader.header();
        assert_eq!(header.number_of_points(), 2);
        assert_eq!(header.transforms().x.offset, 135.0);
        assert_eq!(header.transforms().y.offset, 34.0);
        assert_eq!(header.transforms().z.scale, 0.001);

        let read: Vec<las::Point> = reader.points().map(|p| p.unwrap()).collect();
        assert_eq!(read.len(), 2);
        for (expected, actual) in points.iter().zip(&read) {
            assert!((expected.x - actual.x).abs() < 0.001);
            assert!((expected.y - actual.y).abs() < 0.001);
            assert!((expected.z - actual.z).abs() < 0.001);
        }
    }

    #[test]
    fn test_write_empty_las() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("empty.0.las");

        let mut writer = LasWriter::new();
        writer
            .write(&output_path, &[], Vector3::ZERO, Vector3::splat(0.001))
            .unwrap();

        let reader = Reader::from_path(&output_path).unwrap();
        assert_eq!(reader.header().number_of_points(), 0);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("missing").join("out.0.las");

        let mut writer = LasWriter::new();
        let err = writer
            .write(
                &output_path,
                &[Point::new(0.0, 0.0, 1.0)],
                Vector3::ZERO,
                Vector3::splat(0.001),
            )
            .unwrap_err();
        assert!(matches!(err, ConversionError::Write { .. }));
    }
}
