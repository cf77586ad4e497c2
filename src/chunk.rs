use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{Bounds, Point, Vector3};
use crate::writer::PointCloudWriter;

/// Points gathered for the next output file, kept in arrival order.
#[derive(Debug, Default)]
pub struct PointBuffer {
    points: Vec<Point>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.extend(points);
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Hands out every buffered point and leaves the buffer empty.
    pub fn drain(&mut self) -> Vec<Point> {
        std::mem::take(&mut self.points)
    }
}

/// What was written for one chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDescriptor {
    pub path: PathBuf,
    pub index: usize,
    pub point_count: usize,
    pub offset: Vector3,
    pub scale: Vector3,
}

/// `{base}.{index}.{extension}`
pub fn chunk_path(base: &Path, index: usize, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}.{}", index, extension));
    PathBuf::from(name)
}

/// Offset of a chunk: the floored per-axis minimum, or zero when empty.
pub fn chunk_offset(points: &[Point]) -> Vector3 {
    Bounds::from_points(points).map_or(Vector3::ZERO, |b| b.min.floor())
}

/// Buffers points and rotates to a new output file whenever the buffer grows
/// past `limit`.
pub struct ChunkWriter<W> {
    writer: W,
    buffer: PointBuffer,
    base: PathBuf,
    extension: String,
    limit: usize,
    scale: Vector3,
    chunk_index: usize,
    written: Vec<OutputDescriptor>,
}

impl<W: PointCloudWriter> ChunkWriter<W> {
    pub fn new(
        writer: W,
        base: impl Into<PathBuf>,
        extension: impl Into<String>,
        limit: usize,
        scale: Vector3,
    ) -> Self {
        Self {
            writer,
            buffer: PointBuffer::new(),
            base: base.into(),
            extension: extension.into(),
            limit,
            scale,
            chunk_index: 0,
            written: Vec::new(),
        }
    }

    /// Adds one row's points and flushes once the limit is exceeded.
    ///
    /// The check runs after the whole row is appended, so a chunk may overshoot
    /// the limit by up to one row.
    pub fn ingest(&mut self, row_points: Vec<Point>) -> Result<()> {
        self.buffer.append(row_points);
        if self.buffer.size() > self.limit {
            self.flush()?;
        }
        Ok(())
    }

    /// Writes the buffered points, even if there are none, to the next file.
    pub fn flush(&mut self) -> Result<OutputDescriptor> {
        let points = self.buffer.drain();
        let descriptor = OutputDescriptor {
            path: chunk_path(&self.base, self.chunk_index, &self.extension),
            index: self.chunk_index,
            point_count: points.len(),
            offset: chunk_offset(&points),
            scale: self.scale,
        };

        self.writer
            .write(&descriptor.path, &points, descriptor.offset, descriptor.scale)?;

        tracing::debug!(
            "Chunk {} flushed with {} points, offset {:?}",
            descriptor.index,
            descriptor.point_count,
            descriptor.offset
        );

        self.chunk_index += 1;
        self.written.push(descriptor.clone());
        Ok(descriptor)
    }

    /// Final flush after the last row; always produces a file.
    pub fn flush_final(mut self) -> Result<(W, Vec<OutputDescriptor>)> {
        self.flush()?;
        Ok((self.writer, self.written))
    }

    pub fn buffered(&self) -> usize {
        self.buffer.size()
    }

    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    pub fn written(&self) -> &[OutputDescriptor] {
        &self.written
    }
}
