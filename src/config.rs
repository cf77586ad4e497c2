use crate::error::{ConversionError, Result};
use crate::model::Vector3;

pub const DEFAULT_BAND: usize = 1;
pub const DEFAULT_NO_DATA_VALUE: f32 = 0.0;
pub const DEFAULT_POINT_LIMIT: usize = 10_000_000;
pub const DEFAULT_SCALE: f64 = 0.001;
pub const DEFAULT_EXTENSION: &str = "las";

/// Settings for one raster-to-point-cloud conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// 1-based raster band index.
    pub band: usize,
    /// Cells equal to this value are skipped. Compared with `==`.
    pub no_data_value: f32,
    /// A chunk is flushed once it holds more points than this.
    pub point_limit: usize,
    pub scale: Vector3,
    pub extension: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            band: DEFAULT_BAND,
            no_data_value: DEFAULT_NO_DATA_VALUE,
            point_limit: DEFAULT_POINT_LIMIT,
            scale: Vector3::splat(DEFAULT_SCALE),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ConversionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_band(mut self, band: usize) -> Self {
        self.band = band;
        self
    }

    pub fn with_no_data_value(mut self, no_data_value: f32) -> Self {
        self.no_data_value = no_data_value;
        self
    }

    pub fn with_point_limit(mut self, point_limit: usize) -> Self {
        self.point_limit = point_limit;
        self
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.band == 0 {
            return Err(ConversionError::InvalidConfig(
                "band index starts at 1".to_string(),
            ));
        }
        if self.point_limit == 0 {
            return Err(ConversionError::InvalidConfig(
                "point limit must be greater than 0".to_string(),
            ));
        }
        for (axis, s) in [("x", self.scale.x), ("y", self.scale.y), ("z", self.scale.z)] {
            if !s.is_finite() || s <= 0.0 {
                return Err(ConversionError::InvalidConfig(format!(
                    "{} scale must be a positive number, got {}",
                    axis, s
                )));
            }
        }
        if self.extension.is_empty() {
            return Err(ConversionError::InvalidConfig(
                "output extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
