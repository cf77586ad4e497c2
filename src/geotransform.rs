/// Six-coefficient affine transform in GDAL order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geotransform {
    pub origin_x: f64,
    pub pixel_width: f64,
    pub rotation1: f64,
    pub origin_y: f64,
    pub rotation2: f64,
    pub pixel_height: f64,
}

impl Geotransform {
    pub fn new(
        origin_x: f64,
        pixel_width: f64,
        rotation1: f64,
        origin_y: f64,
        rotation2: f64,
        pixel_height: f64,
    ) -> Self {
        Self {
            origin_x,
            pixel_width,
            rotation1,
            origin_y,
            rotation2,
            pixel_height,
        }
    }

    /// Maps grid indices to world coordinates.
    ///
    /// The rotation terms are angles in radians:
    /// `x = ox + col·cos(r1)·pw + row·sin(r2)·ph` and
    /// `y = oy + col·sin(r1)·pw + row·cos(r2)·ph`.
    pub fn map_point(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x
            + col * self.rotation1.cos() * self.pixel_width
            + row * self.rotation2.sin() * self.pixel_height;
        let y = self.origin_y
            + col * self.rotation1.sin() * self.pixel_width
            + row * self.rotation2.cos() * self.pixel_height;
        (x, y)
    }

    /// World-space displacement between two neighbouring columns of a row.
    pub fn column_step(&self) -> (f64, f64) {
        (
            self.rotation1.cos() * self.pixel_width,
            self.rotation1.sin() * self.pixel_width,
        )
    }
}

impl From<[f64; 6]> for Geotransform {
    fn from(gt: [f64; 6]) -> Self {
        Self::new(gt[0], gt[1], gt[2], gt[3], gt[4], gt[5])
    }
}
