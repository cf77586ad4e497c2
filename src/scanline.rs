use crate::geotransform::Geotransform;
use crate::model::Point;

/// Turns one raster row into world-space points, dropping no-data cells.
///
/// Column coordinates are stepped linearly from the row's first cell using the
/// per-column displacement of the transform, computed once up front. For
/// rotated rasters this stepping only follows `rotation1`.
#[derive(Debug, Clone)]
pub struct ScanlineFilter {
    transform: Geotransform,
    no_data_value: f32,
    dx: f64,
    dy: f64,
}

impl ScanlineFilter {
    pub fn new(transform: Geotransform, no_data_value: f32) -> Self {
        let (dx, dy) = transform.column_step();
        Self {
            transform,
            no_data_value,
            dx,
            dy,
        }
    }

    /// Returns the valid cells of `values` as points, in column order.
    pub fn filter(&self, row: usize, values: &[f32]) -> Vec<Point> {
        let (min_x, min_y) = self.transform.map_point(0.0, row as f64);

        values
            .iter()
            .enumerate()
            // exact comparison, no tolerance
            .filter(|&(_, &z)| z != self.no_data_value)
            .map(|(col, &z)| {
                Point::new(
                    step_at(min_x, self.dx, col),
                    step_at(min_y, self.dy, col),
                    z as f64,
                )
            })
            .collect()
    }
}

fn step_at(start: f64, step: f64, index: usize) -> f64 {
    if step != 0.0 {
        start + index as f64 * step
    } else {
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_up() -> Geotransform {
        Geotransform::from([0.0, 1.0, 0.0, 0.0, 0.0, -1.0])
    }

    #[test]
    fn test_all_no_data_row_is_empty() {
        let filter = ScanlineFilter::new(north_up(), 0.0);
        assert!(filter.filter(3, &[0.0; 16]).is_empty());
    }

    #[test]
    fn test_full_row_keeps_every_column() {
        let filter = ScanlineFilter::new(north_up(), -9999.0);
        let values: Vec<f32> = (1..=5).map(|v| v as f32).collect();

        let points = filter.filter(2, &values);
        assert_eq!(points.len(), 5);
        for (col, p) in points.iter().enumerate() {
            assert_eq!(p.x, col as f64);
            assert_eq!(p.y, -2.0);
            assert_eq!(p.z, values[col] as f64);
        }
    }

    #[test]
    fn test_drops_no_data_and_keeps_order() {
        let filter = ScanlineFilter::new(north_up(), 0.0);
        let points = filter.filter(0, &[1.0, 0.0, 3.0, 4.0]);

        assert_eq!(
            points,
            vec![
                Point::new(0.0, 0.0, 1.0),
                Point::new(2.0, 0.0, 3.0),
                Point::new(3.0, 0.0, 4.0),
            ]
        );
    }

    #[test]
    fn test_nan_sentinel_filters_nothing() {
        let filter = ScanlineFilter::new(north_up(), f32::NAN);
        let points = filter.filter(0, &[f32::NAN, 1.0, f32::NAN]);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_stepping_matches_mapping_when_axis_aligned() {
        let gt = Geotransform::from([500.0, 30.0, 0.0, 4000.0, 0.0, -30.0]);
        let filter = ScanlineFilter::new(gt, 0.0);

        let points = filter.filter(7, &[1.0; 10]);
        assert_eq!(points.len(), 10);
        for (col, p) in points.iter().enumerate() {
            let (x, y) = gt.map_point(col as f64, 7.0);
            assert!((p.x - x).abs() < 1e-9);
            assert!((p.y - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rotated_rows_step_along_first_rotation() {
        let angle = 0.3_f64;
        let gt = Geotransform::new(0.0, 2.0, angle, 0.0, angle, 2.0);
        let filter = ScanlineFilter::new(gt, 0.0);

        let points = filter.filter(1, &[1.0, 1.0, 1.0]);
        let (x0, y0) = gt.map_point(0.0, 1.0);
        for (col, p) in points.iter().enumerate() {
            assert!((p.x - (x0 + col as f64 * angle.cos() * 2.0)).abs() < 1e-12);
            assert!((p.y - (y0 + col as f64 * angle.sin() * 2.0)).abs() < 1e-12);
        }
    }
}
