//! Thresholds a raster frame into the set of ON-pixel coordinates that the
//! beam will have to visit.

use crate::frame_source::Frame;

/// An integer pixel coordinate, `(row, col)` from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Row index, counted from the top of the frame.
    pub row: u32,
    /// Column index, counted from the left of the frame.
    pub col: u32,
}

impl Point {
    /// Euclidean distance to another pixel coordinate.
    pub fn distance(&self, other: &Self) -> f64 {
        let dr = f64::from(self.row) - f64::from(other.row);
        let dc = f64::from(self.col) - f64::from(other.col);
        dr.hypot(dc)
    }
}

/// Collects the coordinates of every ON pixel in row-major scan order.
///
/// A pixel is ON when the mean of its R, G and B values exceeds `threshold`;
/// the alpha channel is ignored. The comparison is done on integer sums
/// (`r + g + b > 3 * threshold`), which is exact for integer thresholds.
/// An all-OFF frame yields an empty vector.
pub fn extract_points(frame: &Frame, threshold: u8) -> Vec<Point> {
    let cutoff = 3 * u16::from(threshold);
    let mut points = Vec::new();
    for row in 0..frame.height() {
        for col in 0..frame.width() {
            let [r, g, b, _] = frame.rgba(row, col);
            if u16::from(r) + u16::from(g) + u16::from(b) > cutoff {
                points.push(Point { row, col });
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frame(width: u32, height: u32, value: u8) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[value, value, value, 255]);
        }
        Frame::from_rgba(width, height, data).unwrap()
    }

    #[test]
    fn all_off_frame_yields_no_points() {
        let frame = solid_frame(4, 4, 0);
        assert!(extract_points(&frame, 127).is_empty());
    }

    #[test]
    fn all_on_frame_yields_every_coordinate_once() {
        let frame = solid_frame(3, 2, 255);
        let points = extract_points(&frame, 127);
        assert_eq!(
            points,
            vec![
                Point { row: 0, col: 0 },
                Point { row: 0, col: 1 },
                Point { row: 0, col: 2 },
                Point { row: 1, col: 0 },
                Point { row: 1, col: 1 },
                Point { row: 1, col: 2 },
            ]
        );
    }

    #[test]
    fn threshold_is_strict() {
        // mean exactly equal to the threshold stays OFF
        let at = solid_frame(1, 1, 127);
        assert!(extract_points(&at, 127).is_empty());
        let above = solid_frame(1, 1, 128);
        assert_eq!(extract_points(&above, 127).len(), 1);
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let data = vec![200, 200, 200, 0];
        let frame = Frame::from_rgba(1, 1, data).unwrap();
        assert_eq!(extract_points(&frame, 127).len(), 1);
    }

    #[test]
    fn mixed_channels_use_the_mean() {
        // (255 + 255 + 0) / 3 = 170
        let data = vec![255, 255, 0, 255];
        let frame = Frame::from_rgba(1, 1, data).unwrap();
        assert_eq!(extract_points(&frame, 169).len(), 1);
        assert!(extract_points(&frame, 170).is_empty());
    }

    #[test]
    fn point_distance_is_euclidean() {
        let a = Point { row: 0, col: 0 };
        let b = Point { row: 3, col: 4 };
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance(&a), 0.0);
    }
}
