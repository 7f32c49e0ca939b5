/// Text shaping hook for label segments
use kurbo::Point;

use crate::canvas::FillTarget;
use crate::color::Color;

/// Measures and draws label text.
///
/// Passed to [`Pinhole::render`](crate::Pinhole::render); glyph outlines are
/// expected to go through the same [`FillTarget`] as the strokes. Font
/// loading and caching are up to the implementor.
pub trait TextShaper {
    /// Width and height of `text` at `size` pixels
    fn measure(&self, text: &str, size: f64) -> (f64, f64);

    /// Draws `text` with the left end of its baseline at `origin`
    fn draw(&self, target: &mut dyn FillTarget, text: &str, origin: Point, size: f64, color: Color);
}

/// Where a label of measured size `(w, h)` goes so it is centered on `at`
pub fn label_origin(at: Point, (w, h): (f64, f64)) -> Point {
    Point::new(at.x - w / 2.0, at.y + h * 0.4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_origin_centers_horizontally() {
        let origin = label_origin(Point::new(50.0, 40.0), (20.0, 10.0));
        assert_eq!(origin, Point::new(40.0, 44.0));
    }
}
