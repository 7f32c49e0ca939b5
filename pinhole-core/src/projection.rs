/// Pinhole camera projection
use kurbo::Point;
use nalgebra::Point3;

/// Stroke width taper per unit of depth
pub const WIDTH_FACTOR: f64 = 0.04;

/// Smallest positive `f64`, substituted for a zero divisor
pub(crate) const TINY: f64 = f64::from_bits(1);

/// Projects a scene point to screen coordinates.
///
/// The scene origin lands in the middle of the viewport, model Y grows up
/// while screen Y grows down, and `z = 0` sits one focal length from the
/// lens.
pub fn project(p: &Point3<f64>, width: f64, height: f64, focal: f64, scale: f64) -> Point {
    let s = scale * focal;
    let (x, y, z) = (p.x * s, p.y * s, p.z * s);
    let mut zz = z + focal;
    if zz == 0.0 {
        zz = TINY;
    }
    let mut ratio = focal / zz;
    if !ratio.is_finite() {
        // keeps 0 * ratio at 0 for points on the lens axis
        ratio = f64::MAX.copysign(ratio);
    }
    let px = x * ratio + width / 2.0;
    let py = y * ratio - height / 2.0;
    Point::new(px, -py)
}

/// Stroke width for an unscaled depth `z`
pub fn line_width_at_z(z: f64, focal: f64) -> f64 {
    (((-z + 1.0) / 2.0) * focal * WIDTH_FACTOR).max(0.0)
}

/// Camera configuration for one render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: f64,
    pub height: f64,
    pub focal: f64,
    pub scale: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32, scale: f64) -> Self {
        let (width, height) = (width as f64, height as f64);
        Self {
            width,
            height,
            focal: width.min(height) / 2.0,
            scale,
        }
    }

    pub fn project(&self, p: &Point3<f64>) -> Point {
        project(p, self.width, self.height, self.focal, self.scale)
    }

    pub fn line_width(&self, z: f64) -> f64 {
        line_width_at_z(z, self.focal)
    }

    /// Whether the box spanned by two projected points touches the viewport
    pub fn onscreen(&self, a: Point, b: Point) -> bool {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        min_x <= self.width && max_x >= 0.0 && min_y <= self.height && max_y >= 0.0
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600, 1.0)
    }
}
