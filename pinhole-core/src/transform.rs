/// Affine point transforms applied to scene segments
use nalgebra::{Point3, Rotation3, Vector3};

/// Rotation angles around the three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Accumulate delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Axis rotations for every non-zero angle, in x, y, z order
    pub fn rotations(&self) -> impl Iterator<Item = Rotation3<f64>> {
        [
            (Vector3::<f64>::x_axis(), self.x),
            (Vector3::<f64>::y_axis(), self.y),
            (Vector3::<f64>::z_axis(), self.z),
        ]
        .into_iter()
        .filter(|(_, angle)| *angle != 0.0)
        .map(|(axis, angle)| Rotation3::from_axis_angle(&axis, angle))
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// A single affine operation on points
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Rotate(RotationState),
    Translate(Vector3<f64>),
    Scale(Vector3<f64>),
}

impl Transform {
    pub fn rotation(x: f64, y: f64, z: f64) -> Self {
        Transform::Rotate(RotationState::new(x, y, z))
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Transform::Translate(Vector3::new(x, y, z))
    }

    pub fn scaling(sx: f64, sy: f64, sz: f64) -> Self {
        Transform::Scale(Vector3::new(sx, sy, sz))
    }

    pub fn apply(&self, p: &Point3<f64>) -> Point3<f64> {
        match self {
            Transform::Rotate(state) => state.rotations().fold(*p, |p, r| r * p),
            Transform::Translate(offset) => p + offset,
            Transform::Scale(factors) => Point3::from(p.coords.component_mul(factors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.rotations().count(), 0);

        state.rotate(0.1, 0.0, 0.3);
        assert_relative_eq!(state.x, 0.1);
        assert_relative_eq!(state.z, 0.3);
        assert_eq!(state.rotations().count(), 2);
    }

    #[test]
    fn test_quarter_turns_are_right_handed() {
        let p = Point3::new(0.0, 1.0, 0.0);
        let q = Transform::rotation(FRAC_PI_2, 0.0, 0.0).apply(&p);
        assert_relative_eq!(q, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);

        let p = Point3::new(0.0, 0.0, 1.0);
        let q = Transform::rotation(0.0, FRAC_PI_2, 0.0).apply(&p);
        assert_relative_eq!(q, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);

        let p = Point3::new(1.0, 0.0, 0.0);
        let q = Transform::rotation(0.0, 0.0, FRAC_PI_2).apply(&p);
        assert_relative_eq!(q, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_axes_apply_in_xyz_order() {
        // x first: (0,1,0) -> (0,0,1), then y: (0,0,1) -> (1,0,0)
        let p = Point3::new(0.0, 1.0, 0.0);
        let q = Transform::rotation(FRAC_PI_2, FRAC_PI_2, 0.0).apply(&p);
        assert_relative_eq!(q, Point3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_translate_and_scale() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(Transform::translation(1.0, -2.0, 0.5).apply(&p), Point3::new(2.0, 0.0, 3.5));
        assert_eq!(Transform::scaling(2.0, 0.5, -1.0).apply(&p), Point3::new(2.0, 1.0, -3.0));
    }
}
