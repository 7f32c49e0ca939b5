/// Deduplication of round caps at shared endpoints
use std::collections::BTreeSet;

use nalgebra::Point3;

/// Set of 3D points that already received a cap.
///
/// Points compare by exact value, `z` first then `y` then `x`. One index
/// covers one stroke color; the rasterizer keeps one per color and throws
/// them away after each render.
#[derive(Debug, Default, Clone)]
pub struct CapIndex {
    points: BTreeSet<[u64; 3]>,
}

impl CapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the cap at `p`. Returns `true` only for the first claim.
    pub fn insert(&mut self, p: &Point3<f64>) -> bool {
        self.points.insert(key(p))
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        self.points.contains(&key(p))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn key(p: &Point3<f64>) -> [u64; 3] {
    // +0.0 folds -0.0 into 0.0
    [
        (p.z + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.x + 0.0).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_claims_once() {
        let mut caps = CapIndex::new();
        let p = Point3::new(0.2, -0.2, 0.2);
        assert!(caps.insert(&p));
        assert!(!caps.insert(&p));
        assert!(!caps.insert(&Point3::new(0.2, -0.2, 0.2)));
        assert_eq!(caps.len(), 1);
    }

    #[test]
    fn test_distinct_points() {
        let mut caps = CapIndex::new();
        assert!(caps.insert(&Point3::new(1.0, 0.0, 0.0)));
        assert!(caps.insert(&Point3::new(0.0, 1.0, 0.0)));
        assert!(caps.insert(&Point3::new(0.0, 0.0, 1.0)));
        assert!(caps.contains(&Point3::new(0.0, 1.0, 0.0)));
        assert!(!caps.contains(&Point3::new(1.0, 1.0, 0.0)));
        assert_eq!(caps.len(), 3);
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let mut caps = CapIndex::new();
        assert!(caps.insert(&Point3::new(0.0, 0.0, 0.0)));
        assert!(!caps.insert(&Point3::new(-0.0, 0.0, -0.0)));
    }
}
