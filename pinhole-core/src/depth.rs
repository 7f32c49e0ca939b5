/// Painter's-algorithm draw ordering
use std::cmp::Ordering;

use crate::geometry::{Aabb, Segment};

/// Compares two bounding boxes for draw order.
///
/// Axes cascade z, y, x and each axis compares the maximum before the
/// minimum. Larger z is farther from the lens, so z sorts descending; y and
/// x sort ascending.
pub fn compare_bounds(a: &Aabb, b: &Aabb) -> Ordering {
    for axis in (0..3).rev() {
        let ord = if axis == 2 {
            b.max[axis]
                .total_cmp(&a.max[axis])
                .then_with(|| b.min[axis].total_cmp(&a.min[axis]))
        } else {
            a.max[axis]
                .total_cmp(&b.max[axis])
                .then_with(|| a.min[axis].total_cmp(&b.min[axis]))
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Indices of `segments` in back-to-front paint order.
///
/// The segments themselves are left where they are.
pub fn depth_order(segments: &[Segment]) -> Vec<usize> {
    let bounds: Vec<Aabb> = segments.iter().map(Segment::bounds).collect();
    let mut order: Vec<usize> = (0..segments.len()).collect();
    order.sort_by(|&i, &j| compare_bounds(&bounds[i], &bounds[j]));
    order
}
