//! Property-based tests for scene transforms using the `proptest` crate.

use approx::abs_diff_eq;
use proptest::prelude::*;

use pinhole_core::{Aabb, CapIndex, Pinhole};

const TOL: f64 = 1e-9;

/// Arbitrary coordinate in a reasonable range.
fn arb_coord() -> impl Strategy<Value = f64> {
    -10.0f64..10.0
}

fn arb_point() -> impl Strategy<Value = [f64; 3]> {
    [arb_coord(), arb_coord(), arb_coord()]
}

fn arb_scene() -> impl Strategy<Value = Vec<([f64; 3], [f64; 3])>> {
    prop::collection::vec((arb_point(), arb_point()), 1..20)
}

fn build(lines: &[([f64; 3], [f64; 3])]) -> Pinhole {
    let mut p = Pinhole::new();
    for (a, b) in lines {
        p.draw_line(*a, *b);
    }
    p
}

proptest! {
    #[test]
    fn rotation_has_an_inverse(
        lines in arb_scene(),
        angle in -std::f64::consts::PI..std::f64::consts::PI,
    ) {
        let original = build(&lines);
        let mut p = original.clone();
        p.rotate(angle, 0.0, 0.0);
        p.rotate(-angle, 0.0, 0.0);
        for (a, b) in original.segments().iter().zip(p.segments()) {
            prop_assert!(abs_diff_eq!(a.start, b.start, epsilon = TOL));
            prop_assert!(abs_diff_eq!(a.end, b.end, epsilon = TOL));
        }
    }

    #[test]
    fn translation_has_an_inverse(lines in arb_scene(), d in arb_point()) {
        let original = build(&lines);
        let mut p = original.clone();
        p.translate(d[0], d[1], d[2]);
        p.translate(-d[0], -d[1], -d[2]);
        for (a, b) in original.segments().iter().zip(p.segments()) {
            prop_assert!(abs_diff_eq!(a.start, b.start, epsilon = TOL));
        }
    }

    #[test]
    fn center_puts_bounds_on_origin(lines in arb_scene()) {
        let mut p = build(&lines);
        p.center();
        let mut bounds = Aabb::empty();
        for seg in p.segments() {
            bounds.extend(&seg.start);
            bounds.extend(&seg.end);
        }
        let c = bounds.center();
        prop_assert!(c.x.abs() < TOL && c.y.abs() < TOL && c.z.abs() < TOL);
    }

    #[test]
    fn group_transforms_leave_outside_segments_alone(
        before in arb_scene(),
        inside in arb_scene(),
        d in arb_point(),
    ) {
        let mut p = build(&before);
        p.begin();
        for (a, b) in &inside {
            p.draw_line(*a, *b);
        }
        p.translate(d[0], d[1], d[2]);
        p.rotate(0.3, 0.2, 0.1);
        p.end();
        p.draw_line([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);

        for (seg, (a, b)) in p.segments().iter().zip(&before) {
            prop_assert_eq!(seg.start, nalgebra::Point3::from(*a));
            prop_assert_eq!(seg.end, nalgebra::Point3::from(*b));
        }
        let last = p.segments().last().unwrap();
        prop_assert_eq!(last.end, nalgebra::Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn cap_index_claims_each_point_once(points in prop::collection::vec(arb_point(), 1..50)) {
        let mut caps = CapIndex::new();
        for p in &points {
            caps.insert(&nalgebra::Point3::from(*p));
        }
        for p in &points {
            prop_assert!(!caps.insert(&nalgebra::Point3::from(*p)));
        }
    }
}
