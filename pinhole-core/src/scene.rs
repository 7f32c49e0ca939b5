/// The line scene and the transforms that act on its open group
use std::f64::consts::TAU;
use std::ops::Range;

use nalgebra::Point3;
use tracing::trace;

use crate::color::Color;
use crate::geometry::{Aabb, CircleLink, Mesh, Segment, SegmentKind};
use crate::transform::Transform;

/// Circle resolution used by [`Pinhole::draw_circle`]
pub const CIRCLE_STEPS: usize = 45;
/// Finest circle resolution accepted by [`Pinhole::draw_circle_with_steps`]
pub const MAX_CIRCLE_STEPS: usize = 180;

/// Converts a dot radius to a segment scale so that the rendered disc
/// matches the cap formula.
const DOT_SCALE: f64 = 10.0 / 0.1;

/// Stack of group start indices.
///
/// Popping an empty stack does nothing.
#[derive(Debug, Default, Clone)]
pub struct ScopeStack {
    starts: Vec<usize>,
}

impl ScopeStack {
    pub fn push(&mut self, start: usize) {
        self.starts.push(start);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.starts.pop()
    }

    /// Start of the innermost open group, or 0 when none is open
    pub fn top(&self) -> usize {
        self.starts.last().copied().unwrap_or(0)
    }

    pub fn depth(&self) -> usize {
        self.starts.len()
    }
}

/// A scene of 3D line segments.
///
/// Transforms and `colorize` act on the current group: every segment drawn
/// since the innermost open [`begin`](Pinhole::begin), or the whole scene
/// when no group is open. A scene must be owned exclusively while it is
/// transformed or rendered.
#[derive(Debug, Default, Clone)]
pub struct Pinhole {
    segments: Vec<Segment>,
    stack: ScopeStack,
}

impl Pinhole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of open groups
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Range of segments the next transform will touch
    pub fn current_group(&self) -> Range<usize> {
        self.stack.top().min(self.segments.len())..self.segments.len()
    }

    pub fn begin(&mut self) {
        self.stack.push(self.segments.len());
    }

    pub fn end(&mut self) {
        if self.stack.pop().is_none() {
            trace!("end() without an open group");
        }
    }

    fn group_mut(&mut self) -> &mut [Segment] {
        let range = self.current_group();
        &mut self.segments[range]
    }

    fn apply(&mut self, transform: &Transform) {
        for seg in self.group_mut() {
            seg.start = transform.apply(&seg.start);
            seg.end = transform.apply(&seg.end);
        }
    }

    /// Rotates around the origin by angles in radians, x then y then z
    pub fn rotate(&mut self, x: f64, y: f64, z: f64) {
        self.apply(&Transform::rotation(x, y, z));
    }

    pub fn translate(&mut self, x: f64, y: f64, z: f64) {
        self.apply(&Transform::translation(x, y, z));
    }

    /// Scales coordinates componentwise. Dot and label sizes follow the
    /// smaller of the x and y factors.
    pub fn scale(&mut self, x: f64, y: f64, z: f64) {
        self.apply(&Transform::scaling(x, y, z));
        let size = x.min(y);
        for seg in self.group_mut() {
            if seg.kind != SegmentKind::Line && seg.scale != 0.0 {
                seg.scale *= size;
            }
        }
    }

    pub fn colorize(&mut self, color: Color) {
        for seg in self.group_mut() {
            seg.color = Some(color);
        }
    }

    /// Moves the current group so its bounding box is centered on the origin
    pub fn center(&mut self) {
        let mut bounds = Aabb::empty();
        for seg in self.group_mut().iter() {
            bounds.extend(&seg.start);
            bounds.extend(&seg.end);
        }
        if bounds.is_empty() {
            return;
        }
        let c = bounds.center();
        self.translate(-c.x, -c.y, -c.z);
    }

    fn push(&mut self, seg: Segment) {
        self.segments.push(seg);
    }

    pub fn draw_line(&mut self, start: impl Into<Point3<f64>>, end: impl Into<Point3<f64>>) {
        self.push(Segment::new(start.into(), end.into()));
    }

    /// A filled disc of the given radius in scene units
    pub fn draw_dot(&mut self, center: impl Into<Point3<f64>>, radius: f64) {
        let p = center.into();
        let mut seg = Segment::new(p, p);
        seg.kind = SegmentKind::Dot;
        seg.scale = DOT_SCALE * radius;
        self.push(seg);
    }

    /// A text label anchored at a point. Empty strings draw nothing.
    pub fn draw_string(&mut self, at: impl Into<Point3<f64>>, text: &str) {
        if text.is_empty() {
            return;
        }
        let p = at.into();
        let mut seg = Segment::new(p, p);
        seg.kind = SegmentKind::Label(text.to_owned());
        self.push(seg);
    }

    /// Axis-aligned rectangle in the plane at depth `z`
    pub fn draw_rect(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64, z: f64) {
        self.draw_line([min_x, max_y, z], [max_x, max_y, z]);
        self.draw_line([max_x, max_y, z], [max_x, min_y, z]);
        self.draw_line([max_x, min_y, z], [min_x, min_y, z]);
        self.draw_line([min_x, min_y, z], [min_x, max_y, z]);
    }

    /// Box wireframe: the `min.z` face, the `max.z` face, then the four
    /// edges joining them
    pub fn draw_cube(&mut self, min: impl Into<Point3<f64>>, max: impl Into<Point3<f64>>) {
        let (lo, hi) = (min.into(), max.into());
        self.draw_rect(lo.x, lo.y, hi.x, hi.y, lo.z);
        self.draw_rect(lo.x, lo.y, hi.x, hi.y, hi.z);
        for (x, y) in [(lo.x, hi.y), (hi.x, hi.y), (hi.x, lo.y), (lo.x, lo.y)] {
            self.draw_line([x, y, lo.z], [x, y, hi.z]);
        }
    }

    /// Outlines every face of `mesh` as a closed loop of lines
    pub fn draw_mesh(&mut self, mesh: &Mesh) {
        for face in &mesh.faces {
            for (a, b) in face.edges() {
                self.draw_line(a, b);
            }
        }
    }

    /// Circle in the XY plane through `center`
    pub fn draw_circle(&mut self, center: impl Into<Point3<f64>>, radius: f64) {
        self.draw_circle_with_steps(center, radius, CIRCLE_STEPS);
    }

    /// Circle made of `steps` chained segments, clamped to
    /// `CIRCLE_STEPS..=MAX_CIRCLE_STEPS`
    pub fn draw_circle_with_steps(
        &mut self,
        center: impl Into<Point3<f64>>,
        radius: f64,
        steps: usize,
    ) {
        let c = center.into();
        let n = steps.clamp(CIRCLE_STEPS, MAX_CIRCLE_STEPS);
        let first = self.segments.len();
        let at = |i: usize| {
            let angle = TAU / n as f64 * i as f64;
            Point3::new(c.x + angle.cos() * radius, c.y + angle.sin() * radius, c.z)
        };
        for i in 0..n {
            // the last segment closes back onto the exact first point
            let end = if i + 1 == n { at(0) } else { at(i + 1) };
            let mut seg = Segment::new(at(i), end);
            seg.nocaps = true;
            seg.circle = Some(CircleLink {
                first,
                prev: first + (i + n - 1) % n,
                next: first + (i + 1) % n,
            });
            self.push(seg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line(p: &mut Pinhole, a: [f64; 3], b: [f64; 3]) {
        p.draw_line(a, b);
    }

    #[test]
    fn test_group_scopes_translate() {
        let mut p = Pinhole::new();
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        p.begin();
        line(&mut p, [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        p.translate(1.0, 0.0, 0.0);
        p.end();
        line(&mut p, [0.0, 2.0, 0.0], [1.0, 2.0, 0.0]);

        let segs = p.segments();
        assert_eq!(segs[0].start, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(segs[1].start, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(segs[1].end, Point3::new(2.0, 1.0, 0.0));
        assert_eq!(segs[2].start, Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_nested_groups() {
        let mut p = Pinhole::new();
        p.begin();
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        p.begin();
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert_eq!(p.current_group(), 1..2);
        p.end();
        assert_eq!(p.current_group(), 0..2);
        p.translate(0.0, 0.0, 1.0);
        p.end();
        assert!(p.segments().iter().all(|s| s.start.z == 1.0));
    }

    #[test]
    fn test_unmatched_end_is_ignored() {
        let mut p = Pinhole::new();
        p.end();
        p.end();
        assert_eq!(p.depth(), 0);
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        p.translate(0.0, 1.0, 0.0);
        assert_eq!(p.segments()[0].start, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_empty_group_transform_is_noop() {
        let mut p = Pinhole::new();
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        p.begin();
        p.translate(5.0, 5.0, 5.0);
        p.center();
        p.colorize(Color::WHITE);
        p.end();
        assert_eq!(p.segments()[0].start, Point3::origin());
        assert_eq!(p.segments()[0].color, None);
    }

    #[test]
    fn test_rotate_inverse() {
        let mut p = Pinhole::new();
        p.draw_cube([-0.2, -0.3, -0.1], [0.4, 0.2, 0.5]);
        let before: Vec<_> = p.segments().to_vec();
        p.rotate(0.7, 0.0, 0.0);
        p.rotate(-0.7, 0.0, 0.0);
        for (a, b) in before.iter().zip(p.segments()) {
            assert_relative_eq!(a.start, b.start, epsilon = 1e-12);
            assert_relative_eq!(a.end, b.end, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_scale_resizes_dots_and_labels() {
        let mut p = Pinhole::new();
        line(&mut p, [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]);
        p.draw_dot([1.0, 0.0, 0.0], 0.05);
        p.draw_string([0.0, 1.0, 0.0], "hi");
        p.scale(2.0, 3.0, 4.0);

        let segs = p.segments();
        assert_eq!(segs[0].start, Point3::new(2.0, 3.0, 4.0));
        assert_eq!(segs[0].scale, 1.0);
        assert_relative_eq!(segs[1].scale, 10.0);
        assert_eq!(segs[1].start, Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(segs[2].scale, 2.0);
    }

    #[test]
    fn test_colorize_current_group() {
        let red = Color::rgb(255, 0, 0);
        let mut p = Pinhole::new();
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        p.begin();
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        p.colorize(red);
        p.end();
        assert_eq!(p.segments()[0].color, None);
        assert_eq!(p.segments()[1].color, Some(red));
    }

    #[test]
    fn test_center() {
        let mut p = Pinhole::new();
        p.draw_cube([1.0, 2.0, 3.0], [3.0, 6.0, 4.0]);
        p.center();
        let mut bounds = Aabb::empty();
        for seg in p.segments() {
            bounds.extend(&seg.start);
            bounds.extend(&seg.end);
        }
        assert_relative_eq!(bounds.center(), Point3::origin());
        assert_relative_eq!(bounds.max, Point3::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn test_draw_cube_edges() {
        let mut p = Pinhole::new();
        p.draw_cube([-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]);
        let segs = p.segments();
        assert_eq!(segs.len(), 12);
        assert!(segs[..4].iter().all(|s| s.start.z == -1.0 && s.end.z == -1.0));
        assert!(segs[4..8].iter().all(|s| s.start.z == 1.0 && s.end.z == 1.0));
        assert!(segs[8..].iter().all(|s| s.start.z == -1.0 && s.end.z == 1.0));
        assert_eq!(segs[0].start, Point3::new(-1.0, 1.0, -1.0));
    }

    #[test]
    fn test_draw_mesh() {
        use crate::geometry::Face;

        let mut mesh = Mesh::new();
        mesh.add_face(Face::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]));
        let mut p = Pinhole::new();
        p.draw_mesh(&mesh);
        assert_eq!(p.len(), 3);
        assert_eq!(p.segments()[2].end, Point3::origin());
    }

    #[test]
    fn test_draw_dot() {
        let mut p = Pinhole::new();
        p.draw_dot([0.5, 0.5, 0.0], 0.02);
        let seg = &p.segments()[0];
        assert_eq!(seg.kind, SegmentKind::Dot);
        assert_eq!(seg.start, seg.end);
        assert_relative_eq!(seg.scale, 2.0);
    }

    #[test]
    fn test_empty_string_draws_nothing() {
        let mut p = Pinhole::new();
        p.draw_string([0.0, 0.0, 0.0], "");
        assert!(p.is_empty());
        p.draw_string([0.0, 0.0, 0.0], "origin");
        assert!(p.segments()[0].is_label());
    }

    #[test]
    fn test_circle_is_closed_ring() {
        let mut p = Pinhole::new();
        line(&mut p, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        p.draw_circle([0.0, 0.0, 0.0], 0.2);
        let segs = &p.segments()[1..];
        assert_eq!(segs.len(), CIRCLE_STEPS);
        for (i, seg) in segs.iter().enumerate() {
            let link = seg.circle.unwrap();
            assert!(seg.nocaps);
            assert_eq!(link.first, 1);
            assert_eq!(p.segments()[link.next].start, seg.end);
            assert_eq!(p.segments()[link.prev].end, seg.start);
            assert_eq!(link.next, 1 + (i + 1) % CIRCLE_STEPS);
        }
        let last = segs.last().unwrap().circle.unwrap();
        assert_eq!(last.next, 1);
        assert_eq!(segs[0].circle.unwrap().prev, CIRCLE_STEPS);
    }

    #[test]
    fn test_circle_steps_are_clamped() {
        let mut p = Pinhole::new();
        p.draw_circle_with_steps([0.0, 0.0, 0.0], 1.0, 3);
        assert_eq!(p.len(), CIRCLE_STEPS);
        let mut p = Pinhole::new();
        p.draw_circle_with_steps([0.0, 0.0, 0.0], 1.0, 1000);
        assert_eq!(p.len(), MAX_CIRCLE_STEPS);
        let mut p = Pinhole::new();
        p.draw_circle_with_steps([0.0, 0.0, 0.0], 1.0, 90);
        assert_eq!(p.len(), 90);
    }
}
