/// Geometry primitives for line-scene rendering
use kurbo::{BezPath, Point};
use nalgebra::Point3;

use crate::color::Color;

/// Links a circle segment to its neighbours in the closed ring it belongs to.
/// Values are indices into the scene's segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleLink {
    pub first: usize,
    pub prev: usize,
    pub next: usize,
}

/// What a segment stands for when rasterized
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    Line,
    /// Degenerate segment drawn as a filled disc
    Dot,
    /// Degenerate segment carrying a text label
    Label(String),
}

/// A 3D line segment with its draw attributes
#[derive(Debug, Clone)]
pub struct Segment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    /// Explicit color; `None` paints with the image foreground
    pub color: Option<Color>,
    /// Width multiplier, also the size of dots and labels
    pub scale: f64,
    pub nocaps: bool,
    pub kind: SegmentKind,
    pub circle: Option<CircleLink>,
}

impl Segment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self {
            start,
            end,
            color: None,
            scale: 1.0,
            nocaps: false,
            kind: SegmentKind::Line,
            circle: None,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self.kind, SegmentKind::Label(_))
    }

    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        aabb.extend(&self.start);
        aabb.extend(&self.end);
        aabb
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    /// An inverted box which any extension replaces
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// A polygon loop of a loaded model
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: Vec<Point3<f64>>,
}

impl Face {
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        Self { vertices }
    }

    /// Edges of the closed loop. A single vertex has none.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        let n = if self.vertices.len() > 1 { self.vertices.len() } else { 0 };
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Faces loaded from a model file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn edge_count(&self) -> usize {
        self.faces.iter().map(|f| f.edges().count()).sum()
    }
}

/// Projected outline of a thick segment.
///
/// Corners run `start-right`, `start-left`, `end-left`, `end-right` so the
/// quad closes without crossing itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub corners: [Point; 4],
}

impl Quad {
    /// Closed polygon through the four corners, shifting the leading pair
    /// by `-nudge` and the trailing pair by `+nudge` on both axes
    pub fn to_path(&self, nudge: f64) -> BezPath {
        let [c1, c2, c3, c4] = self.corners;
        let lead = |p: Point| Point::new(p.x - nudge, p.y - nudge);
        let trail = |p: Point| Point::new(p.x + nudge, p.y + nudge);
        let mut path = BezPath::new();
        path.move_to(lead(c1));
        path.line_to(lead(c2));
        path.line_to(trail(c3));
        path.line_to(trail(c4));
        path.line_to(lead(c1));
        path.close_path();
        path
    }
}
