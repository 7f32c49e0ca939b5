/// Rasterizes a scene as filled, tapered strokes
use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use image::RgbaImage;
use kurbo::{BezPath, Circle, Point, Shape, Vec2};
use nalgebra::Point3;
use tracing::{debug, trace, warn};

use crate::canvas::{Canvas, FillTarget};
use crate::caps::CapIndex;
use crate::color::Color;
use crate::depth::depth_order;
use crate::error::Result;
use crate::geometry::{Quad, Segment, SegmentKind};
use crate::options::ImageOptions;
use crate::projection::{Camera, TINY};
use crate::scene::Pinhole;
use crate::text::{label_origin, TextShaper};

/// Caps narrower than this many pixels are left square
const MIN_CAP_WIDTH: f64 = 2.0;
/// Control point reach of a cubic approximating a half circle, per unit width
const CUBIC_CAP: f64 = 2.0 / 3.0;
/// Label size per unit of stroke width
const LABEL_SIZE: f64 = 10.0;
const CIRCLE_TOLERANCE: f64 = 0.1;

/// A segment projected to the screen with its stroke widths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub start: Point,
    pub end: Point,
    pub start_width: f64,
    pub end_width: f64,
}

impl Stroke {
    pub fn new(seg: &Segment, camera: &Camera, line_width: f64) -> Self {
        let width = |p: &Point3<f64>| camera.line_width(p.z) * line_width * seg.scale;
        Self {
            start: camera.project(&seg.start),
            end: camera.project(&seg.end),
            start_width: width(&seg.start),
            end_width: width(&seg.end),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Direction from `end` back to `start`, in radians
    pub fn angle(&self) -> f64 {
        (self.start.y - self.end.y).atan2(self.start.x - self.end.x)
    }

    /// The tapered quad covering this stroke
    pub fn quad(&self) -> Quad {
        let a = self.angle();
        let (h1, h2) = (self.start_width / 2.0, self.end_width / 2.0);
        Quad {
            corners: [
                self.start + Vec2::from_angle(a - FRAC_PI_2) * h1,
                self.start + Vec2::from_angle(a + FRAC_PI_2) * h1,
                self.end + Vec2::from_angle(a + FRAC_PI_2) * h2,
                self.end + Vec2::from_angle(a - FRAC_PI_2) * h2,
            ],
        }
    }

    /// The stroke outline, bulging into a round cap at each flagged end.
    /// Caps thinner than [`MIN_CAP_WIDTH`] are dropped.
    pub fn outline(&self, cap_start: bool, cap_end: bool) -> BezPath {
        let cap_start = cap_start && self.start_width >= MIN_CAP_WIDTH;
        let cap_end = cap_end && self.end_width >= MIN_CAP_WIDTH;
        let [d1, d2, d3, d4] = self.quad().corners;
        let dir = Vec2::from_angle(self.angle());

        let mut path = BezPath::new();
        path.move_to(d1);
        if cap_start {
            let reach = dir * (self.start_width * CUBIC_CAP);
            path.curve_to(d1 + reach, d2 + reach, d2);
        } else {
            path.line_to(d2);
        }
        path.line_to(d3);
        if cap_end {
            let reach = dir * (self.end_width * CUBIC_CAP);
            path.curve_to(d3 - reach, d4 - reach, d4);
        } else {
            path.line_to(d4);
        }
        path.line_to(d1);
        path.close_path();
        path
    }
}

/// Averages the touching corners of consecutive quads around a ring so the
/// strokes meet without gaps or overlaps
pub fn weld_ring(quads: &mut [Quad]) {
    let n = quads.len();
    for i in 0..n {
        let prev = if i == 0 { n - 1 } else { i - 1 };
        let left = quads[i].corners[0].midpoint(quads[prev].corners[3]);
        let right = quads[i].corners[1].midpoint(quads[prev].corners[2]);
        quads[i].corners[0] = left;
        quads[prev].corners[3] = left;
        quads[i].corners[1] = right;
        quads[prev].corners[2] = right;
    }
}

/// Per-render state. Nothing here outlives one render.
struct Rasterizer<'a> {
    segments: &'a [Segment],
    camera: Camera,
    options: &'a ImageOptions,
    text: Option<&'a dyn TextShaper>,
    caps: HashMap<Color, CapIndex>,
    ring_quads: HashMap<usize, Quad>,
}

impl<'a> Rasterizer<'a> {
    fn stroke(&self, seg: &Segment) -> Stroke {
        Stroke::new(seg, &self.camera, self.options.line_width)
    }

    fn draw(&mut self, target: &mut dyn FillTarget, index: usize) {
        let segments = self.segments;
        let seg = &segments[index];
        let color = self.options.stroke_for(seg.color);
        if let Some(link) = seg.circle {
            if !self.ring_quads.contains_key(&index) {
                self.weld_circle(link.first);
            }
            if let Some(quad) = self.ring_quads.get(&index) {
                target.fill(&quad.to_path(TINY), color);
            }
            return;
        }

        let stroke = self.stroke(seg);
        if let SegmentKind::Label(text) = &seg.kind {
            self.draw_label(target, text, &stroke, color);
            return;
        }
        if !self.camera.onscreen(stroke.start, stroke.end) {
            trace!(index, "segment off screen");
            return;
        }

        let (mut cap_start, mut cap_end) = (false, false);
        if !seg.nocaps {
            let caps = self.caps.entry(color).or_default();
            cap_start = caps.insert(&seg.start);
            cap_end = caps.insert(&seg.end);
        }
        if stroke.is_degenerate() {
            let disc = Circle::new(stroke.start, stroke.start_width / 2.0);
            target.fill(&disc.to_path(CIRCLE_TOLERANCE), color);
            return;
        }
        target.fill(&stroke.outline(cap_start, cap_end), color);
    }

    /// Projects every segment of the ring starting at `first` and caches the
    /// welded quads
    fn weld_circle(&mut self, first: usize) {
        let mut members = Vec::new();
        let mut index = first;
        loop {
            members.push(index);
            match self.segments[index].circle {
                Some(link) if link.next != first && members.len() < self.segments.len() => {
                    index = link.next
                }
                _ => break,
            }
        }
        let mut quads: Vec<Quad> = members
            .iter()
            .map(|&i| self.stroke(&self.segments[i]).quad())
            .collect();
        weld_ring(&mut quads);
        self.ring_quads.extend(members.into_iter().zip(quads));
    }

    fn draw_label(&self, target: &mut dyn FillTarget, text: &str, stroke: &Stroke, color: Color) {
        let Some(shaper) = self.text else {
            warn!(label = text, "no text shaper, label skipped");
            return;
        };
        let size = LABEL_SIZE * stroke.start_width;
        let origin = label_origin(stroke.start, shaper.measure(text, size));
        shaper.draw(target, text, origin, size, color);
    }
}

impl Pinhole {
    /// Renders the scene into a new raster, skipping labels
    pub fn image(&self, width: u32, height: u32, options: &ImageOptions) -> RgbaImage {
        self.render(width, height, options, None)
    }

    /// Renders the scene into a new raster, drawing labels with `text`
    pub fn render(
        &self,
        width: u32,
        height: u32,
        options: &ImageOptions,
        text: Option<&dyn TextShaper>,
    ) -> RgbaImage {
        let mut canvas = Canvas::new(width, height);
        if let Some(background) = options.background {
            canvas.clear(background);
        }
        let camera = Camera::new(width, height, options.scale);
        self.render_into(&mut canvas, &camera, options, text);
        canvas.into_image()
    }

    /// Paints the scene back to front onto any fill target
    pub fn render_into(
        &self,
        target: &mut dyn FillTarget,
        camera: &Camera,
        options: &ImageOptions,
        text: Option<&dyn TextShaper>,
    ) {
        let segments = self.segments();
        debug!(
            segments = segments.len(),
            width = camera.width,
            height = camera.height,
            "rendering scene"
        );
        let mut rasterizer = Rasterizer {
            segments,
            camera: *camera,
            options,
            text,
            caps: HashMap::new(),
            ring_quads: HashMap::new(),
        };
        for index in depth_order(segments) {
            rasterizer.draw(target, index);
        }
    }

    /// Renders the scene and writes it as a PNG
    pub fn save_png(
        &self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        options: &ImageOptions,
    ) -> Result<()> {
        let path = path.as_ref();
        self.image(width, height, options).save(path)?;
        debug!(path = %path.display(), "saved png");
        Ok(())
    }
}
