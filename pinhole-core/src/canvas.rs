/// Antialiased polygon filling onto an RGBA raster
use image::{Rgba, RgbaImage};
use kurbo::{BezPath, PathEl, Point};

use crate::color::Color;

/// Curve flattening tolerance in pixels
const TOLERANCE: f64 = 0.1;
/// Sub-scanlines sampled per pixel row
const SUBSAMPLES: usize = 4;

/// Anything that can composite a filled, closed path.
///
/// The rasterizer only talks to this trait; [`Canvas`] is the in-memory
/// implementation behind [`Pinhole::image`](crate::Pinhole::image).
pub trait FillTarget {
    /// Fills `path` (nonzero winding) with `color`, closing open subpaths
    fn fill(&mut self, path: &BezPath, color: Color);
}

/// A non-horizontal polygon edge with `top < bottom`
#[derive(Debug, Clone, Copy)]
struct Edge {
    top: Point,
    bottom: Point,
    winding: i32,
}

impl Edge {
    fn new(a: Point, b: Point) -> Option<Self> {
        if a.y == b.y {
            return None;
        }
        Some(if a.y < b.y {
            Self {
                top: a,
                bottom: b,
                winding: 1,
            }
        } else {
            Self {
                top: b,
                bottom: a,
                winding: -1,
            }
        })
    }

    fn x_at(&self, y: f64) -> f64 {
        let t = (y - self.top.y) / (self.bottom.y - self.top.y);
        self.top.x + t * (self.bottom.x - self.top.x)
    }
}

/// Flattens a path into polygon edges, closing every subpath
fn flatten_edges(path: &BezPath) -> Vec<Edge> {
    fn push(edges: &mut Vec<Edge>, a: Point, b: Point) {
        if let Some(edge) = Edge::new(a, b) {
            edges.push(edge);
        }
    }

    let mut edges = Vec::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;
    kurbo::flatten(path.iter(), TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            push(&mut edges, last, start);
            start = p;
            last = p;
        }
        PathEl::LineTo(p) => {
            push(&mut edges, last, p);
            last = p;
        }
        PathEl::ClosePath => {
            push(&mut edges, last, start);
            last = start;
        }
        // flatten only emits lines
        _ => {}
    });
    push(&mut edges, last, start);
    edges
}

/// In-memory RGBA raster with a scanline polygon filler
pub struct Canvas {
    image: RgbaImage,
    crossings: Vec<(f64, i32)>,
    coverage: Vec<f32>,
}

impl Canvas {
    /// A fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            crossings: Vec::new(),
            coverage: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn clear(&mut self, color: Color) {
        let px: Rgba<u8> = color.into();
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Adds `weight` times the overlap of `[a, b)` with each pixel column
    fn add_span(coverage: &mut [f32], origin: f64, a: f64, b: f64, weight: f32) {
        let end = origin + coverage.len() as f64;
        let (a, b) = (a.max(origin), b.min(end));
        if a >= b {
            return;
        }
        let first = (a - origin).floor() as usize;
        let last = ((b - origin).ceil() as usize).min(coverage.len());
        for (i, cell) in coverage.iter_mut().enumerate().take(last).skip(first) {
            let left = origin + i as f64;
            let overlap = b.min(left + 1.0) - a.max(left);
            if overlap > 0.0 {
                *cell += overlap as f32 * weight;
            }
        }
    }
}

impl FillTarget for Canvas {
    fn fill(&mut self, path: &BezPath, color: Color) {
        if color.a == 0 {
            return;
        }
        let edges = flatten_edges(path);
        if edges.is_empty() {
            return;
        }

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for e in &edges {
            min_x = min_x.min(e.top.x).min(e.bottom.x);
            max_x = max_x.max(e.top.x).max(e.bottom.x);
            min_y = min_y.min(e.top.y);
            max_y = max_y.max(e.bottom.y);
        }
        if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
            return;
        }

        // Clip to screen bounds
        let (width, height) = (self.image.width() as f64, self.image.height() as f64);
        let x0 = min_x.floor().max(0.0);
        let x1 = max_x.ceil().min(width);
        let y0 = min_y.floor().max(0.0);
        let y1 = max_y.ceil().min(height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let span = (x1 - x0) as usize;
        let weight = 1.0 / SUBSAMPLES as f32;
        let mut crossings = std::mem::take(&mut self.crossings);
        let mut coverage = std::mem::take(&mut self.coverage);
        coverage.resize(span, 0.0);

        for row in y0 as u32..y1 as u32 {
            coverage[..span].fill(0.0);
            for s in 0..SUBSAMPLES {
                let sy = row as f64 + (s as f64 + 0.5) / SUBSAMPLES as f64;
                crossings.clear();
                crossings.extend(
                    edges
                        .iter()
                        .filter(|e| sy >= e.top.y && sy < e.bottom.y)
                        .map(|e| (e.x_at(sy), e.winding)),
                );
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                for pair in crossings.windows(2) {
                    winding += pair[0].1;
                    if winding != 0 {
                        Self::add_span(&mut coverage[..span], x0, pair[0].0, pair[1].0, weight);
                    }
                }
            }
            for (i, &cover) in coverage[..span].iter().enumerate() {
                if cover > 0.0 {
                    let px = self.image.get_pixel_mut(x0 as u32 + i as u32, row);
                    blend(px, color, cover.min(1.0));
                }
            }
        }

        self.crossings = crossings;
        self.coverage = coverage;
    }
}

/// Source-over compositing of a straight-alpha color
fn blend(dst: &mut Rgba<u8>, color: Color, coverage: f32) {
    let sa = color.a as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let src = [color.r, color.g, color.b];
    for (c, s) in src.iter().enumerate() {
        let v = (*s as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
