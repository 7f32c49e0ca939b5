/// Pinhole Core Library - 3D line scenes rendered through a pinhole camera
///
/// Build a scene from line segments, dots, circles and labels, transform
/// groups of them, then rasterize the scene as tapered, antialiased strokes
/// painted back to front.

pub mod canvas;
pub mod caps;
pub mod color;
pub mod depth;
pub mod error;
pub mod geometry;
mod load;
pub mod obj;
pub mod options;
pub mod projection;
pub mod renderer;
pub mod scene;
pub mod stl;
pub mod text;
pub mod transform;

// Re-export commonly used types
pub use canvas::{Canvas, FillTarget};
pub use caps::CapIndex;
pub use color::Color;
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use geometry::{Aabb, CircleLink, Face, Mesh, Quad, Segment, SegmentKind};
pub use options::ImageOptions;
pub use projection::{project, Camera};
pub use scene::Pinhole;
pub use text::TextShaper;
pub use transform::{RotationState, Transform};
