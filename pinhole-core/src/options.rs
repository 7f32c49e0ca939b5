/// Render configuration
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Options controlling how a scene is rasterized.
///
/// `foreground` paints every segment that was never colorized. A `None`
/// foreground disables the override and such segments fall back to black.
/// A `None` background leaves the raster transparent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    /// Multiplier applied to every stroke width
    pub line_width: f64,
    /// Multiplier applied to the camera scale
    pub scale: f64,
}

impl ImageOptions {
    pub fn with_foreground(mut self, color: Option<Color>) -> Self {
        self.foreground = color;
        self
    }

    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Stroke color for a segment with an optional explicit color
    pub(crate) fn stroke_for(&self, explicit: Option<Color>) -> Color {
        explicit.or(self.foreground).unwrap_or(Color::BLACK)
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            foreground: Some(Color::BLACK),
            background: None,
            line_width: 1.0,
            scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ImageOptions::default();
        assert_eq!(opts.foreground, Some(Color::BLACK));
        assert_eq!(opts.background, None);
        assert_eq!(opts.line_width, 1.0);
        assert_eq!(opts.scale, 1.0);
    }

    #[test]
    fn test_explicit_color_wins_over_foreground() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let opts = ImageOptions::default().with_foreground(Some(blue));
        assert_eq!(opts.stroke_for(Some(red)), red);
        assert_eq!(opts.stroke_for(None), blue);
        let opts = opts.with_foreground(None);
        assert_eq!(opts.stroke_for(None), Color::BLACK);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "line_width": 0.3,
            "background": { "r": 255, "g": 255, "b": 255, "a": 255 }
        }"#;
        let opts: ImageOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.line_width, 0.3);
        assert_eq!(opts.background, Some(Color::WHITE));
        assert_eq!(opts.foreground, Some(Color::BLACK));
        assert_eq!(opts.scale, 1.0);
    }
}
