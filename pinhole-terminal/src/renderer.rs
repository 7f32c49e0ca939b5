/// Half-block output of RGBA frames for terminal preview
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use image::{Rgba, RgbaImage};
use std::io::Write;

/// Upper half block; the foreground paints the top pixel, the background
/// the bottom one
const HALF_BLOCK: char = '\u{2580}';

/// Terminal backdrop that translucent pixels are composited over
const BACKDROP: [u8; 3] = [0, 0, 0];

/// Shows a raster two pixel rows per terminal line
pub struct HalfBlockRenderer {
    columns: u16,
    rows: u16,
}

impl HalfBlockRenderer {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    /// Pixel size of a frame that fills the character grid
    pub fn frame_size(&self) -> (u32, u32) {
        (self.columns as u32, self.rows as u32 * 2)
    }

    pub fn draw<W: Write>(&self, frame: &RgbaImage, writer: &mut W) -> std::io::Result<()> {
        let rows = (frame.height() / 2).min(self.rows as u32);
        let columns = frame.width().min(self.columns as u32);
        for row in 0..rows {
            let mut last: Option<(Color, Color)> = None;
            for x in 0..columns {
                let top = frame.get_pixel(x, row * 2);
                let cell = cell_colors(top, frame.get_pixel(x, row * 2 + 1));
                // repeated colors need no new escape codes
                if last != Some(cell) {
                    writer.queue(SetForegroundColor(cell.0))?;
                    writer.queue(SetBackgroundColor(cell.1))?;
                    last = Some(cell);
                }
                writer.queue(Print(HALF_BLOCK))?;
            }
            writer.queue(ResetColor)?;
            if row + 1 < rows {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Foreground and background colors for one character cell
pub fn cell_colors(top: &Rgba<u8>, bottom: &Rgba<u8>) -> (Color, Color) {
    (to_terminal(top), to_terminal(bottom))
}

fn to_terminal(px: &Rgba<u8>) -> Color {
    let alpha = px[3] as u16;
    let mix = |c: u8, under: u8| ((c as u16 * alpha + under as u16 * (255 - alpha)) / 255) as u8;
    Color::Rgb {
        r: mix(px[0], BACKDROP[0]),
        g: mix(px[1], BACKDROP[1]),
        b: mix(px[2], BACKDROP[2]),
    }
}
