//! RGB raster surface that figures are drawn onto.
//!
//! Provides the small drawing API the renderer needs:
//! - `fill()` / `fill_rect()` - solid areas
//! - `draw_line()` - 1px Bresenham segments
//! - `draw_text()` - font8x8 glyphs, optionally scaled
//! - `to_png()` - encode for transport

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{ImageBuffer, RgbImage};
use std::io::Cursor;

use super::artifact::ArtifactError;

/// Glyph size in pixels before scaling
pub const GLYPH_SIZE: u32 = 8;

/// A pixel buffer with clipped drawing operations
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// RGB pixel buffer (row-major, 3 bytes per pixel)
    buffer: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    ///
    /// Fails with [`ArtifactError::BufferSize`] when the pixel buffer length
    /// does not fit in `usize`.
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Result<Self, ArtifactError> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(ArtifactError::BufferSize { width, height })?;

        let mut canvas = Self {
            width,
            height,
            buffer: vec![0u8; len],
        };
        canvas.fill(background);
        Ok(canvas)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fill(&mut self, color: [u8; 3]) {
        for chunk in self.buffer.chunks_exact_mut(3) {
            chunk.copy_from_slice(&color);
        }
    }

    /// Fill a rectangle; parts outside the canvas are clipped.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 3]) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Draw a 1px line between two points.
    pub fn draw_line(&mut self, from: (i32, i32), to: (i32, i32), color: [u8; 3]) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw text with its top-left corner at `(x, y)`.
    ///
    /// Each glyph is `8 * scale` pixels square. Only foreground pixels are
    /// painted so text can sit on any background.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 3], scale: u32) {
        let step = (GLYPH_SIZE * scale) as i32;
        let mut cursor_x = x;
        for ch in text.chars() {
            if cursor_x >= self.width as i32 {
                break;
            }
            self.draw_char(cursor_x, y, ch, color, scale);
            cursor_x += step;
        }
    }

    /// Pixel width of `text` at the given scale.
    pub fn text_width(text: &str, scale: u32) -> u32 {
        text.chars().count() as u32 * GLYPH_SIZE * scale
    }

    fn draw_char(&mut self, x: i32, y: i32, ch: char, color: [u8; 3], scale: u32) {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .unwrap_or([0u8; 8]);
        let scale = scale as i32;
        for (row_idx, row) in glyph.iter().enumerate() {
            for bit in 0..GLYPH_SIZE {
                // font8x8 stores LSB as leftmost pixel
                if (row >> bit) & 1 == 1 {
                    let px = x + bit as i32 * scale;
                    let py = y + row_idx as i32 * scale;
                    self.fill_rect(px, py, scale, scale, color);
                }
            }
        }
    }

    /// Get the color of a pixel (black outside the canvas)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0];
        }
        let idx = self.index(x, y);
        [self.buffer[idx], self.buffer[idx + 1], self.buffer[idx + 2]]
    }

    /// Set the color of a pixel; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.buffer[idx..idx + 3].copy_from_slice(&color);
    }

    pub fn to_image(&self) -> Result<RgbImage, ArtifactError> {
        ImageBuffer::from_raw(self.width, self.height, self.buffer.clone()).ok_or(
            ArtifactError::BufferSize {
                width: self.width,
                height: self.height,
            },
        )
    }

    /// Encode the canvas as PNG bytes
    pub fn to_png(&self) -> Result<Vec<u8>, ArtifactError> {
        let img = self.to_image()?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}
