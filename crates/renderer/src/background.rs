//! Backdrop raster synthesis.
//!
//! The glass scenes refract a simple text-on-black raster. Browsers get this
//! from a 2D canvas; here the glyphs come from an embedded 5x7 bitmap font
//! scaled to the capped-DPR viewport. The raster is regenerated on every
//! resize because the glyph scale depends on the pixel size.

use std::path::Path;

use anyhow::{Context, Result};

pub const DEFAULT_TEXT: &str = "HELLO WORLD";

/// Fraction of the viewport height the text line occupies.
const TEXT_HEIGHT_RATIO: f32 = 0.12;

const GLYPH_ROWS: usize = 7;
const GLYPH_COLUMNS: usize = 5;

/// Rows are 5-bit masks, most significant bit leftmost.
fn glyph(ch: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0E],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x01, 0x01, 0x01, 0x01, 0x11, 0x11, 0x0E],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0E, 0x11, 0x10, 0x0E, 0x01, 0x11, 0x0E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x0E, 0x10, 0x1E, 0x11, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x01, 0x0E],
        ' ' => [0x00; GLYPH_ROWS],
        _ => return None,
    };
    Some(rows)
}

/// An RGBA8 raster ready for upload.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Backdrop {
    /// White `text` centered on black, sized against the pixel viewport.
    pub fn text(width: u32, height: u32, text: &str) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut pixels = vec![0u8; (width * height * 4) as usize];
        // Opaque black field.
        for pixel in pixels.chunks_exact_mut(4) {
            pixel[3] = 255;
        }

        let glyphs: Vec<[u8; GLYPH_ROWS]> = text
            .chars()
            .map(|ch| glyph(ch).unwrap_or([0x1F; GLYPH_ROWS]))
            .collect();
        if glyphs.is_empty() {
            return Self { width, height, pixels };
        }

        let cell = ((height as f32 * TEXT_HEIGHT_RATIO / GLYPH_ROWS as f32).floor() as u32).max(1);
        // One column of spacing between glyphs.
        let advance = cell * (GLYPH_COLUMNS as u32 + 1);
        let text_width = advance * glyphs.len() as u32 - cell;
        let origin_x = (width.saturating_sub(text_width)) / 2;
        let origin_y = (height.saturating_sub(cell * GLYPH_ROWS as u32)) / 2;

        for (index, rows) in glyphs.iter().enumerate() {
            let glyph_x = origin_x + index as u32 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for column in 0..GLYPH_COLUMNS {
                    if bits & (1 << (GLYPH_COLUMNS - 1 - column)) == 0 {
                        continue;
                    }
                    let x0 = glyph_x + column as u32 * cell;
                    let y0 = origin_y + row as u32 * cell;
                    for y in y0..(y0 + cell).min(height) {
                        for x in x0..(x0 + cell).min(width) {
                            let offset = ((y * width + x) * 4) as usize;
                            pixels[offset..offset + 4].copy_from_slice(&[255, 255, 255, 255]);
                        }
                    }
                }
            }
        }

        Self { width, height, pixels }
    }

    /// File-backed alternative to the synthesized raster.
    pub fn from_image(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to open backdrop image at {}", path.display()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Ok(Self {
            width,
            height,
            pixels: image.into_raw(),
        })
    }
}
