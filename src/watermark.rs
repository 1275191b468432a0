//! Visible watermark burned into captured stills.
//!
//! Text is drawn with the 8x8 public-domain bitmap font from `font8x8`,
//! scaled up so it stays legible on 720p captures.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};

/// Watermark ink (red, matching the preview overlay).
pub const INK: Rgb<u8> = Rgb([255, 0, 0]);

/// Glyph scale factor: 8x8 glyphs become 16x16 pixels.
pub const SCALE: u32 = 2;

/// Left margin of every watermark line.
const ORIGIN_X: u32 = 25;

/// Baselines of the two watermark lines.
const LINE_BASELINES: [u32; 2] = [40, 80];

const GLYPH_SIZE: u32 = 8;

/// Burn `Camera ID: <index>` and `label` into the top-left corner.
pub fn apply(image: &mut RgbImage, device_index: u32, label: &str) {
    let lines = [format!("Camera ID: {}", device_index), label.to_string()];
    for (text, baseline) in lines.iter().zip(LINE_BASELINES) {
        let top = baseline.saturating_sub(GLYPH_SIZE * SCALE);
        draw_text(image, ORIGIN_X, top, text, INK, SCALE);
    }
}

/// Draw `text` with its top-left corner at (`x`, `y`).
///
/// Characters missing from the font are rendered as blanks; pixels outside
/// the image are clipped.
pub fn draw_text(image: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>, scale: u32) {
    let advance = GLYPH_SIZE * scale;
    let (width, height) = image.dimensions();

    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let gx = x + i as u32 * advance;
        if gx >= width {
            break;
        }

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // Bit 0 is the leftmost column.
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px0 = gx + col * scale;
                let py0 = y + row as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (px, py) = (px0 + dx, py0 + dy);
                        if px < width && py < height {
                            image.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([0, 0, 0]))
    }

    fn inked(image: &RgbImage) -> usize {
        image.pixels().filter(|p| **p == INK).count()
    }

    #[test]
    fn test_apply_marks_pixels() {
        let mut image = blank(320, 120);
        apply(&mut image, 0, "test_20240101_120000_1");
        assert!(inked(&image) > 0);
    }

    #[test]
    fn test_apply_stays_in_top_left_band() {
        let mut image = blank(1280, 720);
        apply(&mut image, 3, "label");
        for (x, y, p) in image.enumerate_pixels() {
            if *p == INK {
                assert!(x >= ORIGIN_X, "ink left of margin at ({}, {})", x, y);
                assert!(y < 80, "ink below second line at ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut image = blank(64, 32);
        draw_text(&mut image, 0, 0, "   ", INK, 1);
        assert_eq!(inked(&image), 0);
    }

    #[test]
    fn test_draw_text_clips_at_edges() {
        // A tiny image must not panic even though the text overflows it.
        let mut image = blank(10, 5);
        draw_text(&mut image, 4, 2, "WWWW", INK, 3);
        assert!(inked(&image) > 0);
    }

    #[test]
    fn test_scale_multiplies_ink() {
        let mut small = blank(64, 64);
        draw_text(&mut small, 0, 0, "A", INK, 1);
        let mut large = blank(64, 64);
        draw_text(&mut large, 0, 0, "A", INK, 2);
        assert_eq!(inked(&large), inked(&small) * 4);
    }
}
