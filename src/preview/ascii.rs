//! Frame to ASCII conversion for the terminal preview.
//!
//! Pipeline: RGB -> luminance (ITU-R BT.601) -> per-cell average over an
//! aspect-corrected character grid -> character ramp.

use crate::camera::Frame;

/// Terminal cells are roughly twice as tall as they are wide.
pub const CHAR_ASPECT_RATIO: f32 = 2.0;

/// Density ramps, darkest first.
pub const STANDARD_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
pub const BLOCKS_RAMP: &[char] = &[' ', '░', '▒', '▓', '█'];
pub const MINIMAL_RAMP: &[char] = &[' ', '.', ':', '#'];

/// Character ramp used to draw the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    #[default]
    Standard,
    Blocks,
    Minimal,
}

impl CharSet {
    pub fn ramp(&self) -> &'static [char] {
        match self {
            CharSet::Standard => STANDARD_RAMP,
            CharSet::Blocks => BLOCKS_RAMP,
            CharSet::Minimal => MINIMAL_RAMP,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharSet::Standard => "standard",
            CharSet::Blocks => "blocks",
            CharSet::Minimal => "minimal",
        }
    }

    /// Parse a config-file name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(CharSet::Standard),
            "blocks" => Some(CharSet::Blocks),
            "minimal" => Some(CharSet::Minimal),
            _ => None,
        }
    }
}

/// BT.601 luminance with integer math (coefficients scaled by 1000).
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000) as u8
}

/// Largest character grid that fits `max_cols` x `max_rows` while keeping
/// the image's aspect ratio once drawn with [`CHAR_ASPECT_RATIO`] cells.
pub fn fit_grid(img_width: u32, img_height: u32, max_cols: u16, max_rows: u16) -> (u16, u16) {
    if img_width == 0 || img_height == 0 || max_cols == 0 || max_rows == 0 {
        return (0, 0);
    }

    // Columns per row needed to look like the source aspect.
    let grid_aspect = img_width as f32 / img_height as f32 * CHAR_ASPECT_RATIO;

    let rows_for_full_width = (max_cols as f32 / grid_aspect).round() as u16;
    if rows_for_full_width > 0 && rows_for_full_width <= max_rows {
        return (max_cols, rows_for_full_width);
    }

    let cols = ((max_rows as f32 * grid_aspect).round() as u16).min(max_cols);
    (cols.max(1), max_rows)
}

/// Average luminance of every grid cell, written row-major into `out`.
///
/// `out` is cleared first and reused across frames to keep the preview loop
/// allocation-free.
pub fn cell_brightness_into(frame: &Frame, cols: u16, rows: u16, out: &mut Vec<u8>) {
    out.clear();
    let (w, h) = (frame.width, frame.height);
    if cols == 0 || rows == 0 || w == 0 || h == 0 {
        return;
    }
    let bpp = frame.bytes_per_pixel();
    let pixels = frame.data.len() / bpp;
    out.reserve(cols as usize * rows as usize);

    for cy in 0..rows as u32 {
        let y0 = cy * h / rows as u32;
        let y1 = ((cy + 1) * h / rows as u32).max(y0 + 1).min(h);
        for cx in 0..cols as u32 {
            let x0 = cx * w / cols as u32;
            let x1 = ((cx + 1) * w / cols as u32).max(x0 + 1).min(w);

            let mut sum = 0u32;
            let mut count = 0u32;
            for py in y0..y1 {
                for px in x0..x1 {
                    let idx = (py * w + px) as usize;
                    if idx >= pixels {
                        continue;
                    }
                    let p = &frame.data[idx * bpp..idx * bpp + 3];
                    sum += luminance(p[0], p[1], p[2]) as u32;
                    count += 1;
                }
            }
            out.push(if count > 0 { (sum / count) as u8 } else { 0 });
        }
    }
}

/// Map one brightness value onto `ramp`.
#[inline]
pub fn shade(brightness: u8, ramp: &[char], invert: bool) -> char {
    if ramp.is_empty() {
        return ' ';
    }
    let b = if invert { 255 - brightness } else { brightness };
    ramp[b as usize * (ramp.len() - 1) / 255]
}

/// Turn a brightness grid into text rows.
pub fn to_rows(brightness: &[u8], cols: u16, ramp: &[char], invert: bool) -> Vec<String> {
    if cols == 0 {
        return Vec::new();
    }
    brightness
        .chunks(cols as usize)
        .map(|row| row.iter().map(|&b| shade(b, ramp, invert)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FrameFormat;
    use std::time::Instant;

    fn frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
        Frame {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_luminance_primaries() {
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 149);
        assert_eq!(luminance(0, 0, 255), 29);
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
    }

    #[test]
    fn test_fit_grid_width_limited() {
        // 16:9 source in a tall terminal: full width, 45 rows
        let (cols, rows) = fit_grid(1280, 720, 160, 60);
        assert_eq!((cols, rows), (160, 45));
    }

    #[test]
    fn test_fit_grid_vga_in_80x24() {
        let (cols, rows) = fit_grid(640, 480, 80, 24);
        assert_eq!((cols, rows), (64, 24));
    }

    #[test]
    fn test_fit_grid_height_limited() {
        // Square image in a wide terminal: height is the constraint
        let (cols, rows) = fit_grid(100, 100, 200, 20);
        assert_eq!((cols, rows), (40, 20));
    }

    #[test]
    fn test_fit_grid_degenerate() {
        assert_eq!(fit_grid(0, 720, 80, 24), (0, 0));
        assert_eq!(fit_grid(1280, 720, 0, 24), (0, 0));
    }

    #[test]
    fn test_cell_brightness_averages() {
        // 2x1 image: black and white pixel averaged into one cell
        let f = frame(vec![0, 0, 0, 255, 255, 255], 2, 1);
        let mut out = Vec::new();
        cell_brightness_into(&f, 1, 1, &mut out);
        assert_eq!(out, vec![127]);

        cell_brightness_into(&f, 2, 1, &mut out);
        assert_eq!(out, vec![0, 255]);
    }

    #[test]
    fn test_cell_brightness_upsampling_repeats_pixels() {
        let f = frame(vec![255, 255, 255], 1, 1);
        let mut out = Vec::new();
        cell_brightness_into(&f, 3, 2, &mut out);
        assert_eq!(out, vec![255; 6]);
    }

    #[test]
    fn test_shade_extremes() {
        assert_eq!(shade(0, STANDARD_RAMP, false), ' ');
        assert_eq!(shade(255, STANDARD_RAMP, false), '@');
        assert_eq!(shade(255, STANDARD_RAMP, true), ' ');
        assert_eq!(shade(128, &[], false), ' ');
    }

    #[test]
    fn test_to_rows_shape() {
        let rows = to_rows(&[0, 255, 255, 0], 2, MINIMAL_RAMP, false);
        assert_eq!(rows, vec![" #".to_string(), "# ".to_string()]);
    }

    #[test]
    fn test_charset_names() {
        for set in [CharSet::Standard, CharSet::Blocks, CharSet::Minimal] {
            assert_eq!(CharSet::from_name(set.name()), Some(set));
        }
        assert_eq!(CharSet::from_name("Blocks"), Some(CharSet::Blocks));
        assert_eq!(CharSet::from_name("braille"), None);
    }
}
