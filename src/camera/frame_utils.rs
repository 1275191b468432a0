//! Frame conversion utilities.

use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use std::time::Instant;

use super::types::{Frame, FrameFormat};

/// Convert a nokhwa buffer to our RGB Frame format.
///
/// Handles various camera formats (MJPEG, YUYV, NV12, etc.) by using
/// nokhwa's built-in decode_image which automatically converts from
/// the camera's native format to RGB.
///
/// Returns `None` if the conversion fails (unsupported format or corrupt data).
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();

    Some(Frame {
        data: decoded.into_raw(),
        width: resolution.width(),
        height: resolution.height(),
        format: FrameFormat::Rgb,
        timestamp: Instant::now(),
    })
}

/// Wrap a frame's pixels in an `image` buffer for drawing and encoding.
///
/// Returns `None` when the pixel data doesn't match the frame dimensions.
pub fn to_rgb_image(frame: Frame) -> Option<RgbImage> {
    let expected = frame.width as usize * frame.height as usize * frame.bytes_per_pixel();
    if frame.data.len() != expected {
        return None;
    }
    RgbImage::from_raw(frame.width, frame.height, frame.data)
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_to_rgb_image_keeps_pixels() {
        let img = to_rgb_image(frame(vec![1, 2, 3, 4, 5, 6], 2, 1)).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [4, 5, 6]);
    }

    #[test]
    fn test_to_rgb_image_rejects_short_buffer() {
        assert!(to_rgb_image(frame(vec![0; 5], 2, 1)).is_none());
    }

    #[test]
    fn test_to_rgb_image_rejects_long_buffer() {
        assert!(to_rgb_image(frame(vec![0; 9], 2, 1)).is_none());
    }
}
