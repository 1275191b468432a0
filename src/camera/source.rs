//! Device layer underneath [`UsbCamera`](super::UsbCamera).
//!
//! A [`FrameSource`] owns the actual device (or a stand-in for it). The
//! camera handle drives it through open/frame/close and never touches the
//! backend directly.

use std::time::Instant;

use super::types::{CameraError, CameraInfo, CameraSettings, Frame, FrameFormat, StreamInfo};

/// A device that can be opened, read frame-by-frame, and closed.
pub trait FrameSource {
    /// Acquire the device and start streaming.
    fn open(&mut self, settings: &CameraSettings) -> Result<StreamInfo, CameraError>;

    /// Block until the next frame is available.
    fn frame(&mut self) -> Result<Frame, CameraError>;

    /// Stop streaming and free the device. Must be safe to call when
    /// the source was never opened.
    fn close(&mut self);
}

/// Synthetic source producing a deterministic gradient.
///
/// Stands in for a real device on machines without a camera.
#[derive(Debug, Default)]
pub struct PatternSource {
    stream: Option<StreamInfo>,
    frames_served: u64,
}

impl PatternSource {
    /// Index reported for the synthetic device.
    pub const INDEX: u32 = 0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Device listing entry for the synthetic source.
    pub fn info() -> CameraInfo {
        CameraInfo {
            index: Self::INDEX,
            name: "Test Pattern".to_string(),
            description: "synthetic".to_string(),
        }
    }

    /// Number of frames produced since creation.
    pub fn frames_served(&self) -> u64 {
        self.frames_served
    }
}

impl FrameSource for PatternSource {
    fn open(&mut self, settings: &CameraSettings) -> Result<StreamInfo, CameraError> {
        if settings.device_index != Self::INDEX {
            return Err(CameraError::DeviceNotFound {
                requested: settings.device_index,
                available: vec![Self::INDEX],
            });
        }
        let info = StreamInfo {
            resolution: settings.resolution,
            fps: settings.fps,
        };
        self.stream = Some(info);
        Ok(info)
    }

    fn frame(&mut self) -> Result<Frame, CameraError> {
        let info = self.stream.ok_or(CameraError::NotOpen)?;
        let width = info.resolution.width;
        let height = info.resolution.height;
        // Shift the pattern each frame so a live preview visibly moves.
        let phase = (self.frames_served % 256) as u32;

        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(((x * 255 / width.max(1) + phase) % 256) as u8);
                data.push((y * 255 / height.max(1)) as u8);
                data.push((((x + y) * 255 / (width + height).max(1) + phase) % 256) as u8);
            }
        }
        self.frames_served += 1;

        Ok(Frame {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        })
    }

    fn close(&mut self) {
        self.stream = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Resolution;

    fn settings() -> CameraSettings {
        CameraSettings {
            device_index: 0,
            resolution: Resolution::new(8, 4),
            fps: 15,
        }
    }

    #[test]
    fn test_pattern_requires_open() {
        let mut source = PatternSource::new();
        assert!(matches!(source.frame(), Err(CameraError::NotOpen)));
    }

    #[test]
    fn test_pattern_frame_matches_settings() {
        let mut source = PatternSource::new();
        let info = source.open(&settings()).unwrap();
        assert_eq!(info.resolution, Resolution::new(8, 4));

        let frame = source.frame().unwrap();
        assert_eq!(frame.width, 8);
        assert_eq!(frame.height, 4);
        assert_eq!(frame.data.len(), 8 * 4 * 3);
        assert_eq!(source.frames_served(), 1);
    }

    #[test]
    fn test_pattern_rejects_other_index() {
        let mut source = PatternSource::new();
        let settings = CameraSettings {
            device_index: 3,
            ..settings()
        };
        assert!(matches!(
            source.open(&settings),
            Err(CameraError::DeviceNotFound { requested: 3, .. })
        ));
    }

    #[test]
    fn test_pattern_close_stops_frames() {
        let mut source = PatternSource::new();
        source.open(&settings()).unwrap();
        source.close();
        assert!(source.frame().is_err());
        // Closing twice is harmless
        source.close();
    }
}
