//! Camera types and data structures.

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Largest resolution accepted for a capture request.
pub const MAX_RESOLUTION: Resolution = Resolution {
    width: 7680,
    height: 4320,
};

/// Accepted frame rate range (inclusive).
pub const FPS_RANGE: std::ops::RangeInclusive<u32> = 1..=120;

/// Information about an available camera device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraInfo {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Camera resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Medium resolution (640x480)
    pub const MEDIUM: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// High resolution (1280x720), the snapshot default
    pub const HIGH: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check that both sides are non-zero and within [`MAX_RESOLUTION`].
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("Resolution width and height must be greater than 0".to_string());
        }
        if self.width > MAX_RESOLUTION.width || self.height > MAX_RESOLUTION.height {
            return Err(format!(
                "Resolution exceeds maximum supported ({})",
                MAX_RESOLUTION
            ));
        }
        Ok(())
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HIGH
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(|| {
            format!(
                "Invalid resolution format '{}'. Use WIDTHxHEIGHT (e.g., 1280x720)",
                s
            )
        })?;
        let width: u32 = w
            .parse()
            .map_err(|_| format!("Invalid width '{}' in resolution", w))?;
        let height: u32 = h
            .parse()
            .map_err(|_| format!("Invalid height '{}' in resolution", h))?;
        let res = Resolution { width, height };
        res.validate()?;
        Ok(res)
    }
}

/// Pixel format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// RGB format (3 bytes per pixel)
    Rgb,
}

/// A captured camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB format
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: FrameFormat,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl Frame {
    /// Get the number of bytes per pixel (3 for RGB).
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            FrameFormat::Rgb => 3,
        }
    }
}

/// Settings a camera handle is constructed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraSettings {
    /// Camera device index
    pub device_index: u32,
    /// Requested capture resolution
    pub resolution: Resolution,
    /// Requested FPS (actual may vary)
    pub fps: u32,
}

impl CameraSettings {
    /// Reject settings no device could honor.
    pub fn validate(&self) -> Result<(), CameraError> {
        self.resolution
            .validate()
            .map_err(CameraError::InvalidSettings)?;
        if !FPS_RANGE.contains(&self.fps) {
            return Err(CameraError::InvalidSettings(format!(
                "Framerate must be between {} and {} fps, got {}",
                FPS_RANGE.start(),
                FPS_RANGE.end(),
                self.fps
            )));
        }
        Ok(())
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::HIGH,
            fps: 15,
        }
    }
}

/// Format the device actually negotiated once the stream is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub resolution: Resolution,
    pub fps: u32,
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}fps", self.resolution, self.fps)
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("No cameras found")]
    NoDevices,

    #[error("Failed to query cameras: {0}")]
    QueryFailed(String),

    #[error(
        "Camera device {requested} not found. Available indices: {}. Run 'list-cameras' to see available devices",
        format_indices(available)
    )]
    DeviceNotFound { requested: u32, available: Vec<u32> },

    #[error("Invalid camera settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to open camera: {0}")]
    OpenFailed(String),

    #[error("Camera permission denied. Check that your user may open the video device (on Linux, the 'video' group)")]
    PermissionDenied,

    #[error("Failed to start camera stream: {0}")]
    StreamFailed(String),

    #[error("Camera is not open")]
    NotOpen,

    #[error("Can not receive frame from camera {index}: {reason}")]
    FrameUnavailable { index: u32, reason: String },
}

fn format_indices(indices: &[u32]) -> String {
    if indices.is_empty() {
        return "none".to_string();
    }
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_info_display() {
        let info = CameraInfo {
            index: 0,
            name: "Test Camera".to_string(),
            description: "USB".to_string(),
        };
        assert_eq!(format!("{}", info), "[0] Test Camera (USB)");
    }

    #[test]
    fn test_resolution_default_is_720p() {
        assert_eq!(Resolution::default(), Resolution::new(1280, 720));
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("1920x1080".parse::<Resolution>(), Ok(Resolution::new(1920, 1080)));
        assert_eq!("640X480".parse::<Resolution>(), Ok(Resolution::MEDIUM));
        assert!("1920".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
        assert!("0x720".parse::<Resolution>().is_err());
        assert!("8000x720".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_camera_settings_default() {
        let settings = CameraSettings::default();
        assert_eq!(settings.device_index, 0);
        assert_eq!(settings.resolution, Resolution::HIGH);
        assert_eq!(settings.fps, 15);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_camera_settings_rejects_bad_fps() {
        let settings = CameraSettings {
            fps: 0,
            ..CameraSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CameraError::InvalidSettings(_))
        ));

        let settings = CameraSettings {
            fps: 240,
            ..CameraSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_camera_error_display() {
        assert_eq!(format!("{}", CameraError::NoDevices), "No cameras found");
        assert_eq!(
            format!("{}", CameraError::OpenFailed("busy".to_string())),
            "Failed to open camera: busy"
        );
        assert!(format!("{}", CameraError::PermissionDenied).contains("permission denied"));

        let msg = format!(
            "{}",
            CameraError::DeviceNotFound {
                requested: 5,
                available: vec![0, 1]
            }
        );
        assert!(msg.contains("device 5 not found"));
        assert!(msg.contains("0, 1"));

        let msg = format!(
            "{}",
            CameraError::DeviceNotFound {
                requested: 2,
                available: vec![]
            }
        );
        assert!(msg.contains("none"));
    }

    #[test]
    fn test_frame_bytes_per_pixel() {
        let frame = Frame {
            data: vec![0; 6],
            width: 2,
            height: 1,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        };
        assert_eq!(frame.bytes_per_pixel(), 3);
    }

    #[test]
    fn test_stream_info_display() {
        let info = StreamInfo {
            resolution: Resolution::HIGH,
            fps: 15,
        };
        assert_eq!(info.to_string(), "1280x720@15fps");
    }
}
