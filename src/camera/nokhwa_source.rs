//! Native camera backend built on nokhwa.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::device::{ensure_listed, list_devices};
use super::frame_utils::convert_to_rgb;
use super::source::FrameSource;
use super::types::{CameraError, CameraSettings, Frame, Resolution, StreamInfo};

/// Number of frames a single `frame()` call may discard while waiting
/// for a decodable one (MJPEG streams occasionally start with garbage).
const MAX_DECODE_ATTEMPTS: usize = 5;

/// Camera source backed by the platform's native capture API.
///
/// `nokhwa::Camera` isn't `Send`, so the source must stay on the thread
/// that opened it.
#[derive(Default)]
pub struct NokhwaSource {
    camera: Option<Camera>,
    device_index: u32,
}

impl std::fmt::Debug for NokhwaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NokhwaSource")
            .field("device_index", &self.device_index)
            .field("is_open", &self.camera.is_some())
            .finish()
    }
}

impl NokhwaSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSource for NokhwaSource {
    fn open(&mut self, settings: &CameraSettings) -> Result<StreamInfo, CameraError> {
        // First check if the device exists
        let devices = list_devices()?;
        ensure_listed(&devices, settings.device_index)?;

        let index = CameraIndex::Index(settings.device_index);
        let mut camera = open_camera_with_fallback(&index, settings)?;

        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let res = camera.resolution();
        let info = StreamInfo {
            resolution: Resolution {
                width: res.width(),
                height: res.height(),
            },
            fps: camera.frame_rate(),
        };

        self.device_index = settings.device_index;
        self.camera = Some(camera);
        Ok(info)
    }

    fn frame(&mut self) -> Result<Frame, CameraError> {
        let index = self.device_index;
        let camera = self.camera.as_mut().ok_or(CameraError::NotOpen)?;

        let mut last_reason = String::from("no decodable frame");
        for _ in 0..MAX_DECODE_ATTEMPTS {
            let raw_frame = camera
                .frame()
                .map_err(|e| CameraError::FrameUnavailable {
                    index,
                    reason: e.to_string(),
                })?;
            // Convert to RGB Frame (handles MJPEG, YUYV, and other formats)
            match convert_to_rgb(&raw_frame) {
                Some(frame) => return Ok(frame),
                None => {
                    log::debug!("Dropping undecodable {:?} frame", raw_frame.source_frame_format());
                    last_reason = format!(
                        "could not decode {:?} frame",
                        raw_frame.source_frame_format()
                    );
                }
            }
        }

        Err(CameraError::FrameUnavailable {
            index,
            reason: last_reason,
        })
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera {} stream: {}", self.device_index, e);
            }
        }
    }
}

impl Drop for NokhwaSource {
    fn drop(&mut self) {
        self.close();
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    let closest = |format: NokhwaFrameFormat| {
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height),
            format,
            settings.fps,
        )))
    };

    // Order of preference:
    // 1. NV12 (native macOS format)
    // 2. MJPEG (widely supported on USB cameras, cheap at 720p)
    // 3. YUYV (uncompressed fallback for UVC devices)
    // 4. Whatever the camera offers at its highest resolution
    let format_attempts: Vec<RequestedFormat> = vec![
        closest(NokhwaFrameFormat::NV12),
        closest(NokhwaFrameFormat::MJPEG),
        closest(NokhwaFrameFormat::YUYV),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("Camera {:?} rejected format request: {}", index, e);
                last_error = Some(e);
            }
        }
    }

    let Some(e) = last_error else {
        return Err(CameraError::OpenFailed("no format strategies".to_string()));
    };
    Err(classify_open_error(&e.to_string()))
}

/// Map a backend error message onto our error kinds.
fn classify_open_error(message: &str) -> CameraError {
    let msg = message.to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        CameraError::PermissionDenied
    } else {
        CameraError::OpenFailed(message.to_string())
    }
}
