//! Camera handle and public capture API.

use std::path::PathBuf;

use super::frame_utils::to_rgb_image;
use super::source::FrameSource;
use super::still::{encode_jpeg, write_image, CaptureError, CaptureRequest, DEFAULT_JPEG_QUALITY};
use super::types::{CameraError, CameraSettings, StreamInfo};
use crate::preview::{self, Display, PreviewError, PreviewOptions, PreviewOutcome};
use crate::storage::{image_file_name, image_label, SessionStamp};
use crate::watermark;

/// What a snapshot camera can do, independent of the backend behind it.
pub trait Camera {
    /// Acquire the device. Opening an already-open camera is a no-op.
    fn open(&mut self) -> Result<StreamInfo, CameraError>;

    /// Show the live feed until the operator closes it or it times out.
    fn show_live_camera(&mut self, options: &PreviewOptions)
        -> Result<PreviewOutcome, PreviewError>;

    /// Capture one still and write it under `request.save_path`.
    ///
    /// Returns the path of the written image.
    fn take_picture(&mut self, request: &CaptureRequest) -> Result<PathBuf, CaptureError>;

    /// Free the device. Safe to call any number of times.
    fn release(&mut self);
}

/// USB camera handle.
///
/// Construction only validates settings; the device is acquired by
/// [`Camera::open`] and freed by [`Camera::release`] (or on drop).
pub struct UsbCamera {
    settings: CameraSettings,
    source: Box<dyn FrameSource>,
    /// Negotiated format; `Some` exactly while the device is open
    stream: Option<StreamInfo>,
    jpeg_quality: u8,
}

impl std::fmt::Debug for UsbCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbCamera")
            .field("settings", &self.settings)
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}

impl UsbCamera {
    /// Build a handle for `settings` on top of `source`. No I/O happens here.
    ///
    /// # Errors
    /// * `CameraError::InvalidSettings` - zero/oversized resolution or
    ///   frame rate outside 1-120 fps
    pub fn new(settings: CameraSettings, source: Box<dyn FrameSource>) -> Result<Self, CameraError> {
        settings.validate()?;
        Ok(Self {
            settings,
            source,
            stream: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        })
    }

    /// Set the JPEG quality used by `take_picture` (1-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Live preview drawn on `display` instead of the process terminal.
    pub fn show_live_camera_on(
        &mut self,
        display: &mut dyn Display,
        options: &PreviewOptions,
    ) -> Result<PreviewOutcome, PreviewError> {
        let stream = self.stream.ok_or(CameraError::NotOpen)?;
        let index = self.settings.device_index;
        let source = &mut self.source;
        preview::run_on(display, index, &stream, options, || source.frame())
    }
}

impl Camera for UsbCamera {
    fn open(&mut self) -> Result<StreamInfo, CameraError> {
        if let Some(info) = self.stream {
            log::debug!("Camera {} already open", self.settings.device_index);
            return Ok(info);
        }

        let info = self.source.open(&self.settings)?;
        self.stream = Some(info);

        log::info!(
            "Initial Camera with configuration: index: {}, resolution: {}, frame rate: {}fps",
            self.settings.device_index,
            self.settings.resolution,
            self.settings.fps
        );
        if info.resolution != self.settings.resolution || info.fps != self.settings.fps {
            log::warn!(
                "Camera {} negotiated {} instead of the requested {}@{}fps",
                self.settings.device_index,
                info,
                self.settings.resolution,
                self.settings.fps
            );
        } else {
            log::info!("Actual camera info: {}", info);
        }
        Ok(info)
    }

    fn show_live_camera(
        &mut self,
        options: &PreviewOptions,
    ) -> Result<PreviewOutcome, PreviewError> {
        let stream = self.stream.ok_or(CameraError::NotOpen)?;
        let index = self.settings.device_index;
        let source = &mut self.source;
        preview::run(index, &stream, options, || source.frame())
    }

    fn take_picture(&mut self, request: &CaptureRequest) -> Result<PathBuf, CaptureError> {
        if !self.is_open() {
            log::warn!("Camera is not opened. Trying to open it...");
            self.open()?;
        }

        let frame = self.source.frame().map_err(|e| match e {
            CameraError::FrameUnavailable { reason, .. } => CaptureError::NoFrame(reason),
            other => CaptureError::Camera(other),
        })?;
        let (width, height) = (frame.width, frame.height);
        let mut image = to_rgb_image(frame).ok_or_else(|| {
            CaptureError::NoFrame(format!("frame data does not match {}x{}", width, height))
        })?;

        let stamp = SessionStamp::now();
        let label = image_label(&request.test_case_name, &stamp, &request.count);
        let file_name = image_file_name(&request.test_case_name, &stamp, &request.count);
        let path = request.save_path.join(&file_name);

        if request.pic_mark {
            watermark::apply(&mut image, self.settings.device_index, &label);
        }

        let bytes = encode_jpeg(&image, self.jpeg_quality)?;
        write_image(&path, &bytes)?;
        log::info!("Image saved as: {}", file_name);

        Ok(path)
    }

    fn release(&mut self) {
        if self.stream.take().is_some() {
            self.source.close();
            log::info!("Camera resources have been released.");
        }
    }
}

impl Drop for UsbCamera {
    fn drop(&mut self) {
        self.release();
    }
}
