//! Still capture: request type, errors, and JPEG output.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::types::CameraError;

/// JPEG quality used when nothing else is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// What to capture and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Directory the image is written into
    pub save_path: PathBuf,
    /// Test case name, first part of the file name
    pub test_case_name: String,
    /// Picture number within the test case, last part of the file name
    pub count: String,
    /// Burn a visible watermark into the image
    pub pic_mark: bool,
}

/// Errors that can occur while taking a picture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("Failed to capture image from camera: {0}")]
    NoFrame(String),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write image '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encode `image` as JPEG at `quality` (clamped to 1..=100).
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100));
    encoder.encode_image(image)?;
    Ok(bytes)
}

/// Write encoded bytes to `path`, creating or truncating the file.
pub fn write_image(path: &Path, bytes: &[u8]) -> Result<(), CaptureError> {
    let to_write_error = |source| CaptureError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(to_write_error)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(to_write_error)?;
    writer.flush().map_err(to_write_error)?;
    Ok(())
}
