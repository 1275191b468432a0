//! Camera access: enumeration, the snapshot camera handle, and its
//! device backends.
//!
//! - Device enumeration via [`list_devices`]
//! - The [`Camera`] capabilities, implemented by [`UsbCamera`]
//! - Device layer via [`FrameSource`]: [`NokhwaSource`] for real hardware,
//!   [`PatternSource`] for dry runs

mod device;
mod frame_utils;
mod nokhwa_source;
mod source;
mod still;
mod types;
mod usb;

pub use device::{ensure_listed, list_devices};
pub use nokhwa_source::NokhwaSource;
pub use source::{FrameSource, PatternSource};
pub use still::{CaptureError, CaptureRequest, DEFAULT_JPEG_QUALITY};
pub use types::{
    CameraError, CameraInfo, CameraSettings, Frame, FrameFormat, Resolution, StreamInfo,
    FPS_RANGE, MAX_RESOLUTION,
};
pub use usb::{Camera, UsbCamera};
