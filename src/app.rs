//! The snapshot run: settings resolution and the capture flow.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::camera::{
    self, Camera, CameraError, CameraInfo, CameraSettings, CaptureError, CaptureRequest,
    FrameSource, NokhwaSource, PatternSource, Resolution, UsbCamera, DEFAULT_JPEG_QUALITY,
    FPS_RANGE,
};
use crate::cli::Args;
use crate::config::{Config, ConfigError};
use crate::interrupt;
use crate::preview::{CharSet, Display, PreviewError, PreviewOptions, PreviewOutcome, DEFAULT_TIMEOUT};
use crate::selection::{self, Choice, SelectionError};
use crate::storage::{self, SessionStamp, StorageError};

pub const DEFAULT_CASE_NAME: &str = "test";
pub const DEFAULT_COUNT: &str = "1";
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error("Invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("Interrupted")]
    Interrupted,
}

/// Everything a run needs, merged from CLI flags, the config file and the
/// built-in defaults (in that order of precedence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Fixed device index; `None` means choose at run time
    pub device: Option<u32>,
    /// Take the first device instead of prompting
    pub assume_yes: bool,
    pub resolution: Resolution,
    pub fps: u32,
    pub output_root: PathBuf,
    pub case_name: String,
    pub count: String,
    pub watermark: bool,
    pub jpeg_quality: u8,
    pub warmup: Duration,
    /// `None` skips the live preview
    pub preview: Option<PreviewOptions>,
    pub synthetic: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: None,
            assume_yes: false,
            resolution: Resolution::HIGH,
            fps: 15,
            output_root: PathBuf::from(storage::DEFAULT_ROOT),
            case_name: DEFAULT_CASE_NAME.to_string(),
            count: DEFAULT_COUNT.to_string(),
            watermark: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            warmup: DEFAULT_WARMUP,
            preview: Some(PreviewOptions::default()),
            synthetic: false,
        }
    }
}

impl Settings {
    /// Merge `args` over `config` over the defaults.
    pub fn resolve(args: &Args, config: &Config) -> Result<Self, AppError> {
        let defaults = Settings::default();

        let resolution = match (&args.resolution, &config.camera.resolution) {
            (Some(r), _) => *r,
            (None, Some(text)) => parse_resolution(text)?,
            (None, None) => defaults.resolution,
        };

        let fps = args.fps.or(config.camera.fps).unwrap_or(defaults.fps);
        if !FPS_RANGE.contains(&fps) {
            return Err(AppError::InvalidSetting {
                key: "camera.fps",
                reason: format!(
                    "{} is outside {}-{}",
                    fps,
                    FPS_RANGE.start(),
                    FPS_RANGE.end()
                ),
            });
        }

        let jpeg_quality = config.capture.jpeg_quality.unwrap_or(defaults.jpeg_quality);
        if !(1..=100).contains(&jpeg_quality) {
            return Err(AppError::InvalidSetting {
                key: "capture.jpeg_quality",
                reason: format!("{} is outside 1-100", jpeg_quality),
            });
        }

        let case_name = args
            .case_name
            .clone()
            .or_else(|| config.capture.case_name.clone())
            .unwrap_or(defaults.case_name);
        storage::check_name_part(&case_name).map_err(|reason| AppError::InvalidSetting {
            key: "capture.case_name",
            reason,
        })?;

        let count = args
            .count
            .clone()
            .or_else(|| config.capture.count.as_ref().map(|c| c.to_string()))
            .unwrap_or(defaults.count);
        storage::check_name_part(&count).map_err(|reason| AppError::InvalidSetting {
            key: "capture.count",
            reason,
        })?;

        let preview_enabled = !args.no_preview && config.preview.enabled.unwrap_or(true);
        let preview = if preview_enabled {
            let charset = match (args.charset, &config.preview.charset) {
                (Some(c), _) => c.into(),
                (None, Some(name)) => {
                    CharSet::from_name(name).ok_or_else(|| AppError::InvalidSetting {
                        key: "preview.charset",
                        reason: format!("unknown character set '{}'", name),
                    })?
                }
                (None, None) => CharSet::default(),
            };
            let timeout_secs = args.timeout.or(config.preview.timeout_secs);
            let timeout = match timeout_secs {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => Some(DEFAULT_TIMEOUT),
            };
            Some(PreviewOptions {
                timeout,
                charset,
                invert: args.invert || config.preview.invert.unwrap_or(false),
            })
        } else {
            None
        };

        Ok(Self {
            device: args.camera.or(config.camera.device),
            assume_yes: args.yes,
            resolution,
            fps,
            output_root: args
                .output
                .clone()
                .or_else(|| config.capture.output_dir.clone())
                .unwrap_or(defaults.output_root),
            case_name,
            count,
            watermark: !args.no_watermark && config.capture.watermark.unwrap_or(true),
            jpeg_quality,
            warmup: config
                .capture
                .warmup_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.warmup),
            preview,
            synthetic: args.synthetic,
        })
    }

    /// How the device gets picked. Without a terminal to ask on, the first
    /// device is taken.
    pub fn choice(&self, interactive: bool) -> Choice {
        match self.device {
            Some(index) => Choice::Index(index),
            None if self.assume_yes || !interactive => Choice::First,
            None => Choice::Prompt,
        }
    }
}

fn parse_resolution(text: &str) -> Result<Resolution, AppError> {
    text.parse().map_err(|reason| AppError::InvalidSetting {
        key: "camera.resolution",
        reason,
    })
}

/// Where devices and frames come from.
pub trait Backend {
    fn devices(&self) -> Result<Vec<CameraInfo>, CameraError>;
    fn source(&self) -> Box<dyn FrameSource>;
}

/// Real cameras through nokhwa.
#[derive(Debug, Default)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    fn devices(&self) -> Result<Vec<CameraInfo>, CameraError> {
        camera::list_devices()
    }

    fn source(&self) -> Box<dyn FrameSource> {
        Box::new(NokhwaSource::new())
    }
}

/// A single generated test-pattern device.
#[derive(Debug, Default)]
pub struct SyntheticBackend;

impl Backend for SyntheticBackend {
    fn devices(&self) -> Result<Vec<CameraInfo>, CameraError> {
        Ok(vec![PatternSource::info()])
    }

    fn source(&self) -> Box<dyn FrameSource> {
        Box::new(PatternSource::new())
    }
}

/// Pick the synthetic or the native backend.
pub fn backend_for(synthetic: bool) -> Box<dyn Backend> {
    if synthetic {
        log::info!("Using synthetic test pattern instead of a camera");
        Box::new(SyntheticBackend)
    } else {
        Box::new(NativeBackend)
    }
}

/// Run one snapshot session and return the path of the saved image.
///
/// The camera, once opened, is released before this returns, whatever the
/// outcome.
pub fn run(
    settings: &Settings,
    backend: &dyn Backend,
    interactive: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<PathBuf, AppError> {
    session(settings, backend, interactive, input, output, None)
}

/// [`run`] with the live preview drawn on `display`.
pub fn run_with_display(
    settings: &Settings,
    backend: &dyn Backend,
    interactive: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    display: &mut dyn Display,
) -> Result<PathBuf, AppError> {
    session(settings, backend, interactive, input, output, Some(display))
}

fn session(
    settings: &Settings,
    backend: &dyn Backend,
    interactive: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
    display: Option<&mut dyn Display>,
) -> Result<PathBuf, AppError> {
    let root = storage::resolve_root(&settings.output_root)?;
    let save_path = storage::create_output_dir(&root, &SessionStamp::now())?;
    log::debug!("Snapshots go to {}", save_path.display());

    let devices = backend.devices()?;
    let index = selection::select_camera(&devices, settings.choice(interactive), input, output)?;
    if interrupt::requested() {
        return Err(AppError::Interrupted);
    }

    let camera_settings = CameraSettings {
        device_index: index,
        resolution: settings.resolution,
        fps: settings.fps,
    };
    let mut camera = UsbCamera::new(camera_settings, backend.source())?
        .with_jpeg_quality(settings.jpeg_quality);

    let result = shoot(&mut camera, settings, &save_path, display);
    camera.release();
    result
}

fn shoot(
    camera: &mut UsbCamera,
    settings: &Settings,
    save_path: &Path,
    display: Option<&mut dyn Display>,
) -> Result<PathBuf, AppError> {
    camera.open()?;

    log::debug!("Warming up for {:?}", settings.warmup);
    std::thread::sleep(settings.warmup);
    if interrupt::requested() {
        return Err(AppError::Interrupted);
    }

    if let Some(options) = &settings.preview {
        let outcome = match display {
            Some(display) => camera.show_live_camera_on(display, options)?,
            None => camera.show_live_camera(options)?,
        };
        if outcome == PreviewOutcome::Interrupted {
            return Err(AppError::Interrupted);
        }
    } else {
        log::info!("Live preview disabled");
    }

    let request = CaptureRequest {
        save_path: save_path.to_path_buf(),
        test_case_name: settings.case_name.clone(),
        count: settings.count.clone(),
        pic_mark: settings.watermark,
    };
    Ok(camera.take_picture(&request)?)
}
