//! Configuration file handling for usb-snapshot.
//!
//! Loads configuration from `<config dir>/usb-snapshot/config.toml` or a
//! custom path. Every field is optional; anything left out falls back to
//! the command line or the built-in defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure for usb-snapshot.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct CameraConfig {
    /// Device index; prompt when absent
    pub device: Option<u32>,
    /// `WIDTHxHEIGHT`
    pub resolution: Option<String>,
    pub fps: Option<u32>,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct PreviewConfig {
    pub enabled: Option<bool>,
    /// Seconds before the preview closes by itself; 0 disables the timeout
    pub timeout_secs: Option<u64>,
    pub charset: Option<String>,
    pub invert: Option<bool>,
}

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct CaptureConfig {
    pub output_dir: Option<PathBuf>,
    pub case_name: Option<String>,
    pub count: Option<CountValue>,
    pub watermark: Option<bool>,
    pub jpeg_quality: Option<u8>,
    pub warmup_ms: Option<u64>,
}

/// Picture count, accepted as either `count = 1` or `count = "1"`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CountValue {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for CountValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountValue::Number(n) => write!(f, "{}", n),
            CountValue::Text(s) => f.write_str(s),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Failed to write config file '{}': {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Config {
    /// Load configuration.
    ///
    /// With `Some(path)` the file must exist. With `None` the default path
    /// is tried and a missing file yields the default config. A file that
    /// exists but cannot be read or parsed is always an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::load_from(path)
            }
            None => {
                let path = default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    log::debug!("No config file at {}, using defaults", path.display());
                    Ok(Config::default())
                }
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("usb-snapshot").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/usb-snapshot/config.toml")
        })
}

/// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories.
///
/// An existing file is never overwritten.
pub fn init_file(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    let write_err = |e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(write_err)
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# usb-snapshot configuration

[camera]
# Camera device index (omit to choose interactively)
# device = 0
# Capture resolution
resolution = "1280x720"
# Requested frame rate
fps = 15

[preview]
# Show the live preview before capturing
enabled = true
# Seconds before the preview closes by itself (0 = wait for "q")
timeout_secs = 60
# Character set: standard, blocks, minimal
charset = "standard"
# Invert brightness (for light themes)
invert = false

[capture]
# Snapshots go to <output_dir>/<YYYYmmdd_HHMMSS>/
output_dir = "Pictures"
# File names are <case_name>_<YYYYmmdd_HHMMSS>_<count>.jpg
case_name = "test"
count = "1"
# Burn camera id and file label into the image
watermark = true
jpeg_quality = 95
# Pause after opening the camera before the preview starts
warmup_ms = 1000
"#;
