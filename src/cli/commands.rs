//! Subcommand handlers for list-cameras and config actions.

use super::args::{Args, ConfigAction};
use crate::app::{AppError, Backend, Settings};
use crate::camera::CameraError;
use crate::config::{self, Config};

/// List available cameras and print them to stdout.
pub fn list_cameras(backend: &dyn Backend) -> Result<(), CameraError> {
    let devices = backend.devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
        println!("On Linux, check that your user can read /dev/video*.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Use --camera <index> to select a camera.");
    }
    Ok(())
}

/// Handle config subcommand actions.
pub fn handle_config_action(action: ConfigAction, args: &Args) -> Result<(), AppError> {
    let config_path = args.config.clone().unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            let config = Config::load(args.config.as_deref())?;
            let settings = Settings::resolve(args, &config)?;
            for line in describe(&settings) {
                println!("{}", line);
            }
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
        }
        ConfigAction::Init => {
            config::init_file(&config_path)?;
            println!("Created config file: {}", config_path.display());
        }
    }
    Ok(())
}

/// Human-readable summary of resolved settings.
pub fn describe(settings: &Settings) -> Vec<String> {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let camera = match settings.device {
        Some(index) => index.to_string(),
        None if settings.assume_yes => "first available".to_string(),
        None => "ask".to_string(),
    };
    let preview = match &settings.preview {
        None => "off".to_string(),
        Some(options) => {
            let timeout = options
                .timeout
                .map(|t| format!("{}s", t.as_secs()))
                .unwrap_or_else(|| "none".to_string());
            format!(
                "{} charset, timeout {}, invert {}",
                options.charset.name(),
                timeout,
                yes_no(options.invert)
            )
        }
    };

    vec![
        "Current configuration:".to_string(),
        format!("  Camera: {}", camera),
        format!("  Resolution: {}", settings.resolution),
        format!("  Frame rate: {}fps", settings.fps),
        format!("  Output: {}", settings.output_root.display()),
        format!("  Case name: {}", settings.case_name),
        format!("  Count: {}", settings.count),
        format!("  Watermark: {}", yes_no(settings.watermark)),
        format!("  JPEG quality: {}", settings.jpeg_quality),
        format!("  Warm-up: {}ms", settings.warmup.as_millis()),
        format!("  Preview: {}", preview),
    ]
}
