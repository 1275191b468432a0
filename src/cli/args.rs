//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::CharacterSet;
use crate::camera::{Resolution, FPS_RANGE};

/// Select a USB camera, preview it, and save one labeled snapshot
#[derive(Parser, Debug)]
#[command(name = "usb-snapshot")]
#[command(version, about = "Take a labeled snapshot from a USB camera", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index (from list-cameras); prompts when omitted
    #[arg(long)]
    pub camera: Option<u32>,

    /// Take the first camera without prompting
    #[arg(long, short)]
    pub yes: bool,

    /// Capture resolution, e.g. 1280x720
    #[arg(long, value_parser = parse_resolution)]
    pub resolution: Option<Resolution>,

    /// Requested frame rate
    #[arg(long, value_parser = parse_fps)]
    pub fps: Option<u32>,

    /// Test case name used in the file name and watermark
    #[arg(long = "case")]
    pub case_name: Option<String>,

    /// Picture count used in the file name and watermark
    #[arg(long)]
    pub count: Option<String>,

    /// Do not burn the camera id and label into the image
    #[arg(long)]
    pub no_watermark: bool,

    /// Root directory for snapshots (default: ./Pictures)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Seconds before the preview closes by itself (0 = wait for "q")
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip the live preview
    #[arg(long)]
    pub no_preview: bool,

    /// ASCII character set for the preview
    #[arg(long)]
    pub charset: Option<CharacterSet>,

    /// Invert preview brightness (for light terminals)
    #[arg(long)]
    pub invert: bool,

    /// Use a generated test pattern instead of real hardware
    #[arg(long)]
    pub synthetic: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

fn parse_resolution(s: &str) -> Result<Resolution, String> {
    s.parse()
}

fn parse_fps(s: &str) -> Result<u32, String> {
    let fps: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a frame rate", s))?;
    if !FPS_RANGE.contains(&fps) {
        return Err(format!(
            "frame rate must be between {} and {}",
            FPS_RANGE.start(),
            FPS_RANGE.end()
        ));
    }
    Ok(fps)
}
