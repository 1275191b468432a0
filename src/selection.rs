//! Choosing which camera to use.

use std::io::{self, BufRead, Write};

use crate::camera::{ensure_listed, CameraError, CameraInfo};

const RULE_WIDTH: usize = 50;

/// How the device index is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Index given up front (`--camera` or config)
    Index(u32),
    /// First listed device, no questions asked
    First,
    /// Ask on the terminal
    Prompt,
}

#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("Invalid camera selection '{0}': expected a device index")]
    InvalidInput(String),

    #[error("Failed to read camera selection: {0}")]
    Io(#[from] io::Error),
}

/// Largest listed index, used for the `[0-N]` range hint.
fn upper_index(devices: &[CameraInfo]) -> u32 {
    devices.iter().map(|d| d.index).max().unwrap_or(0)
}

/// Show the available cameras and return the chosen device index.
///
/// The returned index is always one of `devices`; anything else fails with
/// `CameraError::DeviceNotFound` before a camera is touched.
pub fn select_camera(
    devices: &[CameraInfo],
    choice: Choice,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<u32, SelectionError> {
    let first = devices.first().ok_or(CameraError::NoDevices)?;
    let upper = upper_index(devices);
    let rule = "=".repeat(RULE_WIDTH);

    log::info!(
        "Available cameras, please choose one (range: [0-{}])",
        upper
    );
    log::info!("{}", rule);
    for device in devices {
        log::info!("{} : {}", device.index, device.name);
    }
    log::info!("{}", rule);

    let requested = match choice {
        Choice::Index(index) => index,
        Choice::First => first.index,
        Choice::Prompt => prompt(upper, input, output)?,
    };

    let device = ensure_listed(devices, requested)?;
    log::info!("Your selection is: [ {}: {} ]", device.index, device.name);
    Ok(device.index)
}

fn prompt(upper: u32, input: &mut dyn BufRead, output: &mut dyn Write) -> Result<u32, SelectionError> {
    write!(output, "Please select the camera index from [0-{}]: ", upper)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SelectionError::InvalidInput(String::new()));
    }
    let answer = line.trim();
    answer
        .parse()
        .map_err(|_| SelectionError::InvalidInput(answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn devices() -> Vec<CameraInfo> {
        vec![
            CameraInfo {
                index: 0,
                name: "Integrated Webcam".to_string(),
                description: "uvc".to_string(),
            },
            CameraInfo {
                index: 1,
                name: "USB Camera".to_string(),
                description: "uvc".to_string(),
            },
        ]
    }

    fn select(devices: &[CameraInfo], choice: Choice, typed: &str) -> (Result<u32, SelectionError>, String) {
        let mut input = Cursor::new(typed.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = select_camera(devices, choice, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_empty_list_is_no_devices() {
        let (result, _) = select(&[], Choice::First, "");
        assert!(matches!(
            result,
            Err(SelectionError::Camera(CameraError::NoDevices))
        ));
    }

    #[test]
    fn test_explicit_index() {
        let (result, output) = select(&devices(), Choice::Index(1), "");
        assert_eq!(result.unwrap(), 1);
        assert!(output.is_empty());
    }

    #[test]
    fn test_first_device() {
        let (result, _) = select(&devices(), Choice::First, "");
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_out_of_range_index() {
        let (result, _) = select(&devices(), Choice::Index(5), "");
        match result {
            Err(SelectionError::Camera(CameraError::DeviceNotFound {
                requested,
                available,
            })) => {
                assert_eq!(requested, 5);
                assert_eq!(available, vec![0, 1]);
            }
            other => panic!("expected DeviceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_prompt_reads_index() {
        let (result, output) = select(&devices(), Choice::Prompt, " 1 \n");
        assert_eq!(result.unwrap(), 1);
        assert_eq!(output, "Please select the camera index from [0-1]: ");
    }

    #[test]
    fn test_prompt_rejects_garbage() {
        let (result, _) = select(&devices(), Choice::Prompt, "front\n");
        match result {
            Err(SelectionError::InvalidInput(text)) => assert_eq!(text, "front"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_prompt_eof() {
        let (result, _) = select(&devices(), Choice::Prompt, "");
        assert!(matches!(result, Err(SelectionError::InvalidInput(_))));
    }

    #[test]
    fn test_prompt_unlisted_index() {
        let (result, _) = select(&devices(), Choice::Prompt, "7\n");
        assert!(matches!(
            result,
            Err(SelectionError::Camera(CameraError::DeviceNotFound { .. }))
        ));
    }
}
