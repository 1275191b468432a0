//! Camera device enumeration.

use nokhwa::query;
use nokhwa::utils::ApiBackend;

use super::types::{CameraError, CameraInfo};

/// List all available camera devices on the system.
///
/// Returns a vector of `CameraInfo` structs, or an error if querying fails.
/// If no cameras are found, returns an empty vector (not an error).
/// Devices whose index is not numeric (e.g. IP cameras) are skipped since
/// they cannot be selected by index.
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    let devices = query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;

    let mut cameras: Vec<CameraInfo> = devices
        .into_iter()
        .filter_map(|d| {
            let index = d.index().as_index().ok()?;
            Some(CameraInfo {
                index,
                name: d.human_name(),
                description: d.description().to_string(),
            })
        })
        .collect();
    cameras.sort_by_key(|c| c.index);
    log::debug!("Enumerated {} camera(s)", cameras.len());

    Ok(cameras)
}

/// Check that `index` is one of the enumerated devices.
pub fn ensure_listed(devices: &[CameraInfo], index: u32) -> Result<&CameraInfo, CameraError> {
    devices
        .iter()
        .find(|d| d.index == index)
        .ok_or_else(|| CameraError::DeviceNotFound {
            requested: index,
            available: devices.iter().map(|d| d.index).collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<CameraInfo> {
        vec![
            CameraInfo {
                index: 0,
                name: "Integrated".to_string(),
                description: "built-in".to_string(),
            },
            CameraInfo {
                index: 2,
                name: "USB Camera".to_string(),
                description: "usb".to_string(),
            },
        ]
    }

    #[test]
    fn test_list_devices_does_not_error() {
        // Should not error even if no cameras are present
        // (returns empty list instead)
        let result = list_devices();
        assert!(result.is_ok());
    }

    #[test]
    fn test_ensure_listed_finds_device() {
        let devices = devices();
        let found = ensure_listed(&devices, 2).unwrap();
        assert_eq!(found.name, "USB Camera");
    }

    #[test]
    fn test_ensure_listed_rejects_gap_index() {
        let devices = devices();
        match ensure_listed(&devices, 1) {
            Err(CameraError::DeviceNotFound {
                requested,
                available,
            }) => {
                assert_eq!(requested, 1);
                assert_eq!(available, vec![0, 2]);
            }
            other => panic!("Expected DeviceNotFound, got {:?}", other),
        }
    }
}
