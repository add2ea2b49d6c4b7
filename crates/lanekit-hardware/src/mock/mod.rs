//! Mock device implementations for testing and development.
//!
//! This module provides simulated device services that can be controlled
//! programmatically without requiring physical hardware, plus a factory
//! that builds the right mock from a resolved device binding.

pub mod rfid;
pub mod scale;
pub mod scanner;

// Re-export commonly used types
pub use rfid::{MockRfid, MockRfidHandle, MockTag};
pub use scale::{MockScale, MockScaleHandle};
pub use scanner::{MockScanner, MockScannerHandle};

use crate::devices::AnyDeviceService;
use lanekit_core::{DeviceBinding, DeviceKind, ProfileName, WeightUnit};

/// Handle for whichever mock device [`build`] produced.
#[derive(Debug)]
pub enum AnyMockHandle {
    /// Scanner simulation handle.
    Scanner(MockScannerHandle),
    /// Scale simulation handle.
    Scale(MockScaleHandle),
    /// RFID simulation handle.
    Rfid(MockRfidHandle),
}

impl AnyMockHandle {
    /// Scanner handle, if this is one.
    pub fn as_scanner(&mut self) -> Option<&mut MockScannerHandle> {
        match self {
            Self::Scanner(handle) => Some(handle),
            _ => None,
        }
    }

    /// Scale handle, if this is one.
    pub fn as_scale(&mut self) -> Option<&mut MockScaleHandle> {
        match self {
            Self::Scale(handle) => Some(handle),
            _ => None,
        }
    }

    /// RFID handle, if this is one.
    pub fn as_rfid(&mut self) -> Option<&mut MockRfidHandle> {
        match self {
            Self::Rfid(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Default scale capacity used when the binding does not set one (15 kg).
const DEFAULT_SCALE_CAPACITY_CG: i32 = 1_500_000;

/// Build a mock device service for a resolved profile binding.
///
/// The device is named after the profile so diagnostics and claim errors
/// identify the logical device the operator configured.
///
/// # Examples
///
/// ```
/// use lanekit_core::{DeviceBinding, DeviceKind, ProfileName};
/// use lanekit_hardware::mock;
///
/// let name = ProfileName::new("LK-Gryphon-4500-USB").unwrap();
/// let binding = DeviceBinding::new(DeviceKind::Scanner).with_model("Gryphon GD4500");
///
/// let (device, handle) = mock::build(&name, &binding);
/// ```
pub fn build(name: &ProfileName, binding: &DeviceBinding) -> (AnyDeviceService, AnyMockHandle) {
    let model = binding
        .model
        .clone()
        .unwrap_or_else(|| binding.kind.to_string());

    match binding.kind {
        DeviceKind::Scanner => {
            let (device, handle) =
                MockScanner::with_name_and_model(name.as_str().to_string(), model);
            (
                AnyDeviceService::Scanner(device),
                AnyMockHandle::Scanner(handle),
            )
        }
        DeviceKind::Scale => {
            let (device, handle) = MockScale::with_config(
                name.as_str().to_string(),
                model,
                binding.unit.unwrap_or(WeightUnit::Pound),
                binding.capacity_cg.unwrap_or(DEFAULT_SCALE_CAPACITY_CG),
            );
            (AnyDeviceService::Scale(device), AnyMockHandle::Scale(handle))
        }
        DeviceKind::Rfid => {
            let (device, handle) = MockRfid::with_name(name.as_str().to_string());
            (AnyDeviceService::Rfid(device), AnyMockHandle::Rfid(handle))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::DeviceService;

    #[test]
    fn test_build_scanner_from_binding() {
        let name = ProfileName::new("LK-Gryphon-4500-USB").unwrap();
        let binding = DeviceBinding::new(DeviceKind::Scanner).with_model("Gryphon GD4500");

        let (device, mut handle) = build(&name, &binding);
        assert_eq!(device.info().name, "LK-Gryphon-4500-USB");
        assert_eq!(device.info().model, "Gryphon GD4500");
        assert!(handle.as_scanner().is_some());
        assert!(handle.as_scale().is_none());
    }

    #[test]
    fn test_build_scale_defaults() {
        let name = ProfileName::new("LK-Scale").unwrap();
        let binding = DeviceBinding::new(DeviceKind::Scale);

        let (device, mut handle) = build(&name, &binding);
        assert_eq!(device.info().model, "Scale");
        assert!(handle.as_scale().is_some());
    }

    #[test]
    fn test_build_rfid_from_binding() {
        let name = ProfileName::new("LK-RFID-DK001").unwrap();
        let binding = DeviceBinding::new(DeviceKind::Rfid);

        let (device, mut handle) = build(&name, &binding);
        assert_eq!(device.info().name, "LK-RFID-DK001");
        assert!(handle.as_rfid().is_some());
    }
}
