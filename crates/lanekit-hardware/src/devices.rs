//! Enum wrapper for device service dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) is not object-safe,
//! so `Box<dyn DeviceService>` is not available. This enum provides
//! concrete type dispatch at compile time instead: each variant is one
//! device family, and every trait method matches on the variant.
//!
//! # Examples
//!
//! ```
//! use lanekit_hardware::devices::AnyDeviceService;
//! use lanekit_hardware::mock::MockScanner;
//!
//! let (scanner, _handle) = MockScanner::new();
//! let device = AnyDeviceService::Scanner(scanner);
//! // Usable wherever a DeviceService is expected.
//! ```

use crate::mock::{MockRfid, MockScale, MockScanner};
use crate::traits::{DeviceInfo, DeviceService};
use lanekit_core::{DeviceEvent, DirectIoReply, Result};
use std::time::Duration;
use tokio::sync::mpsc;

/// Enum wrapper dispatching to a concrete device service.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDeviceService {
    /// Mock barcode scanner.
    Scanner(MockScanner),

    /// Mock weighing scale.
    Scale(MockScale),

    /// Mock RFID reader.
    Rfid(MockRfid),
    // Planned variants once real transports land behind the
    // hardware-usb / hardware-serial / hardware-hid features:
    // - UsbScanner(UsbScanner)
    // - SerialScale(SerialScale)
}

impl DeviceService for AnyDeviceService {
    async fn attach(&mut self) -> Result<()> {
        match self {
            Self::Scanner(device) => device.attach().await,
            Self::Scale(device) => device.attach().await,
            Self::Rfid(device) => device.attach().await,
        }
    }

    fn detach(&mut self) {
        match self {
            Self::Scanner(device) => device.detach(),
            Self::Scale(device) => device.detach(),
            Self::Rfid(device) => device.detach(),
        }
    }

    async fn claim(&mut self, timeout: Duration) -> Result<()> {
        match self {
            Self::Scanner(device) => device.claim(timeout).await,
            Self::Scale(device) => device.claim(timeout).await,
            Self::Rfid(device) => device.claim(timeout).await,
        }
    }

    fn release(&mut self) -> Result<()> {
        match self {
            Self::Scanner(device) => device.release(),
            Self::Scale(device) => device.release(),
            Self::Rfid(device) => device.release(),
        }
    }

    async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        match self {
            Self::Scanner(device) => device.set_enabled(enabled).await,
            Self::Scale(device) => device.set_enabled(enabled).await,
            Self::Rfid(device) => device.set_enabled(enabled).await,
        }
    }

    async fn direct_io(&mut self, opcode: u32, input: &[u8]) -> Result<DirectIoReply> {
        match self {
            Self::Scanner(device) => device.direct_io(opcode, input).await,
            Self::Scale(device) => device.direct_io(opcode, input).await,
            Self::Rfid(device) => device.direct_io(opcode, input).await,
        }
    }

    fn take_events(&mut self) -> Result<mpsc::Receiver<DeviceEvent>> {
        match self {
            Self::Scanner(device) => device.take_events(),
            Self::Scale(device) => device.take_events(),
            Self::Rfid(device) => device.take_events(),
        }
    }

    fn is_claimed(&self) -> bool {
        match self {
            Self::Scanner(device) => device.is_claimed(),
            Self::Scale(device) => device.is_claimed(),
            Self::Rfid(device) => device.is_claimed(),
        }
    }

    fn info(&self) -> DeviceInfo {
        match self {
            Self::Scanner(device) => device.info(),
            Self::Scale(device) => device.info(),
            Self::Rfid(device) => device.info(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_device_scanner_dispatch() {
        let (scanner, _handle) = MockScanner::new();
        let mut device = AnyDeviceService::Scanner(scanner);

        device.attach().await.unwrap();
        assert!(!device.is_claimed());
        assert_eq!(device.info().name, "Mock Scanner");
    }

    #[tokio::test]
    async fn test_any_device_scale_dispatch() {
        let (scale, _handle) = MockScale::new();
        let mut device = AnyDeviceService::Scale(scale);

        device.attach().await.unwrap();
        device.claim(Duration::from_millis(50)).await.unwrap();
        device.set_enabled(true).await.unwrap();
        device.release().unwrap();
    }

    #[tokio::test]
    async fn test_any_device_rfid_dispatch() {
        let (reader, _handle) = MockRfid::new();
        let mut device = AnyDeviceService::Rfid(reader);

        device.attach().await.unwrap();
        let info = device.info();
        assert_eq!(info.model, "Mock RFID Reader");
    }
}
