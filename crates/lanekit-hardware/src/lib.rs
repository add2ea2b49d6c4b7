//! Hardware device abstraction layer for the lanekit peripheral toolkit.
//!
//! This crate defines the [`DeviceService`] trait, the seam between the
//! session controller and the transport that actually talks to a physical
//! peripheral, together with mock implementations for development and
//! testing without hardware.
//!
//! # Design
//!
//! - **Async-first**: all I/O operations are native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: RPITIT traits are not object-safe, so dynamic
//!   dispatch goes through [`AnyDeviceService`], one variant per device
//!   family.
//! - **Mock-with-handle**: every mock comes as a `(device, handle)` pair;
//!   the handle plays the physical device, injecting scans, weights,
//!   tags, statuses, and errors.
//! - **Device-level claim arbitration**: each physical mock owns a
//!   single-permit claim token, so exclusive use and claim contention
//!   behave like the real thing.
//!
//! # Examples
//!
//! ```
//! use lanekit_hardware::mock::MockScanner;
//! use lanekit_hardware::traits::DeviceService;
//! use lanekit_core::Symbology;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> lanekit_core::Result<()> {
//!     let (mut scanner, mut handle) = MockScanner::new();
//!
//!     scanner.attach().await?;
//!     scanner.claim(Duration::from_millis(1000)).await?;
//!     scanner.set_enabled(true).await?;
//!
//!     let mut events = scanner.take_events()?;
//!     handle.push_scan(vec![0x41, 0x42], vec![0x41, 0x42], Symbology::Code128).await?;
//!     let event = events.recv().await;
//!     println!("{:?}", event);
//!     Ok(())
//! }
//! ```

pub mod devices;
pub mod mock;
pub mod traits;

// Re-export commonly used types for convenience
pub use devices::AnyDeviceService;
pub use mock::{
    AnyMockHandle, MockRfid, MockRfidHandle, MockScale, MockScaleHandle, MockScanner,
    MockScannerHandle, MockTag,
};
pub use traits::{DeviceInfo, DeviceService};
