//! Device service trait definition.
//!
//! A [`DeviceService`] is the seam between the session controller and
//! whatever actually moves bytes to a physical peripheral: a vendor
//! runtime, a USB/serial transport, or (in this workspace) a programmable
//! mock. The session controller owns exactly one service for its lifetime
//! and drives it through this interface; everything device-specific stays
//! behind it.
//!
//! The trait uses native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT), so it is not object-safe; dynamic dispatch goes through the
//! enum wrapper in [`crate::devices`].

#![allow(async_fn_in_trait)]

use lanekit_core::{DeviceEvent, DirectIoReply, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

/// Generic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (usually the logical profile name).
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// One peripheral port as seen by the session controller.
///
/// A service instance represents a single port on a single physical
/// device. Several service instances may exist for the same physical
/// device (e.g. two processes opening the same scanner); exclusive use is
/// arbitrated by [`claim`](DeviceService::claim), which only one instance
/// can hold at a time.
///
/// # Contract
///
/// - [`attach`](DeviceService::attach) must succeed before any other
///   method; a port can be attached by at most one owner at a time.
/// - [`claim`](DeviceService::claim) blocks up to its timeout and fails
///   with a timeout error rather than blocking indefinitely.
/// - [`detach`](DeviceService::detach) is infallible and idempotent: it
///   drops the claim if held, disables the device, and closes the event
///   stream. It is the forced-teardown path and must work from any state.
/// - The event stream handed out by
///   [`take_events`](DeviceService::take_events) preserves the order in
///   which the device produced events.
///
/// # Examples
///
/// ```no_run
/// use lanekit_hardware::traits::DeviceService;
/// use lanekit_core::Result;
/// use std::time::Duration;
///
/// async fn bring_up<D: DeviceService>(device: &mut D) -> Result<()> {
///     device.attach().await?;
///     device.claim(Duration::from_millis(1000)).await?;
///     device.set_enabled(true).await?;
///     Ok(())
/// }
/// ```
pub trait DeviceService: Send + Sync {
    /// Attach to the device port. Must be the first operation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The port is already attached
    /// - The transport cannot reach the device
    async fn attach(&mut self) -> Result<()>;

    /// Detach from the device port, releasing everything this service
    /// holds. Infallible and idempotent; safe from any state.
    fn detach(&mut self);

    /// Exclusively acquire the physical device, blocking up to `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - This service already holds the claim
    /// - Another owner holds the claim and does not release it within
    ///   `timeout`
    async fn claim(&mut self, timeout: Duration) -> Result<()>;

    /// Relinquish the exclusive claim without detaching.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim is not held.
    fn release(&mut self) -> Result<()>;

    /// Toggle whether the device may produce events. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The port is not attached
    /// - Enabling is requested without holding the claim
    async fn set_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Forward a vendor extension opcode with an input buffer.
    ///
    /// The service does not interpret opcodes beyond routing them; unknown
    /// opcodes fail with an undefined-direct-I/O error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The port is not attached
    /// - The opcode is undefined for this device
    /// - The opcode requires the claim and it is not held
    async fn direct_io(&mut self, opcode: u32, input: &[u8]) -> Result<DirectIoReply>;

    /// Hand over the raw event stream. Can be taken exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream was already taken.
    fn take_events(&mut self) -> Result<mpsc::Receiver<DeviceEvent>>;

    /// Whether this service currently holds the exclusive claim.
    fn is_claimed(&self) -> bool;

    /// Get device information.
    fn info(&self) -> DeviceInfo;
}
