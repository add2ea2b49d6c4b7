//! Core types for the lanekit point-of-sale peripheral toolkit.
//!
//! This crate defines the vocabulary shared by every other lanekit crate:
//! the error taxonomy ([`PosError`]), the fixed status and error code space
//! with its total code-to-label translation tables ([`codes`]), the event
//! records a session delivers ([`event`]), and the validated profile types
//! resolved by the configuration store ([`types`]).
//!
//! # Code Translation
//!
//! Every defined status or error code maps to a unique non-empty label;
//! raw values outside the defined space map to an explicit unknown label
//! instead of failing:
//!
//! ```
//! use lanekit_core::codes::ErrorCode;
//!
//! assert_eq!(ErrorCode::Timeout.label(), "E_TIMEOUT");
//! assert_eq!(ErrorCode::from_raw(0xFFFF).label(), "UNKNOWN");
//! ```
//!
//! # Events
//!
//! A session delivers three kinds of notifications, modeled by
//! [`event::DeviceEvent`]: data available, status changed, and error
//! occurred. Events are immutable; subscribers receive owned copies.

pub mod codes;
pub mod constants;
pub mod error;
pub mod event;
pub mod types;

// Re-export commonly used types for convenience
pub use codes::{
    ErrorCode, FirmwareComparison, FirmwareOutcome, StatusCode, Symbology, TagProtocol, WeightUnit,
};
pub use error::{PosError, Result};
pub use event::{DeviceEvent, DirectIoReply, ErrorReport, EventKind, ScanData};
pub use types::{DeviceBinding, DeviceKind, ProfileName};
