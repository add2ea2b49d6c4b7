//! Typed views over the raw status and error code space.
//!
//! Large per-program switch statements translating codes to strings are
//! replaced here by one static mapping per enum, built into the binary and
//! shared by every consumer. Translation is total: every defined code has a
//! unique non-empty label, and raw values outside the defined space map to
//! an explicit unknown variant instead of failing.
//!
//! # Examples
//!
//! ```
//! use lanekit_core::codes::{ErrorCode, StatusCode};
//!
//! assert_eq!(ErrorCode::from_raw(112), ErrorCode::Timeout);
//! assert_eq!(ErrorCode::Timeout.label(), "E_TIMEOUT");
//! assert_eq!(ErrorCode::from_raw(9999).label(), "UNKNOWN");
//!
//! let progress = StatusCode::from_raw(2142);
//! assert_eq!(progress.progress_percent(), Some(42));
//! ```

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code space surfaced through call failures and error events.
///
/// Covers both call/lifecycle failures (the `E_*` range) and device or data
/// errors (the `ERR_*` range). The controller never classifies these; it
/// forwards raw codes upward and this enum is how consumers decode them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ErrorCode {
    /// No error.
    Success,

    // Call / lifecycle failures.
    /// Session or service is closed.
    Closed,
    /// Device is claimed by another owner.
    Claimed,
    /// Claim required but not held.
    NotClaimed,
    /// No service available for the profile.
    NoService,
    /// Device is disabled.
    Disabled,
    /// Illegal operation for the current state.
    Illegal,
    /// No hardware attached.
    NoHardware,
    /// Device offline.
    Offline,
    /// Named entity does not exist.
    NoExist,
    /// Named entity already exists.
    Exists,
    /// Unspecified failure.
    Failure,
    /// Timed out.
    Timeout,
    /// Busy with another request.
    Busy,
    /// See extended code.
    Extended,
    /// Deprecated feature.
    Deprecated,
    /// Firmware image file unusable.
    FirmwareBadFile,

    // Device / data errors.
    /// Malformed command.
    Cmd,
    /// No weight available.
    NoWeight,
    /// Corrupt data from device.
    Data,
    /// Device read failed.
    Read,
    /// Display absent or failed.
    NoDisplay,
    /// Hardware fault.
    Hardware,
    /// Command rejected by device.
    CmdReject,
    /// Capacity exceeded.
    Capacity,
    /// Scale requires zeroing.
    RequiresZeroing,
    /// Device warming up.
    Warmup,
    /// Duplicate data suppressed.
    Duplicate,
    /// Device is flashing firmware.
    Flashing,
    /// Device-level busy.
    DeviceBusy,
    /// Check digit verification failed.
    CheckDigit,
    /// Direct I/O disallowed.
    DioNotAllowed,
    /// Direct I/O opcode undefined.
    DioUndefined,
    /// Device removed.
    DeviceRemoved,
    /// Scale at zero.
    ScaleAtZero,
    /// Scale under zero.
    ScaleUnderZero,

    /// Raw code outside the defined space.
    Unknown(u16),
}

impl ErrorCode {
    /// Decode a raw code. Total: unmapped values become [`ErrorCode::Unknown`].
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            SUCCESS => Self::Success,
            E_CLOSED => Self::Closed,
            E_CLAIMED => Self::Claimed,
            E_NOTCLAIMED => Self::NotClaimed,
            E_NOSERVICE => Self::NoService,
            E_DISABLED => Self::Disabled,
            E_ILLEGAL => Self::Illegal,
            E_NOHARDWARE => Self::NoHardware,
            E_OFFLINE => Self::Offline,
            E_NOEXIST => Self::NoExist,
            E_EXISTS => Self::Exists,
            E_FAILURE => Self::Failure,
            E_TIMEOUT => Self::Timeout,
            E_BUSY => Self::Busy,
            E_EXTENDED => Self::Extended,
            E_DEPRECATED => Self::Deprecated,
            E_FIRMWARE_BAD_FILE => Self::FirmwareBadFile,
            ERR_CMD => Self::Cmd,
            ERR_NO_WEIGHT => Self::NoWeight,
            ERR_DATA => Self::Data,
            ERR_READ => Self::Read,
            ERR_NO_DISPLAY => Self::NoDisplay,
            ERR_HARDWARE => Self::Hardware,
            ERR_CMD_REJECT => Self::CmdReject,
            ERR_CAPACITY => Self::Capacity,
            ERR_REQUIRES_ZEROING => Self::RequiresZeroing,
            ERR_WARMUP => Self::Warmup,
            ERR_DUPLICATE => Self::Duplicate,
            ERR_FLASHING => Self::Flashing,
            ERR_BUSY => Self::DeviceBusy,
            ERR_CHECKDIGIT => Self::CheckDigit,
            ERR_DIO_NOT_ALLOWED => Self::DioNotAllowed,
            ERR_DIO_UNDEFINED => Self::DioUndefined,
            ERR_DEVICE_REMOVED => Self::DeviceRemoved,
            ERR_SCALE_AT_ZERO => Self::ScaleAtZero,
            ERR_SCALE_UNDER_ZERO => Self::ScaleUnderZero,
            other => Self::Unknown(other),
        }
    }

    /// Encode back to the raw code value.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            Self::Success => SUCCESS,
            Self::Closed => E_CLOSED,
            Self::Claimed => E_CLAIMED,
            Self::NotClaimed => E_NOTCLAIMED,
            Self::NoService => E_NOSERVICE,
            Self::Disabled => E_DISABLED,
            Self::Illegal => E_ILLEGAL,
            Self::NoHardware => E_NOHARDWARE,
            Self::Offline => E_OFFLINE,
            Self::NoExist => E_NOEXIST,
            Self::Exists => E_EXISTS,
            Self::Failure => E_FAILURE,
            Self::Timeout => E_TIMEOUT,
            Self::Busy => E_BUSY,
            Self::Extended => E_EXTENDED,
            Self::Deprecated => E_DEPRECATED,
            Self::FirmwareBadFile => E_FIRMWARE_BAD_FILE,
            Self::Cmd => ERR_CMD,
            Self::NoWeight => ERR_NO_WEIGHT,
            Self::Data => ERR_DATA,
            Self::Read => ERR_READ,
            Self::NoDisplay => ERR_NO_DISPLAY,
            Self::Hardware => ERR_HARDWARE,
            Self::CmdReject => ERR_CMD_REJECT,
            Self::Capacity => ERR_CAPACITY,
            Self::RequiresZeroing => ERR_REQUIRES_ZEROING,
            Self::Warmup => ERR_WARMUP,
            Self::Duplicate => ERR_DUPLICATE,
            Self::Flashing => ERR_FLASHING,
            Self::DeviceBusy => ERR_BUSY,
            Self::CheckDigit => ERR_CHECKDIGIT,
            Self::DioNotAllowed => ERR_DIO_NOT_ALLOWED,
            Self::DioUndefined => ERR_DIO_UNDEFINED,
            Self::DeviceRemoved => ERR_DEVICE_REMOVED,
            Self::ScaleAtZero => ERR_SCALE_AT_ZERO,
            Self::ScaleUnderZero => ERR_SCALE_UNDER_ZERO,
            Self::Unknown(raw) => raw,
        }
    }

    /// Operator-facing label. Unique and non-empty for every defined code;
    /// unknown codes share the `"UNKNOWN"` label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Closed => "E_CLOSED",
            Self::Claimed => "E_CLAIMED",
            Self::NotClaimed => "E_NOTCLAIMED",
            Self::NoService => "E_NOSERVICE",
            Self::Disabled => "E_DISABLED",
            Self::Illegal => "E_ILLEGAL",
            Self::NoHardware => "E_NOHARDWARE",
            Self::Offline => "E_OFFLINE",
            Self::NoExist => "E_NOEXIST",
            Self::Exists => "E_EXISTS",
            Self::Failure => "E_FAILURE",
            Self::Timeout => "E_TIMEOUT",
            Self::Busy => "E_BUSY",
            Self::Extended => "E_EXTENDED",
            Self::Deprecated => "E_DEPRECATED",
            Self::FirmwareBadFile => "E_FIRMWARE_BAD_FILE",
            Self::Cmd => "ERR_CMD",
            Self::NoWeight => "ERR_NO_WEIGHT",
            Self::Data => "ERR_DATA",
            Self::Read => "ERR_READ",
            Self::NoDisplay => "ERR_NO_DISPLAY",
            Self::Hardware => "ERR_HARDWARE",
            Self::CmdReject => "ERR_CMD_REJECT",
            Self::Capacity => "ERR_CAPACITY",
            Self::RequiresZeroing => "ERR_REQUIRES_ZEROING",
            Self::Warmup => "ERR_WARMUP",
            Self::Duplicate => "ERR_DUPLICATE",
            Self::Flashing => "ERR_FLASHING",
            Self::DeviceBusy => "ERR_BUSY",
            Self::CheckDigit => "ERR_CHECKDIGIT",
            Self::DioNotAllowed => "ERR_DIO_NOT_ALLOWED",
            Self::DioUndefined => "ERR_DIO_UNDEFINED",
            Self::DeviceRemoved => "ERR_DEVICE_REMOVED",
            Self::ScaleAtZero => "ERR_SCALE_AT_ZERO",
            Self::ScaleUnderZero => "ERR_SCALE_UNDER_ZERO",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// All defined (non-unknown) codes, for table-totality checks.
    pub const DEFINED: [ErrorCode; 36] = [
        Self::Success,
        Self::Closed,
        Self::Claimed,
        Self::NotClaimed,
        Self::NoService,
        Self::Disabled,
        Self::Illegal,
        Self::NoHardware,
        Self::Offline,
        Self::NoExist,
        Self::Exists,
        Self::Failure,
        Self::Timeout,
        Self::Busy,
        Self::Extended,
        Self::Deprecated,
        Self::FirmwareBadFile,
        Self::Cmd,
        Self::NoWeight,
        Self::Data,
        Self::Read,
        Self::NoDisplay,
        Self::Hardware,
        Self::CmdReject,
        Self::Capacity,
        Self::RequiresZeroing,
        Self::Warmup,
        Self::Duplicate,
        Self::Flashing,
        Self::DeviceBusy,
        Self::CheckDigit,
        Self::DioNotAllowed,
        Self::DioUndefined,
        Self::DeviceRemoved,
        Self::ScaleAtZero,
        Self::ScaleUnderZero,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Asynchronous status code delivered through status events.
///
/// Covers power-state reporting, the firmware update sub-protocol, and
/// scale live-weight notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StatusCode {
    /// Power state unknown.
    PowerUnknown,
    /// Device online.
    PowerOnline,
    /// Device powered off.
    PowerOff,
    /// Device offline.
    PowerOffline,
    /// Device off and offline.
    PowerOffOffline,

    /// Firmware update progress, 0-99 percent.
    FirmwareProgress(u8),
    /// Firmware update completed successfully.
    FirmwareComplete,
    /// Update succeeded but the device was not restored; reopen required.
    FirmwareCompleteNotRestored,
    /// Update failed; device still operational.
    FirmwareFailedDeviceOk,
    /// Update failed; device unrecoverable in software.
    FirmwareFailedDeviceUnrecoverable,
    /// Update failed; device inoperative until a successful update.
    FirmwareFailedNeedsFirmware,
    /// Update failed; device state indeterminate.
    FirmwareFailedUnknown,

    /// Stable weight available.
    WeightStable,
    /// Weight reading unstable.
    WeightUnstable,
    /// Platter empty.
    WeightZero,
    /// Load exceeds capacity.
    WeightOverweight,
    /// Reading below zero.
    WeightUnderZero,
    /// Scale not ready.
    ScaleNotReady,

    /// Raw code outside the defined space.
    Unknown(u16),
}

impl StatusCode {
    /// Decode a raw status code. Total: unmapped values become
    /// [`StatusCode::Unknown`].
    pub fn from_raw(raw: u16) -> Self {
        if (SUE_UF_PROGRESS..SUE_UF_COMPLETE).contains(&raw) {
            return Self::FirmwareProgress((raw - SUE_UF_PROGRESS) as u8);
        }
        match raw {
            SUE_POWER_UNKNOWN => Self::PowerUnknown,
            SUE_POWER_ONLINE => Self::PowerOnline,
            SUE_POWER_OFF => Self::PowerOff,
            SUE_POWER_OFFLINE => Self::PowerOffline,
            SUE_POWER_OFF_OFFLINE => Self::PowerOffOffline,
            SUE_UF_COMPLETE => Self::FirmwareComplete,
            SUE_UF_COMPLETE_DEV_NOT_RESTORED => Self::FirmwareCompleteNotRestored,
            SUE_UF_FAILED_DEV_OK => Self::FirmwareFailedDeviceOk,
            SUE_UF_FAILED_DEV_UNRECOVERABLE => Self::FirmwareFailedDeviceUnrecoverable,
            SUE_UF_FAILED_DEV_NEEDS_FIRMWARE => Self::FirmwareFailedNeedsFirmware,
            SUE_UF_FAILED_DEV_UNKNOWN => Self::FirmwareFailedUnknown,
            SUE_WEIGHT_STABLE => Self::WeightStable,
            SUE_WEIGHT_UNSTABLE => Self::WeightUnstable,
            SUE_WEIGHT_ZERO => Self::WeightZero,
            SUE_WEIGHT_OVERWEIGHT => Self::WeightOverweight,
            SUE_WEIGHT_UNDER_ZERO => Self::WeightUnderZero,
            SUE_SCALE_NOT_READY => Self::ScaleNotReady,
            other => Self::Unknown(other),
        }
    }

    /// Encode back to the raw code value.
    ///
    /// Progress percentages are clamped to the 0-99 sub-range so the
    /// encoding can never collide with a terminal code.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            Self::PowerUnknown => SUE_POWER_UNKNOWN,
            Self::PowerOnline => SUE_POWER_ONLINE,
            Self::PowerOff => SUE_POWER_OFF,
            Self::PowerOffline => SUE_POWER_OFFLINE,
            Self::PowerOffOffline => SUE_POWER_OFF_OFFLINE,
            Self::FirmwareProgress(pct) => SUE_UF_PROGRESS + u16::from(pct.min(99)),
            Self::FirmwareComplete => SUE_UF_COMPLETE,
            Self::FirmwareCompleteNotRestored => SUE_UF_COMPLETE_DEV_NOT_RESTORED,
            Self::FirmwareFailedDeviceOk => SUE_UF_FAILED_DEV_OK,
            Self::FirmwareFailedDeviceUnrecoverable => SUE_UF_FAILED_DEV_UNRECOVERABLE,
            Self::FirmwareFailedNeedsFirmware => SUE_UF_FAILED_DEV_NEEDS_FIRMWARE,
            Self::FirmwareFailedUnknown => SUE_UF_FAILED_DEV_UNKNOWN,
            Self::WeightStable => SUE_WEIGHT_STABLE,
            Self::WeightUnstable => SUE_WEIGHT_UNSTABLE,
            Self::WeightZero => SUE_WEIGHT_ZERO,
            Self::WeightOverweight => SUE_WEIGHT_OVERWEIGHT,
            Self::WeightUnderZero => SUE_WEIGHT_UNDER_ZERO,
            Self::ScaleNotReady => SUE_SCALE_NOT_READY,
            Self::Unknown(raw) => raw,
        }
    }

    /// Operator-facing label. Progress codes share one label; the encoded
    /// percentage is available via [`StatusCode::progress_percent`].
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PowerUnknown => "SUE_POWER_UNKNOWN",
            Self::PowerOnline => "SUE_POWER_ONLINE",
            Self::PowerOff => "SUE_POWER_OFF",
            Self::PowerOffline => "SUE_POWER_OFFLINE",
            Self::PowerOffOffline => "SUE_POWER_OFF_OFFLINE",
            Self::FirmwareProgress(_) => "SUE_UF_PROGRESS",
            Self::FirmwareComplete => "SUE_UF_COMPLETE",
            Self::FirmwareCompleteNotRestored => "SUE_UF_COMPLETE_DEV_NOT_RESTORED",
            Self::FirmwareFailedDeviceOk => "SUE_UF_FAILED_DEV_OK",
            Self::FirmwareFailedDeviceUnrecoverable => "SUE_UF_FAILED_DEV_UNRECOVERABLE",
            Self::FirmwareFailedNeedsFirmware => "SUE_UF_FAILED_DEV_NEEDS_FIRMWARE",
            Self::FirmwareFailedUnknown => "SUE_UF_FAILED_DEV_UNKNOWN",
            Self::WeightStable => "SUE_WEIGHT_STABLE",
            Self::WeightUnstable => "SUE_WEIGHT_UNSTABLE",
            Self::WeightZero => "SUE_WEIGHT_ZERO",
            Self::WeightOverweight => "SUE_WEIGHT_OVERWEIGHT",
            Self::WeightUnderZero => "SUE_WEIGHT_UNDER_ZERO",
            Self::ScaleNotReady => "SUE_SCALE_NOT_READY",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// Percentage encoded in a firmware progress code, if this is one.
    #[must_use]
    pub fn progress_percent(self) -> Option<u8> {
        match self {
            Self::FirmwareProgress(pct) => Some(pct),
            _ => None,
        }
    }

    /// Terminal firmware outcome, if this code reports one.
    #[must_use]
    pub fn firmware_outcome(self) -> Option<FirmwareOutcome> {
        match self {
            Self::FirmwareComplete => Some(FirmwareOutcome::Complete),
            Self::FirmwareCompleteNotRestored => Some(FirmwareOutcome::CompleteDeviceNotRestored),
            Self::FirmwareFailedDeviceOk => Some(FirmwareOutcome::FailedDeviceOk),
            Self::FirmwareFailedDeviceUnrecoverable => {
                Some(FirmwareOutcome::FailedDeviceUnrecoverable)
            }
            Self::FirmwareFailedNeedsFirmware => Some(FirmwareOutcome::FailedNeedsFirmware),
            Self::FirmwareFailedUnknown => Some(FirmwareOutcome::FailedUnknown),
            _ => None,
        }
    }

    /// True for any code belonging to the firmware update sub-protocol.
    #[must_use]
    pub fn is_firmware(self) -> bool {
        matches!(self, Self::FirmwareProgress(_)) || self.firmware_outcome().is_some()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirmwareProgress(pct) => write!(f, "SUE_UF_PROGRESS({pct}%)"),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Terminal outcome of a firmware update attempt.
///
/// Exactly one of these is reported per update attempt. Everything except
/// [`Complete`](FirmwareOutcome::Complete) and
/// [`CompleteDeviceNotRestored`](FirmwareOutcome::CompleteDeviceNotRestored)
/// requires operator intervention; the controller never retries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareOutcome {
    /// Update succeeded.
    Complete,
    /// Update succeeded but device state was not restored; the application
    /// must close, reopen, claim, and enable again.
    CompleteDeviceNotRestored,
    /// Update failed; device remains operational.
    FailedDeviceOk,
    /// Update failed; device requires service.
    FailedDeviceUnrecoverable,
    /// Update failed; device inoperative until another update succeeds.
    FailedNeedsFirmware,
    /// Update failed; device state indeterminate.
    FailedUnknown,
}

impl FirmwareOutcome {
    /// Whether the outcome requires operator intervention.
    #[must_use]
    pub fn needs_operator(self) -> bool {
        !matches!(self, Self::Complete | Self::CompleteDeviceNotRestored)
    }

    /// Whether the update itself succeeded.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Complete | Self::CompleteDeviceNotRestored)
    }

    /// Operator-facing label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Complete => "UF_COMPLETE",
            Self::CompleteDeviceNotRestored => "UF_COMPLETE_DEV_NOT_RESTORED",
            Self::FailedDeviceOk => "UF_FAILED_DEV_OK",
            Self::FailedDeviceUnrecoverable => "UF_FAILED_DEV_UNRECOVERABLE",
            Self::FailedNeedsFirmware => "UF_FAILED_DEV_NEEDS_FIRMWARE",
            Self::FailedUnknown => "UF_FAILED_DEV_UNKNOWN",
        }
    }
}

impl fmt::Display for FirmwareOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<FirmwareOutcome> for StatusCode {
    fn from(outcome: FirmwareOutcome) -> Self {
        match outcome {
            FirmwareOutcome::Complete => StatusCode::FirmwareComplete,
            FirmwareOutcome::CompleteDeviceNotRestored => StatusCode::FirmwareCompleteNotRestored,
            FirmwareOutcome::FailedDeviceOk => StatusCode::FirmwareFailedDeviceOk,
            FirmwareOutcome::FailedDeviceUnrecoverable => {
                StatusCode::FirmwareFailedDeviceUnrecoverable
            }
            FirmwareOutcome::FailedNeedsFirmware => StatusCode::FirmwareFailedNeedsFirmware,
            FirmwareOutcome::FailedUnknown => StatusCode::FirmwareFailedUnknown,
        }
    }
}

/// Result of comparing a firmware image against the device firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareComparison {
    /// File firmware is older than the device firmware.
    Older,
    /// File firmware matches the device firmware.
    Same,
    /// File firmware is newer than the device firmware.
    Newer,
    /// Versions differ in an undetermined way.
    Different,
    /// File firmware version could not be determined.
    Unknown,
}

impl FirmwareComparison {
    /// Decode a comparison result from a direct I/O reply status.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            CFV_FIRMWARE_OLDER => Self::Older,
            CFV_FIRMWARE_SAME => Self::Same,
            CFV_FIRMWARE_NEWER => Self::Newer,
            CFV_FIRMWARE_DIFFERENT => Self::Different,
            _ => Self::Unknown,
        }
    }

    /// Encode to the raw reply status value.
    #[must_use]
    pub fn to_raw(self) -> i32 {
        match self {
            Self::Older => CFV_FIRMWARE_OLDER,
            Self::Same => CFV_FIRMWARE_SAME,
            Self::Newer => CFV_FIRMWARE_NEWER,
            Self::Different => CFV_FIRMWARE_DIFFERENT,
            Self::Unknown => CFV_FIRMWARE_UNKNOWN,
        }
    }

    /// Whether the comparison alone justifies starting an update.
    ///
    /// Undetermined results do not; the operator decides.
    #[must_use]
    pub fn update_advisable(self) -> bool {
        matches!(self, Self::Older | Self::Newer | Self::Same)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Older => "CFV_FIRMWARE_OLDER",
            Self::Same => "CFV_FIRMWARE_SAME",
            Self::Newer => "CFV_FIRMWARE_NEWER",
            Self::Different => "CFV_FIRMWARE_DIFFERENT",
            Self::Unknown => "CFV_FIRMWARE_UNKNOWN",
        }
    }
}

/// Barcode symbology of a scan, decoded from the raw scan data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Symbology {
    /// Data type unknown or not decoded.
    Unknown,
    UpcA,
    UpcE,
    Ean8,
    Ean13,
    Interleaved2Of5,
    Codabar,
    Code39,
    Code93,
    Code128,
    Gs1DataBar,
    Pdf417,
    DataMatrix,
    QrCode,
}

impl Symbology {
    /// Decode a raw scan data type. Unmapped values decode to
    /// [`Symbology::Unknown`].
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            101 => Self::UpcA,
            102 => Self::UpcE,
            103 => Self::Ean8,
            104 => Self::Ean13,
            106 => Self::Interleaved2Of5,
            107 => Self::Codabar,
            108 => Self::Code39,
            109 => Self::Code93,
            110 => Self::Code128,
            131 => Self::Gs1DataBar,
            201 => Self::Pdf417,
            203 => Self::DataMatrix,
            204 => Self::QrCode,
            _ => Self::Unknown,
        }
    }

    /// Encode to the raw scan data type value.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            Self::Unknown => 0,
            Self::UpcA => 101,
            Self::UpcE => 102,
            Self::Ean8 => 103,
            Self::Ean13 => 104,
            Self::Interleaved2Of5 => 106,
            Self::Codabar => 107,
            Self::Code39 => 108,
            Self::Code93 => 109,
            Self::Code128 => 110,
            Self::Gs1DataBar => 131,
            Self::Pdf417 => 201,
            Self::DataMatrix => 203,
            Self::QrCode => 204,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::UpcA => "UPC-A",
            Self::UpcE => "UPC-E",
            Self::Ean8 => "EAN-8",
            Self::Ean13 => "EAN-13",
            Self::Interleaved2Of5 => "ITF",
            Self::Codabar => "CODABAR",
            Self::Code39 => "CODE39",
            Self::Code93 => "CODE93",
            Self::Code128 => "CODE128",
            Self::Gs1DataBar => "GS1-DATABAR",
            Self::Pdf417 => "PDF417",
            Self::DataMatrix => "DATAMATRIX",
            Self::QrCode => "QRCODE",
        }
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// RFID tag protocol, decoded from the raw tag data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TagProtocol {
    Epc0,
    Epc0Plus,
    Epc1,
    Epc1Gen2,
    Epc2,
    Iso14443A,
    Iso14443B,
    Iso15693,
    Iso180006B,
    /// Protocol outside the defined set.
    Other,
}

impl TagProtocol {
    /// Decode a raw tag protocol code. Unmapped values decode to
    /// [`TagProtocol::Other`].
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            1 => Self::Epc0,
            2 => Self::Epc0Plus,
            3 => Self::Epc1,
            4 => Self::Epc1Gen2,
            5 => Self::Epc2,
            6 => Self::Iso14443A,
            7 => Self::Iso14443B,
            8 => Self::Iso15693,
            9 => Self::Iso180006B,
            _ => Self::Other,
        }
    }

    /// Encode to the raw tag protocol code.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            Self::Epc0 => 1,
            Self::Epc0Plus => 2,
            Self::Epc1 => 3,
            Self::Epc1Gen2 => 4,
            Self::Epc2 => 5,
            Self::Iso14443A => 6,
            Self::Iso14443B => 7,
            Self::Iso15693 => 8,
            Self::Iso180006B => 9,
            Self::Other => 99,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Epc0 => "EPC0",
            Self::Epc0Plus => "EPC0+",
            Self::Epc1 => "EPC1",
            Self::Epc1Gen2 => "EPC1G2",
            Self::Epc2 => "EPC2",
            Self::Iso14443A => "ISO14443A",
            Self::Iso14443B => "ISO14443B",
            Self::Iso15693 => "ISO15693",
            Self::Iso180006B => "ISO180006B",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for TagProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Weight unit reported by a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
}

impl WeightUnit {
    /// Decode a raw unit code. Unmapped values fall back to pounds, which
    /// is what the scales this was modeled on report by default.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            1 => Self::Gram,
            2 => Self::Kilogram,
            3 => Self::Ounce,
            _ => Self::Pound,
        }
    }

    /// Encode to the raw unit code.
    #[must_use]
    pub fn to_raw(self) -> u16 {
        match self {
            Self::Gram => 1,
            Self::Kilogram => 2,
            Self::Ounce => 3,
            Self::Pound => 4,
        }
    }

    /// Display name used when formatting weights.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gram => "grams",
            Self::Kilogram => "kilograms",
            Self::Ounce => "ounces",
            Self::Pound => "pounds",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_error_code_round_trip() {
        for code in ErrorCode::DEFINED {
            assert_eq!(ErrorCode::from_raw(code.to_raw()), code);
        }
    }

    #[test]
    fn test_error_code_labels_total_and_unique() {
        let mut seen = HashSet::new();
        for code in ErrorCode::DEFINED {
            let label = code.label();
            assert!(!label.is_empty());
            assert!(seen.insert(label), "duplicate label {label}");
        }
    }

    #[test]
    fn test_error_code_unknown_raw() {
        let code = ErrorCode::from_raw(0xBEEF);
        assert_eq!(code, ErrorCode::Unknown(0xBEEF));
        assert_eq!(code.label(), "UNKNOWN");
        assert_eq!(code.to_raw(), 0xBEEF);
    }

    #[rstest]
    #[case(2100, 0)]
    #[case(2101, 1)]
    #[case(2142, 42)]
    #[case(2199, 99)]
    fn test_status_code_progress_decoding(#[case] raw: u16, #[case] pct: u8) {
        let status = StatusCode::from_raw(raw);
        assert_eq!(status, StatusCode::FirmwareProgress(pct));
        assert_eq!(status.progress_percent(), Some(pct));
        assert_eq!(status.to_raw(), raw);
    }

    #[test]
    fn test_status_code_progress_never_collides_with_terminal() {
        // Even an out-of-range percentage clamps into the progress range.
        assert_eq!(StatusCode::FirmwareProgress(200).to_raw(), 2199);
        assert!(StatusCode::from_raw(2200).firmware_outcome().is_some());
    }

    #[rstest]
    #[case(StatusCode::FirmwareComplete, FirmwareOutcome::Complete, false)]
    #[case(
        StatusCode::FirmwareCompleteNotRestored,
        FirmwareOutcome::CompleteDeviceNotRestored,
        false
    )]
    #[case(StatusCode::FirmwareFailedDeviceOk, FirmwareOutcome::FailedDeviceOk, true)]
    #[case(
        StatusCode::FirmwareFailedDeviceUnrecoverable,
        FirmwareOutcome::FailedDeviceUnrecoverable,
        true
    )]
    #[case(
        StatusCode::FirmwareFailedNeedsFirmware,
        FirmwareOutcome::FailedNeedsFirmware,
        true
    )]
    #[case(StatusCode::FirmwareFailedUnknown, FirmwareOutcome::FailedUnknown, true)]
    fn test_firmware_outcomes(
        #[case] status: StatusCode,
        #[case] outcome: FirmwareOutcome,
        #[case] needs_operator: bool,
    ) {
        assert_eq!(status.firmware_outcome(), Some(outcome));
        assert_eq!(outcome.needs_operator(), needs_operator);
        assert!(status.is_firmware());
    }

    #[test]
    fn test_status_code_unknown_raw() {
        let status = StatusCode::from_raw(4242);
        assert_eq!(status, StatusCode::Unknown(4242));
        assert_eq!(status.label(), "UNKNOWN");
        assert!(!status.is_firmware());
    }

    #[test]
    fn test_power_codes_round_trip() {
        for raw in 2000..=2004 {
            let status = StatusCode::from_raw(raw);
            assert!(!matches!(status, StatusCode::Unknown(_)));
            assert_eq!(status.to_raw(), raw);
        }
    }

    #[test]
    fn test_firmware_comparison_round_trip() {
        for cmp in [
            FirmwareComparison::Older,
            FirmwareComparison::Same,
            FirmwareComparison::Newer,
            FirmwareComparison::Different,
            FirmwareComparison::Unknown,
        ] {
            assert_eq!(FirmwareComparison::from_raw(cmp.to_raw()), cmp);
            assert!(!cmp.label().is_empty());
        }
        assert_eq!(
            FirmwareComparison::from_raw(-7),
            FirmwareComparison::Unknown
        );
    }

    #[test]
    fn test_symbology_labels() {
        assert_eq!(Symbology::from_raw(110), Symbology::Code128);
        assert_eq!(Symbology::Code128.label(), "CODE128");
        assert_eq!(Symbology::from_raw(9999), Symbology::Unknown);
    }

    #[test]
    fn test_tag_protocol_defaults_to_other() {
        assert_eq!(TagProtocol::from_raw(6), TagProtocol::Iso14443A);
        assert_eq!(TagProtocol::from_raw(77), TagProtocol::Other);
        assert_eq!(TagProtocol::Other.label(), "OTHER");
    }

    #[test]
    fn test_weight_unit_falls_back_to_pound() {
        assert_eq!(WeightUnit::from_raw(2), WeightUnit::Kilogram);
        assert_eq!(WeightUnit::from_raw(0), WeightUnit::Pound);
        assert_eq!(WeightUnit::Pound.label(), "pounds");
    }
}
