//! Raw code values and shared constants for the lanekit device API.
//!
//! This module pins down the numeric code space shared by every lanekit
//! crate: call-failure codes, asynchronous status codes, firmware update
//! result codes, and the vendor extension opcode registry. The enums in
//! [`crate::codes`] round-trip through these values, so changing a number
//! here changes what travels in [`crate::event::ErrorReport`] and
//! [`crate::event::DeviceEvent`].
//!
//! # Code Space Layout
//!
//! | Range       | Meaning                                   |
//! |-------------|-------------------------------------------|
//! | `0`         | Success                                   |
//! | `101`–`120` | Call/lifecycle failure codes              |
//! | `201`–`219` | Device and data error codes               |
//! | `2000`–`2004` | Power state status codes                |
//! | `2100`–`2199` | Firmware update progress (0–99 percent) |
//! | `2200`–`2205` | Firmware update terminal statuses       |
//! | `2301`–`2306` | Scale live-weight statuses              |
//!
//! # Usage
//!
//! ```
//! use lanekit_core::constants::{SUE_UF_PROGRESS, SUE_UF_COMPLETE};
//!
//! // Firmware progress codes encode a percentage in a reserved sub-range.
//! let raw = SUE_UF_PROGRESS + 42;
//! assert!(raw > SUE_UF_PROGRESS && raw < SUE_UF_COMPLETE);
//! assert_eq!(raw - SUE_UF_PROGRESS, 42);
//! ```

// ============================================================================
// Success
// ============================================================================

/// Successful completion of a call or exchange.
pub const SUCCESS: u16 = 0;

// ============================================================================
// Call / Lifecycle Failure Codes (101-120)
// ============================================================================

/// Operation attempted on a closed session.
pub const E_CLOSED: u16 = 101;

/// Device is exclusively claimed by another owner.
pub const E_CLAIMED: u16 = 102;

/// Operation requires the claim but the session does not hold it.
pub const E_NOTCLAIMED: u16 = 103;

/// No service/driver is available for the requested profile.
pub const E_NOSERVICE: u16 = 104;

/// Operation requires the device to be enabled.
pub const E_DISABLED: u16 = 105;

/// Operation is illegal in the current state.
pub const E_ILLEGAL: u16 = 106;

/// No physical hardware is attached for this profile.
pub const E_NOHARDWARE: u16 = 107;

/// Device is powered but offline.
pub const E_OFFLINE: u16 = 108;

/// Named entity does not exist.
pub const E_NOEXIST: u16 = 109;

/// Named entity already exists (e.g. double open).
pub const E_EXISTS: u16 = 110;

/// Unspecified failure.
pub const E_FAILURE: u16 = 111;

/// Operation did not complete within its timeout.
pub const E_TIMEOUT: u16 = 112;

/// Device is busy with another request.
pub const E_BUSY: u16 = 113;

/// Failure described by an extended code.
pub const E_EXTENDED: u16 = 114;

/// Feature is deprecated and no longer serviced.
pub const E_DEPRECATED: u16 = 115;

/// Firmware image file is unusable.
pub const E_FIRMWARE_BAD_FILE: u16 = 120;

// ============================================================================
// Device / Data Error Codes (201-219)
// ============================================================================

/// Malformed or unrecognized command.
pub const ERR_CMD: u16 = 201;

/// Scale produced no weight.
pub const ERR_NO_WEIGHT: u16 = 202;

/// Corrupt data received from the device.
pub const ERR_DATA: u16 = 203;

/// Read from the device failed.
pub const ERR_READ: u16 = 204;

/// Device display is absent or failed.
pub const ERR_NO_DISPLAY: u16 = 205;

/// Hardware fault reported by the device.
pub const ERR_HARDWARE: u16 = 206;

/// Device rejected the command.
pub const ERR_CMD_REJECT: u16 = 207;

/// Capacity exceeded (e.g. scale over maximum weight).
pub const ERR_CAPACITY: u16 = 208;

/// Scale requires zeroing before it can weigh.
pub const ERR_REQUIRES_ZEROING: u16 = 209;

/// Device is still warming up.
pub const ERR_WARMUP: u16 = 210;

/// Duplicate data detected and suppressed by the device.
pub const ERR_DUPLICATE: u16 = 211;

/// Device is flashing firmware and cannot service requests.
pub const ERR_FLASHING: u16 = 212;

/// Device-level busy indication.
pub const ERR_BUSY: u16 = 213;

/// Label check digit verification failed.
pub const ERR_CHECKDIGIT: u16 = 214;

/// Direct I/O is disallowed in the current device mode.
pub const ERR_DIO_NOT_ALLOWED: u16 = 215;

/// Direct I/O opcode is undefined for this device.
pub const ERR_DIO_UNDEFINED: u16 = 216;

/// Device was physically removed.
pub const ERR_DEVICE_REMOVED: u16 = 217;

/// Scale is at zero (nothing to weigh).
pub const ERR_SCALE_AT_ZERO: u16 = 218;

/// Scale reads below zero.
pub const ERR_SCALE_UNDER_ZERO: u16 = 219;

// ============================================================================
// Power State Status Codes (2000-2004)
// ============================================================================

/// Power state cannot be determined.
pub const SUE_POWER_UNKNOWN: u16 = 2000;

/// Device is powered and online.
pub const SUE_POWER_ONLINE: u16 = 2001;

/// Device is powered off.
pub const SUE_POWER_OFF: u16 = 2002;

/// Device is powered but offline.
pub const SUE_POWER_OFFLINE: u16 = 2003;

/// Device is both powered off and offline.
pub const SUE_POWER_OFF_OFFLINE: u16 = 2004;

// ============================================================================
// Firmware Update Status Codes (2100-2205)
// ============================================================================

/// Base of the firmware progress sub-range.
///
/// Codes `SUE_UF_PROGRESS + n` for `n` in `0..100` report `n` percent
/// completion. 100 percent is reported by one of the terminal codes below,
/// never by a progress code.
pub const SUE_UF_PROGRESS: u16 = 2100;

/// Firmware update completed successfully.
pub const SUE_UF_COMPLETE: u16 = 2200;

/// Update failed; the device is still operational.
pub const SUE_UF_FAILED_DEV_OK: u16 = 2201;

/// Update failed; the device is unusable and not recoverable in software.
pub const SUE_UF_FAILED_DEV_UNRECOVERABLE: u16 = 2202;

/// Update failed; the device needs a successful update to operate again.
pub const SUE_UF_FAILED_DEV_NEEDS_FIRMWARE: u16 = 2203;

/// Update failed; the device state is indeterminate.
pub const SUE_UF_FAILED_DEV_UNKNOWN: u16 = 2204;

/// Update succeeded but the device could not be restored to its prior
/// state; the application must close, reopen, and reconfigure.
pub const SUE_UF_COMPLETE_DEV_NOT_RESTORED: u16 = 2205;

// ============================================================================
// Scale Live-Weight Status Codes (2301-2306)
// ============================================================================

/// A stable weight is available.
pub const SUE_WEIGHT_STABLE: u16 = 2301;

/// The weight reading is unstable.
pub const SUE_WEIGHT_UNSTABLE: u16 = 2302;

/// The platter is empty (weight is zero).
pub const SUE_WEIGHT_ZERO: u16 = 2303;

/// The load exceeds the scale capacity.
pub const SUE_WEIGHT_OVERWEIGHT: u16 = 2304;

/// The reading is below zero.
pub const SUE_WEIGHT_UNDER_ZERO: u16 = 2305;

/// The scale is not ready to weigh.
pub const SUE_SCALE_NOT_READY: u16 = 2306;

// ============================================================================
// Firmware Comparison Results
// ============================================================================

/// The file firmware is older than the device firmware.
pub const CFV_FIRMWARE_OLDER: i32 = 1;

/// The file firmware matches the device firmware.
pub const CFV_FIRMWARE_SAME: i32 = 2;

/// The file firmware is newer than the device firmware.
pub const CFV_FIRMWARE_NEWER: i32 = 3;

/// The firmware versions differ in an undetermined way.
pub const CFV_FIRMWARE_DIFFERENT: i32 = 4;

/// The file firmware version cannot be determined.
pub const CFV_FIRMWARE_UNKNOWN: i32 = 5;

// ============================================================================
// Vendor Extension Opcodes
// ============================================================================
//
// The session controller never interprets these values; they are defined
// here so producers and consumers agree on the registry. Devices answer
// unknown opcodes with an undefined-direct-I/O failure.

/// Scanner: return the number of items scanned since enable.
pub const DIO_RETURN_QUANTITY: u32 = 10;

/// Scanner: return the raw data type of the last scan.
pub const DIO_RETURN_DATA_TYPE: u32 = 11;

/// Compare a firmware image against the device firmware.
///
/// The reply status carries one of the `CFV_FIRMWARE_*` results.
pub const DIO_COMPARE_FIRMWARE: u32 = 20;

/// Start a firmware update.
///
/// Progress and the terminal outcome arrive as status events in the
/// `SUE_UF_*` range.
pub const DIO_UPDATE_FIRMWARE: u32 = 21;

/// Scale: return the current live weight in centigrams.
pub const DIO_SCALE_LIVE_WEIGHT: u32 = 30;

/// Scale: return the configured weight unit code.
pub const DIO_SCALE_WEIGHT_UNIT: u32 = 31;

/// Scale: return the maximum weight in centigrams.
pub const DIO_SCALE_CAPACITY: u32 = 32;

/// RFID: run a single tag inventory.
pub const DIO_RFID_READ_TAGS: u32 = 40;

/// RFID: start continuous tag reading.
///
/// The input buffer may carry the poll interval in milliseconds as a
/// little-endian u64; an empty buffer selects the default interval.
pub const DIO_RFID_START_READ: u32 = 41;

/// RFID: stop continuous tag reading. Idempotent.
pub const DIO_RFID_STOP_READ: u32 = 42;

// ============================================================================
// Defaults and Limits
// ============================================================================

/// Default claim timeout (milliseconds).
pub const DEFAULT_CLAIM_TIMEOUT_MS: u64 = 1000;

/// Default poll interval for continuous RFID reads (milliseconds).
pub const DEFAULT_RFID_READ_INTERVAL_MS: u64 = 1000;

/// Maximum length of a logical profile name (characters).
pub const MAX_PROFILE_NAME_LENGTH: usize = 64;
