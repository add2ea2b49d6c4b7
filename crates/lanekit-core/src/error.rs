//! Error types for peripheral session operations.
//!
//! One error type covers the whole workspace so the taxonomy the session
//! controller surfaces to consumers stays in one place: lifecycle errors,
//! transport/hardware errors, data errors, and operational errors. The
//! controller does not classify and recover; it propagates these upward.

use crate::codes::ErrorCode;

/// Result type alias for peripheral session operations.
pub type Result<T> = std::result::Result<T, PosError>;

/// Errors surfaced by session, device, and profile operations.
#[derive(Debug, thiserror::Error)]
pub enum PosError {
    // Lifecycle errors
    /// No profile with this logical name exists in the store.
    #[error("Profile not found: {name}")]
    ProfileNotFound { name: String },

    /// The device port is already attached to another session.
    #[error("Device already open: {device}")]
    AlreadyOpen { device: String },

    /// The device is exclusively claimed, either by this session or by
    /// another owner.
    #[error("Device already claimed: {device}")]
    AlreadyClaimed { device: String },

    /// The operation requires the claim but the session does not hold it.
    #[error("Device not claimed")]
    NotClaimed,

    /// The operation did not complete within its timeout.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The session is closed.
    #[error("Session is closed")]
    Closed,

    /// The requested lifecycle transition is not legal.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Transport / hardware errors
    /// Device is powered but offline.
    #[error("Device offline: {device}")]
    Offline { device: String },

    /// No physical hardware is attached for this profile.
    #[error("No hardware: {device}")]
    NoHardware { device: String },

    /// The device was physically removed.
    #[error("Device removed: {device}")]
    DeviceRemoved { device: String },

    /// The device is busy with another request.
    #[error("Device busy: {device}")]
    Busy { device: String },

    /// Transport-level communication failure.
    #[error("Transport error: {message}")]
    Transport { message: String },

    // Data errors
    /// Invalid data received from or supplied to a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    // Operational errors
    /// Operation is not supported by this device.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Direct I/O is disallowed in the current device mode.
    #[error("Direct I/O not allowed: opcode {opcode}")]
    DirectIoNotAllowed { opcode: u32 },

    /// Direct I/O opcode is undefined for this device.
    #[error("Undefined direct I/O opcode: {opcode}")]
    DirectIoUndefined { opcode: u32 },

    /// Feature is deprecated and no longer serviced.
    #[error("Deprecated feature: {feature}")]
    Deprecated { feature: String },

    /// Device violated a documented protocol contract.
    #[error("Protocol violation: {message}")]
    Protocol { message: String },

    // Configuration errors
    /// Profile store could not be read or parsed.
    #[error("Profile error: {message}")]
    Profile { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PosError {
    /// Create a new profile-not-found error.
    pub fn profile_not_found(name: impl Into<String>) -> Self {
        Self::ProfileNotFound { name: name.into() }
    }

    /// Create a new already-open error.
    pub fn already_open(device: impl Into<String>) -> Self {
        Self::AlreadyOpen {
            device: device.into(),
        }
    }

    /// Create a new already-claimed error.
    pub fn already_claimed(device: impl Into<String>) -> Self {
        Self::AlreadyClaimed {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new offline error.
    pub fn offline(device: impl Into<String>) -> Self {
        Self::Offline {
            device: device.into(),
        }
    }

    /// Create a new busy error.
    pub fn busy(device: impl Into<String>) -> Self {
        Self::Busy {
            device: device.into(),
        }
    }

    /// Create a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new protocol violation error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a new profile store error.
    pub fn profile(message: impl Into<String>) -> Self {
        Self::Profile {
            message: message.into(),
        }
    }

    /// Map this error onto the fixed error code space.
    ///
    /// Used when a call failure has to be reported through an error event
    /// or rendered with the shared label table.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ProfileNotFound { .. } => ErrorCode::NoExist,
            Self::AlreadyOpen { .. } => ErrorCode::Exists,
            Self::AlreadyClaimed { .. } => ErrorCode::Claimed,
            Self::NotClaimed => ErrorCode::NotClaimed,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Closed => ErrorCode::Closed,
            Self::InvalidStateTransition { .. } => ErrorCode::Illegal,
            Self::Offline { .. } => ErrorCode::Offline,
            Self::NoHardware { .. } => ErrorCode::NoHardware,
            Self::DeviceRemoved { .. } => ErrorCode::DeviceRemoved,
            Self::Busy { .. } => ErrorCode::Busy,
            Self::Transport { .. } => ErrorCode::Failure,
            Self::InvalidData { .. } => ErrorCode::Data,
            Self::Unsupported { .. } => ErrorCode::Illegal,
            Self::DirectIoNotAllowed { .. } => ErrorCode::DioNotAllowed,
            Self::DirectIoUndefined { .. } => ErrorCode::DioUndefined,
            Self::Deprecated { .. } => ErrorCode::Deprecated,
            Self::Protocol { .. } => ErrorCode::Extended,
            Self::Profile { .. } => ErrorCode::NoExist,
            Self::Io(_) => ErrorCode::Failure,
        }
    }
}
