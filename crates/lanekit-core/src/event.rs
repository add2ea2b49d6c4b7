//! Event records delivered by a device session.
//!
//! A session delivers three kinds of asynchronous notifications: data
//! (a scan, tag read, or other input), status changes, and errors. Events
//! are immutable once produced; every subscriber callback receives its own
//! owned copy.

use crate::codes::{ErrorCode, StatusCode, Symbology, TagProtocol};
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// The three kinds of session events a consumer can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Input data is available.
    Data,
    /// Device status changed.
    Status,
    /// An asynchronous error occurred.
    Error,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data => write!(f, "Data"),
            Self::Status => write!(f, "Status"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// One unit of input produced by a device.
///
/// For a barcode scanner, `payload` is the raw scan data, `label` the
/// decoded label bytes, and `data_type` the symbology code. For an RFID
/// reader, `payload` is the tag id, `label` the tag user data, and
/// `data_type` the tag protocol code.
#[derive(Debug, Clone)]
pub struct ScanData {
    /// Raw data bytes.
    pub payload: Bytes,

    /// Decoded label bytes (may be empty when the device does not decode).
    pub label: Bytes,

    /// Raw data type code; see [`ScanData::symbology`] and
    /// [`ScanData::tag_protocol`].
    pub data_type: u16,

    /// When the device produced the data.
    pub timestamp: DateTime<Utc>,
}

impl ScanData {
    /// Create a new scan record stamped with the current time.
    pub fn new(payload: impl Into<Bytes>, label: impl Into<Bytes>, data_type: u16) -> Self {
        Self {
            payload: payload.into(),
            label: label.into(),
            data_type,
            timestamp: Utc::now(),
        }
    }

    /// Decode the data type as a barcode symbology.
    #[must_use]
    pub fn symbology(&self) -> Symbology {
        Symbology::from_raw(self.data_type)
    }

    /// Decode the data type as an RFID tag protocol.
    #[must_use]
    pub fn tag_protocol(&self) -> TagProtocol {
        TagProtocol::from_raw(self.data_type)
    }

    /// Payload rendered as an uppercase hex string.
    #[must_use]
    pub fn payload_hex(&self) -> String {
        self.payload
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Asynchronous error report.
///
/// Raw codes are forwarded exactly as the device produced them; the
/// [`ErrorCode`] table is how consumers translate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorReport {
    /// Primary error code.
    pub code: ErrorCode,

    /// Extended, device-specific error code.
    pub extended: ErrorCode,

    /// Suggested response code (retry, clear, continue).
    pub response: ErrorCode,
}

impl ErrorReport {
    /// Create a new error report.
    pub fn new(code: ErrorCode, extended: ErrorCode, response: ErrorCode) -> Self {
        Self {
            code,
            extended,
            response,
        }
    }

    /// Create a report from raw code values.
    pub fn from_raw(code: u16, extended: u16, response: u16) -> Self {
        Self {
            code: ErrorCode::from_raw(code),
            extended: ErrorCode::from_raw(extended),
            response: ErrorCode::from_raw(response),
        }
    }

    /// Labels for all three codes, in `(code, extended, response)` order.
    #[must_use]
    pub fn labels(&self) -> (&'static str, &'static str, &'static str) {
        (
            self.code.label(),
            self.extended.label(),
            self.response.label(),
        )
    }
}

/// Event delivered to session subscribers.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum DeviceEvent {
    /// Input data is available.
    Data(ScanData),

    /// Device status changed.
    Status(StatusCode),

    /// An asynchronous error occurred.
    Error(ErrorReport),
}

impl DeviceEvent {
    /// The subscription kind this event is dispatched under.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Data(_) => EventKind::Data,
            Self::Status(_) => EventKind::Status,
            Self::Error(_) => EventKind::Error,
        }
    }
}

/// Response of one vendor extension exchange.
///
/// Owned by the caller for the duration of one request/response pair;
/// never retained by the session controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectIoReply {
    /// Vendor-defined status value.
    pub status: i32,

    /// Raw response bytes, empty when the opcode produces none.
    pub payload: Bytes,
}

impl DirectIoReply {
    /// Reply with a status and no payload.
    pub fn status_only(status: i32) -> Self {
        Self {
            status,
            payload: Bytes::new(),
        }
    }

    /// Reply with a status and payload bytes.
    pub fn with_payload(status: i32, payload: impl Into<Bytes>) -> Self {
        Self {
            status,
            payload: payload.into(),
        }
    }
}
