//! Console formatting helpers for the example programs.

use lanekit_core::{FirmwareOutcome, WeightUnit};

/// Centigrams per display unit.
const CG_PER_GRAM: f64 = 100.0;
const CG_PER_KILOGRAM: f64 = 100_000.0;
const CG_PER_OUNCE: f64 = 2_834.952_312_5;
const CG_PER_POUND: f64 = 45_359.237;

/// Column widths for the RFID tag table.
const NUMBER_COLUMN_WIDTH: usize = 2;
const ID_COLUMN_WIDTH: usize = 24;
const PROTOCOL_COLUMN_WIDTH: usize = 18;

/// Render a packet as `[len] 0xAB 0xCD ...`, flagging suspect packets.
///
/// Policy: a non-empty payload consisting solely of `0x00` bytes is still
/// a delivered event, but it is rendered as an invalid packet rather than
/// as data. This is a display heuristic inherited from field experience
/// with scanners that emit all-null packets on decode glitches; it may
/// mask a legitimate all-zero payload, which is why it lives here in the
/// formatter and not in the session controller.
pub fn format_packet(data: &[u8]) -> String {
    if data.is_empty() {
        return "[0] **invalid packet - byte array is empty".to_string();
    }
    if data.iter().all(|&b| b == 0x00) {
        return "[0] **invalid packet - contained all nulls".to_string();
    }

    let hex = data
        .iter()
        .map(|b| format!("0x{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{}] {}", data.len(), hex)
}

/// Render bytes as a contiguous uppercase hex string.
pub fn hex_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Strip unprintable characters from scan data for display.
///
/// Printable ASCII passes through; raw digit bytes (0-9) are promoted to
/// their ASCII digits; runs of other bytes collapse to a single space
/// after printable text.
pub fn trim_unprintable(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len());
    let mut padded = false;

    for &ch in data {
        if (32..=126).contains(&ch) {
            out.push(ch as char);
            padded = true;
        } else if ch <= 9 {
            out.push((ch + b'0') as char);
        } else if padded {
            out.push(' ');
            padded = false;
        }
    }

    out
}

/// Format a centigram reading in the scale's configured unit.
pub fn format_weight(weight_cg: i32, unit: WeightUnit) -> String {
    let per_unit = match unit {
        WeightUnit::Gram => CG_PER_GRAM,
        WeightUnit::Kilogram => CG_PER_KILOGRAM,
        WeightUnit::Ounce => CG_PER_OUNCE,
        WeightUnit::Pound => CG_PER_POUND,
    };
    format!("{:.2} {}", f64::from(weight_cg) / per_unit, unit.label())
}

/// Pad text with trailing spaces to a minimum width, truncating overflow.
pub fn pad_right(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    out.push_str(&text.chars().take(width).collect::<String>());
    while out.chars().count() < width {
        out.push(' ');
    }
    out
}

/// Header row of the RFID tag table.
pub fn tag_table_header() -> String {
    format!(
        "{} {} {} TAG_DATA",
        pad_right("#", NUMBER_COLUMN_WIDTH + 1),
        pad_right("TAG_ID", ID_COLUMN_WIDTH + 1),
        pad_right("TAG_PROTOCOL", PROTOCOL_COLUMN_WIDTH + 1),
    )
}

/// One row of the RFID tag table.
pub fn tag_table_row(index: usize, id: &[u8], protocol: &str, user_data: &[u8]) -> String {
    format!(
        "{}, {}, {}, {}",
        pad_right(&index.to_string(), NUMBER_COLUMN_WIDTH),
        pad_right(&hex_string(id), ID_COLUMN_WIDTH),
        pad_right(protocol, PROTOCOL_COLUMN_WIDTH),
        hex_string(user_data),
    )
}

/// Operator-facing message for a firmware update outcome.
pub fn firmware_outcome_message(outcome: FirmwareOutcome) -> &'static str {
    match outcome {
        FirmwareOutcome::Complete => "The update firmware process has completed successfully.",
        FirmwareOutcome::CompleteDeviceNotRestored => {
            "The update firmware process succeeded, however the device could not be \
             returned to the state it was in before the update. Close the session, then \
             open, claim, and enable again, and restore all custom application settings."
        }
        FirmwareOutcome::FailedDeviceOk => {
            "The update firmware process failed but the device is still operational."
        }
        FirmwareOutcome::FailedDeviceUnrecoverable => {
            "The update firmware process failed and the device is neither usable nor \
             recoverable through software. The device requires service."
        }
        FirmwareOutcome::FailedNeedsFirmware => {
            "The update firmware process failed and the device will not be operational \
             until another attempt to update the firmware is successful."
        }
        FirmwareOutcome::FailedUnknown => {
            "The update firmware process failed and the device is in an indeterminate state."
        }
    }
}
