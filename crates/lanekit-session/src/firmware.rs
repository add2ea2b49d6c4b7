//! Firmware update progress tracking.
//!
//! A firmware update is started through the vendor extension channel; the
//! device then reports progress as status events whose codes encode a
//! percentage in a reserved sub-range, followed by exactly one terminal
//! outcome. [`FirmwareMonitor`] decodes that stream for a consumer's
//! status handler and checks the device keeps its side of the contract:
//! progress strictly increases and nothing follows the terminal status.
//!
//! The monitor never retries and never drives the device; failed outcomes
//! are reported for the operator to act on.

use lanekit_core::{FirmwareOutcome, PosError, Result, StatusCode};

/// What one observed status event meant for the update in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirmwareUpdate {
    /// Progress report, percent complete.
    Progress(u8),

    /// The terminal outcome arrived; the update attempt is over.
    Finished(FirmwareOutcome),

    /// The status event was not part of the firmware sub-protocol.
    Unrelated,
}

/// Tracks one firmware update attempt across status events.
///
/// # Examples
///
/// ```
/// use lanekit_core::{FirmwareOutcome, StatusCode};
/// use lanekit_session::firmware::{FirmwareMonitor, FirmwareUpdate};
///
/// let mut monitor = FirmwareMonitor::new();
///
/// monitor.observe(StatusCode::FirmwareProgress(50)).unwrap();
/// let update = monitor.observe(StatusCode::FirmwareComplete).unwrap();
///
/// assert_eq!(update, FirmwareUpdate::Finished(FirmwareOutcome::Complete));
/// assert!(monitor.is_finished());
/// ```
#[derive(Debug, Default)]
pub struct FirmwareMonitor {
    last_percent: Option<u8>,
    outcome: Option<FirmwareOutcome>,
}

impl FirmwareMonitor {
    /// Create a monitor for a fresh update attempt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one status event into the monitor.
    ///
    /// # Errors
    ///
    /// Returns `PosError::Protocol` if the device violates the update
    /// contract: progress that does not strictly increase, progress after
    /// the terminal status, or a second terminal status.
    pub fn observe(&mut self, status: StatusCode) -> Result<FirmwareUpdate> {
        if let Some(outcome) = status.firmware_outcome() {
            if let Some(previous) = self.outcome {
                return Err(PosError::protocol(format!(
                    "second terminal firmware status {} after {}",
                    outcome, previous
                )));
            }
            self.outcome = Some(outcome);
            return Ok(FirmwareUpdate::Finished(outcome));
        }

        if let Some(percent) = status.progress_percent() {
            if let Some(outcome) = self.outcome {
                return Err(PosError::protocol(format!(
                    "firmware progress {}% after terminal status {}",
                    percent, outcome
                )));
            }
            if let Some(last) = self.last_percent
                && percent <= last
            {
                return Err(PosError::protocol(format!(
                    "firmware progress went from {}% to {}%",
                    last, percent
                )));
            }
            self.last_percent = Some(percent);
            return Ok(FirmwareUpdate::Progress(percent));
        }

        Ok(FirmwareUpdate::Unrelated)
    }

    /// Last progress percentage observed, if any.
    pub fn percent(&self) -> Option<u8> {
        self.last_percent
    }

    /// Terminal outcome, once one arrived.
    pub fn outcome(&self) -> Option<FirmwareOutcome> {
        self.outcome
    }

    /// Whether a terminal status has been observed.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_then_terminal() {
        let mut monitor = FirmwareMonitor::new();

        assert_eq!(
            monitor.observe(StatusCode::FirmwareProgress(10)).unwrap(),
            FirmwareUpdate::Progress(10)
        );
        assert_eq!(
            monitor.observe(StatusCode::FirmwareProgress(60)).unwrap(),
            FirmwareUpdate::Progress(60)
        );
        assert_eq!(monitor.percent(), Some(60));
        assert!(!monitor.is_finished());

        let update = monitor.observe(StatusCode::FirmwareComplete).unwrap();
        assert_eq!(update, FirmwareUpdate::Finished(FirmwareOutcome::Complete));
        assert_eq!(monitor.outcome(), Some(FirmwareOutcome::Complete));
    }

    #[test]
    fn test_non_monotonic_progress_rejected() {
        let mut monitor = FirmwareMonitor::new();
        monitor.observe(StatusCode::FirmwareProgress(50)).unwrap();

        assert!(monitor.observe(StatusCode::FirmwareProgress(50)).is_err());
        assert!(monitor.observe(StatusCode::FirmwareProgress(20)).is_err());
    }

    #[test]
    fn test_second_terminal_rejected() {
        let mut monitor = FirmwareMonitor::new();
        monitor.observe(StatusCode::FirmwareComplete).unwrap();

        let err = monitor
            .observe(StatusCode::FirmwareFailedDeviceOk)
            .unwrap_err();
        assert!(matches!(err, PosError::Protocol { .. }));
    }

    #[test]
    fn test_progress_after_terminal_rejected() {
        let mut monitor = FirmwareMonitor::new();
        monitor.observe(StatusCode::FirmwareFailedUnknown).unwrap();

        assert!(monitor.observe(StatusCode::FirmwareProgress(99)).is_err());
    }

    #[test]
    fn test_unrelated_status_ignored() {
        let mut monitor = FirmwareMonitor::new();
        assert_eq!(
            monitor.observe(StatusCode::PowerOnline).unwrap(),
            FirmwareUpdate::Unrelated
        );
        assert_eq!(monitor.percent(), None);
        assert!(!monitor.is_finished());
    }

    #[test]
    fn test_failure_outcomes_need_operator() {
        let mut monitor = FirmwareMonitor::new();
        let update = monitor
            .observe(StatusCode::FirmwareFailedDeviceUnrecoverable)
            .unwrap();

        match update {
            FirmwareUpdate::Finished(outcome) => assert!(outcome.needs_operator()),
            other => panic!("unexpected update {:?}", other),
        }
    }
}
