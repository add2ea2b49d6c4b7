//! Mock barcode scanner for testing and development.
//!
//! Simulates a USB barcode scanner: scans are injected through a
//! programmable handle, firmware compare/update is answered from a
//! configurable script, and exclusive claiming is arbitrated per physical
//! device so contention scenarios can be tested with a second port.

use crate::traits::{DeviceInfo, DeviceService};
use lanekit_core::{
    DeviceEvent, DirectIoReply, ErrorReport, FirmwareComparison, PosError, Result, ScanData,
    StatusCode, Symbology,
    constants::{
        DIO_COMPARE_FIRMWARE, DIO_RETURN_DATA_TYPE, DIO_RETURN_QUANTITY, DIO_UPDATE_FIRMWARE,
    },
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicI32, AtomicU16, Ordering},
};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};

/// Event channel depth per port.
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Delay between scripted firmware status events.
const FIRMWARE_STEP_DELAY: Duration = Duration::from_millis(10);

/// State shared by every port of one physical mock scanner.
#[derive(Debug)]
struct ScannerShared {
    /// Single-permit claim token; the holder has exclusive use.
    claim: Arc<Semaphore>,
    firmware_script: Mutex<Option<Vec<StatusCode>>>,
    comparison: Mutex<FirmwareComparison>,
    scan_count: AtomicI32,
    last_data_type: AtomicU16,
}

/// Mock barcode scanner port.
///
/// # Examples
///
/// ```
/// use lanekit_hardware::mock::MockScanner;
/// use lanekit_hardware::traits::DeviceService;
/// use lanekit_core::Symbology;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> lanekit_core::Result<()> {
///     let (mut scanner, mut handle) = MockScanner::new();
///
///     scanner.attach().await?;
///     scanner.claim(Duration::from_millis(100)).await?;
///     scanner.set_enabled(true).await?;
///
///     let mut events = scanner.take_events()?;
///     handle.push_scan(vec![0x41, 0x42], vec![0x41, 0x42], Symbology::Code128).await?;
///
///     let event = events.recv().await.unwrap();
///     println!("{:?}", event);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockScanner {
    shared: Arc<ScannerShared>,
    events_tx: mpsc::Sender<DeviceEvent>,
    events_rx: Option<mpsc::Receiver<DeviceEvent>>,
    name: String,
    model: String,
    attached: bool,
    enabled: bool,
    permit: Option<OwnedSemaphorePermit>,
}

impl MockScanner {
    /// Create a new mock scanner with the default name.
    ///
    /// Returns a `(MockScanner, MockScannerHandle)` pair; the handle
    /// simulates the physical device.
    pub fn new() -> (Self, MockScannerHandle) {
        Self::with_name("Mock Scanner".to_string())
    }

    /// Create a new mock scanner with a custom name.
    pub fn with_name(name: String) -> (Self, MockScannerHandle) {
        Self::with_name_and_model(name, "Mock Scanner".to_string())
    }

    /// Create a new mock scanner with a custom name and model string.
    pub fn with_name_and_model(name: String, model: String) -> (Self, MockScannerHandle) {
        let shared = Arc::new(ScannerShared {
            claim: Arc::new(Semaphore::new(1)),
            firmware_script: Mutex::new(None),
            comparison: Mutex::new(FirmwareComparison::Same),
            scan_count: AtomicI32::new(0),
            last_data_type: AtomicU16::new(0),
        });

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let scanner = Self {
            shared: Arc::clone(&shared),
            events_tx: events_tx.clone(),
            events_rx: Some(events_rx),
            name: name.clone(),
            model: model.clone(),
            attached: false,
            enabled: false,
            permit: None,
        };

        let handle = MockScannerHandle {
            shared,
            ports: vec![events_tx],
            name,
            model,
        };

        (scanner, handle)
    }

    fn require_attached(&self) -> Result<()> {
        if self.attached {
            Ok(())
        } else {
            Err(PosError::Closed)
        }
    }

    /// Whether this port is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn default_firmware_script() -> Vec<StatusCode> {
        vec![
            StatusCode::FirmwareProgress(25),
            StatusCode::FirmwareProgress(50),
            StatusCode::FirmwareProgress(75),
            StatusCode::FirmwareProgress(95),
            StatusCode::FirmwareComplete,
        ]
    }
}

impl DeviceService for MockScanner {
    async fn attach(&mut self) -> Result<()> {
        if self.attached {
            return Err(PosError::already_open(self.name.as_str()));
        }
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.enabled = false;
        self.permit = None;
        self.attached = false;
    }

    async fn claim(&mut self, timeout: Duration) -> Result<()> {
        self.require_attached()?;
        if self.permit.is_some() {
            return Err(PosError::already_claimed(self.name.as_str()));
        }

        let claim = Arc::clone(&self.shared.claim);
        match tokio::time::timeout(timeout, claim.acquire_owned()).await {
            Ok(Ok(permit)) => {
                self.permit = Some(permit);
                Ok(())
            }
            Ok(Err(_)) => Err(PosError::transport("claim token closed")),
            Err(_) => Err(PosError::timeout(timeout.as_millis() as u64)),
        }
    }

    fn release(&mut self) -> Result<()> {
        match self.permit.take() {
            Some(_) => Ok(()),
            None => Err(PosError::NotClaimed),
        }
    }

    async fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.require_attached()?;
        if enabled && self.permit.is_none() {
            return Err(PosError::NotClaimed);
        }
        self.enabled = enabled;
        Ok(())
    }

    async fn direct_io(&mut self, opcode: u32, input: &[u8]) -> Result<DirectIoReply> {
        self.require_attached()?;
        match opcode {
            DIO_RETURN_QUANTITY => Ok(DirectIoReply::status_only(
                self.shared.scan_count.load(Ordering::Relaxed),
            )),
            DIO_RETURN_DATA_TYPE => Ok(DirectIoReply::status_only(i32::from(
                self.shared.last_data_type.load(Ordering::Relaxed),
            ))),
            DIO_COMPARE_FIRMWARE => {
                if self.permit.is_none() {
                    return Err(PosError::DirectIoNotAllowed { opcode });
                }
                if input.is_empty() {
                    return Err(PosError::invalid_data("empty firmware image"));
                }
                let comparison = *self.shared.comparison.lock().expect("comparison poisoned");
                Ok(DirectIoReply::status_only(comparison.to_raw()))
            }
            DIO_UPDATE_FIRMWARE => {
                if self.permit.is_none() {
                    return Err(PosError::DirectIoNotAllowed { opcode });
                }
                if input.is_empty() {
                    return Err(PosError::invalid_data("empty firmware image"));
                }

                let script = self
                    .shared
                    .firmware_script
                    .lock()
                    .expect("script poisoned")
                    .take()
                    .unwrap_or_else(Self::default_firmware_script);

                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    for status in script {
                        tokio::time::sleep(FIRMWARE_STEP_DELAY).await;
                        if tx.send(DeviceEvent::Status(status)).await.is_err() {
                            break;
                        }
                    }
                });

                Ok(DirectIoReply::status_only(0))
            }
            other => Err(PosError::DirectIoUndefined { opcode: other }),
        }
    }

    fn take_events(&mut self) -> Result<mpsc::Receiver<DeviceEvent>> {
        self.events_rx
            .take()
            .ok_or_else(|| PosError::transport("event stream already taken"))
    }

    fn is_claimed(&self) -> bool {
        self.permit.is_some()
    }

    fn info(&self) -> DeviceInfo {
        DeviceInfo::new(self.name.clone(), self.model.clone())
    }
}

/// Handle for driving a mock scanner from tests or a simulation task.
///
/// The handle plays the role of the physical device: it injects scans,
/// statuses, and errors, configures firmware behavior, and can create
/// additional ports bound to the same physical device.
#[derive(Debug)]
pub struct MockScannerHandle {
    shared: Arc<ScannerShared>,
    ports: Vec<mpsc::Sender<DeviceEvent>>,
    name: String,
    model: String,
}

impl MockScannerHandle {
    /// Simulate one physical scan.
    ///
    /// # Errors
    ///
    /// Returns an error if no port is left to deliver to.
    pub async fn push_scan(
        &mut self,
        payload: Vec<u8>,
        label: Vec<u8>,
        symbology: Symbology,
    ) -> Result<()> {
        self.shared.scan_count.fetch_add(1, Ordering::Relaxed);
        self.shared
            .last_data_type
            .store(symbology.to_raw(), Ordering::Relaxed);

        let scan = ScanData::new(payload, label, symbology.to_raw());
        self.broadcast(DeviceEvent::Data(scan)).await
    }

    /// Simulate a status update (power state, firmware progress, ...).
    pub async fn push_status(&mut self, status: StatusCode) -> Result<()> {
        self.broadcast(DeviceEvent::Status(status)).await
    }

    /// Simulate an asynchronous device error.
    pub async fn push_error(&mut self, report: ErrorReport) -> Result<()> {
        self.broadcast(DeviceEvent::Error(report)).await
    }

    /// Set the status sequence the next firmware update will emit.
    ///
    /// The script is consumed by one update; without a script a default
    /// progress-then-complete sequence is used.
    pub fn script_firmware_update(&self, script: Vec<StatusCode>) {
        *self.shared.firmware_script.lock().expect("script poisoned") = Some(script);
    }

    /// Set the result the next firmware comparison will report.
    pub fn set_firmware_comparison(&self, comparison: FirmwareComparison) {
        *self.shared.comparison.lock().expect("comparison poisoned") = comparison;
    }

    /// Number of scans pushed since creation.
    pub fn scan_count(&self) -> i32 {
        self.shared.scan_count.load(Ordering::Relaxed)
    }

    /// Create another port on the same physical device.
    ///
    /// The new port shares the claim token, so it can be used to exercise
    /// claim contention and forced-teardown scenarios.
    pub fn port(&mut self) -> MockScanner {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        self.ports.push(events_tx.clone());

        MockScanner {
            shared: Arc::clone(&self.shared),
            events_tx,
            events_rx: Some(events_rx),
            name: self.name.clone(),
            model: self.model.clone(),
            attached: false,
            enabled: false,
            permit: None,
        }
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn broadcast(&mut self, event: DeviceEvent) -> Result<()> {
        let mut open = Vec::with_capacity(self.ports.len());
        let mut delivered = false;

        for tx in self.ports.drain(..) {
            if tx.send(event.clone()).await.is_ok() {
                delivered = true;
                open.push(tx);
            }
        }
        self.ports = open;

        if delivered {
            Ok(())
        } else {
            Err(PosError::transport("scanner event channel closed"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanekit_core::ErrorCode;

    #[tokio::test]
    async fn test_mock_scanner_push_and_receive() {
        let (mut scanner, mut handle) = MockScanner::new();
        scanner.attach().await.unwrap();
        let mut events = scanner.take_events().unwrap();

        handle
            .push_scan(vec![0x41, 0x42], vec![0x41, 0x42], Symbology::Code128)
            .await
            .unwrap();

        match events.recv().await.unwrap() {
            DeviceEvent::Data(scan) => {
                assert_eq!(scan.payload.as_ref(), &[0x41, 0x42]);
                assert_eq!(scan.symbology(), Symbology::Code128);
            }
            other => panic!("expected data event, got {:?}", other),
        }

        assert_eq!(handle.scan_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_scanner_double_attach_fails() {
        let (mut scanner, _handle) = MockScanner::new();
        scanner.attach().await.unwrap();
        assert!(matches!(
            scanner.attach().await,
            Err(PosError::AlreadyOpen { .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_scanner_claim_contention() {
        let (mut first, mut handle) = MockScanner::new();
        let mut second = handle.port();

        first.attach().await.unwrap();
        second.attach().await.unwrap();

        first.claim(Duration::from_millis(50)).await.unwrap();
        assert!(first.is_claimed());

        // Second port cannot claim while the first holds the token; the
        // call fails with a timeout instead of blocking forever.
        let err = second.claim(Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, PosError::Timeout { .. }));

        first.release().unwrap();
        second.claim(Duration::from_millis(50)).await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_scanner_detach_releases_claim() {
        let (mut first, mut handle) = MockScanner::new();
        let mut second = handle.port();

        first.attach().await.unwrap();
        first.claim(Duration::from_millis(50)).await.unwrap();

        first.detach();

        second.attach().await.unwrap();
        second.claim(Duration::from_millis(50)).await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_scanner_enable_requires_claim() {
        let (mut scanner, _handle) = MockScanner::new();
        scanner.attach().await.unwrap();

        assert!(matches!(
            scanner.set_enabled(true).await,
            Err(PosError::NotClaimed)
        ));

        scanner.claim(Duration::from_millis(50)).await.unwrap();
        scanner.set_enabled(true).await.unwrap();
        assert!(scanner.is_enabled());
        // Disabling twice is fine.
        scanner.set_enabled(false).await.unwrap();
        scanner.set_enabled(false).await.unwrap();
        assert!(!scanner.is_enabled());
    }

    #[tokio::test]
    async fn test_mock_scanner_direct_io_quantity_and_type() {
        let (mut scanner, mut handle) = MockScanner::new();
        scanner.attach().await.unwrap();
        let _events = scanner.take_events().unwrap();

        handle
            .push_scan(vec![0x01], vec![0x01], Symbology::Ean13)
            .await
            .unwrap();
        handle
            .push_scan(vec![0x02], vec![0x02], Symbology::Ean13)
            .await
            .unwrap();

        let reply = scanner
            .direct_io(DIO_RETURN_QUANTITY, &[])
            .await
            .unwrap();
        assert_eq!(reply.status, 2);

        let reply = scanner
            .direct_io(DIO_RETURN_DATA_TYPE, &[])
            .await
            .unwrap();
        assert_eq!(reply.status, i32::from(Symbology::Ean13.to_raw()));
    }

    #[tokio::test]
    async fn test_mock_scanner_unknown_opcode() {
        let (mut scanner, _handle) = MockScanner::new();
        scanner.attach().await.unwrap();

        let err = scanner.direct_io(0xDEAD, &[]).await.unwrap_err();
        assert!(matches!(err, PosError::DirectIoUndefined { opcode: 0xDEAD }));
        assert_eq!(err.error_code(), ErrorCode::DioUndefined);
    }

    #[tokio::test]
    async fn test_mock_scanner_firmware_update_requires_claim() {
        let (mut scanner, _handle) = MockScanner::new();
        scanner.attach().await.unwrap();

        let err = scanner
            .direct_io(DIO_UPDATE_FIRMWARE, &[0x53, 0x37])
            .await
            .unwrap_err();
        assert!(matches!(err, PosError::DirectIoNotAllowed { .. }));
    }

    #[tokio::test]
    async fn test_mock_scanner_firmware_update_emits_script() {
        let (mut scanner, handle) = MockScanner::new();
        scanner.attach().await.unwrap();
        scanner.claim(Duration::from_millis(50)).await.unwrap();
        let mut events = scanner.take_events().unwrap();

        handle.script_firmware_update(vec![
            StatusCode::FirmwareProgress(40),
            StatusCode::FirmwareProgress(80),
            StatusCode::FirmwareComplete,
        ]);

        scanner
            .direct_io(DIO_UPDATE_FIRMWARE, &[0x53, 0x37])
            .await
            .unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            match events.recv().await.unwrap() {
                DeviceEvent::Status(status) => seen.push(status),
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert_eq!(
            seen,
            vec![
                StatusCode::FirmwareProgress(40),
                StatusCode::FirmwareProgress(80),
                StatusCode::FirmwareComplete,
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_scanner_firmware_comparison() {
        let (mut scanner, handle) = MockScanner::new();
        scanner.attach().await.unwrap();
        scanner.claim(Duration::from_millis(50)).await.unwrap();

        handle.set_firmware_comparison(FirmwareComparison::Newer);
        let reply = scanner
            .direct_io(DIO_COMPARE_FIRMWARE, &[0x53, 0x37])
            .await
            .unwrap();
        assert_eq!(
            FirmwareComparison::from_raw(reply.status),
            FirmwareComparison::Newer
        );
    }
}
