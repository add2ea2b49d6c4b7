//! Mock RFID tag reader for testing and development.
//!
//! Maintains a programmable tag database. Single inventories and
//! continuous reading are both driven through vendor extension opcodes;
//! continuous mode runs on its own task and is stopped by the explicit
//! stop opcode, never by cancelling an in-flight call.

use crate::mock::scanner::EVENT_CHANNEL_CAPACITY;
use crate::traits::{DeviceInfo, DeviceService};
use lanekit_core::{
    DeviceEvent, DirectIoReply, ErrorReport, PosError, Result, ScanData, TagProtocol,
    constants::{
        DEFAULT_RFID_READ_INTERVAL_MS, DIO_RFID_READ_TAGS, DIO_RFID_START_READ,
        DIO_RFID_STOP_READ,
    },
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};

/// One simulated tag in the reader's field.
#[derive(Debug, Clone)]
pub struct MockTag {
    /// Tag identifier bytes.
    pub id: Vec<u8>,

    /// Tag protocol.
    pub protocol: TagProtocol,

    /// Tag user data bytes.
    pub user_data: Vec<u8>,
}

#[derive(Debug)]
struct RfidShared {
    claim: Arc<Semaphore>,
    tags: Mutex<Vec<MockTag>>,
    continuous: AtomicBool,
}

impl RfidShared {
    fn snapshot(&self) -> Vec<MockTag> {
        self.tags.lock().expect("tag database poisoned").clone()
    }
}

/// Mock RFID reader port.
#[derive(Debug)]
pub struct MockRfid {
    shared: Arc<RfidShared>,
    events_tx: mpsc::Sender<DeviceEvent>,
    events_rx: Option<mpsc::Receiver<DeviceEvent>>,
    name: String,
    model: String,
    attached: bool,
    enabled: bool,
    permit: Option<OwnedSemaphorePermit>,
}

impl MockRfid {
    /// Create a new mock RFID reader with the default name.
    pub fn new() -> (Self, MockRfidHandle) {
        Self::with_name("Mock RFID Reader".to_string())
    }

    /// Create a new mock RFID reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockRfidHandle) {
        let shared = Arc::new(RfidShared {
            claim: Arc::new(Semaphore::new(1)),
            tags: Mutex::new(Vec::new()),
            continuous: AtomicBool::new(false),
        });

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let reader = Self {
            shared: Arc::clone(&shared),
            events_tx: events_tx.clone(),
            events_rx: Some(events_rx),
            name: name.clone(),
            model: "Mock RFID Reader".to_string(),
            attached: false,
            enabled: false,
            permit: None,
        };

        let handle = MockRfidHandle {
            shared,
            events_tx,
            name,
        };

        (reader, handle)
    }

    /// Whether this port is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn require_attached(&self) -> Result<()> {
        if self.attached {
            Ok(())
        } else {
            Err(PosError::Closed)
        }
    }

    async fn emit_inventory(tx: &mpsc::Sender<DeviceEvent>, tags: &[MockTag]) -> bool {
        for tag in tags {
            let scan = ScanData::new(
                tag.id.clone(),
                tag.user_data.clone(),
                tag.protocol.to_raw(),
            );
            if tx.send(DeviceEvent::Data(scan)).await.is_err() {
                return false;
            }
        }
        true
    }

    fn parse_interval(input: &[u8]) -> Duration {
        if input.len() == 8 {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(input);
            Duration::from_millis(u64::from_le_bytes(raw))
        } else {
            Duration::from_millis(DEFAULT_RFID_READ_INTERVAL_MS)
        }
    }
}

impl DeviceService for MockRfid {
    async fn attach(&mut self) -> Result<()> {
        if self.attached {
            return Err(PosError::already_open(self.name.as_str()));
        }
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.shared.continuous.store(false, Ordering::Relaxed);
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
        if !enabled {
            // Disabling the reader also stops a continuous read in flight.
            self.shared.continuous.store(false, Ordering::Relaxed);
        }
        self.enabled = enabled;
        Ok(())
    }

    async fn direct_io(&mut self, opcode: u32, input: &[u8]) -> Result<DirectIoReply> {
        self.require_attached()?;
        match opcode {
            DIO_RFID_READ_TAGS => {
                if self.permit.is_none() {
                    return Err(PosError::DirectIoNotAllowed { opcode });
                }
                let tags = self.shared.snapshot();
                let count = tags.len() as i32;
                if !Self::emit_inventory(&self.events_tx, &tags).await {
                    return Err(PosError::transport("RFID event channel closed"));
                }
                Ok(DirectIoReply::status_only(count))
            }
            DIO_RFID_START_READ => {
                if self.permit.is_none() {
                    return Err(PosError::DirectIoNotAllowed { opcode });
                }
                if self.shared.continuous.swap(true, Ordering::Relaxed) {
                    return Err(PosError::busy(self.name.as_str()));
                }

                let interval = Self::parse_interval(input);
                let shared = Arc::clone(&self.shared);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    while shared.continuous.load(Ordering::Relaxed) {
                        let tags = shared.snapshot();
                        if !MockRfid::emit_inventory(&tx, &tags).await {
                            shared.continuous.store(false, Ordering::Relaxed);
                            break;
                        }
                        tokio::time::sleep(interval).await;
                    }
                });

                Ok(DirectIoReply::status_only(0))
            }
            DIO_RFID_STOP_READ => {
                // Stopping an already-stopped read is a no-op.
                self.shared.continuous.store(false, Ordering::Relaxed);
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

/// Handle for controlling a mock RFID reader's tag field.
#[derive(Debug, Clone)]
pub struct MockRfidHandle {
    shared: Arc<RfidShared>,
    events_tx: mpsc::Sender<DeviceEvent>,
    name: String,
}

impl MockRfidHandle {
    /// Place a tag in the reader's field.
    pub fn add_tag(&self, id: Vec<u8>, protocol: TagProtocol, user_data: Vec<u8>) {
        self.shared
            .tags
            .lock()
            .expect("tag database poisoned")
            .push(MockTag {
                id,
                protocol,
                user_data,
            });
    }

    /// Remove every tag from the field.
    pub fn clear_tags(&self) {
        self.shared
            .tags
            .lock()
            .expect("tag database poisoned")
            .clear();
    }

    /// Number of tags currently in the field.
    pub fn tag_count(&self) -> usize {
        self.shared.tags.lock().expect("tag database poisoned").len()
    }

    /// Whether a continuous read is running.
    pub fn is_reading(&self) -> bool {
        self.shared.continuous.load(Ordering::Relaxed)
    }

    /// Simulate an asynchronous device error.
    pub async fn push_error(&self, report: ErrorReport) -> Result<()> {
        self.events_tx
            .send(DeviceEvent::Error(report))
            .await
            .map_err(|_| PosError::transport("RFID event channel closed"))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
