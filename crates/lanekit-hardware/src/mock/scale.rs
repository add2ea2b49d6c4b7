//! Mock weighing scale for testing and development.
//!
//! Live weight is reported through status events, the way real POS scales
//! notify weight changes; the current reading, unit, and capacity are
//! queried through vendor extension opcodes.

use crate::mock::scanner::EVENT_CHANNEL_CAPACITY;
use crate::traits::{DeviceInfo, DeviceService};
use lanekit_core::{
    DeviceEvent, DirectIoReply, ErrorReport, PosError, Result, StatusCode, WeightUnit,
    constants::{DIO_SCALE_CAPACITY, DIO_SCALE_LIVE_WEIGHT, DIO_SCALE_WEIGHT_UNIT},
};
use std::sync::{
    Arc,
    atomic::{AtomicI32, AtomicU16, Ordering},
};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc};

/// Default scale capacity: 15 kg expressed in centigrams.
const DEFAULT_CAPACITY_CG: i32 = 1_500_000;

#[derive(Debug)]
struct ScaleShared {
    claim: Arc<Semaphore>,
    live_weight_cg: AtomicI32,
    unit: AtomicU16,
    capacity_cg: AtomicI32,
}

/// Mock weighing scale port.
#[derive(Debug)]
pub struct MockScale {
    shared: Arc<ScaleShared>,
    events_rx: Option<mpsc::Receiver<DeviceEvent>>,
    name: String,
    model: String,
    attached: bool,
    enabled: bool,
    permit: Option<OwnedSemaphorePermit>,
}

impl MockScale {
    /// Create a new mock scale with the default name, unit, and capacity.
    pub fn new() -> (Self, MockScaleHandle) {
        Self::with_config(
            "Mock Scale".to_string(),
            "Mock Scale".to_string(),
            WeightUnit::Pound,
            DEFAULT_CAPACITY_CG,
        )
    }

    /// Create a new mock scale with explicit configuration.
    pub fn with_config(
        name: String,
        model: String,
        unit: WeightUnit,
        capacity_cg: i32,
    ) -> (Self, MockScaleHandle) {
        let shared = Arc::new(ScaleShared {
            claim: Arc::new(Semaphore::new(1)),
            live_weight_cg: AtomicI32::new(0),
            unit: AtomicU16::new(unit.to_raw()),
            capacity_cg: AtomicI32::new(capacity_cg),
        });

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let scale = Self {
            shared: Arc::clone(&shared),
            events_rx: Some(events_rx),
            name: name.clone(),
            model,
            attached: false,
            enabled: false,
            permit: None,
        };

        let handle = MockScaleHandle {
            shared,
            events_tx,
            name,
        };

        (scale, handle)
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
}

impl DeviceService for MockScale {
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

    async fn direct_io(&mut self, opcode: u32, _input: &[u8]) -> Result<DirectIoReply> {
        self.require_attached()?;
        match opcode {
            DIO_SCALE_LIVE_WEIGHT => Ok(DirectIoReply::status_only(
                self.shared.live_weight_cg.load(Ordering::Relaxed),
            )),
            DIO_SCALE_WEIGHT_UNIT => Ok(DirectIoReply::status_only(i32::from(
                self.shared.unit.load(Ordering::Relaxed),
            ))),
            DIO_SCALE_CAPACITY => Ok(DirectIoReply::status_only(
                self.shared.capacity_cg.load(Ordering::Relaxed),
            )),
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

/// Handle for driving a mock scale.
#[derive(Debug)]
pub struct MockScaleHandle {
    shared: Arc<ScaleShared>,
    events_tx: mpsc::Sender<DeviceEvent>,
    name: String,
}

impl MockScaleHandle {
    /// Place a weight on the platter.
    ///
    /// Stores the reading and emits the matching live-weight status event:
    /// under-zero, zero, over-capacity, or stable.
    pub async fn push_weight(&self, weight_cg: i32) -> Result<()> {
        self.shared
            .live_weight_cg
            .store(weight_cg, Ordering::Relaxed);

        let capacity = self.shared.capacity_cg.load(Ordering::Relaxed);
        let status = if weight_cg < 0 {
            StatusCode::WeightUnderZero
        } else if weight_cg == 0 {
            StatusCode::WeightZero
        } else if weight_cg > capacity {
            StatusCode::WeightOverweight
        } else {
            StatusCode::WeightStable
        };

        self.send(DeviceEvent::Status(status)).await
    }

    /// Report an unstable reading without changing the stored weight.
    pub async fn push_unstable(&self) -> Result<()> {
        self.send(DeviceEvent::Status(StatusCode::WeightUnstable)).await
    }

    /// Report that the scale is not ready to weigh.
    pub async fn push_not_ready(&self) -> Result<()> {
        self.send(DeviceEvent::Status(StatusCode::ScaleNotReady)).await
    }

    /// Simulate an asynchronous device error.
    pub async fn push_error(&self, report: ErrorReport) -> Result<()> {
        self.send(DeviceEvent::Error(report)).await
    }

    /// Current stored reading in centigrams.
    pub fn live_weight_cg(&self) -> i32 {
        self.shared.live_weight_cg.load(Ordering::Relaxed)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, event: DeviceEvent) -> Result<()> {
        self.events_tx
            .send(event)
            .await
            .map_err(|_| PosError::transport("scale event channel closed"))
    }
}
