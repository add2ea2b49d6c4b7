//! The device session controller.
//!
//! A [`Session`] owns one peripheral connection for its lifetime: it
//! enforces the legal lifecycle sequence (open, claim, enable, disable,
//! release, close), dispatches data/status/error events to registered
//! subscribers, forwards vendor extension calls, and guarantees resource
//! release on every exit path.
//!
//! # Event dispatch
//!
//! Events are delivered on a dedicated dispatch task, never on the thread
//! that issued `open` or `claim`. Within one subscriber, delivery order
//! matches the order the device produced events; no ordering is guaranteed
//! between different event kinds.
//!
//! # The data-event re-arm contract
//!
//! Devices auto-clear the data-event flag after every delivered data
//! event. The consumer must call
//! [`set_data_events_enabled(true)`](Session::set_data_events_enabled)
//! inside its data handler, every time, or delivery stops silently while
//! events pile up in the backlog (visible via [`Session::data_count`]).
//! The controller deliberately never re-arms on the caller's behalf.
//!
//! # Examples
//!
//! ```
//! use lanekit_core::{DeviceEvent, EventKind, ProfileName, Symbology};
//! use lanekit_hardware::{AnyDeviceService, MockScanner};
//! use lanekit_session::Session;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> lanekit_core::Result<()> {
//!     let (scanner, mut hw) = MockScanner::new();
//!     let profile = ProfileName::new("LK-Gryphon-4500-USB")?;
//!     let session = Session::open(AnyDeviceService::Scanner(scanner), profile).await?;
//!
//!     let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//!     let rearm = session.clone();
//!     session.subscribe(EventKind::Data, move |event| {
//!         // Re-arm first, then hand the event to the application.
//!         let _ = rearm.set_data_events_enabled(true);
//!         let _ = tx.send(event);
//!     });
//!
//!     session.claim(Duration::from_millis(1000)).await?;
//!     session.set_enabled(true).await?;
//!     session.set_data_events_enabled(true)?;
//!
//!     hw.push_scan(vec![0x41, 0x42], vec![0x41, 0x42], Symbology::Code128).await?;
//!     let event = rx.recv().await.unwrap();
//!     assert!(matches!(event, DeviceEvent::Data(_)));
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```

use crate::listeners::{EventCallback, ListenerRegistry, SubscriptionId};
use crate::state::{SessionState, StateMachine};
use lanekit_core::{
    DeviceEvent, DirectIoReply, EventKind, PosError, ProfileName, Result, ScanData,
};
use lanekit_hardware::{AnyDeviceService, DeviceInfo, DeviceService};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Consumer-visible control flags and the data backlog.
#[derive(Debug)]
struct ControlState {
    machine: StateMachine,
    data_events_armed: bool,
    pending_data: VecDeque<ScanData>,
}

struct SessionCore {
    profile: ProfileName,
    control: Mutex<ControlState>,
    registry: Mutex<ListenerRegistry>,
    device: AsyncMutex<AnyDeviceService>,
    /// Nudges the dispatch task after a re-arm so queued data delivers on
    /// the dispatch context, not on the caller's thread. Shared with the
    /// dispatch task directly: the task itself only holds a `Weak` core
    /// reference, so dropping the last session handle tears everything
    /// down even when `close` was never called.
    rearm: Arc<Notify>,
    dispatch: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for SessionCore {
    fn drop(&mut self) {
        if let Ok(mut dispatch) = self.dispatch.lock()
            && let Some(handle) = dispatch.take()
        {
            handle.abort();
        }

        // Last-resort teardown for sessions dropped without close().
        let device = self.device.get_mut();
        if device.is_claimed() {
            let _ = device.release();
        }
        device.detach();
    }
}

/// Handle to one device session.
///
/// Cheaply cloneable; clones share the same underlying session, which is
/// how a data handler gets access to
/// [`set_data_events_enabled`](Session::set_data_events_enabled).
#[derive(Clone)]
pub struct Session {
    core: Arc<SessionCore>,
}

impl Session {
    /// Open a session: bind to the device port and start event dispatch.
    ///
    /// Must be the first operation. On failure nothing is left attached.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The device port is already attached to another session
    /// - The transport cannot reach the device
    pub async fn open(mut device: AnyDeviceService, profile: ProfileName) -> Result<Self> {
        device.attach().await?;
        let events = match device.take_events() {
            Ok(events) => events,
            Err(e) => {
                device.detach();
                return Err(e);
            }
        };

        let mut machine = StateMachine::new();
        machine.transition_to(SessionState::Opened)?;

        let rearm = Arc::new(Notify::new());
        let core = Arc::new(SessionCore {
            profile,
            control: Mutex::new(ControlState {
                machine,
                data_events_armed: false,
                pending_data: VecDeque::new(),
            }),
            registry: Mutex::new(ListenerRegistry::new()),
            device: AsyncMutex::new(device),
            rearm: Arc::clone(&rearm),
            dispatch: Mutex::new(None),
        });

        let task = tokio::spawn(Self::dispatch_loop(
            Arc::downgrade(&core),
            rearm,
            events,
        ));
        *core.dispatch.lock().expect("dispatch lock poisoned") = Some(task);

        info!(profile = %core.profile, "session opened");
        Ok(Self { core })
    }

    /// The logical profile this session is bound to.
    pub fn profile(&self) -> &ProfileName {
        &self.core.profile
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.lock_control().machine.current_state()
    }

    /// Number of data events queued but not yet delivered.
    ///
    /// Grows when the consumer stops re-arming data events.
    pub fn data_count(&self) -> usize {
        self.lock_control().pending_data.len()
    }

    /// Whether the data-event flag is currently armed.
    pub fn data_events_enabled(&self) -> bool {
        self.lock_control().data_events_armed
    }

    /// Device information from the bound service.
    pub async fn info(&self) -> DeviceInfo {
        self.core.device.lock().await.info()
    }

    /// Exclusively acquire the physical device, blocking up to `timeout`.
    ///
    /// On timeout the session remains `Opened`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The session is closed or already holds the claim
    /// - Another owner holds the claim past `timeout`
    pub async fn claim(&self, timeout: Duration) -> Result<()> {
        {
            let control = self.lock_control();
            match control.machine.current_state() {
                SessionState::Opened => {}
                SessionState::Closed => return Err(PosError::Closed),
                _ => return Err(PosError::already_claimed(self.core.profile.as_str())),
            }
        }

        let mut device = self.core.device.lock().await;
        device.claim(timeout).await?;

        let transition = self
            .lock_control()
            .machine
            .transition_to(SessionState::Claimed);
        if let Err(e) = transition {
            // State changed underneath us (e.g. concurrent close); give the
            // claim straight back.
            let _ = device.release();
            return Err(e);
        }

        debug!(profile = %self.core.profile, "device claimed");
        Ok(())
    }

    /// Toggle whether the device may produce events. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed, or enabling is requested
    /// without holding the claim.
    pub async fn set_enabled(&self, enabled: bool) -> Result<()> {
        {
            let control = self.lock_control();
            match (control.machine.current_state(), enabled) {
                (SessionState::Closed, _) => return Err(PosError::Closed),
                (SessionState::Opened, _) => return Err(PosError::NotClaimed),
                (SessionState::Enabled, true) => return Ok(()),
                (SessionState::Claimed | SessionState::Disabled, false) => return Ok(()),
                _ => {}
            }
        }

        let mut device = self.core.device.lock().await;
        device.set_enabled(enabled).await?;

        let target = if enabled {
            SessionState::Enabled
        } else {
            SessionState::Disabled
        };
        self.lock_control().machine.transition_to(target)?;

        debug!(profile = %self.core.profile, enabled, "device enable toggled");
        Ok(())
    }

    /// Arm or disarm delivery of data events.
    ///
    /// Arming delivers at most one queued or future data event, after
    /// which the flag auto-clears; see the module documentation for the
    /// re-arm contract. Disarming stops delivery; events keep queuing.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed.
    pub fn set_data_events_enabled(&self, enabled: bool) -> Result<()> {
        {
            let mut control = self.lock_control();
            if control.machine.current_state() == SessionState::Closed {
                return Err(PosError::Closed);
            }
            control.data_events_armed = enabled;
        }
        if enabled {
            self.core.rearm.notify_one();
        }
        Ok(())
    }

    /// Relinquish the exclusive claim without closing the session.
    ///
    /// If the device is still enabled it is disabled first, best-effort.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim is not held.
    pub async fn release(&self) -> Result<()> {
        let state = self.state();
        match state {
            SessionState::Closed => return Err(PosError::Closed),
            SessionState::Opened => return Err(PosError::NotClaimed),
            _ => {}
        }

        let mut device = self.core.device.lock().await;

        if state == SessionState::Enabled {
            if let Err(e) = device.set_enabled(false).await {
                warn!(profile = %self.core.profile, error = %e, "disable before release failed");
            }
            let _ = self
                .lock_control()
                .machine
                .transition_to(SessionState::Disabled);
        }

        device.release()?;
        self.lock_control()
            .machine
            .transition_to(SessionState::Opened)?;

        debug!(profile = %self.core.profile, "device released");
        Ok(())
    }

    /// Close the session. Always safe, idempotent, and infallible.
    ///
    /// From a non-`Opened` state the skipped disable/release steps are
    /// performed best-effort; their individual failures are logged and
    /// ignored so teardown always completes.
    pub async fn close(&self) {
        let previous = {
            let mut control = self.lock_control();
            let previous = control.machine.current_state();
            if previous == SessionState::Closed {
                return;
            }
            // Mark closed first so no further events deliver.
            let _ = control.machine.transition_to(SessionState::Closed);
            control.data_events_armed = false;
            control.pending_data.clear();
            previous
        };

        let mut device = self.core.device.lock().await;

        if previous == SessionState::Enabled {
            if let Err(e) = device.set_enabled(false).await {
                warn!(profile = %self.core.profile, error = %e, "disable during close failed");
            }
        }

        if previous.is_claimed()
            && let Err(e) = device.release()
        {
            warn!(profile = %self.core.profile, error = %e, "release during close failed");
        }

        device.detach();
        drop(device);

        if let Some(task) = self
            .core
            .dispatch
            .lock()
            .expect("dispatch lock poisoned")
            .take()
        {
            task.abort();
        }

        info!(profile = %self.core.profile, from = %previous, "session closed");
    }

    /// Register a callback for one event kind.
    ///
    /// Multiple subscribers per kind are permitted. Delivery order across
    /// subscribers is unspecified; delivery to a single subscriber is
    /// strictly ordered. Callbacks run on the dispatch task and must not
    /// block it.
    pub fn subscribe(
        &self,
        kind: EventKind,
        callback: impl Fn(DeviceEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.lock_registry()
            .subscribe(kind, Arc::new(callback) as EventCallback)
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock_registry().unsubscribe(id)
    }

    /// Forward a vendor extension opcode with an input buffer.
    ///
    /// The controller does not interpret opcodes; it forwards the call and
    /// surfaces the device's status and payload for the caller to decode.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or the device rejects the
    /// opcode.
    pub async fn direct_io(&self, opcode: u32, input: &[u8]) -> Result<DirectIoReply> {
        if self.state() == SessionState::Closed {
            return Err(PosError::Closed);
        }
        self.core.device.lock().await.direct_io(opcode, input).await
    }

    fn lock_control(&self) -> std::sync::MutexGuard<'_, ControlState> {
        self.core.control.lock().expect("control lock poisoned")
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, ListenerRegistry> {
        self.core.registry.lock().expect("registry lock poisoned")
    }

    /// Dispatch task: drains the device's raw event stream and invokes
    /// subscriber callbacks. Runs until the stream closes, the session is
    /// closed, or every session handle has been dropped.
    ///
    /// Holds only a `Weak` core reference across awaits; the core owns
    /// the device, and the device owns the event sender, so a strong
    /// reference here would keep an abandoned session alive forever.
    async fn dispatch_loop(
        weak: Weak<SessionCore>,
        rearm: Arc<Notify>,
        mut events: mpsc::Receiver<DeviceEvent>,
    ) {
        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    let Some(core) = weak.upgrade() else { break };
                    match maybe_event {
                        Some(event) => Self::route_event(&core, event),
                        None => break,
                    }
                    Self::deliver_pending(&core);
                }
                _ = rearm.notified() => {
                    let Some(core) = weak.upgrade() else { break };
                    Self::deliver_pending(&core);
                }
            }
        }
        trace!("dispatch loop terminated");
    }

    fn route_event(core: &Arc<SessionCore>, event: DeviceEvent) {
        match event {
            DeviceEvent::Data(scan) => {
                let mut control = core.control.lock().expect("control lock poisoned");
                if control.machine.current_state() != SessionState::Enabled {
                    trace!(profile = %core.profile, "dropping data event while not enabled");
                    return;
                }
                control.pending_data.push_back(scan);
            }
            other => {
                let state = core
                    .control
                    .lock()
                    .expect("control lock poisoned")
                    .machine
                    .current_state();
                if state == SessionState::Closed {
                    return;
                }
                let snapshot = core
                    .registry
                    .lock()
                    .expect("registry lock poisoned")
                    .snapshot(other.kind());
                for callback in snapshot {
                    callback(other.clone());
                }
            }
        }
    }

    /// Deliver queued data events, one per armed flag.
    ///
    /// The armed flag is cleared before each delivery; if the handler
    /// re-arms during the callback the loop picks up the next queued
    /// event, otherwise delivery stops here.
    fn deliver_pending(core: &Arc<SessionCore>) {
        loop {
            let scan = {
                let mut control = core.control.lock().expect("control lock poisoned");
                if control.machine.current_state() != SessionState::Enabled
                    || !control.data_events_armed
                    || control.pending_data.is_empty()
                {
                    return;
                }
                control.data_events_armed = false;
                control
                    .pending_data
                    .pop_front()
                    .expect("pending queue checked non-empty")
            };

            let snapshot = core
                .registry
                .lock()
                .expect("registry lock poisoned")
                .snapshot(EventKind::Data);
            let event = DeviceEvent::Data(scan);
            for callback in snapshot {
                callback(event.clone());
            }
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("profile", &self.core.profile.as_str())
            .field("state", &self.state())
            .field("data_count", &self.data_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanekit_core::Symbology;
    use lanekit_hardware::MockScanner;

    async fn open_scanner() -> (Session, lanekit_hardware::MockScannerHandle) {
        let (scanner, handle) = MockScanner::new();
        let profile = ProfileName::new("LK-Test-Scanner").unwrap();
        let session = Session::open(AnyDeviceService::Scanner(scanner), profile)
            .await
            .unwrap();
        (session, handle)
    }

    #[tokio::test]
    async fn test_open_starts_in_opened_state() {
        let (session, _handle) = open_scanner().await;
        assert_eq!(session.state(), SessionState::Opened);
        assert_eq!(session.data_count(), 0);
    }

    #[tokio::test]
    async fn test_claim_before_open_order_enforced() {
        let (session, _handle) = open_scanner().await;

        // Enable before claim is rejected.
        assert!(matches!(
            session.set_enabled(true).await,
            Err(PosError::NotClaimed)
        ));

        session.claim(Duration::from_millis(100)).await.unwrap();
        assert_eq!(session.state(), SessionState::Claimed);

        // A second claim on the same session is rejected immediately.
        assert!(matches!(
            session.claim(Duration::from_millis(100)).await,
            Err(PosError::AlreadyClaimed { .. })
        ));
    }

    #[tokio::test]
    async fn test_enable_disable_idempotent() {
        let (session, _handle) = open_scanner().await;
        session.claim(Duration::from_millis(100)).await.unwrap();

        session.set_enabled(false).await.unwrap(); // no-op from Claimed
        session.set_enabled(true).await.unwrap();
        session.set_enabled(true).await.unwrap(); // no-op from Enabled
        assert_eq!(session.state(), SessionState::Enabled);

        session.set_enabled(false).await.unwrap();
        assert_eq!(session.state(), SessionState::Disabled);
        session.set_enabled(false).await.unwrap(); // no-op from Disabled
    }

    #[tokio::test]
    async fn test_release_from_enabled_disables_first() {
        let (session, _handle) = open_scanner().await;
        session.claim(Duration::from_millis(100)).await.unwrap();
        session.set_enabled(true).await.unwrap();

        session.release().await.unwrap();
        assert_eq!(session.state(), SessionState::Opened);

        assert!(matches!(
            session.release().await,
            Err(PosError::NotClaimed)
        ));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (session, _handle) = open_scanner().await;
        session.close().await;
        assert_eq!(session.state(), SessionState::Closed);
        session.close().await;
        assert_eq!(session.state(), SessionState::Closed);

        assert!(matches!(
            session.claim(Duration::from_millis(10)).await,
            Err(PosError::Closed)
        ));
        assert!(matches!(
            session.direct_io(0, &[]).await,
            Err(PosError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_drop_without_close_releases_claim() {
        let (scanner, mut handle) = MockScanner::new();
        let profile = ProfileName::new("LK-Dropped").unwrap();
        let session = Session::open(AnyDeviceService::Scanner(scanner), profile)
            .await
            .unwrap();
        session.claim(Duration::from_millis(100)).await.unwrap();

        drop(session);

        // The abandoned session released its claim and attachment.
        let mut port = handle.port();
        port.attach().await.unwrap();
        port.claim(Duration::from_millis(100)).await.unwrap();
    }

    #[tokio::test]
    async fn test_data_events_require_enabled_state() {
        let (session, mut handle) = open_scanner().await;
        session.claim(Duration::from_millis(100)).await.unwrap();
        session.set_data_events_enabled(true).unwrap();

        // Not enabled: the scan is dropped, not queued.
        handle
            .push_scan(vec![0x01], vec![0x01], Symbology::Ean13)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.data_count(), 0);
    }

    #[tokio::test]
    async fn test_unsubscribed_kind_is_silent() {
        let (session, mut handle) = open_scanner().await;
        session.claim(Duration::from_millis(100)).await.unwrap();
        session.set_enabled(true).await.unwrap();

        // No subscribers at all: delivery still consumes the armed flag.
        session.set_data_events_enabled(true).unwrap();
        handle
            .push_scan(vec![0x01], vec![0x01], Symbology::Ean13)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.data_count(), 0);
        assert!(!session.data_events_enabled());
    }
}
