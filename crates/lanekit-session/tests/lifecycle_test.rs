//! Integration tests for the full session lifecycle against mock devices.
//!
//! These tests exercise the controller end-to-end: open/claim/enable
//! ordering, claim contention between two ports of one physical device,
//! the data-event auto-clear contract, forced teardown, and the firmware
//! update sub-protocol.

use lanekit_core::{
    DeviceEvent, ErrorCode, ErrorReport, EventKind, PosError, ProfileName, StatusCode, Symbology,
    constants::DIO_UPDATE_FIRMWARE,
};
use lanekit_hardware::{AnyDeviceService, MockScanner, MockScannerHandle};
use lanekit_session::{FirmwareMonitor, FirmwareUpdate, Session, SessionState};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::timeout;

mod test_data {
    /// Standard claim timeout used across tests.
    pub const CLAIM_TIMEOUT_MS: u64 = 1000;

    /// Contended claim timeout, kept short so tests stay fast.
    pub const CONTENDED_TIMEOUT_MS: u64 = 100;

    /// Payload of the first simulated scan in the end-to-end scenario.
    pub const SCAN_AB: [u8; 2] = [0x41, 0x42];

    /// All-null payload that must still be delivered as a data event.
    pub const SCAN_NULLS: [u8; 2] = [0x00, 0x00];
}

async fn open_session(name: &str) -> (Session, MockScannerHandle) {
    let (scanner, handle) = MockScanner::new();
    let profile = ProfileName::new(name).unwrap();
    let session = Session::open(AnyDeviceService::Scanner(scanner), profile)
        .await
        .unwrap();
    (session, handle)
}

async fn recv_data(rx: &mut mpsc::UnboundedReceiver<DeviceEvent>) -> DeviceEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_open_then_close_leaves_no_device_held() {
    let (session, mut handle) = open_session("LK-Scanner-O").await;
    assert_eq!(session.state(), SessionState::Opened);

    // Close without ever claiming.
    session.close().await;
    assert_eq!(session.state(), SessionState::Closed);

    // The physical device is free: a fresh port can attach and claim.
    let port = handle.port();
    let profile = ProfileName::new("LK-Scanner-O").unwrap();
    let reopened = Session::open(AnyDeviceService::Scanner(port), profile)
        .await
        .unwrap();
    reopened
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();
    reopened.close().await;
}

#[tokio::test]
async fn test_second_claim_fails_with_timeout_not_hang() {
    let (first, mut handle) = open_session("LK-Contended").await;
    first
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();

    let port = handle.port();
    let profile = ProfileName::new("LK-Contended").unwrap();
    let second = Session::open(AnyDeviceService::Scanner(port), profile)
        .await
        .unwrap();

    let started = Instant::now();
    let err = second
        .claim(Duration::from_millis(test_data::CONTENDED_TIMEOUT_MS))
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, PosError::Timeout { .. }));
    // Bounded by the timeout, never an indefinite block.
    assert!(elapsed < Duration::from_millis(test_data::CONTENDED_TIMEOUT_MS * 10));
    // The failed claimant stays Opened.
    assert_eq!(second.state(), SessionState::Opened);

    first.close().await;
    second.close().await;
}

#[tokio::test]
async fn test_data_event_auto_clear_regression() {
    let (session, mut hw) = open_session("LK-AutoClear").await;
    session
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();
    session.set_enabled(true).await.unwrap();

    // Handler that does NOT re-arm.
    let (tx, mut rx) = mpsc::unbounded_channel();
    session.subscribe(EventKind::Data, move |event| {
        let _ = tx.send(event);
    });

    session.set_data_events_enabled(true).unwrap();

    hw.push_scan(vec![0x01], vec![0x01], Symbology::Ean13)
        .await
        .unwrap();
    hw.push_scan(vec![0x02], vec![0x02], Symbology::Ean13)
        .await
        .unwrap();
    hw.push_scan(vec![0x03], vec![0x03], Symbology::Ean13)
        .await
        .unwrap();

    // Exactly one event is delivered per arming of the flag.
    let first = recv_data(&mut rx).await;
    match first {
        DeviceEvent::Data(scan) => assert_eq!(scan.payload.as_ref(), &[0x01]),
        other => panic!("unexpected event {:?}", other),
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err(), "no further delivery without re-arm");
    assert!(!session.data_events_enabled());
    assert_eq!(session.data_count(), 2, "undelivered scans stay queued");

    // Re-arming releases exactly one more.
    session.set_data_events_enabled(true).unwrap();
    let second = recv_data(&mut rx).await;
    match second {
        DeviceEvent::Data(scan) => assert_eq!(scan.payload.as_ref(), &[0x02]),
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(session.data_count(), 1);

    session.close().await;
}

#[tokio::test]
async fn test_forced_close_from_enabled_is_complete() {
    let (session, mut handle) = open_session("LK-Forced").await;
    session
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();
    session.set_enabled(true).await.unwrap();
    session.set_data_events_enabled(true).unwrap();
    assert_eq!(session.state(), SessionState::Enabled);

    // Skip disable and release entirely.
    session.close().await;
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(session.data_count(), 0);

    // A subsequent open on the same physical device succeeds and can go
    // all the way to Enabled, proving the forced teardown released the
    // claim and the attachment.
    let port = handle.port();
    let profile = ProfileName::new("LK-Forced").unwrap();
    let reopened = Session::open(AnyDeviceService::Scanner(port), profile)
        .await
        .unwrap();
    reopened
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();
    reopened.set_enabled(true).await.unwrap();
    assert_eq!(reopened.state(), SessionState::Enabled);
    reopened.close().await;
}

#[tokio::test]
async fn test_end_to_end_scan_with_rearm_and_all_null_packet() {
    let (session, mut hw) = open_session("LK-EndToEnd").await;

    // Handler re-arms inside the callback, then forwards the event.
    let (tx, mut rx) = mpsc::unbounded_channel();
    let rearm = session.clone();
    session.subscribe(EventKind::Data, move |event| {
        let _ = rearm.set_data_events_enabled(true);
        let _ = tx.send(event);
    });

    session
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();
    session.set_enabled(true).await.unwrap();
    session.set_data_events_enabled(true).unwrap();

    hw.push_scan(
        test_data::SCAN_AB.to_vec(),
        test_data::SCAN_AB.to_vec(),
        Symbology::Code128,
    )
    .await
    .unwrap();

    match recv_data(&mut rx).await {
        DeviceEvent::Data(scan) => {
            assert_eq!(scan.payload.as_ref(), &test_data::SCAN_AB);
            assert_eq!(scan.symbology(), Symbology::Code128);
        }
        other => panic!("unexpected event {:?}", other),
    }

    // The handler re-armed, so an all-null scan is still delivered; what
    // to make of it is the consumer's formatter's business.
    hw.push_scan(test_data::SCAN_NULLS.to_vec(), vec![], Symbology::Unknown)
        .await
        .unwrap();

    match recv_data(&mut rx).await {
        DeviceEvent::Data(scan) => {
            assert_eq!(scan.payload.as_ref(), &test_data::SCAN_NULLS);
            assert!(scan.payload.iter().all(|&b| b == 0x00));
        }
        other => panic!("unexpected event {:?}", other),
    }

    assert_eq!(session.data_count(), 0);
    session.close().await;
}

#[tokio::test]
async fn test_firmware_update_progress_and_single_terminal() {
    let (session, hw) = open_session("LK-Firmware").await;
    session
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    session.subscribe(EventKind::Status, move |event| {
        let _ = tx.send(event);
    });

    hw.script_firmware_update(vec![
        StatusCode::FirmwareProgress(10),
        StatusCode::FirmwareProgress(45),
        StatusCode::FirmwareProgress(80),
        StatusCode::FirmwareProgress(95),
        StatusCode::FirmwareComplete,
    ]);

    session
        .direct_io(DIO_UPDATE_FIRMWARE, &[0x53, 0x37])
        .await
        .unwrap();

    let mut monitor = FirmwareMonitor::new();
    let mut progress = Vec::new();
    let outcome = loop {
        let event = recv_data(&mut rx).await;
        let status = match event {
            DeviceEvent::Status(status) => status,
            other => panic!("unexpected event {:?}", other),
        };
        match monitor.observe(status).unwrap() {
            FirmwareUpdate::Progress(pct) => progress.push(pct),
            FirmwareUpdate::Finished(outcome) => break outcome,
            FirmwareUpdate::Unrelated => {}
        }
    };

    // Strictly increasing percentages, then exactly one terminal status.
    assert_eq!(progress, vec![10, 45, 80, 95]);
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert!(!outcome.needs_operator());
    assert!(monitor.is_finished());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err(), "nothing follows the terminal status");

    session.close().await;
}

#[tokio::test]
async fn test_async_error_event_does_not_change_state() {
    let (session, mut hw) = open_session("LK-Errors").await;
    session
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();
    session.set_enabled(true).await.unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    session.subscribe(EventKind::Error, move |event| {
        let _ = tx.send(event);
    });

    hw.push_error(ErrorReport::new(
        ErrorCode::Failure,
        ErrorCode::CheckDigit,
        ErrorCode::Success,
    ))
    .await
    .unwrap();

    match recv_data(&mut rx).await {
        DeviceEvent::Error(report) => {
            assert_eq!(report.code, ErrorCode::Failure);
            assert_eq!(report.labels().1, "ERR_CHECKDIGIT");
        }
        other => panic!("unexpected event {:?}", other),
    }

    // The session decides nothing on the consumer's behalf.
    assert_eq!(session.state(), SessionState::Enabled);

    session.close().await;
}

#[tokio::test]
async fn test_multiple_subscribers_each_receive_ordered_stream() {
    let (session, mut hw) = open_session("LK-Fanout").await;

    let (tx_a, mut rx_a) = mpsc::unbounded_channel();
    let (tx_b, mut rx_b) = mpsc::unbounded_channel();
    let rearm = session.clone();
    session.subscribe(EventKind::Data, move |event| {
        let _ = rearm.set_data_events_enabled(true);
        let _ = tx_a.send(event);
    });
    session.subscribe(EventKind::Data, move |event| {
        let _ = tx_b.send(event);
    });

    session
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();
    session.set_enabled(true).await.unwrap();
    session.set_data_events_enabled(true).unwrap();

    for payload in [vec![0x01], vec![0x02], vec![0x03]] {
        hw.push_scan(payload.clone(), payload, Symbology::Code39)
            .await
            .unwrap();
    }

    for rx in [&mut rx_a, &mut rx_b] {
        for expected in [0x01u8, 0x02, 0x03] {
            match recv_data(rx).await {
                DeviceEvent::Data(scan) => assert_eq!(scan.payload.as_ref(), &[expected]),
                other => panic!("unexpected event {:?}", other),
            }
        }
    }

    session.close().await;
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
    let (session, mut hw) = open_session("LK-Unsub").await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = session.subscribe(EventKind::Status, move |event| {
        let _ = tx.send(event);
    });

    session
        .claim(Duration::from_millis(test_data::CLAIM_TIMEOUT_MS))
        .await
        .unwrap();

    hw.push_status(StatusCode::PowerOnline).await.unwrap();
    assert!(matches!(
        recv_data(&mut rx).await,
        DeviceEvent::Status(StatusCode::PowerOnline)
    ));

    assert!(session.unsubscribe(id));
    hw.push_status(StatusCode::PowerOffline).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(rx.try_recv().is_err());

    session.close().await;
}
