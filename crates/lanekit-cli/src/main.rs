//! Example programs driving point-of-sale peripherals through lanekit
//! device sessions.
//!
//! Each subcommand reproduces one classic peripheral demo: watching a
//! scanner, reading live weight from a scale, single/continuous RFID
//! inventories, and a firmware compare-and-update flow. Devices are
//! simulated; a background task plays the physical hardware while the
//! foreground drives the session exactly as an application would.

mod cli;
mod output;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Commands};
use lanekit_core::{
    DeviceEvent, DeviceKind, EventKind, FirmwareComparison, FirmwareOutcome, ProfileName,
    StatusCode, Symbology, WeightUnit,
    constants::{
        DIO_COMPARE_FIRMWARE, DIO_RETURN_QUANTITY, DIO_RFID_READ_TAGS, DIO_RFID_START_READ,
        DIO_RFID_STOP_READ, DIO_SCALE_LIVE_WEIGHT, DIO_SCALE_WEIGHT_UNIT, DIO_UPDATE_FIRMWARE,
    },
};
use lanekit_hardware::{AnyDeviceService, AnyMockHandle, mock};
use lanekit_profiles::ProfileStore;
use lanekit_session::{FirmwareMonitor, FirmwareUpdate, Session};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Guard on every event wait so a wedged simulation cannot hang the demo.
const EVENT_WAIT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = match &cli.profiles {
        Some(path) => ProfileStore::load(path)
            .with_context(|| format!("failed to load profile store {}", path.display()))?,
        None => ProfileStore::demo(),
    };

    match cli.command {
        Commands::Watch {
            profile,
            scans,
            claim_timeout_ms,
        } => run_watch(&store, &profile, scans, claim_timeout_ms).await,
        Commands::Weigh { profile, readings } => run_weigh(&store, &profile, readings).await,
        Commands::Rfid {
            profile,
            continuous,
            interval_ms,
            rounds,
        } => run_rfid(&store, &profile, continuous, interval_ms, rounds).await,
        Commands::Firmware {
            profile,
            file,
            assume,
            outcome,
            force,
        } => {
            run_firmware(
                &store,
                &profile,
                &file,
                assume.into(),
                outcome.into(),
                force,
            )
            .await
        }
        Commands::Profiles => {
            list_profiles(&store);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn list_profiles(store: &ProfileStore) {
    if store.is_empty() {
        println!("No profiles configured.");
        return;
    }
    for name in store.names() {
        if let Ok(binding) = store.resolve(name) {
            let model = binding.model.as_deref().unwrap_or("-");
            println!("{}  kind={}  model={}", name, binding.kind, model);
        }
    }
}

/// Resolve a profile and build the matching simulated device.
fn build_device(
    store: &ProfileStore,
    profile: &str,
    expected: DeviceKind,
) -> anyhow::Result<(AnyDeviceService, AnyMockHandle, ProfileName)> {
    let name = ProfileName::new(profile)?;
    let binding = store.resolve(&name)?;
    if binding.kind != expected {
        bail!(
            "profile {} is a {} profile, expected {}",
            name,
            binding.kind,
            expected
        );
    }
    let (device, handle) = mock::build(&name, binding);
    Ok((device, handle, name))
}

/// Bring the session up: claim, enable, optionally arm data events.
///
/// On any failure the session is closed before the error is returned, so
/// a failed startup never leaks a claim.
async fn connect(
    session: &Session,
    claim_timeout: Duration,
    data_events: bool,
) -> anyhow::Result<()> {
    if let Err(e) = session.claim(claim_timeout).await {
        session.close().await;
        return Err(anyhow::Error::new(e).context("failed to claim device"));
    }
    if let Err(e) = session.set_enabled(true).await {
        session.close().await;
        return Err(anyhow::Error::new(e).context("failed to enable device"));
    }
    if data_events && let Err(e) = session.set_data_events_enabled(true) {
        session.close().await;
        return Err(anyhow::Error::new(e).context("failed to enable data events"));
    }
    Ok(())
}

/// Tear the session down in reverse acquisition order, best effort.
async fn disconnect(session: &Session) {
    if let Err(e) = session.set_data_events_enabled(false) {
        warn!(error = %e, "disabling data events during disconnect failed");
    }
    if let Err(e) = session.set_enabled(false).await {
        warn!(error = %e, "disable during disconnect failed");
    }
    if let Err(e) = session.release().await {
        warn!(error = %e, "release during disconnect failed");
    }
    session.close().await;
}

// ============================================================================
// watch
// ============================================================================

/// Demo scans the simulated cashier runs across the scanner, including one
/// all-null packet so the invalid-packet rendering is visible.
const DEMO_SCANS: [(&[u8], Symbology); 5] = [
    (b"4902030100748", Symbology::Ean13),
    (b"LANEKIT-DEMO-0001", Symbology::Code128),
    (&[0x00, 0x00], Symbology::Unknown),
    (b"012345678905", Symbology::UpcA),
    (b"PDF417-SAMPLE-DATA", Symbology::Pdf417),
];

async fn run_watch(
    store: &ProfileStore,
    profile: &str,
    scans: u32,
    claim_timeout_ms: u64,
) -> anyhow::Result<()> {
    let (device, handle, name) = build_device(store, profile, DeviceKind::Scanner)?;
    let AnyMockHandle::Scanner(mut hw) = handle else {
        bail!("scanner profile built a non-scanner device");
    };

    println!("Connecting to scanner {}...", name);
    let session = Session::open(device, name)
        .await
        .context("failed to open scanner")?;

    let (data_tx, mut data_rx) = mpsc::unbounded_channel();
    let rearm = session.clone();
    session.subscribe(EventKind::Data, move |event| {
        // Re-enable data events before handing the scan over; the flag
        // auto-clears on every delivered data event.
        let _ = rearm.set_data_events_enabled(true);
        let _ = data_tx.send(event);
    });
    session.subscribe(EventKind::Error, |event| {
        if let DeviceEvent::Error(report) = event {
            let (code, extended, response) = report.labels();
            eprintln!("Error event occurred: {} : {} : {}", code, extended, response);
        }
    });
    session.subscribe(EventKind::Status, |event| {
        if let DeviceEvent::Status(status) = event {
            println!("Status update: {}", status);
        }
    });

    connect(&session, Duration::from_millis(claim_timeout_ms), true).await?;
    println!("Scanner connected.");

    // Simulated cashier.
    let simulation = tokio::spawn(async move {
        let _ = hw.push_status(StatusCode::PowerOnline).await;
        for i in 0..scans {
            tokio::time::sleep(Duration::from_millis(300)).await;
            let (payload, symbology) = DEMO_SCANS[i as usize % DEMO_SCANS.len()];
            if hw
                .push_scan(payload.to_vec(), payload.to_vec(), symbology)
                .await
                .is_err()
            {
                break;
            }
        }
    });

    let mut item_count = 0u32;
    while item_count < scans {
        let event = match timeout(EVENT_WAIT, data_rx.recv()).await {
            Ok(Some(event)) => event,
            _ => break,
        };
        let DeviceEvent::Data(scan) = event else {
            continue;
        };

        item_count += 1;
        println!("Item Count: {}", item_count);
        println!("Scan Data: {}", output::trim_unprintable(&scan.payload));
        println!("Scan Data Type: {}", scan.symbology());
        println!("Raw Data: {}", output::format_packet(&scan.payload));

        match session.direct_io(DIO_RETURN_QUANTITY, &[]).await {
            Ok(reply) => println!("DIO_RETURN_QUANTITY Result: {}", reply.status),
            Err(e) => eprintln!("DIO_RETURN_QUANTITY failed: {}", e),
        }
        println!("Data Count: {}", session.data_count());
        println!("{}", "*".repeat(68));
    }

    simulation.await.ok();
    println!("Disconnecting scanner...");
    disconnect(&session).await;
    println!("Scanner disconnected.");
    Ok(())
}

// ============================================================================
// weigh
// ============================================================================

async fn run_weigh(store: &ProfileStore, profile: &str, readings: u32) -> anyhow::Result<()> {
    let (device, handle, name) = build_device(store, profile, DeviceKind::Scale)?;
    let AnyMockHandle::Scale(hw) = handle else {
        bail!("scale profile built a non-scale device");
    };

    println!("Connecting to scale {}...", name);
    let session = Session::open(device, name)
        .await
        .context("failed to open scale")?;

    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    session.subscribe(EventKind::Status, move |event| {
        if let DeviceEvent::Status(status) = event {
            let _ = status_tx.send(status);
        }
    });

    connect(&session, Duration::from_millis(1000), false).await?;

    let unit = match session.direct_io(DIO_SCALE_WEIGHT_UNIT, &[]).await {
        Ok(reply) => WeightUnit::from_raw(reply.status as u16),
        Err(e) => {
            warn!(error = %e, "could not get scale unit, assuming pounds");
            WeightUnit::Pound
        }
    };
    println!("Scale connected. Unit: {}", unit);

    // Simulated shopper loading and unloading the platter.
    let simulation = tokio::spawn(async move {
        let sequence: [i32; 6] = [0, 45_359, 45_359 * 3, 2_000_000, -50, 0];
        for (i, weight) in sequence.into_iter().enumerate() {
            tokio::time::sleep(Duration::from_millis(250)).await;
            let pushed = if i == 2 {
                hw.push_unstable().await
            } else {
                hw.push_weight(weight).await
            };
            if pushed.is_err() {
                break;
            }
        }
    });

    let mut seen = 0u32;
    while seen < readings {
        let status = match timeout(EVENT_WAIT, status_rx.recv()).await {
            Ok(Some(status)) => status,
            _ => break,
        };
        seen += 1;
        match status {
            StatusCode::WeightStable => match session.direct_io(DIO_SCALE_LIVE_WEIGHT, &[]).await
            {
                Ok(reply) => {
                    println!("Stable Weight: {}", output::format_weight(reply.status, unit));
                }
                Err(e) => eprintln!("could not get weight data: {}", e),
            },
            StatusCode::WeightOverweight => println!("Over Weight: --.--"),
            StatusCode::WeightUnderZero => println!("Under Zero: --.--"),
            StatusCode::WeightUnstable => println!("Unstable Weight: --.--"),
            StatusCode::WeightZero => println!("Zero Weight: 0"),
            StatusCode::ScaleNotReady => println!("Scale not Ready: --.--"),
            _ => {}
        }
    }

    simulation.await.ok();
    println!("Disconnecting scale...");
    disconnect(&session).await;
    println!("Scale disconnected.");
    Ok(())
}

// ============================================================================
// rfid
// ============================================================================

async fn run_rfid(
    store: &ProfileStore,
    profile: &str,
    continuous: bool,
    interval_ms: u64,
    rounds: u32,
) -> anyhow::Result<()> {
    let (device, handle, name) = build_device(store, profile, DeviceKind::Rfid)?;
    let AnyMockHandle::Rfid(hw) = handle else {
        bail!("rfid profile built a non-rfid device");
    };

    // Tags sitting in the reader's field for the demo.
    hw.add_tag(
        vec![0x30, 0x08, 0x33, 0xB2, 0xDD, 0xD9, 0x01, 0x40],
        lanekit_core::TagProtocol::Epc1Gen2,
        vec![0xDE, 0xAD, 0xBE, 0xEF],
    );
    hw.add_tag(
        vec![0x04, 0xA1, 0xB2, 0xC3, 0xD4, 0xE5, 0xF6],
        lanekit_core::TagProtocol::Iso14443A,
        vec![],
    );

    println!("Connecting to RFID reader {}...", name);
    let session = Session::open(device, name)
        .await
        .context("failed to open RFID reader")?;

    let (data_tx, mut data_rx) = mpsc::unbounded_channel();
    let rearm = session.clone();
    session.subscribe(EventKind::Data, move |event| {
        let _ = rearm.set_data_events_enabled(true);
        let _ = data_tx.send(event);
    });
    session.subscribe(EventKind::Error, |event| {
        if let DeviceEvent::Error(report) = event {
            eprintln!("ErrorEvent: code = {}", report.code.label());
        }
    });

    connect(&session, Duration::from_millis(1000), true).await?;
    println!("RFID reader connected.");

    let expected = if continuous {
        println!("Starting continuous read mode...");
        let interval = interval_ms.to_le_bytes();
        session
            .direct_io(DIO_RFID_START_READ, &interval)
            .await
            .context("failed to start continuous read")?;
        (hw.tag_count() as u32) * rounds
    } else {
        let reply = session
            .direct_io(DIO_RFID_READ_TAGS, &[])
            .await
            .context("failed to start single read")?;
        println!("Tag Count = {}", reply.status);
        reply.status.max(0) as u32
    };

    println!("{}", output::tag_table_header());
    let mut received = 0u32;
    while received < expected {
        let event = match timeout(EVENT_WAIT, data_rx.recv()).await {
            Ok(Some(event)) => event,
            _ => break,
        };
        let DeviceEvent::Data(scan) = event else {
            continue;
        };
        println!(
            "{}",
            output::tag_table_row(
                received as usize,
                &scan.payload,
                scan.tag_protocol().label(),
                &scan.label,
            )
        );
        received += 1;
    }

    if continuous {
        println!("Stopping continuous read mode...");
        session
            .direct_io(DIO_RFID_STOP_READ, &[])
            .await
            .context("failed to stop continuous read")?;
    }

    println!("Disconnecting RFID reader...");
    disconnect(&session).await;
    println!("Exiting...");
    Ok(())
}

// ============================================================================
// firmware
// ============================================================================

async fn run_firmware(
    store: &ProfileStore,
    profile: &str,
    file: &std::path::Path,
    assume: FirmwareComparison,
    outcome: FirmwareOutcome,
    force: bool,
) -> anyhow::Result<()> {
    let image =
        std::fs::read(file).with_context(|| format!("File Not Found: {}", file.display()))?;
    if image.is_empty() {
        bail!("firmware image {} is empty", file.display());
    }

    let (device, handle, name) = build_device(store, profile, DeviceKind::Scanner)?;
    let AnyMockHandle::Scanner(hw) = handle else {
        bail!("scanner profile built a non-scanner device");
    };
    hw.set_firmware_comparison(assume);
    hw.script_firmware_update(firmware_script(outcome));

    println!("Connecting to scanner {}...", name);
    let session = Session::open(device, name)
        .await
        .context("failed to open scanner")?;

    let (status_tx, mut status_rx) = mpsc::unbounded_channel();
    session.subscribe(EventKind::Status, move |event| {
        if let DeviceEvent::Status(status) = event {
            let _ = status_tx.send(status);
        }
    });

    connect(&session, Duration::from_millis(1000), false).await?;

    let reply = session
        .direct_io(DIO_COMPARE_FIRMWARE, &image)
        .await
        .context("failed to compare firmware")?;
    let comparison = FirmwareComparison::from_raw(reply.status);

    let update = match comparison {
        FirmwareComparison::Newer => {
            println!(
                "The firmware in the file is newer than the firmware loaded in the device. \
                 Updating firmware..."
            );
            true
        }
        FirmwareComparison::Older => {
            println!(
                "The firmware in the file is older than the firmware loaded in the device. \
                 Updating firmware..."
            );
            true
        }
        FirmwareComparison::Same => {
            println!(
                "The firmware in the file is the same as what is already loaded in the \
                 device. Updating firmware..."
            );
            true
        }
        FirmwareComparison::Different => {
            println!(
                "The firmware in the file is different than the firmware in the device. \
                 In what way was unable to be determined."
            );
            force
        }
        FirmwareComparison::Unknown => {
            println!(
                "The firmware version in the file is unknown. Please contact your support \
                 representative."
            );
            force
        }
    };

    if !update {
        println!("Not updating. Pass --force to update anyway.");
        disconnect(&session).await;
        return Ok(());
    }

    session
        .direct_io(DIO_UPDATE_FIRMWARE, &image)
        .await
        .context("failed to start firmware update")?;

    let mut monitor = FirmwareMonitor::new();
    let final_outcome = loop {
        let status = match timeout(EVENT_WAIT, status_rx.recv()).await {
            Ok(Some(status)) => status,
            _ => bail!("firmware update produced no terminal status"),
        };
        match monitor.observe(status)? {
            FirmwareUpdate::Progress(percent) => {
                println!("The update firmware process is continuing... {}%", percent);
            }
            FirmwareUpdate::Finished(outcome) => break outcome,
            FirmwareUpdate::Unrelated => {}
        }
    };

    println!("{}", output::firmware_outcome_message(final_outcome));
    disconnect(&session).await;

    if final_outcome.needs_operator() {
        bail!("firmware update ended with {}", final_outcome);
    }
    Ok(())
}

/// Progress sequence for the simulated update, ending in `outcome`.
fn firmware_script(outcome: FirmwareOutcome) -> Vec<StatusCode> {
    let mut script: Vec<StatusCode> = [10u8, 30, 55, 75, 95]
        .into_iter()
        .map(StatusCode::FirmwareProgress)
        .collect();
    script.push(StatusCode::from(outcome));
    script
}
