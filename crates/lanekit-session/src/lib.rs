//! Device session controller for the lanekit peripheral toolkit.
//!
//! This crate implements the lifecycle and event-dispatch pattern shared
//! by point-of-sale peripheral applications: open a device, claim it
//! exclusively, enable it, react to data/status/error events through
//! registered listeners, and tear down in reverse order on every exit
//! path.
//!
//! # Lifecycle
//!
//! ```text
//! open -> claim -> enable -> [events] -> disable -> release -> close
//! ```
//!
//! The [`state::StateMachine`] enforces this sequence; [`Session::close`]
//! is the forced-teardown escape hatch that is legal from any state and
//! performs the skipped steps best-effort.
//!
//! # Quick start
//!
//! ```no_run
//! use lanekit_core::{EventKind, ProfileName};
//! use lanekit_hardware::{AnyDeviceService, MockScanner};
//! use lanekit_session::Session;
//! use std::time::Duration;
//!
//! # async fn example() -> lanekit_core::Result<()> {
//! let (scanner, _hw) = MockScanner::new();
//! let profile = ProfileName::new("LK-Gryphon-4500-USB")?;
//! let session = Session::open(AnyDeviceService::Scanner(scanner), profile).await?;
//!
//! let rearm = session.clone();
//! session.subscribe(EventKind::Data, move |event| {
//!     let _ = rearm.set_data_events_enabled(true);
//!     println!("{:?}", event);
//! });
//!
//! session.claim(Duration::from_millis(1000)).await?;
//! session.set_enabled(true).await?;
//! session.set_data_events_enabled(true)?;
//! // ... run ...
//! session.close().await;
//! # Ok(())
//! # }
//! ```

pub mod firmware;
pub mod listeners;
pub mod session;
pub mod state;

// Re-export commonly used types for convenience
pub use firmware::{FirmwareMonitor, FirmwareUpdate};
pub use listeners::SubscriptionId;
pub use session::Session;
pub use state::{SessionState, StateMachine};
