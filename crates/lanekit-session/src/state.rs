//! Session lifecycle state machine.
//!
//! A session handle moves through a fixed lifecycle:
//!
//! ```text
//! Closed -open-> Opened -claim-> Claimed -enable-> Enabled
//!                  ^                ^                 |
//!                  |                |              disable
//!                  |             enable               v
//!                  +---release--- Disabled <----------+
//! ```
//!
//! Any state may additionally transition straight to `Closed`; that is the
//! forced-teardown path, where the caller performs the skipped
//! disable/release steps best-effort before closing.

use lanekit_core::{PosError, Result};
use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

/// Maximum number of state transitions kept for diagnostics.
const MAX_HISTORY_SIZE: usize = 32;

/// Lifecycle state of a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No device bound; only `open` is valid.
    Closed,

    /// Bound to a device port but not exclusively owned.
    Opened,

    /// Exclusive use acquired; the device may be enabled.
    Claimed,

    /// The device may produce events.
    Enabled,

    /// Previously enabled, currently not producing events.
    ///
    /// Has the same outgoing rights as `Claimed`.
    Disabled,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SessionState::Closed => "Closed",
            SessionState::Opened => "Opened",
            SessionState::Claimed => "Claimed",
            SessionState::Enabled => "Enabled",
            SessionState::Disabled => "Disabled",
        };
        write!(f, "{}", state_str)
    }
}

impl SessionState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use lanekit_session::state::SessionState;
    ///
    /// assert!(SessionState::Opened.can_transition_to(SessionState::Claimed));
    /// assert!(!SessionState::Opened.can_transition_to(SessionState::Enabled));
    /// // Forced teardown is always legal.
    /// assert!(SessionState::Enabled.can_transition_to(SessionState::Closed));
    /// ```
    pub fn can_transition_to(self, target: SessionState) -> bool {
        matches!(
            (self, target),
            // open
            (SessionState::Closed, SessionState::Opened)
            // claim
            | (SessionState::Opened, SessionState::Claimed)
            // enable
            | (SessionState::Claimed | SessionState::Disabled, SessionState::Enabled)
            // disable
            | (SessionState::Enabled, SessionState::Disabled)
            // release
            | (SessionState::Claimed | SessionState::Disabled, SessionState::Opened)
            // close, including the forced-teardown path
            | (_, SessionState::Closed)
        )
    }

    /// Whether this state holds the exclusive device claim.
    pub fn is_claimed(self) -> bool {
        matches!(
            self,
            SessionState::Claimed | SessionState::Enabled | SessionState::Disabled
        )
    }
}

/// A single recorded state transition.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: SessionState,

    /// The state transitioned to.
    pub to: SessionState,

    /// When the transition occurred.
    pub timestamp: Instant,
}

impl StateTransition {
    fn new(from: SessionState, to: SessionState) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// State machine enforcing the legal session lifecycle.
///
/// Not thread-safe by itself; the session controller guards it with a
/// mutex.
#[derive(Debug)]
pub struct StateMachine {
    current_state: SessionState,
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the `Closed` state.
    pub fn new() -> Self {
        Self {
            current_state: SessionState::Closed,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Get the current state.
    pub fn current_state(&self) -> SessionState {
        self.current_state
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `PosError::InvalidStateTransition` if the transition is not
    /// legal from the current state.
    ///
    /// # Examples
    ///
    /// ```
    /// use lanekit_session::state::{SessionState, StateMachine};
    ///
    /// let mut machine = StateMachine::new();
    /// machine.transition_to(SessionState::Opened).unwrap();
    /// assert!(machine.transition_to(SessionState::Enabled).is_err());
    /// ```
    pub fn transition_to(&mut self, new_state: SessionState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(new_state) {
            return Err(PosError::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.current_state = new_state;
        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
