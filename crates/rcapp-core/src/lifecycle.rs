//! Connection lifecycle state machine.
//!
//! Tracks where the client is in the pairing handshake. Like the rest of the
//! engine it performs no I/O: transitions return [`LifecycleAction`]s for the
//! driver to execute against the transport.
//!
//! # State Machine
//!
//! ```text
//! ┌─────────┐ connect ┌─────────────────────┐  open  ┌────────────────────┐ FullState ┌────────┐
//! │ Pairing │────────>│ ConnectionRequested │───────>│ ExpectingHostState │──────────>│ Active │
//! └─────────┘         └─────────────────────┘        └────────────────────┘           └────────┘
//!      ^                    │ connect failed                   │                          │
//!      │<───────────────────┘                                  │                          │
//!      │<────────────────── disconnect / peer left / ClosingConnection / channel error ───┘
//! ```
//!
//! Disconnect is idempotent: from `Pairing` it does nothing.

use crate::error::ValidationError;

/// How the transport should reach the Host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportHint {
    /// Signaling over a WebSocket.
    #[default]
    WebSocket,
    /// Signaling over HTTP polling.
    Http,
}

impl TransportHint {
    /// Hint matching a `use_web_socket` configuration flag.
    #[must_use]
    pub const fn from_use_web_socket(use_web_socket: bool) -> Self {
        if use_web_socket { Self::WebSocket } else { Self::Http }
    }
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// No channel; choosing a Host.
    Pairing,
    /// Transport asked to connect; channel not open yet.
    ConnectionRequested,
    /// Channel open; no snapshot received yet.
    ExpectingHostState,
    /// Snapshot received; session live.
    Active,
}

/// Transport operations requested by the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Open a channel to the Host.
    Connect {
        /// Host identifier
        target_id: String,
        /// Signaling preference
        hint: TransportHint,
    },
    /// Tear down the channel to the Host.
    Close {
        /// Host identifier
        target_id: String,
    },
}

/// Lifecycle state machine.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LifecycleState,
    hint: TransportHint,
    /// Host the current channel belongs to. `None` while pairing.
    target_id: Option<String>,
}

impl Lifecycle {
    /// Start in [`LifecycleState::Pairing`].
    pub fn new(hint: TransportHint) -> Self {
        Self { state: LifecycleState::Pairing, hint, target_id: None }
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Host the current channel belongs to. `None` while pairing.
    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    /// Whether a channel is open and can carry traffic.
    pub fn has_channel(&self) -> bool {
        matches!(self.state, LifecycleState::ExpectingHostState | LifecycleState::Active)
    }

    /// Whether the first snapshot has arrived.
    pub fn is_active(&self) -> bool {
        self.state == LifecycleState::Active
    }

    /// Ask the transport to connect to `target_id`.
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidState` if not in `Pairing`
    pub fn request_connect(&mut self, target_id: &str) -> Result<LifecycleAction, ValidationError> {
        if self.state != LifecycleState::Pairing {
            return Err(ValidationError::InvalidState { state: self.state, operation: "connect" });
        }

        self.state = LifecycleState::ConnectionRequested;
        self.target_id = Some(target_id.to_string());

        Ok(LifecycleAction::Connect { target_id: target_id.to_string(), hint: self.hint })
    }

    /// Transport could not start connecting. Returns to `Pairing`.
    ///
    /// Returns `false` if there was no pending connect.
    pub fn connect_failed(&mut self) -> bool {
        if self.state != LifecycleState::ConnectionRequested {
            return false;
        }
        self.state = LifecycleState::Pairing;
        self.target_id = None;
        true
    }

    /// Channel opened.
    ///
    /// # Errors
    ///
    /// - `ValidationError::InvalidState` if no connect was pending
    pub fn channel_open(&mut self) -> Result<(), ValidationError> {
        if self.state != LifecycleState::ConnectionRequested {
            return Err(ValidationError::InvalidState {
                state: self.state,
                operation: "open channel",
            });
        }
        self.state = LifecycleState::ExpectingHostState;
        Ok(())
    }

    /// Whether a snapshot arriving now should be applied.
    pub fn accepts_snapshot(&self) -> bool {
        self.has_channel()
    }

    /// Snapshot applied. First one moves `ExpectingHostState` to `Active`.
    ///
    /// Returns `true` on that first transition.
    pub fn snapshot_applied(&mut self) -> bool {
        if self.state == LifecycleState::ExpectingHostState {
            self.state = LifecycleState::Active;
            return true;
        }
        false
    }

    /// Tear down and return to `Pairing`.
    ///
    /// Returns `None` when already pairing, which makes repeated disconnects
    /// from several triggers harmless.
    pub fn disconnect(&mut self) -> Option<LifecycleAction> {
        if self.state == LifecycleState::Pairing {
            return None;
        }

        self.state = LifecycleState::Pairing;
        let target_id = self.target_id.take().unwrap_or_default();
        Some(LifecycleAction::Close { target_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_lifecycle() {
        let mut lifecycle = Lifecycle::new(TransportHint::WebSocket);
        assert_eq!(lifecycle.state(), LifecycleState::Pairing);

        let action = lifecycle.request_connect("headset-7");
        assert_eq!(
            action,
            Ok(LifecycleAction::Connect {
                target_id: "headset-7".into(),
                hint: TransportHint::WebSocket
            })
        );
        assert!(!lifecycle.has_channel());

        assert_eq!(lifecycle.channel_open(), Ok(()));
        assert_eq!(lifecycle.state(), LifecycleState::ExpectingHostState);
        assert!(lifecycle.accepts_snapshot());

        assert!(lifecycle.snapshot_applied());
        assert!(!lifecycle.snapshot_applied());
        assert!(lifecycle.is_active());

        assert_eq!(
            lifecycle.disconnect(),
            Some(LifecycleAction::Close { target_id: "headset-7".into() })
        );
        assert_eq!(lifecycle.state(), LifecycleState::Pairing);
        assert_eq!(lifecycle.target_id(), None);
    }

    #[test]
    fn disconnect_is_idempotent() {
        let mut lifecycle = Lifecycle::new(TransportHint::Http);
        let _ = lifecycle.request_connect("h");
        assert!(lifecycle.disconnect().is_some());
        assert_eq!(lifecycle.disconnect(), None);
        assert_eq!(lifecycle.disconnect(), None);
    }

    #[test]
    fn connect_only_from_pairing() {
        let mut lifecycle = Lifecycle::new(TransportHint::WebSocket);
        let _ = lifecycle.request_connect("h");
        assert_eq!(
            lifecycle.request_connect("h"),
            Err(ValidationError::InvalidState {
                state: LifecycleState::ConnectionRequested,
                operation: "connect"
            })
        );
    }

    #[test]
    fn connect_failure_returns_to_pairing() {
        let mut lifecycle = Lifecycle::new(TransportHint::WebSocket);
        assert!(!lifecycle.connect_failed());
        let _ = lifecycle.request_connect("h");
        assert!(lifecycle.connect_failed());
        assert_eq!(lifecycle.state(), LifecycleState::Pairing);
        assert_eq!(lifecycle.disconnect(), None);
    }

    #[test]
    fn open_without_connect_rejected() {
        let mut lifecycle = Lifecycle::new(TransportHint::WebSocket);
        assert!(lifecycle.channel_open().is_err());
        assert!(!lifecycle.accepts_snapshot());
        assert!(!lifecycle.snapshot_applied());
    }

    #[test]
    fn hint_follows_config_flag() {
        assert_eq!(TransportHint::from_use_web_socket(true), TransportHint::WebSocket);
        assert_eq!(TransportHint::from_use_web_socket(false), TransportHint::Http);
    }
}
