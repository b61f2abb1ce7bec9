//! Session aggregate.
//!
//! Combines the [`Lifecycle`], the [`SessionState`] and the command
//! serializer behind one entry point, [`Session::handle`]. Each event runs to
//! completion and yields the [`SessionAction`]s the driver must execute, in
//! order.
//!
//! Nothing here fails outward: rejected requests and discarded messages come
//! back as [`SessionAction::Diagnostic`].

use rcapp_proto::{Action, ActionRequest, CommandEnvelope};

use crate::{
    Mode,
    env::{Clock, SystemClock},
    error::{DiagnosticKind, SessionError, ValidationError},
    lifecycle::{Lifecycle, LifecycleAction, LifecycleState, TransportHint},
    navigator::{Details, Listing, NavStep},
    selection::Host,
    state::SessionState,
};

/// Input to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Something happened on the transport.
    Transport(TransportEvent),
    /// Transport could not start connecting.
    ConnectFailed {
        /// Transport's explanation
        reason: String,
    },
    /// Operator request.
    Intent(Intent),
}

/// Transport notifications, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Channel to the Host is open.
    Open,
    /// Text message from the Host.
    Message(String),
    /// Channel failed.
    Error(String),
    /// Host went away.
    PeerDisconnect,
    /// Signaling service dropped us.
    SignalingDisconnect,
}

/// Operator requests.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Choose the Host to pair with.
    SelectHost(Host),
    /// Connect to the chosen Host.
    Connect,
    /// Tear down the session.
    Disconnect,
    /// Disconnect, then connect to the same Host again.
    Retry,
    /// Open the playlist browser.
    Browse,
    /// Select a row of the current listing.
    Select(usize),
    /// Act on the current selection.
    Commit,
    /// Select a row and act on it.
    Activate(usize),
    /// Leave the current browsing level.
    Back,
    /// Send a typed action.
    Perform(Action),
    /// Send an action given by wire name, e.g. typed by the operator.
    Raw {
        /// Wire name
        name: String,
        /// Stringified parameters
        params: Vec<String>,
    },
}

/// Work for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a channel to the Host.
    Connect {
        /// Host identifier
        target_id: String,
        /// Signaling preference
        hint: TransportHint,
    },
    /// Send text over the open channel.
    Send(String),
    /// Tear down the channel.
    Close {
        /// Host identifier
        target_id: String,
    },
    /// Local mode changed.
    ModeChanged {
        /// Mode id
        id: &'static str,
        /// Mode label
        display_name: &'static str,
    },
    /// State changed; redraw.
    Render,
    /// Operator-visible problem.
    Diagnostic {
        /// Failure class
        kind: DiagnosticKind,
        /// Human-readable description
        message: String,
    },
}

impl SessionAction {
    pub(crate) fn mode_changed(mode: Mode) -> Self {
        Self::ModeChanged { id: mode.id(), display_name: mode.display_name() }
    }
}

impl From<LifecycleAction> for SessionAction {
    fn from(action: LifecycleAction) -> Self {
        match action {
            LifecycleAction::Connect { target_id, hint } => Self::Connect { target_id, hint },
            LifecycleAction::Close { target_id } => Self::Close { target_id },
        }
    }
}

/// Session engine.
///
/// Pure state machine: consumes [`SessionEvent`]s, produces
/// [`SessionAction`]s. The clock is the only outside input.
#[derive(Debug, Clone)]
pub struct Session<C: Clock = SystemClock> {
    clock: C,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) state: SessionState,
}

impl<C: Clock> Session<C> {
    /// New session in `Pairing`.
    pub fn new(clock: C, hint: TransportHint) -> Self {
        Self { clock, lifecycle: Lifecycle::new(hint), state: SessionState::new() }
    }

    /// Process one event.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        let mut actions = Vec::new();

        let result = match event {
            SessionEvent::Transport(event) => self.handle_transport(event, &mut actions),
            SessionEvent::ConnectFailed { reason } => self.handle_connect_failed(reason, &mut actions),
            SessionEvent::Intent(intent) => self.handle_intent(intent, &mut actions),
        };

        if let Err(err) = result {
            tracing::warn!(kind = %err.kind(), "{err}");
            actions.push(SessionAction::Diagnostic { kind: err.kind(), message: err.to_string() });
        }

        actions
    }

    /// Current local mode.
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// Current lifecycle state.
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current browsing level.
    pub fn listing(&self) -> Option<Listing> {
        self.state.listing()
    }

    /// Details of the current selection.
    pub fn details(&self) -> Option<Details> {
        self.state.details()
    }

    fn handle_transport(
        &mut self,
        event: TransportEvent,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), SessionError> {
        match event {
            TransportEvent::Open => {
                if let Err(err) = self.lifecycle.channel_open() {
                    tracing::warn!("ignoring channel open: {err}");
                    return Ok(());
                }
                tracing::info!(target_id = self.lifecycle.target_id(), "channel open");
                actions.push(SessionAction::Render);
                Ok(())
            },
            TransportEvent::Message(text) => {
                if !self.lifecycle.has_channel() {
                    tracing::debug!(state = ?self.lifecycle.state(), "ignoring message without channel");
                    return Ok(());
                }
                self.route_message(&text, actions)
            },
            TransportEvent::Error(reason) => {
                if self.teardown(actions) {
                    return Err(SessionError::Connectivity(format!("channel error: {reason}")));
                }
                tracing::debug!("channel error after teardown: {reason}");
                Ok(())
            },
            TransportEvent::PeerDisconnect => {
                if self.teardown(actions) {
                    return Err(SessionError::Connectivity("host disconnected".to_string()));
                }
                Ok(())
            },
            TransportEvent::SignalingDisconnect => {
                if self.teardown(actions) {
                    return Err(SessionError::Connectivity("signaling disconnected".to_string()));
                }
                Ok(())
            },
        }
    }

    fn handle_connect_failed(
        &mut self,
        reason: String,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), SessionError> {
        if !self.lifecycle.connect_failed() {
            tracing::debug!("connect failure with no pending connect: {reason}");
            return Ok(());
        }
        actions.push(SessionAction::Render);
        Err(SessionError::Connectivity(format!("connect failed: {reason}")))
    }

    fn handle_intent(
        &mut self,
        intent: Intent,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), SessionError> {
        match intent {
            Intent::SelectHost(host) => {
                if self.lifecycle.state() != LifecycleState::Pairing {
                    return Err(ValidationError::InvalidState {
                        state: self.lifecycle.state(),
                        operation: "select host",
                    }
                    .into());
                }
                tracing::debug!(host_id = %host.id, "host selected");
                self.state.select_host(host);
                actions.push(SessionAction::Render);
            },
            Intent::Connect => {
                let target_id = self.selected_host_id()?;
                self.connect(&target_id, actions)?;
            },
            Intent::Disconnect => {
                if !self.teardown(actions) {
                    tracing::debug!("already disconnected");
                }
            },
            Intent::Retry => {
                let state = self.lifecycle.state();
                let Some(target_id) = self.lifecycle.target_id().map(str::to_string) else {
                    return Err(ValidationError::InvalidState { state, operation: "retry" }.into());
                };
                let host = self.state.selection().host().cloned();
                self.teardown(actions);
                if let Some(host) = host {
                    self.state.select_host(host);
                }
                self.connect(&target_id, actions)?;
            },
            Intent::Browse => {
                self.require_active("browse")?;
                let steps = self.state.navigator().browse();
                self.apply_steps(steps, actions)?;
            },
            Intent::Select(index) => {
                self.require_active("select")?;
                let steps = self.state.navigator().select(index)?;
                self.apply_steps(steps, actions)?;
            },
            Intent::Commit => {
                self.require_active("commit")?;
                let steps = self.state.navigator().commit()?;
                self.apply_steps(steps, actions)?;
            },
            Intent::Activate(index) => {
                self.require_active("activate")?;
                let steps = self.state.navigator().activate(index)?;
                self.apply_steps(steps, actions)?;
            },
            Intent::Back => {
                self.require_active("go back")?;
                let steps = self.state.navigator().back()?;
                self.apply_steps(steps, actions)?;
            },
            Intent::Perform(action) => {
                let request = action.into_request()?;
                self.send(&request, actions)?;
            },
            Intent::Raw { name, params } => {
                let request = ActionRequest::parse(&name, params)?;
                self.send(&request, actions)?;
            },
        }
        Ok(())
    }

    fn selected_host_id(&self) -> Result<String, ValidationError> {
        self.state.selection().host().map(|h| h.id.clone()).ok_or(ValidationError::NoHostSelected)
    }

    fn connect(&mut self, target_id: &str, actions: &mut Vec<SessionAction>) -> Result<(), SessionError> {
        let action = self.lifecycle.request_connect(target_id)?;
        tracing::info!(target_id, "connecting");
        actions.push(action.into());
        actions.push(SessionAction::Render);
        Ok(())
    }

    fn require_active(&self, operation: &'static str) -> Result<(), ValidationError> {
        if self.lifecycle.is_active() {
            Ok(())
        } else {
            Err(ValidationError::NotActive { operation })
        }
    }

    fn apply_steps(
        &mut self,
        steps: Vec<NavStep>,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), SessionError> {
        for step in steps {
            match step {
                NavStep::Moved(mode) => actions.push(SessionAction::mode_changed(mode)),
                NavStep::Command(action) => self.send(&action.into_request()?, actions)?,
                NavStep::Selected => {},
            }
        }
        actions.push(SessionAction::Render);
        Ok(())
    }

    /// Serialize and emit a validated request. Refused without a channel.
    fn send(&self, request: &ActionRequest, actions: &mut Vec<SessionAction>) -> Result<(), SessionError> {
        if !self.lifecycle.has_channel() {
            return Err(ValidationError::NotActive { operation: "send" }.into());
        }

        let text = CommandEnvelope::from_request(request, self.clock.now()).to_json()?;
        tracing::debug!(action = %request.name(), params = ?request.params(), "sending command");
        actions.push(SessionAction::Send(text));
        Ok(())
    }

    /// Close the channel and reset state. Returns `false` if already down.
    pub(crate) fn teardown(&mut self, actions: &mut Vec<SessionAction>) -> bool {
        let Some(close) = self.lifecycle.disconnect() else {
            return false;
        };
        tracing::info!("session torn down");
        actions.push(close.into());

        let previous = self.state.mode();
        self.state.reset();
        if previous != self.state.mode() {
            actions.push(SessionAction::mode_changed(self.state.mode()));
        }
        actions.push(SessionAction::Render);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedClock;

    fn session() -> Session<FixedClock> {
        Session::new(FixedClock::epoch(), TransportHint::WebSocket)
    }

    fn intent(session: &mut Session<FixedClock>, intent: Intent) -> Vec<SessionAction> {
        session.handle(SessionEvent::Intent(intent))
    }

    fn diagnostics(actions: &[SessionAction]) -> Vec<DiagnosticKind> {
        actions
            .iter()
            .filter_map(|a| match a {
                SessionAction::Diagnostic { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn connect_needs_host() {
        let mut session = session();
        let actions = intent(&mut session, Intent::Connect);
        assert_eq!(diagnostics(&actions), vec![DiagnosticKind::Validation]);
        assert_eq!(session.lifecycle_state(), LifecycleState::Pairing);
    }

    #[test]
    fn connect_emits_transport_connect() {
        let mut session = session();
        let _ = intent(&mut session, Intent::SelectHost(Host::new("quest-2")));
        let actions = intent(&mut session, Intent::Connect);
        assert_eq!(actions, vec![
            SessionAction::Connect { target_id: "quest-2".into(), hint: TransportHint::WebSocket },
            SessionAction::Render
        ]);
        assert_eq!(session.lifecycle_state(), LifecycleState::ConnectionRequested);
    }

    #[test]
    fn connect_failure_stays_pairing() {
        let mut session = session();
        let _ = intent(&mut session, Intent::SelectHost(Host::new("quest-2")));
        let _ = intent(&mut session, Intent::Connect);
        let actions = session.handle(SessionEvent::ConnectFailed { reason: "offline".into() });
        assert_eq!(diagnostics(&actions), vec![DiagnosticKind::Connectivity]);
        assert_eq!(session.lifecycle_state(), LifecycleState::Pairing);
    }

    #[test]
    fn send_refused_without_channel() {
        let mut session = session();
        let actions = intent(&mut session, Intent::Perform(Action::Pause));
        assert!(!actions.iter().any(|a| matches!(a, SessionAction::Send(_))));
        assert_eq!(diagnostics(&actions), vec![DiagnosticKind::Validation]);
    }

    #[test]
    fn retry_reconnects_same_host() {
        let mut session = session();
        let _ = intent(&mut session, Intent::SelectHost(Host::new("quest-2")));
        let _ = intent(&mut session, Intent::Connect);
        let _ = session.handle(SessionEvent::Transport(TransportEvent::Open));

        let actions = intent(&mut session, Intent::Retry);
        assert!(matches!(actions.first(), Some(SessionAction::Close { target_id }) if target_id == "quest-2"));
        assert!(actions.iter().any(
            |a| matches!(a, SessionAction::Connect { target_id, .. } if target_id == "quest-2")
        ));
        assert_eq!(session.lifecycle_state(), LifecycleState::ConnectionRequested);
        assert_eq!(session.state().selection().host().map(|h| h.id.as_str()), Some("quest-2"));
    }

    #[test]
    fn retry_while_pairing_rejected() {
        let mut session = session();
        let actions = intent(&mut session, Intent::Retry);
        assert_eq!(diagnostics(&actions), vec![DiagnosticKind::Validation]);
    }

    #[test]
    fn browse_needs_active_session() {
        let mut session = session();
        let actions = intent(&mut session, Intent::Browse);
        assert_eq!(diagnostics(&actions), vec![DiagnosticKind::Validation]);
        assert_eq!(session.mode(), Mode::Pairing);
    }
}
