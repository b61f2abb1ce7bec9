//! Inbound message routing.

use rcapp_proto::Inbound;

use crate::{
    env::Clock,
    error::{DiagnosticKind, SessionError},
    session::{Session, SessionAction},
};

impl<C: Clock> Session<C> {
    /// Decode one message from the Host and apply it.
    ///
    /// Undecodable messages are discarded with a protocol error; the session
    /// carries on.
    pub(crate) fn route_message(
        &mut self,
        text: &str,
        actions: &mut Vec<SessionAction>,
    ) -> Result<(), SessionError> {
        let message = Inbound::from_text(text)?;
        tracing::debug!(message = message.message_type().as_str(), "inbound");

        match message {
            Inbound::FullState(snapshot) => {
                if !self.lifecycle.accepts_snapshot() {
                    tracing::debug!(state = ?self.lifecycle.state(), "ignoring snapshot");
                    return Ok(());
                }

                let changed = self.state.apply_snapshot(snapshot)?;
                if self.lifecycle.snapshot_applied() {
                    tracing::info!("session active");
                }
                if let Some(mode) = changed {
                    tracing::info!(mode = mode.id(), "mode changed");
                    actions.push(SessionAction::mode_changed(mode));
                }
                actions.push(SessionAction::Render);
            },
            Inbound::AllPlaylists(catalog) => {
                tracing::info!(playlists = catalog.playlists.len(), "catalog received");
                if let Some(mode) = self.state.replace_catalog(catalog) {
                    actions.push(SessionAction::mode_changed(mode));
                }
                actions.push(SessionAction::Render);
            },
            Inbound::ClosingConnection => {
                tracing::info!("host closing connection");
                self.teardown(actions);
            },
            Inbound::Defines(payload) => {
                tracing::debug!(%payload, "host defines");
            },
            Inbound::TestMessage(payload) => {
                tracing::info!(%payload, "test message from host");
            },
            Inbound::Error(payload) => {
                tracing::warn!(%payload, "host reported an error");
                let message = payload.as_str().map_or_else(|| payload.to_string(), str::to_string);
                actions.push(SessionAction::Diagnostic { kind: DiagnosticKind::Host, message });
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Mode,
        env::FixedClock,
        lifecycle::{LifecycleState, TransportHint},
        selection::Host,
        session::{Intent, SessionEvent, TransportEvent},
    };

    fn open_session() -> Session<FixedClock> {
        let mut session = Session::new(FixedClock::epoch(), TransportHint::WebSocket);
        let _ = session.handle(SessionEvent::Intent(Intent::SelectHost(Host::new("h1"))));
        let _ = session.handle(SessionEvent::Intent(Intent::Connect));
        let _ = session.handle(SessionEvent::Transport(TransportEvent::Open));
        session
    }

    fn deliver(session: &mut Session<FixedClock>, text: &str) -> Vec<SessionAction> {
        session.handle(SessionEvent::Transport(TransportEvent::Message(text.to_string())))
    }

    #[test]
    fn first_snapshot_activates() {
        let mut session = open_session();
        assert_eq!(session.lifecycle_state(), LifecycleState::ExpectingHostState);

        let actions = deliver(&mut session, r#"{"message":"FullState","dataObj":{"GCMode":"Paused"}}"#);
        assert_eq!(actions, vec![
            SessionAction::ModeChanged { id: "Paused", display_name: "Paused" },
            SessionAction::Render
        ]);
        assert_eq!(session.lifecycle_state(), LifecycleState::Active);
    }

    #[test]
    fn garbage_is_discarded() {
        let mut session = open_session();
        let actions = deliver(&mut session, "not json");
        assert!(matches!(actions.as_slice(), [SessionAction::Diagnostic {
            kind: DiagnosticKind::Protocol,
            ..
        }]));
        assert_eq!(session.lifecycle_state(), LifecycleState::ExpectingHostState);
    }

    #[test]
    fn unknown_mode_is_protocol_error() {
        let mut session = open_session();
        let actions = deliver(&mut session, r#"{"message":"FullState","dataObj":{"GCMode":"Juggling"}}"#);
        assert!(matches!(actions.as_slice(), [SessionAction::Diagnostic {
            kind: DiagnosticKind::Protocol,
            ..
        }]));
        assert_eq!(session.mode(), Mode::Pairing);
        assert_eq!(session.lifecycle_state(), LifecycleState::ExpectingHostState);
    }

    #[test]
    fn closing_connection_tears_down() {
        let mut session = open_session();
        let _ = deliver(&mut session, r#"{"message":"FullState","dataObj":{"GCMode":"Stopped"}}"#);

        let actions = deliver(&mut session, r#"{"message":"ClosingConnection"}"#);
        assert_eq!(actions, vec![
            SessionAction::Close { target_id: "h1".into() },
            SessionAction::ModeChanged { id: "Pairing", display_name: "Pairing" },
            SessionAction::Render
        ]);
        assert_eq!(session.lifecycle_state(), LifecycleState::Pairing);
        assert_eq!(session.state().snapshot(), None);
    }

    #[test]
    fn host_error_becomes_diagnostic() {
        let mut session = open_session();
        let actions = deliver(&mut session, r#"{"message":"Error","dataObj":"level missing"}"#);
        assert_eq!(actions, vec![SessionAction::Diagnostic {
            kind: DiagnosticKind::Host,
            message: "level missing".into()
        }]);
    }

    #[test]
    fn informational_messages_change_nothing() {
        let mut session = open_session();
        let before = session.state().clone();
        assert!(deliver(&mut session, r#"{"message":"Defines","dataObj":{"maxVolume":1}}"#).is_empty());
        assert!(deliver(&mut session, r#"{"message":"TestMessage","dataObj":"ping"}"#).is_empty());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn messages_without_channel_ignored() {
        let mut session = Session::new(FixedClock::epoch(), TransportHint::Http);
        let actions = deliver(&mut session, r#"{"message":"FullState","dataObj":{"GCMode":"Stopped"}}"#);
        assert!(actions.is_empty());
        assert_eq!(session.mode(), Mode::Pairing);
    }
}
