//! Generic runtime for application orchestration.
//!
//! The Runtime drives the event loop, coordinating between:
//! - [`Session`]: the sans-IO session engine
//! - [`Driver`]: platform-specific I/O
//!
//! The runtime is the session's only writer. Every driver event runs to
//! completion, including any follow-up events it causes, before the next one
//! is read.

use std::collections::VecDeque;

use rcapp_core::{
    Clock, DiagnosticKind, Intent, Session, SessionAction, SessionEvent, SystemClock,
    TransportEvent,
};

use crate::{
    Driver, DriverEvent, Screen,
    command::{HELP, OperatorCommand, parse_command},
};

/// Generic runtime that orchestrates Session and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `C`: Clock stamping outbound commands
pub struct Runtime<D, C = SystemClock>
where
    D: Driver,
    C: Clock,
{
    driver: D,
    session: Session<C>,
    /// Last diagnostic or help text. `None` if nothing to show.
    status: Option<String>,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Clock,
{
    /// Create a runtime around an existing session.
    pub fn new(driver: D, session: Session<C>) -> Self {
        Self { driver, session, status: None }
    }

    /// Run the main event loop until the operator quits or input ends.
    ///
    /// Connects right away if `autoconnect` is set and a Host is already
    /// chosen. Any live session is torn down before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to read input or render.
    pub async fn run(mut self, autoconnect: bool) -> Result<Self, D::Error> {
        self.render()?;

        if autoconnect && self.session.state().selection().host().is_some() {
            self.dispatch(SessionEvent::Intent(Intent::Connect)).await?;
        }

        loop {
            let quit = match self.driver.next_event().await? {
                DriverEvent::Input(line) => self.handle_line(&line).await?,
                DriverEvent::Transport(event) => {
                    self.dispatch(SessionEvent::Transport(event)).await?;
                    false
                },
                DriverEvent::InputClosed => true,
            };
            if quit {
                break;
            }
        }

        self.dispatch(SessionEvent::Intent(Intent::Disconnect)).await?;
        self.driver.stop();
        Ok(self)
    }

    /// Handle one line of operator input.
    ///
    /// Returns `true` if the operator asked to quit.
    async fn handle_line(&mut self, line: &str) -> Result<bool, D::Error> {
        match parse_command(line) {
            Ok(None) => Ok(false),
            Ok(Some(OperatorCommand::Quit)) => Ok(true),
            Ok(Some(OperatorCommand::Help)) => {
                self.status = Some(HELP.to_string());
                self.render()?;
                Ok(false)
            },
            Ok(Some(OperatorCommand::Intent(intent))) => {
                self.status = None;
                self.dispatch(SessionEvent::Intent(intent)).await?;
                Ok(false)
            },
            Err(e) => {
                self.status = Some(e.to_string());
                self.render()?;
                Ok(false)
            },
        }
    }

    /// Feed an event to the session and execute what it asks for.
    ///
    /// Transport failures while executing become follow-up events.
    async fn dispatch(&mut self, event: SessionEvent) -> Result<(), D::Error> {
        let mut pending = VecDeque::from([event]);
        let mut needs_render = false;

        while let Some(event) = pending.pop_front() {
            for action in self.session.handle(event) {
                match action {
                    SessionAction::Connect { target_id, hint } => {
                        if let Err(e) = self.driver.connect(&target_id, hint).await {
                            tracing::warn!(%target_id, "connect failed: {e}");
                            pending.push_back(SessionEvent::ConnectFailed { reason: e.to_string() });
                        }
                    },
                    SessionAction::Send(text) => {
                        if let Err(e) = self.driver.send(text).await {
                            tracing::warn!("send failed: {e}");
                            pending.push_back(SessionEvent::Transport(TransportEvent::Error(
                                e.to_string(),
                            )));
                        }
                    },
                    SessionAction::Close { target_id } => self.driver.close(&target_id).await,
                    SessionAction::ModeChanged { id, display_name } => {
                        tracing::info!(mode = id, "now showing {display_name}");
                    },
                    SessionAction::Render => needs_render = true,
                    SessionAction::Diagnostic { kind, message } => {
                        self.status = Some(match kind {
                            DiagnosticKind::Host => format!("host: {message}"),
                            _ => message,
                        });
                        needs_render = true;
                    },
                }
            }
        }

        if needs_render {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> Result<(), D::Error> {
        let screen = Screen::capture(&self.session, self.status.as_deref());
        self.driver.render(&screen)
    }

    /// Session engine.
    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    /// Driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Last diagnostic or help text.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
