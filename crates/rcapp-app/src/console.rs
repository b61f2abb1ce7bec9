//! Line-oriented driver.
//!
//! Operator input arrives as lines on an mpsc channel, screens are written as
//! plain text, and the transport is an in-process [`SimHost`] spawned on
//! connect. Without a Host template every connect fails.

use std::{
    collections::VecDeque,
    future,
    io::{self, Write},
};

use rcapp_core::{TransportEvent, TransportHint};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    Driver, DriverEvent, Screen,
    sim::{HostHandle, SimHost, spawn_host},
};

/// Console driver errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Writing the screen failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No transport can reach the requested Host.
    #[error("no transport for host {target_id:?} over {hint:?}; run with --simulate")]
    NoTransport {
        /// Requested Host
        target_id: String,
        /// Requested signaling
        hint: TransportHint,
    },

    /// Send attempted with no channel.
    #[error("channel closed")]
    ChannelClosed,
}

/// Driver over line input, a text writer and the simulated Host.
pub struct ConsoleDriver<W> {
    input: mpsc::Receiver<String>,
    out: W,
    /// Spawned on each connect. `None` disables the transport.
    template: Option<SimHost>,
    host: Option<HostHandle>,
    /// Transport events raised by our own calls, delivered before anything
    /// else.
    pending: VecDeque<TransportEvent>,
}

impl<W: Write + Send> ConsoleDriver<W> {
    /// Driver with no transport.
    pub fn new(input: mpsc::Receiver<String>, out: W) -> Self {
        Self { input, out, template: None, host: None, pending: VecDeque::new() }
    }

    /// Driver whose connects reach a copy of `host`.
    pub fn with_simulated_host(input: mpsc::Receiver<String>, out: W, host: SimHost) -> Self {
        Self { template: Some(host), ..Self::new(input, out) }
    }

    /// Rendered output so far.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Whether a channel to the Host exists.
    pub fn is_connected(&self) -> bool {
        self.host.is_some()
    }
}

async fn recv_host(host: &mut Option<HostHandle>) -> Option<String> {
    match host {
        Some(handle) => handle.from_host.recv().await,
        None => future::pending().await,
    }
}

impl<W: Write + Send> Driver for ConsoleDriver<W> {
    type Error = DriverError;

    async fn next_event(&mut self) -> Result<DriverEvent, Self::Error> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(DriverEvent::Transport(event));
        }

        tokio::select! {
            biased;

            message = recv_host(&mut self.host) => match message {
                Some(text) => Ok(DriverEvent::Transport(TransportEvent::Message(text))),
                None => {
                    self.host = None;
                    Ok(DriverEvent::Transport(TransportEvent::PeerDisconnect))
                },
            },
            line = self.input.recv() => Ok(line.map_or(DriverEvent::InputClosed, DriverEvent::Input)),
        }
    }

    async fn connect(&mut self, target_id: &str, hint: TransportHint) -> Result<(), Self::Error> {
        let Some(template) = &self.template else {
            return Err(DriverError::NoTransport { target_id: target_id.to_string(), hint });
        };

        tracing::info!(target_id, ?hint, "connecting to simulated host");
        self.host = Some(spawn_host(template.clone()));
        self.pending.push_back(TransportEvent::Open);
        Ok(())
    }

    async fn send(&mut self, text: String) -> Result<(), Self::Error> {
        let Some(handle) = &self.host else {
            return Err(DriverError::ChannelClosed);
        };
        handle.to_host.send(text).await.map_err(|_| DriverError::ChannelClosed)
    }

    async fn close(&mut self, target_id: &str) {
        tracing::debug!(target_id, "closing channel");
        self.host = None;
        self.pending.clear();
    }

    fn render(&mut self, screen: &Screen) -> Result<(), Self::Error> {
        for line in screen.lines() {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }

    fn stop(&mut self) {
        self.host = None;
        self.pending.clear();
    }
}
