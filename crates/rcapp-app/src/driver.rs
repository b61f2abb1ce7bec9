//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] decouples the runtime from specific I/O. Each frontend
//! supplies operator input, a transport to the Host and a render sink, while
//! the generic [`crate::Runtime`] handles orchestration.

use std::future::Future;

use rcapp_core::{TransportEvent, TransportHint};

use crate::Screen;

/// Next thing that happened, as seen by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// One line of operator input.
    Input(String),
    /// Transport notification, in arrival order.
    Transport(TransportEvent),
    /// Operator input ended.
    InputClosed,
}

/// Abstracts I/O operations for the runtime.
///
/// # Implementations
///
/// - **CLI**: stdin lines, stdout rendering, in-process simulated Host
/// - **Tests**: scripted input against the simulated Host
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input or transport event.
    ///
    /// # Errors
    ///
    /// Returns an error if input can no longer be read.
    fn next_event(&mut self) -> impl Future<Output = Result<DriverEvent, Self::Error>> + Send;

    /// Start connecting to the Host. The channel opening is reported later as
    /// [`TransportEvent::Open`].
    ///
    /// # Errors
    ///
    /// Returns an error if the connection attempt cannot be started. The
    /// runtime reports it to the session instead of stopping.
    fn connect(
        &mut self,
        target_id: &str,
        hint: TransportHint,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send text to the Host.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is closed.
    fn send(&mut self, text: String) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Tear down the channel to the Host.
    fn close(&mut self, target_id: &str) -> impl Future<Output = ()> + Send;

    /// Draw the current screen.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, screen: &Screen) -> Result<(), Self::Error>;

    /// Release resources before exit.
    fn stop(&mut self);
}
