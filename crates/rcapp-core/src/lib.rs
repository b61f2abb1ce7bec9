//! Session engine for the rcapp remote-control client.
//!
//! Tracks the local navigation mode alongside the Host's reported run-state,
//! reconciles the two, validates and serializes outbound commands, and
//! routes inbound messages. The engine performs no I/O: drivers feed
//! [`SessionEvent`]s into [`Session::handle`] and execute the
//! [`SessionAction`]s it returns.
//!
//! # Components
//!
//! - [`Mode`]: registry of every run-state the client can show
//! - [`reconcile()`]: pure local/Host mode reconciliation
//! - [`Lifecycle`]: pairing/connection state machine
//! - [`SessionState`]: mode, snapshot, selection and catalog
//! - [`Navigator`]: two-level playlist/level browser
//! - [`Session`]: single entry point tying them together

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod display;
pub mod env;
pub mod error;
pub mod lifecycle;
pub mod mode;
pub mod navigator;
pub mod reconcile;
mod router;
pub mod selection;
pub mod session;
pub mod state;

pub use display::DisplayFields;
pub use env::{Clock, FixedClock, SystemClock};
pub use error::{DiagnosticKind, SessionError, ValidationError};
pub use lifecycle::{Lifecycle, LifecycleAction, LifecycleState, TransportHint};
pub use mode::{Mode, ModeDescriptor, ModeOrigin};
pub use navigator::{Details, Listing, NavStep, Navigator};
pub use reconcile::reconcile;
pub use selection::{Host, SelectionContext};
pub use session::{Intent, Session, SessionAction, SessionEvent, TransportEvent};
pub use state::SessionState;
