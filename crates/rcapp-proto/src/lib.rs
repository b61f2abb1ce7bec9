//! Protocol
//!
//! Wire format for the rcapp remote-control protocol. The client talks to a
//! single Host over a text channel carrying JSON objects in both directions:
//!
//! - Outbound: [`CommandEnvelope`] wraps one validated [`ActionRequest`].
//! - Inbound: [`InboundMessage`] carries a declared [`MessageType`] and an
//!   opaque payload, decoded into [`Inbound`] on demand.
//!
//! This crate performs no I/O and holds no session state. Validation of the
//! action vocabulary happens here so that nothing outside the fixed set can be
//! serialized.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod action;
pub mod envelope;
pub mod errors;
pub mod inbound;
pub mod payloads;

pub use action::{Action, ActionName, ActionRequest, validate};
pub use envelope::CommandEnvelope;
pub use errors::{ActionError, ProtocolError};
pub use inbound::{Inbound, InboundMessage, MessageType};
pub use payloads::{HostSnapshot, Level, Playlist, PlaylistCatalog};
