//! JSON payloads carried in inbound `dataObj` fields.
//!
//! - [`state`]: `FullState` snapshot of the Host's run-state
//! - [`catalog`]: `AllPlaylists` playlist catalog

pub mod catalog;
pub mod state;

pub use catalog::{Level, Playlist, PlaylistCatalog};
pub use state::HostSnapshot;
