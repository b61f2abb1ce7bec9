//! Local/Host mode reconciliation.
//!
//! The Host and the client change state independently: commands are
//! fire-and-forget and only show up later in a new snapshot. While the
//! operator is browsing playlists the Host is typically idle, so every
//! snapshot in that window reports the idle mode. Adopting it would throw the
//! operator out of the browser.
//!
//! # Rule
//!
//! ```text
//! incoming == local                              -> local
//! incoming == HOST_IDLE and local is browsing    -> local
//! otherwise                                      -> incoming
//! ```

use crate::Mode;

/// Decide the local mode after the Host reports `incoming`.
#[must_use]
pub fn reconcile(local: Mode, incoming: Mode) -> Mode {
    if incoming == local {
        return local;
    }
    if incoming == Mode::HOST_IDLE && local.is_browsing() {
        return local;
    }
    incoming
}
