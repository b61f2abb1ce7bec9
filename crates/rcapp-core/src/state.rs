//! Session state store.
//!
//! Holds the local mode, the latest Host snapshot, the operator's selection
//! and the playlist catalog. Mutated only through the methods here and the
//! [`Navigator`]; reset on every disconnect.

use rcapp_proto::{HostSnapshot, PlaylistCatalog, ProtocolError};

use crate::{
    Mode,
    display::DisplayFields,
    navigator::Navigator,
    reconcile::reconcile,
    selection::{Host, SelectionContext},
};

/// Mutable state of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) mode: Mode,
    snapshot: Option<HostSnapshot>,
    pub(crate) selection: SelectionContext,
    pub(crate) catalog: PlaylistCatalog,
    /// `GetPlaylists` sent, no `AllPlaylists` back yet.
    pub(crate) awaiting_catalog: bool,
    display: DisplayFields,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Initial state: `Pairing`, no snapshot, empty selection and catalog.
    pub fn new() -> Self {
        Self {
            mode: Mode::Pairing,
            snapshot: None,
            selection: SelectionContext::new(),
            catalog: PlaylistCatalog::default(),
            awaiting_catalog: false,
            display: DisplayFields::default(),
        }
    }

    /// Current local mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Latest snapshot. `None` until the first `FullState`.
    pub fn snapshot(&self) -> Option<&HostSnapshot> {
        self.snapshot.as_ref()
    }

    /// Operator selections.
    pub fn selection(&self) -> &SelectionContext {
        &self.selection
    }

    /// Latest playlist catalog.
    pub fn catalog(&self) -> &PlaylistCatalog {
        &self.catalog
    }

    /// Whether a catalog request is outstanding.
    pub fn awaiting_catalog(&self) -> bool {
        self.awaiting_catalog
    }

    /// Display fields derived from the latest snapshot.
    pub fn display(&self) -> &DisplayFields {
        &self.display
    }

    /// Mode the Host last reported, or its idle mode before any report.
    pub fn host_mode(&self) -> Mode {
        self.snapshot.as_ref().and_then(|s| Mode::lookup_by_id(&s.mode)).unwrap_or(Mode::HOST_IDLE)
    }

    /// Choose the Host to pair with.
    pub fn select_host(&mut self, host: Host) {
        self.selection.select_host(host);
    }

    /// Replace the snapshot wholesale and reconcile the local mode.
    ///
    /// Returns the new mode if it changed. Display fields are refreshed
    /// either way.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownMode` / `ProtocolError::LocalModeReported` if
    ///   the reported mode is not a Host mode; nothing is modified
    pub fn apply_snapshot(&mut self, snapshot: HostSnapshot) -> Result<Option<Mode>, ProtocolError> {
        let incoming = Mode::from_host(&snapshot.mode)?;

        self.display = DisplayFields::from_snapshot(&snapshot, &self.catalog);
        self.snapshot = Some(snapshot);

        Ok(self.set_mode(reconcile(self.mode, incoming)))
    }

    /// Replace the catalog wholesale.
    ///
    /// The selection is re-resolved by id. If the level browser loses its
    /// playlist it falls back to the playlist browser; the new mode is
    /// returned in that case.
    pub fn replace_catalog(&mut self, catalog: PlaylistCatalog) -> Option<Mode> {
        self.selection.resolve_against(&catalog);
        self.catalog = catalog;
        self.awaiting_catalog = false;

        if let Some(snapshot) = &self.snapshot {
            self.display = DisplayFields::from_snapshot(snapshot, &self.catalog);
        }

        if self.mode == Mode::ChooseLevel && self.selection.playlist().is_none() {
            return self.set_mode(Mode::ChoosePlaylist);
        }
        None
    }

    /// Back to the initial state, Host choice included.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Playlist/level navigation over this state.
    pub fn navigator(&mut self) -> Navigator<'_> {
        Navigator::new(self)
    }

    /// Set the local mode. Returns it if it changed.
    pub(crate) fn set_mode(&mut self, mode: Mode) -> Option<Mode> {
        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        Some(mode)
    }
}

#[cfg(test)]
mod tests {
    use rcapp_proto::Playlist;

    use super::*;

    fn playlist(id: &str) -> Playlist {
        Playlist {
            id: id.into(),
            name: id.to_uppercase(),
            creator: String::new(),
            date_modified: String::new(),
            notes: String::new(),
            levels: Vec::new(),
        }
    }

    #[test]
    fn snapshot_adopts_host_mode() {
        let mut state = SessionState::new();
        let changed = state.apply_snapshot(HostSnapshot::with_mode("Stopped"));
        assert_eq!(changed, Ok(Some(Mode::Stopped)));
        assert_eq!(state.host_mode(), Mode::Stopped);

        let unchanged = state.apply_snapshot(HostSnapshot {
            volume: Some(0.5),
            ..HostSnapshot::with_mode("Stopped")
        });
        assert_eq!(unchanged, Ok(None));
        assert_eq!(state.display().volume_text, "Vol 50");
    }

    #[test]
    fn bad_mode_leaves_state_untouched() {
        let mut state = SessionState::new();
        let _ = state.apply_snapshot(HostSnapshot::with_mode("Paused"));
        let before = state.clone();

        assert_eq!(
            state.apply_snapshot(HostSnapshot::with_mode("Dancing")),
            Err(ProtocolError::UnknownMode("Dancing".into()))
        );
        assert_eq!(
            state.apply_snapshot(HostSnapshot::with_mode("ChooseLevel")),
            Err(ProtocolError::LocalModeReported("ChooseLevel".into()))
        );
        assert_eq!(state, before);
    }

    #[test]
    fn snapshot_is_replaced_not_merged() {
        let mut state = SessionState::new();
        let _ = state.apply_snapshot(HostSnapshot {
            current_score: Some(10.0),
            ..HostSnapshot::with_mode("Catching")
        });
        let _ = state.apply_snapshot(HostSnapshot::with_mode("Catching"));
        assert_eq!(state.snapshot().and_then(|s| s.current_score), None);
    }

    #[test]
    fn level_browser_falls_back_when_playlist_vanishes() {
        let mut state = SessionState::new();
        state.mode = Mode::ChooseLevel;
        state.selection.select_playlist(playlist("a"));

        let kept = PlaylistCatalog { playlists: vec![playlist("a")], ..PlaylistCatalog::default() };
        assert_eq!(state.replace_catalog(kept), None);
        assert_eq!(state.mode(), Mode::ChooseLevel);

        let dropped = PlaylistCatalog { playlists: vec![playlist("b")], ..PlaylistCatalog::default() };
        assert_eq!(state.replace_catalog(dropped), Some(Mode::ChoosePlaylist));
        assert_eq!(state.selection().playlist(), None);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let mut state = SessionState::new();
        state.select_host(Host::new("headset-3"));
        let _ = state.apply_snapshot(HostSnapshot::with_mode("Catching"));
        state.selection.select_playlist(playlist("a"));
        state.awaiting_catalog = true;

        state.reset();

        assert_eq!(state.mode(), Mode::Pairing);
        assert_eq!(state.snapshot(), None);
        assert_eq!(state.selection().playlist(), None);
        assert!(!state.awaiting_catalog());
        assert_eq!(state.selection().host(), None);
        assert_eq!(state, SessionState::new());
    }
}
