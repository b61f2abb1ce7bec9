//! Selection context.
//!
//! What the operator has picked so far: a Host to pair with, and while
//! browsing, a playlist and one of its levels.
//!
//! # Invariants
//!
//! - A level is selected only while a playlist is selected, and that level is
//!   one of the playlist's levels (matched by id).
//!
//! Every mutator preserves this; [`SelectionContext::is_consistent`] checks
//! it.

use rcapp_proto::{Level, Playlist, PlaylistCatalog};

use crate::error::ValidationError;

/// Pairing target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Host {
    /// Identifier passed to the transport's connect.
    pub id: String,
    /// Optional human-readable name.
    pub label: Option<String>,
}

impl Host {
    /// Host known only by id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), label: None }
    }

    /// Label if present, else id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Operator selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionContext {
    host: Option<Host>,
    playlist: Option<Playlist>,
    level: Option<Level>,
}

impl SelectionContext {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Chosen pairing target.
    pub fn host(&self) -> Option<&Host> {
        self.host.as_ref()
    }

    /// Selected playlist.
    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    /// Selected level.
    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Choose the Host to pair with.
    pub fn select_host(&mut self, host: Host) {
        self.host = Some(host);
    }

    /// Select a playlist. Always drops any level selected before.
    pub fn select_playlist(&mut self, playlist: Playlist) {
        self.playlist = Some(playlist);
        self.level = None;
    }

    /// Select a level of the selected playlist.
    ///
    /// # Errors
    ///
    /// - `ValidationError::NothingSelected` if no playlist is selected
    /// - `ValidationError::LevelNotInPlaylist` if the level is not one of the
    ///   selected playlist's levels
    pub fn select_level(&mut self, level: Level) -> Result<(), ValidationError> {
        let Some(playlist) = &self.playlist else {
            return Err(ValidationError::NothingSelected);
        };
        if playlist.level(&level.id).is_none() {
            return Err(ValidationError::LevelNotInPlaylist { level_id: level.id });
        }
        self.level = Some(level);
        Ok(())
    }

    /// Drop the level selection.
    pub fn clear_level(&mut self) {
        self.level = None;
    }

    /// Drop playlist and level, keep the Host.
    pub fn clear_browse(&mut self) {
        self.playlist = None;
        self.level = None;
    }

    /// Re-resolve playlist and level against a replacement catalog.
    ///
    /// Entries are matched by id and swapped for the catalog's current
    /// version; entries that no longer exist are dropped.
    pub fn resolve_against(&mut self, catalog: &PlaylistCatalog) {
        let Some(current) = self.playlist.take() else {
            self.level = None;
            return;
        };

        let Some(fresh) = catalog.playlist(&current.id).cloned() else {
            self.level = None;
            return;
        };

        self.level = self.level.take().and_then(|level| fresh.level(&level.id).cloned());
        self.playlist = Some(fresh);
    }

    /// Whether the level/playlist invariant holds.
    pub fn is_consistent(&self) -> bool {
        match (&self.playlist, &self.level) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(playlist), Some(level)) => playlist.level(&level.id).is_some(),
        }
    }
}
