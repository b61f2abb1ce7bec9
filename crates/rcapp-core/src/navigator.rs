//! Two-level playlist/level browser.
//!
//! ```text
//!            browse                 commit (playlist selected)
//!   any ─────────────> ChoosePlaylist ────────────────────────> ChooseLevel
//!                        │     ^                                  │     │
//!                   back │     └──────────────── back ────────────┘     │ commit (level selected)
//!                        v                                              v
//!                   Host mode                                  LoadLevel command
//! ```
//!
//! `select` changes the selection without leaving the current level. Loading
//! a level does not change the local mode; the Host's next snapshot does.

use rcapp_proto::Action;

use crate::{Mode, error::ValidationError, state::SessionState};

/// Result of one navigation operation.
#[derive(Debug, Clone, PartialEq)]
pub enum NavStep {
    /// Local mode changed.
    Moved(Mode),
    /// Command for the Host.
    Command(Action),
    /// Selection changed, mode did not.
    Selected,
}

/// Navigation operations over a [`SessionState`].
#[derive(Debug)]
pub struct Navigator<'a> {
    state: &'a mut SessionState,
}

impl<'a> Navigator<'a> {
    pub(crate) fn new(state: &'a mut SessionState) -> Self {
        Self { state }
    }

    /// Enter the playlist browser with a clean selection.
    ///
    /// With an empty catalog and no request outstanding, asks the Host for
    /// its playlists.
    pub fn browse(&mut self) -> Vec<NavStep> {
        let mut steps = Vec::new();

        self.state.selection.clear_browse();
        match self.state.set_mode(Mode::ChoosePlaylist) {
            Some(mode) => steps.push(NavStep::Moved(mode)),
            None => steps.push(NavStep::Selected),
        }

        if self.state.catalog.is_empty() && !self.state.awaiting_catalog {
            self.state.awaiting_catalog = true;
            steps.push(NavStep::Command(Action::GetPlaylists));
        }

        steps
    }

    /// Select row `index` of the current listing.
    ///
    /// # Errors
    ///
    /// - `ValidationError::NotBrowsing` outside the browsing modes
    /// - `ValidationError::NoSuchEntry` if `index` is past the listing
    pub fn select(&mut self, index: usize) -> Result<Vec<NavStep>, ValidationError> {
        match self.state.mode {
            Mode::ChoosePlaylist => {
                let playlists = &self.state.catalog.playlists;
                let playlist = playlists
                    .get(index)
                    .cloned()
                    .ok_or(ValidationError::NoSuchEntry { index, len: playlists.len() })?;
                self.state.selection.select_playlist(playlist);
            },
            Mode::ChooseLevel => {
                let Some(playlist) = self.state.selection.playlist() else {
                    return Err(ValidationError::NothingSelected);
                };
                let level = playlist
                    .levels
                    .get(index)
                    .cloned()
                    .ok_or(ValidationError::NoSuchEntry { index, len: playlist.levels.len() })?;
                self.state.selection.select_level(level)?;
            },
            _ => return Err(ValidationError::NotBrowsing),
        }
        Ok(vec![NavStep::Selected])
    }

    /// Act on the current selection.
    ///
    /// In the playlist browser, descend into the selected playlist. In the
    /// level browser, request the selected level.
    ///
    /// # Errors
    ///
    /// - `ValidationError::NotBrowsing` outside the browsing modes
    /// - `ValidationError::NothingSelected` with nothing selected at this level
    pub fn commit(&mut self) -> Result<Vec<NavStep>, ValidationError> {
        match self.state.mode {
            Mode::ChoosePlaylist => {
                if self.state.selection.playlist().is_none() {
                    return Err(ValidationError::NothingSelected);
                }
                self.state.selection.clear_level();
                Ok(self.state.set_mode(Mode::ChooseLevel).map(NavStep::Moved).into_iter().collect())
            },
            Mode::ChooseLevel => {
                let selection = &self.state.selection;
                let (Some(playlist), Some(level)) = (selection.playlist(), selection.level()) else {
                    return Err(ValidationError::NothingSelected);
                };
                Ok(vec![NavStep::Command(Action::LoadLevel {
                    playlist_id: playlist.id.clone(),
                    level_id: level.id.clone(),
                })])
            },
            _ => Err(ValidationError::NotBrowsing),
        }
    }

    /// Double-activation: select row `index`, then commit.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::select`] or [`Self::commit`].
    pub fn activate(&mut self, index: usize) -> Result<Vec<NavStep>, ValidationError> {
        let mut steps = self.select(index)?;
        steps.extend(self.commit()?);
        Ok(steps)
    }

    /// Leave the current level.
    ///
    /// The level browser returns to the playlist browser keeping the
    /// playlist; the playlist browser returns to the Host's mode and drops
    /// any outstanding playlist request, so the next `browse` asks again.
    ///
    /// # Errors
    ///
    /// - `ValidationError::NotBrowsing` outside the browsing modes
    pub fn back(&mut self) -> Result<Vec<NavStep>, ValidationError> {
        let target = match self.state.mode {
            Mode::ChooseLevel => {
                self.state.selection.clear_level();
                Mode::ChoosePlaylist
            },
            Mode::ChoosePlaylist => {
                self.state.selection.clear_browse();
                self.state.awaiting_catalog = false;
                self.state.host_mode()
            },
            _ => return Err(ValidationError::NotBrowsing),
        };
        Ok(self.state.set_mode(target).map(NavStep::Moved).into_iter().collect())
    }
}

/// Rows of the current browsing level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Heading.
    pub title: &'static str,
    /// Label of the back control.
    pub back_label: &'static str,
    /// Row names, in catalog order.
    pub rows: Vec<String>,
    /// Index of the selected row.
    pub selected: Option<usize>,
    /// Shown instead of an empty list.
    pub placeholder: Option<&'static str>,
}

/// Details of the selected playlist or level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Details {
    /// Entry name.
    pub name: String,
    /// Author.
    pub creator: String,
    /// Last modification date as the Host reported it.
    pub date_modified: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Level difficulty.
    pub difficulty: Option<String>,
    /// Level song, resolved to a display name where the catalog knows it.
    pub song_name: Option<String>,
    /// Number of levels, for a playlist.
    pub level_count: Option<usize>,
}

const WAITING_FOR_PLAYLISTS: &str = "Waiting for playlists from host…";
const NO_PLAYLISTS: &str = "No playlists on host";
const NO_LEVELS: &str = "Playlist has no levels";

impl SessionState {
    /// Current browsing level. `None` outside the browsing modes.
    pub fn listing(&self) -> Option<Listing> {
        match self.mode {
            Mode::ChoosePlaylist => {
                let playlists = &self.catalog.playlists;
                let selected = self
                    .selection
                    .playlist()
                    .and_then(|p| playlists.iter().position(|c| c.id == p.id));
                let placeholder = match (playlists.is_empty(), self.awaiting_catalog) {
                    (false, _) => None,
                    (true, true) => Some(WAITING_FOR_PLAYLISTS),
                    (true, false) => Some(NO_PLAYLISTS),
                };
                Some(Listing {
                    title: "Choose a Playlist",
                    back_label: "Cancel",
                    rows: playlists.iter().map(|p| p.name.clone()).collect(),
                    selected,
                    placeholder,
                })
            },
            Mode::ChooseLevel => {
                let levels = self.selection.playlist().map(|p| p.levels.as_slice()).unwrap_or_default();
                let selected =
                    self.selection.level().and_then(|l| levels.iter().position(|c| c.id == l.id));
                Some(Listing {
                    title: "Choose a Level",
                    back_label: "Back",
                    rows: levels.iter().map(|l| l.name.clone()).collect(),
                    selected,
                    placeholder: levels.is_empty().then_some(NO_LEVELS),
                })
            },
            _ => None,
        }
    }

    /// Details of the selected level, else the selected playlist.
    pub fn details(&self) -> Option<Details> {
        if let Some(level) = self.selection.level() {
            let song_name = self
                .catalog
                .song_name(&level.song_ref)
                .map_or_else(|| level.song_ref.clone(), str::to_string);
            return Some(Details {
                name: level.name.clone(),
                creator: level.creator.clone(),
                date_modified: level.date_modified.clone(),
                notes: level.notes.clone(),
                difficulty: level.difficulty.clone(),
                song_name: Some(song_name),
                level_count: None,
            });
        }

        self.selection.playlist().map(|playlist| Details {
            name: playlist.name.clone(),
            creator: playlist.creator.clone(),
            date_modified: playlist.date_modified.clone(),
            notes: (!playlist.notes.is_empty()).then(|| playlist.notes.clone()),
            difficulty: None,
            song_name: None,
            level_count: Some(playlist.levels.len()),
        })
    }
}
