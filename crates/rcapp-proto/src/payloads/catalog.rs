//! Playlist catalog.
//!
//! Two levels: playlists contain ordered levels. The Host sends the whole
//! catalog at once in an `AllPlaylists` message, either as a bare array of
//! playlists or as an object that also carries a song id to display name
//! table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// One playable level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Stable level id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Difficulty label, if the level has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Song id, resolved through [`PlaylistCatalog::song_name`].
    #[serde(rename = "song", alias = "songRef")]
    pub song_ref: String,
    /// Author.
    #[serde(default)]
    pub creator: String,
    /// Last modification date as reported by the Host.
    #[serde(default, alias = "date")]
    pub date_modified: String,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Ordered collection of levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Stable playlist id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Author.
    #[serde(default)]
    pub creator: String,
    /// Last modification date as reported by the Host.
    #[serde(default, alias = "date")]
    pub date_modified: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Levels in play order.
    #[serde(default, alias = "items")]
    pub levels: Vec<Level>,
}

impl Playlist {
    /// Level with the given id, if present.
    #[must_use]
    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.id == id)
    }
}

/// Everything the Host can be asked to load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistCatalog {
    /// Playlists in Host order.
    pub playlists: Vec<Playlist>,
    /// Song id to display name.
    pub song_names: BTreeMap<String, String>,
}

/// Accepted `AllPlaylists` payload shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogWire {
    Bare(Vec<Playlist>),
    Full {
        playlists: Vec<Playlist>,
        #[serde(default, rename = "songNames")]
        song_names: BTreeMap<String, String>,
    },
}

impl PlaylistCatalog {
    /// Decode an `AllPlaylists` payload.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidPayload` if the payload matches neither shape
    pub fn from_value(payload: Value) -> Result<Self> {
        let wire: CatalogWire =
            serde_json::from_value(payload).map_err(|e| ProtocolError::InvalidPayload {
                message_type: "AllPlaylists",
                reason: e.to_string(),
            })?;

        Ok(match wire {
            CatalogWire::Bare(playlists) => Self { playlists, song_names: BTreeMap::new() },
            CatalogWire::Full { playlists, song_names } => Self { playlists, song_names },
        })
    }

    /// Whether there is nothing to browse.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Playlist with the given id, if present.
    #[must_use]
    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|playlist| playlist.id == id)
    }

    /// Display name for a song id, if the Host provided one.
    #[must_use]
    pub fn song_name(&self, song_id: &str) -> Option<&str> {
        self.song_names.get(song_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_array_decodes() {
        let catalog = PlaylistCatalog::from_value(json!([
            {
                "id": "p1",
                "name": "Cool Playlist",
                "creator": "Bungo Sprungo",
                "date": "09/04/2000",
                "notes": "This is not a real playlist",
                "levels": [
                    { "id": "l1", "name": "Cool Song", "difficulty": "Medium", "song": "s1" }
                ]
            }
        ]));
        let Ok(catalog) = catalog else { unreachable!("valid payload") };

        assert_eq!(catalog.playlists.len(), 1);
        assert_eq!(catalog.playlists[0].date_modified, "09/04/2000");
        assert_eq!(catalog.playlist("p1").and_then(|p| p.level("l1")).map(|l| &*l.song_ref), Some("s1"));
        assert!(catalog.song_names.is_empty());
    }

    #[test]
    fn object_with_song_names_decodes() {
        let catalog = PlaylistCatalog::from_value(json!({
            "playlists": [],
            "songNames": { "s1": "10 Minutes of Microwaves Beeping" }
        }));
        let Ok(catalog) = catalog else { unreachable!("valid payload") };

        assert!(catalog.is_empty());
        assert_eq!(catalog.song_name("s1"), Some("10 Minutes of Microwaves Beeping"));
        assert_eq!(catalog.song_name("s2"), None);
    }

    #[test]
    fn empty_array_is_empty_catalog() {
        assert_eq!(PlaylistCatalog::from_value(json!([])), Ok(PlaylistCatalog::default()));
    }

    #[test]
    fn scalar_payload_rejected() {
        assert!(matches!(
            PlaylistCatalog::from_value(json!("nope")),
            Err(ProtocolError::InvalidPayload { message_type: "AllPlaylists", .. })
        ));
    }
}
