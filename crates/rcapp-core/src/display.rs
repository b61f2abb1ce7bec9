//! Display-facing fields derived from the latest snapshot.

use rcapp_proto::{HostSnapshot, PlaylistCatalog};

/// Text the display layer shows next to the mode label.
///
/// Recomputed from every snapshot, including ones that leave the mode alone.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    /// Volume as a percentage, e.g. `Vol 75`.
    pub volume_text: String,
    /// Score visibility and value, e.g. `Score Visible 120`.
    pub score_text: String,
    /// Raw score, if the Host reported one.
    pub score: Option<f64>,
    /// Elapsed and total time, e.g. `1:05 / 3:00`.
    pub elapsed_text: String,
    /// `Casting On` or `Casting Off`.
    pub casting_text: String,
    /// `UI On` or `UI Off`.
    pub ui_text: String,
    /// Song of the current level, resolved through the catalog when possible.
    pub song_name: Option<String>,
}

impl Default for DisplayFields {
    fn default() -> Self {
        Self {
            volume_text: "Vol --".to_string(),
            score_text: "Score Visible 0".to_string(),
            score: None,
            elapsed_text: "0:00 / 0:00".to_string(),
            casting_text: "Casting Off".to_string(),
            ui_text: "UI On".to_string(),
            song_name: None,
        }
    }
}

impl DisplayFields {
    /// Derive from a snapshot. Song ids are resolved through `catalog`.
    #[must_use]
    pub fn from_snapshot(snapshot: &HostSnapshot, catalog: &PlaylistCatalog) -> Self {
        let volume_text = snapshot.volume.map_or_else(
            || "Vol --".to_string(),
            |v| format!("Vol {}", (v.clamp(0.0, 1.0) * 100.0).round() as u8),
        );

        let score = snapshot.current_score;
        let visibility = if snapshot.score_visible.unwrap_or(true) { "Visible" } else { "Hidden" };
        let score_text = format!("Score {visibility} {}", score.unwrap_or(0.0));

        let elapsed_text = format!(
            "{} / {}",
            format_clock(snapshot.elapsed_time.unwrap_or(0.0)),
            format_clock(snapshot.duration.unwrap_or(0.0))
        );

        let casting_text =
            if snapshot.is_casting.unwrap_or(false) { "Casting On" } else { "Casting Off" };
        let ui_text = if snapshot.ui_visible.unwrap_or(true) { "UI On" } else { "UI Off" };

        let song_name = snapshot.current_song_id.as_deref().map(|id| {
            catalog.song_name(id).map_or_else(|| id.to_string(), str::to_string)
        });

        Self {
            volume_text,
            score_text,
            score,
            elapsed_text,
            casting_text: casting_text.to_string(),
            ui_text: ui_text.to_string(),
            song_name,
        }
    }
}

/// `m:ss`, negative and non-finite inputs shown as zero.
fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 { seconds.floor() as u64 } else { 0 };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn defaults_from_bare_snapshot() {
        let fields =
            DisplayFields::from_snapshot(&HostSnapshot::with_mode("Stopped"), &PlaylistCatalog::default());
        assert_eq!(fields, DisplayFields::default());
    }

    #[test]
    fn formats_reported_values() {
        let snapshot = HostSnapshot {
            volume: Some(0.75),
            current_score: Some(120.0),
            score_visible: Some(false),
            elapsed_time: Some(65.4),
            duration: Some(180.0),
            is_casting: Some(true),
            ui_visible: Some(false),
            ..HostSnapshot::with_mode("Catching")
        };
        let fields = DisplayFields::from_snapshot(&snapshot, &PlaylistCatalog::default());

        assert_eq!(fields.volume_text, "Vol 75");
        assert_eq!(fields.score_text, "Score Hidden 120");
        assert_eq!(fields.elapsed_text, "1:05 / 3:00");
        assert_eq!(fields.casting_text, "Casting On");
        assert_eq!(fields.ui_text, "UI Off");
    }

    #[test]
    fn song_name_resolves_through_catalog() {
        let catalog = PlaylistCatalog {
            playlists: Vec::new(),
            song_names: BTreeMap::from([("s1".to_string(), "Song song".to_string())]),
        };
        let snapshot =
            HostSnapshot { current_song_id: Some("s1".into()), ..HostSnapshot::with_mode("Loading") };
        assert_eq!(
            DisplayFields::from_snapshot(&snapshot, &catalog).song_name.as_deref(),
            Some("Song song")
        );

        let unknown =
            HostSnapshot { current_song_id: Some("s2".into()), ..HostSnapshot::with_mode("Loading") };
        assert_eq!(
            DisplayFields::from_snapshot(&unknown, &catalog).song_name.as_deref(),
            Some("s2")
        );
    }

    #[test]
    fn clock_handles_bad_input() {
        assert_eq!(format_clock(-3.0), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(600.0), "10:00");
    }
}
