//! Renderer-neutral view of the session.
//!
//! Captured after every batch of session actions and handed to
//! [`crate::Driver::render`]. [`Screen::lines`] gives a plain text layout for
//! line-oriented frontends.

use rcapp_core::{Clock, Details, DisplayFields, LifecycleState, Listing, Session};

/// Everything a frontend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    /// Label of the current mode.
    pub mode_label: &'static str,
    /// Connection lifecycle state.
    pub lifecycle: LifecycleState,
    /// Chosen Host, by label or id.
    pub host: Option<String>,
    /// Values derived from the latest snapshot.
    pub display: DisplayFields,
    /// Current browsing level.
    pub listing: Option<Listing>,
    /// Details of the current selection.
    pub details: Option<Details>,
    /// Last diagnostic or help text.
    pub status: Option<String>,
}

impl Screen {
    /// Capture the session's current state.
    pub fn capture<C: Clock>(session: &Session<C>, status: Option<&str>) -> Self {
        let state = session.state();
        Self {
            mode_label: session.mode().display_name(),
            lifecycle: session.lifecycle_state(),
            host: state.selection().host().map(|h| h.display_name().to_string()),
            display: state.display().clone(),
            listing: session.listing(),
            details: session.details(),
            status: status.map(str::to_string),
        }
    }

    /// Plain text layout, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let host = self.host.as_deref().unwrap_or("no host");
        lines.push(format!("[{}] {} ({:?})", self.mode_label, host, self.lifecycle));

        if self.lifecycle == LifecycleState::Active {
            let d = &self.display;
            lines.push(format!(
                "{} | {} | {} | {} | {}",
                d.volume_text, d.score_text, d.elapsed_text, d.casting_text, d.ui_text
            ));
            if let Some(song) = &d.song_name {
                lines.push(format!("Song: {song}"));
            }
        }

        if let Some(listing) = &self.listing {
            lines.push(format!("{} ({}: /back)", listing.title, listing.back_label));
            if let Some(placeholder) = listing.placeholder {
                lines.push(format!("  {placeholder}"));
            }
            for (i, row) in listing.rows.iter().enumerate() {
                let marker = if listing.selected == Some(i) { '>' } else { ' ' };
                lines.push(format!("{marker} {}. {row}", i + 1));
            }
        }

        if let Some(details) = &self.details {
            let mut summary = format!("  {}", details.name);
            if !details.creator.is_empty() {
                summary.push_str(&format!(" by {}", details.creator));
            }
            if let Some(difficulty) = &details.difficulty {
                summary.push_str(&format!(" [{difficulty}]"));
            }
            if let Some(count) = details.level_count {
                summary.push_str(&format!(" ({count} levels)"));
            }
            lines.push(summary);
            if let Some(song) = &details.song_name {
                lines.push(format!("  song: {song}"));
            }
            if let Some(notes) = &details.notes {
                lines.push(format!("  notes: {notes}"));
            }
        }

        if let Some(status) = &self.status {
            lines.push(format!("! {status}"));
        }

        lines
    }
}
