//! The playback session: what should be playing, and from which release.
//!
//! `Session` only records intent. It never talks to the media element; the
//! `Player` reads it after every change and reconciles.

use tracing::{debug, info};

use crate::catalog::{Catalog, Track};

/// Skip direction for `Session::advance`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// The selected track together with the release whose tracklist defines
/// next/previous for it. Kept as one value so neither can be set alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub track: Track,
    pub release_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    now: Option<NowPlaying>,
    is_playing: bool,
}

impl Session {
    pub fn current_track(&self) -> Option<&Track> {
        self.now.as_ref().map(|n| &n.track)
    }

    pub fn active_release_id(&self) -> Option<&str> {
        self.now.as_ref().map(|n| n.release_id.as_str())
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now.as_ref()
    }

    /// Requested play state. Always `false` while nothing is selected.
    pub fn is_playing(&self) -> bool {
        self.now.is_some() && self.is_playing
    }

    /// Select `track` from the release `release_id`.
    ///
    /// Re-selecting the current track toggles play/pause; any other track
    /// becomes current and starts playing.
    pub fn select_track(&mut self, track: &Track, release_id: &str) {
        if self.current_track().is_some_and(|t| t.id == track.id) {
            self.is_playing = !self.is_playing;
            debug!(track = %track.id, playing = self.is_playing, "reselected current track");
            return;
        }

        info!(track = %track.id, release = %release_id, "track selected");
        self.now = Some(NowPlaying {
            track: track.clone(),
            release_id: release_id.to_string(),
        });
        self.is_playing = true;
    }

    /// Move through the active release's tracklist. Never wraps: `Next` on
    /// the last track stops playback, `Previous` on the first does nothing.
    pub fn advance(&mut self, catalog: &Catalog, direction: Direction) {
        let Some(now) = self.now.as_ref() else {
            return;
        };
        let Some(release) = catalog.release(&now.release_id) else {
            debug!(release = %now.release_id, "active release no longer in catalog");
            return;
        };
        let Some(pos) = release.position_of(&now.track.id) else {
            debug!(track = %now.track.id, "current track not found in active release");
            return;
        };

        let target = match direction {
            Direction::Next => pos.checked_add(1).filter(|&i| i < release.tracks.len()),
            Direction::Previous => pos.checked_sub(1),
        };

        match (target, direction) {
            (Some(i), _) => {
                let track = release.tracks[i].clone();
                info!(track = %track.id, release = %release.id, ?direction, "advanced");
                self.now = Some(NowPlaying {
                    track,
                    release_id: release.id.clone(),
                });
                self.is_playing = true;
            }
            (None, Direction::Next) => {
                debug!(release = %release.id, "end of tracklist");
                self.is_playing = false;
            }
            (None, Direction::Previous) => {}
        }
    }

    /// Flip play/pause intent. No-op without a current track.
    pub fn toggle_play(&mut self) {
        if self.now.is_some() {
            self.is_playing = !self.is_playing;
        }
    }
}
