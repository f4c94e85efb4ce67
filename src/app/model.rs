//! Application model: `App`, the browsing state around the playback session.
//!
//! `App` holds the catalog, the list cursors, the interface language and
//! the `Session`. Everything here is plain data; the runtime owns the only
//! instance and hands out `&mut` to whoever handles input.

use crate::catalog::{Catalog, Release, Track};
use crate::i18n::Lang;

use super::session::{Direction, Session};

/// Which pane receives cursor movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Releases,
    Tracks,
}

/// How a track row should be rendered relative to the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackMarker {
    None,
    /// Selected but paused (or stopped at the end of the release).
    Current,
    /// Selected and the intent is to play.
    Sounding,
}

pub struct App {
    pub catalog: Catalog,
    pub session: Session,
    pub lang: Lang,
    pub focus: Focus,
    pub release_cursor: usize,
    pub track_cursor: usize,
    /// Move the cursor along when playback advances on its own.
    pub follow_playback: bool,
    pub details_window: bool,
}

impl App {
    pub fn new(catalog: Catalog, lang: Lang) -> Self {
        Self {
            catalog,
            session: Session::default(),
            lang,
            focus: Focus::Releases,
            release_cursor: 0,
            track_cursor: 0,
            follow_playback: true,
            details_window: false,
        }
    }

    pub fn selected_release(&self) -> Option<&Release> {
        self.catalog.get(self.release_cursor)
    }

    pub fn track_under_cursor(&self) -> Option<&Track> {
        self.selected_release()
            .and_then(|r| r.tracks.get(self.track_cursor))
    }

    /// Move the cursor down in the focused pane, wrapping to the top.
    pub fn cursor_down(&mut self) {
        match self.focus {
            Focus::Releases => {
                let len = self.catalog.len();
                if len > 0 {
                    self.release_cursor = (self.release_cursor + 1) % len;
                    self.track_cursor = 0;
                }
            }
            Focus::Tracks => {
                let len = self.selected_release().map_or(0, |r| r.tracks.len());
                if len > 0 {
                    self.track_cursor = (self.track_cursor + 1) % len;
                }
            }
        }
    }

    /// Move the cursor up in the focused pane, wrapping to the bottom.
    pub fn cursor_up(&mut self) {
        match self.focus {
            Focus::Releases => {
                let len = self.catalog.len();
                if len > 0 {
                    self.release_cursor = (self.release_cursor + len - 1) % len;
                    self.track_cursor = 0;
                }
            }
            Focus::Tracks => {
                let len = self.selected_release().map_or(0, |r| r.tracks.len());
                if len > 0 {
                    self.track_cursor = (self.track_cursor + len - 1) % len;
                }
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Releases => Focus::Tracks,
            Focus::Tracks => Focus::Releases,
        };
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }

    pub fn toggle_lang(&mut self) {
        self.lang = self.lang.toggle();
    }

    /// `enter`: the release pane behaves like the cover's play button, the
    /// track pane selects the row under the cursor.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Releases => self.play_release(self.release_cursor),
            Focus::Tracks => {
                let Some(track) = self.track_under_cursor().cloned() else {
                    return;
                };
                let Some(release_id) = self.selected_release().map(|r| r.id.clone()) else {
                    return;
                };
                self.session.select_track(&track, &release_id);
            }
        }
    }

    /// Cover play button: select the release's first track. Re-pressing it
    /// while that track is current toggles play/pause.
    pub fn play_release(&mut self, index: usize) {
        let Some(release) = self.catalog.get(index) else {
            return;
        };
        let Some(first) = release.first_track() else {
            return;
        };
        let (track, release_id) = (first.clone(), release.id.clone());
        self.session.select_track(&track, &release_id);
    }

    pub fn toggle_play(&mut self) {
        self.session.toggle_play();
    }

    /// Skip within the active release and keep the cursor on the new track.
    pub fn advance(&mut self, direction: Direction) {
        self.session.advance(&self.catalog, direction);
        if self.follow_playback {
            self.follow_now_playing();
        }
    }

    /// Put both cursors on the current track, if any.
    pub fn follow_now_playing(&mut self) {
        let Some(now) = self.session.now_playing() else {
            return;
        };
        let Some(ri) = self.catalog.index_of(&now.release_id) else {
            return;
        };
        let ti = self
            .catalog
            .get(ri)
            .and_then(|r| r.position_of(&now.track.id))
            .unwrap_or(0);
        self.release_cursor = ri;
        self.track_cursor = ti;
    }

    /// Whether the release card should show the pause glyph.
    pub fn release_is_playing(&self, release_id: &str) -> bool {
        self.session.is_playing() && self.session.active_release_id() == Some(release_id)
    }

    pub fn track_marker(&self, release_id: &str, track_id: &str) -> TrackMarker {
        let Some(now) = self.session.now_playing() else {
            return TrackMarker::None;
        };
        if now.release_id != release_id || now.track.id != track_id {
            return TrackMarker::None;
        }
        if self.session.is_playing() {
            TrackMarker::Sounding
        } else {
            TrackMarker::Current
        }
    }
}
