//! The `Player` state machine.
//!
//! The player turns the session's intent into `AudioCmd`s and folds the
//! media element's `MediaEvent`s back into transport state. It never blocks
//! and never touches audio hardware, so the whole thing runs on the UI loop.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::Track;

use super::types::{
    AudioCmd, MediaEvent, MediaEventKind, MediaFailure, PlayRejection, ResourceId,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Errored,
}

/// Things the player reports upward instead of deciding itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerNotice {
    /// The current resource played to its natural end.
    TrackEnded,
}

/// Snapshot rendered by the transport bar.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportStatus {
    pub state: PlayerState,
    pub progress_percent: f64,
    pub elapsed_label: String,
    pub is_loading: bool,
    pub has_error: bool,
    pub is_muted: bool,
}

/// Format an elapsed position as `m:ss` (minutes unpadded, no hours).
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Default)]
pub struct Player {
    state: PlayerState,
    resource: Option<ResourceId>,
    issued: u64,
    url: Option<String>,
    wants_play: bool,
    position: Duration,
    duration: Option<Duration>,
    progress_percent: f64,
    error: Option<MediaFailure>,
    muted: bool,
}

impl Player {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            ..Self::default()
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    #[cfg(test)]
    pub fn resource(&self) -> Option<ResourceId> {
        self.resource
    }

    /// Media duration, once the element has reported a non-zero one.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&MediaFailure> {
        self.error.as_ref()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn status(&self) -> TransportStatus {
        TransportStatus {
            state: self.state,
            progress_percent: self.progress_percent,
            elapsed_label: format_elapsed(self.position),
            is_loading: self.state == PlayerState::Loading,
            has_error: self.error.is_some(),
            is_muted: self.muted,
        }
    }

    /// Reflect the session's `track` and play intent into media commands.
    ///
    /// A new resource locator supersedes the previous load: it gets a fresh
    /// `ResourceId`, so anything still in flight for the old one is ignored.
    pub fn sync(&mut self, track: Option<&Track>, is_playing: bool) -> Vec<AudioCmd> {
        let mut cmds = Vec::new();

        let Some(track) = track else {
            if self.resource.take().is_some() {
                cmds.push(AudioCmd::Stop);
            }
            self.url = None;
            self.wants_play = false;
            self.state = PlayerState::Idle;
            self.error = None;
            self.reset_progress();
            return cmds;
        };

        // Asking to play again after a failure starts a fresh load.
        let retry = is_playing && !self.wants_play && self.state == PlayerState::Errored;
        if retry || self.url.as_deref() != Some(track.audio_url.as_str()) {
            let resource = self.issue_resource();
            info!(%resource, track = %track.id, url = %track.audio_url, "loading resource");

            self.url = Some(track.audio_url.clone());
            self.error = None;
            self.reset_progress();
            cmds.push(AudioCmd::Load {
                resource,
                url: track.audio_url.clone(),
            });

            self.wants_play = is_playing;
            if is_playing {
                self.state = PlayerState::Loading;
                cmds.push(AudioCmd::Play(resource));
            } else {
                self.state = PlayerState::Paused;
            }
            return cmds;
        }

        if is_playing == self.wants_play {
            return cmds;
        }
        self.wants_play = is_playing;

        let Some(resource) = self.resource else {
            return cmds;
        };
        if is_playing {
            self.error = None;
            self.state = PlayerState::Loading;
            cmds.push(AudioCmd::Play(resource));
        } else {
            if self.state != PlayerState::Errored {
                self.state = PlayerState::Paused;
            }
            cmds.push(AudioCmd::Pause);
        }
        cmds
    }

    /// Fold one media event into the transport state.
    pub fn handle_event(&mut self, event: MediaEvent) -> Option<PlayerNotice> {
        if self.resource != Some(event.resource) {
            debug!(resource = %event.resource, kind = ?event.kind, "ignoring event for superseded resource");
            return None;
        }

        match event.kind {
            MediaEventKind::MetadataLoaded { duration } => {
                self.duration = duration.filter(|d| !d.is_zero());
                self.error = None;
                debug!(resource = %event.resource, duration = ?self.duration, "metadata loaded");
            }
            MediaEventKind::Waiting => {
                if self.state == PlayerState::Playing {
                    self.state = PlayerState::Loading;
                }
            }
            MediaEventKind::Playing => {
                if self.wants_play {
                    self.state = PlayerState::Playing;
                    self.error = None;
                }
            }
            MediaEventKind::TimeUpdate { position, duration } => {
                if let Some(d) = duration.filter(|d| !d.is_zero()) {
                    self.duration = Some(d);
                }
                self.position = position;
                if let Some(d) = self.duration {
                    let pct = position.as_secs_f64() / d.as_secs_f64() * 100.0;
                    self.progress_percent = pct.clamp(0.0, 100.0);
                }
            }
            MediaEventKind::Ended => {
                info!(resource = %event.resource, "track ended");
                // Asking to play the same resource again restarts it.
                self.wants_play = false;
                self.state = PlayerState::Idle;
                return Some(PlayerNotice::TrackEnded);
            }
            MediaEventKind::Failed(failure)
            | MediaEventKind::PlayRejected(PlayRejection::Failed(failure)) => {
                self.fail(event.resource, failure);
            }
            MediaEventKind::PlayRejected(PlayRejection::Aborted) => {
                debug!(resource = %event.resource, "play request interrupted");
                if !self.wants_play && self.state == PlayerState::Loading {
                    self.state = PlayerState::Paused;
                }
            }
        }
        None
    }

    /// Seek to `percent` (0-100) of the media.
    ///
    /// The scrub position moves immediately; the command is only issued
    /// once the duration is known.
    pub fn seek(&mut self, percent: f64) -> Option<AudioCmd> {
        if !percent.is_finite() {
            return None;
        }
        let resource = self.resource?;
        let percent = percent.clamp(0.0, 100.0);
        self.progress_percent = percent;

        let duration = self.duration?;
        let position = duration.mul_f64(percent / 100.0);
        self.position = position;
        Some(AudioCmd::Seek { resource, position })
    }

    /// Scrub by `delta_secs` relative to the current position.
    pub fn seek_by(&mut self, delta_secs: i64) -> Option<AudioCmd> {
        let duration = self.duration?.as_secs_f64();
        let target = (self.position.as_secs_f64() + delta_secs as f64).clamp(0.0, duration);
        self.seek(target / duration * 100.0)
    }

    /// Flip mute. Survives track changes.
    pub fn toggle_mute(&mut self) -> AudioCmd {
        self.muted = !self.muted;
        AudioCmd::SetMuted(self.muted)
    }

    fn fail(&mut self, resource: ResourceId, failure: MediaFailure) {
        warn!(%resource, kind = failure.kind(), error = %failure, "media failure");
        self.state = PlayerState::Errored;
        self.error = Some(failure);
    }

    fn issue_resource(&mut self) -> ResourceId {
        self.issued += 1;
        let id = ResourceId(self.issued);
        self.resource = Some(id);
        id
    }

    fn reset_progress(&mut self) {
        self.position = Duration::ZERO;
        self.duration = None;
        self.progress_percent = 0.0;
    }
}
