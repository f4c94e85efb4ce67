use crate::app::App;
use crate::audio::{Player, PlayerState};
use crate::mpris::{MprisHandle, PlaybackStatus};

/// What MPRIS last saw: current track (release id, track id) and status.
pub type MprisSnapshot = (Option<(String, String)>, PlaybackStatus);

/// Map the session intent and the transport state onto MPRIS' three states.
pub fn playback_status(app: &App, player: &Player) -> PlaybackStatus {
    if app.session.current_track().is_none() {
        return PlaybackStatus::Stopped;
    }
    match player.state() {
        PlayerState::Playing => PlaybackStatus::Playing,
        PlayerState::Loading if app.session.is_playing() => PlaybackStatus::Playing,
        _ => PlaybackStatus::Paused,
    }
}

pub fn snapshot(app: &App, player: &Player) -> MprisSnapshot {
    let now = app
        .session
        .now_playing()
        .map(|n| (n.release_id.clone(), n.track.id.clone()));
    (now, playback_status(app, player))
}

pub fn update_mpris(mpris: &MprisHandle, app: &App, player: &Player, artist: &str) {
    let now = app.session.now_playing().and_then(|n| {
        app.catalog
            .release(&n.release_id)
            .map(|release| (release, &n.track))
    });
    mpris.set_track_metadata(now, artist);
    mpris.set_playback(playback_status(app, player));
}
