use crate::app::App;
use crate::audio::{AudioCmd, MediaElement, Player};
use crate::config;

/// Build the player from the audio settings and mirror them into the media
/// thread, which always starts unmuted.
pub fn apply_audio_defaults(media: &MediaElement, settings: &config::Settings) -> Player {
    let player = Player::new(settings.audio.start_muted);
    if player.is_muted() {
        media.send(AudioCmd::SetMuted(true));
    }
    player
}

/// Put the cursor on the newest release with something to play.
pub fn apply_ui_defaults(app: &mut App) {
    if let Some(index) = app
        .catalog
        .releases()
        .iter()
        .position(|r| !r.is_upcoming && !r.tracks.is_empty())
    {
        app.release_cursor = index;
        app.track_cursor = 0;
    }
}
