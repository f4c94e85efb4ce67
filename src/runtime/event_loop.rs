use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::{App, Direction, Focus};
use crate::audio::{AudioCmd, MediaElement, Player, PlayerNotice};
use crate::config;
use crate::error::AppError;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{MprisSnapshot, snapshot, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// What was last published over MPRIS.
    pub last_mpris: Option<MprisSnapshot>,
}

/// Result of one user action.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: handles input, UI drawing, sync with the media
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    media: &MediaElement,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), AppError> {
    loop {
        for event in media.drain_events() {
            if player.handle_event(event) == Some(PlayerNotice::TrackEnded) {
                app.advance(Direction::Next);
            }
        }

        media.send_all(reconcile(app, player));

        // Keep MPRIS in sync even when playback changes come from media keys or auto-advance.
        let snap = snapshot(app, player);
        if state.last_mpris.as_ref() != Some(&snap) {
            update_mpris(mpris, app, player, &settings.ui.artist_name);
            state.last_mpris = Some(snap);
        }

        terminal.draw(|f| ui::draw(f, app, player, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            debug!(?cmd, "MPRIS control");
            if apply_control(cmd, app) == Flow::Quit {
                quit(media, settings);
                return Ok(());
            }
            media.send_all(reconcile(app, player));
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, player, media) == Flow::Quit {
                    quit(media, settings);
                    return Ok(());
                }
                media.send_all(reconcile(app, player));
            }
        }
    }
}

fn quit(media: &MediaElement, settings: &config::Settings) {
    info!("shutting down");
    media.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

/// Bring the player in line with the session after anything changed.
pub fn reconcile(app: &App, player: &mut Player) -> Vec<AudioCmd> {
    player.sync(app.session.current_track(), app.session.is_playing())
}

/// Apply an MPRIS method call to the session.
pub fn apply_control(cmd: ControlCmd, app: &mut App) -> Flow {
    let has_track = app.session.current_track().is_some();
    let playing = app.session.is_playing();
    match cmd {
        ControlCmd::Quit => return Flow::Quit,
        ControlCmd::Play => {
            if !has_track {
                app.play_release(app.release_cursor);
            } else if !playing {
                app.toggle_play();
            }
        }
        ControlCmd::PlayPause => {
            if has_track {
                app.toggle_play();
            } else {
                app.play_release(app.release_cursor);
            }
        }
        // There is no stopped state with a track selected; stop pauses.
        ControlCmd::Pause | ControlCmd::Stop => {
            if playing {
                app.toggle_play();
            }
        }
        ControlCmd::Next => app.advance(Direction::Next),
        ControlCmd::Prev => app.advance(Direction::Previous),
    }
    Flow::Continue
}

pub fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    media: &MediaElement,
) -> Flow {
    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char(c @ '0'..='9') => {
            let percent = f64::from(c.to_digit(10).unwrap_or(0)) * 10.0;
            if let Some(cmd) = player.seek(percent) {
                media.send(cmd);
            }
        }
        KeyCode::Char('L') => {
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            if let Some(cmd) = player.seek_by(secs) {
                media.send(cmd);
            }
        }
        KeyCode::Char('H') => {
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            if let Some(cmd) = player.seek_by(-secs) {
                media.send(cmd);
            }
        }
        KeyCode::Char('m') => media.send(player.toggle_mute()),
        _ => apply_key(key.code, app),
    }
    Flow::Continue
}

/// Keys that only touch the app model.
pub fn apply_key(code: KeyCode, app: &mut App) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('h') | KeyCode::Left => app.focus = Focus::Releases,
        KeyCode::Char('l') | KeyCode::Right => app.focus = Focus::Tracks,
        KeyCode::Enter => app.activate(),
        KeyCode::Char(' ') | KeyCode::Char('p') => app.toggle_play(),
        KeyCode::Char('n') => app.advance(Direction::Next),
        KeyCode::Char('N') => app.advance(Direction::Previous),
        KeyCode::Char('t') => app.toggle_lang(),
        KeyCode::Char('K') => app.toggle_details_window(),
        _ => {}
    }
}
