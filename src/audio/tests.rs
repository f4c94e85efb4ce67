use std::path::PathBuf;
use std::time::Duration;

use super::fetch::{Location, locate};
use super::*;
use crate::catalog::Track;

fn track(id: &str, url: &str) -> Track {
    Track {
        id: id.into(),
        title: id.into(),
        audio_url: url.into(),
        duration: "1:00".into(),
    }
}

fn ev(resource: u64, kind: MediaEventKind) -> MediaEvent {
    MediaEvent::new(ResourceId(resource), kind)
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn load_failure() -> MediaFailure {
    MediaFailure::Load("404".into())
}

#[test]
fn format_elapsed_is_minutes_and_padded_seconds() {
    assert_eq!(format_elapsed(secs(65)), "1:05");
    assert_eq!(format_elapsed(secs(9)), "0:09");
    assert_eq!(format_elapsed(secs(600)), "10:00");
    assert_eq!(format_elapsed(Duration::from_millis(59_999)), "0:59");
}

#[test]
fn selecting_a_track_loads_and_plays_it() {
    let mut p = Player::new(false);
    let t1 = track("t1", "https://a/1.mp3");

    let cmds = p.sync(Some(&t1), true);
    assert_eq!(
        cmds,
        vec![
            AudioCmd::Load {
                resource: ResourceId(1),
                url: "https://a/1.mp3".into()
            },
            AudioCmd::Play(ResourceId(1)),
        ]
    );
    assert_eq!(p.state(), PlayerState::Loading);
    assert!(p.status().is_loading);

    assert_eq!(p.handle_event(ev(1, MediaEventKind::Playing)), None);
    assert_eq!(p.state(), PlayerState::Playing);
    assert!(!p.status().is_loading);
}

#[test]
fn resyncing_the_same_intent_issues_nothing() {
    let mut p = Player::new(false);
    let t1 = track("t1", "https://a/1.mp3");
    p.sync(Some(&t1), true);
    assert!(p.sync(Some(&t1), true).is_empty());
}

#[test]
fn tracks_sharing_a_url_do_not_reload() {
    let mut p = Player::new(false);
    let a = track("a", "https://a/same.mp3");
    let b = track("b", "https://a/same.mp3");
    p.sync(Some(&a), true);
    assert!(p.sync(Some(&b), true).is_empty());
    assert_eq!(p.resource(), Some(ResourceId(1)));
}

#[test]
fn failure_for_a_superseded_load_is_ignored() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.sync(Some(&track("t2", "https://a/2.mp3")), true);
    assert_eq!(p.resource(), Some(ResourceId(2)));

    p.handle_event(ev(1, MediaEventKind::Failed(load_failure())));
    p.handle_event(ev(
        1,
        MediaEventKind::PlayRejected(PlayRejection::Failed(load_failure())),
    ));

    assert_eq!(p.error(), None);
    assert_eq!(p.state(), PlayerState::Loading);
    assert!(!p.status().has_error);
}

#[test]
fn stale_progress_and_end_are_ignored() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.sync(Some(&track("t2", "https://a/2.mp3")), true);

    p.handle_event(ev(
        1,
        MediaEventKind::TimeUpdate {
            position: secs(30),
            duration: Some(secs(60)),
        },
    ));
    assert_eq!(p.status().progress_percent, 0.0);
    assert_eq!(p.handle_event(ev(1, MediaEventKind::Ended)), None);
}

#[test]
fn aborted_play_request_is_not_an_error() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);

    p.handle_event(ev(1, MediaEventKind::PlayRejected(PlayRejection::Aborted)));
    assert_eq!(p.error(), None);
    assert_ne!(p.state(), PlayerState::Errored);
}

#[test]
fn aborted_after_pause_settles_in_paused() {
    let mut p = Player::new(false);
    let t1 = track("t1", "https://a/1.mp3");
    p.sync(Some(&t1), true);
    assert_eq!(p.sync(Some(&t1), false), vec![AudioCmd::Pause]);

    p.handle_event(ev(1, MediaEventKind::PlayRejected(PlayRejection::Aborted)));
    assert_eq!(p.state(), PlayerState::Paused);
    assert_eq!(p.error(), None);
}

#[test]
fn genuine_failure_sets_errored() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);

    p.handle_event(ev(
        1,
        MediaEventKind::PlayRejected(PlayRejection::Failed(MediaFailure::Playback(
            "denied".into(),
        ))),
    ));
    assert_eq!(p.state(), PlayerState::Errored);
    assert!(p.status().has_error);
    assert_eq!(p.error().map(MediaFailure::kind), Some("playback"));
}

#[test]
fn progress_waits_for_a_known_duration() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);

    p.handle_event(ev(
        1,
        MediaEventKind::TimeUpdate {
            position: secs(10),
            duration: None,
        },
    ));
    let status = p.status();
    assert_eq!(status.progress_percent, 0.0);
    assert_eq!(status.elapsed_label, "0:10");

    p.handle_event(ev(
        1,
        MediaEventKind::MetadataLoaded {
            duration: Some(secs(40)),
        },
    ));
    p.handle_event(ev(
        1,
        MediaEventKind::TimeUpdate {
            position: secs(10),
            duration: None,
        },
    ));
    assert_eq!(p.status().progress_percent, 25.0);
}

#[test]
fn zero_duration_counts_as_unknown() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.handle_event(ev(
        1,
        MediaEventKind::MetadataLoaded {
            duration: Some(Duration::ZERO),
        },
    ));
    assert_eq!(p.duration(), None);
    assert_eq!(p.seek(50.0), None);
}

#[test]
fn progress_is_clamped_to_one_hundred() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.handle_event(ev(
        1,
        MediaEventKind::TimeUpdate {
            position: secs(150),
            duration: Some(secs(100)),
        },
    ));
    assert_eq!(p.status().progress_percent, 100.0);
}

#[test]
fn seek_without_duration_moves_the_scrubber_only() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);

    assert_eq!(p.seek(40.0), None);
    assert_eq!(p.status().progress_percent, 40.0);
}

#[test]
fn seek_without_a_resource_leaves_the_scrubber_alone() {
    let mut p = Player::new(false);

    assert_eq!(p.seek(60.0), None);
    assert_eq!(p.status().progress_percent, 0.0);

    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.sync(None, false);
    assert_eq!(p.seek(30.0), None);
    assert_eq!(p.status().progress_percent, 0.0);
}

#[test]
fn seek_with_duration_issues_a_position() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.handle_event(ev(
        1,
        MediaEventKind::MetadataLoaded {
            duration: Some(secs(200)),
        },
    ));

    assert_eq!(
        p.seek(25.0),
        Some(AudioCmd::Seek {
            resource: ResourceId(1),
            position: secs(50),
        })
    );
    assert_eq!(p.status().progress_percent, 25.0);

    // Out-of-range input is clamped.
    assert_eq!(
        p.seek(180.0),
        Some(AudioCmd::Seek {
            resource: ResourceId(1),
            position: secs(200),
        })
    );
    assert_eq!(p.seek(f64::NAN), None);
}

#[test]
fn seek_by_scrubs_relative_to_position() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.handle_event(ev(
        1,
        MediaEventKind::TimeUpdate {
            position: secs(10),
            duration: Some(secs(100)),
        },
    ));

    let Some(AudioCmd::Seek { position, .. }) = p.seek_by(5) else {
        panic!("expected a seek command");
    };
    assert!((position.as_secs_f64() - 15.0).abs() < 1e-6);

    let Some(AudioCmd::Seek { position, .. }) = p.seek_by(-60) else {
        panic!("expected a seek command");
    };
    assert_eq!(position, Duration::ZERO);
}

#[test]
fn mute_survives_track_changes() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    assert_eq!(p.toggle_mute(), AudioCmd::SetMuted(true));

    p.sync(Some(&track("t2", "https://a/2.mp3")), true);
    assert!(p.is_muted());
    assert!(p.status().is_muted);

    assert_eq!(p.toggle_mute(), AudioCmd::SetMuted(false));
    assert!(Player::new(true).is_muted());
}

#[test]
fn toggling_intent_pauses_and_resumes() {
    let mut p = Player::new(false);
    let t1 = track("t1", "https://a/1.mp3");
    p.sync(Some(&t1), true);
    p.handle_event(ev(1, MediaEventKind::Playing));

    assert_eq!(p.sync(Some(&t1), false), vec![AudioCmd::Pause]);
    assert_eq!(p.state(), PlayerState::Paused);

    assert_eq!(p.sync(Some(&t1), true), vec![AudioCmd::Play(ResourceId(1))]);
    assert_eq!(p.state(), PlayerState::Loading);
}

#[test]
fn playing_event_after_pause_is_not_trusted() {
    let mut p = Player::new(false);
    let t1 = track("t1", "https://a/1.mp3");
    p.sync(Some(&t1), true);
    p.sync(Some(&t1), false);

    p.handle_event(ev(1, MediaEventKind::Playing));
    assert_eq!(p.state(), PlayerState::Paused);
}

#[test]
fn new_load_clears_the_previous_error() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.handle_event(ev(1, MediaEventKind::Failed(load_failure())));
    assert_eq!(p.state(), PlayerState::Errored);

    p.sync(Some(&track("t2", "https://a/2.mp3")), true);
    assert_eq!(p.error(), None);
    assert_eq!(p.state(), PlayerState::Loading);
}

#[test]
fn pausing_keeps_the_error_and_playing_again_reloads() {
    let mut p = Player::new(false);
    let t1 = track("t1", "https://a/1.mp3");
    p.sync(Some(&t1), true);
    p.handle_event(ev(1, MediaEventKind::Failed(load_failure())));

    assert_eq!(p.sync(Some(&t1), false), vec![AudioCmd::Pause]);
    assert_eq!(p.state(), PlayerState::Errored);

    assert_eq!(
        p.sync(Some(&t1), true),
        vec![
            AudioCmd::Load {
                resource: ResourceId(2),
                url: "https://a/1.mp3".into()
            },
            AudioCmd::Play(ResourceId(2)),
        ]
    );
    assert_eq!(p.error(), None);
}

#[test]
fn end_of_media_is_reported_upward() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);
    p.handle_event(ev(1, MediaEventKind::Playing));

    assert_eq!(
        p.handle_event(ev(1, MediaEventKind::Ended)),
        Some(PlayerNotice::TrackEnded)
    );
    assert_eq!(p.state(), PlayerState::Idle);
}

#[test]
fn clearing_the_track_stops_and_goes_idle() {
    let mut p = Player::new(false);
    p.sync(Some(&track("t1", "https://a/1.mp3")), true);

    assert_eq!(p.sync(None, false), vec![AudioCmd::Stop]);
    assert_eq!(p.state(), PlayerState::Idle);
    assert_eq!(p.resource(), None);
    assert!(p.sync(None, false).is_empty());
}

#[test]
fn selecting_paused_loads_without_playing() {
    let mut p = Player::new(false);
    let cmds = p.sync(Some(&track("t1", "https://a/1.mp3")), false);
    assert_eq!(cmds.len(), 1);
    assert!(matches!(cmds[0], AudioCmd::Load { .. }));
    assert_eq!(p.state(), PlayerState::Paused);
}

#[test]
fn locate_sorts_remote_from_local() {
    assert!(matches!(
        locate("https://cdn.example.com/a.mp3"),
        Ok(Location::Remote(_))
    ));
    assert_eq!(
        locate("/music/a.mp3"),
        Ok(Location::Local(PathBuf::from("/music/a.mp3")))
    );
    assert_eq!(
        locate("music/a.mp3"),
        Ok(Location::Local(PathBuf::from("music/a.mp3")))
    );
    assert_eq!(
        locate("file:///music/a.mp3"),
        Ok(Location::Local(PathBuf::from("/music/a.mp3")))
    );
    assert!(locate("ftp://example.com/a.mp3").is_err());
}

#[test]
fn playing_again_after_the_end_restarts_the_resource() {
    let mut p = Player::new(false);
    let t1 = track("t1", "https://a/1.mp3");
    p.sync(Some(&t1), true);
    p.handle_event(ev(1, MediaEventKind::Playing));
    p.handle_event(ev(1, MediaEventKind::Ended));

    // Session stopped at the end of the release.
    assert!(p.sync(Some(&t1), false).is_empty());
    assert_eq!(p.state(), PlayerState::Idle);

    assert_eq!(p.sync(Some(&t1), true), vec![AudioCmd::Play(ResourceId(1))]);
    assert_eq!(p.state(), PlayerState::Loading);
}
