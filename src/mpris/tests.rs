use super::*;
use crate::catalog::{LocalizedText, ReleaseKind, ReleaseLinks};
use std::sync::mpsc;

fn make_release() -> (Release, Track) {
    let track = Track {
        id: "t-1".to_string(),
        title: "Test Title".to_string(),
        audio_url: "https://cdn.example.com/test.mp3".to_string(),
        duration: "3:25".to_string(),
    };
    let release = Release {
        id: "concrete-echoes".to_string(),
        title: "Concrete Echoes".to_string(),
        year: "2024".to_string(),
        kind: ReleaseKind::Album,
        description: LocalizedText::default(),
        cover_url: String::new(),
        tracks: vec![track.clone()],
        links: ReleaseLinks::default(),
        is_upcoming: false,
    };
    (release, track)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let (release, track) = make_release();
    handle.set_track_metadata(Some((&release, &track)), "DANVIR");

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["DANVIR".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Concrete Echoes"));
        assert_eq!(s.url.as_deref(), Some("https://cdn.example.com/test.mp3"));
        assert_eq!(s.length_micros, Some(205_000_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/concrete_echoes/t_1")
        );
    }

    handle.set_track_metadata(None, "DANVIR");
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn unparseable_duration_label_leaves_length_out() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    let (release, mut track) = make_release();
    track.duration = "-:--".to_string();

    handle.set_track_metadata(Some((&release, &track)), "DANVIR");
    assert_eq!(state.lock().unwrap().length_micros, None);
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    assert_eq!(iface.playback_status(), "Stopped");

    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_playback(PlaybackStatus::Playing);
    assert_eq!(iface.playback_status(), "Playing");

    handle.set_playback(PlaybackStatus::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    assert!(iface.metadata().is_empty());

    let (release, track) = make_release();
    MprisHandle {
        state: state.clone(),
    }
    .set_track_metadata(Some((&release, &track)), "DANVIR");

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn control_methods_forward_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.stop();

    let got: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Stop
        ]
    );
}
