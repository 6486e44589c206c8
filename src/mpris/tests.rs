use super::*;
use crate::catalog::TrackId;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        id: TrackId::new("nature"),
        display_name: "Nature Song".to_string(),
        subtitle: "Melody".to_string(),
        media_source: Some("mp3/nature.mp3".to_string()),
        known_duration_seconds: None,
    }
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let track = make_track();
    handle.set_track_metadata(Some(2), Some(&track), 1.5);

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Nature Song"));
        assert_eq!(s.subtitle.as_deref(), Some("Melody"));
        assert_eq!(s.length_micros, Some(1_500_000));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/calmride/track/2")
        );
    }

    handle.set_track_metadata(None, None, 180.0);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert_eq!(s.subtitle, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_follows_playing_flag() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    let handle = MprisHandle {
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Paused");
    handle.set_playing(true);
    assert_eq!(iface.playback_status(), "Playing");
    handle.set_playing(false);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn player_methods_forward_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.play_pause();
    iface.next();
    iface.previous();
    iface.pause();
    iface.play();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Pause,
            ControlCmd::Play,
        ]
    );
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_track_metadata(Some(0), Some(&make_track()), 180.0);

    let map = iface.metadata();
    for k in ["mpris:trackid", "xesam:title", "xesam:genre", "mpris:length"] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}
