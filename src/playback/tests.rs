use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::catalog::{Direction, Track, TrackCatalog, TrackId};
use crate::config::MediaErrorPolicy;
use crate::error::{MediaError, PlaybackError};
use crate::media::{Generation, MediaEvent, MediaEventKind, MediaResource};

#[derive(Debug, Clone, PartialEq)]
enum MediaCall {
    Load(Generation, String),
    Play,
    Pause,
    SeekTo(f64),
    Stop,
    Quit,
}

type CallLog = Rc<RefCell<Vec<MediaCall>>>;

/// In-memory media resource that records every call.
struct RecordingMedia {
    calls: CallLog,
}

impl MediaResource for RecordingMedia {
    fn load(&mut self, generation: Generation, source: &str) {
        self.calls
            .borrow_mut()
            .push(MediaCall::Load(generation, source.to_string()));
    }
    fn play(&mut self) {
        self.calls.borrow_mut().push(MediaCall::Play);
    }
    fn pause(&mut self) {
        self.calls.borrow_mut().push(MediaCall::Pause);
    }
    fn seek_to(&mut self, seconds: f64) {
        self.calls.borrow_mut().push(MediaCall::SeekTo(seconds));
    }
    fn stop(&mut self) {
        self.calls.borrow_mut().push(MediaCall::Stop);
    }
    fn quit(&mut self, _fade_out: Duration) {
        self.calls.borrow_mut().push(MediaCall::Quit);
    }
}

fn track(id: &str, source: Option<&str>) -> Track {
    Track {
        id: TrackId::new(id),
        display_name: id.to_uppercase(),
        subtitle: String::new(),
        media_source: source.map(str::to_string),
        known_duration_seconds: None,
    }
}

fn calm_catalog() -> TrackCatalog {
    TrackCatalog::new(vec![
        track("meditation", Some("mp3/pause_en.mp3")),
        track("ambient", Some("mp3/ambient.mp3")),
        track("nature", Some("mp3/nature.mp3")),
    ])
    .unwrap()
}

fn controller_with(catalog: TrackCatalog, options: PlaybackOptions) -> (PlaybackController, CallLog) {
    let calls: CallLog = Rc::default();
    let media = RecordingMedia {
        calls: Rc::clone(&calls),
    };
    let c = PlaybackController::with_rng(catalog, Box::new(media), options, StdRng::seed_from_u64(7));
    (c, calls)
}

fn controller() -> (PlaybackController, CallLog) {
    controller_with(calm_catalog(), PlaybackOptions::default())
}

fn send(c: &mut PlaybackController, kind: MediaEventKind) -> bool {
    let generation = c.generation();
    c.handle_media_event(MediaEvent::new(generation, kind))
}

fn ready(c: &mut PlaybackController) {
    send(c, MediaEventKind::CanPlay);
}

#[test]
fn new_controller_selects_first_track_and_starts_loading_it() {
    let (c, calls) = controller();
    let s = c.state();
    assert_eq!(s.selected_track_id.as_str(), "meditation");
    assert!(!s.is_playing);
    assert_eq!(s.elapsed_seconds, 0.0);
    assert_eq!(s.total_duration_seconds, 180.0);
    assert_eq!(s.media_ready, MediaReadiness::Loading);
    assert_eq!(
        *calls.borrow(),
        vec![MediaCall::Load(1, "mp3/pause_en.mp3".into())]
    );
}

#[test]
fn play_before_ready_is_queued_until_can_play() {
    let (mut c, calls) = controller();
    c.toggle_play_pause();
    assert!(c.state().is_playing);
    assert!(!calls.borrow().contains(&MediaCall::Play));

    ready(&mut c);
    assert_eq!(c.state().media_ready, MediaReadiness::Ready);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::Play));
}

#[test]
fn queued_play_is_abandoned_on_media_error() {
    let (mut c, _calls) = controller();
    c.toggle_play_pause();
    send(&mut c, MediaEventKind::Error(MediaError::NoOutputDevice));

    assert!(!c.state().is_playing);
    assert_eq!(c.state().media_ready, MediaReadiness::Error);
    assert_eq!(c.state().clock, Clock::Synthetic);
    assert!(!c.fallback_timer_active());
}

#[test]
fn pause_forwards_to_ready_media() {
    let (mut c, calls) = controller();
    ready(&mut c);
    c.toggle_play_pause();
    c.toggle_play_pause();
    assert!(!c.state().is_playing);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::Pause));
}

#[test]
fn stale_metadata_from_a_replaced_track_is_discarded() {
    let mut catalog_tracks = calm_catalog().all().to_vec();
    catalog_tracks[2].known_duration_seconds = Some(95.0);
    let (mut c, _calls) =
        controller_with(TrackCatalog::new(catalog_tracks).unwrap(), PlaybackOptions::default());

    c.select_track(&TrackId::from("ambient")).unwrap();
    let ambient_generation = c.generation();
    c.select_track(&TrackId::from("nature")).unwrap();

    let applied = c.handle_media_event(MediaEvent::new(
        ambient_generation,
        MediaEventKind::MetadataLoaded(600.0),
    ));
    assert!(!applied);
    assert_eq!(c.state().selected_track_id.as_str(), "nature");
    assert_eq!(c.state().total_duration_seconds, 95.0);
    assert_eq!(c.state().media_ready, MediaReadiness::Loading);

    assert!(send(&mut c, MediaEventKind::MetadataLoaded(212.5)));
    assert_eq!(c.state().total_duration_seconds, 212.5);
    assert_eq!(c.state().media_ready, MediaReadiness::Ready);
}

#[test]
fn sourceless_track_plays_out_on_the_synthetic_clock() {
    let catalog = TrackCatalog::new(vec![
        track("meditation", None),
        track("ambient", Some("mp3/ambient.mp3")),
        track("nature", Some("mp3/nature.mp3")),
    ])
    .unwrap();
    let (mut c, calls) = controller_with(catalog, PlaybackOptions::default());
    assert_eq!(c.state().clock, Clock::Synthetic);
    assert_eq!(c.state().media_ready, MediaReadiness::Ready);
    assert_eq!(*calls.borrow(), vec![MediaCall::Stop]);

    c.toggle_play_pause();
    assert!(c.fallback_timer_active());

    for _ in 0..180 {
        c.tick();
    }
    assert!(c.state().is_playing);
    assert_eq!(c.state().elapsed_seconds, 180.0);

    c.tick();
    assert!(!c.state().is_playing);
    assert_eq!(c.state().elapsed_seconds, 0.0);
    assert!(!c.fallback_timer_active());
}

#[test]
fn failed_media_falls_back_to_ticks_and_repeat_wraps() {
    let (mut c, _calls) = controller();
    send(&mut c, MediaEventKind::Error(MediaError::NoOutputDevice));
    c.toggle_repeat();
    c.toggle_play_pause();
    assert!(c.fallback_timer_active());

    for _ in 0..181 {
        c.tick();
    }
    assert!(c.state().is_playing);
    assert_eq!(c.state().elapsed_seconds, 0.0);

    c.tick();
    assert_eq!(c.state().elapsed_seconds, 1.0);
}

#[test]
fn ticks_are_ignored_while_media_drives_the_clock() {
    let (mut c, _calls) = controller();
    ready(&mut c);
    c.toggle_play_pause();
    c.tick();
    assert_eq!(c.state().elapsed_seconds, 0.0);
}

#[test]
fn stall_policy_keeps_the_track_stalled_and_play_reloads() {
    let options = PlaybackOptions {
        on_media_error: MediaErrorPolicy::Stall,
        ..PlaybackOptions::default()
    };
    let (mut c, calls) = controller_with(calm_catalog(), options);
    send(&mut c, MediaEventKind::Error(MediaError::NoOutputDevice));
    assert_eq!(c.state().clock, Clock::Media);
    assert_eq!(c.state().media_ready, MediaReadiness::Error);

    c.toggle_play_pause();
    assert!(c.state().is_playing);
    assert_eq!(c.generation(), 2);
    assert_eq!(c.state().media_ready, MediaReadiness::Loading);
    assert_eq!(
        calls.borrow().last(),
        Some(&MediaCall::Load(2, "mp3/pause_en.mp3".into()))
    );
    assert!(!c.fallback_timer_active());
}

#[test]
fn switching_tracks_resumes_once_the_new_media_is_ready() {
    let (mut c, calls) = controller();
    ready(&mut c);
    c.toggle_play_pause();
    send(&mut c, MediaEventKind::TimeUpdate(42.0));

    c.advance(Direction::Next).unwrap();
    assert_eq!(c.state().selected_track_id.as_str(), "ambient");
    assert_eq!(c.state().elapsed_seconds, 0.0);
    assert!(c.state().is_playing);
    assert_eq!(c.state().media_ready, MediaReadiness::Loading);

    ready(&mut c);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::Play));
}

#[test]
fn switching_tracks_pauses_when_resume_is_disabled() {
    let options = PlaybackOptions {
        resume_on_track_change: false,
        ..PlaybackOptions::default()
    };
    let (mut c, _calls) = controller_with(calm_catalog(), options);
    ready(&mut c);
    c.toggle_play_pause();

    c.advance(Direction::Previous).unwrap();
    assert_eq!(c.state().selected_track_id.as_str(), "nature");
    assert!(!c.state().is_playing);
}

#[test]
fn unknown_track_is_rejected_without_changing_state() {
    let (mut c, calls) = controller();
    let err = c.select_track(&TrackId::from("jazz")).unwrap_err();
    assert!(matches!(err, PlaybackError::UnknownTrack(ref id) if id.as_str() == "jazz"));
    assert_eq!(c.state().selected_track_id.as_str(), "meditation");
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn time_updates_apply_only_once_ready_and_are_clamped() {
    let (mut c, _calls) = controller();
    send(&mut c, MediaEventKind::TimeUpdate(12.0));
    assert_eq!(c.state().elapsed_seconds, 0.0);

    send(&mut c, MediaEventKind::MetadataLoaded(100.0));
    send(&mut c, MediaEventKind::TimeUpdate(12.0));
    assert_eq!(c.state().elapsed_seconds, 12.0);

    send(&mut c, MediaEventKind::TimeUpdate(250.0));
    assert_eq!(c.state().elapsed_seconds, 100.0);
}

#[test]
fn bogus_metadata_keeps_the_fallback_duration_but_marks_ready() {
    let (mut c, _calls) = controller();
    send(&mut c, MediaEventKind::MetadataLoaded(f64::NAN));
    assert_eq!(c.state().total_duration_seconds, 180.0);
    assert_eq!(c.state().media_ready, MediaReadiness::Ready);
}

#[test]
fn media_end_without_repeat_stops_and_rewinds() {
    let (mut c, calls) = controller();
    ready(&mut c);
    c.toggle_play_pause();
    send(&mut c, MediaEventKind::TimeUpdate(179.0));

    send(&mut c, MediaEventKind::Ended);
    assert!(!c.state().is_playing);
    assert_eq!(c.state().elapsed_seconds, 0.0);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::SeekTo(0.0)));
}

#[test]
fn media_end_with_repeat_restarts_the_source() {
    let (mut c, calls) = controller();
    ready(&mut c);
    c.toggle_repeat();
    c.toggle_play_pause();
    send(&mut c, MediaEventKind::TimeUpdate(179.0));

    send(&mut c, MediaEventKind::Ended);
    assert!(c.state().is_playing);
    assert_eq!(c.state().elapsed_seconds, 0.0);
    let calls = calls.borrow();
    assert_eq!(calls[calls.len() - 2..], [MediaCall::SeekTo(0.0), MediaCall::Play]);
}

#[test]
fn seek_is_forwarded_only_to_ready_media() {
    let (mut c, calls) = controller();
    c.seek_relative(10.0);
    assert_eq!(c.state().elapsed_seconds, 10.0);
    assert!(!calls.borrow().iter().any(|m| matches!(m, MediaCall::SeekTo(_))));

    ready(&mut c);
    c.seek_relative(-25.0);
    assert_eq!(c.state().elapsed_seconds, 0.0);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::SeekTo(0.0)));

    c.seek_relative(f64::INFINITY);
    assert_eq!(c.state().elapsed_seconds, 0.0);
}

#[test]
fn seek_while_loading_is_applied_when_media_becomes_ready() {
    let (mut c, calls) = controller();
    c.toggle_play_pause();
    c.seek_relative(30.0);
    assert_eq!(c.state().elapsed_seconds, 30.0);

    ready(&mut c);
    let calls = calls.borrow();
    assert_eq!(calls[calls.len() - 2..], [MediaCall::SeekTo(30.0), MediaCall::Play]);
}

#[test]
fn stalled_track_reloads_at_the_seeked_position() {
    let options = PlaybackOptions {
        on_media_error: MediaErrorPolicy::Stall,
        ..PlaybackOptions::default()
    };
    let (mut c, calls) = controller_with(calm_catalog(), options);
    send(&mut c, MediaEventKind::Error(MediaError::NoOutputDevice));
    c.seek_relative(45.0);
    c.toggle_play_pause();
    assert_eq!(c.state().media_ready, MediaReadiness::Loading);

    ready(&mut c);
    assert_eq!(c.state().elapsed_seconds, 45.0);
    let calls = calls.borrow();
    assert_eq!(calls[calls.len() - 2..], [MediaCall::SeekTo(45.0), MediaCall::Play]);
}

#[test]
fn subscribers_hear_about_every_change() {
    let (mut c, _calls) = controller();
    let rx = c.subscribe();
    let dropped = c.subscribe();
    drop(dropped);

    ready(&mut c);
    c.toggle_play_pause();
    c.toggle_expanded();
    c.select_track(&TrackId::from("nature")).unwrap();

    let events: Vec<PlaybackEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            PlaybackEvent::ReadinessChanged(MediaReadiness::Ready),
            PlaybackEvent::PlayingChanged(true),
            PlaybackEvent::ExpandedChanged(true),
            PlaybackEvent::TrackChanged {
                track_id: TrackId::from("nature"),
                previous_track_id: TrackId::from("meditation"),
            },
            PlaybackEvent::ReadinessChanged(MediaReadiness::Loading),
        ]
    );
}

#[test]
fn shutdown_quits_media_and_ignores_late_events() {
    let (mut c, calls) = controller();
    ready(&mut c);
    c.toggle_play_pause();
    let before = c.generation();

    c.shutdown(Duration::from_millis(300));
    assert!(c.is_shut_down());
    assert!(!c.state().is_playing);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::Quit));
    assert!(!c.handle_media_event(MediaEvent::new(before, MediaEventKind::Ended)));

    drop(c);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::Quit));
}

#[test]
fn dropping_a_live_controller_stops_media() {
    let (c, calls) = controller();
    drop(c);
    assert_eq!(calls.borrow().last(), Some(&MediaCall::Stop));
}

#[test]
fn fallback_timer_arms_counts_and_disarms() {
    let mut timer = FallbackTimer::default();
    let t0 = Instant::now();

    assert_eq!(timer.poll(true, t0), 0);
    assert_eq!(timer.time_until_due(t0), Some(Duration::from_secs(1)));
    assert_eq!(timer.poll(true, t0 + Duration::from_millis(999)), 0);
    assert_eq!(timer.poll(true, t0 + Duration::from_millis(1000)), 1);
    assert_eq!(timer.poll(true, t0 + Duration::from_millis(3500)), 2);
    assert_eq!(
        timer.time_until_due(t0 + Duration::from_millis(3500)),
        Some(Duration::from_millis(500))
    );

    assert_eq!(timer.poll(false, t0 + Duration::from_secs(10)), 0);
    assert_eq!(timer.time_until_due(t0), None);
    assert_eq!(timer.poll(true, t0 + Duration::from_secs(10)), 0);
}

#[test]
fn reset_fallback_timer_waits_a_full_interval() {
    let mut timer = FallbackTimer::default();
    let t0 = Instant::now();
    timer.poll(true, t0);

    timer.reset();
    assert_eq!(timer.time_until_due(t0), None);
    assert_eq!(timer.poll(true, t0 + Duration::from_millis(900)), 0);
    assert_eq!(timer.poll(true, t0 + Duration::from_millis(1800)), 0);
    assert_eq!(timer.poll(true, t0 + Duration::from_millis(1900)), 1);
}

fn numbered_catalog(len: usize) -> TrackCatalog {
    TrackCatalog::new(
        (0..len)
            .map(|i| track(&format!("t{i}"), Some("mp3/x.mp3")))
            .collect(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn advancing_len_times_returns_to_start(
        len in 1usize..8,
        start in 0usize..8,
        forward in any::<bool>(),
    ) {
        let catalog = numbered_catalog(len);
        let start_id = catalog.all()[start % len].id.clone();
        let (mut c, _calls) = controller_with(catalog, PlaybackOptions::default());
        c.select_track(&start_id).unwrap();

        let dir = if forward { Direction::Next } else { Direction::Previous };
        for _ in 0..len {
            c.advance(dir).unwrap();
        }
        prop_assert_eq!(&c.state().selected_track_id, &start_id);
    }

    #[test]
    fn turning_shuffle_on_never_reselects(len in 2usize..8, seed in any::<u64>()) {
        let calls: CallLog = Rc::default();
        let mut c = PlaybackController::with_rng(
            numbered_catalog(len),
            Box::new(RecordingMedia { calls }),
            PlaybackOptions::default(),
            StdRng::seed_from_u64(seed),
        );
        for _ in 0..10 {
            let before = c.state().selected_track_id.clone();
            c.toggle_shuffle();
            prop_assert!(c.state().is_shuffle);
            prop_assert_ne!(&c.state().selected_track_id, &before);
            c.toggle_shuffle();
        }
    }

    #[test]
    fn seeking_stays_within_the_track(
        deltas in prop::collection::vec(-400.0f64..400.0, 1..20),
        is_ready in any::<bool>(),
    ) {
        let (mut c, _calls) = controller();
        if is_ready {
            ready(&mut c);
        }
        for d in deltas {
            c.seek_relative(d);
            let s = c.state();
            prop_assert!(s.elapsed_seconds >= 0.0);
            prop_assert!(s.elapsed_seconds <= s.total_duration_seconds);
        }
    }
}
