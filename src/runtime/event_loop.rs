use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::App;
use crate::config;
use crate::media::MediaEvent;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playback::{FallbackTimer, PlaybackEvent};
use crate::runtime::mpris_sync::{affects_mpris, update_mpris};
use crate::ui;

/// How long to wait for a key before running another iteration.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Channels and timers the event loop drives alongside the app.
pub struct EventLoopState {
    pub media_rx: mpsc::Receiver<MediaEvent>,
    pub playback_rx: mpsc::Receiver<PlaybackEvent>,
    pub control_tx: mpsc::Sender<ControlCmd>,
    pub control_rx: mpsc::Receiver<ControlCmd>,
    pub timer: FallbackTimer,
}

/// Main terminal event loop: handles input, drawing, media callbacks, the
/// fallback clock and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        pump(app, mpris, state, Instant::now());

        terminal.draw(|f| ui::draw(f, app, settings))?;

        while let Ok(cmd) = state.control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app) {
                return Ok(());
            }
        }

        // Wake up in time for the next fallback tick.
        let wait = state
            .timer
            .time_until_due(Instant::now())
            .map_or(INPUT_POLL, |d| d.min(INPUT_POLL));
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, &state.control_tx) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Feed media callbacks and due fallback ticks into the controller, then
/// push any resulting changes out to MPRIS.
fn pump(app: &mut App, mpris: &MprisHandle, state: &mut EventLoopState, now: Instant) {
    while let Ok(ev) = state.media_rx.try_recv() {
        app.handle_media_event(ev);
    }

    if advance_fallback_clock(app, state, now) {
        update_mpris(mpris, app);
    }
}

/// Run the fallback ticks due at `now`. A track change since the last call
/// restarts the timer so the new track gets a full first second. Returns
/// whether MPRIS needs a refresh.
fn advance_fallback_clock(app: &mut App, state: &mut EventLoopState, now: Instant) -> bool {
    let (mut mpris_dirty, track_changed) = drain_playback_events(&state.playback_rx);
    if track_changed {
        state.timer.reset();
    }

    let due = state.timer.poll(app.controller.fallback_timer_active(), now);
    for _ in 0..due {
        app.controller.tick();
    }

    mpris_dirty |= drain_playback_events(&state.playback_rx).0;
    mpris_dirty
}

/// Log pending playback events; returns `(mpris_dirty, track_changed)`.
fn drain_playback_events(rx: &mpsc::Receiver<PlaybackEvent>) -> (bool, bool) {
    let mut mpris_dirty = false;
    let mut track_changed = false;
    while let Ok(ev) = rx.try_recv() {
        log_playback_event(&ev);
        mpris_dirty |= affects_mpris(&ev);
        track_changed |= matches!(ev, PlaybackEvent::TrackChanged { .. });
    }
    (mpris_dirty, track_changed)
}

fn log_playback_event(ev: &PlaybackEvent) {
    match ev {
        PlaybackEvent::TrackChanged {
            track_id,
            previous_track_id,
        } => info!(track = %track_id, previous = %previous_track_id, "track changed"),
        PlaybackEvent::PlayingChanged(playing) => debug!(playing, "playing changed"),
        PlaybackEvent::RepeatChanged(on) => debug!(repeat = on, "repeat changed"),
        PlaybackEvent::ShuffleChanged(on) => debug!(shuffle = on, "shuffle changed"),
        PlaybackEvent::ReadinessChanged(r) => debug!(readiness = ?r, "media readiness changed"),
        PlaybackEvent::DurationChanged(secs) => debug!(total = secs, "duration changed"),
        PlaybackEvent::ExpandedChanged(on) => debug!(expanded = on, "view changed"),
    }
}

fn quit(settings: &config::Settings, app: &mut App) {
    info!("quit requested");
    app.controller
        .shutdown(Duration::from_millis(settings.media.quit_fade_out_ms));
}

/// Apply an MPRIS (or key-forwarded) command. Returns `true` on quit.
fn handle_control_cmd(cmd: ControlCmd, settings: &config::Settings, app: &mut App) -> bool {
    match cmd {
        ControlCmd::Quit => {
            quit(settings, app);
            return true;
        }
        ControlCmd::Play => {
            if !app.state().is_playing {
                app.play_pause();
            }
        }
        ControlCmd::Pause => {
            if app.state().is_playing {
                app.play_pause();
            }
        }
        ControlCmd::PlayPause => app.play_pause(),
        ControlCmd::Next => app.next(),
        ControlCmd::Prev => app.prev(),
    }

    false
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    control_tx: &mpsc::Sender<ControlCmd>,
) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            quit(settings, app);
            return true;
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            // Behave like MPRIS PlayPause.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => app.seek_forward(),
        KeyCode::Char('H') => app.seek_back(),
        KeyCode::Char('r') => app.toggle_repeat(),
        KeyCode::Char('s') => app.toggle_shuffle(),
        KeyCode::Char('e') | KeyCode::Enter => app.toggle_expanded(),
        KeyCode::Char('m') => app.toggle_modal(),
        KeyCode::Esc => app.escape(),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(d) = c.to_digit(10) {
                app.select_index(d as usize - 1);
            }
        }
        _ => {}
    }

    false
}
