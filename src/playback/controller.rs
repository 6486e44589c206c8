use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace, warn};

use crate::catalog::{Direction, Track, TrackCatalog, TrackId};
use crate::config::{MediaErrorPolicy, PlaybackSettings};
use crate::error::{MediaError, PlaybackError, Result};
use crate::media::{Generation, MediaEvent, MediaEventKind, MediaResource};

use super::events::PlaybackEvent;
use super::state::{Clock, MediaReadiness, PlaybackState};

/// Behaviour knobs taken from `[playback]`.
#[derive(Debug, Copy, Clone)]
pub struct PlaybackOptions {
    pub fallback_duration_seconds: f64,
    pub resume_on_track_change: bool,
    pub on_media_error: MediaErrorPolicy,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self::from(&PlaybackSettings::default())
    }
}

impl From<&PlaybackSettings> for PlaybackOptions {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            fallback_duration_seconds: s.fallback_duration_secs.max(1) as f64,
            resume_on_track_change: s.resume_on_track_change,
            on_media_error: s.on_media_error,
        }
    }
}

/// Owns the playback state and the media resource, and is the only thing
/// that mutates either.
///
/// Every load bumps `generation`; media events tagged with an older
/// generation are dropped so a slow load can never overwrite the state of
/// the track that replaced it.
pub struct PlaybackController {
    catalog: TrackCatalog,
    state: PlaybackState,
    options: PlaybackOptions,
    media: Box<dyn MediaResource>,
    generation: Generation,
    rng: StdRng,
    subscribers: Vec<Sender<PlaybackEvent>>,
    shut_down: bool,
}

impl PlaybackController {
    /// Create a controller with the first catalog track selected and loading.
    pub fn new(
        catalog: TrackCatalog,
        media: Box<dyn MediaResource>,
        options: PlaybackOptions,
    ) -> Self {
        Self::with_rng(catalog, media, options, StdRng::from_os_rng())
    }

    pub fn with_rng(
        catalog: TrackCatalog,
        media: Box<dyn MediaResource>,
        options: PlaybackOptions,
        rng: StdRng,
    ) -> Self {
        let first = catalog.first().clone();
        let total = first
            .known_duration_seconds
            .unwrap_or(options.fallback_duration_seconds);

        let mut controller = Self {
            state: PlaybackState::new(first.id.clone(), total),
            catalog,
            options,
            media,
            generation: 0,
            rng,
            subscribers: Vec::new(),
            shut_down: false,
        };
        controller.begin_load(&first);
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    /// Generation of the most recent load.
    #[cfg(test)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The selected track.
    pub fn current_track(&self) -> &Track {
        self.catalog
            .get(&self.state.selected_track_id)
            .unwrap_or_else(|| self.catalog.first())
    }

    /// Receive a copy of every state change notification from now on.
    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Whether the event loop should be running the 1-second fallback tick.
    pub fn fallback_timer_active(&self) -> bool {
        !self.shut_down && self.state.is_playing && self.state.clock == Clock::Synthetic
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    // ---- intents ----

    /// Switch to `id`, restarting from 0 and loading its media.
    pub fn select_track(&mut self, id: &TrackId) -> Result<()> {
        let track = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| PlaybackError::UnknownTrack(id.clone()))?;

        let previous = std::mem::replace(&mut self.state.selected_track_id, track.id.clone());
        let resume = self.state.is_playing && self.options.resume_on_track_change;

        self.state.elapsed_seconds = 0.0;
        self.set_total(
            track
                .known_duration_seconds
                .unwrap_or(self.options.fallback_duration_seconds),
        );
        self.set_playing(resume);

        debug!(track = %track.id, previous = %previous, resume, "track selected");
        self.emit(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id: previous,
        });

        self.begin_load(&track);
        Ok(())
    }

    pub fn toggle_play_pause(&mut self) {
        if self.state.is_playing {
            self.set_playing(false);
            if self.media_in_control() {
                self.media.pause();
            }
            return;
        }

        match (self.state.clock, self.state.media_ready) {
            (Clock::Synthetic, _) => self.set_playing(true),
            (Clock::Media, MediaReadiness::Ready) => {
                self.set_playing(true);
                self.media.play();
            }
            // Queued; honoured by `on_can_play`.
            (Clock::Media, MediaReadiness::Loading) => self.set_playing(true),
            // Stalled after an error: try the source again.
            (Clock::Media, MediaReadiness::Error) => {
                self.set_playing(true);
                let track = self.current_track().clone();
                self.begin_load(&track);
            }
        }
    }

    /// Move the position by `delta` seconds, clamped into the track.
    pub fn seek_relative(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let target = self
            .state
            .clamp_position(self.state.elapsed_seconds + delta);
        self.state.elapsed_seconds = target;
        if self.media_in_control() {
            self.media.seek_to(target);
        }
    }

    pub fn toggle_repeat(&mut self) {
        self.state.is_repeat = !self.state.is_repeat;
        self.emit(PlaybackEvent::RepeatChanged(self.state.is_repeat));
    }

    /// Flip shuffle; turning it on jumps to a random other track.
    pub fn toggle_shuffle(&mut self) {
        self.state.is_shuffle = !self.state.is_shuffle;
        self.emit(PlaybackEvent::ShuffleChanged(self.state.is_shuffle));

        if !self.state.is_shuffle {
            return;
        }
        let next = self
            .catalog
            .random_other(&self.state.selected_track_id, &mut self.rng)
            .map(|t| t.id.clone());
        if let Some(id) = next {
            // The id came from the catalog.
            let _ = self.select_track(&id);
        }
    }

    pub fn advance(&mut self, direction: Direction) -> Result<()> {
        let id = self
            .catalog
            .neighbour(&self.state.selected_track_id, direction)
            .map(|t| t.id.clone())
            .ok_or_else(|| PlaybackError::UnknownTrack(self.state.selected_track_id.clone()))?;
        self.select_track(&id)
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        if self.state.is_expanded_view != expanded {
            self.state.is_expanded_view = expanded;
            self.emit(PlaybackEvent::ExpandedChanged(expanded));
        }
    }

    pub fn toggle_expanded(&mut self) {
        self.set_expanded(!self.state.is_expanded_view);
    }

    // ---- media callbacks ----

    /// Route a media event; returns `false` when it was stale and dropped.
    pub fn handle_media_event(&mut self, event: MediaEvent) -> bool {
        if self.shut_down || event.generation != self.generation {
            trace!(
                event_generation = event.generation,
                current = self.generation,
                kind = ?event.kind,
                "discarding stale media event"
            );
            return false;
        }

        match event.kind {
            MediaEventKind::MetadataLoaded(duration) => self.on_metadata_loaded(duration),
            MediaEventKind::CanPlay => self.on_can_play(),
            MediaEventKind::TimeUpdate(seconds) => self.on_media_time_update(seconds),
            MediaEventKind::Ended => self.on_media_ended(),
            MediaEventKind::Error(err) => self.on_media_error(&err),
        }
        true
    }

    pub fn on_metadata_loaded(&mut self, duration_seconds: f64) {
        if duration_seconds.is_finite() && duration_seconds > 0.0 {
            self.set_total(duration_seconds);
            self.state.elapsed_seconds = self.state.clamp_position(self.state.elapsed_seconds);
        }
        self.mark_ready();
    }

    pub fn on_can_play(&mut self) {
        self.mark_ready();
    }

    pub fn on_media_time_update(&mut self, seconds: f64) {
        if !self.media_in_control() {
            return;
        }
        self.state.elapsed_seconds = self.state.clamp_position(seconds);
    }

    pub fn on_media_ended(&mut self) {
        self.state.elapsed_seconds = 0.0;
        if self.state.clock != Clock::Media {
            return;
        }
        self.media.seek_to(0.0);
        if self.state.is_repeat {
            self.media.play();
        } else {
            self.set_playing(false);
        }
    }

    pub fn on_media_error(&mut self, err: &MediaError) {
        if self.state.clock != Clock::Media {
            return;
        }
        warn!(
            track = %self.state.selected_track_id,
            error = %err,
            policy = ?self.options.on_media_error,
            "media failed"
        );
        self.set_ready(MediaReadiness::Error);
        self.set_playing(false);
        if self.options.on_media_error == MediaErrorPolicy::Synthetic {
            self.state.clock = Clock::Synthetic;
        }
    }

    /// One fallback-timer tick: advance by a second, or handle the end.
    pub fn tick(&mut self) {
        if !self.fallback_timer_active() {
            return;
        }
        let total = self.state.total_duration_seconds;
        if self.state.elapsed_seconds >= total {
            self.state.elapsed_seconds = 0.0;
            if !self.state.is_repeat {
                self.set_playing(false);
            }
        } else {
            self.state.elapsed_seconds = (self.state.elapsed_seconds + 1.0).min(total);
        }
    }

    /// Stop the media for good and invalidate every in-flight event.
    pub fn shutdown(&mut self, fade_out: Duration) {
        if self.shut_down {
            return;
        }
        self.generation += 1;
        self.set_playing(false);
        self.media.quit(fade_out);
        self.shut_down = true;
        debug!("playback controller shut down");
    }

    // ---- internals ----

    fn begin_load(&mut self, track: &Track) {
        self.generation += 1;
        match track.media_source.as_deref() {
            Some(source) => {
                self.state.clock = Clock::Media;
                self.set_ready(MediaReadiness::Loading);
                self.media.load(self.generation, source);
            }
            None => {
                self.state.clock = Clock::Synthetic;
                self.set_ready(MediaReadiness::Ready);
                self.media.stop();
            }
        }
    }

    fn media_in_control(&self) -> bool {
        self.state.clock == Clock::Media && self.state.media_ready == MediaReadiness::Ready
    }

    fn mark_ready(&mut self) {
        if self.state.clock != Clock::Media || self.state.media_ready == MediaReadiness::Ready {
            return;
        }
        self.set_ready(MediaReadiness::Ready);
        // Seeks made while loading only moved `elapsed_seconds`.
        if self.state.elapsed_seconds > 0.0 {
            self.media.seek_to(self.state.elapsed_seconds);
        }
        if self.state.is_playing {
            self.media.play();
        }
    }

    fn set_playing(&mut self, playing: bool) {
        if self.state.is_playing != playing {
            self.state.is_playing = playing;
            self.emit(PlaybackEvent::PlayingChanged(playing));
        }
    }

    fn set_ready(&mut self, ready: MediaReadiness) {
        if self.state.media_ready != ready {
            self.state.media_ready = ready;
            self.emit(PlaybackEvent::ReadinessChanged(ready));
        }
    }

    fn set_total(&mut self, total: f64) {
        if self.state.total_duration_seconds != total {
            self.state.total_duration_seconds = total;
            self.emit(PlaybackEvent::DurationChanged(total));
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        if !self.shut_down {
            self.media.stop();
        }
    }
}
