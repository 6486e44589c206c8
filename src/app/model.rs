//! Application model: wraps the playback controller with the bits of UI
//! state that only the terminal shell cares about.

use tracing::error;

use crate::catalog::{Direction, Track};
use crate::config::UiSettings;
use crate::error::Result;
use crate::media::MediaEvent;
use crate::playback::{MediaReadiness, PlaybackController, PlaybackState};
use crate::progress::ProgressView;

/// The main application model.
pub struct App {
    pub controller: PlaybackController,
    pub modal_open: bool,
    /// Last intent failure, shown in the footer until the next success.
    pub status: Option<String>,
    seek_seconds: f64,
}

impl App {
    pub fn new(controller: PlaybackController, seek_seconds: u64) -> Self {
        Self {
            controller,
            modal_open: false,
            status: None,
            seek_seconds: seek_seconds.max(1) as f64,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    pub fn tracks(&self) -> &[Track] {
        self.controller.catalog().all()
    }

    pub fn current_track(&self) -> &Track {
        self.controller.current_track()
    }

    /// Index of the selected track in catalog order.
    pub fn selected_index(&self) -> usize {
        self.controller
            .catalog()
            .index_of(&self.state().selected_track_id)
            .unwrap_or(0)
    }

    pub fn progress(&self) -> ProgressView {
        ProgressView::from(self.state())
    }

    /// Title/subtitle for the collapsed capsule: the track while playing,
    /// the idle labels otherwise.
    pub fn capsule_labels<'a>(&'a self, ui: &'a UiSettings) -> (&'a str, &'a str) {
        if self.state().is_playing {
            let t = self.current_track();
            (t.display_name.as_str(), t.subtitle.as_str())
        } else {
            (ui.idle_title.as_str(), ui.idle_subtitle.as_str())
        }
    }

    /// Short status word for the player header.
    pub fn readiness_label(&self) -> &'static str {
        let s = self.state();
        match (s.media_ready, s.is_playing) {
            (MediaReadiness::Loading, _) => "Loading",
            (MediaReadiness::Error, true) => "Playing (no audio)",
            (MediaReadiness::Error, false) => "Audio unavailable",
            (MediaReadiness::Ready, true) => "Playing",
            (MediaReadiness::Ready, false) => "Paused",
        }
    }

    pub fn play_pause(&mut self) {
        self.controller.toggle_play_pause();
    }

    pub fn next(&mut self) {
        let r = self.controller.advance(Direction::Next);
        self.report(r);
    }

    pub fn prev(&mut self) {
        let r = self.controller.advance(Direction::Previous);
        self.report(r);
    }

    pub fn seek_forward(&mut self) {
        self.controller.seek_relative(self.seek_seconds);
    }

    pub fn seek_back(&mut self) {
        self.controller.seek_relative(-self.seek_seconds);
    }

    pub fn toggle_repeat(&mut self) {
        self.controller.toggle_repeat();
    }

    pub fn toggle_shuffle(&mut self) {
        self.controller.toggle_shuffle();
    }

    /// Select the track at `index` in catalog order. Out-of-range is ignored.
    pub fn select_index(&mut self, index: usize) {
        let Some(id) = self.tracks().get(index).map(|t| t.id.clone()) else {
            return;
        };
        let r = self.controller.select_track(&id);
        self.report(r);
    }

    pub fn toggle_expanded(&mut self) {
        self.controller.toggle_expanded();
    }

    pub fn toggle_modal(&mut self) {
        self.modal_open = !self.modal_open;
    }

    /// Close the modal if open, otherwise collapse the expanded panel.
    pub fn escape(&mut self) {
        if self.modal_open {
            self.modal_open = false;
        } else {
            self.controller.set_expanded(false);
        }
    }

    pub fn handle_media_event(&mut self, event: MediaEvent) {
        self.controller.handle_media_event(event);
    }

    fn report(&mut self, r: Result<()>) {
        match r {
            Ok(()) => self.status = None,
            Err(e) => {
                error!(error = %e, "playback intent failed");
                self.status = Some(e.to_string());
            }
        }
    }
}
