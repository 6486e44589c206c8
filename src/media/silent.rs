use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::MediaError;

use super::types::{Generation, MediaEvent, MediaEventKind, MediaResource};

/// Media resource used when audio output is disabled: every load fails with
/// `NoOutputDevice`, so the controller's error policy decides what happens.
pub struct SilentMedia {
    events: Sender<MediaEvent>,
}

impl SilentMedia {
    pub fn new() -> (Self, Receiver<MediaEvent>) {
        let (events, rx) = mpsc::channel();
        (Self { events }, rx)
    }
}

impl MediaResource for SilentMedia {
    fn load(&mut self, generation: Generation, _source: &str) {
        let _ = self.events.send(MediaEvent::new(
            generation,
            MediaEventKind::Error(MediaError::NoOutputDevice),
        ));
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}

    fn seek_to(&mut self, _seconds: f64) {}

    fn stop(&mut self) {}
}
