//! Media resource seam and the events it reports back.
//!
//! Every load is tagged with a `Generation`; events echo the generation of
//! the load they belong to so the controller can drop callbacks from a
//! superseded source.

use std::time::Duration;

use crate::error::MediaError;

/// Monotonic tag attached to each load attempt.
pub type Generation = u64;

#[derive(Debug)]
pub struct MediaEvent {
    pub generation: Generation,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(generation: Generation, kind: MediaEventKind) -> Self {
        Self { generation, kind }
    }
}

#[derive(Debug)]
pub enum MediaEventKind {
    /// Source duration became known (seconds).
    MetadataLoaded(f64),
    /// The source is decoded and can start playing.
    CanPlay,
    /// Current playback position (seconds).
    TimeUpdate(f64),
    /// The source played to its end.
    Ended,
    /// Loading or playback failed.
    Error(MediaError),
}

/// Something that can load and play a single audio source at a time.
///
/// Calls are fire-and-forget; outcomes arrive later as `MediaEvent`s.
pub trait MediaResource {
    /// Replace the current source. Any previous source stops.
    fn load(&mut self, generation: Generation, source: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, seconds: f64);
    /// Stop and drop the current source.
    fn stop(&mut self);
    /// Stop for good, optionally fading out first.
    fn quit(&mut self, fade_out: Duration) {
        let _ = fade_out;
        self.stop();
    }
}
