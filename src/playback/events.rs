//! Notifications published to controller subscribers.

use crate::catalog::TrackId;

use super::state::MediaReadiness;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    TrackChanged {
        track_id: TrackId,
        previous_track_id: TrackId,
    },
    PlayingChanged(bool),
    RepeatChanged(bool),
    ShuffleChanged(bool),
    ReadinessChanged(MediaReadiness),
    /// Total duration changed (seconds).
    DurationChanged(f64),
    ExpandedChanged(bool),
}
