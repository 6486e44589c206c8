use crate::catalog::TrackId;

/// Whether the underlying media can currently play.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaReadiness {
    Loading,
    Ready,
    Error,
}

/// What drives `elapsed_seconds` forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Clock {
    /// Position comes from the media resource's time updates.
    Media,
    /// A 1-second fallback tick advances position (no source, or the source failed).
    Synthetic,
}

/// Snapshot of everything the UI needs to render the player.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub selected_track_id: TrackId,
    pub is_playing: bool,
    pub elapsed_seconds: f64,
    pub total_duration_seconds: f64,
    pub is_repeat: bool,
    pub is_shuffle: bool,
    pub media_ready: MediaReadiness,
    pub clock: Clock,
    pub is_expanded_view: bool,
}

impl PlaybackState {
    pub(super) fn new(selected_track_id: TrackId, total_duration_seconds: f64) -> Self {
        Self {
            selected_track_id,
            is_playing: false,
            elapsed_seconds: 0.0,
            total_duration_seconds,
            is_repeat: false,
            is_shuffle: false,
            media_ready: MediaReadiness::Loading,
            clock: Clock::Media,
            is_expanded_view: false,
        }
    }

    /// Clamp `seconds` into `[0, total]`.
    pub(super) fn clamp_position(&self, seconds: f64) -> f64 {
        if !seconds.is_finite() {
            return 0.0;
        }
        seconds.clamp(0.0, self.total_duration_seconds.max(0.0))
    }
}
