use crate::app::App;
use crate::mpris::MprisHandle;
use crate::playback::PlaybackEvent;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let state = app.state();
    mpris.set_track_metadata(
        Some(app.selected_index()),
        Some(app.current_track()),
        state.total_duration_seconds,
    );
    mpris.set_playing(state.is_playing);
}

/// Whether a controller event changes anything MPRIS exposes.
pub fn affects_mpris(event: &PlaybackEvent) -> bool {
    matches!(
        event,
        PlaybackEvent::TrackChanged { .. }
            | PlaybackEvent::PlayingChanged(_)
            | PlaybackEvent::DurationChanged(_)
    )
}
