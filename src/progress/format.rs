use crate::playback::PlaybackState;

/// Format seconds as `M:SS` (minutes are not wrapped into hours).
///
/// Negative and non-finite input formats as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// `elapsed / total`, clamped to `[0, 1]`; 0 when the total is unknown.
pub fn progress_fraction(state: &PlaybackState) -> f64 {
    let total = state.total_duration_seconds;
    if total.is_nan() || total <= 0.0 || !state.elapsed_seconds.is_finite() {
        return 0.0;
    }
    (state.elapsed_seconds / total).clamp(0.0, 1.0)
}

pub fn remaining_seconds(state: &PlaybackState) -> f64 {
    (state.total_duration_seconds - state.elapsed_seconds).max(0.0)
}

/// Everything the progress bar needs, precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    pub elapsed: String,
    pub total: String,
    pub remaining: String,
    pub fraction: f64,
}

impl From<&PlaybackState> for ProgressView {
    fn from(state: &PlaybackState) -> Self {
        Self {
            elapsed: format_time(state.elapsed_seconds),
            total: format_time(state.total_duration_seconds),
            remaining: format!("-{}", format_time(remaining_seconds(state))),
            fraction: progress_fraction(state),
        }
    }
}
