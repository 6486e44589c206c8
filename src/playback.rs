//! Playback controller: owns the player state, drives the media resource and
//! runs the synthetic fallback clock when real media is unavailable.

mod controller;
mod events;
mod state;
mod timer;

pub use controller::{PlaybackController, PlaybackOptions};
pub use events::PlaybackEvent;
pub use state::{Clock, MediaReadiness, PlaybackState};
pub use timer::FallbackTimer;

#[cfg(test)]
mod tests;
