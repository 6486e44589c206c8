//! Formatting helpers that turn playback state into progress text.

mod format;

pub use format::*;
