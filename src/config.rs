//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior (playback policy, controls, trip card, track list) and helpers
//! to load configuration from disk.

mod load;
mod schema;

pub use schema::*;
