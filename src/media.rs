//! Media resources: the seam between the playback controller and whatever
//! actually produces sound.
//!
//! `RodioMedia` runs a dedicated audio thread; `SilentMedia` stands in when
//! audio output is disabled.

mod player;
mod probe;
mod silent;
mod sink;
mod thread;
mod types;

pub use player::RodioMedia;
pub use silent::SilentMedia;
pub use types::*;
