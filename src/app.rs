//! Application module: exposes the app model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and pairs the playback controller with the
//! modal and status flags the terminal shell renders.

mod model;

pub use model::*;
