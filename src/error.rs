//! Error types shared by the catalog, the playback controller and the media
//! backend.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::TrackId;

/// Errors raised by the catalog and the playback controller.
///
/// Ids only ever originate from the catalog itself, so `UnknownTrack` is a
/// logic error rather than something a user can trigger.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("unknown track id: {0}")]
    UnknownTrack(TrackId),

    #[error("track catalog is empty")]
    EmptyCatalog,

    #[error("duplicate track id in catalog: {0}")]
    DuplicateTrack(TrackId),
}

/// Errors reported by a media resource while loading or playing a source.
///
/// These never propagate out of the controller; they are folded into
/// `MediaReadiness::Error`.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported or corrupt media {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("media thread is gone")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
