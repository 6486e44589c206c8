use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::TrackSettings;
use crate::error::{PlaybackError, Result};

/// Stable key of a track inside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An immutable descriptor of a selectable track.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub display_name: String,
    pub subtitle: String,
    /// Path or URI of the audio. `None` means the track only ever runs on the
    /// synthetic clock.
    pub media_source: Option<String>,
    pub known_duration_seconds: Option<f64>,
}

impl From<&TrackSettings> for Track {
    fn from(s: &TrackSettings) -> Self {
        let media_source = s
            .source
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Self {
            id: TrackId::new(s.id.trim()),
            display_name: s.name.clone(),
            subtitle: s.subtitle.clone(),
            media_source,
            known_duration_seconds: s.duration_secs.filter(|d| d.is_finite() && *d > 0.0),
        }
    }
}

/// Navigation direction for `advance`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Ordered, immutable lookup of tracks by id.
#[derive(Debug, Clone)]
pub struct TrackCatalog {
    tracks: Vec<Track>,
}

impl TrackCatalog {
    /// Build a catalog, rejecting an empty list and duplicate ids.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyCatalog);
        }
        for (i, t) in tracks.iter().enumerate() {
            if tracks[..i].iter().any(|other| other.id == t.id) {
                return Err(PlaybackError::DuplicateTrack(t.id.clone()));
            }
        }
        Ok(Self { tracks })
    }

    /// Build a catalog from the `[[tracks]]` config tables.
    pub fn from_settings(settings: &[TrackSettings]) -> Result<Self> {
        Self::new(settings.iter().map(Track::from).collect())
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn all(&self) -> &[Track] {
        &self.tracks
    }

    pub fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// First track in declaration order; the catalog is never empty.
    pub fn first(&self) -> &Track {
        &self.tracks[0]
    }

    /// The track after/before `id`, wrapping at both ends.
    pub fn neighbour(&self, id: &TrackId, direction: Direction) -> Option<&Track> {
        let len = self.tracks.len();
        let idx = self.index_of(id)?;
        let target = match direction {
            Direction::Next => (idx + 1) % len,
            Direction::Previous => (idx + len - 1) % len,
        };
        self.tracks.get(target)
    }

    /// A uniformly random track other than `id`; `None` when nothing else exists.
    pub fn random_other<R: Rng + ?Sized>(&self, id: &TrackId, rng: &mut R) -> Option<&Track> {
        let others: Vec<&Track> = self.tracks.iter().filter(|t| &t.id != id).collect();
        others.choose(rng).copied()
    }
}
