use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/calmride/config.toml` or `~/.config/calmride/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CALMRIDE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub media: MediaSettings,
    pub logging: LoggingSettings,
    pub trip: TripSettings,
    pub tracks: Vec<TrackSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playback: PlaybackSettings::default(),
            controls: ControlsSettings::default(),
            ui: UiSettings::default(),
            media: MediaSettings::default(),
            logging: LoggingSettings::default(),
            trip: TripSettings::default(),
            tracks: default_tracks(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Duration used while real media metadata is unavailable (seconds).
    pub fallback_duration_secs: u64,
    /// Whether repeat starts enabled.
    pub repeat: bool,
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Keep playing when the user switches tracks mid-playback.
    pub resume_on_track_change: bool,
    /// What happens to progress when a media source fails to load.
    pub on_media_error: MediaErrorPolicy,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            fallback_duration_secs: 180,
            repeat: false,
            shuffle: false,
            resume_on_track_change: true,
            on_media_error: MediaErrorPolicy::Synthetic,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaErrorPolicy {
    /// Fall back to a 1-second synthetic timer so progress still moves.
    #[serde(alias = "fallback", alias = "timer")]
    Synthetic,
    /// Leave the track stalled; pressing play retries the load.
    #[serde(alias = "stalled", alias = "retry")]
    Stall,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to seek when pressing `H` / `L`.
    pub seek_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { seek_seconds: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the mini player starts in its expanded panel.
    pub start_expanded: bool,
    /// Title of the relaxation widget block.
    pub header_text: String,
    /// Capsule title shown while nothing is playing.
    pub idle_title: String,
    /// Capsule subtitle shown while nothing is playing.
    pub idle_subtitle: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            start_expanded: false,
            header_text: " Calm Mode ".to_string(),
            idle_title: "Pause on the road".to_string(),
            idle_subtitle: "Practices".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    /// Open an audio output device at all. When false every track runs on
    /// the synthetic timer.
    pub enabled: bool,
    /// Directory relative track sources are resolved against.
    /// Empty means the current working directory.
    pub base_dir: String,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_dir: String::new(),
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// Log file path. Empty means `$XDG_STATE_HOME/calmride/calmride.log`.
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TripSettings {
    pub driver: String,
    pub rating: f32,
    pub car: String,
    pub plate: String,
    pub pickup: String,
    pub destination: String,
    pub eta: String,
    pub price: String,
    pub status: String,
}

impl Default for TripSettings {
    fn default() -> Self {
        Self {
            driver: "Alexander".to_string(),
            rating: 4.9,
            car: "Toyota Camry (Black)".to_string(),
            plate: "A123BC 77".to_string(),
            pickup: "12 Tverskaya St".to_string(),
            destination: "Sheremetyevo Airport, Terminal D".to_string(),
            eta: "12 min".to_string(),
            price: "1 250".to_string(),
            status: "In progress".to_string(),
        }
    }
}

/// One `[[tracks]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    /// File path (absolute, or relative to `media.base_dir`). Omit for a
    /// timer-only track.
    pub source: Option<String>,
    /// Known duration in seconds, used until metadata loads.
    pub duration_secs: Option<f64>,
}

fn track(id: &str, name: &str, subtitle: &str, source: &str) -> TrackSettings {
    TrackSettings {
        id: id.to_string(),
        name: name.to_string(),
        subtitle: subtitle.to_string(),
        source: Some(source.to_string()),
        duration_secs: None,
    }
}

/// The built-in practice tracks.
pub fn default_tracks() -> Vec<TrackSettings> {
    vec![
        track("meditation", "Calm Ride", "Meditation", "mp3/pause_en.mp3"),
        track("ambient", "Soft background", "Ambient", "mp3/ambient.mp3"),
        track("nature", "Nature Song", "Melody", "mp3/nature.mp3"),
    ]
}
