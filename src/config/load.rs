use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CALMRIDE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CALMRIDE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.fallback_duration_secs == 0 {
            return Err("playback.fallback_duration_secs must be >= 1".to_string());
        }
        if self.controls.seek_seconds == 0 {
            return Err("controls.seek_seconds must be >= 1".to_string());
        }
        if self.tracks.is_empty() {
            return Err("at least one [[tracks]] entry is required".to_string());
        }
        for (i, t) in self.tracks.iter().enumerate() {
            let id = t.id.trim();
            if id.is_empty() {
                return Err(format!("tracks[{i}].id must not be empty"));
            }
            if self.tracks[..i].iter().any(|o| o.id.trim() == id) {
                return Err(format!("duplicate track id: {id}"));
            }
        }
        Ok(())
    }

    /// Resolve the log file from `logging.file` or the XDG state directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        let file = self.logging.file.trim();
        if !file.is_empty() {
            return Some(PathBuf::from(file));
        }
        default_log_path()
    }
}

/// Resolve the config path from `CALMRIDE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CALMRIDE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/calmride/config.toml`
/// or `~/.config/calmride/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("calmride").join("config.toml"))
}

/// `$XDG_STATE_HOME/calmride/calmride.log`, or `~/.local/state/...`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("calmride").join("calmride.log"))
}
