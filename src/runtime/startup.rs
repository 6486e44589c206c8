use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use tracing::info;

use crate::catalog::TrackCatalog;
use crate::config;
use crate::error::Result;
use crate::media::{MediaEvent, MediaResource, RodioMedia, SilentMedia};
use crate::playback::{PlaybackController, PlaybackOptions};

/// Pick the media backend: rodio on its own thread, or silence when disabled.
pub fn spawn_media(settings: &config::Settings) -> (Box<dyn MediaResource>, Receiver<MediaEvent>) {
    if !settings.media.enabled {
        info!("media output disabled, using the synthetic clock only");
        let (media, events) = SilentMedia::new();
        return (Box::new(media), events);
    }

    let base_dir = PathBuf::from(settings.media.base_dir.trim());
    let (media, events) = RodioMedia::spawn(base_dir);
    (Box::new(media), events)
}

/// Build the controller and apply the `[playback]`/`[ui]` start-up toggles.
pub fn build_controller(
    settings: &config::Settings,
    media: Box<dyn MediaResource>,
) -> Result<PlaybackController> {
    let catalog = TrackCatalog::from_settings(&settings.tracks)?;
    info!(tracks = catalog.len(), "track catalog ready");

    let mut controller =
        PlaybackController::new(catalog, media, PlaybackOptions::from(&settings.playback));
    apply_playback_defaults(&mut controller, settings);
    Ok(controller)
}

pub fn apply_playback_defaults(controller: &mut PlaybackController, settings: &config::Settings) {
    if settings.playback.repeat {
        controller.toggle_repeat();
    }
    if settings.playback.shuffle {
        controller.toggle_shuffle();
    }
    controller.set_expanded(settings.ui.start_expanded);
}
