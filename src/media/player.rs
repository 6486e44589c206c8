use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::error::MediaError;

use super::thread::{MediaCmd, spawn_media_thread};
use super::types::{Generation, MediaEvent, MediaEventKind, MediaResource};

/// `MediaResource` backed by a rodio output stream on a dedicated thread.
pub struct RodioMedia {
    tx: Sender<MediaCmd>,
    events: Sender<MediaEvent>,
    join: Option<JoinHandle<()>>,
}

impl RodioMedia {
    /// Spawn the media thread. Relative sources resolve against `base_dir`.
    pub fn spawn(base_dir: PathBuf) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<MediaCmd>();
        let (events_tx, events_rx) = mpsc::channel::<MediaEvent>();

        let join = spawn_media_thread(base_dir, rx, events_tx.clone());

        (
            Self {
                tx,
                events: events_tx,
                join: Some(join),
            },
            events_rx,
        )
    }

    fn send(&self, cmd: MediaCmd) -> bool {
        self.tx.send(cmd).is_ok()
    }
}

impl MediaResource for RodioMedia {
    fn load(&mut self, generation: Generation, source: &str) {
        let cmd = MediaCmd::Load {
            generation,
            source: source.to_string(),
        };
        if !self.send(cmd) {
            // Nobody will ever answer this load; fail it ourselves.
            warn!(generation, "media thread is gone");
            let _ = self.events.send(MediaEvent::new(
                generation,
                MediaEventKind::Error(MediaError::Disconnected),
            ));
        }
    }

    fn play(&mut self) {
        self.send(MediaCmd::Play);
    }

    fn pause(&mut self) {
        self.send(MediaCmd::Pause);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.send(MediaCmd::SeekTo(seconds));
    }

    fn stop(&mut self) {
        self.send(MediaCmd::Stop);
    }

    fn quit(&mut self, fade_out: Duration) {
        self.send(MediaCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
