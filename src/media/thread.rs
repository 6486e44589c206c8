use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::MediaError;

use super::probe::probe_duration;
use super::sink::{create_sink_at, resolve_source};
use super::types::{Generation, MediaEvent, MediaEventKind};

/// How often position updates are published while playing.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub(super) enum MediaCmd {
    Load { generation: Generation, source: String },
    Play,
    Pause,
    SeekTo(f64),
    Stop,
    Quit { fade_out_ms: u64 },
}

/// The currently loaded source and its position bookkeeping.
#[derive(Default)]
struct Playhead {
    generation: Generation,
    path: Option<PathBuf>,
    sink: Option<Sink>,
    paused: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Playhead {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn attach(&mut self, sink: Sink, path: PathBuf, start_at: Duration) {
        self.sink = Some(sink);
        self.path = Some(path);
        self.paused = true;
        self.started_at = None;
        self.accumulated = start_at;
    }

    fn play(&mut self) {
        if let Some(ref s) = self.sink {
            if self.paused {
                s.play();
                self.started_at = Some(Instant::now());
                self.paused = false;
            }
        }
    }

    fn pause(&mut self) {
        if let Some(ref s) = self.sink {
            if !self.paused {
                s.pause();
                self.accumulated = self.elapsed();
                self.started_at = None;
                self.paused = true;
            }
        }
    }

    /// Stop the sink but keep the path so a later seek can rebuild it.
    fn mark_ended(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn stop(&mut self) {
        self.mark_ended();
        self.path = None;
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

fn open_output() -> Option<OutputStream> {
    match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
            // but noisy for a TUI app.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            warn!(error = %e, "no audio output device, tracks fall back to the synthetic timer");
            None
        }
    }
}

pub(super) fn spawn_media_thread(
    base_dir: PathBuf,
    rx: Receiver<MediaCmd>,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = open_output();
        let mut head = Playhead::default();

        let emit = |generation: Generation, kind: MediaEventKind| {
            let _ = events.send(MediaEvent::new(generation, kind));
        };

        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(cmd) => match cmd {
                    MediaCmd::Load { generation, source } => {
                        head.stop();
                        head.generation = generation;

                        let path = resolve_source(&base_dir, &source);
                        let Some(ref stream) = stream else {
                            emit(generation, MediaEventKind::Error(MediaError::NoOutputDevice));
                            continue;
                        };

                        match create_sink_at(stream, &path, Duration::ZERO) {
                            Ok((sink, total)) => {
                                let total = total.or_else(|| probe_duration(&path));
                                debug!(generation, path = %path.display(), ?total, "media loaded");
                                head.attach(sink, path, Duration::ZERO);
                                if let Some(t) = total {
                                    emit(generation, MediaEventKind::MetadataLoaded(t.as_secs_f64()));
                                }
                                emit(generation, MediaEventKind::CanPlay);
                            }
                            Err(e) => {
                                warn!(generation, error = %e, "media load failed");
                                emit(generation, MediaEventKind::Error(e));
                            }
                        }
                    }

                    MediaCmd::Play => head.play(),

                    MediaCmd::Pause => head.pause(),

                    MediaCmd::SeekTo(secs) => {
                        // Rebuild the sink and skip into the file.
                        let (Some(stream), Some(path)) = (stream.as_ref(), head.path.clone())
                        else {
                            continue;
                        };
                        let was_playing = !head.paused;
                        if let Some(s) = head.sink.take() {
                            s.stop();
                        }

                        let start_at = Duration::from_secs_f64(secs.max(0.0));
                        match create_sink_at(stream, &path, start_at) {
                            Ok((sink, _)) => {
                                head.attach(sink, path, start_at);
                                if was_playing {
                                    head.play();
                                }
                            }
                            Err(e) => {
                                warn!(generation = head.generation, error = %e, "seek failed");
                                head.stop();
                                emit(head.generation, MediaEventKind::Error(e));
                            }
                        }
                    }

                    MediaCmd::Stop => head.stop(),

                    MediaCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = head.sink {
                            if !head.paused {
                                // Fade out gently before stopping.
                                fade_out_sink(s, fade_out_ms);
                            }
                            s.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    let Some(ref s) = head.sink else {
                        continue;
                    };
                    if head.paused {
                        continue;
                    }
                    if s.empty() {
                        head.mark_ended();
                        emit(head.generation, MediaEventKind::Ended);
                    } else {
                        emit(
                            head.generation,
                            MediaEventKind::TimeUpdate(head.elapsed().as_secs_f64()),
                        );
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
