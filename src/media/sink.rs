//! Utilities for opening sources and creating `rodio` sinks from them.
//!
//! The helpers here encapsulate opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::MediaError;

/// Turn a configured source into a filesystem path. Relative sources are
/// resolved against `base_dir`; a `file://` prefix is accepted.
pub(super) fn resolve_source(base_dir: &Path, source: &str) -> PathBuf {
    let source = source.strip_prefix("file://").unwrap_or(source);
    let p = Path::new(source);
    if p.is_absolute() || base_dir.as_os_str().is_empty() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Open and decode `path`, returning the decoder and its total duration when
/// the container reports one.
pub(super) fn open_source(
    path: &Path,
) -> Result<(Decoder<BufReader<File>>, Option<Duration>), MediaError> {
    let file = File::open(path).map_err(|source| MediaError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let total = decoder.total_duration().filter(|d| !d.is_zero());
    Ok((decoder, total))
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), MediaError> {
    let (decoder, total) = open_source(path)?;
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, total))
}
