use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;

/// Read the duration from the file's tags/properties when the decoder cannot
/// tell (common for VBR MP3).
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}
