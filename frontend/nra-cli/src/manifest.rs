//! TOML album manifests
//!
//! ```toml
//! title = "Chords"
//! artist = "Doctor Bob"
//!
//! [[discs]]
//! title = "disc 1"
//!
//! [[discs.tracks]]
//! title = "CChord"
//! isrc = "USK401402290"
//! file_name = 'C:\Users\whodis\Music\CChord.wav'
//! local_path = "samples/CChord.wav"
//! ```

use anyhow::Context;
use nra::Album;
use std::fs;
use std::path::Path;

pub fn load(path: &Path) -> anyhow::Result<Album> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Unable to read manifest '{}'", path.display()))?;
    let album: Album = toml::from_str(&contents)
        .with_context(|| format!("Unable to parse manifest '{}'", path.display()))?;

    let parent_dir = path.parent().unwrap_or_else(|| Path::new(""));

    Ok(resolve(album, parent_dir))
}

/// Fill in the per-track fields that follow from the track's position in the album, and resolve
/// relative local paths against `parent_dir`.
fn resolve(mut album: Album, parent_dir: &Path) -> Album {
    let disc_count = album.discs.len() as u32;

    for (disc_idx, disc) in album.discs.iter_mut().enumerate() {
        if disc.number == 0 {
            disc.number = disc_idx as u32 + 1;
        }

        let track_count = disc.tracks.len() as u32;
        for (track_idx, track) in disc.tracks.iter_mut().enumerate() {
            if track.local_path.is_relative() {
                track.local_path = parent_dir.join(&track.local_path);
            }

            // No recorded source path: record the bare file name
            if track.file_name.is_empty() {
                track.file_name = track
                    .local_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }

            if track.album_name.is_empty() {
                track.album_name.clone_from(&album.title);
            }

            if track.track_number == 0 {
                track.track_number = track_idx as u32 + 1;
            }

            track.track_count = track_count;
            track.disc_number = disc.number;
            track.disc_count = disc_count;
        }
    }

    album
}
