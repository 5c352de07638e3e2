//! Album / disc / track metadata, the input to the encoder and the output of the decoder

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub album_name: String,
    pub isrc: String,
    /// Path of the source file as recorded by the authoring system, e.g. `C:\Music\01.wav`
    pub file_name: String,
    /// Path of the same file on this machine; the encoder reads the WAVE header from here
    pub local_path: PathBuf,
    pub track_count: u32,
    pub track_number: u32,
    pub disc_count: u32,
    pub disc_number: u32,
    pub year: u32,
}

impl Track {
    /// The portion of the source path after the last Windows path separator.
    #[must_use]
    pub fn short_file_name(&self) -> &str {
        self.file_name.rsplit('\\').next().unwrap_or(&self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Disc {
    pub title: String,
    pub number: u32,
    pub tracks: Vec<Track>,
}

impl Disc {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Album {
    pub title: String,
    pub artist: String,
    pub copyright: String,
    pub author: String,
    /// Media catalog number
    pub mcn: String,
    pub release_date: String,
    pub comment: String,
    pub discs: Vec<Disc>,
}

impl Album {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// All tracks across all discs, in disc order then track order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.discs.iter().flat_map(|disc| disc.tracks.iter())
    }

    #[must_use]
    pub fn track_count(&self) -> usize {
        self.discs.iter().map(|disc| disc.tracks.len()).sum()
    }
}
