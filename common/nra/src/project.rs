//! Positional view of a decoded project file
//!
//! Most of the option blocks have no known meaning beyond a handful of flags, so each section is
//! kept as the ordered slots it was read from, with accessors for the slots that are understood.

use crate::model::Album;
use std::ops::Range;

/// Protection flag value for a track without copy protection
pub const TRACK_UNPROTECTED: u32 = 0x40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeroProject {
    pub album: Album,
    pub cd_options: CdOptions,
    pub tracks: Vec<TrackRecord>,
    pub burn_options: BurnOptions,
    pub layout: Layout,
}

/// CD and global track options, located between the CD-Text strings and the track section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdOptions {
    /// Declared length of the track options; not used to locate anything
    pub track_option_length: u32,
    pub reserved: u8,
    pub cd_options: [u32; 5],
    pub global_track_options: [u32; 2],
    /// One flag per track, always 1 in files seen so far
    pub track_flags: Vec<u32>,
    pub opaque: [u8; 12],
    /// Trailing option run. Newer project files carry more of these than older ones.
    pub more_track_options: Vec<u32>,
    pub trailer: [u8; 2],
}

impl CdOptions {
    #[must_use]
    pub fn track_count(&self) -> u32 {
        self.track_flags.len() as u32
    }

    #[must_use]
    pub fn write_cd_text(&self) -> u32 {
        self.cd_options[2]
    }

    #[must_use]
    pub fn normalize_all_tracks(&self) -> Option<u32> {
        self.more_track_options.first().copied()
    }

    #[must_use]
    pub fn no_pause_between_tracks(&self) -> Option<u32> {
        self.more_track_options.get(1).copied()
    }

    #[must_use]
    pub fn remove_end_silence(&self) -> Option<u32> {
        self.more_track_options.get(2).copied()
    }
}

/// The seven timing slots of a track record, in CD-DA frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackTiming(pub [u32; 7]);

impl TrackTiming {
    #[must_use]
    pub fn new(length: u32, silence: u32, start: u32) -> Self {
        Self([0, 0, length, 0, silence, start.saturating_add(length), start])
    }

    #[must_use]
    pub fn length(&self) -> u32 {
        self.0[2]
    }

    /// Silence inserted before the track
    #[must_use]
    pub fn silence(&self) -> u32 {
        self.0[4]
    }

    #[must_use]
    pub fn end(&self) -> u32 {
        self.0[5]
    }

    #[must_use]
    pub fn start(&self) -> u32 {
        self.0[6]
    }
}

/// One `GULP` record from the track section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Declared number of bytes following the length field
    pub record_len: u32,
    pub source_path: String,
    pub file_name: String,
    pub artist: String,
    pub title: String,
    pub isrc: String,
    /// The two long strings that have only ever been seen empty
    pub placeholders: [String; 2],
    pub timing: TrackTiming,
    pub track_number: u16,
    pub protection: u32,
    pub filter_tag: [u8; 4],
    pub filter: Vec<u8>,
    pub opaque: [u8; 14],
    pub source_path_again: String,
    pub trailer: [u8; 4],
}

impl TrackRecord {
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.protection != TRACK_UNPROTECTED
    }
}

/// The `BUST` block at the end of the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnOptions {
    pub len: u32,
    pub values: [u32; 26],
    /// Everything after the 26 option values
    pub trailer: Vec<u8>,
}

impl BurnOptions {
    #[must_use]
    pub fn disc_at_once(&self) -> u32 {
        self.values[3]
    }

    #[must_use]
    pub fn write(&self) -> u32 {
        self.values[6]
    }

    #[must_use]
    pub fn finalize_disc(&self) -> u32 {
        self.values[7]
    }
}

/// Byte ranges of each section within the decoded buffer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    pub header: Range<usize>,
    pub cd_options: Range<usize>,
    pub tracks: Vec<Range<usize>>,
    pub burn_options: Range<usize>,
}
