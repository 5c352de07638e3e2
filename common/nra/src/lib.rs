//! Reader and writer for Nero audio CD project files (`.nra`), plus the small subset of the WAVE
//! container needed to compute CD track lengths from PCM source files.

pub mod bytes;
pub mod cdtime;
pub mod decode;
pub mod encode;
pub mod model;
pub mod project;
pub mod wave;

pub use decode::decode_nero_project;
pub use encode::encode_nero_project;
pub use model::{Album, Disc, Track};
pub use project::NeroProject;
pub use wave::{WaveHeader, read_wave_header};

use std::io;
use thiserror::Error;

/// Version tag stored as the first short string of every supported project file
pub const NRA_HEADER: &str = "NeroCDAV8.0.0";

/// Marks the start of each per-track record
pub const TRACK_TAG: [u8; 4] = *b"GULP";

/// Marks the start of the burn options block at the end of the file
pub const BURN_TAG: [u8; 4] = *b"BUST";

#[derive(Debug, Error)]
pub enum NraError {
    #[error("Attempted to read {len} bytes at offset {offset}, buffer is {buffer_len} bytes")]
    OutOfBounds { offset: usize, len: usize, buffer_len: usize },
    #[error("Malformed string at offset {offset}: {reason}")]
    MalformedString { offset: usize, reason: String },
    #[error("String is {len} UTF-16 code units, maximum for this encoding is {max}: '{text}'")]
    StringTooLong { text: String, len: usize, max: usize },
    #[error("Invalid project file header '{0}', expected '{NRA_HEADER}'")]
    InvalidHeader(String),
    #[error("'{0}' is not a RIFF file")]
    NotRiffFile(String),
    #[error("'{0}' is not a WAVE file")]
    NotWaveFile(String),
    #[error("'{0}' is not a PCM WAVE file")]
    NotPcmFile(String),
    #[error("'{0}' has no data section following the format section")]
    NoDataSection(String),
    #[error("'{0}' has a byte rate of 0")]
    ZeroByteRate(String),
    #[error("Expected tag {expected:?} at offset {offset}, found {actual:?}")]
    UnexpectedTag { expected: String, actual: String, offset: usize },
    #[error("CD options declare {declared} tracks, but track section declares {actual}")]
    TrackCountMismatch { declared: u32, actual: u32 },
    #[error("Global track option run at offset {offset} is {len} bytes, not a multiple of 4")]
    MisalignedOptions { offset: usize, len: usize },
    #[error("Track '{path}' would end at frame {end}, beyond the 32-bit frame range")]
    FrameOverflow { path: String, end: u64 },
    #[error("Album has {disc_count} discs, no disc at index {index}")]
    NoSuchDisc { index: usize, disc_count: usize },
    #[error("Error reading project file '{path}': {source}")]
    NraOpen {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Error reading WAVE file '{path}': {source}")]
    WaveOpen {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type NraResult<T> = Result<T, NraError>;
