//! CD-DA time positions, 75 frames per second

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdTime {
    pub minutes: u32,
    pub seconds: u8,
    pub frames: u8,
}

impl CdTime {
    pub const SECONDS_PER_MINUTE: u8 = 60;
    pub const FRAMES_PER_SECOND: u8 = 75;

    pub fn new(minutes: u32, seconds: u8, frames: u8) -> Self {
        assert!(
            seconds < Self::SECONDS_PER_MINUTE,
            "Seconds must be less than {}",
            Self::SECONDS_PER_MINUTE
        );
        assert!(
            frames < Self::FRAMES_PER_SECOND,
            "Frames must be less than {}",
            Self::FRAMES_PER_SECOND
        );

        Self { minutes, seconds, frames }
    }

    pub fn to_frames(self) -> u32 {
        let frames_per_second: u32 = Self::FRAMES_PER_SECOND.into();
        let seconds_per_minute: u32 = Self::SECONDS_PER_MINUTE.into();

        u32::from(self.frames)
            + frames_per_second * (u32::from(self.seconds) + seconds_per_minute * self.minutes)
    }

    pub fn from_frames(frames: u32) -> Self {
        let frames_per_second: u32 = Self::FRAMES_PER_SECOND.into();
        let seconds_per_minute: u32 = Self::SECONDS_PER_MINUTE.into();

        let minutes = frames / (frames_per_second * seconds_per_minute);
        let seconds = (frames / frames_per_second) % seconds_per_minute;
        let frames = frames % frames_per_second;

        Self::new(minutes, seconds as u8, frames as u8)
    }

    /// Number of whole frames needed to cover `len` units at `rate` units per second, rounding
    /// any partial frame up. `rate` must be non-zero.
    pub fn frames_to_cover(len: u64, rate: u64) -> u64 {
        (u64::from(Self::FRAMES_PER_SECOND) * len).div_ceil(rate)
    }
}

impl Display for CdTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minutes, self.seconds, self.frames)
    }
}
