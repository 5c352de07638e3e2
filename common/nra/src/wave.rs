//! Minimal WAVE header reader
//!
//! Only the canonical PCM layout is supported: a `RIFF` chunk of form `WAVE` whose first
//! sub-chunk is a 16-byte `fmt ` record and whose second sub-chunk is `data`. Files that place
//! other chunks (`LIST`, `fact`, ...) between the two are rejected with `NoDataSection`.


use crate::{NraError, NraResult, bytes};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const RIFF_TAG: [u8; 4] = *b"RIFF";
const WAVE_TAG: [u8; 4] = *b"WAVE";
const FMT_TAG: [u8; 4] = *b"fmt ";
const DATA_TAG: [u8; 4] = *b"data";

const PCM_FORMAT: u16 = 1;

// RIFF tag + size, WAVE tag, fmt tag + size, 16-byte PCM format record, data tag + size
pub const WAVE_HEADER_LEN: usize = 44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    /// Bytes per sample frame (one sample for every channel)
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Length of the PCM payload in bytes
    pub data_len: u32,
}

impl WaveHeader {
    /// Parse a WAVE header from the start of `buffer`. `source` names the buffer in errors.
    pub fn parse(buffer: &[u8], source: &str) -> NraResult<Self> {
        if !buffer.starts_with(&RIFF_TAG) {
            return Err(NraError::NotRiffFile(source.into()));
        }

        let (position, riff_len) = bytes::read_u32(buffer, RIFF_TAG.len())?;
        let riff_end = position.saturating_add(riff_len as usize).min(buffer.len());
        let riff = &buffer[position..riff_end];

        if !riff.starts_with(&WAVE_TAG) {
            return Err(NraError::NotWaveFile(source.into()));
        }
        let position = WAVE_TAG.len();

        let (position, fmt_tag) = bytes::read_tag(riff, position)?;
        if fmt_tag != FMT_TAG {
            return Err(NraError::NotPcmFile(source.into()));
        }

        // The format record is read at fixed offsets; its declared size does not move the data tag
        let (position, _fmt_len) = bytes::read_u32(riff, position)?;

        let (position, format) = bytes::read_u16(riff, position)?;
        if format != PCM_FORMAT {
            return Err(NraError::NotPcmFile(source.into()));
        }

        let (position, channels) = bytes::read_u16(riff, position)?;
        let (position, sample_rate) = bytes::read_u32(riff, position)?;
        let (position, byte_rate) = bytes::read_u32(riff, position)?;
        let (position, block_align) = bytes::read_u16(riff, position)?;
        let (position, bits_per_sample) = bytes::read_u16(riff, position)?;

        match bytes::read_tag(riff, position) {
            Ok((_, DATA_TAG)) => {}
            Ok(_) | Err(NraError::OutOfBounds { .. }) => {
                return Err(NraError::NoDataSection(source.into()));
            }
            Err(err) => return Err(err),
        }
        let (_, data_len) = bytes::read_u32(riff, position + DATA_TAG.len())?;

        Ok(Self { channels, sample_rate, byte_rate, block_align, bits_per_sample, data_len })
    }

    /// Number of 1/75 second CD frames needed to hold the PCM payload, or `None` if the byte rate
    /// is zero.
    #[must_use]
    pub fn cd_frames(&self) -> Option<u64> {
        (self.byte_rate != 0).then(|| {
            crate::cdtime::CdTime::frames_to_cover(self.data_len.into(), self.byte_rate.into())
        })
    }
}

/// Read the header of the WAVE file at `path`. Only the header bytes are read; the PCM payload
/// is never loaded.
pub fn read_wave_header<P: AsRef<Path>>(path: P) -> NraResult<WaveHeader> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let file = File::open(path)
        .map_err(|source| NraError::WaveOpen { path: path_str.clone(), source })?;

    let mut header = Vec::with_capacity(WAVE_HEADER_LEN);
    file.take(WAVE_HEADER_LEN as u64)
        .read_to_end(&mut header)
        .map_err(|source| NraError::WaveOpen { path: path_str.clone(), source })?;

    let wave_header = WaveHeader::parse(&header, &path_str)?;
    log::debug!("Read WAVE header from '{path_str}': {wave_header:?}");

    Ok(wave_header)
}

#[cfg(test)]
pub(crate) fn pcm_header_bytes(
    channels: u16,
    sample_rate: u32,
    bits: u16,
    data_len: u32,
) -> Vec<u8> {
    let block_align = channels * bits / 8;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut bytes = Vec::with_capacity(WAVE_HEADER_LEN);
    bytes.extend(RIFF_TAG);
    bytes.extend((36 + data_len).to_le_bytes());
    bytes.extend(WAVE_TAG);
    bytes.extend(FMT_TAG);
    bytes.extend(16_u32.to_le_bytes());
    bytes.extend(PCM_FORMAT.to_le_bytes());
    bytes.extend(channels.to_le_bytes());
    bytes.extend(sample_rate.to_le_bytes());
    bytes.extend(byte_rate.to_le_bytes());
    bytes.extend(block_align.to_le_bytes());
    bytes.extend(bits.to_le_bytes());
    bytes.extend(DATA_TAG);
    bytes.extend(data_len.to_le_bytes());

    bytes
}
