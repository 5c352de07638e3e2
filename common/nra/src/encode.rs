//! Project file encoder
//!
//! The encoder always writes the same option set (the values a freshly created audio CD project
//! carries) rather than anything decoded from an earlier file. Only the CD-Text strings, the track
//! records, and the timing derived from each track's WAVE file vary between outputs.

#[cfg(test)]
mod tests;

use crate::bytes;
use crate::cdtime::CdTime;
use crate::model::{Album, Track};
use crate::project::{
    BurnOptions, CdOptions, NeroProject, TRACK_UNPROTECTED, TrackRecord, TrackTiming,
};
use crate::wave::{self, WaveHeader};
use crate::{BURN_TAG, NRA_HEADER, NraError, NraResult, TRACK_TAG};

/// Silence written before every track
pub const TRACK_PREGAP: CdTime = CdTime { minutes: 0, seconds: 2, frames: 0 };

const CD_OPTIONS: [u32; 5] = [0, 0, 1, 1, 9];
const GLOBAL_TRACK_OPTIONS: [u32; 2] = [0, 0];
const TRACK_FLAG: u32 = 1;
const OPAQUE_CD_OPTION: [u8; 12] = [0x0A, 0x00, 0x00, 0x80, 0x0B, 0xEE, 0x20, 0x5E, 0, 0, 0, 0];
// Normalize all tracks, no pause between tracks, remove silence at end of tracks
const MORE_TRACK_OPTIONS: [u32; 3] = [0, 0, 1];

// Fixed part of the track option length; each track adds 4 bytes
const TRACK_OPTION_BASE_LEN: u32 = 40;

const NO_FILTER_TAG: [u8; 4] = *b"ENON";
const NO_FILTER_LEN: usize = 8;

const BURN_OPTIONS_LEN: u32 = 120;
const BURN_OPTIONS: [u32; 26] =
    [0, 1, 1, 1, 0, 0, 1, 1, 0, 0, 65536, 65535, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0];
const BURN_TRAILER: [u8; 8] = [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0];

/// Encode disc `disc_index` (0-based) of `album`, reading each track's WAVE header from its
/// `local_path`.
pub fn encode_nero_project(album: &Album, disc_index: usize) -> NraResult<Vec<u8>> {
    encode_with(album, disc_index, |track| wave::read_wave_header(&track.local_path))
}

/// Encode disc `disc_index` (0-based) of `album`, using `wave_header_fn` to look up the WAVE
/// parameters of each track.
pub fn encode_with<F>(
    album: &Album,
    disc_index: usize,
    mut wave_header_fn: F,
) -> NraResult<Vec<u8>>
where
    F: FnMut(&Track) -> NraResult<WaveHeader>,
{
    let disc = album
        .discs
        .get(disc_index)
        .ok_or(NraError::NoSuchDisc { index: disc_index, disc_count: album.discs.len() })?;

    let track_count = disc.tracks.len() as u32;

    // Each track starts a pregap after the previous track ends, so tracks must be folded in order
    let (records, _) = disc.tracks.iter().enumerate().try_fold(
        (Vec::with_capacity(disc.tracks.len()), 0_u32),
        |(mut records, last_frame), (i, track)| -> NraResult<_> {
            let wave_header = wave_header_fn(track)?;
            let timing = track_timing(track, &wave_header, last_frame)?;
            records.push(canonical_track_record(track, (i + 1) as u16, timing));
            Ok((records, timing.end()))
        },
    )?;

    let cd_options = CdOptions {
        track_option_length: TRACK_OPTION_BASE_LEN + 4 * track_count,
        reserved: 0,
        cd_options: CD_OPTIONS,
        global_track_options: GLOBAL_TRACK_OPTIONS,
        track_flags: vec![TRACK_FLAG; disc.tracks.len()],
        opaque: OPAQUE_CD_OPTION,
        more_track_options: MORE_TRACK_OPTIONS.to_vec(),
        trailer: [0; 2],
    };

    let burn_options =
        BurnOptions { len: BURN_OPTIONS_LEN, values: BURN_OPTIONS, trailer: BURN_TRAILER.to_vec() };

    let mut out = Vec::new();
    write_project(&mut out, album, &cd_options, &records, &burn_options)?;

    log::debug!(
        "Encoded disc {} of '{}': {} tracks, {} bytes",
        disc_index + 1,
        album.title,
        records.len(),
        out.len()
    );

    Ok(out)
}

impl NeroProject {
    /// Write this project back out, preserving every decoded option value.
    pub fn to_bytes(&self) -> NraResult<Vec<u8>> {
        let mut out = Vec::new();
        write_project(&mut out, &self.album, &self.cd_options, &self.tracks, &self.burn_options)?;
        Ok(out)
    }
}

fn track_timing(
    track: &Track,
    wave_header: &WaveHeader,
    last_frame: u32,
) -> NraResult<TrackTiming> {
    let frames = wave_header
        .cd_frames()
        .ok_or_else(|| NraError::ZeroByteRate(track.local_path.display().to_string()))?;

    let length = frames.saturating_sub(1);
    let silence = TRACK_PREGAP.to_frames();
    let start = u64::from(last_frame) + u64::from(silence);
    let end = start + length;

    match (u32::try_from(start), u32::try_from(length), u32::try_from(end)) {
        (Ok(start), Ok(length), Ok(_)) => Ok(TrackTiming::new(length, silence, start)),
        _ => Err(NraError::FrameOverflow { path: track.local_path.display().to_string(), end }),
    }
}

fn canonical_track_record(track: &Track, track_number: u16, timing: TrackTiming) -> TrackRecord {
    TrackRecord {
        // Recomputed from the serialized body when written
        record_len: 0,
        source_path: track.file_name.clone(),
        file_name: track.short_file_name().into(),
        artist: track.artist.clone(),
        title: track.title.clone(),
        isrc: track.isrc.clone(),
        placeholders: [String::new(), String::new()],
        timing,
        track_number,
        protection: TRACK_UNPROTECTED,
        filter_tag: NO_FILTER_TAG,
        filter: vec![0; NO_FILTER_LEN],
        opaque: [0; 14],
        source_path_again: track.file_name.clone(),
        trailer: [0; 4],
    }
}

fn write_project(
    out: &mut Vec<u8>,
    album: &Album,
    cd_options: &CdOptions,
    records: &[TrackRecord],
    burn_options: &BurnOptions,
) -> NraResult<()> {
    out.extend(bytes::write_short_string(NRA_HEADER)?);
    write_u32(out, cd_options.track_option_length);

    for text in [
        &album.title,
        &album.artist,
        &album.copyright,
        &album.author,
        &album.mcn,
        &album.release_date,
        &album.comment,
    ] {
        out.extend(bytes::write_short_string(text)?);
    }

    write_cd_options(out, cd_options);

    write_u32(out, records.len() as u32);
    for record in records {
        write_track_record(out, record);
    }

    write_burn_options(out, burn_options);

    Ok(())
}

fn write_cd_options(out: &mut Vec<u8>, cd_options: &CdOptions) {
    out.push(cd_options.reserved);

    for &value in cd_options.cd_options.iter().chain(&cd_options.global_track_options) {
        write_u32(out, value);
    }

    write_u32(out, cd_options.track_count());
    for &flag in &cd_options.track_flags {
        write_u32(out, flag);
    }

    out.extend(cd_options.opaque);

    for &value in &cd_options.more_track_options {
        write_u32(out, value);
    }

    out.extend(cd_options.trailer);
}

fn write_track_record(out: &mut Vec<u8>, record: &TrackRecord) {
    let mut body = Vec::new();

    for text in [
        &record.source_path,
        &record.placeholders[0],
        &record.file_name,
        &record.artist,
        &record.title,
        &record.placeholders[1],
        &record.isrc,
    ] {
        body.extend(bytes::write_long_string(text));
    }

    for &value in &record.timing.0 {
        write_u32(&mut body, value);
    }

    body.extend(record.track_number.to_le_bytes());
    write_u32(&mut body, record.protection);

    body.extend(record.filter_tag);
    write_u32(&mut body, record.filter.len() as u32);
    body.extend(&record.filter);

    body.extend(record.opaque);
    body.extend(bytes::write_long_string(&record.source_path_again));
    body.extend(record.trailer);

    out.extend(TRACK_TAG);
    write_u32(out, body.len() as u32);
    out.extend(body);
}

fn write_burn_options(out: &mut Vec<u8>, burn_options: &BurnOptions) {
    out.extend(BURN_TAG);
    write_u32(out, burn_options.len);

    for &value in &burn_options.values {
        write_u32(out, value);
    }

    out.extend(&burn_options.trailer);
}

fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend(bytes::write_le_uint(value.into(), 4));
}
