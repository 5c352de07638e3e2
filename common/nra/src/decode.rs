//! Project file decoder
//!
//! The file is parsed strictly in order. The only non-sequential step is locating the first
//! `GULP` tag, which bounds the variable-length CD options region; the declared lengths in that
//! region do not reliably describe it.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! short string    "NeroCDAV8.0.0"
//! u32             track option length
//! short string x7 title, artist, copyright, author, MCN, release date, comment
//! u8              reserved
//! u32 x5          CD options (index 2: write CD-Text)
//! u32 x2          global track options
//! u32, u32 xN     track count N, one flag per track
//! [u8; 12]        opaque
//! u32 x?          more track options, as many as fit before the trailer
//! [u8; 2]         trailer
//! u32             track count
//! per track:      "GULP", u32 record length, record body
//! "BUST"          u32 length, u32 x26 burn options, trailing bytes
//! ```


use crate::bytes;
use crate::model::{Album, Disc, Track};
use crate::project::{BurnOptions, CdOptions, Layout, NeroProject, TrackRecord, TrackTiming};
use crate::{BURN_TAG, NRA_HEADER, NraError, NraResult, TRACK_TAG};
use std::fs;
use std::path::Path;

/// Decode the project file at `path` into its album metadata.
pub fn decode_nero_project<P: AsRef<Path>>(path: P) -> NraResult<Album> {
    NeroProject::read(path).map(|project| project.album)
}

impl NeroProject {
    pub fn read<P: AsRef<Path>>(path: P) -> NraResult<Self> {
        let path = path.as_ref();
        let buffer = fs::read(path)
            .map_err(|source| NraError::NraOpen { path: path.display().to_string(), source })?;

        log::debug!("Read {} bytes from '{}'", buffer.len(), path.display());

        Self::parse(&buffer)
    }

    pub fn parse(buffer: &[u8]) -> NraResult<Self> {
        let mut reader = Reader::new(buffer);

        let header = reader.short_string()?;
        if header != NRA_HEADER {
            return Err(NraError::InvalidHeader(header));
        }

        let track_option_length = reader.u32()?;

        let mut album = Album {
            title: reader.short_string()?,
            artist: reader.short_string()?,
            copyright: reader.short_string()?,
            author: reader.short_string()?,
            mcn: reader.short_string()?,
            release_date: reader.short_string()?,
            comment: reader.short_string()?,
            discs: vec![],
        };
        let header_range = 0..reader.position;

        let cd_options_start = reader.position;
        let cd_options = read_cd_options(&mut reader, track_option_length)?;
        let cd_options_range = cd_options_start..reader.position;

        let track_count = reader.u32()?;
        if track_count != cd_options.track_count() {
            return Err(NraError::TrackCountMismatch {
                declared: cd_options.track_count(),
                actual: track_count,
            });
        }

        let mut tracks = Vec::new();
        let mut track_ranges = Vec::new();
        for _ in 0..track_count {
            let record_start = reader.position;
            tracks.push(read_track_record(&mut reader)?);
            track_ranges.push(record_start..reader.position);
        }

        let burn_options_start = reader.position;
        let burn_options = read_burn_options(&mut reader)?;
        let burn_options_range = burn_options_start..reader.position;

        let disc_tracks = tracks
            .iter()
            .map(|record| Track {
                artist: record.artist.clone(),
                title: record.title.clone(),
                album_name: album.title.clone(),
                isrc: record.isrc.clone(),
                file_name: record.source_path.clone(),
                track_count,
                track_number: record.track_number.into(),
                disc_count: 1,
                disc_number: 1,
                ..Track::default()
            })
            .collect();
        album.discs.push(Disc { title: album.title.clone(), number: 1, tracks: disc_tracks });

        log::trace!("Decoded album:\n{album:#?}");

        Ok(Self {
            album,
            cd_options,
            tracks,
            burn_options,
            layout: Layout {
                header: header_range,
                cd_options: cd_options_range,
                tracks: track_ranges,
                burn_options: burn_options_range,
            },
        })
    }
}

fn read_cd_options(reader: &mut Reader<'_>, track_option_length: u32) -> NraResult<CdOptions> {
    // A project with no tracks has no GULP tag; its track section runs straight into BUST
    let boundary_tag_offset =
        reader.find(TRACK_TAG).or_else(|| reader.find(BURN_TAG)).ok_or_else(|| {
            NraError::UnexpectedTag {
                expected: bytes::printable_ascii(&TRACK_TAG),
                actual: "end of file".into(),
                offset: reader.buffer.len(),
            }
        })?;

    // The 4 bytes before the tag hold the track count, preceded by 2 trailer bytes
    let track_section_start = boundary_tag_offset.saturating_sub(4);
    let options_end = track_section_start.saturating_sub(2);

    // Reads past the options region fail as if the buffer ended there
    let mut options = Reader { buffer: &reader.buffer[..options_end], position: reader.position };

    let reserved = options.u8()?;

    let mut cd_options = [0; 5];
    for value in &mut cd_options {
        *value = options.u32()?;
    }

    let mut global_track_options = [0; 2];
    for value in &mut global_track_options {
        *value = options.u32()?;
    }

    let track_count = options.u32()?;
    let mut track_flags = Vec::new();
    for _ in 0..track_count {
        track_flags.push(options.u32()?);
    }

    let opaque = options.array()?;

    let remaining = options_end - options.position;
    if remaining % 4 != 0 {
        return Err(NraError::MisalignedOptions { offset: options.position, len: remaining });
    }

    let mut more_track_options = Vec::with_capacity(remaining / 4);
    for _ in 0..remaining / 4 {
        more_track_options.push(options.u32()?);
    }

    log::debug!(
        "CD options from {} to {options_end}, {} trailing track option values",
        reader.position,
        more_track_options.len()
    );

    reader.position = options_end;
    let trailer = reader.array()?;

    Ok(CdOptions {
        track_option_length,
        reserved,
        cd_options,
        global_track_options,
        track_flags,
        opaque,
        more_track_options,
        trailer,
    })
}

fn read_track_record(reader: &mut Reader<'_>) -> NraResult<TrackRecord> {
    reader.expect_tag(TRACK_TAG)?;
    let record_len = reader.u32()?;
    let body_start = reader.position;

    let source_path = reader.long_string()?;
    let placeholder_0 = reader.long_string()?;
    let file_name = reader.long_string()?;
    let artist = reader.long_string()?;
    let title = reader.long_string()?;
    let placeholder_1 = reader.long_string()?;
    let isrc = reader.long_string()?;

    let mut timing = [0; 7];
    for value in &mut timing {
        *value = reader.u32()?;
    }

    let track_number = reader.u16()?;
    let protection = reader.u32()?;

    let filter_tag = reader.array()?;
    let filter_len = reader.u32()?;
    let filter = reader.bytes(filter_len as usize)?.to_vec();

    let opaque = reader.array()?;
    let source_path_again = reader.long_string()?;
    let trailer = reader.array()?;

    let parsed_len = reader.position - body_start;
    if parsed_len != record_len as usize {
        log::debug!(
            "Track {track_number} record at {body_start} declares {record_len} bytes, \
             parsed {parsed_len}"
        );
    }

    Ok(TrackRecord {
        record_len,
        source_path,
        file_name,
        artist,
        title,
        isrc,
        placeholders: [placeholder_0, placeholder_1],
        timing: TrackTiming(timing),
        track_number,
        protection,
        filter_tag,
        filter,
        opaque,
        source_path_again,
        trailer,
    })
}

fn read_burn_options(reader: &mut Reader<'_>) -> NraResult<BurnOptions> {
    reader.expect_tag(BURN_TAG)?;
    let len = reader.u32()?;

    let mut values = [0; 26];
    for value in &mut values {
        *value = reader.u32()?;
    }

    let trailer = reader.buffer[reader.position..].to_vec();
    reader.position = reader.buffer.len();

    Ok(BurnOptions { len, values, trailer })
}

#[derive(Debug)]
struct Reader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    fn find(&self, tag: [u8; 4]) -> Option<usize> {
        self.buffer
            .get(self.position..)?
            .windows(tag.len())
            .position(|window| window == tag)
            .map(|i| self.position + i)
    }

    fn bytes(&mut self, len: usize) -> NraResult<&'a [u8]> {
        let (position, bytes) = bytes::read_bytes(self.buffer, self.position, len)?;
        self.position = position;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> NraResult<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.bytes(N)?);
        Ok(array)
    }

    fn u8(&mut self) -> NraResult<u8> {
        self.bytes(1).map(|bytes| bytes[0])
    }

    fn u16(&mut self) -> NraResult<u16> {
        let (position, value) = bytes::read_u16(self.buffer, self.position)?;
        self.position = position;
        Ok(value)
    }

    fn u32(&mut self) -> NraResult<u32> {
        let (position, value) = bytes::read_u32(self.buffer, self.position)?;
        self.position = position;
        Ok(value)
    }

    fn expect_tag(&mut self, expected: [u8; 4]) -> NraResult<()> {
        let offset = self.position;
        let (position, tag) = bytes::read_tag(self.buffer, offset)?;
        if tag != expected {
            return Err(NraError::UnexpectedTag {
                expected: bytes::printable_ascii(&expected),
                actual: bytes::printable_ascii(&tag),
                offset,
            });
        }

        self.position = position;
        Ok(())
    }

    fn short_string(&mut self) -> NraResult<String> {
        let (position, text) = bytes::read_short_string(self.buffer, self.position)?;
        self.position = position;
        Ok(text)
    }

    fn long_string(&mut self) -> NraResult<String> {
        let (position, text) = bytes::read_long_string(self.buffer, self.position)?;
        self.position = position;
        Ok(text)
    }
}
