use super::*;
use crate::model::Disc;
use crate::wave::pcm_header_bytes;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use test_log::test;

// 16-bit mono 44.1kHz
const BYTE_RATE: u32 = 88200;

fn chords_album() -> Album {
    let mut album = Album::new("Chords");
    album.artist = "Doctor Bob".into();
    album.copyright = "12/08/2019".into();
    album.author = "R. T. Short".into();
    album.mcn = "123456789012 ".into();
    album.release_date = "01/16/2020".into();
    album.comment = "No comment".into();

    let tracks = [
        ("CChord", "DB1", "USK401402290"),
        ("FChord", "DB2", "USK401402291"),
        ("GChord", "", "USK401402292"),
    ]
    .into_iter()
    .map(|(title, artist, isrc)| Track {
        title: title.into(),
        artist: artist.into(),
        isrc: isrc.into(),
        file_name: format!("C:\\Users\\whodis\\Music\\{title}.wav"),
        local_path: PathBuf::from(format!("samples/{title}.wav")),
        ..Track::default()
    })
    .collect();

    album.discs.push(Disc { tracks, ..Disc::new("disc 1") });
    album
}

fn chord_waves() -> HashMap<PathBuf, Vec<u8>> {
    [("CChord", BYTE_RATE), ("FChord", BYTE_RATE / 2), ("GChord", 2 * BYTE_RATE)]
        .into_iter()
        .map(|(title, data_len)| {
            let path = PathBuf::from(format!("samples/{title}.wav"));
            (path, pcm_header_bytes(1, 44100, 16, data_len))
        })
        .collect()
}

fn encode_in_memory(album: &Album, disc_index: usize) -> NraResult<Vec<u8>> {
    let waves = chord_waves();
    encode_with(album, disc_index, |track| {
        WaveHeader::parse(&waves[&track.local_path], &track.local_path.display().to_string())
    })
}

#[test]
fn end_to_end_three_tracks() {
    let album = chords_album();
    let bytes = encode_in_memory(&album, 0).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();

    let decoded = &project.album;
    assert_eq!(decoded.title, album.title);
    assert_eq!(decoded.artist, album.artist);
    assert_eq!(decoded.copyright, album.copyright);
    assert_eq!(decoded.author, album.author);
    assert_eq!(decoded.mcn, album.mcn);
    assert_eq!(decoded.release_date, album.release_date);
    assert_eq!(decoded.comment, album.comment);

    assert_eq!(decoded.track_count(), 3);
    for (original, decoded) in album.tracks().zip(decoded.tracks()) {
        assert_eq!(decoded.title, original.title);
        assert_eq!(decoded.artist, original.artist);
        assert_eq!(decoded.isrc, original.isrc);
        assert_eq!(decoded.file_name, original.file_name);
    }

    let file_names: Vec<_> =
        project.tracks.iter().map(|record| record.file_name.as_str()).collect();
    assert_eq!(file_names, vec!["CChord.wav", "FChord.wav", "GChord.wav"]);

    let track_numbers: Vec<_> = project.tracks.iter().map(|record| record.track_number).collect();
    assert_eq!(track_numbers, vec![1, 2, 3]);
}

#[test]
fn frame_timing() {
    let bytes = encode_in_memory(&chords_album(), 0).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();

    let timings: Vec<_> = project.tracks.iter().map(|record| record.timing).collect();

    // ceil(75 * data_len / byte_rate) - 1
    let lengths: Vec<_> = timings.iter().map(TrackTiming::length).collect();
    assert_eq!(lengths, vec![74, 37, 149]);

    let starts: Vec<_> = timings.iter().map(TrackTiming::start).collect();
    let ends: Vec<_> = timings.iter().map(TrackTiming::end).collect();
    assert_eq!(starts, vec![150, 374, 561]);
    assert_eq!(ends, vec![224, 411, 710]);

    assert_eq!(timings[0].start(), TRACK_PREGAP.to_frames());
    for timing in &timings {
        assert_eq!(timing.silence(), 150);
        assert_eq!(timing.end(), timing.start() + timing.length());
    }
    for pair in timings.windows(2) {
        assert_eq!(pair[1].start(), pair[0].end() + pair[1].silence());
    }
}

#[test]
fn track_order_changes_frames() {
    let mut album = chords_album();
    album.discs[0].tracks.reverse();

    let bytes = encode_in_memory(&album, 0).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();

    let titles: Vec<_> = project.album.tracks().map(|track| track.title.as_str()).collect();
    assert_eq!(titles, vec!["GChord", "FChord", "CChord"]);

    let starts: Vec<_> = project.tracks.iter().map(|record| record.timing.start()).collect();
    assert_eq!(starts, vec![150, 449, 636]);
}

#[test]
fn writes_canonical_options() {
    let bytes = encode_in_memory(&chords_album(), 0).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();

    let cd_options = &project.cd_options;
    assert_eq!(cd_options.track_option_length, 52);
    assert_eq!(cd_options.cd_options, [0, 0, 1, 1, 9]);
    assert_eq!(cd_options.write_cd_text(), 1);
    assert_eq!(cd_options.track_flags, vec![1, 1, 1]);
    assert_eq!(cd_options.opaque, OPAQUE_CD_OPTION);
    assert_eq!(cd_options.more_track_options, vec![0, 0, 1]);
    assert_eq!(cd_options.remove_end_silence(), Some(1));

    for (record, range) in project.tracks.iter().zip(&project.layout.tracks) {
        assert_eq!(record.record_len as usize, range.len() - 8);
        assert_eq!(record.protection, TRACK_UNPROTECTED);
        assert_eq!(record.filter_tag, NO_FILTER_TAG);
        assert_eq!(record.filter, vec![0; 8]);
        assert_eq!(record.source_path_again, record.source_path);
    }

    let burn_options = &project.burn_options;
    assert_eq!(burn_options.len, BURN_OPTIONS_LEN);
    assert_eq!(burn_options.values, BURN_OPTIONS);
    assert_eq!(burn_options.trailer, BURN_TRAILER.to_vec());
    assert_eq!(burn_options.disc_at_once(), 1);
    assert_eq!(burn_options.write(), 1);
    assert_eq!(burn_options.finalize_disc(), 1);
}

#[test]
fn starts_with_header() {
    let bytes = encode_in_memory(&chords_album(), 0).unwrap();
    assert_eq!(&bytes[..6], &[0xFF, 0xFE, 0xFF, 13, b'N', 0]);
    assert_eq!(&bytes[30..34], &52_u32.to_le_bytes());
}

#[test]
fn re_encoding_decoded_project_is_stable() {
    let bytes = encode_in_memory(&chords_album(), 0).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();
    assert_eq!(project.to_bytes().unwrap(), bytes);
}

#[test]
fn selects_disc() {
    let mut album = chords_album();
    let mut second = album.discs[0].clone();
    second.title = "disc 2".into();
    second.tracks.truncate(1);
    album.discs.push(second);

    let bytes = encode_in_memory(&album, 1).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();
    assert_eq!(project.album.track_count(), 1);
    assert_eq!(project.tracks[0].title, "CChord");
}

#[test]
fn rejects_missing_disc() {
    assert!(matches!(
        encode_in_memory(&chords_album(), 1),
        Err(NraError::NoSuchDisc { index: 1, disc_count: 1 })
    ));
}

#[test]
fn propagates_wave_errors() {
    let mut calls = 0;
    let result = encode_with(&chords_album(), 0, |track| {
        calls += 1;
        if track.title == "FChord" {
            Err(NraError::NotPcmFile(track.local_path.display().to_string()))
        } else {
            Ok(WaveHeader::parse(&pcm_header_bytes(2, 44100, 16, 1000), "ok.wav").unwrap())
        }
    });

    assert!(matches!(result, Err(NraError::NotPcmFile(path)) if path.contains("FChord")));
    assert_eq!(calls, 2);
}

#[test]
fn rejects_zero_byte_rate() {
    let mut header = WaveHeader::parse(&pcm_header_bytes(1, 44100, 16, 1000), "x").unwrap();
    header.byte_rate = 0;

    let result = encode_with(&chords_album(), 0, |_| Ok(header));
    assert!(matches!(result, Err(NraError::ZeroByteRate(path)) if path.contains("CChord")));
}

#[test]
fn empty_wave_has_zero_length() {
    let header = WaveHeader::parse(&pcm_header_bytes(1, 44100, 16, 0), "x").unwrap();
    let bytes = encode_with(&chords_album(), 0, |_| Ok(header)).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();

    let ends: Vec<_> = project.tracks.iter().map(|record| record.timing.end()).collect();
    assert_eq!(ends, vec![150, 300, 450]);
}

fn wave_with_frames(data_len: u32, byte_rate: u32) -> WaveHeader {
    WaveHeader {
        channels: 1,
        sample_rate: byte_rate,
        byte_rate,
        block_align: 1,
        bits_per_sample: 8,
        data_len,
    }
}

#[test]
fn rejects_track_too_long_for_frame_range() {
    // 1 byte per second, so over 300 billion frames
    let result = encode_with(&chords_album(), 0, |_| Ok(wave_with_frames(u32::MAX, 1)));
    assert!(matches!(
        result,
        Err(NraError::FrameOverflow { path, end })
            if path.contains("CChord") && end > u64::from(u32::MAX)
    ));
}

#[test]
fn rejects_start_past_frame_range() {
    // At 75 bytes per second every byte is one frame, so the first track ends just under the limit
    let mut album = chords_album();
    album.discs[0].tracks.truncate(2);

    let result = encode_with(&album, 0, |track| {
        let data_len = if track.title == "CChord" { u32::MAX - 200 } else { 75 };
        Ok(wave_with_frames(data_len, 75))
    });
    assert!(matches!(
        result,
        Err(NraError::FrameOverflow { path, end })
            if path.contains("FChord") && end == u64::from(u32::MAX) - 51 + 150 + 74
    ));

    album.discs[0].tracks.truncate(1);
    let bytes = encode_with(&album, 0, |_| Ok(wave_with_frames(u32::MAX - 200, 75))).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();
    assert_eq!(project.tracks[0].timing.end(), u32::MAX - 51);
}

#[test]
fn rejects_long_cd_text() {
    let mut album = chords_album();
    album.comment = "c".repeat(256);
    assert!(matches!(
        encode_in_memory(&album, 0),
        Err(NraError::StringTooLong { len: 256, max: 255, .. })
    ));
}

#[test]
fn long_track_strings_are_allowed() {
    let mut album = chords_album();
    album.discs[0].tracks[0].title = "t".repeat(1000);

    let bytes = encode_in_memory(&album, 0).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();
    assert_eq!(project.tracks[0].title.len(), 1000);
}

#[test]
fn empty_disc() {
    let mut album = chords_album();
    album.discs[0].tracks.clear();

    let bytes = encode_with(&album, 0, |_| unreachable!("no tracks to read")).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();
    assert_eq!(project.album.track_count(), 0);
    assert_eq!(project.cd_options.track_option_length, 40);
    assert_eq!(project.album.title, "Chords");
}

#[test]
fn encode_reads_wave_files() {
    let dir = tempdir().unwrap();

    let mut album = chords_album();
    for (track, (_, header)) in album.discs[0].tracks.iter_mut().zip(sorted_waves()) {
        track.local_path = dir.path().join(format!("{}.wav", track.title));
        fs::write(&track.local_path, header).unwrap();
    }

    let bytes = encode_nero_project(&album, 0).unwrap();
    let project = NeroProject::parse(&bytes).unwrap();
    let lengths: Vec<_> = project.tracks.iter().map(|record| record.timing.length()).collect();
    assert_eq!(lengths, vec![74, 37, 149]);
}

#[test]
fn encode_missing_wave_file() {
    let dir = tempdir().unwrap();
    let mut album = chords_album();
    album.discs[0].tracks[0].local_path = dir.path().join("missing.wav");
    assert!(matches!(encode_nero_project(&album, 0), Err(NraError::WaveOpen { .. })));
}

fn sorted_waves() -> Vec<(PathBuf, Vec<u8>)> {
    let mut waves: Vec<_> = chord_waves().into_iter().collect();
    // CChord, FChord, GChord
    waves.sort();
    waves
}
