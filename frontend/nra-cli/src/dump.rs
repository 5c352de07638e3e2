use nra::bytes::printable_ascii;
use nra::cdtime::CdTime;
use nra::project::Layout;
use nra::{NeroProject, WaveHeader};
use std::ops::Range;

const HEX_ROW_LEN: usize = 8;

pub fn print_project(project: &NeroProject) {
    let album = &project.album;
    println!("Title:        {}", album.title);
    println!("Artist:       {}", album.artist);
    println!("Copyright:    {}", album.copyright);
    println!("Author:       {}", album.author);
    println!("MCN:          {}", album.mcn);
    println!("Release date: {}", album.release_date);
    println!("Comment:      {}", album.comment);

    let cd_options = &project.cd_options;
    println!();
    println!("Track option length: {}", cd_options.track_option_length);
    println!("Write CD-Text:       {}", cd_options.write_cd_text());
    println!("Normalize tracks:    {}", format_option(cd_options.normalize_all_tracks()));
    println!("No pause:            {}", format_option(cd_options.no_pause_between_tracks()));
    println!("Remove end silence:  {}", format_option(cd_options.remove_end_silence()));

    for record in &project.tracks {
        let timing = record.timing;
        println!();
        println!("Track {:02}: {}", record.track_number, record.title);
        println!("  Composer:  {}", record.artist);
        println!("  ISRC:      {}", record.isrc);
        println!("  Source:    {}", record.source_path);
        println!("  Silence:   {}", format_frames(timing.silence()));
        println!("  Start:     {}", format_frames(timing.start()));
        println!("  Length:    {}", format_frames(timing.length()));
        println!("  End:       {}", format_frames(timing.end()));
        println!("  Protected: {}", record.is_protected());
    }

    let burn_options = &project.burn_options;
    println!();
    println!("Disc at once:  {}", burn_options.disc_at_once());
    println!("Write:         {}", burn_options.write());
    println!("Finalize disc: {}", burn_options.finalize_disc());
}

pub fn print_sections(buffer: &[u8], layout: &Layout) {
    print_section("Header", buffer, layout.header.clone());
    print_section("CD options", buffer, layout.cd_options.clone());
    for (i, range) in layout.tracks.iter().enumerate() {
        print_section(&format!("Track {}", i + 1), buffer, range.clone());
    }
    print_section("Burn options", buffer, layout.burn_options.clone());
}

fn print_section(name: &str, buffer: &[u8], range: Range<usize>) {
    println!();
    println!("{name} ({} bytes at {:#x})", range.len(), range.start);

    let start = range.start;
    for (i, row) in buffer[range].chunks(HEX_ROW_LEN).enumerate() {
        println!("{}", format_hex_row(start + i * HEX_ROW_LEN, row));
    }
}

pub fn print_wave_header(header: &WaveHeader) {
    println!("Channels:        {}", header.channels);
    println!("Sample rate:     {}", header.sample_rate);
    println!("Byte rate:       {}", header.byte_rate);
    println!("Block align:     {}", header.block_align);
    println!("Bits per sample: {}", header.bits_per_sample);
    println!("Data length:     {}", header.data_len);
    match header.cd_frames() {
        Some(frames) => match u32::try_from(frames) {
            Ok(frames) => println!("CD frames:       {}", format_frames(frames)),
            Err(_) => println!("CD frames:       {frames}"),
        },
        None => println!("CD frames:       n/a"),
    }
}

fn format_option(value: Option<u32>) -> String {
    value.map_or_else(|| "n/a".into(), |value| value.to_string())
}

fn format_frames(frames: u32) -> String {
    format!("{frames} ({})", CdTime::from_frames(frames))
}

fn format_hex_row(offset: usize, row: &[u8]) -> String {
    let hex: Vec<_> = row.iter().map(|b| format!("{b:02x}")).collect();
    let text = printable_ascii(row);

    format!("{offset:08x}  {:<width$}  |{text}|", hex.join(" "), width = 3 * HEX_ROW_LEN - 1)
}
