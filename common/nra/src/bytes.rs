//! Little-endian integer and UTF-16 string primitives shared by the WAVE and NRA codecs
//!
//! Readers take a buffer and an offset and return the offset just past the value along with the
//! value itself, so callers can thread a single position through a sequential parse.
//!
//! Two string encodings appear in project files:
//!
//! * Short strings: 2-byte UTF-16 byte order mark, one reserved byte (always `0xFF`), a 1-byte
//!   length in code units, then the code units.
//! * Long strings: 4-byte little-endian length in code units, the code units in UTF-16LE with no
//!   byte order mark, then a 2-byte null terminator.

use crate::{NraError, NraResult};

const BOM_LE: [u8; 2] = [0xFF, 0xFE];
const BOM_BE: [u8; 2] = [0xFE, 0xFF];

const SHORT_STRING_RESERVED: u8 = 0xFF;
const SHORT_STRING_HEADER_LEN: usize = 4;

pub const SHORT_STRING_MAX_LEN: usize = u8::MAX as usize;

pub fn read_bytes(buffer: &[u8], offset: usize, len: usize) -> NraResult<(usize, &[u8])> {
    let end = offset
        .checked_add(len)
        .filter(|&end| end <= buffer.len())
        .ok_or(NraError::OutOfBounds { offset, len, buffer_len: buffer.len() })?;

    Ok((end, &buffer[offset..end]))
}

/// Read a `width`-byte unsigned little-endian integer. `width` must be at most 8.
pub fn read_le_uint(buffer: &[u8], offset: usize, width: usize) -> NraResult<(usize, u64)> {
    debug_assert!(width <= 8, "integer width must be at most 8 bytes, was {width}");

    let (position, bytes) = read_bytes(buffer, offset, width)?;
    let value = bytes.iter().rev().fold(0_u64, |acc, &b| (acc << 8) | u64::from(b));

    Ok((position, value))
}

pub fn read_u16(buffer: &[u8], offset: usize) -> NraResult<(usize, u16)> {
    let (position, bytes) = read_bytes(buffer, offset, 2)?;
    Ok((position, u16::from_le_bytes([bytes[0], bytes[1]])))
}

pub fn read_u32(buffer: &[u8], offset: usize) -> NraResult<(usize, u32)> {
    let (position, bytes) = read_bytes(buffer, offset, 4)?;
    Ok((position, u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])))
}

pub fn read_tag(buffer: &[u8], offset: usize) -> NraResult<(usize, [u8; 4])> {
    let (position, bytes) = read_bytes(buffer, offset, 4)?;
    Ok((position, [bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Write the low `width` bytes of `value`, least significant first. Higher bytes are truncated.
#[must_use]
pub fn write_le_uint(value: u64, width: usize) -> Vec<u8> {
    (0..width).map(|i| if i < 8 { (value >> (8 * i)) as u8 } else { 0 }).collect()
}

pub fn read_short_string(buffer: &[u8], offset: usize) -> NraResult<(usize, String)> {
    let (position, header) = read_bytes(buffer, offset, SHORT_STRING_HEADER_LEN).map_err(|_| {
        NraError::MalformedString {
            offset,
            reason: format!("header extends past end of buffer ({} bytes)", buffer.len()),
        }
    })?;

    let big_endian = match [header[0], header[1]] {
        BOM_LE => false,
        BOM_BE => true,
        bom => {
            return Err(NraError::MalformedString {
                offset,
                reason: format!("invalid byte order mark {:02X}{:02X}", bom[0], bom[1]),
            });
        }
    };
    let len = usize::from(header[3]);

    let (position, code_units) = read_bytes(buffer, position, 2 * len).map_err(|_| {
        NraError::MalformedString {
            offset,
            reason: format!("length {len} extends past end of buffer ({} bytes)", buffer.len()),
        }
    })?;
    let text = decode_utf16(code_units, big_endian, offset)?;

    Ok((position, text))
}

pub fn write_short_string(text: &str) -> NraResult<Vec<u8>> {
    let code_units: Vec<u16> = text.encode_utf16().collect();
    if code_units.len() > SHORT_STRING_MAX_LEN {
        return Err(NraError::StringTooLong {
            text: text.into(),
            len: code_units.len(),
            max: SHORT_STRING_MAX_LEN,
        });
    }

    let mut bytes = Vec::with_capacity(SHORT_STRING_HEADER_LEN + 2 * code_units.len());
    bytes.extend(BOM_LE);
    bytes.push(SHORT_STRING_RESERVED);
    bytes.push(code_units.len() as u8);
    bytes.extend(code_units.into_iter().flat_map(u16::to_le_bytes));

    Ok(bytes)
}

pub fn read_long_string(buffer: &[u8], offset: usize) -> NraResult<(usize, String)> {
    let (position, len) = read_u32(buffer, offset).map_err(|_| NraError::MalformedString {
        offset,
        reason: format!("length field extends past end of buffer ({} bytes)", buffer.len()),
    })?;

    // Code units followed by the 2-byte terminator
    let byte_len = 2 * (len as usize) + 2;
    let (end, bytes) = read_bytes(buffer, position, byte_len).map_err(|_| {
        NraError::MalformedString {
            offset,
            reason: format!("length {len} extends past end of buffer ({} bytes)", buffer.len()),
        }
    })?;
    let text = decode_utf16(&bytes[..byte_len - 2], false, offset)?;

    Ok((end, text))
}

#[must_use]
pub fn write_long_string(text: &str) -> Vec<u8> {
    let code_units: Vec<u16> = text.encode_utf16().collect();

    let mut bytes = Vec::with_capacity(4 + 2 * code_units.len() + 2);
    bytes.extend((code_units.len() as u32).to_le_bytes());
    bytes.extend(code_units.into_iter().flat_map(u16::to_le_bytes));
    bytes.extend([0, 0]);

    bytes
}

/// Render `bytes` as text for diagnostics, replacing anything but printable ASCII with `.`.
#[must_use]
pub fn printable_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { char::from(b) } else { '.' })
        .collect()
}

fn decode_utf16(bytes: &[u8], big_endian: bool, offset: usize) -> NraResult<String> {
    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if big_endian { u16::from_be_bytes(pair) } else { u16::from_le_bytes(pair) }
        })
        .collect();

    String::from_utf16(&code_units)
        .map_err(|err| NraError::MalformedString { offset, reason: err.to_string() })
}
