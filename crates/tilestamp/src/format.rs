//! Binary layout of a stamp blob.
//!
//! ```text
//! [format_version: u8][width: u16][height: u16]
//! [tile table][tile records...][END]
//! [wall table][wall records...]
//!
//! table:  [stable_count: u16]   { [slot: u16][id: u16] }*
//!         [portable_count: u16] { [slot: u16][name_len: varint][name: "owner.name"] }*
//! record: [tag: u8][payload]
//! ```
//!
//! All integers are little-endian. Tags are a separate byte, so every `u16`
//! is a usable slot. Wall records carry no end marker: the wall stream ends
//! once it has covered `width × height` cells.

use std::io::{self, Read};

/// Current format version.
pub const FORMAT_VERSION: u8 = 2;

/// Extension appended to stamp file paths that have none.
pub const DEFAULT_EXTENSION: &str = "tstamp";

/// Tile stream record tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TileTag {
    /// `[count: u16]`
    AirRun = 0,
    Air = 1,
    /// `[slot: u16][count: u16]`
    ContentRun = 2,
    /// `[slot: u16]`
    Content = 3,
    /// `[slot: u16]`
    Composite = 4,
    /// `[slot: u16][style: u8]`
    CompositeStyle = 5,
    /// `[slot: u16][style: u8][alternate: u8]`
    CompositeStyleAlt = 6,
    /// `[amount: u8]`
    Water = 7,
    Lava = 8,
    Honey = 9,
    /// `[amount: u8][count: u16]`
    WaterRun = 10,
    LavaRun = 11,
    HoneyRun = 12,
    End = 0xFF,
}

impl TileTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::AirRun),
            1 => Some(Self::Air),
            2 => Some(Self::ContentRun),
            3 => Some(Self::Content),
            4 => Some(Self::Composite),
            5 => Some(Self::CompositeStyle),
            6 => Some(Self::CompositeStyleAlt),
            7 => Some(Self::Water),
            8 => Some(Self::Lava),
            9 => Some(Self::Honey),
            10 => Some(Self::WaterRun),
            11 => Some(Self::LavaRun),
            12 => Some(Self::HoneyRun),
            0xFF => Some(Self::End),
            _ => None,
        }
    }
}

/// Wall stream record tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WallTag {
    /// `[slot: u16][count: u16]`
    WallRun = 0,
    /// `[slot: u16]`
    Wall = 1,
    Empty = 2,
    /// `[count: u16]`
    EmptyRun = 3,
}

impl WallTag {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::WallRun),
            1 => Some(Self::Wall),
            2 => Some(Self::Empty),
            3 => Some(Self::EmptyRun),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Primitive writers / readers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

/// Unsigned LEB128, 7 bits per byte, high bit set on all but the last byte.
pub(crate) fn put_varint(out: &mut Vec<u8>, mut v: usize) {
    while v >= 0x80 {
        out.push((v as u8 & 0x7F) | 0x80);
        v >>= 7;
    }
    out.push(v as u8);
}

/// Length-prefixed UTF-8 string.
pub(crate) fn put_str(out: &mut Vec<u8>, s: &str) {
    put_varint(out, s.len());
    out.extend_from_slice(s.as_bytes());
}

pub(crate) fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub(crate) fn read_u16<R: Read>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub(crate) fn read_varint<R: Read>(r: &mut R) -> io::Result<usize> {
    let mut v = 0usize;
    let mut shift = 0u32;
    loop {
        let byte = read_u8(r)?;
        if shift >= usize::BITS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "varint length overflows usize",
            ));
        }
        v |= usize::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            return Ok(v);
        }
        shift += 7;
    }
}

/// Read a length-prefixed string. Invalid UTF-8 is returned as the lossy
/// string in the error.
pub(crate) fn read_str<R: Read>(r: &mut R) -> io::Result<Result<String, String>> {
    let len = read_varint(r)?;
    let mut bytes = Vec::new();
    r.by_ref().take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("string truncated: expected {len} bytes, got {}", bytes.len()),
        ));
    }
    Ok(String::from_utf8(bytes).map_err(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_u8() {
        for v in 0..=u8::MAX {
            if let Some(tag) = TileTag::from_u8(v) {
                assert_eq!(tag as u8, v);
            }
            if let Some(tag) = WallTag::from_u8(v) {
                assert_eq!(tag as u8, v);
            }
        }
        assert_eq!(TileTag::from_u8(13), None);
        assert_eq!(WallTag::from_u8(4), None);
    }

    #[test]
    fn varint_boundaries() {
        for (v, len) in [(0usize, 1usize), (127, 1), (128, 2), (16_383, 2), (16_384, 3)] {
            let mut buf = Vec::new();
            put_varint(&mut buf, v);
            assert_eq!(buf.len(), len, "value {v}");
            assert_eq!(read_varint(&mut buf.as_slice()).ok(), Some(v));
        }
    }

    #[test]
    fn string_is_length_prefixed() {
        let mut buf = Vec::new();
        put_str(&mut buf, "orchard.bark");
        assert_eq!(buf[0], 12);
        assert_eq!(&buf[1..], b"orchard.bark");
        let s = read_str(&mut buf.as_slice()).ok();
        assert_eq!(s, Some(Ok("orchard.bark".to_string())));
    }

    #[test]
    fn truncated_string_is_eof() {
        let buf = [5u8, b'a', b'b'];
        let err = read_str(&mut &buf[..]).err().map(|e| e.kind());
        assert_eq!(err, Some(io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn non_utf8_string_is_reported() {
        let buf = [2u8, 0xFF, 0xFE];
        let s = read_str(&mut &buf[..]).ok();
        assert!(matches!(s, Some(Err(_))));
    }
}
