//! Decoder: bytes back into a [`Structure`].
//!
//! Portable entries are resolved against the catalog as soon as their table
//! is read, before any record of the following stream is parsed. Reading
//! past the end of the input surfaces as [`DecodeError::Io`].

use std::io::Read;

use tilestamp_core::{ContentCatalog, ContentKind, Liquid, LiquidKind, PortableRef};

use crate::action::{TileAction, WallAction};
use crate::entry::{Entry, EntryTable};
use crate::error::DecodeError;
use crate::format::{FORMAT_VERSION, TileTag, WallTag, read_str, read_u8, read_u16};
use crate::structure::Structure;

/// Decode a stamp blob held in memory.
pub fn decode<C: ContentCatalog>(bytes: &[u8], catalog: &C) -> Result<Structure, DecodeError> {
    let mut reader = bytes;
    decode_from(&mut reader, catalog)
}

/// Decode a stamp blob from a reader. Bytes after the wall stream are left
/// unread.
pub fn decode_from<R: Read, C: ContentCatalog>(
    r: &mut R,
    catalog: &C,
) -> Result<Structure, DecodeError> {
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let width = read_u16(r)?;
    let height = read_u16(r)?;

    let tile_table = read_table(r, ContentKind::Tile, catalog)?;
    let tiles = read_tile_stream(r)?;

    let wall_table = read_table(r, ContentKind::Wall, catalog)?;
    let cells = usize::from(width) * usize::from(height);
    let walls = read_wall_stream(r, cells)?;

    log::debug!(
        "decoded {width}x{height} stamp: {}/{} tile/wall entries, {}/{} tile/wall actions",
        tile_table.len(),
        wall_table.len(),
        tiles.len(),
        walls.len()
    );
    Ok(Structure::from_parts(
        width, height, tile_table, wall_table, tiles, walls,
    ))
}

fn read_table<R: Read, C: ContentCatalog>(
    r: &mut R,
    kind: ContentKind,
    catalog: &C,
) -> Result<EntryTable, DecodeError> {
    let mut pairs = Vec::new();

    let stable_count = read_u16(r)?;
    for _ in 0..stable_count {
        let slot = read_u16(r)?;
        let id = read_u16(r)?;
        pairs.push((slot, Entry { id, portable: None }));
    }

    let portable_count = read_u16(r)?;
    for _ in 0..portable_count {
        let slot = read_u16(r)?;
        let name = read_str(r)?.map_err(DecodeError::InvalidName)?;
        let portable: PortableRef = name.parse().map_err(|_| DecodeError::InvalidName(name))?;
        let id = catalog.resolve(kind, &portable)?;
        pairs.push((
            slot,
            Entry {
                id,
                portable: Some(portable),
            },
        ));
    }

    EntryTable::from_slots(kind, pairs)
}

fn read_liquid<R: Read>(r: &mut R, kind: LiquidKind) -> Result<Liquid, DecodeError> {
    Ok(Liquid::new(kind, read_u8(r)?))
}

fn read_tile_stream<R: Read>(r: &mut R) -> Result<Vec<TileAction>, DecodeError> {
    let mut actions = Vec::new();
    loop {
        let tag = read_u8(r)?;
        let Some(tag) = TileTag::from_u8(tag) else {
            return Err(DecodeError::UnknownTag {
                stream: ContentKind::Tile,
                tag,
            });
        };
        let action = match tag {
            TileTag::End => return Ok(actions),
            TileTag::AirRun => TileAction::AirRun(read_u16(r)?),
            TileTag::Air => TileAction::Air,
            TileTag::ContentRun => {
                let slot = read_u16(r)?;
                TileAction::ContentRun(slot, read_u16(r)?)
            }
            TileTag::Content => TileAction::Content(read_u16(r)?),
            TileTag::Composite => TileAction::Composite {
                slot: read_u16(r)?,
                style: None,
                alternate: None,
            },
            TileTag::CompositeStyle => TileAction::Composite {
                slot: read_u16(r)?,
                style: Some(read_u8(r)?),
                alternate: None,
            },
            TileTag::CompositeStyleAlt => TileAction::Composite {
                slot: read_u16(r)?,
                style: Some(read_u8(r)?),
                alternate: Some(read_u8(r)?),
            },
            TileTag::Water => TileAction::Liquid(read_liquid(r, LiquidKind::Water)?),
            TileTag::Lava => TileAction::Liquid(read_liquid(r, LiquidKind::Lava)?),
            TileTag::Honey => TileAction::Liquid(read_liquid(r, LiquidKind::Honey)?),
            TileTag::WaterRun => {
                let liquid = read_liquid(r, LiquidKind::Water)?;
                TileAction::LiquidRun(liquid, read_u16(r)?)
            }
            TileTag::LavaRun => {
                let liquid = read_liquid(r, LiquidKind::Lava)?;
                TileAction::LiquidRun(liquid, read_u16(r)?)
            }
            TileTag::HoneyRun => {
                let liquid = read_liquid(r, LiquidKind::Honey)?;
                TileAction::LiquidRun(liquid, read_u16(r)?)
            }
        };
        actions.push(action);
    }
}

fn read_wall_stream<R: Read>(r: &mut R, cells: usize) -> Result<Vec<WallAction>, DecodeError> {
    let mut actions = Vec::new();
    let mut covered = 0;
    while covered < cells {
        let tag = read_u8(r)?;
        let action = match WallTag::from_u8(tag) {
            Some(WallTag::WallRun) => {
                let slot = read_u16(r)?;
                WallAction::WallRun(slot, read_u16(r)?)
            }
            Some(WallTag::Wall) => WallAction::Wall(read_u16(r)?),
            Some(WallTag::Empty) => WallAction::Empty,
            Some(WallTag::EmptyRun) => WallAction::EmptyRun(read_u16(r)?),
            None => {
                return Err(DecodeError::UnknownTag {
                    stream: ContentKind::Wall,
                    tag,
                });
            }
        };
        covered += action.width();
        actions.push(action);
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode, encode_region};
    use std::io;
    use tilestamp_core::{Catalog, Point, Tile, TileAccess, TileWorld, UnresolvedContent};

    fn strip() -> Vec<u8> {
        let catalog = Catalog::new(10, 4);
        let mut w = TileWorld::new(3, 1);
        w.fill(w.bounds(), Tile::solid(4));
        encode_region(&w, w.bounds(), &catalog)
    }

    #[test]
    fn decodes_identical_strip() {
        let s = decode(&strip(), &Catalog::new(10, 4)).unwrap();
        assert_eq!(s.size(), Point::new(3, 1));
        assert_eq!(s.tile_actions(), &[TileAction::ContentRun(0, 3)]);
        assert_eq!(s.tile_table().id(0), Some(4));
        assert_eq!(s.wall_actions(), &[WallAction::EmptyRun(3)]);
    }

    #[test]
    fn re_encoding_a_decoded_blob_is_identity() {
        let mut catalog = Catalog::new(10, 4);
        let bark = catalog.register(ContentKind::Tile, "orchard", "bark");
        let moss = catalog.register(ContentKind::Wall, "orchard", "moss");
        let mut w = TileWorld::new(4, 3);
        w.fill_fn(w.bounds(), |p| match (p.x * 3 + p.y) % 5 {
            0 => Tile::solid(bark).with_wall(moss),
            1 => Tile::solid(2),
            2 => Tile::AIR.with_liquid(Liquid::new(LiquidKind::Lava, 128)),
            3 => Tile::AIR.with_wall(1),
            _ => Tile::AIR,
        });
        let bytes = encode_region(&w, w.bounds(), &catalog);
        let decoded = decode(&bytes, &catalog).ok();
        assert_eq!(decoded.as_ref().map(encode), Some(bytes));
    }

    #[test]
    fn missing_package_fails_before_actions() {
        let mut with_pkg = Catalog::new(10, 4);
        let bark = with_pkg.register(ContentKind::Tile, "orchard", "bark");
        let mut w = TileWorld::new(2, 1);
        w.set_tile(Point::new(0, 0), Tile::solid(bark));
        let mut bytes = encode_region(&w, w.bounds(), &with_pkg);

        // Corrupt the tile stream: if actions were parsed first, this would
        // surface as an unknown tag instead.
        // content (3) + air (1) + end (1) + wall table (4) + wall run (3)
        let stream_start = bytes.len() - 12;
        assert_eq!(bytes[stream_start], TileTag::Content as u8);
        bytes[stream_start] = 0xEE;

        let err = decode(&bytes, &Catalog::new(10, 4)).err();
        assert!(matches!(
            err,
            Some(DecodeError::Unresolved(UnresolvedContent::MissingOwner { ref owner, .. }))
                if owner == "orchard"
        ));
    }

    #[test]
    fn portable_content_resolves_to_session_id() {
        let mut a = Catalog::new(10, 4);
        let bark_a = a.register(ContentKind::Tile, "orchard", "bark");
        let mut w = TileWorld::new(1, 1);
        w.set_tile(Point::ZERO, Tile::solid(bark_a));
        let bytes = encode_region(&w, w.bounds(), &a);

        let mut b = Catalog::new(10, 4);
        b.register(ContentKind::Tile, "mine", "ore");
        let bark_b = b.register(ContentKind::Tile, "orchard", "bark");
        assert_ne!(bark_a, bark_b);

        let s = decode(&bytes, &b).ok();
        assert_eq!(s.and_then(|s| s.tile_table().id(0)), Some(bark_b));
    }

    #[test]
    fn truncated_input_is_io_error() {
        let bytes = strip();
        for cut in [0, 3, 10, bytes.len() - 1] {
            let err = decode(&bytes[..cut], &Catalog::new(10, 4)).err();
            let eof = matches!(
                err,
                Some(DecodeError::Io(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof
            );
            assert!(eof, "cut at {cut}: {err:?}");
        }
    }

    #[test]
    fn missing_end_marker_reads_past_input() {
        let mut bytes = strip();
        // Drop the end marker and the whole wall section.
        bytes.truncate(18);
        let err = decode(&bytes, &Catalog::new(10, 4)).err();
        assert!(matches!(err, Some(DecodeError::Io(_))));
    }

    #[test]
    fn unsupported_version() {
        let mut bytes = strip();
        bytes[0] = 1;
        let err = decode(&bytes, &Catalog::new(10, 4)).err();
        assert!(matches!(err, Some(DecodeError::UnsupportedVersion(1))));
    }

    #[test]
    fn unknown_wall_tag() {
        let mut bytes = strip();
        let wall_tag = bytes.len() - 3;
        bytes[wall_tag] = 9;
        let err = decode(&bytes, &Catalog::new(10, 4)).err();
        assert!(matches!(
            err,
            Some(DecodeError::UnknownTag {
                stream: ContentKind::Wall,
                tag: 9
            })
        ));
    }

    #[test]
    fn invalid_portable_name() {
        // 1x1, empty stable tile table, one portable entry named "nodot".
        let mut bytes = vec![FORMAT_VERSION, 1, 0, 1, 0, 0, 0, 1, 0, 0, 0, 5];
        bytes.extend_from_slice(b"nodot");
        let err = decode(&bytes, &Catalog::new(10, 4)).err();
        assert!(matches!(err, Some(DecodeError::InvalidName(ref n)) if n == "nodot"));
    }

    #[test]
    fn trailing_bytes_are_left_in_reader() {
        let mut bytes = strip();
        bytes.extend_from_slice(&[0xAB, 0xCD]);
        let mut reader = bytes.as_slice();
        assert!(decode_from(&mut reader, &Catalog::new(10, 4)).is_ok());
        assert_eq!(reader, &[0xAB, 0xCD]);
    }

    #[test]
    fn unknown_tile_tag() {
        let mut bytes = strip();
        // First record of the tile stream, after the 13-byte header and table.
        assert_eq!(bytes[13], TileTag::ContentRun as u8);
        bytes[13] = 0x20;
        let err = decode(&bytes, &Catalog::new(10, 4)).err();
        assert!(matches!(
            err,
            Some(DecodeError::UnknownTag {
                stream: ContentKind::Tile,
                tag: 0x20
            })
        ));
    }
}
