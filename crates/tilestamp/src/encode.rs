//! Encoder: region scan into run-length compressed actions, and actions
//! into bytes.
//!
//! A composite object is recorded once, at its top-left anchor cell; its
//! other cells carry no independent content and are written as air.

use tilestamp_core::{ContentCatalog, Liquid, LiquidKind, Point, Range, TileAccess};

use crate::action::{Slot, TileAction, WallAction};
use crate::entry::{EntryMap, EntryTable};
use crate::format::{FORMAT_VERSION, TileTag, WallTag, put_str, put_u16};
use crate::structure::Structure;

/// Capture `region` of `world` and encode it.
///
/// Equivalent to `encode(&Structure::capture(world, region, catalog))`.
pub fn encode_region<W, C>(world: &W, region: Range, catalog: &C) -> Vec<u8>
where
    W: TileAccess,
    C: ContentCatalog,
{
    encode(&Structure::capture(world, region, catalog))
}

/// Serialize a structure. Identical structures always produce identical
/// bytes.
pub fn encode(structure: &Structure) -> Vec<u8> {
    let mut out = Vec::new();
    out.push(FORMAT_VERSION);
    put_u16(&mut out, structure.width());
    put_u16(&mut out, structure.height());

    write_table(&mut out, structure.tile_table());
    for action in structure.tile_actions() {
        write_tile_action(&mut out, action);
    }
    out.push(TileTag::End as u8);

    write_table(&mut out, structure.wall_table());
    for action in structure.wall_actions() {
        write_wall_action(&mut out, action);
    }

    log::debug!(
        "encoded {}x{} stamp: {} tile actions, {} wall actions, {} bytes",
        structure.width(),
        structure.height(),
        structure.tile_actions().len(),
        structure.wall_actions().len(),
        out.len()
    );
    out
}

// Tables hold at most `MAX_ENTRIES` entries, so both counts fit in a `u16`.
fn write_table(out: &mut Vec<u8>, table: &EntryTable) {
    let stable: Vec<_> = table.stable().collect();
    put_u16(out, stable.len() as u16);
    for (slot, id) in stable {
        put_u16(out, slot);
        put_u16(out, id);
    }

    let portable: Vec<_> = table.portable().collect();
    put_u16(out, portable.len() as u16);
    for (slot, name) in portable {
        put_u16(out, slot);
        put_str(out, &name.to_string());
    }
}

fn liquid_tags(kind: LiquidKind) -> (TileTag, TileTag) {
    match kind {
        LiquidKind::Water => (TileTag::Water, TileTag::WaterRun),
        LiquidKind::Lava => (TileTag::Lava, TileTag::LavaRun),
        LiquidKind::Honey => (TileTag::Honey, TileTag::HoneyRun),
    }
}

fn write_tile_action(out: &mut Vec<u8>, action: &TileAction) {
    match *action {
        TileAction::Air => out.push(TileTag::Air as u8),
        TileAction::AirRun(n) => {
            out.push(TileTag::AirRun as u8);
            put_u16(out, n);
        }
        TileAction::Content(slot) => {
            out.push(TileTag::Content as u8);
            put_u16(out, slot);
        }
        TileAction::ContentRun(slot, n) => {
            out.push(TileTag::ContentRun as u8);
            put_u16(out, slot);
            put_u16(out, n);
        }
        TileAction::Composite {
            slot,
            style,
            alternate,
        } => match (style, alternate) {
            (None, None) => {
                out.push(TileTag::Composite as u8);
                put_u16(out, slot);
            }
            (Some(style), None) => {
                out.push(TileTag::CompositeStyle as u8);
                put_u16(out, slot);
                out.push(style);
            }
            (style, Some(alternate)) => {
                out.push(TileTag::CompositeStyleAlt as u8);
                put_u16(out, slot);
                out.push(style.unwrap_or(0));
                out.push(alternate);
            }
        },
        TileAction::Liquid(liquid) => {
            out.push(liquid_tags(liquid.kind).0 as u8);
            out.push(liquid.amount);
        }
        TileAction::LiquidRun(liquid, n) => {
            out.push(liquid_tags(liquid.kind).1 as u8);
            out.push(liquid.amount);
            put_u16(out, n);
        }
    }
}

fn write_wall_action(out: &mut Vec<u8>, action: &WallAction) {
    match *action {
        WallAction::Wall(slot) => {
            out.push(WallTag::Wall as u8);
            put_u16(out, slot);
        }
        WallAction::WallRun(slot, n) => {
            out.push(WallTag::WallRun as u8);
            put_u16(out, slot);
            put_u16(out, n);
        }
        WallAction::Empty => out.push(WallTag::Empty as u8),
        WallAction::EmptyRun(n) => {
            out.push(WallTag::EmptyRun as u8);
            put_u16(out, n);
        }
    }
}

// ---------------------------------------------------------------------------
// Region scan
// ---------------------------------------------------------------------------

/// What the tile stream records for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TileOutcome {
    Air,
    Content(Slot),
    Composite { slot: Slot, style: u8, alternate: u8 },
    Liquid(Liquid),
}

/// What the wall stream records for one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum WallOutcome {
    Empty,
    Wall(Slot),
}

/// Collapse consecutive equal values into `(value, count)` runs of at most
/// `u16::MAX`.
fn runs<T: Copy + PartialEq>(row: impl IntoIterator<Item = T>) -> Vec<(T, u16)> {
    let mut out = Vec::<(T, u16)>::new();
    for v in row {
        match out.last_mut() {
            Some((cur, len)) if *cur == v && *len < u16::MAX => *len += 1,
            _ => out.push((v, 1)),
        }
    }
    out
}

fn tile_outcome<W, C>(world: &W, p: Point, map: &EntryMap, catalog: &C) -> TileOutcome
where
    W: TileAccess,
    C: ContentCatalog,
{
    let Some(tile) = world.tile(p) else {
        return TileOutcome::Air;
    };
    if !tile.active {
        return if tile.liquid.is_empty() {
            TileOutcome::Air
        } else {
            TileOutcome::Liquid(tile.liquid)
        };
    }
    let Some(slot) = map.slot(tile.content) else {
        return TileOutcome::Air;
    };
    match catalog.composite(tile.content) {
        None => TileOutcome::Content(slot),
        Some(def) => {
            if def.offset_of(tile.frame_x, tile.frame_y) != (0, 0) {
                return TileOutcome::Air;
            }
            let (style, alternate) = def.style_of(tile.frame_x, tile.frame_y);
            TileOutcome::Composite {
                slot,
                style,
                alternate,
            }
        }
    }
}

/// Tile stream for `region`, row by row.
pub(crate) fn scan_tiles<W, C>(
    world: &W,
    region: Range,
    map: &EntryMap,
    catalog: &C,
) -> Vec<TileAction>
where
    W: TileAccess,
    C: ContentCatalog,
{
    let mut actions = Vec::new();
    for y in region.min.y..region.max.y {
        let row = region.row(y).iter().map(|p| tile_outcome(world, p, map, catalog));
        for (outcome, n) in runs(row) {
            match outcome {
                TileOutcome::Air if n == 1 => actions.push(TileAction::Air),
                TileOutcome::Air => actions.push(TileAction::AirRun(n)),
                TileOutcome::Content(slot) if n == 1 => actions.push(TileAction::Content(slot)),
                TileOutcome::Content(slot) => actions.push(TileAction::ContentRun(slot, n)),
                TileOutcome::Liquid(liquid) if n == 1 => actions.push(TileAction::Liquid(liquid)),
                TileOutcome::Liquid(liquid) => actions.push(TileAction::LiquidRun(liquid, n)),
                TileOutcome::Composite {
                    slot,
                    style,
                    alternate,
                } => {
                    let action = TileAction::Composite {
                        slot,
                        style: (style != 0 || alternate != 0).then_some(style),
                        alternate: (alternate != 0).then_some(alternate),
                    };
                    actions.extend(std::iter::repeat_n(action, usize::from(n)));
                }
            }
        }
    }
    actions
}

/// Wall stream for `region`, row by row.
pub(crate) fn scan_walls<W: TileAccess>(
    world: &W,
    region: Range,
    map: &EntryMap,
) -> Vec<WallAction> {
    let mut actions = Vec::new();
    for y in region.min.y..region.max.y {
        let row = region.row(y).iter().map(|p| {
            world
                .tile(p)
                .filter(|t| t.has_wall())
                .and_then(|t| map.slot(t.wall))
                .map_or(WallOutcome::Empty, WallOutcome::Wall)
        });
        for (outcome, n) in runs(row) {
            actions.push(match (outcome, n) {
                (WallOutcome::Empty, 1) => WallAction::Empty,
                (WallOutcome::Empty, n) => WallAction::EmptyRun(n),
                (WallOutcome::Wall(slot), 1) => WallAction::Wall(slot),
                (WallOutcome::Wall(slot), n) => WallAction::WallRun(slot, n),
            });
        }
    }
    actions
}
