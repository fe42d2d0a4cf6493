//! The [`Structure`] aggregate: a captured or decoded region, ready to be
//! placed.

use tilestamp_core::{ContentCatalog, ContentKind, Point, Range, TileAccess};

use crate::action::{TileAction, WallAction};
use crate::encode::{scan_tiles, scan_walls};
use crate::entry::{EntryMap, EntryTable};
use crate::error::PlaceError;

/// An immutable `width × height` region: two content tables and the tile
/// and wall action streams.
///
/// Replaying either stream row by row, wrapping every `width` cells, covers
/// exactly `width × height` cells when the structure was produced by
/// [`capture`](Structure::capture) or decoded from a blob written by
/// [`encode`](crate::encode). Blobs from elsewhere are not checked; see
/// [`check_footprint`](Structure::check_footprint).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Structure {
    width: u16,
    height: u16,
    tile_table: EntryTable,
    wall_table: EntryTable,
    tiles: Vec<TileAction>,
    walls: Vec<WallAction>,
}

impl Structure {
    /// Capture `region` of `world`.
    ///
    /// Regions larger than `u16::MAX` on an axis are clamped. Cells outside
    /// the world read as air without a wall.
    pub fn capture<W, C>(world: &W, region: Range, catalog: &C) -> Self
    where
        W: TileAccess,
        C: ContentCatalog,
    {
        let max = i32::from(u16::MAX);
        let clamped =
            Range::with_size(region.min, region.width().min(max), region.height().min(max));
        if clamped != region && !region.is_empty() {
            log::warn!("capture region {region} clamped to {clamped}");
        }
        let region = clamped;

        let tile_map = EntryMap::build(world, region, ContentKind::Tile, catalog);
        let wall_map = EntryMap::build(world, region, ContentKind::Wall, catalog);
        let tiles = scan_tiles(world, region, &tile_map, catalog);
        let walls = scan_walls(world, region, &wall_map);

        Self {
            width: region.width().max(0) as u16,
            height: region.height().max(0) as u16,
            tile_table: tile_map.into_table(),
            wall_table: wall_map.into_table(),
            tiles,
            walls,
        }
    }

    pub(crate) fn from_parts(
        width: u16,
        height: u16,
        tile_table: EntryTable,
        wall_table: EntryTable,
        tiles: Vec<TileAction>,
        walls: Vec<WallAction>,
    ) -> Self {
        Self {
            width,
            height,
            tile_table,
            wall_table,
            tiles,
            walls,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Size as a `Point` (width = x, height = y).
    pub fn size(&self) -> Point {
        Point::new(i32::from(self.width), i32::from(self.height))
    }

    /// Number of cells in the footprint.
    pub fn cell_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// The footprint when placed with its top-left cell at `origin`.
    pub fn footprint(&self, origin: Point) -> Range {
        Range::with_size(origin, i32::from(self.width), i32::from(self.height))
    }

    pub fn tile_table(&self) -> &EntryTable {
        &self.tile_table
    }

    pub fn wall_table(&self) -> &EntryTable {
        &self.wall_table
    }

    pub fn tile_actions(&self) -> &[TileAction] {
        &self.tiles
    }

    pub fn wall_actions(&self) -> &[WallAction] {
        &self.walls
    }

    /// Cells covered by the tile stream.
    pub fn tile_cells(&self) -> usize {
        self.tiles.iter().map(TileAction::width).sum()
    }

    /// Cells covered by the wall stream.
    pub fn wall_cells(&self) -> usize {
        self.walls.iter().map(WallAction::width).sum()
    }

    /// Verify that both streams cover exactly `width × height` cells.
    pub fn check_footprint(&self) -> Result<(), PlaceError> {
        let expected = self.cell_count();
        for (stream, actual) in [
            (ContentKind::Tile, self.tile_cells()),
            (ContentKind::Wall, self.wall_cells()),
        ] {
            if actual != expected {
                return Err(PlaceError::FootprintMismatch {
                    stream,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}
