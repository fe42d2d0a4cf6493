//! Visual connectivity ("framing") of tiles and walls.
//!
//! Placing content directly into a [`TileAccess`] leaves the connectivity
//! masks of the touched cells stale; a [`Framer`] recomputes them one cell
//! at a time.

use crate::geom::Point;
use crate::world::TileAccess;

/// Mask bit set when the neighbour above connects.
pub const CONNECT_UP: u8 = 1 << 0;
/// Mask bit set when the neighbour to the right connects.
pub const CONNECT_RIGHT: u8 = 1 << 1;
/// Mask bit set when the neighbour below connects.
pub const CONNECT_DOWN: u8 = 1 << 2;
/// Mask bit set when the neighbour to the left connects.
pub const CONNECT_LEFT: u8 = 1 << 3;

const DIRECTIONS: [u8; 4] = [CONNECT_UP, CONNECT_RIGHT, CONNECT_DOWN, CONNECT_LEFT];

/// Recomputes the connectivity metadata of a single cell.
pub trait Framer {
    /// Recompute the tile mask of the cell at `p`.
    fn frame_tile<W: TileAccess>(&mut self, world: &mut W, p: Point);

    /// Recompute the wall mask of the cell at `p`.
    fn frame_wall<W: TileAccess>(&mut self, world: &mut W, p: Point);
}

/// Four-neighbour framer: a tile connects to active neighbours holding the
/// same content, a wall connects to neighbours with the same wall.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityFramer;

impl Framer for ConnectivityFramer {
    fn frame_tile<W: TileAccess>(&mut self, world: &mut W, p: Point) {
        let Some(tile) = world.tile(p) else {
            return;
        };
        let mut mask = 0;
        if tile.active {
            for (n, bit) in p.neighbors_4().into_iter().zip(DIRECTIONS) {
                if world
                    .tile(n)
                    .is_some_and(|t| t.active && t.content == tile.content)
                {
                    mask |= bit;
                }
            }
        }
        if let Some(t) = world.tile_mut(p) {
            t.tile_mask = mask;
        }
    }

    fn frame_wall<W: TileAccess>(&mut self, world: &mut W, p: Point) {
        let Some(tile) = world.tile(p) else {
            return;
        };
        let mut mask = 0;
        if tile.has_wall() {
            for (n, bit) in p.neighbors_4().into_iter().zip(DIRECTIONS) {
                if world.tile(n).is_some_and(|t| t.wall == tile.wall) {
                    mask |= bit;
                }
            }
        }
        if let Some(t) = world.tile_mut(p) {
            t.wall_mask = mask;
        }
    }
}
