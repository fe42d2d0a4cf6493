//! Grid access: the [`TileAccess`] trait and the owned [`TileWorld`] grid.
//!
//! Every read and write made by the codec and the placer goes through
//! [`TileAccess`], which is bounds-checked: reads outside the world return
//! `None`, writes outside the world are dropped.

use crate::geom::{Point, Range};
use crate::tile::Tile;

/// Bounds-checked access to a tile grid owned by the host.
pub trait TileAccess {
    /// The range of valid cell coordinates.
    fn bounds(&self) -> Range;

    /// Read the cell at `p`, or `None` if out of bounds.
    fn tile(&self, p: Point) -> Option<Tile>;

    /// Mutable access to the cell at `p`, or `None` if out of bounds.
    fn tile_mut(&mut self, p: Point) -> Option<&mut Tile>;

    /// Whether `p` is a valid coordinate.
    fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    /// Overwrite the cell at `p`. Returns `false` if out of bounds.
    fn set_tile(&mut self, p: Point, tile: Tile) -> bool {
        match self.tile_mut(p) {
            Some(t) => {
                *t = tile;
                true
            }
            None => false,
        }
    }

    /// Apply `f` to the cell at `p`. Returns `false` if out of bounds.
    fn update(&mut self, p: Point, f: impl FnOnce(&mut Tile)) -> bool
    where
        Self: Sized,
    {
        match self.tile_mut(p) {
            Some(t) => {
                f(t);
                true
            }
            None => false,
        }
    }
}

/// A rectangular world of [`Tile`]s stored row-major, with its top-left
/// cell at (0, 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileWorld {
    tiles: Vec<Tile>,
    width: i32,
    height: i32,
}

impl TileWorld {
    /// Create a world of the given dimensions filled with [`Tile::AIR`].
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            tiles: vec![Tile::AIR; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Size as a `Point` (width = x, height = y).
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    /// Fill every cell of `rng` (clipped to the world) with `tile`.
    pub fn fill(&mut self, rng: Range, tile: Tile) {
        for p in rng.intersect(self.bounds()) {
            self.set_tile(p, tile);
        }
    }

    /// Fill every cell of `rng` (clipped to the world) using a function of
    /// its position.
    pub fn fill_fn(&mut self, rng: Range, mut f: impl FnMut(Point) -> Tile) {
        for p in rng.intersect(self.bounds()) {
            let tile = f(p);
            self.set_tile(p, tile);
        }
    }

    /// Count the cells of `rng` that satisfy a predicate.
    pub fn count_fn(&self, rng: Range, mut f: impl FnMut(Point, Tile) -> bool) -> usize {
        rng.intersect(self.bounds())
            .iter()
            .filter(|&p| self.tile(p).is_some_and(|t| f(p, t)))
            .count()
    }

    /// Iterate over `(Point, Tile)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Tile)> + '_ {
        self.bounds().iter().zip(self.tiles.iter().copied())
    }
}

impl TileAccess for TileWorld {
    #[inline]
    fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn tile(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|i| self.tiles[i])
    }

    #[inline]
    fn tile_mut(&mut self, p: Point) -> Option<&mut Tile> {
        let i = self.index(p)?;
        self.tiles.get_mut(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Liquid, LiquidKind};

    #[test]
    fn new_and_size() {
        let w = TileWorld::new(10, 5);
        assert_eq!(w.size(), Point::new(10, 5));
        assert_eq!(w.bounds(), Range::new(0, 0, 10, 5));
        assert_eq!(w.tile(Point::new(9, 4)), Some(Tile::AIR));
    }

    #[test]
    fn out_of_bounds_is_checked() {
        let mut w = TileWorld::new(4, 4);
        assert_eq!(w.tile(Point::new(-1, 0)), None);
        assert_eq!(w.tile(Point::new(4, 0)), None);
        assert!(!w.set_tile(Point::new(0, 4), Tile::solid(1)));
        assert!(w.tile_mut(Point::new(7, 7)).is_none());
    }

    #[test]
    fn set_and_update() {
        let mut w = TileWorld::new(4, 4);
        let p = Point::new(2, 3);
        assert!(w.set_tile(p, Tile::solid(42)));
        assert!(w.update(p, |t| t.liquid = Liquid::new(LiquidKind::Lava, 12)));
        let t = w.tile(p).unwrap_or_default();
        assert_eq!(t.content, 42);
        assert_eq!(t.liquid.amount, 12);
    }

    #[test]
    fn fill_is_clipped() {
        let mut w = TileWorld::new(3, 3);
        w.fill(Range::new(1, 1, 10, 10), Tile::solid(2));
        assert_eq!(w.count_fn(w.bounds(), |_, t| t.active), 4);
    }

    #[test]
    fn iter_row_major() {
        let mut w = TileWorld::new(3, 2);
        w.set_tile(Point::new(1, 0), Tile::solid(5));
        let items: Vec<_> = w.iter().collect();
        assert_eq!(items.len(), 6);
        assert_eq!(items[1], (Point::new(1, 0), Tile::solid(5)));
    }
}
