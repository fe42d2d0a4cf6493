//! Cell coordinates and rectangular regions.
//!
//! X grows right, Y grows down. A region captured at `origin` with size
//! `(w, h)` is `Range::with_size(origin, w, h)`; every scan over a region is
//! row-major.

use std::fmt;
use std::ops::{Add, Sub};

/// Offsets of the four cardinal neighbours, clockwise from up.
const CARDINAL: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// A grid cell coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point moved by `(dx, dy)`, saturating at the `i32` limits.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Up, right, down and left neighbours, in that order.
    pub fn neighbors_4(self) -> [Point; 4] {
        CARDINAL.map(|(dx, dy)| self.shift(dx, dy))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.shift(rhs.x, rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Half-open rectangle: `min` is the top-left cell, `max` is one past the
/// bottom-right cell on both axes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Range spanned by two corners, given in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (xa, xb) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (ya, yb) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            min: Point::new(xa, ya),
            max: Point::new(xb, yb),
        }
    }

    /// `width × height` cells with `origin` as the top-left cell. Negative
    /// sizes count as zero; a range reaching past `i32::MAX` is cut short.
    pub fn with_size(origin: Point, width: i32, height: i32) -> Self {
        Self {
            min: origin,
            max: origin.shift(width.max(0), height.max(0)),
        }
    }

    pub fn width(self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    pub fn height(self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    /// Number of cells.
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Whether every cell of `other` is in `self`. An empty range is inside
    /// any range.
    pub fn contains_range(self, other: Range) -> bool {
        other.is_empty() || self.intersect(other) == other
    }

    /// Cells shared by both ranges; `Range::default()` when there are none.
    pub fn intersect(self, other: Range) -> Self {
        let min = Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));
        let r = Self { min, max };
        if r.is_empty() { Self::default() } else { r }
    }

    /// Row `y` (absolute) of this range; empty when `y` lies outside.
    pub fn row(self, y: i32) -> Self {
        if !(self.min.y..self.max.y).contains(&y) {
            return Self::default();
        }
        Self::new(self.min.x, y, self.max.x, y + 1)
    }

    /// Cells in row-major order.
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            len: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at {}", self.width(), self.height(), self.min)
    }
}

/// Row-major cell iterator of a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    len: usize,
}

impl Iterator for RangeIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.len {
            return None;
        }
        let w = self.range.width() as usize;
        let (dx, dy) = (self.next % w, self.next / w);
        self.next += 1;
        Some(self.range.min.shift(dx as i32, dy as i32))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1, 2);
        let b = Point::new(3, 4);
        assert_eq!(a + b, Point::new(4, 6));
        assert_eq!(b - a, Point::new(2, 2));
        assert_eq!(a.shift(-1, 5), Point::new(0, 7));
    }

    #[test]
    fn neighbours_clockwise_from_up() {
        assert_eq!(
            Point::new(5, 5).neighbors_4(),
            [
                Point::new(5, 4),
                Point::new(6, 5),
                Point::new(5, 6),
                Point::new(4, 5)
            ]
        );
    }

    #[test]
    fn range_with_size() {
        let r = Range::with_size(Point::new(10, 10), 3, 2);
        assert_eq!(r, Range::new(13, 12, 10, 10));
        assert_eq!(r.len(), 6);
        assert_eq!(r.to_string(), "3x2 at (10, 10)");
        assert!(Range::with_size(Point::ZERO, -4, 2).is_empty());
    }

    #[test]
    fn range_contains_and_intersect() {
        let a = Range::new(0, 0, 4, 4);
        let b = Range::new(2, 2, 6, 6);
        assert!(a.contains(Point::new(3, 3)));
        assert!(!a.contains(Point::new(4, 0)));
        assert_eq!(a.intersect(b), Range::new(2, 2, 4, 4));
        assert!(a.intersect(Range::new(10, 10, 12, 12)).is_empty());
        assert!(a.contains_range(Range::new(1, 1, 3, 3)));
        assert!(!a.contains_range(b));
    }

    #[test]
    fn range_row() {
        let r = Range::new(1, 1, 4, 3);
        assert_eq!(r.row(2), Range::new(1, 2, 4, 3));
        assert!(r.row(3).is_empty());
    }

    #[test]
    fn iter_is_row_major_and_exact() {
        let mut it = Range::new(7, 3, 9, 5).iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(Point::new(7, 3)));
        assert_eq!(it.next(), Some(Point::new(8, 3)));
        assert_eq!(it.next(), Some(Point::new(7, 4)));
        assert_eq!(it.len(), 1);
        assert_eq!(Range::default().iter().len(), 0);
    }

    #[test]
    fn arithmetic_saturates() {
        let edge = Point::new(i32::MAX - 1, i32::MIN + 1);
        assert_eq!(edge.shift(5, -5), Point::new(i32::MAX, i32::MIN));
        assert_eq!(Point::new(i32::MIN, 0) - Point::new(1, 0), Point::new(i32::MIN, 0));

        let r = Range::with_size(edge, 4, 2);
        assert_eq!(r.max, Point::new(i32::MAX, i32::MIN + 3));
        assert_eq!(r.width(), 1);
        assert_eq!(r.iter().count(), 2);
        assert_eq!(Range::new(i32::MIN, 0, i32::MAX, 1).width(), i32::MAX);
    }
}
