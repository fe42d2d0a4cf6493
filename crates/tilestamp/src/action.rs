//! Placement actions: the decoded form of the two cell streams.
//!
//! Each action covers one or more consecutive cells of a single row. Run
//! variants carry their repetition count and never cross a row boundary.

use tilestamp_core::Liquid;

/// Index into an [`EntryTable`](crate::entry::EntryTable).
pub type Slot = u16;

/// One record of the tile stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileAction {
    Air,
    AirRun(u16),
    Content(Slot),
    ContentRun(Slot, u16),
    /// Anchor cell of a composite object. `None` style and alternate mean 0.
    Composite {
        slot: Slot,
        style: Option<u8>,
        alternate: Option<u8>,
    },
    Liquid(Liquid),
    LiquidRun(Liquid, u16),
}

impl TileAction {
    /// Number of cells the action covers.
    pub fn width(&self) -> usize {
        match *self {
            Self::AirRun(n) | Self::ContentRun(_, n) | Self::LiquidRun(_, n) => usize::from(n),
            Self::Air | Self::Content(_) | Self::Composite { .. } | Self::Liquid(_) => 1,
        }
    }
}

/// One record of the wall stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WallAction {
    Wall(Slot),
    WallRun(Slot, u16),
    Empty,
    EmptyRun(u16),
}

impl WallAction {
    /// Number of cells the action covers.
    pub fn width(&self) -> usize {
        match *self {
            Self::WallRun(_, n) | Self::EmptyRun(n) => usize::from(n),
            Self::Wall(_) | Self::Empty => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilestamp_core::LiquidKind;

    #[test]
    fn widths() {
        let lava = Liquid::new(LiquidKind::Lava, 200);
        assert_eq!(TileAction::Air.width(), 1);
        assert_eq!(TileAction::AirRun(7).width(), 7);
        assert_eq!(TileAction::ContentRun(3, 65_535).width(), 65_535);
        assert_eq!(TileAction::LiquidRun(lava, 2).width(), 2);
        assert_eq!(
            TileAction::Composite {
                slot: 0,
                style: Some(3),
                alternate: None
            }
            .width(),
            1
        );
        assert_eq!(WallAction::EmptyRun(4).width(), 4);
        assert_eq!(WallAction::Wall(9).width(), 1);
    }
}
