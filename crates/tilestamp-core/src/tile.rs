//! The [`Tile`] cell: content, liquid and wall.

/// Runtime content id. Tile and wall ids live in separate namespaces.
pub type ContentId = u16;

/// Wall id meaning "no wall".
pub const NO_WALL: ContentId = 0;

/// The three liquid kinds a cell can hold.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiquidKind {
    #[default]
    Water,
    Lava,
    Honey,
}

/// Liquid held by a cell. An amount of zero means the cell is dry,
/// whatever the kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Liquid {
    pub kind: LiquidKind,
    pub amount: u8,
}

impl Liquid {
    /// No liquid.
    pub const NONE: Self = Self {
        kind: LiquidKind::Water,
        amount: 0,
    };

    #[inline]
    pub const fn new(kind: LiquidKind, amount: u8) -> Self {
        Self { kind, amount }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.amount == 0
    }
}

/// A single world cell.
///
/// `content` is only meaningful while `active` is set. `frame_x`/`frame_y`
/// are sprite-sheet coordinates used by composite objects (see
/// [`CompositeDef`](crate::catalog::CompositeDef)); `tile_mask` and
/// `wall_mask` are connectivity masks maintained by a
/// [`Framer`](crate::framing::Framer).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub content: ContentId,
    pub active: bool,
    pub frame_x: u16,
    pub frame_y: u16,
    pub tile_mask: u8,
    pub liquid: Liquid,
    pub wall: ContentId,
    pub wall_mask: u8,
}

impl Tile {
    /// An empty cell: no content, no liquid, no wall.
    pub const AIR: Self = Self {
        content: 0,
        active: false,
        frame_x: 0,
        frame_y: 0,
        tile_mask: 0,
        liquid: Liquid::NONE,
        wall: NO_WALL,
        wall_mask: 0,
    };

    /// An active cell holding `content`.
    #[inline]
    pub const fn solid(content: ContentId) -> Self {
        Self {
            content,
            active: true,
            ..Self::AIR
        }
    }

    /// Set the wall (builder).
    #[inline]
    pub const fn with_wall(mut self, wall: ContentId) -> Self {
        self.wall = wall;
        self
    }

    /// Set the liquid (builder).
    #[inline]
    pub const fn with_liquid(mut self, liquid: Liquid) -> Self {
        self.liquid = liquid;
        self
    }

    /// Set composite sprite coordinates (builder).
    #[inline]
    pub const fn with_frame(mut self, frame_x: u16, frame_y: u16) -> Self {
        self.frame_x = frame_x;
        self.frame_y = frame_y;
        self
    }

    #[inline]
    pub const fn has_wall(self) -> bool {
        self.wall != NO_WALL
    }

    /// Remove the tile content, keeping liquid and wall.
    #[inline]
    pub fn clear_content(&mut self) {
        self.content = 0;
        self.active = false;
        self.frame_x = 0;
        self.frame_y = 0;
    }
}
