//! Placer: replays a [`Structure`] onto a destination grid.
//!
//! Placement runs in four passes over the footprint:
//!
//! 1. **Prepare**: evacuate containers and drain liquid.
//! 2. **Replay**: walk the tile stream, then the wall stream, writing cells
//!    directly. Composite anchors are queued instead of placed.
//! 3. **Deferred**: place queued composites in stream order. Their anchor
//!    checks look at neighbours, so every simple cell and wall must already
//!    be in place.
//! 4. **Finalize**: recompute tile and wall connectivity of every cell.
//!
//! Placement is not transactional. A stream that under- or over-runs the
//! footprint leaves the destination partially written; the cursor wraps
//! inside the footprint so no cell outside it is touched by passes 1, 2
//! and 4. Enable [`PlaceConfig::verify_footprint`] to reject such a
//! structure before anything is written.

use tilestamp_core::{
    Anchor, CompositeDef, ConnectivityFramer, ContentCatalog, ContentId, Containers, Framer,
    ItemStack, Liquid, NO_WALL, NoContainers, Point, Range, TileAccess,
};

use crate::action::{TileAction, WallAction};
use crate::error::PlaceError;
use crate::structure::Structure;

/// Placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceConfig {
    /// Empty containers overlapping the footprint before writing.
    pub evacuate_containers: bool,
    /// Drain pre-existing liquid from the footprint before writing.
    pub clear_liquids: bool,
    /// Recompute connectivity masks after writing.
    pub reframe: bool,
    /// Refuse structures whose streams do not cover the footprint exactly.
    pub verify_footprint: bool,
}

impl Default for PlaceConfig {
    fn default() -> Self {
        Self {
            evacuate_containers: true,
            clear_liquids: true,
            reframe: true,
            verify_footprint: false,
        }
    }
}

/// Summary of one placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceReport {
    /// Cells written by the replay pass (tile and wall streams).
    pub cells_written: usize,
    pub composites_placed: usize,
    /// Composites skipped because their footprint was blocked, out of
    /// bounds or unanchored.
    pub composites_rejected: usize,
    /// Items removed from evacuated containers.
    pub evacuated: Vec<ItemStack>,
}

/// A composite queued during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeferredComposite {
    pos: Point,
    id: ContentId,
    style: u8,
    alternate: u8,
}

/// Replay cursor over a footprint: advances one cell at a time, wrapping to
/// the next row at the right edge and back to the top row at the bottom.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    footprint: Range,
    at: Point,
    wrapped: bool,
}

impl Cursor {
    fn new(footprint: Range) -> Self {
        Self {
            footprint,
            at: footprint.min,
            wrapped: false,
        }
    }

    /// Return the current cell and move past it.
    fn next_cell(&mut self) -> Point {
        let p = self.at;
        self.at.x += 1;
        if self.at.x >= self.footprint.max.x {
            self.at.x = self.footprint.min.x;
            self.at.y += 1;
            if self.at.y >= self.footprint.max.y {
                self.at.y = self.footprint.min.y;
                self.wrapped = true;
            }
        }
        p
    }
}

/// Replays structures onto a grid.
///
/// The catalog resolves composite shapes; the framer and container service
/// default to [`ConnectivityFramer`] and [`NoContainers`].
#[derive(Debug)]
pub struct Placer<'a, C, F = ConnectivityFramer, K = NoContainers> {
    catalog: &'a C,
    framer: F,
    containers: K,
    config: PlaceConfig,
}

impl<'a, C: ContentCatalog> Placer<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            framer: ConnectivityFramer,
            containers: NoContainers,
            config: PlaceConfig::default(),
        }
    }
}

impl<'a, C, F, K> Placer<'a, C, F, K>
where
    C: ContentCatalog,
    F: Framer,
    K: Containers,
{
    /// Use a different framing service.
    pub fn with_framer<F2: Framer>(self, framer: F2) -> Placer<'a, C, F2, K> {
        Placer {
            catalog: self.catalog,
            framer,
            containers: self.containers,
            config: self.config,
        }
    }

    /// Use a different container service.
    pub fn with_containers<K2: Containers>(self, containers: K2) -> Placer<'a, C, F, K2> {
        Placer {
            catalog: self.catalog,
            framer: self.framer,
            containers,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: PlaceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn containers(&self) -> &K {
        &self.containers
    }

    /// Replay `structure` onto `world` with its top-left cell at `origin`.
    ///
    /// Only fails when footprint verification is enabled and the structure
    /// does not cover its footprint; in that case `world` is untouched.
    pub fn place<W: TileAccess>(
        &mut self,
        world: &mut W,
        structure: &Structure,
        origin: Point,
    ) -> Result<PlaceReport, PlaceError> {
        if self.config.verify_footprint {
            structure.check_footprint()?;
        }
        let footprint = structure.footprint(origin);
        let mut report = PlaceReport::default();
        if footprint.is_empty() {
            return Ok(report);
        }

        self.prepare(world, footprint, &mut report);
        let deferred = self.replay_tiles(world, structure, footprint, &mut report);
        self.replay_walls(world, structure, footprint, &mut report);
        log::debug!(
            "placing {} deferred composites at {footprint}",
            deferred.len()
        );
        for d in deferred {
            if self.place_composite(world, d) {
                report.composites_placed += 1;
            } else {
                report.composites_rejected += 1;
            }
        }
        if self.config.reframe {
            for p in footprint {
                self.framer.frame_tile(world, p);
                self.framer.frame_wall(world, p);
            }
        }
        Ok(report)
    }

    fn prepare<W: TileAccess>(
        &mut self,
        world: &mut W,
        footprint: Range,
        report: &mut PlaceReport,
    ) {
        for p in footprint.intersect(world.bounds()) {
            if self.config.evacuate_containers {
                report.evacuated.extend(self.containers.evacuate(p));
            }
            if self.config.clear_liquids {
                world.update(p, |t| t.liquid = Liquid::NONE);
            }
        }
    }

    fn replay_tiles<W: TileAccess>(
        &mut self,
        world: &mut W,
        structure: &Structure,
        footprint: Range,
        report: &mut PlaceReport,
    ) -> Vec<DeferredComposite> {
        let table = structure.tile_table();
        let mut cursor = Cursor::new(footprint);
        let mut deferred = Vec::new();

        for action in structure.tile_actions() {
            match *action {
                TileAction::Air | TileAction::AirRun(_) => {
                    for _ in 0..action.width() {
                        report.cells_written += usize::from(world.update(cursor.next_cell(), |t| {
                            t.clear_content();
                            t.liquid = Liquid::NONE;
                        }));
                    }
                }
                TileAction::Content(slot) | TileAction::ContentRun(slot, _) => {
                    let id = table.id(slot);
                    if id.is_none() {
                        log::warn!("tile slot {slot} is not in the table; cells left as they are");
                    }
                    for _ in 0..action.width() {
                        let p = cursor.next_cell();
                        if let Some(id) = id {
                            report.cells_written += usize::from(world.update(p, |t| {
                                t.clear_content();
                                t.content = id;
                                t.active = true;
                            }));
                        }
                    }
                }
                TileAction::Composite {
                    slot,
                    style,
                    alternate,
                } => {
                    let p = cursor.next_cell();
                    report.cells_written += usize::from(world.update(p, |t| {
                        t.clear_content();
                        t.liquid = Liquid::NONE;
                    }));
                    match table.id(slot) {
                        Some(id) => deferred.push(DeferredComposite {
                            pos: p,
                            id,
                            style: style.unwrap_or(0),
                            alternate: alternate.unwrap_or(0),
                        }),
                        None => log::warn!("composite slot {slot} at {p} is not in the table"),
                    }
                }
                TileAction::Liquid(liquid) | TileAction::LiquidRun(liquid, _) => {
                    for _ in 0..action.width() {
                        report.cells_written += usize::from(world.update(cursor.next_cell(), |t| {
                            t.clear_content();
                            t.liquid = liquid;
                        }));
                    }
                }
            }
        }
        if cursor.wrapped {
            log::warn!("tile stream over-runs footprint {footprint}");
        }
        deferred
    }

    fn replay_walls<W: TileAccess>(
        &mut self,
        world: &mut W,
        structure: &Structure,
        footprint: Range,
        report: &mut PlaceReport,
    ) {
        let table = structure.wall_table();
        let mut cursor = Cursor::new(footprint);

        for action in structure.wall_actions() {
            let wall = match *action {
                WallAction::Wall(slot) | WallAction::WallRun(slot, _) => {
                    let id = table.id(slot);
                    if id.is_none() {
                        log::warn!("wall slot {slot} is not in the table; cells left as they are");
                    }
                    id
                }
                WallAction::Empty | WallAction::EmptyRun(_) => Some(NO_WALL),
            };
            for _ in 0..action.width() {
                let p = cursor.next_cell();
                if let Some(wall) = wall {
                    report.cells_written += usize::from(world.update(p, |t| t.wall = wall));
                }
            }
        }
        if cursor.wrapped {
            log::warn!("wall stream over-runs footprint {footprint}");
        }
    }

    fn place_composite<W: TileAccess>(&mut self, world: &mut W, d: DeferredComposite) -> bool {
        let Some(def) = self.catalog.composite(d.id) else {
            log::warn!("tile {} at {} is no longer a composite; placing one cell", d.id, d.pos);
            return world.update(d.pos, |t| {
                t.content = d.id;
                t.active = true;
            });
        };
        let (w, h) = (i32::from(def.width), i32::from(def.height));
        let footprint = Range::with_size(d.pos, w, h);
        // A footprint cut short at the coordinate limit does not fit either.
        let cut = footprint.width() != w || footprint.height() != h;
        if cut || !world.bounds().contains_range(footprint) {
            log::warn!("composite {} at {} does not fit in the world", d.id, d.pos);
            return false;
        }
        if footprint
            .iter()
            .any(|p| world.tile(p).is_some_and(|t| t.active))
        {
            log::warn!("composite {} at {} is blocked", d.id, d.pos);
            return false;
        }
        if !self.anchored(world, footprint, def) {
            log::warn!("composite {} at {} has no {:?} anchor", d.id, d.pos, def.anchor);
            return false;
        }

        for p in footprint {
            let dx = (p.x - footprint.min.x) as u16;
            let dy = (p.y - footprint.min.y) as u16;
            let (frame_x, frame_y) = def.frame_at(d.style, d.alternate, dx, dy);
            world.update(p, |t| {
                t.content = d.id;
                t.active = true;
                t.frame_x = frame_x;
                t.frame_y = frame_y;
            });
        }
        if def.container {
            self.containers.attach(footprint);
        }
        true
    }

    fn anchored<W: TileAccess>(&self, world: &W, footprint: Range, def: CompositeDef) -> bool {
        let solid = |p: Point| {
            world
                .tile(p)
                .is_some_and(|t| t.active && self.catalog.composite(t.content).is_none())
        };
        match def.anchor {
            Anchor::None => true,
            Anchor::Bottom => (footprint.min.x..footprint.max.x)
                .all(|x| solid(Point::new(x, footprint.max.y))),
            Anchor::Top => footprint.min.y.checked_sub(1).is_some_and(|above| {
                (footprint.min.x..footprint.max.x).all(|x| solid(Point::new(x, above)))
            }),
            Anchor::Wall => footprint
                .iter()
                .all(|p| world.tile(p).is_some_and(|t| t.has_wall())),
        }
    }
}
