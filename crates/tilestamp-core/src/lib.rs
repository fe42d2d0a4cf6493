//! **tilestamp-core**: world model for tile-grid region capture and replay.
//!
//! This crate provides the host-side types the `tilestamp` codec works
//! against: geometry primitives, the [`Tile`] cell and its bounds-checked
//! [`TileAccess`] grid, the [`ContentCatalog`] that maps content between
//! sessions, and the framing and container services consumed during
//! placement.

pub mod catalog;
pub mod containers;
pub mod framing;
pub mod geom;
pub mod tile;
pub mod world;

pub use catalog::{
    Anchor, Catalog, CompositeDef, ContentCatalog, ContentKind, PortableRef, UnresolvedContent,
};
pub use containers::{ContainerStore, Containers, ItemStack, NoContainers};
pub use framing::{ConnectivityFramer, Framer};
pub use geom::{Point, Range};
pub use tile::{ContentId, Liquid, LiquidKind, NO_WALL, Tile};
pub use world::{TileAccess, TileWorld};
