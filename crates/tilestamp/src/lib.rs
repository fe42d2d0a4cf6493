//! **tilestamp**: capture rectangular regions of a tile grid into compact,
//! portable blobs and replay them elsewhere.
//!
//! A region is captured into a [`Structure`]: two content tables (tiles and
//! walls) and two run-length action streams. Content that ships with the
//! host is recorded by id; content added by packages is recorded by its
//! portable `owner.name`, so a blob decodes correctly in a session that
//! loaded packages in a different order.
//!
//! ```ignore
//! let stamp = Structure::capture(&world, region, &catalog);
//! let bytes = encode(&stamp);
//! let stamp = decode(&bytes, &catalog)?;
//! Placer::new(&catalog).place(&mut world, &stamp, origin)?;
//! ```

pub mod action;
pub mod decode;
pub mod encode;
pub mod entry;
pub mod error;
pub mod format;
pub mod place;
pub mod store;
pub mod structure;

pub use action::{Slot, TileAction, WallAction};
pub use decode::{decode, decode_from};
pub use encode::{encode, encode_region};
pub use entry::{Entry, EntryMap, EntryTable};
pub use error::{DecodeError, PlaceError, StoreError};
pub use format::{DEFAULT_EXTENSION, FORMAT_VERSION};
pub use place::{PlaceConfig, PlaceReport, Placer};
pub use store::{load, save, with_default_extension};
pub use structure::Structure;
