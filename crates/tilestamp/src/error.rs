use std::io;

use tilestamp_core::{ContentKind, UnresolvedContent};

/// Errors produced while decoding a stamp blob.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input ended early or could not be read.
    #[error("stamp read failed: {0}")]
    Io(#[from] io::Error),
    #[error("unsupported stamp format version {0}")]
    UnsupportedVersion(u8),
    /// A portable entry names content that is not loaded.
    #[error(transparent)]
    Unresolved(#[from] UnresolvedContent),
    #[error("invalid portable content name `{0}`")]
    InvalidName(String),
    #[error("unknown {stream} record tag {tag:#04x}")]
    UnknownTag { stream: ContentKind, tag: u8 },
    #[error("{kind} table has no entry for slot {slot}")]
    MissingSlot { kind: ContentKind, slot: u16 },
    #[error("{kind} table assigns slot {slot} twice")]
    DuplicateSlot { kind: ContentKind, slot: u16 },
    #[error("{kind} table has more than 65535 entries")]
    TableTooLarge { kind: ContentKind },
}

/// Errors produced by a placement with footprint verification enabled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
    #[error("{stream} stream covers {actual} cells, footprint has {expected}")]
    FootprintMismatch {
        stream: ContentKind,
        expected: usize,
        actual: usize,
    },
}

/// Errors produced when saving or loading stamp files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("stamp file i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
