//! Entry maps: per-blob content tables.
//!
//! Every distinct content id seen in a region gets a slot, in first-seen
//! row-major order. Stable and portable entries share one slot counter, so
//! a slot number alone does not say which kind of entry it is.

use std::collections::{BTreeMap, HashMap};

use tilestamp_core::{ContentCatalog, ContentId, ContentKind, PortableRef, Range, TileAccess};

use crate::action::Slot;
use crate::error::DecodeError;

/// Most entries a table can hold: both section counts are written as `u16`.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// A slot's content: the runtime id, plus the portable name it was resolved
/// from (or will be written as) when the content is not stable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: ContentId,
    pub portable: Option<PortableRef>,
}

/// Slot-indexed content table of one namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryTable {
    entries: Vec<Entry>,
}

impl EntryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, slot: Slot) -> Option<&Entry> {
        self.entries.get(usize::from(slot))
    }

    /// Runtime id of `slot`.
    pub fn id(&self, slot: Slot) -> Option<ContentId> {
        self.get(slot).map(|e| e.id)
    }

    /// Stable entries in slot order.
    pub fn stable(&self) -> impl Iterator<Item = (Slot, ContentId)> + '_ {
        self.slots()
            .filter(|(_, e)| e.portable.is_none())
            .map(|(slot, e)| (slot, e.id))
    }

    /// Portable entries in slot order.
    pub fn portable(&self) -> impl Iterator<Item = (Slot, &PortableRef)> + '_ {
        self.slots()
            .filter_map(|(slot, e)| e.portable.as_ref().map(|r| (slot, r)))
    }

    fn slots(&self) -> impl Iterator<Item = (Slot, &Entry)> + '_ {
        // At most 2^16 distinct ids exist per namespace, so every index fits.
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i as Slot, e))
    }

    fn push(&mut self, entry: Entry) -> Slot {
        let slot = self.entries.len() as Slot;
        self.entries.push(entry);
        slot
    }

    /// Assemble a table from decoded `(slot, entry)` pairs. Slots must be
    /// exactly `0..n` with `n <= MAX_ENTRIES`.
    pub(crate) fn from_slots(
        kind: ContentKind,
        pairs: impl IntoIterator<Item = (Slot, Entry)>,
    ) -> Result<Self, DecodeError> {
        let mut by_slot = BTreeMap::new();
        for (slot, entry) in pairs {
            if by_slot.insert(slot, entry).is_some() {
                return Err(DecodeError::DuplicateSlot { kind, slot });
            }
        }
        let mut table = Self::new();
        for (expected, (slot, entry)) in by_slot.into_iter().enumerate() {
            if usize::from(slot) != expected {
                return Err(DecodeError::MissingSlot {
                    kind,
                    slot: expected as Slot,
                });
            }
            if table.len() == MAX_ENTRIES {
                return Err(DecodeError::TableTooLarge { kind });
            }
            table.push(entry);
        }
        Ok(table)
    }
}

/// Entry-map builder: an [`EntryTable`] plus the reverse id → slot lookup
/// used while encoding the cell streams.
#[derive(Clone, Debug, Default)]
pub struct EntryMap {
    table: EntryTable,
    slots: HashMap<ContentId, Slot>,
}

impl EntryMap {
    /// Scan `region` row-major and assign a slot to every distinct id of
    /// `kind`. Cells without an active tile (tile pass) or without a wall
    /// (wall pass) are skipped, as are cells outside the world.
    ///
    /// Once the table holds [`MAX_ENTRIES`] ids, further ids get no slot and
    /// their cells are recorded as air (tiles) or no wall (walls).
    pub fn build<W, C>(world: &W, region: Range, kind: ContentKind, catalog: &C) -> Self
    where
        W: TileAccess,
        C: ContentCatalog,
    {
        let mut map = Self::default();
        let mut dropped = 0usize;
        for p in region {
            let Some(tile) = world.tile(p) else {
                continue;
            };
            let id = match kind {
                ContentKind::Tile if tile.active => tile.content,
                ContentKind::Wall if tile.has_wall() => tile.wall,
                _ => continue,
            };
            if map.slots.contains_key(&id) {
                continue;
            }
            if map.table.len() >= MAX_ENTRIES {
                if dropped == 0 {
                    log::warn!(
                        "{kind} table for {region} is full; {kind} id {id} at {p} is dropped"
                    );
                }
                dropped += 1;
                continue;
            }
            let portable = if catalog.is_stable(kind, id) {
                None
            } else {
                let name = catalog.portable_ref(kind, id);
                if name.is_none() {
                    log::warn!("{kind} id {id} at {p} is not registered; recording it as stable");
                }
                name
            };
            let slot = map.table.push(Entry { id, portable });
            map.slots.insert(id, slot);
        }
        if dropped > 0 {
            log::warn!("{kind} table for {region}: {dropped} cells without a slot");
        }
        log::debug!(
            "{kind} entry map for {region}: {} stable, {} portable",
            map.table.stable().count(),
            map.table.portable().count()
        );
        map
    }

    /// Slot assigned to `id`, if it occurs in the scanned region.
    pub fn slot(&self, id: ContentId) -> Option<Slot> {
        self.slots.get(&id).copied()
    }

    pub fn table(&self) -> &EntryTable {
        &self.table
    }

    pub fn into_table(self) -> EntryTable {
        self.table
    }
}
