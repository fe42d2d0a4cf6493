//! Content identity: stable built-in ids, portable `owner.name` references,
//! and composite object definitions.
//!
//! Ids below a catalog's stable bound are built-in and numerically valid in
//! every session. Ids at or above it belong to optional content packages
//! and are only meaningful through their [`PortableRef`], which is resolved
//! against whichever packages are loaded at decode time.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::tile::ContentId;

/// Which id namespace a lookup refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Tile,
    Wall,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile => f.write_str("tile"),
            Self::Wall => f.write_str("wall"),
        }
    }
}

// ---------------------------------------------------------------------------
// PortableRef
// ---------------------------------------------------------------------------

/// A session-independent reference to package content: owner namespace plus
/// local name. Serialized as `"<owner>.<name>"`; the owner never contains a
/// dot, the local name may.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortableRef {
    pub owner: String,
    pub name: String,
}

impl PortableRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PortableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// Error returned when a string is not of the form `owner.name`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("portable reference `{0}` is not of the form `owner.name`")]
pub struct ParsePortableRefError(pub String);

impl FromStr for PortableRef {
    type Err = ParsePortableRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(owner, name))
            }
            _ => Err(ParsePortableRefError(s.to_string())),
        }
    }
}

/// A portable reference that cannot be resolved against the loaded content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnresolvedContent {
    #[error("{kind} content package `{owner}` is not loaded")]
    MissingOwner { kind: ContentKind, owner: String },
    #[error("{kind} content package `{owner}` has no content named `{name}`")]
    MissingContent {
        kind: ContentKind,
        owner: String,
        name: String,
    },
}

// ---------------------------------------------------------------------------
// Composite definitions
// ---------------------------------------------------------------------------

/// What an object must be attached to before it can be placed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Anchor {
    /// Free-standing.
    #[default]
    None,
    /// Every cell directly below the footprint must be solid.
    Bottom,
    /// Every cell directly above the footprint must be solid.
    Top,
    /// Every footprint cell must have a wall behind it.
    Wall,
}

/// Shape of a composite ("multitile") object.
///
/// A cell of a composite stores its sprite coordinates as
/// `frame_x = style * width + dx` and `frame_y = alternate * height + dy`,
/// where `(dx, dy)` is its offset from the object's top-left anchor cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompositeDef {
    pub width: u8,
    pub height: u8,
    pub anchor: Anchor,
    /// Whether the object carries an inventory.
    pub container: bool,
}

impl CompositeDef {
    /// A free-standing object of the given size.
    pub const fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            anchor: Anchor::None,
            container: false,
        }
    }

    /// Set the anchor requirement (builder).
    pub const fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Mark the object as a container (builder).
    pub const fn as_container(mut self) -> Self {
        self.container = true;
        self
    }

    /// Offset `(dx, dy)` of a cell inside its object, from its frame.
    pub fn offset_of(&self, frame_x: u16, frame_y: u16) -> (u16, u16) {
        (
            frame_x % u16::from(self.width.max(1)),
            frame_y % u16::from(self.height.max(1)),
        )
    }

    /// `(style, alternate)` of a cell, from its frame. Values that do not fit
    /// in a byte are clamped.
    pub fn style_of(&self, frame_x: u16, frame_y: u16) -> (u8, u8) {
        let style = frame_x / u16::from(self.width.max(1));
        let alternate = frame_y / u16::from(self.height.max(1));
        (
            u8::try_from(style).unwrap_or(u8::MAX),
            u8::try_from(alternate).unwrap_or(u8::MAX),
        )
    }

    /// Frame of the cell at `(dx, dy)` for the given style and alternate.
    pub fn frame_at(&self, style: u8, alternate: u8, dx: u16, dy: u16) -> (u16, u16) {
        (
            u16::from(style) * u16::from(self.width) + dx,
            u16::from(alternate) * u16::from(self.height) + dy,
        )
    }
}

// ---------------------------------------------------------------------------
// ContentCatalog
// ---------------------------------------------------------------------------

/// The set of content loaded in the current session.
///
/// Passed explicitly to capture and decode so that both are pure functions
/// of their inputs.
pub trait ContentCatalog {
    /// Whether `id` is a built-in id, valid across sessions.
    fn is_stable(&self, kind: ContentKind, id: ContentId) -> bool;

    /// The portable name of a non-stable id, if it is registered.
    fn portable_ref(&self, kind: ContentKind, id: ContentId) -> Option<PortableRef>;

    /// Resolve a portable name to this session's runtime id.
    fn resolve(&self, kind: ContentKind, r: &PortableRef) -> Result<ContentId, UnresolvedContent>;

    /// The composite shape of a tile id, if it is a multitile object.
    fn composite(&self, id: ContentId) -> Option<CompositeDef>;
}

#[derive(Debug, Clone, Default)]
struct Namespace {
    stable: ContentId,
    next: ContentId,
    owners: HashSet<String>,
    by_ref: HashMap<PortableRef, ContentId>,
    by_id: HashMap<ContentId, PortableRef>,
}

impl Namespace {
    fn new(stable: ContentId) -> Self {
        Self {
            stable,
            next: stable,
            ..Self::default()
        }
    }

    fn register(&mut self, r: PortableRef) -> ContentId {
        if let Some(&id) = self.by_ref.get(&r) {
            return id;
        }
        let id = self.next;
        self.next = self.next.saturating_add(1);
        self.owners.insert(r.owner.clone());
        self.by_id.insert(id, r.clone());
        self.by_ref.insert(r, id);
        id
    }
}

/// An in-memory content registry.
///
/// Built-in ids are `0..stable` per namespace; package content registered
/// with [`register`](Catalog::register) receives the following ids in
/// registration order, so the same package loaded in a different order (or
/// alongside different packages) gets different runtime ids.
#[derive(Debug, Clone)]
pub struct Catalog {
    tiles: Namespace,
    walls: Namespace,
    composites: HashMap<ContentId, CompositeDef>,
}

impl Catalog {
    /// A catalog with `stable_tiles` built-in tile ids and `stable_walls`
    /// built-in wall ids.
    pub fn new(stable_tiles: ContentId, stable_walls: ContentId) -> Self {
        Self {
            tiles: Namespace::new(stable_tiles),
            walls: Namespace::new(stable_walls),
            composites: HashMap::new(),
        }
    }

    fn namespace(&self, kind: ContentKind) -> &Namespace {
        match kind {
            ContentKind::Tile => &self.tiles,
            ContentKind::Wall => &self.walls,
        }
    }

    /// Register package content and return its runtime id. Registering the
    /// same name twice returns the first id.
    pub fn register(
        &mut self,
        kind: ContentKind,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> ContentId {
        let r = PortableRef::new(owner, name);
        log::debug!("registering {kind} content {r}");
        match kind {
            ContentKind::Tile => self.tiles.register(r),
            ContentKind::Wall => self.walls.register(r),
        }
    }

    /// Declare a tile id as a composite object.
    pub fn define_composite(&mut self, id: ContentId, def: CompositeDef) {
        self.composites.insert(id, def);
    }

    /// Whether a content package is loaded in the given namespace.
    pub fn has_owner(&self, kind: ContentKind, owner: &str) -> bool {
        self.namespace(kind).owners.contains(owner)
    }
}

impl ContentCatalog for Catalog {
    fn is_stable(&self, kind: ContentKind, id: ContentId) -> bool {
        id < self.namespace(kind).stable
    }

    fn portable_ref(&self, kind: ContentKind, id: ContentId) -> Option<PortableRef> {
        self.namespace(kind).by_id.get(&id).cloned()
    }

    fn resolve(&self, kind: ContentKind, r: &PortableRef) -> Result<ContentId, UnresolvedContent> {
        let ns = self.namespace(kind);
        if !ns.owners.contains(&r.owner) {
            return Err(UnresolvedContent::MissingOwner {
                kind,
                owner: r.owner.clone(),
            });
        }
        ns.by_ref
            .get(r)
            .copied()
            .ok_or_else(|| UnresolvedContent::MissingContent {
                kind,
                owner: r.owner.clone(),
                name: r.name.clone(),
            })
    }

    fn composite(&self, id: ContentId) -> Option<CompositeDef> {
        self.composites.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portable_ref_display_and_parse() {
        let r = PortableRef::new("orchard", "apple.tree");
        assert_eq!(r.to_string(), "orchard.apple.tree");
        assert_eq!("orchard.apple.tree".parse::<PortableRef>(), Ok(r));
        assert!("noseparator".parse::<PortableRef>().is_err());
        assert!(".name".parse::<PortableRef>().is_err());
        assert!("owner.".parse::<PortableRef>().is_err());
    }

    #[test]
    fn stable_range_is_per_namespace() {
        let c = Catalog::new(10, 3);
        assert!(c.is_stable(ContentKind::Tile, 9));
        assert!(!c.is_stable(ContentKind::Tile, 10));
        assert!(c.is_stable(ContentKind::Wall, 2));
        assert!(!c.is_stable(ContentKind::Wall, 3));
    }

    #[test]
    fn register_assigns_ids_after_stable_range() {
        let mut c = Catalog::new(10, 3);
        let a = c.register(ContentKind::Tile, "orchard", "bark");
        let b = c.register(ContentKind::Tile, "orchard", "leaf");
        let w = c.register(ContentKind::Wall, "orchard", "bark");
        assert_eq!((a, b, w), (10, 11, 3));
        assert_eq!(c.register(ContentKind::Tile, "orchard", "bark"), a);
        assert_eq!(
            c.portable_ref(ContentKind::Tile, b),
            Some(PortableRef::new("orchard", "leaf"))
        );
        assert!(c.has_owner(ContentKind::Wall, "orchard"));
        assert!(!c.has_owner(ContentKind::Wall, "mine"));
    }

    #[test]
    fn resolve_reports_missing_owner_then_content() {
        let mut c = Catalog::new(10, 3);
        c.register(ContentKind::Tile, "orchard", "bark");

        let missing_owner = c.resolve(ContentKind::Tile, &PortableRef::new("mine", "ore"));
        assert!(matches!(
            missing_owner,
            Err(UnresolvedContent::MissingOwner { ref owner, .. }) if owner == "mine"
        ));

        let missing_name = c.resolve(ContentKind::Tile, &PortableRef::new("orchard", "root"));
        assert!(matches!(
            missing_name,
            Err(UnresolvedContent::MissingContent { ref name, .. }) if name == "root"
        ));

        // Registered as a tile, not as a wall.
        assert!(
            c.resolve(ContentKind::Wall, &PortableRef::new("orchard", "bark"))
                .is_err()
        );
    }

    #[test]
    fn composite_frames() {
        let def = CompositeDef::new(3, 2);
        assert_eq!(def.frame_at(2, 1, 1, 1), (7, 3));
        assert_eq!(def.offset_of(7, 3), (1, 1));
        assert_eq!(def.style_of(7, 3), (2, 1));
        assert_eq!(def.offset_of(6, 2), (0, 0));
    }
}
