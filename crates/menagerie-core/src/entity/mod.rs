//! Entity types for grid occupants.
//!
//! - [`EntityId`]: unique identifier, the only thing the grid stores
//! - [`EntityTag`]: kind classification (animal, block, prize, trail)
//! - [`EntityInner`]: type-safe storage for kind-specific components
//! - [`Entity`]: the complete occupant, including its positional state
//!
//! Entities never hold a reference to the grid. Placement is recorded as an
//! optional [`Location`] on the entity and an ID in the
//! [`Grid`](crate::grid::Grid); the [`Arena`](crate::arena::Arena) keeps both
//! sides in agreement.
//!
//! # Example
//!
//! ```
//! use menagerie_core::entity::{Entity, EntityId, EntityInner, EntityTag};
//! use menagerie_core::entity::components::BlockComponents;
//!
//! let block = Entity::new(
//!     EntityId::new(42),
//!     EntityInner::Block(BlockComponents::permanent()),
//! );
//!
//! assert_eq!(block.id().as_u64(), 42);
//! assert_eq!(block.tag(), EntityTag::Block);
//! assert!(!block.is_placed());
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    AnimalComponents, BlockComponents, Color, PrizeComponents, PrizeKind, Record,
    TrailComponents,
};

use crate::grid::{Direction, Location};

/// Unique identifier for an entity.
///
/// Newtype over `u64`. IDs are assigned monotonically by the arena and are
/// never reused, so ordering by ID is ordering by creation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Kind of grid occupant.
///
/// Movement legality is decided by tag: animals and blocks are solid, prizes
/// and trails can be entered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// A competitor driven by a brain.
    Animal,
    /// A static obstacle, possibly temporary.
    Block,
    /// A collectible worth points.
    Prize,
    /// Marker left in a cell an animal vacated.
    Trail,
}

impl EntityTag {
    /// Returns true if an animal may not enter a cell holding this kind.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Animal | Self::Block)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Animal => write!(f, "Animal"),
            Self::Block => write!(f, "Block"),
            Self::Prize => write!(f, "Prize"),
            Self::Trail => write!(f, "Trail"),
        }
    }
}

/// Type-safe storage for kind-specific components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Animal components (name, score, record).
    Animal(AnimalComponents),
    /// Block components (remaining duration).
    Block(BlockComponents),
    /// Prize components (value, kind).
    Prize(PrizeComponents),
    /// Trail components.
    Trail(TrailComponents),
}

impl EntityInner {
    /// Returns the tag that matches this variant.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Animal(_) => EntityTag::Animal,
            Self::Block(_) => EntityTag::Block,
            Self::Prize(_) => EntityTag::Prize,
            Self::Trail(_) => EntityTag::Trail,
        }
    }
}

/// A grid occupant.
///
/// # Invariants
///
/// - `location` is `Some(loc)` exactly when the arena's grid maps `loc` to
///   this entity's ID.
/// - The tag is derived from `inner`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
    location: Option<Location>,
    heading: Direction,
    color: Color,
}

impl Entity {
    /// Creates an unplaced entity facing North, coloured blue.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self {
            id,
            inner,
            location: None,
            heading: Direction::North,
            color: Color::BLUE,
        }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's kind.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns the kind-specific components.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns the kind-specific components mutably.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Where the entity sits, or `None` if it is not on the grid.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// Returns true if the entity is on the grid.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.location.is_some()
    }

    /// Only the arena may move entities.
    pub(crate) fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    /// The entity's facing.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    /// Turns the entity.
    pub fn set_heading(&mut self, heading: Direction) {
        self.heading = heading;
    }

    /// The entity's display colour.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Recolours the entity.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Returns `true` if this entity is an animal.
    #[must_use]
    pub const fn is_animal(&self) -> bool {
        matches!(self.inner, EntityInner::Animal(_))
    }

    /// Returns `true` if this entity is a block.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(self.inner, EntityInner::Block(_))
    }

    /// Returns `true` if this entity is a prize.
    #[must_use]
    pub const fn is_prize(&self) -> bool {
        matches!(self.inner, EntityInner::Prize(_))
    }

    /// Returns `true` if this entity is a trail marker.
    #[must_use]
    pub const fn is_trail(&self) -> bool {
        matches!(self.inner, EntityInner::Trail(_))
    }

    /// Returns the animal components if this is an animal.
    #[must_use]
    pub const fn as_animal(&self) -> Option<&AnimalComponents> {
        match &self.inner {
            EntityInner::Animal(components) => Some(components),
            _ => None,
        }
    }

    /// Returns mutable animal components if this is an animal.
    #[must_use]
    pub fn as_animal_mut(&mut self) -> Option<&mut AnimalComponents> {
        match &mut self.inner {
            EntityInner::Animal(components) => Some(components),
            _ => None,
        }
    }

    /// Returns the block components if this is a block.
    #[must_use]
    pub const fn as_block(&self) -> Option<&BlockComponents> {
        match &self.inner {
            EntityInner::Block(components) => Some(components),
            _ => None,
        }
    }

    /// Returns mutable block components if this is a block.
    #[must_use]
    pub fn as_block_mut(&mut self) -> Option<&mut BlockComponents> {
        match &mut self.inner {
            EntityInner::Block(components) => Some(components),
            _ => None,
        }
    }

    /// Returns the prize components if this is a prize.
    #[must_use]
    pub const fn as_prize(&self) -> Option<&PrizeComponents> {
        match &self.inner {
            EntityInner::Prize(components) => Some(components),
            _ => None,
        }
    }
}
