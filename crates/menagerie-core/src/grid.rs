//! Grid geometry and the sparse single-occupant location store.
//!
//! - [`Location`]: integer `(row, col)` cell coordinate
//! - [`Direction`]: one of the four cardinal headings at 90° spacing
//! - [`Grid`]: fixed-size mapping from [`Location`] to at most one [`EntityId`]
//!
//! The grid only stores IDs. Entity state lives in the
//! [`Arena`](crate::arena::Arena), which keeps the two sides consistent.
//!
//! # Example
//!
//! ```
//! use menagerie_core::grid::{Direction, Grid, Location};
//! use menagerie_core::entity::EntityId;
//!
//! let mut grid = Grid::new(21, 21);
//! let here = Location::new(10, 10);
//!
//! assert!(grid.is_valid(here));
//! assert_eq!(here.adjacent(Direction::North), Location::new(9, 10));
//!
//! grid.put(here, EntityId::new(3));
//! assert_eq!(grid.get(here), Some(EntityId::new(3)));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Degrees in a full turn.
pub const FULL_CIRCLE: i32 = 360;

/// Degrees in a quarter turn; headings are multiples of this.
pub const RIGHT_ANGLE: i32 = 90;

// =============================================================================
// Direction
// =============================================================================

/// A cardinal heading.
///
/// Headings are compass angles: North is 0°, East 90°, South 180°, West 270°.
/// Moving North decreases the row, moving East increases the column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// 0°, toward row 0.
    North,
    /// 90°, toward the last column.
    East,
    /// 180°, toward the last row.
    South,
    /// 270°, toward column 0.
    West,
}

impl Direction {
    /// All four headings in clockwise order starting at North.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Converts an arbitrary angle to a heading.
    ///
    /// The angle is normalized into `[0, 360)` and then snapped down to the
    /// nearest multiple of 90, so diagonal inputs are truncated rather than
    /// rejected (`45` becomes North, `-45` becomes West).
    #[must_use]
    pub const fn from_degrees(degrees: i32) -> Self {
        let normalized = degrees.rem_euclid(FULL_CIRCLE);
        match normalized / RIGHT_ANGLE {
            0 => Self::North,
            1 => Self::East,
            2 => Self::South,
            _ => Self::West,
        }
    }

    /// Returns the heading as an angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> i32 {
        match self {
            Self::North => 0,
            Self::East => 90,
            Self::South => 180,
            Self::West => 270,
        }
    }

    /// The heading a quarter turn counter-clockwise (−90°).
    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self::from_degrees(self.degrees() - RIGHT_ANGLE)
    }

    /// The heading a quarter turn clockwise (+90°).
    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self::from_degrees(self.degrees() + RIGHT_ANGLE)
    }

    /// Row and column deltas for one step in this heading.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => write!(f, "North"),
            Self::East => write!(f, "East"),
            Self::South => write!(f, "South"),
            Self::West => write!(f, "West"),
        }
    }
}

// =============================================================================
// Location
// =============================================================================

/// A cell coordinate.
///
/// Locations may lie outside any particular grid; validity is a property of
/// the grid ([`Grid::is_valid`]), not of the location. Ordering is row-major.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Row index, 0 at the top.
    pub row: i32,
    /// Column index, 0 at the left.
    pub col: i32,
}

impl Location {
    /// Creates a location.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell one step in `direction`.
    #[must_use]
    pub const fn adjacent(self, direction: Direction) -> Self {
        let (dr, dc) = direction.offset();
        Self::new(self.row + dr, self.col + dc)
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i32 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        dr * dr + dc * dc
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// =============================================================================
// Grid
// =============================================================================

/// Fixed-size sparse store mapping each cell to at most one entity.
///
/// The grid never resizes and never removes anything on its own. `put`
/// overwrites blindly: callers that care about the previous occupant must
/// evict it first (the [`Arena`](crate::arena::Arena) always does).
#[derive(Debug, Clone)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: HashMap<Location, EntityId>,
}

impl Grid {
    /// Creates an empty grid with the given dimensions.
    #[must_use]
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows,
            cols,
            cells: HashMap::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// Returns true if `loc` lies inside the grid.
    #[must_use]
    pub const fn is_valid(&self, loc: Location) -> bool {
        loc.row >= 0 && loc.row < self.rows && loc.col >= 0 && loc.col < self.cols
    }

    /// Returns the occupant of `loc`, if any.
    #[must_use]
    pub fn get(&self, loc: Location) -> Option<EntityId> {
        self.cells.get(&loc).copied()
    }

    /// Stores `id` at `loc`, returning whatever was there before.
    pub fn put(&mut self, loc: Location, id: EntityId) -> Option<EntityId> {
        self.cells.insert(loc, id)
    }

    /// Clears `loc`, returning the previous occupant.
    pub fn remove(&mut self, loc: Location) -> Option<EntityId> {
        self.cells.remove(&loc)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.len()
    }

    /// Occupied cells in row-major order.
    #[must_use]
    pub fn occupied_locations(&self) -> Vec<Location> {
        let mut locs: Vec<Location> = self.cells.keys().copied().collect();
        locs.sort_unstable();
        locs
    }

    /// Every valid location in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Location::new(row, col)))
    }

    /// Row-major index of a valid location.
    #[must_use]
    pub fn index_of(&self, loc: Location) -> Option<usize> {
        if !self.is_valid(loc) {
            return None;
        }
        usize::try_from(loc.row * self.cols + loc.col).ok()
    }
}
