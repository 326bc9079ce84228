use std::fmt::{Display, Formatter};

use ndarray::Ix;
use strum::VariantArray;

/// A color index. `0` is the "none" color; colors `1..max_colors` are the puzzle's palette.
pub type TileColor = u8;

/// The color which does not count as "colored" for [`TileType::Count1`] and friends.
pub const COLOR_NONE: TileColor = 0;

type Coord = usize;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// A coordinate `(x, y)` on a grid. The bottom left corner is `TileCoord(0, 0)`.
pub struct TileCoord(pub Coord, pub Coord);

impl TileCoord {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
    /// Taxicab distance between two coordinates, ignoring any arrow wrapping.
    pub fn manhattan(&self, other: &TileCoord) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }
}

impl From<(Ix, Ix)> for TileCoord {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl Display for TileCoord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// The four directions a tile can reach its neighbors in.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Towards larger `y`.
    North,
    /// Towards larger `x`.
    East,
    /// Towards smaller `y`.
    South,
    /// Towards smaller `x`.
    West,
}

impl Direction {
    pub(crate) fn offset(&self) -> (isize, isize) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// The direction pointing the opposite way.
    pub fn invert(&self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// The glyph used for an arrow pointing this way in the text grid format.
    pub const fn glyph(&self) -> char {
        match self {
            Self::North => '^',
            Self::East => '>',
            Self::South => 'v',
            Self::West => '<',
        }
    }

    /// Inverse of [`glyph`](Self::glyph).
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '^' => Some(Self::North),
            '>' => Some(Self::East),
            'v' => Some(Self::South),
            '<' => Some(Self::West),
            _ => None,
        }
    }
}

/// The rule a tile imposes on its surroundings.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileType {
    /// Not part of the grid at all.
    #[default]
    Hole,
    /// A plain tile with no rule of its own.
    Blank,
    /// A path endpoint. The same-colored blob around it must be a simple path ending at another goal.
    Goal,
    /// Every tile of this crown's color must be reachable from some crown of that color, and no two crowns share a blob.
    Crown,
    /// Exactly one neighbor is colored.
    Count1,
    /// Exactly two neighbors are colored.
    Count2,
    /// Exactly three neighbors are colored.
    Count3,
    /// The blob contains exactly one other special tile.
    Join1,
    /// The blob contains exactly two other special tiles.
    Join2,
}

impl TileType {
    /// How many colored neighbors a count tile demands.
    pub fn count_target(&self) -> Option<usize> {
        match self {
            Self::Count1 => Some(1),
            Self::Count2 => Some(2),
            Self::Count3 => Some(3),
            _ => None,
        }
    }

    /// How many other special tiles a join tile demands in its blob.
    pub fn join_target(&self) -> Option<usize> {
        match self {
            Self::Join1 => Some(1),
            Self::Join2 => Some(2),
            _ => None,
        }
    }

    /// Any tile type other than [`Hole`](Self::Hole) and [`Blank`](Self::Blank).
    pub fn is_special(&self) -> bool {
        !matches!(self, Self::Hole | Self::Blank)
    }
}

/// Arrow flags on a tile. An arrow makes that side's neighbor lookup wrap around the grid.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arrows {
    #[allow(missing_docs)]
    pub north: bool,
    #[allow(missing_docs)]
    pub east: bool,
    #[allow(missing_docs)]
    pub south: bool,
    #[allow(missing_docs)]
    pub west: bool,
}

impl Arrows {
    /// Whether the arrow in `direction` is present.
    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Set the arrow in `direction`.
    pub fn set(&mut self, direction: Direction, present: bool) -> &mut Self {
        match direction {
            Direction::North => self.north = present,
            Direction::East => self.east = present,
            Direction::South => self.south = present,
            Direction::West => self.west = present,
        }
        self
    }

    pub(crate) fn present(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::VARIANTS.iter().copied().filter(|direction| self.has(*direction))
    }
}

/// Everything stored about one tile besides its position.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileData {
    /// The tile's rule.
    pub tile_type: TileType,
    /// The tile's current color.
    pub color: TileColor,
    /// A sticky tile's color is fixed by the puzzle and never assigned by a solver.
    pub sticky: bool,
    /// Wrapping arrows.
    pub arrows: Arrows,
}

impl TileData {
    /// A non-sticky tile of `tile_type` with color [`COLOR_NONE`] and no arrows.
    pub fn new(tile_type: TileType) -> Self {
        Self { tile_type, ..Default::default() }
    }

    /// The same tile, recolored.
    pub fn with_color(self, color: TileColor) -> Self {
        Self { color, ..self }
    }
}

/// A tile and where it sits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    #[allow(missing_docs)]
    pub coord: TileCoord,
    #[allow(missing_docs)]
    pub data: TileData,
}

impl Tile {
    /// The same tile, recolored.
    pub fn with_color(self, color: TileColor) -> Self {
        Self { data: self.data.with_color(color), ..self }
    }
}
