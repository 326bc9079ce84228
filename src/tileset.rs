use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use itertools::Itertools;

use crate::tile::{Tile, TileColor, TileCoord, TileData};

/// A set of tiles keyed by coordinate, used as a (partial) solution.
///
/// Two sets are equal when they hold the same coordinates with identical tile data, so a [`TileSet`] can be deduplicated
/// with an ordinary hash set.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct TileSet(BTreeMap<TileCoord, TileData>);

impl TileSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `tile`, replacing whatever was stored at its coordinate.
    pub fn insert(&mut self, tile: Tile) {
        self.0.insert(tile.coord, tile.data);
    }

    /// The data stored at `coord`, if any.
    pub fn get(&self, coord: TileCoord) -> Option<&TileData> {
        self.0.get(&coord)
    }

    /// Whether this exact tile, data included, is in the set.
    pub fn contains(&self, tile: &Tile) -> bool {
        self.0.get(&tile.coord) == Some(&tile.data)
    }

    #[allow(missing_docs)]
    pub fn contains_coord(&self, coord: TileCoord) -> bool {
        self.0.contains_key(&coord)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tiles in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        self.0.iter().map(|(coord, data)| Tile { coord: *coord, data: *data })
    }

    /// The coordinates covered by this set.
    pub fn coords(&self) -> TileCoordSet {
        self.0.keys().copied().collect()
    }

    /// Union of two solutions, or [`None`] if they disagree about any shared coordinate.
    pub fn merged(&self, other: &TileSet) -> Option<TileSet> {
        let (mut larger, smaller) = if self.len() >= other.len() { (self.clone(), other) } else { (other.clone(), self) };
        for tile in smaller.iter() {
            match larger.get(tile.coord) {
                Some(existing) if *existing != tile.data => return None,
                Some(_) => {}
                None => larger.insert(tile),
            }
        }
        Some(larger)
    }
}

impl FromIterator<Tile> for TileSet {
    fn from_iter<T: IntoIterator<Item = Tile>>(iter: T) -> Self {
        let mut ret = Self::new();
        ret.extend(iter);
        ret
    }
}

impl Extend<Tile> for TileSet {
    fn extend<T: IntoIterator<Item = Tile>>(&mut self, iter: T) {
        for tile in iter {
            self.insert(tile);
        }
    }
}

fn bounds(coords: impl Iterator<Item = TileCoord> + Clone) -> (usize, usize) {
    (
        coords.clone().map(|coord| coord.0).max().unwrap_or_default(),
        coords.map(|coord| coord.1).max().unwrap_or_default(),
    )
}

/// Draws the set one row per `|`-separated segment, top row first, with each tile's color digit or a space.
impl Display for TileSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (max_x, max_y) = bounds(self.0.keys().copied());
        let rows = (0..=max_y).rev().map(|y| {
            (0..=max_x)
                .map(|x| match self.get(TileCoord(x, y)) {
                    Some(data) => color_char(data.color),
                    None => ' ',
                })
                .collect::<String>()
        });
        write!(f, "{{{}}}", rows.format("|"))
    }
}

fn color_char(color: TileColor) -> char {
    char::from_digit(color.into(), 36).unwrap_or('?')
}

/// An ordered set of coordinates.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct TileCoordSet(BTreeSet<TileCoord>);

impl TileCoordSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give every coordinate the data produced by `data`.
    pub fn to_tile_set(&self, data: impl Fn(TileCoord) -> TileData) -> TileSet {
        self.iter().map(|coord| Tile { coord: *coord, data: data(*coord) }).collect()
    }
}

impl Deref for TileCoordSet {
    type Target = BTreeSet<TileCoord>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TileCoordSet {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<TileCoord> for TileCoordSet {
    fn from_iter<T: IntoIterator<Item = TileCoord>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[TileCoord; N]> for TileCoordSet {
    fn from(value: [TileCoord; N]) -> Self {
        Self(BTreeSet::from(value))
    }
}

impl IntoIterator for TileCoordSet {
    type Item = TileCoord;
    type IntoIter = std::collections::btree_set::IntoIter<TileCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TileCoordSet {
    type Item = &'a TileCoord;
    type IntoIter = std::collections::btree_set::Iter<'a, TileCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Draws the set one row per `|`-separated segment, top row first, with `x` for members.
impl Display for TileCoordSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (max_x, max_y) = bounds(self.iter().copied());
        let rows = (0..=max_y).rev().map(|y| {
            (0..=max_x).map(|x| if self.contains(&TileCoord(x, y)) { 'x' } else { ' ' }).collect::<String>()
        });
        write!(f, "{{{}}}", rows.format("|"))
    }
}
