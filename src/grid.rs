use std::collections::VecDeque;
use std::ops::Index;
use std::sync::Arc;

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::UnGraphMap;
use strum::VariantArray;

use crate::tile::{Direction, Tile, TileCoord, TileData, TileType};
use crate::tileset::{TileCoordSet, TileSet};

/// A rectangular puzzle grid.
///
/// Tiles are stored row-major with `y = 0` as the bottom row. Alongside the tiles, the grid keeps an undirected graph
/// linking every tile to each of its neighbors. Arrows can make the neighbor relation one-sided, and this graph is its
/// symmetric closure, which is what blob reachability runs over.
#[derive(Clone, Debug)]
pub struct Grid {
    tiles: Array2<TileData>,
    max_colors: usize,
    links: Arc<UnGraphMap<TileCoord, ()>>,
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.max_colors == other.max_colors && self.tiles == other.tiles
    }
}

impl Eq for Grid {}

impl Index<TileCoord> for Grid {
    type Output = TileData;

    fn index(&self, index: TileCoord) -> &Self::Output {
        &self.tiles[index.as_index()]
    }
}

impl Grid {
    /// A `width` by `height` grid of uncolored [`Blank`](TileType::Blank) tiles.
    pub fn with_dims(width: usize, height: usize, max_colors: usize) -> Self {
        Self::from_tiles(Array2::from_elem((height, width), TileData::new(TileType::Blank)), max_colors)
    }

    /// Wrap an array of tiles indexed `(y, x)`.
    pub(crate) fn from_tiles(tiles: Array2<TileData>, max_colors: usize) -> Self {
        let mut ret = Self { tiles, max_colors, links: Default::default() };
        ret.links = Arc::new(ret.build_links());
        ret
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> usize {
        self.tiles.ncols()
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> usize {
        self.tiles.nrows()
    }

    /// The palette size. Colors `0..max_colors` are valid, `0` being "none".
    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    /// The tile at `coord`, or [`None`] if `coord` is outside the grid.
    pub fn tile(&self, coord: TileCoord) -> Option<Tile> {
        self.tiles.get(coord.as_index()).map(|data| Tile { coord, data: *data })
    }

    /// The tile at `coord`. Panics if `coord` is outside the grid.
    pub fn tile_at(&self, coord: TileCoord) -> Tile {
        Tile { coord, data: self[coord] }
    }

    /// Every non-hole tile matching `predicate`.
    pub fn tiles_with(&self, predicate: impl Fn(&Tile) -> bool) -> TileSet {
        self.tiles
            .indexed_iter()
            .map(|(index, data)| Tile { coord: index.into(), data: *data })
            .filter(|tile| tile.data.tile_type != TileType::Hole && predicate(tile))
            .collect()
    }

    fn is_hole(&self, coord: TileCoord) -> bool {
        self.tiles.get(coord.as_index()).map_or(true, |data| data.tile_type == TileType::Hole)
    }

    fn wrapping_step(&self, coord: TileCoord, direction: Direction) -> TileCoord {
        let (width, height) = (self.width(), self.height());
        match direction {
            Direction::North => TileCoord(coord.0, (coord.1 + 1) % height),
            Direction::South => TileCoord(coord.0, (coord.1 + height - 1) % height),
            Direction::East => TileCoord((coord.0 + 1) % width, coord.1),
            Direction::West => TileCoord((coord.0 + width - 1) % width, coord.1),
        }
    }

    /// The neighbor of `coord` in `direction`.
    ///
    /// Without an arrow this is the adjacent tile, absent at the edge of the grid or when it is a hole.
    /// With an arrow the lookup walks in `direction`, wrapping around the grid, until it finds a non-hole tile.
    /// That walk may come all the way back to `coord`, in which case the tile is its own neighbor.
    /// Holes have no neighbors at all.
    pub fn neighbor(&self, coord: TileCoord, direction: Direction) -> Option<TileCoord> {
        if self.is_hole(coord) {
            return None;
        }
        if self[coord].arrows.has(direction) {
            let span = match direction {
                Direction::North | Direction::South => self.height(),
                Direction::East | Direction::West => self.width(),
            };
            let mut next = coord;
            for _ in 0..span {
                next = self.wrapping_step(next, direction);
                if !self.is_hole(next) {
                    return Some(next);
                }
            }
            return Some(coord);
        }
        let next = coord.offset_by(direction.offset());
        (!self.is_hole(next)).then_some(next)
    }

    /// Neighbors of `coord` in direction order. Arrows can make the same tile show up more than once.
    pub fn neighbors(&self, coord: TileCoord) -> Vec<TileCoord> {
        Direction::VARIANTS.iter().filter_map(|direction| self.neighbor(coord, *direction)).collect_vec()
    }

    /// The distinct neighbors of `coord` matching `predicate`.
    pub fn neighbor_set(&self, coord: TileCoord, predicate: impl Fn(&Tile) -> bool) -> TileCoordSet {
        self.neighbors(coord).into_iter().filter(|next| predicate(&self.tile_at(*next))).collect()
    }

    /// Tiles linked to `coord` in either direction: its own neighbors plus every tile that has `coord` as a neighbor.
    pub fn linked(&self, coord: TileCoord) -> impl Iterator<Item = TileCoord> + '_ {
        self.links.neighbors(coord)
    }

    /// Every tile reachable from `coord` through linked tiles sharing its color and passing `filter`.
    ///
    /// `coord` itself is always part of its blob, unless it is a hole.
    pub fn blob(&self, coord: TileCoord, filter: impl Fn(&Tile) -> bool) -> TileCoordSet {
        let mut blob = TileCoordSet::new();
        if self.is_hole(coord) {
            return blob;
        }
        let color = self[coord].color;
        blob.insert(coord);
        let mut queue = VecDeque::from([coord]);
        while let Some(current) = queue.pop_front() {
            for next in self.linked(current) {
                if blob.contains(&next) {
                    continue;
                }
                let tile = self.tile_at(next);
                if tile.data.color == color && filter(&tile) {
                    blob.insert(next);
                    queue.push_back(next);
                }
            }
        }
        blob
    }

    /// Overwrite tiles with the contents of `solution`.
    ///
    /// The link graph is only rebuilt when a tile's type or arrows change.
    /// Panics if a tile of `solution` is outside the grid.
    pub fn apply_tile_set(&mut self, solution: &TileSet) {
        let mut structural = false;
        for tile in solution.iter() {
            let slot = &mut self.tiles[tile.coord.as_index()];
            structural |= slot.tile_type != tile.data.tile_type || slot.arrows != tile.data.arrows;
            *slot = tile.data;
        }
        if structural {
            self.links = Arc::new(self.build_links());
        }
    }

    fn build_links(&self) -> UnGraphMap<TileCoord, ()> {
        let mut links = UnGraphMap::new();
        for (index, data) in self.tiles.indexed_iter() {
            if data.tile_type != TileType::Hole {
                links.add_node(index.into());
            }
        }
        for coord in links.nodes().collect_vec() {
            for next in self.neighbors(coord) {
                links.add_edge(coord, next, ());
            }
        }
        links
    }
}
