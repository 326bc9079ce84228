use crate::context::SolvingContext;
use crate::tile::{TileColor, TileCoord, TileType};
use crate::tileset::{TileCoordSet, TileSet};

/// Depth-first enumeration of simple paths of one color between two tiles.
///
/// A path never touches itself: no tile on it has more than two same-colored neighbors, and a goal on it has at most
/// one. It may run through unknown tiles and through known tiles that already have its color.
/// Each frame on the stack owns the path that led to it, so sibling branches never see each other's tiles.
pub struct DirectPaths<'a> {
    context: &'a SolvingContext,
    end: TileCoord,
    color: TileColor,
    stack: Vec<(TileCoord, TileCoordSet)>,
    ready: Vec<TileCoordSet>,
}

impl<'a> DirectPaths<'a> {
    fn same_color(&self, coord: TileCoord, path: &TileCoordSet) -> bool {
        self.context.is_known_color(coord, self.color) || path.contains(&coord)
    }

    fn expand(&mut self, previous: TileCoord, path: TileCoordSet) {
        let context = self.context;
        let grid = &context.grid;
        let candidates = grid.neighbor_set(previous, |tile| context.admits(tile.coord, self.color));
        for next in candidates {
            if path.contains(&next) {
                continue;
            }
            let touching =
                grid.neighbor_set(previous, |tile| tile.coord == next || self.same_color(tile.coord, &path)).len();
            if touching > 2 || (grid[previous].tile_type == TileType::Goal && touching > 1) {
                continue;
            }
            if grid[next].tile_type == TileType::Goal && next != self.end {
                continue;
            }
            let mut extended = path.clone();
            extended.insert(next);
            if next == self.end {
                let ends_cleanly = grid[next].tile_type != TileType::Goal
                    || grid.neighbor_set(next, |tile| self.same_color(tile.coord, &path)).len() <= 1;
                if ends_cleanly {
                    self.ready.push(extended);
                }
                continue;
            }
            self.stack.push((next, extended));
        }
    }
}

impl Iterator for DirectPaths<'_> {
    type Item = TileCoordSet;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(path) = self.ready.pop() {
                return Some(path);
            }
            let (previous, path) = self.stack.pop()?;
            self.expand(previous, path);
        }
    }
}

impl SolvingContext {
    /// Undecorated simple paths of `color` from `start` to `end`, as coordinate sets.
    ///
    /// A sticky endpoint of any other color rules the search out entirely.
    pub fn direct_paths(&self, start: TileCoord, end: TileCoord, color: TileColor) -> DirectPaths<'_> {
        let mut ret = DirectPaths { context: self, end, color, stack: vec![], ready: vec![] };
        if self.admits(start, color) && self.admits(end, color) {
            ret.stack.push((start, TileCoordSet::from([start])));
        }
        ret
    }

    /// Every simple path of `color` from `start` to `end`, each followed by every coloring of its unknown border that
    /// keeps the path's blob exactly the path.
    pub fn find_paths(&self, start: TileCoord, end: TileCoord, color: TileColor) -> impl Iterator<Item = TileSet> + '_ {
        self.direct_paths(start, end, color)
            .flat_map(move |path| self.decorate_border(color, self.colored(&path, color)))
    }
}
