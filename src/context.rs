use itertools::Itertools;

use crate::combinatorics::Permutations;
use crate::config::SolverConfig;
use crate::grid::Grid;
use crate::tile::{Tile, TileColor, TileCoord, TileType, COLOR_NONE};
use crate::tileset::{TileCoordSet, TileSet};

/// A grid plus the set of tiles whose color is still undecided.
///
/// Every solver runs against a context. Sticky tiles start out known, everything else unknown; applying a solution
/// produces a new context in which that solution's tiles are known too.
#[derive(Clone, Debug)]
pub struct SolvingContext {
    pub(crate) grid: Grid,
    pub(crate) unknown: TileCoordSet,
    pub(crate) config: SolverConfig,
}

impl SolvingContext {
    /// A context over a copy of `grid` where every non-sticky tile is unknown.
    pub fn new(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            unknown: grid.tiles_with(|tile| !tile.data.sticky).coords(),
            config: SolverConfig::default(),
        }
    }

    /// Replace the default [`SolverConfig`].
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    #[allow(missing_docs)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[allow(missing_docs)]
    pub fn unknown(&self) -> &TileCoordSet {
        &self.unknown
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[allow(missing_docs)]
    pub fn is_unknown(&self, coord: TileCoord) -> bool {
        self.unknown.contains(&coord)
    }

    /// Whether `coord` is known and has `color`.
    pub fn is_known_color(&self, coord: TileCoord, color: TileColor) -> bool {
        !self.is_unknown(coord) && self.grid[coord].color == color
    }

    /// Whether `coord` could take part in a region of `color`: it is not a hole, and it is unknown or already `color`.
    pub(crate) fn admits(&self, coord: TileCoord, color: TileColor) -> bool {
        self.grid[coord].tile_type != TileType::Hole && (self.is_unknown(coord) || self.grid[coord].color == color)
    }

    /// The palette, `0..max_colors`.
    pub fn colors(&self) -> impl Iterator<Item = TileColor> {
        (0..self.grid.max_colors()).filter_map(|color| TileColor::try_from(color).ok())
    }

    /// A new context with `solution` written into the grid and its tiles marked known.
    pub fn applied(&self, solution: &TileSet) -> Self {
        let mut ret = self.clone();
        ret.grid.apply_tile_set(solution);
        for tile in solution.iter() {
            ret.unknown.remove(&tile.coord);
        }
        ret
    }

    /// The tiles at `coords` as they sit in the grid, recolored to `color`.
    pub fn colored(&self, coords: &TileCoordSet, color: TileColor) -> TileSet {
        coords.to_tile_set(|coord| self.grid[coord].with_color(color))
    }

    /// Unknown tiles touching `coords` that are not themselves in `coords`.
    pub(crate) fn unknown_border(&self, coords: &TileCoordSet) -> TileCoordSet {
        coords
            .iter()
            .flat_map(|coord| self.grid.linked(*coord))
            .filter(|next| self.is_unknown(*next) && !coords.contains(next))
            .collect()
    }

    /// Every way to color the unknown border of `tiles` with colors other than `shape_color`, each added to `tiles`.
    ///
    /// Fencing a region off like this pins its blob down exactly, so the region's own rule can be checked locally.
    /// With no unknown border there is exactly one decoration: `tiles` itself.
    pub fn decorate_border(&self, shape_color: TileColor, tiles: TileSet) -> BorderDecorations {
        let border = self.unknown_border(&tiles.coords()).into_iter().map(|coord| self.grid.tile_at(coord)).collect_vec();
        BorderDecorations {
            permutations: Permutations::new(self.grid.max_colors().saturating_sub(1), border.len()),
            base: tiles,
            border,
            shape_color,
        }
    }

    /// Every nonzero coloring of the unknown tiles touching a known tile of color [`COLOR_NONE`].
    pub fn fill_unknowns(&self) -> impl Iterator<Item = TileSet> + '_ {
        let touching: TileCoordSet = self
            .grid
            .tiles_with(|tile| !self.is_unknown(tile.coord) && tile.data.color == COLOR_NONE)
            .iter()
            .flat_map(|tile| self.grid.neighbor_set(tile.coord, |next| self.is_unknown(next.coord)))
            .collect();
        let touching = touching.into_iter().map(|coord| self.grid.tile_at(coord)).collect_vec();
        Permutations::new(self.grid.max_colors().saturating_sub(1), touching.len()).map(move |colors| {
            touching
                .iter()
                .zip(colors)
                .map(|(tile, color)| tile.with_color(TileColor::try_from(color + 1).unwrap_or(TileColor::MAX)))
                .collect()
        })
    }
}

/// Iterator returned by [`SolvingContext::decorate_border`].
#[derive(Clone, Debug)]
pub struct BorderDecorations {
    base: TileSet,
    border: Vec<Tile>,
    shape_color: TileColor,
    permutations: Permutations,
}

impl Iterator for BorderDecorations {
    type Item = TileSet;

    fn next(&mut self) -> Option<Self::Item> {
        let choices = self.permutations.next()?;
        let mut ret = self.base.clone();
        for (tile, choice) in self.border.iter().zip(choices) {
            let choice = TileColor::try_from(choice).unwrap_or(TileColor::MAX);
            let color = if choice >= self.shape_color { choice.saturating_add(1) } else { choice };
            ret.insert(tile.with_color(color));
        }
        Some(ret)
    }
}
