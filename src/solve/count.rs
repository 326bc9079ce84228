use std::collections::BTreeMap;

use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::combinatorics::Permutations;
use crate::context::SolvingContext;
use crate::solve::pipeline::{merge_all, SolutionStream};
use crate::tile::{TileColor, TileCoord, COLOR_NONE};
use crate::tileset::TileSet;

impl SolvingContext {
    /// Every way to color the unknown neighbors of the count tile at `coord` so it sees exactly its target number of
    /// colored neighbors.
    ///
    /// Each solution holds only the chosen neighbors; a count already met gives one empty solution. A neighbor listed
    /// twice (through arrows) counts twice.
    pub fn count_solutions(&self, coord: TileCoord) -> Vec<TileSet> {
        let tile_type = self.grid[coord].tile_type;
        let Some(target) = tile_type.count_target() else {
            unreachable!("{tile_type} tile at {coord} has no count target");
        };

        let mut multiplicity: BTreeMap<TileCoord, usize> = BTreeMap::new();
        let mut colored = 0;
        for next in self.grid.neighbors(coord) {
            if self.is_unknown(next) {
                *multiplicity.entry(next).or_default() += 1;
            } else if self.grid[next].color != COLOR_NONE {
                colored += 1;
            }
        }
        let Some(remaining) = target.checked_sub(colored) else {
            return vec![];
        };

        let unknown = multiplicity.keys().copied().collect_vec();
        let palette = self.grid.max_colors().saturating_sub(1);
        let mut ret = vec![];
        for chosen in unknown.iter().copied().powerset() {
            if chosen.iter().map(|next| multiplicity[next]).sum::<usize>() != remaining {
                continue;
            }
            for colors in Permutations::new(palette, chosen.len()) {
                let solution = chosen.iter().zip(colors).map(|(next, color)| {
                    self.grid.tile_at(*next).with_color(TileColor::try_from(color + 1).unwrap_or(TileColor::MAX))
                });
                ret.push(solution.collect());
            }
        }
        ret
    }

    /// [`count_solutions`](Self::count_solutions) as a stream.
    pub fn solve_count(&self, coord: TileCoord) -> SolutionStream {
        SolutionStream::from_vec(self.count_solutions(coord), self.config.channel_capacity)
    }

    /// Joint solutions for every count tile in the grid.
    ///
    /// Per-tile solutions are computed in parallel, then merged one tile at a time. After each merge, count tiles
    /// already merged and near the newest one are re-validated to cut down the combinations early. Arrows can reach
    /// past that radius, so the last merge re-validates every count tile.
    pub fn solve_counts(&self) -> SolutionStream {
        let tiles = self
            .grid
            .tiles_with(|tile| tile.data.tile_type.count_target().is_some())
            .iter()
            .map(|tile| tile.coord)
            .collect_vec();
        debug!("solving {} count tiles", tiles.len());

        let capacity = self.config.channel_capacity;
        let streams = tiles
            .par_iter()
            .map(|coord| self.count_solutions(*coord))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|solutions| SolutionStream::from_vec(solutions, capacity))
            .collect_vec();

        let radius = self.config.validation_radius;
        merge_all(self, streams, |index| {
            if index + 1 == tiles.len() {
                return Some(tiles.clone());
            }
            let newest = tiles[index];
            Some(tiles[..=index].iter().copied().filter(|coord| coord.manhattan(&newest) <= radius).collect_vec())
        })
    }
}
