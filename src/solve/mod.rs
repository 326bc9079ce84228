//! Solvers for each family of tile rules, and the pipeline joining them into whole-grid solutions.
//!
//! Every solver returns a [`SolutionStream`]: a lazily produced sequence of partial solutions ([`TileSet`]s) which
//! assign colors to the tiles a rule constrains. Streams from different rules are combined by merging, keeping only
//! pairs of solutions that agree wherever they overlap.

use itertools::Itertools;
use log::debug;
use strum::{EnumString, VariantArray};

use crate::context::SolvingContext;
use crate::tile::{TileCoord, TileType};
use crate::tileset::TileSet;

pub use pipeline::SolutionStream;

mod count;
mod crowns;
mod goals;
mod joins;
pub(crate) mod pipeline;

/// A group of tile types solved together.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, VariantArray, strum::Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ConstraintFamily {
    /// [`TileType::Goal`]
    Goals,
    /// [`TileType::Count1`] through [`TileType::Count3`]
    Counts,
    /// [`TileType::Crown`]
    Crowns,
    /// [`TileType::Join1`] and [`TileType::Join2`]
    Joins,
}

impl SolvingContext {
    /// Every assignment of the unknown tiles constrained by some rule which makes the whole grid valid.
    ///
    /// Goals and counts are merged first. Joins are then solved on top of each of those solutions, crowns on top of
    /// each of those, and whatever survives a final check of the full grid is produced, without duplicates.
    /// Tiles no rule reaches keep their color and are absent from the solutions.
    pub fn solve_all_tiles(&self) -> SolutionStream {
        let context = self.clone();
        SolutionStream::spawn(self.config.channel_capacity, "gridspech-all", move |sender| {
            let checked = context
                .grid
                .tiles_with(|tile| tile.data.tile_type == TileType::Goal || tile.data.tile_type.count_target().is_some())
                .iter()
                .map(|tile| tile.coord)
                .collect_vec();
            let paths_and_counts = context.solve_goals().merge(context.solve_counts()).filter_valid_so_far(&context, checked);
            for first in paths_and_counts {
                let with_first = context.applied(&first);
                for joins in with_first.solve_joins() {
                    let with_joins = with_first.applied(&joins);
                    for crowns in with_joins.solve_crowns() {
                        let solved = with_joins.applied(&crowns);
                        if !solved.grid.valid() {
                            continue;
                        }
                        let Some(solution) = first.merged(&joins).and_then(|partial| partial.merged(&crowns)) else {
                            continue;
                        };
                        if sender.send(solution).is_err() {
                            debug!("whole-grid search cancelled");
                            return;
                        }
                    }
                }
            }
        })
        .dedupe()
    }

    /// Solutions for a single rule tile. Tiles without a rule have one empty solution.
    ///
    /// A goal is only solvable together with every other goal, so its solutions are the goal family's solutions.
    /// Panics if `coord` is outside the grid.
    pub fn solve_tile(&self, coord: TileCoord) -> SolutionStream {
        let capacity = self.config.channel_capacity;
        match self.grid[coord].tile_type {
            TileType::Hole | TileType::Blank => SolutionStream::once_empty(capacity),
            TileType::Goal => self.solve_goals().filter_has_tile(coord),
            TileType::Crown => self.solve_crown(coord),
            TileType::Count1 | TileType::Count2 | TileType::Count3 => self.solve_count(coord),
            TileType::Join1 | TileType::Join2 => self.solve_join(coord),
        }
    }

    /// Joint solutions for the listed tiles only, deduplicated. Panics if any of `coords` is outside the grid.
    pub fn solve_tiles(&self, coords: &[TileCoord]) -> SolutionStream {
        let streams = coords.iter().map(|coord| self.solve_tile(*coord)).collect_vec();
        pipeline::merge_all(self, streams, |_| None).dedupe()
    }

    /// Joint solutions for one family of rules.
    pub fn solve_family(&self, family: ConstraintFamily) -> SolutionStream {
        match family {
            ConstraintFamily::Goals => self.solve_goals(),
            ConstraintFamily::Counts => self.solve_counts(),
            ConstraintFamily::Crowns => self.solve_crowns(),
            ConstraintFamily::Joins => self.solve_joins(),
        }
    }

    /// The solutions in `stream` that, applied to this context, leave the whole grid valid.
    pub fn valid_solutions(&self, stream: SolutionStream) -> impl Iterator<Item = TileSet> + '_ {
        stream.filter(move |solution| self.applied(solution).grid.valid())
    }
}
