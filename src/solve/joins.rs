use itertools::Itertools;
use log::debug;

use crate::context::SolvingContext;
use crate::solve::pipeline::{merge_all, SolutionStream};
use crate::tile::{TileCoord, TileType};
use crate::tileset::TileCoordSet;

impl SolvingContext {
    /// Every fenced-off region around the join tile at `coord`, over every color, holding exactly as many other special
    /// tiles as the join asks for.
    pub fn solve_join(&self, coord: TileCoord) -> SolutionStream {
        let tile_type = self.grid[coord].tile_type;
        let Some(target) = tile_type.join_target() else {
            unreachable!("{tile_type} tile at {coord} has no join target");
        };
        let context = self.clone();
        SolutionStream::spawn(self.config.channel_capacity, "gridspech-join", move |sender| {
            for color in context.colors() {
                let mut shapes = context.shapes_containing(coord, color);
                while let Some(shape) = shapes.next() {
                    // the join itself is one of them
                    let special = shape.iter().filter(|other| context.grid[**other].tile_type.is_special()).count();
                    if special > target + 1 || context.strands_goal(&shape, target) {
                        shapes.prune();
                        continue;
                    }
                    if special < target + 1 {
                        continue;
                    }
                    for decorated in context.decorate_border(color, context.colored(&shape, color)) {
                        if sender.send(decorated).is_err() {
                            return;
                        }
                    }
                }
            }
        })
    }

    /// Whether a goal inside `shape` can no longer end a path once the shape is fenced off as a join's blob.
    ///
    /// A single join cannot share its blob with the two goals of a path. Otherwise a goal must stay a path end, and
    /// a path holding a goal has no branches.
    fn strands_goal(&self, shape: &TileCoordSet, target: usize) -> bool {
        let mut has_goal = false;
        let mut has_branch = false;
        for coord in shape.iter() {
            let inside = self.grid.neighbor_set(*coord, |next| shape.contains(&next.coord)).len();
            has_branch |= inside > 2;
            if self.grid[*coord].tile_type == TileType::Goal {
                if target == 1 || inside > 1 {
                    return true;
                }
                has_goal = true;
            }
        }
        has_goal && has_branch
    }

    /// Joint solutions for every join tile in the grid, re-validating all joins merged so far after each merge.
    pub fn solve_joins(&self) -> SolutionStream {
        let joins = self
            .grid
            .tiles_with(|tile| tile.data.tile_type.join_target().is_some())
            .iter()
            .map(|tile| tile.coord)
            .collect_vec();
        debug!("solving {} joins", joins.len());
        let streams = joins.iter().map(|coord| self.solve_join(*coord)).collect_vec();
        merge_all(self, streams, |index| Some(joins[..=index].to_vec()))
    }
}
