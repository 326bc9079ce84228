use itertools::Itertools;
use log::debug;

use crate::context::SolvingContext;
use crate::solve::pipeline::{merge_all, SolutionStream};
use crate::tile::{TileCoord, TileType};

impl SolvingContext {
    /// Every fenced-off territory the crown at `coord` could rule, over every color.
    ///
    /// A territory never contains another crown.
    pub fn solve_crown(&self, coord: TileCoord) -> SolutionStream {
        let context = self.clone();
        SolutionStream::spawn(self.config.channel_capacity, "gridspech-crown", move |sender| {
            for color in context.colors() {
                let mut shapes = context.shapes_containing(coord, color);
                while let Some(shape) = shapes.next() {
                    if shape.iter().any(|other| *other != coord && context.grid[*other].tile_type == TileType::Crown) {
                        shapes.prune();
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

    /// Joint territories for every crown in the grid.
    ///
    /// Whether every tile of a color ends up crowned can only be told once the whole grid is colored, so merged
    /// territories are not re-validated here.
    pub fn solve_crowns(&self) -> SolutionStream {
        let crowns =
            self.grid.tiles_with(|tile| tile.data.tile_type == TileType::Crown).iter().map(|tile| tile.coord).collect_vec();
        debug!("solving {} crowns", crowns.len());
        let streams = crowns.iter().map(|coord| self.solve_crown(*coord)).collect_vec();
        merge_all(self, streams, |_| None)
    }
}
