#![warn(missing_docs)]

//! # `gridspech`
//!
//! An exhaustive solver for [gridspech](https://krackocloud.itch.io/gridspech)-style puzzles: rectangular grids of
//! tiles where every tile must be given a color so that each special tile's rule holds.
//! Read a puzzle with [`Grid::parse`], wrap it in a [`SolvingContext`], then pull solutions out of
//! [`solve_all_tiles()`](SolvingContext::solve_all_tiles) or one of the narrower solvers.
//!
//! Colors are small integers. `0` is the "none" color; a grid's palette is `0..max_colors`.
//! Tiles can be holes (absent), blank, or carry one of these rules:
//!
//! * **Goal**: its same-colored blob is a simple path running between exactly two goals.
//! * **Crown**: no two crowns share a blob, and every tile of a crown's color belongs to some crown's blob.
//! * **Count** (1 to 3): exactly that many of its neighbors are colored (not `0`).
//! * **Join** (1 or 2): its blob holds exactly that many other special tiles.
//!
//! Arrows on a tile make a side's neighbor wrap around the grid to the next tile that is not a hole.
//!
//! # Internals
//! Solutions are [`TileSet`]s: partial assignments of tiles. Each family of rules has its own generator.
//! * Goals: a depth-first search for simple paths between each pair of goals in each color runs in parallel, and
//!   every pairing of the goals whose paths are all found and compatible becomes a solution.
//! * Counts: each count tile enumerates the subsets of its unknown neighbors it could color.
//! * Crowns and joins: a smallest-first search grows connected regions around the tile, pruning regions that already
//!   break the rule.
//!
//! Paths and regions are "decorated" before use: every unknown tile touching them is given a different color, so the
//! region's blob is exactly the region. Generators feed bounded channels and are merged into whole-grid solutions by
//! a pipeline of threads, so solutions are produced lazily and dropping a [`SolutionStream`] cancels the work behind
//! it.

pub use config::SolverConfig;
pub use context::{BorderDecorations, SolvingContext};
pub use grid::Grid;
pub use serialize::ParseError;
pub use solve::{ConstraintFamily, SolutionStream};
pub use tile::{Arrows, Direction, Tile, TileColor, TileCoord, TileData, TileType, COLOR_NONE};
pub use tileset::{TileCoordSet, TileSet};

pub mod combinatorics;
pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod grid;
pub mod path;
pub(crate) mod rules;
pub mod serialize;
pub mod shapes;
pub mod solve;
pub(crate) mod tile;
pub(crate) mod tileset;
mod tests;
