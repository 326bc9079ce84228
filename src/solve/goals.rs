use std::collections::HashMap;
use std::sync::mpsc::SyncSender;
use std::sync::{Mutex, PoisonError};

use itertools::Itertools;
use log::{debug, warn};
use rayon::prelude::*;
use unordered_pair::UnorderedPair;

use crate::combinatorics::all_pairing_sets;
use crate::context::SolvingContext;
use crate::solve::pipeline::SolutionStream;
use crate::tile::{TileColor, TileCoord, TileType};
use crate::tileset::{TileCoordSet, TileSet};

type GoalPair = UnorderedPair<TileCoord>;

/// One decorated path between a pair of goals.
struct PathSolution {
    path: TileCoordSet,
    tiles: TileSet,
}

/// Paths found so far, per goal pair, and the pairings each pair takes part in.
struct PathAccumulator {
    pairings: Vec<Vec<GoalPair>>,
    pairings_with: HashMap<GoalPair, Vec<usize>>,
    found: HashMap<GoalPair, Vec<PathSolution>>,
}

impl PathAccumulator {
    fn new(pairings: Vec<Vec<GoalPair>>) -> Self {
        let mut pairings_with: HashMap<GoalPair, Vec<usize>> = HashMap::new();
        for (index, pairing) in pairings.iter().enumerate() {
            for pair in pairing {
                pairings_with.entry(*pair).or_default().push(index);
            }
        }
        Self { pairings, pairings_with, found: HashMap::new() }
    }

    /// Store a new path for `pair` and return every full pairing it completes with the paths found before it.
    fn record(&mut self, context: &SolvingContext, pair: GoalPair, solution: PathSolution) -> Vec<TileSet> {
        let mut ret = vec![];
        for index in self.pairings_with.get(&pair).into_iter().flatten() {
            let others = self.pairings[*index].iter().copied().filter(|other| *other != pair).collect_vec();
            if others.iter().all(|other| self.found.get(other).is_some_and(|found| !found.is_empty())) {
                self.extend(context, &others, solution.tiles.clone(), solution.path.clone(), &mut ret);
            }
        }
        self.found.entry(pair).or_default().push(solution);
        ret
    }

    fn extend(
        &self,
        context: &SolvingContext,
        others: &[GoalPair],
        tiles: TileSet,
        used: TileCoordSet,
        out: &mut Vec<TileSet>,
    ) {
        let Some((pair, rest)) = others.split_first() else {
            out.push(tiles);
            return;
        };
        for candidate in self.found.get(pair).into_iter().flatten() {
            if !used.is_disjoint(&candidate.path) {
                continue;
            }
            let Some(merged) = tiles.merged(&candidate.tiles) else {
                continue;
            };
            let applied = context.applied(&merged);
            if !applied.grid.valid_tile(pair.0) || !applied.grid.valid_tile(pair.1) {
                continue;
            }
            let mut used = used.clone();
            used.extend(candidate.path.iter().copied());
            self.extend(context, rest, merged, used, out);
        }
    }
}

impl SolvingContext {
    /// Every way to connect all goals in pairs with non-touching paths, each path fenced off from the rest of the grid.
    ///
    /// Paths for every goal pair and color are searched in parallel. A grid without goals has exactly one (empty)
    /// solution, and a grid with an odd number of goals has none.
    pub fn solve_goals(&self) -> SolutionStream {
        let capacity = self.config.channel_capacity;
        let goals =
            self.grid.tiles_with(|tile| tile.data.tile_type == TileType::Goal).iter().map(|tile| tile.coord).collect_vec();
        if goals.is_empty() {
            return SolutionStream::once_empty(capacity);
        }
        if goals.len() % 2 != 0 {
            debug!("{} goals cannot be paired up", goals.len());
            return SolutionStream::empty(capacity);
        }

        let pairings = all_pairing_sets(goals.len() / 2)
            .into_iter()
            .map(|pairing| pairing.into_iter().map(|(a, b)| GoalPair::from((goals[a], goals[b]))).collect_vec())
            .collect_vec();
        let colors = self.colors().collect_vec();
        let tasks: Vec<(GoalPair, TileColor)> =
            goals.iter().copied().tuple_combinations::<(TileCoord, TileCoord)>().map(GoalPair::from).cartesian_product(colors).collect();
        debug!("solving {} goals: {} pairings, {} path searches", goals.len(), pairings.len(), tasks.len());

        let context = self.clone();
        let accumulator = Mutex::new(PathAccumulator::new(pairings));
        let threads = self.config.search_threads;
        SolutionStream::spawn(capacity, "gridspech-goals", move |sender| {
            let search = |sender: &mut SyncSender<TileSet>, (pair, color): &(GoalPair, TileColor)| -> Result<(), ()> {
                for path in context.direct_paths(pair.0, pair.1, *color) {
                    for tiles in context.decorate_border(*color, context.colored(&path, *color)) {
                        let completed = accumulator
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .record(&context, *pair, PathSolution { path: path.clone(), tiles });
                        for solution in completed {
                            let applied = context.applied(&solution);
                            if goals.iter().all(|goal| applied.grid.valid_tile(*goal)) {
                                sender.send(solution).map_err(|_| ())?;
                            }
                        }
                    }
                }
                Ok(())
            };
            let searched = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| tasks.par_iter().try_for_each_with(sender, search)),
                Err(e) => {
                    warn!("falling back to a sequential path search: {e}");
                    let mut sender = sender;
                    tasks.iter().try_for_each(|task| search(&mut sender, task))
                }
            };
            if searched.is_err() {
                debug!("goal search cancelled");
            }
        })
        .dedupe()
    }
}
