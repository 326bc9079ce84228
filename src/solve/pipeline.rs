use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;

use itertools::Itertools;
use log::{debug, error};

use crate::context::SolvingContext;
use crate::tile::TileCoord;
use crate::tileset::TileSet;

/// A lazily produced sequence of candidate solutions.
///
/// Each stream is fed by a producer thread over a bounded channel, so producers run ahead of the consumer by at most
/// the configured capacity. Dropping a stream is how a consumer cancels: the producer's next send fails and it stops.
pub struct SolutionStream {
    receiver: Receiver<TileSet>,
    capacity: usize,
}

impl Iterator for SolutionStream {
    type Item = TileSet;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

impl SolutionStream {
    /// Run `produce` on its own thread, streaming whatever it sends.
    ///
    /// `produce` should return as soon as a send fails.
    pub(crate) fn spawn<F>(capacity: usize, name: &str, produce: F) -> Self
    where
        F: FnOnce(SyncSender<TileSet>) + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        if let Err(e) = thread::Builder::new().name(name.to_owned()).spawn(move || produce(sender)) {
            error!("could not start {name} thread: {e}");
        }
        Self { receiver, capacity }
    }

    /// A stream of the given solutions, needing no producer thread.
    pub fn from_vec(solutions: Vec<TileSet>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel(solutions.len());
        for solution in solutions {
            // the receiver is still in hand, and the channel has room for everything
            let _ = sender.send(solution);
        }
        Self { receiver, capacity }
    }

    /// A stream with one empty solution: "no constraints, nothing to assign".
    pub fn once_empty(capacity: usize) -> Self {
        Self::from_vec(vec![TileSet::new()], capacity)
    }

    /// A stream with no solutions at all.
    pub fn empty(capacity: usize) -> Self {
        Self::from_vec(vec![], capacity)
    }

    /// Every compatible combination of a solution from `self` with one from `other`.
    ///
    /// `other` is drained into memory first, so pass the smaller stream there.
    pub fn merge(self, other: SolutionStream) -> SolutionStream {
        let capacity = self.capacity;
        Self::spawn(capacity, "gridspech-merge", move |sender| {
            let buffered = other.collect_vec();
            debug!("merging against {} buffered solutions", buffered.len());
            for left in self {
                for right in &buffered {
                    if let Some(merged) = left.merged(right) {
                        if sender.send(merged).is_err() {
                            return;
                        }
                    }
                }
            }
        })
    }

    /// Drop solutions already produced by this stream.
    pub fn dedupe(self) -> SolutionStream {
        let capacity = self.capacity;
        Self::spawn(capacity, "gridspech-dedupe", move |sender| {
            let mut seen = HashSet::new();
            for solution in self {
                if seen.insert(solution.clone()) && sender.send(solution).is_err() {
                    return;
                }
            }
        })
    }

    /// Keep only solutions that, applied to `context`, leave every tile in `tiles_to_check` valid.
    pub fn filter_valid_so_far(self, context: &SolvingContext, tiles_to_check: Vec<TileCoord>) -> SolutionStream {
        let capacity = self.capacity;
        let context = context.clone();
        Self::spawn(capacity, "gridspech-validate", move |sender| {
            for solution in self {
                let applied = context.applied(&solution);
                if tiles_to_check.iter().all(|coord| applied.grid.valid_tile(*coord))
                    && sender.send(solution).is_err()
                {
                    return;
                }
            }
        })
    }

    /// Keep only solutions that assign `coord`.
    pub fn filter_has_tile(self, coord: TileCoord) -> SolutionStream {
        let capacity = self.capacity;
        Self::spawn(capacity, "gridspech-has-tile", move |sender| {
            for solution in self {
                if solution.contains_coord(coord) && sender.send(solution).is_err() {
                    return;
                }
            }
        })
    }
}

/// Merge per-tile streams left to right, deduplicating after every step, optionally re-validating via `validate`.
///
/// `validate` receives the index of the stream just merged and returns the tiles to re-check, if any.
pub(crate) fn merge_all(
    context: &SolvingContext,
    streams: Vec<SolutionStream>,
    validate: impl Fn(usize) -> Option<Vec<TileCoord>>,
) -> SolutionStream {
    let capacity = context.config.channel_capacity;
    let mut streams = streams.into_iter();
    let Some(mut merged) = streams.next() else {
        return SolutionStream::once_empty(capacity);
    };
    for (index, next) in streams.enumerate() {
        merged = merged.merge(next).dedupe();
        if let Some(tiles) = validate(index + 1) {
            merged = merged.filter_valid_so_far(context, tiles);
        }
    }
    merged
}
