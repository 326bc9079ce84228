use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashSet};

use crate::context::SolvingContext;
use crate::tile::{TileColor, TileCoord};
use crate::tileset::TileCoordSet;

/// Connected regions of one color containing a seed tile, smallest first.
///
/// Call [`prune`](Shapes::prune) right after receiving a shape to stop the search from growing it any further.
/// Without a prune, the shape is expanded by one tile in every possible direction the next time the iterator is polled.
pub struct Shapes<'a> {
    context: &'a SolvingContext,
    color: TileColor,
    frontier: BinaryHeap<Reverse<(usize, TileCoordSet)>>,
    seen: BTreeMap<usize, HashSet<TileCoordSet>>,
    pending: Option<TileCoordSet>,
}

impl Shapes<'_> {
    /// Do not expand the shape most recently returned.
    pub fn prune(&mut self) {
        self.pending = None;
    }

    fn offer(&mut self, shape: TileCoordSet) {
        if self.seen.entry(shape.len()).or_default().insert(shape.clone()) {
            self.frontier.push(Reverse((shape.len(), shape)));
        }
    }

    fn expand(&mut self, shape: &TileCoordSet) {
        let context = self.context;
        let around: TileCoordSet = shape
            .iter()
            .flat_map(|coord| context.grid.linked(*coord))
            .filter(|next| !shape.contains(next) && context.admits(*next, self.color))
            .collect();
        for next in around {
            let mut grown = shape.clone();
            grown.extend(context.absorb(next, self.color));
            self.offer(grown);
        }
    }
}

impl Iterator for Shapes<'_> {
    type Item = TileCoordSet;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(previous) = self.pending.take() {
            self.expand(&previous);
        }
        let Reverse((size, shape)) = self.frontier.pop()?;
        // nothing at or below this size can be offered again
        self.seen = self.seen.split_off(&(size + 1));
        self.pending = Some(shape.clone());
        Some(shape)
    }
}

impl SolvingContext {
    /// `coord` together with every known blob of `color` touching it.
    pub(crate) fn absorb(&self, coord: TileCoord, color: TileColor) -> TileCoordSet {
        let mut ret = TileCoordSet::from([coord]);
        for next in self.grid.linked(coord) {
            if self.is_known_color(next, color) && !ret.contains(&next) {
                ret.extend(self.grid.blob(next, |tile| !self.is_unknown(tile.coord)));
            }
        }
        ret
    }

    /// Every connected region of `color` containing `seed`, as described on [`Shapes`].
    ///
    /// Regions only cover unknown tiles and known tiles already of `color`. A known tile of `color` is never left
    /// dangling next to a region: its whole known blob joins the region along with it.
    pub fn shapes_containing(&self, seed: TileCoord, color: TileColor) -> Shapes<'_> {
        let mut ret = Shapes {
            context: self,
            color,
            frontier: BinaryHeap::new(),
            seen: BTreeMap::new(),
            pending: None,
        };
        if self.admits(seed, color) {
            ret.offer(self.absorb(seed, color));
        }
        ret
    }
}
