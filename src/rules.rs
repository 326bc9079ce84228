use log::trace;

use crate::grid::Grid;
use crate::tile::{TileCoord, TileType, COLOR_NONE};
use crate::tileset::TileCoordSet;

impl Grid {
    /// Whether every non-hole tile satisfies its rule.
    pub fn valid(&self) -> bool {
        self.tiles_with(|_| true).iter().all(|tile| self.valid_tile(tile.coord))
    }

    /// Whether the tile at `coord` satisfies its rule given the grid's current colors.
    pub fn valid_tile(&self, coord: TileCoord) -> bool {
        let tile = self.tile_at(coord);
        let valid = match tile.data.tile_type {
            TileType::Hole | TileType::Blank => true,
            TileType::Goal => self.valid_goal(coord),
            TileType::Crown => self.valid_crown(coord),
            TileType::Count1 | TileType::Count2 | TileType::Count3 => {
                let target = tile.data.tile_type.count_target().unwrap_or_default();
                self.neighbors(coord).into_iter().filter(|next| self[*next].color != COLOR_NONE).count() == target
            }
            TileType::Join1 | TileType::Join2 => {
                let target = tile.data.tile_type.join_target().unwrap_or_default();
                self.blob(coord, |_| true)
                    .iter()
                    .filter(|other| **other != coord && self[**other].tile_type.is_special())
                    .count()
                    == target
            }
        };
        if !valid {
            trace!("{} tile at {coord} is unsatisfied", tile.data.tile_type);
        }
        valid
    }

    fn same_color_neighbors(&self, coord: TileCoord) -> usize {
        let color = self[coord].color;
        self.neighbor_set(coord, |other| other.data.color == color).len()
    }

    fn valid_goal(&self, coord: TileCoord) -> bool {
        let blob = self.blob(coord, |_| true);
        let goals = blob.iter().filter(|other| self[**other].tile_type == TileType::Goal).count();
        goals == 2
            && blob.iter().all(|other| {
                let expected = if self[*other].tile_type == TileType::Goal { 1 } else { 2 };
                self.same_color_neighbors(*other) == expected
            })
    }

    fn valid_crown(&self, coord: TileCoord) -> bool {
        let color = self[coord].color;
        let blob = self.blob(coord, |_| true);
        if blob.iter().any(|other| *other != coord && self[*other].tile_type == TileType::Crown) {
            return false;
        }
        let crowned: TileCoordSet = self
            .tiles_with(|other| other.data.tile_type == TileType::Crown && other.data.color == color)
            .iter()
            .flat_map(|crown| self.blob(crown.coord, |_| true))
            .collect();
        crowned == self.tiles_with(|other| other.data.color == color).coords()
    }
}
