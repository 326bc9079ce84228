//! The plain-text grid format.
//!
//! One line per row, top row first, tiles separated by whitespace. A tile is written as `_` for a hole, or as its
//! color followed by optional parts in this order:
//!
//! * `/` marks the tile sticky;
//! * a type marker: `e` goal, `k` crown, `m1`/`m2`/`m3` count, `j1`/`j2` join (none means blank);
//! * any of the arrow glyphs `^`, `>`, `v`, `<`.
//!
//! ```text
//! 1/e  0    0e
//! 0    0m1  1/
//! ```

use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;

use crate::grid::Grid;
use crate::tile::{Direction, TileColor, TileCoord, TileData, TileType};

/// Reasons a text grid can be rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input had no non-blank lines.
    #[error("grid has no rows")]
    Empty,
    /// A row had a different number of tiles than the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Row index counted from the top, starting at 0.
        row: usize,
        #[allow(missing_docs)]
        expected: usize,
        #[allow(missing_docs)]
        found: usize,
    },
    /// A token could not be read as a tile.
    #[error("unrecognized tile {token:?} at row {row}, column {column}")]
    UnknownToken {
        /// Row index counted from the top, starting at 0.
        row: usize,
        #[allow(missing_docs)]
        column: usize,
        #[allow(missing_docs)]
        token: String,
    },
}

fn type_marker(tile_type: TileType) -> &'static str {
    match tile_type {
        TileType::Hole | TileType::Blank => "",
        TileType::Goal => "e",
        TileType::Crown => "k",
        TileType::Count1 => "m1",
        TileType::Count2 => "m2",
        TileType::Count3 => "m3",
        TileType::Join1 => "j1",
        TileType::Join2 => "j2",
    }
}

fn parse_type(chars: &mut Peekable<Chars>) -> Option<TileType> {
    let tile_type = match chars.peek() {
        Some('e') => TileType::Goal,
        Some('k') => TileType::Crown,
        Some('m') => {
            chars.next();
            return match chars.next()? {
                '1' => Some(TileType::Count1),
                '2' => Some(TileType::Count2),
                '3' => Some(TileType::Count3),
                _ => None,
            };
        }
        Some('j') => {
            chars.next();
            return match chars.next()? {
                '1' => Some(TileType::Join1),
                '2' => Some(TileType::Join2),
                _ => None,
            };
        }
        _ => return Some(TileType::Blank),
    };
    chars.next();
    Some(tile_type)
}

fn parse_tile(token: &str) -> Option<TileData> {
    if token == "_" {
        return Some(TileData::default());
    }
    let mut chars = token.chars().peekable();
    let mut digits = String::new();
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        digits.push(digit);
    }
    let color: TileColor = digits.parse().ok()?;
    let sticky = chars.next_if_eq(&'/').is_some();
    let tile_type = parse_type(&mut chars)?;
    let mut data = TileData { tile_type, color, sticky, ..Default::default() };
    for glyph in chars {
        data.arrows.set(Direction::from_glyph(glyph)?, true);
    }
    Some(data)
}

fn render_tile(data: &TileData) -> String {
    if data.tile_type == TileType::Hole {
        return "_".to_owned();
    }
    format!(
        "{}{}{}{}",
        data.color,
        if data.sticky { "/" } else { "" },
        type_marker(data.tile_type),
        data.arrows.present().map(|direction| direction.glyph()).collect::<String>()
    )
}

impl Grid {
    /// Read a grid in the text format with a palette of `max_colors` colors.
    pub fn parse(text: &str, max_colors: usize) -> Result<Self, ParseError> {
        let rows = text.lines().map(str::trim).filter(|line| !line.is_empty()).collect_vec();
        let width = rows.first().ok_or(ParseError::Empty)?.split_whitespace().count();
        let height = rows.len();

        let mut tiles = Array2::default((height, width));
        for (row, line) in rows.iter().enumerate() {
            let tokens = line.split_whitespace().collect_vec();
            if tokens.len() != width {
                return Err(ParseError::RaggedRow { row, expected: width, found: tokens.len() });
            }
            for (column, token) in tokens.into_iter().enumerate() {
                let data = parse_tile(token).ok_or_else(|| ParseError::UnknownToken {
                    row,
                    column,
                    token: token.to_owned(),
                })?;
                tiles[TileCoord(column, height - 1 - row).as_index()] = data;
            }
        }
        Ok(Grid::from_tiles(tiles, max_colors))
    }
}

/// Writes the grid in the same text format [`Grid::parse`] reads.
impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let tokens = (0..self.height())
            .rev()
            .map(|y| (0..self.width()).map(|x| render_tile(&self[TileCoord(x, y)])).collect_vec())
            .collect_vec();
        let column_width = tokens.iter().flatten().map(String::len).max().unwrap_or_default() + 2;
        for row in tokens {
            let line = row.iter().map(|token| format!("{token:<column_width$}")).collect::<String>();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
