use std::io::{self, Read, Write};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use gridspech::{ConstraintFamily, Grid, SolutionStream, SolvingContext, Tile, TileCoord, TileSet, TileType};
use itertools::Itertools;
use log::info;

const BLOCKS: [&str; 10] = ["⬜", "🟥", "🟦", "🟩", "🟨", "🟪", "🟧", "🟫", "⬛", "🔲"];

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// The solved grid in the level text format.
    Lines,
    /// A JSON array of the assigned tiles.
    Json,
    /// Colored squares, one per tile.
    Blocks,
}

/// Solve a gridspech level read from standard input.
#[derive(Parser, Debug)]
#[command(name = "gs-solve", version)]
struct Args {
    /// Palette size, the "none" color included.
    #[arg(short, long, default_value_t = 2)]
    max_colors: usize,
    /// Solve every rule tile and check the whole grid.
    #[arg(short, long)]
    all: bool,
    /// Solve the goal tiles only.
    #[arg(short, long)]
    goals: bool,
    /// Solve the count tiles only.
    #[arg(short = 'd', long)]
    counts: bool,
    /// Solve the crown tiles only.
    #[arg(short, long)]
    crowns: bool,
    /// Solve the join tiles only.
    #[arg(short, long)]
    joins: bool,
    /// Solve only these tiles, given as `x,y`.
    #[arg(short, long, value_parser = parse_coord, num_args = 1..)]
    tiles: Vec<TileCoord>,
    #[arg(short, long, value_enum, default_value_t = Format::Lines)]
    format: Format,
    /// Stop after this many solutions.
    #[arg(long)]
    limit: Option<usize>,
}

fn parse_coord(text: &str) -> Result<TileCoord, String> {
    let (x, y) = text.split_once(',').ok_or_else(|| format!("expected x,y but got {text:?}"))?;
    let parse = |part: &str| part.trim().parse::<usize>().map_err(|e| format!("{part:?}: {e}"));
    Ok(TileCoord(parse(x)?, parse(y)?))
}

fn print_solution(out: &mut impl Write, grid: &Grid, solution: &TileSet, format: Format) -> io::Result<()> {
    match format {
        Format::Lines => {
            let mut solved = grid.clone();
            solved.apply_tile_set(solution);
            writeln!(out, "{solved}")
        }
        Format::Json => {
            let tiles: Vec<Tile> = solution.iter().collect();
            writeln!(out, "{}", serde_json::to_string(&tiles).map_err(io::Error::other)?)
        }
        Format::Blocks => {
            let mut solved = grid.clone();
            solved.apply_tile_set(solution);
            for y in (0..solved.height()).rev() {
                let row = (0..solved.width())
                    .map(|x| match solved.tile(TileCoord(x, y)) {
                        Some(tile) if tile.data.tile_type != TileType::Hole => {
                            BLOCKS.get(usize::from(tile.data.color)).copied().unwrap_or("?")
                        }
                        _ => "  ",
                    })
                    .join("");
                writeln!(out, "{row}")?;
            }
            writeln!(out)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut text = String::new();
    io::stdin().read_to_string(&mut text).context("reading level from stdin")?;
    let grid = Grid::parse(&text, args.max_colors).context("parsing level")?;
    if let Some(outside) = args.tiles.iter().find(|coord| grid.tile(**coord).is_none()) {
        bail!("tile {outside} is outside the {}x{} grid", grid.width(), grid.height());
    }
    let context = SolvingContext::new(&grid);

    let families = [
        (args.goals, ConstraintFamily::Goals),
        (args.counts, ConstraintFamily::Counts),
        (args.crowns, ConstraintFamily::Crowns),
        (args.joins, ConstraintFamily::Joins),
    ]
    .into_iter()
    .filter_map(|(chosen, family)| chosen.then_some(family))
    .collect_vec();

    let stream: SolutionStream = match (args.all, families.as_slice(), args.tiles.is_empty()) {
        (true, [], true) => context.solve_all_tiles(),
        (false, [family], true) => context.solve_family(*family),
        (false, [], false) => context.solve_tiles(&args.tiles),
        _ => bail!("pick exactly one of --all, --tiles, or a single rule family"),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut found = 0;
    for solution in stream.take(args.limit.unwrap_or(usize::MAX)) {
        print_solution(&mut out, &grid, &solution, args.format)?;
        found += 1;
    }
    info!("{found} solutions");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_from_flags() {
        assert_eq!(parse_coord("2, 0"), Ok(TileCoord(2, 0)));
        assert!(parse_coord("2").is_err());
        assert!(parse_coord("a,1").is_err());
    }

    #[test]
    fn block_rendering() {
        let grid = Grid::parse("1 _ 0", 2).unwrap();
        let mut out = Vec::new();
        print_solution(&mut out, &grid, &TileSet::new(), Format::Blocks).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}  {}\n\n", BLOCKS[1], BLOCKS[0]));
    }
}
