#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use itertools::Itertools;

    use crate::combinatorics::{all_pairing_sets, Permutations};
    use crate::serialize::ParseError;
    use crate::{
        ConstraintFamily, Direction, Grid, SolverConfig, SolvingContext, Tile, TileColor, TileCoord, TileCoordSet,
        TileSet, TileType,
    };

    fn grid(text: &str, max_colors: usize) -> Grid {
        Grid::parse(text, max_colors).unwrap()
    }

    /// Rows top first, separated by `|`. Digits are colors, spaces are tiles left out of the set.
    fn tiles(grid: &Grid, text: &str) -> TileSet {
        let rows = text.split('|').collect_vec();
        rows.iter()
            .enumerate()
            .flat_map(|(row, line)| {
                let y = rows.len() - row - 1;
                line.chars().enumerate().filter_map(move |(x, glyph)| {
                    glyph.to_digit(10).map(|color| grid.tile_at(TileCoord(x, y)).with_color(color as TileColor))
                })
            })
            .collect()
    }

    fn coords(text: &str) -> TileCoordSet {
        let rows = text.split('|').collect_vec();
        rows.iter()
            .enumerate()
            .flat_map(|(row, line)| {
                let y = rows.len() - row - 1;
                line.chars().positions(|glyph| glyph != ' ').map(move |x| TileCoord(x, y))
            })
            .collect()
    }

    fn assert_solutions(grid: &Grid, found: impl Iterator<Item = TileSet>, expected: &[&str]) {
        let found = found.collect_vec();
        let unique: HashSet<TileSet> = found.iter().cloned().collect();
        assert_eq!(unique.len(), found.len(), "duplicate solutions in {:?}", found.iter().map(TileSet::to_string).collect_vec());
        let expected: HashSet<TileSet> = expected.iter().map(|text| tiles(grid, text)).collect();
        assert_eq!(
            unique.iter().map(TileSet::to_string).sorted().collect_vec(),
            expected.iter().map(TileSet::to_string).sorted().collect_vec()
        );
        assert_eq!(unique, expected);
    }

    const LEVEL_A1: &str = "1/e 0 0 0e";

    const LEVEL_A3: &str = "
_    0    0    0    _
1/e  0    0/   0    0e
_    0    0    0    _
";

    const LEVEL_A4: &str = "
1/e  0    0e
0    0    1/
";

    const LEVEL_G4: &str = "
0m3<^v>  _        0<^v>    _        _        _        0<^v>    _
0<^v>    0m2^v    0m1^v    0m3^v    0^v      0m2^v    0m3^v    0m1<^v>
";

    #[test]
    fn parse_reads_every_tile_part() {
        let grid = grid("1/e  0    0e\n0    0m1  1/<^\n_    0j1  0k\n", 2);
        assert_eq!((grid.width(), grid.height()), (3, 3));

        let goal = grid[TileCoord(0, 2)];
        assert_eq!((goal.tile_type, goal.color, goal.sticky), (TileType::Goal, 1, true));
        assert_eq!(grid[TileCoord(1, 1)].tile_type, TileType::Count1);
        assert_eq!(grid[TileCoord(0, 0)].tile_type, TileType::Hole);
        assert_eq!(grid[TileCoord(1, 0)].tile_type, TileType::Join1);
        assert_eq!(grid[TileCoord(2, 0)].tile_type, TileType::Crown);

        let arrows = grid[TileCoord(2, 1)].arrows;
        assert!(arrows.north && arrows.west && !arrows.east && !arrows.south);
    }

    #[test]
    fn render_round_trips() {
        let grid = grid("1/e  0    0e\n0    0m1  1/<^\n_    0j1  0k\n", 2);
        assert_eq!(format!("{}", grid), "1/e   0     0e
0     0m1   1/^<
_     0j1   0k
");
        assert_eq!(Grid::parse(&grid.to_string(), 2).unwrap(), grid);

        let g4 = self::grid(LEVEL_G4, 2);
        assert_eq!(Grid::parse(&g4.to_string(), 2).unwrap(), g4);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(Grid::parse("\n  \n", 2), Err(ParseError::Empty));
        assert_eq!(Grid::parse("0 0\n0", 2), Err(ParseError::RaggedRow { row: 1, expected: 2, found: 1 }));
        assert_eq!(
            Grid::parse("0 0x", 2),
            Err(ParseError::UnknownToken { row: 0, column: 1, token: "0x".to_owned() })
        );
        assert!(Grid::parse("e", 2).is_err());
        assert!(Grid::parse("0m4", 2).is_err());
    }

    #[test]
    fn plain_neighbors() {
        let grid = grid("0 0 0\n0 _ 0", 2);
        assert_eq!(grid.neighbors(TileCoord(0, 0)), vec![TileCoord(0, 1)]);
        assert_eq!(grid.neighbors(TileCoord(1, 1)), vec![TileCoord(2, 1), TileCoord(0, 1)]);
        assert!(grid.neighbors(TileCoord(1, 0)).is_empty());
        assert_eq!(grid.neighbor(TileCoord(2, 1), Direction::East), None);
    }

    #[test]
    fn arrows_wrap_past_holes() {
        let grid = grid("0   _   0\n0>  _   0", 2);
        assert_eq!(grid.neighbor(TileCoord(0, 0), Direction::East), Some(TileCoord(2, 0)));
        assert_eq!(grid.neighbor(TileCoord(0, 0), Direction::West), None);
        // one-sided, but linked both ways
        assert_eq!(grid.neighbor(TileCoord(2, 0), Direction::West), None);
        assert!(grid.linked(TileCoord(2, 0)).contains(&TileCoord(0, 0)));
        assert_eq!(grid.blob(TileCoord(2, 0), |_| true), TileCoordSet::from([TileCoord(0, 0), TileCoord(2, 0), TileCoord(0, 1), TileCoord(2, 1)]));
    }

    #[test]
    fn arrows_can_make_a_tile_its_own_neighbor() {
        let grid = grid("_\n0m2^v", 2);
        assert_eq!(grid.neighbors(TileCoord(0, 0)), vec![TileCoord(0, 0), TileCoord(0, 0)]);
        assert_eq!(grid.neighbor_set(TileCoord(0, 0), |_| true).len(), 1);
        assert!(!grid.valid_tile(TileCoord(0, 0)));

        let colored = self::grid("_\n1m2^v", 2);
        assert!(colored.valid_tile(TileCoord(0, 0)));

        let join = self::grid("_\n1j1^v", 2);
        assert_eq!(join.blob(TileCoord(0, 0), |_| true), coords("|x"));
        assert!(!join.valid_tile(TileCoord(0, 0)));
        assert!(self::grid("_\n1k^v", 2).valid());
    }

    #[test]
    fn blobs_follow_color() {
        let grid = grid("1 1 0\n0 1 1", 2);
        assert_eq!(grid.blob(TileCoord(0, 1), |_| true), coords("xx | xx"));
        assert_eq!(grid.blob(TileCoord(2, 1), |_| true), coords("  x|"));
        assert_eq!(grid.blob(TileCoord(0, 1), |tile| tile.coord.1 == 1), coords("xx |"));
    }

    #[test]
    fn goal_rules() {
        assert!(grid("1e 1 1e", 2).valid());
        assert!(!grid("1e 1 0 1e", 2).valid_tile(TileCoord(0, 0)));
        assert!(!grid("1e 1 1", 2).valid_tile(TileCoord(0, 0)));
        // the path touches itself
        assert!(!grid("1e 1 1\n0 1 1\n0 1e 0", 2).valid_tile(TileCoord(0, 2)));
        assert!(grid("1e 0 1e\n1 1 1", 2).valid());
    }

    #[test]
    fn count_rules() {
        assert!(grid("1 0m1 0", 2).valid());
        assert!(!grid("1 0m1 1", 2).valid());
        assert!(grid("1 0m2 1", 2).valid());
        assert!(grid("0 1 0\n1 0m3 1\n0 0 0", 2).valid());
    }

    #[test]
    fn crown_rules() {
        assert!(grid("1k 1 0", 2).valid());
        assert!(!grid("1k 0 1", 2).valid());
        assert!(!grid("1k 1k", 2).valid());
        assert!(grid("1k 0 1k", 2).valid());
    }

    #[test]
    fn join_rules() {
        let grid = grid("0j1 0 0e", 2);
        assert!(grid.valid_tile(TileCoord(0, 0)));
        assert!(!grid.valid_tile(TileCoord(2, 0)));
        assert!(!self::grid("0j1 0 0", 2).valid());
        assert!(!self::grid("0j1 0 0e 0k", 2).valid_tile(TileCoord(0, 0)));
        assert!(self::grid("0j2 0 0e 0k", 2).valid_tile(TileCoord(0, 0)));
        assert!(!self::grid("0j1 1 0j1", 2).valid());
        assert!(self::grid("0j1 0 0j1", 2).valid());
    }

    #[test]
    fn validity_ignores_application_order() {
        let grid = grid("0e 0 0e\n0 0m1 0", 2);
        for (text, valid) in [("111|0 0", true), ("101|0 0", false), ("111|1 0", false)] {
            let solution = tiles(&grid, text);
            let mut whole = grid.clone();
            whole.apply_tile_set(&solution);
            assert_eq!(whole.valid(), valid, "{text}");
            for order in solution.iter().permutations(solution.len()) {
                let mut applied = grid.clone();
                for tile in order {
                    applied.apply_tile_set(&[tile].into_iter().collect::<TileSet>());
                }
                assert_eq!(applied, whole);
                assert_eq!(applied.valid(), valid, "{text}");
            }
        }
    }

    #[test]
    fn applying_updates_colors_and_links() {
        let mut grid = grid("0 0 0", 2);
        grid.apply_tile_set(&tiles(&grid, "11 "));
        assert_eq!(grid.blob(TileCoord(0, 0), |_| true), coords("xx "));

        let mut wrapped = grid[TileCoord(2, 0)];
        wrapped.arrows.set(Direction::East, true);
        grid.apply_tile_set(&[Tile { coord: TileCoord(2, 0), data: wrapped }].into_iter().collect::<TileSet>());
        assert_eq!(grid.neighbor(TileCoord(2, 0), Direction::East), Some(TileCoord(0, 0)));

        let context = SolvingContext::new(&grid).applied(&tiles(&grid, "1  "));
        assert!(!context.is_unknown(TileCoord(0, 0)));
        assert!(context.is_unknown(TileCoord(1, 0)));
    }

    #[test]
    fn pairing_sets() {
        assert_eq!(all_pairing_sets(0), vec![vec![]]);
        assert_eq!(all_pairing_sets(1), vec![vec![(0, 1)]]);
        assert_eq!(all_pairing_sets(2), vec![vec![(0, 1), (2, 3)], vec![(0, 2), (1, 3)], vec![(0, 3), (1, 2)]]);
        let three = all_pairing_sets(3);
        assert_eq!(three.len(), 15);
        for pairing in three {
            assert_eq!(pairing.iter().flat_map(|(a, b)| [*a, *b]).sorted().collect_vec(), (0..6).collect_vec());
        }
    }

    #[test]
    fn permutations() {
        assert_eq!(
            Permutations::new(2, 2).collect_vec(),
            vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );
        assert_eq!(Permutations::new(3, 3).count(), 27);
        assert_eq!(Permutations::new(0, 0).collect_vec(), vec![Vec::<usize>::new()]);
        assert_eq!(Permutations::new(4, 0).count(), 1);
        assert_eq!(Permutations::new(0, 2).count(), 0);
    }

    #[test]
    fn path_through_a_row() {
        let grid = grid(LEVEL_A1, 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.find_paths(TileCoord(0, 0), TileCoord(3, 0), 1), &["1111"]);
        // the sticky start is not color 0
        assert_eq!(context.find_paths(TileCoord(0, 0), TileCoord(3, 0), 0).count(), 0);
    }

    #[test]
    fn paths_around_an_obstacle() {
        let grid = grid(LEVEL_A3, 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(
            &grid,
            context.find_paths(TileCoord(0, 1), TileCoord(4, 1), 1),
            &[" 111 |11 11| 0 0 ", " 0 0 |11 11| 111 "],
        );
    }

    #[test]
    fn path_must_not_touch_the_end_early() {
        let grid = grid(LEVEL_A4, 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.find_paths(TileCoord(0, 1), TileCoord(2, 1), 1), &["101|111"]);
    }

    #[test]
    fn uncolored_path_is_fenced_with_color() {
        let grid = grid("1/ 0 0 1/\n0/e 0 0 0e\n1/ 0 0 1/", 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.find_paths(TileCoord(0, 1), TileCoord(3, 1), 0), &[" 11 |0000| 11 "]);
    }

    #[test]
    fn shapes_in_a_square() {
        let grid = grid("0 0\n0 0", 2);
        let context = SolvingContext::new(&grid);
        let shapes = context.shapes_containing(TileCoord(1, 0), 1).collect_vec();
        assert_eq!(
            shapes.iter().cloned().collect::<HashSet<_>>(),
            ["  | x", " x| x", "  |xx", "xx| x", " x|xx", "x |xx", "xx|xx"].map(coords).into_iter().collect::<HashSet<_>>()
        );
        assert_eq!(shapes.len(), 7);
        assert!(shapes.iter().map(|shape| shape.len()).tuple_windows().all(|(a, b)| a <= b));
    }

    #[test]
    fn shapes_in_a_rectangle() {
        let grid = grid("0 0 0\n0 0 0", 2);
        let context = SolvingContext::new(&grid);
        let shapes = context.shapes_containing(TileCoord(2, 0), 0).collect_vec();
        assert_eq!(shapes.len(), 19);
        assert_eq!(shapes.iter().unique().count(), 19);
        assert!(shapes.iter().all(|shape| shape.contains(&TileCoord(2, 0))));
    }

    #[test]
    fn shapes_avoid_holes_and_other_colors() {
        let grid = grid("0 _ 0\n0/ 0 0", 2);
        let context = SolvingContext::new(&grid);
        let shapes = context.shapes_containing(TileCoord(1, 0), 1).collect::<HashSet<_>>();
        assert_eq!(shapes, [" x ", " xx", "  x| xx"].map(coords).into_iter().collect::<HashSet<_>>());

        let blocked = self::grid("0 0 0\n0 0/ 0/\n0/ 0 0", 2);
        let context = SolvingContext::new(&blocked);
        let shapes = context.shapes_containing(TileCoord(2, 0), 1).collect::<HashSet<_>>();
        assert_eq!(shapes, ["  x", " xx"].map(coords).into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn shapes_swallow_known_blobs() {
        let grid = grid("0 1/ 0", 2);
        let context = SolvingContext::new(&grid);
        let shapes = context.shapes_containing(TileCoord(2, 0), 1).collect_vec();
        assert_eq!(shapes, vec![coords(" xx"), coords("xxx")]);
        // a seed of another, fixed color grows nothing
        assert_eq!(context.shapes_containing(TileCoord(1, 0), 0).count(), 0);
    }

    #[test]
    fn pruned_shapes_are_not_grown() {
        let grid = grid("0 0 0", 2);
        let context = SolvingContext::new(&grid);
        let mut shapes = context.shapes_containing(TileCoord(0, 0), 0);
        assert_eq!(shapes.next(), Some(coords("x  ")));
        shapes.prune();
        assert_eq!(shapes.next(), None);
    }

    #[test]
    fn border_decorations() {
        let grid = grid("0 0\n0 0", 2);
        let context = SolvingContext::new(&grid);
        let shape = context.colored(&coords("  | x"), 0);
        assert_solutions(&grid, context.decorate_border(0, shape.clone()), &[" 1|10"]);

        let grid = self::grid("0 0\n0 0", 3);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.decorate_border(0, shape), &[" 1|10", " 2|10", " 1|20", " 2|20"]);
    }

    #[test]
    fn count_one_in_the_middle() {
        let grid = grid("0 0 0\n0 0m1 0\n0 0 0", 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(
            &grid,
            context.solve_count(TileCoord(1, 1)),
            &[" 1 |   |   ", "   |1  |   ", "   |  1|   ", "   |   | 1 "],
        );
    }

    #[test]
    fn count_two_in_the_middle() {
        let grid = grid("0 0 0\n0 0m2 0\n0 0 0", 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(
            &grid,
            context.solve_counts(),
            &[" 1 |1  |   ", " 1 |  1|   ", " 1 |   | 1 ", "   |1 1|   ", "   |1  | 1 ", "   |  1| 1 "],
        );
    }

    #[test]
    fn count_with_known_neighbors() {
        let grid = grid("1/ 0m1 0", 3);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.solve_count(TileCoord(1, 0)), &[""]);
        let crowded = self::grid("1/ 0m1 1/", 2);
        assert_eq!(SolvingContext::new(&crowded).solve_count(TileCoord(1, 0)).count(), 0);
        let palette = self::grid("0 0m1", 3);
        assert_solutions(&palette, SolvingContext::new(&palette).solve_count(TileCoord(1, 0)), &["1 ", "2 "]);
    }

    #[test]
    fn count_sees_repeated_neighbors() {
        let grid = grid("_\n0m2^v", 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.solve_count(TileCoord(0, 0)), &["|1"]);
    }

    #[test]
    fn counts_around_arrows() {
        let grid = grid(LEVEL_G4, 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.solve_counts(), &["      1 |1 11 1  "]);
    }

    #[test]
    fn crown_territories() {
        let grid = grid("0 0 0k", 3);
        let context = SolvingContext::new(&grid);
        assert_solutions(
            &grid,
            context.solve_crowns(),
            &[
                "000", " 10", "100", " 20", "200", "111", " 01", " 21", "011", "211", "222", " 02", " 12", "022",
                "122",
            ],
        );
    }

    #[test]
    fn crowns_keep_apart() {
        let grid = grid("0k 0 0k", 2);
        let context = SolvingContext::new(&grid);
        let solutions = context.solve_crowns().collect_vec();
        assert!(!solutions.is_empty());
        for solution in solutions {
            let applied = context.applied(&solution);
            assert!(applied.grid().blob(TileCoord(0, 0), |_| true).len() < 3);
        }
    }

    #[test]
    fn joins_in_a_row() {
        let grid = grid("0j1 0 0 0j1", 3);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.solve_joins(), &["0000", "1111", "2222"]);
        assert_solutions(&grid, context.solve_family(ConstraintFamily::Joins), &["0000", "1111", "2222"]);
        assert_solutions(&grid, context.solve_tiles(&[TileCoord(0, 0), TileCoord(3, 0)]), &["0000", "1111", "2222"]);
    }

    #[test]
    fn join_fenced_from_its_partner() {
        let grid = grid("0j1 0 0j1 0 0", 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(
            &grid,
            context.solve_join(TileCoord(0, 0)),
            &["0001 ", "1110 ", "00001", "11110", "00000", "11111"],
        );
    }

    #[test]
    fn joins_leave_goals_as_path_ends() {
        let single = grid("0j1 0e 0", 2);
        assert_eq!(SolvingContext::new(&single).solve_join(TileCoord(0, 0)).count(), 0);
        let branching = grid("0j2 0e 0 0e", 2);
        assert_eq!(SolvingContext::new(&branching).solve_join(TileCoord(0, 0)).count(), 0);
        let threaded = grid("0e 0 0j2 0 0e", 2);
        assert_solutions(&threaded, SolvingContext::new(&threaded).solve_join(TileCoord(2, 0)), &["00000", "11111"]);
    }

    #[test]
    fn goal_pairs() {
        let grid = grid(LEVEL_A4, 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.solve_goals(), &["101|111"]);
        assert_solutions(&grid, context.solve_tile(TileCoord(0, 1)), &["101|111"]);
    }

    #[test]
    fn goals_pair_up_or_not_at_all() {
        let none = grid("0 0 0", 2);
        assert_solutions(&none, SolvingContext::new(&none).solve_goals(), &[""]);
        let odd = grid("0e 0 0e 0e", 2);
        assert_eq!(SolvingContext::new(&odd).solve_goals().count(), 0);
    }

    #[test]
    fn two_goal_pairs() {
        let grid = grid("1/e 1/e\n0 0\n2/e 2/e", 3);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.solve_goals(), &["11|00|22"]);
    }

    #[test]
    fn solve_everything() {
        let grid = grid(LEVEL_A1, 2);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.solve_all_tiles(), &["1111"]);

        let mixed = self::grid("0 0m1 0\n1/e 0 1/e", 2);
        let context = SolvingContext::new(&mixed);
        assert_solutions(&mixed, context.solve_all_tiles(), &["000|111"]);
        for solution in context.solve_all_tiles() {
            assert!(context.applied(&solution).grid().valid());
        }
    }

    #[test]
    fn solve_everything_with_territories() {
        let grid = grid("0j1 0 0j1\n0 0 0k", 2);
        let context = SolvingContext::new(&grid);
        let solutions = context.solve_all_tiles().collect_vec();
        assert!(!solutions.is_empty());
        for solution in solutions {
            assert!(context.applied(&solution).grid().valid(), "{solution}");
        }
    }

    #[test]
    fn fill_remaining_unknowns() {
        let grid = grid("0/ 0 1/ 0", 3);
        let context = SolvingContext::new(&grid);
        assert_solutions(&grid, context.fill_unknowns(), &[" 1  ", " 2  "]);
        let settled = self::grid("0/ 1/", 3);
        assert_solutions(&settled, SolvingContext::new(&settled).fill_unknowns(), &[""]);
    }

    #[test]
    fn small_channels_and_early_drops() {
        let grid = grid("0 0 0k", 3);
        let mut config = SolverConfig::default();
        config.channel_capacity(1).search_threads(1);
        let context = SolvingContext::new(&grid).with_config(config);
        assert_eq!(context.solve_crowns().count(), 15);
        assert_eq!(context.solve_crowns().take(2).count(), 2);
        assert_eq!(context.solve_all_tiles().take(1).count(), 1);
    }

    #[test]
    fn set_rendering() {
        assert_eq!(coords(" x|x ").to_string(), "{ x|x }");
        let grid = grid("0 0\n0 0", 3);
        assert_eq!(tiles(&grid, "2 |01").to_string(), "{2 |01}");
        assert_eq!(TileSet::new().merged(&tiles(&grid, "1 | 1")), Some(tiles(&grid, "1 | 1")));
        assert_eq!(tiles(&grid, "  |01").merged(&tiles(&grid, "  |11")), None);
    }
}
