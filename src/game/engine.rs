//! The grid transition engine
//!
//! One directional move, computed as a pure function: compaction, merges,
//! and a structured report of every tile that slid, merged, or (later)
//! spawned. The presentation layer animates straight from the report and
//! never has to diff grids itself.

use serde::{Deserialize, Serialize};

use super::grid::{Coord, Grid};
use crate::consts::GRID_SIZE;

/// A direction to slide/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, handy for probing whether any move is legal.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The axis of the lines this direction compacts.
    pub fn axis(self) -> LineAxis {
        match self {
            Direction::Left | Direction::Right => LineAxis::Row,
            Direction::Up | Direction::Down => LineAxis::Column,
        }
    }
}

/// Whether a move descriptor's line runs along a row or a column.
///
/// Carried explicitly on every descriptor so consumers never have to infer
/// the axis from which coordinate happened to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineAxis {
    Row,
    Column,
}

/// A tile that slid to a new cell without merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMove {
    pub axis: LineAxis,
    pub from: Coord,
    pub to: Coord,
    pub value: u32,
}

/// Two equal-valued tiles that combined into one of double the value.
///
/// `from` lists the origins in traversal order, nearer the compaction edge
/// first. `value` is the resulting (doubled) value and is also the score
/// contribution of this merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMerge {
    pub axis: LineAxis,
    pub from: [Coord; 2],
    pub to: Coord,
    pub value: u32,
}

/// The tile added to a random empty cell after an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedTile {
    pub at: Coord,
    pub value: u32,
}

/// Everything the presentation layer needs to animate one transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Tiles that slid without merging.
    pub moves: Vec<TileMove>,
    /// Merges, each contributing its resulting value to the score.
    pub merges: Vec<TileMerge>,
    /// The spawn that followed the move (appended by the session).
    pub spawned: Option<SpawnedTile>,
    /// Sum of merge values produced by this transition.
    pub score_delta: u32,
    /// False means the move was a no-op: nothing slid, nothing merged,
    /// nothing may be spawned and no turn is consumed.
    pub did_change: bool,
}

/// Cells of one line in traversal order: index 0 is the edge tiles
/// compact toward.
fn line_coords(direction: Direction, line: usize) -> [Coord; GRID_SIZE] {
    let mut coords = [Coord::new(0, 0); GRID_SIZE];
    for (slot, coord) in coords.iter_mut().enumerate() {
        *coord = match direction {
            Direction::Left => Coord::new(line, slot),
            Direction::Right => Coord::new(line, GRID_SIZE - 1 - slot),
            Direction::Up => Coord::new(slot, line),
            Direction::Down => Coord::new(GRID_SIZE - 1 - slot, line),
        };
    }
    coords
}

/// Slide and merge every line toward `direction`'s edge.
///
/// Pure: builds and returns a whole new grid, every line rebuilt, for all
/// four directions alike. If no line changes, the input grid is handed back
/// untouched with an empty report (`did_change == false`).
pub fn apply_direction(grid: &Grid, direction: Direction) -> (Grid, MoveReport) {
    let mut next = Grid::empty();
    let mut report = MoveReport::default();
    let axis = direction.axis();

    for line in 0..GRID_SIZE {
        let coords = line_coords(direction, line);

        // Compaction pass: occupied cells in traversal order, origins kept.
        let occupied: Vec<(Coord, u32)> = coords
            .iter()
            .map(|&c| (c, grid.get(c)))
            .filter(|&(_, v)| v != 0)
            .collect();

        // Merge scan from the compaction edge inward. A tile merges at most
        // once per move: {2,2,2} collapses only its first pair.
        let mut slot = 0;
        let mut i = 0;
        while i < occupied.len() {
            let (from, value) = occupied[i];
            let to = coords[slot];
            if i + 1 < occupied.len() && occupied[i + 1].1 == value {
                let merged = value * 2;
                next.set(to, merged);
                report.merges.push(TileMerge {
                    axis,
                    from: [from, occupied[i + 1].0],
                    to,
                    value: merged,
                });
                report.score_delta += merged;
                i += 2;
            } else {
                next.set(to, value);
                if from != to {
                    report.moves.push(TileMove {
                        axis,
                        from,
                        to,
                        value,
                    });
                }
                i += 1;
            }
            slot += 1;
        }
        // Slots past `slot` stay zero: the line re-expands with empties at
        // the far edge.
    }

    if next == *grid {
        return (*grid, MoveReport::default());
    }
    report.did_change = true;
    (next, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_grid(row: [u32; 4]) -> Grid {
        Grid::from_rows([row, [0; 4], [0; 4], [0; 4]])
    }

    #[test]
    fn pair_merges_toward_left_edge() {
        let (next, report) = apply_direction(&row_grid([2, 2, 0, 0]), Direction::Left);
        assert_eq!(next, row_grid([4, 0, 0, 0]));
        assert_eq!(report.score_delta, 4);
        assert!(report.did_change);
        assert!(report.moves.is_empty());
        assert_eq!(
            report.merges,
            vec![TileMerge {
                axis: LineAxis::Row,
                from: [Coord::new(0, 0), Coord::new(0, 1)],
                to: Coord::new(0, 0),
                value: 4,
            }]
        );
    }

    #[test]
    fn lone_tile_slides_without_scoring() {
        let (next, report) = apply_direction(&row_grid([0, 0, 0, 2]), Direction::Left);
        assert_eq!(next, row_grid([2, 0, 0, 0]));
        assert_eq!(report.score_delta, 0);
        assert!(report.merges.is_empty());
        assert_eq!(
            report.moves,
            vec![TileMove {
                axis: LineAxis::Row,
                from: Coord::new(0, 3),
                to: Coord::new(0, 0),
                value: 2,
            }]
        );
    }

    #[test]
    fn triple_merges_only_the_first_pair() {
        let (next, report) = apply_direction(&row_grid([2, 2, 2, 0]), Direction::Left);
        assert_eq!(next, row_grid([4, 2, 0, 0]));
        assert_eq!(report.merges.len(), 1);
        assert_eq!(
            report.merges[0].from,
            [Coord::new(0, 0), Coord::new(0, 1)]
        );
        // The third 2 slides into the slot the pair vacated.
        assert_eq!(
            report.moves,
            vec![TileMove {
                axis: LineAxis::Row,
                from: Coord::new(0, 2),
                to: Coord::new(0, 1),
                value: 2,
            }]
        );
    }

    #[test]
    fn gap_then_pair_merges_from_the_edge_first() {
        let (next, report) = apply_direction(&row_grid([2, 0, 2, 2]), Direction::Left);
        assert_eq!(next, row_grid([4, 2, 0, 0]));
        assert_eq!(report.merges.len(), 1);
        assert_eq!(
            report.merges[0].from,
            [Coord::new(0, 0), Coord::new(0, 2)]
        );
        assert_eq!(report.moves.len(), 1);
        assert_eq!(report.moves[0].from, Coord::new(0, 3));
        assert_eq!(report.moves[0].to, Coord::new(0, 1));
    }

    #[test]
    fn four_equal_tiles_merge_into_two_pairs() {
        let (next, report) = apply_direction(&row_grid([2, 2, 2, 2]), Direction::Left);
        assert_eq!(next, row_grid([4, 4, 0, 0]));
        assert_eq!(report.merges.len(), 2);
        assert_eq!(report.score_delta, 8);
    }

    #[test]
    fn right_compacts_toward_the_right_edge() {
        let (next, report) = apply_direction(&row_grid([2, 2, 0, 4]), Direction::Right);
        assert_eq!(next, row_grid([0, 0, 4, 4]));
        assert_eq!(report.score_delta, 4);
        assert_eq!(report.merges[0].to, Coord::new(0, 2));
        // Traversal for Right runs right-to-left, so the origin nearer the
        // edge comes first.
        assert_eq!(
            report.merges[0].from,
            [Coord::new(0, 1), Coord::new(0, 0)]
        );
    }

    #[test]
    fn columns_move_with_column_axis() {
        let grid = Grid::from_rows([
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [4, 0, 0, 0],
        ]);
        let (next, report) = apply_direction(&grid, Direction::Up);
        assert_eq!(
            next,
            Grid::from_rows([
                [4, 0, 0, 0],
                [4, 0, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ])
        );
        assert_eq!(report.merges.len(), 1);
        assert_eq!(report.merges[0].axis, LineAxis::Column);
        assert_eq!(report.merges[0].to, Coord::new(0, 0));
        assert_eq!(report.moves.len(), 1);
        assert_eq!(report.moves[0].from, Coord::new(3, 0));
        assert_eq!(report.moves[0].to, Coord::new(1, 0));
    }

    #[test]
    fn down_compacts_toward_the_bottom_edge() {
        let grid = Grid::from_rows([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [2, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        let (next, report) = apply_direction(&grid, Direction::Down);
        assert_eq!(
            next,
            Grid::from_rows([
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [4, 0, 0, 0],
            ])
        );
        assert_eq!(report.merges[0].to, Coord::new(3, 0));
    }

    #[test]
    fn noop_move_returns_the_grid_untouched() {
        let grid = row_grid([2, 4, 0, 0]);
        let (next, report) = apply_direction(&grid, Direction::Left);
        assert_eq!(next, grid);
        assert!(!report.did_change);
        assert_eq!(report, MoveReport::default());
    }

    #[test]
    fn repeated_move_is_a_noop_once_lines_settle() {
        let grid = Grid::from_rows([
            [2, 2, 8, 0],
            [0, 8, 0, 8],
            [2, 0, 0, 2],
            [0, 0, 4, 4],
        ]);
        let (once, first) = apply_direction(&grid, Direction::Left);
        assert!(first.did_change);
        assert_eq!(
            once,
            Grid::from_rows([
                [4, 8, 0, 0],
                [16, 0, 0, 0],
                [4, 0, 0, 0],
                [8, 0, 0, 0],
            ])
        );
        let (_, second) = apply_direction(&once, Direction::Left);
        assert!(!second.did_change);
    }

    #[test]
    fn merge_may_expose_a_new_pair_for_the_next_move() {
        // The single-merge-per-transition rule means a second move in the
        // same direction is not always a no-op: the pair it creates at the
        // edge merges on the next turn, never in the same one.
        let (once, _) = apply_direction(&row_grid([4, 2, 2, 0]), Direction::Left);
        assert_eq!(once, row_grid([4, 4, 0, 0]));
        let (twice, second) = apply_direction(&once, Direction::Left);
        assert!(second.did_change);
        assert_eq!(twice, row_grid([8, 0, 0, 0]));
    }

    #[test]
    fn merging_preserves_tile_sum() {
        let grid = Grid::from_rows([
            [2, 2, 4, 4],
            [8, 0, 8, 2],
            [0, 2, 0, 2],
            [16, 16, 2, 0],
        ]);
        let (next, report) = apply_direction(&grid, Direction::Left);
        assert!(report.did_change);
        assert_eq!(next.tile_sum(), grid.tile_sum());
    }
}
