//! Random tile spawner
//!
//! After every accepted move exactly one tile appears: a 2 at p=0.9 or a 4
//! at p=0.1, on an empty cell chosen uniformly. The RNG is injected so
//! sessions replay deterministically from a seed.

use rand::Rng;

use super::engine::SpawnedTile;
use super::grid::Grid;
use crate::consts::FOUR_TILE_PROBABILITY;

/// Place one random tile on an empty cell.
///
/// Returns `None` when the grid is full. That is a signal, not an error:
/// combined with no adjacent equal pair it means the game is over, which
/// the session checks separately.
pub fn spawn<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<SpawnedTile> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let at = empty[rng.random_range(0..empty.len())];
    let value = if rng.random_bool(FOUR_TILE_PROBABILITY) {
        4
    } else {
        2
    };
    grid.set(at, value);
    Some(SpawnedTile { at, value })
}
