//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Moves are pure functions of (grid, direction)
//! - Seeded RNG only, injected at session construction
//! - Stable cell ordering (row-major) wherever order is observable
//! - No rendering or platform dependencies

pub mod engine;
pub mod grid;
pub mod session;
pub mod spawn;

pub use engine::{
    Direction, LineAxis, MoveReport, SpawnedTile, TileMerge, TileMove, apply_direction,
};
pub use grid::{Coord, Grid};
pub use session::{GameEnd, Phase, Session, SessionEvent};
pub use spawn::spawn;
