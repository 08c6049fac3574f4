//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable update order (player, then ghosts in house order)
//! - No rendering or platform dependencies

pub mod game;
pub mod ghost;
pub mod maze;
pub mod path;
pub mod player;

pub use game::{Game, GameEvent, Mode, TickInput, tick};
pub use ghost::{Ghost, Personality, standard_four};
pub use maze::{Maze, Tile};
pub use path::{PathGrid, astar, backtrack, dijkstra, manhattan};
pub use player::Player;
