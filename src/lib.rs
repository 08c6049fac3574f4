//! Pellet Chase - a maze pursuit arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, agents, pathfinding, game state)
//! - `render`: Drawing primitives and scene composition
//! - `input`: Per-tick key snapshots and edge detection
//! - `effects`: Cosmetic particle pool
//! - `highscore`: Single-value high score persistence
//! - `settings`: User preferences

pub mod effects;
pub mod highscore;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use highscore::HighScoreFile;
pub use settings::{GlyphPreset, Settings};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    use glam::{IVec2, Vec2};

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Maze dimensions in tiles
    pub const MAZE_WIDTH: i32 = 28;
    pub const MAZE_HEIGHT: i32 = 31;
    /// One tile in screen pixels (render coordinates only; the sim works in tile units)
    pub const TILE_PIXELS: f32 = 32.0;

    /// Player movement speed (tiles per second)
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Half-width of the player's collision box (tiles)
    pub const PLAYER_HALF_WIDTH: f32 = 0.4;
    /// How far ahead of the player a desired turn is probed (tiles)
    pub const TURN_LOOKAHEAD: f32 = 0.5;

    /// Ghost base speed (tiles per second)
    pub const GHOST_BASE_SPEED: f32 = 3.5;
    /// Speed multiplier while frightened
    pub const FRIGHTENED_SPEED_FACTOR: f32 = 0.7;
    /// Speed multiplier while returning home after being eaten
    pub const RETURN_SPEED_FACTOR: f32 = 2.0;
    /// Chase/flee path recompute interval (seconds)
    pub const REPLAN_INTERVAL: f32 = 0.1;
    /// Return-home path recompute interval (seconds)
    pub const RETURN_REPLAN_INTERVAL: f32 = 0.3;
    /// A path waypoint counts as reached within this distance (tiles)
    pub const WAYPOINT_RADIUS: f32 = 0.1;
    /// An eaten ghost revives within this distance of the ghost house (tiles)
    pub const HOME_RADIUS: f32 = 0.5;
    /// The cell eaten ghosts navigate back to
    pub const GHOST_HOME: IVec2 = IVec2::new(13, 14);

    /// Power-up duration after a pellet pickup (seconds)
    pub const POWER_UP_DURATION: f32 = 8.0;
    /// One inactive ghost is released every time this much time accumulates
    pub const GHOST_RELEASE_INTERVAL: f32 = 2.0;
    /// Player/ghost contact distance (tiles)
    pub const COLLISION_RADIUS: f32 = 0.3;

    /// Fixed spawn coordinates (tile units)
    pub const PLAYER_SPAWN: Vec2 = Vec2::new(13.5, 29.5);
    pub const GHOST_SPAWNS: [Vec2; 4] = [
        Vec2::new(13.5, 11.0),
        Vec2::new(11.5, 14.0),
        Vec2::new(13.5, 14.0),
        Vec2::new(15.5, 14.0),
    ];

    /// Scoring
    pub const DOT_POINTS: u32 = 10;
    pub const PELLET_POINTS: u32 = 50;
    /// First ghost of a power-up window; doubles per consecutive ghost
    pub const GHOST_BASE_POINTS: u32 = 200;
    pub const START_LIVES: u32 = 3;

    /// "LEVEL N" banner display time after a level clear (seconds)
    pub const LEVEL_BANNER_SECS: f32 = 2.0;
}

/// Grid cell an agent occupies for walkability checks (floor rule, ghosts)
#[inline]
pub fn cell_of(pos: Vec2) -> IVec2 {
    IVec2::new(pos.x.floor() as i32, pos.y.floor() as i32)
}

/// Grid cell whose center is nearest the position (round rule).
///
/// Used for the player's collectible pickup; more forgiving at cell
/// boundaries than the ghosts' floor rule.
#[inline]
pub fn nearest_cell(pos: Vec2) -> IVec2 {
    IVec2::new((pos.x - 0.5).round() as i32, (pos.y - 0.5).round() as i32)
}

/// Continuous position at the center of a grid cell (tile units)
#[inline]
pub fn cell_center(cell: IVec2) -> Vec2 {
    Vec2::new(cell.x as f32 + 0.5, cell.y as f32 + 0.5)
}
