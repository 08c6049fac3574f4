//! Ghost agents
//!
//! Four ghosts share one behavior core: replan a grid path on a timer,
//! follow waypoint centers, and switch between chase, flee and
//! return-home modes. Personalities keep their scatter corners as a seam
//! for per-variant differentiation; the live chase logic pursues the
//! player directly for every variant.

use glam::{IVec2, Vec2, Vec3};

use super::maze::Maze;
use super::path;
use crate::consts::*;
use crate::{cell_center, cell_of};

/// Seconds per ghost body animation frame
const ANIM_FRAME_SECS: f32 = 0.1;

/// AI variant tag. Chase behavior is identical across variants; only
/// the scatter corner differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    Aggressive,
    Ambush,
    Patrol,
    Random,
}

impl Personality {
    /// Fixed corner associated with this variant. Computed for every
    /// ghost but not consulted by the live chase logic.
    pub fn scatter_corner(self) -> IVec2 {
        match self {
            Personality::Aggressive => IVec2::new(25, 0),
            Personality::Ambush => IVec2::new(2, 0),
            Personality::Patrol => IVec2::new(27, 30),
            Personality::Random => IVec2::new(0, 30),
        }
    }
}

/// Target selection strategy: (ghost cell, player cell) -> goal cell
type TargetFn = fn(IVec2, IVec2) -> IVec2;

/// Direct pursuit: head straight for the player's cell
fn chase_target(_ghost: IVec2, player: IVec2) -> IVec2 {
    player
}

/// Flee by reflecting the ghost's cell through the player's cell,
/// clamped to grid bounds (walkability is the search's problem)
fn flee_target(ghost: IVec2, player: IVec2) -> IVec2 {
    let away = ghost + (ghost - player);
    away.clamp(IVec2::ZERO, IVec2::new(MAZE_WIDTH - 1, MAZE_HEIGHT - 1))
}

/// Chase strategy per personality. Every variant currently resolves to
/// direct pursuit; the table keeps the per-variant seam without touching
/// call sites.
fn chase_strategy(personality: Personality) -> TargetFn {
    match personality {
        Personality::Aggressive
        | Personality::Ambush
        | Personality::Patrol
        | Personality::Random => chase_target,
    }
}

/// One ghost
#[derive(Debug, Clone)]
pub struct Ghost {
    pub personality: Personality,
    pub position: Vec2,
    /// Spawn point this ghost restores to after being eaten or on reset
    pub start_position: Vec2,
    /// Facing for the eye pupils (render state)
    pub direction: Vec2,
    pub color: Vec3,
    /// Released from the ghost house and participating in the chase
    pub active: bool,
    pub frightened: bool,
    pub eaten: bool,
    /// Body animation state (render only)
    pub anim_timer: f32,
    pub anim_frame: u32,
    speed: f32,
    base_speed: f32,
    path: Vec<IVec2>,
    cursor: usize,
    replan_timer: f32,
    return_timer: f32,
}

impl Ghost {
    pub fn new(spawn: Vec2, color: Vec3, personality: Personality) -> Self {
        Self {
            personality,
            position: spawn,
            start_position: spawn,
            direction: Vec2::new(0.0, -1.0),
            color,
            active: false,
            frightened: false,
            eaten: false,
            anim_timer: 0.0,
            anim_frame: 0,
            speed: GHOST_BASE_SPEED,
            base_speed: GHOST_BASE_SPEED,
            path: Vec::new(),
            cursor: 0,
            replan_timer: 0.0,
            return_timer: 0.0,
        }
    }

    /// Occupied cell (floor rule)
    pub fn cell(&self) -> IVec2 {
        cell_of(self.position)
    }

    /// Chase/flee update for an active, non-eaten ghost.
    ///
    /// `frightened` is the game's global power-up flag; the ghost copies
    /// it every tick, so a ghost released mid-power-up flees too.
    pub fn update(&mut self, maze: &Maze, player_cell: IVec2, frightened: bool, dt: f32) {
        self.frightened = frightened;
        self.speed = if frightened {
            self.base_speed * FRIGHTENED_SPEED_FACTOR
        } else {
            self.base_speed
        };

        self.replan_timer += dt;
        if self.replan_timer > REPLAN_INTERVAL {
            self.replan(maze, player_cell);
            self.replan_timer = 0.0;
        }

        self.follow_path(maze, dt);

        self.anim_timer += dt;
        if self.anim_timer > ANIM_FRAME_SECS {
            self.anim_frame = (self.anim_frame + 1) % 4;
            self.anim_timer = 0.0;
        }
    }

    /// Return-home update for an eaten ghost. Revives at the house and
    /// snaps back to the spawn point.
    pub fn update_return(&mut self, maze: &Maze, dt: f32) {
        self.speed = self.base_speed * RETURN_SPEED_FACTOR;

        let cell = self.cell();
        if cell.as_vec2().distance(GHOST_HOME.as_vec2()) < HOME_RADIUS {
            self.eaten = false;
            self.position = self.start_position;
            self.path.clear();
            log::debug!("{:?} ghost revived at home", self.personality);
            return;
        }

        self.return_timer += dt;
        if self.return_timer > RETURN_REPLAN_INTERVAL {
            self.path = path::astar(maze, cell, GHOST_HOME);
            self.cursor = 0;
            self.return_timer = 0.0;
        }

        self.follow_path(maze, dt);
    }

    /// Flip to the eaten state: drops Frightened and the current path so
    /// the return trip replans from scratch
    pub fn mark_eaten(&mut self) {
        self.eaten = true;
        self.frightened = false;
        self.path.clear();
        log::debug!("{:?} ghost eaten", self.personality);
    }

    /// Back to `spawn`, inactive, all transient state cleared
    pub fn reset(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.start_position = spawn;
        self.direction = Vec2::new(0.0, -1.0);
        self.active = false;
        self.frightened = false;
        self.eaten = false;
        self.speed = self.base_speed;
        self.path.clear();
        self.cursor = 0;
        self.replan_timer = 0.0;
        self.return_timer = 0.0;
        self.anim_timer = 0.0;
        self.anim_frame = 0;
    }

    fn replan(&mut self, maze: &Maze, player_cell: IVec2) {
        let cell = self.cell();
        let target = if self.frightened {
            flee_target(cell, player_cell)
        } else {
            (chase_strategy(self.personality))(cell, player_cell)
        };
        self.path = path::dijkstra(maze, cell, target);
        self.cursor = 0;
    }

    /// Advance along the current path toward waypoint cell centers.
    /// Empty or exhausted paths leave the ghost idle until the next
    /// replan.
    fn follow_path(&mut self, maze: &Maze, dt: f32) {
        if self.path.is_empty() || self.cursor >= self.path.len() {
            return;
        }

        let mut to_target = cell_center(self.path[self.cursor]) - self.position;
        if to_target.length() < WAYPOINT_RADIUS {
            self.cursor += 1;
            if self.cursor < self.path.len() {
                to_target = cell_center(self.path[self.cursor]) - self.position;
            }
        }

        if to_target.length() > 0.0 {
            self.direction = to_target.normalize();
            let next = self.position + self.direction * self.speed * dt;
            let cell = cell_of(next);
            let in_bounds =
                (0..MAZE_WIDTH).contains(&cell.x) && (0..MAZE_HEIGHT).contains(&cell.y);
            if in_bounds && maze.is_walkable(cell.x, cell.y) {
                self.position = next;
            } else {
                // Wedged against a wall; force a replan next AI tick
                self.cursor = self.path.len();
            }
        }

        if self.position.x < 0.0 {
            self.position.x = (MAZE_WIDTH - 1) as f32;
        } else if self.position.x > (MAZE_WIDTH - 1) as f32 {
            self.position.x = 0.0;
        }
    }
}

/// The four standard ghosts in release order
pub fn standard_four() -> [Ghost; 4] {
    [
        Ghost::new(
            GHOST_SPAWNS[0],
            Vec3::new(1.0, 0.0, 0.0),
            Personality::Aggressive,
        ),
        Ghost::new(
            GHOST_SPAWNS[1],
            Vec3::new(1.0, 0.75, 0.8),
            Personality::Ambush,
        ),
        Ghost::new(GHOST_SPAWNS[2], Vec3::new(0.0, 1.0, 1.0), Personality::Patrol),
        Ghost::new(
            GHOST_SPAWNS[3],
            Vec3::new(1.0, 0.65, 0.0),
            Personality::Random,
        ),
    ]
}
