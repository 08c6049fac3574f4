//! Player agent
//!
//! Continuous movement over the grid with a latched desired direction.
//! Collision sampling covers the candidate center plus its four corner
//! points so the player cannot clip wall corners; a blocked forward step
//! stops the player outright instead of leaving it wedged mid-cell.

use glam::{IVec2, Vec2};

use super::maze::Maze;
use crate::consts::*;
use crate::{cell_of, nearest_cell};

/// Mouth wedge step per animation frame (degrees)
const MOUTH_STEP_DEG: f32 = 5.0;
/// Widest mouth opening (degrees)
const MOUTH_MAX_DEG: f32 = 45.0;
/// Seconds between mouth animation steps
const MOUTH_STEP_SECS: f32 = 0.05;

/// The player-controlled agent
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    /// Current movement direction (unit axis vector, zero when stopped)
    pub direction: Vec2,
    /// Latched turn request, applied as soon as the turn fits
    pub desired_direction: Vec2,
    pub speed: f32,
    /// Mouth opening angle in degrees (render state)
    pub mouth_angle: f32,
    mouth_opening: bool,
    mouth_timer: f32,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            position: spawn,
            direction: Vec2::ZERO,
            desired_direction: Vec2::ZERO,
            speed: PLAYER_SPEED,
            mouth_angle: 0.0,
            mouth_opening: true,
            mouth_timer: 0.0,
        }
    }

    /// Advance movement and the mouth animation by `dt` seconds
    pub fn update(&mut self, maze: &Maze, dt: f32) {
        // Take the latched turn as soon as it fits
        if self.desired_direction != Vec2::ZERO && self.desired_direction != self.direction {
            let probe = self.position + self.desired_direction * TURN_LOOKAHEAD;
            if can_occupy(maze, probe) {
                self.direction = self.desired_direction;
            }
        }

        if self.direction != Vec2::ZERO {
            let next = self.position + self.direction * self.speed * dt;
            if can_occupy(maze, next) {
                self.position = next;
            } else {
                // Stop flush against the wall rather than jitter in place
                self.direction = Vec2::ZERO;
            }
        }

        // Horizontal wrap through the row-14 corridor
        if self.position.x < 0.0 {
            self.position.x = (MAZE_WIDTH - 1) as f32;
        } else if self.position.x > (MAZE_WIDTH - 1) as f32 {
            self.position.x = 0.0;
        }

        self.mouth_timer += dt;
        if self.mouth_timer > MOUTH_STEP_SECS {
            if self.mouth_opening {
                self.mouth_angle += MOUTH_STEP_DEG;
                if self.mouth_angle >= MOUTH_MAX_DEG {
                    self.mouth_angle = MOUTH_MAX_DEG;
                    self.mouth_opening = false;
                }
            } else {
                self.mouth_angle -= MOUTH_STEP_DEG;
                if self.mouth_angle <= 0.0 {
                    self.mouth_angle = 0.0;
                    self.mouth_opening = true;
                }
            }
            self.mouth_timer = 0.0;
        }
    }

    /// Cell used for collectible pickup (round rule; see [`nearest_cell`])
    pub fn occupied_cell(&self) -> IVec2 {
        nearest_cell(self.position)
    }

    /// Put the player back at `spawn`, stopped, mouth closed
    pub fn reset(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.direction = Vec2::ZERO;
        self.desired_direction = Vec2::ZERO;
        self.mouth_angle = 0.0;
        self.mouth_opening = true;
        self.mouth_timer = 0.0;
    }
}

/// Five-point collision test: the candidate center and the four corners
/// of the collision box must all sit on walkable floor cells. Cells off
/// the grid read walkable (the maze sentinel), which is what lets the
/// box pass through the wrap corridor.
fn can_occupy(maze: &Maze, center: Vec2) -> bool {
    let r = PLAYER_HALF_WIDTH;
    [
        Vec2::ZERO,
        Vec2::new(-r, -r),
        Vec2::new(r, -r),
        Vec2::new(-r, r),
        Vec2::new(r, r),
    ]
    .into_iter()
    .all(|offset| {
        let cell = cell_of(center + offset);
        maze.is_walkable(cell.x, cell.y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(Vec2::new(x, y))
    }

    #[test]
    fn test_moves_along_open_corridor() {
        let maze = Maze::new();
        let mut player = player_at(13.5, 29.5);
        player.desired_direction = Vec2::new(-1.0, 0.0);

        player.update(&maze, DT);
        assert_eq!(player.direction, Vec2::new(-1.0, 0.0));
        assert!(player.position.x < 13.5);
        assert!((player.position.y - 29.5).abs() < 0.001);
    }

    #[test]
    fn test_turn_into_wall_is_ignored() {
        let maze = Maze::new();
        let mut player = player_at(13.5, 29.5);
        player.direction = Vec2::new(-1.0, 0.0);
        // Wall directly above the bottom corridor
        player.desired_direction = Vec2::new(0.0, -1.0);

        player.update(&maze, DT);
        assert_eq!(player.direction, Vec2::new(-1.0, 0.0));
        assert!(player.position.x < 13.5);
    }

    #[test]
    fn test_turn_taken_at_junction() {
        let maze = Maze::new();
        // Column 1 opens upward from the bottom corridor
        let mut player = player_at(1.5, 29.5);
        player.desired_direction = Vec2::new(0.0, -1.0);

        player.update(&maze, DT);
        assert_eq!(player.direction, Vec2::new(0.0, -1.0));
        assert!(player.position.y < 29.5);
    }

    #[test]
    fn test_blocked_forward_zeroes_direction() {
        let maze = Maze::new();
        let mut player = player_at(1.45, 29.5);
        player.direction = Vec2::new(-1.0, 0.0);

        player.update(&maze, DT);
        assert_eq!(player.direction, Vec2::ZERO);
        assert!((player.position.x - 1.45).abs() < 0.001);
    }

    #[test]
    fn test_corner_sample_blocks_early() {
        let maze = Maze::new();
        // Center cell is open but the corner samples already overlap the
        // wall column, so the step must be rejected
        assert!(!can_occupy(&maze, Vec2::new(1.3, 29.5)));
        assert!(can_occupy(&maze, Vec2::new(1.5, 29.5)));
    }

    #[test]
    fn test_wrap_left() {
        let maze = Maze::new();
        let mut player = player_at(0.02, 14.5);
        player.direction = Vec2::new(-1.0, 0.0);
        player.desired_direction = Vec2::new(-1.0, 0.0);

        player.update(&maze, DT);
        assert!((player.position.x - 27.0).abs() < 0.001);
    }

    #[test]
    fn test_wrap_right() {
        let maze = Maze::new();
        let mut player = player_at(26.99, 14.5);
        player.direction = Vec2::new(1.0, 0.0);
        player.desired_direction = Vec2::new(1.0, 0.0);

        // A few ticks to carry the center past column 27
        for _ in 0..3 {
            player.update(&maze, DT);
        }
        assert!(player.position.x < 1.0);
    }

    #[test]
    fn test_mouth_animation_stays_in_range() {
        let maze = Maze::new();
        let mut player = player_at(13.5, 29.5);

        let mut seen_max = false;
        for _ in 0..40 {
            player.update(&maze, 0.06);
            assert!(player.mouth_angle >= 0.0 && player.mouth_angle <= MOUTH_MAX_DEG);
            if (player.mouth_angle - MOUTH_MAX_DEG).abs() < 0.001 {
                seen_max = true;
            }
        }
        assert!(seen_max, "mouth never reached full opening");
    }

    #[test]
    fn test_occupied_cell_round_rule() {
        assert_eq!(player_at(13.5, 29.5).occupied_cell(), IVec2::new(13, 29));
        assert_eq!(player_at(13.95, 29.5).occupied_cell(), IVec2::new(13, 29));
        assert_eq!(player_at(14.0, 29.5).occupied_cell(), IVec2::new(14, 29));
        assert_eq!(player_at(14.05, 29.5).occupied_cell(), IVec2::new(14, 29));
    }

    #[test]
    fn test_reset_restores_spawn_state() {
        let maze = Maze::new();
        let mut player = player_at(13.5, 29.5);
        player.desired_direction = Vec2::new(-1.0, 0.0);
        for _ in 0..20 {
            player.update(&maze, DT);
        }

        player.reset(PLAYER_SPAWN);
        assert_eq!(player.position, PLAYER_SPAWN);
        assert_eq!(player.direction, Vec2::ZERO);
        assert_eq!(player.desired_direction, Vec2::ZERO);
        assert_eq!(player.mouth_angle, 0.0);
    }
}
