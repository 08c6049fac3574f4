//! Game state machine and the per-tick update
//!
//! Owns the maze, the player, the four ghosts and all run-level counters.
//! One [`tick`] call advances a fixed-order update: power-up countdown,
//! player movement, collectible pickup, ghost release, per-ghost movement
//! with an immediate collision check, cosmetic timers, level clear.
//! Side effects surface as [`GameEvent`]s for the frontend to drain.

use glam::{IVec2, Vec2};

use super::ghost::{self, Ghost};
use super::maze::Maze;
use super::player::Player;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Title screen, waiting for start
    Menu,
    /// Live gameplay
    Playing,
    /// Frozen mid-run
    Paused,
    /// Cleared screen celebration. Defined with its own rendering but no
    /// internal transition enters it; level clears roll straight into the
    /// next level instead.
    Win,
    /// Run ended
    GameOver,
}

/// Side effects of one tick, drained by the frontend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    DotEaten { cell: IVec2 },
    PelletEaten { cell: IVec2 },
    GhostEaten { position: Vec2, points: u32 },
    LifeLost { lives: u32 },
    LevelCleared { level: u32 },
    GameOver { score: u32 },
    /// High score to persist (fires on exceedance and at game over)
    HighScore { value: u32 },
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement direction (unit axis vector, zero when none)
    pub direction: Vec2,
    /// Rising edge of the start/confirm key
    pub start: bool,
    /// Rising edge of the pause key
    pub pause: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct Game {
    pub mode: Mode,
    pub maze: Maze,
    pub player: Player,
    pub ghosts: [Ghost; 4],
    pub score: u32,
    pub high_score: u32,
    pub lives: u32,
    pub level: u32,
    /// Global frightened flag; ghosts copy it every tick
    pub power_up_active: bool,
    /// "LEVEL N" banner countdown after a clear (render state)
    pub banner_timer: f32,
    power_up_timer: f32,
    ghost_release_timer: f32,
    /// Ghosts eaten in the current power-up window (drives the combo)
    ghosts_eaten: u32,
    events: Vec<GameEvent>,
}

impl Game {
    /// Fresh machine in the menu, seeded with the persisted high score
    pub fn new(high_score: u32) -> Self {
        let mut game = Self {
            mode: Mode::Menu,
            maze: Maze::new(),
            player: Player::new(PLAYER_SPAWN),
            ghosts: ghost::standard_four(),
            score: 0,
            high_score,
            lives: START_LIVES,
            level: 1,
            power_up_active: false,
            banner_timer: 0.0,
            power_up_timer: 0.0,
            ghost_release_timer: 0.0,
            ghosts_eaten: 0,
            events: Vec::new(),
        };
        game.ghosts[0].active = true;
        game
    }

    /// Fresh run: score, lives, level, collectibles, spawn positions.
    /// Only the lead ghost starts active.
    pub fn reset(&mut self) {
        self.score = 0;
        self.lives = START_LIVES;
        self.level = 1;
        self.power_up_active = false;
        self.power_up_timer = 0.0;
        self.ghost_release_timer = 0.0;
        self.ghosts_eaten = 0;
        self.banner_timer = 0.0;
        self.maze.reset();
        self.player.reset(PLAYER_SPAWN);
        for (ghost, spawn) in self.ghosts.iter_mut().zip(GHOST_SPAWNS) {
            ghost.reset(spawn);
        }
        self.ghosts[0].active = true;
        log::info!("New run: {} lives, high score {}", self.lives, self.high_score);
    }

    /// Drain the events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn refresh_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::HighScore {
                value: self.high_score,
            });
        }
    }
}

/// Advance the game by one tick
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    match game.mode {
        Mode::Menu => {
            if input.start {
                game.reset();
                game.mode = Mode::Playing;
            }
            return;
        }
        Mode::Paused => {
            if input.pause {
                game.mode = Mode::Playing;
            }
            return;
        }
        Mode::GameOver | Mode::Win => {
            if input.start {
                game.mode = Mode::Menu;
            }
            return;
        }
        Mode::Playing => {
            if input.pause {
                game.mode = Mode::Paused;
                return;
            }
        }
    }

    advance(game, input, dt);
}

/// The fixed-order active update. Step order is load-bearing: a pellet
/// eaten in this tick frightens ghosts before their own movement and
/// collision checks run, and each ghost's collision test sees its
/// this-tick position.
fn advance(game: &mut Game, input: &TickInput, dt: f32) {
    // (1) power-up countdown
    if game.power_up_active {
        game.power_up_timer -= dt;
        if game.power_up_timer <= 0.0 {
            game.power_up_active = false;
            for ghost in &mut game.ghosts {
                ghost.frightened = false;
            }
        }
    }

    // (2) player movement
    if input.direction != Vec2::ZERO {
        game.player.desired_direction = input.direction;
    }
    game.player.update(&game.maze, dt);

    // (3) dot pickup
    let cell = game.player.occupied_cell();
    if game.maze.has_dot(cell.x, cell.y) {
        game.maze.remove_dot(cell.x, cell.y);
        game.score += DOT_POINTS;
        game.refresh_high_score();
        game.events.push(GameEvent::DotEaten { cell });
    }

    // (4) power pellet pickup; the new frightened flag is visible to the
    // ghost updates below in this same tick
    if game.maze.has_pellet(cell.x, cell.y) {
        game.maze.remove_pellet(cell.x, cell.y);
        game.score += PELLET_POINTS;
        game.power_up_active = true;
        game.power_up_timer = POWER_UP_DURATION;
        game.ghosts_eaten = 0;
        for ghost in &mut game.ghosts {
            if ghost.active && !ghost.eaten {
                ghost.frightened = true;
            }
        }
        game.events.push(GameEvent::PelletEaten { cell });
    }

    // (5) staggered ghost release; the timer only resets when a ghost
    // actually leaves the house
    game.ghost_release_timer += dt;
    if game.ghost_release_timer > GHOST_RELEASE_INTERVAL {
        if let Some(ghost) = game.ghosts.iter_mut().find(|g| !g.active) {
            ghost.active = true;
            game.ghost_release_timer = 0.0;
        }
    }

    // (6) ghost movement, collision resolved per ghost right after it moves
    let player_cell = game.player.occupied_cell();
    for i in 0..game.ghosts.len() {
        if game.ghosts[i].active && !game.ghosts[i].eaten {
            let frightened = game.power_up_active;
            game.ghosts[i].update(&game.maze, player_cell, frightened, dt);
        } else if game.ghosts[i].eaten {
            game.ghosts[i].update_return(&game.maze, dt);
        }

        let touching = game.ghosts[i].active
            && game.ghosts[i].position.distance(game.player.position) < COLLISION_RADIUS;
        if touching {
            if game.power_up_active && !game.ghosts[i].eaten {
                eat_ghost(game, i);
            } else if !game.ghosts[i].eaten {
                lose_life(game);
            }
        }
    }

    // (7) cosmetic timers
    if game.banner_timer > 0.0 {
        game.banner_timer = (game.banner_timer - dt).max(0.0);
    }

    // (8) level clear
    if game.maze.all_collected() {
        next_level(game);
    }
}

/// Combo scoring: the counter increments first, so awards run
/// 200, 400, 800, 1600 within one power-up window
fn eat_ghost(game: &mut Game, i: usize) {
    game.ghosts_eaten += 1;
    let points = GHOST_BASE_POINTS * (1 << (game.ghosts_eaten - 1));
    game.score += points;
    game.refresh_high_score();
    game.ghosts[i].mark_eaten();
    game.events.push(GameEvent::GhostEaten {
        position: game.ghosts[i].position,
        points,
    });
}

fn lose_life(game: &mut Game) {
    // Two ghosts can reach the player in the same tick; the first fatal
    // contact ends the run and later ones are no-ops
    if game.mode == Mode::GameOver {
        return;
    }
    game.lives -= 1;
    game.events.push(GameEvent::LifeLost { lives: game.lives });

    if game.lives == 0 {
        game.mode = Mode::GameOver;
        game.events.push(GameEvent::GameOver { score: game.score });
        game.events.push(GameEvent::HighScore {
            value: game.high_score,
        });
    } else {
        // Everyone back to spawn; the release timer restaggers the
        // ghosts from scratch. Score, level and collectibles persist.
        game.player.reset(PLAYER_SPAWN);
        for (ghost, spawn) in game.ghosts.iter_mut().zip(GHOST_SPAWNS) {
            ghost.reset(spawn);
        }
        game.power_up_active = false;
        game.power_up_timer = 0.0;
        game.ghost_release_timer = 0.0;
    }
}

fn next_level(game: &mut Game) {
    game.level += 1;
    game.power_up_active = false;
    game.power_up_timer = 0.0;
    game.ghost_release_timer = 0.0;
    game.ghosts_eaten = 0;
    game.maze.reset();
    game.player.reset(PLAYER_SPAWN);
    for (ghost, spawn) in game.ghosts.iter_mut().zip(GHOST_SPAWNS) {
        ghost.reset(spawn);
    }
    game.ghosts[0].active = true;
    game.banner_timer = LEVEL_BANNER_SECS;
    game.events.push(GameEvent::LevelCleared { level: game.level });
    log::info!("Level {} starting", game.level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_center;

    const DT: f32 = 1.0 / 60.0;

    fn start_input() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    fn playing_game() -> Game {
        let mut game = Game::new(0);
        tick(&mut game, &start_input(), DT);
        assert_eq!(game.mode, Mode::Playing);
        game.take_events();
        game
    }

    #[test]
    fn test_menu_to_playing_resets_run() {
        let mut game = Game::new(0);
        assert_eq!(game.mode, Mode::Menu);

        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.mode, Mode::Menu);

        tick(&mut game, &start_input(), DT);
        assert_eq!(game.mode, Mode::Playing);
        assert_eq!(game.lives, START_LIVES);
        assert_eq!(game.level, 1);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_reset_determinism() {
        let mut game = playing_game();
        for _ in 0..30 {
            tick(&mut game, &TickInput::default(), DT);
        }

        game.reset();
        assert_eq!(game.lives, START_LIVES);
        assert_eq!(game.level, 1);
        assert_eq!(game.score, 0);
        assert_eq!(game.player.position, PLAYER_SPAWN);
        for (ghost, spawn) in game.ghosts.iter().zip(GHOST_SPAWNS) {
            assert_eq!(ghost.position, spawn);
        }
        assert!(game.ghosts[0].active);
        assert!(game.ghosts[1..].iter().all(|g| !g.active));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut game = playing_game();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut game, &pause, DT);
        assert_eq!(game.mode, Mode::Paused);

        let before = game.ghosts[0].position;
        for _ in 0..30 {
            tick(&mut game, &TickInput::default(), 0.2);
        }
        assert_eq!(game.ghosts[0].position, before);

        tick(&mut game, &pause, DT);
        assert_eq!(game.mode, Mode::Playing);
    }

    #[test]
    fn test_game_over_returns_to_menu() {
        let mut game = playing_game();
        game.mode = Mode::GameOver;
        tick(&mut game, &start_input(), DT);
        assert_eq!(game.mode, Mode::Menu);

        game.mode = Mode::Win;
        tick(&mut game, &start_input(), DT);
        assert_eq!(game.mode, Mode::Menu);
    }

    #[test]
    fn test_spawn_dot_pickup_scores_and_persists() {
        let mut game = playing_game();
        let spawn_cell = game.player.occupied_cell();
        assert!(game.maze.has_dot(spawn_cell.x, spawn_cell.y));

        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.score, DOT_POINTS);
        assert!(!game.maze.has_dot(spawn_cell.x, spawn_cell.y));

        let events = game.take_events();
        assert!(events.contains(&GameEvent::DotEaten { cell: spawn_cell }));
        assert!(events.contains(&GameEvent::HighScore { value: DOT_POINTS }));
    }

    #[test]
    fn test_high_score_not_refreshed_below_record() {
        let mut game = Game::new(500);
        tick(&mut game, &start_input(), DT);
        game.take_events();

        tick(&mut game, &TickInput::default(), DT);
        let events = game.take_events();
        assert_eq!(game.score, DOT_POINTS);
        assert_eq!(game.high_score, 500);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::HighScore { .. })));
    }

    #[test]
    fn test_pellet_frightens_active_ghosts_without_persisting() {
        let mut game = playing_game();
        game.player.position = cell_center(IVec2::new(1, 3));

        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.score, PELLET_POINTS);
        assert!(game.power_up_active);
        assert!(game.ghosts[0].frightened);
        assert!(!game.ghosts[1].frightened, "inactive ghosts stay calm");

        let events = game.take_events();
        assert!(events.contains(&GameEvent::PelletEaten {
            cell: IVec2::new(1, 3)
        }));
        // Pellet points alone never trigger persistence; the stored
        // record catches up at the next dot or ghost pickup
        assert!(!events.iter().any(|e| matches!(e, GameEvent::HighScore { .. })));
        assert_eq!(game.high_score, 0);
    }

    #[test]
    fn test_power_up_expires_and_calms_ghosts() {
        let mut game = playing_game();
        game.player.position = cell_center(IVec2::new(1, 3));
        tick(&mut game, &TickInput::default(), DT);
        assert!(game.power_up_active);

        // One oversized step runs the whole window out
        tick(&mut game, &TickInput::default(), POWER_UP_DURATION + 1.0);
        assert!(!game.power_up_active);
        assert!(game.ghosts.iter().all(|g| !g.frightened));
    }

    #[test]
    fn test_combo_scoring_doubles_per_ghost() {
        let mut game = playing_game();
        // Park the player on a pellet with all four ghosts on top: the
        // pellet resolves before ghost collisions within the same tick
        game.player.position = cell_center(IVec2::new(1, 3));
        for ghost in &mut game.ghosts {
            ghost.active = true;
            ghost.position = game.player.position;
        }

        tick(&mut game, &TickInput::default(), DT);
        let points: Vec<u32> = game
            .take_events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::GhostEaten { points, .. } => Some(*points),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![200, 400, 800, 1600]);
        assert_eq!(game.score, PELLET_POINTS + 3000);
        assert!(game.ghosts.iter().all(|g| g.eaten));
        assert_eq!(game.lives, START_LIVES);
    }

    #[test]
    fn test_new_pellet_resets_combo() {
        let mut game = playing_game();
        game.player.position = cell_center(IVec2::new(1, 3));
        for ghost in &mut game.ghosts {
            ghost.active = true;
            ghost.position = game.player.position;
        }
        tick(&mut game, &TickInput::default(), DT);
        game.take_events();

        // Second pellet, one revived ghost: the award starts over at 200
        game.player.position = cell_center(IVec2::new(26, 3));
        game.ghosts[0].eaten = false;
        game.ghosts[0].position = game.player.position;

        tick(&mut game, &TickInput::default(), DT);
        let points: Vec<u32> = game
            .take_events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::GhostEaten { points, .. } => Some(*points),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![200]);
    }

    #[test]
    fn test_life_loss_repositions_and_restaggers() {
        let mut game = playing_game();
        tick(&mut game, &TickInput::default(), DT);
        let score_before = game.score;

        game.ghosts[0].position = game.player.position;
        tick(&mut game, &TickInput::default(), DT);

        assert_eq!(game.lives, START_LIVES - 1);
        assert_eq!(game.mode, Mode::Playing);
        assert_eq!(game.score, score_before);
        assert_eq!(game.player.position, PLAYER_SPAWN);
        // All four wait in the house again; the release timer restaggers
        assert!(game.ghosts.iter().all(|g| !g.active));
        assert!(game
            .take_events()
            .contains(&GameEvent::LifeLost {
                lives: START_LIVES - 1
            }));
    }

    #[test]
    fn test_final_life_ends_run() {
        let mut game = playing_game();
        game.lives = 1;
        game.ghosts[0].position = game.player.position;

        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.lives, 0);
        assert_eq!(game.mode, Mode::GameOver);

        let events = game.take_events();
        assert!(events.contains(&GameEvent::LifeLost { lives: 0 }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
        assert!(events.iter().any(|e| matches!(e, GameEvent::HighScore { .. })));
    }

    #[test]
    fn test_double_collision_on_final_life_ends_run_once() {
        let mut game = playing_game();
        game.lives = 1;
        game.ghosts[0].active = true;
        game.ghosts[1].active = true;
        game.ghosts[0].position = game.player.position + Vec2::new(0.05, 0.0);
        game.ghosts[1].position = game.player.position - Vec2::new(0.05, 0.0);

        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.lives, 0);
        assert_eq!(game.mode, Mode::GameOver);

        let events = game.take_events();
        let lost = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LifeLost { .. }))
            .count();
        assert_eq!(lost, 1, "one collision drains one life");
        assert!(events.contains(&GameEvent::LifeLost { lives: 0 }));
        let over = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(over, 1);
    }

    #[test]
    fn test_level_clear_rolls_into_next_level() {
        let mut game = playing_game();
        for y in 0..MAZE_HEIGHT {
            for x in 0..MAZE_WIDTH {
                game.maze.remove_dot(x, y);
                game.maze.remove_pellet(x, y);
            }
        }

        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.level, 2);
        assert_eq!(game.mode, Mode::Playing);
        assert!(game.maze.has_dot(1, 1), "collectibles restored");
        assert_eq!(game.player.position, PLAYER_SPAWN);
        assert!(game.ghosts[0].active);
        assert!(game.ghosts[1..].iter().all(|g| !g.active));
        assert!(game.banner_timer > 0.0);
        assert!(game
            .take_events()
            .contains(&GameEvent::LevelCleared { level: 2 }));

        tick(&mut game, &TickInput::default(), DT);
        assert!(game.banner_timer < LEVEL_BANNER_SECS);
    }

    #[test]
    fn test_ghost_release_stagger() {
        let mut game = playing_game();
        assert!(game.ghosts[0].active);
        assert!(!game.ghosts[1].active);

        tick(&mut game, &TickInput::default(), GHOST_RELEASE_INTERVAL + 0.1);
        assert!(game.ghosts[1].active);
        assert!(!game.ghosts[2].active);

        tick(&mut game, &TickInput::default(), GHOST_RELEASE_INTERVAL + 0.1);
        assert!(game.ghosts[2].active);
        assert!(!game.ghosts[3].active);
    }

    #[test]
    fn test_direction_intent_latches() {
        let mut game = playing_game();
        let left = TickInput {
            direction: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };

        tick(&mut game, &left, DT);
        assert_eq!(game.player.desired_direction, Vec2::new(-1.0, 0.0));

        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.player.desired_direction, Vec2::new(-1.0, 0.0));
        assert!(game.player.position.x < PLAYER_SPAWN.x);
    }

    #[test]
    fn test_events_drain_once() {
        let mut game = playing_game();
        tick(&mut game, &TickInput::default(), DT);
        assert!(!game.take_events().is_empty());
        assert!(game.take_events().is_empty());
    }
}
