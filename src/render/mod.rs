//! Scene composition over an abstract canvas
//!
//! Everything here works in pixel space (tile coordinates times
//! [`TILE_PIXELS`]) and draws through the [`Canvas`] trait, so the same
//! composition drives the terminal backend and the test recorder.

pub mod terminal;

use glam::{IVec2, Vec2, Vec3};

use crate::cell_center;
use crate::consts::*;
use crate::effects::ParticleSystem;
use crate::sim::{Game, Ghost, Maze, Mode, Player, Tile};

pub const SCREEN_WIDTH: f32 = MAZE_WIDTH as f32 * TILE_PIXELS;
pub const SCREEN_HEIGHT: f32 = MAZE_HEIGHT as f32 * TILE_PIXELS;

/// Drawing surface for one frame. Implementations rasterize however
/// they like; calls arrive back-to-front.
pub trait Canvas {
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Vec3);
    fn rect_outline(&mut self, pos: Vec2, size: Vec2, color: Vec3, thickness: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3);
    /// Player body: a disc with a mouth wedge cut out, rotated to the
    /// travel direction (degrees, screen-space clockwise)
    fn wedge(&mut self, center: Vec2, radius: f32, rotation: f32, mouth_angle: f32, color: Vec3);
    fn text(&mut self, pos: Vec2, text: &str, scale: f32, color: Vec3);
}

/// Compose one frame. `time` drives the collectible pulse animations.
pub fn draw_frame(canvas: &mut impl Canvas, game: &Game, particles: &ParticleSystem, time: f32) {
    if game.mode == Mode::Menu {
        draw_menu(canvas, game.high_score);
        return;
    }

    draw_maze(canvas, &game.maze, time);
    draw_particles(canvas, particles);
    draw_player(canvas, &game.player);
    for ghost in &game.ghosts {
        if ghost.active {
            draw_ghost(canvas, ghost, game.power_up_active);
        }
    }
    draw_hud(canvas, game);

    match game.mode {
        Mode::Paused => {
            canvas.text(
                Vec2::new(SCREEN_WIDTH / 2.0 - 80.0, SCREEN_HEIGHT / 2.0),
                "PAUSED",
                2.0,
                Vec3::ONE,
            );
        }
        Mode::GameOver => {
            canvas.text(
                Vec2::new(SCREEN_WIDTH / 2.0 - 120.0, SCREEN_HEIGHT / 2.0 - 50.0),
                "GAME OVER",
                2.0,
                Vec3::new(1.0, 0.0, 0.0),
            );
            canvas.text(
                Vec2::new(SCREEN_WIDTH / 2.0 - 150.0, SCREEN_HEIGHT / 2.0 + 20.0),
                "Press ENTER to Continue",
                1.0,
                Vec3::ONE,
            );
        }
        Mode::Win => draw_level_banner(canvas),
        Mode::Playing if game.banner_timer > 0.0 => draw_level_banner(canvas),
        _ => {}
    }
}

fn draw_menu(canvas: &mut impl Canvas, high_score: u32) {
    let cx = SCREEN_WIDTH / 2.0;
    let cy = SCREEN_HEIGHT / 2.0;
    canvas.text(
        Vec2::new(cx - 150.0, cy - 100.0),
        "PELLET CHASE",
        2.5,
        Vec3::new(1.0, 1.0, 0.0),
    );
    canvas.text(
        Vec2::new(cx - 180.0, cy - 40.0),
        "WORLD CLASS EDITION",
        1.0,
        Vec3::new(0.0, 1.0, 1.0),
    );
    canvas.text(
        Vec2::new(cx - 140.0, cy + 50.0),
        "Press ENTER to Start",
        1.0,
        Vec3::ONE,
    );
    canvas.text(
        Vec2::new(cx - 120.0, cy + 100.0),
        &format!("HIGH SCORE: {high_score}"),
        1.0,
        Vec3::new(1.0, 0.5, 0.0),
    );
}

fn draw_maze(canvas: &mut impl Canvas, maze: &Maze, time: f32) {
    for y in 0..MAZE_HEIGHT {
        for x in 0..MAZE_WIDTH {
            let pos = Vec2::new(x as f32, y as f32) * TILE_PIXELS;
            match maze.tile(x, y) {
                Tile::Wall => {
                    // Blue gradient walls with a brighter outline for depth
                    let gradient = 0.3 + 0.2 * ((x + y) as f32 * 0.5).sin();
                    canvas.fill_rect(
                        pos,
                        Vec2::splat(TILE_PIXELS),
                        Vec3::new(0.0, gradient, 0.5 + gradient),
                    );
                    canvas.rect_outline(
                        pos,
                        Vec2::splat(TILE_PIXELS),
                        Vec3::new(0.2, 0.4, 1.0),
                        2.0,
                    );
                }
                Tile::GhostHouse => {
                    canvas.fill_rect(pos, Vec2::splat(TILE_PIXELS), Vec3::new(0.3, 0.0, 0.3));
                }
                Tile::Empty => {}
            }
        }
    }

    let dot_pulse = 1.0 + 0.2 * (time * 3.0).sin();
    let pellet_pulse = 1.0 + 0.5 * (time * 4.0).sin();
    let glow = 0.5 + 0.5 * (time * 5.0).sin();
    for y in 0..MAZE_HEIGHT {
        for x in 0..MAZE_WIDTH {
            let center = cell_center(IVec2::new(x, y)) * TILE_PIXELS;
            if maze.has_dot(x, y) {
                canvas.fill_circle(center, 3.0 * dot_pulse, Vec3::new(1.0, 0.9, 0.7));
            } else if maze.has_pellet(x, y) {
                canvas.fill_circle(center, 8.0 * pellet_pulse, Vec3::new(1.0, glow, 0.5));
                canvas.fill_circle(center, 12.0 * pellet_pulse, Vec3::new(1.0, 0.5, 0.0) * 0.3);
            }
        }
    }
}

fn draw_particles(canvas: &mut impl Canvas, particles: &ParticleSystem) {
    for particle in particles.alive() {
        // Remaining life doubles as the fade factor
        canvas.fill_rect(
            particle.position,
            Vec2::splat(particle.size),
            particle.color * particle.life,
        );
    }
}

fn draw_player(canvas: &mut impl Canvas, player: &Player) {
    let rotation = if player.direction.x < 0.0 {
        180.0
    } else if player.direction.y > 0.0 {
        90.0
    } else if player.direction.y < 0.0 {
        270.0
    } else {
        0.0
    };
    canvas.wedge(
        player.position * TILE_PIXELS,
        14.0,
        rotation,
        player.mouth_angle,
        Vec3::new(1.0, 1.0, 0.0),
    );
}

fn draw_ghost(canvas: &mut impl Canvas, ghost: &Ghost, power_up_active: bool) {
    let center = ghost.position * TILE_PIXELS;

    // Captured ghosts are just a pair-of-eyes-sized gray husk heading home
    if ghost.eaten {
        canvas.fill_circle(center, 10.0, Vec3::new(0.5, 0.5, 0.5));
        return;
    }

    let mut body = ghost.color;
    if ghost.frightened {
        body = Vec3::new(0.2, 0.2, 0.8);
        // White flash while the power-up runs down
        if power_up_active && (ghost.anim_timer * 10.0) as i32 % 2 == 0 {
            body = Vec3::ONE;
        }
    }
    canvas.fill_circle(center, 14.0, body);

    for side in [-1.0, 1.0] {
        let eye = center + Vec2::new(side * 6.0, -4.0);
        canvas.fill_circle(eye, 4.0, Vec3::ONE);
        canvas.fill_circle(eye + ghost.direction * 2.0, 2.0, Vec3::ZERO);
    }
}

fn draw_hud(canvas: &mut impl Canvas, game: &Game) {
    canvas.text(
        Vec2::new(20.0, 30.0),
        &format!("SCORE: {}", game.score),
        1.0,
        Vec3::ONE,
    );
    canvas.text(
        Vec2::new(SCREEN_WIDTH - 200.0, 30.0),
        &format!("HIGH: {}", game.high_score),
        1.0,
        Vec3::new(1.0, 1.0, 0.0),
    );
    canvas.text(
        Vec2::new(SCREEN_WIDTH / 2.0 - 50.0, 30.0),
        &format!("LEVEL: {}", game.level),
        1.0,
        Vec3::new(0.0, 1.0, 1.0),
    );
    for i in 0..game.lives {
        canvas.fill_circle(
            Vec2::new(20.0 + i as f32 * 30.0, SCREEN_HEIGHT - 30.0),
            10.0,
            Vec3::new(1.0, 1.0, 0.0),
        );
    }
}

fn draw_level_banner(canvas: &mut impl Canvas) {
    canvas.text(
        Vec2::new(SCREEN_WIDTH / 2.0 - 150.0, SCREEN_HEIGHT / 2.0),
        "LEVEL COMPLETE!",
        2.0,
        Vec3::new(0.0, 1.0, 0.0),
    );
}
