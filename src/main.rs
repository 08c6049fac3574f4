//! Pellet Chase entry point
//!
//! Terminal frontend: raw-mode keyboard input, a fixed-timestep
//! simulation loop, and diff-rendered frames over crossterm.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glam::Vec3;

use pellet_chase::consts::*;
use pellet_chase::effects::ParticleSystem;
use pellet_chase::input::{self, KeySnapshot};
use pellet_chase::render::{self, terminal::TerminalRenderer};
use pellet_chase::sim::{Game, GameEvent, tick};
use pellet_chase::{HighScoreFile, Settings, cell_center};

/// Terminals report key repeats rather than releases, so a direction
/// key counts as held for a short window after its last press
const KEY_HOLD: Duration = Duration::from_millis(160);

#[derive(Debug, Default)]
struct HeldKeys {
    up: Option<Instant>,
    down: Option<Instant>,
    left: Option<Instant>,
    right: Option<Instant>,
}

impl HeldKeys {
    fn snapshot(&self, now: Instant, start: bool, pause: bool) -> KeySnapshot {
        let held = |at: Option<Instant>| at.is_some_and(|at| now.duration_since(at) < KEY_HOLD);
        KeySnapshot {
            up: held(self.up),
            down: held(self.down),
            left: held(self.left),
            right: held(self.right),
            start,
            pause,
        }
    }
}

fn handle_key(
    key: KeyEvent,
    now: Instant,
    held: &mut HeldKeys,
    start: &mut bool,
    pause: &mut bool,
    quit: &mut bool,
) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        KeyCode::Up | KeyCode::Char('w') => held.up = Some(now),
        KeyCode::Down | KeyCode::Char('s') => held.down = Some(now),
        KeyCode::Left | KeyCode::Char('a') => held.left = Some(now),
        KeyCode::Right | KeyCode::Char('d') => held.right = Some(now),
        KeyCode::Enter if key.kind == KeyEventKind::Press => *start = true,
        KeyCode::Char('p') | KeyCode::Char(' ') if key.kind == KeyEventKind::Press => *pause = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => *quit = true,
        KeyCode::Char('q') | KeyCode::Esc => *quit = true,
        _ => {}
    }
}

fn run(
    renderer: &mut TerminalRenderer,
    settings: &Settings,
    high_file: &HighScoreFile,
    high_score: u32,
) -> io::Result<()> {
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64);
    log::info!("Particle seed: {}", seed);

    let mut game = Game::new(high_score);
    let mut particles = ParticleSystem::new(seed);
    let mut held = HeldKeys::default();
    let mut prev_snapshot = KeySnapshot::default();
    let mut accumulator = 0.0_f32;

    let run_start = Instant::now();
    let mut last_frame = run_start;
    let frame_budget = Duration::from_secs_f32(1.0 / settings.fps_cap.max(1) as f32);

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32().min(0.1);
        last_frame = now;

        let mut start = false;
        let mut pause = false;
        let mut quit = false;
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    handle_key(key, now, &mut held, &mut start, &mut pause, &mut quit);
                }
                // Resizes are picked up by begin_frame
                _ => {}
            }
        }
        if quit {
            break;
        }

        let snapshot = held.snapshot(now, start, pause);
        let mut input = input::tick_input(&prev_snapshot, &snapshot);
        prev_snapshot = snapshot;

        accumulator += dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut game, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;

            // One-shot edges only reach the first substep
            input.start = false;
            input.pause = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog after a long stall instead of fast-forwarding
            accumulator = 0.0;
        }

        for game_event in game.take_events() {
            match game_event {
                GameEvent::DotEaten { cell } if settings.particles => {
                    particles.spawn(cell_center(cell) * TILE_PIXELS, Vec3::new(1.0, 1.0, 0.5), 5);
                }
                GameEvent::PelletEaten { cell } if settings.particles => {
                    particles.spawn(cell_center(cell) * TILE_PIXELS, Vec3::new(1.0, 0.5, 1.0), 20);
                }
                GameEvent::GhostEaten { position, points } => {
                    if settings.particles {
                        particles.spawn(position * TILE_PIXELS, Vec3::new(0.5, 0.5, 1.0), 30);
                    }
                    log::debug!("Ghost eaten for {} points", points);
                }
                GameEvent::LifeLost { lives } => log::info!("Life lost, {} remaining", lives),
                GameEvent::LevelCleared { level } => log::info!("Level {} cleared", level),
                GameEvent::GameOver { score } => log::info!("Game over, final score {}", score),
                GameEvent::HighScore { value } => {
                    if let Err(err) = high_file.save(value) {
                        log::warn!("Failed to save high score: {}", err);
                    }
                }
                _ => {}
            }
        }

        particles.update(dt);

        renderer.begin_frame()?;
        render::draw_frame(renderer, &game, &particles, run_start.elapsed().as_secs_f32());
        renderer.present()?;

        let spent = now.elapsed();
        if spent < frame_budget {
            std::thread::sleep(frame_budget - spent);
        }
    }

    // Event-driven saves already persisted every record; this last
    // write repeats the final value in case one of them failed
    if let Err(err) = high_file.save(game.high_score) {
        log::warn!("Failed to save high score: {}", err);
    }
    log::info!(
        "Exiting with score {}, high score {}",
        game.score,
        game.high_score
    );
    Ok(())
}

fn main() -> io::Result<()> {
    // Logs go to stderr; the alternate screen owns stdout
    env_logger::init();

    let settings = Settings::load();
    let high_file = HighScoreFile::default_location();
    let high_score = high_file.load();
    log::info!("Pellet Chase starting (high score {})", high_score);

    let mut renderer = TerminalRenderer::new(settings.glyphs, settings.high_contrast);
    renderer.init()?;
    let result = run(&mut renderer, &settings, &high_file, high_score);
    let restored = renderer.cleanup();
    result.and(restored)
}
