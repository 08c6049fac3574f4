//! Cosmetic particle bursts
//!
//! Fixed pool of short-lived particles in pixel space, recycled oldest
//! first. Purely visual: the simulation never reads anything back from
//! here, so the RNG can live outside the deterministic core.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

pub const PARTICLE_POOL: usize = 256;

/// One pooled particle; dead once `life` drops to zero
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Vec3,
    pub life: f32,
    pub size: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color: Vec3::ONE,
            life: 0.0,
            size: 0.0,
        }
    }
}

/// Pooled burst emitter
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: [Particle; PARTICLE_POOL],
    last_used: usize,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: [Particle::default(); PARTICLE_POOL],
            last_used: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Emit a radial burst at `position` (pixels)
    pub fn spawn(&mut self, position: Vec2, color: Vec3, count: usize) {
        for _ in 0..count {
            let idx = self.first_unused();
            let angle = self.rng.random_range(0.0..360.0_f32).to_radians();
            let speed = self.rng.random_range(20.0..100.0);
            let size = self.rng.random_range(2.0..6.0);
            self.particles[idx] = Particle {
                position,
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                size,
            };
        }
    }

    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.life -= dt;
            if particle.life > 0.0 {
                particle.position += particle.velocity * dt;
            }
        }
    }

    /// Live particles, for the renderer
    pub fn alive(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.life > 0.0)
    }

    /// The slot scan resumes where the last burst left off; with the
    /// whole pool alive it recycles slot zero
    fn first_unused(&mut self) -> usize {
        for i in self.last_used..PARTICLE_POOL {
            if self.particles[i].life <= 0.0 {
                self.last_used = i;
                return i;
            }
        }
        for i in 0..self.last_used {
            if self.particles[i].life <= 0.0 {
                self.last_used = i;
                return i;
            }
        }
        self.last_used = 0;
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_ranges() {
        let mut system = ParticleSystem::new(7);
        system.spawn(Vec2::new(100.0, 50.0), Vec3::new(1.0, 1.0, 0.5), 5);

        assert_eq!(system.alive().count(), 5);
        for particle in system.alive() {
            assert_eq!(particle.position, Vec2::new(100.0, 50.0));
            assert_eq!(particle.life, 1.0);
            let speed = particle.velocity.length();
            assert!((20.0..100.0).contains(&speed), "speed {speed}");
            assert!((2.0..6.0).contains(&particle.size));
        }
    }

    #[test]
    fn test_update_moves_then_expires() {
        let mut system = ParticleSystem::new(7);
        system.spawn(Vec2::ZERO, Vec3::ONE, 3);

        system.update(0.5);
        assert_eq!(system.alive().count(), 3);
        for particle in system.alive() {
            assert!(particle.position.length() >= 10.0, "speed floor is 20 px/s");
        }

        system.update(0.6);
        assert_eq!(system.alive().count(), 0);
    }

    #[test]
    fn test_full_pool_recycles_slot_zero() {
        let mut system = ParticleSystem::new(7);
        system.spawn(Vec2::ZERO, Vec3::ONE, PARTICLE_POOL);
        assert_eq!(system.alive().count(), PARTICLE_POOL);

        system.spawn(Vec2::new(9.0, 9.0), Vec3::ONE, 1);
        assert_eq!(system.alive().count(), PARTICLE_POOL);
        assert_eq!(system.particles[0].position, Vec2::new(9.0, 9.0));
        assert_eq!(system.last_used, 0);
    }

    #[test]
    fn test_scan_resumes_from_last_slot() {
        let mut system = ParticleSystem::new(7);
        system.spawn(Vec2::ZERO, Vec3::ONE, 10);
        assert_eq!(system.last_used, 9);

        system.update(1.1);
        system.spawn(Vec2::new(3.0, 3.0), Vec3::ONE, 1);
        assert_eq!(system.particles[9].position, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_seed_determinism() {
        let mut a = ParticleSystem::new(42);
        let mut b = ParticleSystem::new(42);
        a.spawn(Vec2::ZERO, Vec3::ONE, 8);
        b.spawn(Vec2::ZERO, Vec3::ONE, 8);

        for (pa, pb) in a.particles.iter().zip(b.particles.iter()) {
            assert_eq!(pa.velocity, pb.velocity);
            assert_eq!(pa.size, pb.size);
        }
    }
}
