//! Confetti bursts fired when a session completes

use std::{cell::RefCell, f32::consts::PI, rc::Rc};
use rand::Rng;
use tracing::debug;

/// Particles shared out across the five bursts
pub const BASE_PARTICLE_COUNT: u32 = 200;

/// Width and height of the virtual canvas particles move on
pub const CANVAS_WIDTH: f32 = 1000.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Frames a particle lives for
const PARTICLE_TICKS: u32 = 90;
/// Downward pull per frame, in canvas units
const GRAVITY: f32 = 3.0;

/// Number of distinct particle colours a surface should provide
pub const PALETTE_SIZE: u8 = 6;

/// Glyphs particles are drawn with, by size
const SMALL_GLYPHS: [char; 3] = ['.', '·', '\''];
const GLYPHS: [char; 5] = ['*', '+', '•', '◆', '▪'];
const LARGE_GLYPHS: [char; 3] = ['●', '■', '★'];

/// Options for a single burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstConfig {
    pub particle_count: u32,
    /// Cone width in degrees, centred on straight up
    pub spread: f32,
    pub start_velocity: f32,
    /// Per-frame velocity multiplier
    pub decay: f32,
    /// Particle size multiplier
    pub scalar: f32,
    /// Launch point as a fraction of the canvas
    pub origin_x: f32,
    pub origin_y: f32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particle_count: 50,
            spread: 45.0,
            start_velocity: 45.0,
            decay: 0.9,
            scalar: 1.0,
            origin_x: 0.5,
            origin_y: 0.5,
        }
    }
}

/// Share `percent` of the base count out to a burst launched low on the screen
fn fire(percent: u32, overrides: BurstConfig) -> BurstConfig {
    BurstConfig {
        particle_count: BASE_PARTICLE_COUNT * percent / 100,
        origin_y: 0.7,
        ..overrides
    }
}

/// The five layered bursts of the completion celebration
pub fn celebration_bursts() -> [BurstConfig; 5] {
    let defaults = BurstConfig::default();
    [
        fire(25, BurstConfig { spread: 26.0, start_velocity: 55.0, ..defaults }),
        fire(20, BurstConfig { spread: 60.0, ..defaults }),
        fire(35, BurstConfig { spread: 100.0, decay: 0.91, scalar: 0.8, ..defaults }),
        fire(10, BurstConfig { spread: 120.0, start_velocity: 25.0, decay: 0.92, scalar: 1.2, ..defaults }),
        fire(10, BurstConfig { spread: 120.0, start_velocity: 45.0, ..defaults }),
    ]
}

/// Anything able to show a celebratory burst
pub trait CelebrationRenderer {
    fn burst(&mut self, config: &BurstConfig);
}

/// Pick a glyph whose visual weight follows the burst's size multiplier
fn glyph_for<R: Rng + ?Sized>(scalar: f32, rng: &mut R) -> char {
    let glyphs: &[char] = if scalar < 0.9 {
        &SMALL_GLYPHS
    } else if scalar > 1.1 {
        &LARGE_GLYPHS
    } else {
        &GLYPHS
    };
    glyphs[rng.gen_range(0..glyphs.len())]
}

/// A single confetti piece on the virtual canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    angle: f32,
    velocity: f32,
    decay: f32,
    pub scalar: f32,
    tick: u32,
    pub glyph: char,
    pub color: u8,
}

impl Particle {
    /// Remaining life in `0.0..=1.0`
    pub fn life(&self) -> f32 {
        1.0 - self.tick as f32 / PARTICLE_TICKS as f32
    }

    fn step(&mut self) {
        self.x += self.angle.cos() * self.velocity;
        // Canvas y grows downwards
        self.y += -self.angle.sin() * self.velocity + GRAVITY;
        self.velocity *= self.decay;
        self.tick += 1;
    }

    fn alive(&self) -> bool {
        self.tick < PARTICLE_TICKS && self.y < CANVAS_HEIGHT * 1.2
    }
}

/// All live particles
#[derive(Debug, Clone, Default)]
pub struct ConfettiField {
    particles: Vec<Particle>,
}

impl ConfettiField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Launch one burst worth of particles
    pub fn spawn<R: Rng + ?Sized>(&mut self, config: &BurstConfig, rng: &mut R) {
        let origin_x = config.origin_x * CANVAS_WIDTH;
        let origin_y = config.origin_y * CANVAS_HEIGHT;
        let half_spread = (config.spread / 2.0).to_radians();

        self.particles.reserve(config.particle_count as usize);
        for _ in 0..config.particle_count {
            let angle = PI / 2.0 + rng.gen_range(-1.0f32..=1.0) * half_spread;
            let velocity = config.start_velocity * 0.5 + rng.gen::<f32>() * config.start_velocity;
            self.particles.push(Particle {
                x: origin_x,
                y: origin_y,
                angle,
                velocity,
                decay: config.decay,
                scalar: config.scalar,
                tick: 0,
                glyph: glyph_for(config.scalar, rng),
                color: rng.gen_range(0..PALETTE_SIZE),
            });
        }
    }

    /// Advance one animation frame and drop expired particles
    pub fn step(&mut self) {
        for particle in &mut self.particles {
            particle.step();
        }
        self.particles.retain(Particle::alive);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Renderer that feeds bursts into a shared confetti field drawn by the surface
#[derive(Debug, Clone)]
pub struct ConfettiLauncher {
    field: Rc<RefCell<ConfettiField>>,
}

impl ConfettiLauncher {
    pub fn new(field: Rc<RefCell<ConfettiField>>) -> Self {
        Self { field }
    }
}

impl CelebrationRenderer for ConfettiLauncher {
    fn burst(&mut self, config: &BurstConfig) {
        debug!(
            "Confetti burst: {} particles, spread {}",
            config.particle_count, config.spread
        );
        self.field.borrow_mut().spawn(config, &mut rand::thread_rng());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn bursts_share_out_base_count() {
        let bursts = celebration_bursts();
        let counts: Vec<u32> = bursts.iter().map(|b| b.particle_count).collect();
        assert_eq!(counts, vec![50, 40, 70, 20, 20]);

        let spreads: Vec<f32> = bursts.iter().map(|b| b.spread).collect();
        assert_eq!(spreads, vec![26.0, 60.0, 100.0, 120.0, 120.0]);

        assert!(bursts.iter().all(|b| b.origin_y == 0.7));
    }

    #[test]
    fn bursts_override_only_what_they_name() {
        let bursts = celebration_bursts();
        assert_eq!(bursts[0].start_velocity, 55.0);
        assert_eq!(bursts[1].start_velocity, 45.0);
        assert_eq!(bursts[2].decay, 0.91);
        assert_eq!(bursts[2].scalar, 0.8);
        assert_eq!(bursts[3].start_velocity, 25.0);
        assert_eq!(bursts[3].decay, 0.92);
        assert_eq!(bursts[3].scalar, 1.2);
        assert_eq!(bursts[4].decay, 0.9);
        assert_eq!(bursts[4].scalar, 1.0);
    }

    #[test]
    fn spawned_particles_rise_then_expire() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut field = ConfettiField::new();
        let config = BurstConfig {
            spread: 0.0,
            ..BurstConfig::default()
        };
        field.spawn(&config, &mut rng);
        assert_eq!(field.particles().len(), 50);

        let start_y = field.particles()[0].y;
        field.step();
        assert!(field.particles()[0].y < start_y, "particles launch upwards");
        assert!(field.particles().iter().all(|p| p.color < PALETTE_SIZE));

        for _ in 0..PARTICLE_TICKS {
            field.step();
        }
        assert!(field.is_empty());
    }

    #[test]
    fn scalar_sets_particle_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ConfettiField::new();
        for scalar in [0.8, 1.0, 1.2] {
            field.spawn(&BurstConfig { particle_count: 20, scalar, ..BurstConfig::default() }, &mut rng);
        }

        let particles = field.particles();
        assert!(particles[..20].iter().all(|p| SMALL_GLYPHS.contains(&p.glyph)));
        assert!(particles[20..40].iter().all(|p| GLYPHS.contains(&p.glyph)));
        assert!(particles[40..].iter().all(|p| LARGE_GLYPHS.contains(&p.glyph)));
    }

    #[test]
    fn launcher_writes_into_shared_field() {
        let field = Rc::new(RefCell::new(ConfettiField::new()));
        let mut launcher = ConfettiLauncher::new(Rc::clone(&field));

        for burst in celebration_bursts() {
            launcher.burst(&burst);
        }
        assert_eq!(field.borrow().particles().len(), 200);
    }
}
