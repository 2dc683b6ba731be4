//! Simulation step driver
//!
//! Owns the particles, the broad-phase and the RNG. Each tick runs strictly in
//! order: integrate every particle, rebuild the broad-phase from the new
//! positions, then test and resolve every candidate pair.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::broad_phase::{BroadPhase, BroadPhaseKind};
use super::collision::{CollisionParams, CollisionStats, resolve_pair};
use super::particle::Particle;
use super::render::Renderer;
use super::snapshot::{RngState, Snapshot};
use crate::settings::{ConfigError, Scene, SimConfig};

/// Regular grid of resting particles, row-major
pub fn spawn_layout(config: &SimConfig) -> Vec<Particle> {
    let layout = &config.layout;
    let (px, py) = (layout.partitions.0 as f32, layout.partitions.1 as f32);
    let mut particles = Vec::with_capacity(layout.rows as usize * layout.columns as usize);

    for i in 0..layout.rows {
        for j in 0..layout.columns {
            let x = (j as f32 * config.width / px / 3.0).floor() + layout.margin.0;
            let y = (i as f32 * config.height / py / 3.0).floor() + layout.margin.1;
            particles.push(
                Particle::new(Vec2::new(x, y), layout.radius, layout.color)
                    .with_velocity(Vec2::splat(layout.speed))
                    .with_gravity(config.gravity),
            );
        }
    }
    particles
}

/// Two disks on the horizontal centre line moving toward each other
pub fn spawn_two_body(config: &SimConfig) -> Vec<Particle> {
    config
        .two_body_starts()
        .into_iter()
        .map(|(pos, vel)| {
            Particle::new(pos, config.layout.radius, config.layout.color)
                .with_velocity(vel)
                .with_gravity(config.gravity)
        })
        .collect()
}

pub struct World {
    config: SimConfig,
    particles: Vec<Particle>,
    broad_phase: Box<dyn BroadPhase>,
    params: CollisionParams,
    rng: Pcg32,
    /// Reused candidate buffer
    pairs: Vec<(usize, usize)>,
    time_ticks: u64,
}

impl World {
    /// Validate the config and spawn its scene
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let particles = match config.scene {
            Scene::Grid => spawn_layout(&config),
            Scene::TwoBody => spawn_two_body(&config),
        };
        Self::with_particles(config, particles)
    }

    /// World over a caller-provided particle set
    pub fn with_particles(config: SimConfig, particles: Vec<Particle>) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = RngState::new(config.seed).to_rng();
        Ok(Self::assemble(config, particles, rng, 0))
    }

    /// Resume from a snapshot; continues exactly where the capture left off
    pub fn from_snapshot(config: SimConfig, snapshot: Snapshot) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::assemble(
            config,
            snapshot.particles,
            snapshot.rng,
            snapshot.tick,
        ))
    }

    fn assemble(config: SimConfig, particles: Vec<Particle>, rng: Pcg32, time_ticks: u64) -> Self {
        let broad_phase = config.broad_phase.build(&config);
        log::info!(
            "World: {} particles, {}x{}, broad-phase {}, seed {}",
            particles.len(),
            config.width,
            config.height,
            broad_phase.name(),
            config.seed
        );
        Self {
            params: CollisionParams::from_config(&config),
            config,
            particles,
            broad_phase,
            rng,
            pairs: Vec::new(),
            time_ticks,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn broad_phase_kind(&self) -> BroadPhaseKind {
        self.config.broad_phase
    }

    pub(crate) fn rng(&self) -> &Pcg32 {
        &self.rng
    }

    pub fn kinetic_energy(&self) -> f32 {
        crate::kinetic_energy(self.particles.iter().map(|p| &p.vel))
    }

    /// Advance one tick
    pub fn tick(&mut self) -> CollisionStats {
        let (width, height) = (self.config.width, self.config.height);
        for particle in &mut self.particles {
            particle.step(width, height);
        }

        self.broad_phase.rebuild(&self.particles);
        self.pairs.clear();
        self.broad_phase.candidate_pairs(&mut self.pairs);

        let mut stats = CollisionStats::default();
        for &(i, j) in &self.pairs {
            resolve_pair(
                &mut self.particles,
                i,
                j,
                &self.params,
                &mut self.rng,
                &mut stats,
            );
        }

        self.time_ticks += 1;
        log::debug!(
            "tick {}: {} candidates, {} collisions",
            self.time_ticks,
            stats.candidates,
            stats.collisions
        );
        stats
    }

    /// Hand every particle to the renderer (read-only)
    pub fn render(&self, renderer: &mut impl Renderer) {
        renderer.begin_frame();
        for p in &self.particles {
            renderer.draw_circle(p.pos, p.radius, p.color);
        }
        renderer.end_frame();
    }
}
