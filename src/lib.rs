//! Disk Collide - 2D particle collision simulation
//!
//! Core modules:
//! - `sim`: Simulation core (integration, pairwise resolution, broad-phase, step driver)
//! - `settings`: Runtime configuration with serde-backed loading

pub mod settings;
pub mod sim;

pub use settings::{ConfigError, SimConfig};

use glam::Vec2;

/// Simulation configuration constants (defaults for [`SimConfig`])
pub mod consts {
    /// Arena dimensions
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Downward acceleration added to every particle each tick
    pub const GRAVITY: f32 = 0.98;

    /// Particle defaults
    pub const PARTICLE_RADIUS: f32 = 2.0;
    pub const PARTICLE_SPEED: f32 = 0.0;
    pub const PARTICLE_COLOR: u32 = 0xB4B4FF;

    /// Initial layout: columns x rows of particles
    pub const PARTICLE_COUNT: (u32, u32) = (35, 35);
    /// Largest particle count a config may request
    pub const MAX_PARTICLES: usize = 1 << 20;
    /// Layout divisor per axis (spacing = extent / 3 / partitions)
    pub const PARTITIONS: (u32, u32) = (25, 25);
    /// Layout offset from the top-left corner
    pub const MARGIN: (f32, f32) = (WIDTH / 3.5, HEIGHT / 9.0);

    /// Uniform grid cell edge length
    pub const GRID_SIZE: f32 = 50.0;

    /// Velocity scale applied after each collision
    pub const ENERGY_LOSS: f32 = 0.95;
    /// Integer jitter magnitude, scaled by 0.01 for angle/energy jitter
    pub const RANDOM_OFFSET: i32 = 5;
    pub const ANGLE_JITTER: f32 = RANDOM_OFFSET as f32 * 0.01;
    pub const ENERGY_JITTER: f32 = RANDOM_OFFSET as f32 * 0.01;

    /// Quadtree node capacity before splitting
    pub const QUADTREE_MAX_OBJECTS: usize = 10;
    /// Deepest level a quadtree node may split at
    pub const QUADTREE_MAX_LEVELS: u32 = 5;

    /// Fixed tick rate (steps per second)
    pub const TICK_RATE: u32 = 60;

    /// Default RNG seed
    pub const DEFAULT_SEED: u64 = 0x5EED;
}

/// Total kinetic energy of a set of velocities (unit mass)
#[inline]
pub fn kinetic_energy<'a>(velocities: impl IntoIterator<Item = &'a Vec2>) -> f32 {
    velocities
        .into_iter()
        .map(|v| 0.5 * v.length_squared())
        .sum()
}
